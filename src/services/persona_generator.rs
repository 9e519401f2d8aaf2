//! Wave-bounded persona generation.
//!
//! Units are processed in waves of at most `max_concurrency` concurrent
//! model calls with a hard join barrier between waves. Two diversity
//! mechanisms run side by side: demographic-axis dedup via the shared
//! `seen` signature set, and free-text steering via a rolling window of the
//! three most recent persona summaries embedded in every prompt.
//!
//! Any unit failure fails the whole batch call. The diversity state is
//! call-scoped and in-memory; a partial retry would have to re-derive
//! already-consumed diversity state.

use std::collections::HashSet;
use std::sync::Arc;

use futures::future;
use rand::seq::SliceRandom;
use tracing::{debug, info};

use crate::domain::error::GenerationError;
use crate::domain::models::persona::seed_example;
use crate::domain::models::{DemographicOverrides, DemographicSample, Persona};
use crate::domain::ports::ModelClient;
use crate::services::demographic_sampler;

/// Summaries from prior personas read per prompt.
const ROLLING_EXAMPLE_WINDOW: usize = 3;

/// Surnames appended when the model returns a single-token name.
const SURNAME_POOL: &[&str] = &[
    "Carter", "Nguyen", "Patel", "Garcia", "Kim", "Miller", "Rossi", "Silva", "Chen", "Khan",
    "Johnson", "Alvarez", "Brown", "Davis", "Lopez",
];

/// Options for one generation batch call.
#[derive(Debug, Clone)]
pub struct GenerationOptions {
    pub count: usize,
    pub max_concurrency: usize,
    pub example_persona: Option<String>,
    pub demographic_overrides: Option<DemographicOverrides>,
}

impl Default for GenerationOptions {
    fn default() -> Self {
        Self {
            count: 10,
            max_concurrency: 6,
            example_persona: None,
            demographic_overrides: None,
        }
    }
}

/// Ordered personas plus a templated explanation of how they were chosen.
#[derive(Debug, Clone)]
pub struct GenerationOutcome {
    pub personas: Vec<Persona>,
    pub reasoning: String,
}

pub struct PersonaGenerator<M: ModelClient> {
    model: Arc<M>,
}

impl<M: ModelClient> PersonaGenerator<M> {
    pub fn new(model: Arc<M>) -> Self {
        Self { model }
    }

    /// Generate `options.count` personas for the audience description,
    /// wave-bounded by `options.max_concurrency`. Atomic: the first unit
    /// failure fails the call with no partial result.
    pub async fn generate_batch(
        &self,
        user_description: &str,
        target_url: Option<&str>,
        options: GenerationOptions,
    ) -> Result<GenerationOutcome, GenerationError> {
        if options.max_concurrency == 0 {
            return Err(GenerationError::InvalidRequest(
                "max_concurrency must be at least 1".into(),
            ));
        }
        if user_description.trim().is_empty() {
            return Err(GenerationError::InvalidRequest(
                "audience description is empty".into(),
            ));
        }

        let example_seed = options
            .example_persona
            .clone()
            .filter(|s| !s.trim().is_empty())
            .unwrap_or_else(seed_example);

        let mut personas: Vec<Persona> = Vec::with_capacity(options.count);
        let mut previous_examples: Vec<String> = Vec::new();
        let mut seen_signatures: HashSet<String> = HashSet::new();

        info!(
            count = options.count,
            max_concurrency = options.max_concurrency,
            "starting persona generation"
        );

        let mut start = 0;
        while start < options.count {
            let end = (start + options.max_concurrency).min(options.count);
            let mut wave = Vec::with_capacity(end - start);

            for _ in start..end {
                let sample = demographic_sampler::sample_diverse(
                    options.demographic_overrides.as_ref(),
                    &mut seen_signatures,
                );
                debug!(
                    age = sample.age,
                    bracket = %sample.age_range.label,
                    tech = sample.tech_savviness.as_str(),
                    income = sample.income_level.as_str(),
                    device = sample.device.as_str(),
                    accessibility = sample.accessibility.as_str(),
                    region = sample.region.as_str(),
                    "sampled demographics"
                );
                let recent = previous_examples
                    .iter()
                    .rev()
                    .take(ROLLING_EXAMPLE_WINDOW)
                    .rev();
                let example_block: String = std::iter::once(example_seed.as_str())
                    .chain(recent.map(String::as_str))
                    .collect::<Vec<_>>()
                    .join("\n\n");
                let prompt = build_prompt(user_description, target_url, &sample, &example_block);
                wave.push(self.generate_one(prompt));
            }

            // Hard barrier: every member resolves or rejects before the next
            // wave starts. In-flight siblings are not cancelled on failure.
            let results = future::join_all(wave).await;
            for result in results {
                let persona = result?;
                previous_examples.push(persona.format_summary());
                personas.push(persona);
            }
            start = end;
        }

        let reasoning = format!(
            "Generated {} personas using weighted demographic sampling and diversity \
             constraints to cover varied ages, tech levels, and accessibility needs.",
            personas.len()
        );

        Ok(GenerationOutcome { personas, reasoning })
    }

    async fn generate_one(&self, prompt: String) -> Result<Persona, GenerationError> {
        let value = self.model.generate_json(&prompt).await?;
        let mut persona = Persona::from_model_json(value)?;
        persona.name = ensure_full_name(&persona.name);
        debug!(
            name = %persona.name,
            age = persona.age,
            country = %persona.country,
            score = persona.relevance_score,
            "generated persona"
        );
        Ok(persona)
    }
}

/// Append a surname from the fixed pool when the name carries fewer than two
/// whitespace-separated tokens.
fn ensure_full_name(name: &str) -> String {
    let cleaned = name.trim();
    if cleaned.is_empty() {
        return cleaned.to_string();
    }
    if cleaned.split_whitespace().count() >= 2 {
        return cleaned.to_string();
    }
    let surname = SURNAME_POOL
        .choose(&mut rand::thread_rng())
        .copied()
        .unwrap_or("Carter");
    format!("{cleaned} {surname}")
}

fn build_prompt(
    user_description: &str,
    target_url: Option<&str>,
    sample: &DemographicSample,
    example_block: &str,
) -> String {
    let url_context = target_url
        .map(|url| format!("Target Website: {url}\n"))
        .unwrap_or_default();

    format!(
        "You are a UX research expert. Generate ONE realistic user persona as JSON.\n\
         \n\
         {url_context}User's Target Audience Description: {user_description}\n\
         \n\
         Persona must satisfy these constraints:\n\
         {constraints}\n\
         \n\
         Name requirement:\n\
         - Use a realistic first AND last name (e.g., \"Jamie Chen\", not just \"Jamie\").\n\
         - Avoid reusing first names or occupations from the examples below.\n\
         \n\
         Ensure the persona feels real, distinct, and fits the target audience.\n\
         If an accessibility need is present, reflect it in painPoints and context.\n\
         Make the device and accessibility clearly reflected in context.\n\
         \n\
         EXAMPLES (be distinct from these):\n\
         {example_block}\n\
         \n\
         Output ONLY the JSON object matching the schema fields exactly.",
        constraints = sample.describe_constraints(),
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn full_names_pass_through() {
        assert_eq!(ensure_full_name("Jamie Chen"), "Jamie Chen");
        assert_eq!(ensure_full_name("  Ana Maria Souza "), "Ana Maria Souza");
    }

    #[test]
    fn single_token_names_get_a_surname() {
        let name = ensure_full_name("Jamie");
        let mut tokens = name.split_whitespace();
        assert_eq!(tokens.next(), Some("Jamie"));
        let surname = tokens.next().expect("surname appended");
        assert!(SURNAME_POOL.contains(&surname));
        assert_eq!(tokens.next(), None);
    }

    #[test]
    fn empty_name_stays_empty() {
        assert_eq!(ensure_full_name("   "), "");
    }

    #[test]
    fn prompt_embeds_constraints_and_examples() {
        let dist = crate::domain::models::DemographicDistribution::default();
        let sample = DemographicSample {
            age: 22,
            age_range: dist.age_ranges[0].clone(),
            tech_savviness: crate::domain::models::TechSavviness::Beginner,
            income_level: crate::domain::models::IncomeLevel::Low,
            accessibility: crate::domain::models::AccessibilityNeed::Colorblind,
            device: crate::domain::models::DeviceType::Mobile,
            region: crate::domain::models::Region::Africa,
        };
        let prompt = build_prompt(
            "students shopping for budget laptops",
            Some("https://example.com"),
            &sample,
            "EXAMPLE ONE",
        );
        assert!(prompt.contains("Target Website: https://example.com"));
        assert!(prompt.contains("students shopping for budget laptops"));
        assert!(prompt.contains("- Age between 18-25 (target 22)"));
        assert!(prompt.contains("EXAMPLE ONE"));
    }

    #[test]
    fn prompt_omits_url_line_when_absent() {
        let dist = crate::domain::models::DemographicDistribution::default();
        let sample = DemographicSample {
            age: 40,
            age_range: dist.age_ranges[2].clone(),
            tech_savviness: crate::domain::models::TechSavviness::Advanced,
            income_level: crate::domain::models::IncomeLevel::High,
            accessibility: crate::domain::models::AccessibilityNeed::None,
            device: crate::domain::models::DeviceType::Desktop,
            region: crate::domain::models::Region::Asia,
        };
        let prompt = build_prompt("engineers", None, &sample, "SEED");
        assert!(!prompt.contains("Target Website"));
    }
}
