//! Integration tests for wave-bounded persona generation with a scripted model.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use serde_json::json;
use swarmtest::domain::error::{GenerationError, ModelError};
use swarmtest::domain::ports::ModelClient;
use swarmtest::services::{GenerationOptions, PersonaGenerator};

/// Model that returns a synthetic persona per call and tracks how many
/// calls are in flight at once.
struct ScriptedModel {
    calls: AtomicUsize,
    in_flight: AtomicUsize,
    max_in_flight: AtomicUsize,
    fail_at: Option<usize>,
    single_token_names: bool,
    bad_age: bool,
}

impl ScriptedModel {
    fn new() -> Self {
        Self {
            calls: AtomicUsize::new(0),
            in_flight: AtomicUsize::new(0),
            max_in_flight: AtomicUsize::new(0),
            fail_at: None,
            single_token_names: false,
            bad_age: false,
        }
    }

    fn failing_at(index: usize) -> Self {
        Self { fail_at: Some(index), ..Self::new() }
    }
}

#[async_trait]
impl ModelClient for ScriptedModel {
    async fn generate_json(&self, _prompt: &str) -> Result<serde_json::Value, ModelError> {
        let index = self.calls.fetch_add(1, Ordering::SeqCst);

        let now = self.in_flight.fetch_add(1, Ordering::SeqCst) + 1;
        self.max_in_flight.fetch_max(now, Ordering::SeqCst);
        tokio::time::sleep(Duration::from_millis(10)).await;
        self.in_flight.fetch_sub(1, Ordering::SeqCst);

        if self.fail_at == Some(index) {
            return Err(ModelError::Api { status: 500, message: "overloaded".to_string() });
        }

        let name = if self.single_token_names {
            format!("Solo{index}")
        } else {
            format!("Persona{index} Test")
        };
        Ok(json!({
            "name": name,
            "age": if self.bad_age { 15 } else { 30 + index as u32 },
            "country": "Brazil",
            "occupation": "Teacher",
            "incomeLevel": "medium",
            "techSavviness": "intermediate",
            "primaryGoal": "Compare plans before subscribing",
            "painPoints": ["dense forms"],
            "context": "Browses on a laptop in the evening",
            "relevanceScore": 7.0
        }))
    }
}

fn options(count: usize, max_concurrency: usize) -> GenerationOptions {
    GenerationOptions { count, max_concurrency, example_persona: None, demographic_overrides: None }
}

#[tokio::test]
async fn generates_in_waves_bounded_by_concurrency() {
    let model = Arc::new(ScriptedModel::new());
    let generator = PersonaGenerator::new(model.clone());

    let outcome = generator
        .generate_batch("budget shoppers", Some("https://example.com"), options(10, 6))
        .await
        .unwrap();

    assert_eq!(outcome.personas.len(), 10);
    assert_eq!(model.calls.load(Ordering::SeqCst), 10);
    // First wave saturates the limit, second wave carries the remaining 4.
    assert_eq!(model.max_in_flight.load(Ordering::SeqCst), 6);
    assert!(outcome.reasoning.contains("10 personas"));
}

#[tokio::test]
async fn small_count_runs_one_wave() {
    let model = Arc::new(ScriptedModel::new());
    let generator = PersonaGenerator::new(model.clone());

    let outcome = generator
        .generate_batch("budget shoppers", None, options(3, 6))
        .await
        .unwrap();

    assert_eq!(outcome.personas.len(), 3);
    assert_eq!(model.max_in_flight.load(Ordering::SeqCst), 3);
}

#[tokio::test]
async fn one_unit_failure_fails_the_batch() {
    let model = Arc::new(ScriptedModel::failing_at(3));
    let generator = PersonaGenerator::new(model.clone());

    let result = generator
        .generate_batch("budget shoppers", None, options(6, 6))
        .await;

    assert!(matches!(result, Err(GenerationError::Model(_))));
    // The whole wave was still driven to completion before the failure
    // surfaced.
    assert_eq!(model.calls.load(Ordering::SeqCst), 6);
}

#[tokio::test]
async fn invalid_persona_fails_the_batch() {
    let model = Arc::new(ScriptedModel { bad_age: true, ..ScriptedModel::new() });
    let generator = PersonaGenerator::new(model);

    let result = generator
        .generate_batch("budget shoppers", None, options(2, 2))
        .await;
    assert!(matches!(result, Err(GenerationError::Validation(_))));
}

#[tokio::test]
async fn single_token_names_are_completed() {
    let model = Arc::new(ScriptedModel { single_token_names: true, ..ScriptedModel::new() });
    let generator = PersonaGenerator::new(model);

    let outcome = generator
        .generate_batch("budget shoppers", None, options(4, 4))
        .await
        .unwrap();

    for persona in &outcome.personas {
        assert!(
            persona.name.split_whitespace().count() >= 2,
            "name '{}' should carry a surname",
            persona.name
        );
    }
}

#[tokio::test]
async fn empty_description_is_rejected() {
    let model = Arc::new(ScriptedModel::new());
    let generator = PersonaGenerator::new(model);

    let result = generator.generate_batch("   ", None, options(2, 2)).await;
    assert!(matches!(result, Err(GenerationError::InvalidRequest(_))));

    let model = Arc::new(ScriptedModel::new());
    let generator = PersonaGenerator::new(model);
    let result = generator.generate_batch("shoppers", None, options(2, 0)).await;
    assert!(matches!(result, Err(GenerationError::InvalidRequest(_))));
}
