//! Persona domain model.
//!
//! A persona is produced from one demographic sample plus one generation
//! call. Field ranges are enforced here, not trusted from the model.

use serde::{Deserialize, Serialize};

use super::demographics::{IncomeLevel, TechSavviness};
use crate::domain::error::GenerationError;

/// A synthetic user persona driving one test execution.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Persona {
    pub name: String,
    pub age: u32,
    pub country: String,
    pub occupation: String,
    pub income_level: IncomeLevel,
    pub tech_savviness: TechSavviness,
    pub primary_goal: String,
    pub pain_points: Vec<String>,
    pub context: String,
    /// How relevant this persona is to the target audience (0-10).
    pub relevance_score: f64,
}

impl Persona {
    /// Deserialize and range-check a model response. A persona that fails
    /// here fails the owning generation unit.
    pub fn from_model_json(value: serde_json::Value) -> Result<Self, GenerationError> {
        let persona: Self = serde_json::from_value(value)
            .map_err(|e| GenerationError::Validation(format!("persona did not match schema: {e}")))?;
        persona.validate()?;
        Ok(persona)
    }

    pub fn validate(&self) -> Result<(), GenerationError> {
        if self.name.trim().is_empty() {
            return Err(GenerationError::Validation("persona name is empty".into()));
        }
        if !(18..=100).contains(&self.age) {
            return Err(GenerationError::Validation(format!(
                "persona age {} outside 18-100",
                self.age
            )));
        }
        if !(0.0..=10.0).contains(&self.relevance_score) {
            return Err(GenerationError::Validation(format!(
                "relevance score {} outside 0-10",
                self.relevance_score
            )));
        }
        Ok(())
    }

    /// Compact summary used as a negative example in later prompts.
    pub fn format_summary(&self) -> String {
        let pain_points: Vec<&str> =
            self.pain_points.iter().take(3).map(String::as_str).collect();
        format!(
            "{}, {}, {} from {}.\n\
             Tech: {}. Income: {}.\n\
             Goal: {}\n\
             Pain Points: {}\n\
             Context: {}",
            self.name,
            self.age,
            self.occupation,
            self.country,
            self.tech_savviness.as_str(),
            self.income_level.as_str(),
            self.primary_goal,
            pain_points.join("; "),
            self.context,
        )
    }
}

/// Built-in seed example shown to the model when the caller supplies none.
pub fn seed_example() -> String {
    "Maya Thompson, 34, Freelance Graphic Designer from Canada.\n\
     Tech: intermediate. Income: medium.\n\
     Goal: Find a portfolio tool that does not get in the way of client work.\n\
     Pain Points: Slow editors; confusing pricing pages; mobile layouts that hide navigation\n\
     Context: Testing this website for usability."
        .to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn sample_json() -> serde_json::Value {
        json!({
            "name": "Jamie Chen",
            "age": 29,
            "country": "Singapore",
            "occupation": "Nurse",
            "incomeLevel": "medium",
            "techSavviness": "beginner",
            "primaryGoal": "Book a service quickly",
            "painPoints": ["small text", "too many steps", "popups", "slow pages"],
            "context": "Uses a phone between shifts",
            "relevanceScore": 8.5
        })
    }

    #[test]
    fn parses_valid_model_json() {
        let persona = Persona::from_model_json(sample_json()).unwrap();
        assert_eq!(persona.name, "Jamie Chen");
        assert_eq!(persona.income_level, IncomeLevel::Medium);
        assert_eq!(persona.tech_savviness, TechSavviness::Beginner);
    }

    #[test]
    fn rejects_age_out_of_range() {
        let mut value = sample_json();
        value["age"] = json!(17);
        assert!(Persona::from_model_json(value).is_err());
    }

    #[test]
    fn rejects_relevance_out_of_range() {
        let mut value = sample_json();
        value["relevanceScore"] = json!(10.5);
        assert!(Persona::from_model_json(value).is_err());
    }

    #[test]
    fn rejects_unknown_enum_value() {
        let mut value = sample_json();
        value["techSavviness"] = json!("wizard");
        assert!(Persona::from_model_json(value).is_err());
    }

    #[test]
    fn summary_caps_pain_points_at_three() {
        let persona = Persona::from_model_json(sample_json()).unwrap();
        let summary = persona.format_summary();
        assert!(summary.contains("small text; too many steps; popups"));
        assert!(!summary.contains("slow pages"));
    }
}
