//! Domain models: pure data types with no I/O.

pub mod batch;
pub mod callback;
pub mod config;
pub mod demographics;
pub mod persona;

pub use batch::{BatchRun, BatchStatus, SlotStatus, TestSlot};
pub use callback::{CallbackPayload, CallbackResolution, CallbackStatus, UnlinkedCallback};
pub use config::{Config, DatabaseConfig, GenerationConfig, ModelConfig, RunnerConfig, ServerConfig};
pub use demographics::{
    AccessibilityNeed, AgeRange, DemographicDistribution, DemographicOverrides, DemographicSample,
    DeviceType, IncomeLevel, Region, TechSavviness, WeightedOption,
};
pub use persona::Persona;

#[cfg(test)]
pub mod test_fixtures {
    use super::demographics::{IncomeLevel, TechSavviness};
    use super::persona::Persona;

    pub fn persona(name: &str) -> Persona {
        Persona {
            name: name.to_string(),
            age: 31,
            country: "Brazil".to_string(),
            occupation: "Teacher".to_string(),
            income_level: IncomeLevel::Medium,
            tech_savviness: TechSavviness::Intermediate,
            primary_goal: "Compare plans before subscribing".to_string(),
            pain_points: vec!["dense forms".to_string()],
            context: "Browses on a laptop in the evening".to_string(),
            relevance_score: 7.0,
        }
    }
}
