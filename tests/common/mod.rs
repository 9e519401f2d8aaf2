//! Shared fixtures for integration tests.

use swarmtest::domain::models::{IncomeLevel, Persona, TechSavviness};
use swarmtest::infrastructure::database::DatabaseConnection;

pub async fn memory_db() -> DatabaseConnection {
    let db = DatabaseConnection::new("sqlite::memory:")
        .await
        .expect("failed to open in-memory database");
    db.migrate().await.expect("failed to run migrations");
    db
}

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
