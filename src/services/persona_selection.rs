//! Relevance-based persona selection.
//!
//! Picks the top slice of a generated pool by relevance score. The sort is
//! stable so equal scores keep their generation order, which keeps selection
//! deterministic for a fixed pool.

use tracing::debug;

use crate::domain::error::GenerationError;
use crate::domain::models::Persona;

/// Indices into the source pool, in descending relevance order, plus a
/// templated explanation.
#[derive(Debug, Clone)]
pub struct SelectionOutcome {
    pub selected_indices: Vec<usize>,
    pub reasoning: String,
}

/// Select the `count` most relevant personas from `pool`. Asking for more
/// than the pool holds is an error rather than a silent truncation.
pub fn select_top_personas(
    pool: &[Persona],
    count: usize,
) -> Result<SelectionOutcome, GenerationError> {
    if count == 0 {
        return Err(GenerationError::InvalidRequest(
            "selection count must be at least 1".into(),
        ));
    }
    if count > pool.len() {
        return Err(GenerationError::InvalidRequest(format!(
            "requested {count} personas from a pool of {}",
            pool.len()
        )));
    }

    let mut indices: Vec<usize> = (0..pool.len()).collect();
    indices.sort_by(|&a, &b| {
        pool[b]
            .relevance_score
            .partial_cmp(&pool[a].relevance_score)
            .unwrap_or(std::cmp::Ordering::Equal)
    });
    indices.truncate(count);

    for &i in &indices {
        debug!(name = %pool[i].name, score = pool[i].relevance_score, "selected persona");
    }

    let reasoning = format!(
        "Selected the {count} highest-relevance personas from a pool of {} by relevance score.",
        pool.len()
    );

    Ok(SelectionOutcome { selected_indices: indices, reasoning })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::models::test_fixtures::persona;

    fn pool_with_scores(scores: &[f64]) -> Vec<Persona> {
        scores
            .iter()
            .enumerate()
            .map(|(i, &score)| {
                let mut p = persona(&format!("Persona {i}"));
                p.relevance_score = score;
                p
            })
            .collect()
    }

    #[test]
    fn picks_highest_scores_in_order() {
        let pool = pool_with_scores(&[4.0, 9.0, 7.5, 2.0]);
        let outcome = select_top_personas(&pool, 2).unwrap();
        assert_eq!(outcome.selected_indices, vec![1, 2]);
    }

    #[test]
    fn equal_scores_keep_generation_order() {
        let pool = pool_with_scores(&[8.0, 8.0, 8.0]);
        let outcome = select_top_personas(&pool, 3).unwrap();
        assert_eq!(outcome.selected_indices, vec![0, 1, 2]);
    }

    #[test]
    fn rejects_oversized_request() {
        let pool = pool_with_scores(&[5.0]);
        assert!(select_top_personas(&pool, 2).is_err());
        assert!(select_top_personas(&pool, 0).is_err());
    }
}
