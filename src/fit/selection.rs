//! Best-model selection by fit-quality score.
//!
//! Rules:
//! 1. Only fitted results that expose a score take part.
//! 2. A candidate replaces the current best only with a strictly greater score,
//!    starting from 0, so the first model in registry order wins ties.
//! 3. A winner exists only if its score is positive.

use crate::domain::ResultSet;

/// The winning model of a run.
#[derive(Debug, Clone, PartialEq)]
pub struct BestModel {
    /// Registry key.
    pub name: String,
    /// Display name, or the registry key when the model exposes none.
    pub label: String,
    pub score: f64,
}

/// Pick the best-scoring model, if any scores positive.
pub fn select_best(results: &ResultSet) -> Option<BestModel> {
    let mut best_score = 0.0;
    let mut best = None;

    for (name, outcome) in results.iter() {
        let Some(result) = outcome.result() else {
            continue;
        };
        let Some(score) = result.score else {
            continue;
        };
        if score > best_score {
            best_score = score;
            best = Some((name, result));
        }
    }

    best.map(|(name, result)| BestModel {
        name: name.to_string(),
        label: result.display_name.clone().unwrap_or_else(|| name.to_string()),
        score: best_score,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{ModelOutcome, ModelResult};

    fn scored(scores: &[(&str, Option<f64>)]) -> ResultSet {
        let mut set = ResultSet::new();
        for &(name, score) in scores {
            let mut result = ModelResult::new(format!("{name} record")).with_display_name(name.to_uppercase());
            result.score = score;
            set.insert(name, ModelOutcome::Fitted(result));
        }
        set
    }

    #[test]
    fn picks_highest_score() {
        let set = scored(&[("a", Some(0.5)), ("b", Some(0.9)), ("c", Some(0.3))]);
        let best = select_best(&set).unwrap();
        assert_eq!(best.name, "b");
        assert_eq!(best.label, "B");
        assert_eq!(best.score, 0.9);
    }

    #[test]
    fn first_in_registry_order_wins_ties() {
        let set = scored(&[("a", Some(0.9)), ("b", Some(0.9)), ("c", Some(0.3))]);
        assert_eq!(select_best(&set).unwrap().name, "a");
    }

    #[test]
    fn non_positive_or_missing_scores_never_win() {
        let set = scored(&[("a", Some(0.0)), ("b", None), ("c", Some(-0.4))]);
        assert!(select_best(&set).is_none());
    }

    #[test]
    fn failed_models_are_skipped() {
        let mut set = scored(&[("a", Some(0.2))]);
        set.insert("b", ModelOutcome::Failed { note: "boom".to_string() });
        assert_eq!(select_best(&set).unwrap().name, "a");
    }

    #[test]
    fn label_falls_back_to_registry_name() {
        let mut set = ResultSet::new();
        set.insert("custom", ModelOutcome::Fitted(ModelResult::new("r").with_score(0.7)));
        assert_eq!(select_best(&set).unwrap().label, "custom");
    }

    #[test]
    fn nan_score_is_ignored() {
        let set = scored(&[("a", Some(f64::NAN)), ("b", Some(0.1))]);
        assert_eq!(select_best(&set).unwrap().name, "b");
    }
}
