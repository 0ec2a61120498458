//! The run report: an ordered, append-only text buffer.
//!
//! One report is built per run, from empty, in this order:
//! 1. the growth-statistics section (when the series supports one)
//! 2. every model record in registry order, failure notes included
//! 3. the best-model line (when a model scored positive)

use crate::analysis::GrowthStats;
use crate::domain::ResultSet;
use crate::fit::BestModel;

pub mod format;

pub use format::*;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Report {
    text: String,
}

impl Report {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a block of text, ensuring it ends with a newline.
    pub fn push_block(&mut self, block: &str) {
        self.text.push_str(block);
        if !block.ends_with('\n') {
            self.text.push('\n');
        }
    }

    pub fn as_str(&self) -> &str {
        &self.text
    }

    pub fn is_empty(&self) -> bool {
        self.text.is_empty()
    }
}

impl std::fmt::Display for Report {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.text)
    }
}

/// Build the report for one run.
pub fn assemble_report(growth: Option<&GrowthStats>, results: &ResultSet, best: Option<&BestModel>) -> Report {
    let mut report = Report::new();

    if let Some(stats) = growth {
        report.push_block(&format_growth_section(stats));
    }
    for (_, outcome) in results.iter() {
        report.push_block(outcome.record());
    }
    if let Some(best) = best {
        report.push_block(&format_best_model(best));
    }

    report
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{ModelOutcome, ModelResult};
    use chrono::NaiveDate;

    #[test]
    fn sections_appear_in_order() {
        let stats = GrowthStats {
            entity: "Chile".to_string(),
            current_date: NaiveDate::from_ymd_opt(2020, 3, 8).unwrap(),
            current: 100,
            lastweek_date: NaiveDate::from_ymd_opt(2020, 3, 1).unwrap(),
            lastweek: 50,
            ratio: Some(2.0),
        };
        let mut results = ResultSet::new();
        results.insert("a", ModelOutcome::Fitted(ModelResult::new("record a")));
        results.insert("b", ModelOutcome::Failed { note: "note b".to_string() });
        let best = BestModel {
            name: "a".to_string(),
            label: "A".to_string(),
            score: 0.5,
        };

        let report = assemble_report(Some(&stats), &results, Some(&best));
        let text = report.as_str();
        let growth = text.find("Results for *Chile*").unwrap();
        let a = text.find("record a").unwrap();
        let b = text.find("note b").unwrap();
        let best_at = text.find("Best model: A").unwrap();
        assert!(growth < a && a < b && b < best_at);
    }

    #[test]
    fn omitted_sections_leave_only_records() {
        let mut results = ResultSet::new();
        results.insert("a", ModelOutcome::Fitted(ModelResult::new("record a")));
        let report = assemble_report(None, &results, None);
        assert_eq!(report.as_str(), "record a\n");
    }
}
