//! Formatted terminal output.
//!
//! We keep formatting code in one place so:
//! - the math/fitting code stays clean and testable
//! - output changes are localized (the golden tests below pin the layout)

use chrono::NaiveDate;

use crate::analysis::GrowthStats;
use crate::fit::BestModel;

const NOT_APPLICABLE: &str = "n/a";

/// Format the week-over-week growth section.
pub fn format_growth_section(stats: &GrowthStats) -> String {
    let mut out = String::new();

    out.push_str(&format!("Results for *{}*\n", stats.entity));
    out.push_str("** Based on the last week of data **\n");
    out.push_str(&format!(
        "    Confirmed cases on {}    {}\n",
        stats.current_date, stats.current
    ));
    out.push_str(&format!(
        "    Confirmed cases on {}    {}\n",
        stats.lastweek_date, stats.lastweek
    ));
    out.push_str(&format!("    Ratio: {}\n", fmt_opt(stats.ratio_rounded(), 2, "")));
    out.push_str(&format!(
        "    Weekly increase: {}\n",
        fmt_opt(stats.weekly_increase_pct(), 1, "%")
    ));
    out.push_str(&format!(
        "    Daily increase: {}\n",
        fmt_opt(stats.daily_change_pct(), 1, "% per day")
    ));
    out.push_str(&format!(
        "    Doubling time (at current rate): {}\n",
        fmt_opt(stats.doubling_time_days(), 1, " days")
    ));

    out
}

/// Format a built-in model's record: formula, parameters, R² and forecast.
pub fn format_curve_record(
    name: &str,
    formula: &str,
    params: &[(&str, String)],
    r2: Option<f64>,
    forecast: &[(NaiveDate, f64)],
) -> String {
    let mut out = String::new();

    out.push_str(&format!("\n{name} model: {formula}\n"));
    for (symbol, value) in params {
        out.push_str(&format!("    {symbol} = {value}\n"));
    }
    out.push_str(&format!("    R2 = {}\n", fmt_opt(r2, 4, "")));
    if !forecast.is_empty() {
        out.push_str("    Forecast:\n");
        for (date, value) in forecast {
            out.push_str(&format!("        {date}    {value:.0}\n"));
        }
    }

    out
}

/// Record that replaces a model's text when its fit failed.
pub fn format_failure_note(name: &str, reason: &str) -> String {
    format!("\nModel '{name}' failed: {reason}\n")
}

/// Final summary line naming the winning model. The score is printed in full
/// so a small positive winner never reads as zero.
pub fn format_best_model(best: &BestModel) -> String {
    format!("\nBest model: {} (R2 = {})\n", best.label, best.score)
}

fn fmt_opt(value: Option<f64>, decimals: usize, suffix: &str) -> String {
    match value {
        Some(v) => format!("{v:.decimals$}{suffix}"),
        None => NOT_APPLICABLE.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn d(day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2020, 3, day).unwrap()
    }

    #[test]
    fn growth_section_golden() {
        let stats = GrowthStats {
            entity: "Spain".to_string(),
            current_date: d(8),
            current: 100,
            lastweek_date: d(1),
            lastweek: 12,
            ratio: Some(100.0 / 12.0),
        };
        let expected = concat!(
            "Results for *Spain*\n",
            "** Based on the last week of data **\n",
            "    Confirmed cases on 2020-03-08    100\n",
            "    Confirmed cases on 2020-03-01    12\n",
            "    Ratio: 8.33\n",
            "    Weekly increase: 733.3%\n",
            "    Daily increase: 35.4% per day\n",
            "    Doubling time (at current rate): 2.3 days\n",
        );
        assert_eq!(format_growth_section(&stats), expected);
    }

    #[test]
    fn undefined_figures_print_not_applicable() {
        let stats = GrowthStats {
            entity: "X".to_string(),
            current_date: d(8),
            current: 5,
            lastweek_date: d(1),
            lastweek: 0,
            ratio: None,
        };
        let text = format_growth_section(&stats);
        assert!(text.contains("Ratio: n/a\n"));
        assert!(text.contains("Doubling time (at current rate): n/a\n"));
        assert!(!text.contains("inf"));
    }

    #[test]
    fn curve_record_golden() {
        let params = [("a", "1.00".to_string()), ("b", "2.00 cases/day".to_string())];
        let text = format_curve_record("Linear", "y = a + b*t", &params, Some(0.98766), &[(d(9), 19.4)]);
        let expected = concat!(
            "\nLinear model: y = a + b*t\n",
            "    a = 1.00\n",
            "    b = 2.00 cases/day\n",
            "    R2 = 0.9877\n",
            "    Forecast:\n",
            "        2020-03-09    19\n",
        );
        assert_eq!(text, expected);
    }

    #[test]
    fn best_model_line() {
        let best = BestModel {
            name: "logistic".to_string(),
            label: "Logistic".to_string(),
            score: 0.99871,
        };
        assert_eq!(format_best_model(&best), "\nBest model: Logistic (R2 = 0.99871)\n");
    }

    #[test]
    fn tiny_winning_score_is_not_shown_as_zero() {
        let best = BestModel {
            name: "linear".to_string(),
            label: "Linear".to_string(),
            score: 0.00004,
        };
        assert_eq!(format_best_model(&best), "\nBest model: Linear (R2 = 0.00004)\n");
    }
}
