//! JHU CSSE time-series CSV ingest.
//!
//! The global confirmed-cases file is "wide": one row per province/country and
//! one column per day.
//!
//! ```text
//! Province/State,Country/Region,Lat,Long,1/22/20,1/23/20,...
//! ,Spain,40.0,-4.0,0,0,...
//! Hubei,China,30.9,112.2,444,444,...
//! ```
//!
//! A country's series is the per-day sum of all its rows. Rows that fail to parse
//! are skipped with a warning rather than aborting the whole table.

use std::collections::BTreeSet;
use std::fs::File;
use std::io::Read;
use std::path::Path;

use chrono::NaiveDate;
use csv::StringRecord;
use reqwest::blocking::Client;

use crate::data::SeriesProvider;
use crate::domain::Series;
use crate::error::AppError;

pub const DEFAULT_JHU_URL: &str = "https://raw.githubusercontent.com/CSSEGISandData/COVID-19/master/csse_covid_19_data/csse_covid_19_time_series/time_series_covid19_confirmed_global.csv";

const DATE_FORMAT: &str = "%m/%d/%y";
const COUNTRY_COLUMN: usize = 1;
const FIRST_DATE_COLUMN: usize = 4;

#[derive(Debug, Clone)]
struct JhuRow {
    country: String,
    counts: Vec<f64>,
}

/// A parsed JHU table held in memory.
#[derive(Debug, Clone)]
pub struct JhuTable {
    dates: Vec<NaiveDate>,
    rows: Vec<JhuRow>,
}

impl JhuTable {
    /// Parse a JHU-formatted CSV.
    pub fn parse<R: Read>(reader: R) -> Result<Self, AppError> {
        let mut reader = csv::ReaderBuilder::new()
            .flexible(true)
            .trim(csv::Trim::All)
            .from_reader(reader);

        let headers = reader
            .headers()
            .map_err(|e| AppError::runtime(format!("Failed to read CSV headers: {e}")))?
            .clone();
        let dates = parse_date_headers(&headers)?;

        let mut rows = Vec::new();
        for (idx, result) in reader.records().enumerate() {
            // +2: 1-based lines, plus the header line.
            let line = idx + 2;
            let record = match result {
                Ok(r) => r,
                Err(e) => {
                    tracing::warn!(line, error = %e, "skipping unparsable CSV row");
                    continue;
                }
            };
            match parse_row(&record, dates.len()) {
                Ok(row) => rows.push(row),
                Err(message) => tracing::warn!(line, %message, "skipping CSV row"),
            }
        }

        tracing::debug!(rows = rows.len(), days = dates.len(), "parsed JHU table");
        Ok(Self { dates, rows })
    }

    /// Read a JHU CSV from disk.
    pub fn from_path(path: &Path) -> Result<Self, AppError> {
        let file = File::open(path)
            .map_err(|e| AppError::usage(format!("Failed to open CSV '{}': {e}", path.display())))?;
        Self::parse(file)
    }

    /// Download a JHU CSV.
    pub fn fetch(url: &str) -> Result<Self, AppError> {
        tracing::info!(url, "downloading case data");
        let resp = Client::new()
            .get(url)
            .send()
            .map_err(|e| AppError::runtime(format!("Download failed: {e}")))?;

        if !resp.status().is_success() {
            return Err(AppError::runtime(format!(
                "Download failed with status {}.",
                resp.status()
            )));
        }

        let body = resp
            .text()
            .map_err(|e| AppError::runtime(format!("Failed to read download body: {e}")))?;
        Self::parse(body.as_bytes())
    }
}

impl SeriesProvider for JhuTable {
    fn get(&self, entity: &str) -> Result<Series, AppError> {
        let mut totals = vec![0.0; self.dates.len()];
        let mut matched = 0usize;

        for row in self.rows.iter().filter(|r| r.country.eq_ignore_ascii_case(entity)) {
            matched += 1;
            for (total, count) in totals.iter_mut().zip(&row.counts) {
                *total += count;
            }
        }

        if matched == 0 {
            return Err(AppError::data(format!(
                "Unknown country '{entity}'. Run `modeler countries` to list known names."
            )));
        }

        tracing::debug!(entity, rows = matched, "aggregated country rows");
        Series::from_counts(self.dates.clone(), totals)
    }

    fn entities(&self) -> Result<Vec<String>, AppError> {
        let names: BTreeSet<&str> = self.rows.iter().map(|r| r.country.as_str()).collect();
        Ok(names.into_iter().map(str::to_string).collect())
    }
}

fn parse_date_headers(headers: &StringRecord) -> Result<Vec<NaiveDate>, AppError> {
    if headers.len() <= FIRST_DATE_COLUMN {
        return Err(AppError::runtime(
            "CSV has no date columns (expected Province/State,Country/Region,Lat,Long,<dates>...).",
        ));
    }

    let dates = headers
        .iter()
        .skip(FIRST_DATE_COLUMN)
        .map(|h| {
            NaiveDate::parse_from_str(h, DATE_FORMAT)
                .map_err(|e| AppError::runtime(format!("Invalid date column '{h}': {e}")))
        })
        .collect::<Result<Vec<_>, _>>()?;

    if dates.windows(2).any(|w| w[1] <= w[0]) {
        return Err(AppError::runtime("CSV date columns are not strictly ascending."));
    }
    Ok(dates)
}

fn parse_row(record: &StringRecord, n_dates: usize) -> Result<JhuRow, String> {
    let country = record
        .get(COUNTRY_COLUMN)
        .filter(|c| !c.is_empty())
        .ok_or("missing Country/Region")?
        .to_string();

    let counts = (0..n_dates)
        .map(|i| {
            let raw = record.get(FIRST_DATE_COLUMN + i).unwrap_or("");
            raw.parse::<f64>()
                .ok()
                .filter(|v| v.is_finite())
                .ok_or_else(|| format!("invalid count '{raw}' in date column {}", i + 1))
        })
        .collect::<Result<Vec<_>, _>>()?;

    Ok(JhuRow { country, counts })
}
