//! Case-series sources.
//!
//! - `jhu`: the JHU CSSE global time-series CSV (download or local file)
//! - `sample`: deterministic synthetic outbreaks for offline use and demos

use std::path::PathBuf;

use crate::domain::{Series, SourceConfig, SourceKind};
use crate::error::AppError;

pub mod jhu;
pub mod sample;

pub use jhu::{DEFAULT_JHU_URL, JhuTable};
pub use sample::SampleProvider;

/// Environment variable overriding the JHU download URL.
pub const ENV_DATA_URL: &str = "MODELER_DATA_URL";
/// Environment variable with the default CSV path for `--source file`.
pub const ENV_DATA_FILE: &str = "MODELER_DATA_FILE";

/// Supplies the time series for a named entity.
pub trait SeriesProvider {
    /// Date-ascending series for `entity`.
    fn get(&self, entity: &str) -> Result<Series, AppError>;

    /// Entity names this provider knows, sorted.
    fn entities(&self) -> Result<Vec<String>, AppError>;
}

/// Build the provider selected by `config`, loading `.env` for defaults.
pub fn provider_from_config(config: &SourceConfig) -> Result<Box<dyn SeriesProvider>, AppError> {
    dotenvy::dotenv().ok();

    match config.kind {
        SourceKind::Jhu => {
            let url = config
                .url
                .clone()
                .or_else(|| std::env::var(ENV_DATA_URL).ok())
                .unwrap_or_else(|| DEFAULT_JHU_URL.to_string());
            Ok(Box::new(JhuTable::fetch(&url)?))
        }
        SourceKind::File => {
            let path = config
                .file
                .clone()
                .or_else(|| std::env::var(ENV_DATA_FILE).ok().map(PathBuf::from))
                .ok_or_else(|| {
                    AppError::usage(format!("`--source file` needs --file <CSV> or {ENV_DATA_FILE} in the environment."))
                })?;
            Ok(Box::new(JhuTable::from_path(&path)?))
        }
        SourceKind::Sample => Ok(Box::new(SampleProvider::new(config.seed))),
    }
}
