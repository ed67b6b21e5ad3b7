//! Parser Configuration
//!
//! Every knob of the pipeline is a plain value with a default; the TOML
//! load/save layer exists for the CLI's convenience only.

use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::schedule::cell::default_special_tokens;
use crate::schedule::{HeaderConfig, MatchMode};
use crate::table::DEFAULT_EPS;

/// Pipeline settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ParserConfig {
    /// Row clustering tolerance in position units
    pub row_eps: f32,
    /// Column clustering tolerance in position units
    pub col_eps: f32,
    /// Fallback year for day-only date tokens
    pub base_year: i32,
    /// Fallback month for day-only date tokens
    pub base_month: u32,
    /// Column holding staff names
    pub name_col: usize,
    /// Timezone label stamped on serialized events
    pub time_zone: String,
    /// Tokens marking a special-duty cell
    pub special_duty_tokens: Vec<String>,
    /// Header row layout and keywords
    pub header: HeaderConfig,
    /// Staff-name match strictness
    pub match_mode: MatchMode,
}

impl Default for ParserConfig {
    fn default() -> Self {
        Self {
            row_eps: DEFAULT_EPS,
            col_eps: DEFAULT_EPS,
            base_year: 2025,
            base_month: 1,
            name_col: 0,
            time_zone: crate::schedule::DEFAULT_TIME_ZONE.to_string(),
            special_duty_tokens: default_special_tokens(),
            header: HeaderConfig::default(),
            match_mode: MatchMode::default(),
        }
    }
}

/// Load configuration from file
pub fn load_config(path: &Path) -> Result<ParserConfig> {
    let content = std::fs::read_to_string(path)?;
    let config: ParserConfig = toml::from_str(&content)?;
    Ok(config)
}

/// Save configuration to file
pub fn save_config(config: &ParserConfig, path: &Path) -> Result<()> {
    let content = toml::to_string_pretty(config)?;
    std::fs::write(path, content)?;
    Ok(())
}
