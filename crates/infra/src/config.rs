//! Environment-driven configuration.

use packtrace_observability::LogFormat;
use thiserror::Error;

pub const BOM_SOURCE_VAR: &str = "PACKTRACE_BOM_SOURCE";
pub const PACK_SOURCE_VAR: &str = "PACKTRACE_PACK_SOURCE";
pub const LOG_FORMAT_VAR: &str = "PACKTRACE_LOG_FORMAT";
pub const DATABASE_URL_VAR: &str = "DATABASE_URL";

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ConfigError {
    #[error("{var}: expected a boolean, got '{value}'")]
    InvalidBool { var: &'static str, value: String },

    #[error("{var}: {reason}")]
    InvalidValue { var: &'static str, reason: String },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PackTraceConfig {
    /// Wire the bill-of-materials collaborator into the resolver.
    pub bom_source: bool,
    /// Wire the external pack collaborator into the resolver.
    pub pack_source: bool,
    pub log_format: LogFormat,
    /// Postgres audit table location; `None` keeps the audit table in memory.
    pub database_url: Option<String>,
}

impl Default for PackTraceConfig {
    fn default() -> Self {
        Self {
            bom_source: true,
            pack_source: true,
            log_format: LogFormat::Json,
            database_url: None,
        }
    }
}

impl PackTraceConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|var| std::env::var(var).ok())
    }

    /// Build from an arbitrary variable lookup. Blank values count as unset.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let get = |var: &str| lookup(var).map(|v| v.trim().to_string()).filter(|v| !v.is_empty());
        let defaults = Self::default();

        let bom_source = match get(BOM_SOURCE_VAR) {
            Some(v) => parse_bool(BOM_SOURCE_VAR, &v)?,
            None => defaults.bom_source,
        };
        let pack_source = match get(PACK_SOURCE_VAR) {
            Some(v) => parse_bool(PACK_SOURCE_VAR, &v)?,
            None => defaults.pack_source,
        };
        let log_format = match get(LOG_FORMAT_VAR) {
            Some(v) => v.parse::<LogFormat>().map_err(|reason| ConfigError::InvalidValue {
                var: LOG_FORMAT_VAR,
                reason,
            })?,
            None => defaults.log_format,
        };

        Ok(Self {
            bom_source,
            pack_source,
            log_format,
            database_url: get(DATABASE_URL_VAR),
        })
    }
}

fn parse_bool(var: &'static str, value: &str) -> Result<bool, ConfigError> {
    match value.to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" => Ok(false),
        _ => Err(ConfigError::InvalidBool {
            var,
            value: value.to_string(),
        }),
    }
}
