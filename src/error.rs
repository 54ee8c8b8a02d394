use thiserror::Error;

/// Rejected user input. The calculations themselves never fail; these are
/// raised by the HTTP and CLI layers before anything is computed.
#[derive(Debug, Error, PartialEq)]
pub enum InputError {
    #[error("{field} is required")]
    Missing { field: &'static str },

    #[error("{field} must be a finite number")]
    NotFinite { field: &'static str },

    #[error("{field} must be >= 0")]
    Negative { field: &'static str },

    #[error("termMonths must be > 0")]
    ZeroTerm,

    #[error("unknown {kind} '{value}'")]
    Unknown { kind: &'static str, value: String },

    /// The request body or query string could not be decoded at all.
    #[error("{0}")]
    Malformed(String),
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse {path}: {source}")]
    Parse {
        path: String,
        #[source]
        source: toml::de::Error,
    },

    #[error("invalid configuration: {0}")]
    Invalid(String),
}

pub fn require<T>(field: &'static str, value: Option<T>) -> Result<T, InputError> {
    value.ok_or(InputError::Missing { field })
}

pub fn quantity(field: &'static str, value: f64) -> Result<f64, InputError> {
    if !value.is_finite() {
        return Err(InputError::NotFinite { field });
    }
    if value < 0.0 {
        return Err(InputError::Negative { field });
    }
    Ok(value)
}
