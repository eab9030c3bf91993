use std::fmt;

/// All configuration-time failures (§7): reported in full, before any
/// transport is opened.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    InvalidSpec(String),
    InvalidName(String),
    DuplicateName(String),
    InvalidOption { key: String, value: String },
    InvalidFilter(String),
    UnresolvedMuxEndpoint { mux: String, key: String },
    IdenticalSrcDst(String),
    UnusedStream(String),
    UnknownScheme(String),
    MissingStreams,
    MissingMuxes,
    InvalidApiSpec(String),
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::InvalidSpec(s) => write!(f, "invalid spec '{s}'"),
            ConfigError::InvalidName(s) => write!(
                f,
                "invalid name '{s}' (expected ^[a-zA-Z][a-zA-Z0-9_]{{0,9}}$)"
            ),
            ConfigError::DuplicateName(s) => write!(f, "duplicate name '{s}'"),
            ConfigError::InvalidOption { key, value } => {
                write!(f, "invalid value '{value}' for option '{key}'")
            }
            ConfigError::InvalidFilter(s) => write!(f, "invalid filter spec '{s}'"),
            ConfigError::UnresolvedMuxEndpoint { mux, key } => {
                write!(f, "mux '{mux}' references unknown stream '{key}'")
            }
            ConfigError::IdenticalSrcDst(s) => {
                write!(f, "mux '{s}' has identical src and dst")
            }
            ConfigError::UnusedStream(s) => {
                write!(f, "stream '{s}' is not referenced by any mux")
            }
            ConfigError::UnknownScheme(s) => write!(f, "unknown transport scheme '{s}'"),
            ConfigError::MissingStreams => write!(f, "at least one -s stream spec is required"),
            ConfigError::MissingMuxes => write!(f, "at least one -m mux spec is required"),
            ConfigError::InvalidApiSpec(s) => write!(f, "invalid api spec '{s}'"),
        }
    }
}

impl std::error::Error for ConfigError {}

/// `^[a-zA-Z][a-zA-Z0-9_]{0,9}$`, hand-checked rather than pulling in a
/// regex engine for one fixed-shape rule.
pub fn is_valid_name(name: &str) -> bool {
    let mut chars = name.chars();
    let Some(first) = chars.next() else { return false };
    if !first.is_ascii_alphabetic() {
        return false;
    }
    let rest: Vec<char> = chars.collect();
    if rest.len() > 9 {
        return false;
    }
    rest.iter().all(|c| c.is_ascii_alphanumeric() || *c == '_')
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn valid_names() {
        assert!(is_valid_name("a"));
        assert!(is_valid_name("Stream_1"));
        assert!(is_valid_name("mux1"));
    }

    #[test]
    fn invalid_names() {
        assert!(!is_valid_name(""));
        assert!(!is_valid_name("1abc"));
        assert!(!is_valid_name("toolongname1"));
        assert!(!is_valid_name("has-dash"));
    }
}
