//! Error types and result alias for the crate.
//!
//! This module defines [`enum@crate::error::Error`] and the crate-wide [Result] alias.
//! Variants cover invalid parameters, loop closure failures, proximity exhaustion under
//! the strict policy, curve construction preconditions, mesh buffer limits, and generic
//! errors.
use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

#[non_exhaustive]
#[derive(Debug, Error)]
pub enum Error {
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("loop did not close after {attempts} attempts")]
    ClosureFailed { attempts: usize },

    #[error("no non-colliding candidate for point {index} after {attempts} attempts")]
    ProximityExhausted { index: usize, attempts: usize },

    #[error("closed curve needs at least {required} control points, found {found}")]
    TooFewControlPoints { found: usize, required: usize },

    #[error("mesh with {vertices} vertices exceeds the u32 index range")]
    IndexOverflow { vertices: usize },

    #[error("{0}")]
    Other(String),
}

impl Error {
    /// Returns `true` for failures a caller may retry with another seed or relaxed parameters.
    pub fn is_recoverable(&self) -> bool {
        matches!(
            self,
            Error::ClosureFailed { .. } | Error::ProximityExhausted { .. }
        )
    }
}

impl From<String> for Error {
    fn from(value: String) -> Self {
        Error::Other(value)
    }
}

impl From<&str> for Error {
    fn from(value: &str) -> Self {
        Error::Other(value.to_owned())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn from_string_uses_other_variant() {
        let err: Error = String::from("boom").into();
        matches!(err, Error::Other(_))
            .then_some(())
            .expect("expected Other variant");
    }

    #[test]
    fn from_str_allocates_owned_message() {
        let err: Error = "issue".into();
        assert!(matches!(err, Error::Other(ref msg) if msg == "issue"));
    }

    #[test]
    fn closure_and_proximity_failures_are_recoverable() {
        assert!(Error::ClosureFailed { attempts: 3 }.is_recoverable());
        assert!(Error::ProximityExhausted {
            index: 4,
            attempts: 10
        }
        .is_recoverable());
        assert!(!Error::InvalidConfig("width".into()).is_recoverable());
        assert!(!Error::TooFewControlPoints {
            found: 2,
            required: 4
        }
        .is_recoverable());
    }

    #[test]
    fn display_mentions_counts() {
        let msg = Error::TooFewControlPoints {
            found: 3,
            required: 4,
        }
        .to_string();
        assert!(msg.contains('3') && msg.contains('4'));
    }
}
