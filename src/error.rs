//! Error type shared by the simulation core and its render targets.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    /// A body was built with a mass that is zero, negative or not finite.
    #[error("invalid body mass {mass}: mass must be finite and greater than zero")]
    InvalidMass { mass: f64 },

    /// The host asked for a negative number of bodies.
    #[error("body count must be non-negative, got {0}")]
    NegativeBodyCount(i64),

    #[error("invalid simulation config: {0}")]
    InvalidConfig(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl Error {
    pub fn config(message: impl Into<String>) -> Self {
        Error::InvalidConfig(message.into())
    }
}

pub type Result<T> = std::result::Result<T, Error>;

/// Validates a host-supplied body count. Negative counts are rejected, never clamped.
pub fn body_count(requested: i64) -> Result<usize> {
    usize::try_from(requested).map_err(|_| Error::NegativeBodyCount(requested))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn negative_count_is_rejected() {
        match body_count(-3) {
            Err(Error::NegativeBodyCount(n)) => assert_eq!(n, -3),
            other => panic!("expected NegativeBodyCount, got {:?}", other),
        }
    }

    #[test]
    fn zero_and_positive_counts_pass_through() {
        assert_eq!(body_count(0).unwrap(), 0);
        assert_eq!(body_count(15).unwrap(), 15);
    }

    #[test]
    fn messages_are_descriptive() {
        let msg = Error::InvalidMass { mass: -1.0 }.to_string();
        assert!(msg.contains("-1"));
        assert!(Error::NegativeBodyCount(-2).to_string().contains("-2"));
    }
}
