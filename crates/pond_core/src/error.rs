use thiserror::Error;

/// Errors raised while building a simulation.
///
/// Per-frame updates never fail; empty populations simply skip their effect.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum PondError {
    #[error("config value '{field}' must be positive and finite (got {value})")]
    NonPositive { field: &'static str, value: f32 },

    #[error("config range '{field}' is inverted: min {min} > max {max}")]
    InvertedRange {
        field: &'static str,
        min: f32,
        max: f32,
    },

    #[error("config value '{field}' must lie in [0, 1] (got {value})")]
    OutOfUnitRange { field: &'static str, value: f32 },

    #[error("config count '{field}' of {count} exceeds the limit of {limit}")]
    TooMany {
        field: &'static str,
        count: usize,
        limit: usize,
    },
}
