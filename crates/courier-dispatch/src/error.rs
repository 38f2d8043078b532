//! Dispatch-subsystem error type.

use thiserror::Error;

use courier_core::ConfigError;

/// Errors produced by `courier-dispatch`.
///
/// These cover batch setup and request loading.  Per-courier computation
/// problems are never errors at this level — they surface as
/// [`TourOutcome`](crate::TourOutcome) variants so one courier cannot abort
/// a batch.
#[derive(Debug, Error)]
pub enum DispatchError {
    #[error("invalid tour configuration: {0}")]
    Config(#[from] ConfigError),

    #[error("failed to build worker pool: {0}")]
    ThreadPool(String),

    #[error("request parse error: {0}")]
    Parse(String),

    #[error("unknown intersection id {0} in delivery request")]
    UnknownIntersection(u64),

    #[error("no road node near ({lat}, {lon})")]
    NoNearbyIntersection { lat: f32, lon: f32 },

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

pub type DispatchResult<T> = Result<T, DispatchError>;
