use thiserror::Error;

pub type EngineResult<T> = Result<T, EngineError>;

/// Fatal engine conditions.
///
/// Bad data is never an `EngineError`: width mismatches and unparseable cells
/// are [`Diagnostic`](crate::Diagnostic)s. These variants mean the run could
/// not start, or that the engine itself misbehaved.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum EngineError {
    #[error("No rows to validate")]
    EmptyTable,

    #[error("Partition plan covers {covered} rows but the table has {table_len}")]
    PlanMismatch { covered: usize, table_len: usize },

    #[error("Validation worker for partition {partition} failed: {message}")]
    WorkerPanicked { partition: usize, message: String },

    #[error("Could not start worker for partition {partition}: {message}")]
    WorkerSpawn { partition: usize, message: String },

    #[error("Configuration error: {0}")]
    InvalidConfig(String),
}
