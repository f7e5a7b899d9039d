use thiserror::Error;

/// Misuse of an injected dependency (random source or scheduler).
///
/// Expected edge cases such as duplicate names or a second `start` are not
/// errors; they come back as `CommandOutcome::Ignored`. A `ContractViolation`
/// means a collaborator broke its contract and the command could not finish.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ContractViolation {
    #[error("Random source produced no value")]
    RandomSourceExhausted,

    #[error("Random source produced {value}, expected a value in [0, 1)")]
    RandomOutOfRange { value: f64 },

    #[error("Scheduler rejected timer: {reason}")]
    SchedulerRejected { reason: String },

    #[error("Outcome selection needs at least 2 participants, found {found}")]
    InsufficientRoster { found: usize },
}

impl ContractViolation {
    /// Violations raised by the random source rather than the scheduler.
    pub fn is_random_source(&self) -> bool {
        matches!(
            self,
            ContractViolation::RandomSourceExhausted | ContractViolation::RandomOutOfRange { .. }
        )
    }
}

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Parse error: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("Invalid config: {0}")]
    Invalid(String),
}

/// Failures surfaced through the JSON API as the `error` string.
#[derive(Error, Debug)]
pub enum ApiError {
    #[error("Invalid request format: {0}")]
    InvalidRequest(#[from] serde_json::Error),

    #[error("Contract violation: {0}")]
    Contract(#[from] ContractViolation),

    #[error("Config rejected: {0}")]
    Config(#[from] ConfigError),
}

pub type Result<T> = std::result::Result<T, ContractViolation>;
