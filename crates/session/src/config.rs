use std::time::Duration;

use rehearsal_analysis::config::{parse_secs, ConfigError};

use crate::state::WorkflowVariant;

/// Default upper bound on one submission cycle (upload plus feedback).
pub const DEFAULT_SUBMISSION_TIMEOUT_SECS: u64 = 300;

/// Per-session controller settings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionConfig {
    pub variant: WorkflowVariant,
    /// A cycle still running after this long ends in `Failed(Timeout)`.
    pub submission_timeout: Duration,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            variant: WorkflowVariant::Feedback,
            submission_timeout: Duration::from_secs(DEFAULT_SUBMISSION_TIMEOUT_SECS),
        }
    }
}

impl SessionConfig {
    /// Load configuration from environment variables with defaults.
    ///
    /// | Env Var                   | Default    |
    /// |---------------------------|------------|
    /// | `REHEARSAL_WORKFLOW`      | `feedback` |
    /// | `SUBMISSION_TIMEOUT_SECS` | `300`      |
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|var| std::env::var(var).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let variant = match lookup("REHEARSAL_WORKFLOW") {
            Some(raw) => raw.parse().map_err(|_| ConfigError::Invalid {
                var: "REHEARSAL_WORKFLOW",
                value: raw.clone(),
            })?,
            None => WorkflowVariant::default(),
        };

        let submission_timeout = match lookup("SUBMISSION_TIMEOUT_SECS") {
            Some(raw) => Duration::from_secs(parse_secs("SUBMISSION_TIMEOUT_SECS", &raw)?),
            None => Duration::from_secs(DEFAULT_SUBMISSION_TIMEOUT_SECS),
        };

        Ok(Self {
            variant,
            submission_timeout,
        })
    }

    pub fn with_variant(mut self, variant: WorkflowVariant) -> Self {
        self.variant = variant;
        self
    }

    pub fn with_submission_timeout(mut self, timeout: Duration) -> Self {
        self.submission_timeout = timeout;
        self
    }
}
