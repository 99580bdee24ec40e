use std::fmt;

use thiserror::Error;

/// The provider call a failure was detected in.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    ListDistributions,
    GetDistributionConfig,
    UpdateDistribution,
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Stage::ListDistributions => write!(f, "listing distributions"),
            Stage::GetDistributionConfig => write!(f, "getting distribution config"),
            Stage::UpdateDistribution => write!(f, "updating distribution"),
        }
    }
}

/// Display carries only the message; `report_line` adds the user-facing prefix.
#[derive(Debug, Error)]
pub enum CertUpdateError {
    #[error("{0} environment variable not set")]
    MissingEnv(&'static str),
    #[error("{0} environment variable is not valid UTF-8")]
    InvalidEnv(&'static str),
    #[error("verifying AWS account: {0}")]
    AccountCheck(String),
    #[error("Could not find distribution with comment '{0}'")]
    DistributionNotFound(String),
    #[error("{stage}: {detail}")]
    Provider { stage: Stage, detail: String },
    #[error(transparent)]
    Io(#[from] std::io::Error),
    #[error(transparent)]
    Json(#[from] serde_json::Error),
}

impl CertUpdateError {
    pub fn provider(stage: Stage, err: anyhow::Error) -> Self {
        CertUpdateError::Provider {
            stage,
            detail: format!("{err:#}"),
        }
    }

    /// The single line printed to stdout before exiting with status 1.
    pub fn report_line(&self) -> String {
        match self {
            CertUpdateError::Provider { .. } | CertUpdateError::AccountCheck(_) => format!("❌ Error {self}"),
            _ => format!("❌ Error: {self}"),
        }
    }

    #[cfg(test)]
    pub(crate) fn stage(&self) -> Option<Stage> {
        match self {
            CertUpdateError::Provider { stage, .. } => Some(*stage),
            _ => None,
        }
    }
}
