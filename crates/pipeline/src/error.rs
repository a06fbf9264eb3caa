use thiserror::Error;

use crate::job::VideoJobState;

/// Everything that can end a generation attempt.
///
/// None of these are retried by the core; retry is always a new
/// user-initiated session. `Canceled` is internal: it is produced when the
/// owning session is reset mid-flight and is never surfaced to the UI.
#[derive(Debug, Error)]
pub enum GenerationError {
    /// Caught before any remote call; reported synchronously to the caller.
    #[error("{0}")]
    Validation(String),

    /// A remote call returned a failure. `status` carries the HTTP status
    /// code when one was received.
    #[error("remote call failed: {message}")]
    Remote {
        status: Option<u16>,
        message: String,
    },

    /// The poll attempt bound was exhausted without a terminal status.
    #[error("generation timed out after {attempts} status checks")]
    Timeout { attempts: u32 },

    /// The provider itself reported `failed` or `canceled`.
    #[error("video provider reported {state}")]
    Provider {
        state: VideoJobState,
        message: Option<String>,
    },

    /// The owning session was reset while the attempt was in flight.
    #[error("generation canceled")]
    Canceled,
}

impl GenerationError {
    /// The string shown to the user. Original provider messages are kept for
    /// terminal provider failures; everything else gets a generic actionable
    /// message (the raw error is logged where it occurs).
    pub fn user_message(&self) -> String {
        match self {
            Self::Validation(message) => message.clone(),
            Self::Remote { .. } => {
                "Something went wrong. Please try again.".to_string()
            }
            Self::Timeout { .. } => {
                "Generation is taking too long. Please try again.".to_string()
            }
            Self::Provider { state, message } => message
                .as_deref()
                .filter(|m| !m.is_empty())
                .map(str::to_string)
                .unwrap_or_else(|| crate::progress::message_for(*state, None)),
            Self::Canceled => "Generation canceled".to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn provider_failure_uses_provider_message() {
        let err = GenerationError::Provider {
            state: VideoJobState::Failed,
            message: Some("OOM".to_string()),
        };
        assert_eq!(err.user_message(), "OOM");
    }

    #[test]
    fn provider_failure_falls_back_to_generic_message() {
        let failed = GenerationError::Provider {
            state: VideoJobState::Failed,
            message: None,
        };
        assert_eq!(failed.user_message(), "Generation failed");

        let canceled = GenerationError::Provider {
            state: VideoJobState::Canceled,
            message: None,
        };
        assert_eq!(canceled.user_message(), "Generation canceled");
    }

    #[test]
    fn timeout_has_its_own_message() {
        let err = GenerationError::Timeout { attempts: 90 };
        assert_eq!(
            err.user_message(),
            "Generation is taking too long. Please try again."
        );
    }
}
