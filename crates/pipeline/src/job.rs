use serde::{Deserialize, Serialize};

/// Provider-reported lifecycle state of a video-synthesis job. Serialized in
/// the provider's lowercase wire form. No reversal from a terminal state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum VideoJobState {
    Starting,
    Processing,
    Succeeded,
    Failed,
    Canceled,
}

impl VideoJobState {
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Succeeded | Self::Failed | Self::Canceled)
    }
}

impl std::fmt::Display for VideoJobState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Starting => write!(f, "starting"),
            Self::Processing => write!(f, "processing"),
            Self::Succeeded => write!(f, "succeeded"),
            Self::Failed => write!(f, "failed"),
            Self::Canceled => write!(f, "canceled"),
        }
    }
}

/// Snapshot of one in-flight or finished video-synthesis job. Lives only for
/// the duration of a single generation attempt; never persisted.
#[derive(Debug, Clone)]
pub struct GenerationJob {
    /// Opaque id assigned by the video provider at submission time.
    pub job_id: String,
    pub status: VideoJobState,
    /// Locally derived UI signal, not authoritative (see [`crate::progress`]).
    pub progress_percent: u8,
    /// Populated only when `status` is `succeeded`.
    pub result_url: Option<String>,
    /// Populated only when `status` is `failed` or `canceled`.
    pub error_message: Option<String>,
}
