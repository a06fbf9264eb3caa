//! Status-to-progress mapping.
//!
//! A pure function of the provider status. The percentages are a design
//! contract with the UI, not a measurement: the provider exposes no finer
//! progress signal, so the loading overlay moves in coarse, monotonic steps
//! per status.

use crate::job::VideoJobState;

pub fn percent_for(state: VideoJobState) -> u8 {
    match state {
        VideoJobState::Starting => 10,
        VideoJobState::Processing => 50,
        VideoJobState::Succeeded => 100,
        VideoJobState::Failed | VideoJobState::Canceled => 0,
    }
}

pub fn message_for(state: VideoJobState, error: Option<&str>) -> String {
    match state {
        VideoJobState::Starting => "Starting up GPU...".to_string(),
        VideoJobState::Processing => "Generating lip-sync video...".to_string(),
        VideoJobState::Succeeded => "Video ready!".to_string(),
        VideoJobState::Failed => error
            .filter(|e| !e.is_empty())
            .unwrap_or("Generation failed")
            .to_string(),
        VideoJobState::Canceled => "Generation canceled".to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn percent_table() {
        assert_eq!(percent_for(VideoJobState::Starting), 10);
        assert_eq!(percent_for(VideoJobState::Processing), 50);
        assert_eq!(percent_for(VideoJobState::Succeeded), 100);
        assert_eq!(percent_for(VideoJobState::Failed), 0);
        assert_eq!(percent_for(VideoJobState::Canceled), 0);
    }

    #[test]
    fn failed_prefers_provider_message() {
        assert_eq!(message_for(VideoJobState::Failed, Some("OOM")), "OOM");
        assert_eq!(message_for(VideoJobState::Failed, Some("")), "Generation failed");
        assert_eq!(message_for(VideoJobState::Failed, None), "Generation failed");
    }

    #[test]
    fn status_messages() {
        assert_eq!(message_for(VideoJobState::Starting, None), "Starting up GPU...");
        assert_eq!(
            message_for(VideoJobState::Processing, None),
            "Generating lip-sync video..."
        );
        assert_eq!(message_for(VideoJobState::Succeeded, None), "Video ready!");
        assert_eq!(message_for(VideoJobState::Canceled, None), "Generation canceled");
    }
}
