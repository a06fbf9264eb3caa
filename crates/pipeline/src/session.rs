//! Observable creation-session state.

use serde::Serialize;
use tokio::sync::watch;
use uuid::Uuid;

use crate::voices;

/// Stage of one user attempt to produce a talking-photo video.
///
/// `Complete` and `Error` are terminal for the session; a reset (which
/// replaces the session wholesale) is required to start another attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum Stage {
    Idle,
    GeneratingVoice,
    GeneratingVideo,
    Complete,
    Error,
}

/// One end-to-end attempt. Owned exclusively by the orchestrator; observers
/// only ever see whole-struct snapshots.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CreationSession {
    /// Identity token; a stale in-flight update whose session id no longer
    /// matches the live session is discarded (see [`SessionStore::update_if`]).
    pub id: Uuid,
    pub image_base64: Option<String>,
    pub script: String,
    pub voice_id: String,
    pub audio_url: Option<String>,
    pub video_url: Option<String>,
    pub stage: Stage,
    pub last_error: Option<String>,
    pub progress_percent: u8,
    pub status_message: String,
}

impl Default for CreationSession {
    fn default() -> Self {
        Self {
            id: Uuid::new_v4(),
            image_base64: None,
            script: String::new(),
            voice_id: voices::DEFAULT_VOICE_ID.to_string(),
            audio_url: None,
            video_url: None,
            stage: Stage::Idle,
            last_error: None,
            progress_percent: 0,
            status_message: String::new(),
        }
    }
}

impl CreationSession {
    pub fn is_processing(&self) -> bool {
        matches!(self.stage, Stage::GeneratingVoice | Stage::GeneratingVideo)
    }
}

/// Watch-channel holder of the live session. Every write publishes one
/// complete snapshot, so no observer ever sees a partially updated (or
/// partially reset) session.
pub struct SessionStore {
    tx: watch::Sender<CreationSession>,
}

impl SessionStore {
    pub fn new() -> Self {
        let (tx, _) = watch::channel(CreationSession::default());
        Self { tx }
    }

    pub fn subscribe(&self) -> watch::Receiver<CreationSession> {
        self.tx.subscribe()
    }

    pub fn snapshot(&self) -> CreationSession {
        self.tx.borrow().clone()
    }

    pub fn set_image(&self, image_base64: String) {
        self.tx.send_modify(|s| {
            s.image_base64 = Some(image_base64);
            s.last_error = None;
        });
    }

    pub fn set_script(&self, script: String) {
        self.tx.send_modify(|s| s.script = script);
    }

    pub fn set_voice(&self, voice_id: String) {
        self.tx.send_modify(|s| s.voice_id = voice_id);
    }

    /// Replace the whole session with a fresh one in a single update.
    pub fn reset(&self) {
        self.tx.send_replace(CreationSession::default());
    }

    /// Apply `f` only while the live session is still `session_id`. Returns
    /// whether the update was applied.
    pub(crate) fn update_if(
        &self,
        session_id: Uuid,
        f: impl FnOnce(&mut CreationSession),
    ) -> bool {
        let mut applied = false;
        self.tx.send_if_modified(|s| {
            if s.id == session_id {
                f(s);
                applied = true;
            }
            applied
        });
        applied
    }
}

impl Default for SessionStore {
    fn default() -> Self {
        Self::new()
    }
}
