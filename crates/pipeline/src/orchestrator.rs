//! Generation orchestrator: the single state machine the UI observes.
//!
//! Sequences voice synthesis, video-job submission and status polling for one
//! session at a time, and reconciles the outcome into the observable
//! [`CreationSession`]. Collaborators are constructor-injected so the
//! orchestrator carries no hidden static state.

use std::sync::Arc;
use std::sync::Mutex;

use tokio_util::sync::CancellationToken;
use tracing::{error, info, warn};
use uuid::Uuid;

use crate::api::RemoteApi;
use crate::entitlement::Entitlement;
use crate::error::GenerationError;
use crate::gallery::{Gallery, GalleryEntry};
use crate::poll::{poll_until_terminal, PollConfig};
use crate::session::{CreationSession, SessionStore, Stage};

const MAX_SCRIPT_CHARS: usize = 500;

pub struct Orchestrator {
    api: Arc<dyn RemoteApi>,
    entitlement: Arc<dyn Entitlement>,
    gallery: Arc<dyn Gallery>,
    store: SessionStore,
    poll: PollConfig,
    /// Token of the in-flight generation, replaced per attempt. `reset`
    /// cancels it before the session is swapped out.
    cancel: Mutex<CancellationToken>,
}

impl Orchestrator {
    pub fn new(
        api: Arc<dyn RemoteApi>,
        entitlement: Arc<dyn Entitlement>,
        gallery: Arc<dyn Gallery>,
    ) -> Self {
        Self {
            api,
            entitlement,
            gallery,
            store: SessionStore::new(),
            poll: PollConfig::default(),
            cancel: Mutex::new(CancellationToken::new()),
        }
    }

    pub fn with_poll_config(mut self, poll: PollConfig) -> Self {
        self.poll = poll;
        self
    }

    // --- session state, delegated so resets always go through `reset` ---

    pub fn subscribe(&self) -> tokio::sync::watch::Receiver<CreationSession> {
        self.store.subscribe()
    }

    pub fn snapshot(&self) -> CreationSession {
        self.store.snapshot()
    }

    pub fn set_image(&self, image_base64: String) {
        self.store.set_image(image_base64);
    }

    pub fn set_script(&self, script: String) {
        self.store.set_script(script);
    }

    pub fn set_voice(&self, voice_id: String) {
        self.store.set_voice(voice_id);
    }

    /// Stop any in-flight polling, then atomically replace the session.
    pub fn reset(&self) {
        self.cancel.lock().unwrap().cancel();
        self.store.reset();
    }

    /// Fill the session's script from the script provider. Does not enter
    /// the generation state machine; a failure leaves `stage` untouched.
    pub async fn generate_script(&self) -> Result<String, GenerationError> {
        let session = self.store.snapshot();
        let image = session.image_base64.ok_or_else(|| {
            GenerationError::Validation("Please select an image first".to_string())
        })?;

        let script = self.api.generate_script(&image).await?;
        info!(session_id = %session.id, chars = script.len(), "script generated");

        self.store.update_if(session.id, |s| s.script = script.clone());
        Ok(script)
    }

    /// Run one generation attempt to completion.
    ///
    /// Precondition violations are reported synchronously without any state
    /// transition. Otherwise the session moves
    /// `Idle -> GeneratingVoice -> GeneratingVideo -> Complete`, or to
    /// `Error` from either generating stage.
    pub async fn create_video(&self) -> Result<(), GenerationError> {
        let session = self.store.snapshot();
        let session_id = session.id;

        // Preconditions, checked before any remote call.
        let image = session.image_base64.clone().ok_or_else(|| {
            GenerationError::Validation("Please select an image first".to_string())
        })?;
        let script = session.script.trim().to_string();
        if script.is_empty() {
            return Err(GenerationError::Validation(
                "Please enter or generate a script".to_string(),
            ));
        }
        if script.chars().count() > MAX_SCRIPT_CHARS {
            return Err(GenerationError::Validation(format!(
                "Script is too long ({MAX_SCRIPT_CHARS} characters max)"
            )));
        }
        if session.stage != Stage::Idle {
            return Err(GenerationError::Validation(
                "A generation is already in progress; reset to start over".to_string(),
            ));
        }
        if !self.entitlement.can_create_video().await {
            self.entitlement.show_paywall();
            return Err(GenerationError::Validation(
                "Free video limit reached".to_string(),
            ));
        }

        let cancel = {
            let mut guard = self.cancel.lock().unwrap();
            *guard = CancellationToken::new();
            guard.clone()
        };

        info!(session_id = %session_id, voice_id = %session.voice_id, "generation: started");

        // 1. Voice. Must finish before the video job is submitted; the video
        //    provider takes the finished audio asset as input.
        if !self.store.update_if(session_id, |s| {
            s.stage = Stage::GeneratingVoice;
            s.status_message = "Generating voice audio...".to_string();
            s.progress_percent = 0;
        }) {
            return Err(GenerationError::Canceled);
        }

        let audio_url = match self.api.synthesize_voice(&script, &session.voice_id).await {
            Ok(url) => url,
            Err(e) => return self.fail(session_id, e),
        };

        // 2. Submit the video job.
        if !self.store.update_if(session_id, |s| {
            s.stage = Stage::GeneratingVideo;
            s.audio_url = Some(audio_url.clone());
            s.status_message = "Creating lip-sync video...".to_string();
        }) {
            return Err(GenerationError::Canceled);
        }

        let image_ref = as_data_url(&image);
        let job_id = match self.api.submit_video_job(&image_ref, &audio_url).await {
            Ok(id) => id,
            Err(e) => return self.fail(session_id, e),
        };
        info!(session_id = %session_id, job_id = %job_id, "video job submitted");

        // 3. Poll to a terminal state, mirroring every tick into the session.
        let outcome = poll_until_terminal(
            self.api.as_ref(),
            &job_id,
            &self.poll,
            &cancel,
            |percent, message| {
                self.store.update_if(session_id, |s| {
                    s.progress_percent = percent;
                    s.status_message = message.to_string();
                });
            },
        )
        .await;

        let job = match outcome {
            Ok(job) => job,
            Err(e) => return self.fail(session_id, e),
        };
        let video_url = match job.result_url {
            Some(url) => url,
            None => {
                return self.fail(
                    session_id,
                    GenerationError::Remote {
                        status: None,
                        message: "no video URL in provider output".to_string(),
                    },
                )
            }
        };

        // 4. Completion side effects. The session-id guard doubles as the
        //    cancellation check: if the poll resolved against a reset
        //    session, nothing is recorded.
        if !self.store.update_if(session_id, |s| {
            s.stage = Stage::Complete;
            s.video_url = Some(video_url.clone());
            s.progress_percent = 100;
            s.status_message = "Video ready!".to_string();
        }) {
            return Err(GenerationError::Canceled);
        }

        if let Err(e) = self
            .gallery
            .add_entry(GalleryEntry::new(video_url, script, None))
            .await
        {
            warn!(session_id = %session_id, "failed to save gallery entry: {e}");
        }

        if self.entitlement.is_metered() {
            if let Err(e) = self.entitlement.increment_usage().await {
                warn!(session_id = %session_id, "failed to increment usage: {e}");
            }
        }

        info!(session_id = %session_id, "generation: complete");
        Ok(())
    }

    fn fail(&self, session_id: Uuid, e: GenerationError) -> Result<(), GenerationError> {
        if matches!(e, GenerationError::Canceled) {
            return Err(e);
        }

        error!(session_id = %session_id, "generation failed: {e}");
        let message = e.user_message();
        self.store.update_if(session_id, |s| {
            s.stage = Stage::Error;
            s.last_error = Some(message.clone());
            s.progress_percent = 0;
            s.status_message = message.clone();
        });
        Err(e)
    }
}

fn as_data_url(image_base64: &str) -> String {
    if image_base64.starts_with("data:") {
        image_base64.to_string()
    } else {
        format!("data:image/jpeg;base64,{image_base64}")
    }
}
