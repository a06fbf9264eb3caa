//! Bounded status polling.

use std::time::Duration;

use tokio_util::sync::CancellationToken;
use tracing::warn;

use crate::api::RemoteApi;
use crate::error::GenerationError;
use crate::job::{GenerationJob, VideoJobState};
use crate::progress;

#[derive(Debug, Clone)]
pub struct PollConfig {
    /// Fixed delay between status checks.
    pub interval: Duration,
    /// Total status checks before giving up. A failed read consumes an
    /// attempt from the same bound as a successful non-terminal read.
    pub max_attempts: u32,
}

impl Default for PollConfig {
    // 90 checks at 5s covers 7.5 minutes of wall-clock time.
    fn default() -> Self {
        Self {
            interval: Duration::from_secs(5),
            max_attempts: 90,
        }
    }
}

/// Drive a job from submission to a terminal state.
///
/// Invokes `on_tick(progress_percent, message)` on every successful status
/// read, including repeated identical statuses, so the UI can reflect
/// liveness. A single failed read does not abort the poll; only a terminal
/// provider status, cancellation, or the attempt bound ends the loop.
///
/// After `cancel` fires, no further status read is scheduled and the loop
/// returns [`GenerationError::Canceled`].
pub async fn poll_until_terminal(
    api: &dyn RemoteApi,
    job_id: &str,
    config: &PollConfig,
    cancel: &CancellationToken,
    mut on_tick: impl FnMut(u8, &str) + Send,
) -> Result<GenerationJob, GenerationError> {
    for attempt in 1..=config.max_attempts {
        if cancel.is_cancelled() {
            return Err(GenerationError::Canceled);
        }

        match api.job_status(job_id).await {
            Ok(job) => {
                let message = progress::message_for(job.status, job.error_message.as_deref());
                on_tick(job.progress_percent, &message);

                match job.status {
                    VideoJobState::Succeeded => return Ok(job),
                    VideoJobState::Failed | VideoJobState::Canceled => {
                        return Err(GenerationError::Provider {
                            state: job.status,
                            message: job.error_message,
                        });
                    }
                    VideoJobState::Starting | VideoJobState::Processing => {}
                }
            }
            Err(e) => {
                warn!(job_id = %job_id, attempt, "status check failed: {e}");
            }
        }

        if attempt == config.max_attempts {
            break;
        }

        tokio::select! {
            _ = cancel.cancelled() => return Err(GenerationError::Canceled),
            _ = tokio::time::sleep(config.interval) => {}
        }
    }

    Err(GenerationError::Timeout {
        attempts: config.max_attempts,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::{Arc, Mutex};

    use async_trait::async_trait;

    /// Plays back a fixed sequence of status-read outcomes.
    struct ScriptedApi {
        reads: Mutex<std::vec::IntoIter<Result<GenerationJob, GenerationError>>>,
        read_count: AtomicUsize,
    }

    impl ScriptedApi {
        fn new(reads: Vec<Result<GenerationJob, GenerationError>>) -> Self {
            Self {
                reads: Mutex::new(reads.into_iter()),
                read_count: AtomicUsize::new(0),
            }
        }

        fn reads_issued(&self) -> usize {
            self.read_count.load(Ordering::SeqCst)
        }
    }

    fn snapshot(status: VideoJobState) -> GenerationJob {
        GenerationJob {
            job_id: "j1".to_string(),
            status,
            progress_percent: progress::percent_for(status),
            result_url: matches!(status, VideoJobState::Succeeded)
                .then(|| "v://final".to_string()),
            error_message: None,
        }
    }

    #[async_trait]
    impl RemoteApi for ScriptedApi {
        async fn generate_script(&self, _image: &str) -> Result<String, GenerationError> {
            unimplemented!()
        }

        async fn synthesize_voice(
            &self,
            _text: &str,
            _voice_id: &str,
        ) -> Result<String, GenerationError> {
            unimplemented!()
        }

        async fn submit_video_job(
            &self,
            _image_ref: &str,
            _audio_ref: &str,
        ) -> Result<String, GenerationError> {
            unimplemented!()
        }

        async fn job_status(&self, _job_id: &str) -> Result<GenerationJob, GenerationError> {
            self.read_count.fetch_add(1, Ordering::SeqCst);
            self.reads
                .lock()
                .unwrap()
                .next()
                .unwrap_or(Err(GenerationError::Remote {
                    status: None,
                    message: "script exhausted".to_string(),
                }))
        }
    }

    fn config(max_attempts: u32) -> PollConfig {
        PollConfig {
            interval: Duration::from_secs(5),
            max_attempts,
        }
    }

    #[tokio::test(start_paused = true)]
    async fn ticks_on_every_read_and_stops_on_success() {
        let api = ScriptedApi::new(vec![
            Ok(snapshot(VideoJobState::Processing)),
            Ok(snapshot(VideoJobState::Processing)),
            Ok(snapshot(VideoJobState::Succeeded)),
        ]);
        let ticks = Arc::new(Mutex::new(Vec::new()));
        let ticks2 = ticks.clone();

        let job = poll_until_terminal(
            &api,
            "j1",
            &config(10),
            &CancellationToken::new(),
            move |pct, msg| ticks2.lock().unwrap().push((pct, msg.to_string())),
        )
        .await
        .unwrap();

        assert_eq!(job.result_url.as_deref(), Some("v://final"));
        assert_eq!(api.reads_issued(), 3);
        let ticks = ticks.lock().unwrap();
        assert_eq!(
            *ticks,
            vec![
                (50, "Generating lip-sync video...".to_string()),
                (50, "Generating lip-sync video...".to_string()),
                (100, "Video ready!".to_string()),
            ]
        );
    }

    #[tokio::test(start_paused = true)]
    async fn provider_failure_ends_the_loop_with_its_message() {
        let mut failed = snapshot(VideoJobState::Failed);
        failed.error_message = Some("OOM".to_string());
        let api = ScriptedApi::new(vec![Ok(snapshot(VideoJobState::Starting)), Ok(failed)]);

        let err = poll_until_terminal(
            &api,
            "j1",
            &config(10),
            &CancellationToken::new(),
            |_, _| {},
        )
        .await
        .unwrap_err();

        assert!(matches!(
            err,
            GenerationError::Provider {
                state: VideoJobState::Failed,
                ..
            }
        ));
        assert_eq!(err.user_message(), "OOM");
        assert_eq!(api.reads_issued(), 2);
    }

    #[tokio::test(start_paused = true)]
    async fn exhausting_the_bound_is_a_timeout() {
        let api = ScriptedApi::new(vec![
            Ok(snapshot(VideoJobState::Processing)),
            Ok(snapshot(VideoJobState::Processing)),
            Ok(snapshot(VideoJobState::Processing)),
        ]);

        let err = poll_until_terminal(
            &api,
            "j1",
            &config(3),
            &CancellationToken::new(),
            |_, _| {},
        )
        .await
        .unwrap_err();

        assert!(matches!(err, GenerationError::Timeout { attempts: 3 }));
        assert_eq!(api.reads_issued(), 3);
    }

    #[tokio::test(start_paused = true)]
    async fn transient_read_errors_consume_attempts_without_aborting() {
        let api = ScriptedApi::new(vec![
            Err(GenerationError::Remote {
                status: Some(502),
                message: "bad gateway".to_string(),
            }),
            Ok(snapshot(VideoJobState::Succeeded)),
        ]);
        let tick_count = Arc::new(AtomicUsize::new(0));
        let tick_count2 = tick_count.clone();

        let job = poll_until_terminal(
            &api,
            "j1",
            &config(10),
            &CancellationToken::new(),
            move |_, _| {
                tick_count2.fetch_add(1, Ordering::SeqCst);
            },
        )
        .await
        .unwrap();

        assert_eq!(job.status, VideoJobState::Succeeded);
        // The failed read produced no tick.
        assert_eq!(tick_count.load(Ordering::SeqCst), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn cancellation_stops_scheduling_further_reads() {
        let api = ScriptedApi::new(vec![
            Ok(snapshot(VideoJobState::Processing)),
            Ok(snapshot(VideoJobState::Processing)),
        ]);
        let cancel = CancellationToken::new();

        let cancel2 = cancel.clone();
        tokio::spawn(async move {
            tokio::time::sleep(Duration::from_secs(7)).await;
            cancel2.cancel();
        });

        let err = poll_until_terminal(&api, "j1", &config(10), &cancel, |_, _| {})
            .await
            .unwrap_err();

        assert!(matches!(err, GenerationError::Canceled));
        // Two reads at t=0s and t=5s; the cancel at t=7s prevents the third.
        assert_eq!(api.reads_issued(), 2);
    }
}
