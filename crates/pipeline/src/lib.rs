//! Talking-photo generation pipeline
//!
//! Client-side core of the talking-photo app: a typed remote job client over
//! the gateway's HTTP surface, a bounded cancellable poll loop, and the
//! orchestrator that sequences script -> voice -> video into one observable
//! session state machine.

pub mod api;
pub mod entitlement;
pub mod error;
pub mod gallery;
pub mod job;
pub mod orchestrator;
pub mod poll;
pub mod progress;
pub mod session;
pub mod voices;
pub mod wire;

pub use api::{HttpRemoteApi, RemoteApi};
pub use entitlement::{Entitlement, UsageEntitlement, DEFAULT_FREE_VIDEO_LIMIT};
pub use error::GenerationError;
pub use gallery::{Gallery, GalleryEntry, GalleryStore};
pub use job::{GenerationJob, VideoJobState};
pub use orchestrator::Orchestrator;
pub use poll::{poll_until_terminal, PollConfig};
pub use session::{CreationSession, SessionStore, Stage};
