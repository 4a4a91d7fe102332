//! Voice room trait and adapters.
//!
//! The realtime audio room is a third-party service: this module owns only
//! the seam. A connected room yields a stream of state changes and audio
//! level samples; the session router forwards those to the UI until the
//! user tears the session down.

pub mod simulated;

use async_trait::async_trait;
use omni_protocol::VoiceSessionState;
use std::pin::Pin;
use thiserror::Error;
use tokio_stream::Stream;

pub use simulated::SimulatedRoom;

/// Events a connected room emits.
#[derive(Debug, Clone, PartialEq)]
pub enum RoomEvent {
    /// Connection-state change, sourced from the room client.
    State(VoiceSessionState),
    /// Audio level sample in `0.0..=1.0`, drives the bar visualizer.
    AudioLevel(f32),
}

/// Stream of events from a live room connection.
pub type RoomEventStream = Pin<Box<dyn Stream<Item = RoomEvent> + Send + 'static>>;

/// Errors that can occur while connecting to a room.
#[derive(Error, Debug)]
pub enum VoiceError {
    #[error("failed to connect to voice room: {message}")]
    Connect { message: String },
}

/// A realtime audio room client.
///
/// Implementations connect with a short-lived token and a server URL (both
/// issued by the backend) and yield events until dropped. Disconnection is
/// driven by dropping the stream; rooms need no explicit close call.
#[async_trait]
pub trait VoiceRoom: Send + Sync {
    async fn connect(&self, token: &str, server_url: &str) -> Result<RoomEventStream, VoiceError>;
}
