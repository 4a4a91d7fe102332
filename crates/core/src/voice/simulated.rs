//! Simulated voice room adapter.
//!
//! Stand-in room client that emits a plausible listen/think/speak cycle
//! with synthetic audio levels, so the overlay is fully exercisable
//! without audio hardware or a room server.
//!
//! TODO: replace with a native room adapter once a Rust client SDK for the
//! room provider is available.

use crate::voice::{RoomEvent, RoomEventStream, VoiceError, VoiceRoom};
use async_trait::async_trait;
use omni_protocol::VoiceSessionState;
use std::time::Duration;

/// Ticks spent in each state before cycling to the next.
const TICKS_PER_STATE: u32 = 30;

/// Interval between audio level samples.
const TICK_INTERVAL: Duration = Duration::from_millis(100);

#[derive(Debug, Clone, Copy, Default)]
pub struct SimulatedRoom;

#[async_trait]
impl VoiceRoom for SimulatedRoom {
    async fn connect(&self, token: &str, server_url: &str) -> Result<RoomEventStream, VoiceError> {
        if token.trim().is_empty() || server_url.trim().is_empty() {
            return Err(VoiceError::Connect {
                message: "missing token or server URL".to_string(),
            });
        }

        let stream = async_stream::stream! {
            let cycle = [
                VoiceSessionState::Listening,
                VoiceSessionState::Thinking,
                VoiceSessionState::Speaking,
            ];

            let mut tick: u32 = 0;
            let mut interval = tokio::time::interval(TICK_INTERVAL);

            yield RoomEvent::State(VoiceSessionState::Listening);

            loop {
                interval.tick().await;
                tick = tick.wrapping_add(1);

                if tick % TICKS_PER_STATE == 0 {
                    let state = cycle[(tick / TICKS_PER_STATE) as usize % cycle.len()];
                    yield RoomEvent::State(state);
                }

                yield RoomEvent::AudioLevel(synthetic_level(tick));
            }
        };

        Ok(Box::pin(stream))
    }
}

/// Triangle-wave level in `0.0..=1.0`; cheap and visibly animated.
fn synthetic_level(tick: u32) -> f32 {
    let phase = (tick % 20) as f32 / 20.0;
    if phase < 0.5 {
        phase * 2.0
    } else {
        (1.0 - phase) * 2.0
    }
}
