//! Integration tests for the session router against scripted clients.

use async_trait::async_trait;
use omni_core::api::{ApiError, ApiResult, ChatBackend};
use omni_core::session::SessionRouter;
use omni_core::store::{AgentConfigStore, StoreError, StoreResult};
use omni_core::voice::{RoomEvent, RoomEventStream, VoiceError, VoiceRoom};
use omni_protocol::{
    AgentConfig, AgentSummary, Event, Message, Op, VoiceSessionState, VoiceTokenResponse,
};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::mpsc::{unbounded_channel, UnboundedReceiver};
use uuid::Uuid;

/// Backend whose replies are fixed up front.
struct ScriptedBackend {
    chat_reply: Result<String, String>,
    agents: Vec<AgentSummary>,
    token: Result<VoiceTokenResponse, String>,
}

impl Default for ScriptedBackend {
    fn default() -> Self {
        Self {
            chat_reply: Ok("Ahoy!".to_string()),
            agents: Vec::new(),
            token: Err("voice disabled".to_string()),
        }
    }
}

#[async_trait]
impl ChatBackend for ScriptedBackend {
    async fn send_chat(&self, _messages: &[Message], _agent_slug: &str) -> ApiResult<String> {
        self.chat_reply
            .clone()
            .map_err(|detail| ApiError::Backend { detail })
    }

    async fn list_agents(&self) -> ApiResult<Vec<AgentSummary>> {
        Ok(self.agents.clone())
    }

    async fn voice_token(&self, _agent_slug: &str) -> ApiResult<VoiceTokenResponse> {
        self.token
            .clone()
            .map_err(|detail| ApiError::Backend { detail })
    }
}

/// Store that assigns ids on upsert, or fails every call.
struct ScriptedStore {
    fail: bool,
}

#[async_trait]
impl AgentConfigStore for ScriptedStore {
    async fn list(&self) -> StoreResult<Vec<AgentConfig>> {
        if self.fail {
            return Err(StoreError::Request {
                message: "connection refused".to_string(),
            });
        }
        Ok(Vec::new())
    }

    async fn upsert(&self, config: &AgentConfig) -> StoreResult<AgentConfig> {
        if self.fail {
            return Err(StoreError::Request {
                message: "connection refused".to_string(),
            });
        }
        let mut stored = config.clone();
        if stored.id.is_none() {
            stored.id = Some(Uuid::new_v4());
        }
        if stored.created_at.is_none() {
            stored.created_at = Some(chrono::Utc::now());
        }
        Ok(stored)
    }

    async fn delete(&self, _id: Uuid) -> StoreResult<()> {
        if self.fail {
            return Err(StoreError::Request {
                message: "connection refused".to_string(),
            });
        }
        Ok(())
    }
}

/// Room yielding a fixed event script.
struct ScriptedRoom {
    events: Vec<RoomEvent>,
}

#[async_trait]
impl VoiceRoom for ScriptedRoom {
    async fn connect(&self, _token: &str, _server_url: &str) -> Result<RoomEventStream, VoiceError> {
        Ok(Box::pin(tokio_stream::iter(self.events.clone())))
    }
}

fn spawn_router(
    backend: ScriptedBackend,
    store: ScriptedStore,
    room: ScriptedRoom,
) -> (
    tokio::sync::mpsc::UnboundedSender<Op>,
    UnboundedReceiver<Event>,
) {
    let (op_tx, op_rx) = unbounded_channel();
    let (event_tx, event_rx) = unbounded_channel();

    let router = SessionRouter::new(Arc::new(backend), Arc::new(store), Arc::new(room), event_tx);
    tokio::spawn(router.run(op_rx));

    (op_tx, event_rx)
}

async fn next_event(event_rx: &mut UnboundedReceiver<Event>) -> Event {
    tokio::time::timeout(Duration::from_secs(1), event_rx.recv())
        .await
        .expect("timed out waiting for event")
        .expect("event channel closed")
}

#[tokio::test]
async fn chat_success_yields_one_completed_event() {
    let (op_tx, mut event_rx) = spawn_router(
        ScriptedBackend::default(),
        ScriptedStore { fail: false },
        ScriptedRoom { events: vec![] },
    );

    op_tx
        .send(Op::SendChat {
            messages: vec![Message::user("hi")],
            agent_slug: "general".to_string(),
        })
        .unwrap();

    match next_event(&mut event_rx).await {
        Event::ChatCompleted { content } => assert_eq!(content, "Ahoy!"),
        other => panic!("unexpected event: {other:?}"),
    }
}

#[tokio::test]
async fn chat_failure_yields_one_failed_event_with_error_text() {
    let backend = ScriptedBackend {
        chat_reply: Err("No API key configured".to_string()),
        ..ScriptedBackend::default()
    };
    let (op_tx, mut event_rx) = spawn_router(
        backend,
        ScriptedStore { fail: false },
        ScriptedRoom { events: vec![] },
    );

    op_tx
        .send(Op::SendChat {
            messages: vec![Message::user("hi")],
            agent_slug: "general".to_string(),
        })
        .unwrap();

    match next_event(&mut event_rx).await {
        Event::ChatFailed { error } => assert_eq!(error, "No API key configured"),
        other => panic!("unexpected event: {other:?}"),
    }
}

#[tokio::test]
async fn save_derives_slug_and_returns_stored_record() {
    let (op_tx, mut event_rx) = spawn_router(
        ScriptedBackend::default(),
        ScriptedStore { fail: false },
        ScriptedRoom { events: vec![] },
    );

    let config = AgentConfig {
        name: "My Bot".to_string(),
        ..AgentConfig::default()
    };
    op_tx.send(Op::SaveAgentConfig { config }).unwrap();

    match next_event(&mut event_rx).await {
        Event::AgentConfigSaved { config } => {
            assert_eq!(config.slug, "my-bot");
            assert!(config.id.is_some(), "store assigns an id");
            assert!(config.created_at.is_some());
        }
        other => panic!("unexpected event: {other:?}"),
    }
}

#[tokio::test]
async fn save_failure_yields_store_failed() {
    let (op_tx, mut event_rx) = spawn_router(
        ScriptedBackend::default(),
        ScriptedStore { fail: true },
        ScriptedRoom { events: vec![] },
    );

    op_tx
        .send(Op::SaveAgentConfig {
            config: AgentConfig::default(),
        })
        .unwrap();

    match next_event(&mut event_rx).await {
        Event::StoreFailed { error } => assert!(error.contains("connection refused")),
        other => panic!("unexpected event: {other:?}"),
    }
}

#[tokio::test]
async fn delete_success_echoes_the_id() {
    let (op_tx, mut event_rx) = spawn_router(
        ScriptedBackend::default(),
        ScriptedStore { fail: false },
        ScriptedRoom { events: vec![] },
    );

    let id = Uuid::new_v4();
    op_tx.send(Op::DeleteAgentConfig { id }).unwrap();

    match next_event(&mut event_rx).await {
        Event::AgentConfigDeleted { id: deleted } => assert_eq!(deleted, id),
        other => panic!("unexpected event: {other:?}"),
    }
}

#[tokio::test]
async fn voice_token_failure_is_reported_without_retry() {
    let (op_tx, mut event_rx) = spawn_router(
        ScriptedBackend::default(), // token is Err by default
        ScriptedStore { fail: false },
        ScriptedRoom { events: vec![] },
    );

    op_tx
        .send(Op::StartVoice {
            agent_slug: "general".to_string(),
        })
        .unwrap();

    match next_event(&mut event_rx).await {
        Event::VoiceTokenFailed { error } => assert_eq!(error, "voice disabled"),
        other => panic!("unexpected event: {other:?}"),
    }

    // No retry: nothing else arrives
    let extra = tokio::time::timeout(Duration::from_millis(100), event_rx.recv()).await;
    assert!(extra.is_err(), "expected no further events");
}

#[tokio::test]
async fn voice_session_forwards_room_events() {
    let backend = ScriptedBackend {
        token: Ok(VoiceTokenResponse {
            token: "tok".to_string(),
            server_url: "wss://voice.localhost".to_string(),
        }),
        ..ScriptedBackend::default()
    };
    let room = ScriptedRoom {
        events: vec![
            RoomEvent::State(VoiceSessionState::Listening),
            RoomEvent::AudioLevel(0.5),
            RoomEvent::State(VoiceSessionState::Speaking),
        ],
    };
    let (op_tx, mut event_rx) = spawn_router(backend, ScriptedStore { fail: false }, room);

    op_tx
        .send(Op::StartVoice {
            agent_slug: "general".to_string(),
        })
        .unwrap();

    match next_event(&mut event_rx).await {
        Event::VoiceStateChanged { state } => assert_eq!(state, VoiceSessionState::Listening),
        other => panic!("unexpected event: {other:?}"),
    }
    match next_event(&mut event_rx).await {
        Event::VoiceAudioLevel { level } => assert!((level - 0.5).abs() < f32::EPSILON),
        other => panic!("unexpected event: {other:?}"),
    }
    match next_event(&mut event_rx).await {
        Event::VoiceStateChanged { state } => assert_eq!(state, VoiceSessionState::Speaking),
        other => panic!("unexpected event: {other:?}"),
    }

    // Tearing down after the script drained must not panic or emit more
    op_tx.send(Op::EndVoice).unwrap();
    let extra = tokio::time::timeout(Duration::from_millis(100), event_rx.recv()).await;
    assert!(extra.is_err(), "expected no further events");
}

#[tokio::test]
async fn shutdown_stops_the_loop() {
    let (op_tx, mut event_rx) = spawn_router(
        ScriptedBackend::default(),
        ScriptedStore { fail: false },
        ScriptedRoom { events: vec![] },
    );

    op_tx.send(Op::Shutdown).unwrap();

    // The router drops its event sender when the loop exits
    let closed = tokio::time::timeout(Duration::from_secs(1), event_rx.recv())
        .await
        .expect("timed out waiting for channel close");
    assert!(closed.is_none());
}
