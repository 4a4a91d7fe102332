//! Session router: turns UI operations into client calls and events.
//!
//! The router is the single consumer of the TUI's op channel. Each op
//! spawns one task performing one client call and sending exactly one
//! terminal event back, so a slow request never blocks the loop or the UI.
//! A live voice session additionally holds one forwarding task that streams
//! room events until the user ends the session.

use crate::api::ChatBackend;
use crate::store::AgentConfigStore;
use crate::voice::{RoomEvent, VoiceRoom};
use omni_protocol::{slug_from_name, AgentConfig, Event, Op};
use std::sync::Arc;
use tokio::sync::mpsc::{UnboundedReceiver, UnboundedSender};
use tokio::sync::Mutex;
use tokio::task::JoinHandle;
use tokio_stream::StreamExt;
use tracing::{error, info};

/// Routes operations from the UI to the backend clients.
pub struct SessionRouter {
    api: Arc<dyn ChatBackend>,
    store: Arc<dyn AgentConfigStore>,
    room: Arc<dyn VoiceRoom>,
    events_tx: UnboundedSender<Event>,
    voice_task: Arc<Mutex<Option<JoinHandle<()>>>>,
}

impl SessionRouter {
    pub fn new(
        api: Arc<dyn ChatBackend>,
        store: Arc<dyn AgentConfigStore>,
        room: Arc<dyn VoiceRoom>,
        events_tx: UnboundedSender<Event>,
    ) -> Self {
        Self {
            api,
            store,
            room,
            events_tx,
            voice_task: Arc::new(Mutex::new(None)),
        }
    }

    /// Main loop: consume ops until the channel closes or `Op::Shutdown`.
    pub async fn run(self, mut op_rx: UnboundedReceiver<Op>) {
        while let Some(op) = op_rx.recv().await {
            if matches!(op, Op::Shutdown) {
                info!("session router shutting down");
                self.teardown_voice().await;
                break;
            }
            self.dispatch(op).await;
        }
    }

    async fn dispatch(&self, op: Op) {
        match op {
            Op::FetchAgents => {
                let api = Arc::clone(&self.api);
                let events_tx = self.events_tx.clone();
                tokio::spawn(async move {
                    let event = match api.list_agents().await {
                        Ok(agents) => Event::AgentsLoaded { agents },
                        Err(error) => {
                            error!(%error, "agent listing failed");
                            Event::AgentsLoadFailed {
                                error: error.to_string(),
                            }
                        }
                    };
                    let _ = events_tx.send(event);
                });
            }
            Op::SendChat {
                messages,
                agent_slug,
            } => {
                info!(%agent_slug, count = messages.len(), "dispatching chat");
                let api = Arc::clone(&self.api);
                let events_tx = self.events_tx.clone();
                tokio::spawn(async move {
                    let event = match api.send_chat(&messages, &agent_slug).await {
                        Ok(content) => Event::ChatCompleted { content },
                        Err(error) => {
                            error!(%error, "chat request failed");
                            Event::ChatFailed {
                                error: error.to_string(),
                            }
                        }
                    };
                    let _ = events_tx.send(event);
                });
            }
            Op::FetchAgentConfigs => {
                let store = Arc::clone(&self.store);
                let events_tx = self.events_tx.clone();
                tokio::spawn(async move {
                    let event = match store.list().await {
                        Ok(configs) => Event::AgentConfigsLoaded { configs },
                        Err(error) => {
                            error!(%error, "config listing failed");
                            Event::AgentConfigsLoadFailed {
                                error: error.to_string(),
                            }
                        }
                    };
                    let _ = events_tx.send(event);
                });
            }
            Op::SaveAgentConfig { config } => {
                let store = Arc::clone(&self.store);
                let events_tx = self.events_tx.clone();
                tokio::spawn(async move {
                    let config = with_derived_slug(config);
                    let event = match store.upsert(&config).await {
                        Ok(stored) => Event::AgentConfigSaved { config: stored },
                        Err(error) => {
                            error!(%error, "config save failed");
                            Event::StoreFailed {
                                error: error.to_string(),
                            }
                        }
                    };
                    let _ = events_tx.send(event);
                });
            }
            Op::DeleteAgentConfig { id } => {
                let store = Arc::clone(&self.store);
                let events_tx = self.events_tx.clone();
                tokio::spawn(async move {
                    let event = match store.delete(id).await {
                        Ok(()) => Event::AgentConfigDeleted { id },
                        Err(error) => {
                            error!(%error, "config delete failed");
                            Event::StoreFailed {
                                error: error.to_string(),
                            }
                        }
                    };
                    let _ = events_tx.send(event);
                });
            }
            Op::StartVoice { agent_slug } => {
                self.start_voice(agent_slug).await;
            }
            Op::EndVoice => {
                self.teardown_voice().await;
            }
            Op::Shutdown => {
                // Handled by the run loop
            }
        }
    }

    /// Fetch a token, connect to the room, and forward its events until
    /// the session is torn down.
    async fn start_voice(&self, agent_slug: String) {
        // A fresh session replaces any live one
        self.teardown_voice().await;

        let api = Arc::clone(&self.api);
        let room = Arc::clone(&self.room);
        let events_tx = self.events_tx.clone();
        let voice_task = Arc::clone(&self.voice_task);

        let handle = tokio::spawn(async move {
            let token = match api.voice_token(&agent_slug).await {
                Ok(token) => token,
                Err(error) => {
                    error!(%error, "voice token request failed");
                    let _ = events_tx.send(Event::VoiceTokenFailed {
                        error: error.to_string(),
                    });
                    return;
                }
            };

            let mut stream = match room.connect(&token.token, &token.server_url).await {
                Ok(stream) => stream,
                Err(error) => {
                    error!(%error, "voice room connect failed");
                    let _ = events_tx.send(Event::VoiceTokenFailed {
                        error: error.to_string(),
                    });
                    return;
                }
            };

            info!(%agent_slug, "voice session connected");
            while let Some(event) = stream.next().await {
                let forwarded = match event {
                    RoomEvent::State(state) => Event::VoiceStateChanged { state },
                    RoomEvent::AudioLevel(level) => Event::VoiceAudioLevel { level },
                };
                if events_tx.send(forwarded).is_err() {
                    break;
                }
            }
        });

        *voice_task.lock().await = Some(handle);
    }

    async fn teardown_voice(&self) {
        if let Some(handle) = self.voice_task.lock().await.take() {
            info!("voice session torn down");
            handle.abort();
        }
    }
}

/// Applies the save-time slug rule: an empty slug is derived from the name.
fn with_derived_slug(mut config: AgentConfig) -> AgentConfig {
    if config.slug.is_empty() {
        config.slug = slug_from_name(&config.name);
    }
    config
}
