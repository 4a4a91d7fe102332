//! Routing of core events into page state.

use crate::pages::{BuilderPage, ChatPage, VoiceOverlay};
use omni_protocol::Event;

/// Apply one core event to the pages that care about it.
///
/// Voice events land on the overlay only while one is open; a late event
/// from a torn-down session is dropped.
pub fn handle_core_event(
    chat: &mut ChatPage,
    builder: &mut BuilderPage,
    voice: &mut Option<VoiceOverlay>,
    event: Event,
) {
    match event {
        Event::AgentsLoaded { agents } => chat.on_agents_loaded(agents),
        Event::AgentsLoadFailed { error } => chat.on_agents_failed(error),
        Event::ChatCompleted { content } => chat.on_chat_completed(content),
        Event::ChatFailed { error } => chat.on_chat_failed(error),
        Event::AgentConfigsLoaded { configs } => builder.on_configs_loaded(configs),
        Event::AgentConfigsLoadFailed { error } => builder.on_configs_failed(error),
        Event::AgentConfigSaved { config } => builder.on_saved(config),
        Event::AgentConfigDeleted { id } => builder.on_deleted(id),
        Event::StoreFailed { error } => builder.on_store_failed(error),
        Event::VoiceTokenFailed { error } => {
            if let Some(overlay) = voice {
                overlay.on_failed(error);
            }
        }
        Event::VoiceStateChanged { state } => {
            if let Some(overlay) = voice {
                overlay.on_state(state);
            }
        }
        Event::VoiceAudioLevel { level } => {
            if let Some(overlay) = voice {
                overlay.on_level(level);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pages::voice::VoicePhase;
    use omni_protocol::VoiceSessionState;

    #[test]
    fn chat_events_reach_the_chat_page() {
        let mut chat = ChatPage::new();
        let mut builder = BuilderPage::new();
        let mut voice = None;

        handle_core_event(
            &mut chat,
            &mut builder,
            &mut voice,
            Event::ChatCompleted {
                content: "hello".to_string(),
            },
        );

        assert_eq!(chat.messages().len(), 1);
    }

    #[test]
    fn store_failure_opens_the_builder_alert() {
        let mut chat = ChatPage::new();
        let mut builder = BuilderPage::new();
        let mut voice = None;

        handle_core_event(
            &mut chat,
            &mut builder,
            &mut voice,
            Event::StoreFailed {
                error: "denied".to_string(),
            },
        );

        assert!(builder.has_modal());
    }

    #[test]
    fn voice_events_without_an_overlay_are_dropped() {
        let mut chat = ChatPage::new();
        let mut builder = BuilderPage::new();
        let mut voice = None;

        handle_core_event(
            &mut chat,
            &mut builder,
            &mut voice,
            Event::VoiceStateChanged {
                state: VoiceSessionState::Speaking,
            },
        );

        assert!(voice.is_none());
    }

    #[test]
    fn voice_events_update_an_open_overlay() {
        let mut chat = ChatPage::new();
        let mut builder = BuilderPage::new();
        let mut voice = Some(VoiceOverlay::new("General Assistant"));

        handle_core_event(
            &mut chat,
            &mut builder,
            &mut voice,
            Event::VoiceStateChanged {
                state: VoiceSessionState::Thinking,
            },
        );

        assert_eq!(
            *voice.as_ref().unwrap().phase(),
            VoicePhase::Connected(VoiceSessionState::Thinking)
        );
    }
}
