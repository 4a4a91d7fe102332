//! Application state and event loop.
//!
//! The app owns every page, routes keyboard input and core events, and
//! drives rendering through `tokio::select!` over the two event sources.

use crate::event_handler;
use crate::pages::{BuilderPage, ChatPage, DashboardPage, VoiceOverlay};
use crate::tui::{Tui, TuiEvent};
use anyhow::Result;
use crossterm::event::{KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use omni_protocol::{Event, Op};
use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::Paragraph,
    Frame,
};
use std::time::Duration;
use tokio::select;
use tokio::sync::mpsc::{UnboundedReceiver, UnboundedSender};
use tokio_stream::StreamExt;

/// Interval of the cosmetic pulse redraws (dashboard dots, voice dot).
const PULSE_INTERVAL: Duration = Duration::from_millis(500);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Page {
    Dashboard,
    Chat,
    Builder,
}

pub struct App {
    page: Page,
    dashboard: DashboardPage,
    chat: ChatPage,
    builder: BuilderPage,
    voice: Option<VoiceOverlay>,
    op_tx: UnboundedSender<Op>,
    event_rx: UnboundedReceiver<Event>,
    should_exit: bool,
}

impl App {
    pub fn new(op_tx: UnboundedSender<Op>, event_rx: UnboundedReceiver<Event>) -> Self {
        Self {
            page: Page::Chat,
            dashboard: DashboardPage::new(),
            chat: ChatPage::new(),
            builder: BuilderPage::new(),
            voice: None,
            op_tx,
            event_rx,
            should_exit: false,
        }
    }

    /// Main loop: initial data fetches, then select over core events and
    /// terminal events until exit.
    pub async fn run(&mut self, tui: &mut Tui) -> Result<()> {
        let mut tui_events = tui.event_stream();

        let _ = self.op_tx.send(Op::FetchAgents);
        let _ = self.op_tx.send(Op::FetchAgentConfigs);
        tui.frame_requester().schedule_frame();

        while !self.should_exit {
            select! {
                Some(event) = self.event_rx.recv() => {
                    self.handle_core_event(event);
                    tui.frame_requester().schedule_frame();
                }
                Some(tui_event) = tui_events.next() => {
                    self.handle_tui_event(tui, tui_event)?;
                }
            }
        }

        let _ = self.op_tx.send(Op::Shutdown);
        Ok(())
    }

    fn handle_core_event(&mut self, event: Event) {
        event_handler::handle_core_event(
            &mut self.chat,
            &mut self.builder,
            &mut self.voice,
            event,
        );
    }

    fn handle_tui_event(&mut self, tui: &mut Tui, event: TuiEvent) -> Result<()> {
        match event {
            TuiEvent::Key(key) => {
                self.handle_key_event(key);
                tui.frame_requester().schedule_frame();
            }
            TuiEvent::Paste(pasted) => {
                if self.voice.is_none() && self.page == Page::Chat {
                    for c in pasted.chars() {
                        self.chat.handle_key(KeyEvent::from(KeyCode::Char(c)), &self.op_tx);
                    }
                    tui.frame_requester().schedule_frame();
                }
            }
            TuiEvent::Draw => {
                if let Some(overlay) = &mut self.voice {
                    overlay.on_tick();
                }
                if self.page == Page::Dashboard {
                    self.dashboard.on_tick();
                }
                tui.draw(|frame| self.render(frame))?;
                if self.page == Page::Dashboard || self.voice.is_some() {
                    tui.frame_requester().schedule_frame_in(PULSE_INTERVAL);
                }
            }
        }
        Ok(())
    }

    /// Global keys first, then the overlay, then the active page.
    fn handle_key_event(&mut self, key: KeyEvent) {
        if key.kind != KeyEventKind::Press {
            return;
        }

        if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c') {
            self.should_exit = true;
            return;
        }

        if self.voice.is_some() {
            if key.code == KeyCode::Esc {
                let _ = self.op_tx.send(Op::EndVoice);
                self.voice = None;
            }
            return;
        }

        match key.code {
            KeyCode::F(1) => self.page = Page::Dashboard,
            KeyCode::F(2) => self.page = Page::Chat,
            KeyCode::F(3) => self.page = Page::Builder,
            KeyCode::Char('v')
                if key.modifiers.contains(KeyModifiers::CONTROL) && self.page == Page::Chat =>
            {
                self.open_voice();
            }
            _ => match self.page {
                Page::Dashboard => {}
                Page::Chat => self.chat.handle_key(key, &self.op_tx),
                Page::Builder => self.builder.handle_key(key, &self.op_tx),
            },
        }
    }

    fn open_voice(&mut self) {
        let slug = self.chat.selected_agent_slug().to_string();
        self.voice = Some(VoiceOverlay::new(self.chat.selected_agent_label()));
        let _ = self.op_tx.send(Op::StartVoice { agent_slug: slug });
    }

    fn render(&self, frame: &mut Frame) {
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Length(1), Constraint::Min(3)])
            .split(frame.area());

        self.render_tabs(frame, chunks[0]);
        match self.page {
            Page::Dashboard => self.dashboard.render(frame, chunks[1]),
            Page::Chat => self.chat.render(frame, chunks[1]),
            Page::Builder => self.builder.render(frame, chunks[1]),
        }

        if let Some(overlay) = &self.voice {
            overlay.render(frame, frame.area());
        }
    }

    fn render_tabs(&self, frame: &mut Frame, area: Rect) {
        let tabs = [
            (Page::Dashboard, "F1 Dashboard"),
            (Page::Chat, "F2 Chat"),
            (Page::Builder, "F3 Agents"),
        ];
        let mut spans = Vec::new();
        for (page, label) in tabs {
            let style = if page == self.page {
                Style::default()
                    .fg(Color::Cyan)
                    .add_modifier(Modifier::BOLD)
            } else {
                Style::default().fg(Color::DarkGray)
            };
            spans.push(Span::styled(format!(" {label} "), style));
        }
        spans.push(Span::styled(
            " ^C quit",
            Style::default().fg(Color::DarkGray),
        ));
        frame.render_widget(Paragraph::new(Line::from(spans)), area);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ratatui::{backend::TestBackend, Terminal};
    use tokio::sync::mpsc::unbounded_channel;

    fn app() -> (App, UnboundedReceiver<Op>) {
        let (op_tx, op_rx) = unbounded_channel();
        let (_event_tx, event_rx) = unbounded_channel::<Event>();
        (App::new(op_tx, event_rx), op_rx)
    }

    #[test]
    fn renders_the_tab_bar_and_default_page() {
        let (app, _op_rx) = app();
        let backend = TestBackend::new(80, 24);
        let mut terminal = Terminal::new(backend).unwrap();

        terminal.draw(|frame| app.render(frame)).unwrap();

        let content: String = terminal
            .backend()
            .buffer()
            .content()
            .iter()
            .map(|cell| cell.symbol())
            .collect();
        assert!(content.contains("F1 Dashboard"));
        assert!(content.contains("F2 Chat"));
        assert!(content.contains("F3 Agents"));
        assert!(content.contains("Message"));
    }

    #[test]
    fn ctrl_c_exits() {
        let (mut app, _op_rx) = app();
        app.handle_key_event(KeyEvent::new(KeyCode::Char('c'), KeyModifiers::CONTROL));
        assert!(app.should_exit);
    }

    #[test]
    fn function_keys_switch_pages() {
        let (mut app, _op_rx) = app();
        assert_eq!(app.page, Page::Chat);

        app.handle_key_event(KeyEvent::from(KeyCode::F(1)));
        assert_eq!(app.page, Page::Dashboard);

        app.handle_key_event(KeyEvent::from(KeyCode::F(3)));
        assert_eq!(app.page, Page::Builder);
    }

    #[test]
    fn ctrl_v_opens_the_voice_overlay_and_requests_a_session() {
        let (mut app, mut op_rx) = app();

        app.handle_key_event(KeyEvent::new(KeyCode::Char('v'), KeyModifiers::CONTROL));

        assert!(app.voice.is_some());
        match op_rx.try_recv().unwrap() {
            Op::StartVoice { agent_slug } => assert_eq!(agent_slug, "general"),
            other => panic!("unexpected op: {other:?}"),
        }
    }

    #[test]
    fn esc_ends_the_voice_session() {
        let (mut app, mut op_rx) = app();
        app.handle_key_event(KeyEvent::new(KeyCode::Char('v'), KeyModifiers::CONTROL));
        let _ = op_rx.try_recv();

        // Other keys are swallowed while the overlay is up
        app.handle_key_event(KeyEvent::from(KeyCode::F(1)));
        assert_eq!(app.page, Page::Chat);

        app.handle_key_event(KeyEvent::from(KeyCode::Esc));
        assert!(app.voice.is_none());
        assert!(matches!(op_rx.try_recv().unwrap(), Op::EndVoice));
    }

    #[test]
    fn core_events_are_routed_to_pages() {
        let (mut app, _op_rx) = app();

        app.handle_core_event(Event::ChatCompleted {
            content: "hi".to_string(),
        });
        assert_eq!(app.chat.messages().len(), 1);

        app.handle_core_event(Event::StoreFailed {
            error: "denied".to_string(),
        });
        assert!(app.builder.has_modal());
    }
}
