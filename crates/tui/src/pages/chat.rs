//! Chat page: message history, composer, and agent selection.

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use omni_protocol::{AgentSummary, Message, Op, Role, AUTO_ROUTE_SLUG};
use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph, Wrap},
    Frame,
};
use tokio::sync::mpsc::UnboundedSender;

/// Slug preferred as the initial selection when the agent list loads.
const DEFAULT_AGENT_SLUG: &str = "general";

/// Chat page state.
///
/// The message list is ephemeral and append-only for the life of a session;
/// switching agents or starting a new chat discards it.
pub struct ChatPage {
    messages: Vec<Message>,
    input: String,
    agents: Vec<AgentSummary>,
    selected_agent: usize,
    auto_pilot: bool,
    /// A request is in flight; sending is a no-op until it resolves.
    pending: bool,
    load_error: Option<String>,
}

impl Default for ChatPage {
    fn default() -> Self {
        Self::new()
    }
}

impl ChatPage {
    pub fn new() -> Self {
        Self {
            messages: Vec::new(),
            input: String::new(),
            agents: Vec::new(),
            selected_agent: 0,
            auto_pilot: false,
            pending: false,
            load_error: None,
        }
    }

    pub fn messages(&self) -> &[Message] {
        &self.messages
    }

    pub fn is_pending(&self) -> bool {
        self.pending
    }

    pub fn is_auto_pilot(&self) -> bool {
        self.auto_pilot
    }

    /// Display label for the current selection.
    pub fn selected_agent_label(&self) -> &str {
        self.agents
            .get(self.selected_agent)
            .map_or("General Assistant", |agent| agent.name.as_str())
    }

    /// Slug of the current selection, falling back to the default.
    pub fn selected_agent_slug(&self) -> &str {
        self.agents
            .get(self.selected_agent)
            .map_or(DEFAULT_AGENT_SLUG, |agent| agent.slug.as_str())
    }

    /// Slug sent with chat requests: the sentinel when auto-pilot is on.
    fn routing_slug(&self) -> &str {
        if self.auto_pilot {
            AUTO_ROUTE_SLUG
        } else {
            self.selected_agent_slug()
        }
    }

    pub fn on_agents_loaded(&mut self, agents: Vec<AgentSummary>) {
        self.selected_agent = agents
            .iter()
            .position(|agent| agent.slug == DEFAULT_AGENT_SLUG)
            .unwrap_or(0);
        self.agents = agents;
        self.load_error = None;
    }

    pub fn on_agents_failed(&mut self, error: String) {
        self.load_error = Some(error);
    }

    pub fn on_chat_completed(&mut self, content: String) {
        self.messages.push(Message::assistant(content));
        self.pending = false;
    }

    /// A failed request surfaces as one assistant bubble, never a crash.
    pub fn on_chat_failed(&mut self, error: String) {
        self.messages
            .push(Message::assistant(format!("Error: {error}")));
        self.pending = false;
    }

    /// Handle a key on the chat page. The app has already taken global keys.
    pub fn handle_key(&mut self, key: KeyEvent, op_tx: &UnboundedSender<Op>) {
        if key.modifiers.contains(KeyModifiers::CONTROL) {
            match key.code {
                KeyCode::Char('t') => self.toggle_auto_pilot(),
                KeyCode::Char('n') => self.new_chat(),
                _ => {}
            }
            return;
        }

        match key.code {
            KeyCode::Char(c) => self.input.push(c),
            KeyCode::Backspace => {
                self.input.pop();
            }
            KeyCode::Enter => self.submit(op_tx),
            KeyCode::Up => self.cycle_agent(-1),
            KeyCode::Down => self.cycle_agent(1),
            _ => {}
        }
    }

    /// Send the composed message with the full history.
    ///
    /// No-op on empty or whitespace-only input, and while a reply is pending.
    fn submit(&mut self, op_tx: &UnboundedSender<Op>) {
        if self.pending || self.input.trim().is_empty() {
            return;
        }

        self.messages.push(Message {
            role: Role::User,
            content: self.input.trim().to_string(),
        });
        self.input.clear();
        self.pending = true;

        let _ = op_tx.send(Op::SendChat {
            messages: self.messages.clone(),
            agent_slug: self.routing_slug().to_string(),
        });
    }

    fn toggle_auto_pilot(&mut self) {
        self.auto_pilot = !self.auto_pilot;
    }

    fn new_chat(&mut self) {
        self.messages.clear();
        self.input.clear();
        self.pending = false;
    }

    /// Move the agent selection and discard the session, even when the
    /// cycle lands back on the same agent.
    fn cycle_agent(&mut self, delta: i64) {
        if self.agents.is_empty() {
            return;
        }
        let len = self.agents.len() as i64;
        self.selected_agent = ((self.selected_agent as i64 + delta).rem_euclid(len)) as usize;
        self.messages.clear();
        self.pending = false;
    }

    pub fn render(&self, frame: &mut Frame, area: Rect) {
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Min(3), Constraint::Length(3)])
            .split(area);

        self.render_history(frame, chunks[0]);
        self.render_composer(frame, chunks[1]);
    }

    fn render_history(&self, frame: &mut Frame, area: Rect) {
        let pilot = if self.auto_pilot { " [auto-pilot]" } else { "" };
        let title = format!(" Chat: {}{} ", self.selected_agent_label(), pilot);
        let block = Block::default().borders(Borders::ALL).title(title);

        let mut lines: Vec<Line> = Vec::new();
        if let Some(error) = &self.load_error {
            lines.push(Line::from(Span::styled(
                format!("Could not load agents: {error}"),
                Style::default().fg(Color::Red),
            )));
        }
        for message in &self.messages {
            let (label, color) = match message.role {
                Role::User => ("you", Color::Cyan),
                Role::Assistant => ("agent", Color::Green),
            };
            lines.push(Line::from(vec![
                Span::styled(
                    format!("{label}: "),
                    Style::default().fg(color).add_modifier(Modifier::BOLD),
                ),
                Span::raw(message.content.clone()),
            ]));
        }
        if self.pending {
            lines.push(Line::from(Span::styled(
                "…",
                Style::default().fg(Color::DarkGray),
            )));
        }

        // Keep the tail in view
        let visible = area.height.saturating_sub(2) as usize;
        let skip = lines.len().saturating_sub(visible);

        let paragraph = Paragraph::new(lines.split_off(skip.min(lines.len())))
            .block(block)
            .wrap(Wrap { trim: false });
        frame.render_widget(paragraph, area);
    }

    fn render_composer(&self, frame: &mut Frame, area: Rect) {
        let block = Block::default()
            .borders(Borders::ALL)
            .title(" Message (Enter to send, ^T auto-pilot, ^N new chat, ^V voice) ");
        let paragraph = Paragraph::new(format!("> {}", self.input))
            .block(block)
            .style(Style::default().fg(Color::Yellow));
        frame.render_widget(paragraph, area);
    }
}
