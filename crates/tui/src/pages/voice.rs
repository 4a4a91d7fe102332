//! Voice-call overlay.
//!
//! Floats over the active page for the duration of a voice session. The
//! session state comes from the room client via the core; the overlay only
//! mirrors it and draws the audio-level bars.

use omni_protocol::VoiceSessionState;
use ratatui::{
    layout::Rect,
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph},
    Frame,
};
use std::collections::VecDeque;

/// Number of level samples kept for the bar visualizer.
const LEVEL_WINDOW: usize = 24;

#[derive(Debug, Clone, PartialEq)]
pub enum VoicePhase {
    /// Token requested, room not yet connected.
    Requesting,
    /// Token or connect failed; dismiss with Esc, no retry.
    Failed(String),
    /// Live session mirroring room state.
    Connected(VoiceSessionState),
}

#[derive(Debug)]
pub struct VoiceOverlay {
    agent_label: String,
    phase: VoicePhase,
    levels: VecDeque<f32>,
    /// Cosmetic pulse on the status dot.
    pulse: bool,
}

impl VoiceOverlay {
    pub fn new(agent_label: impl Into<String>) -> Self {
        Self {
            agent_label: agent_label.into(),
            phase: VoicePhase::Requesting,
            levels: VecDeque::with_capacity(LEVEL_WINDOW),
            pulse: false,
        }
    }

    pub fn phase(&self) -> &VoicePhase {
        &self.phase
    }

    pub fn on_state(&mut self, state: VoiceSessionState) {
        self.phase = VoicePhase::Connected(state);
    }

    pub fn on_level(&mut self, level: f32) {
        if self.levels.len() == LEVEL_WINDOW {
            self.levels.pop_front();
        }
        self.levels.push_back(level.clamp(0.0, 1.0));
    }

    pub fn on_failed(&mut self, error: String) {
        self.phase = VoicePhase::Failed(error);
        self.levels.clear();
    }

    pub fn on_tick(&mut self) {
        self.pulse = !self.pulse;
    }

    pub fn render(&self, frame: &mut Frame, area: Rect) {
        let width = area.width.min(46);
        let height = 9;
        let popup = Rect::new(
            area.x + (area.width.saturating_sub(width)) / 2,
            area.y + (area.height.saturating_sub(height)) / 2,
            width,
            height.min(area.height),
        );

        frame.render_widget(Clear, popup);
        let block = Block::default()
            .borders(Borders::ALL)
            .title(format!(" Voice: {} ", self.agent_label));
        let inner = block.inner(popup);
        frame.render_widget(block, popup);

        let mut lines = vec![self.status_line(), Line::default()];
        match &self.phase {
            VoicePhase::Failed(error) => {
                lines.push(Line::from(Span::styled(
                    error.clone(),
                    Style::default().fg(Color::Red),
                )));
            }
            _ => lines.push(self.bars_line()),
        }
        lines.push(Line::default());
        lines.push(Line::from(Span::styled(
            "Esc to end the call",
            Style::default().fg(Color::DarkGray),
        )));

        frame.render_widget(Paragraph::new(lines).centered(), inner);
    }

    fn status_line(&self) -> Line<'static> {
        let (label, color) = match &self.phase {
            VoicePhase::Requesting => ("connecting".to_string(), Color::Yellow),
            VoicePhase::Failed(_) => ("failed".to_string(), Color::Red),
            VoicePhase::Connected(state) => {
                let color = match state {
                    VoiceSessionState::Connecting => Color::Yellow,
                    VoiceSessionState::Listening => Color::Green,
                    VoiceSessionState::Thinking => Color::Magenta,
                    VoiceSessionState::Speaking => Color::Cyan,
                };
                (state.label().to_string(), color)
            }
        };
        let dot = if self.pulse {
            Style::default().fg(color).add_modifier(Modifier::BOLD)
        } else {
            Style::default().fg(color).add_modifier(Modifier::DIM)
        };
        Line::from(vec![
            Span::styled("● ", dot),
            Span::styled(label, Style::default().fg(color)),
        ])
    }

    /// One glyph per level sample, scaled over eight bar heights.
    fn bars_line(&self) -> Line<'static> {
        const BARS: [char; 8] = ['▁', '▂', '▃', '▄', '▅', '▆', '▇', '█'];
        let text: String = self
            .levels
            .iter()
            .map(|level| {
                let index = ((level * 7.0).round() as usize).min(BARS.len() - 1);
                BARS[index]
            })
            .collect();
        Line::from(Span::styled(text, Style::default().fg(Color::Cyan)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn starts_in_the_requesting_phase() {
        let overlay = VoiceOverlay::new("General Assistant");
        assert_eq!(*overlay.phase(), VoicePhase::Requesting);
    }

    #[test]
    fn first_state_event_marks_the_session_connected() {
        let mut overlay = VoiceOverlay::new("General Assistant");
        overlay.on_state(VoiceSessionState::Listening);
        assert_eq!(
            *overlay.phase(),
            VoicePhase::Connected(VoiceSessionState::Listening)
        );
    }

    #[test]
    fn level_window_is_bounded() {
        let mut overlay = VoiceOverlay::new("General Assistant");
        for i in 0..100 {
            overlay.on_level(i as f32 / 100.0);
        }
        assert_eq!(overlay.levels.len(), LEVEL_WINDOW);
    }

    #[test]
    fn failure_replaces_the_phase_and_drops_levels() {
        let mut overlay = VoiceOverlay::new("General Assistant");
        overlay.on_level(0.4);
        overlay.on_failed("voice disabled".to_string());

        assert_eq!(
            *overlay.phase(),
            VoicePhase::Failed("voice disabled".to_string())
        );
        assert!(overlay.levels.is_empty());
    }

    #[test]
    fn levels_are_clamped_into_range() {
        let mut overlay = VoiceOverlay::new("General Assistant");
        overlay.on_level(4.2);
        overlay.on_level(-1.0);
        assert_eq!(overlay.levels[0], 1.0);
        assert_eq!(overlay.levels[1], 0.0);
    }
}
