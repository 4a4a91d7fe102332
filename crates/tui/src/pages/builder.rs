//! Agent builder page: sidebar record list plus a detail form.
//!
//! The form edits a working copy of one agent config. Saving hands the copy
//! to the core and only merges it back into the list when the store returns
//! the persisted record; a failed save or delete opens a blocking alert and
//! leaves local state untouched.

use crate::widgets::ToolArgumentEditor;
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use omni_protocol::{
    AgentConfig, ArgumentType, CustomTool, ModelProvider, Op, BUILTIN_TOOLS,
};
use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph},
    Frame,
};
use tokio::sync::mpsc::UnboundedSender;
use uuid::Uuid;

/// One focusable field of the form, in cycle order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Focus {
    Name,
    SystemPrompt,
    Provider,
    ModelName,
    Temperature,
    IsActive,
    BuiltinTool(usize),
    ToolField { tool: usize, field: ToolField },
    ArgField { tool: usize, row: usize, field: ArgField },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ToolField {
    Name,
    Description,
    WebhookUrl,
    AuthHeaderName,
    AuthHeaderValue,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ArgField {
    Name,
    Type,
    Description,
}

/// Blocking overlays. While one is open it swallows all page input.
#[derive(Debug, Clone, PartialEq)]
enum Modal {
    Alert(String),
    ConfirmDelete(Uuid),
}

pub struct BuilderPage {
    configs: Vec<AgentConfig>,
    /// Index into `configs`; `None` edits a fresh template.
    selected: Option<usize>,
    buffer: AgentConfig,
    /// One editor per custom tool, parallel to `buffer.custom_tools`.
    editors: Vec<ToolArgumentEditor>,
    focus: Focus,
    modal: Option<Modal>,
    load_error: Option<String>,
}

impl Default for BuilderPage {
    fn default() -> Self {
        Self::new()
    }
}

impl BuilderPage {
    pub fn new() -> Self {
        Self {
            configs: Vec::new(),
            selected: None,
            buffer: AgentConfig::default(),
            editors: Vec::new(),
            focus: Focus::Name,
            modal: None,
            load_error: None,
        }
    }

    pub fn buffer(&self) -> &AgentConfig {
        &self.buffer
    }

    pub fn configs(&self) -> &[AgentConfig] {
        &self.configs
    }

    pub fn has_modal(&self) -> bool {
        self.modal.is_some()
    }

    // Core events

    pub fn on_configs_loaded(&mut self, configs: Vec<AgentConfig>) {
        self.configs = configs;
        self.load_error = None;
    }

    pub fn on_configs_failed(&mut self, error: String) {
        self.load_error = Some(error);
    }

    /// Merge the persisted record: replace by id when present, else append.
    /// The saved record becomes the active selection.
    pub fn on_saved(&mut self, config: AgentConfig) {
        let position = self
            .configs
            .iter()
            .position(|existing| existing.id.is_some() && existing.id == config.id);
        let index = match position {
            Some(index) => {
                self.configs[index] = config.clone();
                index
            }
            None => {
                self.configs.push(config.clone());
                self.configs.len() - 1
            }
        };
        self.selected = Some(index);
        self.replace_buffer(config);
    }

    pub fn on_deleted(&mut self, id: Uuid) {
        self.configs.retain(|config| config.id != Some(id));
        if self.buffer.id == Some(id) {
            self.selected = None;
            self.replace_buffer(AgentConfig::default());
        } else if let Some(selected) = self.selected {
            self.selected = self
                .configs
                .get(selected)
                .map(|_| selected)
                .or_else(|| self.configs.len().checked_sub(1));
        }
    }

    pub fn on_store_failed(&mut self, error: String) {
        self.modal = Some(Modal::Alert(error));
    }

    // Key handling

    pub fn handle_key(&mut self, key: KeyEvent, op_tx: &UnboundedSender<Op>) {
        if self.modal.is_some() {
            self.handle_modal_key(key, op_tx);
            return;
        }

        if key.modifiers.contains(KeyModifiers::CONTROL) {
            match key.code {
                KeyCode::Char('s') => self.save(op_tx),
                KeyCode::Char('d') => self.request_delete(),
                KeyCode::Char('n') => self.select(None),
                KeyCode::Char('t') => self.add_custom_tool(),
                KeyCode::Char('r') => self.remove_focused_tool(),
                KeyCode::Char('e') => self.toggle_focused_tool(),
                KeyCode::Char('a') => self.add_argument_to_focused_tool(),
                KeyCode::Char('x') => self.remove_focused_argument(),
                _ => {}
            }
            return;
        }

        match key.code {
            KeyCode::Tab => self.focus_step(1),
            KeyCode::BackTab => self.focus_step(-1),
            KeyCode::PageDown => self.select_step(1),
            KeyCode::PageUp => self.select_step(-1),
            KeyCode::Left => self.adjust_focused(-1),
            KeyCode::Right => self.adjust_focused(1),
            KeyCode::Char(' ') if self.focus_is_toggle() => self.toggle_focused_flag(),
            KeyCode::Char(c) => self.push_char(c),
            KeyCode::Backspace => self.pop_char(),
            _ => {}
        }
    }

    fn handle_modal_key(&mut self, key: KeyEvent, op_tx: &UnboundedSender<Op>) {
        let modal = match self.modal.clone() {
            Some(modal) => modal,
            None => return,
        };
        match modal {
            Modal::Alert(_) => {
                if matches!(key.code, KeyCode::Enter | KeyCode::Esc) {
                    self.modal = None;
                }
            }
            Modal::ConfirmDelete(id) => match key.code {
                KeyCode::Enter | KeyCode::Char('y') => {
                    let _ = op_tx.send(Op::DeleteAgentConfig { id });
                    self.modal = None;
                }
                KeyCode::Esc | KeyCode::Char('n') => {
                    self.modal = None;
                }
                _ => {}
            },
        }
    }

    // Selection

    /// Load a record (or the fresh template) into the edit buffer.
    pub fn select(&mut self, index: Option<usize>) {
        self.selected = index.filter(|&i| i < self.configs.len());
        let config = match self.selected {
            Some(i) => self.configs[i].clone(),
            None => AgentConfig::default(),
        };
        self.replace_buffer(config);
    }

    fn select_step(&mut self, delta: i64) {
        if self.configs.is_empty() {
            return;
        }
        // The sidebar cycle is: new template, then each record
        let len = self.configs.len() as i64 + 1;
        let current = self.selected.map_or(0, |i| i as i64 + 1);
        let next = (current + delta).rem_euclid(len);
        self.select(if next == 0 { None } else { Some(next as usize - 1) });
    }

    /// External replacement of the buffer rebuilds every tool editor.
    fn replace_buffer(&mut self, config: AgentConfig) {
        self.editors = config
            .custom_tools
            .iter()
            .map(|tool| ToolArgumentEditor::from_arguments(&tool.arguments))
            .collect();
        self.buffer = config;
        self.focus = Focus::Name;
    }

    // Save and delete

    fn save(&mut self, op_tx: &UnboundedSender<Op>) {
        let _ = op_tx.send(Op::SaveAgentConfig {
            config: self.buffer.clone(),
        });
    }

    fn request_delete(&mut self) {
        if let Some(id) = self.buffer.id {
            self.modal = Some(Modal::ConfirmDelete(id));
        }
    }

    // Field mutation

    fn set_provider(&mut self, provider: ModelProvider) {
        if provider != self.buffer.model_provider {
            self.buffer.model_provider = provider;
            self.buffer.model_name = provider.models()[0].to_string();
        }
    }

    fn step_temperature(&mut self, delta: f32) {
        self.buffer.temperature = (self.buffer.temperature + delta).clamp(0.0, 2.0);
    }

    /// Left/Right on enum-like and numeric fields.
    fn adjust_focused(&mut self, direction: i64) {
        match self.focus {
            Focus::Provider => {
                let all = ModelProvider::ALL;
                let current = all
                    .iter()
                    .position(|&p| p == self.buffer.model_provider)
                    .unwrap_or(0) as i64;
                let next = (current + direction).rem_euclid(all.len() as i64) as usize;
                self.set_provider(all[next]);
            }
            Focus::ModelName => {
                let models = self.buffer.model_provider.models();
                let current = models
                    .iter()
                    .position(|&m| m == self.buffer.model_name)
                    .unwrap_or(0) as i64;
                let next = (current + direction).rem_euclid(models.len() as i64) as usize;
                self.buffer.model_name = models[next].to_string();
            }
            Focus::Temperature => self.step_temperature(direction as f32 * 0.1),
            Focus::ArgField {
                tool,
                row,
                field: ArgField::Type,
            } => {
                let all = ArgumentType::ALL;
                let Some(current) = self
                    .editors
                    .get(tool)
                    .and_then(|editor| editor.rows().get(row))
                    .map(|arg| arg.arg_type)
                else {
                    return;
                };
                let index = all.iter().position(|&t| t == current).unwrap_or(0) as i64;
                let next = all[(index + direction).rem_euclid(all.len() as i64) as usize];
                self.apply_argument_edit(tool, |editor| editor.set_arg_type(row, next));
            }
            _ => {}
        }
    }

    fn focus_is_toggle(&self) -> bool {
        matches!(self.focus, Focus::IsActive | Focus::BuiltinTool(_))
    }

    fn toggle_focused_flag(&mut self) {
        match self.focus {
            Focus::IsActive => self.buffer.is_active = !self.buffer.is_active,
            Focus::BuiltinTool(index) => {
                let (id, _) = BUILTIN_TOOLS[index];
                if let Some(pos) = self.buffer.tools.iter().position(|t| t == id) {
                    self.buffer.tools.remove(pos);
                } else {
                    self.buffer.tools.push(id.to_string());
                }
            }
            _ => {}
        }
    }

    fn push_char(&mut self, c: char) {
        match self.focus {
            Focus::ArgField { tool, row, field } => self.edit_arg_text(tool, row, field, Some(c)),
            _ => {
                if let Some(text) = self.focused_text_mut() {
                    text.push(c);
                }
            }
        }
    }

    fn pop_char(&mut self) {
        match self.focus {
            Focus::ArgField { tool, row, field } => self.edit_arg_text(tool, row, field, None),
            _ => {
                if let Some(text) = self.focused_text_mut() {
                    text.pop();
                }
            }
        }
    }

    fn focused_text_mut(&mut self) -> Option<&mut String> {
        match self.focus {
            Focus::Name => Some(&mut self.buffer.name),
            Focus::SystemPrompt => Some(&mut self.buffer.system_prompt),
            Focus::ToolField { tool, field } => {
                let tool = self.buffer.custom_tools.get_mut(tool)?;
                Some(match field {
                    ToolField::Name => &mut tool.name,
                    ToolField::Description => &mut tool.description,
                    ToolField::WebhookUrl => &mut tool.webhook_url,
                    ToolField::AuthHeaderName => {
                        tool.auth_header_name.get_or_insert_with(String::new)
                    }
                    ToolField::AuthHeaderValue => {
                        tool.auth_header_value.get_or_insert_with(String::new)
                    }
                })
            }
            _ => None,
        }
    }

    /// Argument text edits go through the editor so the write-back map and
    /// the echo flag stay correct.
    fn edit_arg_text(&mut self, tool: usize, row: usize, field: ArgField, push: Option<char>) {
        let Some(current) = self
            .editors
            .get(tool)
            .and_then(|editor| editor.rows().get(row))
        else {
            return;
        };
        let mut text = match field {
            ArgField::Name => current.name.clone(),
            ArgField::Description => current.description.clone(),
            ArgField::Type => return,
        };
        match push {
            Some(c) => text.push(c),
            None => {
                text.pop();
            }
        }
        self.apply_argument_edit(tool, |editor| match field {
            ArgField::Name => editor.set_name(row, text),
            ArgField::Description => editor.set_description(row, text),
            ArgField::Type => None,
        });
    }

    /// Run one editor mutation, store the rebuilt map on the tool, and feed
    /// the map back through the sync path (consumed as an echo).
    fn apply_argument_edit<F>(&mut self, tool: usize, mutate: F)
    where
        F: FnOnce(&mut ToolArgumentEditor) -> Option<indexmap::IndexMap<String, omni_protocol::ArgumentSchema>>,
    {
        let Some(editor) = self.editors.get_mut(tool) else {
            return;
        };
        let Some(map) = mutate(editor) else {
            return;
        };
        if let Some(custom) = self.buffer.custom_tools.get_mut(tool) {
            custom.arguments = map;
            editor.sync_from(&custom.arguments);
        }
    }

    // Custom tool structure

    fn add_custom_tool(&mut self) {
        self.buffer.custom_tools.push(CustomTool::template());
        self.editors.push(ToolArgumentEditor::from_arguments(
            &self.buffer.custom_tools[self.buffer.custom_tools.len() - 1].arguments,
        ));
        self.focus = Focus::ToolField {
            tool: self.buffer.custom_tools.len() - 1,
            field: ToolField::Name,
        };
    }

    fn focused_tool(&self) -> Option<usize> {
        match self.focus {
            Focus::ToolField { tool, .. } | Focus::ArgField { tool, .. } => Some(tool),
            _ => None,
        }
    }

    fn remove_focused_tool(&mut self) {
        if let Some(tool) = self.focused_tool() {
            if tool < self.buffer.custom_tools.len() {
                self.buffer.custom_tools.remove(tool);
                self.editors.remove(tool);
                self.focus = Focus::Name;
            }
        }
    }

    fn toggle_focused_tool(&mut self) {
        if let Some(tool) = self.focused_tool() {
            if let Some(editor) = self.editors.get_mut(tool) {
                editor.toggle_expanded();
            }
        }
    }

    fn add_argument_to_focused_tool(&mut self) {
        if let Some(tool) = self.focused_tool() {
            self.apply_argument_edit(tool, |editor| Some(editor.add_row()));
            if let Some(editor) = self.editors.get_mut(tool) {
                if !editor.is_expanded() {
                    editor.toggle_expanded();
                }
                self.focus = Focus::ArgField {
                    tool,
                    row: editor.rows().len() - 1,
                    field: ArgField::Name,
                };
            }
        }
    }

    fn remove_focused_argument(&mut self) {
        if let Focus::ArgField { tool, row, .. } = self.focus {
            self.apply_argument_edit(tool, |editor| editor.remove_row(row));
            self.focus = Focus::ToolField {
                tool,
                field: ToolField::Name,
            };
        }
    }

    // Focus cycle

    /// The full focus order for the current buffer shape. Argument rows
    /// participate only while their tool is expanded.
    fn focus_targets(&self) -> Vec<Focus> {
        let mut targets = vec![
            Focus::Name,
            Focus::SystemPrompt,
            Focus::Provider,
            Focus::ModelName,
            Focus::Temperature,
            Focus::IsActive,
        ];
        for index in 0..BUILTIN_TOOLS.len() {
            targets.push(Focus::BuiltinTool(index));
        }
        for (tool, editor) in self.editors.iter().enumerate() {
            for field in [
                ToolField::Name,
                ToolField::Description,
                ToolField::WebhookUrl,
                ToolField::AuthHeaderName,
                ToolField::AuthHeaderValue,
            ] {
                targets.push(Focus::ToolField { tool, field });
            }
            if editor.is_expanded() {
                for row in 0..editor.rows().len() {
                    for field in [ArgField::Name, ArgField::Type, ArgField::Description] {
                        targets.push(Focus::ArgField { tool, row, field });
                    }
                }
            }
        }
        targets
    }

    fn focus_step(&mut self, delta: i64) {
        let targets = self.focus_targets();
        let current = targets.iter().position(|&f| f == self.focus).unwrap_or(0) as i64;
        let next = (current + delta).rem_euclid(targets.len() as i64) as usize;
        self.focus = targets[next];
    }

    // Rendering

    pub fn render(&self, frame: &mut Frame, area: Rect) {
        let chunks = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([Constraint::Length(28), Constraint::Min(30)])
            .split(area);

        self.render_sidebar(frame, chunks[0]);
        self.render_form(frame, chunks[1]);

        if let Some(modal) = &self.modal {
            self.render_modal(frame, area, modal);
        }
    }

    fn render_sidebar(&self, frame: &mut Frame, area: Rect) {
        let block = Block::default().borders(Borders::ALL).title(" Agents ");

        let mut lines = Vec::new();
        if let Some(error) = &self.load_error {
            lines.push(Line::from(Span::styled(
                format!("load failed: {error}"),
                Style::default().fg(Color::Red),
            )));
        }
        let new_style = if self.selected.is_none() {
            Style::default().fg(Color::Black).bg(Color::Cyan)
        } else {
            Style::default().fg(Color::Cyan)
        };
        lines.push(Line::from(Span::styled("+ New Agent", new_style)));
        for (i, config) in self.configs.iter().enumerate() {
            let style = if self.selected == Some(i) {
                Style::default().fg(Color::Black).bg(Color::Cyan)
            } else {
                Style::default()
            };
            let marker = if config.is_active { "●" } else { "○" };
            lines.push(Line::from(Span::styled(
                format!("{marker} {}", config.name),
                style,
            )));
        }

        frame.render_widget(Paragraph::new(lines).block(block), area);
    }

    fn render_form(&self, frame: &mut Frame, area: Rect) {
        let block = Block::default()
            .borders(Borders::ALL)
            .title(" Agent (^S save, ^D delete, ^T add tool, Tab next field) ");
        let inner = block.inner(area);
        frame.render_widget(block, area);

        let mut lines = vec![
            self.field_line("Name", &self.buffer.name, Focus::Name),
            self.field_line("Prompt", &self.buffer.system_prompt, Focus::SystemPrompt),
            self.field_line(
                "Provider",
                self.buffer.model_provider.label(),
                Focus::Provider,
            ),
            self.field_line("Model", &self.buffer.model_name, Focus::ModelName),
            self.field_line(
                "Temperature",
                &format!("{:.1}", self.buffer.temperature),
                Focus::Temperature,
            ),
            self.field_line(
                "Active",
                if self.buffer.is_active { "yes" } else { "no" },
                Focus::IsActive,
            ),
        ];

        for (i, (id, label)) in BUILTIN_TOOLS.iter().enumerate() {
            let checked = if self.buffer.tools.iter().any(|t| t == id) {
                "[x]"
            } else {
                "[ ]"
            };
            lines.push(self.field_line(
                &format!("{checked} {label}"),
                "",
                Focus::BuiltinTool(i),
            ));
        }

        for (tool, custom) in self.buffer.custom_tools.iter().enumerate() {
            lines.push(Line::from(Span::styled(
                format!("Custom tool #{}", tool + 1),
                Style::default().add_modifier(Modifier::BOLD),
            )));
            let fields = [
                ("  name", custom.name.as_str(), ToolField::Name),
                ("  description", custom.description.as_str(), ToolField::Description),
                ("  webhook", custom.webhook_url.as_str(), ToolField::WebhookUrl),
                (
                    "  auth header",
                    custom.auth_header_name.as_deref().unwrap_or(""),
                    ToolField::AuthHeaderName,
                ),
                (
                    "  auth value",
                    custom.auth_header_value.as_deref().unwrap_or(""),
                    ToolField::AuthHeaderValue,
                ),
            ];
            for (label, value, field) in fields {
                lines.push(self.field_line(label, value, Focus::ToolField { tool, field }));
            }
            // Argument rows follow their tool, focused row highlighted
            if let Some(editor) = self.editors.get(tool) {
                let selected = match self.focus {
                    Focus::ArgField { tool: t, row, .. } if t == tool => Some(row),
                    _ => None,
                };
                lines.extend(editor.lines(selected));
            }
        }

        frame.render_widget(Paragraph::new(lines), inner);
    }

    fn field_line(&self, label: &str, value: &str, focus: Focus) -> Line<'static> {
        let style = if self.focus == focus {
            Style::default().fg(Color::Black).bg(Color::Cyan)
        } else {
            Style::default()
        };
        Line::from(vec![
            Span::styled(format!("{label}: "), style.add_modifier(Modifier::BOLD)),
            Span::styled(value.to_string(), style),
        ])
    }

    fn render_modal(&self, frame: &mut Frame, area: Rect, modal: &Modal) {
        let (title, body) = match modal {
            Modal::Alert(message) => (" Error ", format!("{message}\n\nEnter to dismiss")),
            Modal::ConfirmDelete(_) => (
                " Delete agent ",
                format!(
                    "Delete \"{}\"?\n\nEnter to confirm, Esc to cancel",
                    self.buffer.name
                ),
            ),
        };

        let width = area.width.min(50);
        let height = 6;
        let popup = Rect::new(
            area.x + (area.width.saturating_sub(width)) / 2,
            area.y + (area.height.saturating_sub(height)) / 2,
            width,
            height,
        );

        frame.render_widget(Clear, popup);
        let block = Block::default()
            .borders(Borders::ALL)
            .title(title)
            .style(Style::default().fg(Color::Red));
        frame.render_widget(Paragraph::new(body).block(block), popup);
    }
}
