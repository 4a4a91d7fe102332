//! Tool-argument editor widget.
//!
//! Edits the argument schema of one custom tool as an ordered list of rows.
//! The durable representation is the tool's ordered `arguments` map; the
//! rows are a view of it. The two stay in sync in both directions:
//!
//! - `sync_from` rebuilds the rows from the map when the map changed
//!   elsewhere (selecting another agent, a saved record coming back).
//! - Every row mutation rebuilds and returns the full map for the parent to
//!   store, and arms a one-shot suppression flag so the editor's own
//!   write-back does not bounce back and reset rows mid-edit.
//!
//! Rows with empty names stay visible (the user is still typing) but are
//! excluded from the map. Duplicate names are not rejected; the later row's
//! schema wins.

use indexmap::IndexMap;
use omni_protocol::{ArgumentSchema, ArgumentType, ToolArgument};
use ratatui::{
    style::{Color, Modifier, Style},
    text::{Line, Span},
};

/// Editor state for one custom tool's argument list.
#[derive(Debug, Clone)]
pub struct ToolArgumentEditor {
    /// Editable rows, in map entry order. Never resorted.
    rows: Vec<ToolArgument>,
    /// Whether the argument list is shown under the tool header.
    expanded: bool,
    /// One-shot flag: the next `sync_from` is an echo of our own write-back.
    suppress_next_sync: bool,
}

impl ToolArgumentEditor {
    /// Build an editor whose rows mirror the given map. Editors start
    /// expanded so a freshly added tool shows its argument rows.
    pub fn from_arguments(arguments: &IndexMap<String, ArgumentSchema>) -> Self {
        Self {
            rows: derive_rows(arguments),
            expanded: true,
            suppress_next_sync: false,
        }
    }

    pub fn rows(&self) -> &[ToolArgument] {
        &self.rows
    }

    pub fn is_expanded(&self) -> bool {
        self.expanded
    }

    pub fn toggle_expanded(&mut self) {
        self.expanded = !self.expanded;
    }

    /// Re-derive rows from the map, unless the change was our own write-back.
    ///
    /// The suppression flag is consumed either way, so a genuinely external
    /// update arriving right after an edit still lands on the next call.
    pub fn sync_from(&mut self, arguments: &IndexMap<String, ArgumentSchema>) {
        if self.suppress_next_sync {
            self.suppress_next_sync = false;
            return;
        }
        self.rows = derive_rows(arguments);
    }

    /// Append a blank row and return the rebuilt map.
    pub fn add_row(&mut self) -> IndexMap<String, ArgumentSchema> {
        self.rows.push(ToolArgument::blank());
        self.write_back()
    }

    /// Remove the row at `index` and return the rebuilt map.
    pub fn remove_row(&mut self, index: usize) -> Option<IndexMap<String, ArgumentSchema>> {
        if index >= self.rows.len() {
            return None;
        }
        self.rows.remove(index);
        Some(self.write_back())
    }

    /// Replace the name of the row at `index` and return the rebuilt map.
    pub fn set_name(
        &mut self,
        index: usize,
        name: String,
    ) -> Option<IndexMap<String, ArgumentSchema>> {
        let row = self.rows.get_mut(index)?;
        row.name = name;
        Some(self.write_back())
    }

    /// Replace the type of the row at `index` and return the rebuilt map.
    pub fn set_arg_type(
        &mut self,
        index: usize,
        arg_type: ArgumentType,
    ) -> Option<IndexMap<String, ArgumentSchema>> {
        let row = self.rows.get_mut(index)?;
        row.arg_type = arg_type;
        Some(self.write_back())
    }

    /// Replace the description of the row at `index` and return the rebuilt map.
    pub fn set_description(
        &mut self,
        index: usize,
        description: String,
    ) -> Option<IndexMap<String, ArgumentSchema>> {
        let row = self.rows.get_mut(index)?;
        row.description = description;
        Some(self.write_back())
    }

    /// Rebuild the map from the rows and arm the echo flag.
    fn write_back(&mut self) -> IndexMap<String, ArgumentSchema> {
        self.suppress_next_sync = true;
        rebuild_map(&self.rows)
    }

    /// One display line per argument row. `selected` highlights one row.
    /// Collapsed editors contribute no lines.
    pub fn lines(&self, selected: Option<usize>) -> Vec<Line<'static>> {
        if !self.expanded {
            return Vec::new();
        }

        self.rows
            .iter()
            .enumerate()
            .map(|(i, row)| {
                let style = if selected == Some(i) {
                    Style::default().fg(Color::Black).bg(Color::Cyan)
                } else {
                    Style::default().fg(Color::White)
                };

                let name = if row.name.is_empty() {
                    Span::styled("(unnamed)", style.add_modifier(Modifier::DIM))
                } else {
                    Span::styled(row.name.clone(), style.add_modifier(Modifier::BOLD))
                };

                Line::from(vec![
                    Span::styled("  • ", style),
                    name,
                    Span::styled(format!(" [{}] ", row.arg_type.label()), style),
                    Span::styled(row.description.clone(), style.fg(Color::Gray)),
                ])
            })
            .collect()
    }

}

/// Map to rows: entry order preserved, schema fields defaulted upstream.
fn derive_rows(arguments: &IndexMap<String, ArgumentSchema>) -> Vec<ToolArgument> {
    arguments
        .iter()
        .map(|(name, schema)| ToolArgument {
            name: name.clone(),
            arg_type: schema.arg_type,
            description: schema.description.clone(),
        })
        .collect()
}

/// Rows to map: empty names excluded, later duplicates overwrite earlier.
fn rebuild_map(rows: &[ToolArgument]) -> IndexMap<String, ArgumentSchema> {
    let mut map = IndexMap::new();
    for row in rows {
        if row.name.is_empty() {
            continue;
        }
        map.insert(
            row.name.clone(),
            ArgumentSchema {
                arg_type: row.arg_type,
                description: row.description.clone(),
            },
        );
    }
    map
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_map() -> IndexMap<String, ArgumentSchema> {
        let mut map = IndexMap::new();
        map.insert(
            "query".to_string(),
            ArgumentSchema {
                arg_type: ArgumentType::String,
                description: "Search query".to_string(),
            },
        );
        map.insert(
            "limit".to_string(),
            ArgumentSchema {
                arg_type: ArgumentType::Integer,
                description: "Max results".to_string(),
            },
        );
        map
    }

    #[test]
    fn rows_mirror_map_entry_order() {
        let editor = ToolArgumentEditor::from_arguments(&sample_map());
        let names: Vec<&str> = editor.rows().iter().map(|r| r.name.as_str()).collect();
        assert_eq!(names, ["query", "limit"]);
        assert_eq!(editor.rows()[1].arg_type, ArgumentType::Integer);
    }

    #[test]
    fn round_trips_when_names_are_unique_and_nonempty() {
        let map = sample_map();
        let rows = derive_rows(&map);
        assert_eq!(rebuild_map(&rows), map);
    }

    #[test]
    fn edit_name_rebuilds_the_map() {
        let mut editor = ToolArgumentEditor::from_arguments(&sample_map());
        let map = editor.set_name(0, "q".to_string()).unwrap();

        let keys: Vec<&str> = map.keys().map(String::as_str).collect();
        assert_eq!(keys, ["q", "limit"]);
        assert_eq!(map["q"].description, "Search query");
    }

    #[test]
    fn empty_name_row_is_visible_but_excluded_from_map() {
        let mut editor = ToolArgumentEditor::from_arguments(&sample_map());
        let map = editor.add_row();

        assert_eq!(editor.rows().len(), 3);
        assert_eq!(editor.rows()[2].name, "");
        assert_eq!(map.len(), 2);
    }

    #[test]
    fn duplicate_name_last_row_wins() {
        let mut editor = ToolArgumentEditor::from_arguments(&sample_map());
        editor.add_row();
        editor.set_description(2, "Overrides the first".to_string());
        let map = editor.set_name(2, "query".to_string()).unwrap();

        assert_eq!(map.len(), 2);
        assert_eq!(map["query"].description, "Overrides the first");
    }

    #[test]
    fn add_then_remove_at_same_index_restores_the_map() {
        let original = sample_map();
        let mut editor = ToolArgumentEditor::from_arguments(&original);

        editor.add_row();
        let restored = editor.remove_row(2).unwrap();

        assert_eq!(restored, original);
        assert_eq!(editor.rows().len(), 2);
    }

    #[test]
    fn echo_suppression_is_one_shot() {
        let mut editor = ToolArgumentEditor::from_arguments(&sample_map());

        // In-progress edit: name cleared while the user retypes it
        let map = editor.set_name(0, String::new()).unwrap();
        assert_eq!(editor.rows().len(), 2);

        // The parent stores the map and the editor sees its own echo:
        // rows must not reset (the blank row would vanish)
        editor.sync_from(&map);
        assert_eq!(editor.rows().len(), 2);
        assert_eq!(editor.rows()[0].name, "");

        // A second sync with the same map is external: rows re-derive
        editor.sync_from(&map);
        assert_eq!(editor.rows().len(), 1);
        assert_eq!(editor.rows()[0].name, "limit");
    }

    #[test]
    fn external_sync_replaces_rows() {
        let mut editor = ToolArgumentEditor::from_arguments(&sample_map());

        let mut other = IndexMap::new();
        other.insert("city".to_string(), ArgumentSchema::default());
        editor.sync_from(&other);

        assert_eq!(editor.rows().len(), 1);
        assert_eq!(editor.rows()[0].name, "city");
        assert_eq!(editor.rows()[0].arg_type, ArgumentType::String);
    }

    #[test]
    fn remove_out_of_bounds_is_rejected() {
        let mut editor = ToolArgumentEditor::from_arguments(&sample_map());
        assert!(editor.remove_row(5).is_none());
        assert_eq!(editor.rows().len(), 2);
    }

    #[test]
    fn new_editor_starts_expanded_and_toggle_flips() {
        let mut editor = ToolArgumentEditor::from_arguments(&sample_map());
        assert!(editor.is_expanded());
        editor.toggle_expanded();
        assert!(!editor.is_expanded());
    }

    #[test]
    fn only_the_selected_row_carries_the_highlight() {
        let editor = ToolArgumentEditor::from_arguments(&sample_map());
        let lines = editor.lines(Some(1));
        assert_eq!(lines[0].spans[0].style.bg, None);
        assert_eq!(lines[1].spans[0].style.bg, Some(Color::Cyan));
    }

    #[test]
    fn collapsed_editor_emits_no_lines() {
        let mut editor = ToolArgumentEditor::from_arguments(&sample_map());
        assert_eq!(editor.lines(None).len(), 2);
        editor.toggle_expanded();
        assert!(editor.lines(None).is_empty());
    }
}
