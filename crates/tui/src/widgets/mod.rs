//! Reusable widgets for the Omni-Stack TUI.

pub mod tool_editor;

pub use tool_editor::ToolArgumentEditor;
