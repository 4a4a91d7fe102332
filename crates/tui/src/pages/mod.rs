//! Pages of the Omni-Stack TUI.
//!
//! Each page owns its state and key handling; the app routes core events
//! and keyboard input to the active page. The voice overlay is not a page:
//! it floats over whichever page is active.

pub mod builder;
pub mod chat;
pub mod dashboard;
pub mod voice;

pub use builder::BuilderPage;
pub use chat::ChatPage;
pub use dashboard::DashboardPage;
pub use voice::VoiceOverlay;
