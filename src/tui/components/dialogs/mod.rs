//! Dialog system for modal UI components
//!
//! A stack-based dialog manager plus the five interchangeable surface
//! types the flow orchestrator drives: confirmation, alert, progress,
//! item-selection, and the tabbed settings panel.

pub mod alert;
pub mod confirm;
pub mod manager;
pub mod progress;
pub mod selection;
pub mod settings;
pub mod types;

pub use alert::AlertDialog;
pub use confirm::ConfirmDialog;
pub use manager::DialogManager;
pub use progress::ProgressDialog;
pub use selection::SelectionDialog;
pub use settings::SettingsDialog;
pub use types::*;
