//! Core dialog types and traits
//!
//! The fundamental pieces of the modal design system: dialog identity,
//! configuration, layout, the `Dialog` trait every surface implements,
//! and the signals surfaces report back with.

use crate::flow::{SelectableItem, Tone};
use crate::tui::{components::Component, themes::Theme, Frame};
use anyhow::Result;
use async_trait::async_trait;
use crossterm::event::KeyEvent;
use ratatui::layout::Rect;
use serde::{Deserialize, Serialize};

/// Unique identifier for dialog instances
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct DialogId(pub String);

impl DialogId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&str> for DialogId {
    fn from(id: &str) -> Self {
        Self(id.to_string())
    }
}

impl std::fmt::Display for DialogId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Fixed IDs for the console's dialog surfaces. One instance of each
/// surface kind is open at most, so the kind doubles as the identity.
pub mod dialog_ids {
    use super::DialogId;

    pub const CONFIRM: &str = "confirm";
    pub const ALERT: &str = "alert";
    pub const PROGRESS: &str = "progress";
    pub const SELECTION: &str = "selection";
    pub const SETTINGS: &str = "settings";
    pub const QUIT: &str = "quit";

    pub fn confirm() -> DialogId {
        DialogId(CONFIRM.to_string())
    }
    pub fn alert() -> DialogId {
        DialogId(ALERT.to_string())
    }
    pub fn progress() -> DialogId {
        DialogId(PROGRESS.to_string())
    }
    pub fn selection() -> DialogId {
        DialogId(SELECTION.to_string())
    }
    pub fn settings() -> DialogId {
        DialogId(SETTINGS.to_string())
    }
    pub fn quit() -> DialogId {
        DialogId(QUIT.to_string())
    }
}

/// Dialog positioning options
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DialogPosition {
    /// Center the dialog in the available area
    #[default]
    Center,
    /// Position at specific coordinates (col, row)
    Fixed(u16, u16),
}

/// Dialog size options
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DialogSize {
    /// Fixed size in characters (width, height)
    Fixed(u16, u16),
    /// Percentage of available area (width_pct, height_pct)
    Percentage(u16, u16),
    /// Full screen
    FullScreen,
}

impl Default for DialogSize {
    fn default() -> Self {
        Self::Fixed(48, 10)
    }
}

/// Dialog configuration options
#[derive(Debug, Clone)]
pub struct DialogConfig {
    pub id: DialogId,
    pub title: Option<String>,
    pub position: DialogPosition,
    pub size: DialogSize,
    /// Whether the dialog blocks interaction with everything beneath it
    pub modal: bool,
    /// Whether the dialog can be dismissed with Escape
    pub closable: bool,
    pub has_border: bool,
    /// Z-index for layering (higher values appear on top)
    pub z_index: i32,
}

impl DialogConfig {
    pub fn new(id: impl Into<DialogId>) -> Self {
        Self {
            id: id.into(),
            title: None,
            position: DialogPosition::default(),
            size: DialogSize::default(),
            modal: true,
            closable: true,
            has_border: true,
            z_index: 100,
        }
    }

    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    pub fn with_position(mut self, position: DialogPosition) -> Self {
        self.position = position;
        self
    }

    pub fn with_size(mut self, size: DialogSize) -> Self {
        self.size = size;
        self
    }

    pub fn modal(mut self, modal: bool) -> Self {
        self.modal = modal;
        self
    }

    pub fn closable(mut self, closable: bool) -> Self {
        self.closable = closable;
        self
    }

    pub fn with_border(mut self, has_border: bool) -> Self {
        self.has_border = has_border;
        self
    }

    pub fn with_z_index(mut self, z_index: i32) -> Self {
        self.z_index = z_index;
        self
    }
}

/// What a dialog surface reports back to the host.
#[derive(Debug, Clone)]
pub struct DialogSignal {
    pub source: DialogId,
    pub kind: SignalKind,
}

#[derive(Debug, Clone)]
pub enum SignalKind {
    /// Positive outcome (Yes / OK / Save)
    Confirmed,
    /// Dismissal (Escape / No)
    Cancelled,
    /// A selection dialog committed its chosen items
    SelectionChanged(Vec<SelectableItem>),
    /// A tutorial alert's "next" action, carrying the step to advance to
    TutorialNext(u32),
    /// The dialog finished closing
    Closed,
}

/// Result type for dialog operations
pub type DialogResult<T> = std::result::Result<T, DialogError>;

/// Dialog-specific error types
#[derive(Debug, thiserror::Error)]
pub enum DialogError {
    #[error("Dialog with ID '{0}' not found")]
    NotFound(DialogId),

    #[error("Dialog with ID '{0}' already exists")]
    AlreadyExists(DialogId),

    #[error("Dialog component error: {0}")]
    ComponentError(#[from] anyhow::Error),
}

/// Core trait for dialog components
#[async_trait]
pub trait Dialog: Component {
    /// Get the dialog's configuration
    fn config(&self) -> &DialogConfig;

    /// Get the dialog's ID
    fn id(&self) -> &DialogId {
        &self.config().id
    }

    /// Check if the dialog is modal
    fn is_modal(&self) -> bool {
        self.config().modal
    }

    /// Check if the dialog can be closed with Escape
    fn is_closable(&self) -> bool {
        self.config().closable
    }

    /// Called when dialog is opened
    async fn on_open(&mut self) -> Result<()> {
        Ok(())
    }

    /// Called when dialog is closed
    async fn on_close(&mut self) -> Result<()> {
        Ok(())
    }

    /// Push a progress value into the dialog; only the progress surface
    /// does anything with it.
    fn update_progress(&mut self, value: u16) {
        let _ = value;
    }

    /// Render dialog content (without border/chrome)
    fn render_content(&mut self, frame: &mut Frame, content_area: Rect, theme: &Theme);

    /// Render dialog border and title
    fn render_chrome(&mut self, frame: &mut Frame, area: Rect, theme: &Theme) {
        if !self.config().has_border {
            return;
        }

        use ratatui::{
            style::Style,
            widgets::{Block, Borders, Clear},
        };

        frame.render_widget(Clear, area);
        let mut block = Block::default()
            .borders(Borders::ALL)
            .style(Style::default().fg(theme.border_focus).bg(theme.bg_base));
        if let Some(title) = &self.config().title {
            block = block.title(format!(" {} ", title));
        }
        frame.render_widget(block, area);
    }

    /// First chance at key events; return true when handled
    async fn handle_dialog_key(&mut self, key: KeyEvent) -> Result<bool> {
        let _ = key;
        Ok(false)
    }
}

/// Map a tone onto the theme's status palette.
pub fn tone_color(tone: Tone, theme: &Theme) -> ratatui::style::Color {
    match tone {
        Tone::Info => theme.info,
        Tone::Success => theme.success,
        Tone::Warning => theme.warning,
        Tone::Danger => theme.error,
    }
}

/// Helper struct for dialog layout calculations
#[derive(Debug, Clone)]
pub struct DialogLayout {
    /// Dialog area (including border)
    pub dialog_area: Rect,
    /// Content area (excluding border)
    pub content_area: Rect,
}

impl DialogLayout {
    pub fn calculate(config: &DialogConfig, available_area: Rect) -> Self {
        let (width, height) = match config.size {
            DialogSize::Fixed(w, h) => (
                w.min(available_area.width),
                h.min(available_area.height),
            ),
            DialogSize::Percentage(w_pct, h_pct) => (
                (available_area.width as u32 * w_pct as u32 / 100) as u16,
                (available_area.height as u32 * h_pct as u32 / 100) as u16,
            ),
            DialogSize::FullScreen => (available_area.width, available_area.height),
        };

        let (x, y) = match config.position {
            DialogPosition::Center => (
                available_area.x + (available_area.width.saturating_sub(width)) / 2,
                available_area.y + (available_area.height.saturating_sub(height)) / 2,
            ),
            DialogPosition::Fixed(x, y) => (
                available_area.x + x.min(available_area.width.saturating_sub(width)),
                available_area.y + y.min(available_area.height.saturating_sub(height)),
            ),
        };

        let dialog_area = Rect {
            x,
            y,
            width,
            height,
        };

        let content_area = if config.has_border {
            Rect {
                x: dialog_area.x + 1,
                y: dialog_area.y + 1,
                width: dialog_area.width.saturating_sub(2),
                height: dialog_area.height.saturating_sub(2),
            }
        } else {
            dialog_area
        };

        Self {
            dialog_area,
            content_area,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn area() -> Rect {
        Rect::new(0, 0, 100, 40)
    }

    #[test]
    fn test_centered_fixed_layout() {
        let config = DialogConfig::new("confirm").with_size(DialogSize::Fixed(40, 10));
        let layout = DialogLayout::calculate(&config, area());
        assert_eq!(layout.dialog_area, Rect::new(30, 15, 40, 10));
        assert_eq!(layout.content_area, Rect::new(31, 16, 38, 8));
    }

    #[test]
    fn test_fullscreen_layout_fills_area() {
        let config = DialogConfig::new("settings").with_size(DialogSize::FullScreen);
        let layout = DialogLayout::calculate(&config, area());
        assert_eq!(layout.dialog_area, area());
    }

    #[test]
    fn test_fixed_size_clamped_to_available_area() {
        let config = DialogConfig::new("alert").with_size(DialogSize::Fixed(200, 90));
        let layout = DialogLayout::calculate(&config, area());
        assert_eq!(layout.dialog_area.width, 100);
        assert_eq!(layout.dialog_area.height, 40);
    }

    #[test]
    fn test_percentage_layout() {
        let config = DialogConfig::new("selection").with_size(DialogSize::Percentage(50, 50));
        let layout = DialogLayout::calculate(&config, area());
        assert_eq!(layout.dialog_area.width, 50);
        assert_eq!(layout.dialog_area.height, 20);
    }
}
