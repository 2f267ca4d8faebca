//! Dialog manager for handling dialog stack and lifecycle
//!
//! The manager owns the stack of open dialogs, routes input to the
//! topmost one, and renders the stack in z-order with background dimming
//! behind modal dialogs. It never decides *which* dialog to open; that is
//! the flow orchestrator's job.

use super::types::{Dialog, DialogError, DialogId, DialogLayout, DialogResult};
use crate::tui::{components::Component, themes::Theme, Frame};
use anyhow::Result;
use async_trait::async_trait;
use crossterm::event::{KeyEvent, MouseEvent};
use ratatui::layout::Rect;
use std::collections::HashMap;

/// Dialog manager handles the dialog stack and lifecycle
pub struct DialogManager {
    /// Stack of open dialogs (last = topmost)
    dialogs: Vec<Box<dyn Dialog>>,

    /// Map of dialog IDs to their position in the stack
    id_map: HashMap<DialogId, usize>,

    /// Background dimming for modal dialogs
    background_dim: bool,

    /// Last known terminal size
    terminal_size: Rect,
}

impl DialogManager {
    pub fn new() -> Self {
        Self {
            dialogs: Vec::new(),
            id_map: HashMap::new(),
            background_dim: true,
            terminal_size: Rect::default(),
        }
    }

    pub fn set_background_dim(&mut self, enabled: bool) {
        self.background_dim = enabled;
    }

    /// Open a new dialog on top of the stack.
    pub async fn open_dialog(&mut self, mut dialog: Box<dyn Dialog>) -> DialogResult<()> {
        let dialog_id = dialog.id().clone();

        if self.id_map.contains_key(&dialog_id) {
            return Err(DialogError::AlreadyExists(dialog_id));
        }

        dialog.on_open().await?;
        dialog.set_focus(true);

        if let Some(previous) = self.dialogs.last_mut() {
            previous.set_focus(false);
        }

        let index = self.dialogs.len();
        self.dialogs.push(dialog);
        self.id_map.insert(dialog_id, index);

        Ok(())
    }

    /// Close the topmost dialog.
    pub async fn close_top(&mut self) -> DialogResult<()> {
        let Some(dialog) = self.dialogs.last() else {
            return Ok(());
        };
        let dialog_id = dialog.id().clone();
        self.close_dialog_by_id(&dialog_id).await
    }

    /// Close a specific dialog by ID.
    pub async fn close_dialog_by_id(&mut self, dialog_id: &DialogId) -> DialogResult<()> {
        let index = self
            .id_map
            .get(dialog_id)
            .copied()
            .ok_or_else(|| DialogError::NotFound(dialog_id.clone()))?;

        let mut dialog = self.dialogs.remove(index);
        self.id_map.remove(dialog_id);
        for position in self.id_map.values_mut() {
            if *position > index {
                *position -= 1;
            }
        }

        dialog.on_close().await?;

        if let Some(top) = self.dialogs.last_mut() {
            top.set_focus(true);
        }

        Ok(())
    }

    /// Close all dialogs
    pub async fn close_all_dialogs(&mut self) -> DialogResult<()> {
        while !self.dialogs.is_empty() {
            self.close_top().await?;
        }
        Ok(())
    }

    /// Get the currently focused (topmost) dialog
    pub fn focused_dialog(&self) -> Option<&dyn Dialog> {
        self.dialogs.last().map(|dialog| dialog.as_ref())
    }

    /// Get dialog by ID (mutable)
    pub fn get_dialog_mut(&mut self, dialog_id: &DialogId) -> Option<&mut (dyn Dialog + 'static)> {
        if let Some(&idx) = self.id_map.get(dialog_id) {
            self.dialogs.get_mut(idx).map(|dialog| &mut **dialog)
        } else {
            None
        }
    }

    pub fn has_dialogs(&self) -> bool {
        !self.dialogs.is_empty()
    }

    pub fn has_modal_dialogs(&self) -> bool {
        self.dialogs.iter().any(|dialog| dialog.is_modal())
    }

    pub fn dialog_count(&self) -> usize {
        self.dialogs.len()
    }

    pub fn contains(&self, dialog_id: &DialogId) -> bool {
        self.id_map.contains_key(dialog_id)
    }

    pub fn topmost_dialog_id(&self) -> Option<DialogId> {
        self.dialogs.last().map(|dialog| dialog.id().clone())
    }

    fn render_modal_background(&self, frame: &mut Frame, area: Rect, theme: &Theme) {
        use ratatui::{
            style::{Modifier, Style},
            widgets::Block,
        };

        let dim_style = Style::default()
            .bg(theme.bg_overlay)
            .fg(theme.fg_muted)
            .add_modifier(Modifier::DIM);
        frame.render_widget(Block::default().style(dim_style), area);
    }
}

#[async_trait]
impl Component for DialogManager {
    async fn handle_key_event(&mut self, event: KeyEvent) -> Result<()> {
        // The topmost dialog owns the keyboard while the stack is non-empty.
        if let Some(dialog) = self.dialogs.last_mut() {
            if dialog.handle_dialog_key(event).await? {
                return Ok(());
            }
            dialog.handle_key_event(event).await?;
        }
        Ok(())
    }

    async fn handle_mouse_event(&mut self, event: MouseEvent) -> Result<()> {
        if let Some(dialog) = self.dialogs.last_mut() {
            dialog.handle_mouse_event(event).await?;
        }
        Ok(())
    }

    async fn tick(&mut self) -> Result<()> {
        for dialog in &mut self.dialogs {
            dialog.tick().await?;
        }
        Ok(())
    }

    fn render(&mut self, frame: &mut Frame, area: Rect, theme: &Theme) {
        self.terminal_size = area;

        if self.background_dim && self.has_modal_dialogs() {
            self.render_modal_background(frame, area, theme);
        }

        // Stack order already reflects opening order; z_index breaks ties
        // for dialogs configured above their siblings.
        let mut order: Vec<usize> = (0..self.dialogs.len()).collect();
        order.sort_by_key(|&i| self.dialogs[i].config().z_index);

        for index in order {
            let dialog = &mut self.dialogs[index];
            let layout = DialogLayout::calculate(dialog.config(), area);
            dialog.render_chrome(frame, layout.dialog_area, theme);
            dialog.render_content(frame, layout.content_area, theme);
        }
    }

    fn size(&self) -> Rect {
        self.terminal_size
    }

    fn set_size(&mut self, size: Rect) {
        self.terminal_size = size;
        for dialog in &mut self.dialogs {
            dialog.set_size(size);
        }
    }

    fn has_focus(&self) -> bool {
        self.has_dialogs()
    }
}

impl Default for DialogManager {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::super::alert::AlertDialog;
    use super::super::confirm::ConfirmDialog;
    use super::super::progress::ProgressDialog;
    use super::super::types::dialog_ids;
    use super::*;
    use crate::flow::{AlertRequest, ConfirmRequest, ProgressRequest};
    use tokio::sync::mpsc;

    fn confirm_dialog() -> Box<dyn Dialog> {
        let (tx, _rx) = mpsc::unbounded_channel();
        Box::new(ConfirmDialog::new(
            ConfirmRequest::new("Title", "Message"),
            tx,
        ))
    }

    fn alert_dialog() -> Box<dyn Dialog> {
        let (tx, _rx) = mpsc::unbounded_channel();
        Box::new(AlertDialog::new(AlertRequest::new("Title", "Message"), tx))
    }

    #[tokio::test]
    async fn test_open_and_close_by_id() {
        let mut manager = DialogManager::new();
        assert!(!manager.has_dialogs());

        manager.open_dialog(confirm_dialog()).await.unwrap();
        manager.open_dialog(alert_dialog()).await.unwrap();
        assert_eq!(manager.dialog_count(), 2);
        assert_eq!(
            manager.topmost_dialog_id(),
            Some(dialog_ids::alert())
        );

        manager
            .close_dialog_by_id(&dialog_ids::confirm())
            .await
            .unwrap();
        assert_eq!(manager.dialog_count(), 1);
        assert!(manager.contains(&dialog_ids::alert()));
    }

    #[tokio::test]
    async fn test_duplicate_open_is_an_error() {
        let mut manager = DialogManager::new();
        manager.open_dialog(confirm_dialog()).await.unwrap();
        let err = manager.open_dialog(confirm_dialog()).await.unwrap_err();
        assert!(matches!(err, DialogError::AlreadyExists(_)));
    }

    #[tokio::test]
    async fn test_close_missing_dialog_is_not_found() {
        let mut manager = DialogManager::new();
        let err = manager
            .close_dialog_by_id(&dialog_ids::progress())
            .await
            .unwrap_err();
        assert!(matches!(err, DialogError::NotFound(_)));
    }

    #[tokio::test]
    async fn test_get_dialog_mut_reaches_an_open_surface() {
        let mut manager = DialogManager::new();
        let (tx, _rx) = mpsc::unbounded_channel();
        manager
            .open_dialog(Box::new(ProgressDialog::new(
                ProgressRequest::new("Working", "..."),
                tx,
            )))
            .await
            .unwrap();

        let dialog = manager
            .get_dialog_mut(&dialog_ids::progress())
            .expect("open dialog must be reachable by id");
        dialog.update_progress(40);

        assert!(manager.get_dialog_mut(&dialog_ids::alert()).is_none());
    }

    #[tokio::test]
    async fn test_close_all() {
        let mut manager = DialogManager::new();
        manager.open_dialog(confirm_dialog()).await.unwrap();
        manager.open_dialog(alert_dialog()).await.unwrap();
        manager.close_all_dialogs().await.unwrap();
        assert!(!manager.has_dialogs());
    }
}
