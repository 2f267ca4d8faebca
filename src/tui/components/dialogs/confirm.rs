//! Confirmation dialog surface
//!
//! A yes/no question with keyboard navigation. Used by the flows for
//! every guarded step and standalone for the quit prompt.

use super::types::{dialog_ids, tone_color, Dialog, DialogConfig, DialogId, DialogSignal, DialogSize, SignalKind};
use crate::flow::ConfirmRequest;
use crate::tui::{
    components::{Component, ComponentState},
    events::Event,
    themes::Theme,
    Frame,
};
use anyhow::Result;
use async_trait::async_trait;
use crossterm::event::{KeyCode, KeyEvent, MouseEvent};
use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Modifier, Style},
    widgets::{Block, Borders, Paragraph, Wrap},
};
use tokio::sync::mpsc;

/// Confirmation dialog with confirm/cancel buttons
pub struct ConfirmDialog {
    state: ComponentState,
    config: DialogConfig,
    request: ConfirmRequest,
    /// Currently selected button (true = confirm)
    selected_confirm: bool,
    signals: mpsc::UnboundedSender<Event>,
}

impl ConfirmDialog {
    pub fn new(request: ConfirmRequest, signals: mpsc::UnboundedSender<Event>) -> Self {
        Self::with_id(dialog_ids::confirm(), request, signals)
    }

    /// Same surface under a different identity (the quit prompt).
    pub fn with_id(
        id: DialogId,
        request: ConfirmRequest,
        signals: mpsc::UnboundedSender<Event>,
    ) -> Self {
        let config = DialogConfig::new(id)
            .with_title(request.title.clone())
            .with_size(DialogSize::Fixed(48, 9));

        Self {
            state: ComponentState::new(),
            config,
            request,
            // Default to the safe answer.
            selected_confirm: false,
            signals,
        }
    }

    fn toggle_selection(&mut self) {
        self.selected_confirm = !self.selected_confirm;
    }

    fn signal(&self, kind: SignalKind) {
        let _ = self.signals.send(Event::Dialog(DialogSignal {
            source: self.config.id.clone(),
            kind,
        }));
    }

    fn submit(&self) {
        if self.selected_confirm {
            self.signal(SignalKind::Confirmed);
        } else {
            self.signal(SignalKind::Cancelled);
        }
    }

    fn render_buttons(&self, frame: &mut Frame, area: Rect, theme: &Theme) {
        let button_layout = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([Constraint::Percentage(50), Constraint::Percentage(50)])
            .split(area);

        let active = Style::default()
            .bg(tone_color(self.request.tone, theme))
            .fg(theme.fg_selected)
            .add_modifier(Modifier::BOLD);
        let inactive = Style::default().bg(theme.bg_subtle).fg(theme.fg_base);

        let confirm_button = Paragraph::new(format!(" {} ", self.request.confirm_label))
            .style(if self.selected_confirm { active } else { inactive })
            .alignment(Alignment::Center)
            .block(Block::default().borders(Borders::ALL));
        frame.render_widget(confirm_button, button_layout[0]);

        let cancel_button = Paragraph::new(format!(" {} ", self.request.cancel_label))
            .style(if self.selected_confirm { inactive } else { active })
            .alignment(Alignment::Center)
            .block(Block::default().borders(Borders::ALL));
        frame.render_widget(cancel_button, button_layout[1]);
    }
}

#[async_trait]
impl Component for ConfirmDialog {
    async fn handle_key_event(&mut self, event: KeyEvent) -> Result<()> {
        match event.code {
            KeyCode::Left | KeyCode::Right | KeyCode::Tab => self.toggle_selection(),
            KeyCode::Enter | KeyCode::Char(' ') => self.submit(),
            KeyCode::Char('y') | KeyCode::Char('Y') => {
                self.selected_confirm = true;
                self.submit();
            }
            KeyCode::Char('n') | KeyCode::Char('N') => {
                self.selected_confirm = false;
                self.submit();
            }
            KeyCode::Esc => self.signal(SignalKind::Cancelled),
            _ => {}
        }
        Ok(())
    }

    async fn handle_mouse_event(&mut self, _event: MouseEvent) -> Result<()> {
        Ok(())
    }

    fn render(&mut self, frame: &mut Frame, area: Rect, theme: &Theme) {
        self.render_content(frame, area, theme);
    }

    fn size(&self) -> Rect {
        self.state.size
    }

    fn set_size(&mut self, size: Rect) {
        self.state.size = size;
    }

    fn has_focus(&self) -> bool {
        self.state.has_focus
    }

    fn set_focus(&mut self, focus: bool) {
        self.state.has_focus = focus;
    }
}

#[async_trait]
impl Dialog for ConfirmDialog {
    fn config(&self) -> &DialogConfig {
        &self.config
    }

    fn render_content(&mut self, frame: &mut Frame, content_area: Rect, theme: &Theme) {
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Min(2),    // Question
                Constraint::Length(3), // Buttons
                Constraint::Length(1), // Help line
            ])
            .split(content_area);

        let question = Paragraph::new(self.request.message.clone())
            .style(Style::default().fg(theme.fg_base))
            .alignment(Alignment::Center)
            .wrap(Wrap { trim: true });
        frame.render_widget(question, chunks[0]);

        self.render_buttons(frame, chunks[1], theme);

        let help = Paragraph::new("←/→: Select • Enter: Confirm • Y/N: Direct • Esc: Cancel")
            .style(Style::default().fg(theme.fg_muted).add_modifier(Modifier::DIM))
            .alignment(Alignment::Center);
        frame.render_widget(help, chunks[2]);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tui::components::dialogs::SignalKind;

    fn dialog() -> (ConfirmDialog, mpsc::UnboundedReceiver<Event>) {
        let (tx, rx) = mpsc::unbounded_channel();
        (
            ConfirmDialog::new(ConfirmRequest::new("Delete", "Really?"), tx),
            rx,
        )
    }

    #[tokio::test]
    async fn test_enter_on_default_selection_cancels() {
        let (mut d, mut rx) = dialog();
        d.handle_key_event(KeyEvent::from(KeyCode::Enter)).await.unwrap();
        let Event::Dialog(signal) = rx.try_recv().unwrap() else {
            panic!("expected dialog signal");
        };
        assert!(matches!(signal.kind, SignalKind::Cancelled));
    }

    #[tokio::test]
    async fn test_y_shortcut_confirms() {
        let (mut d, mut rx) = dialog();
        d.handle_key_event(KeyEvent::from(KeyCode::Char('y'))).await.unwrap();
        let Event::Dialog(signal) = rx.try_recv().unwrap() else {
            panic!("expected dialog signal");
        };
        assert!(matches!(signal.kind, SignalKind::Confirmed));
        assert_eq!(signal.source, dialog_ids::confirm());
    }

    #[tokio::test]
    async fn test_toggle_then_enter_confirms() {
        let (mut d, mut rx) = dialog();
        d.handle_key_event(KeyEvent::from(KeyCode::Tab)).await.unwrap();
        d.handle_key_event(KeyEvent::from(KeyCode::Enter)).await.unwrap();
        let Event::Dialog(signal) = rx.try_recv().unwrap() else {
            panic!("expected dialog signal");
        };
        assert!(matches!(signal.kind, SignalKind::Confirmed));
    }
}
