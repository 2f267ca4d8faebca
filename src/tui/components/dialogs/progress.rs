//! Progress dialog surface
//!
//! Shows a gauge driven by the orchestrator's `UpdateProgress` commands.
//! The surface holds only the displayed value; pacing and completion
//! live in the operation runner.

use super::types::{dialog_ids, Dialog, DialogConfig, DialogSignal, DialogSize, SignalKind};
use crate::flow::ProgressRequest;
use crate::tui::{
    components::{Component, ComponentState},
    events::Event,
    themes::Theme,
    Frame,
};
use anyhow::Result;
use async_trait::async_trait;
use crossterm::event::{KeyCode, KeyEvent};
use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Modifier, Style},
    widgets::{Gauge, Paragraph},
};
use tokio::sync::mpsc;

pub struct ProgressDialog {
    state: ComponentState,
    config: DialogConfig,
    request: ProgressRequest,
    value: u16,
    signals: mpsc::UnboundedSender<Event>,
}

impl ProgressDialog {
    pub fn new(request: ProgressRequest, signals: mpsc::UnboundedSender<Event>) -> Self {
        let config = DialogConfig::new(dialog_ids::progress())
            .with_title(request.title.clone())
            .with_size(DialogSize::Fixed(50, 8));

        Self {
            state: ComponentState::new(),
            config,
            request,
            value: 0,
            signals,
        }
    }

    pub fn value(&self) -> u16 {
        self.value
    }

    fn signal(&self, kind: SignalKind) {
        let _ = self.signals.send(Event::Dialog(DialogSignal {
            source: self.config.id.clone(),
            kind,
        }));
    }
}

#[async_trait]
impl Component for ProgressDialog {
    async fn handle_key_event(&mut self, event: KeyEvent) -> Result<()> {
        // The only interaction is abandoning the operation.
        if event.code == KeyCode::Esc {
            self.signal(SignalKind::Cancelled);
        }
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
impl Dialog for ProgressDialog {
    fn config(&self) -> &DialogConfig {
        &self.config
    }

    fn update_progress(&mut self, value: u16) {
        self.value = value.min(100);
    }

    fn render_content(&mut self, frame: &mut Frame, content_area: Rect, theme: &Theme) {
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(2),
                Constraint::Length(1),
                Constraint::Length(1),
                Constraint::Length(1),
            ])
            .split(content_area);

        let message = match self.request.total_items {
            Some(total) => format!("{} ({} item(s))", self.request.message, total),
            None => self.request.message.clone(),
        };
        let label = Paragraph::new(message)
            .style(Style::default().fg(theme.fg_base))
            .alignment(Alignment::Center);
        frame.render_widget(label, chunks[0]);

        let gauge = Gauge::default()
            .gauge_style(Style::default().fg(theme.primary).bg(theme.bg_subtle))
            .percent(self.value)
            .label(format!("{}%", self.value));
        frame.render_widget(gauge, chunks[1]);

        let help = Paragraph::new("Esc: Cancel")
            .style(Style::default().fg(theme.fg_muted).add_modifier(Modifier::DIM))
            .alignment(Alignment::Center);
        frame.render_widget(help, chunks[3]);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_update_progress_clamps_to_one_hundred() {
        let (tx, _rx) = mpsc::unbounded_channel();
        let mut d = ProgressDialog::new(ProgressRequest::new("Working", "..."), tx);
        assert_eq!(d.value(), 0);
        d.update_progress(42);
        assert_eq!(d.value(), 42);
        d.update_progress(250);
        assert_eq!(d.value(), 100);
    }

    #[tokio::test]
    async fn test_escape_requests_cancellation() {
        let (tx, mut rx) = mpsc::unbounded_channel();
        let mut d = ProgressDialog::new(ProgressRequest::new("Working", "..."), tx);
        d.handle_key_event(KeyEvent::from(KeyCode::Esc)).await.unwrap();
        let Event::Dialog(signal) = rx.try_recv().unwrap() else {
            panic!("expected dialog signal");
        };
        assert!(matches!(signal.kind, SignalKind::Cancelled));
    }
}
