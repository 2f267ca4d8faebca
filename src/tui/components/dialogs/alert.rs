//! Alert dialog surface
//!
//! A message with a single OK action. Carries the tutorial's "next"
//! binding and the upload flow's results listing.

use super::types::{dialog_ids, tone_color, Dialog, DialogConfig, DialogSignal, DialogSize, SignalKind};
use crate::flow::AlertRequest;
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
    widgets::{List, ListItem, Paragraph, Wrap},
};
use tokio::sync::mpsc;

pub struct AlertDialog {
    state: ComponentState,
    config: DialogConfig,
    request: AlertRequest,
    signals: mpsc::UnboundedSender<Event>,
}

impl AlertDialog {
    pub fn new(request: AlertRequest, signals: mpsc::UnboundedSender<Event>) -> Self {
        // Grow with the listed items, within reason.
        let height = 8 + (request.items.len().min(8) as u16);
        let config = DialogConfig::new(dialog_ids::alert())
            .with_title(request.title.clone())
            .with_size(DialogSize::Fixed(52, height));

        Self {
            state: ComponentState::new(),
            config,
            request,
            signals,
        }
    }

    fn signal(&self, kind: SignalKind) {
        let _ = self.signals.send(Event::Dialog(DialogSignal {
            source: self.config.id.clone(),
            kind,
        }));
    }

    fn acknowledge(&self) {
        match self.request.next_step {
            Some(step) => self.signal(SignalKind::TutorialNext(step)),
            None => self.signal(SignalKind::Confirmed),
        }
    }
}

#[async_trait]
impl Component for AlertDialog {
    async fn handle_key_event(&mut self, event: KeyEvent) -> Result<()> {
        match event.code {
            KeyCode::Enter | KeyCode::Char(' ') => self.acknowledge(),
            KeyCode::Esc => self.signal(SignalKind::Cancelled),
            _ => {}
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
impl Dialog for AlertDialog {
    fn config(&self) -> &DialogConfig {
        &self.config
    }

    fn render_content(&mut self, frame: &mut Frame, content_area: Rect, theme: &Theme) {
        let list_height = self.request.items.len().min(8) as u16;
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Min(2),
                Constraint::Length(list_height),
                Constraint::Length(1),
            ])
            .split(content_area);

        let message = Paragraph::new(self.request.message.clone())
            .style(Style::default().fg(tone_color(self.request.tone, theme)))
            .alignment(Alignment::Center)
            .wrap(Wrap { trim: true });
        frame.render_widget(message, chunks[0]);

        if !self.request.items.is_empty() {
            let items: Vec<ListItem> = self
                .request
                .items
                .iter()
                .map(|line| {
                    ListItem::new(format!("• {}", line))
                        .style(Style::default().fg(theme.fg_base))
                })
                .collect();
            frame.render_widget(List::new(items), chunks[1]);
        }

        let hint = if self.request.next_step.is_some() {
            "Enter: Next • Esc: Skip tour"
        } else {
            "Enter: OK"
        };
        let help = Paragraph::new(hint)
            .style(Style::default().fg(theme.fg_muted).add_modifier(Modifier::DIM))
            .alignment(Alignment::Center);
        frame.render_widget(help, chunks[2]);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_plain_alert_confirms_on_enter() {
        let (tx, mut rx) = mpsc::unbounded_channel();
        let mut d = AlertDialog::new(AlertRequest::new("Done", "All good"), tx);
        d.handle_key_event(KeyEvent::from(KeyCode::Enter)).await.unwrap();
        let Event::Dialog(signal) = rx.try_recv().unwrap() else {
            panic!("expected dialog signal");
        };
        assert!(matches!(signal.kind, SignalKind::Confirmed));
    }

    #[tokio::test]
    async fn test_tutorial_alert_emits_next_step() {
        let (tx, mut rx) = mpsc::unbounded_channel();
        let request = AlertRequest::new("Step", "Keep going").with_next_step(3);
        let mut d = AlertDialog::new(request, tx);
        d.handle_key_event(KeyEvent::from(KeyCode::Char(' '))).await.unwrap();
        let Event::Dialog(signal) = rx.try_recv().unwrap() else {
            panic!("expected dialog signal");
        };
        assert!(matches!(signal.kind, SignalKind::TutorialNext(3)));
    }
}
