//! Tabbed settings panel surface
//!
//! Used in two shapes: the centered settings flow panel and the
//! fullscreen record editor. Field values here are mocked; the console
//! has no persistence layer.

use super::types::{dialog_ids, Dialog, DialogConfig, DialogSignal, DialogSize, SignalKind};
use crate::flow::SettingsRequest;
use crate::tui::{
    components::{Component, ComponentState},
    events::Event,
    themes::Theme,
    Frame,
};
use anyhow::Result;
use async_trait::async_trait;
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Modifier, Style},
    widgets::{List, ListItem, Paragraph, Tabs},
};
use tokio::sync::mpsc;

pub struct SettingsDialog {
    state: ComponentState,
    config: DialogConfig,
    request: SettingsRequest,
    active_tab: usize,
    signals: mpsc::UnboundedSender<Event>,
}

impl SettingsDialog {
    pub fn new(request: SettingsRequest, signals: mpsc::UnboundedSender<Event>) -> Self {
        let size = if request.fullscreen {
            DialogSize::FullScreen
        } else {
            DialogSize::Percentage(70, 70)
        };
        let config = DialogConfig::new(dialog_ids::settings())
            .with_title(request.title.clone())
            .with_size(size);

        Self {
            state: ComponentState::new(),
            config,
            request,
            active_tab: 0,
            signals,
        }
    }

    fn signal(&self, kind: SignalKind) {
        let _ = self.signals.send(Event::Dialog(DialogSignal {
            source: self.config.id.clone(),
            kind,
        }));
    }

    fn next_tab(&mut self) {
        if !self.request.tabs.is_empty() {
            self.active_tab = (self.active_tab + 1) % self.request.tabs.len();
        }
    }

    fn previous_tab(&mut self) {
        if !self.request.tabs.is_empty() {
            self.active_tab =
                (self.active_tab + self.request.tabs.len() - 1) % self.request.tabs.len();
        }
    }

    /// Mock field listing for the active tab.
    fn fields(&self) -> Vec<(String, String)> {
        let tab = self
            .request
            .tabs
            .get(self.active_tab)
            .map(String::as_str)
            .unwrap_or("");
        match tab {
            "General" => vec![
                ("Console name".to_string(), "Registration desk".to_string()),
                ("Language".to_string(), "English".to_string()),
                ("Theme".to_string(), "dark".to_string()),
            ],
            "Registration" => vec![
                ("Waitlist limit".to_string(), "25".to_string()),
                ("Auto-approve renewals".to_string(), "yes".to_string()),
            ],
            "Notifications" => vec![
                ("Email digests".to_string(), "daily".to_string()),
                ("Reminder lead time".to_string(), "48h".to_string()),
            ],
            "Details" => vec![
                ("Name".to_string(), "Ada Lindqvist".to_string()),
                ("Course".to_string(), "Defensive driving".to_string()),
                ("Status".to_string(), "confirmed".to_string()),
            ],
            "Schedule" => vec![
                ("First session".to_string(), "May 12, 09:00".to_string()),
                ("Instructor".to_string(), "K. Virtanen".to_string()),
            ],
            "Documents" => vec![
                ("Licence copy".to_string(), "uploaded".to_string()),
                ("Medical certificate".to_string(), "missing".to_string()),
            ],
            _ => Vec::new(),
        }
    }
}

#[async_trait]
impl Component for SettingsDialog {
    async fn handle_key_event(&mut self, event: KeyEvent) -> Result<()> {
        match (event.code, event.modifiers) {
            (KeyCode::Tab | KeyCode::Right, _) => self.next_tab(),
            (KeyCode::BackTab | KeyCode::Left, _) => self.previous_tab(),
            (KeyCode::Char('s'), KeyModifiers::CONTROL) | (KeyCode::Enter, _) => {
                self.signal(SignalKind::Confirmed)
            }
            (KeyCode::Esc, _) => self.signal(SignalKind::Cancelled),
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
impl Dialog for SettingsDialog {
    fn config(&self) -> &DialogConfig {
        &self.config
    }

    fn render_content(&mut self, frame: &mut Frame, content_area: Rect, theme: &Theme) {
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(2),
                Constraint::Min(3),
                Constraint::Length(1),
            ])
            .split(content_area);

        let tabs = Tabs::new(self.request.tabs.clone())
            .select(self.active_tab)
            .style(Style::default().fg(theme.fg_muted))
            .highlight_style(
                Style::default()
                    .fg(theme.primary)
                    .add_modifier(Modifier::BOLD),
            );
        frame.render_widget(tabs, chunks[0]);

        let rows: Vec<ListItem> = self
            .fields()
            .into_iter()
            .map(|(name, value)| {
                ListItem::new(format!("{:<24} {}", name, value))
                    .style(Style::default().fg(theme.fg_base))
            })
            .collect();
        frame.render_widget(List::new(rows), chunks[1]);

        let help = Paragraph::new("Tab: Switch tab • Enter/Ctrl+S: Save • Esc: Cancel")
            .style(Style::default().fg(theme.fg_muted).add_modifier(Modifier::DIM))
            .alignment(Alignment::Center);
        frame.render_widget(help, chunks[2]);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn request() -> SettingsRequest {
        SettingsRequest::new(
            "Console settings",
            vec![
                "General".to_string(),
                "Registration".to_string(),
                "Notifications".to_string(),
            ],
        )
    }

    #[tokio::test]
    async fn test_tab_cycling_wraps() {
        let (tx, _rx) = mpsc::unbounded_channel();
        let mut d = SettingsDialog::new(request(), tx);
        assert_eq!(d.active_tab, 0);
        d.handle_key_event(KeyEvent::from(KeyCode::Tab)).await.unwrap();
        assert_eq!(d.active_tab, 1);
        d.handle_key_event(KeyEvent::from(KeyCode::BackTab)).await.unwrap();
        d.handle_key_event(KeyEvent::from(KeyCode::BackTab)).await.unwrap();
        assert_eq!(d.active_tab, 2);
    }

    #[tokio::test]
    async fn test_save_emits_confirmed() {
        let (tx, mut rx) = mpsc::unbounded_channel();
        let mut d = SettingsDialog::new(request(), tx);
        d.handle_key_event(KeyEvent::from(KeyCode::Enter)).await.unwrap();
        let Event::Dialog(signal) = rx.try_recv().unwrap() else {
            panic!("expected dialog signal");
        };
        assert!(matches!(signal.kind, SignalKind::Confirmed));
    }

    #[test]
    fn test_fullscreen_request_uses_fullscreen_size() {
        let (tx, _rx) = mpsc::unbounded_channel();
        let d = SettingsDialog::new(
            SettingsRequest::new("Edit", vec!["Details".to_string()]).fullscreen(),
            tx,
        );
        assert_eq!(d.config.size, DialogSize::FullScreen);
    }
}
