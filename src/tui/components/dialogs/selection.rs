//! Item-selection dialog surface
//!
//! A multi-select list: space toggles, enter commits the chosen items as
//! a `SelectionChanged` signal. The cursor and checked set are internal
//! widget state the orchestrator never sees.

use super::types::{dialog_ids, Dialog, DialogConfig, DialogSignal, DialogSize, SignalKind};
use crate::flow::{SelectableItem, SelectionRequest};
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
    widgets::{List, ListItem, ListState, Paragraph},
};
use std::collections::HashSet;
use tokio::sync::mpsc;

pub struct SelectionDialog {
    state: ComponentState,
    config: DialogConfig,
    request: SelectionRequest,
    list_state: ListState,
    checked: HashSet<usize>,
    signals: mpsc::UnboundedSender<Event>,
}

impl SelectionDialog {
    pub fn new(request: SelectionRequest, signals: mpsc::UnboundedSender<Event>) -> Self {
        let config = DialogConfig::new(dialog_ids::selection())
            .with_title(request.title.clone())
            .with_size(DialogSize::Percentage(60, 70));

        let mut list_state = ListState::default();
        if !request.items.is_empty() {
            list_state.select(Some(0));
        }

        Self {
            state: ComponentState::new(),
            config,
            request,
            list_state,
            checked: HashSet::new(),
            signals,
        }
    }

    fn signal(&self, kind: SignalKind) {
        let _ = self.signals.send(Event::Dialog(DialogSignal {
            source: self.config.id.clone(),
            kind,
        }));
    }

    fn move_cursor(&mut self, delta: i32) {
        let len = self.request.items.len();
        if len == 0 {
            return;
        }
        let current = self.list_state.selected().unwrap_or(0) as i32;
        let next = (current + delta).rem_euclid(len as i32) as usize;
        self.list_state.select(Some(next));
    }

    fn toggle_current(&mut self) {
        if let Some(index) = self.list_state.selected() {
            if !self.checked.remove(&index) {
                self.checked.insert(index);
            }
        }
    }

    fn toggle_all(&mut self) {
        if self.checked.len() == self.request.items.len() {
            self.checked.clear();
        } else {
            self.checked = (0..self.request.items.len()).collect();
        }
    }

    fn chosen_items(&self) -> Vec<SelectableItem> {
        let mut indices: Vec<usize> = self.checked.iter().copied().collect();
        indices.sort_unstable();
        indices
            .into_iter()
            .filter_map(|i| self.request.items.get(i).cloned())
            .collect()
    }

    fn commit(&self) {
        self.signal(SignalKind::SelectionChanged(self.chosen_items()));
    }
}

#[async_trait]
impl Component for SelectionDialog {
    async fn handle_key_event(&mut self, event: KeyEvent) -> Result<()> {
        match event.code {
            KeyCode::Up | KeyCode::Char('k') => self.move_cursor(-1),
            KeyCode::Down | KeyCode::Char('j') => self.move_cursor(1),
            KeyCode::Char(' ') => self.toggle_current(),
            KeyCode::Char('a') => self.toggle_all(),
            KeyCode::Enter => self.commit(),
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
impl Dialog for SelectionDialog {
    fn config(&self) -> &DialogConfig {
        &self.config
    }

    fn render_content(&mut self, frame: &mut Frame, content_area: Rect, theme: &Theme) {
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(1),
                Constraint::Min(3),
                Constraint::Length(1),
            ])
            .split(content_area);

        let prompt = Paragraph::new(self.request.prompt.clone())
            .style(Style::default().fg(theme.fg_muted))
            .alignment(Alignment::Left);
        frame.render_widget(prompt, chunks[0]);

        let items: Vec<ListItem> = self
            .request
            .items
            .iter()
            .enumerate()
            .map(|(index, item)| {
                let marker = if self.checked.contains(&index) { "[x]" } else { "[ ]" };
                let line = match &item.detail {
                    Some(detail) => format!("{} {}  ({})", marker, item.label, detail),
                    None => format!("{} {}", marker, item.label),
                };
                ListItem::new(line).style(Style::default().fg(theme.fg_base))
            })
            .collect();

        let list = List::new(items)
            .highlight_style(
                Style::default()
                    .bg(theme.primary)
                    .fg(theme.fg_selected)
                    .add_modifier(Modifier::BOLD),
            )
            .highlight_symbol("> ");
        frame.render_stateful_widget(list, chunks[1], &mut self.list_state);

        let help = Paragraph::new(format!(
            "Space: Toggle • a: All • Enter: Use {} selected • Esc: Cancel",
            self.checked.len()
        ))
        .style(Style::default().fg(theme.fg_muted).add_modifier(Modifier::DIM))
        .alignment(Alignment::Center);
        frame.render_widget(help, chunks[2]);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn request(n: usize) -> SelectionRequest {
        SelectionRequest::new("Pick", "Pick items").with_items(
            (0..n)
                .map(|i| SelectableItem::new(format!("item {}", i)))
                .collect(),
        )
    }

    #[tokio::test]
    async fn test_toggle_and_commit_reports_chosen_items() {
        let (tx, mut rx) = mpsc::unbounded_channel();
        let mut d = SelectionDialog::new(request(3), tx);
        d.handle_key_event(KeyEvent::from(KeyCode::Char(' '))).await.unwrap();
        d.handle_key_event(KeyEvent::from(KeyCode::Down)).await.unwrap();
        d.handle_key_event(KeyEvent::from(KeyCode::Char(' '))).await.unwrap();
        d.handle_key_event(KeyEvent::from(KeyCode::Enter)).await.unwrap();

        let Event::Dialog(signal) = rx.try_recv().unwrap() else {
            panic!("expected dialog signal");
        };
        let SignalKind::SelectionChanged(items) = signal.kind else {
            panic!("expected selection change");
        };
        assert_eq!(items.len(), 2);
        assert_eq!(items[0].label, "item 0");
        assert_eq!(items[1].label, "item 1");
    }

    #[tokio::test]
    async fn test_toggle_all_then_commit() {
        let (tx, mut rx) = mpsc::unbounded_channel();
        let mut d = SelectionDialog::new(request(4), tx);
        d.handle_key_event(KeyEvent::from(KeyCode::Char('a'))).await.unwrap();
        d.handle_key_event(KeyEvent::from(KeyCode::Enter)).await.unwrap();

        let Event::Dialog(signal) = rx.try_recv().unwrap() else {
            panic!("expected dialog signal");
        };
        let SignalKind::SelectionChanged(items) = signal.kind else {
            panic!("expected selection change");
        };
        assert_eq!(items.len(), 4);
    }

    #[tokio::test]
    async fn test_cursor_wraps_around() {
        let (tx, _rx) = mpsc::unbounded_channel();
        let mut d = SelectionDialog::new(request(2), tx);
        d.handle_key_event(KeyEvent::from(KeyCode::Up)).await.unwrap();
        assert_eq!(d.list_state.selected(), Some(1));
    }
}
