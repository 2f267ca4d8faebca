//! The admin console host page
//!
//! Wires keyboard shortcuts to flow starts, applies the orchestrator's
//! dialog commands to the dialog manager, forwards dialog signals back,
//! and renders the outcome log (the result sink). All decisions live in
//! `crate::flow`; this file is view glue.

use crate::config::Config;
use crate::flow::{
    ConfirmRequest, DialogCommand, FlowId, FlowOrchestrator, FlowOutcome, ImmediateRunner,
    OperationEvent, OperationRunner, SurfaceKind, TimerRunner, Tone,
};
use crate::tui::{
    components::{
        dialogs::{
            dialog_ids, AlertDialog, ConfirmDialog, DialogError, DialogId, DialogManager,
            DialogSignal, ProgressDialog, SelectionDialog, SettingsDialog, SignalKind,
        },
        Component,
    },
    events::Event,
    themes::Theme,
    Frame,
};
use anyhow::Result;
use chrono::{DateTime, Local};
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, List, ListItem, Paragraph},
};
use std::sync::Arc;
use tokio::sync::mpsc;
use tracing::{debug, warn};

/// Main application state
pub struct App {
    theme: Theme,
    manager: DialogManager,
    orchestrator: FlowOrchestrator,
    commands_rx: mpsc::UnboundedReceiver<DialogCommand>,
    outcomes_rx: mpsc::UnboundedReceiver<FlowOutcome>,
    operations_rx: mpsc::UnboundedReceiver<OperationEvent>,
    /// Sender handed to every dialog surface
    signals: mpsc::UnboundedSender<Event>,
    /// The result sink: reported outcomes, newest last
    outcome_log: Vec<(DateTime<Local>, FlowOutcome)>,
    should_quit: bool,
}

impl App {
    pub fn new(config: &Config, signals: mpsc::UnboundedSender<Event>) -> Self {
        let (commands_tx, commands_rx) = mpsc::unbounded_channel();
        let (outcomes_tx, outcomes_rx) = mpsc::unbounded_channel();
        let (operations_tx, operations_rx) = mpsc::unbounded_channel();

        // A zero tick interval swaps the timer for the synchronous runner.
        let runner: Arc<dyn OperationRunner> = if config.progress_interval_ms == 0 {
            Arc::new(ImmediateRunner::new(operations_tx))
        } else {
            Arc::new(TimerRunner::new(operations_tx))
        };
        let orchestrator =
            FlowOrchestrator::new(commands_tx, outcomes_tx, runner, config.operation_plan());

        Self {
            theme: Theme::by_name(&config.theme),
            manager: DialogManager::new(),
            orchestrator,
            commands_rx,
            outcomes_rx,
            operations_rx,
            signals,
            outcome_log: Vec::new(),
            should_quit: false,
        }
    }

    /// Start the tutorial on launch (the `tour` subcommand).
    pub async fn start_tutorial(&mut self) -> Result<()> {
        self.orchestrator.start(FlowId::Tutorial);
        self.pump().await
    }

    /// Handle one event; returns true when the app should exit.
    pub async fn handle_event(&mut self, event: Event) -> Result<bool> {
        match event {
            Event::Key(key) => self.handle_key(key).await?,
            Event::Mouse(mouse) => self.manager.handle_mouse_event(mouse).await?,
            Event::Resize(width, height) => {
                self.manager.set_size(Rect::new(0, 0, width, height));
            }
            Event::Tick => self.manager.tick().await?,
            Event::Dialog(signal) => self.handle_signal(signal).await?,
        }
        self.pump().await?;
        Ok(self.should_quit)
    }

    async fn handle_key(&mut self, key: KeyEvent) -> Result<()> {
        if key.code == KeyCode::Char('c') && key.modifiers.contains(KeyModifiers::CONTROL) {
            self.open_quit_prompt().await?;
            return Ok(());
        }

        // An open dialog owns the keyboard.
        if self.manager.has_dialogs() {
            self.manager.handle_key_event(key).await?;
            return Ok(());
        }

        match key.code {
            KeyCode::Char('d') => self.orchestrator.start(FlowId::Delete),
            KeyCode::Char('u') => self.orchestrator.start(FlowId::Upload),
            KeyCode::Char('b') => self.orchestrator.start(FlowId::Bulk),
            KeyCode::Char('s') => self.orchestrator.start(FlowId::Settings),
            KeyCode::Char('e') => self.orchestrator.start(FlowId::Editor),
            KeyCode::Char('t') => self.orchestrator.start(FlowId::Tutorial),
            KeyCode::Char('q') | KeyCode::Esc => self.open_quit_prompt().await?,
            _ => {}
        }
        Ok(())
    }

    async fn open_quit_prompt(&mut self) -> Result<()> {
        if self.manager.contains(&dialog_ids::quit()) {
            return Ok(());
        }
        let dialog = ConfirmDialog::with_id(
            dialog_ids::quit(),
            ConfirmRequest::new("Quit", "Leave the registration console?")
                .with_labels("Quit", "Stay")
                .with_tone(Tone::Warning),
            self.signals.clone(),
        );
        self.open(Box::new(dialog)).await
    }

    async fn handle_signal(&mut self, signal: DialogSignal) -> Result<()> {
        // The quit prompt is the host's own dialog, not part of any flow.
        if signal.source == dialog_ids::quit() {
            match signal.kind {
                SignalKind::Confirmed => self.should_quit = true,
                SignalKind::Cancelled => self.close(&dialog_ids::quit()).await?,
                _ => {}
            }
            return Ok(());
        }

        let flow_active = self.orchestrator.state().is_active();
        match signal.kind {
            SignalKind::Confirmed => {
                self.orchestrator.on_confirm();
                if !flow_active {
                    // Standalone dialog: closing is the view layer's job.
                    self.close(&signal.source).await?;
                }
            }
            SignalKind::Cancelled => {
                self.orchestrator.on_cancel();
                if !flow_active {
                    self.close(&signal.source).await?;
                }
            }
            SignalKind::SelectionChanged(items) => {
                self.orchestrator.on_selection_change(items);
                if !flow_active {
                    self.close(&signal.source).await?;
                }
            }
            SignalKind::TutorialNext(step) => self.orchestrator.advance_tutorial(step),
            SignalKind::Closed => {}
        }
        Ok(())
    }

    /// Drain all internal channels: operation events into the
    /// orchestrator, dialog commands into the manager, outcomes into the
    /// log. Runs after every handled event.
    async fn pump(&mut self) -> Result<()> {
        while let Ok(op) = self.operations_rx.try_recv() {
            self.orchestrator.on_operation_event(op);
        }
        while let Ok(command) = self.commands_rx.try_recv() {
            self.apply_command(command).await?;
        }
        while let Ok(outcome) = self.outcomes_rx.try_recv() {
            debug!(action = outcome.action(), "flow outcome");
            self.outcome_log.push((Local::now(), outcome));
        }
        Ok(())
    }

    async fn apply_command(&mut self, command: DialogCommand) -> Result<()> {
        match command {
            DialogCommand::OpenConfirm(request) => {
                self.open(Box::new(ConfirmDialog::new(request, self.signals.clone())))
                    .await
            }
            DialogCommand::OpenAlert(request) => {
                self.open(Box::new(AlertDialog::new(request, self.signals.clone())))
                    .await
            }
            DialogCommand::OpenProgress(request) => {
                self.open(Box::new(ProgressDialog::new(request, self.signals.clone())))
                    .await
            }
            DialogCommand::OpenSelection(request) => {
                self.open(Box::new(SelectionDialog::new(request, self.signals.clone())))
                    .await
            }
            DialogCommand::OpenSettings(request) => {
                self.open(Box::new(SettingsDialog::new(request, self.signals.clone())))
                    .await
            }
            DialogCommand::Close(surface) => self.close(&surface_id(surface)).await,
            DialogCommand::UpdateProgress(value) => {
                if let Some(dialog) = self.manager.get_dialog_mut(&dialog_ids::progress()) {
                    dialog.update_progress(value);
                }
                Ok(())
            }
        }
    }

    async fn open(
        &mut self,
        dialog: Box<dyn crate::tui::components::dialogs::Dialog>,
    ) -> Result<()> {
        // Reopening a surface replaces the previous instance.
        let id = dialog.id().clone();
        if self.manager.contains(&id) {
            self.manager.close_dialog_by_id(&id).await?;
        }
        self.manager.open_dialog(dialog).await?;
        Ok(())
    }

    async fn close(&mut self, id: &DialogId) -> Result<()> {
        match self.manager.close_dialog_by_id(id).await {
            Ok(()) => Ok(()),
            Err(DialogError::NotFound(_)) => Ok(()),
            Err(e) => {
                warn!(dialog = %id, error = %e, "failed to close dialog");
                Ok(())
            }
        }
    }

    pub fn render(&mut self, frame: &mut Frame) {
        let area = frame.size();
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(3), // Header
                Constraint::Min(8),    // Actions + outcome log
                Constraint::Length(1), // Status line
            ])
            .split(area);

        self.render_header(frame, chunks[0]);
        self.render_body(frame, chunks[1]);
        self.render_status(frame, chunks[2]);

        let theme = self.theme.clone();
        self.manager.render(frame, area, &theme);
    }

    fn render_header(&self, frame: &mut Frame, area: Rect) {
        let title = Paragraph::new("Registration Desk — courses & drivers")
            .style(
                Style::default()
                    .fg(self.theme.primary)
                    .add_modifier(Modifier::BOLD),
            )
            .block(Block::default().borders(Borders::ALL).style(
                Style::default().fg(self.theme.border),
            ));
        frame.render_widget(title, area);
    }

    fn render_body(&self, frame: &mut Frame, area: Rect) {
        let columns = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([Constraint::Percentage(40), Constraint::Percentage(60)])
            .split(area);

        let actions = [
            ("d", "Delete a registration"),
            ("u", "Upload roster files"),
            ("b", "Bulk action on registrations"),
            ("s", "Console settings"),
            ("e", "Edit a registration"),
            ("t", "Take the tour"),
            ("q", "Quit"),
        ];
        let action_items: Vec<ListItem> = actions
            .iter()
            .map(|(key, label)| {
                ListItem::new(Line::from(vec![
                    Span::styled(
                        format!(" {} ", key),
                        Style::default()
                            .fg(self.theme.accent)
                            .add_modifier(Modifier::BOLD),
                    ),
                    Span::styled(*label, Style::default().fg(self.theme.fg_base)),
                ]))
            })
            .collect();
        let action_list = List::new(action_items).block(
            Block::default()
                .borders(Borders::ALL)
                .title(" Actions ")
                .style(Style::default().fg(self.theme.border)),
        );
        frame.render_widget(action_list, columns[0]);

        let log_items: Vec<ListItem> = self
            .outcome_log
            .iter()
            .rev()
            .take(area.height.saturating_sub(2) as usize)
            .map(|(when, outcome)| {
                ListItem::new(Line::from(vec![
                    Span::styled(
                        when.format("%H:%M:%S ").to_string(),
                        Style::default().fg(self.theme.fg_muted),
                    ),
                    Span::styled(
                        outcome.summary(),
                        Style::default().fg(self.theme.fg_base),
                    ),
                    Span::styled(
                        format!("  [{}]", outcome.action()),
                        Style::default()
                            .fg(self.theme.fg_muted)
                            .add_modifier(Modifier::DIM),
                    ),
                ]))
            })
            .collect();
        let log = List::new(log_items).block(
            Block::default()
                .borders(Borders::ALL)
                .title(" Results ")
                .style(Style::default().fg(self.theme.border)),
        );
        frame.render_widget(log, columns[1]);
    }

    fn render_status(&self, frame: &mut Frame, area: Rect) {
        let status = match self.orchestrator.state().active() {
            Some(active) => format!(" {} flow — step {} ", active.id, active.step),
            None => " idle ".to_string(),
        };
        let line = Paragraph::new(status).style(
            Style::default()
                .fg(self.theme.fg_muted)
                .bg(self.theme.bg_subtle),
        );
        frame.render_widget(line, area);
    }
}

fn surface_id(surface: SurfaceKind) -> DialogId {
    match surface {
        SurfaceKind::Confirm => dialog_ids::confirm(),
        SurfaceKind::Alert => dialog_ids::alert(),
        SurfaceKind::Progress => dialog_ids::progress(),
        SurfaceKind::Selection => dialog_ids::selection(),
        SurfaceKind::Settings => dialog_ids::settings(),
    }
}
