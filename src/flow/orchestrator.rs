//! The flow orchestrator
//!
//! Routes every dialog-completion event through an explicit transition
//! table keyed by `(flow, step, event)`. No table entry means no action:
//! a stale event is logged and dropped instead of falling through to a
//! different handler. Simulated operations are epoch-guarded so a timer
//! belonging to an abandoned flow can never advance a newer one.

use std::sync::Arc;

use tokio::sync::mpsc;
use tracing::{debug, warn};

use super::command::{
    AlertRequest, ConfirmRequest, DialogCommand, ProgressRequest, SelectionRequest,
    SettingsRequest, SurfaceKind, Tone,
};
use super::outcome::FlowOutcome;
use super::runner::{OperationEvent, OperationHandle, OperationPlan, OperationRunner, OpToken};
use super::state::{FlowData, FlowId, FlowState, SelectableItem};
use super::tutorial;

/// The two dialog-completion events the transition table distinguishes.
/// Cancellation is not in the table: it always unwinds the whole flow.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum EventKind {
    Confirm,
    Selection,
}

/// Named entries of the transition table.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Transition {
    /// (delete, 1, confirm): run the delete with progress.
    DeleteRun,
    /// (settings, 1, confirm): panel saved, ask to apply.
    SettingsReview,
    /// (settings, 2, confirm): apply with progress.
    SettingsRun,
    /// (editor, 1, confirm): ask to save and close.
    EditorReview,
    /// (editor, 2, confirm): close everything, report saved.
    EditorSave,
    /// (bulk, 1, selection): ask to confirm the counted selection.
    BulkReview,
    /// (bulk, 2, confirm): run the bulk action with progress.
    BulkRun,
    /// (upload, 1, selection): upload the picked files with progress.
    UploadRun,
}

/// The transition table proper. Returning `None` is the stale-transition
/// no-op required for any `(flow, step, event)` with no entry.
fn lookup(flow: FlowId, step: u32, event: EventKind) -> Option<Transition> {
    match (flow, step, event) {
        (FlowId::Delete, 1, EventKind::Confirm) => Some(Transition::DeleteRun),
        (FlowId::Settings, 1, EventKind::Confirm) => Some(Transition::SettingsReview),
        (FlowId::Settings, 2, EventKind::Confirm) => Some(Transition::SettingsRun),
        (FlowId::Editor, 1, EventKind::Confirm) => Some(Transition::EditorReview),
        (FlowId::Editor, 2, EventKind::Confirm) => Some(Transition::EditorSave),
        (FlowId::Bulk, 1, EventKind::Selection) => Some(Transition::BulkReview),
        (FlowId::Bulk, 2, EventKind::Confirm) => Some(Transition::BulkRun),
        (FlowId::Upload, 1, EventKind::Selection) => Some(Transition::UploadRun),
        _ => None,
    }
}

/// Steps during which a flow owns an in-flight operation.
fn progress_step(flow: FlowId, step: u32) -> bool {
    matches!(
        (flow, step),
        (FlowId::Delete, 2) | (FlowId::Upload, 2) | (FlowId::Settings, 3) | (FlowId::Bulk, 3)
    )
}

/// Owns the flow state and decides every transition.
///
/// Single-writer: only the host loop calls into it, and every side effect
/// leaves through the command and outcome channels.
pub struct FlowOrchestrator {
    state: FlowState,
    /// Bumped on every start and reset; operation tokens carry the epoch
    /// they were issued under.
    epoch: u64,
    plan: OperationPlan,
    commands: mpsc::UnboundedSender<DialogCommand>,
    outcomes: mpsc::UnboundedSender<FlowOutcome>,
    runner: Arc<dyn OperationRunner>,
    operation: Option<OperationHandle>,
    last_progress: u16,
    /// Surfaces the active flow currently has open, so cancellation can
    /// close exactly what the flow owns.
    flow_dialogs: Vec<SurfaceKind>,
}

impl FlowOrchestrator {
    pub fn new(
        commands: mpsc::UnboundedSender<DialogCommand>,
        outcomes: mpsc::UnboundedSender<FlowOutcome>,
        runner: Arc<dyn OperationRunner>,
        plan: OperationPlan,
    ) -> Self {
        Self {
            state: FlowState::new(),
            epoch: 0,
            plan,
            commands,
            outcomes,
            runner,
            operation: None,
            last_progress: 0,
            flow_dialogs: Vec::new(),
        }
    }

    pub fn state(&self) -> &FlowState {
        &self.state
    }

    /// Begin a flow. Rejected (logged, no state change) while another flow
    /// is active: an accidental double keypress must not abandon a
    /// half-finished flow.
    pub fn start(&mut self, flow: FlowId) {
        if let Some(active) = self.state.flow_id() {
            warn!(active = %active, requested = %flow, "flow start rejected, another flow is active");
            return;
        }
        self.epoch += 1;
        self.state.begin(flow, self.epoch);
        debug!(flow = %flow, "flow started");

        match flow {
            FlowId::Delete => self.open(DialogCommand::OpenConfirm(
                ConfirmRequest::new(
                    "Delete registration",
                    "Delete this registration? This cannot be undone.",
                )
                .with_labels("Delete", "Keep")
                .with_tone(Tone::Danger),
            )),
            FlowId::Upload => self.open(DialogCommand::OpenSelection(
                SelectionRequest::new("Upload roster", "Pick the roster files to upload")
                    .with_items(roster_files()),
            )),
            FlowId::Settings => self.open(DialogCommand::OpenSettings(SettingsRequest::new(
                "Console settings",
                vec![
                    "General".to_string(),
                    "Registration".to_string(),
                    "Notifications".to_string(),
                ],
            ))),
            FlowId::Editor => self.open(DialogCommand::OpenSettings(
                SettingsRequest::new(
                    "Edit registration",
                    vec![
                        "Details".to_string(),
                        "Schedule".to_string(),
                        "Documents".to_string(),
                    ],
                )
                .fullscreen(),
            )),
            FlowId::Bulk => self.open(DialogCommand::OpenSelection(
                SelectionRequest::new("Bulk action", "Select the registrations to process")
                    .with_items(registrations()),
            )),
            FlowId::Tutorial => self.open_tutorial_step(1),
        }
    }

    /// A confirmation-style dialog reported a positive outcome.
    pub fn on_confirm(&mut self) {
        let Some((flow, step)) = self.active_position() else {
            // Standalone confirmation outside any flow; the view layer
            // closes the answered dialog itself.
            self.report(FlowOutcome::StandaloneConfirmed);
            return;
        };
        match lookup(flow, step, EventKind::Confirm) {
            Some(transition) => self.apply(transition),
            None => debug!(flow = %flow, step, "stale confirm event ignored"),
        }
    }

    /// A selection dialog reported its chosen items.
    pub fn on_selection_change(&mut self, items: Vec<SelectableItem>) {
        let Some((flow, step)) = self.active_position() else {
            self.report(FlowOutcome::StandaloneSelection { items });
            return;
        };
        match lookup(flow, step, EventKind::Selection) {
            Some(Transition::UploadRun) => {
                let count = items.len();
                if let Some(active) = self.state.active_mut() {
                    active.data = FlowData::Upload {
                        selected_files: items,
                    };
                    active.step = 2;
                }
                self.close(SurfaceKind::Selection);
                self.open(DialogCommand::OpenProgress(
                    ProgressRequest::new("Uploading", "Uploading the selected roster files...")
                        .with_total_items(count),
                ));
                self.begin_operation();
            }
            Some(Transition::BulkReview) => {
                let count = items.len();
                if let Some(active) = self.state.active_mut() {
                    active.data = FlowData::Bulk {
                        selected_items: items,
                    };
                    active.step = 2;
                }
                self.close(SurfaceKind::Selection);
                self.open(DialogCommand::OpenConfirm(
                    ConfirmRequest::new(
                        "Confirm bulk action",
                        format!("Apply the action to {} selected registration(s)?", count),
                    )
                    .with_labels("Apply", "Cancel")
                    .with_tone(Tone::Warning),
                ));
            }
            Some(other) => debug!(?other, "selection event matched a non-selection transition"),
            None => debug!(flow = %flow, step, "stale selection event ignored"),
        }
    }

    /// Any open dialog was dismissed. Unwinds the entire flow, not just
    /// the current step.
    pub fn on_cancel(&mut self) {
        let Some(flow) = self.state.flow_id() else {
            self.report(FlowOutcome::StandaloneCancelled);
            return;
        };
        for surface in std::mem::take(&mut self.flow_dialogs) {
            self.send(DialogCommand::Close(surface));
        }
        self.reset();
        self.report(FlowOutcome::Cancelled { flow });
    }

    /// Advance the tutorial to the given 1-based step. Only valid for the
    /// immediate next step of an active tutorial; anything else is a no-op.
    pub fn advance_tutorial(&mut self, step: u32) {
        let Some((FlowId::Tutorial, current)) = self.active_position() else {
            debug!(step, "tutorial advance outside an active tutorial ignored");
            return;
        };
        if step != current + 1 || tutorial::step(step).is_none() {
            debug!(step, current, "out-of-order tutorial advance ignored");
            return;
        }
        self.close(SurfaceKind::Alert);
        self.open_tutorial_step(step);
        if tutorial::is_terminal(step) {
            self.report(FlowOutcome::TutorialFinished);
            self.reset();
        } else if let Some(active) = self.state.active_mut() {
            active.step = step;
        }
    }

    /// Progress/completion events from the operation runner. Dropped when
    /// the epoch does not match the active flow or the flow is not in a
    /// progress step.
    pub fn on_operation_event(&mut self, event: OperationEvent) {
        let Some(active) = self.state.active() else {
            debug!("operation event after flow reset dropped");
            return;
        };
        if event.token().epoch != active.epoch || !progress_step(active.id, active.step) {
            debug!(flow = %active.id, step = active.step, "orphaned operation event dropped");
            return;
        }
        match event {
            OperationEvent::Progress { value, .. } => {
                let value = value.min(100);
                if value > self.last_progress {
                    self.last_progress = value;
                    self.send(DialogCommand::UpdateProgress(value));
                }
            }
            OperationEvent::Done { .. } => self.finish_operation(),
        }
    }

    fn apply(&mut self, transition: Transition) {
        match transition {
            Transition::DeleteRun => {
                self.close(SurfaceKind::Confirm);
                self.advance_to(2);
                self.open(DialogCommand::OpenProgress(ProgressRequest::new(
                    "Deleting",
                    "Removing the registration...",
                )));
                self.begin_operation();
            }
            Transition::SettingsReview => {
                self.close(SurfaceKind::Settings);
                self.advance_to(2);
                self.open(DialogCommand::OpenConfirm(
                    ConfirmRequest::new("Apply settings", "Apply the changed settings now?")
                        .with_labels("Apply", "Back"),
                ));
            }
            Transition::SettingsRun => {
                self.close(SurfaceKind::Confirm);
                self.advance_to(3);
                self.open(DialogCommand::OpenProgress(ProgressRequest::new(
                    "Applying settings",
                    "Writing the new configuration...",
                )));
                self.begin_operation();
            }
            Transition::EditorReview => {
                // The fullscreen surface stays open behind the prompt.
                self.advance_to(2);
                self.open(DialogCommand::OpenConfirm(
                    ConfirmRequest::new("Save and close", "Save changes and close the editor?")
                        .with_labels("Save", "Keep editing"),
                ));
            }
            Transition::EditorSave => {
                self.close(SurfaceKind::Confirm);
                self.close(SurfaceKind::Settings);
                self.report(FlowOutcome::EditorSaved);
                self.reset();
            }
            Transition::BulkRun => {
                let count = self.bulk_count();
                self.close(SurfaceKind::Confirm);
                self.advance_to(3);
                self.open(DialogCommand::OpenProgress(
                    ProgressRequest::new("Processing", "Applying the bulk action...")
                        .with_total_items(count),
                ));
                self.begin_operation();
            }
            // Selection-driven transitions carry the items and are applied
            // inline in on_selection_change; without items there is nothing
            // to do.
            Transition::BulkReview | Transition::UploadRun => {
                debug!(?transition, "selection-carrying transition without items ignored");
            }
        }
    }

    /// Terminal handling once a simulated operation completes.
    fn finish_operation(&mut self) {
        let Some((flow, _)) = self.active_position() else {
            return;
        };
        self.close(SurfaceKind::Progress);
        match flow {
            FlowId::Delete => {
                self.open(DialogCommand::OpenAlert(
                    AlertRequest::new("Deleted", "The registration was deleted.")
                        .with_tone(Tone::Success),
                ));
                self.report(FlowOutcome::DeleteCompleted);
            }
            FlowId::Settings => {
                self.open(DialogCommand::OpenAlert(
                    AlertRequest::new("Settings applied", "The new settings are active.")
                        .with_tone(Tone::Success),
                ));
                self.report(FlowOutcome::SettingsApplied);
            }
            FlowId::Upload => {
                let files = match self.state.active().map(|a| &a.data) {
                    Some(FlowData::Upload { selected_files }) => selected_files.clone(),
                    _ => Vec::new(),
                };
                let labels = files.iter().map(|f| f.label.clone()).collect();
                self.open(DialogCommand::OpenAlert(
                    AlertRequest::new("Upload complete", "All files were uploaded.")
                        .with_tone(Tone::Success)
                        .with_items(labels),
                ));
                self.report(FlowOutcome::UploadCompleted {
                    uploaded: files.len(),
                });
            }
            FlowId::Bulk => {
                let count = self.bulk_count();
                self.open(DialogCommand::OpenAlert(
                    AlertRequest::new(
                        "Bulk action complete",
                        format!("Processed {} registration(s).", count),
                    )
                    .with_tone(Tone::Success),
                ));
                self.report(FlowOutcome::BulkCompleted { processed: count });
            }
            FlowId::Editor | FlowId::Tutorial => {
                debug!(flow = %flow, "operation completion for a flow without one");
                return;
            }
        }
        self.reset();
    }

    fn open_tutorial_step(&mut self, position: u32) {
        let Some(step) = tutorial::step(position) else {
            return;
        };
        let mut request = AlertRequest::new(
            format!(
                "{} ({}/{})",
                step.title,
                position,
                tutorial::step_count()
            ),
            step.message,
        );
        if !tutorial::is_terminal(position) {
            request = request.with_next_step(position + 1);
        }
        self.open(DialogCommand::OpenAlert(request));
    }

    fn begin_operation(&mut self) {
        if let Some(op) = self.operation.take() {
            op.abort();
        }
        self.last_progress = 0;
        let token = OpToken { epoch: self.epoch };
        self.operation = Some(self.runner.start(self.plan, token));
    }

    /// Clears the flow and everything it owned; bumps the epoch so any
    /// still-queued operation event identifies itself as stale.
    fn reset(&mut self) {
        if let Some(op) = self.operation.take() {
            op.abort();
        }
        self.epoch += 1;
        self.last_progress = 0;
        self.flow_dialogs.clear();
        self.state.clear();
    }

    fn active_position(&self) -> Option<(FlowId, u32)> {
        self.state.active().map(|a| (a.id, a.step))
    }

    fn advance_to(&mut self, step: u32) {
        if let Some(active) = self.state.active_mut() {
            active.step = step;
        }
    }

    fn bulk_count(&self) -> usize {
        match self.state.active().map(|a| &a.data) {
            Some(FlowData::Bulk { selected_items }) => selected_items.len(),
            _ => 0,
        }
    }

    fn open(&mut self, command: DialogCommand) {
        if let Some(surface) = command.opens() {
            if self.state.is_active() && !self.flow_dialogs.contains(&surface) {
                self.flow_dialogs.push(surface);
            }
        }
        self.send(command);
    }

    fn close(&mut self, surface: SurfaceKind) {
        self.flow_dialogs.retain(|s| *s != surface);
        self.send(DialogCommand::Close(surface));
    }

    fn send(&self, command: DialogCommand) {
        let _ = self.commands.send(command);
    }

    fn report(&self, outcome: FlowOutcome) {
        let _ = self.outcomes.send(outcome);
    }
}

/// Mock roster files offered by the upload picker. All console data is
/// in-memory; there is no persistence layer.
fn roster_files() -> Vec<SelectableItem> {
    vec![
        SelectableItem::new("spring_courses.csv").with_detail("48 KB"),
        SelectableItem::new("driver_renewals.csv").with_detail("12 KB"),
        SelectableItem::new("instructor_hours.xlsx").with_detail("96 KB"),
        SelectableItem::new("waitlist_fall.csv").with_detail("7 KB"),
    ]
}

/// Mock registrations offered by the bulk picker.
fn registrations() -> Vec<SelectableItem> {
    vec![
        SelectableItem::new("Ada Lindqvist").with_detail("Defensive driving, May 12"),
        SelectableItem::new("Noor Haddad").with_detail("Motorcycle basics, May 14"),
        SelectableItem::new("Jonas Petterson").with_detail("Defensive driving, May 12"),
        SelectableItem::new("Mei Tanaka").with_detail("Trailer licence, June 2"),
        SelectableItem::new("Tomasz Kowal").with_detail("Refresher course, June 9"),
    ]
}

#[cfg(test)]
mod tests {
    use super::super::runner::ImmediateRunner;
    use super::*;

    struct Harness {
        orch: FlowOrchestrator,
        commands: mpsc::UnboundedReceiver<DialogCommand>,
        outcomes: mpsc::UnboundedReceiver<FlowOutcome>,
        ops: mpsc::UnboundedReceiver<OperationEvent>,
    }

    impl Harness {
        fn new() -> Self {
            let (cmd_tx, commands) = mpsc::unbounded_channel();
            let (out_tx, outcomes) = mpsc::unbounded_channel();
            let (op_tx, ops) = mpsc::unbounded_channel();
            let runner = Arc::new(ImmediateRunner::new(op_tx));
            let orch =
                FlowOrchestrator::new(cmd_tx, out_tx, runner, OperationPlan::default());
            Self {
                orch,
                commands,
                outcomes,
                ops,
            }
        }

        fn drain_commands(&mut self) -> Vec<DialogCommand> {
            let mut out = Vec::new();
            while let Ok(cmd) = self.commands.try_recv() {
                out.push(cmd);
            }
            out
        }

        fn drain_outcomes(&mut self) -> Vec<FlowOutcome> {
            let mut out = Vec::new();
            while let Ok(o) = self.outcomes.try_recv() {
                out.push(o);
            }
            out
        }

        fn queued_ops(&mut self) -> Vec<OperationEvent> {
            let mut out = Vec::new();
            while let Ok(ev) = self.ops.try_recv() {
                out.push(ev);
            }
            out
        }

        /// Feed every queued operation event back into the orchestrator.
        fn pump_ops(&mut self) {
            for ev in self.queued_ops() {
                self.orch.on_operation_event(ev);
            }
        }

        fn items(n: usize) -> Vec<SelectableItem> {
            (0..n)
                .map(|i| SelectableItem::new(format!("item {}", i)))
                .collect()
        }
    }

    #[test]
    fn test_every_start_opens_exactly_one_dialog_at_step_one() {
        for &flow in FlowId::all() {
            let mut h = Harness::new();
            h.orch.start(flow);
            assert_eq!(h.orch.state().flow_id(), Some(flow));
            assert_eq!(h.orch.state().step(), 1);
            let opens: Vec<_> = h
                .drain_commands()
                .into_iter()
                .filter(|c| c.opens().is_some())
                .collect();
            assert_eq!(opens.len(), 1, "{} opened {} dialogs", flow, opens.len());
        }
    }

    #[test]
    fn test_cancel_resets_at_any_step() {
        // Step 1.
        let mut h = Harness::new();
        h.orch.start(FlowId::Delete);
        h.orch.on_cancel();
        assert!(!h.orch.state().is_active());
        assert_eq!(
            h.drain_outcomes().last().unwrap().action(),
            "delete_flow_cancelled"
        );

        // Step 2, with an operation in flight.
        let mut h = Harness::new();
        h.orch.start(FlowId::Bulk);
        h.orch.on_selection_change(Harness::items(3));
        assert_eq!(h.orch.state().step(), 2);
        h.orch.on_cancel();
        assert!(!h.orch.state().is_active());
        let closes: Vec<_> = h
            .drain_commands()
            .into_iter()
            .filter(|c| matches!(c, DialogCommand::Close(_)))
            .collect();
        assert!(closes.contains(&DialogCommand::Close(SurfaceKind::Confirm)));
    }

    #[test]
    fn test_events_without_active_flow_do_not_mutate_state() {
        let mut h = Harness::new();
        h.orch.on_confirm();
        h.orch.on_selection_change(Harness::items(2));
        h.orch.on_cancel();
        assert!(!h.orch.state().is_active());
        assert_eq!(h.orch.state().step(), 0);
        let actions: Vec<_> = h.drain_outcomes().iter().map(|o| o.action()).collect();
        assert_eq!(actions, vec!["confirmed", "selection", "cancelled"]);
    }

    #[test]
    fn test_bulk_confirmation_embeds_selection_count() {
        let mut h = Harness::new();
        h.orch.start(FlowId::Bulk);
        h.drain_commands();
        h.orch.on_selection_change(Harness::items(4));
        let confirm = h
            .drain_commands()
            .into_iter()
            .find_map(|c| match c {
                DialogCommand::OpenConfirm(req) => Some(req),
                _ => None,
            })
            .expect("bulk step 2 must open a confirmation");
        assert!(confirm.message.contains('4'), "message: {}", confirm.message);
    }

    #[test]
    fn test_bulk_flow_end_to_end() {
        let mut h = Harness::new();
        h.orch.start(FlowId::Bulk);
        h.orch.on_selection_change(Harness::items(2));
        let confirm = h
            .drain_commands()
            .into_iter()
            .find_map(|c| match c {
                DialogCommand::OpenConfirm(req) => Some(req),
                _ => None,
            })
            .unwrap();
        assert!(confirm.message.contains('2'));

        h.orch.on_confirm();
        h.pump_ops();

        assert!(!h.orch.state().is_active());
        let outcome = h.drain_outcomes().pop().unwrap();
        assert_eq!(outcome.action(), "bulk_flow_completed");
        assert_eq!(outcome.processed(), Some(2));
    }

    #[test]
    fn test_upload_progress_is_monotonic_and_completes_before_gallery() {
        let mut h = Harness::new();
        h.orch.start(FlowId::Upload);
        h.drain_commands();
        h.orch.on_selection_change(Harness::items(3));
        h.pump_ops();

        let commands = h.drain_commands();
        let mut last = 0u16;
        let mut saw_full = false;
        for cmd in &commands {
            match cmd {
                DialogCommand::UpdateProgress(v) => {
                    assert!(*v > last, "progress decreased: {} -> {}", last, v);
                    assert!(*v <= 100);
                    last = *v;
                }
                DialogCommand::OpenAlert(_) => {
                    assert_eq!(last, 100, "gallery opened before progress reached 100");
                    saw_full = true;
                }
                _ => {}
            }
        }
        assert!(saw_full, "upload flow never opened its results gallery");
        let outcome = h.drain_outcomes().pop().unwrap();
        assert_eq!(outcome.action(), "upload_flow_completed");
        assert_eq!(outcome.processed(), Some(3));
    }

    #[test]
    fn test_delete_flow_end_to_end() {
        let mut h = Harness::new();
        h.orch.start(FlowId::Delete);
        h.orch.on_confirm();
        assert_eq!(h.orch.state().step(), 2);
        h.pump_ops();
        assert!(!h.orch.state().is_active());
        assert_eq!(
            h.drain_outcomes().pop().unwrap().action(),
            "delete_flow_completed"
        );
    }

    #[test]
    fn test_settings_flow_reaches_completion() {
        let mut h = Harness::new();
        h.orch.start(FlowId::Settings);
        h.orch.on_confirm(); // panel saved
        assert_eq!(h.orch.state().step(), 2);
        h.orch.on_confirm(); // apply confirmed
        assert_eq!(h.orch.state().step(), 3);
        h.pump_ops();
        assert!(!h.orch.state().is_active());
        assert_eq!(
            h.drain_outcomes().pop().unwrap().action(),
            "settings_flow_completed"
        );
    }

    #[test]
    fn test_editor_flow_saves_and_closes_everything() {
        let mut h = Harness::new();
        h.orch.start(FlowId::Editor);
        h.orch.on_confirm();
        assert_eq!(h.orch.state().step(), 2);
        h.drain_commands();
        h.orch.on_confirm();
        assert!(!h.orch.state().is_active());
        let commands = h.drain_commands();
        assert!(commands.contains(&DialogCommand::Close(SurfaceKind::Confirm)));
        assert!(commands.contains(&DialogCommand::Close(SurfaceKind::Settings)));
        assert_eq!(
            h.drain_outcomes().pop().unwrap().action(),
            "editor_flow_completed"
        );
    }

    #[test]
    fn test_tutorial_advances_to_terminal_and_resets() {
        let mut h = Harness::new();
        h.orch.start(FlowId::Tutorial);
        let k = tutorial::step_count();
        for next in 2..=k {
            assert!(h.orch.state().is_active());
            h.orch.advance_tutorial(next);
        }
        assert!(!h.orch.state().is_active(), "terminal step must reset the flow");
        assert_eq!(
            h.drain_outcomes().pop().unwrap().action(),
            "tutorial_flow_completed"
        );
        // One advance past the terminal step: no panic, no state change.
        h.orch.advance_tutorial(k + 1);
        assert!(!h.orch.state().is_active());
        assert!(h.drain_outcomes().is_empty());
    }

    #[test]
    fn test_out_of_order_tutorial_advance_is_ignored() {
        let mut h = Harness::new();
        h.orch.start(FlowId::Tutorial);
        h.orch.advance_tutorial(4); // skipping ahead
        assert_eq!(h.orch.state().step(), 1);
    }

    #[test]
    fn test_reentrant_start_is_rejected() {
        let mut h = Harness::new();
        h.orch.start(FlowId::Delete);
        h.drain_commands();
        h.orch.start(FlowId::Upload);
        assert_eq!(h.orch.state().flow_id(), Some(FlowId::Delete));
        assert_eq!(h.orch.state().step(), 1);
        assert!(
            h.drain_commands().is_empty(),
            "rejected start must not open anything"
        );
    }

    #[test]
    fn test_stale_operation_events_are_dropped_after_cancel() {
        let mut h = Harness::new();
        h.orch.start(FlowId::Delete);
        h.orch.on_confirm(); // queues the whole simulated operation
        let queued = h.queued_ops();
        assert!(!queued.is_empty());
        h.orch.on_cancel();
        h.drain_commands();
        h.drain_outcomes();

        for ev in queued {
            h.orch.on_operation_event(ev);
        }
        assert!(!h.orch.state().is_active());
        assert!(h.drain_commands().is_empty(), "stale events produced commands");
        assert!(h.drain_outcomes().is_empty(), "stale events produced outcomes");
    }

    #[test]
    fn test_stale_confirm_is_a_no_op() {
        let mut h = Harness::new();
        h.orch.start(FlowId::Upload);
        h.drain_commands();
        // A confirm event while the upload selection is open matches no
        // table entry.
        h.orch.on_confirm();
        assert_eq!(h.orch.state().flow_id(), Some(FlowId::Upload));
        assert_eq!(h.orch.state().step(), 1);
        assert!(h.drain_commands().is_empty());
        assert!(h.drain_outcomes().is_empty());
    }

    #[test]
    fn test_selection_transitions_without_items_are_ignored() {
        let mut h = Harness::new();
        h.orch.start(FlowId::Bulk);
        h.drain_commands();
        // These transitions only carry meaning with selected items; applied
        // bare they must not panic, open dialogs, or move the flow.
        h.orch.apply(Transition::BulkReview);
        h.orch.apply(Transition::UploadRun);
        assert_eq!(h.orch.state().flow_id(), Some(FlowId::Bulk));
        assert_eq!(h.orch.state().step(), 1);
        assert!(h.drain_commands().is_empty());
        assert!(h.drain_outcomes().is_empty());
    }

    #[test]
    fn test_transition_table_rejects_unknown_pairs() {
        assert!(lookup(FlowId::Delete, 2, EventKind::Confirm).is_none());
        assert!(lookup(FlowId::Tutorial, 1, EventKind::Confirm).is_none());
        assert!(lookup(FlowId::Upload, 1, EventKind::Confirm).is_none());
        assert!(lookup(FlowId::Bulk, 1, EventKind::Confirm).is_none());
        assert_eq!(
            lookup(FlowId::Bulk, 1, EventKind::Selection),
            Some(Transition::BulkReview)
        );
    }
}
