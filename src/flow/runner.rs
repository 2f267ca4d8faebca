//! Simulated long-running operations
//!
//! Flows that show a progress dialog hand the actual "work" to an
//! [`OperationRunner`]. The production runner drives progress on a tokio
//! timer; tests swap in [`ImmediateRunner`] and feed the events back by
//! hand, which makes every progress-dependent transition deterministic.

use std::time::Duration;

use tokio::sync::mpsc;
use tokio::task::JoinHandle;

/// Identifies the flow generation an operation was started for.
///
/// Events carrying a token whose epoch no longer matches the active flow
/// are dropped by the orchestrator instead of advancing a newer flow.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OpToken {
    pub epoch: u64,
}

/// How the simulated operation advances.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OperationPlan {
    /// Progress added per tick, in percent.
    pub increment: u16,
    /// Delay between ticks.
    pub interval: Duration,
    /// Pause between reaching 100 and reporting completion.
    pub settle: Duration,
}

impl Default for OperationPlan {
    fn default() -> Self {
        Self {
            increment: 10,
            interval: Duration::from_millis(200),
            settle: Duration::from_millis(500),
        }
    }
}

/// Events an operation delivers back to the orchestrator.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OperationEvent {
    Progress { token: OpToken, value: u16 },
    Done { token: OpToken },
}

impl OperationEvent {
    pub fn token(&self) -> OpToken {
        match self {
            OperationEvent::Progress { token, .. } => *token,
            OperationEvent::Done { token } => *token,
        }
    }
}

/// Handle to a running operation; aborting it stops any further events
/// from being produced (already queued events are still epoch-guarded).
#[derive(Debug, Default)]
pub struct OperationHandle {
    task: Option<JoinHandle<()>>,
}

impl OperationHandle {
    pub fn detached() -> Self {
        Self { task: None }
    }

    pub fn from_task(task: JoinHandle<()>) -> Self {
        Self { task: Some(task) }
    }

    pub fn abort(&self) {
        if let Some(task) = &self.task {
            task.abort();
        }
    }
}

/// Capability the orchestrator depends on to run a simulated operation.
pub trait OperationRunner: Send + Sync {
    fn start(&self, plan: OperationPlan, token: OpToken) -> OperationHandle;
}

/// Timer-driven runner: emits `Progress` in fixed increments until 100,
/// settles, then emits `Done`.
pub struct TimerRunner {
    events: mpsc::UnboundedSender<OperationEvent>,
}

impl TimerRunner {
    pub fn new(events: mpsc::UnboundedSender<OperationEvent>) -> Self {
        Self { events }
    }
}

impl OperationRunner for TimerRunner {
    fn start(&self, plan: OperationPlan, token: OpToken) -> OperationHandle {
        let events = self.events.clone();
        let increment = plan.increment.max(1);
        let task = tokio::spawn(async move {
            let mut value: u16 = 0;
            while value < 100 {
                tokio::time::sleep(plan.interval).await;
                value = (value + increment).min(100);
                if events
                    .send(OperationEvent::Progress { token, value })
                    .is_err()
                {
                    return;
                }
            }
            tokio::time::sleep(plan.settle).await;
            let _ = events.send(OperationEvent::Done { token });
        });
        OperationHandle::from_task(task)
    }
}

/// Runner that completes synchronously: every progress tick and the final
/// `Done` are queued before `start` returns. Used by tests and by the
/// console when the configured tick interval is zero.
pub struct ImmediateRunner {
    events: mpsc::UnboundedSender<OperationEvent>,
}

impl ImmediateRunner {
    pub fn new(events: mpsc::UnboundedSender<OperationEvent>) -> Self {
        Self { events }
    }
}

impl OperationRunner for ImmediateRunner {
    fn start(&self, plan: OperationPlan, token: OpToken) -> OperationHandle {
        let increment = plan.increment.max(1);
        let mut value: u16 = 0;
        while value < 100 {
            value = (value + increment).min(100);
            if self
                .events
                .send(OperationEvent::Progress { token, value })
                .is_err()
            {
                return OperationHandle::detached();
            }
        }
        let _ = self.events.send(OperationEvent::Done { token });
        OperationHandle::detached()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_immediate_runner_reaches_exactly_one_hundred() {
        let (tx, mut rx) = mpsc::unbounded_channel();
        let runner = ImmediateRunner::new(tx);
        let token = OpToken { epoch: 1 };
        let plan = OperationPlan {
            increment: 30,
            ..OperationPlan::default()
        };
        runner.start(plan, token);

        let mut last = 0;
        let mut done = false;
        while let Ok(ev) = rx.try_recv() {
            match ev {
                OperationEvent::Progress { value, .. } => {
                    assert!(value > last, "progress must not decrease");
                    assert!(value <= 100, "progress must not exceed 100");
                    last = value;
                }
                OperationEvent::Done { .. } => done = true,
            }
        }
        assert_eq!(last, 100);
        assert!(done);
    }

    #[tokio::test]
    async fn test_timer_runner_abort_stops_events() {
        let (tx, mut rx) = mpsc::unbounded_channel();
        let runner = TimerRunner::new(tx);
        let plan = OperationPlan {
            increment: 10,
            interval: Duration::from_millis(5),
            settle: Duration::from_millis(5),
        };
        let handle = runner.start(plan, OpToken { epoch: 1 });
        handle.abort();
        tokio::time::sleep(Duration::from_millis(50)).await;
        // Drain whatever slipped through before the abort landed.
        let mut count = 0;
        while rx.try_recv().is_ok() {
            count += 1;
        }
        assert!(count < 10, "aborted runner kept producing events");
    }
}
