//! Flow identity and flow-scoped state
//!
//! A flow is a named multi-step sequence of dialog interactions. The state
//! here is single-writer: only the orchestrator mutates it, the view layer
//! reads it to decide what to render.

use serde::{Deserialize, Serialize};

/// The fixed set of multi-step workflows the console knows about.
///
/// "No active flow" is modeled as `FlowState::active == None` rather than
/// a sentinel variant, so every `FlowId` value names a real flow.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FlowId {
    /// Delete a registration: confirm, then simulated delete with progress.
    Delete,
    /// Upload a roster: pick files, progress, results gallery.
    Upload,
    /// Edit settings: panel, apply confirmation, progress.
    Settings,
    /// Fullscreen record editor: edit, save-and-close confirmation.
    Editor,
    /// Bulk operation: pick items, count confirmation, progress.
    Bulk,
    /// Linear onboarding tour of informational messages.
    Tutorial,
}

impl FlowId {
    pub fn as_str(&self) -> &'static str {
        match self {
            FlowId::Delete => "delete",
            FlowId::Upload => "upload",
            FlowId::Settings => "settings",
            FlowId::Editor => "editor",
            FlowId::Bulk => "bulk",
            FlowId::Tutorial => "tutorial",
        }
    }

    /// All flows, in the order they appear on the admin home page.
    pub fn all() -> &'static [FlowId] {
        &[
            FlowId::Delete,
            FlowId::Upload,
            FlowId::Bulk,
            FlowId::Settings,
            FlowId::Editor,
            FlowId::Tutorial,
        ]
    }
}

impl std::fmt::Display for FlowId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// An item offered by a selection dialog (a file, a registration, ...).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SelectableItem {
    pub id: String,
    pub label: String,
    pub detail: Option<String>,
}

impl SelectableItem {
    pub fn new(label: impl Into<String>) -> Self {
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            label: label.into(),
            detail: None,
        }
    }

    pub fn with_detail(mut self, detail: impl Into<String>) -> Self {
        self.detail = Some(detail.into());
        self
    }
}

/// Flow-scoped data, one shape per flow.
///
/// Keeping this a tagged union instead of an open key/value bag means a
/// transition can only read the data its own flow actually collected.
#[derive(Debug, Clone, PartialEq)]
pub enum FlowData {
    Delete,
    Upload { selected_files: Vec<SelectableItem> },
    Settings,
    Editor,
    Bulk { selected_items: Vec<SelectableItem> },
    Tutorial,
}

impl FlowData {
    /// The empty data shape a flow starts with.
    pub fn initial(flow: FlowId) -> Self {
        match flow {
            FlowId::Delete => FlowData::Delete,
            FlowId::Upload => FlowData::Upload {
                selected_files: Vec::new(),
            },
            FlowId::Settings => FlowData::Settings,
            FlowId::Editor => FlowData::Editor,
            FlowId::Bulk => FlowData::Bulk {
                selected_items: Vec::new(),
            },
            FlowId::Tutorial => FlowData::Tutorial,
        }
    }
}

/// The flow currently in progress.
#[derive(Debug, Clone, PartialEq)]
pub struct ActiveFlow {
    pub id: FlowId,
    /// Position within the flow; starts at 1, monotonically increasing.
    pub step: u32,
    pub data: FlowData,
    /// Generation the flow was started under; operation events carry the
    /// epoch they were issued with so stale timers can be detected.
    pub epoch: u64,
}

/// Process-wide flow state: at most one flow active at a time.
#[derive(Debug, Clone, Default)]
pub struct FlowState {
    active: Option<ActiveFlow>,
}

impl FlowState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_active(&self) -> bool {
        self.active.is_some()
    }

    pub fn flow_id(&self) -> Option<FlowId> {
        self.active.as_ref().map(|f| f.id)
    }

    /// Current step, or 0 when no flow is active.
    pub fn step(&self) -> u32 {
        self.active.as_ref().map(|f| f.step).unwrap_or(0)
    }

    pub fn active(&self) -> Option<&ActiveFlow> {
        self.active.as_ref()
    }

    pub(crate) fn active_mut(&mut self) -> Option<&mut ActiveFlow> {
        self.active.as_mut()
    }

    pub(crate) fn begin(&mut self, id: FlowId, epoch: u64) {
        self.active = Some(ActiveFlow {
            id,
            step: 1,
            data: FlowData::initial(id),
            epoch,
        });
    }

    /// Clears the active flow and all data it accumulated.
    pub(crate) fn clear(&mut self) {
        self.active = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_flow_id_names() {
        assert_eq!(FlowId::Delete.as_str(), "delete");
        assert_eq!(FlowId::Tutorial.to_string(), "tutorial");
        assert_eq!(FlowId::all().len(), 6);
    }

    #[test]
    fn test_initial_data_shapes() {
        assert_eq!(
            FlowData::initial(FlowId::Upload),
            FlowData::Upload {
                selected_files: Vec::new()
            }
        );
        assert_eq!(FlowData::initial(FlowId::Delete), FlowData::Delete);
    }

    #[test]
    fn test_state_lifecycle() {
        let mut state = FlowState::new();
        assert!(!state.is_active());
        assert_eq!(state.step(), 0);

        state.begin(FlowId::Bulk, 7);
        assert_eq!(state.flow_id(), Some(FlowId::Bulk));
        assert_eq!(state.step(), 1);
        assert_eq!(state.active().unwrap().epoch, 7);

        state.clear();
        assert!(!state.is_active());
        assert_eq!(state.step(), 0);
    }
}
