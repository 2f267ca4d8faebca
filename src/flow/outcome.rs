//! Terminal results of flows, reported to the result sink

use super::state::{FlowId, SelectableItem};

/// The tagged record a finished (or abandoned) flow reports.
///
/// Consumed by the host page's outcome log; the `action` string is the
/// stable identifier, the variant fields carry the extra data.
#[derive(Debug, Clone, PartialEq)]
pub enum FlowOutcome {
    DeleteCompleted,
    UploadCompleted { uploaded: usize },
    SettingsApplied,
    EditorSaved,
    BulkCompleted { processed: usize },
    TutorialFinished,
    Cancelled { flow: FlowId },
    /// A confirmation dialog answered outside any flow.
    StandaloneConfirmed,
    /// A selection made outside any flow.
    StandaloneSelection { items: Vec<SelectableItem> },
    /// A dialog dismissed outside any flow.
    StandaloneCancelled,
}

impl FlowOutcome {
    pub fn action(&self) -> &'static str {
        match self {
            FlowOutcome::DeleteCompleted => "delete_flow_completed",
            FlowOutcome::UploadCompleted { .. } => "upload_flow_completed",
            FlowOutcome::SettingsApplied => "settings_flow_completed",
            FlowOutcome::EditorSaved => "editor_flow_completed",
            FlowOutcome::BulkCompleted { .. } => "bulk_flow_completed",
            FlowOutcome::TutorialFinished => "tutorial_flow_completed",
            FlowOutcome::Cancelled { flow } => match flow {
                FlowId::Delete => "delete_flow_cancelled",
                FlowId::Upload => "upload_flow_cancelled",
                FlowId::Settings => "settings_flow_cancelled",
                FlowId::Editor => "editor_flow_cancelled",
                FlowId::Bulk => "bulk_flow_cancelled",
                FlowId::Tutorial => "tutorial_flow_cancelled",
            },
            FlowOutcome::StandaloneConfirmed => "confirmed",
            FlowOutcome::StandaloneSelection { .. } => "selection",
            FlowOutcome::StandaloneCancelled => "cancelled",
        }
    }

    /// Item count for outcomes that processed a selection.
    pub fn processed(&self) -> Option<usize> {
        match self {
            FlowOutcome::UploadCompleted { uploaded } => Some(*uploaded),
            FlowOutcome::BulkCompleted { processed } => Some(*processed),
            FlowOutcome::StandaloneSelection { items } => Some(items.len()),
            _ => None,
        }
    }

    /// One-line human description for the outcome log.
    pub fn summary(&self) -> String {
        match self {
            FlowOutcome::DeleteCompleted => "Registration deleted".to_string(),
            FlowOutcome::UploadCompleted { uploaded } => {
                format!("Uploaded {} file(s)", uploaded)
            }
            FlowOutcome::SettingsApplied => "Settings applied".to_string(),
            FlowOutcome::EditorSaved => "Record saved and closed".to_string(),
            FlowOutcome::BulkCompleted { processed } => {
                format!("Bulk action applied to {} item(s)", processed)
            }
            FlowOutcome::TutorialFinished => "Tutorial finished".to_string(),
            FlowOutcome::Cancelled { flow } => format!("{} flow cancelled", flow),
            FlowOutcome::StandaloneConfirmed => "Confirmed".to_string(),
            FlowOutcome::StandaloneSelection { items } => {
                format!("Selected {} item(s)", items.len())
            }
            FlowOutcome::StandaloneCancelled => "Dismissed".to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_action_strings() {
        assert_eq!(FlowOutcome::DeleteCompleted.action(), "delete_flow_completed");
        assert_eq!(
            FlowOutcome::BulkCompleted { processed: 3 }.action(),
            "bulk_flow_completed"
        );
        assert_eq!(
            FlowOutcome::Cancelled { flow: FlowId::Upload }.action(),
            "upload_flow_cancelled"
        );
    }

    #[test]
    fn test_processed_counts() {
        assert_eq!(FlowOutcome::BulkCompleted { processed: 5 }.processed(), Some(5));
        assert_eq!(FlowOutcome::UploadCompleted { uploaded: 2 }.processed(), Some(2));
        assert_eq!(FlowOutcome::SettingsApplied.processed(), None);
    }
}
