//! Outbound dialog commands
//!
//! The orchestrator never touches a widget. It emits these commands over a
//! channel; the host page applies them to the dialog manager. Each request
//! struct is the full payload the matching surface needs to open.

use super::state::SelectableItem;

/// Visual register of a confirmation or alert.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tone {
    Info,
    Success,
    Warning,
    Danger,
}

/// Payload for the confirmation surface.
#[derive(Debug, Clone, PartialEq)]
pub struct ConfirmRequest {
    pub title: String,
    pub message: String,
    pub confirm_label: String,
    pub cancel_label: String,
    pub tone: Tone,
}

impl ConfirmRequest {
    pub fn new(title: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            message: message.into(),
            confirm_label: "Confirm".to_string(),
            cancel_label: "Cancel".to_string(),
            tone: Tone::Info,
        }
    }

    pub fn with_labels(
        mut self,
        confirm: impl Into<String>,
        cancel: impl Into<String>,
    ) -> Self {
        self.confirm_label = confirm.into();
        self.cancel_label = cancel.into();
        self
    }

    pub fn with_tone(mut self, tone: Tone) -> Self {
        self.tone = tone;
        self
    }
}

/// Payload for the alert surface.
#[derive(Debug, Clone, PartialEq)]
pub struct AlertRequest {
    pub title: String,
    pub message: String,
    pub tone: Tone,
    /// Lines shown under the message (the upload flow's results gallery).
    pub items: Vec<String>,
    /// When set, the alert's primary action advances the tutorial to this step.
    pub next_step: Option<u32>,
}

impl AlertRequest {
    pub fn new(title: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            message: message.into(),
            tone: Tone::Info,
            items: Vec::new(),
            next_step: None,
        }
    }

    pub fn with_tone(mut self, tone: Tone) -> Self {
        self.tone = tone;
        self
    }

    pub fn with_items(mut self, items: Vec<String>) -> Self {
        self.items = items;
        self
    }

    pub fn with_next_step(mut self, step: u32) -> Self {
        self.next_step = Some(step);
        self
    }
}

/// Payload for the progress surface.
#[derive(Debug, Clone, PartialEq)]
pub struct ProgressRequest {
    pub title: String,
    pub message: String,
    /// Number of items the operation covers, when known (bulk flow).
    pub total_items: Option<usize>,
}

impl ProgressRequest {
    pub fn new(title: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            message: message.into(),
            total_items: None,
        }
    }

    pub fn with_total_items(mut self, total: usize) -> Self {
        self.total_items = Some(total);
        self
    }
}

/// Payload for the item-selection surface.
#[derive(Debug, Clone, PartialEq)]
pub struct SelectionRequest {
    pub title: String,
    pub prompt: String,
    pub items: Vec<SelectableItem>,
}

impl SelectionRequest {
    pub fn new(title: impl Into<String>, prompt: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            prompt: prompt.into(),
            items: Vec::new(),
        }
    }

    pub fn with_items(mut self, items: Vec<SelectableItem>) -> Self {
        self.items = items;
        self
    }
}

/// Payload for the tabbed settings surface.
#[derive(Debug, Clone, PartialEq)]
pub struct SettingsRequest {
    pub title: String,
    pub tabs: Vec<String>,
    /// The editor flow opens this surface fullscreen.
    pub fullscreen: bool,
}

impl SettingsRequest {
    pub fn new(title: impl Into<String>, tabs: Vec<String>) -> Self {
        Self {
            title: title.into(),
            tabs,
            fullscreen: false,
        }
    }

    pub fn fullscreen(mut self) -> Self {
        self.fullscreen = true;
        self
    }
}

/// The five interchangeable dialog surface kinds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SurfaceKind {
    Confirm,
    Alert,
    Progress,
    Selection,
    Settings,
}

/// A single outbound call from the orchestrator to the dialog layer.
#[derive(Debug, Clone, PartialEq)]
pub enum DialogCommand {
    OpenConfirm(ConfirmRequest),
    OpenAlert(AlertRequest),
    OpenProgress(ProgressRequest),
    OpenSelection(SelectionRequest),
    OpenSettings(SettingsRequest),
    Close(SurfaceKind),
    UpdateProgress(u16),
}

impl DialogCommand {
    /// The surface a command opens, if it opens one.
    pub fn opens(&self) -> Option<SurfaceKind> {
        match self {
            DialogCommand::OpenConfirm(_) => Some(SurfaceKind::Confirm),
            DialogCommand::OpenAlert(_) => Some(SurfaceKind::Alert),
            DialogCommand::OpenProgress(_) => Some(SurfaceKind::Progress),
            DialogCommand::OpenSelection(_) => Some(SurfaceKind::Selection),
            DialogCommand::OpenSettings(_) => Some(SurfaceKind::Settings),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_confirm_request_builder() {
        let req = ConfirmRequest::new("Delete", "Really?")
            .with_labels("Delete", "Keep")
            .with_tone(Tone::Danger);
        assert_eq!(req.confirm_label, "Delete");
        assert_eq!(req.tone, Tone::Danger);
    }

    #[test]
    fn test_command_opens() {
        let cmd = DialogCommand::OpenProgress(ProgressRequest::new("Working", "..."));
        assert_eq!(cmd.opens(), Some(SurfaceKind::Progress));
        assert_eq!(DialogCommand::UpdateProgress(50).opens(), None);
        assert_eq!(DialogCommand::Close(SurfaceKind::Alert).opens(), None);
    }
}
