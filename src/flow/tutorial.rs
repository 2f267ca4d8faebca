//! Tutorial step table
//!
//! The tutorial is the degenerate case of the transition table: a fixed
//! linear sequence of informational messages, the last one terminal.

/// One message in the onboarding tour.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TutorialStep {
    pub title: &'static str,
    pub message: &'static str,
}

pub const TUTORIAL_STEPS: &[TutorialStep] = &[
    TutorialStep {
        title: "Welcome",
        message: "Welcome to the registration console. This short tour walks you \
                  through the main admin actions.",
    },
    TutorialStep {
        title: "Registrations",
        message: "Courses and drivers are listed on the home page. Press 'd' on a \
                  registration to delete it after a confirmation.",
    },
    TutorialStep {
        title: "Uploading rosters",
        message: "Press 'u' to pick roster files. Uploads run with a progress bar \
                  and finish with a results overview.",
    },
    TutorialStep {
        title: "Bulk actions",
        message: "Press 'b' to select several registrations at once and apply one \
                  action to all of them.",
    },
    TutorialStep {
        title: "All set",
        message: "That's it. Open settings with 's' any time to adjust the console.",
    },
];

/// Number of steps in the tour.
pub fn step_count() -> u32 {
    TUTORIAL_STEPS.len() as u32
}

/// Step lookup by 1-based position.
pub fn step(position: u32) -> Option<&'static TutorialStep> {
    if position == 0 {
        return None;
    }
    TUTORIAL_STEPS.get(position as usize - 1)
}

/// Whether the given 1-based position is the terminal message.
pub fn is_terminal(position: u32) -> bool {
    position == step_count()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_step_lookup_is_one_based() {
        assert!(step(0).is_none());
        assert_eq!(step(1).unwrap().title, "Welcome");
        assert_eq!(step(step_count()).unwrap().title, "All set");
        assert!(step(step_count() + 1).is_none());
    }

    #[test]
    fn test_only_last_step_is_terminal() {
        for pos in 1..step_count() {
            assert!(!is_terminal(pos));
        }
        assert!(is_terminal(step_count()));
    }
}
