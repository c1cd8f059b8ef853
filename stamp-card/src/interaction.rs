//! User interaction port (notifications and confirmations)

use std::collections::VecDeque;
use std::sync::{Arc, Mutex};

/// Blocking dialogs shown to the card holder
pub trait UserInteraction {
    /// Fire-and-forget message
    fn notify(&self, message: &str);

    /// Yes/no question; `true` means the user agreed
    fn confirm(&self, message: &str) -> bool;
}

impl<T: UserInteraction + ?Sized> UserInteraction for Arc<T> {
    fn notify(&self, message: &str) {
        (**self).notify(message)
    }

    fn confirm(&self, message: &str) -> bool {
        (**self).confirm(message)
    }
}

impl<T: UserInteraction + ?Sized> UserInteraction for Box<T> {
    fn notify(&self, message: &str) {
        (**self).notify(message)
    }

    fn confirm(&self, message: &str) -> bool {
        (**self).confirm(message)
    }
}

/// Headless interaction that records every dialog
///
/// Confirmations are answered from a script of queued answers, falling back
/// to a default answer (`false` unless changed) once the script runs out.
#[derive(Debug, Default)]
pub struct RecordingInteraction {
    state: Mutex<RecordingState>,
}

#[derive(Debug, Default)]
struct RecordingState {
    notifications: Vec<String>,
    confirmations: Vec<String>,
    answers: VecDeque<bool>,
    default_answer: bool,
}

impl RecordingInteraction {
    pub fn new() -> Self {
        Self::default()
    }

    /// Answer every confirmation with `answer`
    pub fn answering(answer: bool) -> Self {
        let interaction = Self::new();
        interaction.lock().default_answer = answer;
        interaction
    }

    /// Queue the answer for the next unanswered confirmation
    pub fn push_answer(&self, answer: bool) {
        self.lock().answers.push_back(answer);
    }

    pub fn notifications(&self) -> Vec<String> {
        self.lock().notifications.clone()
    }

    pub fn last_notification(&self) -> Option<String> {
        self.lock().notifications.last().cloned()
    }

    pub fn confirmations(&self) -> Vec<String> {
        self.lock().confirmations.clone()
    }

    /// Drop every recorded notification
    pub fn clear(&self) {
        self.lock().notifications.clear();
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, RecordingState> {
        self.state.lock().unwrap_or_else(|e| e.into_inner())
    }
}

impl UserInteraction for RecordingInteraction {
    fn notify(&self, message: &str) {
        tracing::debug!(message, "notify");
        self.lock().notifications.push(message.to_string());
    }

    fn confirm(&self, message: &str) -> bool {
        let mut state = self.lock();
        state.confirmations.push(message.to_string());
        let answer = state.answers.pop_front().unwrap_or(state.default_answer);
        tracing::debug!(message, answer, "confirm");
        answer
    }
}
