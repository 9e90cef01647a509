//! Toolkit-independent client state: navigation, the two drafts, the last
//! assistant answer and the one-shot notice slots.
//!
//! Every mutation goes through a method on [`Session`] and is recorded with
//! [`Session::notify`], so a view layer only has to watch `revision()` or
//! drain `take_changes()`.

use crate::error::BackendError;
use crate::navigation::{Navigation, Panel};
use crate::notice::{Notice, OneShot};

pub const DIARY_SAVED: &str = "Diary entry saved!";
pub const DIARY_REJECTED: &str = "Failed to save the diary entry.";
pub const NO_RESPONSE: &str = "No response received.";
pub const ASSISTANT_FAILURE: &str = "Failed to get a response. Please try again later.";

/// Which part of the session a mutation touched.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Change {
    ActivePanel,
    SidePanel,
    DiaryDraft,
    QueryDraft,
    Answer,
    InFlight,
    PendingError,
    Acknowledgment,
}

/// A diary save that passed the input gate. `entry` is already trimmed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DiarySubmission {
    pub entry: String,
}

/// An assistant question that passed the input gate. `query` is already trimmed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AssistantQuery {
    pub query: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DiaryOutcome {
    Saved,
    Failed,
}

#[derive(Debug, Default)]
pub struct Session {
    navigation: Navigation,
    diary_draft: String,
    query_draft: String,
    answer: String,
    diaries_in_flight: usize,
    queries_in_flight: usize,
    pending_error: OneShot<String>,
    pending_acknowledgment: OneShot<String>,
    revision: u64,
    changes: Vec<Change>,
}

impl Session {
    pub fn new() -> Self {
        Self::default()
    }

    // Navigation

    pub fn active_panel(&self) -> Panel {
        self.navigation.active()
    }

    pub fn side_panel_expanded(&self) -> bool {
        self.navigation.side_panel_expanded()
    }

    pub fn select_panel(&mut self, panel: Panel) {
        if self.navigation.select_panel(panel) {
            self.notify(Change::ActivePanel);
        }
    }

    pub fn begin_hover(&mut self) {
        if self.navigation.begin_hover() {
            self.notify(Change::SidePanel);
        }
    }

    pub fn end_hover(&mut self) {
        if self.navigation.end_hover() {
            self.notify(Change::SidePanel);
        }
    }

    // Diary workflow

    pub fn diary_draft(&self) -> &str {
        &self.diary_draft
    }

    pub fn set_diary_draft(&mut self, text: impl Into<String>) {
        self.diary_draft = text.into();
        self.notify(Change::DiaryDraft);
    }

    /// Whether the save control is enabled.
    pub fn can_submit_diary(&self) -> bool {
        !self.diary_draft.trim().is_empty()
    }

    pub fn diaries_in_flight(&self) -> usize {
        self.diaries_in_flight
    }

    /// Passes the input gate and marks a save as outstanding. Returns `None`
    /// when the trimmed draft is empty. Earlier outstanding saves are neither
    /// awaited nor cancelled.
    pub fn submit_diary(&mut self) -> Option<DiarySubmission> {
        if !self.can_submit_diary() {
            return None;
        }

        let entry = self.diary_draft.trim().to_string();
        self.diaries_in_flight += 1;
        self.notify(Change::InFlight);

        Some(DiarySubmission { entry })
    }

    /// Applies the result of one save issued by [`Session::submit_diary`].
    pub fn complete_diary(&mut self, result: Result<(), BackendError>) -> DiaryOutcome {
        self.diaries_in_flight = self.diaries_in_flight.saturating_sub(1);
        self.notify(Change::InFlight);

        match result {
            Ok(()) => {
                tracing::info!("diary entry saved");
                self.diary_draft.clear();
                self.notify(Change::DiaryDraft);
                self.pending_acknowledgment.post(DIARY_SAVED.to_string());
                self.notify(Change::Acknowledgment);
                DiaryOutcome::Saved
            }
            Err(err) => {
                tracing::error!(error = %err, "error saving diary entry");
                let message = match err {
                    BackendError::Rejected { .. } => DIARY_REJECTED.to_string(),
                    other => format!("{} ({})", DIARY_REJECTED, other),
                };
                self.report_error(message);
                DiaryOutcome::Failed
            }
        }
    }

    // Assistant workflow

    pub fn query_draft(&self) -> &str {
        &self.query_draft
    }

    pub fn set_query_draft(&mut self, text: impl Into<String>) {
        self.query_draft = text.into();
        self.notify(Change::QueryDraft);
    }

    /// Whether the ask control is enabled.
    pub fn can_ask_assistant(&self) -> bool {
        !self.query_draft.trim().is_empty()
    }

    pub fn queries_in_flight(&self) -> usize {
        self.queries_in_flight
    }

    /// Last answer shown in the assistant panel; empty until a query completes.
    pub fn answer(&self) -> &str {
        &self.answer
    }

    /// Same gate and concurrency rules as [`Session::submit_diary`]. The query
    /// draft is kept so the question can be refined and asked again.
    pub fn ask_assistant(&mut self) -> Option<AssistantQuery> {
        if !self.can_ask_assistant() {
            return None;
        }

        let query = self.query_draft.trim().to_string();
        self.queries_in_flight += 1;
        self.notify(Change::InFlight);

        Some(AssistantQuery { query })
    }

    pub fn complete_query(&mut self, result: Result<Option<String>, BackendError>) {
        self.queries_in_flight = self.queries_in_flight.saturating_sub(1);
        self.notify(Change::InFlight);

        self.answer = match result {
            Ok(Some(answer)) if !answer.trim().is_empty() => answer,
            Ok(_) => NO_RESPONSE.to_string(),
            Err(err) => {
                tracing::error!(error = %err, "error querying the assistant");
                self.report_error(format!("Error querying the assistant: {}", err));
                ASSISTANT_FAILURE.to_string()
            }
        };
        self.notify(Change::Answer);
    }

    // Notices

    /// Posts into the shared error slot, replacing any undelivered message.
    pub fn report_error(&mut self, message: impl Into<String>) {
        if let Some(dropped) = self.pending_error.post(message.into()) {
            tracing::debug!(%dropped, "undelivered error replaced");
        }
        self.notify(Change::PendingError);
    }

    pub fn pending_error(&self) -> Option<&str> {
        self.pending_error.peek().map(String::as_str)
    }

    pub fn drain_error(&mut self) -> Option<String> {
        let message = self.pending_error.drain()?;
        self.notify(Change::PendingError);
        Some(message)
    }

    pub fn drain_acknowledgment(&mut self) -> Option<String> {
        let message = self.pending_acknowledgment.drain()?;
        self.notify(Change::Acknowledgment);
        Some(message)
    }

    /// Drains the next notice to surface. Errors win over acknowledgments;
    /// the other slot stays pending for the next call.
    pub fn next_notice(&mut self) -> Option<Notice> {
        if let Some(message) = self.drain_error() {
            return Some(Notice::error(message));
        }
        self.drain_acknowledgment().map(Notice::success)
    }

    // Observation

    pub fn revision(&self) -> u64 {
        self.revision
    }

    /// Changes recorded since the last call, oldest first.
    pub fn take_changes(&mut self) -> Vec<Change> {
        std::mem::take(&mut self.changes)
    }

    fn notify(&mut self, change: Change) {
        self.revision += 1;
        self.changes.push(change);
    }
}
