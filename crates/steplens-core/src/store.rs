//! The currently displayed decompilation result

use crate::model::StepSet;
use std::fmt;

/// Identity of one decompilation request
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct RequestId(u64);

impl fmt::Display for RequestId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StoreStatus {
    Empty,
    Loading,
    Ready,
    Failed(String),
}

/// Outcome of delivering a response to the store
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StoreUpdate {
    /// A newer request was issued since; the response was discarded
    Stale,
    Replaced { steps: usize },
    /// The request failed and the store is now empty
    Cleared { message: String },
}

/// Holds the step set for the latest request, replaced wholesale
#[derive(Debug, Default)]
pub struct StepStore {
    set: StepSet,
    latest: Option<RequestId>,
    next_id: u64,
    pending: bool,
    error: Option<String>,
}

impl StepStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn steps(&self) -> &StepSet {
        &self.set
    }

    pub fn is_pending(&self) -> bool {
        self.pending
    }

    /// The request still waiting for a response, if any
    pub fn pending_request(&self) -> Option<RequestId> {
        self.latest.filter(|_| self.pending)
    }

    pub fn status(&self) -> StoreStatus {
        if self.pending {
            StoreStatus::Loading
        } else if let Some(message) = &self.error {
            StoreStatus::Failed(message.clone())
        } else if self.set.is_empty() {
            StoreStatus::Empty
        } else {
            StoreStatus::Ready
        }
    }

    /// Start a new request, superseding any pending one
    pub fn begin_request(&mut self) -> RequestId {
        self.next_id += 1;
        let id = RequestId(self.next_id);
        self.latest = Some(id);
        self.pending = true;
        tracing::debug!(request = %id, "decompile requested");
        id
    }

    /// Deliver the response for `id`. Responses to anything but the latest
    /// request are ignored, whatever order they arrive in.
    pub fn complete<E: fmt::Display>(
        &mut self,
        id: RequestId,
        result: Result<StepSet, E>,
    ) -> StoreUpdate {
        if self.latest != Some(id) || !self.pending {
            tracing::debug!(request = %id, "discarding stale response");
            return StoreUpdate::Stale;
        }
        self.pending = false;

        match result {
            Ok(set) => {
                let steps = set.step_count();
                self.set = set;
                self.error = None;
                StoreUpdate::Replaced { steps }
            }
            Err(err) => {
                let message = err.to_string();
                tracing::error!(request = %id, error = %message, "decompile failed");
                self.set = StepSet::default();
                self.error = Some(message.clone());
                StoreUpdate::Cleared { message }
            }
        }
    }
}
