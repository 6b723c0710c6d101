//! Ordered, append-only call log for later inspection.

use crate::types::request::{MockRequest, RequestOptions};
use std::sync::Mutex;

/// One recorded dispatch attempt.
#[derive(Debug, Clone)]
pub struct CallRecord {
    /// Requested URL
    pub url: String,
    /// Normalized call options
    pub options: RequestOptions,
    /// Structured request, when one was provided
    pub request: Option<MockRequest>,
    /// Identifier of the matched route, `None` for unmatched attempts
    pub identifier: Option<String>,
    /// Whether the attempt fell outside every registered route
    pub unmatched: bool,
}

/// Append-only log of dispatch attempts.
///
/// Records are appended synchronously during routing, so log order is
/// attempt order even when dispatches settle out of order. Entries live
/// until [`CallLog::clear`].
#[derive(Debug, Default)]
pub struct CallLog {
    records: Mutex<Vec<CallRecord>>,
}

impl CallLog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record(
        &self,
        url: &str,
        options: &RequestOptions,
        request: Option<&MockRequest>,
        identifier: Option<&str>,
        unmatched: bool,
    ) {
        let record = CallRecord {
            url: url.to_string(),
            options: options.clone(),
            request: request.cloned(),
            identifier: identifier.map(str::to_string),
            unmatched,
        };
        self.records.lock().expect("call log poisoned").push(record);
    }

    /// All recorded attempts, in attempt order.
    pub fn calls(&self) -> Vec<CallRecord> {
        self.records.lock().expect("call log poisoned").clone()
    }

    /// Attempts that matched a registered route.
    pub fn matched_calls(&self) -> Vec<CallRecord> {
        self.calls().into_iter().filter(|c| !c.unmatched).collect()
    }

    /// Attempts that fell outside every registered route.
    pub fn unmatched_calls(&self) -> Vec<CallRecord> {
        self.calls().into_iter().filter(|c| c.unmatched).collect()
    }

    pub fn len(&self) -> usize {
        self.records.lock().expect("call log poisoned").len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn clear(&self) {
        self.records.lock().expect("call log poisoned").clear();
    }
}
