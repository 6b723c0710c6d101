//! Tracking of in-flight dispatches for bulk waiting.

use futures::future::{join_all, BoxFuture, Shared};
use futures::FutureExt;
use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex};
use tokio::sync::oneshot;

type Completion = Shared<BoxFuture<'static, ()>>;

#[derive(Default)]
struct PendingInner {
    next_id: AtomicU64,
    entries: Mutex<HashMap<u64, Completion>>,
}

/// Set of not-yet-settled dispatch handles.
///
/// An entry is added when a dispatch begins and removed when its result
/// settles, success or failure. [`PendingSet::wait_all`] snapshots the
/// current entries, so dispatches started afterwards are not waited on.
#[derive(Clone, Default)]
pub(crate) struct PendingSet {
    inner: Arc<PendingInner>,
}

impl std::fmt::Debug for PendingSet {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PendingSet")
            .field("tracked", &self.len())
            .finish()
    }
}

impl PendingSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Track a new dispatch. The returned ticket settles the entry when
    /// dropped or settled explicitly.
    pub fn register(&self) -> PendingTicket {
        let id = self.inner.next_id.fetch_add(1, Ordering::Relaxed);
        let (tx, rx) = oneshot::channel::<()>();
        // Completion fires on send or on sender drop, either way the
        // dispatch is settled.
        let completion = rx.map(|_| ()).boxed().shared();
        self.inner
            .entries
            .lock()
            .expect("pending set poisoned")
            .insert(id, completion);
        PendingTicket {
            id,
            tx: Some(tx),
            set: self.clone(),
        }
    }

    /// Number of currently tracked dispatches.
    pub fn len(&self) -> usize {
        self.inner.entries.lock().expect("pending set poisoned").len()
    }

    /// Wait for every dispatch tracked at call time to settle.
    pub async fn wait_all(&self) {
        let snapshot: Vec<Completion> = self
            .inner
            .entries
            .lock()
            .expect("pending set poisoned")
            .values()
            .cloned()
            .collect();
        join_all(snapshot).await;
    }

    fn settle(&self, id: u64, tx: Option<oneshot::Sender<()>>) {
        if let Some(tx) = tx {
            let _ = tx.send(());
        }
        self.inner
            .entries
            .lock()
            .expect("pending set poisoned")
            .remove(&id);
    }
}

/// Handle for one tracked dispatch.
#[derive(Debug)]
pub(crate) struct PendingTicket {
    id: u64,
    tx: Option<oneshot::Sender<()>>,
    set: PendingSet,
}

impl PendingTicket {
    /// Mark the dispatch as settled and stop tracking it.
    pub fn settle(mut self) {
        let tx = self.tx.take();
        self.set.settle(self.id, tx);
    }
}

impl Drop for PendingTicket {
    fn drop(&mut self) {
        // A dropped dispatch future still settles its entry
        if let Some(tx) = self.tx.take() {
            self.set.settle(self.id, Some(tx));
        }
    }
}
