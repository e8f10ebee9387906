//! Requests bound to the lifetime of a view.
//!
//! Every view owns a [`ViewScope`]. Work spawned through it reports back on
//! the app's channel tagged with the scope id; dropping the scope aborts
//! whatever is still running, and the app discards results from any scope
//! other than the current one.

use std::future::Future;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;

pub type ScopeId = u64;

/// Result of scoped work, tagged with the scope that spawned it
#[derive(Debug)]
pub struct Envelope<E> {
    pub scope: ScopeId,
    pub event: E,
}

pub struct ViewScope<E: Send + 'static> {
    id: ScopeId,
    tx: mpsc::UnboundedSender<Envelope<E>>,
    handles: Vec<JoinHandle<()>>,
}

impl<E: Send + 'static> ViewScope<E> {
    pub fn new(id: ScopeId, tx: mpsc::UnboundedSender<Envelope<E>>) -> Self {
        Self {
            id,
            tx,
            handles: Vec::new(),
        }
    }

    pub fn id(&self) -> ScopeId {
        self.id
    }

    /// Run `work` on the runtime and deliver its output as an event
    pub fn spawn<F>(&mut self, work: F)
    where
        F: Future<Output = E> + Send + 'static,
    {
        self.handles.retain(|h| !h.is_finished());

        let tx = self.tx.clone();
        let scope = self.id;
        self.handles.push(tokio::spawn(async move {
            let event = work.await;
            // receiver gone means the app is shutting down
            let _ = tx.send(Envelope { scope, event });
        }));
    }

    pub fn in_flight(&self) -> usize {
        self.handles.iter().filter(|h| !h.is_finished()).count()
    }

    /// Abort everything still running
    pub fn cancel(&mut self) {
        let aborted = self.handles.len();
        for handle in self.handles.drain(..) {
            handle.abort();
        }
        if aborted > 0 {
            tracing::debug!(scope = self.id, aborted, "view scope cancelled");
        }
    }
}

impl<E: Send + 'static> Drop for ViewScope<E> {
    fn drop(&mut self) {
        self.cancel();
    }
}
