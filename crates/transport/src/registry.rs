//! Registry of in-flight callbacks.

use std::{
    collections::HashMap,
    sync::{Arc, Mutex, MutexGuard},
};

use serde_json::Value;
use siga_types::SigaError;
use tokio::sync::oneshot;

type Pending = HashMap<String, oneshot::Sender<Value>>;

/// Maps pending callback ids to their resolvers.
///
/// A registration lives from [`CallbackRegistry::register`] until the first of
/// a dispatch or the drop of its [`PendingCall`]. Any later dispatch for the
/// same id finds nothing and is a no-op.
#[derive(Debug, Default)]
pub struct CallbackRegistry {
    pending: Mutex<Pending>,
}

impl CallbackRegistry {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> MutexGuard<'_, Pending> {
        self.pending.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    /// Register `id` and return the handle that owns the registration.
    pub fn register(self: &Arc<Self>, id: String) -> PendingCall {
        let (tx, rx) = oneshot::channel();
        let previous = self.lock().insert(id.clone(), tx);
        debug_assert!(previous.is_none(), "callback id registered twice: {id}");
        PendingCall { id, rx, registry: Arc::clone(self) }
    }

    /// Resolve the call registered under `id` with `payload`.
    ///
    /// Returns `false` when no call is pending under `id` (already settled,
    /// timed out, or never registered).
    pub fn dispatch(&self, id: &str, payload: Value) -> bool {
        let Some(tx) = self.lock().remove(id) else {
            trace!(callback = %id, "dispatch for unknown callback ignored");
            return false;
        };
        tx.send(payload).is_ok()
    }

    /// Whether a call is pending under `id`.
    pub fn contains(&self, id: &str) -> bool {
        self.lock().contains_key(id)
    }

    /// Number of calls currently pending.
    pub fn pending(&self) -> usize {
        self.lock().len()
    }

    fn remove(&self, id: &str) {
        self.lock().remove(id);
    }
}

/// Handle owning one registration. Dropping it removes the registration.
#[derive(Debug)]
pub struct PendingCall {
    id: String,
    rx: oneshot::Receiver<Value>,
    registry: Arc<CallbackRegistry>,
}

impl PendingCall {
    /// The callback id this call answers to.
    pub fn id(&self) -> &str {
        &self.id
    }

    /// Wait until the call is dispatched.
    pub async fn settled(&mut self) -> Result<Value, SigaError> {
        (&mut self.rx)
            .await
            .map_err(|_| SigaError::transport(format!("callback {} was discarded", self.id)))
    }
}

impl Drop for PendingCall {
    fn drop(&mut self) {
        self.registry.remove(&self.id);
    }
}
