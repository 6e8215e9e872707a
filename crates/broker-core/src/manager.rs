//! Multi-tenant directory of message queues.

use crate::error::Error;
use crate::message::{QueueKey, QueueName, TenantId};
use crate::queue::MessageQueue;
use std::collections::HashMap;
use std::sync::{Arc, RwLock};
use std::time::Duration;
use tracing::info;

/// Maps `(tenant, name)` to its `MessageQueue`. Create/delete are
/// serialized behind a single mutex (here, the write side of an
/// `RwLock`) so that concurrent `createQueue` calls on the same key cannot
/// both succeed; list iterates a read-locked snapshot.
pub struct QueueManager {
    queues: RwLock<HashMap<QueueKey, Arc<MessageQueue>>>,
    default_visibility_timeout: Duration,
}

impl QueueManager {
    pub fn new(default_visibility_timeout: Duration) -> Self {
        Self {
            queues: RwLock::new(HashMap::new()),
            default_visibility_timeout,
        }
    }

    /// Reject empty names, names over 128 runes, embedded NUL (via
    /// `QueueName::new`), and duplicate keys.
    pub fn create_queue(
        &self,
        tenant: TenantId,
        name: impl Into<String>,
    ) -> Result<Arc<MessageQueue>, Error> {
        let name = QueueName::new(name)?;
        let key = QueueKey::new(tenant.clone(), name.clone());

        let mut queues = self.queues.write().unwrap();
        if queues.contains_key(&key) {
            return Err(Error::AlreadyExists(name.to_string()));
        }
        let queue = MessageQueue::new(tenant.clone(), name.clone(), self.default_visibility_timeout);
        queues.insert(key, queue.clone());
        info!(tenant = %tenant, queue = %name, "queue created");
        Ok(queue)
    }

    pub fn get_queue(&self, tenant: &TenantId, name: &QueueName) -> Result<Arc<MessageQueue>, Error> {
        let key = QueueKey::new(tenant.clone(), name.clone());
        self.queues
            .read()
            .unwrap()
            .get(&key)
            .cloned()
            .ok_or_else(|| Error::QueueNotFound(name.to_string()))
    }

    /// Snapshot filtered by tenant; ordering is unspecified.
    pub fn list_queues(&self, tenant: &TenantId) -> Vec<Arc<MessageQueue>> {
        self.queues
            .read()
            .unwrap()
            .values()
            .filter(|queue| queue.tenant() == tenant)
            .cloned()
            .collect()
    }

    /// Fetch and destroy the queue, then remove it from the directory.
    pub fn delete_queue(&self, tenant: &TenantId, name: &QueueName) -> Result<(), Error> {
        let key = QueueKey::new(tenant.clone(), name.clone());
        let mut queues = self.queues.write().unwrap();
        match queues.remove(&key) {
            Some(queue) => {
                queue.destroy();
                info!(tenant = %tenant, queue = %name, "queue deleted");
                Ok(())
            }
            None => Err(Error::QueueNotFound(name.to_string())),
        }
    }
}

impl Default for QueueManager {
    fn default() -> Self {
        Self::new(crate::queue::DEFAULT_VISIBILITY_TIMEOUT)
    }
}

#[cfg(test)]
#[path = "manager_tests.rs"]
mod tests;
