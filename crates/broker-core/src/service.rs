//! Thin facade binding (tenant, queue, operation) to the queue manager and
//! message queue. Stateless; methods mirror the wire protocol commands.
//! No retries — every error passes through unchanged.

use crate::error::Error;
use crate::manager::QueueManager;
use crate::message::{Message, MessageId, QueueName, TenantId};
use bytes::Bytes;
use std::sync::Arc;

#[derive(Clone)]
pub struct QueueService {
    manager: Arc<QueueManager>,
}

impl QueueService {
    pub fn new(manager: Arc<QueueManager>) -> Self {
        Self { manager }
    }

    pub fn create_queue(&self, tenant: TenantId, name: impl Into<String>) -> Result<(), Error> {
        self.manager.create_queue(tenant, name)?;
        Ok(())
    }

    pub fn list_queues(&self, tenant: &TenantId) -> Vec<String> {
        self.manager
            .list_queues(tenant)
            .into_iter()
            .map(|queue| queue.name().to_string())
            .collect()
    }

    pub fn delete_queue(&self, tenant: &TenantId, name: &QueueName) -> Result<(), Error> {
        self.manager.delete_queue(tenant, name)
    }

    pub fn publish(&self, tenant: &TenantId, name: &QueueName, data: Bytes) -> Result<MessageId, Error> {
        let queue = self.manager.get_queue(tenant, name)?;
        queue.publish(data)
    }

    /// Dequeue a message, if any. Callers that need the "OK with empty
    /// body" wire behavior on `QueueEmpty` translate that error themselves;
    /// this facade passes it through like any other error.
    pub fn consume(&self, tenant: &TenantId, name: &QueueName) -> Result<Message, Error> {
        let queue = self.manager.get_queue(tenant, name)?;
        queue.consume()
    }

    pub fn delete(&self, tenant: &TenantId, name: &QueueName, id: MessageId) -> Result<(), Error> {
        let queue = self.manager.get_queue(tenant, name)?;
        queue.delete(id)
    }
}

#[cfg(test)]
#[path = "service_tests.rs"]
mod tests;
