//! Per-queue delivery engine: FIFO backlog + in-flight map + visibility
//! timer scheduler.

use crate::error::Error;
use crate::fifo::Fifo;
use crate::kv::KvStore;
use crate::message::{Message, MessageId, QueueName, TenantId};
use bytes::Bytes;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, Weak};
use std::time::Duration;
use tokio::task::JoinHandle;
use tracing::{debug, warn};

/// Default visibility timeout applied to newly created queues, matching the
/// source system's one-minute default.
pub const DEFAULT_VISIBILITY_TIMEOUT: Duration = Duration::from_secs(60);

/// A single tenant-scoped queue: FIFO backlog, in-flight set, and the
/// visibility-timeout timers that return expired in-flight messages to the
/// backlog.
pub struct MessageQueue {
    tenant: TenantId,
    name: QueueName,
    visibility_timeout: Duration,
    backlog: Fifo,
    inflight: KvStore<MessageId, Message>,
    timers: Mutex<std::collections::HashMap<MessageId, JoinHandle<()>>>,
    destroyed: AtomicBool,
    weak_self: Weak<MessageQueue>,
}

impl MessageQueue {
    /// Construct a new queue wrapped in an `Arc`, wiring up the weak
    /// self-reference the visibility timers need so a timer task never
    /// pins the queue against destruction.
    pub fn new(tenant: TenantId, name: QueueName, visibility_timeout: Duration) -> Arc<Self> {
        Arc::new_cyclic(|weak| Self {
            tenant,
            name,
            visibility_timeout,
            backlog: Fifo::new(),
            inflight: KvStore::new(),
            timers: Mutex::new(std::collections::HashMap::new()),
            destroyed: AtomicBool::new(false),
            weak_self: weak.clone(),
        })
    }

    pub fn tenant(&self) -> &TenantId {
        &self.tenant
    }

    pub fn name(&self) -> &QueueName {
        &self.name
    }

    fn ensure_alive(&self) -> Result<(), Error> {
        if self.destroyed.load(Ordering::Acquire) {
            Err(Error::QueueGone(self.name.to_string()))
        } else {
            Ok(())
        }
    }

    /// Append a freshly-identified message to the backlog. Succeeds unless
    /// the queue is destroyed.
    pub fn publish(&self, data: Bytes) -> Result<MessageId, Error> {
        self.ensure_alive()?;
        let message = Message::new(data);
        let id = message.id;
        self.backlog.enqueue(message);
        Ok(id)
    }

    /// Dequeue the head message, move it to in-flight, and arm its
    /// visibility timer.
    pub fn consume(&self) -> Result<Message, Error> {
        self.ensure_alive()?;
        let message = self.backlog.dequeue()?;
        self.inflight.store(message.id, message.clone());
        self.arm_timer(message.id);
        Ok(message)
    }

    fn arm_timer(&self, id: MessageId) {
        let weak = self.weak_self.clone();
        let timeout = self.visibility_timeout;
        let handle = tokio::spawn(async move {
            tokio::time::sleep(timeout).await;
            if let Some(queue) = weak.upgrade() {
                queue.make_available(id);
            }
        });
        self.timers.lock().unwrap().insert(id, handle);
    }

    fn cancel_timer(&self, id: &MessageId) {
        if let Some(handle) = self.timers.lock().unwrap().remove(id) {
            handle.abort();
        }
    }

    /// Acknowledge delivery of `id`. Idempotent: repeated or late deletes
    /// after the visibility timer already fired are silent no-ops.
    pub fn delete(&self, id: MessageId) -> Result<(), Error> {
        self.ensure_alive()?;
        self.inflight.get_and_delete(&id);
        self.cancel_timer(&id);
        Ok(())
    }

    /// Invoked by a fired visibility timer. Races the concurrent
    /// acknowledger via `get_and_delete`: exactly one of {`delete`,
    /// `make_available`} observes the message, the loser is a no-op.
    fn make_available(&self, id: MessageId) {
        self.timers.lock().unwrap().remove(&id);
        match self.inflight.get_and_delete(&id) {
            Some(message) => {
                debug!(message_id = %id, queue = %self.name, "redelivering message to backlog");
                self.backlog.enqueue(message);
            }
            None => {
                debug!(message_id = %id, queue = %self.name, "visibility timer fired after ack, no-op");
            }
        }
    }

    /// Cancel all timers, clear the backlog and in-flight set. Subsequent
    /// operations return `QueueGone`.
    pub fn destroy(&self) {
        self.destroyed.store(true, Ordering::Release);
        let mut timers = self.timers.lock().unwrap();
        for (_, handle) in timers.drain() {
            handle.abort();
        }
        drop(timers);
        self.backlog.clear();
        self.inflight.clear();
        warn!(queue = %self.name, tenant = %self.tenant, "queue destroyed");
    }
}

#[cfg(test)]
#[path = "queue_tests.rs"]
mod tests;
