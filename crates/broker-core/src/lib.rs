//! # Broker Core
//!
//! The delivery engine for the VerniyMQ message broker: a thread-safe FIFO
//! backlog, an in-flight map with atomic get-and-delete, a visibility-timeout
//! scheduler, and the multi-tenant queue manager that ties them together.
//!
//! ## Module Organization
//!
//! - [error] - Error types for all queue operations
//! - [message] - Message and identifier newtypes
//! - [fifo] - Thread-safe FIFO backlog
//! - [kv] - Thread-safe key-value store with atomic get-and-delete
//! - [queue] - Per-queue delivery engine (backlog + in-flight + timers)
//! - [manager] - Multi-tenant directory of message queues
//! - [service] - Facade binding (tenant, queue, operation) to manager/queue

pub mod error;
pub mod fifo;
pub mod kv;
pub mod manager;
pub mod message;
pub mod queue;
pub mod service;

pub use error::{Error, ValidationError};
pub use fifo::Fifo;
pub use kv::KvStore;
pub use manager::QueueManager;
pub use message::{Message, MessageId, QueueKey, QueueName, TenantId};
pub use queue::{MessageQueue, DEFAULT_VISIBILITY_TIMEOUT};
pub use service::QueueService;
