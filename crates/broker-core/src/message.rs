//! Message and identifier types for the delivery engine.

use crate::error::ValidationError;
use bytes::Bytes;
use std::fmt;
use std::str::FromStr;
use ulid::Ulid;

/// 26-byte lexicographically-sortable identifier assigned at publish time.
///
/// Backed by a ULID so that ids are monotonic-ish with wall-clock time,
/// matching the source system's `ulidGenerator`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct MessageId(Ulid);

impl MessageId {
    /// Generate a fresh id — the `fresh()` id generator named in the
    /// interface contract. Callers never construct a `MessageId` any other
    /// way in production code.
    pub fn fresh() -> Self {
        Self(Ulid::new())
    }

    /// The fixed 26-character Crockford base32 rendering of this id.
    pub fn as_str(&self) -> String {
        self.0.to_string()
    }

    /// Render into a raw 26-byte ASCII buffer, for wire encoding.
    pub fn to_bytes26(self) -> [u8; 26] {
        let s = self.0.to_string();
        let mut out = [0u8; 26];
        out.copy_from_slice(s.as_bytes());
        out
    }
}

impl fmt::Display for MessageId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for MessageId {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.len() != 26 {
            return Err(ValidationError::InvalidFormat {
                field: "message_id".to_string(),
                message: "must be exactly 26 characters".to_string(),
            });
        }
        let ulid = Ulid::from_string(s).map_err(|e| ValidationError::InvalidFormat {
            field: "message_id".to_string(),
            message: e.to_string(),
        })?;
        Ok(Self(ulid))
    }
}

/// Tenant-scoped queue name: 1..128 runes, no embedded NUL.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct QueueName(String);

impl QueueName {
    pub fn new(name: impl Into<String>) -> Result<Self, ValidationError> {
        let name = name.into();
        if name.is_empty() || name.chars().count() > 128 {
            return Err(ValidationError::OutOfRange {
                field: "queue_name".to_string(),
                message: "must be 1-128 runes".to_string(),
            });
        }
        if name.contains('\0') {
            return Err(ValidationError::InvalidFormat {
                field: "queue_name".to_string(),
                message: "must not contain NUL".to_string(),
            });
        }
        Ok(Self(name))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for QueueName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Opaque account identifier bound to a session, scoping queue names.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TenantId(String);

impl TenantId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for TenantId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Pair `(tenant, queue name)` used as the Queue Manager's map key.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct QueueKey {
    pub tenant: TenantId,
    pub name: QueueName,
}

impl QueueKey {
    pub fn new(tenant: TenantId, name: QueueName) -> Self {
        Self { tenant, name }
    }
}

/// An immutable published message.
#[derive(Debug, Clone)]
pub struct Message {
    pub id: MessageId,
    pub data: Bytes,
}

impl Message {
    /// Construct a message with a freshly generated id.
    pub fn new(data: Bytes) -> Self {
        Self {
            id: MessageId::fresh(),
            data,
        }
    }
}

#[cfg(test)]
#[path = "message_tests.rs"]
mod tests;
