//! Merchant audit status and review transitions.
//!
//! The numeric ids match the seed rows of the `merchant_audit_statuses`
//! lookup table and the legacy string codes (`"0"`..`"3"`) exposed to
//! callers.

use serde::{Serialize, Serializer};

use crate::error::MerchantError;

/// Status ID type matching SMALLINT in the database.
pub type StatusId = i16;

/// Lifecycle of a merchant's qualification audit.
#[repr(i16)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AuditStatus {
    /// Registered, no application submitted yet.
    Unapplied = 0,
    /// Application submitted, waiting for review.
    Applied = 1,
    /// Application approved by an operator.
    Approved = 2,
    /// Application rejected by an operator.
    Rejected = 3,
}

impl AuditStatus {
    /// Return the database status ID.
    pub fn id(self) -> StatusId {
        self as StatusId
    }

    /// Resolve a database status ID, returning `None` for unknown values.
    pub fn from_id(id: StatusId) -> Option<Self> {
        match id {
            0 => Some(Self::Unapplied),
            1 => Some(Self::Applied),
            2 => Some(Self::Approved),
            3 => Some(Self::Rejected),
            _ => None,
        }
    }

    /// Legacy single-character code (`"0"` unapplied .. `"3"` rejected).
    pub fn code(self) -> &'static str {
        match self {
            Self::Unapplied => "0",
            Self::Applied => "1",
            Self::Approved => "2",
            Self::Rejected => "3",
        }
    }

    /// Status an operator review moves an application to.
    ///
    /// Only pending (`Applied`) applications can be reviewed. Submission
    /// does not go through here; it sets `Applied` from any status.
    pub fn review(self, approved: bool) -> Result<Self, MerchantError> {
        match self {
            Self::Applied if approved => Ok(Self::Approved),
            Self::Applied => Ok(Self::Rejected),
            from => Err(MerchantError::InvalidAuditTransition { from }),
        }
    }
}

impl From<AuditStatus> for StatusId {
    fn from(value: AuditStatus) -> Self {
        value as StatusId
    }
}

impl std::fmt::Display for AuditStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let label = match self {
            Self::Unapplied => "unapplied",
            Self::Applied => "applied",
            Self::Approved => "approved",
            Self::Rejected => "rejected",
        };
        f.write_str(label)
    }
}

impl Serialize for AuditStatus {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.code())
    }
}
