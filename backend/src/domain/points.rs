//! Ledger record primitives.
//!
//! A ledger record awards a positive number of points to one user. Whether
//! the owner's total goes up or down is decided by the operation applied to
//! the record, never by the sign of the amount.

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::user::{UserId, UserName};

/// Action type pre-filled for manual awards.
pub const DEFAULT_ACTION_TYPE: &str = "Manual Award";

const ACTION_TYPE_MAX: usize = 255;

/// Validation errors raised by ledger constructors.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PointsValidationError {
    /// Record identifiers are positive database keys.
    NonPositiveRecordId,
    /// Awards must add at least one point.
    NonPositiveAmount,
    /// Amount does not fit the stored column.
    AmountOutOfRange,
    /// Action type was blank once trimmed.
    EmptyActionType,
    /// Action type exceeded the column width.
    ActionTypeTooLong {
        /// Maximum permitted length in characters.
        max: usize,
    },
}

impl fmt::Display for PointsValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NonPositiveRecordId => write!(f, "point record id must be a positive integer"),
            Self::NonPositiveAmount => write!(f, "points must be greater than zero"),
            Self::AmountOutOfRange => write!(f, "points must fit in a 32-bit integer"),
            Self::EmptyActionType => write!(f, "action type must not be empty"),
            Self::ActionTypeTooLong { max } => {
                write!(f, "action type must be at most {max} characters")
            }
        }
    }
}

impl std::error::Error for PointsValidationError {}

/// Database identifier of a ledger record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "i64", into = "i64")]
pub struct PointRecordId(i64);

impl PointRecordId {
    /// Validate a raw identifier.
    pub fn new(id: i64) -> Result<Self, PointsValidationError> {
        if id <= 0 {
            return Err(PointsValidationError::NonPositiveRecordId);
        }
        Ok(Self(id))
    }

    /// Raw integer key.
    #[must_use]
    pub fn as_i64(self) -> i64 {
        self.0
    }
}

impl TryFrom<i64> for PointRecordId {
    type Error = PointsValidationError;

    fn try_from(value: i64) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<PointRecordId> for i64 {
    fn from(value: PointRecordId) -> Self {
        value.0
    }
}

impl fmt::Display for PointRecordId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// Strictly positive award amount.
///
/// # Examples
/// ```
/// use leaderboard::domain::PointsAmount;
///
/// assert_eq!(PointsAmount::new(50).unwrap().get(), 50);
/// assert!(PointsAmount::new(0).is_err());
/// assert!(PointsAmount::new(-5).is_err());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "i64", into = "i32")]
pub struct PointsAmount(i32);

impl PointsAmount {
    /// Validate a raw amount.
    pub fn new(raw: i64) -> Result<Self, PointsValidationError> {
        if raw <= 0 {
            return Err(PointsValidationError::NonPositiveAmount);
        }
        i32::try_from(raw)
            .map(Self)
            .map_err(|_| PointsValidationError::AmountOutOfRange)
    }

    /// Amount as stored.
    #[must_use]
    pub fn get(self) -> i32 {
        self.0
    }

    /// Amount widened to the total's width.
    #[must_use]
    pub fn as_i64(self) -> i64 {
        i64::from(self.0)
    }
}

impl TryFrom<i64> for PointsAmount {
    type Error = PointsValidationError;

    fn try_from(value: i64) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<PointsAmount> for i32 {
    fn from(value: PointsAmount) -> Self {
        value.0
    }
}

/// Free-text reason for an award.
///
/// ## Invariants
/// - Trimmed, non-empty, at most 255 characters.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct ActionType(String);

impl ActionType {
    /// Validate and trim an action type.
    pub fn new(raw: impl AsRef<str>) -> Result<Self, PointsValidationError> {
        let trimmed = raw.as_ref().trim();
        if trimmed.is_empty() {
            return Err(PointsValidationError::EmptyActionType);
        }
        if trimmed.chars().count() > ACTION_TYPE_MAX {
            return Err(PointsValidationError::ActionTypeTooLong {
                max: ACTION_TYPE_MAX,
            });
        }
        Ok(Self(trimmed.to_owned()))
    }
}

impl AsRef<str> for ActionType {
    fn as_ref(&self) -> &str {
        self.0.as_str()
    }
}

impl TryFrom<String> for ActionType {
    type Error = PointsValidationError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<ActionType> for String {
    fn from(value: ActionType) -> Self {
        value.0
    }
}

/// Validated award payload used by award and revise.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PointAward {
    /// Owner of the record.
    pub user_id: UserId,
    /// Positive amount.
    pub points: PointsAmount,
    /// Reason for the award.
    pub action_type: ActionType,
}

/// Stored ledger record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PointRecord {
    /// Identifier.
    pub id: PointRecordId,
    /// Owner.
    pub user_id: UserId,
    /// Positive amount.
    pub points: PointsAmount,
    /// Reason for the award.
    pub action_type: ActionType,
    /// Creation time.
    pub created_at: DateTime<Utc>,
    /// Last revision time.
    pub updated_at: DateTime<Utc>,
}

/// Minimal owner projection shown next to listed records.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PointOwner {
    /// Owner id.
    pub id: UserId,
    /// Owner display name.
    pub name: UserName,
}

/// Ledger record together with its owner, as returned by listings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PointEntry {
    /// The record.
    #[serde(flatten)]
    pub record: PointRecord,
    /// Its owner.
    pub user: PointOwner,
}
