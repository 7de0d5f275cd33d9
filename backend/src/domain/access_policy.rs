//! Authorization predicate gating every mutation.
//!
//! One designated administrator may manage users and revise or revoke ledger
//! records. Any authenticated actor may award points. Nobody may delete their
//! own account, the administrator included; that rule is checked first.

use std::fmt;

use serde_json::json;
use tracing::info;

use super::error::Error;
use super::points::PointRecordId;
use super::user::{EmailAddress, User, UserId};

/// Authenticated caller on whose behalf an operation runs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Actor {
    id: UserId,
    email: EmailAddress,
}

impl Actor {
    /// Build an actor from its identity.
    #[must_use]
    pub fn new(id: UserId, email: EmailAddress) -> Self {
        Self { id, email }
    }

    /// Actor's user id.
    #[must_use]
    pub fn id(&self) -> UserId {
        self.id
    }

    /// Actor's email.
    #[must_use]
    pub fn email(&self) -> &EmailAddress {
        &self.email
    }
}

impl From<&User> for Actor {
    fn from(user: &User) -> Self {
        Self::new(user.id(), user.email().clone())
    }
}

/// Mutations subject to the policy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Operation {
    /// Register a new account.
    CreateUser,
    /// Change an account's profile.
    UpdateUser,
    /// Remove an account and its ledger records.
    DeleteUser,
    /// Create a ledger record.
    AwardPoints,
    /// Change a ledger record.
    RevisePoints,
    /// Delete a ledger record.
    RevokePoints,
}

impl Operation {
    /// Stable snake-case label used in logs and error details.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::CreateUser => "create_user",
            Self::UpdateUser => "update_user",
            Self::DeleteUser => "delete_user",
            Self::AwardPoints => "award_points",
            Self::RevisePoints => "revise_points",
            Self::RevokePoints => "revoke_points",
        }
    }
}

/// Resource an operation acts upon.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Target {
    /// An account that does not exist yet.
    NewUser,
    /// An existing account.
    User(UserId),
    /// A ledger record that does not exist yet, owned by the given user.
    NewPointRecord(UserId),
    /// An existing ledger record.
    PointRecord(PointRecordId),
}

/// Why an operation was refused.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DenialReason {
    /// The operation is reserved for the administrator.
    NotAdministrator,
    /// Accounts may not delete themselves.
    SelfDeletion,
}

impl fmt::Display for DenialReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NotAdministrator => f.write_str("Please login as super admin!"),
            Self::SelfDeletion => f.write_str("You cannot delete your own account."),
        }
    }
}

/// Outcome of [`AccessPolicy::authorize`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Decision {
    /// The operation may proceed.
    Allow,
    /// The operation must not start.
    Deny(DenialReason),
}

/// Identity of the designated administrator.
///
/// An actor matching either the id or the email is the administrator.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AdminIdentity {
    user_id: Option<UserId>,
    email: Option<EmailAddress>,
}

impl AdminIdentity {
    /// Administrator recognised by id, email, or both.
    #[must_use]
    pub fn new(user_id: Option<UserId>, email: Option<EmailAddress>) -> Self {
        Self { user_id, email }
    }

    fn matches(&self, actor: &Actor) -> bool {
        self.user_id == Some(actor.id()) || self.email.as_ref() == Some(actor.email())
    }
}

/// Access policy value built from configuration.
///
/// # Examples
/// ```
/// use leaderboard::domain::{
///     AccessPolicy, Actor, AdminIdentity, Decision, DenialReason, EmailAddress, Operation,
///     Target, UserId,
/// };
///
/// let admin_id = UserId::new(1).unwrap();
/// let policy = AccessPolicy::new(AdminIdentity::new(Some(admin_id), None));
/// let admin = Actor::new(admin_id, EmailAddress::new("root@example.com").unwrap());
///
/// assert_eq!(
///     policy.authorize(&admin, Operation::DeleteUser, Target::User(admin_id)),
///     Decision::Deny(DenialReason::SelfDeletion),
/// );
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AccessPolicy {
    admin: AdminIdentity,
}

impl AccessPolicy {
    /// Policy recognising `admin` as the designated administrator.
    #[must_use]
    pub fn new(admin: AdminIdentity) -> Self {
        Self { admin }
    }

    /// Whether `actor` is the designated administrator.
    #[must_use]
    pub fn is_administrator(&self, actor: &Actor) -> bool {
        self.admin.matches(actor)
    }

    /// Decide whether `actor` may perform `operation` on `target`.
    #[must_use]
    pub fn authorize(&self, actor: &Actor, operation: Operation, target: Target) -> Decision {
        if operation == Operation::DeleteUser && target == Target::User(actor.id()) {
            return Decision::Deny(DenialReason::SelfDeletion);
        }
        match operation {
            Operation::AwardPoints => Decision::Allow,
            Operation::CreateUser
            | Operation::UpdateUser
            | Operation::DeleteUser
            | Operation::RevisePoints
            | Operation::RevokePoints => {
                if self.is_administrator(actor) {
                    Decision::Allow
                } else {
                    Decision::Deny(DenialReason::NotAdministrator)
                }
            }
        }
    }

    /// [`AccessPolicy::authorize`] mapped onto the domain error type.
    ///
    /// Denials become [`crate::domain::ErrorCode::Forbidden`] carrying the
    /// denial reason as the message.
    pub fn require(&self, actor: &Actor, operation: Operation, target: Target) -> Result<(), Error> {
        match self.authorize(actor, operation, target) {
            Decision::Allow => Ok(()),
            Decision::Deny(reason) => {
                info!(
                    actor_id = %actor.id(),
                    operation = operation.as_str(),
                    ?target,
                    %reason,
                    "access denied"
                );
                Err(Error::forbidden(reason.to_string())
                    .with_details(json!({ "operation": operation.as_str() })))
            }
        }
    }
}
