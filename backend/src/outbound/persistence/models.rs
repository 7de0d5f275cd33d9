//! Internal Diesel row structs for database operations.
//!
//! These types are implementation details of the persistence layer and must
//! never be exposed to the domain. Conversions back into domain types go
//! through the validating constructors so corrupt rows surface as query
//! errors rather than panics.

use chrono::{DateTime, Utc};
use diesel::prelude::*;

use crate::domain::{
    ActionType, EmailAddress, PasswordHash, PointOwner, PointRecord, PointRecordId, PointsAmount,
    User, UserDraft, UserId, UserName, UserSummary,
};

use super::schema::{points, users};

/// Row struct for reading from the users table.
#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = users)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct UserRow {
    pub id: i64,
    pub name: String,
    pub email: String,
    pub total_points: i64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl TryFrom<UserRow> for User {
    type Error = String;

    fn try_from(row: UserRow) -> Result<Self, Self::Error> {
        Ok(Self::new(UserDraft {
            id: UserId::new(row.id).map_err(|err| err.to_string())?,
            name: UserName::new(&row.name).map_err(|err| err.to_string())?,
            email: EmailAddress::new(&row.email).map_err(|err| err.to_string())?,
            total_points: row.total_points,
            created_at: row.created_at,
            updated_at: row.updated_at,
        }))
    }
}

impl TryFrom<UserRow> for UserSummary {
    type Error = String;

    fn try_from(row: UserRow) -> Result<Self, Self::Error> {
        Ok(Self {
            id: UserId::new(row.id).map_err(|err| err.to_string())?,
            name: UserName::new(&row.name).map_err(|err| err.to_string())?,
            email: EmailAddress::new(&row.email).map_err(|err| err.to_string())?,
            total_points: row.total_points,
            updated_at: row.updated_at,
        })
    }
}

/// Credential projection used by login.
#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = users)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct CredentialRow {
    pub id: i64,
    pub password_hash: String,
}

impl CredentialRow {
    pub(crate) fn into_parts(self) -> Result<(UserId, PasswordHash), String> {
        let id = UserId::new(self.id).map_err(|err| err.to_string())?;
        Ok((id, PasswordHash::from_stored(self.password_hash)))
    }
}

/// Owner projection joined onto listed ledger records.
#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = users)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct OwnerRow {
    pub id: i64,
    pub name: String,
}

impl TryFrom<OwnerRow> for PointOwner {
    type Error = String;

    fn try_from(row: OwnerRow) -> Result<Self, Self::Error> {
        Ok(Self {
            id: UserId::new(row.id).map_err(|err| err.to_string())?,
            name: UserName::new(&row.name).map_err(|err| err.to_string())?,
        })
    }
}

/// Insertable struct for creating new user records.
#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = users)]
pub(crate) struct NewUserRow<'a> {
    pub name: &'a str,
    pub email: &'a str,
    pub password_hash: &'a str,
}

/// Profile changeset. `password_hash` of `None` leaves the column untouched.
#[derive(Debug, Clone, AsChangeset)]
#[diesel(table_name = users)]
pub(crate) struct UserProfileChangeset<'a> {
    pub name: &'a str,
    pub email: &'a str,
    pub password_hash: Option<&'a str>,
    pub updated_at: DateTime<Utc>,
}

/// Row struct for reading from the points table.
#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = points)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct PointRow {
    pub id: i64,
    pub user_id: i64,
    #[diesel(column_name = amount)]
    pub points: i32,
    pub action_type: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl TryFrom<PointRow> for PointRecord {
    type Error = String;

    fn try_from(row: PointRow) -> Result<Self, Self::Error> {
        Ok(Self {
            id: PointRecordId::new(row.id).map_err(|err| err.to_string())?,
            user_id: UserId::new(row.user_id).map_err(|err| err.to_string())?,
            points: PointsAmount::new(i64::from(row.points)).map_err(|err| err.to_string())?,
            action_type: ActionType::new(&row.action_type).map_err(|err| err.to_string())?,
            created_at: row.created_at,
            updated_at: row.updated_at,
        })
    }
}

/// Insertable struct for creating ledger records.
#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = points)]
pub(crate) struct NewPointRow<'a> {
    pub user_id: i64,
    #[diesel(column_name = amount)]
    pub points: i32,
    pub action_type: &'a str,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Changeset rewriting a ledger record during revise.
#[derive(Debug, Clone, AsChangeset)]
#[diesel(table_name = points)]
pub(crate) struct PointChangeset<'a> {
    pub user_id: i64,
    #[diesel(column_name = amount)]
    pub points: i32,
    pub action_type: &'a str,
    pub updated_at: DateTime<Utc>,
}
