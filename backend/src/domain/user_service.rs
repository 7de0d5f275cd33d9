//! Account management and password login.
//!
//! [`UserService`] implements [`UserCommand`], [`UserQuery`] and
//! [`LoginService`] over a single [`UserRepository`]. Mutations consult the
//! access policy before validating input or touching storage.

use std::sync::Arc;

use async_trait::async_trait;
use pagination::Page;
use serde_json::json;
use tracing::info;

use crate::domain::ports::{
    CreateUserRequest, LoginService, UpdateUserRequest, UserCommand, UserPersistenceError,
    UserQuery, UserRepository,
};
use crate::domain::{
    AccessPolicy, Actor, EmailAddress, Error, ListingPage, ListingRequest, LoginCredentials,
    LoginValidationError, NewUser, Operation, Password, PasswordHash, Target, User, UserId,
    UserName, UserProfileUpdate, UserValidationError,
};

pub(crate) fn map_user_persistence_error(error: UserPersistenceError) -> Error {
    match error {
        UserPersistenceError::Connection { message } => {
            Error::service_unavailable(format!("user repository unavailable: {message}"))
        }
        UserPersistenceError::Query { message } => {
            Error::internal(format!("user repository error: {message}"))
        }
        UserPersistenceError::DuplicateEmail { email } => {
            Error::conflict(format!("email {email} is already registered"))
                .with_details(json!({ "field": "email" }))
        }
    }
}

fn field_error(field: &'static str, message: String) -> Error {
    Error::invalid_request(message).with_details(json!({ "field": field }))
}

fn parse_name(raw: &str) -> Result<UserName, Error> {
    UserName::new(raw).map_err(|err: UserValidationError| field_error("name", err.to_string()))
}

fn parse_email(raw: &str) -> Result<EmailAddress, Error> {
    EmailAddress::new(raw).map_err(|err| field_error("email", err.to_string()))
}

fn hash_password(raw: &str) -> Result<PasswordHash, Error> {
    let password = Password::new(raw)
        .map_err(|err: LoginValidationError| field_error("password", err.to_string()))?;
    PasswordHash::hash(&password).map_err(|err| Error::internal(err.to_string()))
}

fn missing_user(id: UserId) -> Error {
    Error::not_found(format!("user {id} not found"))
}

/// User service backed by a [`UserRepository`].
#[derive(Clone)]
pub struct UserService<U> {
    users: Arc<U>,
    policy: Arc<AccessPolicy>,
}

impl<U> UserService<U> {
    /// Create a service over `users`, gated by `policy`.
    pub fn new(users: Arc<U>, policy: Arc<AccessPolicy>) -> Self {
        Self { users, policy }
    }
}

impl<U> UserService<U>
where
    U: UserRepository,
{
    /// Make sure an account exists for `email`, creating it when absent.
    ///
    /// Used at startup to seed the designated administrator. Runs outside
    /// the access policy and leaves an existing account untouched.
    pub async fn ensure_account(&self, request: CreateUserRequest) -> Result<UserId, Error> {
        let email = parse_email(&request.email)?;
        let existing = self
            .users
            .find_credentials(&email)
            .await
            .map_err(map_user_persistence_error)?;
        if let Some(found) = existing {
            info!(user_id = %found.user_id, "bootstrap account already present");
            return Ok(found.user_id);
        }

        let new_user = NewUser {
            name: parse_name(&request.name)?,
            email,
            password_hash: hash_password(&request.password)?,
        };
        let user = self
            .users
            .insert(&new_user)
            .await
            .map_err(map_user_persistence_error)?;
        info!(user_id = %user.id(), "bootstrap account created");
        Ok(user.id())
    }
}

#[async_trait]
impl<U> UserCommand for UserService<U>
where
    U: UserRepository,
{
    async fn create_user(&self, actor: &Actor, request: CreateUserRequest) -> Result<User, Error> {
        self.policy
            .require(actor, Operation::CreateUser, Target::NewUser)?;
        let new_user = NewUser {
            name: parse_name(&request.name)?,
            email: parse_email(&request.email)?,
            password_hash: hash_password(&request.password)?,
        };

        let user = self
            .users
            .insert(&new_user)
            .await
            .map_err(map_user_persistence_error)?;
        info!(actor_id = %actor.id(), user_id = %user.id(), "user created");
        Ok(user)
    }

    async fn update_user(
        &self,
        actor: &Actor,
        id: UserId,
        request: UpdateUserRequest,
    ) -> Result<User, Error> {
        self.policy
            .require(actor, Operation::UpdateUser, Target::User(id))?;
        let password_hash = match request.password.as_deref() {
            Some(raw) if !raw.is_empty() => Some(hash_password(raw)?),
            _ => None,
        };
        let update = UserProfileUpdate {
            name: parse_name(&request.name)?,
            email: parse_email(&request.email)?,
            password_hash,
        };

        let user = self
            .users
            .update_profile(id, &update)
            .await
            .map_err(map_user_persistence_error)?
            .ok_or_else(|| missing_user(id))?;
        info!(
            actor_id = %actor.id(),
            user_id = %id,
            password_changed = update.password_hash.is_some(),
            "user updated"
        );
        Ok(user)
    }

    async fn delete_user(&self, actor: &Actor, id: UserId) -> Result<(), Error> {
        self.policy
            .require(actor, Operation::DeleteUser, Target::User(id))?;

        let removed = self
            .users
            .delete(id)
            .await
            .map_err(map_user_persistence_error)?;
        if !removed {
            return Err(missing_user(id));
        }
        info!(actor_id = %actor.id(), user_id = %id, "user deleted");
        Ok(())
    }
}

#[async_trait]
impl<U> UserQuery for UserService<U>
where
    U: UserRepository,
{
    async fn list_users(&self, request: ListingRequest) -> Result<ListingPage<User>, Error> {
        let slice = self
            .users
            .list(&request)
            .await
            .map_err(map_user_persistence_error)?;
        Ok(ListingPage {
            items: Page::new(slice.items, request.page(), slice.total),
            filters: request.filter(),
        })
    }

    async fn get_user(&self, id: UserId) -> Result<User, Error> {
        self.users
            .find_by_id(id)
            .await
            .map_err(map_user_persistence_error)?
            .ok_or_else(|| missing_user(id))
    }
}

#[async_trait]
impl<U> LoginService for UserService<U>
where
    U: UserRepository,
{
    async fn authenticate(&self, credentials: &LoginCredentials) -> Result<UserId, Error> {
        let stored = self
            .users
            .find_credentials(credentials.email())
            .await
            .map_err(map_user_persistence_error)?;
        match stored {
            Some(found) if found.password_hash.verify(credentials.password()) => {
                info!(user_id = %found.user_id, "login succeeded");
                Ok(found.user_id)
            }
            _ => {
                info!("login rejected");
                Err(Error::unauthorized("invalid credentials"))
            }
        }
    }
}

#[cfg(test)]
#[path = "user_service_tests.rs"]
mod tests;
