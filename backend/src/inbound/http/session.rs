//! Session helpers to keep HTTP handlers free of framework-specific logic.
//!
//! Provides a thin wrapper around Actix sessions so handlers only deal with
//! domain-friendly operations: persisting the user id at login, resolving the
//! acting user for policy checks, and purging the session at logout.

use actix_session::Session;
use actix_web::{FromRequest, HttpRequest, dev::Payload};
use futures_util::future::LocalBoxFuture;
use tracing::warn;

use crate::domain::{Actor, Error, ErrorCode, UserId};
use crate::inbound::http::state::HttpState;

pub(crate) const USER_ID_KEY: &str = "user_id";

/// Newtype wrapper that exposes higher-level session operations.
#[derive(Clone)]
pub struct SessionContext(Session);

impl SessionContext {
    /// Construct a new wrapper from the underlying Actix session.
    pub fn new(session: Session) -> Self {
        Self(session)
    }

    /// Persist the authenticated user's id in the session cookie.
    pub fn persist_user(&self, user_id: UserId) -> Result<(), Error> {
        self.0.renew();
        self.0
            .insert(USER_ID_KEY, user_id.as_i64())
            .map_err(|error| Error::internal(format!("failed to persist session: {error}")))
    }

    /// Fetch the current user id from the session, if present.
    ///
    /// Values that do not decode to a valid id are treated as absent.
    pub fn user_id(&self) -> Option<UserId> {
        let raw = match self.0.get::<i64>(USER_ID_KEY) {
            Ok(raw) => raw?,
            Err(error) => {
                warn!(%error, "undecodable user id in session cookie");
                return None;
            }
        };
        match UserId::new(raw) {
            Ok(id) => Some(id),
            Err(error) => {
                warn!(raw, %error, "invalid user id in session cookie");
                None
            }
        }
    }

    /// Require an authenticated user id or return `401 Unauthorized`.
    pub fn require_user_id(&self) -> Result<UserId, Error> {
        self.user_id()
            .ok_or_else(|| Error::unauthorized("login required"))
    }

    /// Resolve the acting user for access-policy decisions.
    ///
    /// A session naming a user that no longer exists is purged and treated
    /// as unauthenticated.
    pub async fn require_actor(&self, state: &HttpState) -> Result<Actor, Error> {
        let id = self.require_user_id()?;
        match state.users_query.get_user(id).await {
            Ok(user) => Ok(Actor::from(&user)),
            Err(error) if error.code() == ErrorCode::NotFound => {
                warn!(user_id = %id, "session refers to a deleted user");
                self.purge();
                Err(Error::unauthorized("login required"))
            }
            Err(error) => Err(error),
        }
    }

    /// Drop every value and expire the cookie.
    pub fn purge(&self) {
        self.0.purge();
    }
}

impl FromRequest for SessionContext {
    type Error = actix_web::Error;
    type Future = LocalBoxFuture<'static, Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, payload: &mut Payload) -> Self::Future {
        let fut = Session::from_request(req, payload);
        Box::pin(async move { fut.await.map(SessionContext::new) })
    }
}
