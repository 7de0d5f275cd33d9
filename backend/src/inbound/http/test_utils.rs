//! Test helpers for inbound HTTP components.

use std::sync::Arc;

use actix_session::{SessionMiddleware, storage::CookieSessionStore};
use actix_web::body::MessageBody;
use actix_web::cookie::{Cookie, Key};
use actix_web::dev::{Service, ServiceFactory, ServiceRequest, ServiceResponse};
use actix_web::http::StatusCode;
use actix_web::{App, test, web};
use serde_json::{Value, json};

use crate::domain::ports::CreateUserRequest;
use crate::domain::{
    AccessPolicy, AdminIdentity, EmailAddress, LeaderboardService, LedgerService, UserId,
    UserService,
};
use crate::inbound::http::configure;
use crate::inbound::http::state::{HttpState, HttpStatePorts};
use crate::outbound::memory::InMemoryStore;

pub const ADMIN_EMAIL: &str = "test@gmail.com";
pub const ADMIN_PASSWORD: &str = "admin-password";
pub const MEMBER_EMAIL: &str = "member@example.com";
pub const MEMBER_PASSWORD: &str = "member-password";

/// Build a session middleware configured for tests.
///
/// - Generates a fresh signing/encryption key per invocation.
/// - Sets the cookie name to `session` and disables the `Secure` flag for
///   local HTTP tests.
pub fn test_session_middleware() -> SessionMiddleware<CookieSessionStore> {
    SessionMiddleware::builder(CookieSessionStore::default(), Key::generate())
        .cookie_name("session".to_owned())
        .cookie_secure(false)
        .build()
}

/// Extract the session cookie set by a response.
pub fn session_cookie<B>(response: &ServiceResponse<B>) -> Cookie<'static> {
    response
        .response()
        .cookies()
        .find(|cookie| cookie.name() == "session")
        .expect("session cookie set")
        .into_owned()
}

/// In-memory backend seeded with the administrator and one regular member.
pub struct TestBackend {
    pub store: Arc<InMemoryStore>,
    pub state: HttpState,
    pub admin_id: UserId,
    pub member_id: UserId,
}

impl TestBackend {
    pub async fn seeded() -> Self {
        let store = Arc::new(InMemoryStore::default());
        let admin_email = EmailAddress::new(ADMIN_EMAIL).expect("admin email");
        let policy = Arc::new(AccessPolicy::new(AdminIdentity::new(
            Some(UserId::new(1).expect("admin id")),
            Some(admin_email),
        )));
        let users = Arc::new(UserService::new(store.clone(), policy.clone()));
        let ledger = Arc::new(LedgerService::new(store.clone(), policy));

        let admin_id = users
            .ensure_account(CreateUserRequest {
                name: "Admin".to_owned(),
                email: ADMIN_EMAIL.to_owned(),
                password: ADMIN_PASSWORD.to_owned(),
            })
            .await
            .expect("seed admin");
        let member_id = users
            .ensure_account(CreateUserRequest {
                name: "Member".to_owned(),
                email: MEMBER_EMAIL.to_owned(),
                password: MEMBER_PASSWORD.to_owned(),
            })
            .await
            .expect("seed member");

        let state = HttpState::new(HttpStatePorts {
            login: users.clone(),
            users: users.clone(),
            users_query: users,
            ledger: ledger.clone(),
            ledger_query: ledger,
            leaderboard: Arc::new(LeaderboardService::new(store.clone())),
        });
        Self {
            store,
            state,
            admin_id,
            member_id,
        }
    }
}

/// Full `/api/v1` surface over `state`.
pub fn test_app(
    state: HttpState,
) -> App<
    impl ServiceFactory<
        ServiceRequest,
        Config = (),
        Response = ServiceResponse,
        Error = actix_web::Error,
        InitError = (),
    >,
> {
    App::new().app_data(web::Data::new(state)).service(
        web::scope("/api/v1")
            .wrap(test_session_middleware())
            .configure(configure),
    )
}

/// Log in through the API and return the issued session cookie.
pub async fn login_cookie<S, B>(app: &S, email: &str, password: &str) -> Cookie<'static>
where
    S: Service<actix_http::Request, Response = ServiceResponse<B>, Error = actix_web::Error>,
    B: MessageBody,
{
    let request = test::TestRequest::post()
        .uri("/api/v1/login")
        .set_json(json!({ "email": email, "password": password }))
        .to_request();
    let response = test::call_service(app, request).await;
    assert!(response.status().is_success(), "login failed: {}", response.status());
    session_cookie(&response)
}

/// Dispatch `request` and decode the JSON body, or `Null` when empty.
pub async fn send<S, B>(app: &S, request: actix_http::Request) -> (StatusCode, Value)
where
    S: Service<actix_http::Request, Response = ServiceResponse<B>, Error = actix_web::Error>,
    B: MessageBody,
{
    let response = test::call_service(app, request).await;
    let status = response.status();
    let bytes = test::read_body(response).await;
    let body = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).expect("JSON body")
    };
    (status, body)
}
