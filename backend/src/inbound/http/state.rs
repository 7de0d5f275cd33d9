//! Shared HTTP adapter state.
//!
//! HTTP handlers accept this state via `actix_web::web::Data` so they only
//! depend on domain ports (use-cases) and remain testable without I/O.

use std::sync::Arc;

use pagination::DEFAULT_PER_PAGE;

use crate::domain::ports::{
    LeaderboardQuery, LedgerCommand, LedgerQuery, LoginService, UserCommand, UserQuery,
};

/// Parameter object bundling every port implementation used by handlers.
#[derive(Clone)]
pub struct HttpStatePorts {
    pub login: Arc<dyn LoginService>,
    pub users: Arc<dyn UserCommand>,
    pub users_query: Arc<dyn UserQuery>,
    pub ledger: Arc<dyn LedgerCommand>,
    pub ledger_query: Arc<dyn LedgerQuery>,
    pub leaderboard: Arc<dyn LeaderboardQuery>,
}

/// Dependency bundle for HTTP handlers.
#[derive(Clone)]
pub struct HttpState {
    pub login: Arc<dyn LoginService>,
    pub users: Arc<dyn UserCommand>,
    pub users_query: Arc<dyn UserQuery>,
    pub ledger: Arc<dyn LedgerCommand>,
    pub ledger_query: Arc<dyn LedgerQuery>,
    pub leaderboard: Arc<dyn LeaderboardQuery>,
    /// Page size applied to listings when the client does not send one.
    pub page_size: u32,
}

impl From<HttpStatePorts> for HttpState {
    fn from(ports: HttpStatePorts) -> Self {
        Self::new(ports)
    }
}

impl HttpState {
    /// Construct state with the default page size.
    ///
    /// # Examples
    /// ```
    /// use std::sync::Arc;
    ///
    /// use leaderboard::domain::{AccessPolicy, AdminIdentity};
    /// use leaderboard::domain::{LeaderboardService, LedgerService, UserService};
    /// use leaderboard::inbound::http::state::{HttpState, HttpStatePorts};
    /// use leaderboard::outbound::memory::InMemoryStore;
    ///
    /// let store = Arc::new(InMemoryStore::default());
    /// let policy = Arc::new(AccessPolicy::new(AdminIdentity::new(None, None)));
    /// let users = Arc::new(UserService::new(store.clone(), policy.clone()));
    /// let ledger = Arc::new(LedgerService::new(store.clone(), policy));
    /// let state = HttpState::new(HttpStatePorts {
    ///     login: users.clone(),
    ///     users: users.clone(),
    ///     users_query: users,
    ///     ledger: ledger.clone(),
    ///     ledger_query: ledger,
    ///     leaderboard: Arc::new(LeaderboardService::new(store)),
    /// });
    /// assert_eq!(state.page_size, 15);
    /// ```
    pub fn new(ports: HttpStatePorts) -> Self {
        let HttpStatePorts {
            login,
            users,
            users_query,
            ledger,
            ledger_query,
            leaderboard,
        } = ports;
        Self {
            login,
            users,
            users_query,
            ledger,
            ledger_query,
            leaderboard,
            page_size: DEFAULT_PER_PAGE,
        }
    }

    /// Override the default listing page size.
    #[must_use]
    pub fn with_page_size(mut self, page_size: u32) -> Self {
        self.page_size = page_size;
        self
    }
}
