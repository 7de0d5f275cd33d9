//! HTTP inbound adapter exposing the admin REST endpoints.

pub mod auth;
pub mod error;
pub mod health;
pub mod leaderboard;
pub mod points;
pub mod schemas;
pub mod session;
pub mod session_config;
pub mod state;
#[cfg(test)]
pub mod test_utils;
pub mod users;
pub mod validation;

pub use error::ApiResult;

use actix_web::web;

use error::{json_error_handler, path_error_handler, query_error_handler};

/// Register every `/api/v1` handler together with extractor error handlers
/// that answer malformed input with the domain error envelope.
///
/// # Examples
/// ```
/// use actix_web::{App, web};
/// use leaderboard::inbound::http::configure;
///
/// let _app = App::new().service(web::scope("/api/v1").configure(configure));
/// ```
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.app_data(web::JsonConfig::default().error_handler(json_error_handler))
        .app_data(web::QueryConfig::default().error_handler(query_error_handler))
        .app_data(web::PathConfig::default().error_handler(path_error_handler))
        .service(auth::login)
        .service(auth::logout)
        .service(leaderboard::ranked_users)
        .service(users::list_users)
        .service(users::create_user)
        .service(users::get_user)
        .service(users::update_user)
        .service(users::delete_user)
        .service(users::point_history)
        .service(points::list_points)
        .service(points::award_points)
        .service(points::get_point)
        .service(points::revise_points)
        .service(points::revoke_points);
}
