//! HTTP inbound adapter exposing the REST API.

pub mod children;
pub mod doses;
pub mod error;
pub mod health;
pub mod notifications;
pub mod request_trace;
pub mod schemas;
pub mod session;
pub mod session_config;
pub mod state;
#[cfg(test)]
pub mod test_utils;
mod validation;

use actix_web::web;

pub use error::ApiResult;

/// Register every `/api/v1` handler and the JSON error handler on a scope.
///
/// # Examples
/// ```
/// use actix_web::{App, web};
/// use immunisation::inbound::http::configure_api;
///
/// let app = App::new().service(web::scope("/api/v1").configure(configure_api));
/// ```
pub fn configure_api(cfg: &mut web::ServiceConfig) {
    cfg.app_data(web::JsonConfig::default().error_handler(error::json_error_handler))
        .service(children::list_children)
        .service(children::enrol_child)
        .service(notifications::list_child_notifications)
        .service(children::get_child)
        .service(children::update_child)
        .service(children::delete_child)
        .service(notifications::list_dose_notifications)
        .service(doses::set_dose_status);
}
