//! Thin HTTP adapter over the provisioning core.
//!
//! Handlers parse forms and uploads, call into the core and render plain JSON.

mod routes;

use std::sync::Arc;

use axum::{
    extract::{multipart::MultipartError, DefaultBodyLimit},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use tower_http::trace::TraceLayer;
use tracing::error;

use crate::{
    auth::{AdminCredentials, Authenticator},
    engine::ProvisioningService,
    error::Error,
    namespace::NamespaceProvisioner,
    stores::{AccountStore, ServerRegistry},
};

/// Shared handles given to every request.
#[derive(Clone)]
pub struct AppState {
    pub provisioning: ProvisioningService,
    pub authenticator: Authenticator,
    pub servers: ServerRegistry,
    pub admin: Option<AdminCredentials>,
}

impl AppState {
    pub fn new(
        accounts: AccountStore,
        namespaces: Arc<dyn NamespaceProvisioner>,
        servers: ServerRegistry,
        admin: Option<AdminCredentials>,
    ) -> Self {
        Self {
            provisioning: ProvisioningService::new(accounts.clone(), namespaces),
            authenticator: Authenticator::new(accounts),
            servers,
            admin,
        }
    }
}

pub fn build_router(state: AppState, max_upload_bytes: usize) -> Router {
    Router::new()
        .route("/accounts", get(routes::list_accounts))
        .route("/accounts/upload", post(routes::upload_accounts))
        .route("/login", post(routes::login))
        .route("/admin/login", post(routes::admin_login))
        .route(
            "/servers",
            get(routes::list_servers).post(routes::add_server),
        )
        .route("/servers/select", post(routes::select_server))
        .layer(DefaultBodyLimit::max(max_upload_bytes))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

#[derive(Debug)]
pub struct ApiError {
    status: StatusCode,
    message: String,
}

impl ApiError {
    pub fn new(status: StatusCode, message: impl Into<String>) -> Self {
        Self {
            status,
            message: message.into(),
        }
    }
}

impl From<Error> for ApiError {
    fn from(err: Error) -> Self {
        let status = match err {
            Error::MalformedInput(_) | Error::Validation(_) => StatusCode::BAD_REQUEST,
            Error::Namespace(_) => StatusCode::INTERNAL_SERVER_ERROR,
        };
        Self::new(status, err.to_string())
    }
}

impl From<MultipartError> for ApiError {
    fn from(err: MultipartError) -> Self {
        Self::new(err.status(), err.body_text())
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        if self.status.is_server_error() {
            error!(error = %self.message, "request failed");
        }
        (self.status, Json(serde_json::json!({"error": self.message}))).into_response()
    }
}
