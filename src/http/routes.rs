use axum::{
    extract::{Multipart, State},
    http::StatusCode,
    Form, Json,
};
use serde::{Deserialize, Serialize};
use tracing::info;

use super::{ApiError, AppState};
use crate::{
    dto::{ProvisioningResult, RecordFormat, Server},
    error::Error,
    runner::provision_async,
};

/// Provisions accounts from the file uploaded in the `file` field of a multipart form.
pub async fn upload_accounts(
    State(state): State<AppState>,
    mut multipart: Multipart,
) -> Result<Json<ProvisioningResult>, ApiError> {
    while let Some(field) = multipart.next_field().await? {
        if field.name() != Some("file") {
            continue;
        }
        let Some(file_name) = field.file_name().map(str::to_string) else {
            continue;
        };
        let format = RecordFormat::from_file_name(&file_name).ok_or_else(|| {
            ApiError::new(
                StatusCode::UNSUPPORTED_MEDIA_TYPE,
                format!("unsupported file type {file_name:?}; expected .csv, .xlsx or .xls"),
            )
        })?;
        let bytes = field.bytes().await?;
        info!(%file_name, ?format, size = bytes.len(), "account upload received");
        let result = provision_async(&state.provisioning, &bytes[..], format).await?;
        return Ok(Json(result));
    }
    Err(ApiError::new(StatusCode::BAD_REQUEST, "no file uploaded"))
}

/// Usernames of all provisioned accounts, sorted.
pub async fn list_accounts(State(state): State<AppState>) -> Json<Vec<String>> {
    let mut usernames: Vec<String> = state
        .provisioning
        .accounts()
        .snapshot()
        .into_iter()
        .collect();
    usernames.sort();
    Json(usernames)
}

#[derive(Deserialize)]
pub struct LoginForm {
    #[serde(default)]
    username: String,
    #[serde(default)]
    password: String,
}

#[derive(Serialize)]
pub struct LoginOutput {
    user: String,
}

pub async fn login(
    State(state): State<AppState>,
    Form(form): Form<LoginForm>,
) -> Result<Json<LoginOutput>, ApiError> {
    if !state.authenticator.authenticate(&form.username, &form.password) {
        return Err(ApiError::new(
            StatusCode::UNAUTHORIZED,
            "invalid username or password",
        ));
    }
    Ok(Json(LoginOutput {
        user: form.username,
    }))
}

#[derive(Deserialize)]
pub struct AdminLoginForm {
    #[serde(default)]
    adminuser: String,
    #[serde(default)]
    adminpass: String,
}

#[derive(Serialize)]
pub struct AdminLoginOutput {
    admin: String,
}

pub async fn admin_login(
    State(state): State<AppState>,
    Form(form): Form<AdminLoginForm>,
) -> Result<Json<AdminLoginOutput>, ApiError> {
    let verified = state
        .admin
        .as_ref()
        .is_some_and(|admin| admin.verify(&form.adminuser, &form.adminpass));
    if !verified {
        return Err(ApiError::new(
            StatusCode::UNAUTHORIZED,
            "invalid admin credentials",
        ));
    }
    Ok(Json(AdminLoginOutput {
        admin: form.adminuser,
    }))
}

/// Registered servers in the order they were added.
pub async fn list_servers(State(state): State<AppState>) -> Json<Vec<Server>> {
    Json(state.servers.list())
}

#[derive(Deserialize)]
pub struct AddServerForm {
    #[serde(default)]
    servername: String,
    #[serde(default)]
    serverip: String,
}

pub async fn add_server(
    State(state): State<AppState>,
    Form(form): Form<AddServerForm>,
) -> Result<(StatusCode, Json<Server>), ApiError> {
    state.servers.add(&form.servername, &form.serverip)?;
    Ok((
        StatusCode::CREATED,
        Json(Server {
            name: form.servername,
            address: form.serverip,
        }),
    ))
}

#[derive(Deserialize)]
pub struct SelectServerForm {
    #[serde(default)]
    serverip: String,
}

/// Resolves the server picked in the selection form.
pub async fn select_server(
    State(state): State<AppState>,
    Form(form): Form<SelectServerForm>,
) -> Result<Json<Server>, ApiError> {
    if form.serverip.trim().is_empty() {
        return Err(Error::validation("no server selected").into());
    }
    let server = state
        .servers
        .find_by_address(&form.serverip)
        .ok_or_else(|| Error::validation(format!("unknown server {:?}", form.serverip)))?;
    info!(name = %server.name, address = %server.address, "server selected");
    Ok(Json(server))
}
