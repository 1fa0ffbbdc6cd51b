use crate::auth::{AuthenticatedUser, CredentialStore, LoginError, authenticate};
use axum::{
    Json,
    extract::{ConnectInfo, Extension, rejection::JsonRejection},
    http::{Extensions, HeaderMap, StatusCode},
    response::{IntoResponse, Response},
};
use secrecy::SecretString;
use serde::{Deserialize, Serialize};
use std::{net::SocketAddr, sync::Arc};
use tracing::{debug, info, instrument};
use utoipa::ToSchema;

/// Target of the per-attempt login audit events.
pub const AUDIT_TARGET: &str = "hospital_auth::audit";

pub const MSG_LOGIN_OK: &str = "¡Login Exitoso!";
pub const MSG_MISSING_FIELDS: &str = "Email y contraseña son requeridos";
pub const MSG_INVALID_CREDENTIALS: &str = "Credenciales inválidas";
pub const MSG_INTERNAL_ERROR: &str = "Error interno del servidor";

// Both fields are optional on the wire so a missing field is reported as
// InvalidInput instead of a deserialization failure.
#[derive(ToSchema, Deserialize)]
pub struct LoginRequest {
    #[serde(default)]
    email: Option<String>,
    #[serde(default)]
    password: Option<String>,
}

impl std::fmt::Debug for LoginRequest {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LoginRequest")
            .field("email", &self.email)
            .field("password", &"***")
            .finish()
    }
}

#[derive(ToSchema, Serialize, Deserialize, Debug)]
pub struct LoginResponse {
    message: String,
    user: AuthenticatedUser,
}

#[derive(ToSchema, Serialize, Deserialize, Debug)]
pub struct ErrorResponse {
    message: String,
}

impl ErrorResponse {
    fn new(message: &str) -> Self {
        Self {
            message: message.to_string(),
        }
    }
}

impl IntoResponse for LoginError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            Self::InvalidInput => (StatusCode::BAD_REQUEST, MSG_MISSING_FIELDS),
            Self::InvalidCredentials => (StatusCode::UNAUTHORIZED, MSG_INVALID_CREDENTIALS),
            // the cause has already been logged, the client only gets the fixed message
            Self::Internal(_) => (StatusCode::INTERNAL_SERVER_ERROR, MSG_INTERNAL_ERROR),
        };

        (status, Json(ErrorResponse::new(message))).into_response()
    }
}

/// Client address of a request: first `X-Forwarded-For` hop, else the peer
/// address, else `-`.
fn client_ip(headers: &HeaderMap, extensions: &Extensions) -> String {
    headers
        .get("x-forwarded-for")
        .and_then(|value| value.to_str().ok())
        .and_then(|value| value.split(',').next())
        .map(str::trim)
        .filter(|value| !value.is_empty())
        .map(str::to_string)
        .or_else(|| {
            extensions
                .get::<ConnectInfo<SocketAddr>>()
                .map(|ConnectInfo(addr)| addr.ip().to_string())
        })
        .unwrap_or_else(|| "-".to_string())
}

// one record per attempt, never the password
fn audit(outcome: &str, email: &str, client_ip: &str, user_id: Option<i64>) {
    info!(
        target: AUDIT_TARGET,
        action = "login",
        outcome,
        email,
        client_ip,
        user_id,
        "login attempt"
    );
}

#[utoipa::path(
    post,
    path= "/login",
    request_body = LoginRequest,
    responses (
        (status = 200, description = "Login successful", body = LoginResponse, content_type = "application/json"),
        (status = 400, description = "Missing email or password", body = ErrorResponse),
        (status = 401, description = "Unknown email or wrong password", body = ErrorResponse),
        (status = 500, description = "Credential store failure", body = ErrorResponse),
    ),
    tag= "login"
)]
// axum handler for login
#[instrument(skip_all)]
pub async fn login(
    store: Extension<Arc<dyn CredentialStore>>,
    headers: HeaderMap,
    extensions: Extensions,
    payload: Result<Json<LoginRequest>, JsonRejection>,
) -> Response {
    let client_ip = client_ip(&headers, &extensions);

    let request: LoginRequest = match payload {
        Ok(Json(payload)) => payload,
        Err(rejection) => {
            debug!("Rejected login payload: {}", rejection);

            let err = LoginError::InvalidInput;
            audit(err.kind(), "", &client_ip, None);

            return err.into_response();
        }
    };

    debug!("request: {:?}", request);

    let email = request.email.unwrap_or_default();
    let password = SecretString::from(request.password.unwrap_or_default());

    match authenticate(store.0.as_ref(), &email, password).await {
        Ok(user) => {
            audit("success", &email, &client_ip, Some(user.id));

            (
                StatusCode::OK,
                Json(LoginResponse {
                    message: MSG_LOGIN_OK.to_string(),
                    user,
                }),
            )
                .into_response()
        }

        Err(e) => {
            audit(e.kind(), &email, &client_ip, None);

            e.into_response()
        }
    }
}
