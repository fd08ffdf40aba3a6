//! Request handlers.
//!
//! Each public handler takes the shared store and the request, and always
//! answers with an [`Envelope`]; failures become error envelopes with the
//! matching status code instead of propagating to the server.

use std::time::{SystemTime, UNIX_EPOCH};

use log::debug;
use serde::Serialize;

use crate::api::envelope::Envelope;
use crate::api::error::ApiError;
use crate::parser::HttpRequest;
use crate::server::{Error, HttpResponse, StatusCode};
use crate::store::{SharedUserStore, User};

/// Service name reported by the health endpoint.
pub const SERVICE_NAME: &str = "users-api";

#[derive(Debug, Serialize)]
struct Health {
    timestamp: u64,
    service: &'static str,
}

#[derive(Debug, Serialize)]
struct ApiInfo<'a> {
    version: &'static str,
    endpoints: &'a [String],
}

/// Turn a handler outcome into the response sent to the client.
fn respond(result: Result<HttpResponse, ApiError>) -> Result<HttpResponse, Error> {
    match result {
        Ok(response) => Ok(response),
        Err(e) => {
            debug!("Request failed: {e:?}");
            e.into_response()
        }
    }
}

/// Parse the `{id}` path parameter.
fn user_id(req: &HttpRequest) -> Result<u64, ApiError> {
    let raw = req.path_param("id").unwrap_or_default();
    // `u64::from_str` would also take a leading `+`
    if raw.is_empty() || !raw.bytes().all(|b| b.is_ascii_digit()) {
        return Err(ApiError::InvalidId(raw.to_string()));
    }
    raw.parse().map_err(|_| ApiError::InvalidId(raw.to_string()))
}

/// `GET /api/v1/health`
pub async fn health_check(_req: HttpRequest) -> Result<HttpResponse, Error> {
    // A clock before the epoch is reported as zero
    let timestamp = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_secs())
        .unwrap_or(0);

    let health = Health {
        timestamp,
        service: SERVICE_NAME,
    };
    Envelope::success("Server is running", health).into_response(StatusCode::Ok)
}

/// `GET /`
pub async fn api_info(endpoints: &[String]) -> Result<HttpResponse, Error> {
    let info = ApiInfo {
        version: env!("CARGO_PKG_VERSION"),
        endpoints,
    };
    Envelope::success("Welcome to the users API", info).into_response(StatusCode::Ok)
}

/// `GET /api/v1/users`
pub async fn list_users(store: SharedUserStore, _req: HttpRequest) -> Result<HttpResponse, Error> {
    let users: Vec<User> = store.lock().await.list().to_vec();
    Envelope::success("Users retrieved successfully", users).into_response(StatusCode::Ok)
}

/// `GET /api/v1/users/{id}`
pub async fn get_user(store: SharedUserStore, req: HttpRequest) -> Result<HttpResponse, Error> {
    respond(fetch(&store, &req).await)
}

async fn fetch(store: &SharedUserStore, req: &HttpRequest) -> Result<HttpResponse, ApiError> {
    let id = user_id(req)?;
    let user = store.lock().await.get(id)?.clone();
    Ok(Envelope::success("User found", user).into_response(StatusCode::Ok)?)
}

/// `POST /api/v1/users`
pub async fn create_user(store: SharedUserStore, req: HttpRequest) -> Result<HttpResponse, Error> {
    respond(create(&store, &req).await)
}

async fn create(store: &SharedUserStore, req: &HttpRequest) -> Result<HttpResponse, ApiError> {
    let user: User = req.json()?;
    let user = store.lock().await.create(user);
    Ok(Envelope::success("User created successfully", user).into_response(StatusCode::Created)?)
}

/// `PUT /api/v1/users/{id}`
pub async fn update_user(store: SharedUserStore, req: HttpRequest) -> Result<HttpResponse, Error> {
    respond(update(&store, &req).await)
}

async fn update(store: &SharedUserStore, req: &HttpRequest) -> Result<HttpResponse, ApiError> {
    let id = user_id(req)?;
    let data: User = req.json()?;
    let user = store.lock().await.update(id, data)?;
    Ok(Envelope::success("User updated successfully", user).into_response(StatusCode::Ok)?)
}

/// `DELETE /api/v1/users/{id}`
pub async fn delete_user(store: SharedUserStore, req: HttpRequest) -> Result<HttpResponse, Error> {
    respond(delete(&store, &req).await)
}

async fn delete(store: &SharedUserStore, req: &HttpRequest) -> Result<HttpResponse, ApiError> {
    let id = user_id(req)?;
    store.lock().await.delete(id)?;
    Ok(Envelope::<()>::done("User deleted successfully").into_response(StatusCode::Ok)?)
}
