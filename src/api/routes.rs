//! Route table for the users API.

use std::sync::Arc;

use crate::api::handlers;
use crate::parser::Method;
use crate::server::HttpServer;
use crate::store::SharedUserStore;

/// Path prefix of every versioned endpoint.
pub const API_PREFIX: &str = "/api/v1";

/// Register the users API on `server`, backed by `store`.
///
/// The root endpoint lists every route registered before it, so it is added
/// last.
pub async fn register_routes(server: &HttpServer, store: SharedUserStore) {
    let users = format!("{API_PREFIX}/users");
    let user = format!("{API_PREFIX}/users/{{id}}");

    server
        .add_route(format!("{API_PREFIX}/health"), vec![Method::GET], handlers::health_check)
        .await;

    let s = store.clone();
    server
        .add_route(users.clone(), vec![Method::GET], move |req| {
            handlers::list_users(s.clone(), req)
        })
        .await;
    let s = store.clone();
    server
        .add_route(users, vec![Method::POST], move |req| {
            handlers::create_user(s.clone(), req)
        })
        .await;
    let s = store.clone();
    server
        .add_route(user.clone(), vec![Method::GET], move |req| {
            handlers::get_user(s.clone(), req)
        })
        .await;
    let s = store.clone();
    server
        .add_route(user.clone(), vec![Method::PUT], move |req| {
            handlers::update_user(s.clone(), req)
        })
        .await;
    let s = store;
    server
        .add_route(user, vec![Method::DELETE], move |req| {
            handlers::delete_user(s.clone(), req)
        })
        .await;

    let endpoints = Arc::new(server.endpoints().await);
    server
        .add_route("/", vec![Method::GET], move |_req| {
            let endpoints = endpoints.clone();
            async move { handlers::api_info(&endpoints).await }
        })
        .await;
}
