//! Route dispatch for the mock API.

use super::handlers;
use super::types::*;
use super::MockApi;
use crate::error::MockError;
use crate::lifecycle::Trigger;
use crate::metrics;
use bytes::Bytes;
use http_body_util::Full;
use hyper::body::Incoming;
use hyper::{Method, Request, Response, StatusCode};
use std::sync::Arc;
use tracing::debug;

const ADMIN_PREFIX: &str = "/__admin/";

/// Parsed route below the base path
#[derive(Debug, PartialEq, Eq)]
enum ApiRoute<'a> {
    /// /account
    Account,
    /// /:resource
    Collection(&'a str),
    /// /:resource/:id
    Item(&'a str, &'a str),
    /// /:resource/:id/content
    Content(&'a str, &'a str),
    /// /:resource/:id/destroy
    Destroy(&'a str, &'a str),
}

impl<'a> ApiRoute<'a> {
    fn parse(segments: &[&'a str]) -> Option<Self> {
        match segments {
            ["account"] => Some(ApiRoute::Account),
            [resource] => Some(ApiRoute::Collection(resource)),
            [resource, id] => Some(ApiRoute::Item(resource, id)),
            [resource, id, "content"] => Some(ApiRoute::Content(resource, id)),
            [resource, id, "destroy"] => Some(ApiRoute::Destroy(resource, id)),
            _ => None,
        }
    }
}

/// Main request router
pub async fn route_request(
    req: Request<Incoming>,
    api: Arc<MockApi>,
) -> Result<Response<Full<Bytes>>, hyper::Error> {
    let method = req.method().clone();
    let response = match MockRequest::from_incoming(req).await {
        Ok(req) => handle(&api, &req),
        Err(e) => error_response(StatusCode::BAD_REQUEST, &e),
    };
    metrics::record_request(method.as_str(), response.status().as_u16());
    Ok(response)
}

/// Dispatch a buffered request
pub fn handle(api: &MockApi, req: &MockRequest) -> MockResponse {
    debug!("{} {}", req.method, req.path);

    if let Some(admin) = req.path.strip_prefix(ADMIN_PREFIX) {
        return route_admin(api, &req.method, admin);
    }

    if !is_authorized(api, req) {
        return handlers::handle_error(api, &MockError::Unauthorized);
    }

    match route_api(api, req) {
        Ok(response) => response,
        Err(err) => handlers::handle_error(api, &err),
    }
}

fn route_admin(api: &MockApi, method: &Method, path: &str) -> MockResponse {
    match (method, path) {
        (&Method::GET, "health") => handlers::handle_health(),
        (&Method::GET, "metrics") => handlers::handle_metrics(),
        (&Method::POST, "scenarios/reset") => handlers::handle_reset(api),
        _ => error_response(StatusCode::NOT_FOUND, "Not Found"),
    }
}

fn is_authorized(api: &MockApi, req: &MockRequest) -> bool {
    req.authorization
        .as_deref()
        .and_then(|value| value.strip_prefix("Bearer "))
        .is_some_and(|key| key == api.config().api_key)
}

fn route_api(api: &MockApi, req: &MockRequest) -> Result<MockResponse, MockError> {
    let not_found = || MockError::NotFound(format!("{} {}", req.method, req.path));

    let path = req
        .path
        .strip_prefix(api.config().base_path.as_str())
        .and_then(|rest| rest.strip_prefix('/'))
        .ok_or_else(not_found)?;
    let path = path.trim_end_matches('/');

    // List endpoints may span several segments (jobs/successful)
    if req.method == Method::GET {
        if let Some(index) = api.config().index(path) {
            return handlers::handle_index(api, index, req);
        }
    }

    let segments: Vec<&str> = path.split('/').collect();
    let route = ApiRoute::parse(&segments).ok_or_else(not_found)?;

    match (&req.method, route) {
        (&Method::GET, ApiRoute::Account) => handlers::handle_account(api),
        (&Method::POST, ApiRoute::Collection(resource)) => {
            handlers::handle_create(api, resource, req)
        }
        (&Method::GET, ApiRoute::Item(resource, id)) => {
            handlers::handle_item(api, resource, id, Trigger::Read)
        }
        (&Method::DELETE, ApiRoute::Item(resource, id)) => {
            handlers::handle_item(api, resource, id, Trigger::Delete)
        }
        (&Method::GET, ApiRoute::Content(resource, id)) => {
            handlers::handle_content(api, resource, id)
        }
        (&Method::POST, ApiRoute::Destroy(resource, id)) => {
            handlers::handle_item(api, resource, id, Trigger::Destroy)
        }
        _ => Err(not_found()),
    }
}
