//! API handlers: account, lists, single items and creation stubs.

use super::types::*;
use super::MockApi;
use crate::config::{IndexConfig, ResourceConfig};
use crate::error::MockError;
use crate::index::IndexBuilder;
use crate::lifecycle::{Reply, Trigger};
use crate::metrics;
use crate::pagination::PageCoordinates;
use bytes::Bytes;
use hyper::StatusCode;
use lazy_static::lazy_static;
use regex::Regex;
use tracing::{debug, error, warn};

const FORM_URLENCODED: &str = "application/x-www-form-urlencoded";
const MULTIPART: &str = "multipart/form-data";
const OCTET_STREAM: &str = "application/octet-stream";

lazy_static! {
    /// An import whose source URL carries no usable file name
    static ref UNKNOWN_IMPORT_URL: Regex = Regex::new(r"(?s)url=.*unknown").unwrap();

    /// A job asking for a target format that cannot be produced
    static ref UNSUPPORTED_TARGET: Regex =
        Regex::new(r#"name="target_format"[\s\S]*unsupported"#).unwrap();
}

type HandlerResult = Result<MockResponse, MockError>;

/// GET /account
pub fn handle_account(api: &MockApi) -> HandlerResult {
    let body = api.catalog().read_raw("account.json")?;
    Ok(raw_json_response(StatusCode::OK, body))
}

/// GET on a list endpoint
pub fn handle_index(api: &MockApi, index: &IndexConfig, req: &MockRequest) -> HandlerResult {
    let resource = api.resource(&index.resource)?;
    let coordinates = PageCoordinates::from_query(&req.query)?;
    let page = IndexBuilder::new(api.catalog(), resource, index).build(&coordinates)?;
    Ok(json_response(StatusCode::OK, &page))
}

/// GET, DELETE or destroy of a single instance
pub fn handle_item(api: &MockApi, resource: &str, id: &str, trigger: Trigger) -> HandlerResult {
    let resource = api.resource(resource)?;
    ensure_known(api, resource, id)?;

    let transition = api.lifecycle().apply(resource, id, trigger)?;
    match transition.reply {
        Reply::Snapshot(snapshot) => {
            let body = api.catalog().fetch(resource, &format!("{id}.{snapshot}"))?;
            Ok(raw_json_response(StatusCode::OK, body))
        }
        Reply::Current => {
            let body = api.catalog().fetch(resource, id)?;
            Ok(raw_json_response(StatusCode::OK, body))
        }
        Reply::Empty => Ok(raw_json_response(StatusCode::OK, Bytes::new())),
        Reply::NotFound => Err(gone(resource, id)),
    }
}

/// GET of an instance's binary content
pub fn handle_content(api: &MockApi, resource: &str, id: &str) -> HandlerResult {
    let resource = api.resource(resource)?;
    ensure_known(api, resource, id)?;

    let transition = api.lifecycle().apply(resource, id, Trigger::Read)?;
    if transition.reply == Reply::NotFound {
        return Err(gone(resource, id));
    }

    let body = if resource.is_sentinel(id) {
        let size = api.config().large_file_size_bytes().ok_or_else(|| {
            MockError::Misconfigured(format!(
                "large_file_size_mb {} overflows",
                api.config().large_file_size_mb
            ))
        })?;
        debug!(
            "Serving {} MiB generated payload for {}/{}",
            api.config().large_file_size_mb,
            resource.name,
            id
        );
        Bytes::from(vec![0u8; size])
    } else {
        api.catalog()
            .read_raw(&format!("{}/content/{}", resource.name, id))?
    };
    Ok(build_response_with_headers(
        StatusCode::OK,
        [("Content-Type", OCTET_STREAM)],
        body,
    ))
}

/// POST to a collection
pub fn handle_create(api: &MockApi, resource: &str, req: &MockRequest) -> HandlerResult {
    match resource {
        "files" => {
            let body = api.catalog().read_raw("files/1.json")?;
            Ok(raw_json_response(StatusCode::CREATED, body))
        }
        "imports" => {
            if req.has_content_type(FORM_URLENCODED) {
                let body = req.body_text();
                if UNKNOWN_IMPORT_URL.is_match(&body) && !body.contains("filename") {
                    return Ok(unprocessable(api, "unknown_filename"));
                }
            } else if !req.has_content_type(MULTIPART) {
                return Err(MockError::NotFound(format!("POST {}", req.path)));
            }
            started(api, resource)
        }
        "jobs" => {
            if !req.has_content_type(MULTIPART) {
                return Err(MockError::NotFound(format!("POST {}", req.path)));
            }
            if UNSUPPORTED_TARGET.is_match(&req.body_text()) {
                return Ok(unprocessable(api, "target_format"));
            }
            started(api, resource)
        }
        _ => Err(MockError::NotFound(format!("POST {}", req.path))),
    }
}

/// GET /__admin/health
pub fn handle_health() -> MockResponse {
    json_response(StatusCode::OK, &serde_json::json!({"status": "ok"}))
}

/// GET /__admin/metrics
pub fn handle_metrics() -> MockResponse {
    build_response_with_headers(
        StatusCode::OK,
        [("Content-Type", "text/plain; version=0.0.4")],
        metrics::collect_metrics(),
    )
}

/// POST /__admin/scenarios/reset
pub fn handle_reset(api: &MockApi) -> MockResponse {
    let tracked = api.lifecycle().len();
    api.lifecycle().reset_all();
    debug!("Reset {} lifecycle instances", tracked);
    json_response(StatusCode::OK, &serde_json::json!({"reset": tracked}))
}

/// Render an error, preferring the canned body for its status
pub fn handle_error(api: &MockApi, err: &MockError) -> MockResponse {
    let status = err.status();
    if status.is_server_error() {
        error!("Request failed: {}", err);
    } else if status == StatusCode::UNAUTHORIZED {
        warn!("Rejected request: {}", err);
    } else {
        debug!("Request failed: {}", err);
    }

    match api
        .catalog()
        .read_raw(&format!("errors/{}.json", status.as_u16()))
    {
        Ok(body) => raw_json_response(status, body),
        Err(_) => json_response(status, &ErrorResponse::from(err)),
    }
}

/// Initial snapshot of the first record, returned for any accepted creation
fn started(api: &MockApi, resource: &str) -> HandlerResult {
    let resource = api.resource(resource)?;
    let snapshot = resource
        .lifecycle
        .snapshot_names()
        .first()
        .map(|initial| format!("1.{initial}"))
        .unwrap_or_else(|| "1".to_string());
    let body = api.catalog().fetch(resource, &snapshot)?;
    Ok(raw_json_response(StatusCode::OK, body))
}

fn unprocessable(api: &MockApi, reason: &str) -> MockResponse {
    let status = StatusCode::UNPROCESSABLE_ENTITY;
    warn!("Rejecting creation: {}", reason);
    match api.catalog().read_raw(&format!("errors/422.{reason}.json")) {
        Ok(body) => raw_json_response(status, body),
        Err(_) => error_response(status, reason),
    }
}

/// Identifiers never seeded in the catalog are rejected before any
/// lifecycle state is created for them.
fn ensure_known(api: &MockApi, resource: &ResourceConfig, id: &str) -> Result<(), MockError> {
    let known = if resource.is_sentinel(id) {
        api.catalog().fetch(resource, id).is_ok()
    } else {
        api.catalog().exists(resource, id)?
    };
    if known {
        Ok(())
    } else {
        Err(MockError::NotFound(format!("{}/{}", resource.name, id)))
    }
}

fn gone(resource: &ResourceConfig, id: &str) -> MockError {
    MockError::NotFound(format!("{}/{}", resource.name, id))
}
