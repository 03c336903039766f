//! HTTP server for the mock API.
//!
//! This module provides:
//! - `MockApi`: configuration, fixture catalog and lifecycle state shared by
//!   every connection
//! - `MockServer`: the hyper accept loop
//! - `router`: path parsing and dispatch
//! - `handlers`: one function per endpoint
//! - `types`: buffered requests and response helpers

pub mod handlers;
pub mod router;
pub mod types;

pub use router::{handle, route_request};
pub use types::{MockRequest, MockResponse};

use crate::catalog::{DirectorySource, FixtureCatalog};
use crate::config::{Config, ResourceConfig};
use crate::error::MockError;
use crate::lifecycle::LifecycleStateMachine;
use hyper::server::conn::http1;
use hyper::service::service_fn;
use hyper_util::rt::TokioIo;
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::net::TcpListener;
use tracing::{debug, info};

/// State shared by every request
pub struct MockApi {
    config: Config,
    catalog: FixtureCatalog,
    lifecycle: LifecycleStateMachine,
}

impl MockApi {
    pub fn new(config: Config, catalog: FixtureCatalog) -> Self {
        Self {
            config,
            catalog,
            lifecycle: LifecycleStateMachine::new(),
        }
    }

    /// Serve fixtures from the configured directory
    pub fn from_config(config: Config) -> Self {
        let source = DirectorySource::new(&config.fixtures_dir);
        Self::new(config, FixtureCatalog::new(Arc::new(source)))
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn catalog(&self) -> &FixtureCatalog {
        &self.catalog
    }

    pub fn lifecycle(&self) -> &LifecycleStateMachine {
        &self.lifecycle
    }

    /// Look up a resource type, treating unknown names as unmatched routes
    pub fn resource(&self, name: &str) -> Result<&ResourceConfig, MockError> {
        self.config
            .resource(name)
            .ok_or_else(|| MockError::NotFound(name.to_string()))
    }
}

/// Mock API server
pub struct MockServer {
    addr: SocketAddr,
    api: Arc<MockApi>,
}

impl MockServer {
    pub fn new(addr: SocketAddr, api: Arc<MockApi>) -> Self {
        Self { addr, api }
    }

    /// Bind the configured address and serve until the task is dropped
    pub async fn run(self) -> Result<(), anyhow::Error> {
        let listener = TcpListener::bind(self.addr).await?;
        serve(listener, self.api).await
    }
}

/// Accept connections on an already bound listener
pub async fn serve(listener: TcpListener, api: Arc<MockApi>) -> Result<(), anyhow::Error> {
    info!(
        "zamzar-mock listening on http://{}{}",
        listener.local_addr()?,
        api.config().base_path
    );

    loop {
        let (stream, _) = listener.accept().await?;
        let io = TokioIo::new(stream);
        let api = Arc::clone(&api);

        tokio::spawn(async move {
            let service = service_fn(move |req| {
                let api = Arc::clone(&api);
                async move { route_request(req, api).await }
            });

            if let Err(e) = http1::Builder::new().serve_connection(io, service).await {
                debug!("Connection error: {}", e);
            }
        });
    }
}
