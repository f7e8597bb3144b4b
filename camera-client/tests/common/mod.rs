#![allow(dead_code)] // not every test binary uses every helper

use camera_client::{Camera, Config};
use std::time::Duration;
use tokio::runtime::Runtime;
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockBuilder, MockServer};

pub const KEY: &str = "test-key";

/// Mock camera. The blocking client must not run inside the runtime, so the runtime only hosts the server.
pub struct MockCamera {
    pub server: MockServer,
    pub runtime: Runtime,
}

impl MockCamera {
    pub fn start() -> Self {
        let runtime = Runtime::new().unwrap();
        let server = runtime.block_on(MockServer::start());
        Self { server, runtime }
    }

    pub fn camera(&self) -> Camera {
        let config = Config::new(self.server.address().to_string(), KEY)
            .with_timeout(Duration::from_secs(5));
        Camera::new(config).unwrap()
    }

    pub fn mount(&self, mock: Mock) {
        self.runtime.block_on(mock.mount(&self.server));
    }

    pub fn received_requests(&self) -> Vec<wiremock::Request> {
        self.runtime
            .block_on(self.server.received_requests())
            .unwrap()
    }
}

/// Matches `<http_method> /api/v1/<endpoint>?key=<KEY>`.
pub fn endpoint(http_method: &str, endpoint: &str) -> MockBuilder {
    Mock::given(method(http_method))
        .and(path(format!("/api/v1/{}", endpoint)))
        .and(query_param("key", KEY))
}
