mod data_sources_api;
mod lifecycle_api;

// -----------------------------------------------------------------------------

mod helpers {
    use isard_provider::config::{Defaults, PollConfig};
    use isard_provider::isard::client::IsardClient;
    use isard_provider::poller::NotFoundPolicy;
    use isard_provider::state::ProviderState;
    use std::sync::Arc;
    use wiremock::MockServer;

    /// Test helper that points a provider at a mock Isard API.
    ///
    pub struct TestProvider {
        pub server: MockServer,
        pub state: ProviderState,
    }

    impl TestProvider {
        /// Starts a mock server and builds a provider state around it, with
        /// polling fast enough for tests.
        ///
        pub async fn new() -> Self {
            let server = MockServer::start().await;
            let client = IsardClient::new(&server.uri(), "integration-token".into()).unwrap();
            let poll = PollConfig {
                interval_ms: 20,
                stop_timeout_secs: 1,
                not_found: NotFoundPolicy::Terminal,
                media_settle_ms: 10,
            };

            TestProvider {
                server,
                state: ProviderState::new(Arc::new(client), poll, Defaults::default()),
            }
        }
    }
}
