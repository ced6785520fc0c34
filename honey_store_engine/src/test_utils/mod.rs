//! Helpers for tests that exercise the engine against a real SQLite file.
pub mod mock_dispatcher;
pub mod prepare_env;

pub use hs_common::QueuedTaskRunner;
pub use mock_dispatcher::MockDispatcher;

use hs_common::{live::LiveMonitor, AdminConfig, ConnectionMethod, ServiceLocation, ServiceStatus};

use crate::{
    events::EventProducers,
    test_utils::prepare_env::{prepare_test_env, random_db_path},
    FlowOptions,
    OrderFlowApi,
    SqliteDatabase,
    WebhookPolicy,
};

pub type TestFlowApi = OrderFlowApi<SqliteDatabase, MockDispatcher, QueuedTaskRunner>;

/// An order flow backed by a fresh SQLite database, a scriptable dispatcher and a task runner that only runs
/// background work when asked to.
pub struct TestSystem {
    pub db_path: String,
    pub api: TestFlowApi,
    pub dispatcher: MockDispatcher,
    pub runner: QueuedTaskRunner,
    pub monitor: LiveMonitor,
}

impl TestSystem {
    pub async fn new(policy: WebhookPolicy, producers: EventProducers) -> Self {
        let db_path = random_db_path();
        prepare_test_env(&db_path).await;
        let db = SqliteDatabase::new_with_url(&db_path, 1).await.expect("Error creating connection to database");
        let dispatcher = MockDispatcher::new();
        let runner = QueuedTaskRunner::new();
        let status = ServiceStatus::new("backend", ServiceLocation::Local, ConnectionMethod::Direct);
        let monitor = LiveMonitor::new(status, AdminConfig::default());
        let options = FlowOptions { webhook_policy: policy, ..Default::default() };
        let api = OrderFlowApi::new(db, dispatcher.clone(), runner.clone(), producers, monitor.clone(), options);
        Self { db_path, api, dispatcher, runner, monitor }
    }
}

impl std::fmt::Debug for TestSystem {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "TestSystem ({})", self.db_path)
    }
}
