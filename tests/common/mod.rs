use testcontainers::runners::AsyncRunner;
use testcontainers::ContainerAsync;
use testcontainers_modules::mongo::Mongo;

use linkedin_api::app::{router, AppState};

/// Holds a running MongoDB container and the router wired to it.
///
/// The container is kept alive for as long as this struct lives. When
/// dropped, it is stopped and cleaned up automatically.
pub struct TestEnv {
    _mongo: ContainerAsync<Mongo>,
    pub db: mongodb::Database,
    pub state: AppState,
}

impl TestEnv {
    /// Spin up MongoDB and build repositories against a fresh database.
    pub async fn start() -> Self {
        let mongo_container = Mongo::default()
            .start()
            .await
            .expect("Failed to start MongoDB container");

        let mongo_port = mongo_container
            .get_host_port_ipv4(27017)
            .await
            .expect("Failed to get MongoDB port");
        let mongo_uri = format!("mongodb://127.0.0.1:{}", mongo_port);
        let mongo_client = mongodb::Client::with_uri_str(&mongo_uri)
            .await
            .expect("Failed to connect to MongoDB");
        let db = mongo_client.database("linkedin_test");

        let state = AppState::from_database(&db);

        Self {
            _mongo: mongo_container,
            db,
            state,
        }
    }

    /// Build an `axum_test::TestServer` over the full router.
    pub fn server(&self) -> axum_test::TestServer {
        axum_test::TestServer::builder()
            .try_build(router(self.state.clone()))
            .expect("Failed to build TestServer")
    }

    /// Fetch a raw document straight from a collection.
    pub async fn raw(&self, collection: &str, field: &str, value: &str) -> Option<bson::Document> {
        self.db
            .collection::<bson::Document>(collection)
            .find_one(bson::doc! { field: value })
            .await
            .expect("Failed to query MongoDB")
    }
}

/// Generate an identifier unique to the current test.
pub fn unique(prefix: &str) -> String {
    format!("{prefix}-{}", uuid::Uuid::new_v4().simple())
}
