use std::sync::Arc;

use axum::routing::{get, patch, post, put};
use axum::Router;
use tower::ServiceBuilder;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

use crate::api::{connections, messages, posts, users};
use crate::db::connection_repository::{ConnectionRepository, MongoConnectionRepository};
use crate::db::message_repository::{MessageRepository, MongoMessageRepository};
use crate::db::post_repository::{MongoPostRepository, PostRepository};
use crate::db::user_repository::{MongoUserRepository, UserRepository};

/// Shared handler state: one repository per collection.
#[derive(Clone)]
pub struct AppState {
    pub user_repo: Arc<dyn UserRepository>,
    pub connection_repo: Arc<dyn ConnectionRepository>,
    pub post_repo: Arc<dyn PostRepository>,
    pub message_repo: Arc<dyn MessageRepository>,
}

impl AppState {
    /// Wire MongoDB-backed repositories for every collection in `db`.
    pub fn from_database(db: &mongodb::Database) -> Self {
        Self {
            user_repo: Arc::new(MongoUserRepository::new(db)),
            connection_repo: Arc::new(MongoConnectionRepository::new(db)),
            post_repo: Arc::new(MongoPostRepository::new(db)),
            message_repo: Arc::new(MongoMessageRepository::new(db)),
        }
    }
}

/// Build the full HTTP router.
///
/// Connections and messages share one path parameter name per prefix: the
/// listing routes take a user id where the mutation routes take the
/// entity's own id.
pub fn router(state: AppState) -> Router {
    Router::new()
        // Users
        .route(
            "/users",
            get(users::list_users_handler).post(users::create_user_handler),
        )
        .route(
            "/users/{user_id}",
            get(users::get_user_handler)
                .patch(users::update_user_handler)
                .delete(users::delete_user_handler),
        )
        .route(
            "/users/{user_id}/profile-views",
            get(users::profile_views_handler),
        )
        .route("/users/{user_id}/skills", put(users::add_skill_handler))
        .route("/users/{user_id}/premium", patch(users::upgrade_premium_handler))
        // Connections
        .route(
            "/connections",
            post(connections::create_connection_handler),
        )
        .route(
            "/connections/{id}",
            get(connections::list_connections_handler)
                .patch(connections::accept_connection_handler)
                .delete(connections::delete_connection_handler),
        )
        // Posts
        .route(
            "/posts",
            get(posts::list_posts_handler).post(posts::create_post_handler),
        )
        .route(
            "/posts/{post_id}",
            get(posts::get_post_handler).delete(posts::delete_post_handler),
        )
        .route("/posts/{post_id}/likes", patch(posts::like_post_handler))
        // Messages
        .route("/messages", post(messages::create_message_handler))
        .route(
            "/messages/{id}",
            get(messages::list_messages_handler).delete(messages::delete_message_handler),
        )
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(CorsLayer::permissive()),
        )
        .with_state(state)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::connection_repository::MockConnectionRepository;
    use crate::db::message_repository::MockMessageRepository;
    use crate::db::post_repository::MockPostRepository;
    use crate::db::user_repository::MockUserRepository;
    use crate::error::AppError;
    use axum::http::StatusCode;
    use bson::{doc, oid::ObjectId, Bson};
    use serde_json::json;

    struct Mocks {
        users: MockUserRepository,
        connections: MockConnectionRepository,
        posts: MockPostRepository,
        messages: MockMessageRepository,
    }

    impl Mocks {
        fn new() -> Self {
            Self {
                users: MockUserRepository::new(),
                connections: MockConnectionRepository::new(),
                posts: MockPostRepository::new(),
                messages: MockMessageRepository::new(),
            }
        }

        fn server(self) -> axum_test::TestServer {
            let state = AppState {
                user_repo: Arc::new(self.users),
                connection_repo: Arc::new(self.connections),
                post_repo: Arc::new(self.posts),
                message_repo: Arc::new(self.messages),
            };
            axum_test::TestServer::builder()
                .try_build(router(state))
                .expect("Failed to build TestServer")
        }
    }

    #[tokio::test]
    async fn test_create_post_returns_created_with_id() {
        let oid = ObjectId::new();
        let mut mocks = Mocks::new();
        mocks
            .posts
            .expect_insert()
            .times(1)
            .returning(move |post| {
                assert_eq!(post.get_str("postId").unwrap(), "p1");
                assert!(post.get_datetime("createdAt").is_ok());
                Ok(Bson::ObjectId(oid))
            });
        let server = mocks.server();

        let response = server
            .post("/posts")
            .json(&json!({ "postId": "p1", "text": "hi" }))
            .await;

        response.assert_status(StatusCode::CREATED);
        assert_eq!(response.text(), format!("Post added with ID: {}", oid.to_hex()));
    }

    #[tokio::test]
    async fn test_get_missing_user_is_not_found() {
        let mut mocks = Mocks::new();
        mocks
            .users
            .expect_find_by_user_id()
            .returning(|_| Ok(None));
        let server = mocks.server();

        let response = server.get("/users/ghost").await;

        response.assert_status_not_found();
        assert_eq!(response.text(), "User not found.");
    }

    #[tokio::test]
    async fn test_add_skill_without_skills_never_touches_store() {
        let mut mocks = Mocks::new();
        mocks.users.expect_push_skill().times(0);
        let server = mocks.server();

        let response = server.put("/users/u1/skills").json(&json!({})).await;

        response.assert_status_bad_request();
        assert_eq!(
            response.text(),
            "Skill is required and cannot be null or undefined"
        );
    }

    #[tokio::test]
    async fn test_accept_connection_ignores_body() {
        let mut mocks = Mocks::new();
        mocks
            .connections
            .expect_accept()
            .withf(|connection_id| connection_id == "c1")
            .times(1)
            .returning(|_| Ok(1));
        let server = mocks.server();

        let response = server
            .patch("/connections/c1")
            .json(&json!({ "status": "rejected" }))
            .await;

        response.assert_status_ok();
        assert_eq!(response.text(), "1 connection(s) accepted");
    }

    #[tokio::test]
    async fn test_list_routes_share_path_with_mutations() {
        let mut mocks = Mocks::new();
        mocks
            .connections
            .expect_list_for_user()
            .returning(|_| Ok(vec![doc! { "connectionId": "c1", "user1": "u1" }]));
        mocks
            .messages
            .expect_list_for_recipient()
            .returning(|_| Ok(vec![]));
        let server = mocks.server();

        let connections = server.get("/connections/u1").await;
        connections.assert_status_ok();
        connections.assert_json(&json!([{ "connectionId": "c1", "user1": "u1" }]));

        let messages = server.get("/messages/u1").await;
        messages.assert_status_ok();
        messages.assert_json(&json!([]));
    }

    #[tokio::test]
    async fn test_store_failure_maps_to_internal_error() {
        let mut mocks = Mocks::new();
        mocks
            .posts
            .expect_list()
            .returning(|| Err(AppError::Database("server selection timeout".into())));
        let server = mocks.server();

        let response = server.get("/posts").await;

        response.assert_status(StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(
            response.text(),
            "Error fetching posts: server selection timeout"
        );
    }

    #[tokio::test]
    async fn test_delete_message_reports_zero_as_success() {
        let mut mocks = Mocks::new();
        mocks
            .messages
            .expect_delete()
            .returning(|_| Ok(0));
        let server = mocks.server();

        let response = server.delete("/messages/m404").await;

        response.assert_status_ok();
        assert_eq!(response.text(), "0 message(s) deleted");
    }

    #[tokio::test]
    async fn test_add_skill_without_body_is_bad_request() {
        let mut mocks = Mocks::new();
        mocks.users.expect_push_skill().times(0);
        let server = mocks.server();

        let response = server.put("/users/u1/skills").await;

        response.assert_status_bad_request();
        assert_eq!(
            response.text(),
            "Skill is required and cannot be null or undefined"
        );
    }

    #[tokio::test]
    async fn test_add_skill_with_array_body_is_bad_request() {
        let mut mocks = Mocks::new();
        mocks.users.expect_push_skill().times(0);
        let server = mocks.server();

        let response = server.put("/users/u1/skills").json(&json!(["Rust"])).await;

        response.assert_status_bad_request();
        assert_eq!(
            response.text(),
            "Skill is required and cannot be null or undefined"
        );
    }

    #[tokio::test]
    async fn test_create_without_body_stores_empty_document() {
        let oid = ObjectId::new();
        let mut mocks = Mocks::new();
        mocks
            .users
            .expect_insert()
            .withf(|user| user.is_empty())
            .times(1)
            .returning(move |_| Ok(Bson::ObjectId(oid)));
        let server = mocks.server();

        let response = server.post("/users").await;

        response.assert_status(StatusCode::CREATED);
        assert_eq!(response.text(), format!("User added with ID: {}", oid.to_hex()));
    }

    #[tokio::test]
    async fn test_create_with_array_body_never_touches_store() {
        let mut mocks = Mocks::new();
        mocks.messages.expect_insert().times(0);
        let server = mocks.server();

        let response = server.post("/messages").json(&json!([{ "to": "u2" }])).await;

        response.assert_status_bad_request();
        assert_eq!(response.text(), "Request body must be a JSON object");
    }
}
