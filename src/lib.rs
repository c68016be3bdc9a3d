pub mod app;
pub mod config;
pub mod error;
pub mod api {
    pub mod body;
    pub mod connections;
    pub mod errors;
    pub mod messages;
    pub mod posts;
    pub mod users;
}
pub mod db {
    pub mod connection_repository;
    pub mod message_repository;
    pub mod models;
    pub mod post_repository;
    pub mod repository;
    pub mod user_repository;
}
