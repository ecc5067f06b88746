pub mod error;
pub mod ports;
pub mod post_service;
pub mod query;
pub mod repo;
pub mod user_service;
