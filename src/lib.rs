pub mod aggregator;
pub mod auth;
pub mod composer;
pub mod config;
pub mod db;
pub mod error;
pub mod handlers;
pub mod models;
pub mod resolver;
pub mod response;
pub mod storage;
pub mod upload;

pub use db::create_pool;
