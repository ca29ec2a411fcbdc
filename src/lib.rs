pub mod auth;
pub mod config;
pub mod db;
pub mod error;
pub mod export;
pub mod models;
pub mod notify;
pub mod routes;
pub mod schema;
pub mod state;
pub mod validation;
pub mod visibility;
