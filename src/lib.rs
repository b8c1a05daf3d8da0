pub mod aggregate;
pub mod auth;
pub mod config;
pub mod db;
pub mod error;
pub mod geo;
pub mod handlers;
pub mod mailer;
pub mod middleware;
pub mod models;
pub mod query;
pub mod routes;
pub mod upload;
