//! Typed PostgreSQL data layer for the storyboard service: one delegate per
//! model with filtering, pagination, aggregation and upserts, a pooled
//! client with transactions and raw SQL passthrough, and the actix-web
//! routes built on top of it.

pub mod client;
pub mod config;
pub mod constants;
pub mod db;
pub mod error;
pub mod generation_routes;
pub mod handler;
pub mod library_routes;
pub mod midware;
pub mod models;
pub mod query;
pub mod raw;
pub mod repo;
pub mod resource;
pub mod schema;
pub mod transaction_routes;
pub mod user_routes;

#[cfg(test)]
mod tests;

pub use client::{Client, TransactionOptions};
pub use config::DbConfig;
pub use error::{DbError, DbResult};
