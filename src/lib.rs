pub mod catalog;
pub mod config;
pub mod engine;
pub mod geometry;
pub mod handlers;
pub mod messaging;
pub mod observability;
pub mod protocol;
