//! Storage layer for teaching plans and their operation history.

pub mod config;
pub mod models;
pub mod pool;
pub mod queries;
