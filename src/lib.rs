// src/lib.rs
pub mod checks;
pub mod config;
pub mod health;
pub mod registry;
pub mod server;
