pub mod app;
pub mod auth;
pub mod client;
pub mod config;
pub mod db;
pub mod error;
pub mod recipes;
pub mod state;

#[cfg(test)]
pub(crate) mod testing;
