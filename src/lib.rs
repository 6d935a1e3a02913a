pub mod app;
pub mod auth;
pub mod client;
pub mod config;
pub mod error;
pub mod response;
pub mod state;
pub mod weather;

#[cfg(test)]
mod testing;
