pub mod auth;
pub mod client;
pub mod error;
pub mod types;

pub use client::{TraktApp, TraktClient};
pub use error::TraktError;
