pub mod cache;
pub mod config;
pub mod db;
pub mod error;
pub mod history;
pub mod labels;
pub mod models;
pub mod present;
pub mod profanity;
pub mod resolver;
pub mod storage;
pub mod store;

pub use error::CoreError;
pub use resolver::MediaResolver;
pub use present::{Presenter, RenderParams};
