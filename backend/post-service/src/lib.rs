//! Post service: posts, comments, likes and file attachments over a document
//! store, keeping denormalized counters and file lists consistent with the
//! records they summarize.

pub mod config;
pub mod domain;
pub mod error;
pub mod repository;
pub mod services;
pub mod state;
pub mod storage;
pub mod store;
pub mod telemetry;

pub use config::Config;
pub use error::{ErrorKind, ServiceError, ServiceResult};
pub use state::AppState;
