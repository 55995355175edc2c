//! # cdag Client
//!
//! Request/response wrappers around the diagram backend and the editing
//! session that applies their results to a graph store.

pub mod client;
pub mod config;
pub mod error;
pub mod protocol;
pub mod session;

pub use client::SyncClient;
pub use config::ClientConfig;
pub use error::{SyncError, SyncResult};
pub use session::{Generated, Session};
