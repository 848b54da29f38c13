//! # keygate-core
//!
//! Core crate for Keygate. Contains the collaborator traits consumed by the
//! authentication core, configuration schemas, domain events, the user
//! model, and the unified error system.
//!
//! This crate has **no** internal dependencies on other Keygate crates.

pub mod config;
pub mod error;
pub mod events;
pub mod models;
pub mod result;
pub mod traits;

pub use error::{AppError, ErrorKind};
pub use result::AppResult;
