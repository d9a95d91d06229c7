//! Core types and utilities for the PharmaEC admin dashboard.
//!
//! This crate provides the foundational pieces shared by every other crate
//! in the workspace: the error `Result` alias, opaque backend identifiers,
//! and the key-value storage abstraction that stands in for the browser's
//! persistent storage.

pub mod error;
pub mod id;
pub mod storage;

pub use error::Result;
pub use id::{RoleId, ShopId, UserId, WarehouseId};
pub use storage::{KeyValueStore, MemoryStore, SessionStore, keys};
