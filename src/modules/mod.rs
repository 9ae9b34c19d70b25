//! Modules layer - Infrastructure components for external integrations
//!
//! Contains adapters for external resources like the storage filesystem.

pub mod storage;
