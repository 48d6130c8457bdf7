//! Tools and the registry that owns them
//!
//! Provides the tool capability interface, the shared registry, and the
//! `generateRandomNumber` reference tool.

pub mod random_number;
pub mod registry;
pub mod tool;
