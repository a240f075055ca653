//! Data models for the application
//!
//! Each sub-module represents a specific feature area.

mod chat;
mod document;
mod user;

pub use chat::*;
pub use document::*;
pub use user::*;
