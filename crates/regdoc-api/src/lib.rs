//! Regdoc API Library
//!
//! HTTP handlers, authentication and application setup for the regional
//! document portal.

pub mod api_doc;
pub mod auth;
pub mod constants;
pub mod error;
mod handlers;
pub mod setup;
pub mod state;

pub use error::{ErrorResponse, HttpAppError};
pub use state::AppState;
