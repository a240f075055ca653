//! Bearer-token authentication.
//!
//! The identity provider issues HS256 tokens; this module only verifies them
//! and turns the claims into a `UserContext`.

pub mod middleware;
pub mod models;

pub use middleware::{auth_middleware, AuthState};
pub use models::{CurrentUser, JwtClaims};
