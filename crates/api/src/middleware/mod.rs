//! Authentication middleware extractors.
//!
//! - [`auth::AuthUser`] -- Requires a valid JWT Bearer token.
//! - [`auth::OptionalAuthUser`] -- Accepts guests; rejects only malformed or invalid tokens.

pub mod auth;
