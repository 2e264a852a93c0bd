//! Language-side machinery for the expression editor: token scanning,
//! completion sources, lint diagnostics, and tuning settings.
//!
//! Session state (document, cursor, popup) lives in `exprline-session`;
//! everything here is stateless per request.

pub mod complete;
pub mod lint;
#[cfg(feature = "remote")]
pub mod remote;
pub mod settings;
pub mod syntax;
