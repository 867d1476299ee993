//! HTTP middleware stack.

pub mod auth;
pub mod cors;
pub mod origin;
pub mod trace;
