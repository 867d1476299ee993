//! Request-scoped domain logic shared by the route handlers.

pub mod chat;
pub mod course_sync;
pub mod history;
pub mod instructions;
