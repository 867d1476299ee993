//! Request / response DTO types.
//!
//! Inbound forms, outbound view models, and the explicit schemas of the
//! upstream course-listing and agent APIs. Annotated with [`utoipa`]
//! attributes to generate an OpenAPI 3.0 schema.

pub mod chat;
pub mod course;
pub mod upstream;
