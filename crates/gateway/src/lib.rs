//! Client for the external image/video synthesis backend.
//!
//! The backend is opaque: one asynchronous call submits a job description
//! (prompt, source media references) and eventually yields a media reference
//! or an error. No retry, backoff, or partial-progress semantics are assumed.

pub mod client;
pub mod messages;

pub use client::{GatewayError, GenerationGateway, HttpGateway};
pub use messages::{SubmitRequest, SubmitResponse};
