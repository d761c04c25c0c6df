//! Request handlers, grouped by resource.

pub mod generation;
pub mod project;
pub mod scene;
pub mod shot;
pub mod take;
