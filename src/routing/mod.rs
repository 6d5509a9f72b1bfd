//! Routing module
//!
//! Maps request paths onto filesystem routes under the content root.

pub mod route;

pub use route::{normalize, Route};
