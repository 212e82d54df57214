// Application layer - orchestration between front ends and the store.
// Input defaulting and the amount policy live here; the store only persists.

pub mod error;
pub mod service;

pub use error::*;
pub use service::*;
