//! ECS Components
//!
//! Entity components for workers and firms.

pub mod firm;
pub mod worker;

pub use firm::*;
pub use worker::*;
