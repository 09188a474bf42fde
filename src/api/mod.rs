//! HTTP surface: JSON envelopes and the axum router.

mod types;

pub use types::*;

pub mod axum;
