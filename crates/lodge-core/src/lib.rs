//! Service plumbing shared by lodge binaries: health probes, tracing set-up,
//! HTTP layers and serde helpers.

pub mod health;
pub mod middleware;
pub mod serde;
pub mod tracing;
