//! `flow-core` — foundational types for the flow traffic-network kernel.
//!
//! This crate is a dependency of every other `flow-*` crate.  It has no
//! `flow-*` dependencies and minimal external ones (only `thiserror`, plus
//! optional `serde`).
//!
//! # What lives here
//!
//! | Module       | Contents                                              |
//! |--------------|-------------------------------------------------------|
//! | [`ids`]      | `EdgeId` (regular / internal), `LaneIndex`, `LaneRef` |
//! | [`sentinel`] | `SENTINEL`, `INTERNAL_EDGE_START`, `DEFAULT_SPEED`    |
//! | [`config`]   | `NetworkConfig`, `RetryPolicy`                        |
//! | [`error`]    | `CoreError`, `CoreResult`                             |
//!
//! # Feature flags
//!
//! | Flag    | Effect                                                     |
//! |---------|------------------------------------------------------------|
//! | `serde` | Adds `Serialize`/`Deserialize` to ids and configuration.   |

pub mod config;
pub mod error;
pub mod ids;
pub mod sentinel;

#[cfg(test)]
mod tests;

// ── Re-exports ────────────────────────────────────────────────────────────────

pub use config::{NetworkConfig, RetryPolicy};
pub use error::{CoreError, CoreResult};
pub use ids::{EdgeId, LaneIndex, LaneRef};
pub use sentinel::{DEFAULT_SPEED, INTERNAL_EDGE_START, SENTINEL};
