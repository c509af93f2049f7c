//! `flow-network` — SUMO topology import, global coordinates, and adjacency.
//!
//! # Crate layout
//!
//! | Module          | Contents                                                  |
//! |-----------------|-----------------------------------------------------------|
//! | [`import`]      | `load_net_xml`, `parse_net_xml` (`.net.xml` → `Topology`) |
//! | [`topology`]    | `Topology`, `TopologyBuilder`, `EdgeRecord`, `EdgeSpec`   |
//! | [`connections`] | `ConnectionIndex` (lane-level next / prev)                |
//! | [`coords`]      | `CoordinateTable`, `CoordinateBuilder`                    |
//! | [`retry`]       | `with_retry`, `load_with_retry`, `CancelToken`            |
//! | [`network`]     | `Network` (read-only query facade), `NetworkSummary`      |
//! | [`error`]       | `NetError`, `NetResult<T>`                                |
//!
//! # Feature flags
//!
//! | Flag    | Effect                                                       |
//! |---------|--------------------------------------------------------------|
//! | `tokio` | Async retry (`with_retry_async`, `Network::load_async`).     |
//! | `serde` | Derives `Serialize`/`Deserialize` on public record types.    |

pub mod connections;
pub mod coords;
pub mod error;
pub mod import;
pub mod network;
pub mod retry;
pub mod topology;


pub use connections::ConnectionIndex;
pub use coords::{CoordinateBuilder, CoordinateTable};
pub use error::{NetError, NetResult};
pub use import::{load_net_xml, parse_net_xml};
pub use network::{Network, NetworkSummary};
pub use retry::{CancelToken, load_with_retry, with_retry};
pub use topology::{EdgeRecord, EdgeSpec, EdgeType, Topology, TopologyBuilder};

#[cfg(feature = "tokio")]
pub use retry::{load_with_retry_async, with_retry_async};
