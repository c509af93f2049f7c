//! The long-lived, read-only network.
//!
//! # Lifecycle
//!
//! ```text
//! .net.xml ──(retry)──► Topology ──► CoordinateBuilder ──► Network
//!                                                          (immutable)
//! ```
//!
//! Construction happens once, on one thread.  Afterwards `Network` is
//! `Send + Sync` and has no interior mutability, so simulation threads can
//! share a `&Network` (or `Arc<Network>`) without locking.
//!
//! # Sentinels
//!
//! Scalar queries on an unknown edge return [`SENTINEL`] and log a warning
//! rather than failing; a long simulation should not die on one bad id.
//! The `try_*` variants return the [`NetError`] instead.

use std::collections::BTreeMap;
use std::path::Path;

use log::{debug, info, warn};

use flow_core::{EdgeId, LaneIndex, LaneRef, NetworkConfig, SENTINEL};

use crate::coords::{CoordinateBuilder, CoordinateTable};
use crate::retry::{CancelToken, load_with_retry};
use crate::topology::{EdgeRecord, EdgeType, Topology};
use crate::{NetError, NetResult};

// ── NetworkSummary ────────────────────────────────────────────────────────────

/// Network-wide scalars, computed once at construction.
#[derive(Copy, Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct NetworkSummary {
    /// Sum of all edge lengths, internal edges included.
    pub total_length:        f64,
    /// Sum of regular edge lengths: the span vehicles are distributed over.
    pub non_internal_length: f64,
    /// Highest regular-edge speed limit; [`SENTINEL`] without regular edges.
    pub max_speed:           f64,
}

impl NetworkSummary {
    fn compute(topology: &Topology) -> Self {
        let total_length = topology.edges().map(|e| e.length).sum();
        let non_internal_length = topology.regular_edges().map(|e| e.length).sum();
        let max_speed = topology
            .regular_edges()
            .map(|e| e.speed)
            .fold(None, |max: Option<f64>, s| Some(max.map_or(s, |m| m.max(s))))
            .unwrap_or_else(|| {
                warn!("network has no regular edges; max speed unavailable");
                SENTINEL
            });
        Self { total_length, non_internal_length, max_speed }
    }
}

// ── Network ───────────────────────────────────────────────────────────────────

pub struct Network {
    topology:     Topology,
    coords:       CoordinateTable,
    summary:      NetworkSummary,
    regular_ids:  Vec<EdgeId>,
    junction_ids: Vec<EdgeId>,
}

impl Network {
    /// Freeze `topology` and lay out its coordinate line.
    ///
    /// # Errors
    ///
    /// [`NetError::Core`] if `config` is invalid.
    pub fn new(topology: Topology, config: &NetworkConfig) -> NetResult<Self> {
        config.validate()?;

        let coords = CoordinateBuilder::from_topology(&topology, config).build();
        let summary = NetworkSummary::compute(&topology);
        let regular_ids = topology.regular_edges().map(|e| e.id.clone()).collect();
        let junction_ids = topology.internal_edges().map(|e| e.id.clone()).collect();

        debug!(
            "network ready: {} edges, non-internal length {:.1} m, max speed {:.1} m/s",
            topology.edge_count(),
            summary.non_internal_length,
            summary.max_speed
        );

        Ok(Self { topology, coords, summary, regular_ids, junction_ids })
    }

    /// Import `path` (retrying per `config.retry`) and build the network.
    pub fn load(path: &Path, config: &NetworkConfig, cancel: &CancelToken) -> NetResult<Self> {
        config.validate()?;
        let topology = load_with_retry(path, &config.retry, cancel)?;
        info!("loaded {} ({} edges)", path.display(), topology.edge_count());
        Self::new(topology, config)
    }

    /// Async counterpart of [`load`](Self::load).
    #[cfg(feature = "tokio")]
    pub async fn load_async(
        path: &Path,
        config: &NetworkConfig,
        cancel: &CancelToken,
    ) -> NetResult<Self> {
        config.validate()?;
        let topology = crate::retry::load_with_retry_async(path, &config.retry, cancel).await?;
        info!("loaded {} ({} edges)", path.display(), topology.edge_count());
        Self::new(topology, config)
    }

    // ── Position mapping ──────────────────────────────────────────────────

    /// The edge covering global position `x`, and the offset into it.
    pub fn edge_at(&self, x: f64) -> NetResult<(&EdgeId, f64)> {
        self.coords.edge_at(x)
    }

    /// Global position of `offset` metres into `edge`.
    ///
    /// - empty id (vehicle gone) or a zero-length edge → [`SENTINEL`]
    /// - internal edge with its own start → `start + offset`
    /// - internal edge without one → the start of its coarser junction id
    ///   (`:J_3` → `:J`), or [`SENTINEL`] if that is untracked too
    /// - regular edge → `start + offset`
    ///
    /// # Errors
    ///
    /// [`NetError::UnknownEdge`] for a regular id with no start.
    pub fn global_position(&self, edge: &str, offset: f64) -> NetResult<f64> {
        if edge.is_empty() {
            return Ok(SENTINEL);
        }
        if self.topology.edge(edge).is_some_and(|e| e.length == 0.0) {
            return Ok(SENTINEL);
        }

        if !EdgeId::is_internal_id(edge) {
            return self
                .coords
                .start(edge)
                .map(|start| start + offset)
                .ok_or_else(|| NetError::UnknownEdge(edge.to_string()));
        }

        if let Some(start) = self
            .coords
            .internal_start(edge)
            .or_else(|| self.coords.start(edge))
        {
            return Ok(start + offset);
        }

        // One entry may stand in for all lanes of a junction.
        match EdgeId::coarser_id(edge).and_then(|coarse| self.coords.start(coarse)) {
            Some(start) => {
                debug!("internal edge {edge:?} located through its junction entry");
                Ok(start)
            }
            None => {
                debug!("internal edge {edge:?} has no start; returning sentinel");
                Ok(SENTINEL)
            }
        }
    }

    // ── Per-edge scalars ──────────────────────────────────────────────────

    pub fn try_edge_length(&self, edge: &str) -> NetResult<f64> {
        self.record(edge).map(|e| e.length)
    }

    pub fn try_speed_limit(&self, edge: &str) -> NetResult<f64> {
        self.record(edge).map(|e| e.speed)
    }

    pub fn try_lane_count(&self, edge: &str) -> NetResult<u32> {
        self.record(edge).map(|e| e.lane_count)
    }

    /// Length in metres, or [`SENTINEL`] for an unknown edge.
    pub fn edge_length(&self, edge: &str) -> f64 {
        self.try_edge_length(edge)
            .unwrap_or_else(|e| sentinel_with_warning("edge length", e))
    }

    /// Speed limit in m/s, or [`SENTINEL`] for an unknown edge.
    pub fn speed_limit(&self, edge: &str) -> f64 {
        self.try_speed_limit(edge)
            .unwrap_or_else(|e| sentinel_with_warning("speed limit", e))
    }

    /// Lane count, or `-1001` for an unknown edge.
    pub fn lane_count(&self, edge: &str) -> i64 {
        self.try_lane_count(edge)
            .map(i64::from)
            .unwrap_or_else(|e| sentinel_with_warning("lane count", e) as i64)
    }

    // ── Network-wide scalars ──────────────────────────────────────────────

    #[inline]
    pub fn max_speed(&self) -> f64 {
        self.summary.max_speed
    }

    #[inline]
    pub fn total_length(&self) -> f64 {
        self.summary.total_length
    }

    #[inline]
    pub fn non_internal_length(&self) -> f64 {
        self.summary.non_internal_length
    }

    pub fn summary(&self) -> NetworkSummary {
        self.summary
    }

    // ── Adjacency ─────────────────────────────────────────────────────────

    /// Lanes a vehicle on `(edge, lane)` can continue onto.
    pub fn successors(&self, edge: &str, lane: LaneIndex) -> &[LaneRef] {
        self.topology.connections().next(edge, lane)
    }

    /// Lanes that feed into `(edge, lane)`.
    pub fn predecessors(&self, edge: &str, lane: LaneIndex) -> &[LaneRef] {
        self.topology.connections().prev(edge, lane)
    }

    // ── Edge sets ─────────────────────────────────────────────────────────

    /// Regular edges, lexicographic.
    pub fn regular_edge_ids(&self) -> &[EdgeId] {
        &self.regular_ids
    }

    /// Internal (junction) edges, lexicographic.
    pub fn junction_edge_ids(&self) -> &[EdgeId] {
        &self.junction_ids
    }

    /// One single-edge route per regular edge, for networks that declare no
    /// routes of their own.
    pub fn default_routes(&self) -> BTreeMap<String, Vec<String>> {
        self.regular_ids
            .iter()
            .map(|id| (id.to_string(), vec![id.to_string()]))
            .collect()
    }

    // ── Raw access ────────────────────────────────────────────────────────

    pub fn edge(&self, id: &str) -> Option<&EdgeRecord> {
        self.topology.edge(id)
    }

    pub fn edge_type(&self, id: &str) -> Option<&EdgeType> {
        self.topology.edge_type(id)
    }

    pub fn topology(&self) -> &Topology {
        &self.topology
    }

    pub fn coordinates(&self) -> &CoordinateTable {
        &self.coords
    }

    pub fn edge_starts(&self) -> &[(EdgeId, f64)] {
        self.coords.regular_starts()
    }

    pub fn internal_edge_starts(&self) -> &[(EdgeId, f64)] {
        self.coords.internal_starts()
    }

    pub fn total_edge_starts(&self) -> &[(EdgeId, f64)] {
        self.coords.total_starts()
    }

    fn record(&self, edge: &str) -> NetResult<&EdgeRecord> {
        self.topology
            .edge(edge)
            .ok_or_else(|| NetError::UnknownEdge(edge.to_string()))
    }
}

fn sentinel_with_warning(what: &str, err: NetError) -> f64 {
    warn!("{what}: {err}; returning {SENTINEL}");
    SENTINEL
}
