//! Edge/lane/connection graph and its builder.
//!
//! # Sources
//!
//! Networks reach the kernel three ways: procedurally specified graphs and
//! OSM imports (both compiled by `netconvert` into a `.net.xml`), and
//! hand-authored `.net.xml` templates.  Every path ends in a
//! [`TopologyBuilder`]: the XML importer feeds it element by element, and
//! programmatic callers (tests, synthetic networks) feed it directly.
//!
//! # Validation
//!
//! The builder defers every consistency check to [`build`](TopologyBuilder::build)
//! and either returns a complete [`Topology`] or an error.  A failed build
//! leaves nothing behind.

use std::collections::{BTreeMap, HashSet};

use log::debug;

use flow_core::{DEFAULT_SPEED, EdgeId, LaneRef};

use crate::connections::ConnectionIndex;
use crate::{NetError, NetResult};

// ── Records ───────────────────────────────────────────────────────────────────

/// Declared `<type>` defaults.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct EdgeType {
    pub id:        String,
    pub speed:     Option<f64>,
    pub num_lanes: Option<u32>,
}

impl EdgeType {
    pub fn new(id: impl Into<String>) -> Self {
        Self { id: id.into(), speed: None, num_lanes: None }
    }

    pub fn speed(mut self, speed: f64) -> Self {
        self.speed = Some(speed);
        self
    }

    pub fn num_lanes(mut self, n: u32) -> Self {
        self.num_lanes = Some(n);
        self
    }
}

/// One regular or internal edge, with every attribute resolved.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct EdgeRecord {
    pub id:         EdgeId,
    /// Metres, taken from the first lane.
    pub length:     f64,
    /// Free-flow speed limit, m/s.
    pub speed:      f64,
    pub lane_count: u32,
    pub edge_type:  Option<String>,
}

impl EdgeRecord {
    #[inline]
    pub fn is_internal(&self) -> bool {
        self.id.is_internal()
    }
}

/// An edge as declared, before type defaults are applied.
///
/// Speed resolves in order: `speed` → the type's speed → `lane_speed` →
/// [`DEFAULT_SPEED`].
#[derive(Clone, Debug, PartialEq)]
pub struct EdgeSpec {
    pub id:         String,
    pub length:     f64,
    pub lane_count: u32,
    pub speed:      Option<f64>,
    /// Speed carried by the first lane, if any.
    pub lane_speed: Option<f64>,
    pub edge_type:  Option<String>,
}

impl EdgeSpec {
    /// A single-lane edge with no declared speed or type.
    pub fn new(id: impl Into<String>, length: f64) -> Self {
        Self {
            id: id.into(),
            length,
            lane_count: 1,
            speed: None,
            lane_speed: None,
            edge_type: None,
        }
    }

    pub fn lanes(mut self, n: u32) -> Self {
        self.lane_count = n;
        self
    }

    pub fn speed(mut self, speed: f64) -> Self {
        self.speed = Some(speed);
        self
    }

    pub fn lane_speed(mut self, speed: f64) -> Self {
        self.lane_speed = Some(speed);
        self
    }

    pub fn of_type(mut self, type_id: impl Into<String>) -> Self {
        self.edge_type = Some(type_id.into());
        self
    }
}

// ── Topology ──────────────────────────────────────────────────────────────────

/// Frozen edge set plus lane adjacency.
///
/// Edges are keyed by their raw SUMO id and iterate in lexicographic order.
/// Do not construct directly; use [`TopologyBuilder`] or
/// [`crate::import::load_net_xml`].
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Topology {
    edges:       BTreeMap<String, EdgeRecord>,
    types:       BTreeMap<String, EdgeType>,
    connections: ConnectionIndex,
}

impl Topology {
    pub fn edge(&self, id: &str) -> Option<&EdgeRecord> {
        self.edges.get(id)
    }

    pub fn contains_edge(&self, id: &str) -> bool {
        self.edges.contains_key(id)
    }

    /// All edges, regular and internal, in lexicographic id order.
    pub fn edges(&self) -> impl Iterator<Item = &EdgeRecord> + '_ {
        self.edges.values()
    }

    pub fn regular_edges(&self) -> impl Iterator<Item = &EdgeRecord> + '_ {
        self.edges().filter(|e| !e.is_internal())
    }

    pub fn internal_edges(&self) -> impl Iterator<Item = &EdgeRecord> + '_ {
        self.edges().filter(|e| e.is_internal())
    }

    pub fn edge_count(&self) -> usize {
        self.edges.len()
    }

    pub fn is_empty(&self) -> bool {
        self.edges.is_empty()
    }

    pub fn edge_type(&self, id: &str) -> Option<&EdgeType> {
        self.types.get(id)
    }

    pub fn connections(&self) -> &ConnectionIndex {
        &self.connections
    }
}

// ── TopologyBuilder ───────────────────────────────────────────────────────────

/// Collect types, edges, and connections in any order, then call
/// [`build`](Self::build).
///
/// # Example
///
/// ```
/// use flow_core::LaneRef;
/// use flow_network::{EdgeSpec, TopologyBuilder};
///
/// let mut b = TopologyBuilder::new();
/// b.add_edge(EdgeSpec::new("A", 100.0).speed(15.0));
/// b.add_edge(EdgeSpec::new("B", 50.0));
/// b.add_connection(LaneRef::new("A", 0), LaneRef::new("B", 0));
/// let topo = b.build().unwrap();
/// assert_eq!(topo.edge_count(), 2);
/// assert_eq!(topo.edge("B").unwrap().speed, 30.0); // default
/// ```
#[derive(Default)]
pub struct TopologyBuilder {
    types:       Vec<EdgeType>,
    edges:       Vec<EdgeSpec>,
    connections: Vec<PendingConnection>,
}

struct PendingConnection {
    from:         LaneRef,
    to:           LaneRef,
    /// `to` was recovered from a `via` lane id and must name a known edge.
    resolved_via: bool,
}

impl TopologyBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register type defaults.  A later type with the same id replaces the
    /// earlier one.
    pub fn add_type(&mut self, edge_type: EdgeType) {
        self.types.push(edge_type);
    }

    pub fn add_edge(&mut self, spec: EdgeSpec) {
        self.edges.push(spec);
    }

    /// Add a connection whose destination was given directly (`to`/`toLane`).
    pub fn add_connection(&mut self, from: LaneRef, to: LaneRef) {
        self.connections.push(PendingConnection { from, to, resolved_via: false });
    }

    /// Add a connection whose destination is the internal lane named by a
    /// `via` reference.  [`build`](Self::build) fails with
    /// [`NetError::UnresolvedVia`] if that lane's edge does not exist.
    pub fn add_via_connection(&mut self, from: LaneRef, via: LaneRef) {
        self.connections.push(PendingConnection { from, to: via, resolved_via: true });
    }

    pub fn edge_count(&self) -> usize {
        self.edges.len()
    }

    /// Validate and freeze.
    ///
    /// # Errors
    ///
    /// - [`NetError::DuplicateEdge`] if two edges share an id.
    /// - [`NetError::InvalidEdge`] for a negative or non-finite length, a
    ///   non-positive speed, or zero lanes.
    /// - [`NetError::UnresolvedVia`] for a `via` naming an unknown edge.
    pub fn build(self) -> NetResult<Topology> {
        let types: BTreeMap<String, EdgeType> = self
            .types
            .into_iter()
            .map(|t| (t.id.clone(), t))
            .collect();

        let mut seen: HashSet<&str> = HashSet::with_capacity(self.edges.len());
        for spec in &self.edges {
            if !seen.insert(spec.id.as_str()) {
                return Err(NetError::DuplicateEdge(spec.id.clone()));
            }
        }

        let mut edges = BTreeMap::new();
        for spec in self.edges {
            let record = resolve_edge(spec, &types)?;
            edges.insert(record.id.as_str().to_string(), record);
        }

        let mut connections = ConnectionIndex::new();
        for c in self.connections {
            if c.resolved_via && !edges.contains_key(c.to.edge.as_str()) {
                return Err(NetError::UnresolvedVia {
                    from: c.from.edge.to_string(),
                    lane: c.from.lane.0,
                    via:  c.to.to_string(),
                });
            }
            connections.insert(c.from, c.to);
        }

        debug!(
            "topology built: {} edges, {} types, {} connections",
            edges.len(),
            types.len(),
            connections.len()
        );

        Ok(Topology { edges, types, connections })
    }
}

fn resolve_edge(spec: EdgeSpec, types: &BTreeMap<String, EdgeType>) -> NetResult<EdgeRecord> {
    let invalid = |reason: String| NetError::InvalidEdge { id: spec.id.clone(), reason };

    if !spec.length.is_finite() || spec.length < 0.0 {
        return Err(invalid(format!("length {} is not a non-negative number", spec.length)));
    }
    if spec.lane_count == 0 {
        return Err(invalid("edge has no lanes".to_string()));
    }

    let type_speed = spec
        .edge_type
        .as_deref()
        .and_then(|t| types.get(t))
        .and_then(|t| t.speed);
    let speed = spec
        .speed
        .or(type_speed)
        .or(spec.lane_speed)
        .unwrap_or(DEFAULT_SPEED);
    if !speed.is_finite() || speed <= 0.0 {
        return Err(invalid(format!("speed {speed} is not a positive number")));
    }

    Ok(EdgeRecord {
        id:         EdgeId::parse(spec.id),
        length:     spec.length,
        speed,
        lane_count: spec.lane_count,
        edge_type:  spec.edge_type,
    })
}
