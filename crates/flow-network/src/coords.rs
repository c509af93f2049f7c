//! Global linear coordinates.
//!
//! # Layout
//!
//! Every edge is given a *start* on one shared number line.  With the default
//! ordering, regular edges are laid end to end in lexicographic id order:
//!
//! ```text
//!  A (100 m)        B (50 m)   C (80 m)
//! |----------------|--------|-------------|
//! 0               100      150           230
//! ```
//!
//! Internal edges sit at `-1` unless the network supplies its own starts.
//!
//! `total_starts` holds regular entries followed by internal entries,
//! stable-sorted by start.  On equal starts the later entry wins a position
//! lookup, so an internal placeholder shadows a regular edge it ties with.

use std::collections::{HashMap, HashSet};

use log::{debug, warn};

use flow_core::{EdgeId, INTERNAL_EDGE_START, NetworkConfig};

use crate::topology::Topology;
use crate::{NetError, NetResult};

// ── CoordinateTable ───────────────────────────────────────────────────────────

/// Frozen edge-start table.  Built once by [`CoordinateBuilder`].
#[derive(Clone, Debug, Default, PartialEq)]
pub struct CoordinateTable {
    regular:        Vec<(EdgeId, f64)>,
    internal:       Vec<(EdgeId, f64)>,
    /// `regular ++ internal`, stable-sorted ascending by start.
    total:          Vec<(EdgeId, f64)>,
    total_index:    HashMap<String, f64>,
    internal_index: HashMap<String, f64>,
}

impl CoordinateTable {
    /// Regular-edge starts, in the order they were assigned.
    pub fn regular_starts(&self) -> &[(EdgeId, f64)] {
        &self.regular
    }

    pub fn internal_starts(&self) -> &[(EdgeId, f64)] {
        &self.internal
    }

    /// All starts sorted ascending; the table position lookups search.
    pub fn total_starts(&self) -> &[(EdgeId, f64)] {
        &self.total
    }

    /// Start of any tracked edge.
    #[inline]
    pub fn start(&self, edge: &str) -> Option<f64> {
        self.total_index.get(edge).copied()
    }

    /// Start of an edge listed among the internal starts.
    #[inline]
    pub fn internal_start(&self, edge: &str) -> Option<f64> {
        self.internal_index.get(edge).copied()
    }

    /// Lowest start on the line, `None` for an empty table.
    pub fn min_start(&self) -> Option<f64> {
        self.total.first().map(|&(_, s)| s)
    }

    pub fn len(&self) -> usize {
        self.total.len()
    }

    pub fn is_empty(&self) -> bool {
        self.total.is_empty()
    }

    /// The edge covering global position `x`, and `x`'s offset into it.
    ///
    /// Picks the last entry of `total_starts` whose start is `<= x`.
    ///
    /// # Errors
    ///
    /// [`NetError::EmptyNetwork`] on an empty table;
    /// [`NetError::PositionOutOfRange`] when `x` is NaN or below the lowest
    /// start.
    pub fn edge_at(&self, x: f64) -> NetResult<(&EdgeId, f64)> {
        if self.total.is_empty() {
            return Err(NetError::EmptyNetwork);
        }
        if x.is_nan() {
            return Err(NetError::PositionOutOfRange(x));
        }
        let covering = self.total.partition_point(|&(_, start)| start <= x);
        if covering == 0 {
            return Err(NetError::PositionOutOfRange(x));
        }
        let (edge, start) = &self.total[covering - 1];
        Ok((edge, x - start))
    }
}

// ── CoordinateBuilder ─────────────────────────────────────────────────────────

/// Collects edge lengths and optional explicit orderings, then produces a
/// [`CoordinateTable`].  Discarded after [`build`](Self::build).
#[derive(Default)]
pub struct CoordinateBuilder {
    regular:         Vec<(String, f64)>,
    internal:        Vec<String>,
    edge_starts:     Option<Vec<(String, f64)>>,
    internal_starts: Option<Vec<(String, f64)>>,
}

impl CoordinateBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed the builder with every edge of `topology` and the explicit
    /// orderings from `config`.
    pub fn from_topology(topology: &Topology, config: &NetworkConfig) -> Self {
        let mut b = Self::new();
        for edge in topology.edges() {
            match &edge.id {
                EdgeId::Regular(id) => b.add_regular(id.clone(), edge.length),
                EdgeId::Internal(id) => b.add_internal(id.clone()),
            }
        }
        if let Some(starts) = &config.edge_starts {
            b = b.edge_starts(starts.clone());
        }
        if let Some(starts) = &config.internal_edge_starts {
            b = b.internal_edge_starts(starts.clone());
        }
        b
    }

    pub fn add_regular(&mut self, id: impl Into<String>, length: f64) {
        self.regular.push((id.into(), length));
    }

    pub fn add_internal(&mut self, id: impl Into<String>) {
        self.internal.push(id.into());
    }

    /// Use these regular-edge starts as given instead of concatenating.
    ///
    /// Overlaps and layouts shorter than the edges they hold are logged at
    /// `warn` by [`build`](Self::build), not rejected.
    pub fn edge_starts(mut self, starts: Vec<(String, f64)>) -> Self {
        self.edge_starts = Some(starts);
        self
    }

    pub fn internal_edge_starts(mut self, starts: Vec<(String, f64)>) -> Self {
        self.internal_starts = Some(starts);
        self
    }

    /// Assign starts and freeze.
    pub fn build(self) -> CoordinateTable {
        let regular: Vec<(EdgeId, f64)> = match self.edge_starts {
            Some(explicit) => {
                for issue in check_explicit(&explicit, &self.regular) {
                    warn!("{issue}");
                }
                explicit
                    .into_iter()
                    .map(|(id, start)| (EdgeId::parse(id), start))
                    .collect()
            }
            None => concatenate(self.regular),
        };

        let internal: Vec<(EdgeId, f64)> = match self.internal_starts {
            Some(explicit) => explicit
                .into_iter()
                .map(|(id, start)| (EdgeId::parse(id), start))
                .collect(),
            None => self
                .internal
                .into_iter()
                .map(|id| (EdgeId::parse(id), INTERNAL_EDGE_START))
                .collect(),
        };

        let mut total: Vec<(EdgeId, f64)> =
            regular.iter().chain(internal.iter()).cloned().collect();
        // Stable: ties keep regular-before-internal insertion order.
        total.sort_by(|a, b| a.1.total_cmp(&b.1));

        let total_index = total
            .iter()
            .map(|(id, start)| (id.as_str().to_string(), *start))
            .collect();
        let internal_index = internal
            .iter()
            .map(|(id, start)| (id.as_str().to_string(), *start))
            .collect();

        debug!(
            "coordinate table: {} regular, {} internal starts",
            regular.len(),
            internal.len()
        );

        CoordinateTable { regular, internal, total, total_index, internal_index }
    }
}

/// Lexicographic order, each start the running sum of the lengths before it.
fn concatenate(mut edges: Vec<(String, f64)>) -> Vec<(EdgeId, f64)> {
    edges.sort_by(|a, b| a.0.cmp(&b.0));
    let mut running = 0.0;
    edges
        .into_iter()
        .map(|(id, length)| {
            let start = running;
            running += length;
            (EdgeId::parse(id), start)
        })
        .collect()
}

/// Tolerance for comparing summed lengths against laid-out spans.
const LAYOUT_EPSILON: f64 = 1e-6;

/// Something in an explicit regular ordering that position lookups cannot
/// get right.  Reported at `warn`, never rejected.
#[derive(Clone, Debug, PartialEq)]
pub(crate) enum LayoutIssue {
    /// Listed id that is not a regular edge of the network.
    UnknownEdge(String),
    /// Regular edges the ordering leaves out, sorted.
    Missing(Vec<String>),
    /// `second` starts before `first` ends.
    Overlap { first: String, second: String, by: f64 },
    /// The listed edges are laid out over less than their summed length.
    ShortSpan { span: f64, total: f64 },
}

impl std::fmt::Display for LayoutIssue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            LayoutIssue::UnknownEdge(id) => {
                write!(f, "edge_starts names {id:?}, which is not a regular edge of this network")
            }
            LayoutIssue::Missing(ids) => write!(
                f,
                "edge_starts omits {} regular edge(s), which cannot be located by position: {ids:?}",
                ids.len()
            ),
            LayoutIssue::Overlap { first, second, by } => {
                write!(f, "edge_starts: {second:?} overlaps the end of {first:?} by {by:.3} m")
            }
            LayoutIssue::ShortSpan { span, total } => write!(
                f,
                "edge_starts span {span:.3} m but the listed edges are {total:.3} m long"
            ),
        }
    }
}

/// Compare an explicit ordering against the imported regular edges: ids
/// must line up, and the listed intervals must fit end to end.
pub(crate) fn check_explicit(
    explicit: &[(String, f64)],
    regular: &[(String, f64)],
) -> Vec<LayoutIssue> {
    let lengths: HashMap<&str, f64> =
        regular.iter().map(|(id, len)| (id.as_str(), *len)).collect();
    let listed: HashSet<&str> = explicit.iter().map(|(id, _)| id.as_str()).collect();
    let mut issues = Vec::new();

    for (id, _) in explicit {
        if !lengths.contains_key(id.as_str()) && !EdgeId::is_internal_id(id) {
            issues.push(LayoutIssue::UnknownEdge(id.clone()));
        }
    }
    let mut missing: Vec<String> = lengths
        .keys()
        .filter(|id| !listed.contains(*id))
        .map(|id| id.to_string())
        .collect();
    if !missing.is_empty() {
        missing.sort();
        issues.push(LayoutIssue::Missing(missing));
    }

    // Intervals of the listed edges whose length is known.
    let mut intervals: Vec<(&str, f64, f64)> = explicit
        .iter()
        .filter_map(|(id, start)| {
            lengths.get(id.as_str()).map(|len| (id.as_str(), *start, start + len))
        })
        .collect();
    if intervals.is_empty() {
        return issues;
    }
    intervals.sort_by(|a, b| a.1.total_cmp(&b.1));

    for pair in intervals.windows(2) {
        let ((first, _, end), (second, start, _)) = (pair[0], pair[1]);
        if end - start > LAYOUT_EPSILON {
            issues.push(LayoutIssue::Overlap {
                first:  first.to_string(),
                second: second.to_string(),
                by:     end - start,
            });
        }
    }

    let total: f64 = intervals.iter().map(|(_, start, end)| end - start).sum();
    let lowest = intervals[0].1;
    let highest = intervals.iter().map(|(_, _, end)| *end).fold(f64::NEG_INFINITY, f64::max);
    let span = highest - lowest;
    if total - span > LAYOUT_EPSILON {
        issues.push(LayoutIssue::ShortSpan { span, total });
    }

    issues
}
