//! Lane-level adjacency.
//!
//! Every connection `(from lane → to lane)` is recorded twice: once under
//! `next[from.edge][from.lane]` and once under `prev[to.edge][to.lane]`.
//! Both maps are filled by the same [`insert`](ConnectionIndex::insert)
//! call, so the forward and backward views can never disagree.

use std::collections::{BTreeMap, HashMap};

use flow_core::{LaneIndex, LaneRef};

type LaneMap = HashMap<String, BTreeMap<LaneIndex, Vec<LaneRef>>>;

/// Bidirectional lane adjacency.  Read-only once the topology is frozen.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct ConnectionIndex {
    next:  LaneMap,
    prev:  LaneMap,
    count: usize,
}

impl ConnectionIndex {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record one directed connection in both directions.
    pub(crate) fn insert(&mut self, from: LaneRef, to: LaneRef) {
        self.prev
            .entry(to.edge.as_str().to_string())
            .or_default()
            .entry(to.lane)
            .or_default()
            .push(from.clone());
        self.next
            .entry(from.edge.as_str().to_string())
            .or_default()
            .entry(from.lane)
            .or_default()
            .push(to);
        self.count += 1;
    }

    /// Lanes reachable directly from `(edge, lane)`, in document order.
    ///
    /// Empty when nothing was recorded, which is normal at network boundaries or when
    /// the simulator applies its default connectivity.
    pub fn next(&self, edge: &str, lane: LaneIndex) -> &[LaneRef] {
        Self::lookup(&self.next, edge, lane)
    }

    /// Lanes that lead directly into `(edge, lane)`.
    pub fn prev(&self, edge: &str, lane: LaneIndex) -> &[LaneRef] {
        Self::lookup(&self.prev, edge, lane)
    }

    /// Number of connections inserted (each counted once).
    pub fn len(&self) -> usize {
        self.count
    }

    pub fn is_empty(&self) -> bool {
        self.count == 0
    }

    /// Every recorded `(from, to)` pair, grouped by source edge and lane.
    pub fn iter(&self) -> impl Iterator<Item = (LaneRef, &LaneRef)> + '_ {
        self.next.iter().flat_map(|(edge, lanes)| {
            lanes.iter().flat_map(move |(&lane, targets)| {
                targets
                    .iter()
                    .map(move |to| (LaneRef::new(edge.as_str(), lane.0), to))
            })
        })
    }

    fn lookup<'a>(map: &'a LaneMap, edge: &str, lane: LaneIndex) -> &'a [LaneRef] {
        map.get(edge)
            .and_then(|lanes| lanes.get(&lane))
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }
}
