//! Edge and lane identities.
//!
//! SUMO names every edge with a string.  Edges generated inside junctions
//! carry the reserved `:` prefix; everything else is a regular, authored
//! edge.  [`EdgeId`] makes that split a type-level fact so the rest of the
//! framework matches on the variant instead of inspecting strings.
//!
//! Lanes are addressed by a small integer index (0 = rightmost lane), wrapped
//! in [`LaneIndex`] so it cannot be confused with other counts.

use std::fmt;

use crate::{CoreError, CoreResult};

/// Index of a lane within its edge.  0 is the rightmost lane.
#[derive(Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct LaneIndex(pub u32);

impl fmt::Display for LaneIndex {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

// ── EdgeId ────────────────────────────────────────────────────────────────────

/// Identity of a directed edge, tagged by kind.
///
/// The wrapped string is always the full SUMO id, marker included, so
/// `EdgeId::parse(id.as_str()) == id` for every value.
#[derive(Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum EdgeId {
    /// An authored road segment.
    Regular(String),
    /// A junction-traversal segment generated by the simulator.
    Internal(String),
}

impl EdgeId {
    /// Leading character SUMO reserves for internal edges.
    pub const INTERNAL_MARKER: char = ':';

    /// Classify a raw SUMO edge id.
    pub fn parse(raw: impl Into<String>) -> EdgeId {
        let raw = raw.into();
        if Self::is_internal_id(&raw) {
            EdgeId::Internal(raw)
        } else {
            EdgeId::Regular(raw)
        }
    }

    /// Classification without allocating, for lookups keyed by `&str`.
    #[inline]
    pub fn is_internal_id(raw: &str) -> bool {
        raw.starts_with(Self::INTERNAL_MARKER)
    }

    /// `&str` form of [`coarser`](Self::coarser).
    pub fn coarser_id(raw: &str) -> Option<&str> {
        if !Self::is_internal_id(raw) {
            return None;
        }
        raw.rsplit_once('_').map(|(head, _)| head)
    }

    pub fn as_str(&self) -> &str {
        match self {
            EdgeId::Regular(id) | EdgeId::Internal(id) => id,
        }
    }

    #[inline]
    pub fn is_internal(&self) -> bool {
        matches!(self, EdgeId::Internal(_))
    }

    /// The coarser junction id obtained by dropping the last `_`-separated
    /// segment, e.g. `:center_3` → `:center`.
    ///
    /// Older networks track one entry per junction rather than one per
    /// junction lane.  Returns `None` for regular edges and for internal ids
    /// without an underscore.
    pub fn coarser(&self) -> Option<EdgeId> {
        Self::coarser_id(self.as_str()).map(|head| EdgeId::Internal(head.to_string()))
    }
}

impl fmt::Display for EdgeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl From<&str> for EdgeId {
    fn from(raw: &str) -> Self {
        EdgeId::parse(raw)
    }
}

impl From<String> for EdgeId {
    fn from(raw: String) -> Self {
        EdgeId::parse(raw)
    }
}

// ── LaneRef ───────────────────────────────────────────────────────────────────

/// One lane of one edge: the unit the connection graph is built from.
#[derive(Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct LaneRef {
    pub edge: EdgeId,
    pub lane: LaneIndex,
}

impl LaneRef {
    pub fn new(edge: impl Into<EdgeId>, lane: u32) -> Self {
        Self { edge: edge.into(), lane: LaneIndex(lane) }
    }

    /// Split a SUMO lane id (`<edge>_<index>`) at its last underscore.
    ///
    /// ```
    /// use flow_core::{EdgeId, LaneRef};
    ///
    /// let lane = LaneRef::from_lane_id(":center_2_0").unwrap();
    /// assert_eq!(lane.edge, EdgeId::Internal(":center_2".into()));
    /// assert_eq!(lane.lane.0, 0);
    /// ```
    pub fn from_lane_id(lane_id: &str) -> CoreResult<Self> {
        let (edge, index) = lane_id
            .rsplit_once('_')
            .filter(|(edge, _)| !edge.is_empty())
            .ok_or_else(|| CoreError::InvalidLaneId(lane_id.to_string()))?;
        let index = index
            .parse::<u32>()
            .map_err(|_| CoreError::InvalidLaneId(lane_id.to_string()))?;
        Ok(Self::new(edge, index))
    }
}

impl fmt::Display for LaneRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}_{}", self.edge, self.lane)
    }
}

impl<E: Into<EdgeId>> From<(E, u32)> for LaneRef {
    fn from((edge, lane): (E, u32)) -> Self {
        LaneRef::new(edge, lane)
    }
}
