//! Reserved numeric values shared by every consumer of the network.

/// "No valid physical quantity": a vehicle that left the network, an
/// unknown edge, or any other query the network cannot answer.
///
/// Callers must treat it as data-unavailable, never as a real position,
/// length, or speed.
pub const SENTINEL: f64 = -1001.0;

/// Start offset given to every internal edge when no explicit internal
/// ordering is configured.  Places junctions just before the origin of the
/// coordinate line so they never collide with a regular edge.
pub const INTERNAL_EDGE_START: f64 = -1.0;

/// Free-flow speed (m/s) used when neither the edge, its type, nor its
/// lanes declare one.
pub const DEFAULT_SPEED: f64 = 30.0;
