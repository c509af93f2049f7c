//! Network construction configuration.
//!
//! # Design
//!
//! Everything the kernel needs from the outside world, besides the exported
//! `.net.xml` itself, is collected here:
//!
//! - an optional explicit ordering of regular edges on the global coordinate
//!   line (`edge_starts`),
//! - an optional explicit ordering of internal (junction) edges
//!   (`internal_edge_starts`),
//! - the retry policy used while the external simulator is still flushing
//!   the export to disk.
//!
//! Network definitions that care about placement (rings, figure-eights, …)
//! supply their own starts; everything else takes the defaults.

use std::collections::HashSet;
use std::time::Duration;

use crate::{CoreError, CoreResult};

// ── RetryPolicy ───────────────────────────────────────────────────────────────

/// Bounded, fixed-delay retry schedule for reading the topology export.
///
/// Worst-case total wait is `attempts × delay`.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct RetryPolicy {
    /// Total number of import attempts, including the first.  Default: 10.
    pub attempts: u32,

    /// Wait between two attempts, in milliseconds.  Default: 1000.
    pub delay_ms: u64,
}

impl RetryPolicy {
    pub const DEFAULT_ATTEMPTS: u32 = 10;
    pub const DEFAULT_DELAY_MS: u64 = 1_000;

    /// Delays beyond `u64::MAX` milliseconds saturate.
    pub fn new(attempts: u32, delay: Duration) -> Self {
        let delay_ms = u64::try_from(delay.as_millis()).unwrap_or(u64::MAX);
        Self { attempts, delay_ms }
    }

    /// A single attempt, no waiting.  Useful for exports known to be complete
    /// (hand-authored templates) and for tests.
    pub fn once() -> Self {
        Self { attempts: 1, delay_ms: 0 }
    }

    #[inline]
    pub fn delay(&self) -> Duration {
        Duration::from_millis(self.delay_ms)
    }

    /// Upper bound on the time spent sleeping across all attempts.
    /// Saturates at `Duration::MAX`.
    pub fn max_wait(&self) -> Duration {
        self.delay().saturating_mul(self.attempts)
    }
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            attempts: Self::DEFAULT_ATTEMPTS,
            delay_ms: Self::DEFAULT_DELAY_MS,
        }
    }
}

// ── NetworkConfig ─────────────────────────────────────────────────────────────

/// Inputs to network construction supplied by the network definition.
///
/// Typically built in code by a network definition, or loaded from a
/// TOML/JSON file by the application crate with the `serde` feature.
#[derive(Clone, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct NetworkConfig {
    /// Explicit `(edge id, start)` pairs for regular edges.  `None` lets the
    /// coordinate builder concatenate edges in lexicographic order.
    ///
    /// The caller is responsible for keeping the intervals disjoint.
    pub edge_starts: Option<Vec<(String, f64)>>,

    /// Explicit `(edge id, start)` pairs for internal edges.  `None` places
    /// every internal edge at [`INTERNAL_EDGE_START`](crate::INTERNAL_EDGE_START).
    pub internal_edge_starts: Option<Vec<(String, f64)>>,

    /// How to wait for an export that is still being written.
    pub retry: RetryPolicy,
}

impl NetworkConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_edge_starts<S: Into<String>>(
        mut self,
        starts: impl IntoIterator<Item = (S, f64)>,
    ) -> Self {
        self.edge_starts = Some(starts.into_iter().map(|(id, s)| (id.into(), s)).collect());
        self
    }

    pub fn with_internal_edge_starts<S: Into<String>>(
        mut self,
        starts: impl IntoIterator<Item = (S, f64)>,
    ) -> Self {
        self.internal_edge_starts =
            Some(starts.into_iter().map(|(id, s)| (id.into(), s)).collect());
        self
    }

    pub fn with_retry(mut self, retry: RetryPolicy) -> Self {
        self.retry = retry;
        self
    }

    /// Reject configurations that can never produce a usable network.
    ///
    /// Overlapping explicit intervals are *not* detected here; they need edge
    /// lengths, which only exist after import.
    pub fn validate(&self) -> CoreResult<()> {
        if self.retry.attempts == 0 {
            return Err(CoreError::Config(
                "retry.attempts must be at least 1".to_string(),
            ));
        }
        for (what, starts) in [
            ("edge_starts", &self.edge_starts),
            ("internal_edge_starts", &self.internal_edge_starts),
        ] {
            let Some(starts) = starts else { continue };
            let mut seen = HashSet::with_capacity(starts.len());
            for (id, start) in starts {
                if !start.is_finite() {
                    return Err(CoreError::Config(format!(
                        "{what}: start of {id:?} is not finite ({start})"
                    )));
                }
                if !seen.insert(id.as_str()) {
                    return Err(CoreError::Config(format!("{what}: {id:?} listed twice")));
                }
            }
        }
        Ok(())
    }
}
