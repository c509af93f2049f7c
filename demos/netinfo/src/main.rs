//! netinfo — load a SUMO network and print what the kernel sees.
//!
//! ```text
//! netinfo [path/to/file.net.xml]
//! ```
//!
//! Without an argument the built-in four-edge ring is used.  Set `RUST_LOG`
//! (default `info`) to see import and retry progress.

mod network;

use std::path::PathBuf;
use std::time::Instant;

use anyhow::{Context, Result};
use log::info;

use flow_core::{LaneIndex, NetworkConfig, RetryPolicy};
use flow_network::{CancelToken, Network};

use network::build_ring;

// ── Constants ─────────────────────────────────────────────────────────────────

const PROBE_COUNT:      usize = 8;
const RETRY_ATTEMPTS:   u32   = 10;
const RETRY_DELAY_SECS: u64   = 1;

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let config = NetworkConfig::new().with_retry(RetryPolicy::new(
        RETRY_ATTEMPTS,
        std::time::Duration::from_secs(RETRY_DELAY_SECS),
    ));

    // 1. Load.
    let t0 = Instant::now();
    let net = match std::env::args_os().nth(1).map(PathBuf::from) {
        Some(path) => Network::load(&path, &config, &CancelToken::new())
            .with_context(|| format!("loading {}", path.display()))?,
        None => {
            info!("no network file given; using the built-in ring");
            Network::new(build_ring()?, &config)?
        }
    };
    info!("network ready in {:.3} s", t0.elapsed().as_secs_f64());

    // 2. Summary.
    println!(
        "Edges: {} regular, {} internal",
        net.regular_edge_ids().len(),
        net.junction_edge_ids().len()
    );
    println!("Length (regular):  {:>10.2} m", net.non_internal_length());
    println!("Length (total):    {:>10.2} m", net.total_length());
    println!("Max speed:         {:>10.2} m/s", net.max_speed());
    println!();

    // 3. Coordinate table.
    println!("{:<20} {:>10} {:>10} {:>8} {:>6}", "Edge", "Start", "Length", "Speed", "Lanes");
    println!("{}", "-".repeat(58));
    for (edge, start) in net.total_edge_starts() {
        let id = edge.as_str();
        println!(
            "{:<20} {:>10.2} {:>10.2} {:>8.2} {:>6}",
            id,
            start,
            net.edge_length(id),
            net.speed_limit(id),
            net.lane_count(id),
        );
    }
    println!();

    // 4. Evenly spaced probes along the regular span.
    if net.non_internal_length() > 0.0 {
        println!("{:<10} {:<20} {:>8} {:>10}", "x", "Edge", "Offset", "Next");
        println!("{}", "-".repeat(52));
        let step = net.non_internal_length() / PROBE_COUNT as f64;
        for i in 0..PROBE_COUNT {
            let x = step * i as f64;
            let (edge, offset) = net.edge_at(x)?;
            let next = net
                .successors(edge.as_str(), LaneIndex(0))
                .first()
                .map(|l| l.to_string())
                .unwrap_or_else(|| "-".to_string());
            println!("{:<10.2} {:<20} {:>8.2} {:>10}", x, edge.as_str(), offset, next);
        }
    }

    Ok(())
}
