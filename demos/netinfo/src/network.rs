//! Built-in ring network, used when no `.net.xml` is given.
//!
//! Four 57.5 m quarter-circle edges joined at four junctions, each with one
//! internal lane.  Same shape as the classic 230 m single-lane ring.

use flow_core::LaneRef;
use flow_network::{EdgeSpec, EdgeType, Topology, TopologyBuilder};

const QUARTER_LENGTH: f64 = 57.5;
const JUNCTION_LENGTH: f64 = 0.1;

pub fn build_ring() -> flow_network::NetResult<Topology> {
    let mut b = TopologyBuilder::new();
    b.add_type(EdgeType::new("ring").speed(30.0).num_lanes(1));

    let quarters = ["bottom", "right", "top", "left"];
    for (i, edge) in quarters.iter().enumerate() {
        let next = quarters[(i + 1) % quarters.len()];
        let junction = format!(":{next}_0");

        b.add_edge(EdgeSpec::new(*edge, QUARTER_LENGTH).of_type("ring"));
        b.add_edge(EdgeSpec::new(junction.as_str(), JUNCTION_LENGTH).lane_speed(30.0));

        b.add_via_connection(LaneRef::new(*edge, 0), LaneRef::new(junction.as_str(), 0));
        b.add_connection(LaneRef::new(junction.as_str(), 0), LaneRef::new(next, 0));
    }

    b.build()
}
