//! SUMO `.net.xml` importer.
//!
//! # Usage
//!
//! ```ignore
//! use std::path::Path;
//! use flow_network::import::load_net_xml;
//!
//! let topology = load_net_xml(Path::new("ring.net.xml"))?;
//! ```
//!
//! # What is read
//!
//! Only three top-level element kinds matter; everything else (`location`,
//! `junction`, `tlLogic`, `roundabout`, …) is skipped.
//!
//! | Element      | Attributes used                                      |
//! |--------------|------------------------------------------------------|
//! | `type`       | `id`, `speed`, `numLanes`                            |
//! | `edge`       | `id`, `speed`, `type`; `lane` children: `length`, `speed` |
//! | `connection` | `from`, `fromLane`, `via` (regular source) or `to`, `toLane` |
//!
//! A connection leaving a regular edge enters its junction through an
//! internal lane; the real next hop is that lane, named by `via`.  A
//! connection leaving an internal lane already names its destination.
//!
//! # Strictness
//!
//! The export is an external contract.  Missing required attributes and
//! unparseable numbers are [`NetError::Parse`] rather than silent defaults,
//! which also catches documents that are still being written.

use std::path::Path;
use std::str::FromStr;

use log::{debug, warn};
use roxmltree::{Document, Node};

use flow_core::{EdgeId, LaneRef};

use crate::topology::{EdgeSpec, EdgeType, Topology, TopologyBuilder};
use crate::{NetError, NetResult};

// ── Public entry points ───────────────────────────────────────────────────────

/// Read and parse a `.net.xml` file.
///
/// # Errors
///
/// [`NetError::Io`] if the file cannot be read, [`NetError::Parse`] for
/// malformed content, and the validation errors of
/// [`TopologyBuilder::build`].
pub fn load_net_xml(path: &Path) -> NetResult<Topology> {
    let text = std::fs::read_to_string(path)?;
    debug!("read {} bytes from {}", text.len(), path.display());
    parse_net_xml(&text)
}

/// Like [`load_net_xml`] but from an in-memory document.
pub fn parse_net_xml(text: &str) -> NetResult<Topology> {
    let doc = Document::parse(text).map_err(|e| NetError::Parse(e.to_string()))?;

    let root = doc.root_element();
    if root.tag_name().name() != "net" {
        return Err(NetError::Parse(format!(
            "root element is <{}>, expected <net>",
            root.tag_name().name()
        )));
    }

    let mut builder = TopologyBuilder::new();

    for node in children(root, "type") {
        builder.add_type(parse_type(node)?);
    }
    for node in children(root, "edge") {
        builder.add_edge(parse_edge(node)?);
    }
    for node in children(root, "connection") {
        add_connection(&mut builder, node)?;
    }

    builder.build()
}

// ── Element parsers ───────────────────────────────────────────────────────────

fn parse_type(node: Node<'_, '_>) -> NetResult<EdgeType> {
    Ok(EdgeType {
        id:        required(node, "id")?.to_string(),
        speed:     optional(node, "speed")?,
        num_lanes: optional(node, "numLanes")?,
    })
}

fn parse_edge(node: Node<'_, '_>) -> NetResult<EdgeSpec> {
    let id = required(node, "id")?;

    let mut lanes = children(node, "lane");
    let first = lanes
        .next()
        .ok_or_else(|| NetError::Parse(format!("edge {id:?} has no <lane> elements")))?;
    let lane_count = 1 + lanes.count() as u32;

    Ok(EdgeSpec {
        id: id.to_string(),
        length: required_num(first, "length")?,
        lane_count,
        speed: optional(node, "speed")?,
        lane_speed: optional(first, "speed")?,
        edge_type: node.attribute("type").map(str::to_string),
    })
}

fn add_connection(builder: &mut TopologyBuilder, node: Node<'_, '_>) -> NetResult<()> {
    let from = LaneRef::new(required(node, "from")?, required_num(node, "fromLane")?);

    let via = match (&from.edge, node.attribute("via")) {
        (EdgeId::Regular(_), Some(via)) => Some(via),
        _ => None,
    };

    match via {
        Some(via) => {
            let to = LaneRef::from_lane_id(via).map_err(|e| NetError::Parse(e.to_string()))?;
            builder.add_via_connection(from, to);
        }
        None => {
            if !from.edge.is_internal() {
                // Exports compiled without internal links carry no `via`.
                warn!("connection from {from} has no via; using to/toLane");
            }
            let to = LaneRef::new(required(node, "to")?, required_num(node, "toLane")?);
            builder.add_connection(from, to);
        }
    }
    Ok(())
}

// ── Attribute helpers ─────────────────────────────────────────────────────────

fn children<'a, 'input: 'a>(
    node: Node<'a, 'input>,
    tag: &'static str,
) -> impl Iterator<Item = Node<'a, 'input>> {
    node.children()
        .filter(move |n| n.is_element() && n.tag_name().name() == tag)
}

fn required<'a>(node: Node<'a, '_>, attr: &str) -> NetResult<&'a str> {
    node.attribute(attr).ok_or_else(|| {
        NetError::Parse(format!(
            "<{}> at byte {} is missing attribute {attr:?}",
            node.tag_name().name(),
            node.range().start
        ))
    })
}

fn required_num<T: FromStr>(node: Node<'_, '_>, attr: &str) -> NetResult<T> {
    let raw = required(node, attr)?;
    parse_num(node, attr, raw)
}

fn optional<T: FromStr>(node: Node<'_, '_>, attr: &str) -> NetResult<Option<T>> {
    node.attribute(attr)
        .map(|raw| parse_num(node, attr, raw))
        .transpose()
}

fn parse_num<T: FromStr>(node: Node<'_, '_>, attr: &str, raw: &str) -> NetResult<T> {
    raw.trim().parse::<T>().map_err(|_| {
        NetError::Parse(format!(
            "<{}> attribute {attr:?} has unparseable value {raw:?}",
            node.tag_name().name()
        ))
    })
}
