//! The trading-system architecture diagrams.
//!
//! Two variants exist side by side. They share styling constants only; each
//! declares its own clusters, nodes and steps.

use std::fmt;
use std::str::FromStr;

use crate::builder::{DiagramBuilder, create_diagram};
use crate::diagram_ast::*;
use crate::error::Result;

pub const TITLE: &str = "Trading System Architecture";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Variant {
    #[default]
    Baseline,
    /// Order processor writes to the database and the data stream at once.
    DualWrite,
}

impl Variant {
    pub const ALL: [Variant; 2] = [Variant::Baseline, Variant::DualWrite];

    pub fn name(self) -> &'static str {
        match self {
            Variant::Baseline => "baseline",
            Variant::DualWrite => "dual-write",
        }
    }
}

impl fmt::Display for Variant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Variant {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        Variant::ALL
            .into_iter()
            .find(|v| v.name() == s)
            .ok_or_else(|| format!("unknown variant `{s}` (expected baseline or dual-write)"))
    }
}

pub fn build(variant: Variant) -> Result<Diagram> {
    match variant {
        Variant::Baseline => baseline(),
        Variant::DualWrite => dual_write(),
    }
}

fn diagram_attrs() -> Attrs {
    Attrs::from([
        ("pad", "2.0"),
        ("splines", "ortho"),
        ("nodesep", "1.5"),
        ("ranksep", "1.8"),
        ("fontsize", "45"),
        ("fontname", "Arial"),
    ])
}

fn cluster_attrs() -> Attrs {
    Attrs::from([
        ("margin", "30"),
        ("fontsize", "13"),
        ("fontname", "Arial"),
        ("style", "rounded"),
        ("penwidth", "2.0"),
    ])
}

fn edge_attrs() -> Attrs {
    Attrs::from([("fontsize", "11"), ("fontname", "Arial"), ("penwidth", "2.0")])
}

fn step(color: &str) -> EdgeStyle {
    EdgeStyle::colored(color)
}

/// Handles shared by both variants' edge declarations.
struct Layers {
    client: NodeId,
    gateway: NodeId,
    ingestion: NodeId,
    queues: Vec<NodeId>,
    services: Vec<NodeId>,
    databases: Vec<NodeId>,
    pipeline: Vec<NodeId>,
    monitoring: Vec<NodeId>,
}

fn declare_layers(b: &mut DiagramBuilder, cluster: &Attrs) -> Result<Layers> {
    let root = b.root();

    let client_layer = b.open_cluster(root, "Client Layer", cluster.clone())?;
    let client = b.add_node(client_layer, "Trading Clients\n(Web/Mobile)", Category::Client)?;

    let api_layer = b.open_cluster(root, "API Layer", cluster.clone())?;
    let gateway = b.add_node(api_layer, "API Gateway", Category::Gateway)?;

    let processing = b.open_cluster(root, "Order Processing", cluster.clone())?;
    let ingestion = b.add_node(processing, "Order Ingestion", Category::Compute)?;
    let queue_cluster = b.open_cluster(processing, "Message Queue", Attrs::new())?;
    let queues = b.add_nodes(
        queue_cluster,
        [
            ("order-requests", Category::QueueTopic),
            ("validated-orders", Category::QueueTopic),
            ("matched-events", Category::QueueTopic),
            ("trade-execution", Category::QueueTopic),
        ],
    )?;

    let engine = b.open_cluster(root, "Trading Engine (EKS)", cluster.clone())?;
    let services_cluster = b.open_cluster(engine, "Trading Services", Attrs::new())?;
    let services = b.add_nodes(
        services_cluster,
        [
            ("Order Processor", Category::Compute),
            ("Matching Engine", Category::Compute),
            ("Market Data", Category::Compute),
        ],
    )?;

    let data = b.open_cluster(root, "Data Storage & Processing", cluster.clone())?;
    let databases = b.add_nodes(
        data,
        [
            ("Orders DB", Category::Database),
            ("Users DB", Category::Database),
            ("Order Cache", Category::Cache),
        ],
    )?;
    let pipeline = b.add_nodes(
        data,
        [
            ("Data Stream", Category::Stream),
            ("Data Lake", Category::Storage),
            ("Analytics", Category::Analytics),
        ],
    )?;

    let observability = b.open_cluster(root, "Observability", cluster.clone())?;
    let monitoring = b.add_nodes(
        observability,
        [
            ("Metrics & Logs", Category::Monitoring),
            ("Tracing", Category::Monitoring),
        ],
    )?;

    Ok(Layers {
        client,
        gateway,
        ingestion,
        queues,
        services,
        databases,
        pipeline,
        monitoring,
    })
}

fn baseline() -> Result<Diagram> {
    let mut b = create_diagram(TITLE, Direction::LeftRight, diagram_attrs());
    b.edge_attrs(edge_attrs());
    let l = declare_layers(&mut b, &cluster_attrs())?;

    // Main flow
    b.connect(l.client, l.gateway, Some("1. Submit Order"), step("blue"))?;
    b.connect(l.gateway, l.ingestion, Some("2. Process"), step("blue"))?;
    b.connect(l.ingestion, l.queues[0], Some("3. Queue"), step("blue"))?;

    // Order processing
    b.connect(l.queues[0], l.services[0], Some("4. Validate"), step("green"))?;
    b.connect(l.services[0], l.databases[0], Some("5. Store"), step("green"))?;
    b.connect(l.services[0], l.databases[2], Some("6. Cache"), step("green"))?;

    // Trading
    b.connect(l.services[0], l.services[1], Some("7. Match"), step("orange"))?;
    b.connect(l.services[1], l.queues[2], Some("8. Execute"), step("orange"))?;

    // Market data
    b.connect(l.queues[2], l.services[2], Some("9. Update"), step("purple"))?;
    b.connect(l.services[2], l.gateway, Some("10. Stream"), step("purple"))?;

    // Data pipeline
    b.connect(l.queues[3], l.pipeline[0], Some("11. Archive"), step("red"))?;
    b.chain(&l.pipeline, EdgeStyle::default())?;

    let watched = [l.gateway, l.ingestion, l.services[0]];
    b.connect(watched, l.monitoring[0], None, EdgeStyle::default())?;
    b.connect(watched, l.monitoring[1], None, EdgeStyle::default())?;

    Ok(b.build())
}

/// Baseline with step 5 split: the processor stores the order and publishes
/// it to the data stream at the same time.
///
/// Only the baseline script survives in full; this variant is reconstructed
/// from that one divergence and changes nothing else.
fn dual_write() -> Result<Diagram> {
    let mut b = create_diagram(TITLE, Direction::LeftRight, diagram_attrs());
    b.edge_attrs(edge_attrs());
    let l = declare_layers(&mut b, &cluster_attrs())?;

    b.connect(l.client, l.gateway, Some("1. Submit Order"), step("blue"))?;
    b.connect(l.gateway, l.ingestion, Some("2. Process"), step("blue"))?;
    b.connect(l.ingestion, l.queues[0], Some("3. Queue"), step("blue"))?;

    b.connect(l.queues[0], l.services[0], Some("4. Validate"), step("green"))?;
    b.connect(l.services[0], l.databases[0], Some("5a. Store"), step("green"))?;
    b.connect(l.services[0], l.pipeline[0], Some("5b. Dual Write"), step("green"))?;
    b.connect(l.services[0], l.databases[2], Some("6. Cache"), step("green"))?;

    b.connect(l.services[0], l.services[1], Some("7. Match"), step("orange"))?;
    b.connect(l.services[1], l.queues[2], Some("8. Execute"), step("orange"))?;

    b.connect(l.queues[2], l.services[2], Some("9. Update"), step("purple"))?;
    b.connect(l.services[2], l.gateway, Some("10. Stream"), step("purple"))?;

    b.connect(l.queues[3], l.pipeline[0], Some("11. Archive"), step("red"))?;
    b.chain(&l.pipeline, EdgeStyle::default())?;

    let watched = [l.gateway, l.ingestion, l.services[0]];
    b.connect(watched, l.monitoring[0], None, EdgeStyle::default())?;
    b.connect(watched, l.monitoring[1], None, EdgeStyle::default())?;

    Ok(b.build())
}
