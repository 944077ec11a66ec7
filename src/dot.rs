//! Graphviz DOT emission.
//!
//! Output is a pure function of the diagram: identical diagrams produce
//! byte-identical DOT, whatever layout the engine later computes.

use crate::diagram_ast::*;

const GRAPH_DEFAULTS: [(&str, &str); 7] = [
    ("pad", "2.0"),
    ("splines", "ortho"),
    ("nodesep", "0.60"),
    ("ranksep", "0.75"),
    ("fontname", "Sans-Serif"),
    ("fontsize", "15"),
    ("fontcolor", "#2D3436"),
];

const NODE_DEFAULTS: [(&str, &str); 5] = [
    ("shape", "box"),
    ("style", "filled,rounded"),
    ("fontname", "Sans-Serif"),
    ("fontsize", "13"),
    ("fontcolor", "#2D3436"),
];

const EDGE_DEFAULTS: [(&str, &str); 1] = [("color", "#7B8894")];

const CLUSTER_DEFAULTS: [(&str, &str); 5] = [
    ("style", "rounded"),
    ("labeljust", "l"),
    ("pencolor", "#AEB6BE"),
    ("fontname", "Sans-Serif"),
    ("fontsize", "12"),
];

/// Cluster backgrounds, cycled by nesting depth.
const CLUSTER_BGCOLORS: [&str; 4] = ["#E5F5FD", "#EBF3E7", "#ECE8F6", "#FDF7E3"];

impl Category {
    fn dot_shape(self) -> &'static str {
        match self {
            Category::Client => "box3d",
            Category::Gateway => "hexagon",
            Category::Compute => "box",
            Category::QueueTopic => "cds",
            Category::Database => "cylinder",
            Category::Cache => "cylinder",
            Category::Stream => "parallelogram",
            Category::Storage => "folder",
            Category::Analytics => "tab",
            Category::Monitoring => "note",
        }
    }

    fn dot_fill(self) -> &'static str {
        match self {
            Category::Client => "#E8EEF4",
            Category::Gateway => "#F3E1FA",
            Category::Compute => "#FCE3C9",
            Category::QueueTopic => "#E2D9F3",
            Category::Database => "#D6E4F7",
            Category::Cache => "#F9D7D5",
            Category::Stream => "#DCEFD9",
            Category::Storage => "#E4F1D9",
            Category::Analytics => "#E0DBF5",
            Category::Monitoring => "#F9E6D2",
        }
    }
}

pub fn to_dot(diagram: &Diagram) -> String {
    let mut out = String::new();
    out.push_str(&format!("digraph {} {{\n", quote(&diagram.title)));

    let mut graph = Attrs::from(GRAPH_DEFAULTS);
    graph.set("label", diagram.title.as_str());
    graph.set("rankdir", diagram.direction.rankdir());
    graph.extend_from(&diagram.graph_attrs);
    out.push_str(&format!("\tgraph {}\n", attr_list(&graph)));

    let mut node = Attrs::from(NODE_DEFAULTS);
    node.extend_from(&diagram.node_attrs);
    out.push_str(&format!("\tnode {}\n", attr_list(&node)));

    let mut edge = Attrs::from(EDGE_DEFAULTS);
    edge.extend_from(&diagram.edge_attrs);
    out.push_str(&format!("\tedge {}\n", attr_list(&edge)));

    if let Some(root) = diagram.root() {
        write_members(&mut out, diagram, root, 1);
    }

    for edge in &diagram.edges {
        write_edge(&mut out, edge);
    }

    out.push_str("}\n");
    out
}

fn write_members(out: &mut String, diagram: &Diagram, cluster: &Cluster, depth: usize) {
    // A hand-built diagram may loop; never nest deeper than there are clusters.
    if depth > diagram.clusters.len() {
        return;
    }
    for member in &cluster.members {
        match *member {
            Member::Node(id) => {
                if let Some(node) = diagram.node(id) {
                    write_node(out, node, depth);
                }
            }
            Member::Cluster(id) => {
                if let Some(child) = diagram.cluster(id) {
                    write_cluster(out, diagram, child, depth);
                }
            }
        }
    }
}

fn write_cluster(out: &mut String, diagram: &Diagram, cluster: &Cluster, depth: usize) {
    let indent = "\t".repeat(depth);
    let mut attrs = Attrs::from(CLUSTER_DEFAULTS);
    attrs.set("label", cluster.name.as_str());
    attrs.set(
        "bgcolor",
        CLUSTER_BGCOLORS[(depth - 1) % CLUSTER_BGCOLORS.len()],
    );
    attrs.extend_from(&cluster.attrs);

    out.push_str(&format!("{indent}subgraph cluster_{} {{\n", cluster.id.0));
    out.push_str(&format!("{indent}\tgraph {}\n", attr_list(&attrs)));
    write_members(out, diagram, cluster, depth + 1);
    out.push_str(&format!("{indent}}}\n"));
}

fn write_node(out: &mut String, node: &Node, depth: usize) {
    let mut attrs = Attrs::new();
    attrs.set("label", node.label.as_str());
    attrs.set("shape", node.category.dot_shape());
    attrs.set("fillcolor", node.category.dot_fill());
    attrs.extend_from(&node.attrs);
    out.push_str(&format!(
        "{}{} {}\n",
        "\t".repeat(depth),
        node.id,
        attr_list(&attrs)
    ));
}

fn write_edge(out: &mut String, edge: &Edge) {
    let mut attrs = Attrs::new();
    if let Some(label) = &edge.label {
        attrs.set("label", label.as_str());
    }
    if let Some(color) = &edge.style.color {
        attrs.set("color", color.as_str());
    }
    if let Some(line) = edge.style.line {
        attrs.set("style", line.name());
    }
    if edge.style.direction != EdgeDirection::Forward {
        attrs.set("dir", edge.style.direction.dir());
    }
    attrs.extend_from(&edge.style.attrs);

    if attrs.is_empty() {
        out.push_str(&format!("\t{} -> {}\n", edge.from, edge.to));
    } else {
        out.push_str(&format!(
            "\t{} -> {} {}\n",
            edge.from,
            edge.to,
            attr_list(&attrs)
        ));
    }
}

fn attr_list(attrs: &Attrs) -> String {
    let items: Vec<String> = attrs
        .iter()
        .map(|(k, v)| format!("{k}={}", quote(v)))
        .collect();
    format!("[{}]", items.join(" "))
}

fn quote(s: &str) -> String {
    format!("\"{}\"", escape_dot(s))
}

/// Escape text for a double-quoted DOT string.
pub fn escape_dot(s: &str) -> String {
    s.replace('\\', "\\\\")
        .replace('"', "\\\"")
        .replace("\r\n", "\\n")
        .replace('\n', "\\n")
}
