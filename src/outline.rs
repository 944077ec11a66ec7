//! Plain-text preview of a diagram: the cluster tree followed by the edge list.

use crate::diagram_ast::*;
use crate::display_width::{display_width, pad_to, single_line};

pub fn render(diagram: &Diagram) -> String {
    let mut lines = vec![format!(
        "{} ({})",
        diagram.title,
        diagram.direction.rankdir()
    )];

    if let Some(root) = diagram.root() {
        write_children(&mut lines, diagram, root, "", 0);
    }

    if !diagram.edges.is_empty() {
        lines.push(String::new());
        lines.push(format!("Edges ({})", diagram.edges.len()));
        write_edges(&mut lines, diagram);
    }

    lines
        .iter()
        .map(|line| line.trim_end())
        .collect::<Vec<_>>()
        .join("\n")
}

fn node_label(diagram: &Diagram, id: NodeId) -> String {
    diagram
        .node(id)
        .map(|n| single_line(&n.label))
        .unwrap_or_else(|| id.to_string())
}

fn write_children(
    lines: &mut Vec<String>,
    diagram: &Diagram,
    cluster: &Cluster,
    prefix: &str,
    depth: usize,
) {
    if depth > diagram.clusters.len() {
        return;
    }

    let label_width = cluster
        .node_ids()
        .map(|id| display_width(&node_label(diagram, id)))
        .max()
        .unwrap_or(0);

    let count = cluster.members.len();
    for (i, member) in cluster.members.iter().enumerate() {
        let last = i + 1 == count;
        let connector = if last { "└── " } else { "├── " };
        match *member {
            Member::Node(id) => {
                let category = diagram
                    .node(id)
                    .map(|n| n.category.name())
                    .unwrap_or("?");
                lines.push(format!(
                    "{prefix}{connector}{}  [{category}]",
                    pad_to(&node_label(diagram, id), label_width)
                ));
            }
            Member::Cluster(id) => {
                let Some(child) = diagram.cluster(id) else {
                    continue;
                };
                lines.push(format!("{prefix}{connector}{}", single_line(&child.name)));
                let child_prefix = format!("{prefix}{}", if last { "    " } else { "│   " });
                write_children(lines, diagram, child, &child_prefix, depth + 1);
            }
        }
    }
}

fn arrow(direction: EdgeDirection) -> &'static str {
    match direction {
        EdgeDirection::Forward => "──>",
        EdgeDirection::Reverse => "<──",
        EdgeDirection::Both => "<─>",
        EdgeDirection::None => "───",
    }
}

fn write_edges(lines: &mut Vec<String>, diagram: &Diagram) {
    let index_width = diagram.edges.len().to_string().len();
    let source_width = diagram
        .edges
        .iter()
        .map(|e| display_width(&node_label(diagram, e.from)))
        .max()
        .unwrap_or(0);

    for (i, edge) in diagram.edges.iter().enumerate() {
        let mut line = format!(
            "  {:>index_width$}. {} {} {}",
            i + 1,
            pad_to(&node_label(diagram, edge.from), source_width),
            arrow(edge.style.direction),
            node_label(diagram, edge.to),
        );
        if let Some(label) = &edge.label {
            line.push_str(&format!("  \"{}\"", single_line(label)));
        }
        if let Some(color) = &edge.style.color {
            line.push_str(&format!(" ({color})"));
        }
        lines.push(line);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::builder::create_diagram;
    use pretty_assertions::assert_eq;

    #[test]
    fn outline_tree_and_edges() {
        let mut b = create_diagram("Shop", Direction::LeftRight, Attrs::new());
        let root = b.root();
        let front = b.open_cluster(root, "Front", Attrs::new()).unwrap();
        let client = b.add_node(front, "Web\nClient", Category::Client).unwrap();
        let gw = b.add_node(front, "API", Category::Gateway).unwrap();
        let back = b.open_cluster(root, "Back", Attrs::new()).unwrap();
        let inner = b.open_cluster(back, "Queues", Attrs::new()).unwrap();
        let q = b.add_node(inner, "orders", Category::QueueTopic).unwrap();
        b.connect(client, gw, Some("1. Submit"), EdgeStyle::colored("blue"))
            .unwrap();
        b.connect(gw, q, None, EdgeStyle::default().direction(EdgeDirection::Both))
            .unwrap();

        let expected = "\
Shop (LR)
├── Front
│   ├── Web Client  [client]
│   └── API         [gateway]
└── Back
    └── Queues
        └── orders  [queue-topic]

Edges (2)
  1. Web Client ──> API  \"1. Submit\" (blue)
  2. API        <─> orders";
        assert_eq!(render(&b.build()), expected);
    }

    #[test]
    fn outline_empty_diagram() {
        let d = create_diagram("Nothing", Direction::TopBottom, Attrs::new()).build();
        assert_eq!(render(&d), "Nothing (TB)");
    }

    #[test]
    fn outline_aligns_wide_labels() {
        let mut b = create_diagram("W", Direction::LeftRight, Attrs::new());
        let root = b.root();
        b.add_node(root, "注文", Category::Database).unwrap();
        b.add_node(root, "abcde", Category::Cache).unwrap();
        let output = render(&b.build());
        let lines: Vec<&str> = output.lines().collect();
        assert_eq!(lines[1], "├── 注文   [database]");
        assert_eq!(lines[2], "└── abcde  [cache]");
    }
}
