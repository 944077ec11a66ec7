use std::collections::{HashMap, HashSet};

use crate::diagram_ast::{ClusterId, Diagram, Member, NodeId};
use crate::error::ValidationError;

/// Check the structural invariants of a diagram, reporting the first violation.
///
/// Diagrams produced by [`crate::builder::DiagramBuilder`] always pass; this
/// guards diagrams edited or assembled by hand before they reach the engine.
pub fn validate(diagram: &Diagram) -> Result<(), ValidationError> {
    match diagram.clusters.first() {
        Some(root) if root.id == ClusterId::ROOT && root.parent.is_none() => {}
        _ => return Err(ValidationError::MissingRoot),
    }

    let mut cluster_ids = HashSet::new();
    for cluster in &diagram.clusters {
        if !cluster_ids.insert(cluster.id) {
            return Err(ValidationError::DuplicateCluster(cluster.id));
        }
    }

    for cluster in &diagram.clusters {
        if cluster.id.is_root() {
            continue;
        }
        match cluster.parent {
            Some(parent) if cluster_ids.contains(&parent) => {}
            Some(parent) => {
                return Err(ValidationError::UnknownParent {
                    cluster: cluster.id,
                    parent,
                });
            }
            // Only the root may be parentless.
            None => return Err(ValidationError::ClusterCycle(cluster.id)),
        }
        check_acyclic(diagram, cluster.id)?;
    }

    let mut nested: HashMap<ClusterId, Vec<ClusterId>> = HashMap::new();
    for cluster in &diagram.clusters {
        for member in &cluster.members {
            if let Member::Cluster(id) = member {
                nested.entry(*id).or_default().push(cluster.id);
            }
        }
    }

    // The root is never a member; every other cluster sits once in its parent.
    for cluster in &diagram.clusters {
        let holders = nested.get(&cluster.id).map(Vec::as_slice).unwrap_or_default();
        let expected = cluster.parent.as_slice();
        if holders != expected {
            return Err(ValidationError::MisplacedCluster {
                cluster: cluster.id,
                count: holders.len(),
                expected: expected.len(),
            });
        }
    }

    let mut node_ids = HashSet::new();
    for node in &diagram.nodes {
        if !node_ids.insert(node.id) {
            return Err(ValidationError::DuplicateNode(node.id));
        }
    }

    let mut listed: HashMap<NodeId, Vec<ClusterId>> = HashMap::new();
    for cluster in &diagram.clusters {
        for member in &cluster.members {
            if let Member::Node(id) = member {
                listed.entry(*id).or_default().push(cluster.id);
            }
        }
    }

    for node in &diagram.nodes {
        if !cluster_ids.contains(&node.parent) {
            return Err(ValidationError::OrphanNode {
                node: node.id,
                cluster: node.parent,
            });
        }
        let holders = listed.get(&node.id).map(Vec::as_slice).unwrap_or_default();
        if holders != [node.parent] {
            return Err(ValidationError::Misplaced {
                node: node.id,
                parent: node.parent,
                count: holders.len(),
            });
        }
    }

    for (index, edge) in diagram.edges.iter().enumerate() {
        for endpoint in [edge.from, edge.to] {
            if !node_ids.contains(&endpoint) {
                return Err(ValidationError::DanglingEdge {
                    index,
                    node: endpoint,
                });
            }
        }
    }

    Ok(())
}

fn check_acyclic(diagram: &Diagram, start: ClusterId) -> Result<(), ValidationError> {
    let mut seen = HashSet::from([start]);
    let mut current = diagram.cluster(start).and_then(|c| c.parent);
    while let Some(id) = current {
        if !seen.insert(id) {
            return Err(ValidationError::ClusterCycle(start));
        }
        current = diagram.cluster(id).and_then(|c| c.parent);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::builder::create_diagram;
    use crate::diagram_ast::*;
    use pretty_assertions::assert_eq;

    fn sample() -> Diagram {
        let mut b = create_diagram("Sample", Direction::LeftRight, Attrs::new());
        let root = b.root();
        let outer = b.open_cluster(root, "Outer", Attrs::new()).unwrap();
        let inner = b.open_cluster(outer, "Inner", Attrs::new()).unwrap();
        let a = b.add_node(outer, "A", Category::Client).unwrap();
        let c = b.add_node(inner, "C", Category::Compute).unwrap();
        b.connect(a, c, Some("go"), EdgeStyle::default()).unwrap();
        b.build()
    }

    #[test]
    fn built_diagram_is_valid() {
        assert_eq!(validate(&sample()), Ok(()));
    }

    #[test]
    fn dangling_edge() {
        let mut d = sample();
        d.edges.push(Edge {
            from: NodeId(0),
            to: NodeId(42),
            label: None,
            style: EdgeStyle::default(),
        });
        assert_eq!(
            validate(&d),
            Err(ValidationError::DanglingEdge {
                index: 1,
                node: NodeId(42)
            })
        );
    }

    #[test]
    fn cluster_cycle() {
        let mut d = sample();
        // Outer (1) now claims Inner (2) as its parent while Inner sits under Outer.
        d.clusters[1].parent = Some(ClusterId(2));
        assert_eq!(validate(&d), Err(ValidationError::ClusterCycle(ClusterId(1))));
    }

    #[test]
    fn self_parent_is_a_cycle() {
        let mut d = sample();
        d.clusters[2].parent = Some(ClusterId(2));
        assert_eq!(validate(&d), Err(ValidationError::ClusterCycle(ClusterId(2))));
    }

    #[test]
    fn duplicate_node_id() {
        let mut d = sample();
        let mut copy = d.nodes[0].clone();
        copy.label = "A again".to_string();
        d.nodes.push(copy);
        assert_eq!(validate(&d), Err(ValidationError::DuplicateNode(NodeId(0))));
    }

    #[test]
    fn node_listed_twice() {
        let mut d = sample();
        d.clusters[0].members.push(Member::Node(NodeId(0)));
        assert_eq!(
            validate(&d),
            Err(ValidationError::Misplaced {
                node: NodeId(0),
                parent: ClusterId(1),
                count: 2
            })
        );
    }

    #[test]
    fn cluster_missing_from_parent_members() {
        let mut d = sample();
        d.clusters[1].members.retain(|m| *m != Member::Cluster(ClusterId(2)));
        assert_eq!(
            validate(&d),
            Err(ValidationError::MisplacedCluster {
                cluster: ClusterId(2),
                count: 0,
                expected: 1
            })
        );
    }

    #[test]
    fn cluster_listed_twice() {
        let mut d = sample();
        d.clusters[0].members.push(Member::Cluster(ClusterId(2)));
        assert_eq!(
            validate(&d),
            Err(ValidationError::MisplacedCluster {
                cluster: ClusterId(2),
                count: 2,
                expected: 1
            })
        );
    }

    #[test]
    fn root_listed_as_member() {
        let mut d = sample();
        d.clusters[2].members.push(Member::Cluster(ClusterId::ROOT));
        assert_eq!(
            validate(&d),
            Err(ValidationError::MisplacedCluster {
                cluster: ClusterId::ROOT,
                count: 1,
                expected: 0
            })
        );
    }

    #[test]
    fn unknown_parent_cluster() {
        let mut d = sample();
        d.clusters[2].parent = Some(ClusterId(7));
        assert_eq!(
            validate(&d),
            Err(ValidationError::UnknownParent {
                cluster: ClusterId(2),
                parent: ClusterId(7)
            })
        );
    }

    #[test]
    fn missing_root() {
        let mut d = sample();
        d.clusters.remove(0);
        assert_eq!(validate(&d), Err(ValidationError::MissingRoot));
    }
}
