//! Incremental construction of a [`Diagram`].
//!
//! Every call names its parent explicitly; there is no ambient "current
//! cluster". Handles returned here stay valid for the lifetime of the builder
//! and of the diagram it produces.

use log::{debug, warn};

use crate::diagram_ast::*;
use crate::error::{Error, Result};

#[derive(Debug, Clone)]
pub struct DiagramBuilder {
    diagram: Diagram,
}

/// Start a new empty diagram holding only the root cluster.
///
/// Keys in `graph_attrs` that Graphviz does not know are kept but reported,
/// since the engine ignores them.
pub fn create_diagram(
    title: impl Into<String>,
    direction: Direction,
    graph_attrs: Attrs,
) -> DiagramBuilder {
    let title = title.into();
    warn_unknown("graph", &graph_attrs, GRAPH_ATTR_KEYS);
    debug!("creating diagram `{title}` ({})", direction.rankdir());

    DiagramBuilder {
        diagram: Diagram {
            title,
            direction,
            graph_attrs,
            node_attrs: Attrs::new(),
            edge_attrs: Attrs::new(),
            clusters: vec![Cluster {
                id: ClusterId::ROOT,
                name: String::new(),
                parent: None,
                attrs: Attrs::new(),
                members: Vec::new(),
            }],
            nodes: Vec::new(),
            edges: Vec::new(),
        },
    }
}

/// Log every key of `attrs` missing from `known` and return those keys.
fn warn_unknown(scope: &str, attrs: &Attrs, known: &[&str]) -> Vec<String> {
    attrs
        .unknown_keys(known)
        .into_iter()
        .map(|key| {
            warn!("unrecognized {scope} attribute `{key}` will be passed through to the engine");
            key.to_string()
        })
        .collect()
}

/// Overrides applied to a finished diagram, e.g. from the command line.
///
/// Each call merges `attrs` over the current defaults (later keys win) and
/// returns the keys Graphviz does not recognize, after logging them.
impl Diagram {
    pub fn override_graph_attrs(&mut self, attrs: &Attrs) -> Vec<String> {
        let unknown = warn_unknown("graph", attrs, GRAPH_ATTR_KEYS);
        self.graph_attrs.extend_from(attrs);
        unknown
    }

    pub fn override_node_attrs(&mut self, attrs: &Attrs) -> Vec<String> {
        let unknown = warn_unknown("node", attrs, NODE_ATTR_KEYS);
        self.node_attrs.extend_from(attrs);
        unknown
    }

    pub fn override_edge_attrs(&mut self, attrs: &Attrs) -> Vec<String> {
        let unknown = warn_unknown("edge", attrs, EDGE_ATTR_KEYS);
        self.edge_attrs.extend_from(attrs);
        unknown
    }
}

impl DiagramBuilder {
    pub fn root(&self) -> ClusterId {
        ClusterId::ROOT
    }

    /// Default attributes applied to every node.
    pub fn node_attrs(&mut self, attrs: Attrs) -> &mut Self {
        warn_unknown("node", &attrs, NODE_ATTR_KEYS);
        self.diagram.node_attrs.extend_from(&attrs);
        self
    }

    /// Default attributes applied to every edge.
    pub fn edge_attrs(&mut self, attrs: Attrs) -> &mut Self {
        warn_unknown("edge", &attrs, EDGE_ATTR_KEYS);
        self.diagram.edge_attrs.extend_from(&attrs);
        self
    }

    pub fn open_cluster(
        &mut self,
        parent: ClusterId,
        name: impl Into<String>,
        attrs: Attrs,
    ) -> Result<ClusterId> {
        self.check_cluster(parent)?;
        warn_unknown("cluster", &attrs, GRAPH_ATTR_KEYS);

        let id = ClusterId(self.diagram.clusters.len());
        let name = name.into();
        debug!("opening cluster {id} `{name}` under {parent}");
        self.diagram.clusters.push(Cluster {
            id,
            name,
            parent: Some(parent),
            attrs,
            members: Vec::new(),
        });
        self.diagram.clusters[parent.0]
            .members
            .push(Member::Cluster(id));
        Ok(id)
    }

    pub fn add_node(
        &mut self,
        cluster: ClusterId,
        label: impl Into<String>,
        category: Category,
    ) -> Result<NodeId> {
        self.check_cluster(cluster)?;

        let id = NodeId(self.diagram.nodes.len());
        let label = label.into();
        debug!("adding {category} node {id} `{label}` to {cluster}");
        self.diagram.nodes.push(Node {
            id,
            label,
            category,
            parent: cluster,
            attrs: Attrs::new(),
        });
        self.diagram.clusters[cluster.0].members.push(Member::Node(id));
        Ok(id)
    }

    /// Add several nodes to one cluster, returning their ids in order.
    pub fn add_nodes<L: Into<String>>(
        &mut self,
        cluster: ClusterId,
        nodes: impl IntoIterator<Item = (L, Category)>,
    ) -> Result<Vec<NodeId>> {
        nodes
            .into_iter()
            .map(|(label, category)| self.add_node(cluster, label, category))
            .collect()
    }

    /// Extra attributes on an existing node, on top of its category styling.
    pub fn style_node(&mut self, node: NodeId, attrs: Attrs) -> Result<()> {
        warn_unknown("node", &attrs, NODE_ATTR_KEYS);
        let entry = self
            .diagram
            .nodes
            .get_mut(node.0)
            .ok_or(Error::UnknownNode(node))?;
        entry.attrs.extend_from(&attrs);
        Ok(())
    }

    /// One edge from each source to `target`, all sharing `label` and `style`.
    ///
    /// Nothing is appended unless every endpoint exists.
    pub fn connect(
        &mut self,
        sources: impl IntoIterator<Item = NodeId>,
        target: NodeId,
        label: Option<&str>,
        style: EdgeStyle,
    ) -> Result<()> {
        self.check_node(target)?;
        let sources: Vec<NodeId> = sources.into_iter().collect();
        for &source in &sources {
            self.check_node(source)?;
        }
        warn_unknown("edge", &style.attrs, EDGE_ATTR_KEYS);

        for source in sources {
            debug!(
                "connecting {source} -> {target}{}",
                label.map(|l| format!(" `{l}`")).unwrap_or_default()
            );
            self.diagram.edges.push(Edge {
                from: source,
                to: target,
                label: label.map(str::to_string),
                style: style.clone(),
            });
        }
        Ok(())
    }

    /// Unlabeled edges along `nodes`: `a -> b -> c`.
    pub fn chain(&mut self, nodes: &[NodeId], style: EdgeStyle) -> Result<()> {
        for &node in nodes {
            self.check_node(node)?;
        }
        for pair in nodes.windows(2) {
            self.connect(pair[0], pair[1], None, style.clone())?;
        }
        Ok(())
    }

    pub fn diagram(&self) -> &Diagram {
        &self.diagram
    }

    pub fn build(self) -> Diagram {
        self.diagram
    }

    fn check_cluster(&self, id: ClusterId) -> Result<()> {
        if id.0 < self.diagram.clusters.len() {
            Ok(())
        } else {
            Err(Error::UnknownCluster(id))
        }
    }

    fn check_node(&self, id: NodeId) -> Result<()> {
        if id.0 < self.diagram.nodes.len() {
            Ok(())
        } else {
            Err(Error::UnknownNode(id))
        }
    }
}
