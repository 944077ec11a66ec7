use std::fmt;
use std::str::FromStr;

/// Graphviz graph/cluster attributes accepted without a warning.
pub const GRAPH_ATTR_KEYS: &[&str] = &[
    "bgcolor",
    "center",
    "color",
    "compound",
    "concentrate",
    "dpi",
    "fillcolor",
    "fontcolor",
    "fontname",
    "fontsize",
    "label",
    "labeljust",
    "labelloc",
    "margin",
    "newrank",
    "nodesep",
    "ordering",
    "pad",
    "pencolor",
    "penwidth",
    "rankdir",
    "ranksep",
    "ratio",
    "rotate",
    "size",
    "splines",
    "style",
];

pub const NODE_ATTR_KEYS: &[&str] = &[
    "color",
    "fillcolor",
    "fixedsize",
    "fontcolor",
    "fontname",
    "fontsize",
    "height",
    "image",
    "imagescale",
    "label",
    "labelloc",
    "margin",
    "penwidth",
    "peripheries",
    "shape",
    "style",
    "tooltip",
    "width",
];

pub const EDGE_ATTR_KEYS: &[&str] = &[
    "arrowhead",
    "arrowsize",
    "arrowtail",
    "color",
    "constraint",
    "dir",
    "fontcolor",
    "fontname",
    "fontsize",
    "headlabel",
    "label",
    "minlen",
    "penwidth",
    "style",
    "taillabel",
    "weight",
    "xlabel",
];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    TopBottom,
    BottomTop,
    LeftRight,
    RightLeft,
}

impl Direction {
    /// Value of the Graphviz `rankdir` attribute.
    pub fn rankdir(self) -> &'static str {
        match self {
            Direction::TopBottom => "TB",
            Direction::BottomTop => "BT",
            Direction::LeftRight => "LR",
            Direction::RightLeft => "RL",
        }
    }
}

impl FromStr for Direction {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_uppercase().as_str() {
            "TB" | "TD" => Ok(Direction::TopBottom),
            "BT" => Ok(Direction::BottomTop),
            "LR" => Ok(Direction::LeftRight),
            "RL" => Ok(Direction::RightLeft),
            _ => Err(format!("unknown direction `{s}` (expected TB, BT, LR or RL)")),
        }
    }
}

/// What kind of system component a node depicts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Category {
    Client,
    Gateway,
    Compute,
    QueueTopic,
    Database,
    Cache,
    Stream,
    Storage,
    Analytics,
    Monitoring,
}

impl Category {
    pub const ALL: [Category; 10] = [
        Category::Client,
        Category::Gateway,
        Category::Compute,
        Category::QueueTopic,
        Category::Database,
        Category::Cache,
        Category::Stream,
        Category::Storage,
        Category::Analytics,
        Category::Monitoring,
    ];

    pub fn name(self) -> &'static str {
        match self {
            Category::Client => "client",
            Category::Gateway => "gateway",
            Category::Compute => "compute",
            Category::QueueTopic => "queue-topic",
            Category::Database => "database",
            Category::Cache => "cache",
            Category::Stream => "stream",
            Category::Storage => "storage",
            Category::Analytics => "analytics",
            Category::Monitoring => "monitoring",
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(pub usize);

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "n{}", self.0)
    }
}

/// Lets a single node stand wherever a list of source nodes is accepted.
impl IntoIterator for NodeId {
    type Item = NodeId;
    type IntoIter = std::iter::Once<NodeId>;

    fn into_iter(self) -> Self::IntoIter {
        std::iter::once(self)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ClusterId(pub usize);

impl ClusterId {
    pub const ROOT: ClusterId = ClusterId(0);

    pub fn is_root(self) -> bool {
        self == Self::ROOT
    }
}

impl fmt::Display for ClusterId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_root() {
            f.write_str("root")
        } else {
            write!(f, "cluster_{}", self.0)
        }
    }
}

/// Ordered attribute map. Re-setting a key keeps its original position.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Attrs {
    entries: Vec<(String, String)>,
}

impl Attrs {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set(&mut self, key: impl Into<String>, value: impl Into<String>) {
        let key = key.into();
        let value = value.into();
        match self.entries.iter_mut().find(|(k, _)| *k == key) {
            Some(entry) => entry.1 = value,
            None => self.entries.push((key, value)),
        }
    }

    pub fn with(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.set(key, value);
        self
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.entries
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }

    /// Overlay `other` on top of `self`; keys in `other` win.
    pub fn extend_from(&mut self, other: &Attrs) {
        for (k, v) in other.iter() {
            self.set(k, v);
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Keys not present in `known`, in insertion order.
    pub fn unknown_keys(&self, known: &[&str]) -> Vec<&str> {
        self.entries
            .iter()
            .map(|(k, _)| k.as_str())
            .filter(|k| !known.contains(k))
            .collect()
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for Attrs {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut attrs = Attrs::new();
        for (k, v) in iter {
            attrs.set(k, v);
        }
        attrs
    }
}

impl<K: Into<String>, V: Into<String>, const N: usize> From<[(K, V); N]> for Attrs {
    fn from(pairs: [(K, V); N]) -> Self {
        pairs.into_iter().collect()
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Node {
    pub id: NodeId,
    pub label: String,
    pub category: Category,
    pub parent: ClusterId,
    pub attrs: Attrs,
}

/// A cluster member, kept in declaration order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Member {
    Node(NodeId),
    Cluster(ClusterId),
}

#[derive(Debug, Clone, PartialEq)]
pub struct Cluster {
    pub id: ClusterId,
    pub name: String,
    pub parent: Option<ClusterId>,
    pub attrs: Attrs,
    pub members: Vec<Member>,
}

impl Cluster {
    pub fn node_ids(&self) -> impl Iterator<Item = NodeId> + '_ {
        self.members.iter().filter_map(|m| match m {
            Member::Node(id) => Some(*id),
            Member::Cluster(_) => None,
        })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LineStyle {
    Solid,
    Dashed,
    Dotted,
    Bold,
}

impl LineStyle {
    pub fn name(self) -> &'static str {
        match self {
            LineStyle::Solid => "solid",
            LineStyle::Dashed => "dashed",
            LineStyle::Dotted => "dotted",
            LineStyle::Bold => "bold",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum EdgeDirection {
    #[default]
    Forward,
    Reverse,
    Both,
    None,
}

impl EdgeDirection {
    /// Value of the Graphviz `dir` attribute.
    pub fn dir(self) -> &'static str {
        match self {
            EdgeDirection::Forward => "forward",
            EdgeDirection::Reverse => "back",
            EdgeDirection::Both => "both",
            EdgeDirection::None => "none",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct EdgeStyle {
    pub color: Option<String>,
    pub line: Option<LineStyle>,
    pub direction: EdgeDirection,
    pub attrs: Attrs,
}

impl EdgeStyle {
    pub fn colored(color: impl Into<String>) -> Self {
        Self {
            color: Some(color.into()),
            ..Self::default()
        }
    }

    pub fn line(mut self, line: LineStyle) -> Self {
        self.line = Some(line);
        self
    }

    pub fn direction(mut self, direction: EdgeDirection) -> Self {
        self.direction = direction;
        self
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Edge {
    pub from: NodeId,
    pub to: NodeId,
    pub label: Option<String>,
    pub style: EdgeStyle,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Diagram {
    pub title: String,
    pub direction: Direction,
    pub graph_attrs: Attrs,
    pub node_attrs: Attrs,
    pub edge_attrs: Attrs,
    /// Root cluster first.
    pub clusters: Vec<Cluster>,
    pub nodes: Vec<Node>,
    pub edges: Vec<Edge>,
}

impl Diagram {
    pub fn node(&self, id: NodeId) -> Option<&Node> {
        match self.nodes.get(id.0) {
            Some(n) if n.id == id => Some(n),
            _ => self.nodes.iter().find(|n| n.id == id),
        }
    }

    pub fn cluster(&self, id: ClusterId) -> Option<&Cluster> {
        match self.clusters.get(id.0) {
            Some(c) if c.id == id => Some(c),
            _ => self.clusters.iter().find(|c| c.id == id),
        }
    }

    pub fn root(&self) -> Option<&Cluster> {
        self.cluster(ClusterId::ROOT)
    }

    /// Nesting depth of a cluster; the root is depth 0.
    pub fn depth(&self, id: ClusterId) -> usize {
        let mut depth = 0;
        let mut current = self.cluster(id).and_then(|c| c.parent);
        while let Some(parent) = current {
            depth += 1;
            if depth > self.clusters.len() {
                break;
            }
            current = self.cluster(parent).and_then(|c| c.parent);
        }
        depth
    }

    pub fn node_by_label(&self, label: &str) -> Option<&Node> {
        self.nodes.iter().find(|n| n.label == label)
    }

    pub fn cluster_by_name(&self, name: &str) -> Option<&Cluster> {
        self.clusters.iter().find(|c| c.name == name)
    }

    /// Output file name without extension: the title's words joined by `_`, lowercased.
    /// A blank title falls back to `diagram`.
    pub fn file_stem(&self) -> String {
        let words: Vec<&str> = self.title.split_whitespace().collect();
        if words.is_empty() {
            return "diagram".to_string();
        }
        words.join("_").to_lowercase()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn attrs_set_replaces_in_place() {
        let mut attrs = Attrs::from([("pad", "1.0"), ("splines", "ortho")]);
        attrs.set("pad", "2.0");
        let pairs: Vec<_> = attrs.iter().collect();
        assert_eq!(pairs, vec![("pad", "2.0"), ("splines", "ortho")]);
    }

    #[test]
    fn attrs_extend_from_overrides() {
        let mut base = Attrs::from([("color", "black"), ("style", "solid")]);
        base.extend_from(&Attrs::from([("style", "dashed"), ("penwidth", "2.0")]));
        assert_eq!(base.get("color"), Some("black"));
        assert_eq!(base.get("style"), Some("dashed"));
        assert_eq!(base.get("penwidth"), Some("2.0"));
        assert_eq!(base.len(), 3);
    }

    #[test]
    fn attrs_unknown_keys() {
        let attrs = Attrs::from([("pad", "2.0"), ("wobble", "yes")]);
        assert_eq!(attrs.unknown_keys(GRAPH_ATTR_KEYS), vec!["wobble"]);
    }

    #[test]
    fn direction_parses_aliases() {
        assert_eq!("LR".parse::<Direction>().unwrap(), Direction::LeftRight);
        assert_eq!("td".parse::<Direction>().unwrap(), Direction::TopBottom);
        assert_eq!("RL".parse::<Direction>().unwrap().rankdir(), "RL");
        assert!("diagonal".parse::<Direction>().is_err());
    }

    #[test]
    fn category_names_are_distinct() {
        let mut names: Vec<_> = Category::ALL.iter().map(|c| c.name()).collect();
        names.sort();
        names.dedup();
        assert_eq!(names.len(), Category::ALL.len());
    }

    #[test]
    fn single_node_id_iterates_once() {
        let ids: Vec<NodeId> = NodeId(4).into_iter().collect();
        assert_eq!(ids, vec![NodeId(4)]);
    }

    #[test]
    fn id_display() {
        assert_eq!(NodeId(3).to_string(), "n3");
        assert_eq!(ClusterId(2).to_string(), "cluster_2");
        assert_eq!(ClusterId::ROOT.to_string(), "root");
    }
}
