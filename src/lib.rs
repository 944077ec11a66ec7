pub mod attr_parser;
pub mod builder;
pub mod diagram_ast;
pub mod display_width;
pub mod dot;
pub mod error;
pub mod outline;
pub mod render;
pub mod trading;
pub mod validate;

pub use builder::{DiagramBuilder, create_diagram};
pub use diagram_ast::{
    Attrs, Category, Cluster, ClusterId, Diagram, Direction, Edge, EdgeDirection, EdgeStyle,
    LineStyle, Member, Node, NodeId,
};
pub use error::{Error, RenderError, Result, ValidationError};
pub use render::{OutputFormat, RenderOptions};
pub use trading::Variant;

/// Build a trading diagram and return its validated DOT source.
pub fn dot_source(variant: Variant) -> Result<String> {
    let diagram = trading::build(variant)?;
    validate::validate(&diagram)?;
    Ok(dot::to_dot(&diagram))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn dot_source_for_every_variant() {
        for variant in Variant::ALL {
            let dot = dot_source(variant).unwrap();
            assert!(dot.starts_with("digraph \"Trading System Architecture\" {"), "got: {dot}");
            assert!(dot.contains("rankdir=\"LR\""));
            assert!(dot.trim_end().ends_with('}'));
        }
    }

    #[test]
    fn dot_source_uses_script_styling() {
        let dot = dot_source(Variant::Baseline).unwrap();
        assert!(dot.contains("nodesep=\"1.5\""), "diagram attrs override defaults");
        assert!(dot.contains("fontname=\"Arial\""));
        assert!(dot.contains("label=\"Trading Clients\\n(Web/Mobile)\""));
    }

    #[test]
    fn variants_differ() {
        assert_ne!(
            dot_source(Variant::Baseline).unwrap(),
            dot_source(Variant::DualWrite).unwrap()
        );
    }
}
