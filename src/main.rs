use std::path::PathBuf;

use clap::Parser;

use archgraph::render::{RenderOptions, render_to_dir};
use archgraph::{Attrs, Direction, OutputFormat, Variant, dot, outline, trading, validate};

#[derive(Parser)]
#[command(
    name = "archgraph",
    about = "Render the trading system architecture diagram through Graphviz"
)]
struct Cli {
    /// Diagram variant (baseline, dual-write)
    #[arg(long, default_value = "baseline")]
    variant: Variant,

    /// Output format; repeat for several files (png, jpg, svg, pdf, dot)
    #[arg(long = "format", short = 'f', default_value = "png")]
    formats: Vec<OutputFormat>,

    /// Directory the output files are written to
    #[arg(long, short = 'o', default_value = ".")]
    output_dir: PathBuf,

    /// Layout engine binary
    #[arg(long, default_value = "dot")]
    engine: String,

    /// Override the layout direction (TB, BT, LR, RL)
    #[arg(long)]
    direction: Option<Direction>,

    /// Extra graph attributes, e.g. `splines=spline,nodesep=1.0`
    #[arg(long)]
    graph_attr: Option<Attrs>,

    /// Extra default node attributes
    #[arg(long)]
    node_attr: Option<Attrs>,

    /// Extra default edge attributes
    #[arg(long)]
    edge_attr: Option<Attrs>,

    /// Print the DOT source instead of rendering
    #[arg(long, conflicts_with = "outline")]
    print_dot: bool,

    /// Print a text outline of the diagram instead of rendering
    #[arg(long)]
    outline: bool,
}

fn main() {
    env_logger::init();
    let cli = Cli::parse();

    if let Err(e) = run(cli) {
        eprintln!("ERROR: {e}");
        std::process::exit(1);
    }
}

fn run(cli: Cli) -> archgraph::Result<()> {
    let mut diagram = trading::build(cli.variant)?;
    if let Some(direction) = cli.direction {
        diagram.direction = direction;
    }
    if let Some(attrs) = &cli.graph_attr {
        diagram.override_graph_attrs(attrs);
    }
    if let Some(attrs) = &cli.node_attr {
        diagram.override_node_attrs(attrs);
    }
    if let Some(attrs) = &cli.edge_attr {
        diagram.override_edge_attrs(attrs);
    }
    validate::validate(&diagram)?;

    if cli.print_dot {
        print!("{}", dot::to_dot(&diagram));
        return Ok(());
    }
    if cli.outline {
        println!("{}", outline::render(&diagram));
        return Ok(());
    }

    for format in cli.formats {
        let options = RenderOptions {
            engine: cli.engine.clone(),
            format,
        };
        let path = render_to_dir(&diagram, &cli.output_dir, &options)?;
        println!("{}", path.display());
    }
    Ok(())
}
