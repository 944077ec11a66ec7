//! Hands a diagram to the external layout engine.
//!
//! Layout and rasterization belong to the engine (Graphviz `dot` by default);
//! this module only feeds it DOT on stdin and reports what went wrong.

use std::io::{ErrorKind, Write};
use std::path::{Path, PathBuf};
use std::process::{Command, Stdio};
use std::str::FromStr;

use log::{debug, info};

use crate::diagram_ast::Diagram;
use crate::dot::to_dot;
use crate::error::RenderError;
use crate::validate::validate;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    Png,
    Jpg,
    Svg,
    Pdf,
    /// DOT source, written without running the engine.
    Dot,
}

impl OutputFormat {
    pub fn extension(self) -> &'static str {
        match self {
            OutputFormat::Png => "png",
            OutputFormat::Jpg => "jpg",
            OutputFormat::Svg => "svg",
            OutputFormat::Pdf => "pdf",
            OutputFormat::Dot => "dot",
        }
    }
}

impl FromStr for OutputFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "png" => Ok(OutputFormat::Png),
            "jpg" | "jpeg" => Ok(OutputFormat::Jpg),
            "svg" => Ok(OutputFormat::Svg),
            "pdf" => Ok(OutputFormat::Pdf),
            "dot" | "gv" => Ok(OutputFormat::Dot),
            _ => Err(format!(
                "unsupported output format `{s}` (expected png, jpg, svg, pdf or dot)"
            )),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderOptions {
    /// Engine binary, looked up on `PATH` unless it is a path.
    pub engine: String,
    pub format: OutputFormat,
}

impl Default for RenderOptions {
    fn default() -> Self {
        Self {
            engine: "dot".to_string(),
            format: OutputFormat::Png,
        }
    }
}

/// Render into `dir`, naming the file after the diagram title.
pub fn render_to_dir(
    diagram: &Diagram,
    dir: &Path,
    options: &RenderOptions,
) -> Result<PathBuf, RenderError> {
    let path = dir.join(format!(
        "{}.{}",
        diagram.file_stem(),
        options.format.extension()
    ));
    render(diagram, &path, options)
}

/// Validate, emit DOT, and write `output_path` through the engine.
///
/// Output is staged in a temporary file next to `output_path` and only moved
/// into place once the engine succeeds, so a failed render neither leaves a
/// partial file nor touches one that was already there.
pub fn render(
    diagram: &Diagram,
    output_path: &Path,
    options: &RenderOptions,
) -> Result<PathBuf, RenderError> {
    validate(diagram)?;
    let source = to_dot(diagram);
    let write_error = |source| RenderError::Write {
        path: output_path.to_path_buf(),
        source,
    };

    let dir = match output_path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };
    let mut staged = tempfile::Builder::new()
        .prefix(".archgraph-")
        .suffix(&format!(".{}", options.format.extension()))
        .tempfile_in(dir)
        .map_err(write_error)?;
    debug!("staging output in {}", staged.path().display());

    match options.format {
        OutputFormat::Dot => staged
            .as_file_mut()
            .write_all(source.as_bytes())
            .map_err(write_error)?,
        format => run_engine(&source, staged.path(), &options.engine, format)?,
    }

    staged
        .persist(output_path)
        .map_err(|e| write_error(e.error))?;
    info!("wrote {}", output_path.display());
    Ok(output_path.to_path_buf())
}

fn run_engine(
    source: &str,
    output_path: &Path,
    engine: &str,
    format: OutputFormat,
) -> Result<(), RenderError> {
    info!(
        "running `{engine} -T{}` for {}",
        format.extension(),
        output_path.display()
    );
    let mut child = Command::new(engine)
        .arg(format!("-T{}", format.extension()))
        .arg("-o")
        .arg(output_path)
        .stdin(Stdio::piped())
        .stdout(Stdio::null())
        .stderr(Stdio::piped())
        .spawn()
        .map_err(|source| RenderError::EngineUnavailable {
            engine: engine.to_string(),
            source,
        })?;

    if let Some(mut stdin) = child.stdin.take() {
        // The engine may exit early (e.g. unwritable output) and close its end.
        match stdin.write_all(source.as_bytes()) {
            Ok(()) => {}
            Err(e) if e.kind() == ErrorKind::BrokenPipe => {
                debug!("engine closed stdin early");
            }
            Err(e) => {
                let _ = child.kill();
                let _ = child.wait();
                return Err(RenderError::Write {
                    path: output_path.to_path_buf(),
                    source: e,
                });
            }
        }
    }

    let output = child
        .wait_with_output()
        .map_err(|source| RenderError::Write {
            path: output_path.to_path_buf(),
            source,
        })?;

    if !output.status.success() {
        return Err(RenderError::EngineFailed {
            engine: engine.to_string(),
            status: output.status.to_string(),
            stderr: String::from_utf8_lossy(&output.stderr).trim().to_string(),
        });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::builder::create_diagram;
    use crate::diagram_ast::*;
    use crate::error::ValidationError;
    use pretty_assertions::assert_eq;

    fn tiny() -> Diagram {
        let mut b = create_diagram("Tiny Diagram", Direction::LeftRight, Attrs::new());
        let root = b.root();
        let a = b.add_node(root, "A", Category::Client).unwrap();
        let g = b.add_node(root, "B", Category::Gateway).unwrap();
        b.connect(a, g, Some("submit"), EdgeStyle::default()).unwrap();
        b.build()
    }

    #[test]
    fn format_from_str() {
        assert_eq!("PNG".parse::<OutputFormat>().unwrap(), OutputFormat::Png);
        assert_eq!("jpeg".parse::<OutputFormat>().unwrap(), OutputFormat::Jpg);
        assert_eq!("gv".parse::<OutputFormat>().unwrap(), OutputFormat::Dot);
        assert!("bmp".parse::<OutputFormat>().is_err());
    }

    #[test]
    fn default_options_use_dot_png() {
        let options = RenderOptions::default();
        assert_eq!(options.engine, "dot");
        assert_eq!(options.format, OutputFormat::Png);
    }

    #[test]
    fn dot_format_skips_engine() {
        let dir = tempfile::tempdir().unwrap();
        let options = RenderOptions {
            engine: "definitely-not-an-engine".to_string(),
            format: OutputFormat::Dot,
        };
        let path = render_to_dir(&tiny(), dir.path(), &options).unwrap();
        assert_eq!(path, dir.path().join("tiny_diagram.dot"));
        let written = std::fs::read_to_string(&path).unwrap();
        assert_eq!(written, to_dot(&tiny()));
    }

    #[test]
    fn missing_engine_is_unavailable() {
        let dir = tempfile::tempdir().unwrap();
        let options = RenderOptions {
            engine: "archgraph-no-such-engine".to_string(),
            format: OutputFormat::Png,
        };
        let err = render_to_dir(&tiny(), dir.path(), &options).unwrap_err();
        assert!(matches!(err, RenderError::EngineUnavailable { .. }), "got: {err}");
        assert!(!dir.path().join("tiny_diagram.png").exists());
    }

    #[test]
    fn invalid_diagram_is_rejected_before_engine() {
        let mut d = tiny();
        d.edges[0].to = NodeId(99);
        let dir = tempfile::tempdir().unwrap();
        let err = render_to_dir(&d, dir.path(), &RenderOptions::default()).unwrap_err();
        assert!(
            matches!(
                err,
                RenderError::InvalidDiagram(ValidationError::DanglingEdge { .. })
            ),
            "got: {err}"
        );
    }

    #[test]
    fn unwritable_dot_path_is_write_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("missing").join("out.dot");
        let options = RenderOptions {
            format: OutputFormat::Dot,
            ..RenderOptions::default()
        };
        let err = render(&tiny(), &path, &options).unwrap_err();
        assert!(matches!(err, RenderError::Write { .. }), "got: {err}");
    }
}
