//! Per-sweep snapshot output.
//!
//! Sinks are invoked by the driver after every sweep. They are diagnostic
//! only: a failing sink is logged and skipped, and the run continues.

use std::collections::HashSet;
use std::fs::{self, File};
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};
use std::sync::Arc;

use serde::Serialize;

use crate::classification::Classification;
use crate::error::SnapshotError;
use crate::estimate::{argmax, Estimate};
use crate::graph::{CategoricalAttribute, Graph, NodeId};
use crate::inference::RunId;

/// What a sink sees after one sweep.
#[derive(Debug, Clone, Copy)]
pub struct Snapshot<'a> {
    /// Run that produced the snapshot.
    pub run_id: RunId,
    /// Zero-based sweep index.
    pub iteration: usize,
    /// Strategy name.
    pub method: &'a str,
    /// Nodes under inference, in visiting order.
    pub unknowns: &'a [NodeId],
    /// Current working estimate.
    pub estimate: &'a Estimate,
    /// Ground truth, if the caller supplied it.
    pub truth: Option<&'a Classification>,
}

/// Destination for per-sweep snapshots.
pub trait SnapshotSink {
    /// Name used in log messages.
    fn name(&self) -> &str;

    /// Writes one snapshot.
    ///
    /// # Errors
    ///
    /// Returns `SnapshotError` on I/O or serialization failure.
    fn write_snapshot(&mut self, snapshot: &Snapshot<'_>) -> Result<(), SnapshotError>;
}

enum Target {
    Directory { dir: PathBuf, prefix: String },
    Writer(Box<dyn Write>),
}

impl Target {
    fn open(&mut self, iteration: usize, extension: &str) -> Result<Box<dyn Write + '_>, SnapshotError> {
        match self {
            Self::Directory { dir, prefix } => {
                fs::create_dir_all(&*dir)?;
                let path = dir.join(format!("{prefix}-{iteration:04}.{extension}"));
                Ok(Box::new(BufWriter::new(File::create(path)?)))
            }
            Self::Writer(w) => Ok(Box::new(w.as_mut())),
        }
    }

    const fn is_stream(&self) -> bool {
        matches!(self, Self::Writer(_))
    }
}

impl std::fmt::Debug for Target {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Directory { dir, prefix } => f
                .debug_struct("Directory")
                .field("dir", dir)
                .field("prefix", prefix)
                .finish(),
            Self::Writer(_) => f.write_str("Writer"),
        }
    }
}

fn node_label(graph: Option<&Graph>, node: NodeId) -> String {
    graph
        .and_then(|g| g.name(node))
        .map_or_else(|| node.to_string(), str::to_string)
}

/// Line-oriented prediction writer.
///
/// One tab-separated line per evaluated node:
/// `name <TAB> truth <TAB> score_0 <TAB> ... score_{K-1}`, where `truth` is
/// the true value name or `?`. In directory mode each sweep goes to
/// `<prefix>-<iteration>.predict`; in stream mode sweeps are separated by a
/// `# run <id> iteration <n>` header line.
#[derive(Debug)]
pub struct PredictionWriter {
    target: Target,
    graph: Option<Arc<Graph>>,
}

impl PredictionWriter {
    /// Writes one file per sweep into `dir`.
    pub fn to_directory(dir: impl AsRef<Path>, prefix: impl Into<String>) -> Self {
        Self {
            target: Target::Directory {
                dir: dir.as_ref().to_path_buf(),
                prefix: prefix.into(),
            },
            graph: None,
        }
    }

    /// Writes every sweep into one stream.
    pub fn to_writer(writer: impl Write + 'static) -> Self {
        Self {
            target: Target::Writer(Box::new(writer)),
            graph: None,
        }
    }

    /// Uses node names from `graph` instead of raw ids.
    #[must_use]
    pub fn with_graph(mut self, graph: Arc<Graph>) -> Self {
        self.graph = Some(graph);
        self
    }
}

impl SnapshotSink for PredictionWriter {
    fn name(&self) -> &str {
        "predictions"
    }

    fn write_snapshot(&mut self, snapshot: &Snapshot<'_>) -> Result<(), SnapshotError> {
        let attribute = snapshot.estimate.attribute();
        let graph = self.graph.as_deref();
        let stream = self.target.is_stream();
        let mut out = self.target.open(snapshot.iteration, "predict")?;
        if stream {
            writeln!(out, "# run {} iteration {}", snapshot.run_id, snapshot.iteration)?;
        }
        for &node in snapshot.unknowns {
            let Some(scores) = snapshot.estimate.get(node) else {
                continue;
            };
            let truth = snapshot
                .truth
                .and_then(|t| t.get(node))
                .and_then(|c| attribute.value_name(c))
                .unwrap_or("?");
            write!(out, "{}\t{truth}", node_label(graph, node))?;
            for score in scores {
                write!(out, "\t{score}")?;
            }
            writeln!(out)?;
        }
        out.flush()?;
        Ok(())
    }
}

#[derive(Serialize)]
struct GraphExport<'a> {
    version: &'static str,
    run_id: RunId,
    iteration: usize,
    method: &'a str,
    attribute: &'a CategoricalAttribute,
    nodes: Vec<ExportNode<'a>>,
    edges: Vec<ExportEdge>,
}

#[derive(Serialize)]
struct ExportNode<'a> {
    id: NodeId,
    name: String,
    unknown: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    predicted: Option<usize>,
    #[serde(skip_serializing_if = "Option::is_none")]
    truth: Option<usize>,
    #[serde(skip_serializing_if = "Option::is_none")]
    scores: Option<&'a [f64]>,
}

#[derive(Serialize)]
struct ExportEdge {
    source: NodeId,
    target: NodeId,
    weight: f64,
}

/// Whole-graph JSON export for external visualization.
///
/// Each snapshot is one JSON document holding every node (with predicted
/// class, truth and scores where known) and every edge. In directory mode
/// each sweep goes to `<prefix>-<iteration>.json`; in stream mode documents
/// are written one per line.
#[derive(Debug)]
pub struct GraphExportSink {
    target: Target,
    graph: Arc<Graph>,
}

impl GraphExportSink {
    /// Writes one file per sweep into `dir`.
    pub fn to_directory(graph: Arc<Graph>, dir: impl AsRef<Path>, prefix: impl Into<String>) -> Self {
        Self {
            target: Target::Directory {
                dir: dir.as_ref().to_path_buf(),
                prefix: prefix.into(),
            },
            graph,
        }
    }

    /// Writes one JSON line per sweep into a stream.
    pub fn to_writer(graph: Arc<Graph>, writer: impl Write + 'static) -> Self {
        Self {
            target: Target::Writer(Box::new(writer)),
            graph,
        }
    }
}

impl SnapshotSink for GraphExportSink {
    fn name(&self) -> &str {
        "graph_export"
    }

    fn write_snapshot(&mut self, snapshot: &Snapshot<'_>) -> Result<(), SnapshotError> {
        let unknown: HashSet<NodeId> = snapshot.unknowns.iter().copied().collect();
        let graph = Arc::clone(&self.graph);
        let nodes = graph
            .nodes()
            .map(|id| {
                let scores = snapshot.estimate.get(id);
                ExportNode {
                    id,
                    name: node_label(Some(&*graph), id),
                    unknown: unknown.contains(&id),
                    predicted: scores.and_then(argmax),
                    truth: snapshot.truth.and_then(|t| t.get(id)),
                    scores,
                }
            })
            .collect();
        let edges = graph
            .nodes()
            .flat_map(|a| {
                graph
                    .neighbors(a)
                    .iter()
                    .filter(move |n| a <= n.node)
                    .map(move |n| ExportEdge {
                        source: a,
                        target: n.node,
                        weight: n.weight,
                    })
            })
            .collect();

        let doc = GraphExport {
            version: env!("CARGO_PKG_VERSION"),
            run_id: snapshot.run_id,
            iteration: snapshot.iteration,
            method: snapshot.method,
            attribute: snapshot.estimate.attribute(),
            nodes,
            edges,
        };

        let mut out = self.target.open(snapshot.iteration, "json")?;
        serde_json::to_writer(&mut out, &doc)?;
        writeln!(out)?;
        out.flush()?;
        Ok(())
    }
}
