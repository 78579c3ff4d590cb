//! Relation-graph rendering.
//!
//! This lives in the CLI crate on purpose: the graph library's `{nodes,
//! edges}` value is the hand-off contract, and everything here is replaceable
//! tooling on the consumer side of that contract.
//!
//! Output formats:
//! - JSON (for custom frontends)
//! - Graphviz DOT (external layout tooling)
//! - standalone SVG (offline snapshot using the projector's layout grid)

use anyhow::{anyhow, Result};
use holocron_graph::RelationGraph;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GraphFormat {
    Json,
    Dot,
    Svg,
}

impl GraphFormat {
    pub fn parse(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "json" => Ok(Self::Json),
            "dot" => Ok(Self::Dot),
            "svg" => Ok(Self::Svg),
            other => Err(anyhow!("unknown graph format `{other}` (expected json|dot|svg)")),
        }
    }
}

pub fn render(graph: &RelationGraph, format: GraphFormat) -> Result<String> {
    match format {
        GraphFormat::Json => Ok(serde_json::to_string_pretty(graph)?),
        GraphFormat::Dot => Ok(to_dot(graph)),
        GraphFormat::Svg => Ok(to_svg(graph)),
    }
}

// ============================================================================
// DOT
// ============================================================================

fn dot_escape(s: &str) -> String {
    s.replace('\\', "\\\\").replace('"', "\\\"")
}

fn to_dot(graph: &RelationGraph) -> String {
    let mut out = String::new();
    out.push_str("digraph holocron {\n");
    out.push_str("  rankdir=TB;\n");
    out.push_str("  node [shape=box, fontname=\"Helvetica\"];\n\n");

    for node in &graph.nodes {
        out.push_str(&format!(
            "  \"{}\" [label=\"{}\"];\n",
            dot_escape(&node.id),
            dot_escape(&node.label)
        ));
    }
    out.push('\n');
    for edge in &graph.edges {
        out.push_str(&format!(
            "  \"{}\" -> \"{}\";\n",
            dot_escape(&edge.source),
            dot_escape(&edge.target)
        ));
    }
    out.push_str("}\n");
    out
}

// ============================================================================
// SVG
// ============================================================================

const NODE_W: f32 = 150.0;
const NODE_H: f32 = 36.0;
const MARGIN: f32 = 40.0;

fn xml_escape(s: &str) -> String {
    s.replace('&', "&amp;").replace('<', "&lt;").replace('>', "&gt;")
}

fn to_svg(graph: &RelationGraph) -> String {
    let max_x = graph.nodes.iter().map(|n| n.x).fold(0.0_f32, f32::max);
    let max_y = graph.nodes.iter().map(|n| n.y).fold(0.0_f32, f32::max);
    let width = max_x + NODE_W + 2.0 * MARGIN;
    let height = max_y + NODE_H + 2.0 * MARGIN;

    let center = |x: f32, y: f32| (x + MARGIN + NODE_W / 2.0, y + MARGIN + NODE_H / 2.0);

    let mut out = String::new();
    out.push_str(&format!(
        "<svg xmlns=\"http://www.w3.org/2000/svg\" width=\"{width:.0}\" height=\"{height:.0}\" \
         viewBox=\"0 0 {width:.0} {height:.0}\">\n"
    ));
    out.push_str("  <style>text { font-family: Helvetica, sans-serif; font-size: 12px; }</style>\n");

    // Edges first so node boxes draw over them.
    for edge in &graph.edges {
        let source = graph.nodes.iter().find(|n| n.id == edge.source);
        let target = graph.nodes.iter().find(|n| n.id == edge.target);
        if let (Some(s), Some(t)) = (source, target) {
            let (x1, y1) = center(s.x, s.y);
            let (x2, y2) = center(t.x, t.y);
            out.push_str(&format!(
                "  <line x1=\"{x1:.0}\" y1=\"{y1:.0}\" x2=\"{x2:.0}\" y2=\"{y2:.0}\" \
                 stroke=\"#9ca3af\"/>\n"
            ));
        }
    }

    for node in &graph.nodes {
        let x = node.x + MARGIN;
        let y = node.y + MARGIN;
        out.push_str(&format!(
            "  <rect x=\"{x:.0}\" y=\"{y:.0}\" width=\"{NODE_W:.0}\" height=\"{NODE_H:.0}\" \
             rx=\"10\" fill=\"#1f2937\"/>\n"
        ));
        out.push_str(&format!(
            "  <text x=\"{tx:.0}\" y=\"{ty:.0}\" fill=\"#ffffff\" text-anchor=\"middle\">{label}</text>\n",
            tx = x + NODE_W / 2.0,
            ty = y + NODE_H / 2.0 + 4.0,
            label = xml_escape(&node.label)
        ));
    }

    out.push_str("</svg>\n");
    out
}
