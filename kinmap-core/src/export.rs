// Scene export: text report, JSON and GeoJSON

use crate::error::Result;
use crate::graph::MarkerGraph;
use crate::pipeline::LoadOutcome;
use crate::presentation::{EdgeView, MarkerView, Renderer, Scene};
use crate::record::Coordinate;
use serde_json::{Value, json};
use std::fs::File;
use std::io::Write;
use std::path::Path;

const RULE: &str = "━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━\n";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    Text,
    Json,
    GeoJson,
}

impl OutputFormat {
    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "text" | "txt" => Some(OutputFormat::Text),
            "json" => Some(OutputFormat::Json),
            "geojson" => Some(OutputFormat::GeoJson),
            _ => None,
        }
    }
}

/// Render `outcome` in the requested format.
pub fn render_output(outcome: &LoadOutcome, scene: &Scene, format: OutputFormat) -> Result<String> {
    match format {
        OutputFormat::Text => Ok(generate_text_report(outcome, scene)),
        OutputFormat::Json => generate_json_report(outcome, scene),
        OutputFormat::GeoJson => {
            let mut renderer = GeoJsonRenderer::new();
            scene.render(&mut renderer);
            Ok(serde_json::to_string_pretty(&renderer.into_value())?)
        }
    }
}

pub fn generate_text_report(outcome: &LoadOutcome, scene: &Scene) -> String {
    let mut report = String::new();

    report.push_str(RULE);
    report.push_str("                             KINMAP ANCESTRY MAP\n");
    report.push_str(RULE);
    report.push('\n');

    report.push_str(&format!("Events:       {}\n", outcome.events.len()));
    report.push_str(&format!("Markers:      {}\n", outcome.markers.len()));
    report.push_str(&format!("Edges:        {}\n", outcome.edges.len()));
    if let (Some(first), Some(last)) = (outcome.events.first(), outcome.events.last()) {
        report.push_str(&format!("Years:        {} - {}\n", first.year, last.year));
    }
    match scene.center {
        Some(center) => report.push_str(&format!("Center:       {}\n", format_coordinate(&center))),
        None => report.push_str("Center:       (none)\n"),
    }

    let graph = MarkerGraph::build(&outcome.markers, &outcome.edges);
    report.push_str(&format!("Family groups: {}\n", graph.group_count()));
    report.push('\n');

    if !outcome.warnings.is_empty() || !outcome.diagnostics.is_empty() {
        report.push_str(RULE);
        report.push_str("WARNINGS\n");
        report.push_str(RULE);
        report.push('\n');
        for warning in &outcome.warnings {
            report.push_str(&format!("  [WARN] {}\n", warning));
        }
        for row in &outcome.diagnostics {
            report.push_str(&format!("  [SKIP] {}\n", row));
        }
        report.push('\n');
    }

    if !scene.is_empty() {
        report.push_str(RULE);
        report.push_str("MARKERS\n");
        report.push_str(RULE);
        report.push('\n');

        for (idx, marker) in scene.markers.iter().enumerate() {
            report.push_str(&format!(
                "[{}] {}  {}  links: {}\n",
                idx + 1,
                format_coordinate(&marker.position),
                marker.color,
                graph.degree(idx)
            ));
            for line in marker.tooltip.lines() {
                report.push_str(&format!("      {}\n", line.trim_end()));
            }
        }
        report.push('\n');
    }

    if !scene.edges.is_empty() {
        report.push_str(RULE);
        report.push_str("EDGES\n");
        report.push_str(RULE);
        report.push('\n');

        for (idx, edge) in scene.edges.iter().enumerate() {
            report.push_str(&format!(
                "[{}] {} -> {}  {}\n",
                idx + 1,
                format_coordinate(&edge.from),
                format_coordinate(&edge.to),
                edge.color
            ));
            for line in edge.tooltip.lines() {
                report.push_str(&format!("      {}\n", line.trim_end()));
            }
        }
        report.push('\n');
    }

    report.push_str(RULE);
    report.push_str("                                End of Report\n");
    report.push_str(RULE);

    report
}

pub fn generate_json_report(outcome: &LoadOutcome, scene: &Scene) -> Result<String> {
    let json_report = json!({
        "metadata": {
            "generator": "kinmap",
            "version": env!("CARGO_PKG_VERSION"),
        },
        "summary": {
            "events": outcome.events.len(),
            "markers": outcome.markers.len(),
            "edges": outcome.edges.len(),
        },
        "scene": scene,
        "warnings": outcome.warnings.iter().map(|w| w.to_string()).collect::<Vec<_>>(),
        "diagnostics": outcome.diagnostics.iter().map(|d| d.to_string()).collect::<Vec<_>>(),
    });

    Ok(serde_json::to_string_pretty(&json_report)?)
}

/// Collects a scene as a GeoJSON FeatureCollection. Positions are written
/// `[longitude, latitude]`.
#[derive(Debug, Default)]
pub struct GeoJsonRenderer {
    view: Option<Value>,
    features: Vec<Value>,
}

impl GeoJsonRenderer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn into_value(self) -> Value {
        let mut collection = json!({
            "type": "FeatureCollection",
            "features": self.features,
        });
        if let Some(view) = self.view {
            collection["view"] = view;
        }
        collection
    }
}

impl Renderer for GeoJsonRenderer {
    fn set_view(&mut self, center: Coordinate, zoom: u8) {
        self.view = Some(json!({
            "center": position(&center),
            "zoom": zoom,
        }));
    }

    fn draw_edge(&mut self, edge: &EdgeView) {
        self.features.push(json!({
            "type": "Feature",
            "geometry": {
                "type": "LineString",
                "coordinates": [position(&edge.from), position(&edge.to)],
            },
            "properties": {
                "kind": "edge",
                "color": edge.color.to_string(),
                "weight": edge.weight,
                "tooltip": edge.tooltip,
            },
        }));
    }

    fn draw_marker(&mut self, marker: &MarkerView) {
        self.features.push(json!({
            "type": "Feature",
            "geometry": {
                "type": "Point",
                "coordinates": position(&marker.position),
            },
            "properties": {
                "kind": "marker",
                "color": marker.color.to_string(),
                "opacity": marker.opacity,
                "radius": marker.radius,
                "weight": marker.weight,
                "tooltip": marker.tooltip,
            },
        }));
    }
}

fn position(coordinate: &Coordinate) -> Value {
    json!([coordinate.longitude, coordinate.latitude])
}

fn format_coordinate(coordinate: &Coordinate) -> String {
    format!("({:.4}, {:.4})", coordinate.latitude, coordinate.longitude)
}

pub fn save_output(content: &str, path: &Path) -> std::io::Result<()> {
    let mut file = File::create(path)?;
    file.write_all(content.as_bytes())?;
    Ok(())
}
