use crate::cluster::{Marker, cluster};
use crate::edges::{Edge, JoinStrategy, build_edges};
use crate::error::{Result, RowError};
use crate::presentation::{Scene, SceneStyle};
use crate::record::{Event, ParseOptions, RowPolicy, Warning, parse_events};
use crate::tokenize::Delimiters;
use serde::Serialize;
use tracing::info;

/// Options for a pipeline run
#[derive(Debug, Clone, Default)]
pub struct PipelineConfig {
    pub delimiters: Delimiters,
    pub policy: RowPolicy,
    pub join: JoinStrategy,
    pub style: SceneStyle,
}

/// Result of a successful load
#[derive(Debug, Clone, Default, Serialize)]
pub struct LoadOutcome {
    pub events: Vec<Event>,
    pub markers: Vec<Marker>,
    pub edges: Vec<Edge>,
    /// Rows skipped under the lenient policy
    pub diagnostics: Vec<RowError>,
    pub warnings: Vec<Warning>,
}

impl LoadOutcome {
    pub fn scene(&self, style: &SceneStyle) -> Scene {
        Scene::build(&self.markers, &self.edges, style)
    }
}

/// Raw text to markers and edges, all or nothing.
#[derive(Debug, Clone, Default)]
pub struct Pipeline {
    config: PipelineConfig,
}

impl Pipeline {
    pub fn new(config: PipelineConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &PipelineConfig {
        &self.config
    }

    pub fn run(&self, text: &str) -> Result<LoadOutcome> {
        let options = ParseOptions {
            delimiters: self.config.delimiters,
            policy: self.config.policy,
        };
        let parsed = parse_events(text, &options)?;

        let markers = cluster(&parsed.events);
        let edges = build_edges(&parsed.events, &self.config.join);

        info!(
            "Loaded {} event(s) into {} marker(s) and {} edge(s)",
            parsed.events.len(),
            markers.len(),
            edges.len()
        );

        Ok(LoadOutcome {
            events: parsed.events,
            markers,
            edges,
            diagnostics: parsed.skipped,
            warnings: parsed.warnings,
        })
    }

    pub fn scene(&self, outcome: &LoadOutcome) -> Scene {
        outcome.scene(&self.config.style)
    }
}
