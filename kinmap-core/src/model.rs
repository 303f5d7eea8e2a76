// Application state and the reducer that drives it

use crate::cluster::Marker;
use crate::edges::Edge;
use crate::error::RowError;
use crate::pipeline::Pipeline;
use crate::record::Warning;
use tracing::warn;

/// Dataset shown until the user loads their own.
pub const DEFAULT_DATASET: &str = include_str!("../data/default.tsv");

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Page {
    #[default]
    Map,
    LoadData,
}

impl Page {
    pub fn as_str(&self) -> &'static str {
        match self {
            Page::Map => "map",
            Page::LoadData => "load data",
        }
    }
}

#[derive(Debug, Clone)]
pub enum Action {
    /// Replace the raw input text
    EditInput(String),
    /// Run the pipeline on the current input
    Load,
    ShowPage(Page),
}

/// Outcome of the most recent load.
#[derive(Debug, Clone, Default, PartialEq)]
pub enum LoadStatus {
    #[default]
    NotLoaded,
    Loaded {
        events: usize,
        skipped: Vec<RowError>,
        warnings: Vec<Warning>,
    },
    /// The load failed; markers and edges still show the previous load
    Failed {
        message: String,
        rows: Vec<RowError>,
    },
}

/// Top-level application state. Only `update` produces new values.
#[derive(Debug, Clone)]
pub struct Model {
    pub page: Page,
    pub input: String,
    pub markers: Vec<Marker>,
    pub edges: Vec<Edge>,
    pub status: LoadStatus,
}

impl Default for Model {
    fn default() -> Self {
        Self {
            page: Page::Map,
            input: DEFAULT_DATASET.to_string(),
            markers: Vec::new(),
            edges: Vec::new(),
            status: LoadStatus::NotLoaded,
        }
    }
}

impl Model {
    /// A model holding `input`, already loaded through `pipeline`.
    pub fn with_input(input: impl Into<String>, pipeline: &Pipeline) -> Self {
        let model = Model {
            input: input.into(),
            ..Model::default()
        };
        update(model, Action::Load, pipeline)
    }

    pub fn is_loaded(&self) -> bool {
        matches!(self.status, LoadStatus::Loaded { .. })
    }
}

pub fn update(model: Model, action: Action, pipeline: &Pipeline) -> Model {
    match action {
        Action::EditInput(input) => Model { input, ..model },
        Action::ShowPage(page) => Model { page, ..model },
        Action::Load => match pipeline.run(&model.input) {
            Ok(outcome) => Model {
                page: Page::Map,
                markers: outcome.markers,
                edges: outcome.edges,
                status: LoadStatus::Loaded {
                    events: outcome.events.len(),
                    skipped: outcome.diagnostics,
                    warnings: outcome.warnings,
                },
                ..model
            },
            Err(e) => {
                warn!("Load failed: {}", e);
                Model {
                    status: LoadStatus::Failed {
                        message: e.to_string(),
                        rows: e.row_errors().to_vec(),
                    },
                    ..model
                }
            }
        },
    }
}
