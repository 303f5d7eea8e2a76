pub mod cluster;
pub mod edges;
pub mod error;
pub mod export;
pub mod graph;
pub mod model;
pub mod pipeline;
pub mod presentation;
pub mod record;
pub mod tokenize;

pub use cluster::{Marker, cluster};
pub use edges::{Edge, JoinStrategy, KeyedJoin, PairJoin, PairwiseJoin, build_edges};
pub use error::{PipelineError, RowError, RowErrorKind};
pub use model::{Action, LoadStatus, Model, Page, update};
pub use pipeline::{LoadOutcome, Pipeline, PipelineConfig};
pub use presentation::{Gradient, Renderer, Rgb, Scene, SceneStyle, center_point, color_for};
pub use record::{Coordinate, Event, IdentityKey, RowPolicy, Warning, parse_events};
pub use tokenize::{Delimiters, Row, tokenize};

use colored::Colorize;

pub fn print_banner() {
    let banner = r#"
    ╦╔═╦╔╗╔╔╦╗╔═╗╔═╗
    ╠╩╗║║║║║║║╠═╣╠═╝
    ╩ ╩╩╝╚╝╩ ╩╩ ╩╩
    "#;
    println!("{}", banner.bright_red().bold());
    println!(
        "    {} {}\n",
        "ancestry events on a map".bright_white(),
        format!("v{}", env!("CARGO_PKG_VERSION")).dimmed()
    );
}
