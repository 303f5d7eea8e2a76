use anyhow::{Context, Result, bail};
use clap::ArgMatches;
use colored::Colorize;
use kinmap_core::edges::JoinStrategy;
use kinmap_core::export::{OutputFormat, render_output, save_output};
use kinmap_core::model::{DEFAULT_DATASET, Model};
use kinmap_core::pipeline::{Pipeline, PipelineConfig};
use kinmap_core::record::RowPolicy;
use std::fs;
use std::path::Path;
use tracing::{Level, debug};

// Helper functions shared by the handlers

/// Read the events text from a file, or the bundled sample when no file
/// (or `-`) is given. `~` is expanded.
pub fn load_input(path: Option<&str>) -> Result<String> {
    match path {
        None | Some("-") => {
            debug!("Using bundled sample dataset");
            Ok(DEFAULT_DATASET.to_string())
        }
        Some(path) => {
            let expanded = shellexpand::tilde(path);
            let path = Path::new(expanded.as_ref());
            fs::read_to_string(path)
                .with_context(|| format!("Failed to read input file {}", path.display()))
        }
    }
}

/// Assemble the pipeline configuration from command-line choices.
pub fn build_config(lenient: bool, join: Option<&str>) -> Result<PipelineConfig> {
    let join = match join {
        Some(name) => match JoinStrategy::from_str(name) {
            Some(strategy) => strategy,
            None => bail!("Unknown join strategy '{}'", name),
        },
        None => JoinStrategy::default(),
    };

    Ok(PipelineConfig {
        policy: if lenient {
            RowPolicy::Lenient
        } else {
            RowPolicy::Strict
        },
        join,
        ..PipelineConfig::default()
    })
}

/// Validate `text` and describe the result. The flag is false when the
/// input cannot be loaded.
pub fn check_report(text: &str, config: PipelineConfig) -> (String, bool) {
    let mut report = format!("Row policy: {}\n", config.policy.as_str());
    let pipeline = Pipeline::new(config);

    match pipeline.run(text) {
        Ok(outcome) => {
            report.push_str(&format!(
                "✓ {} event(s), {} marker(s), {} edge(s)\n",
                outcome.events.len(),
                outcome.markers.len(),
                outcome.edges.len()
            ));
            for row in &outcome.diagnostics {
                report.push_str(&format!("  [SKIP] {}\n", row));
            }
            for warning in &outcome.warnings {
                report.push_str(&format!("  [WARN] {}\n", warning));
            }
            (report, true)
        }
        Err(e) => {
            report.push_str(&format!("✗ {}\n", e));
            for row in e.row_errors() {
                report.push_str(&format!("  [ERROR] {}\n", row));
            }
            (report, false)
        }
    }
}

/// Route tracing output to stderr so it never mixes with rendered output.
pub fn init_logging(verbose: bool) {
    let level = if verbose { Level::DEBUG } else { Level::WARN };
    tracing_subscriber::fmt()
        .with_max_level(level)
        .with_writer(std::io::stderr)
        .init();
}

fn print_divider() {
    eprintln!("{}", "═".repeat(60).bright_blue().bold());
}

fn fail(e: anyhow::Error) -> ! {
    eprintln!("{} {:#}", "✗".red().bold(), e);
    std::process::exit(1);
}

fn config_from_args(args: &ArgMatches) -> PipelineConfig {
    let lenient = args.get_flag("lenient");
    let join = args
        .try_get_one::<String>("join")
        .ok()
        .flatten()
        .map(String::as_str);
    build_config(lenient, join).unwrap_or_else(|e| fail(e))
}

pub fn handle_render(args: &ArgMatches, quiet: bool) {
    let input = args.get_one::<String>("input").map(String::as_str);
    let format = args
        .get_one::<String>("format")
        .and_then(|f| OutputFormat::from_str(f))
        .unwrap_or(OutputFormat::Text);
    let output = args.get_one::<String>("output");

    let text = load_input(input).unwrap_or_else(|e| fail(e));
    let pipeline = Pipeline::new(config_from_args(args));

    let outcome = match pipeline.run(&text) {
        Ok(outcome) => outcome,
        Err(e) => {
            for row in e.row_errors() {
                eprintln!("  {} {}", "[ERROR]".red(), row);
            }
            fail(e.into());
        }
    };

    let scene = pipeline.scene(&outcome);
    let rendered = render_output(&outcome, &scene, format).unwrap_or_else(|e| fail(e.into()));

    match output {
        Some(path) => {
            let expanded = shellexpand::tilde(path);
            let path = Path::new(expanded.as_ref());
            if let Err(e) = save_output(&rendered, path) {
                fail(anyhow::Error::new(e).context(format!("Failed to write {}", path.display())));
            }
            if !quiet {
                print_divider();
                eprintln!(
                    "{} {} marker(s), {} edge(s) written to {}",
                    "✓".green().bold(),
                    outcome.markers.len(),
                    outcome.edges.len(),
                    path.display()
                );
                print_divider();
            }
        }
        None => print!("{}", rendered),
    }
}

pub fn handle_check(args: &ArgMatches) {
    let input = args.get_one::<String>("input").map(String::as_str);
    let text = load_input(input).unwrap_or_else(|e| fail(e));

    let (report, ok) = check_report(&text, config_from_args(args));
    if ok {
        print!("{}", report);
    } else {
        eprint!("{}", report.red());
        std::process::exit(1);
    }
}

pub fn handle_ui(args: &ArgMatches) {
    let input = args.get_one::<String>("input").map(String::as_str);
    let text = load_input(input).unwrap_or_else(|e| fail(e));

    let pipeline = Pipeline::new(PipelineConfig::default());
    let model = Model::with_input(text, &pipeline);

    if let Err(e) = kinmap_tui::run(model, pipeline) {
        fail(e.context("Error running TUI"));
    }
}
