use crate::CLAP_STYLING;
use clap::{arg, command};

fn input_arg() -> clap::Arg {
    arg!(-i --"input" <FILE>)
        .required(false)
        .help("Tab/comma separated events file ('-' or omitted: bundled sample dataset)")
}

fn lenient_arg() -> clap::Arg {
    arg!(--"lenient")
        .required(false)
        .help("Skip malformed rows and report them instead of failing")
        .action(clap::ArgAction::SetTrue)
}

pub(crate) fn command_argument_builder() -> clap::Command {
    clap::Command::new("kinmap")
        .version(env!("CARGO_PKG_VERSION"))
        .bin_name("kinmap")
        .styles(CLAP_STYLING)
        .arg(arg!(-q --"quiet" "Suppress banner and non-essential output").required(false))
        .arg(arg!(-v --"verbose" "Log pipeline progress to stderr").required(false))
        .subcommand_required(false)
        .subcommand(
            command!("render")
                .about("Runs the pipeline and prints or saves the resulting map")
                .arg(input_arg())
                .arg(
                    arg!(-f --"format" <FORMAT>)
                        .required(false)
                        .help("Output format: text, json, geojson")
                        .value_parser(["text", "json", "geojson"])
                        .default_value("text"),
                )
                .arg(
                    arg!(-o --"output" <PATH>)
                        .required(false)
                        .help("Save output to file (default: print to screen)"),
                )
                .arg(lenient_arg())
                .arg(
                    arg!(--"join" <STRATEGY>)
                        .required(false)
                        .help("How events with the same person are paired: pairwise, keyed")
                        .value_parser(["pairwise", "keyed"])
                        .default_value("pairwise"),
                ),
        )
        .subcommand(
            command!("check")
                .about("Validates an events file and prints per-row diagnostics")
                .arg(input_arg())
                .arg(lenient_arg()),
        )
        .subcommand(
            command!("ui")
                .about("Opens the interactive terminal map")
                .arg(input_arg()),
        )
}
