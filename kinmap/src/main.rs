use kinmap_core::print_banner;
use handlers::{handle_check, handle_render, handle_ui, init_logging};
use commands::command_argument_builder;

mod commands;
mod handlers;

fn main() {
    let cmd = command_argument_builder();
    let chosen_command = cmd.get_matches();
    let quiet = chosen_command.get_flag("quiet");
    let verbose = chosen_command.get_flag("verbose");

    // Show banner unless --quiet flag is set
    if !quiet {
        print_banner();
    }

    if chosen_command.subcommand().is_none() {
        // No subcommand provided, just show the banner
        return;
    }

    match chosen_command.subcommand() {
        // The TUI owns the terminal, so no subscriber is installed for it
        Some(("ui", primary_command)) => handle_ui(primary_command),
        Some(("render", primary_command)) => {
            init_logging(verbose);
            handle_render(primary_command, quiet)
        }
        Some(("check", primary_command)) => {
            init_logging(verbose);
            handle_check(primary_command)
        }
        _ => unreachable!("clap should ensure we don't get here"),
    }
}

pub const CLAP_STYLING: clap::builder::styling::Styles = clap::builder::styling::Styles::styled()
    .header(clap_cargo::style::HEADER)
    .usage(clap_cargo::style::USAGE)
    .literal(clap_cargo::style::LITERAL)
    .placeholder(clap_cargo::style::PLACEHOLDER)
    .error(clap_cargo::style::ERROR)
    .valid(clap_cargo::style::VALID)
    .invalid(clap_cargo::style::INVALID);
