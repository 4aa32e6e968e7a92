use colored::Colorize;
use commands::command_argument_builder;
use tracing_subscriber::EnvFilter;
use wikirace::handlers::{handle_init, handle_solve};
use wikirace_core::print_banner;

mod commands;

#[tokio::main]
async fn main() {
    let cmd = command_argument_builder();
    let chosen_command = cmd.get_matches();
    let quiet = chosen_command.get_flag("quiet");

    // Show banner unless --quiet flag is set
    if !quiet {
        print_banner();
    }

    if chosen_command.subcommand().is_none() {
        // No subcommand provided, just show the banner
        return;
    }

    match chosen_command.subcommand() {
        Some(("ui", primary_command)) => {
            // The terminal form owns stdout, so no log subscriber here
            let config_dir = primary_command
                .get_one::<String>("config-dir")
                .map(String::as_str)
                .unwrap_or(wikirace_core::config::DEFAULT_CONFIG_DIR);
            if let Err(e) = wikirace_tui::run(config_dir).await {
                eprintln!("Error running TUI: {}", e);
                std::process::exit(1);
            }
        }
        Some(("init", primary_command)) => {
            init_tracing(primary_command.get_count("verbose"));
            if let Err(e) = handle_init(primary_command) {
                eprintln!("{} {}", "✗".red().bold(), e);
                std::process::exit(1);
            }
        }
        Some(("solve", primary_command)) => {
            init_tracing(primary_command.get_count("verbose"));
            if let Err(e) = handle_solve(primary_command, quiet).await {
                eprintln!("{} Solve failed: {}", "✗".red().bold(), e);
                std::process::exit(1);
            }
        }
        _ => unreachable!("clap should ensure we don't get here"),
    }
}

fn init_tracing(verbosity: u8) {
    let default_level = match verbosity {
        0 => "warn",
        1 => "debug",
        _ => "trace",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_writer(std::io::stderr)
        .init();
}

pub const CLAP_STYLING: clap::builder::styling::Styles = clap::builder::styling::Styles::styled()
    .header(clap_cargo::style::HEADER)
    .usage(clap_cargo::style::USAGE)
    .literal(clap_cargo::style::LITERAL)
    .placeholder(clap_cargo::style::PLACEHOLDER)
    .error(clap_cargo::style::ERROR)
    .valid(clap_cargo::style::VALID)
    .invalid(clap_cargo::style::INVALID);
