use crate::CLAP_STYLING;
use clap::{arg, command};
use wikirace_core::config::DEFAULT_CONFIG_DIR;

pub(crate) fn command_argument_builder() -> clap::Command {
    clap::Command::new("wikirace")
        .version(env!("CARGO_PKG_VERSION"))
        .bin_name("wikirace")
        .styles(CLAP_STYLING)
        .arg(arg!(-q --"quiet" "Suppress banner and non-essential output").required(false))
        .arg(
            arg!(-v --"verbose" ... "Increase log verbosity (-v debug, -vv trace)")
                .required(false)
                .global(true),
        )
        .arg(
            arg!(-c --"config-dir" <PATH>)
                .required(false)
                .global(true)
                .help("Directory holding config.json")
                .default_value(DEFAULT_CONFIG_DIR),
        )
        .subcommand_required(false)
        .subcommand(
            command!("init")
                .about("Writes a default configuration file")
                .arg(
                    arg!([PATH])
                        .required(false)
                        .help("Directory to write config.json into (defaults to --config-dir)"),
                )
                .arg(
                    arg!(-f --"force")
                        .help("Overwrite an existing configuration file")
                        .required(false),
                ),
        )
        .subcommand(
            command!("solve")
                .about("Submit a search to the solve endpoint and draw the resulting path")
                .arg(
                    arg!(-s --"start" <TITLE>)
                        .required(true)
                        .help("Article to start from"),
                )
                .arg(
                    arg!(-e --"end" <TITLE>)
                        .required(true)
                        .help("Article to reach"),
                )
                .arg(
                    arg!(-a --"algo" <NAME>)
                        .required(false)
                        .help("Algorithm name forwarded to the backend (default from config)"),
                )
                .arg(
                    arg!(--"endpoint" <URL>)
                        .required(false)
                        .help("Solve endpoint (default: http://localhost:8080/solve)"),
                )
                .arg(
                    arg!(--"timeout" <SECONDS>)
                        .required(false)
                        .help("Request timeout in seconds (default: wait indefinitely)")
                        .value_parser(clap::value_parser!(u64)),
                )
                .arg(
                    arg!(-f --"format" <FORMAT>)
                        .required(false)
                        .help("Output format: text, html, json")
                        .value_parser(["text", "html", "json"])
                        .default_value("text"),
                )
                .arg(
                    arg!(-o --"output" <PATH>)
                        .required(false)
                        .help("Write the rendering to a file instead of the screen")
                        .value_parser(clap::value_parser!(std::path::PathBuf)),
                ),
        )
        .subcommand(command!("ui").about("Open the interactive search form"))
}
