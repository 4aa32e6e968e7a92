use clap::ArgMatches;
use colored::Colorize;
use indicatif::{ProgressBar, ProgressStyle};
use std::fs;
use std::path::PathBuf;
use std::time::Duration;
use tracing::debug;
use wikirace_client::{SearchResponse, SolveClient};
use wikirace_core::config::{ClientConfig, config_file_in};
use wikirace_core::diagram::DiagramRegion;
use wikirace_core::html::{HtmlDiagram, HtmlResults, render_page};
use wikirace_core::text::{TextDiagram, TextResults};
use wikirace_core::{FormFields, ResultsRegion, SubmitEvent, SubmitHandler, SubmitOutcome};

const RULE: &str = "━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    Text,
    Html,
    Json,
}

impl OutputFormat {
    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "text" => Some(OutputFormat::Text),
            "html" => Some(OutputFormat::Html),
            "json" => Some(OutputFormat::Json),
            _ => None,
        }
    }
}

/// Everything one `solve` run needs
pub struct SolveOptions {
    pub form: FormFields,
    pub config: ClientConfig,
    pub format: OutputFormat,
    /// Colored terminal output instead of plain text
    pub styled: bool,
    pub show_spinner: bool,
}

/// Load the config file in `config_dir` and apply command-line overrides
pub fn resolve_config(
    config_dir: &str,
    endpoint: Option<&str>,
    timeout_secs: Option<u64>,
) -> Result<ClientConfig, String> {
    let path = config_file_in(config_dir);
    let config = ClientConfig::load_or_default(&path).map_err(|e| e.to_string())?;
    Ok(config.with_endpoint(endpoint).with_timeout(timeout_secs))
}

/// Submit the form once and render the answer in the requested format
pub async fn execute_solve(options: SolveOptions) -> Result<String, String> {
    let SolveOptions {
        form,
        config,
        format,
        styled,
        show_spinner,
    } = options;

    let client = SolveClient::from_options(&config.client).map_err(|e| e.to_string())?;
    debug!("Using endpoint {} ({:?})", client.endpoint(), format);

    let spinner = if show_spinner {
        let pb = ProgressBar::new_spinner();
        pb.set_style(
            ProgressStyle::default_spinner()
                .template("{spinner:.cyan} {msg}")
                .map_err(|e| e.to_string())?,
        );
        pb.enable_steady_tick(Duration::from_millis(100));
        pb.set_message(format!("Solving {} -> {}...", form.start, form.end));
        Some(pb)
    } else {
        None
    };

    let rendered = match format {
        OutputFormat::Html => {
            let handler =
                SubmitHandler::new(client, form, HtmlResults::default(), HtmlDiagram::default());
            submit_once(&handler, spinner.as_ref()).await?;
            let results = handler.results().await;
            let diagram = handler.diagram().await;
            render_page(&results, &diagram)
        }
        OutputFormat::Text | OutputFormat::Json => {
            let handler =
                SubmitHandler::new(client, form, TextResults::default(), TextDiagram::default());
            let response = submit_once(&handler, spinner.as_ref()).await?;
            if format == OutputFormat::Json {
                serde_json::to_string_pretty(&response).map_err(|e| e.to_string())? + "\n"
            } else {
                let results = handler.results().await;
                let diagram = handler.diagram().await;
                generate_text_report(&results, &diagram, styled)
            }
        }
    };

    Ok(rendered)
}

async fn submit_once<R, G>(
    handler: &SubmitHandler<FormFields, R, G>,
    spinner: Option<&ProgressBar>,
) -> Result<SearchResponse, String>
where
    R: ResultsRegion,
    G: DiagramRegion,
{
    let outcome = handler.handle_submit(&mut SubmitEvent::new()).await;

    match outcome {
        SubmitOutcome::Rendered { response, .. } => {
            if let Some(pb) = spinner {
                pb.finish_and_clear();
            }
            Ok(response)
        }
        SubmitOutcome::Failed { error, .. } => {
            if let Some(pb) = spinner {
                pb.finish_and_clear();
            }
            Err(error.to_string())
        }
        SubmitOutcome::Stale { token } => {
            if let Some(pb) = spinner {
                pb.finish_and_clear();
            }
            Err(format!("Submission {} was superseded", token))
        }
    }
}

/// Summary block followed by the path strip
pub fn generate_text_report(results: &TextResults, diagram: &TextDiagram, styled: bool) -> String {
    let mut report = String::new();
    report.push_str(RULE);
    report.push_str("\n\n");

    if styled {
        report.push_str(&format!("{}\n", "# Result".bright_white().bold()));
        report.push_str(&results.render_colored());
    } else {
        report.push_str("# Result\n");
        for line in results.lines() {
            report.push_str(&format!("  {}\n", line));
        }
    }

    report.push('\n');
    report.push_str(RULE);
    report.push_str("\n\n");

    let lines = diagram.lines();
    if lines.is_empty() {
        report.push_str("  (empty path)\n");
    } else {
        for line in lines {
            if styled {
                report.push_str(&format!("{}\n", line.bright_cyan()));
            } else {
                report.push_str(&line);
                report.push('\n');
            }
        }
    }

    report
}

pub fn handle_init(args: &ArgMatches) -> Result<PathBuf, String> {
    let dir = args
        .get_one::<String>("PATH")
        .or_else(|| args.get_one::<String>("config-dir"))
        .ok_or_else(|| "No configuration directory given".to_string())?;
    let force = args.get_flag("force");
    let path = config_file_in(dir);

    ClientConfig::default()
        .save(&path, force)
        .map_err(|e| e.to_string())?;

    println!("{} Configuration written", "✓".green().bold());
    println!(
        "{} {}",
        "→".blue(),
        path.display().to_string().bright_white()
    );
    Ok(path)
}

pub async fn handle_solve(args: &ArgMatches, quiet: bool) -> Result<(), String> {
    let config_dir = args
        .get_one::<String>("config-dir")
        .map(String::as_str)
        .unwrap_or(wikirace_core::config::DEFAULT_CONFIG_DIR);
    let config = resolve_config(
        config_dir,
        args.get_one::<String>("endpoint").map(String::as_str),
        args.get_one::<u64>("timeout").copied(),
    )?;

    let start = args
        .get_one::<String>("start")
        .ok_or_else(|| "--start is required".to_string())?;
    let end = args
        .get_one::<String>("end")
        .ok_or_else(|| "--end is required".to_string())?;
    let algorithm = args
        .get_one::<String>("algo")
        .cloned()
        .unwrap_or_else(|| config.default_algorithm.clone());

    let format = args
        .get_one::<String>("format")
        .and_then(|f| OutputFormat::from_str(f))
        .unwrap_or(OutputFormat::Text);
    let output = args.get_one::<PathBuf>("output");

    let rendered = execute_solve(SolveOptions {
        form: FormFields::new(start, end, &algorithm),
        config,
        format,
        styled: output.is_none() && format == OutputFormat::Text,
        show_spinner: !quiet,
    })
    .await?;

    match output {
        Some(path) => {
            fs::write(path, &rendered)
                .map_err(|e| format!("Failed to write {}: {}", path.display(), e))?;
            if !quiet {
                println!(
                    "{} Saved to {}",
                    "✓".green().bold(),
                    path.display().to_string().bright_white()
                );
            }
        }
        None => print!("{}", rendered),
    }

    Ok(())
}
