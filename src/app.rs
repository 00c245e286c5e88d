use std::time::Duration;

use chrono::Utc;
use clap::{error::ErrorKind, CommandFactory, Parser};
use colored::Colorize;
use indicatif::{ProgressBar, ProgressDrawTarget, ProgressStyle};
use tokio::fs::OpenOptions;
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};
use tracing_subscriber::EnvFilter;

use crate::cli::args::CliArgs;
use crate::cli::validation;
use crate::client::{CaClient, CaInfo, ClientOptions};
use crate::config::{self, ConfigFile, ConfigSource};
use crate::controller::{CertificateListController, PageView, SortOrder};
use crate::output::{self, DashboardView, OutputFormat};

#[derive(Clone, Debug)]
struct RunConfig {
    client: ClientOptions,
    search: String,
    sort: SortOrder,
    page: Option<usize>,
    output: Option<String>,
    output_format: OutputFormat,
    no_color: bool,
    interactive: bool,
}

fn build_run_config(args: CliArgs, cfg: ConfigFile) -> Result<RunConfig, String> {
    validation::validate(&args)?;

    let no_color = if args.color {
        false
    } else {
        args.no_color || cfg.no_color.unwrap_or(false)
    };

    let base_url = args
        .url
        .or(cfg.base_url)
        .unwrap_or_else(|| config::DEFAULT_BASE_URL.to_string());
    crate::client::parse_base_url(&base_url).map_err(|e| e.to_string())?;

    let timeout_seconds = args
        .timeout
        .or(cfg.timeout)
        .unwrap_or(config::DEFAULT_TIMEOUT_SECONDS);
    let proxy = args.proxy.or(cfg.proxy).filter(|p| !p.trim().is_empty());
    let accept_invalid_certs = args.insecure || cfg.accept_invalid_certs.unwrap_or(false);

    let sort = match args.sort.or(cfg.sort) {
        Some(raw) => SortOrder::parse(&raw)
            .ok_or_else(|| format!("invalid sort '{raw}', expected asc or desc"))?,
        None => SortOrder::default(),
    };
    let search = args.search.or(cfg.search).unwrap_or_default();

    let output = args
        .output
        .or(cfg.output)
        .filter(|p| !p.trim().is_empty())
        .map(|p| config::expand_tilde(&p).to_string_lossy().into_owned());
    let output_format = match args.output_format.or(cfg.output_format) {
        Some(raw) => OutputFormat::parse(&raw)
            .ok_or_else(|| format!("invalid output format '{raw}', expected text, json or html"))?,
        None => output
            .as_deref()
            .and_then(output::infer_format_from_path)
            .unwrap_or(OutputFormat::Text),
    };

    Ok(RunConfig {
        client: ClientOptions {
            base_url,
            timeout_seconds,
            proxy,
            accept_invalid_certs,
            system_proxy: true,
        },
        search,
        sort,
        page: args.page,
        output,
        output_format,
        no_color,
        interactive: args.interactive,
    })
}

fn init_logging(verbose: u8) {
    let level = match verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init();
}

fn loading_spinner() -> ProgressBar {
    let pb = ProgressBar::with_draw_target(None, ProgressDrawTarget::stderr());
    pb.set_style(
        ProgressStyle::with_template("{spinner:.cyan} {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_spinner()),
    );
    pb.set_message("Loading certificates...");
    pb.enable_steady_tick(Duration::from_millis(100));
    pb
}

/// Fetches CA info and the certificate list side by side.
async fn load_all(client: &CaClient, controller: &mut CertificateListController) -> (CaInfo, PageView) {
    let pb = loading_spinner();
    let (ca, certificates) = tokio::join!(client.load_ca_info(), client.load_certificates(Utc::now()));
    pb.finish_and_clear();
    tracing::info!(
        base_url = %client.base_url(),
        certificates = certificates.len(),
        health_ok = ca.health_ok,
        "dashboard loaded"
    );
    let page = controller.load(certificates);
    (ca, page)
}

fn render(format: OutputFormat, view: &DashboardView) -> Vec<u8> {
    match format {
        OutputFormat::Text => output::render_text(view),
        OutputFormat::Json => output::render_json(view),
        OutputFormat::Html => output::render_html(view),
    }
}

async fn write_stdout(bytes: &[u8]) -> Result<(), String> {
    let mut stdout = tokio::io::stdout();
    stdout
        .write_all(bytes)
        .await
        .map_err(|e| format!("failed to write to stdout: {e}"))?;
    stdout
        .flush()
        .await
        .map_err(|e| format!("failed to write to stdout: {e}"))
}

/// A line typed in interactive mode.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Command {
    Search(String),
    ToggleSort,
    Next,
    Prev,
    Reload,
    Help,
    Quit,
    Unknown(String),
}

pub fn parse_command(line: &str) -> Command {
    let line = line.trim();
    let (head, rest) = match line.split_once(char::is_whitespace) {
        Some((head, rest)) => (head, rest.trim()),
        None => (line, ""),
    };
    match head.to_lowercase().as_str() {
        "search" | "s" | "/" => Command::Search(rest.to_string()),
        "sort" | "t" => Command::ToggleSort,
        "next" | "n" | "]" => Command::Next,
        "prev" | "p" | "[" => Command::Prev,
        "reload" | "r" => Command::Reload,
        "help" | "h" | "?" => Command::Help,
        "quit" | "q" | "exit" => Command::Quit,
        _ => Command::Unknown(line.to_string()),
    }
}

fn print_interactive_help() {
    println!(
        "{}",
        ":: commands: search <text> | sort | next | prev | reload | help | quit".dimmed()
    );
}

async fn run_interactive(
    client: &CaClient,
    controller: &mut CertificateListController,
    mut ca: CaInfo,
    mut page: PageView,
) -> Result<(), String> {
    print_interactive_help();
    write_stdout(&output::render_text(&DashboardView::build(&ca, &page, Utc::now()))).await?;

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    loop {
        print!("{} ", ">".bold());
        let _ = std::io::Write::flush(&mut std::io::stdout());

        let line = match lines.next_line().await {
            Ok(Some(line)) => line,
            Ok(None) => break,
            Err(e) => return Err(format!("failed to read stdin: {e}")),
        };

        page = match parse_command(&line) {
            Command::Search(text) => controller.search(&text),
            Command::ToggleSort => controller.toggle_sort(),
            Command::Next => controller.next_page(),
            Command::Prev => controller.prev_page(),
            Command::Reload => {
                let (fresh_ca, fresh_page) = load_all(client, controller).await;
                ca = fresh_ca;
                fresh_page
            }
            Command::Help => {
                print_interactive_help();
                continue;
            }
            Command::Quit => break,
            Command::Unknown(other) => {
                if !other.is_empty() {
                    println!("{} unknown command '{}', try 'help'", "::".yellow(), other);
                }
                continue;
            }
        };

        write_stdout(&output::render_text(&DashboardView::build(&ca, &page, Utc::now()))).await?;
    }
    Ok(())
}

async fn run_async(run: RunConfig) -> Result<(), String> {
    if run.no_color {
        colored::control::set_override(false);
    }

    let client = CaClient::new(&run.client).map_err(|e| e.to_string())?;
    let mut controller = CertificateListController::new(run.sort);

    let (ca, mut page) = load_all(&client, &mut controller).await;
    if !run.search.trim().is_empty() {
        page = controller.search(&run.search);
    }
    if let Some(target) = run.page {
        page = controller.go_to_page(target);
    }

    if run.interactive {
        return run_interactive(&client, &mut controller, ca, page).await;
    }

    let view = DashboardView::build(&ca, &page, Utc::now());
    let rendered = render(run.output_format, &view);

    match run.output.as_ref() {
        Some(path) => {
            let mut outfile = OpenOptions::new()
                .create(true)
                .write(true)
                .truncate(true)
                .open(path)
                .await
                .map_err(|e| format!("failed to open output file: {e}"))?;
            outfile
                .write_all(&rendered)
                .await
                .map_err(|e| format!("failed to write output file: {e}"))?;
            println!(":: {:<10}: {}", "Output", path);
        }
        None => write_stdout(&rendered).await?,
    }

    Ok(())
}

pub fn run_cli() -> Result<(), String> {
    let args = match CliArgs::try_parse() {
        Ok(args) => args,
        Err(e) => match e.kind() {
            ErrorKind::DisplayHelp => {
                print!("{}", CliArgs::command().render_long_help());
                return Ok(());
            }
            ErrorKind::DisplayVersion => {
                print!("{}", CliArgs::command().render_version());
                return Ok(());
            }
            _ => return Err(e.to_string()),
        },
    };

    init_logging(args.verbose);

    let source = ConfigSource::resolve(args.config.as_deref());

    if args.init_config {
        let path = source
            .path()
            .ok_or_else(|| "could not determine home directory".to_string())?;
        let state = if config::write_default_config(path)? {
            "created"
        } else {
            "exists"
        };
        println!(":: {:<10}: {} ({state})", "Config", path.display());
        return Ok(());
    }

    let cfg = source.load()?;

    let run = build_run_config(args, cfg)?;

    let rt = tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .worker_threads(2)
        .build()
        .map_err(|e| format!("failed to build runtime: {e}"))?;

    rt.block_on(run_async(run))
}
