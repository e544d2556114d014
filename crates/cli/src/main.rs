mod echo;

use std::fs;
use std::io;
use std::path::PathBuf;
use std::str::FromStr;
use std::sync::Arc;
use std::time::Instant;

use anyhow::{Context, bail};
use bandbbs_core::{
    ConfigLoader, ConfigLoaderBuilder, DiscoverView, Extraction, HomeView, HttpSource, JsonConfig, JsonFormatter,
    LoadState, PageSource, ResourcesView, Screen, SiteConfig, StaticSource, TextConfig, TextFormatter, TextRender,
    View, fetch_file, fetch_stdin,
};
use clap::Parser;
use owo_colors::OwoColorize;
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Output format for scraped records
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum OutputFormat {
    Text,
    Json,
}

impl FromStr for OutputFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "text" | "txt" => Ok(Self::Text),
            "json" => Ok(Self::Json),
            _ => Err(format!("Invalid format: {}. Valid options: text, json", s)),
        }
    }
}

/// Browse BandBBS forum pages from the terminal
#[derive(Parser, Debug)]
#[command(name = "bandbbs")]
#[command(author = "BandBBS Client Contributors")]
#[command(version)]
#[command(about = "Scrape BandBBS forum pages into listings", long_about = None)]
struct Args {
    /// View to load (home, resources, discover, profile)
    #[arg(value_name = "VIEW", default_value = "home")]
    view: View,

    /// Read a saved page instead of fetching it, or "-" for stdin
    #[arg(short, long, value_name = "FILE")]
    input: Option<String>,

    /// Output file (default: stdout)
    #[arg(short, long, value_name = "FILE")]
    output: Option<PathBuf>,

    /// Output format (text, json)
    #[arg(short, long, default_value = "text", value_name = "FORMAT")]
    format: OutputFormat,

    /// Pretty print JSON output
    #[arg(long)]
    pretty: bool,

    /// Include the view name and page URL in output
    #[arg(long)]
    header: bool,

    /// Clip long text fields to this many characters (0 = no limit)
    #[arg(long, default_value = "0", value_name = "CHARS")]
    width: usize,

    /// Forum root URL, overriding the site config
    #[arg(long, value_name = "URL")]
    base_url: Option<String>,

    /// Custom site config directory
    #[arg(long, value_name = "DIR")]
    config_dir: Option<PathBuf>,

    /// HTTP timeout in seconds
    #[arg(long, value_name = "SECS")]
    timeout: Option<u64>,

    /// Custom User-Agent for HTTP requests
    #[arg(long, value_name = "UA")]
    user_agent: Option<String>,

    /// Enable debug logging
    #[arg(short, long)]
    verbose: bool,
}

fn init_tracing(verbose: bool) {
    let default = if verbose { "bandbbs=debug,bandbbs_core=debug" } else { "warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));

    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer().with_writer(io::stderr))
        .init();
}

fn load_site(args: &Args) -> anyhow::Result<SiteConfig> {
    let loader = match &args.config_dir {
        Some(dir) => ConfigLoaderBuilder::new().custom_dir(dir).build(),
        None => ConfigLoader::with_default_dirs(),
    };

    let mut site = loader.load().context("Failed to load site config")?;

    if let Some(url) = &args.base_url {
        site.set_base_url(url);
    }
    if let Some(timeout) = args.timeout {
        site.timeout = Some(timeout);
    }
    if let Some(ua) = &args.user_agent {
        site.user_agent = Some(ua.clone());
    }

    tracing::debug!(base_url = %site.base_url, timeout = ?site.timeout, "site config loaded");
    Ok(site)
}

fn read_input(input: &str) -> anyhow::Result<String> {
    if input == "-" {
        fetch_stdin().context("Failed to read from stdin")
    } else {
        fetch_file(input).with_context(|| format!("Failed to read file: {}", input))
    }
}

/// Run one screen to completion and return the page URL with the settled state.
async fn settle<V: Extraction, S: PageSource + 'static>(
    source: S, site: SiteConfig,
) -> anyhow::Result<(String, LoadState<Vec<V::Record>>)> {
    let screen = Screen::<V, S>::new(Arc::new(source), site).context("Failed to resolve page URL")?;
    let url = screen.url().to_string();

    tracing::debug!(%url, "loading page");
    screen.refetch();
    let state = screen.wait_settled().await;
    screen.teardown();

    Ok((url, state))
}

fn json_formatter(args: &Args) -> JsonFormatter {
    JsonFormatter::new(JsonConfig { include_source: args.header, pretty: args.pretty })
}

fn render<V>(url: &str, records: &[V::Record], args: &Args) -> anyhow::Result<String>
where
    V: Extraction,
    V::Record: TextRender,
{
    match args.format {
        OutputFormat::Text => {
            let formatter = TextFormatter::new(TextConfig { include_header: args.header, line_width: args.width });
            Ok(formatter.convert(V::VIEW, url, records))
        }
        OutputFormat::Json => {
            json_formatter(args).convert(V::VIEW, url, records).context("Failed to serialize records")
        }
    }
}

async fn run<V>(site: SiteConfig, args: &Args) -> anyhow::Result<String>
where
    V: Extraction,
    V::Record: TextRender,
{
    let started = Instant::now();

    let (url, state) = match &args.input {
        Some(input) => {
            if args.verbose {
                let from = if input == "-" { "stdin".to_string() } else { input.clone() };
                echo::print_step(2, 4, &format!("Reading {} page from {}", V::VIEW, from.bright_white()));
            }

            let html = read_input(input)?;
            if args.verbose {
                echo::print_detail("Size", &echo::format_size(html.len()));
            }

            settle::<V, _>(StaticSource::new(html), site).await?
        }
        None => {
            if args.verbose {
                let url = V::VIEW.page_url(&site).unwrap_or_default();
                echo::print_step(2, 4, &format!("Fetching {}", url.bright_white().underline()));
            }

            let source = HttpSource::new(site.fetch_config()).context("Failed to build HTTP client")?;
            settle::<V, _>(source, site).await?
        }
    };

    if let LoadState::Error { message, .. } = &state {
        tracing::info!(view = %V::VIEW, %message, "page failed to load");

        // JSON consumers still get the error state on stdout.
        if args.format == OutputFormat::Json {
            let failed = json_formatter(args).state(&state).context("Failed to serialize load state")?;
            println!("{}", failed);
        }
        bail!("Failed to load {} page: {}", V::VIEW, message);
    }

    let records = match state {
        LoadState::Success { data } => data,
        LoadState::Error { .. } | LoadState::Loading { .. } => bail!("Loading the {} page was cancelled", V::VIEW),
    };
    tracing::info!(view = %V::VIEW, records = records.len(), "page loaded");

    if args.verbose {
        echo::print_step(3, 4, "Extracting records");
        echo::print_detail("Records", &records.len().to_string());
        echo::print_timing("Load", started.elapsed());
    }

    if records.is_empty() {
        echo::print_warning(&format!("No records found on the {} page", V::VIEW));
    }

    render::<V>(&url, &records, args)
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();
    init_tracing(args.verbose);

    if args.verbose {
        echo::print_banner();
        echo::print_info("Debug logging enabled");
        eprintln!();
        echo::print_step(1, 4, "Loading site config");
    }

    let site = load_site(&args)?;

    if args.verbose {
        echo::print_detail("Forum", &site.base_url);
        eprintln!();
    }

    let output = match args.view {
        View::Home => run::<HomeView>(site, &args).await?,
        View::Resources => run::<ResourcesView>(site, &args).await?,
        View::Discover => run::<DiscoverView>(site, &args).await?,
        View::Profile => {
            echo::print_info("Sign-in happens in a browser; open this page to continue");
            site.login_url.clone()
        }
    };

    if args.verbose {
        echo::print_step(4, 4, "Writing output");
        echo::print_detail("Format", &format!("{:?}", args.format));
        eprintln!();
    }

    match args.output {
        Some(path) => {
            fs::write(&path, output).with_context(|| format!("Failed to write to file: {}", path.display()))?;
            echo::print_success(&format!("Output written to {}", path.display().bright_white()));
        }
        None => {
            println!("{}", output);
        }
    }

    Ok(())
}
