//! SectorScan CLI: theme screening for Taiwan listed stocks.
//!
//! Commands:
//! - `screen`: rank one theme's constituents and write the report files
//! - `themes`: list the known themes, their aliases and seed symbols

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use chrono::NaiveDate;
use clap::{Parser, Subcommand};
use tracing::{debug, info};
use tracing_subscriber::EnvFilter;

use sectorscan_core::ThemeRegistry;
use sectorscan_runner::{
    run_screen, write_reports, HttpFetcher, MarketDataProvider, ReportFormat, ScreenConfig,
    ScreenParams, SyntheticProvider, TwMarketProvider,
};

#[derive(Parser)]
#[command(
    name = "sectorscan",
    about = "SectorScan: theme-based multi-factor screener for TWSE / TPEx stocks"
)]
struct Cli {
    /// Raise log verbosity (-v info, -vv debug). RUST_LOG takes precedence.
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Screen one theme and write the report files.
    Screen(ScreenArgs),
    /// List themes, aliases and seed symbols.
    Themes {
        /// Theme registry TOML. Defaults to the built-in themes.
        #[arg(long)]
        themes: Option<PathBuf>,
    },
}

#[derive(clap::Args)]
struct ScreenArgs {
    /// Theme name or alias (e.g. 半導體, 記憶體, AI).
    #[arg(long)]
    theme: Option<String>,

    /// Analysis date (YYYY-MM-DD). Defaults to today.
    #[arg(long)]
    as_of: Option<NaiveDate>,

    /// Number of picks to report.
    #[arg(long)]
    top_n: Option<usize>,

    /// Largest-revenue candidates to fetch and score.
    #[arg(long)]
    universe_limit: Option<usize>,

    /// Minimum latest monthly revenue.
    #[arg(long)]
    min_monthly_revenue: Option<f64>,

    /// Trading days of price history per candidate.
    #[arg(long)]
    lookback: Option<usize>,

    /// HTTP timeout in seconds.
    #[arg(long)]
    timeout: Option<f64>,

    /// Output directory for report files.
    #[arg(long)]
    output_dir: Option<PathBuf>,

    /// Comma-separated report formats: md, json, csv.
    #[arg(long, value_delimiter = ',')]
    format: Vec<ReportFormat>,

    /// Run configuration TOML; flags override its values.
    #[arg(long)]
    config: Option<PathBuf>,

    /// Theme registry TOML. Defaults to the built-in themes.
    #[arg(long)]
    themes: Option<PathBuf>,

    /// Capital used to print suggested share counts.
    #[arg(long)]
    capital: Option<f64>,

    /// Use deterministic synthetic data instead of the exchanges.
    #[arg(long, default_value_t = false)]
    synthetic: bool,
}

fn main() {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let outcome = match cli.command {
        Commands::Screen(args) => run_screen_cmd(args),
        Commands::Themes { themes } => run_themes_cmd(themes.as_deref()),
    };

    if let Err(e) = outcome {
        eprintln!("[sectorscan] error: {e:#}");
        std::process::exit(1);
    }
}

fn init_tracing(verbose: u8) {
    let default_level = match verbose {
        0 => "warn",
        1 => "info",
        _ => "debug",
    };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level)),
        )
        .with_writer(std::io::stderr)
        .init();
}

fn load_registry(path: Option<&Path>) -> Result<ThemeRegistry> {
    let Some(path) = path else {
        return Ok(ThemeRegistry::builtin());
    };
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("reading theme registry {}", path.display()))?;
    let registry = ThemeRegistry::from_toml(&content)
        .with_context(|| format!("parsing theme registry {}", path.display()))?;
    debug!(path = %path.display(), themes = registry.theme_names().len(), "theme registry loaded");
    Ok(registry)
}

/// File configuration with command-line overrides applied.
fn resolve_config(args: &ScreenArgs) -> Result<ScreenConfig> {
    let mut config = match &args.config {
        Some(path) => ScreenConfig::from_file(path)?,
        None => ScreenConfig::default(),
    };

    let screen = &mut config.screen;
    if let Some(theme) = &args.theme {
        screen.theme = Some(theme.clone());
    }
    if args.as_of.is_some() {
        screen.as_of = args.as_of;
    }
    if let Some(n) = args.top_n {
        screen.top_n = n;
    }
    if let Some(n) = args.universe_limit {
        screen.universe_limit = n;
    }
    if let Some(v) = args.min_monthly_revenue {
        screen.min_monthly_revenue = v;
    }
    if let Some(n) = args.lookback {
        screen.lookback = n;
    }
    if args.capital.is_some() {
        screen.capital = args.capital;
    }
    if let Some(t) = args.timeout {
        config.http.timeout_secs = t;
    }
    if let Some(dir) = &args.output_dir {
        config.output.dir = dir.clone();
    }
    if !args.format.is_empty() {
        config.output.formats = args.format.clone();
    }

    config.validate()?;
    Ok(config)
}

fn run_screen_cmd(args: ScreenArgs) -> Result<()> {
    let config = resolve_config(&args)?;
    let registry = load_registry(args.themes.as_deref())?;
    let params = ScreenParams::from_config(&config, chrono::Local::now().date_naive())?;

    let provider: Box<dyn MarketDataProvider> = if args.synthetic {
        info!("using synthetic data");
        Box::new(SyntheticProvider::from_registry(&registry))
    } else {
        let fetcher = HttpFetcher::new(config.http.timeout()?, config.http.max_attempts)?;
        Box::new(TwMarketProvider::new(fetcher))
    };

    let report = run_screen(provider.as_ref(), &registry, &params)?;
    info!(
        picks = report.picks.len(),
        scored = report.scored_count,
        warnings = report.warnings.len(),
        "screen finished"
    );

    let paths = write_reports(&report, &config.output.dir, &config.output.formats)?;
    for path in paths {
        println!("[sectorscan] report: {}", path.display());
    }
    Ok(())
}

fn run_themes_cmd(themes: Option<&Path>) -> Result<()> {
    let registry = load_registry(themes)?;

    for name in registry.theme_names() {
        let rule = registry.rule(name);
        println!("{name}");
        println!("  industry keywords: {}", join_or_dash(&rule.industry_keywords));
        println!("  name keywords:     {}", join_or_dash(&rule.name_keywords));
        println!("  seed symbols:      {}", join_or_dash(&rule.seed_symbols));
    }

    let aliases: Vec<String> = registry
        .aliases()
        .map(|(alias, target)| format!("{alias} -> {target}"))
        .collect();
    if !aliases.is_empty() {
        println!();
        println!("Aliases:");
        for line in aliases {
            println!("  {line}");
        }
    }
    Ok(())
}

fn join_or_dash(items: &[String]) -> String {
    if items.is_empty() {
        "-".to_string()
    } else {
        items.join(", ")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(args: &[&str]) -> ScreenArgs {
        let cli = Cli::try_parse_from(args).unwrap();
        match cli.command {
            Commands::Screen(a) => a,
            Commands::Themes { .. } => panic!("expected screen"),
        }
    }

    #[test]
    fn flags_override_defaults() {
        let args = parse(&[
            "sectorscan",
            "screen",
            "--theme",
            "記憶體",
            "--as-of",
            "2026-02-20",
            "--top-n",
            "5",
            "--format",
            "md,json,csv",
            "--capital",
            "1000000",
        ]);
        let config = resolve_config(&args).unwrap();
        assert_eq!(config.screen.theme.as_deref(), Some("記憶體"));
        assert_eq!(config.screen.as_of, NaiveDate::from_ymd_opt(2026, 2, 20));
        assert_eq!(config.screen.top_n, 5);
        assert_eq!(config.screen.universe_limit, 60);
        assert_eq!(
            config.output.formats,
            vec![ReportFormat::Md, ReportFormat::Json, ReportFormat::Csv]
        );
        assert_eq!(config.screen.capital, Some(1_000_000.0));
    }

    #[test]
    fn missing_theme_is_rejected() {
        let args = parse(&["sectorscan", "screen"]);
        assert!(resolve_config(&args).is_err());
    }

    #[test]
    fn unknown_format_fails_to_parse() {
        assert!(Cli::try_parse_from(["sectorscan", "screen", "--format", "pdf"]).is_err());
    }

    #[test]
    fn verbose_is_global() {
        let cli = Cli::try_parse_from(["sectorscan", "themes", "-vv"]).unwrap();
        assert_eq!(cli.verbose, 2);
    }

    #[test]
    fn builtin_registry_without_path() {
        let registry = load_registry(None).unwrap();
        assert!(registry.is_known("memory"));
    }
}
