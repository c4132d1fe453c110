//! btdash CLI: inspect backtest results and decision history from the shell.
//!
//! Commands:
//! - `summary`: one-line run summary, trade statistics, best/worst trade
//! - `trades`: one page of the trade table
//! - `chart`: equity curve and win-rate trend as SVG files
//! - `history`: one page of the decision history
//! - `export`: decision history or trades as CSV/JSON

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand, ValueEnum};
use tracing::info;
use tracing_subscriber::EnvFilter;

use btdash_analytics::chart::{RenderOutcome, SvgSurface, Viewport};
use btdash_analytics::export::{self, ExportFormat};
use btdash_analytics::view::{DecisionRow, TradeRow};
use btdash_analytics::{BacktestController, DecisionHistory};
use btdash_core::config::SourceSettings;
use btdash_core::domain::DecisionPage;
use btdash_core::request::HistoryQuery;
use btdash_core::{source, DashboardConfig, ResultSource};

#[derive(Parser)]
#[command(name = "btdash", about = "btdash: backtest analytics and decision history")]
struct Cli {
    #[command(flatten)]
    global: GlobalOpts,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Args)]
struct GlobalOpts {
    /// Path to a TOML config file.
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Read the backtest response from this JSON file instead of the API.
    #[arg(long, global = true)]
    input: Option<PathBuf>,

    /// Read the decision-history page from this JSON file.
    #[arg(long, global = true)]
    history_input: Option<PathBuf>,

    /// Dashboard base URL (overrides the config).
    #[arg(long, global = true)]
    url: Option<String>,

    /// Instrument symbol (overrides the config).
    #[arg(long, global = true)]
    symbol: Option<String>,

    /// Initial equity sent with the backtest request.
    #[arg(long, global = true)]
    equity: Option<String>,

    /// Position size override in USDT.
    #[arg(long, global = true)]
    position_size: Option<String>,

    /// Leverage override.
    #[arg(long, global = true)]
    leverage: Option<String>,

    /// Debug logging.
    #[arg(short, long, global = true, default_value_t = false)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Print the run summary, trade statistics and best/worst trade.
    Summary,
    /// Print one page of the trade table.
    Trades {
        #[arg(long, default_value_t = 1)]
        page: usize,

        /// Rows per page. Defaults to the configured size.
        #[arg(long)]
        page_size: Option<String>,
    },
    /// Render the equity curve and win-rate trend to SVG.
    Chart {
        #[arg(long, default_value = "equity.svg")]
        out: PathBuf,

        #[arg(long, default_value = "win_rate_trend.svg")]
        trend_out: PathBuf,

        /// Container width in display units. Defaults to the configured width.
        #[arg(long)]
        width: Option<f64>,

        /// Device pixel ratio.
        #[arg(long, default_value_t = 1.0)]
        pixel_ratio: f64,
    },
    /// Print one page of the decision history.
    History {
        #[arg(long, default_value_t = 1)]
        page: usize,

        #[arg(long)]
        page_size: Option<String>,
    },
    /// Export decision history or trades.
    Export {
        #[arg(long, value_enum, default_value_t = ExportTarget::Decisions)]
        what: ExportTarget,

        /// csv or json.
        #[arg(long, default_value = "csv")]
        format: String,

        /// Output path. Defaults to decision_history_<symbol>.<ext> or trades.<ext>.
        #[arg(long)]
        out: Option<PathBuf>,
    },
}

#[derive(Clone, Copy, PartialEq, Eq, ValueEnum)]
enum ExportTarget {
    Decisions,
    Trades,
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    let config = load_config(&cli.global)?;
    init_logging(&config.log_level, cli.global.verbose);

    let source = source::from_settings(&config.source).context("failed to build result source")?;
    info!(source = %source.describe(), "source ready");

    match cli.command {
        Commands::Summary => run_summary(&config, source.as_ref()),
        Commands::Trades { page, page_size } => {
            run_trades(&config, source.as_ref(), page, page_size.as_deref())
        }
        Commands::Chart {
            out,
            trend_out,
            width,
            pixel_ratio,
        } => run_chart(&config, source.as_ref(), &out, &trend_out, width, pixel_ratio),
        Commands::History { page, page_size } => {
            run_history(&config, source.as_ref(), page, page_size.as_deref())
        }
        Commands::Export { what, format, out } => {
            let format: ExportFormat = format.parse()?;
            run_export(&config, source.as_ref(), what, format, out)
        }
    }
}

/// Config file first, then command-line overrides.
fn load_config(opts: &GlobalOpts) -> Result<DashboardConfig> {
    let mut config = DashboardConfig::load_or_default(opts.config.as_deref())?;
    apply_overrides(&mut config.source, opts);
    config.validate()?;
    Ok(config)
}

fn apply_overrides(settings: &mut SourceSettings, opts: &GlobalOpts) {
    if let Some(url) = &opts.url {
        settings.base_url = url.clone();
    }
    if let Some(path) = &opts.input {
        settings.backtest_file = Some(path.clone());
    }
    if let Some(path) = &opts.history_input {
        settings.history_file = Some(path.clone());
    }
    if let Some(symbol) = &opts.symbol {
        settings.symbol = symbol.clone();
    }
    // Reparse through the form rules: bad equity falls back, non-positive
    // size and leverage are dropped.
    let query = btdash_core::request::BacktestQuery::from_inputs(
        &settings.symbol,
        opts.equity
            .clone()
            .unwrap_or_else(|| settings.initial_equity.to_string())
            .as_str(),
        opts.position_size
            .clone()
            .or_else(|| settings.position_size.map(|v| v.to_string()))
            .unwrap_or_default()
            .as_str(),
        opts.leverage
            .clone()
            .or_else(|| settings.leverage.map(|v| v.to_string()))
            .unwrap_or_default()
            .as_str(),
    );
    settings.initial_equity = query.initial_equity;
    settings.position_size = query.position_size;
    settings.leverage = query.leverage;
}

fn init_logging(level: &str, verbose: bool) {
    let level = if verbose { "debug" } else { level };
    let filter_str = format!("{level},hyper=warn,hyper_util=warn,reqwest=warn");
    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&filter_str));
    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

// ─── Commands ───────────────────────────────────────────────────────

fn load_run(config: &DashboardConfig, source: &dyn ResultSource) -> Result<BacktestController> {
    let query = config.source.backtest_query();
    let response = source
        .backtest(&query)
        .with_context(|| format!("failed to fetch backtest for {}", query.symbol))?;
    let mut controller = BacktestController::new(config);
    controller.load(response).context("backtest was rejected")?;
    Ok(controller)
}

fn load_history(
    config: &DashboardConfig,
    source: &dyn ResultSource,
    page: usize,
    page_size: Option<&str>,
) -> Result<DecisionHistory> {
    let mut history = DecisionHistory::new(
        config.source.symbol.clone(),
        config.tables.history_page_size,
    );
    if let Some(raw) = page_size {
        history.set_page_size_str(raw);
    }
    // The total is unknown until the first page arrives; ask for the
    // requested page directly.
    let mut query = history.query();
    query.page = page.max(1);
    let response = fetch_history(source, &query)?;
    history
        .apply_page_at(query.page, response)
        .context("decision history was rejected")?;

    // Past the last page: show the last page instead of an empty one.
    if history.pages().page() != query.page {
        let query = history.query();
        let response = fetch_history(source, &query)?;
        history.apply_page(response).context("decision history was rejected")?;
    }
    Ok(history)
}

fn fetch_history(source: &dyn ResultSource, query: &HistoryQuery) -> Result<DecisionPage> {
    source
        .history(query)
        .with_context(|| format!("failed to fetch decision history page {}", query.page))
}

fn run_summary(config: &DashboardConfig, source: &dyn ResultSource) -> Result<()> {
    let controller = load_run(config, source)?;

    println!();
    println!("{}", controller.summary_line().unwrap_or_default());
    println!();
    if let Some(panel) = controller.stats_panel() {
        println!("--- Trade Statistics ---");
        for (label, value) in panel.rows() {
            println!("{label:<18}{value}");
        }
        println!();
    }
    println!("--- Best Trade ---");
    for line in controller.best_trade_lines() {
        println!("{line}");
    }
    println!();
    println!("--- Worst Trade ---");
    for line in controller.worst_trade_lines() {
        println!("{line}");
    }
    println!();
    Ok(())
}

fn run_trades(
    config: &DashboardConfig,
    source: &dyn ResultSource,
    page: usize,
    page_size: Option<&str>,
) -> Result<()> {
    let mut controller = load_run(config, source)?;
    if let Some(raw) = page_size {
        controller.set_page_size_str(raw);
    }
    for _ in 1..page {
        if !controller.next_page() {
            break;
        }
    }

    if let Some(notice) = controller.empty_notice() {
        println!("{notice}");
    } else {
        print_table(&TradeRow::HEADERS, controller.page_rows().iter().map(|r| r.cells().to_vec()));
    }
    println!("{}", controller.page_info());
    Ok(())
}

fn run_chart(
    config: &DashboardConfig,
    source: &dyn ResultSource,
    out: &Path,
    trend_out: &Path,
    width: Option<f64>,
    pixel_ratio: f64,
) -> Result<()> {
    let controller = load_run(config, source)?;

    let viewport = |default: Viewport| {
        Viewport::new(width.unwrap_or(default.width), default.height).with_pixel_ratio(pixel_ratio)
    };

    let mut equity = SvgSurface::new();
    let outcome = controller.render_equity(
        Some(&mut equity),
        viewport(controller.equity_renderer().default_viewport()),
    );
    write_chart(out, &equity, outcome)?;

    let mut trend = SvgSurface::new();
    let outcome = controller.render_trend(
        Some(&mut trend),
        viewport(controller.trend_renderer().default_viewport()),
    );
    write_chart(trend_out, &trend, outcome)?;
    Ok(())
}

fn write_chart(path: &Path, surface: &SvgSurface, outcome: RenderOutcome) -> Result<()> {
    if outcome == RenderOutcome::Failed {
        println!("Skipped {}: render failed (see log)", path.display());
        return Ok(());
    }
    std::fs::write(path, surface.to_document())
        .with_context(|| format!("failed to write {}", path.display()))?;
    println!("Wrote {} ({outcome:?})", path.display());
    Ok(())
}

fn run_history(
    config: &DashboardConfig,
    source: &dyn ResultSource,
    page: usize,
    page_size: Option<&str>,
) -> Result<()> {
    let history = load_history(config, source, page, page_size)?;

    if let Some(card) = history.latest() {
        println!();
        println!("Latest: {} (confidence {}) size {}", card.action, card.confidence, card.size);
        println!("        {}", card.tp_sl);
        println!("        {}", card.reason);
        println!();
    }
    if let Some(notice) = history.empty_notice() {
        println!("{notice}");
    } else {
        print_table(&DecisionRow::HEADERS, history.rows().iter().map(|r| r.cells().to_vec()));
    }
    println!("{}", history.page_info());
    Ok(())
}

fn run_export(
    config: &DashboardConfig,
    source: &dyn ResultSource,
    what: ExportTarget,
    format: ExportFormat,
    out: Option<PathBuf>,
) -> Result<()> {
    match what {
        ExportTarget::Decisions => {
            let symbol = &config.source.symbol;
            let records = source
                .all_history(symbol)
                .with_context(|| format!("failed to fetch decision history for {symbol}"))?;
            let path = out.unwrap_or_else(|| {
                PathBuf::from(export::default_file_name(Some(symbol), format))
            });
            export::write_decisions(&records, format, &path)?;
            println!("Exported {} decisions to {}", records.len(), path.display());
        }
        ExportTarget::Trades => {
            let controller = load_run(config, source)?;
            let path =
                out.unwrap_or_else(|| PathBuf::from(format!("trades.{}", format.extension())));
            export::write_trades(controller.trades(), format, &path)?;
            println!("Exported {} trades to {}", controller.trades().len(), path.display());
        }
    }
    Ok(())
}

// ─── Output ─────────────────────────────────────────────────────────

/// Left-aligned columns sized to their widest cell.
fn print_table<'a>(headers: &[&str], rows: impl Iterator<Item = Vec<&'a str>>) {
    let rows: Vec<Vec<&str>> = rows.collect();
    let widths: Vec<usize> = headers
        .iter()
        .enumerate()
        .map(|(i, h)| {
            rows.iter()
                .filter_map(|r| r.get(i))
                .map(|c| c.chars().count())
                .max()
                .unwrap_or(0)
                .max(h.chars().count())
        })
        .collect();

    let line = |cells: &[&str]| {
        cells
            .iter()
            .zip(&widths)
            .map(|(c, &w)| format!("{c:<w$}"))
            .collect::<Vec<_>>()
            .join("  ")
    };
    println!("{}", line(headers));
    println!("{}", "-".repeat(widths.iter().sum::<usize>() + 2 * widths.len().saturating_sub(1)));
    for row in &rows {
        println!("{}", line(row.as_slice()));
    }
}
