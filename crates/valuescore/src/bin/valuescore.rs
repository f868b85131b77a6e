//! Value-investing scoring CLI.
//!
//! Usage:
//!
//! ```bash
//! valuescore update
//! valuescore score --top 20
//! valuescore portfolio --budget 10000000 --top 10
//! valuescore portfolio --budget 5000000 005930 000660
//! ```

use std::{path::PathBuf, time::Duration};

use anyhow::{Context, Result, bail};
use chrono::Local;
use clap::{Args, Parser, Subcommand};
use tracing::info;
use tracing_subscriber::EnvFilter;
use valuescore::{
    cache::{CacheBuilder, CacheConfig, FinancialCache},
    model::{PortfolioConstructor, ScoreBoard, ScoringContext, ScoringEngine, fetch_basket},
    primitives::{AssetStats, Date, Listing, Ticker},
    sources::{FnGuideClient, FnGuideConfig, KrxClient, KrxConfig, YahooConfig, YahooPriceHistory},
    traits::MarketDataSource,
    utils::{allocation_frame, results_file_name, score_frame, score_summary, write_csv},
};

/// Rank KOSPI/KOSDAQ companies on value rubrics and build Sharpe-weighted
/// portfolios.
#[derive(Debug, Parser)]
#[command(name = "valuescore", version, about)]
struct Cli {
    #[command(flatten)]
    options: Options,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Args)]
struct Options {
    /// Directory holding the statement cache and results files.
    #[arg(long, global = true, env = "VALUESCORE_DATA_DIR", default_value = "data")]
    data_dir: PathBuf,

    /// Market cap floor of the universe, in hundred-million KRW.
    #[arg(long, global = true, env = "VALUESCORE_MIN_MARKET_CAP", default_value_t = ScoringContext::DEFAULT_MIN_MARKET_CAP)]
    min_market_cap: f64,

    /// Pause between statement requests, in milliseconds.
    #[arg(long, global = true, env = "VALUESCORE_REQUEST_DELAY_MS", default_value_t = 200)]
    request_delay_ms: u64,

    /// HTTP request timeout, in seconds.
    #[arg(long, global = true, env = "VALUESCORE_HTTP_TIMEOUT_SECS", default_value_t = 30)]
    http_timeout_secs: u64,

    /// Yahoo Finance symbol of the benchmark index.
    #[arg(long, global = true, env = "VALUESCORE_BENCHMARK", default_value = "^KS11")]
    benchmark: String,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Snapshot the market and rebuild the statement cache.
    Update,
    /// Score the universe against the cache and save the ranked table.
    Score {
        /// Rows of the ranked table to print.
        #[arg(long, default_value_t = 20)]
        top: usize,
    },
    /// Allocate a budget across a basket of tickers.
    Portfolio {
        /// Amount to invest, in KRW.
        #[arg(long)]
        budget: f64,
        /// Use the top N tickers of a fresh scoring run.
        #[arg(long, default_value_t = 10, conflicts_with = "tickers")]
        top: usize,
        /// Explicit basket tickers.
        tickers: Vec<String>,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("valuescore=info")),
        )
        .init();

    let cli = Cli::parse();
    let today = Local::now().date_naive();

    match cli.command {
        Command::Update => update(&cli.options, today).await,
        Command::Score { top } => score(&cli.options, today, top).await,
        Command::Portfolio { budget, top, tickers } => {
            portfolio(&cli.options, today, budget, top, &tickers).await
        }
    }
}

/// Market snapshot of the latest trading day on or before `today`.
async fn market_context(options: &Options, today: Date) -> Result<ScoringContext> {
    let krx = KrxClient::with_config(KrxConfig {
        timeout: Duration::from_secs(options.http_timeout_secs),
        ..KrxConfig::default()
    })?;
    let snapshot = krx.snapshot(today).await.context("failed to fetch the market snapshot")?;
    let ctx = ScoringContext::new(snapshot, options.min_market_cap);
    info!(date = %ctx.date(), universe = ctx.universe().len(), "market snapshot ready");
    Ok(ctx)
}

async fn update(options: &Options, today: Date) -> Result<()> {
    let ctx = market_context(options, today).await?;

    let fnguide = FnGuideClient::with_config(FnGuideConfig {
        timeout: Duration::from_secs(options.http_timeout_secs),
        ..FnGuideConfig::default()
    })?;
    let builder = CacheBuilder::with_config(
        fnguide,
        CacheConfig {
            request_delay: Duration::from_millis(options.request_delay_ms),
            ..CacheConfig::default()
        },
    );

    println!("Updating financial statements for {} tickers...", ctx.universe().len());
    let build = builder.build(ctx.universe()).await.context("statement cache build aborted")?;
    build
        .cache
        .save(&options.data_dir)
        .with_context(|| format!("failed to save the cache to {}", options.data_dir.display()))?;

    info!(
        cached = build.cache.len(),
        skipped = build.skipped.len(),
        dir = %options.data_dir.display(),
        "statement cache saved"
    );
    Ok(())
}

async fn score_board(options: &Options, today: Date) -> Result<(ScoringContext, ScoreBoard)> {
    let cache = FinancialCache::load(&options.data_dir).with_context(|| {
        format!("failed to load the cache from {}; run `valuescore update` first", options.data_dir.display())
    })?;
    let ctx = market_context(options, today).await?;
    let board = ScoringEngine::new().score_universe(&ctx, &cache);
    info!(scored = board.len(), skipped = board.skipped().len(), "universe scored");
    Ok((ctx, board))
}

async fn score(options: &Options, today: Date, top: usize) -> Result<()> {
    let (_, board) = score_board(options, today).await?;

    let mut frame = score_frame(board.rows())?;
    println!("{}", score_summary(&frame)?);
    println!("{}", score_frame(board.top(top))?);

    let path = options.data_dir.join(results_file_name(today));
    write_csv(&mut frame, &path)?;
    println!("Saved {}", path.display());
    Ok(())
}

fn stats_line(label: &str, stats: &AssetStats) -> String {
    format!(
        "{label} (90-day) return: {:.2}% / volatility: {:.3} / sharpe: {:.3}",
        stats.expected_return * 100.0,
        stats.volatility,
        stats.sharpe
    )
}

async fn portfolio(
    options: &Options,
    today: Date,
    budget: f64,
    top: usize,
    tickers: &[String],
) -> Result<()> {
    if !(budget.is_finite() && budget > 0.0) {
        bail!("budget must be a positive amount, got {budget}");
    }

    let listings: Vec<Listing> = if tickers.is_empty() {
        let (ctx, board) = score_board(options, today).await?;
        board
            .top(top)
            .iter()
            .filter_map(|row| ctx.snapshot().listing(&row.ticker))
            .collect()
    } else {
        let ctx = market_context(options, today).await?;
        tickers
            .iter()
            .map(|t| {
                let ticker = Ticker::new(t.as_str());
                ctx.snapshot()
                    .listing(&ticker)
                    .with_context(|| format!("ticker {ticker} is not listed on {}", ctx.date()))
            })
            .collect::<Result<_>>()?
    };
    if listings.is_empty() {
        bail!("no tickers to build a portfolio from");
    }

    let history = YahooPriceHistory::with_config(YahooConfig { benchmark: options.benchmark.clone() })?;
    let constructor = PortfolioConstructor::new();
    let basket = fetch_basket(&history, &listings, today, constructor.config().lookback_days)
        .await
        .context("failed to fetch price history")?;
    let report = constructor.construct(&basket, budget)?;

    println!("{}", stats_line("Benchmark", &report.benchmark));
    println!("{}", stats_line("Portfolio", &report.portfolio));
    println!("{}", allocation_frame(&report)?);
    println!("Invested {:.0} of {budget:.0} KRW", report.invested());
    Ok(())
}
