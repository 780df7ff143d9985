//! # Fund Monitor
//!
//! Single-shot command line front end: loads `global_config.json`, polls the
//! requested targets one after the other and logs one line per result.
//! Failures are logged as warnings with their kind and never abort the run.

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use static_init::dynamic;
use tracing::{error, info, warn};

use lib_monitor::configs::{load_monitor_config, resolve_config_path, MonitorConfig};
use lib_monitor::loggers::logsetup::{setup_logging, LogOptions};
use lib_monitor::markets::eastmoney::{ApiCallEastmoney, CatalogStore, EastmoneyEndpoints, FundMonitor};
use lib_monitor::markets::sina::apicall::QUOTE_BASE;
use lib_monitor::markets::sina::{SinaQuoteSource, StockMonitor, StockTargets};
use lib_monitor::markets::MarketError;
use lib_monitor::utils::misc::sys_info::{
    get_process_info, take_resource_snapshot, ProcessInfo, ProcessInfoError,
};

#[dynamic]
static PROCESSINFO: Result<ProcessInfo, ProcessInfoError> = get_process_info();

#[derive(Parser, Debug)]
#[command(name = "fund_monitor", version, about = "Fund valuation, stock quote and system status monitor")]
struct Cli {
    /// Path to global_config.json. Defaults to $CONFIGS_LOCATION/global_config.json,
    /// then config/global_config.json.
    #[arg(short, long, env = "MONITOR_CONFIG")]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Fund valuation estimates; the configured target_fund when no codes are given.
    Funds { codes: Vec<String> },
    /// Stock quotes; the configured target_stock when no codes are given.
    Stocks { codes: Vec<String> },
    /// Quotes of the configured target_index.
    Index,
    /// Quotes of the configured target_mao basket.
    Mao,
    /// CPU and memory usage.
    System,
    /// Download the bulk fund listing and rewrite the catalog file.
    RefreshCatalog,
    /// Funds, stocks, indices, the mao basket and system usage.
    All,
}

fn eastmoney_endpoints(config: &MonitorConfig) -> EastmoneyEndpoints {
    let defaults = EastmoneyEndpoints::default();
    EastmoneyEndpoints {
        listing_base: config
            .endpoints
            .fund_listing_base
            .clone()
            .unwrap_or(defaults.listing_base),
        estimate_base: config
            .endpoints
            .fund_estimate_base
            .clone()
            .unwrap_or(defaults.estimate_base),
    }
}

fn build_fund_monitor(config: &MonitorConfig) -> Result<FundMonitor> {
    let api_call = ApiCallEastmoney::new(&eastmoney_endpoints(config), config.max_retries)
        .context("Failed to build the Eastmoney client")?;
    Ok(FundMonitor::new(
        api_call,
        CatalogStore::new(&config.total_fund_path),
        config.target_fund.clone(),
    ))
}

fn build_stock_monitor(config: &MonitorConfig) -> Result<StockMonitor<SinaQuoteSource>> {
    let base = config.endpoints.quote_base.as_deref().unwrap_or(QUOTE_BASE);
    let source = SinaQuoteSource::new(base, config.max_retries)
        .context("Failed to build the Sina quote client")?;
    Ok(StockMonitor::new(
        source,
        StockTargets {
            stock: config.target_stock.clone(),
            index: config.target_index.clone(),
            mao: config.target_mao.clone(),
        },
    ))
}

fn warn_failure(target: &str, e: &MarketError) {
    warn!(
        target_name = target,
        kind = ?e.kind(),
        retryable = e.is_retryable(),
        "{} lookup failed: {}",
        target,
        e
    );
}

fn log_quote_lines(group: &str, result: Result<Vec<String>, MarketError>) {
    match result {
        Ok(lines) => lines.iter().for_each(|line| info!("{}", line)),
        Err(e) => warn_failure(group, &e),
    }
}

async fn report_funds(monitor: &mut FundMonitor, codes: &[String]) {
    let targets = if codes.is_empty() { None } else { Some(codes) };
    for (code, result) in monitor.fund_lines(targets).await {
        match result {
            Ok(line) => info!("{}", line),
            Err(e) => warn_failure(&format!("基金代码 {}", code), &e),
        }
    }
}

async fn report_system() {
    let snapshot = take_resource_snapshot().await;
    info!("{}", snapshot.status_line());
}

async fn run(command: Command, config_path: PathBuf) -> Result<()> {
    let load_config = || {
        load_monitor_config(&config_path)
            .with_context(|| format!("Failed to load config {}", config_path.display()))
    };

    match command {
        Command::System => report_system().await,
        Command::Funds { codes } => {
            let mut funds = build_fund_monitor(&load_config()?)?;
            report_funds(&mut funds, &codes).await;
        }
        Command::Stocks { codes } => {
            let stocks = build_stock_monitor(&load_config()?)?;
            let result = if codes.is_empty() {
                stocks.stock_lines().await
            } else {
                stocks.quote_lines(&codes).await
            };
            log_quote_lines("stocks", result);
        }
        Command::Index => {
            let stocks = build_stock_monitor(&load_config()?)?;
            log_quote_lines("index", stocks.index_lines().await);
        }
        Command::Mao => {
            let stocks = build_stock_monitor(&load_config()?)?;
            log_quote_lines("mao", stocks.mao_lines().await);
        }
        Command::RefreshCatalog => {
            let mut funds = build_fund_monitor(&load_config()?)?;
            if let Err(e) = funds.refresh_catalog().await {
                warn_failure("fund catalog", &e);
            }
        }
        Command::All => {
            let config = load_config()?;
            info!("----- 开始一次调查 -----");
            let mut funds = build_fund_monitor(&config)?;
            report_funds(&mut funds, &[]).await;

            let stocks = build_stock_monitor(&config)?;
            log_quote_lines("stocks", stocks.stock_lines().await);
            log_quote_lines("index", stocks.index_lines().await);
            log_quote_lines("mao", stocks.mao_lines().await);

            report_system().await;
            info!("----- 完成一次调查 -----");
        }
    }

    Ok(())
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();
    let cli = Cli::parse();

    let basename = match &*PROCESSINFO {
        Ok(info) => info.process_basename.clone(),
        Err(_) => "fund_monitor".to_string(),
    };
    let _guard = setup_logging(&LogOptions::from_env(&basename))
        .context("Failed to initialize logging")?;

    match &*PROCESSINFO {
        Ok(process_info) => info!("{}", process_info),
        Err(e) => error!("Failed to retrieve process info: {}", e),
    }

    let config_path = resolve_config_path(cli.config.as_deref());
    run(cli.command.unwrap_or(Command::All), config_path).await
}
