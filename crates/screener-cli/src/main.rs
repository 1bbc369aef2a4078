//! screener-cli: run one sector screen over a JSON file of stock records.
//!
//! The input file holds an array of stock records (missing fields are
//! treated as unknown). Ranked results are printed to stdout as JSON.
//!
//! Usage:
//!   screener-cli --input stocks.json --sector Technology
//!   screener-cli --input stocks.json --sector Finance --preset --top 5
//!   screener-cli --input stocks.json --sector Healthcare --min-roe 12 --require-positive-net-income

use anyhow::{bail, Context, Result};
use screening_core::{CriteriaOverrides, ScreeningCriteria, StockRecord};
use sector_screener::{criteria_with_overrides, top_n, ScreenerConfig, SectorScreener};

const DEFAULT_TOP: usize = 10;

#[derive(Debug, Clone, PartialEq)]
struct CliArgs {
    input: String,
    sector: String,
    use_preset: bool,
    overrides: CriteriaOverrides,
    top: usize,
}

fn flag_value<'a>(args: &'a [String], flag: &str) -> Option<&'a str> {
    args.iter()
        .position(|a| a == flag)
        .and_then(|i| args.get(i + 1))
        .map(|s| s.as_str())
}

fn parse_number(args: &[String], flag: &str) -> Result<Option<f64>> {
    flag_value(args, flag)
        .map(|v| {
            v.parse::<f64>()
                .with_context(|| format!("{} expects a number, got '{}'", flag, v))
        })
        .transpose()
}

fn parse_args(args: &[String]) -> Result<CliArgs> {
    let Some(input) = flag_value(args, "--input") else {
        bail!("--input FILE is required");
    };
    let Some(sector) = flag_value(args, "--sector") else {
        bail!("--sector NAME is required");
    };

    let top = match flag_value(args, "--top") {
        Some(v) => v
            .parse()
            .with_context(|| format!("--top expects a count, got '{}'", v))?,
        None => DEFAULT_TOP,
    };

    let overrides = CriteriaOverrides {
        min_roe: parse_number(args, "--min-roe")?,
        max_pe_multiplier: parse_number(args, "--max-pe-multiplier")?,
        min_revenue_growth: parse_number(args, "--min-revenue-growth")?,
        max_debt_to_equity: parse_number(args, "--max-debt-to-equity")?,
        require_positive_net_income: args
            .iter()
            .any(|a| a == "--require-positive-net-income")
            .then_some(true),
        ..Default::default()
    };

    Ok(CliArgs {
        input: input.to_string(),
        sector: sector.to_string(),
        use_preset: args.iter().any(|a| a == "--preset"),
        overrides,
        top,
    })
}

fn build_criteria(cli: &CliArgs) -> ScreeningCriteria {
    if cli.use_preset {
        criteria_with_overrides(&cli.sector, cli.overrides.clone())
    } else {
        cli.overrides.apply(ScreeningCriteria::new(cli.sector.as_str()))
    }
}

/// Decode a JSON array of stock records. Elements that do not decode as a
/// record are skipped so one bad row cannot sink the whole file.
fn parse_records(raw: &str) -> Result<Vec<StockRecord>> {
    let values: Vec<serde_json::Value> =
        serde_json::from_str(raw).context("input is not a JSON array")?;

    let mut skipped = 0usize;
    let stocks: Vec<StockRecord> = values
        .into_iter()
        .enumerate()
        .filter_map(|(i, value)| match serde_json::from_value(value) {
            Ok(stock) => Some(stock),
            Err(e) => {
                tracing::warn!("Skipping record {}: {}", i, e);
                skipped += 1;
                None
            }
        })
        .collect();

    if skipped > 0 {
        tracing::warn!("Skipped {} malformed stock records", skipped);
    }
    Ok(stocks)
}

fn print_usage() {
    eprintln!("Usage:");
    eprintln!("  screener-cli --input FILE --sector NAME [options]");
    eprintln!();
    eprintln!("Options:");
    eprintln!("  --preset                         Start from the sector's preset criteria");
    eprintln!("  --min-roe X                      Minimum return on equity (percent)");
    eprintln!("  --max-pe-multiplier X            P/E ceiling as a multiple of the sector mean");
    eprintln!("  --min-revenue-growth X           Minimum revenue growth (percent)");
    eprintln!("  --max-debt-to-equity X           Debt-to-equity ceiling");
    eprintln!("  --require-positive-net-income    Reject unprofitable stocks");
    eprintln!("  --top N                          Number of results to print (default: {})", DEFAULT_TOP);
}

fn main() -> Result<()> {
    dotenvy::dotenv().ok();

    let json_logging = std::env::var("RUST_LOG_FORMAT")
        .map(|v| v.eq_ignore_ascii_case("json"))
        .unwrap_or(false);
    if json_logging {
        tracing_subscriber::fmt()
            .json()
            .with_writer(std::io::stderr)
            .with_env_filter(
                tracing_subscriber::EnvFilter::try_from_default_env()
                    .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
            )
            .init();
    } else {
        tracing_subscriber::fmt()
            .with_writer(std::io::stderr)
            .with_env_filter(
                tracing_subscriber::EnvFilter::try_from_default_env()
                    .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
            )
            .init();
    }

    let args: Vec<String> = std::env::args().collect();
    let cli = match parse_args(&args) {
        Ok(cli) => cli,
        Err(e) => {
            eprintln!("{}", e);
            print_usage();
            std::process::exit(1);
        }
    };

    let config = ScreenerConfig::from_env()?;
    let screener = SectorScreener::with_config(config);

    let raw = std::fs::read_to_string(&cli.input)
        .with_context(|| format!("Failed to read {}", cli.input))?;
    let stocks = parse_records(&raw).with_context(|| format!("Failed to load {}", cli.input))?;
    tracing::info!("Loaded {} stock records from {}", stocks.len(), cli.input);

    let criteria = build_criteria(&cli);
    let results = screener.screen_stocks(&criteria, &stocks)?;

    if results.is_empty() {
        tracing::info!("No opportunities found in {}", criteria.sector);
    }

    let top = top_n(&results, cli.top);
    println!("{}", serde_json::to_string_pretty(&top)?);

    Ok(())
}
