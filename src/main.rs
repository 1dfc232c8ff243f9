use std::path::PathBuf;
use std::sync::Arc;

use anyhow::bail;
use chrono::NaiveDate;
use clap::{Parser, Subcommand};
use rust_decimal::Decimal;
use tracing_subscriber::EnvFilter;

use fundfolio::constants::DEFAULT_PLAN_PRECISION;
use fundfolio::db;
use fundfolio::holdings::{HoldingsService, HoldingsServiceTrait};
use fundfolio::instruments::{
    InstrumentService, InstrumentServiceTrait, InstrumentUpdate, NewInstrument,
};
use fundfolio::market_data::{
    MarketDataService, MarketDataServiceTrait, MarketMap, YahooProvider,
};
use fundfolio::planner::{Plan, PlanMode, PlannerService};
use fundfolio::transactions::{NewTransaction, TransactionService};

#[derive(Parser, Debug)]
#[command(name = "fundfolio", version, about = "ETF portfolio tracker with target-allocation buy planning")]
struct Cli {
    /// SQLite database file
    #[arg(long, default_value = "portfolio.db", global = true)]
    db: String,

    /// JSON file with extra market-code suffix mappings and ticker overrides
    #[arg(long, value_name = "FILE", global = true)]
    market_map: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Register an instrument with a target allocation percentage
    Add {
        ticker: String,
        target_pct: Decimal,
        /// Only allow whole-unit buys for this instrument
        #[arg(long)]
        no_fractions: bool,
    },
    /// Change an instrument's target percentage or fractional support
    Edit {
        id: String,
        #[arg(long)]
        target_pct: Option<Decimal>,
        #[arg(long)]
        fractions: Option<bool>,
    },
    /// Delete an instrument and its transactions
    Remove { id: String },
    /// Show the portfolio dashboard
    List,
    /// Record a buy transaction
    Buy {
        id: String,
        price: Decimal,
        shares: Decimal,
        #[arg(long, default_value = "0")]
        commission: Decimal,
        /// Transaction date (YYYY-MM-DD), defaults to today
        #[arg(long)]
        date: Option<NaiveDate>,
    },
    /// Fetch current prices for all instruments
    Refresh,
    /// Compute a buy plan for a cash amount
    Plan {
        amount: Decimal,
        #[arg(long, value_enum, default_value_t = PlanMode::New)]
        mode: PlanMode,
        #[arg(long, default_value_t = DEFAULT_PLAN_PRECISION)]
        precision: u32,
        /// Print the plan as JSON instead of a table
        #[arg(long)]
        json: bool,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let cli = Cli::parse();

    db::init(&cli.db)?;
    let pool = db::create_pool(&cli.db)?;
    db::run_migrations(&pool)?;

    let instrument_service: Arc<dyn InstrumentServiceTrait> =
        Arc::new(InstrumentService::new(pool.clone()));
    let holdings_service: Arc<dyn HoldingsServiceTrait> =
        Arc::new(HoldingsService::new(pool.clone()));
    let transaction_service = TransactionService::new(pool.clone());

    match cli.command {
        Command::Add {
            ticker,
            target_pct,
            no_fractions,
        } => {
            let instrument = instrument_service.create_instrument(NewInstrument {
                id: None,
                ticker,
                target_pct,
                supports_fractions: !no_fractions,
            })?;
            println!(
                "Added {} (id {}, target {}%)",
                instrument.ticker, instrument.id, instrument.target_pct
            );
        }
        Command::Edit {
            id,
            target_pct,
            fractions,
        } => {
            let instrument = instrument_service.update_instrument(InstrumentUpdate {
                id,
                target_pct,
                supports_fractions: fractions,
            })?;
            println!(
                "Updated {}: target {}%, fractions {}",
                instrument.ticker, instrument.target_pct, instrument.supports_fractions
            );
        }
        Command::Remove { id } => {
            instrument_service.delete_instrument(&id)?;
            println!("Removed instrument {}", id);
        }
        Command::List => {
            print_dashboard(instrument_service.as_ref(), holdings_service.as_ref())?;
        }
        Command::Buy {
            id,
            price,
            shares,
            commission,
            date,
        } => {
            let transaction = transaction_service.record_buy(NewTransaction {
                instrument_id: id,
                price,
                shares,
                commission,
                txn_date: date.and_then(|d| d.and_hms_opt(0, 0, 0)),
            })?;
            println!(
                "Recorded buy of {} shares at {} (amount {})",
                transaction.shares, transaction.price, transaction.amount
            );
        }
        Command::Refresh => {
            let market_map = match &cli.market_map {
                Some(path) => MarketMap::from_file(path)?,
                None => MarketMap::default(),
            };
            let provider = Arc::new(YahooProvider::new()?);
            let service =
                MarketDataService::new(pool.clone(), provider, Arc::new(market_map));

            for refresh in service.refresh_prices().await? {
                match refresh.price {
                    Some(price) => match refresh.resolved_symbol {
                        Some(symbol) => {
                            println!("{} -> {} (resolved {})", refresh.ticker, price, symbol)
                        }
                        None => println!("{} -> {}", refresh.ticker, price),
                    },
                    None => println!("{}: no price found, skipped", refresh.ticker),
                }
            }
        }
        Command::Plan {
            amount,
            mode,
            precision,
            json,
        } => {
            if amount < Decimal::ZERO {
                bail!("Amount must be non-negative");
            }
            let planner = PlannerService::new(instrument_service, holdings_service);
            let plan = planner.compute_plan(amount, mode, precision)?;
            if json {
                println!("{}", serde_json::to_string_pretty(&plan)?);
            } else {
                print_plan(&plan);
            }
        }
    }

    Ok(())
}

fn print_dashboard(
    instruments: &dyn InstrumentServiceTrait,
    holdings: &dyn HoldingsServiceTrait,
) -> anyhow::Result<()> {
    println!(
        "{:<38} {:<12} {:>9} {:>14} {:>11} {:>12} {:>12}",
        "Id", "Ticker", "Target %", "Shares", "Price", "Value", "Invested"
    );

    let mut total_value = Decimal::ZERO;
    let mut total_invested = Decimal::ZERO;

    for instrument in instruments.list_instruments()? {
        let snapshot = holdings.holdings_for(&instrument.id)?;
        let invested = holdings.invested_for(&instrument.id)?;

        let shares = if instrument.supports_fractions {
            format!("{:.6}", snapshot.shares)
        } else {
            format!("{:.0}", snapshot.shares)
        };
        let price = instrument
            .usable_price()
            .map(|p| format!("{:.2}", p))
            .unwrap_or_else(|| "-".to_string());
        println!(
            "{:<38} {:<12} {:>9.2} {:>14} {:>11} {:>12.2} {:>12.2}",
            instrument.id,
            instrument.ticker,
            instrument.target_pct,
            shares,
            price,
            snapshot.market_value,
            invested
        );

        total_value += snapshot.market_value;
        total_invested += invested;
    }

    let total_return = total_value - total_invested;
    let return_rate = if total_invested > Decimal::ZERO {
        total_return / total_invested * Decimal::ONE_HUNDRED
    } else {
        Decimal::ZERO
    };
    println!();
    println!(
        "Value: {:.2} | Invested: {:.2} | Return: {:.2} ({:+.2}%)",
        total_value, total_invested, total_return, return_rate
    );

    Ok(())
}

fn print_plan(plan: &Plan) {
    println!(
        "{:<12} {:>9} {:>12} {:>12} {:>12} {:>14}",
        "Ticker", "Target %", "Current", "Target", "Buy", "Buy Shares"
    );
    for row in &plan.rows {
        let shares = row
            .to_buy_shares
            .map(|s| format!("{:.6}", s))
            .unwrap_or_else(|| "-".to_string());
        println!(
            "{:<12} {:>9.2} {:>12.2} {:>12.2} {:>12.2} {:>14}",
            row.ticker,
            row.target_pct,
            row.current_value,
            row.target_value,
            row.to_buy_amount,
            shares
        );
    }
    println!();
    println!(
        "Portfolio: {:.2} now, {:.2} after investing {:.2}",
        plan.total_current, plan.total_after, plan.amount
    );
    println!(
        "Planned spend: {:.2} | Leftover: {:.2}",
        plan.planned_spend, plan.leftover
    );
    if !plan.missing_prices.is_empty() {
        println!("Missing prices: {}", plan.missing_prices.join(", "));
    }
}
