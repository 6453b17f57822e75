//! # Oddspool CLI
//!
//! Command-line interface for quoting odds and dry-running prediction-market
//! conditions against an in-memory liquidity pool.

use std::path::PathBuf;

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use colored::*;
use oddspool_core::{
    math::mul_div,
    pricing::{margin_adjusted_odds, odds_from_banks},
    utils::*,
    Call, Core, LiquidityPool, Metadata, NewCondition, OddspoolConfig, ODDS_SCALE,
};
use tracing::debug;
use tracing_subscriber::EnvFilter;

/// Decimals of the staked asset.
const TOKEN_DECIMALS: u32 = 18;

#[derive(Parser)]
#[command(name = "oddspool")]
#[command(about = "Peer-to-pool binary prediction markets")]
#[command(version)]
struct Cli {
    /// JSON configuration file (defaults are used when omitted)
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Apply a margin to decimal odds
    Margin {
        /// Decimal odds, e.g. 1.73
        odds: String,
        /// Margin in percent, e.g. 5
        #[arg(short, long, default_value = "5")]
        margin: String,
    },
    /// Quote the odds for a stake against two reserves
    Odds {
        /// Reserve behind the first outcome (tokens)
        #[arg(long)]
        bank0: String,
        /// Reserve behind the second outcome (tokens)
        #[arg(long)]
        bank1: String,
        /// Stake (tokens)
        #[arg(short, long)]
        amount: String,
        /// Side to stake on (0 or 1)
        #[arg(short, long, default_value = "0")]
        outcome: usize,
        /// Margin in percent
        #[arg(short, long, default_value = "5")]
        margin: String,
    },
    /// Run one condition end to end on an in-memory pool
    Simulate {
        /// Liquidity provided to the pool (tokens)
        #[arg(short, long, default_value = "1000000")]
        liquidity: String,
        /// Bets as SIDE:AMOUNT, e.g. 1:100 or 2:250.5
        #[arg(short, long = "bet", required = true)]
        bets: Vec<String>,
        /// Winning side (1 or 2); cancel the condition when omitted
        #[arg(short, long)]
        winner: Option<u64>,
    },
    /// Print the effective configuration as JSON
    Config,
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_target(false)
        .init();

    let cli = Cli::parse();
    let config = match &cli.config {
        Some(path) => OddspoolConfig::from_json_file(path)
            .with_context(|| format!("Failed to load config from {}", path.display()))?,
        None => OddspoolConfig::default(),
    };

    match cli.command {
        Commands::Margin { odds, margin } => {
            let odds = parse_odds(&odds).context("Invalid odds")?;
            let margin = parse_percent(&margin).context("Invalid margin")?;
            let adjusted = margin_adjusted_odds(odds, margin, ODDS_SCALE)?;

            println!("{}", "Margin Applied".green().bold());
            println!("{}", "═".repeat(50).bright_black());
            println!("{}: {}", "Fair Odds".yellow().bold(), format_odds(odds));
            println!("{}: {}", "Margin".yellow().bold(), format_percent(margin));
            println!("{}: {}", "Quoted Odds".cyan().bold(), format_odds(adjusted));
            println!("{}: {}", "Implied Probability".yellow().bold(), implied_probability(adjusted));
            println!("{}", "═".repeat(50).bright_black());
        }

        Commands::Odds {
            bank0,
            bank1,
            amount,
            outcome,
            margin,
        } => {
            let bank0 = parse_fixed(&bank0, TOKEN_DECIMALS).context("Invalid bank0")?;
            let bank1 = parse_fixed(&bank1, TOKEN_DECIMALS).context("Invalid bank1")?;
            let amount = parse_fixed(&amount, TOKEN_DECIMALS).context("Invalid amount")?;
            let margin = parse_percent(&margin).context("Invalid margin")?;
            let odds = odds_from_banks(bank0, bank1, amount, outcome, margin, ODDS_SCALE)?;
            let payout = mul_div(amount, odds, ODDS_SCALE)?;

            println!("{}", "Odds Quote".green().bold());
            println!("{}", "═".repeat(50).bright_black());
            println!(
                "{}: {} / {}",
                "Reserves".yellow().bold(),
                format_fixed(bank0, TOKEN_DECIMALS),
                format_fixed(bank1, TOKEN_DECIMALS)
            );
            println!("{}: {} on side {}", "Stake".yellow().bold(), format_fixed(amount, TOKEN_DECIMALS), outcome);
            println!("{}: {}", "Margin".yellow().bold(), format_percent(margin));
            println!("{}: {}", "Odds".cyan().bold(), format_odds(odds));
            println!("{}: {}", "Potential Payout".cyan().bold(), format_fixed(payout, TOKEN_DECIMALS));
            println!("{}", "═".repeat(50).bright_black());
        }

        Commands::Simulate {
            liquidity,
            bets,
            winner,
        } => simulate(&config, &liquidity, &bets, winner)?,

        Commands::Config => {
            println!("{}", config.to_json_pretty()?);
        }
    }

    Ok(())
}

/// Parse a `SIDE:AMOUNT` bet argument.
fn parse_bet(input: &str) -> Result<(u64, u128)> {
    let Some((side, amount)) = input.split_once(':') else {
        bail!("Bet must look like SIDE:AMOUNT, got {input}");
    };
    let side: u64 = side
        .trim()
        .parse()
        .with_context(|| format!("Invalid side in {input}"))?;
    if side != 1 && side != 2 {
        bail!("Side must be 1 or 2, got {side}");
    }
    let amount = parse_fixed(amount, TOKEN_DECIMALS).with_context(|| format!("Invalid amount in {input}"))?;
    Ok((side, amount))
}

fn simulate(config: &OddspoolConfig, liquidity: &str, bets: &[String], winner: Option<u64>) -> Result<()> {
    const OWNER: &str = "owner";
    const ORACLE: &str = "oracle";
    const LP: &str = "lp";
    // staking is simulated one hour before the start
    let now = chrono::Utc::now().timestamp().max(0) as u64;
    let start = now + 3600;

    let bets = bets.iter().map(|bet| parse_bet(bet)).collect::<Result<Vec<_>>>()?;
    let liquidity = parse_fixed(liquidity, TOKEN_DECIMALS).context("Invalid liquidity")?;

    let owner = Call::new(OWNER, now);
    let mut core = Core::new(OWNER.into(), config.core.clone());
    core.set_oracle(&owner, ORACLE.into())?;
    let mut pool = LiquidityPool::new(OWNER.into(), "pool".into(), core, config.pool.clone())?;
    pool.add_liquidity(&Call::new(LP, now), liquidity)?;

    let condition = pool.create_condition(
        &Call::new(ORACLE, now),
        NewCondition {
            oracle_condition_id: 1,
            scope_id: 1,
            pools: [1, 1],
            outcomes: [1, 2],
            start_time: start,
            metadata: Metadata::from_content("oddspool simulation"),
        },
    )?;

    println!("{}", "Simulating condition...".green().bold());
    println!("{}", "═".repeat(50).bright_black());
    println!("{}: {}", "Starts".yellow().bold(), format_timestamp(start));
    println!(
        "{}: {}",
        "Reinforcement".yellow().bold(),
        format_fixed(pool.core().condition_reinforcement(condition)?, TOKEN_DECIMALS)
    );

    let mut receipts = Vec::with_capacity(bets.len());
    for (index, (side, amount)) in bets.iter().enumerate() {
        let bettor = format!("bettor{}", index + 1);
        let call = Call::new(bettor.as_str(), now);
        match pool.bet(&call, condition, *amount, *side, now, 0) {
            Ok(placed) => {
                println!(
                    "{} {} on side {} at {}",
                    bettor.cyan(),
                    format_fixed(*amount, TOKEN_DECIMALS),
                    side,
                    format_odds(placed.odds).bright_blue()
                );
                receipts.push((bettor, placed.receipt));
            }
            Err(err) => println!(
                "{} {} on side {} {}: {}",
                bettor.cyan(),
                format_fixed(*amount, TOKEN_DECIMALS),
                side,
                "rejected".red(),
                err
            ),
        }
    }

    debug!(accepted = receipts.len(), rejected = bets.len() - receipts.len(), "staking closed");
    let funds = pool.core().condition_funds(condition)?;
    println!(
        "{}: {} / {}",
        "Reserves".yellow().bold(),
        format_fixed(funds[0], TOKEN_DECIMALS),
        format_fixed(funds[1], TOKEN_DECIMALS)
    );
    println!("{}", "═".repeat(50).bright_black());

    let oracle = Call::new(ORACLE, start);
    match winner {
        Some(outcome) => {
            let split = pool.resolve_condition(&oracle, 1, outcome)?;
            println!("{}: side {}", "Resolved".green().bold(), outcome);
            println!("{}: {}", "Oracle Reward".yellow().bold(), format_fixed(split.oracle, TOKEN_DECIMALS));
            println!("{}: {}", "DAO Reward".yellow().bold(), format_fixed(split.dao, TOKEN_DECIMALS));
        }
        None => {
            pool.cancel_by_oracle(&Call::new(ORACLE, now), 1)?;
            println!("{}", "Canceled".yellow().bold());
        }
    }

    for (bettor, receipt) in receipts {
        let payout = pool.view_payout(receipt)?;
        println!(
            "{} {:?}: {}",
            bettor.cyan(),
            payout.kind,
            format_fixed(payout.amount, TOKEN_DECIMALS)
        );
    }

    let before = liquidity as i128;
    let after = pool.reserve().total_liquidity() as i128;
    let change = after - before;
    let change = if change >= 0 {
        format!("+{}", format_fixed(change as u128, TOKEN_DECIMALS)).green()
    } else {
        format!("-{}", format_fixed(change.unsigned_abs(), TOKEN_DECIMALS)).red()
    };
    println!("{}", "═".repeat(50).bright_black());
    println!("{}: {}", "Pool Liquidity".yellow().bold(), format_fixed(pool.reserve().total_liquidity(), TOKEN_DECIMALS));
    println!("{}: {}", "Pool Result".yellow().bold(), change);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_bet() {
        assert_eq!(parse_bet("1:100").unwrap(), (1, 100 * 10u128.pow(18)));
        assert_eq!(parse_bet("2:0.5").unwrap(), (2, 5 * 10u128.pow(17)));
        assert!(parse_bet("3:100").is_err());
        assert!(parse_bet("100").is_err());
        assert!(parse_bet("1:abc").is_err());
    }

    #[test]
    fn test_simulate_runs_with_defaults() {
        let bets = vec!["1:100".to_string(), "2:40".to_string()];
        simulate(&OddspoolConfig::default(), "1000000", &bets, Some(1)).unwrap();
        simulate(&OddspoolConfig::default(), "1000000", &bets, None).unwrap();
    }
}
