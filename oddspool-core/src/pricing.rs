//! # Pricing Engine
//!
//! Odds are quoted in two steps:
//! 1. [`raw_odds_from_banks`] treats the two outcome reserves as an implied
//!    probability market and prices the *average* probability over the stake,
//!    so that bigger stakes move the price against the bettor.
//! 2. [`margin_adjusted_odds`] overlays the bookmaker margin so that the implied
//!    probabilities of both sides add up to more than one.
//!
//! Every value is an integer on the caller-supplied `scale` (1e9 throughout the
//! crate, see [`crate::ODDS_SCALE`]).

use primitive_types::U256;

use crate::{
    error::Result,
    math::{add, ceil_step, div, isqrt, mul, narrow, sub, wide},
    CoreError,
};

/// Price impact is measured in steps of one percent of the chosen side's bank,
/// never smaller than one base unit.
const PRICE_IMPACT_STEPS: u128 = 100;

/// Apply the bookmaker margin to fair odds.
///
/// The transform solves a quadratic in the margin-adjusted probability, which
/// keeps the overround equal to `margin` for both sides of a fairly priced
/// market. `odds` must be strictly above one unit (`scale`); anything else
/// implies a certain or impossible outcome and is rejected with `ZeroOdds`.
///
/// ```rust
/// use oddspool_core::pricing::margin_adjusted_odds;
///
/// let odds = margin_adjusted_odds(1_730_000_000, 50_000_000, 1_000_000_000)?;
/// assert_eq!(odds, 1_658_829_423);
/// Ok::<(), oddspool_core::CoreError>(())
/// ```
pub fn margin_adjusted_odds(odds: u128, margin: u128, scale: u128) -> Result<u128> {
    let d = wide(scale);
    let odds = wide(odds);
    let margin = wide(margin);
    if odds <= d {
        return Err(CoreError::ZeroOdds);
    }

    let d_sq = mul(d, d)?;
    let reverted = div(d_sq, sub(d, div(d_sq, odds)?)?)?;
    let with_margin = add(d, margin)?;
    let odds_edge = sub(odds, d)?;
    let reverted_edge = sub(reverted, d)?;

    let a = div(mul(with_margin, reverted_edge)?, odds_edge)?;
    let b = div(
        add(
            mul(div(mul(reverted_edge, d)?, odds_edge)?, margin)?,
            mul(d, margin)?,
        )?,
        d,
    )?;
    let c = sub(mul(d, U256::from(2))?, with_margin)?;

    let discriminant = add(mul(b, b)?, mul(mul(U256::from(4), a)?, c)?)?;
    let root = isqrt(discriminant);
    let adjusted = add(
        div(mul(sub(root, b)?, d)?, mul(U256::from(2), a)?)?,
        d,
    )?;
    narrow(adjusted)
}

/// Fair odds for staking `amount` on `outcome_index` (0 or 1), before margin.
pub fn raw_odds_from_banks(
    bank0: u128,
    bank1: u128,
    amount: u128,
    outcome_index: usize,
    scale: u128,
) -> Result<u128> {
    let (own, other) = match outcome_index {
        0 => (bank0, bank1),
        1 => (bank1, bank0),
        _ => return Err(CoreError::WrongOutcome),
    };
    if own == 0 || other == 0 {
        return Err(CoreError::ZeroOdds);
    }

    let d = wide(scale);
    let own = wide(own);
    let amount = wide(amount);
    let total = add(own, wide(other))?;

    // implied probability of the chosen side after and before the stake
    let p_end = div(mul(add(own, amount)?, d)?, add(total, amount)?)?;
    let p_start = div(mul(own, d)?, total)?;

    let step = div(own, wide(PRICE_IMPACT_STEPS))?.max(U256::one());
    let steps = div(ceil_step(div(mul(amount, d)?, step)?, d, d)?, d)?;

    let odds = if steps == U256::one() {
        div(mul(d, d)?, p_start)?
    } else {
        let two = U256::from(2);
        let averaged = sub(
            add(mul(p_end, steps)?, mul(p_start, two)?)?,
            mul(p_end, two)?,
        )?;
        div(mul(mul(d, d)?, d)?, div(mul(averaged, d)?, steps)?)?
    };
    narrow(odds)
}

/// Quoted odds for staking `amount` on `outcome_index` against the given banks.
///
/// ```rust
/// use oddspool_core::pricing::odds_from_banks;
///
/// let odds = odds_from_banks(50_000_000, 50_000_000, 100_000, 0, 50_000_000, 1_000_000_000)?;
/// assert_eq!(odds, 1_904_761_904);
/// Ok::<(), oddspool_core::CoreError>(())
/// ```
pub fn odds_from_banks(
    bank0: u128,
    bank1: u128,
    amount: u128,
    outcome_index: usize,
    margin: u128,
    scale: u128,
) -> Result<u128> {
    let raw = raw_odds_from_banks(bank0, bank1, amount, outcome_index, scale)?;
    margin_adjusted_odds(raw, margin, scale)
}
