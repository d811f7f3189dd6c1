//! Credit and revenue projection.
//!
//! One ton of CO2 is one credit. Projections are linear with no discounting;
//! real programs usually demand 20-30 year commitments and charge
//! verification fees that are not modelled here.

use farm_carbon_estimate_models::{MarketContext, PriceRange, RevenueProjections};

use crate::round2;
use crate::tables::MarketTable;

/// Credits and projected revenue for one year of sequestration.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CreditProjection {
    /// Annual credits, rounded to two decimals.
    pub annual_credits: f64,
    pub revenue: RevenueProjections,
}

/// Projects credits and revenue for `annual_tons` of CO2 per year.
///
/// Zero, negative or non-finite tonnage yields zero credits and zero
/// revenue. Five and ten year figures are exact multiples of the rounded
/// one-year figures.
#[must_use]
pub fn project(market: &MarketTable, annual_tons: f64) -> CreditProjection {
    let annual_credits = if annual_tons.is_finite() && annual_tons > 0.0 {
        round2(annual_tons)
    } else {
        if !annual_tons.is_finite() || annual_tons < 0.0 {
            log::warn!("Invalid annual tonnage {annual_tons}; projecting zero revenue");
        }
        0.0
    };

    let price = market.credit_price;
    let one_year = PriceRange {
        min: round2(annual_credits * price.min),
        mid: round2(annual_credits * price.mid),
        max: round2(annual_credits * price.max),
    };

    CreditProjection {
        annual_credits,
        revenue: RevenueProjections {
            one_year,
            five_year: one_year.scale(5.0),
            ten_year: one_year.scale(10.0),
        },
    }
}

/// Market assumptions to attach to an estimate.
#[must_use]
pub fn market_context(market: &MarketTable) -> MarketContext {
    MarketContext {
        currency: market.currency.clone(),
        credit_price_range: market.credit_price,
        usd_exchange_rate: market.usd_exchange_rate,
        note: market.note.clone(),
    }
}
