use super::money::{VAT_RATE, round2};
use super::ranking::{CostModel, compare};
use super::types::{Ranked, WaterCost, WaterInput, WaterProvider};

pub struct Water;

impl CostModel for Water {
    type Input = WaterInput;
    type Rate = WaterProvider;
    type Cost = WaterCost;

    const DOMAIN: &'static str = "water";

    fn compute_cost(input: &WaterInput, rate: &WaterProvider) -> Option<WaterCost> {
        Some(water_cost(input, rate))
    }

    fn ranking_key(cost: &WaterCost) -> f64 {
        cost.total_with_vat
    }
}

pub fn compare_water(input: &WaterInput, providers: &[WaterProvider]) -> Vec<Ranked<WaterCost>> {
    compare::<Water>(input, providers)
}

/// Every breakdown field is rounded to cents before it feeds the next one.
pub fn water_cost(input: &WaterInput, provider: &WaterProvider) -> WaterCost {
    let qty = input.cubic_meters;
    let supply = round2(qty * provider.supply_rate);
    let sewerage = round2(qty * provider.sewerage_rate);
    let treatment = round2(qty * provider.treatment_rate);
    let subtotal = round2(supply + sewerage + treatment);
    let vat = round2(subtotal * VAT_RATE);

    WaterCost {
        provider: provider.clone(),
        supply,
        sewerage,
        treatment,
        subtotal,
        vat,
        total_with_vat: round2(subtotal + vat),
    }
}
