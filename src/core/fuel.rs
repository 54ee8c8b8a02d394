use super::money::round2;
use super::ranking::{CostModel, compare};
use super::types::{FuelCost, FuelInput, FuelStation, Ranked};

pub struct Fuel;

impl CostModel for Fuel {
    type Input = FuelInput;
    type Rate = FuelStation;
    type Cost = FuelCost;

    const DOMAIN: &'static str = "fuel";

    fn compute_cost(input: &FuelInput, rate: &FuelStation) -> Option<FuelCost> {
        fuel_cost(input, rate)
    }

    fn ranking_key(cost: &FuelCost) -> f64 {
        cost.monthly_cost
    }
}

pub fn compare_fuel(input: &FuelInput, stations: &[FuelStation]) -> Vec<Ranked<FuelCost>> {
    compare::<Fuel>(input, stations)
}

/// `None` when the station does not sell the requested fuel.
pub fn fuel_cost(input: &FuelInput, station: &FuelStation) -> Option<FuelCost> {
    let price_per_liter = station.price(input.fuel_type)?;
    let monthly_cost = round2(price_per_liter * input.monthly_liters);
    Some(FuelCost {
        station: station.clone(),
        fuel_type: input.fuel_type,
        price_per_liter,
        monthly_cost,
        yearly_cost: round2(monthly_cost * 12.0),
    })
}
