use super::money::{round2, split_vat, with_vat};
use super::ranking::{CostModel, compare};
use super::types::{
    ElectricityCost, ElectricityFeeBreakdown, ElectricityInput, ElectricityProvider, Metering,
    Ranked,
};

pub struct Electricity;

impl CostModel for Electricity {
    type Input = ElectricityInput;
    type Rate = ElectricityProvider;
    type Cost = ElectricityCost;

    const DOMAIN: &'static str = "electricity";

    fn compute_cost(
        input: &ElectricityInput,
        rate: &ElectricityProvider,
    ) -> Option<ElectricityCost> {
        Some(electricity_cost(input, rate))
    }

    fn ranking_key(cost: &ElectricityCost) -> f64 {
        cost.total_with_vat
    }
}

pub fn compare_electricity(
    input: &ElectricityInput,
    providers: &[ElectricityProvider],
) -> Vec<Ranked<ElectricityCost>> {
    compare::<Electricity>(input, providers)
}

pub fn electricity_cost(
    input: &ElectricityInput,
    provider: &ElectricityProvider,
) -> ElectricityCost {
    let (day_cost, night_cost) = match input.metering {
        Metering::Dual => (
            round2(input.day_kwh * provider.day_rate),
            round2(input.night_kwh * provider.night_rate),
        ),
        Metering::Single => (
            round2(input.day_kwh * provider.single_rate),
            round2(input.night_kwh * provider.single_rate),
        ),
    };
    let total_with_vat = match input.metering {
        Metering::Dual => round2(day_cost + night_cost),
        Metering::Single => round2((input.day_kwh + input.night_kwh) * provider.single_rate),
    };
    let (subtotal, vat) = split_vat(total_with_vat);

    ElectricityCost {
        provider: provider.clone(),
        day_cost,
        night_cost,
        subtotal,
        vat,
        total_with_vat,
        fees: fee_breakdown(input.day_kwh + input.night_kwh, provider),
    }
}

// Display only; the total is driven by the day/night/single rates.
fn fee_breakdown(kwh: f64, provider: &ElectricityProvider) -> ElectricityFeeBreakdown {
    let c = &provider.components;
    let fee = |rate: f64| round2(with_vat(kwh * rate));
    ElectricityFeeBreakdown {
        energy: fee(c.energy),
        transmission: fee(c.transmission),
        distribution: fee(c.distribution),
        network_access: fee(c.network_access),
        public_obligation: fee(c.public_obligation),
        excise: fee(c.excise),
    }
}
