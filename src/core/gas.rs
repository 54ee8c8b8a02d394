use super::money::{VAT_RATE, round2};
use super::ranking::{CostModel, compare};
use super::types::{GasCost, GasInput, GasProvider, Ranked};

pub struct Gas;

impl CostModel for Gas {
    type Input = GasInput;
    type Rate = GasProvider;
    type Cost = GasCost;

    const DOMAIN: &'static str = "gas";

    fn compute_cost(input: &GasInput, rate: &GasProvider) -> Option<GasCost> {
        Some(gas_cost(input, rate))
    }

    fn ranking_key(cost: &GasCost) -> f64 {
        cost.total_with_vat
    }
}

pub fn compare_gas(input: &GasInput, providers: &[GasProvider]) -> Vec<Ranked<GasCost>> {
    compare::<Gas>(input, providers)
}

pub fn gas_cost(input: &GasInput, provider: &GasProvider) -> GasCost {
    let qty = input.kwh;
    let supply = round2(qty * provider.supply_rate);
    let distribution = round2(qty * provider.distribution_rate);
    let transmission = round2(qty * provider.transmission_rate);
    let excise = round2(qty * provider.excise_rate);
    let subtotal = round2(supply + distribution + transmission + excise);
    let vat = round2(subtotal * VAT_RATE);

    GasCost {
        provider: provider.clone(),
        supply,
        distribution,
        transmission,
        excise,
        subtotal,
        vat,
        total_with_vat: round2(subtotal + vat),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::{prop_assert_eq, proptest};

    fn provider(id: &str, supply_rate: f64, distribution_rate: f64) -> GasProvider {
        GasProvider {
            id: id.to_string(),
            name: id.to_uppercase(),
            coverage_area: None,
            supply_rate,
            distribution_rate,
            transmission_rate: 0.0041,
            excise_rate: 0.0011,
        }
    }

    #[test]
    fn gas_cost_adds_excise_before_vat() {
        let cost = gas_cost(&GasInput { kwh: 1000.0 }, &provider("og", 0.0452, 0.0118));
        assert_eq!(cost.supply, 45.20);
        assert_eq!(cost.distribution, 11.80);
        assert_eq!(cost.transmission, 4.10);
        assert_eq!(cost.excise, 1.10);
        assert_eq!(cost.subtotal, 62.20);
        assert_eq!(cost.vat, 12.44);
        assert_eq!(cost.total_with_vat, 74.64);
    }

    #[test]
    fn rounding_happens_per_field_not_only_at_the_end() {
        // 3 kWh at 0.0015 per component: 0.0045 each, rounds to 0.00 individually.
        let p = GasProvider {
            id: "tiny".to_string(),
            name: "Tiny".to_string(),
            coverage_area: None,
            supply_rate: 0.0015,
            distribution_rate: 0.0015,
            transmission_rate: 0.0015,
            excise_rate: 0.0015,
        };
        let cost = gas_cost(&GasInput { kwh: 3.0 }, &p);
        assert_eq!(cost.subtotal, 0.0);
        assert_eq!(cost.total_with_vat, 0.0);
    }

    #[test]
    fn cheapest_provider_is_flagged() {
        let providers = vec![provider("b", 0.05, 0.012), provider("a", 0.045, 0.012)];
        let ranked = compare_gas(&GasInput { kwh: 800.0 }, &providers);
        assert_eq!(ranked[0].entry.provider.id, "a");
        assert!(ranked[0].is_cheapest);
        assert_eq!(ranked[1].difference_from_cheapest, 4.80);
    }

    proptest! {
        #![proptest_config(proptest::test_runner::Config::with_cases(64))]

        #[test]
        fn prop_subtotal_plus_vat_matches_total(kwh in 0u32..50_000, supply_milli in 0u32..200) {
            let mut p = provider("p", 0.0, 0.0118);
            p.supply_rate = supply_milli as f64 / 1000.0;
            let cost = gas_cost(&GasInput { kwh: kwh as f64 }, &p);
            prop_assert_eq!(round2(cost.subtotal + cost.vat), cost.total_with_vat);
        }
    }
}
