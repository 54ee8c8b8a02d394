use tracing::debug;

use super::money::round2;
use super::types::Ranked;

/// A domain-specific cost formula plugged into the shared ranking pass.
pub trait CostModel {
    type Input;
    type Rate;
    type Cost;

    const DOMAIN: &'static str;

    /// Returns `None` when the rate record is not eligible for `input`.
    fn compute_cost(input: &Self::Input, rate: &Self::Rate) -> Option<Self::Cost>;

    /// Key the list is sorted by.
    fn ranking_key(cost: &Self::Cost) -> f64;

    /// Key the "cheapest" flag and the deltas are measured on.
    fn cheapest_key(cost: &Self::Cost) -> f64 {
        Self::ranking_key(cost)
    }
}

pub fn compare<M: CostModel>(input: &M::Input, rates: &[M::Rate]) -> Vec<Ranked<M::Cost>> {
    let costs: Vec<M::Cost> = rates
        .iter()
        .filter_map(|rate| M::compute_cost(input, rate))
        .collect();
    debug!(
        domain = M::DOMAIN,
        eligible = costs.len(),
        excluded = rates.len() - costs.len(),
        "tariff comparison"
    );
    rank_by(costs, M::ranking_key, M::cheapest_key)
}

pub fn rank_by<T>(
    mut entries: Vec<T>,
    sort_key: impl Fn(&T) -> f64,
    cheapest_key: impl Fn(&T) -> f64,
) -> Vec<Ranked<T>> {
    entries.sort_by(|a, b| sort_key(a).total_cmp(&sort_key(b)));

    let cheapest_index = entries
        .iter()
        .enumerate()
        .min_by(|(_, a), (_, b)| cheapest_key(a).total_cmp(&cheapest_key(b)))
        .map(|(idx, _)| idx);
    let Some(cheapest_index) = cheapest_index else {
        return Vec::new();
    };
    let cheapest = cheapest_key(&entries[cheapest_index]);

    entries
        .into_iter()
        .enumerate()
        .map(|(idx, entry)| {
            let is_cheapest = idx == cheapest_index;
            let difference_from_cheapest = if is_cheapest {
                0.0
            } else {
                round2(cheapest_key(&entry) - cheapest)
            };
            Ranked {
                entry,
                is_cheapest,
                difference_from_cheapest,
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::collection::vec;
    use proptest::prelude::{prop_assert, prop_assert_eq, proptest};

    #[test]
    fn empty_list_yields_empty_ranking() {
        let ranked = rank_by(Vec::<f64>::new(), |v| *v, |v| *v);
        assert!(ranked.is_empty());
    }

    #[test]
    fn single_entry_is_cheapest_with_zero_delta() {
        let ranked = rank_by(vec![42.5], |v| *v, |v| *v);
        assert_eq!(ranked.len(), 1);
        assert!(ranked[0].is_cheapest);
        assert_eq!(ranked[0].difference_from_cheapest, 0.0);
    }

    #[test]
    fn ties_flag_only_the_first_entry() {
        let ranked = rank_by(vec![10.0, 10.0, 5.0, 5.0], |v| *v, |v| *v);
        let flagged: Vec<bool> = ranked.iter().map(|r| r.is_cheapest).collect();
        assert_eq!(flagged, vec![true, false, false, false]);
        assert_eq!(ranked[1].difference_from_cheapest, 0.0);
        assert_eq!(ranked[2].difference_from_cheapest, 5.0);
    }

    #[test]
    fn cheapest_key_can_differ_from_sort_key() {
        // (sort key, cheapest key)
        let entries = vec![(2.0, 1.0), (1.0, 3.0), (3.0, 2.0)];
        let ranked = rank_by(entries, |e| e.0, |e| e.1);
        assert_eq!(ranked[0].entry, (1.0, 3.0));
        assert!(!ranked[0].is_cheapest);
        assert_eq!(ranked[0].difference_from_cheapest, 2.0);
        assert!(ranked[1].is_cheapest);
        assert_eq!(ranked[1].difference_from_cheapest, 0.0);
        assert_eq!(ranked[2].difference_from_cheapest, 1.0);
    }

    proptest! {
        #![proptest_config(proptest::test_runner::Config::with_cases(64))]

        #[test]
        fn prop_ranking_invariants_hold(cents in vec(0u32..1_000_000, 1..24)) {
            let values: Vec<f64> = cents.iter().map(|c| *c as f64 / 100.0).collect();
            let min = values.iter().copied().fold(f64::INFINITY, f64::min);
            let ranked = rank_by(values, |v| *v, |v| *v);

            prop_assert_eq!(ranked.iter().filter(|r| r.is_cheapest).count(), 1);
            prop_assert!(ranked[0].is_cheapest);
            prop_assert_eq!(ranked[0].entry, min);
            prop_assert_eq!(ranked[0].difference_from_cheapest, 0.0);
            for pair in ranked.windows(2) {
                prop_assert!(pair[0].entry <= pair[1].entry);
            }
            for r in &ranked {
                prop_assert!(r.difference_from_cheapest >= 0.0);
                prop_assert!((r.difference_from_cheapest - (r.entry - min)).abs() < 0.006);
            }
        }
    }
}
