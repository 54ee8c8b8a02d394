use super::money::round2;
use super::ranking::{CostModel, compare};
use super::types::{LoanCost, LoanInput, LoanProduct, Ranked};

/// Listed by monthly payment, but the cheapest offer is the one with the
/// least total interest: a longer, lower-payment loan can cost more overall.
pub struct Loans;

impl CostModel for Loans {
    type Input = LoanInput;
    type Rate = LoanProduct;
    type Cost = LoanCost;

    const DOMAIN: &'static str = "loans";

    fn compute_cost(input: &LoanInput, rate: &LoanProduct) -> Option<LoanCost> {
        if !rate.accepts(input.amount, input.term_months) {
            return None;
        }
        Some(loan_cost(input, rate))
    }

    fn ranking_key(cost: &LoanCost) -> f64 {
        cost.monthly_payment
    }

    fn cheapest_key(cost: &LoanCost) -> f64 {
        cost.total_interest
    }
}

pub fn compare_loans(input: &LoanInput, products: &[LoanProduct]) -> Vec<Ranked<LoanCost>> {
    compare::<Loans>(input, products)
}

pub fn monthly_payment(principal: f64, annual_rate_percent: f64, term_months: u32) -> f64 {
    if term_months == 0 {
        return 0.0;
    }
    let n = term_months as f64;
    let i = annual_rate_percent / 100.0 / 12.0;
    if i == 0.0 {
        return principal / n;
    }
    let growth = (1.0 + i).powf(n);
    if growth.is_infinite() {
        // Interest-only limit of the annuity.
        return principal * i;
    }
    principal * i * growth / (growth - 1.0)
}

/// Callers are expected to have checked [`LoanProduct::accepts`].
pub fn loan_cost(input: &LoanInput, product: &LoanProduct) -> LoanCost {
    let payment = monthly_payment(input.amount, product.annual_rate, input.term_months);
    let total_payment = payment * input.term_months as f64 + product.upfront_fee;
    LoanCost {
        product: product.clone(),
        monthly_payment: round2(payment),
        total_payment: round2(total_payment),
        total_interest: round2(total_payment - input.amount),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn assert_close(actual: f64, expected: f64, tol: f64) {
        assert!(
            (actual - expected).abs() <= tol,
            "expected {expected}, got {actual}, tolerance {tol}"
        );
    }

    fn product(id: &str, annual_rate: f64, terms: (u32, u32), upfront_fee: f64) -> LoanProduct {
        LoanProduct {
            id: id.to_string(),
            bank: "Test Bank".to_string(),
            name: id.to_uppercase(),
            annual_rate,
            min_amount: 1_000.0,
            max_amount: 30_000.0,
            min_term_months: terms.0,
            max_term_months: terms.1,
            upfront_fee,
        }
    }

    #[test]
    fn annuity_formula_matches_reference_value() {
        assert_close(monthly_payment(10_000.0, 8.0, 36), 313.36, 0.005);
        assert_close(monthly_payment(10_000.0, 9.0, 36), 318.00, 0.005);
    }

    #[test]
    fn zero_rate_divides_principal_evenly() {
        assert_eq!(monthly_payment(12_000.0, 0.0, 24), 500.0);
        let cost = loan_cost(
            &LoanInput {
                amount: 12_000.0,
                term_months: 24,
            },
            &product("free", 0.0, (12, 60), 0.0),
        );
        assert_eq!(cost.total_payment, 12_000.0);
        assert_eq!(cost.total_interest, 0.0);
    }

    #[test]
    fn very_long_terms_converge_to_interest_only() {
        let payment = monthly_payment(10_000.0, 12.0, u32::MAX);
        assert!(payment.is_finite());
        assert_close(payment, 100.0, 1e-9);

        let forever = product("forever", 12.0, (0, u32::MAX), 0.0);
        let input = LoanInput {
            amount: 10_000.0,
            term_months: 100_000,
        };
        let ranked = compare_loans(&input, &[forever]);
        assert_eq!(ranked.len(), 1);
        assert_eq!(ranked[0].entry.monthly_payment, 100.0);
        assert!(ranked[0].entry.total_interest.is_finite());
    }

    #[test]
    fn products_outside_amount_or_term_range_are_dropped() {
        let products = vec![
            product("short", 7.0, (6, 24), 0.0),
            product("fits", 9.0, (12, 60), 0.0),
            LoanProduct {
                max_amount: 5_000.0,
                ..product("small", 6.0, (12, 60), 0.0)
            },
        ];
        let input = LoanInput {
            amount: 10_000.0,
            term_months: 36,
        };
        let ranked = compare_loans(&input, &products);
        assert_eq!(ranked.len(), 1);
        assert_eq!(ranked[0].entry.product.id, "fits");
        assert!(ranked[0].is_cheapest);
    }

    #[test]
    fn bounds_are_inclusive_and_zero_term_is_never_eligible() {
        let p = product("edge", 5.0, (0, 36), 0.0);
        assert!(p.accepts(1_000.0, 36));
        assert!(p.accepts(30_000.0, 1));
        assert!(!p.accepts(30_000.01, 12));
        assert!(!p.accepts(5_000.0, 0));
    }

    #[test]
    fn payment_order_and_cheapest_flag_can_diverge() {
        let products = vec![
            product("nine", 9.0, (12, 48), 0.0),
            product("eight-with-fee", 8.0, (24, 60), 500.0),
        ];
        let input = LoanInput {
            amount: 10_000.0,
            term_months: 36,
        };
        let ranked = compare_loans(&input, &products);

        // Sorted by monthly payment: the 8% product pays less per month.
        assert_eq!(ranked[0].entry.product.id, "eight-with-fee");
        assert!(ranked[0].entry.monthly_payment < ranked[1].entry.monthly_payment);

        // Flagged by total interest: the fee makes the 8% product dearer overall.
        assert!(!ranked[0].is_cheapest);
        assert!(ranked[1].is_cheapest);
        assert_eq!(ranked[1].difference_from_cheapest, 0.0);
        assert!(ranked[0].entry.total_interest > ranked[1].entry.total_interest);
        assert_close(
            ranked[0].difference_from_cheapest,
            ranked[0].entry.total_interest - ranked[1].entry.total_interest,
            0.011,
        );
    }

    #[test]
    fn no_eligible_product_yields_empty_list() {
        let input = LoanInput {
            amount: 50_000.0,
            term_months: 36,
        };
        assert!(compare_loans(&input, &[product("p", 8.0, (12, 60), 0.0)]).is_empty());
    }
}
