use serde::{Deserialize, Serialize};

/// Standard value-added tax rate applied to utility bills.
pub const VAT_RATE: f64 = 0.20;

pub const BGN_PER_EUR: f64 = 1.95583;

pub fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

pub fn with_vat(net: f64) -> f64 {
    net * (1.0 + VAT_RATE)
}

/// Splits a VAT-inclusive amount into `(subtotal, vat)`, both rounded to cents.
/// The parts always add back up to `round2(gross)`.
pub fn split_vat(gross: f64) -> (f64, f64) {
    let total = round2(gross);
    let subtotal = round2(total / (1.0 + VAT_RATE));
    (subtotal, round2(total - subtotal))
}

#[derive(Copy, Clone, Debug, Eq, PartialEq, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Currency {
    Eur,
    Bgn,
}

impl Currency {
    pub fn symbol(self) -> &'static str {
        match self {
            Currency::Eur => "€",
            Currency::Bgn => "лв.",
        }
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct FixedPeg {
    pub bgn_per_eur: f64,
}

impl Default for FixedPeg {
    fn default() -> Self {
        Self {
            bgn_per_eur: BGN_PER_EUR,
        }
    }
}

impl FixedPeg {
    pub fn to_bgn(self, eur: f64) -> f64 {
        eur * self.bgn_per_eur
    }

    /// The peg is validated positive when configuration is loaded.
    pub fn to_eur(self, bgn: f64) -> f64 {
        bgn / self.bgn_per_eur
    }

    /// Converts an amount stated in `currency` into the reporting currency (EUR).
    pub fn to_reporting(self, amount: f64, currency: Currency) -> f64 {
        match currency {
            Currency::Eur => amount,
            Currency::Bgn => self.to_eur(amount),
        }
    }
}

/// Renders `amount` with two decimals, space-grouped thousands and the currency symbol.
pub fn format_money(amount: f64, currency: Currency) -> String {
    let cents = (amount.abs() * 100.0).round() as u64;
    let whole = (cents / 100).to_string();
    let mut grouped = String::with_capacity(whole.len() + whole.len() / 3);
    for (idx, ch) in whole.chars().enumerate() {
        if idx > 0 && (whole.len() - idx) % 3 == 0 {
            grouped.push(' ');
        }
        grouped.push(ch);
    }
    let sign = if amount < 0.0 && cents > 0 { "-" } else { "" };
    format!("{sign}{grouped}.{:02} {}", cents % 100, currency.symbol())
}
