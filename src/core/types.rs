use serde::{Deserialize, Serialize};

#[derive(Copy, Clone, Debug, Eq, PartialEq, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Metering {
    Single,
    Dual,
}

#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum FuelType {
    A95,
    A98,
    Diesel,
    Lpg,
}

impl FuelType {
    pub const ALL: [FuelType; 4] = [
        FuelType::A95,
        FuelType::A98,
        FuelType::Diesel,
        FuelType::Lpg,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            FuelType::A95 => "a95",
            FuelType::A98 => "a98",
            FuelType::Diesel => "diesel",
            FuelType::Lpg => "lpg",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ElectricityProvider {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub coverage_area: Option<String>,
    pub day_rate: f64,
    pub night_rate: f64,
    pub single_rate: f64,
    #[serde(default)]
    pub components: ElectricityComponents,
}

/// Per-kWh fee components before VAT, used for the informational breakdown.
#[derive(Debug, Clone, Copy, PartialEq, Default, Deserialize, Serialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ElectricityComponents {
    pub energy: f64,
    pub transmission: f64,
    pub distribution: f64,
    pub network_access: f64,
    pub public_obligation: f64,
    pub excise: f64,
}

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct WaterProvider {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub coverage_area: Option<String>,
    pub supply_rate: f64,
    pub sewerage_rate: f64,
    pub treatment_rate: f64,
}

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GasProvider {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub coverage_area: Option<String>,
    pub supply_rate: f64,
    pub distribution_rate: f64,
    pub transmission_rate: f64,
    pub excise_rate: f64,
}

/// A missing price means the station does not sell that fuel.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FuelStation {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub a95: Option<f64>,
    #[serde(default)]
    pub a98: Option<f64>,
    #[serde(default)]
    pub diesel: Option<f64>,
    #[serde(default)]
    pub lpg: Option<f64>,
}

impl FuelStation {
    pub fn price(&self, fuel: FuelType) -> Option<f64> {
        match fuel {
            FuelType::A95 => self.a95,
            FuelType::A98 => self.a98,
            FuelType::Diesel => self.diesel,
            FuelType::Lpg => self.lpg,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LoanProduct {
    pub id: String,
    pub bank: String,
    pub name: String,
    /// Annual nominal rate in percent.
    pub annual_rate: f64,
    pub min_amount: f64,
    pub max_amount: f64,
    pub min_term_months: u32,
    pub max_term_months: u32,
    #[serde(default)]
    pub upfront_fee: f64,
}

impl LoanProduct {
    pub fn accepts(&self, amount: f64, term_months: u32) -> bool {
        term_months > 0
            && (self.min_amount..=self.max_amount).contains(&amount)
            && (self.min_term_months..=self.max_term_months).contains(&term_months)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ElectricityInput {
    pub metering: Metering,
    pub day_kwh: f64,
    pub night_kwh: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct WaterInput {
    pub cubic_meters: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GasInput {
    pub kwh: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FuelInput {
    pub fuel_type: FuelType,
    pub monthly_liters: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LoanInput {
    pub amount: f64,
    pub term_months: u32,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ElectricityFeeBreakdown {
    pub energy: f64,
    pub transmission: f64,
    pub distribution: f64,
    pub network_access: f64,
    pub public_obligation: f64,
    pub excise: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ElectricityCost {
    pub provider: ElectricityProvider,
    pub day_cost: f64,
    pub night_cost: f64,
    pub subtotal: f64,
    pub vat: f64,
    pub total_with_vat: f64,
    pub fees: ElectricityFeeBreakdown,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct WaterCost {
    pub provider: WaterProvider,
    pub supply: f64,
    pub sewerage: f64,
    pub treatment: f64,
    pub subtotal: f64,
    pub vat: f64,
    pub total_with_vat: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GasCost {
    pub provider: GasProvider,
    pub supply: f64,
    pub distribution: f64,
    pub transmission: f64,
    pub excise: f64,
    pub subtotal: f64,
    pub vat: f64,
    pub total_with_vat: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FuelCost {
    pub station: FuelStation,
    pub fuel_type: FuelType,
    pub price_per_liter: f64,
    pub monthly_cost: f64,
    pub yearly_cost: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LoanCost {
    pub product: LoanProduct,
    pub monthly_payment: f64,
    pub total_payment: f64,
    pub total_interest: f64,
}

/// One entry of a ranked comparison list.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Ranked<T> {
    #[serde(flatten)]
    pub entry: T,
    pub is_cheapest: bool,
    pub difference_from_cheapest: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PayrollBreakdown {
    pub gross_eur: f64,
    pub insurable_income_eur: f64,
    pub pension_eur: f64,
    pub supplementary_pension_eur: f64,
    pub health_eur: f64,
    pub total_employee_insurance_eur: f64,
    pub taxable_income_eur: f64,
    pub income_tax_eur: f64,
    pub net_eur: f64,
    pub employer_insurance_eur: f64,
    pub total_cost_eur: f64,
    pub effective_tax_rate: f64,
    pub net_to_gross_ratio: f64,
}
