mod electricity;
mod fuel;
mod gas;
mod loans;
pub mod money;
mod payroll;
mod ranking;
mod types;
mod water;

pub use electricity::{Electricity, compare_electricity, electricity_cost};
pub use fuel::{Fuel, compare_fuel, fuel_cost};
pub use gas::{Gas, compare_gas, gas_cost};
pub use loans::{Loans, compare_loans, loan_cost, monthly_payment};
pub use money::{Currency, FixedPeg, format_money, round2};
pub use payroll::{
    EmployeeRates, EmployerRates, MAX_INSURANCE_INCOME_EUR, PayrollRates, gross_from_net,
    net_from_gross,
};
pub use ranking::{CostModel, compare, rank_by};
pub use types::{
    ElectricityComponents, ElectricityCost, ElectricityFeeBreakdown, ElectricityInput,
    ElectricityProvider, FuelCost, FuelInput, FuelStation, FuelType, GasCost, GasInput,
    GasProvider, LoanCost, LoanInput, LoanProduct, Metering, PayrollBreakdown, Ranked, WaterCost,
    WaterInput, WaterProvider,
};
pub use water::{Water, compare_water, water_cost};
