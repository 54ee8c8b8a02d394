use serde::{Deserialize, Serialize};

use super::types::PayrollBreakdown;

/// Employee-side contribution rates, as fractions of insurable income.
#[derive(Debug, Clone, Copy, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct EmployeeRates {
    pub pension: f64,
    pub supplementary_pension: f64,
    pub health: f64,
}

impl Default for EmployeeRates {
    fn default() -> Self {
        Self {
            pension: 0.0574,
            supplementary_pension: 0.022,
            health: 0.032,
        }
    }
}

impl EmployeeRates {
    pub fn total(self) -> f64 {
        self.pension + self.supplementary_pension + self.health
    }
}

/// Employer-side contribution rates for the five funds.
#[derive(Debug, Clone, Copy, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct EmployerRates {
    pub pension: f64,
    pub sickness_maternity: f64,
    pub unemployment: f64,
    pub supplementary_pension: f64,
    pub health: f64,
}

impl Default for EmployerRates {
    fn default() -> Self {
        Self {
            pension: 0.0822,
            sickness_maternity: 0.021,
            unemployment: 0.006,
            supplementary_pension: 0.028,
            health: 0.048,
        }
    }
}

impl EmployerRates {
    pub fn total(self) -> f64 {
        self.pension
            + self.sickness_maternity
            + self.unemployment
            + self.supplementary_pension
            + self.health
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct PayrollRates {
    /// Monthly ceiling on insurable income, in EUR.
    pub max_insurable_income: f64,
    pub income_tax_rate: f64,
    pub employee: EmployeeRates,
    pub employer: EmployerRates,
}

pub const MAX_INSURANCE_INCOME_EUR: f64 = 2111.64;

impl Default for PayrollRates {
    fn default() -> Self {
        Self {
            max_insurable_income: MAX_INSURANCE_INCOME_EUR,
            income_tax_rate: 0.10,
            employee: EmployeeRates::default(),
            employer: EmployerRates::default(),
        }
    }
}

impl PayrollRates {
    pub fn validate(&self) -> Result<(), String> {
        let fraction = |name: &str, value: f64| {
            if value.is_finite() && (0.0..1.0).contains(&value) {
                Ok(())
            } else {
                Err(format!("{name} must be in [0, 1)"))
            }
        };
        if !self.max_insurable_income.is_finite() || self.max_insurable_income < 0.0 {
            return Err("max_insurable_income must be >= 0".to_string());
        }
        fraction("income_tax_rate", self.income_tax_rate)?;
        fraction("employee.pension", self.employee.pension)?;
        fraction("employee.supplementary_pension", self.employee.supplementary_pension)?;
        fraction("employee.health", self.employee.health)?;
        fraction("employee total", self.employee.total())?;
        fraction("employer.pension", self.employer.pension)?;
        fraction("employer.sickness_maternity", self.employer.sickness_maternity)?;
        fraction("employer.unemployment", self.employer.unemployment)?;
        fraction("employer.supplementary_pension", self.employer.supplementary_pension)?;
        fraction("employer.health", self.employer.health)?;
        Ok(())
    }
}

pub fn net_from_gross(gross: f64, rates: &PayrollRates) -> PayrollBreakdown {
    let insurable = gross.min(rates.max_insurable_income);

    let pension = insurable * rates.employee.pension;
    let supplementary_pension = insurable * rates.employee.supplementary_pension;
    let health = insurable * rates.employee.health;
    let total_employee_insurance = pension + supplementary_pension + health;

    let taxable_income = gross - total_employee_insurance;
    let income_tax = taxable_income * rates.income_tax_rate;
    let net = taxable_income - income_tax;

    let employer_insurance = insurable * rates.employer.total();

    let (effective_tax_rate, net_to_gross_ratio) = if gross == 0.0 {
        (0.0, 0.0)
    } else {
        ((gross - net) / gross, net / gross)
    };

    PayrollBreakdown {
        gross_eur: gross,
        insurable_income_eur: insurable,
        pension_eur: pension,
        supplementary_pension_eur: supplementary_pension,
        health_eur: health,
        total_employee_insurance_eur: total_employee_insurance,
        taxable_income_eur: taxable_income,
        income_tax_eur: income_tax,
        net_eur: net,
        employer_insurance_eur: employer_insurance,
        total_cost_eur: gross + employer_insurance,
        effective_tax_rate,
        net_to_gross_ratio,
    }
}

/// Inverts [`net_from_gross`]. Below the insurance ceiling the forward formula
/// is linear in gross; above it the contributions are a constant, so each
/// regime has a closed-form solution.
pub fn gross_from_net(net: f64, rates: &PayrollRates) -> PayrollBreakdown {
    let employee_total = rates.employee.total();
    let keep_after_tax = 1.0 - rates.income_tax_rate;

    let uncapped = net / ((1.0 - employee_total) * keep_after_tax);
    if uncapped <= rates.max_insurable_income {
        return net_from_gross(uncapped, rates);
    }

    let gross = net / keep_after_tax + rates.max_insurable_income * employee_total;
    net_from_gross(gross, rates)
}
