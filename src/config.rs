use std::collections::HashSet;
use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::info;

use crate::core::{
    ElectricityProvider, FixedPeg, FuelStation, FuelType, GasProvider, LoanProduct, PayrollRates,
    WaterProvider,
};
use crate::error::ConfigError;

const REFERENCE_RATES: &str = include_str!("../data/rates.toml");

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 8080,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct LoggingConfig {
    pub level: String,
    pub json: bool,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            json: false,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct AppConfig {
    pub server: ServerConfig,
    pub logging: LoggingConfig,
    pub payroll: PayrollRates,
    pub currency: FixedPeg,
}

impl AppConfig {
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let raw = read(path)?;
        let config = Self::from_toml_str(&raw).map_err(|e| match e {
            ConfigError::Parse { source, .. } => ConfigError::Parse {
                path: path.display().to_string(),
                source,
            },
            other => other,
        })?;
        info!(path = %path.display(), "configuration loaded");
        Ok(config)
    }

    pub fn from_toml_str(raw: &str) -> Result<Self, ConfigError> {
        let config: AppConfig = toml::from_str(raw).map_err(|source| ConfigError::Parse {
            path: "<inline>".to_string(),
            source,
        })?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        self.payroll.validate().map_err(ConfigError::Invalid)?;
        if !self.currency.bgn_per_eur.is_finite() || self.currency.bgn_per_eur <= 0.0 {
            return Err(ConfigError::Invalid(
                "currency.bgn_per_eur must be > 0".to_string(),
            ));
        }
        Ok(())
    }
}

/// Provider tables for every comparison domain. Loaded once, then shared read-only.
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct RateTables {
    pub electricity: Vec<ElectricityProvider>,
    pub water: Vec<WaterProvider>,
    pub gas: Vec<GasProvider>,
    pub fuel: Vec<FuelStation>,
    pub loans: Vec<LoanProduct>,
}

impl RateTables {
    /// The tables bundled with the binary.
    pub fn reference() -> Result<Self, ConfigError> {
        Self::from_toml_str(REFERENCE_RATES, "<bundled rates>")
    }

    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let raw = read(path)?;
        let tables = Self::from_toml_str(&raw, &path.display().to_string())?;
        info!(path = %path.display(), "rate tables loaded");
        Ok(tables)
    }

    fn from_toml_str(raw: &str, origin: &str) -> Result<Self, ConfigError> {
        let tables: RateTables = toml::from_str(raw).map_err(|source| ConfigError::Parse {
            path: origin.to_string(),
            source,
        })?;
        tables.validate().map_err(ConfigError::Invalid)?;
        Ok(tables)
    }

    pub fn validate(&self) -> Result<(), String> {
        unique_ids("electricity", self.electricity.iter().map(|p| p.id.as_str()))?;
        unique_ids("water", self.water.iter().map(|p| p.id.as_str()))?;
        unique_ids("gas", self.gas.iter().map(|p| p.id.as_str()))?;
        unique_ids("fuel", self.fuel.iter().map(|s| s.id.as_str()))?;
        unique_ids("loans", self.loans.iter().map(|p| p.id.as_str()))?;

        for p in &self.electricity {
            let c = &p.components;
            for (field, value) in [
                ("dayRate", p.day_rate),
                ("nightRate", p.night_rate),
                ("singleRate", p.single_rate),
                ("components.energy", c.energy),
                ("components.transmission", c.transmission),
                ("components.distribution", c.distribution),
                ("components.networkAccess", c.network_access),
                ("components.publicObligation", c.public_obligation),
                ("components.excise", c.excise),
            ] {
                rate("electricity", &p.id, field, value)?;
            }
        }
        for p in &self.water {
            rate("water", &p.id, "supplyRate", p.supply_rate)?;
            rate("water", &p.id, "sewerageRate", p.sewerage_rate)?;
            rate("water", &p.id, "treatmentRate", p.treatment_rate)?;
        }
        for p in &self.gas {
            rate("gas", &p.id, "supplyRate", p.supply_rate)?;
            rate("gas", &p.id, "distributionRate", p.distribution_rate)?;
            rate("gas", &p.id, "transmissionRate", p.transmission_rate)?;
            rate("gas", &p.id, "exciseRate", p.excise_rate)?;
        }
        for s in &self.fuel {
            for fuel in FuelType::ALL {
                if let Some(price) = s.price(fuel) {
                    rate("fuel", &s.id, fuel.as_str(), price)?;
                }
            }
        }
        for p in &self.loans {
            rate("loans", &p.id, "annualRate", p.annual_rate)?;
            rate("loans", &p.id, "minAmount", p.min_amount)?;
            rate("loans", &p.id, "maxAmount", p.max_amount)?;
            rate("loans", &p.id, "upfrontFee", p.upfront_fee)?;
            if p.min_amount > p.max_amount {
                return Err(format!("loans/{}: minAmount must be <= maxAmount", p.id));
            }
            if p.min_term_months > p.max_term_months {
                return Err(format!(
                    "loans/{}: minTermMonths must be <= maxTermMonths",
                    p.id
                ));
            }
        }
        Ok(())
    }
}

fn read(path: &Path) -> Result<String, ConfigError> {
    std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
        path: path.display().to_string(),
        source,
    })
}

fn rate(domain: &str, id: &str, field: &str, value: f64) -> Result<(), String> {
    if value.is_finite() && value >= 0.0 {
        Ok(())
    } else {
        Err(format!("{domain}/{id}: {field} must be a finite number >= 0"))
    }
}

fn unique_ids<'a>(domain: &str, ids: impl Iterator<Item = &'a str>) -> Result<(), String> {
    let mut seen = HashSet::new();
    for id in ids {
        if id.is_empty() {
            return Err(format!("{domain}: provider id must not be empty"));
        }
        if !seen.insert(id) {
            return Err(format!("{domain}: duplicate id '{id}'"));
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::MAX_INSURANCE_INCOME_EUR;

    #[test]
    fn bundled_rate_tables_parse_and_validate() {
        let tables = RateTables::reference().expect("bundled rates must be valid");
        assert_eq!(tables.electricity.len(), 3);
        assert!(!tables.water.is_empty());
        assert!(!tables.gas.is_empty());
        assert!(tables.fuel.iter().any(|s| s.a98.is_none()));
        assert!(tables.loans.iter().all(|p| p.min_term_months >= 1));
    }

    #[test]
    fn empty_config_uses_reference_defaults() {
        let config = AppConfig::from_toml_str("").expect("empty config is valid");
        assert_eq!(config, AppConfig::default());
        assert_eq!(config.server.port, 8080);
        assert_eq!(config.payroll.max_insurable_income, MAX_INSURANCE_INCOME_EUR);
        assert_eq!(config.currency.bgn_per_eur, 1.95583);
    }

    #[test]
    fn partial_payroll_section_keeps_other_defaults() {
        let raw = r#"
            [server]
            port = 9090

            [logging]
            level = "debug"
            json = true

            [payroll]
            income_tax_rate = 0.15

            [payroll.employer]
            health = 0.05
        "#;
        let config = AppConfig::from_toml_str(raw).expect("valid config");
        assert_eq!(config.server.port, 9090);
        assert_eq!(config.server.host, "0.0.0.0");
        assert!(config.logging.json);
        assert_eq!(config.payroll.income_tax_rate, 0.15);
        assert_eq!(config.payroll.employer.health, 0.05);
        assert_eq!(config.payroll.employer.pension, 0.0822);
        assert_eq!(config.payroll.employee.health, 0.032);
    }

    #[test]
    fn invalid_peg_is_rejected() {
        let err = AppConfig::from_toml_str("[currency]\nbgn_per_eur = 0.0\n").unwrap_err();
        assert!(matches!(err, ConfigError::Invalid(_)));
    }

    #[test]
    fn negative_rate_is_rejected() {
        let raw = r#"
            [[water]]
            id = "bad"
            name = "Bad"
            supplyRate = -1.0
            sewerageRate = 0.1
            treatmentRate = 0.1
        "#;
        let err = RateTables::from_toml_str(raw, "test").unwrap_err();
        assert!(err.to_string().contains("water/bad: supplyRate"));
    }

    #[test]
    fn inverted_loan_bounds_are_rejected() {
        let raw = r#"
            [[loans]]
            id = "inv"
            bank = "B"
            name = "Inverted"
            annualRate = 8.0
            minAmount = 5000.0
            maxAmount = 1000.0
            minTermMonths = 12
            maxTermMonths = 60
        "#;
        let err = RateTables::from_toml_str(raw, "test").unwrap_err();
        assert!(err.to_string().contains("minAmount must be <= maxAmount"));
    }

    #[test]
    fn duplicate_ids_are_rejected() {
        let raw = r#"
            [[fuel]]
            id = "x"
            name = "X"
            diesel = 1.3

            [[fuel]]
            id = "x"
            name = "X again"
            lpg = 0.6
        "#;
        let err = RateTables::from_toml_str(raw, "test").unwrap_err();
        assert!(err.to_string().contains("duplicate id 'x'"));
    }

    #[test]
    fn missing_file_reports_path() {
        let err = RateTables::load(Path::new("/nonexistent/rates.toml")).unwrap_err();
        assert!(matches!(err, ConfigError::Io { .. }));
        assert!(err.to_string().contains("/nonexistent/rates.toml"));
    }
}
