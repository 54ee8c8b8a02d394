use std::error::Error;
use std::net::{IpAddr, SocketAddr};
use std::path::PathBuf;

use clap::{ArgGroup, Parser, Subcommand, ValueEnum};
use serde::Serialize;
use tracing::info;

use crate::api::{AppState, run_http_server};
use crate::config::{AppConfig, RateTables};
use crate::core::{
    Currency, ElectricityInput, FixedPeg, FuelInput, FuelType, GasInput, LoanInput, Metering,
    PayrollBreakdown, Ranked, WaterInput, compare_electricity, compare_fuel, compare_gas,
    compare_loans, compare_water, format_money, gross_from_net, net_from_gross,
};
use crate::error::{InputError, quantity};
use crate::logging;

#[derive(Copy, Clone, Debug, Eq, PartialEq, ValueEnum)]
enum CliMetering {
    Single,
    Dual,
}

impl From<CliMetering> for Metering {
    fn from(value: CliMetering) -> Self {
        match value {
            CliMetering::Single => Metering::Single,
            CliMetering::Dual => Metering::Dual,
        }
    }
}

#[derive(Copy, Clone, Debug, Eq, PartialEq, ValueEnum)]
enum CliFuelType {
    A95,
    A98,
    Diesel,
    Lpg,
}

impl From<CliFuelType> for FuelType {
    fn from(value: CliFuelType) -> Self {
        match value {
            CliFuelType::A95 => FuelType::A95,
            CliFuelType::A98 => FuelType::A98,
            CliFuelType::Diesel => FuelType::Diesel,
            CliFuelType::Lpg => FuelType::Lpg,
        }
    }
}

#[derive(Copy, Clone, Debug, Eq, PartialEq, ValueEnum)]
enum CliCurrency {
    Eur,
    Bgn,
}

impl From<CliCurrency> for Currency {
    fn from(value: CliCurrency) -> Self {
        match value {
            CliCurrency::Eur => Currency::Eur,
            CliCurrency::Bgn => Currency::Bgn,
        }
    }
}

#[derive(Parser, Debug)]
#[command(
    name = "sravni",
    about = "Household tariff comparison and net/gross payroll conversion"
)]
pub struct Cli {
    #[arg(long, global = true, help = "TOML configuration file")]
    config: Option<PathBuf>,
    #[arg(long, global = true, help = "TOML rate tables; defaults to the bundled tables")]
    rates: Option<PathBuf>,
    #[arg(long, global = true, help = "Print JSON instead of a text table")]
    json: bool,
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Serve the HTTP API.
    Serve {
        #[arg(long)]
        host: Option<IpAddr>,
        #[arg(long)]
        port: Option<u16>,
    },
    /// Convert a monthly salary between gross and net.
    #[command(group(ArgGroup::new("amount").required(true).args(["gross", "net"])))]
    Payroll {
        #[arg(long)]
        gross: Option<f64>,
        #[arg(long)]
        net: Option<f64>,
        #[arg(long, value_enum, default_value_t = CliCurrency::Eur)]
        currency: CliCurrency,
    },
    /// Rank providers for one domain.
    #[command(subcommand)]
    Compare(CompareCommand),
}

#[derive(Subcommand, Debug)]
enum CompareCommand {
    Electricity {
        #[arg(long, value_enum, default_value_t = CliMetering::Dual)]
        metering: CliMetering,
        #[arg(long)]
        day_kwh: f64,
        #[arg(long, default_value_t = 0.0)]
        night_kwh: f64,
    },
    Water {
        #[arg(long)]
        cubic_meters: f64,
    },
    Gas {
        #[arg(long)]
        kwh: f64,
    },
    Fuel {
        #[arg(long, value_enum)]
        fuel_type: CliFuelType,
        #[arg(long)]
        monthly_liters: f64,
    },
    Loans {
        #[arg(long)]
        amount: f64,
        #[arg(long, help = "Loan term in months")]
        term_months: u32,
    },
}

pub async fn run(cli: Cli) -> Result<(), Box<dyn Error>> {
    let config = match &cli.config {
        Some(path) => AppConfig::load(path)?,
        None => AppConfig::default(),
    };
    logging::init(&config.logging);

    let tables = match &cli.rates {
        Some(path) => RateTables::load(path)?,
        None => RateTables::reference()?,
    };

    match cli.command {
        Command::Serve { host, port } => {
            let host = match host {
                Some(host) => host,
                None => config.server.host.parse()?,
            };
            let addr = SocketAddr::new(host, port.unwrap_or(config.server.port));
            info!(
                electricity = tables.electricity.len(),
                water = tables.water.len(),
                gas = tables.gas.len(),
                fuel = tables.fuel.len(),
                loans = tables.loans.len(),
                "starting server"
            );
            let state = AppState {
                tables,
                payroll: config.payroll,
                peg: config.currency,
            };
            run_http_server(addr, state).await?;
        }
        Command::Payroll {
            gross,
            net,
            currency,
        } => {
            let currency: Currency = currency.into();
            let peg = config.currency;
            let breakdown = match (gross, net) {
                (Some(gross), _) => {
                    let gross = peg.to_reporting(quantity("gross", gross)?, currency);
                    net_from_gross(gross, &config.payroll)
                }
                (None, Some(net)) => {
                    let net = peg.to_reporting(quantity("net", net)?, currency);
                    gross_from_net(net, &config.payroll)
                }
                (None, None) => return Err(InputError::Missing { field: "gross" }.into()),
            };
            if cli.json {
                println!("{}", serde_json::to_string_pretty(&breakdown)?);
            } else {
                print!("{}", payroll_table(&breakdown, peg));
            }
        }
        Command::Compare(compare) => run_compare(compare, &tables, cli.json)?,
    }
    Ok(())
}

fn run_compare(
    command: CompareCommand,
    tables: &RateTables,
    json: bool,
) -> Result<(), Box<dyn Error>> {
    match command {
        CompareCommand::Electricity {
            metering,
            day_kwh,
            night_kwh,
        } => {
            let input = ElectricityInput {
                metering: metering.into(),
                day_kwh: quantity("day-kwh", day_kwh)?,
                night_kwh: quantity("night-kwh", night_kwh)?,
            };
            let ranked = compare_electricity(&input, &tables.electricity);
            emit(&ranked, json, |c| (c.provider.name.clone(), c.total_with_vat))?;
        }
        CompareCommand::Water { cubic_meters } => {
            let input = WaterInput {
                cubic_meters: quantity("cubic-meters", cubic_meters)?,
            };
            let ranked = compare_water(&input, &tables.water);
            emit(&ranked, json, |c| (c.provider.name.clone(), c.total_with_vat))?;
        }
        CompareCommand::Gas { kwh } => {
            let input = GasInput {
                kwh: quantity("kwh", kwh)?,
            };
            let ranked = compare_gas(&input, &tables.gas);
            emit(&ranked, json, |c| (c.provider.name.clone(), c.total_with_vat))?;
        }
        CompareCommand::Fuel {
            fuel_type,
            monthly_liters,
        } => {
            let input = FuelInput {
                fuel_type: fuel_type.into(),
                monthly_liters: quantity("monthly-liters", monthly_liters)?,
            };
            let ranked = compare_fuel(&input, &tables.fuel);
            emit(&ranked, json, |c| (c.station.name.clone(), c.monthly_cost))?;
        }
        CompareCommand::Loans {
            amount,
            term_months,
        } => {
            if term_months == 0 {
                return Err(InputError::ZeroTerm.into());
            }
            let input = LoanInput {
                amount: quantity("amount", amount)?,
                term_months,
            };
            let ranked = compare_loans(&input, &tables.loans);
            emit(&ranked, json, |c| {
                (
                    format!("{} {}", c.product.bank, c.product.name),
                    c.monthly_payment,
                )
            })?;
        }
    }
    Ok(())
}

fn emit<T: Serialize>(
    ranked: &[Ranked<T>],
    json: bool,
    label: impl Fn(&T) -> (String, f64),
) -> Result<(), serde_json::Error> {
    if json {
        println!("{}", serde_json::to_string_pretty(ranked)?);
    } else {
        print!("{}", ranked_table(ranked, label));
    }
    Ok(())
}

fn ranked_table<T>(ranked: &[Ranked<T>], label: impl Fn(&T) -> (String, f64)) -> String {
    if ranked.is_empty() {
        return "No matching offer.\n".to_string();
    }
    let mut out = String::new();
    for (idx, r) in ranked.iter().enumerate() {
        let (name, amount) = label(&r.entry);
        let marker = if r.is_cheapest {
            "  cheapest".to_string()
        } else {
            format!("  +{}", format_money(r.difference_from_cheapest, Currency::Eur))
        };
        out.push_str(&format!(
            "{:>2}. {:<32} {:>14}{marker}\n",
            idx + 1,
            name,
            format_money(amount, Currency::Eur),
        ));
    }
    out
}

fn payroll_table(b: &PayrollBreakdown, peg: FixedPeg) -> String {
    let rows = [
        ("Gross", b.gross_eur),
        ("Pension", b.pension_eur),
        ("Supplementary pension", b.supplementary_pension_eur),
        ("Health", b.health_eur),
        ("Employee insurance", b.total_employee_insurance_eur),
        ("Taxable income", b.taxable_income_eur),
        ("Income tax", b.income_tax_eur),
        ("Net", b.net_eur),
        ("Employer insurance", b.employer_insurance_eur),
        ("Total employer cost", b.total_cost_eur),
    ];
    let mut out = String::new();
    for (name, eur) in rows {
        out.push_str(&format!(
            "{name:<22} {:>14} {:>16}\n",
            format_money(eur, Currency::Eur),
            format_money(peg.to_bgn(eur), Currency::Bgn),
        ));
    }
    out.push_str(&format!(
        "{:<22} {:>13.2}%\n{:<22} {:>13.2}%\n",
        "Effective tax rate",
        b.effective_tax_rate * 100.0,
        "Net / gross",
        b.net_to_gross_ratio * 100.0,
    ));
    out
}
