//! # qtyguard CLI
//!
//! Runs the add-to-cart or update-cart gate against a JSON scenario.
//!
//! ## Usage
//! ```text
//! qtyguard --scenario shop.json add --product 1 --quantity 4
//! qtyguard --scenario shop.json update --key k1 --quantity 6
//! qtyguard --scenario shop.json explain --product 1
//! ```
//!
//! Exit code 0 on pass, 1 on fail, 2 when the scenario cannot be loaded.
//!
//! ## Startup Sequence
//! 1. Load configuration (`QTYGUARD_*`)
//! 2. Initialize tracing (logging)
//! 3. Load the scenario
//! 4. Pick the notice channel for the host version
//! 5. Run the gate, print notices and verdict

mod config;
mod error;
mod scenario;

use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::Context;
use clap::{Parser, Subcommand};
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

use qtyguard_core::notice::{HostVersion, NoticeChannel};
use qtyguard_core::{
    AddToCart, CartStore, ProductId, ProductStore, Quantity, RuleResolver, VariationAttributes,
};

use crate::config::{GateConfig, LogFormat};
use crate::scenario::Scenario;

#[derive(Debug, Parser)]
#[command(name = "qtyguard", version, about = "Check cart quantities against quantity rules")]
struct Cli {
    /// Scenario file with products, rules and cart
    #[arg(short, long)]
    scenario: PathBuf,

    /// Host version, overrides QTYGUARD_HOST_VERSION
    #[arg(long)]
    host_version: Option<HostVersion>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Clone, Subcommand)]
enum Command {
    /// Validate adding units of a product
    Add {
        #[arg(long)]
        product: u64,
        #[arg(long, value_parser = parse_quantity)]
        quantity: f64,
        #[arg(long)]
        variation: Option<u64>,
    },
    /// Validate changing an existing cart line
    Update {
        #[arg(long)]
        key: String,
        #[arg(long, value_parser = parse_quantity)]
        quantity: f64,
    },
    /// Show the rule and limits that apply to a product
    Explain {
        #[arg(long)]
        product: u64,
    },
}

/// What one command produced.
#[derive(Debug)]
enum Outcome {
    Verdict {
        passed: bool,
        messages: Vec<String>,
        /// Cart item key and new product total after a passing add.
        added: Option<(String, Quantity)>,
    },
    Report(serde_json::Value),
}

impl Outcome {
    fn passed(&self) -> bool {
        match self {
            Outcome::Verdict { passed, .. } => *passed,
            Outcome::Report(_) => true,
        }
    }
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    let config = match GateConfig::load() {
        Ok(config) => config,
        Err(err) => {
            eprintln!("qtyguard: {err}");
            return ExitCode::from(2);
        }
    };

    init_tracing(config.log_format);

    let result = run(cli, config);
    if let Err(err) = &result {
        error!(error = ?err, "qtyguard failed");
        eprintln!("qtyguard: {err:#}");
    }
    ExitCode::from(exit_status(&result))
}

/// 0 on pass, 1 on fail, 2 on error.
fn exit_status(result: &anyhow::Result<Outcome>) -> u8 {
    match result {
        Ok(outcome) if outcome.passed() => 0,
        Ok(_) => 1,
        Err(_) => 2,
    }
}

fn run(cli: Cli, config: GateConfig) -> anyhow::Result<Outcome> {
    let scenario = Scenario::load(&cli.scenario)?;
    let host_version = cli.host_version.unwrap_or(config.host_version);
    info!(%host_version, "host version");

    let outcome = execute(&scenario, cli.command, host_version)?;
    print_outcome(&outcome)?;
    Ok(outcome)
}

/// Runs one command against the scenario.
///
/// A passing add is applied to a copy of the cart so the new line key and
/// product total can be reported. The scenario itself is left untouched.
fn execute(
    scenario: &Scenario,
    command: Command,
    host_version: HostVersion,
) -> anyhow::Result<Outcome> {
    let mut channel = NoticeChannel::for_host(host_version);
    let gate = scenario.gate();

    let (passed, added) = match command {
        Command::Add {
            product,
            quantity,
            variation,
        } => {
            let mut request = AddToCart::new(product, quantity);
            request.variation_id = variation;

            let passed = gate.add_to_cart_validation(true, &request, &mut channel);
            let added = if passed {
                let mut cart = scenario.cart.clone();
                let key = cart.add_line(
                    product,
                    variation,
                    VariationAttributes::new(),
                    Quantity::new(quantity),
                )?;
                Some((key, cart.quantity_for_product(product)))
            } else {
                None
            };
            (passed, added)
        }
        Command::Update { key, quantity } => {
            let values = scenario
                .cart
                .line_values(&key)
                .with_context(|| format!("cart has no line {key}"))?;
            let passed = gate.update_cart_validation(
                true,
                &key,
                &values,
                Quantity::new(quantity),
                &mut channel,
            );
            (passed, None)
        }
        Command::Explain { product } => return explain(scenario, product).map(Outcome::Report),
    };

    Ok(Outcome::Verdict {
        passed,
        messages: channel.messages().into_iter().map(str::to_string).collect(),
        added,
    })
}

fn print_outcome(outcome: &Outcome) -> anyhow::Result<()> {
    match outcome {
        Outcome::Verdict {
            passed,
            messages,
            added,
        } => {
            for message in messages {
                println!("{message}");
            }
            if let Some((key, total)) = added {
                println!("Added line {key}; cart now holds {total}");
            }
            println!("{}", if *passed { "PASS" } else { "FAIL" });
        }
        Outcome::Report(report) => println!("{}", serde_json::to_string_pretty(report)?),
    }
    Ok(())
}

/// The resolved rule and stock-adjusted limits for a product.
fn explain(scenario: &Scenario, product_id: ProductId) -> anyhow::Result<serde_json::Value> {
    let product = scenario
        .catalog
        .product(product_id)
        .with_context(|| format!("product {product_id} is not in the scenario"))?;

    let report = match scenario.rules.resolve(&product) {
        Some(applied) => {
            let limits = applied.rule.limits_for(&product);
            serde_json::json!({
                "product": product.id,
                "rule_id": applied.id,
                "rule": applied.rule,
                "out_of_stock": product.is_out_of_stock(),
                "limits": {
                    "min": limits.min,
                    "max": limits.max,
                    "step": limits.step,
                },
            })
        }
        None => serde_json::json!({ "product": product.id, "rule_id": null }),
    };

    Ok(report)
}

/// Accepts finite numbers only; `NaN` would slip past every bound.
fn parse_quantity(raw: &str) -> Result<f64, String> {
    let value: f64 = raw
        .trim()
        .parse()
        .map_err(|_| format!("'{raw}' is not a number"))?;
    if value.is_finite() {
        Ok(value)
    } else {
        Err(format!("'{raw}' is not a finite quantity"))
    }
}

/// Initializes the tracing subscriber for structured logging.
///
/// ## Log Levels
/// - `RUST_LOG=debug` - Show every check
/// - Default: `info,qtyguard=debug`, written to stderr so stdout stays
///   readable
fn init_tracing(format: LogFormat) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("info,qtyguard=debug"));

    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr);

    match format {
        LogFormat::Pretty => builder.init(),
        LogFormat::Json => builder.json().init(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SHOP: &str = r#"{
        "products": [
            { "id": 1, "title": "Widget" },
            { "id": 2, "title": "Bolt" }
        ],
        "rules": [{
            "id": "widgets",
            "scope": { "type": "product", "value": 1 },
            "rule": { "min_value": 2, "max_value": 10, "step": 2 }
        }],
        "cart": [{ "key": "k1", "product_id": 1, "quantity": 4 }]
    }"#;

    fn shop() -> Scenario {
        Scenario::from_json(SHOP).unwrap()
    }

    fn add(product: u64, quantity: f64) -> Command {
        Command::Add {
            product,
            quantity,
            variation: None,
        }
    }

    const CURRENT: HostVersion = HostVersion::new(2, 1, 0);

    #[test]
    fn test_passing_add_reports_new_line() {
        let scenario = shop();
        let outcome = execute(&scenario, add(1, 4.0), CURRENT).unwrap();

        match &outcome {
            Outcome::Verdict {
                passed,
                messages,
                added,
            } => {
                assert!(*passed);
                assert!(messages.is_empty());
                let (key, total) = added.as_ref().unwrap();
                assert_eq!(key, "k1");
                assert_eq!(total.value(), 8.0);
            }
            Outcome::Report(_) => panic!("expected a verdict"),
        }
        assert_eq!(exit_status(&Ok(outcome)), 0);

        // the loaded cart is not changed
        assert_eq!(scenario.cart.quantity_for_product(1).value(), 4.0);
    }

    #[test]
    fn test_add_for_new_product_gets_fresh_key() {
        let outcome = execute(&shop(), add(2, 3.0), CURRENT).unwrap();
        let Outcome::Verdict { added, .. } = outcome else {
            panic!("expected a verdict");
        };
        let (key, total) = added.unwrap();
        assert_ne!(key, "k1");
        assert_eq!(total.value(), 3.0);
    }

    #[test]
    fn test_failing_add_exits_one() {
        let outcome = execute(&shop(), add(1, 8.0), CURRENT).unwrap();

        let Outcome::Verdict {
            passed,
            ref messages,
            ref added,
        } = outcome
        else {
            panic!("expected a verdict");
        };
        assert!(!passed);
        assert!(added.is_none());
        assert_eq!(
            messages,
            &vec![
                "You can only purchase a maximum of 10 Widget's at once and your cart has 4 Widget's in it already."
                    .to_string()
            ]
        );
        assert_eq!(exit_status(&Ok(outcome)), 1);
    }

    #[test]
    fn test_legacy_host_gets_the_same_messages() {
        let outcome = execute(&shop(), add(1, 1.0), HostVersion::new(2, 0, 20)).unwrap();
        let Outcome::Verdict { messages, .. } = outcome else {
            panic!("expected a verdict");
        };
        assert_eq!(
            messages,
            vec!["You must add a minimum of 2 Widget's to your cart.".to_string()]
        );
    }

    #[test]
    fn test_update_checks_the_line_only() {
        let command = Command::Update {
            key: "k1".to_string(),
            quantity: 10.0,
        };
        let outcome = execute(&shop(), command, CURRENT).unwrap();
        assert!(outcome.passed());
        assert_eq!(exit_status(&Ok(outcome)), 0);
    }

    #[test]
    fn test_update_unknown_key_is_an_error() {
        let command = Command::Update {
            key: "missing".to_string(),
            quantity: 2.0,
        };
        let result = execute(&shop(), command, CURRENT);

        let err = result.as_ref().unwrap_err();
        assert!(format!("{err:#}").contains("cart has no line missing"));
        assert_eq!(exit_status(&result), 2);
    }

    #[test]
    fn test_explain_reports_limits() {
        let outcome = execute(&shop(), Command::Explain { product: 1 }, CURRENT).unwrap();
        let Outcome::Report(report) = &outcome else {
            panic!("expected a report");
        };
        assert_eq!(report["rule_id"], "widgets");
        assert_eq!(report["limits"]["max"], 10.0);
        assert_eq!(exit_status(&Ok(outcome)), 0);

        let report = explain(&shop(), 2).unwrap();
        assert!(report["rule_id"].is_null());
        assert!(explain(&shop(), 99).is_err());
    }

    #[test]
    fn test_parse_quantity_rejects_non_finite() {
        assert_eq!(parse_quantity("2.5"), Ok(2.5));
        assert!(parse_quantity("NaN").is_err());
        assert!(parse_quantity("inf").is_err());
        assert!(parse_quantity("two").is_err());
    }
}
