//! grouppay-engine CLI
//!
//! Compute balances and settlement payments for a group from the command line.
//!
//! # Usage
//!
//! ```bash
//! # Net balance of every member
//! grouppay-engine balances --input group.json
//!
//! # Balances plus the payments that settle them, as JSON
//! grouppay-engine settle --input group.json --format json
//!
//! # Generate a random group for testing
//! grouppay-engine generate --participants 8 --expenses 40
//! ```

use grouppay_engine::core::balance::BalanceSheet;
use grouppay_engine::core::currency::CurrencyCode;
use grouppay_engine::core::error::{EngineError, ValidationError};
use grouppay_engine::core::expense::{Expense, ExpenseId, GroupId, Share};
use grouppay_engine::core::money::{from_minor_units, to_minor_units, MAX_EXPONENT, MinorUnits};
use grouppay_engine::core::participant::ParticipantId;
use grouppay_engine::settlement::group::GroupSettlement;
use grouppay_engine::simulation::generator::{generate_random_group, GroupConfig};
use grouppay_engine::store::memory::MemoryStore;
use log::{debug, info};
use rust_decimal::Decimal;
use std::fs;
use std::process;

fn print_usage() {
    eprintln!(
        r#"grouppay-engine — group expense balances and settlement

USAGE:
    grouppay-engine <COMMAND> [OPTIONS]

COMMANDS:
    balances    Show the net balance of every group member
    settle      Show balances and the payments that settle them
    generate    Generate a random expense group (for testing)
    help        Show this message

OPTIONS (balances, settle):
    --input <FILE>      Path to JSON group file
    --format <FORMAT>   Output format: text (default) or json
    --exponent <N>      Minor-unit digits (default: derived from the currency)

OPTIONS (generate):
    --participants <N>  Number of members (default: 6)
    --expenses <N>      Number of expenses (default: 20)
    --currency <CODE>   Currency code (default: EUR)
    --output <FILE>     Write to file instead of stdout

ENVIRONMENT:
    RUST_LOG            Log filter (default: warn)

EXAMPLES:
    grouppay-engine balances --input trip.json
    grouppay-engine settle --input trip.json --format json
    grouppay-engine generate --participants 10 --expenses 50 --currency BGN"#
    );
}

/// JSON schema for an input group.
#[derive(serde::Deserialize, serde::Serialize)]
struct GroupFile {
    #[serde(default = "default_group_id")]
    group_id: i64,
    #[serde(default = "default_currency")]
    currency: String,
    expenses: Vec<ExpenseInput>,
}

#[derive(serde::Deserialize, serde::Serialize)]
struct ExpenseInput {
    id: i64,
    paid_by: i64,
    /// Major-unit decimal string, e.g. "12.50".
    amount: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    shares: Option<Vec<ShareInput>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    split_among: Option<Vec<i64>>,
}

#[derive(serde::Deserialize, serde::Serialize)]
struct ShareInput {
    participant: i64,
    share: String,
}

fn default_group_id() -> i64 {
    1
}

fn default_currency() -> String {
    "EUR".to_string()
}

/// JSON output schema for balances.
#[derive(serde::Serialize)]
struct BalanceOutput {
    participant: i64,
    balance: String,
    minor_units: i64,
    status: &'static str,
}

#[derive(serde::Serialize)]
struct PaymentOutput {
    from: i64,
    to: i64,
    amount: String,
    minor_units: i64,
}

#[derive(serde::Serialize)]
struct SettleOutput {
    group_id: i64,
    currency: String,
    balances: Vec<BalanceOutput>,
    payments: Vec<PaymentOutput>,
    direct_payment_count: usize,
    payment_reduction_percent: f64,
}

struct CommonArgs {
    input: String,
    format: String,
    exponent: Option<u32>,
}

struct LoadedGroup {
    group_id: GroupId,
    currency: CurrencyCode,
    exponent: u32,
    store: MemoryStore,
}

fn fail(message: impl std::fmt::Display) -> ! {
    eprintln!("Error: {}", message);
    process::exit(1);
}

/// Minor units as a major-unit string. Exponents are range-checked when
/// arguments and group files are read.
fn major(units: MinorUnits, exponent: u32) -> String {
    from_minor_units(units, exponent)
        .map(|d| d.to_string())
        .unwrap_or_else(|e| fail(e))
}

fn parse_common_args(args: &[String]) -> CommonArgs {
    let mut input = None;
    let mut format = "text".to_string();
    let mut exponent = None;
    let mut i = 0;
    while i < args.len() {
        match args[i].as_str() {
            "--input" => {
                i += 1;
                input = Some(args.get(i).cloned().unwrap_or_else(|| {
                    fail("--input requires a file path");
                }));
            }
            "--format" => {
                i += 1;
                format = match args.get(i).map(String::as_str) {
                    Some(f @ ("text" | "json")) => f.to_string(),
                    _ => fail("--format requires 'text' or 'json'"),
                };
            }
            "--exponent" => {
                i += 1;
                let digits: u32 = args
                    .get(i)
                    .and_then(|s| s.parse().ok())
                    .unwrap_or_else(|| fail("--exponent requires a number"));
                if digits > MAX_EXPONENT {
                    fail(format!("--exponent must be at most {}", MAX_EXPONENT));
                }
                exponent = Some(digits);
            }
            other => fail(format!("Unknown option: {}", other)),
        }
        i += 1;
    }

    CommonArgs {
        input: input.unwrap_or_else(|| fail("--input <FILE> is required")),
        format,
        exponent,
    }
}

fn parse_amount(raw: &str, exponent: u32) -> Result<i64, String> {
    let amount: Decimal = raw
        .trim()
        .parse()
        .map_err(|e| format!("Invalid amount '{}': {}", raw, e))?;
    to_minor_units(amount, exponent).map_err(|e| e.to_string())
}

fn build_store(file: GroupFile, exponent_override: Option<u32>) -> Result<LoadedGroup, String> {
    let group_id = GroupId::new(file.group_id);
    let currency = CurrencyCode::new(file.currency);
    let exponent = exponent_override.unwrap_or_else(|| currency.minor_unit_exponent());
    if exponent > MAX_EXPONENT {
        return Err(ValidationError::UnsupportedExponent(exponent).to_string());
    }
    let mut store = MemoryStore::new();

    for input in file.expenses {
        let id = ExpenseId::new(input.id);
        let amount = parse_amount(&input.amount, exponent)?;
        let mut expense = Expense::new(
            id,
            group_id,
            ParticipantId::new(input.paid_by),
            amount,
            currency.clone(),
        );
        if let Some(description) = input.description {
            expense = expense.with_description(description);
        }

        let shares = match (input.shares, input.split_among) {
            (Some(shares), None) => shares
                .into_iter()
                .map(|s| {
                    parse_amount(&s.share, exponent)
                        .map(|share| Share::new(id, ParticipantId::new(s.participant), share))
                })
                .collect::<Result<Vec<_>, _>>()?,
            (None, Some(among)) => {
                let members: Vec<ParticipantId> =
                    among.into_iter().map(ParticipantId::new).collect();
                expense
                    .even_shares(&members)
                    .map_err(|e: ValidationError| e.to_string())?
            }
            _ => {
                return Err(format!(
                    "expense {} needs exactly one of \"shares\" or \"split_among\"",
                    id
                ))
            }
        };

        store.add_expense(expense, shares).map_err(|e| e.to_string())?;
    }

    debug!("loaded {} expenses for group {}", store.expense_count(), group_id);
    Ok(LoadedGroup {
        group_id,
        currency,
        exponent,
        store,
    })
}

fn load_group(args: &CommonArgs) -> LoadedGroup {
    let content = fs::read_to_string(&args.input).unwrap_or_else(|e| {
        fail(format!("reading file '{}': {}", args.input, e));
    });

    let file: GroupFile = serde_json::from_str(&content).unwrap_or_else(|e| {
        eprintln!("Error parsing JSON: {}", e);
        eprintln!("Expected format:");
        eprintln!(
            r#"{{
  "group_id": 1,
  "currency": "EUR",
  "expenses": [
    {{ "id": 1, "paid_by": 1, "amount": "9.00", "split_among": [1, 2, 3] }},
    {{ "id": 2, "paid_by": 2, "amount": "5.00",
      "shares": [{{ "participant": 1, "share": "2.00" }}, {{ "participant": 3, "share": "3.00" }}] }}
  ]
}}"#
        );
        process::exit(1);
    });

    build_store(file, args.exponent).unwrap_or_else(|e| fail(e))
}

fn run_group(group: &LoadedGroup) -> GroupSettlement {
    GroupSettlement::from_source(&group.store, group.group_id, &group.currency).unwrap_or_else(
        |e| match e {
            EngineError::Invariant(_) => fail(format!("internal error, please report: {}", e)),
            other => fail(other),
        },
    )
}

fn balance_rows(balances: &BalanceSheet, exponent: u32) -> Vec<BalanceOutput> {
    balances
        .balances()
        .iter()
        .map(|(participant, &balance)| BalanceOutput {
            participant: participant.value(),
            balance: major(balance, exponent),
            minor_units: balance,
            status: match balance {
                b if b > 0 => "CREDITOR",
                b if b < 0 => "DEBTOR",
                _ => "SETTLED",
            },
        })
        .collect()
}

fn print_balances_text(balances: &BalanceSheet, exponent: u32) {
    println!("=== Balances ({}) ===", balances.currency());
    for row in balance_rows(balances, exponent) {
        println!(
            "  {:<10} {:>14} {}  [{}]",
            format!("#{}", row.participant),
            row.balance,
            balances.currency(),
            row.status
        );
    }
    println!(
        "Outstanding: {}",
        // Outstanding never exceeds the sum of i64 balances of one sign.
        i64::try_from(balances.outstanding())
            .map(|o| major(o, exponent))
            .unwrap_or_else(|_| balances.outstanding().to_string())
    );
}

fn to_json<T: serde::Serialize>(value: &T) -> String {
    serde_json::to_string_pretty(value).unwrap_or_else(|e| fail(format!("serializing output: {}", e)))
}

fn cmd_balances(args: &[String]) {
    let args = parse_common_args(args);
    let group = load_group(&args);
    let run = run_group(&group);

    if args.format == "json" {
        println!("{}", to_json(&balance_rows(run.balances(), group.exponent)));
    } else {
        print_balances_text(run.balances(), group.exponent);
    }
}

fn cmd_settle(args: &[String]) {
    let args = parse_common_args(args);
    let group = load_group(&args);
    let run = run_group(&group);
    info!(
        "group {}: {} payments instead of {}",
        group.group_id,
        run.plan().len(),
        run.direct_payment_count()
    );

    if args.format == "json" {
        let output = SettleOutput {
            group_id: group.group_id.value(),
            currency: group.currency.to_string(),
            balances: balance_rows(run.balances(), group.exponent),
            payments: run
                .plan()
                .payments()
                .iter()
                .map(|p| PaymentOutput {
                    from: p.from.value(),
                    to: p.to.value(),
                    amount: major(p.amount, group.exponent),
                    minor_units: p.amount,
                })
                .collect(),
            direct_payment_count: run.direct_payment_count(),
            payment_reduction_percent: run.payment_reduction_percent(),
        };
        println!("{}", to_json(&output));
    } else {
        print_balances_text(run.balances(), group.exponent);
        println!();
        println!("=== Payments ({}) ===", group.currency);
        if run.plan().is_empty() {
            println!("Everyone is settled up.");
        }
        for (i, p) in run.plan().payments().iter().enumerate() {
            println!(
                "  {:>3}. {} pays {} {} {}",
                i + 1,
                p.from,
                p.to,
                major(p.amount, group.exponent),
                p.currency
            );
        }
        println!(
            "\n{} payments instead of {} direct repayments ({:.1}% fewer)",
            run.plan().len(),
            run.direct_payment_count(),
            run.payment_reduction_percent()
        );
    }
}

fn cmd_generate(args: &[String]) {
    let mut config = GroupConfig::default();
    let mut output_path: Option<String> = None;
    let mut i = 0;
    while i < args.len() {
        match args[i].as_str() {
            "--participants" => {
                i += 1;
                config.participant_count = args
                    .get(i)
                    .and_then(|s| s.parse().ok())
                    .unwrap_or_else(|| fail("--participants requires a number"));
            }
            "--expenses" => {
                i += 1;
                config.expense_count = args
                    .get(i)
                    .and_then(|s| s.parse().ok())
                    .unwrap_or_else(|| fail("--expenses requires a number"));
            }
            "--currency" => {
                i += 1;
                config.currency = args
                    .get(i)
                    .map(|s| CurrencyCode::new(s.as_str()))
                    .unwrap_or_else(|| fail("--currency requires a currency code"));
            }
            "--output" => {
                i += 1;
                output_path = Some(
                    args.get(i)
                        .cloned()
                        .unwrap_or_else(|| fail("--output requires a file path")),
                );
            }
            other => fail(format!("Unknown option: {}", other)),
        }
        i += 1;
    }

    let snapshot = generate_random_group(&config);
    let exponent = config.currency.minor_unit_exponent();

    let file = GroupFile {
        group_id: config.group_id.value(),
        currency: config.currency.to_string(),
        expenses: snapshot
            .expenses
            .iter()
            .map(|e| ExpenseInput {
                id: e.id().value(),
                paid_by: e.paid_by().value(),
                amount: major(e.amount(), exponent),
                description: None,
                shares: Some(
                    snapshot
                        .shares
                        .iter()
                        .filter(|s| s.expense_id == e.id())
                        .map(|s| ShareInput {
                            participant: s.participant.value(),
                            share: major(s.share, exponent),
                        })
                        .collect(),
                ),
                split_among: None,
            })
            .collect(),
    };

    let json = to_json(&file);

    if let Some(path) = output_path {
        fs::write(&path, &json).unwrap_or_else(|e| {
            fail(format!("writing to '{}': {}", path, e));
        });
        eprintln!(
            "Generated {} expenses across {} participants → {}",
            snapshot.expenses.len(),
            config.participant_count,
            path
        );
    } else {
        println!("{}", json);
    }
}

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();

    let args: Vec<String> = std::env::args().collect();

    if args.len() < 2 {
        print_usage();
        process::exit(1);
    }

    let command = args[1].as_str();
    let rest = &args[2..];

    match command {
        "balances" => cmd_balances(rest),
        "settle" => cmd_settle(rest),
        "generate" => cmd_generate(rest),
        "help" | "--help" | "-h" => print_usage(),
        _ => {
            eprintln!("Unknown command: {}", command);
            print_usage();
            process::exit(1);
        }
    }
}
