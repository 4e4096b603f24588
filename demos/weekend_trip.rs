//! Weekend trip example.
//!
//! Four friends share a cabin, groceries and fuel. The engine nets their
//! expenses into balances and settles them with as few payments as it can.

use grouppay_engine::core::currency::CurrencyCode;
use grouppay_engine::core::expense::{Expense, ExpenseId, GroupId};
use grouppay_engine::core::money::from_minor_units;
use grouppay_engine::core::participant::ParticipantId;
use grouppay_engine::settlement::group::GroupSettlement;
use grouppay_engine::store::memory::MemoryStore;
use grouppay_engine::store::SettlementSink;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    println!("╔════════════════════════════════════════════╗");
    println!("║  grouppay-engine: Weekend Trip Settlement  ║");
    println!("╚════════════════════════════════════════════╝\n");

    let group = GroupId::new(1);
    let eur = CurrencyCode::new("EUR");
    let exponent = eur.minor_unit_exponent();
    let names = ["", "Ana", "Boris", "Chris", "Dani"];
    let everyone: Vec<ParticipantId> = (1..=4).map(ParticipantId::new).collect();

    let mut store = MemoryStore::new();
    let expenses = [
        (1, 1, 24_000, "Cabin", everyone.clone()),
        (2, 2, 6_000, "Groceries", everyone[..3].to_vec()),
        (3, 3, 4_500, "Fuel", everyone[1..].to_vec()),
        (4, 4, 3_210, "Museum tickets", everyone.clone()),
    ];

    println!("Expenses:");
    for (id, payer, amount, description, among) in expenses {
        let expense = Expense::new(ExpenseId::new(id), group, ParticipantId::new(payer), amount, eur.clone())
            .with_description(description);
        println!(
            "  {:<15} {:>8} {} paid by {}, split {} ways",
            description,
            from_minor_units(amount, exponent)?,
            eur,
            names[payer as usize],
            among.len()
        );
        let shares = expense.even_shares(&among)?;
        store.add_expense(expense, shares)?;
    }
    println!();

    let run = GroupSettlement::from_source(&store, group, &eur)?;

    println!("━━━ Balances ━━━\n");
    for (participant, balance) in run.balances().balances() {
        let status = if *balance > 0 {
            "gets back"
        } else if *balance < 0 {
            "owes"
        } else {
            "settled"
        };
        println!(
            "  {:<8} {:>8} {}  [{}]",
            names[participant.value() as usize],
            from_minor_units(*balance, exponent)?,
            eur,
            status
        );
    }
    println!();

    println!("{}", run.plan());
    println!("━━━ Payments ━━━\n");
    for payment in run.plan().payments() {
        println!(
            "  {} pays {} {} {}",
            names[payment.from.value() as usize],
            names[payment.to.value() as usize],
            from_minor_units(payment.amount, exponent)?,
            eur
        );
    }
    println!(
        "\n{} payments instead of {} direct repayments ({:.1}% fewer)",
        run.plan().len(),
        run.direct_payment_count(),
        run.payment_reduction_percent()
    );

    let records = run.into_plan().into_records(group);
    store.record_settlements(records)?;
    println!(
        "Recorded {} pending settlements for group {}.",
        store.group_settlements(group).len(),
        group
    );
    Ok(())
}
