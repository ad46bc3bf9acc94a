mod common;

use fish_ledger::{
    format::format_due,
    init,
    interchange::{export_csv, import_into, CsvDialect},
    ledger::{Branch, PaymentField, TransactionField},
};

#[test]
fn ledger_export_import_smoke() {
    init();

    let mut ledger = common::empty_ledger();
    let today = common::day(2025, 6, 1);
    let id = ledger.add_transaction(today, Branch::Khulna).id.clone();
    ledger
        .update_transaction(&id, TransactionField::Size, "10")
        .unwrap();
    let pay = ledger.add_payment(today).id.clone();
    ledger
        .update_payment(&pay, PaymentField::Amount, "300")
        .unwrap();

    let summary = ledger.summary();
    assert_eq!(summary.transaction_count, 1);
    assert_eq!(summary.grand_total, 560.0);
    assert_eq!(format_due(summary.due), "260");

    let text = export_csv(ledger.transactions(), CsvDialect::Plain).unwrap();
    let mut other = common::empty_ledger();
    assert_eq!(import_into(&mut other, &text, CsvDialect::Plain).unwrap(), 1);
    assert_eq!(other.grand_total(), 560.0);
}
