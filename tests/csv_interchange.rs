mod common;

use std::collections::HashSet;

use fish_ledger::{
    errors::{LedgerError, IMPORT_FORMAT_HINT},
    interchange::{export_csv, import_csv, import_csv_bytes, import_into, CsvDialect},
    ledger::{Branch, RateType, SequentialIds, Transaction, TransactionField},
};

fn sample_rows() -> Vec<Transaction> {
    vec![
        Transaction::new("tx_1", common::day(2025, 5, 1), Branch::Khulna, 10.0, RateType::Small),
        Transaction::new(
            "tx_2",
            common::day(2025, 5, 2),
            Branch::Bashundhara,
            3.5,
            RateType::Big,
        ),
        Transaction::new("tx_3", common::day(2025, 5, 3), Branch::Shylet, 0.25, RateType::Big),
    ]
}

#[test]
fn export_then_import_keeps_business_fields() {
    for dialect in [CsvDialect::Plain, CsvDialect::Quoted] {
        let rows = sample_rows();
        let text = export_csv(&rows, dialect).unwrap();
        let mut ids = SequentialIds::new();
        let outcome = import_csv(&text, &mut ids, dialect).unwrap();
        assert_eq!(outcome.imported, rows.len());
        for (before, after) in rows.iter().zip(&outcome.transactions) {
            assert_eq!(after.date, before.date);
            assert_eq!(after.branch, before.branch);
            assert_eq!(after.size, before.size);
            assert_eq!(after.rate_type, before.rate_type);
            assert_eq!(after.price, before.price);
            assert_eq!(after.total, before.total);
        }
    }
}

#[test]
fn blank_date_rows_are_neither_imported_nor_counted() {
    let text = concat!(
        "Date,Branch,Size,RateType\n",
        ",Khulna,5,Small\n",
        "02/05/2025,Khulna,5,Small\n",
        "   ,Shylet,1,Big",
    );
    assert!(text.ends_with("\n   ,Shylet,1,Big"));
    let mut ledger = common::empty_ledger();
    let count = import_into(&mut ledger, text, CsvDialect::Plain).unwrap();
    assert_eq!(count, 1);
    assert_eq!(ledger.transactions().len(), 1);
    assert_eq!(ledger.grand_total(), 530.0);
}

#[test]
fn import_replaces_transactions_but_not_payments() {
    let mut ledger = common::empty_ledger();
    let today = common::day(2025, 5, 9);
    ledger.add_transaction(today, Branch::Shylet);
    ledger.add_transaction(today, Branch::Khulna);
    ledger.add_payment(today);

    let count = import_into(
        &mut ledger,
        "Date,Branch,Size,RateType\n2025-05-10,Bashundhara,2,Small",
        CsvDialect::Plain,
    )
    .unwrap();
    assert_eq!(count, 1);
    assert_eq!(ledger.transactions().len(), 1);
    assert_eq!(ledger.transactions()[0].total, 12.0);
    assert_eq!(ledger.payments().len(), 1);

    ledger.add_transaction(today, Branch::Khulna);
    let ids: HashSet<&str> = ledger
        .transactions()
        .iter()
        .map(|txn| txn.id.as_str())
        .chain(ledger.payments().iter().map(|payment| payment.id.as_str()))
        .collect();
    assert_eq!(ids.len(), 3);
}

#[test]
fn header_only_file_empties_the_list() {
    let mut ledger = common::empty_ledger();
    ledger.add_transaction(common::day(2025, 5, 9), Branch::Shylet);
    let count =
        import_into(&mut ledger, "Date,Branch,Size,RateType", CsvDialect::Plain).unwrap();
    assert_eq!(count, 0);
    assert!(ledger.transactions().is_empty());
}

#[test]
fn unreadable_bytes_leave_rows_untouched() {
    let mut ledger = common::empty_ledger();
    let id = ledger
        .add_transaction(common::day(2025, 5, 9), Branch::Khulna)
        .id
        .clone();
    ledger
        .update_transaction(&id, TransactionField::Size, "2")
        .unwrap();

    let bytes = b"Date,Branch,Size,RateType\n01/05/2025,Khulna,\xff\xfe,Small\n";
    for dialect in [CsvDialect::Plain, CsvDialect::Quoted] {
        let err = import_csv_bytes(bytes, ledger.ids_mut(), dialect).unwrap_err();
        assert!(matches!(err, LedgerError::ImportFormat(_)));
        assert!(err.to_string().contains(IMPORT_FORMAT_HINT));
    }
    assert_eq!(ledger.transactions().len(), 1);
    assert_eq!(ledger.transactions()[0].size, 2.0);
}

#[test]
fn quoted_dialect_survives_commas_in_fields() {
    let text = "Date,Branch,Size,RateType\n\
                \"01/06/2025\",\" Shylet \",\"1,5\",\"Big\"\n";

    let mut ids = SequentialIds::new();
    let quoted = import_csv(text, &mut ids, CsvDialect::Quoted).unwrap();
    assert_eq!(quoted.imported, 1);
    assert_eq!(quoted.transactions[0].branch, Branch::Shylet);
    assert_eq!(quoted.transactions[0].size, 1.0);
    assert_eq!(quoted.transactions[0].rate_type, RateType::Big);

    let mut ids = SequentialIds::new();
    let plain = import_csv(text, &mut ids, CsvDialect::Plain).unwrap();
    assert_eq!(plain.imported, 0);
    assert_eq!(plain.skipped, 1);
}
