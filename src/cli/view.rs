use crate::format::{display_date, format_amount, format_due, plain_number, NegativeStyle};
use crate::ledger::{Ledger, Payment, Transaction};

use super::output;

pub(crate) fn transaction_header() -> String {
    format!(
        "{:<8} {:<10} {:<12} {:>8} {:<5} {:>4} {:>8} {:>9} {:>9}",
        "ID", "Date", "Branch", "Size", "Type", "Rate", "Price", "Transport", "Total"
    )
}

pub(crate) fn transaction_row(txn: &Transaction) -> String {
    format!(
        "{:<8} {:<10} {:<12} {:>8} {:<5} {:>4} {:>8} {:>9} {:>9}",
        txn.id,
        display_date(txn.date),
        txn.branch,
        plain_number(txn.size),
        txn.rate_type,
        plain_number(txn.rate()),
        format_amount(txn.price, NegativeStyle::Sign),
        format_amount(txn.effective_transport(), NegativeStyle::Sign),
        format_amount(txn.total, NegativeStyle::Sign),
    )
}

pub(crate) fn payment_row(payment: &Payment) -> String {
    format!(
        "{:<8} {:<10} {:>10}",
        payment.id,
        display_date(payment.date),
        format_amount(payment.amount, NegativeStyle::Sign)
    )
}

pub(crate) fn print_transactions(ledger: &Ledger) {
    output::section("Transactions");
    if ledger.transactions().is_empty() {
        output::info("  (none)");
        return;
    }
    output::info(transaction_header());
    for txn in ledger.transactions() {
        output::info(transaction_row(txn));
    }
}

pub(crate) fn print_payments(ledger: &Ledger) {
    output::section("Advance payments");
    if ledger.payments().is_empty() {
        output::info("  (none)");
        return;
    }
    output::info(format!("{:<8} {:<10} {:>10}", "ID", "Date", "Amount"));
    for payment in ledger.payments() {
        output::info(payment_row(payment));
    }
}

pub(crate) fn summary_lines(ledger: &Ledger) -> [String; 3] {
    let summary = ledger.summary();
    [
        format!(
            "Grand total : {}",
            format_amount(summary.grand_total, NegativeStyle::Sign)
        ),
        format!(
            "Advance     : {}",
            format_amount(summary.advance_total, NegativeStyle::Sign)
        ),
        format!("Due         : {}", format_due(summary.due)),
    ]
}

pub(crate) fn print_summary(ledger: &Ledger) {
    output::section("Summary");
    for line in summary_lines(ledger) {
        output::info(line);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ledger::{Branch, PaymentField, SequentialIds};
    use chrono::NaiveDate;

    #[test]
    fn summary_shows_overpayment_in_parentheses() {
        let mut ledger = Ledger::new(Box::new(SequentialIds::new()));
        let day = NaiveDate::from_ymd_opt(2025, 3, 1).unwrap();
        let id = ledger.add_payment(day).id.clone();
        ledger.update_payment(&id, PaymentField::Amount, "120").unwrap();
        let lines = summary_lines(&ledger);
        assert_eq!(lines[0], "Grand total : 0");
        assert_eq!(lines[1], "Advance     : 120");
        assert_eq!(lines[2], "Due         : (120)");
    }

    #[test]
    fn row_shows_rounded_amounts() {
        let mut ledger = Ledger::new(Box::new(SequentialIds::new()));
        let day = NaiveDate::from_ymd_opt(2025, 3, 1).unwrap();
        ledger.add_transaction(day, Branch::Shylet);
        let row = transaction_row(&ledger.transactions()[0]);
        assert!(row.starts_with("tx_1"));
        assert!(row.contains("01/03/2025"));
        assert!(row.trim_end().ends_with("500"));
    }
}
