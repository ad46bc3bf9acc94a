//! CSV export of sale rows and import of `Date,Branch,Size,RateType` sheets.
//!
//! The plain dialect joins fields with `,` and splits on `,` with no quoting,
//! so a field containing a comma does not survive a round trip. The quoted
//! dialect goes through the `csv` crate instead.

use std::{fmt, io, str::FromStr};

use chrono::NaiveDate;
use csv::{ReaderBuilder, Terminator, Trim, WriterBuilder};
use serde::{Deserialize, Serialize};

use crate::{
    errors::{LedgerError, Result},
    format::{display_date, plain_number},
    ledger::{
        coerce::lenient_number, dates::parse_date, Branch, IdSource, Ledger, RateType,
        Transaction,
    },
};

pub const EXPORT_HEADER: [&str; 8] = [
    "Date",
    "Branch",
    "Size(kg)",
    "Rate Type",
    "Rate",
    "Price",
    "Transport",
    "Total",
];

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum CsvDialect {
    /// Naive `,` joining and splitting.
    #[default]
    Plain,
    /// RFC 4180 quoting on export and a real tokenizer on import.
    Quoted,
}

impl fmt::Display for CsvDialect {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CsvDialect::Plain => f.write_str("plain"),
            CsvDialect::Quoted => f.write_str("quoted"),
        }
    }
}

impl FromStr for CsvDialect {
    type Err = LedgerError;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "plain" => Ok(CsvDialect::Plain),
            "quoted" => Ok(CsvDialect::Quoted),
            other => Err(LedgerError::Config(format!(
                "unknown csv dialect `{other}` (use plain or quoted)"
            ))),
        }
    }
}

/// Rows built from an import, in file order.
#[derive(Debug, Clone)]
pub struct CsvImport {
    pub transactions: Vec<Transaction>,
    pub imported: usize,
    pub skipped: usize,
}

/// `fish_sales_<dd/mm/yyyy>.csv`
pub fn export_file_name(today: NaiveDate) -> String {
    format!("fish_sales_{}.csv", display_date(today))
}

pub fn export_csv(transactions: &[Transaction], dialect: CsvDialect) -> Result<String> {
    tracing::info!(rows = transactions.len(), %dialect, "exporting csv");
    match dialect {
        CsvDialect::Plain => {
            let mut lines = Vec::with_capacity(transactions.len() + 1);
            lines.push(EXPORT_HEADER.join(","));
            lines.extend(transactions.iter().map(|txn| export_row(txn).join(",")));
            Ok(lines.join("\n"))
        }
        CsvDialect::Quoted => {
            let mut writer = WriterBuilder::new()
                .terminator(Terminator::Any(b'\n'))
                .from_writer(Vec::new());
            writer.write_record(EXPORT_HEADER)?;
            for txn in transactions {
                writer.write_record(export_row(txn))?;
            }
            let bytes = writer.into_inner().map_err(|err| err.into_error())?;
            let mut text = String::from_utf8(bytes)
                .map_err(|err| io::Error::new(io::ErrorKind::InvalidData, err))?;
            if text.ends_with('\n') {
                text.pop();
            }
            Ok(text)
        }
    }
}

fn export_row(txn: &Transaction) -> [String; 8] {
    [
        display_date(txn.date),
        txn.branch.to_string(),
        plain_number(txn.size),
        txn.rate_type.to_string(),
        plain_number(txn.rate()),
        plain_number(txn.price),
        plain_number(txn.effective_transport()),
        plain_number(txn.total),
    ]
}

/// Parses an import sheet. The first line is a header and is discarded;
/// rows with a blank date are skipped.
pub fn import_csv(
    text: &str,
    ids: &mut dyn IdSource,
    dialect: CsvDialect,
) -> Result<CsvImport> {
    let mut outcome = CsvImport {
        transactions: Vec::new(),
        imported: 0,
        skipped: 0,
    };
    match dialect {
        CsvDialect::Plain => {
            for line in text.split('\n').skip(1) {
                if line.trim().is_empty() {
                    continue;
                }
                let fields: Vec<&str> = line.split(',').collect();
                push_row(&mut outcome, &fields, ids);
            }
        }
        CsvDialect::Quoted => {
            let mut reader = ReaderBuilder::new()
                .has_headers(true)
                .flexible(true)
                .trim(Trim::All)
                .from_reader(text.as_bytes());
            for record in reader.records() {
                let record = record.map_err(|err| LedgerError::ImportFormat(err.to_string()))?;
                let fields: Vec<&str> = record.iter().collect();
                push_row(&mut outcome, &fields, ids);
            }
        }
    }
    outcome.imported = outcome.transactions.len();
    tracing::info!(
        imported = outcome.imported,
        skipped = outcome.skipped,
        %dialect,
        "csv parsed"
    );
    Ok(outcome)
}

/// Same as [`import_csv`] for raw file contents, which must be UTF-8 text.
pub fn import_csv_bytes(
    bytes: &[u8],
    ids: &mut dyn IdSource,
    dialect: CsvDialect,
) -> Result<CsvImport> {
    let text = std::str::from_utf8(bytes)
        .map_err(|err| LedgerError::ImportFormat(format!("file is not UTF-8 text: {err}")))?;
    import_csv(text, ids, dialect)
}

/// Parses `text` and, only if that succeeds, replaces the ledger's
/// transactions with the result. Payments are untouched. Returns the
/// number of imported rows.
pub fn import_into(ledger: &mut Ledger, text: &str, dialect: CsvDialect) -> Result<usize> {
    let outcome = import_csv(text, ledger.ids_mut(), dialect)?;
    ledger.replace_transactions(outcome.transactions);
    Ok(outcome.imported)
}

fn push_row(outcome: &mut CsvImport, fields: &[&str], ids: &mut dyn IdSource) {
    match build_row(fields, ids) {
        Some(txn) => outcome.transactions.push(txn),
        None => outcome.skipped += 1,
    }
}

fn build_row(fields: &[&str], ids: &mut dyn IdSource) -> Option<Transaction> {
    let raw_date = fields.first().map(|field| field.trim()).unwrap_or("");
    if raw_date.is_empty() {
        return None;
    }
    let Some(date) = parse_date(raw_date) else {
        tracing::warn!(date = raw_date, "skipping row with unreadable date");
        return None;
    };

    let raw_branch = fields.get(1).map(|field| field.trim()).unwrap_or("");
    let branch = if raw_branch.is_empty() {
        Branch::default()
    } else {
        match raw_branch.parse::<Branch>() {
            Ok(branch) => branch,
            Err(_) => {
                tracing::warn!(branch = raw_branch, "skipping row with unknown branch");
                return None;
            }
        }
    };

    let size = fields.get(2).map(|field| lenient_number(field)).unwrap_or(0.0);
    let rate_type = fields
        .get(3)
        .map(|field| RateType::from_label(field.trim()))
        .unwrap_or_default();

    Some(Transaction::new(ids.next_id(), date, branch, size, rate_type))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ledger::SequentialIds;

    fn day(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn export_header_and_row_layout() {
        let rows = vec![
            Transaction::new("tx_1", day(2025, 1, 5), Branch::Khulna, 10.0, RateType::Small),
            Transaction::new("tx_2", day(2025, 1, 6), Branch::Bashundhara, 2.5, RateType::Big),
        ];
        let text = export_csv(&rows, CsvDialect::Plain).unwrap();
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(
            lines[0],
            "Date,Branch,Size(kg),Rate Type,Rate,Price,Transport,Total"
        );
        assert_eq!(lines[1], "05/01/2025,Khulna,10,Small,6,60,500,560");
        assert_eq!(lines[2], "06/01/2025,Bashundhara,2.5,Big,6.6,16.5,0,16.5");
        assert!(!text.ends_with('\n'));
    }

    #[test]
    fn export_zeroes_transport_for_ineligible_branch() {
        let mut txn = Transaction::new(
            "tx_1",
            day(2025, 1, 5),
            Branch::Bashundhara,
            1.0,
            RateType::Small,
        );
        txn.transport = 250.0;
        txn.refresh();
        let text = export_csv(&[txn], CsvDialect::Plain).unwrap();
        assert!(text.ends_with("Bashundhara,1,Small,6,6,0,6"));
    }

    #[test]
    fn import_applies_defaults_and_skips_blank_dates() {
        let text = concat!(
            "Date,Branch,Size,RateType\n",
            "01/02/2025,Shylet,4,Big\n",
            ",Khulna,9,Small\n",
            "2025-02-03\n",
            "   ,Shylet,1,Big\n",
            "03/02/2025,,abc,Huge\r\n",
            "\n",
        );
        let mut ids = SequentialIds::new();
        let outcome = import_csv(text, &mut ids, CsvDialect::Plain).unwrap();
        assert_eq!(outcome.imported, 3);
        assert_eq!(outcome.skipped, 2);

        let first = &outcome.transactions[0];
        assert_eq!(first.branch, Branch::Shylet);
        assert_eq!(first.rate_type, RateType::Big);
        assert_eq!(first.transport, 500.0);
        assert!((first.total - (4.0 * 6.6 + 500.0)).abs() < 1e-9);

        let second = &outcome.transactions[1];
        assert_eq!(second.date, day(2025, 2, 3));
        assert_eq!(second.branch, Branch::Khulna);
        assert_eq!(second.rate_type, RateType::Small);
        assert_eq!(second.size, 0.0);

        let third = &outcome.transactions[2];
        assert_eq!(third.branch, Branch::Khulna);
        assert_eq!(third.size, 0.0);
        assert_eq!(third.rate_type, RateType::Small);
    }

    #[test]
    fn unknown_branch_rows_are_skipped() {
        let mut ids = SequentialIds::new();
        let outcome =
            import_csv("h\n01/01/2025,Dhaka,3,Small", &mut ids, CsvDialect::Plain).unwrap();
        assert_eq!(outcome.imported, 0);
        assert_eq!(outcome.skipped, 1);
    }

    #[test]
    fn non_utf8_input_is_a_format_error() {
        let mut ids = SequentialIds::new();
        let err =
            import_csv_bytes(&[0xff, 0xfe, 0x00], &mut ids, CsvDialect::Plain).unwrap_err();
        assert!(matches!(err, LedgerError::ImportFormat(_)));
        assert!(err
            .to_string()
            .starts_with("Invalid CSV – use: Date,Branch,Size,RateType"));
    }

    #[test]
    fn quoted_dialect_escapes_on_export() {
        let rows = vec![Transaction::new(
            "tx_1",
            day(2025, 1, 5),
            Branch::Khulna,
            1.5,
            RateType::Small,
        )];
        let text = export_csv(&rows, CsvDialect::Quoted).unwrap();
        let lines: Vec<&str> = text.split('\n').collect();
        assert_eq!(lines.len(), 2);
        assert_eq!(lines[1], "05/01/2025,Khulna,1.5,Small,6,9,500,509");
    }

    #[test]
    fn quoted_dialect_reads_quoted_fields() {
        let text = "Date,Branch,Size,RateType,Note\n\
                    \"01/03/2025\",\"Shylet\",\"2\",Big,\"fresh, iced\"\n";
        let mut ids = SequentialIds::new();
        let outcome = import_csv(text, &mut ids, CsvDialect::Quoted).unwrap();
        assert_eq!(outcome.imported, 1);
        assert_eq!(outcome.transactions[0].branch, Branch::Shylet);
        assert_eq!(outcome.transactions[0].size, 2.0);
    }

    #[test]
    fn file_name_uses_display_date() {
        assert_eq!(export_file_name(day(2025, 10, 16)), "fish_sales_16/10/2025.csv");
    }
}
