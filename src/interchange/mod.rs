//! File exchange formats for the ledger.

pub mod csv;

pub use self::csv::{
    export_csv, export_file_name, import_csv, import_csv_bytes, import_into, CsvDialect,
    CsvImport, EXPORT_HEADER,
};
