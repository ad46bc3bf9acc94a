use std::{fs, path::PathBuf};

use crate::cli::commands::{required, CommandDefinition};
use crate::cli::core::{CliMode, CommandError, CommandResult, ShellContext};
use crate::cli::{output, view};
use crate::errors::{LedgerError, IMPORT_FORMAT_HINT};
use crate::interchange::{export_csv, export_file_name, import_csv_bytes};
use crate::storage::CollectionName;
use crate::utils::persistence::write_atomic;

pub(crate) fn definitions() -> Vec<CommandDefinition> {
    vec![
        CommandDefinition::new(
            "summary",
            "Show grand total, advance and due",
            "summary",
            cmd_summary,
        ),
        CommandDefinition::new(
            "import",
            "Replace all sale rows with a Date,Branch,Size,RateType CSV file",
            "import <path>",
            cmd_import,
        ),
        CommandDefinition::new(
            "export",
            "Write sale rows to a CSV file",
            "export [path]",
            cmd_export,
        ),
        CommandDefinition::new(
            "clear",
            "Delete every sale row and payment",
            "clear [--yes]",
            cmd_clear,
        ),
        CommandDefinition::new(
            "config",
            "Show or change preferences",
            "config [show|set <key> <value>]",
            cmd_config,
        ),
    ]
}

fn cmd_summary(context: &mut ShellContext, _args: &[&str]) -> CommandResult {
    view::print_summary(&context.ledger);
    Ok(())
}

fn cmd_import(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    let path = PathBuf::from(required(args, 0, "import <path>")?);
    let dialect = context.config.csv_dialect;

    let parsed = fs::read(&path)
        .map_err(|err| LedgerError::ImportFormat(err.to_string()))
        .and_then(|bytes| import_csv_bytes(&bytes, context.ledger.ids_mut(), dialect));
    let outcome = match parsed {
        Ok(outcome) => outcome,
        Err(LedgerError::ImportFormat(detail)) => {
            tracing::warn!(path = %path.display(), %detail, "csv import rejected");
            output::error(IMPORT_FORMAT_HINT);
            return Ok(());
        }
        Err(err) => return Err(err.into()),
    };

    let skipped = outcome.skipped;
    let imported = context.ledger.replace_transactions(outcome.transactions);
    context.persist(CollectionName::Transactions);
    tracing::info!(path = %path.display(), imported, skipped, "csv imported");
    output::success(format!("{} rows imported", imported));
    if skipped > 0 {
        output::hint(format!(
            "{} rows without a usable date or branch were skipped",
            skipped
        ));
    }
    Ok(())
}

fn cmd_export(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    let path = match args.first() {
        Some(path) => PathBuf::from(path),
        None => PathBuf::from(export_file_name(context.today()).replace('/', "-")),
    };
    let text = export_csv(context.ledger.transactions(), context.config.csv_dialect)?;
    write_atomic(&path, &text)?;
    output::success(format!(
        "Exported {} rows to {}",
        context.ledger.transactions().len(),
        path.display()
    ));
    Ok(())
}

fn cmd_clear(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    let forced = args.iter().any(|arg| *arg == "--yes" || *arg == "-y");
    if !forced {
        if context.mode == CliMode::Script {
            output::warning("Refusing to clear without --yes in script mode.");
            return Ok(());
        }
        if !context.confirm("Delete all transactions and payments?")? {
            output::info("Operation cancelled.");
            return Ok(());
        }
    }

    context.ledger.clear_all();
    if let Err(err) = context.store.clear() {
        tracing::warn!(error = %err, "failed to drop stored collections");
        output::warning(format!("Could not clear storage: {}", err));
    }
    output::success("All data cleared.");
    Ok(())
}

fn cmd_config(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    match args.first().map(|arg| arg.to_ascii_lowercase()).as_deref() {
        None | Some("show") => {
            output::section("Configuration");
            for (key, value) in context.config.entries() {
                output::info(format!("  {:<15} {}", key, value));
            }
            Ok(())
        }
        Some("set") => {
            const USAGE: &str = "config set <key> <value>";
            let key = required(args, 1, USAGE)?;
            if args.len() < 3 {
                return Err(CommandError::InvalidArguments(format!("usage: {USAGE}")));
            }
            let value = args[2..].join(" ");
            context.config.set(key, value.trim())?;
            context.save_config()?;
            context.ledger.set_validation(context.config.validation);
            output::success(format!("Set {} = {}", key, value.trim()));
            Ok(())
        }
        Some(other) => Err(CommandError::InvalidArguments(format!(
            "unknown config action `{}` (use show or set)",
            other
        ))),
    }
}
