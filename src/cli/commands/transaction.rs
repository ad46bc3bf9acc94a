use crate::cli::commands::{required, CommandDefinition};
use crate::cli::core::{CommandError, CommandResult, ShellContext};
use crate::cli::{output, view};
use crate::ledger::{Branch, TransactionField};
use crate::storage::CollectionName;

pub(crate) fn definitions() -> Vec<CommandDefinition> {
    vec![
        CommandDefinition::new(
            "add-tx",
            "Add a sale row dated today",
            "add-tx [Khulna|Bashundhara|Shylet]",
            cmd_add,
        ),
        CommandDefinition::new(
            "set-tx",
            "Edit one field of a sale row",
            "set-tx <id> <date|branch|size|rate|transport> <value>",
            cmd_set,
        ),
        CommandDefinition::new("del-tx", "Delete a sale row", "del-tx <id>", cmd_delete),
        CommandDefinition::new(
            "list",
            "Show sale rows, payments and totals",
            "list [tx|pay]",
            cmd_list,
        ),
    ]
}

fn cmd_add(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    let branch = match args.first() {
        Some(raw) => raw.parse::<Branch>()?,
        None => context.config.default_branch,
    };
    let today = context.today();
    let txn = context.ledger.add_transaction(today, branch);
    output::success(format!("Added {} ({})", txn.id, txn.branch));
    context.persist(CollectionName::Transactions);
    Ok(())
}

fn cmd_set(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    const USAGE: &str = "set-tx <id> <date|branch|size|rate|transport> <value>";
    let id = required(args, 0, USAGE)?;
    let field: TransactionField = required(args, 1, USAGE)?.parse()?;
    if args.len() < 3 {
        return Err(CommandError::InvalidArguments(format!("usage: {USAGE}")));
    }
    let value = args[2..].join(" ");

    if context.ledger.transaction(id).is_none() {
        output::warning(format!("No transaction with id `{}`.", id));
        return Ok(());
    }
    context.ledger.update_transaction(id, field, &value)?;
    if let Some(txn) = context.ledger.transaction(id) {
        output::info(view::transaction_row(txn));
    }
    context.persist(CollectionName::Transactions);
    Ok(())
}

fn cmd_delete(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    let id = required(args, 0, "del-tx <id>")?;
    match context.ledger.delete_transaction(id) {
        Some(txn) => {
            output::success(format!("Deleted {}", txn.id));
            context.persist(CollectionName::Transactions);
        }
        None => output::warning(format!("No transaction with id `{}`.", id)),
    }
    Ok(())
}

fn cmd_list(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    match args.first().map(|arg| arg.to_ascii_lowercase()).as_deref() {
        None => {
            view::print_transactions(&context.ledger);
            view::print_payments(&context.ledger);
            view::print_summary(&context.ledger);
        }
        Some("tx") => view::print_transactions(&context.ledger),
        Some("pay") => view::print_payments(&context.ledger),
        Some(other) => {
            return Err(CommandError::InvalidArguments(format!(
                "unknown list target `{}` (use tx or pay)",
                other
            )))
        }
    }
    Ok(())
}
