use crate::cli::commands::{required, CommandDefinition};
use crate::cli::core::{CommandError, CommandResult, ShellContext};
use crate::cli::{output, view};
use crate::ledger::PaymentField;
use crate::storage::CollectionName;

pub(crate) fn definitions() -> Vec<CommandDefinition> {
    vec![
        CommandDefinition::new(
            "add-pay",
            "Record an advance payment dated today",
            "add-pay [amount]",
            cmd_add,
        ),
        CommandDefinition::new(
            "set-pay",
            "Edit one field of a payment",
            "set-pay <id> <date|amount> <value>",
            cmd_set,
        ),
        CommandDefinition::new("del-pay", "Delete a payment", "del-pay <id>", cmd_delete),
    ]
}

fn cmd_add(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    let today = context.today();
    let id = context.ledger.add_payment(today).id.clone();
    if let Some(amount) = args.first() {
        // A rejected amount still leaves the new zero-amount row in place.
        let result = context
            .ledger
            .update_payment(&id, PaymentField::Amount, amount)
            .map(|_| ());
        context.persist(CollectionName::Payments);
        result?;
    } else {
        context.persist(CollectionName::Payments);
    }
    if let Some(payment) = context.ledger.payment(&id) {
        output::success(format!("Added {}", view::payment_row(payment)));
    }
    Ok(())
}

fn cmd_set(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    const USAGE: &str = "set-pay <id> <date|amount> <value>";
    let id = required(args, 0, USAGE)?;
    let field: PaymentField = required(args, 1, USAGE)?.parse()?;
    if args.len() < 3 {
        return Err(CommandError::InvalidArguments(format!("usage: {USAGE}")));
    }
    let value = args[2..].join(" ");

    if context.ledger.payment(id).is_none() {
        output::warning(format!("No payment with id `{}`.", id));
        return Ok(());
    }
    context.ledger.update_payment(id, field, &value)?;
    if let Some(payment) = context.ledger.payment(id) {
        output::info(view::payment_row(payment));
    }
    context.persist(CollectionName::Payments);
    Ok(())
}

fn cmd_delete(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    let id = required(args, 0, "del-pay <id>")?;
    match context.ledger.delete_payment(id) {
        Some(payment) => {
            output::success(format!("Deleted {}", payment.id));
            context.persist(CollectionName::Payments);
        }
        None => output::warning(format!("No payment with id `{}`.", id)),
    }
    Ok(())
}
