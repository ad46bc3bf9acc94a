use std::{io, path::PathBuf};

use chrono::{Local, NaiveDate};
use strsim::levenshtein;

use crate::{
    config::{Config, ConfigManager},
    errors::LedgerError,
    ledger::Ledger,
    storage::{CollectionName, JsonFileStore, LedgerStore},
    utils::paths::{app_data_dir, store_dir_in},
};

use super::commands::{self, CommandDefinition, CommandRegistry};
use super::output;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CliMode {
    Interactive,
    Script,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoopControl {
    Continue,
    Exit,
}

pub type CommandResult = Result<(), CommandError>;

/// Runtime state of one shell session: the open ledger, its store and the
/// user configuration.
pub struct ShellContext {
    pub(crate) mode: CliMode,
    pub(crate) running: bool,
    pub(crate) registry: CommandRegistry,
    pub(crate) ledger: Ledger,
    pub(crate) store: LedgerStore,
    pub(crate) config: Config,
    config_manager: ConfigManager,
    base_dir: PathBuf,
}

impl ShellContext {
    pub fn new(mode: CliMode) -> Result<Self, CliError> {
        Self::with_base_dir(mode, app_data_dir())
    }

    pub fn with_base_dir(mode: CliMode, base_dir: PathBuf) -> Result<Self, CliError> {
        let config_manager = ConfigManager::with_base_dir(base_dir.clone())?;
        let config = config_manager.load()?;
        let backend = JsonFileStore::new(store_dir_in(&base_dir))?;
        let store = LedgerStore::new(Box::new(backend));
        let ledger = store
            .load_ledger(config.id_scheme.build())
            .with_validation(config.validation);
        tracing::info!(
            base = %base_dir.display(),
            transactions = ledger.transactions().len(),
            payments = ledger.payments().len(),
            "shell started"
        );

        Ok(Self {
            mode,
            running: true,
            registry: CommandRegistry::new(commands::all_definitions()),
            ledger,
            store,
            config,
            config_manager,
            base_dir,
        })
    }

    pub fn ledger(&self) -> &Ledger {
        &self.ledger
    }

    pub fn base_dir(&self) -> &PathBuf {
        &self.base_dir
    }

    pub(crate) fn prompt(&self) -> String {
        format!(
            "fish[{} tx, {} pay]> ",
            self.ledger.transactions().len(),
            self.ledger.payments().len()
        )
    }

    pub(crate) fn today(&self) -> NaiveDate {
        Local::now().date_naive()
    }

    pub(crate) fn command_names(&self) -> Vec<&'static str> {
        self.registry.names().collect()
    }

    pub(crate) fn command(&self, name: &str) -> Option<&CommandDefinition> {
        self.registry.get(name)
    }

    pub(crate) fn dispatch(
        &mut self,
        command: &str,
        raw: &str,
        args: &[&str],
    ) -> Result<LoopControl, CommandError> {
        if let Some(handler) = self.registry.get(command).map(|entry| entry.handler) {
            match handler(self, args) {
                Ok(()) => Ok(LoopControl::Continue),
                Err(CommandError::ExitRequested) => Ok(LoopControl::Exit),
                Err(err) => Err(err),
            }
        } else {
            self.suggest_command(raw);
            Ok(LoopControl::Continue)
        }
    }

    pub(crate) fn suggest_command(&self, input: &str) {
        output::warning(format!(
            "Unknown command `{}`. Type `help` to see available commands.",
            input
        ));
        let needle = input.to_lowercase();
        let closest = self
            .registry
            .names()
            .map(|name| (levenshtein(name, &needle), name))
            .min_by_key(|(distance, _)| *distance);
        if let Some((distance, name)) = closest {
            if distance <= 3 {
                output::hint(format!("Did you mean `{}`?", name));
            }
        }
    }

    /// Writes one collection after a mutation. Failures are reported but do
    /// not undo the in-memory change.
    pub(crate) fn persist(&self, collection: CollectionName) {
        let result = match collection {
            CollectionName::Transactions => self.store.save_transactions(&self.ledger),
            CollectionName::Payments => self.store.save_payments(&self.ledger),
        };
        if let Err(err) = result {
            tracing::warn!(%collection, error = %err, "failed to persist collection");
            output::warning(format!("Could not save {}: {}", collection, err));
        }
    }

    pub(crate) fn save_config(&self) -> Result<(), CommandError> {
        self.config_manager.save(&self.config)?;
        Ok(())
    }

    pub(crate) fn confirm(&self, prompt: &str) -> Result<bool, CommandError> {
        match self.mode {
            CliMode::Interactive => super::io::confirm_action(prompt, false),
            CliMode::Script => Ok(false),
        }
    }

    pub(crate) fn confirm_exit(&self) -> Result<bool, CliError> {
        if self.mode == CliMode::Script {
            return Ok(true);
        }
        super::io::confirm_action("Exit shell?", true).map_err(CliError::from)
    }

    pub(crate) fn report_error(&self, err: CommandError) -> Result<(), CliError> {
        match err {
            CommandError::ExitRequested => Ok(()),
            CommandError::InvalidArguments(message) => {
                output::error(message);
                output::hint("Use `help <command>` for usage details.");
                Ok(())
            }
            other => {
                output::error(&other);
                Ok(())
            }
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum CommandError {
    #[error("{0}")]
    InvalidArguments(String),
    #[error("{0}")]
    Message(String),
    #[error(transparent)]
    Io(#[from] io::Error),
    #[error(transparent)]
    Core(#[from] LedgerError),
    #[error(transparent)]
    Dialoguer(#[from] dialoguer::Error),
    #[error("exit requested")]
    ExitRequested,
}

#[derive(Debug, thiserror::Error)]
pub enum CliError {
    #[error(transparent)]
    Core(#[from] LedgerError),
    #[error("input error: {0}")]
    Input(String),
    #[error("{0}")]
    Command(String),
}

impl From<CommandError> for CliError {
    fn from(err: CommandError) -> Self {
        CliError::Command(err.to_string())
    }
}

impl From<io::Error> for CliError {
    fn from(err: io::Error) -> Self {
        CliError::Command(err.to_string())
    }
}

impl From<rustyline::error::ReadlineError> for CliError {
    fn from(err: rustyline::error::ReadlineError) -> Self {
        CliError::Input(err.to_string())
    }
}

/// Feeds `lines` through a script-mode shell rooted at `base_dir`.
#[cfg(test)]
pub(crate) fn process_script(base_dir: PathBuf, lines: &[&str]) -> Result<ShellContext, CliError> {
    let mut context = ShellContext::with_base_dir(CliMode::Script, base_dir)?;
    for line in lines {
        if super::shell::run_line(&mut context, line)? == LoopControl::Exit {
            break;
        }
    }
    Ok(context)
}
