//! Command implementations.
//!
//! Every command loads the local state file, signs in with the configured
//! credentials, opens the signed-in workspace, runs one action and saves
//! the state again.
//!
//! # Environment Variables
//!
//! - `TECKADM_DATA_FILE` - Local state file
//! - `TECKADM_EMAIL` / `TECKADM_PASSWORD` - Account to act as
//! - `TECKADM_DEFAULT_CURRENCY` - Currency of new quotes

pub mod account;
pub mod clients;
pub mod quotes;
pub mod tickets;

use std::fmt::Display;
use std::io::Write;

use thiserror::Error;
use tracing::info;

use teckadm_client::auth::{MemoryAuth, SignInForm};
use teckadm_client::backend::LocalBackend;
use teckadm_client::config::{ClientConfig, ConfigError};
use teckadm_client::session::Session;
use teckadm_client::shell::{Shell, Workspace};
use teckadm_client::store::MemoryStore;
use teckadm_client::{AppError, NoticeReceiver, Notices};

/// Errors that can occur while running a command.
#[derive(Debug, Error)]
pub enum CliError {
    /// Signing in needs `TECKADM_EMAIL` and `TECKADM_PASSWORD`.
    #[error("No credentials configured: set TECKADM_EMAIL and TECKADM_PASSWORD")]
    MissingCredentials,

    /// The command needs a signed-in account.
    #[error("Not signed in")]
    NotSignedIn,

    /// A command-line argument could not be parsed.
    #[error("Invalid argument {0}: {1}")]
    InvalidArgument(&'static str, String),

    /// A destructive command was not confirmed.
    #[error("{0} (re-run with --yes)")]
    NotConfirmed(String),

    #[error(transparent)]
    App(#[from] AppError),

    #[error("Config error: {0}")]
    Config(#[from] ConfigError),

    #[error("Output error: {0}")]
    Io(#[from] std::io::Error),
}

/// Loaded state plus the signed-in shell.
pub struct Context {
    pub config: ClientConfig,
    pub backend: LocalBackend,
    pub shell: Shell<MemoryAuth, MemoryStore>,
    notices: NoticeReceiver,
}

impl Context {
    /// Load config and state without signing in.
    pub async fn load() -> Result<Self, CliError> {
        Self::open(ClientConfig::from_env()?).await
    }

    /// Load the state file named by `config`.
    pub async fn open(config: ClientConfig) -> Result<Self, CliError> {
        let backend = LocalBackend::load(&config.data_file).await?;
        let (notices, receiver) = Notices::channel();
        let shell = Shell::new(
            Session::new(backend.auth.clone()),
            backend.store.clone(),
            notices,
            config.default_currency,
        );
        Ok(Self {
            config,
            backend,
            shell,
            notices: receiver,
        })
    }

    /// Load, then sign in with the configured credentials.
    pub async fn signed_in() -> Result<Self, CliError> {
        let mut ctx = Self::load().await?;
        let credentials = ctx
            .config
            .credentials
            .clone()
            .ok_or(CliError::MissingCredentials)?;

        let mut form = SignInForm::new(Notices::discard());
        form.email = credentials.email.to_string();
        form.password = credentials.password;
        let identity = form.submit(ctx.shell.session()).await?;
        info!(uid = %identity.uid, "Signed in");

        ctx.shell.sync();
        Ok(ctx)
    }

    /// The signed-in workspace, with every queued delivery applied.
    pub fn workspace(&mut self) -> Result<&mut Workspace<MemoryStore>, CliError> {
        self.shell.sync();
        self.shell.workspace_mut().ok_or(CliError::NotSignedIn)
    }

    /// Print queued notices, then save the state file unless the command
    /// failed.
    ///
    /// # Errors
    ///
    /// Returns the command's own error, or an error if printing or saving
    /// fails.
    pub async fn finish(mut self, outcome: Result<(), CliError>) -> Result<(), CliError> {
        self.flush_notices(&mut std::io::stdout().lock())?;
        outcome?;
        self.backend.save(&self.config.data_file).await?;
        Ok(())
    }

    fn flush_notices(&mut self, out: &mut impl Write) -> Result<(), CliError> {
        for notice in self.notices.drain() {
            writeln!(out, "{notice}")?;
        }
        Ok(())
    }
}

/// Write one line to stdout.
pub fn emit(line: impl Display) -> Result<(), CliError> {
    let mut out = std::io::stdout().lock();
    writeln!(out, "{line}")?;
    Ok(())
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use secrecy::SecretString;

    use teckadm_core::{CurrencyCode, Email};

    use super::*;

    #[tokio::test]
    async fn test_failed_command_prints_notices_and_skips_save() {
        let data_file =
            std::env::temp_dir().join(format!("teckadm-cli-{}.json", std::process::id()));
        let config = ClientConfig {
            data_file: data_file.clone(),
            default_currency: CurrencyCode::MXN,
            credentials: None,
        };
        let mut ctx = Context::open(config).await.unwrap();
        ctx.shell
            .session()
            .create_account(
                &Email::parse("ana@taller.mx").unwrap(),
                &SecretString::from("secreto1".to_owned()),
            )
            .await
            .unwrap();

        let screen = &mut ctx.workspace().unwrap().clients;
        screen.draft.name = "  ".into();
        assert!(screen.submit().await.is_err());

        let mut out = Vec::new();
        ctx.flush_notices(&mut out).unwrap();
        assert_eq!(String::from_utf8(out).unwrap(), "Falta el nombre\n");

        let outcome = ctx.finish(Err(CliError::NotSignedIn)).await;
        assert!(matches!(outcome, Err(CliError::NotSignedIn)));
        assert!(!data_file.exists());
    }
}
