//! Client commands.

use teckadm_core::ClientId;

use super::{CliError, Context, emit};

/// Print every client.
///
/// # Errors
///
/// Returns an error if signing in fails.
pub async fn list() -> Result<(), CliError> {
    let mut ctx = Context::signed_in().await?;
    let outcome = ctx.workspace().and_then(|workspace| {
        for client in workspace.clients.clients() {
            emit(format_args!(
                "{}\t{}\t{}",
                client.id,
                client.name,
                client.phone.as_deref().unwrap_or("-")
            ))?;
        }
        Ok(())
    });
    ctx.finish(outcome).await
}

/// Add a client.
///
/// # Errors
///
/// Returns an error if the name is blank or the write fails.
pub async fn add(name: String, phone: Option<String>) -> Result<(), CliError> {
    let mut ctx = Context::signed_in().await?;
    let outcome: Result<(), CliError> = async {
        let screen = &mut ctx.workspace()?.clients;
        screen.draft.name = name;
        screen.draft.phone = phone.unwrap_or_default();
        let id = screen.submit().await?;
        emit(id)
    }
    .await;
    ctx.finish(outcome).await
}

/// Edit a client; omitted fields keep their value.
///
/// # Errors
///
/// Returns an error if the client is unknown or the write fails.
pub async fn edit(id: &str, name: Option<String>, phone: Option<String>) -> Result<(), CliError> {
    let mut ctx = Context::signed_in().await?;
    let outcome: Result<(), CliError> = async {
        let screen = &mut ctx.workspace()?.clients;
        screen.begin_edit(&ClientId::new(id))?;
        if let Some(name) = name {
            screen.draft.name = name;
        }
        if let Some(phone) = phone {
            screen.draft.phone = phone;
        }
        screen.submit().await?;
        Ok(())
    }
    .await;
    ctx.finish(outcome).await
}

/// Remove a client.
///
/// # Errors
///
/// Returns an error if the delete fails.
pub async fn remove(id: &str) -> Result<(), CliError> {
    let mut ctx = Context::signed_in().await?;
    let outcome: Result<(), CliError> = async {
        ctx.workspace()?.clients.delete(&ClientId::new(id)).await?;
        Ok(())
    }
    .await;
    ctx.finish(outcome).await
}
