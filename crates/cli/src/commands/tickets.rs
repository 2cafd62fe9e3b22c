//! Ticket commands.

use teckadm_core::{ClientId, TicketId, TicketPriority, TicketStatus};

use super::{CliError, Context, emit};

fn parse_priority(value: &str) -> Result<TicketPriority, CliError> {
    value
        .parse()
        .map_err(|e: String| CliError::InvalidArgument("priority", e))
}

fn parse_status(value: &str) -> Result<TicketStatus, CliError> {
    value
        .parse()
        .map_err(|e: String| CliError::InvalidArgument("status", e))
}

/// Print every ticket.
///
/// # Errors
///
/// Returns an error if signing in fails.
pub async fn list() -> Result<(), CliError> {
    let mut ctx = Context::signed_in().await?;
    let outcome = ctx.workspace().and_then(|workspace| {
        for ticket in workspace.tickets.tickets() {
            emit(format_args!(
                "{}\t[{}]\t[{}]\t{}\t{}",
                ticket.id, ticket.status, ticket.priority, ticket.title, ticket.client_name
            ))?;
        }
        Ok(())
    });
    ctx.finish(outcome).await
}

/// Add a ticket for `client`, or for the first client when omitted.
///
/// # Errors
///
/// Returns an error if an argument is invalid, validation fails or the
/// write fails.
pub async fn add(
    title: String,
    description: Option<String>,
    client: Option<String>,
    priority: Option<String>,
) -> Result<(), CliError> {
    let priority = priority.as_deref().map(parse_priority).transpose()?;

    let mut ctx = Context::signed_in().await?;
    let outcome: Result<(), CliError> = async {
        let screen = &mut ctx.workspace()?.tickets;
        if let Some(client) = client {
            screen.choose_client(ClientId::new(client));
        }
        screen.draft.title = title;
        screen.draft.description = description.unwrap_or_default();
        if let Some(priority) = priority {
            screen.draft.priority = priority;
        }
        let id = screen.submit().await?;
        emit(id)
    }
    .await;
    ctx.finish(outcome).await
}

/// Edit a ticket; omitted fields keep their value.
///
/// # Errors
///
/// Returns an error if an argument is invalid, the ticket is unknown or the
/// write fails.
pub async fn edit(
    id: &str,
    title: Option<String>,
    description: Option<String>,
    status: Option<String>,
    priority: Option<String>,
) -> Result<(), CliError> {
    let status = status.as_deref().map(parse_status).transpose()?;
    let priority = priority.as_deref().map(parse_priority).transpose()?;

    let mut ctx = Context::signed_in().await?;
    let outcome: Result<(), CliError> = async {
        let screen = &mut ctx.workspace()?.tickets;
        screen.begin_edit(&TicketId::new(id))?;
        if let Some(title) = title {
            screen.draft.title = title;
        }
        if let Some(description) = description {
            screen.draft.description = description;
        }
        if let Some(status) = status {
            screen.draft.status = status;
        }
        if let Some(priority) = priority {
            screen.draft.priority = priority;
        }
        screen.submit().await?;
        Ok(())
    }
    .await;
    ctx.finish(outcome).await
}

/// Move a ticket to its next status.
///
/// # Errors
///
/// Returns an error if the ticket is unknown or the write fails.
pub async fn advance(id: &str) -> Result<(), CliError> {
    let mut ctx = Context::signed_in().await?;
    let outcome: Result<(), CliError> = async {
        let tickets = &mut ctx.workspace()?.tickets;
        tickets.advance_status(&TicketId::new(id)).await?;
        Ok(())
    }
    .await;
    ctx.finish(outcome).await
}

/// Change a ticket's priority.
///
/// # Errors
///
/// Returns an error if the priority is invalid or the write fails.
pub async fn set_priority(id: &str, priority: &str) -> Result<(), CliError> {
    let priority = parse_priority(priority)?;
    let mut ctx = Context::signed_in().await?;
    let outcome: Result<(), CliError> = async {
        let tickets = &mut ctx.workspace()?.tickets;
        tickets.set_priority(&TicketId::new(id), priority).await?;
        Ok(())
    }
    .await;
    ctx.finish(outcome).await
}

/// Remove a ticket.
///
/// # Errors
///
/// Returns an error if the delete fails.
pub async fn remove(id: &str) -> Result<(), CliError> {
    let mut ctx = Context::signed_in().await?;
    let outcome: Result<(), CliError> = async {
        ctx.workspace()?.tickets.delete(&TicketId::new(id)).await?;
        Ok(())
    }
    .await;
    ctx.finish(outcome).await
}
