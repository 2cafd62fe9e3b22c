//! Quote commands.

use teckadm_client::draft::QuoteDraft;
use teckadm_client::screens::DeletePrompt;
use teckadm_core::{ClientId, CurrencyCode, QuoteId};

use super::{CliError, Context, emit};

/// One `--item` argument: `description:quantity:price`.
#[derive(Debug, PartialEq, Eq)]
struct ItemArg<'a> {
    description: &'a str,
    quantity: &'a str,
    price: &'a str,
}

/// Split from the right so descriptions may contain `:`.
fn parse_item(value: &str) -> Result<ItemArg<'_>, CliError> {
    let mut parts = value.rsplitn(3, ':');
    match (parts.next(), parts.next(), parts.next()) {
        (Some(price), Some(quantity), Some(description)) => Ok(ItemArg {
            description,
            quantity,
            price,
        }),
        _ => Err(CliError::InvalidArgument(
            "item",
            format!("expected description:quantity:price, got {value:?}"),
        )),
    }
}

fn parse_currency(value: &str) -> Result<CurrencyCode, CliError> {
    value
        .parse()
        .map_err(|e: String| CliError::InvalidArgument("currency", e))
}

/// Fill the draft's rows from `--item` arguments, replacing what was there.
fn fill_items(draft: &mut QuoteDraft, items: &[ItemArg<'_>]) {
    while draft.remove_item(0) {}
    for (index, item) in items.iter().enumerate() {
        if index > 0 {
            draft.add_item();
        }
        draft.set_description(index, item.description);
        draft.set_quantity(index, item.quantity);
        draft.set_price(index, item.price);
    }
}

fn set_currency(draft: &mut QuoteDraft, currency: CurrencyCode) {
    if draft.currency() != currency {
        draft.toggle_currency();
    }
}

/// Print every quote, newest first.
///
/// # Errors
///
/// Returns an error if signing in fails.
pub async fn list() -> Result<(), CliError> {
    let mut ctx = Context::signed_in().await?;
    let outcome = ctx.workspace().and_then(|workspace| {
        let screen = &workspace.quotes;
        for quote in screen.quotes() {
            emit(format_args!(
                "{}\t{}\t{}\t{} item(s)\t{}",
                quote.id,
                screen.client_label(quote),
                quote.title.as_deref().unwrap_or("-"),
                quote.items.len(),
                quote.stored_total()
            ))?;
        }
        Ok(())
    });
    ctx.finish(outcome).await
}

/// Add a quote for `client`, or for the newest client when omitted.
///
/// # Errors
///
/// Returns an error if an argument is invalid, validation fails or the
/// write fails.
pub async fn add(
    client: Option<String>,
    title: Option<String>,
    items: &[String],
    currency: Option<String>,
) -> Result<(), CliError> {
    let items = items
        .iter()
        .map(|item| parse_item(item))
        .collect::<Result<Vec<_>, _>>()?;
    let currency = currency.as_deref().map(parse_currency).transpose()?;

    let mut ctx = Context::signed_in().await?;
    let outcome: Result<(), CliError> = async {
        let screen = &mut ctx.workspace()?.quotes;
        if let Some(client) = client {
            screen.choose_client(ClientId::new(client));
        }
        screen.draft.title = title.unwrap_or_default();
        fill_items(&mut screen.draft, &items);
        if let Some(currency) = currency {
            set_currency(&mut screen.draft, currency);
        }
        emit(format_args!("Total: {}", screen.draft.total()))?;
        let id = screen.submit().await?;
        emit(id)
    }
    .await;
    ctx.finish(outcome).await
}

/// Edit a quote; omitted fields keep their value, given items replace all
/// rows.
///
/// # Errors
///
/// Returns an error if an argument is invalid, the quote is unknown or the
/// write fails.
pub async fn edit(
    id: &str,
    client: Option<String>,
    title: Option<String>,
    items: &[String],
    currency: Option<String>,
) -> Result<(), CliError> {
    let items = items
        .iter()
        .map(|item| parse_item(item))
        .collect::<Result<Vec<_>, _>>()?;
    let currency = currency.as_deref().map(parse_currency).transpose()?;

    let mut ctx = Context::signed_in().await?;
    let outcome: Result<(), CliError> = async {
        let screen = &mut ctx.workspace()?.quotes;
        screen.begin_edit(&QuoteId::new(id))?;
        if let Some(client) = client {
            screen.choose_client(ClientId::new(client));
        }
        if let Some(title) = title {
            screen.draft.title = title;
        }
        if !items.is_empty() {
            fill_items(&mut screen.draft, &items);
        }
        if let Some(currency) = currency {
            set_currency(&mut screen.draft, currency);
        }
        screen.submit().await?;
        Ok(())
    }
    .await;
    ctx.finish(outcome).await
}

/// Remove a quote. Without `--yes` only the confirmation question is shown.
///
/// # Errors
///
/// Returns [`CliError::NotConfirmed`] without `--yes`, or an error if the
/// quote is unknown or the delete fails.
pub async fn remove(id: &str, confirmed: bool) -> Result<(), CliError> {
    let mut ctx = Context::signed_in().await?;
    let outcome: Result<(), CliError> = async {
        let screen = &mut ctx.workspace()?.quotes;
        let prompt = screen.request_delete(&QuoteId::new(id))?;
        if !confirmed {
            return Err(CliError::NotConfirmed(format!(
                "{}: {}",
                DeletePrompt::TITLE,
                DeletePrompt::MESSAGE
            )));
        }
        screen.confirm_delete(prompt).await?;
        Ok(())
    }
    .await;
    ctx.finish(outcome).await
}
