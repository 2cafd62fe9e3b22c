//! Integration tests for the quotes screen.
//!
//! Covers line item parsing, saved totals, currency, the newest-first
//! client default and confirmed deletes.

#![allow(clippy::expect_used, clippy::unwrap_used, clippy::indexing_slicing)]

use rust_decimal::Decimal;

use teckadm_client::AppError;
use teckadm_client::NoticeLevel;
use teckadm_client::draft::ValidationError;
use teckadm_client::shell::Workspace;
use teckadm_client::store::MemoryStore;
use teckadm_core::{ClientId, CurrencyCode};
use teckadm_integration_tests::TestApp;

async fn add_client(workspace: &mut Workspace<MemoryStore>, name: &str) -> ClientId {
    workspace.clients.draft.name = name.into();
    let id = workspace.clients.submit().await.expect("client saved");
    workspace.sync();
    id
}

// ============================================================================
// Create
// ============================================================================

#[tokio::test]
async fn test_quote_total_and_stored_numbers() {
    let mut app = TestApp::new();
    app.sign_up("ana@taller.mx").await;
    let mut shell = app.shell();
    let workspace = shell.workspace_mut().unwrap();
    let acme = add_client(workspace, "Acme").await;

    let quotes = &mut workspace.quotes;
    quotes.draft.title = "Mantenimiento anual".into();
    quotes.draft.set_description(0, "Mantenimiento");
    quotes.draft.set_quantity(0, "2");
    quotes.draft.set_price(0, "150,50");
    quotes.draft.add_item();
    quotes.draft.set_description(1, "Cable");
    quotes.draft.set_price(1, "99");
    assert_eq!(quotes.draft.total().to_string(), "MXN $400.00");

    let id = quotes.submit().await.unwrap();
    quotes.sync();

    let quote = quotes.quotes().get(&id).unwrap();
    assert_eq!(quote.client_id, acme);
    assert_eq!(quote.items.len(), 2);
    assert_eq!(quote.total, Decimal::new(400, 0));
    assert_eq!(quote.currency, CurrencyCode::MXN);
    assert_eq!(quotes.client_label(quote), "Acme");

    let snapshot = app.store.snapshot().unwrap();
    let stored = &snapshot["cotizaciones"][0];
    assert_eq!(stored.fields["total"], 400.0);
    assert_eq!(stored.fields["items"][0]["cantidad"], 2.0);
    assert_eq!(stored.fields["moneda"], "MXN");

    let shown = app.shown.drain();
    assert!(
        shown
            .iter()
            .any(|n| n.level == NoticeLevel::Success && n.message == "Cotización creada.")
    );
}

#[tokio::test]
async fn test_blank_items_are_dropped_but_still_priced() {
    let app = TestApp::new();
    app.sign_up("ana@taller.mx").await;
    let mut shell = app.shell();
    let workspace = shell.workspace_mut().unwrap();
    add_client(workspace, "Acme").await;

    let quotes = &mut workspace.quotes;
    quotes.draft.set_price(0, "500");
    let err = quotes.submit().await.unwrap_err();
    assert!(matches!(err, AppError::Validation(ValidationError::NoLineItems)));

    quotes.draft.add_item();
    quotes.draft.set_description(1, "Diagnóstico");
    quotes.draft.set_price(1, "250");
    let id = quotes.submit().await.unwrap();
    quotes.sync();

    let quote = quotes.quotes().get(&id).unwrap();
    assert_eq!(quote.items.len(), 1);
    assert_eq!(quote.total, Decimal::new(750, 0));
}

#[tokio::test]
async fn test_quote_needs_a_client() {
    let app = TestApp::new();
    app.sign_up("ana@taller.mx").await;
    let mut shell = app.shell();
    shell.sync();
    let quotes = &mut shell.workspace_mut().unwrap().quotes;

    quotes.draft.set_description(0, "Cable");
    let err = quotes.submit().await.unwrap_err();
    assert!(matches!(err, AppError::Validation(ValidationError::NoClientSelected)));
}

#[tokio::test]
async fn test_default_client_is_newest() {
    let app = TestApp::new();
    app.sign_up("ana@taller.mx").await;
    let mut shell = app.shell();
    let workspace = shell.workspace_mut().unwrap();
    add_client(workspace, "Acme").await;
    let beta = add_client(workspace, "Beta").await;

    assert_eq!(workspace.quotes.draft.picker.selected(), Some(&beta));
    assert_eq!(workspace.quotes.picker_label(), "Beta");
    // Tickets follow store order instead.
    assert_eq!(workspace.tickets.picker_label(), "Acme");
}

#[tokio::test]
async fn test_removed_client_is_listed_by_id() {
    let app = TestApp::new();
    app.sign_up("ana@taller.mx").await;
    let mut shell = app.shell();
    let workspace = shell.workspace_mut().unwrap();
    let acme = add_client(workspace, "Acme").await;

    workspace.quotes.draft.set_description(0, "Cable");
    let id = workspace.quotes.submit().await.unwrap();
    workspace.clients.delete(&acme).await.unwrap();
    workspace.sync();

    let quotes = &workspace.quotes;
    let quote = quotes.quotes().get(&id).unwrap();
    assert_eq!(quotes.client_label(quote), acme.as_str());
}

// ============================================================================
// Edit
// ============================================================================

#[tokio::test]
async fn test_edit_restamps_creation_time_and_switches_currency() {
    let app = TestApp::new();
    app.sign_up("ana@taller.mx").await;
    let mut shell = app.shell();
    let workspace = shell.workspace_mut().unwrap();
    add_client(workspace, "Acme").await;

    let quotes = &mut workspace.quotes;
    quotes.draft.set_description(0, "Cable");
    quotes.draft.set_price(0, "10");
    let id = quotes.submit().await.unwrap();
    quotes.sync();
    let first_stamp = quotes.quotes().get(&id).unwrap().created_at;

    quotes.begin_edit(&id).unwrap();
    assert_eq!(quotes.draft.items().len(), 1);
    quotes.draft.toggle_currency();
    quotes.submit().await.unwrap();
    quotes.sync();

    let quote = quotes.quotes().get(&id).unwrap();
    assert_eq!(quote.currency, CurrencyCode::USD);
    assert_eq!(quote.stored_total().to_string(), "USD $10.00");
    assert!(quote.created_at > first_stamp);
}

// ============================================================================
// Delete
// ============================================================================

#[tokio::test]
async fn test_delete_only_after_confirmation() {
    let app = TestApp::new();
    app.sign_up("ana@taller.mx").await;
    let mut shell = app.shell();
    let workspace = shell.workspace_mut().unwrap();
    add_client(workspace, "Acme").await;

    let quotes = &mut workspace.quotes;
    quotes.draft.set_description(0, "Cable");
    let id = quotes.submit().await.unwrap();
    quotes.sync();

    let prompt = quotes.request_delete(&id).unwrap();
    quotes.sync();
    assert_eq!(quotes.quotes().len(), 1);

    quotes.confirm_delete(prompt).await.unwrap();
    quotes.sync();
    assert!(quotes.quotes().is_empty());
    assert!(quotes.request_delete(&id).is_err());
}
