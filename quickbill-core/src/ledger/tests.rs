//! End-to-end scenarios through the [`Ledger`] facade.

use chrono::{DateTime, Duration, NaiveDate, TimeZone, Utc};
use rust_decimal::Decimal;
use uuid::Uuid;

use super::*;
use crate::billing::{compute_totals, DisplayStatus, resolve_display_status};
use crate::clock::FixedClock;
use crate::store::MemoryStore;

fn now() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 3, 15, 12, 0, 0).unwrap()
}

fn ledger() -> Ledger<MemoryStore, FixedClock> {
    Ledger::with_clock(MemoryStore::new(), FixedClock(now()))
}

fn invoice(email: &str, quantity: i64, rate: i64, tax: i64) -> Invoice {
    Invoice {
        id: Uuid::new_v4(),
        invoice_number: "INV-2024-0001".to_string(),
        client_name: "Acme Corp".to_string(),
        client_email: email.to_string(),
        client_address: Some("1 Loop Road".to_string()),
        line_items: vec![LineItem::new("Consulting", Decimal::from(quantity), Decimal::from(rate))],
        tax_percentage: Decimal::from(tax),
        due_date: NaiveDate::from_ymd_opt(2024, 4, 1).unwrap(),
        notes: String::new(),
        status: InvoiceStatus::Draft,
        created_at: now() - Duration::days(1),
        paid_at: None,
        sent_at: None,
    }
}

/// Create, save, and read back one invoice and its derived client.
#[test]
fn test_save_creates_invoice_and_client() {
    let ledger = ledger();
    let inv = invoice("billing@acme.test", 2, 50, 10);

    let totals = compute_totals(&inv.line_items, inv.tax_percentage);
    assert_eq!(totals.subtotal, Decimal::from(100));
    assert_eq!(totals.tax, Decimal::from(10));
    assert_eq!(totals.total, Decimal::from(110));

    ledger.save_invoice(&inv).expect("Save should succeed");

    let invoices = ledger.invoices();
    assert_eq!(invoices.len(), 1);
    assert_eq!(invoices[0].id, inv.id);

    let clients = ledger.clients();
    assert_eq!(clients.len(), 1);
    assert_eq!(clients[0].total_billed, Decimal::from(110));
    assert_eq!(clients[0].total_invoices, 1);
}

#[test]
fn test_update_replaces_in_place_and_counts_again() {
    let ledger = ledger();
    let first = invoice("billing@acme.test", 1, 100, 0);
    let second = invoice("other@client.test", 1, 10, 0);
    ledger.save_invoice(&first).unwrap();
    ledger.save_invoice(&second).unwrap();

    let mut edited = first.clone();
    edited.notes = "Net 30".to_string();
    ledger.save_invoice(&edited).unwrap();

    let invoices = ledger.invoices();
    assert_eq!(invoices.len(), 2);
    assert_eq!(invoices[0], edited);
    assert_eq!(invoices[1], second);

    let acme = ledger
        .clients()
        .into_iter()
        .find(|c| c.email == "billing@acme.test")
        .unwrap();
    assert_eq!(acme.total_invoices, 2);
    assert_eq!(acme.total_billed, Decimal::from(200));
}

#[test]
fn test_recompute_mode_resave_does_not_double_count() {
    let ledger = ledger().with_aggregation(AggregationMode::Recompute);
    let inv = invoice("billing@acme.test", 1, 100, 0);

    ledger.save_invoice(&inv).unwrap();
    ledger.save_invoice(&inv).unwrap();

    let clients = ledger.clients();
    assert_eq!(clients[0].total_invoices, 1);
    assert_eq!(clients[0].total_billed, Decimal::from(100));
}

#[test]
fn test_delete_leaves_others_and_clients_untouched() {
    let ledger = ledger();
    let keep = invoice("a@x.test", 1, 10, 0);
    let removed = invoice("b@x.test", 1, 20, 0);
    ledger.save_invoice(&keep).unwrap();
    ledger.save_invoice(&removed).unwrap();
    let clients_before = ledger.clients();

    assert!(ledger.delete_invoice(removed.id).unwrap());

    assert_eq!(ledger.invoices(), vec![keep]);
    assert_eq!(ledger.clients(), clients_before);
}

#[test]
fn test_unknown_ids_are_no_ops() {
    let ledger = ledger();
    let inv = invoice("a@x.test", 1, 10, 0);
    ledger.save_invoice(&inv).unwrap();

    let missing = Uuid::new_v4();
    assert!(!ledger.delete_invoice(missing).unwrap());
    assert!(!ledger.mark_invoice_as_paid(missing).unwrap());
    assert!(!ledger.mark_invoice_as_sent(missing).unwrap());
    assert_eq!(ledger.invoices(), vec![inv]);
}

#[test]
fn test_mark_paid_stamps_timestamp() {
    let ledger = ledger();
    let inv = invoice("a@x.test", 1, 10, 0);
    ledger.save_invoice(&inv).unwrap();

    assert!(ledger.mark_invoice_as_paid(inv.id).unwrap());

    let paid = ledger.invoice(inv.id).unwrap();
    assert_eq!(paid.status, InvoiceStatus::Paid);
    let paid_at = paid.paid_at.expect("paid_at should be set");
    assert!(paid_at >= paid.created_at);
    assert_eq!(paid_at, now());
}

#[test]
fn test_mark_sent_then_overdue() {
    let store = MemoryStore::new();
    let mut inv = invoice("a@x.test", 1, 10, 0);
    inv.due_date = NaiveDate::from_ymd_opt(2024, 3, 20).unwrap();

    let today = Ledger::with_clock(store.clone(), FixedClock(now()));
    today.save_invoice(&inv).unwrap();
    today.mark_invoice_as_sent(inv.id).unwrap();

    let sent = today.invoice(inv.id).unwrap();
    assert_eq!(sent.status, InvoiceStatus::Sent);
    assert_eq!(sent.sent_at, Some(now()));
    assert!(!today.is_overdue(&sent));

    let later = Ledger::with_clock(store, FixedClock(now() + Duration::days(10)));
    let sent = later.invoice(inv.id).unwrap();
    assert!(later.is_overdue(&sent));
    assert_eq!(resolve_display_status(&sent, later.now()), DisplayStatus::Overdue);
    assert_eq!(later.dashboard_stats().overdue_count, 1);
}

#[test]
fn test_invoice_numbers_follow_count() {
    let ledger = ledger();
    assert_eq!(ledger.generate_invoice_number(), "INV-2024-0001");

    let inv = invoice("a@x.test", 1, 10, 0);
    ledger.save_invoice(&inv).unwrap();
    assert_eq!(ledger.generate_invoice_number(), "INV-2024-0002");

    // Numbers are reissued after a delete.
    ledger.delete_invoice(inv.id).unwrap();
    assert_eq!(ledger.generate_invoice_number(), "INV-2024-0001");
}

#[test]
fn test_new_invoice_uses_settings() {
    let ledger = ledger();
    ledger
        .save_settings(&Settings {
            default_tax_percentage: Decimal::new(85, 1),
            default_payment_terms: 30,
            ..Settings::default()
        })
        .unwrap();

    let draft = ledger.new_invoice();

    assert_eq!(draft.invoice_number, "INV-2024-0001");
    assert_eq!(draft.status, InvoiceStatus::Draft);
    assert_eq!(draft.tax_percentage, Decimal::new(85, 1));
    assert_eq!(draft.due_date, NaiveDate::from_ymd_opt(2024, 4, 14).unwrap());
    assert_eq!(draft.created_at, now());
    assert_eq!(draft.line_items.len(), 1);
    assert_eq!(draft.line_items[0].quantity, Decimal::ONE);
    assert_eq!(draft.line_items[0].rate, Decimal::ZERO);
    assert!(ledger.invoices().is_empty(), "Drafts are not persisted");
}

#[test]
fn test_new_invoice_caps_due_date_for_huge_terms() {
    let ledger = ledger();
    ledger
        .save_settings(&Settings {
            default_payment_terms: u32::MAX,
            ..Settings::default()
        })
        .unwrap();

    let draft = ledger.new_invoice();

    assert_eq!(draft.due_date, NaiveDate::MAX);
    assert_eq!(draft.created_at, now());
}

#[test]
fn test_repeated_marks_refresh_timestamps() {
    let store = MemoryStore::new();
    let inv = invoice("a@x.test", 1, 10, 0);
    let later_time = now() + Duration::days(2);

    let first = Ledger::with_clock(store.clone(), FixedClock(now()));
    first.save_invoice(&inv).unwrap();
    first.mark_invoice_as_sent(inv.id).unwrap();

    let later = Ledger::with_clock(store, FixedClock(later_time));
    assert!(later.mark_invoice_as_sent(inv.id).unwrap());

    let resent = later.invoice(inv.id).unwrap();
    assert_eq!(resent.status, InvoiceStatus::Sent);
    assert_eq!(resent.sent_at, Some(later_time));

    first.mark_invoice_as_paid(inv.id).unwrap();
    assert_eq!(first.invoice(inv.id).unwrap().paid_at, Some(now()));
    assert!(later.mark_invoice_as_paid(inv.id).unwrap());

    let repaid = later.invoice(inv.id).unwrap();
    assert_eq!(repaid.status, InvoiceStatus::Paid);
    assert_eq!(repaid.paid_at, Some(later_time));
    assert_eq!(repaid.sent_at, Some(later_time));
    assert_eq!(later.invoices().len(), 1);
}

#[test]
fn test_dashboard_rollup() {
    let ledger = ledger();
    let sent = invoice("a@x.test", 1, 100, 0);
    let paid = invoice("b@x.test", 1, 50, 0);
    let mut old = invoice("c@x.test", 1, 70, 0);
    old.created_at = now() - Duration::days(90);
    old.due_date = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap();

    for inv in [&sent, &paid, &old] {
        ledger.save_invoice(inv).unwrap();
    }
    ledger.mark_invoice_as_sent(sent.id).unwrap();
    ledger.mark_invoice_as_paid(paid.id).unwrap();

    let dashboard = ledger.dashboard();

    assert_eq!(dashboard.stats.total_invoices, 3);
    assert_eq!(dashboard.stats.paid_this_month, Decimal::from(50));
    assert_eq!(dashboard.stats.overdue_count, 1);
    assert_eq!(dashboard.stats.total_outstanding, Decimal::from(170));
    assert_eq!(dashboard.recent_invoices.len(), 3);
    assert_eq!(dashboard.recent_invoices[2].id, old.id);
}

#[test]
fn test_client_directory_summary() {
    let ledger = ledger();
    ledger.save_invoice(&invoice("a@x.test", 1, 100, 0)).unwrap();
    ledger.save_invoice(&invoice("A@X.test", 1, 50, 0)).unwrap();
    ledger.save_invoice(&invoice("b@x.test", 1, 25, 0)).unwrap();

    let directory = ledger.client_directory();

    assert_eq!(directory.client_count, 2);
    assert_eq!(directory.total_billed, Decimal::from(175));
    // 3 invoices / 2 clients = 1.5, rounded up
    assert_eq!(directory.average_invoices_per_client, 2);
}

/// Two handles over one namespace (two open tabs) race last-writer-wins.
#[test]
fn test_concurrent_handles_last_writer_wins() {
    let store = MemoryStore::new();
    let tab_a = Ledger::with_clock(store.clone(), FixedClock(now()));
    let tab_b = Ledger::with_clock(store.clone(), FixedClock(now()));

    let base = invoice("a@x.test", 1, 10, 0);
    tab_a.save_invoice(&base).unwrap();

    // Both tabs load the collection before either writes.
    let mut seen_by_a = tab_a.invoices();
    let mut seen_by_b = tab_b.invoices();

    seen_by_a.push(invoice("b@x.test", 1, 20, 0));
    seen_by_b.push(invoice("c@x.test", 1, 30, 0));

    tab_a.repository().put_invoices(&seen_by_a).unwrap();
    tab_b.repository().put_invoices(&seen_by_b).unwrap();

    let stored = Ledger::new(store).invoices();
    assert_eq!(stored, seen_by_b);
    assert!(!stored.iter().any(|i| i.client_email == "b@x.test"));
}
