mod common;

use common::{flaky_ctx, memory_ctx};
use exportkit_core::{
    Alert, AlertType, ExportPresenter, ExportableEntry, Payload, SharePayload, StrategyResult,
    TextStrategy,
};
use std::cell::RefCell;

#[test]
fn load_lists_catalog_entries() {
    let ctx = memory_ctx();
    ctx.items().create_item("note").unwrap();
    ctx.items().save().unwrap();
    ctx.groups().create_group("walk", None);
    let sink = |_: SharePayload| {};

    let mut presenter = ExportPresenter::new(&ctx, &sink);
    assert!(presenter.entries().is_empty());
    presenter.load();

    assert_eq!(presenter.entries().len(), 2);
    assert!(presenter.alert().is_none());
}

#[test]
fn export_shares_single_payload() {
    let ctx = memory_ctx().with_strategy(|entry: &ExportableEntry| -> StrategyResult {
        Ok(Payload::Text(entry.name().to_uppercase()))
    });
    ctx.items().create_item("loud").unwrap();
    ctx.items().save().unwrap();
    let shared = RefCell::new(Vec::new());
    let sink = |payload: SharePayload| shared.borrow_mut().push(payload);

    let mut presenter = ExportPresenter::new(&ctx, &sink);
    presenter.load();
    presenter.export(0);

    assert_eq!(
        *shared.borrow(),
        vec![SharePayload::Item(Payload::Text("LOUD".to_string()))]
    );
}

#[test]
fn export_all_shares_merged_payload() {
    let ctx = memory_ctx().with_strategy(TextStrategy);
    ctx.items().create_item("a").unwrap();
    ctx.items().create_item("b").unwrap();
    ctx.items().save().unwrap();
    let shared = RefCell::new(Vec::new());
    let sink = |payload: SharePayload| shared.borrow_mut().push(payload);

    let mut presenter = ExportPresenter::new(&ctx, &sink);
    presenter.load();
    presenter.export_all();

    let shared = shared.borrow();
    assert_eq!(shared.len(), 1);
    let text = match &shared[0] {
        SharePayload::Item(payload) => payload.as_text().unwrap(),
        other => panic!("unexpected share payload: {other:?}"),
    };
    assert_eq!(text.lines().count(), 2);
}

#[test]
fn missing_strategy_raises_descriptive_alert() {
    let ctx = memory_ctx();
    ctx.items().create_item("stuck").unwrap();
    ctx.items().save().unwrap();
    let shared = RefCell::new(Vec::new());
    let sink = |payload: SharePayload| shared.borrow_mut().push(payload);

    let mut presenter = ExportPresenter::new(&ctx, &sink);
    presenter.load();
    presenter.export(0);

    assert!(shared.borrow().is_empty());
    assert_eq!(
        presenter.alert().map(AlertType::to_alert),
        Some(Alert {
            title: "Error".to_string(),
            description: "no export strategy configured".to_string(),
        })
    );
    presenter.dismiss_alert();
    assert!(presenter.alert().is_none());
}

#[test]
fn strategy_error_message_is_shown_verbatim() {
    let ctx = memory_ctx().with_strategy(|_: &ExportableEntry| -> StrategyResult {
        Err("disk full".into())
    });
    ctx.items().create_item("doomed").unwrap();
    ctx.items().save().unwrap();
    let sink = |_: SharePayload| {};

    let mut presenter = ExportPresenter::new(&ctx, &sink);
    presenter.load();
    presenter.export_all();

    assert_eq!(
        presenter.alert(),
        Some(&AlertType::DescriptiveError("disk full".to_string()))
    );
}

#[test]
fn delete_removes_entry_and_cascades_groups() {
    let ctx = memory_ctx();
    ctx.items().create_item("item").unwrap();
    ctx.items().save().unwrap();
    let group = ctx.groups().create_group("group", None);
    assert!(ctx.groups().batch_insert(&[b"child".to_vec()], &group));
    let sink = |_: SharePayload| {};

    let mut presenter = ExportPresenter::new(&ctx, &sink);
    presenter.load();
    presenter.delete(1);
    presenter.delete(0);

    assert!(presenter.entries().is_empty());
    assert!(presenter.alert().is_none());
    presenter.load();
    assert!(presenter.entries().is_empty());
    assert!(ctx.groups().resolve_children(group.id).unwrap().is_empty());
}

#[test]
fn failed_delete_keeps_entry_and_raises_alert() {
    let ctx = flaky_ctx();
    let group = ctx.groups().create_group("locked", None);
    let sink = |_: SharePayload| {};

    let mut presenter = ExportPresenter::new(&ctx, &sink);
    presenter.load();
    ctx.store().fail_fetch_children.set(true);
    presenter.delete(0);

    assert_eq!(presenter.entries(), &[ExportableEntry::group(group)]);
    assert!(matches!(
        presenter.alert(),
        Some(AlertType::DescriptiveError(message)) if message.contains("could not fetch data")
    ));
}

#[test]
fn out_of_range_index_raises_not_found() {
    let ctx = memory_ctx();
    let sink = |_: SharePayload| {};

    let mut presenter = ExportPresenter::new(&ctx, &sink);
    presenter.export(3);

    assert_eq!(
        presenter.alert(),
        Some(&AlertType::DescriptiveError("item not found".to_string()))
    );
}

#[test]
fn failed_reload_keeps_previous_entries() {
    let ctx = flaky_ctx();
    ctx.items().create_item("cached").unwrap();
    ctx.items().save().unwrap();
    let sink = |_: SharePayload| {};

    let mut presenter = ExportPresenter::new(&ctx, &sink);
    presenter.load();
    ctx.store().fail_fetch_items.set(true);
    ctx.store().fail_fetch_groups.set(true);
    presenter.load();

    assert_eq!(presenter.entries().len(), 1);
    assert!(matches!(
        presenter.alert(),
        Some(AlertType::DescriptiveError(_))
    ));
}

#[test]
fn alert_sink_observes_raised_alerts() {
    let ctx = memory_ctx();
    let sink = |_: SharePayload| {};
    let observed = RefCell::new(Vec::new());
    let on_alert = |alert: &AlertType| observed.borrow_mut().push(alert.clone());

    let mut presenter = ExportPresenter::new(&ctx, &sink).with_alert_sink(&on_alert);
    presenter.export_all();
    presenter.delete(0);

    assert_eq!(
        *observed.borrow(),
        vec![
            AlertType::DescriptiveError("no export strategy configured".to_string()),
            AlertType::DescriptiveError("item not found".to_string()),
        ]
    );
    assert_eq!(presenter.alert(), observed.borrow().last());
}
