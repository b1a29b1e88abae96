mod common;

use common::{count_rows, flaky_ctx, memory_ctx, message_log};
use exportkit_core::{ExportKitError, ExportableEntry, ItemGroup, RecordStore};

fn payloads(values: &[&str]) -> Vec<Vec<u8>> {
    values.iter().map(|value| value.as_bytes().to_vec()).collect()
}

#[test]
fn create_group_uses_given_or_current_start_time() {
    let ctx = memory_ctx();
    let before = exportkit_core::now_epoch_ms();

    let fixed = ctx.groups().create_group("fixed", Some(42));
    let stamped = ctx.groups().create_group("stamped", None);

    assert_eq!(fixed.start_timestamp, 42);
    assert!(stamped.start_timestamp >= before);
    assert_eq!(count_rows(ctx.store().connection(), "item_groups"), 2);
}

#[test]
fn create_group_returns_group_even_when_save_fails() {
    let (messages, sink) = message_log();
    let ctx = flaky_ctx().with_log_sink(sink);
    ctx.store().fail_save.set(true);

    let group = ctx.groups().create_group("unsaved", None);

    assert_eq!(group.name, "unsaved");
    assert_eq!(messages.borrow().len(), 1);
    assert!(messages.borrow()[0].contains(&group.id.to_string()));
}

#[test]
fn empty_batch_is_rejected_without_touching_store() {
    let ctx = flaky_ctx();
    let group = ItemGroup::new("never stored", None);
    let calls_before = ctx.store().calls.get();

    assert!(!ctx.groups().batch_insert(&[], &group));
    assert_eq!(ctx.store().calls.get(), calls_before);
}

#[test]
fn batch_insert_tags_children_with_group() {
    let ctx = memory_ctx();
    let group = ctx.groups().create_group("laps", None);

    assert!(ctx
        .groups()
        .batch_insert(&payloads(&["one", "two", "three"]), &group));

    let children = ctx.groups().resolve_children(group.id).unwrap();
    assert_eq!(children.len(), 3);
    assert!(children.iter().all(|child| child.item_group_id() == group.id));
    let bodies: Vec<&[u8]> = children.iter().map(|child| child.payload()).collect();
    assert_eq!(bodies, vec![&b"one"[..], &b"two"[..], &b"three"[..]]);
}

#[test]
fn batch_insert_failure_returns_false() {
    let (messages, sink) = message_log();
    let ctx = flaky_ctx().with_log_sink(sink);
    let group = ctx.groups().create_group("broken", None);
    ctx.store().fail_batch.set(true);

    assert!(!ctx.groups().batch_insert(&payloads(&["a", "b"]), &group));
    assert_eq!(count_rows(ctx.store().inner.connection(), "grouped_items"), 0);
    assert!(messages.borrow()[0].contains("batch insert failed"));
}

#[test]
fn batch_insert_save_failure_returns_false() {
    let ctx = flaky_ctx();
    let group = ctx.groups().create_group("unsaved children", None);
    ctx.store().fail_save.set(true);

    assert!(!ctx.groups().batch_insert(&payloads(&["a"]), &group));
}

#[test]
fn resolving_empty_group_yields_no_children() {
    let ctx = memory_ctx();
    let group = ctx.groups().create_group("empty", None);

    assert!(ctx.groups().resolve_children(group.id).unwrap().is_empty());

    let mut entry = ExportableEntry::group(group);
    ctx.groups().resolve(&mut entry).unwrap();
    assert_eq!(entry.children(), Some(&[][..]));
}

#[test]
fn resolve_is_idempotent() {
    let ctx = memory_ctx();
    let group = ctx.groups().create_group("twice", None);
    assert!(ctx.groups().batch_insert(&payloads(&["x", "y"]), &group));

    let mut entry = ExportableEntry::group(group);
    ctx.groups().resolve(&mut entry).unwrap();
    let first = entry.clone();
    ctx.groups().resolve(&mut entry).unwrap();

    assert_eq!(entry, first);
    assert_eq!(entry.children().map(<[_]>::len), Some(2));
}

#[test]
fn resolve_leaves_single_entries_untouched() {
    let ctx = memory_ctx();
    let item = ctx.items().create_item("single").unwrap();
    let mut entry = ExportableEntry::Single(item.clone());

    ctx.groups().resolve(&mut entry).unwrap();

    assert_eq!(entry, ExportableEntry::Single(item));
}

#[test]
fn delete_group_removes_group_and_children() {
    let ctx = memory_ctx();
    let doomed = ctx.groups().create_group("doomed", None);
    let kept = ctx.groups().create_group("kept", None);
    assert!(ctx.groups().batch_insert(&payloads(&["a", "b", "c"]), &doomed));
    assert!(ctx.groups().batch_insert(&payloads(&["d"]), &kept));

    ctx.groups().delete_group(&doomed).unwrap();

    let conn = ctx.store().connection();
    assert_eq!(count_rows(conn, "item_groups"), 1);
    assert_eq!(count_rows(conn, "grouped_items"), 1);
    let orphans: i64 = conn
        .query_row(
            "SELECT COUNT(*) FROM grouped_items WHERE item_group_id = ?1;",
            [doomed.id.to_string()],
            |row| row.get(0),
        )
        .unwrap();
    assert_eq!(orphans, 0);
}

#[test]
fn delete_group_aborts_when_children_cannot_be_resolved() {
    let ctx = flaky_ctx();
    let group = ctx.groups().create_group("stuck", None);
    assert!(ctx.groups().batch_insert(&payloads(&["a"]), &group));
    ctx.store().fail_fetch_children.set(true);

    assert!(matches!(
        ctx.groups().delete_group(&group),
        Err(ExportKitError::FetchFailed { .. })
    ));

    let conn = ctx.store().inner.connection();
    assert_eq!(count_rows(conn, "item_groups"), 1);
    assert_eq!(count_rows(conn, "grouped_items"), 1);
}

#[test]
fn delete_group_save_failure_is_reported() {
    let ctx = flaky_ctx();
    let group = ctx.groups().create_group("pending", None);
    ctx.store().fail_save.set(true);

    assert!(matches!(
        ctx.groups().delete_group(&group),
        Err(ExportKitError::SaveFailed { .. })
    ));

    ctx.store().fail_save.set(false);
    ctx.store().discard().unwrap();
    assert_eq!(count_rows(ctx.store().inner.connection(), "item_groups"), 1);
}

#[test]
fn malformed_children_are_skipped_and_group_still_deletes() {
    let ctx = memory_ctx();
    let group = ctx.groups().create_group("mixed", None);
    assert!(ctx.groups().batch_insert(&payloads(&["ok"]), &group));
    ctx.store()
        .connection()
        .execute(
            "INSERT INTO grouped_items (id, item_group_id, payload) VALUES ('junk', ?1, X'00');",
            [group.id.to_string()],
        )
        .unwrap();

    let children = ctx.groups().resolve_children(group.id).unwrap();
    assert_eq!(children.len(), 1);
    assert_eq!(children[0].payload(), b"ok");

    ctx.groups().delete_group(&group).unwrap();
    assert_eq!(count_rows(ctx.store().connection(), "item_groups"), 0);
}
