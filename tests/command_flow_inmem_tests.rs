// End to end in memory tests for the command write path.
//
// Responsibilities
// - Drive whole commands against the in memory event store.
// - Cover the cross-cutting properties: idempotent no-ops, guard semantics
//   under racing removals, and audit records reaching the bulk sink.

use std::sync::Arc;
use std::time::Duration;

use identity_commands::adapters::debouncer::{Debouncer, DebouncerConfig};
use identity_commands::adapters::in_memory::in_memory_bulk_sink::InMemoryBulkSink;
use identity_commands::adapters::in_memory::in_memory_event_store::InMemoryEventStore;
use identity_commands::application::commands::{
    AuditRecord, CommandContext, Commands, CommandsConfig,
};
use identity_commands::core::eventstore::intent::{ConcurrencyGuard, PushIntent};
use identity_commands::core::eventstore::write_model::{
    Lifecycle, WriteModel, load_write_model,
};
use identity_commands::core::org::events::{OrgEvent, org_aggregate};
use identity_commands::core::org::message_text::CustomMessageText;
use identity_commands::core::org::state::OrgWriteModel;
use identity_commands::core::ports::{EventStore, EventStoreError};

fn commands_with(store: Arc<InMemoryEventStore>) -> Commands {
    Commands::new(store, CommandsConfig::default())
}

fn ctx() -> CommandContext {
    CommandContext::new("instance-1", "admin-1")
}

fn init_code_message(greeting: &str, subject: &str) -> CustomMessageText {
    CustomMessageText {
        template: "InitCode".to_string(),
        language: "en".to_string(),
        greeting: greeting.to_string(),
        subject: subject.to_string(),
        ..CustomMessageText::default()
    }
}

#[tokio::test]
async fn it_should_run_the_full_org_lifecycle() {
    let store = Arc::new(InMemoryEventStore::new());
    let commands = commands_with(store.clone());
    let ctx = ctx();

    let added = commands
        .add_org(&ctx, "org-1", "acme")
        .await
        .expect("expected add_org to succeed");
    assert_eq!(added.sequence, 1);

    let texts = commands
        .set_org_message_text(&ctx, "org-1", &init_code_message("Hello", "Your code"))
        .await
        .expect("expected the template upsert to succeed");
    assert_eq!(texts.sequence, 3);

    // Unchanged desired state: no push happens.
    let pushes_before = store.push_count();
    commands
        .set_org_message_text(&ctx, "org-1", &init_code_message("Hello", "Your code"))
        .await
        .expect("expected the no-op upsert to succeed");
    assert_eq!(store.push_count(), pushes_before);

    commands
        .remove_org_message_texts(&ctx, "org-1", "InitCode", "en")
        .await
        .expect("expected the template removal to succeed");

    let removed = commands
        .remove_org(&ctx, "org-1")
        .await
        .expect("expected remove_org to succeed");
    assert_eq!(removed.sequence, 5);

    let stream = store.stream("instance-1", "org", "org-1").await;
    let types: Vec<&str> = stream.iter().map(|e| e.event_type.as_str()).collect();
    assert_eq!(
        types,
        vec![
            "org.added",
            "org.customtext.set",
            "org.customtext.set",
            "org.customtext.template.removed",
            "org.removed",
        ]
    );
    let sequences: Vec<u64> = stream.iter().map(|e| e.sequence).collect();
    assert_eq!(sequences, vec![1, 2, 3, 4, 5]);
}

#[tokio::test]
async fn it_should_persist_at_most_one_terminal_event_for_sequential_removals() {
    let store = Arc::new(InMemoryEventStore::new());
    let commands = commands_with(store.clone());
    let ctx = ctx();

    commands
        .add_org(&ctx, "org-1", "acme")
        .await
        .expect("expected add_org to succeed");
    commands
        .remove_org(&ctx, "org-1")
        .await
        .expect("expected the first removal to succeed");
    commands
        .remove_org(&ctx, "org-1")
        .await
        .expect("expected the second removal to succeed as a no-op");

    let stream = store.stream("instance-1", "org", "org-1").await;
    let terminal = stream
        .iter()
        .filter(|e| e.event_type == "org.removed")
        .count();
    assert_eq!(terminal, 1);
}

// Two attempts both observe the pre-removal state. With the exact-match guard
// the store lets exactly one through; the loser sees a concurrency conflict.
#[tokio::test]
async fn it_should_let_exactly_one_exact_guarded_removal_through() {
    let store = Arc::new(InMemoryEventStore::new());
    let commands = commands_with(store.clone());
    let ctx = ctx();

    commands
        .add_org(&ctx, "org-1", "acme")
        .await
        .expect("expected add_org to succeed");

    let mut first = OrgWriteModel::new("instance-1", "org-1");
    load_write_model(store.as_ref(), &mut first)
        .await
        .expect("expected the first load to succeed");
    let mut second = OrgWriteModel::new("instance-1", "org-1");
    load_write_model(store.as_ref(), &mut second)
        .await
        .expect("expected the second load to succeed");
    assert_eq!(first.state, Lifecycle::Active);
    assert_eq!(second.state, Lifecycle::Active);

    let intent_for = |model: &OrgWriteModel| {
        PushIntent::new(org_aggregate("instance-1", "org-1"), "admin-1")
            .with_guard(ConcurrencyGuard::SequenceMatches(
                model.base().processed_sequence,
            ))
            .with_event(
                OrgEvent::Removed
                    .to_proposed()
                    .expect("expected a proposed event"),
            )
    };

    store
        .push(intent_for(&first))
        .await
        .expect("expected the winning push to succeed");
    let loser = store.push(intent_for(&second)).await;
    assert!(matches!(
        loser,
        Err(EventStoreError::ConcurrencyConflict { .. })
    ));

    let stream = store.stream("instance-1", "org", "org-1").await;
    let terminal = stream
        .iter()
        .filter(|e| e.event_type == "org.removed")
        .count();
    assert_eq!(terminal, 1);
}

// With the lower-bound guard both racing removals may commit; the duplicate
// terminal event must be idempotent for every reducer downstream.
#[tokio::test]
async fn it_should_fold_a_duplicate_terminal_event_idempotently() {
    let store = Arc::new(InMemoryEventStore::new());
    let commands = commands_with(store.clone());
    let ctx = ctx();

    commands
        .add_org(&ctx, "org-1", "acme")
        .await
        .expect("expected add_org to succeed");

    let observed = 1;
    for editor in ["admin-1", "admin-2"] {
        store
            .push(
                PushIntent::new(org_aggregate("instance-1", "org-1"), editor)
                    .with_guard(ConcurrencyGuard::SequenceAtLeast(observed))
                    .with_event(
                        OrgEvent::Removed
                            .to_proposed()
                            .expect("expected a proposed event"),
                    ),
            )
            .await
            .expect("expected the lower bound guard to admit the push");
    }

    let mut model = OrgWriteModel::new("instance-1", "org-1");
    load_write_model(store.as_ref(), &mut model)
        .await
        .expect("expected the reload to succeed");
    assert_eq!(model.state, Lifecycle::Removed);
    assert_eq!(model.base().processed_sequence, 3);
}

#[tokio::test]
async fn it_should_reject_protected_org_removal_without_touching_the_store() {
    let store = Arc::new(InMemoryEventStore::new());
    let commands = Commands::new(
        store.clone(),
        CommandsConfig {
            protected_org_ids: ["org-default".to_string()].into(),
        },
    );

    let result = commands.remove_org(&ctx(), "org-default").await;
    assert!(result.is_err());
    assert_eq!(store.query_count(), 0);
    assert_eq!(store.push_count(), 0);
}

#[tokio::test]
async fn it_should_ship_one_audit_record_per_persisted_event() {
    let store = Arc::new(InMemoryEventStore::new());
    let sink = Arc::new(InMemoryBulkSink::<AuditRecord>::new());
    let audit = Arc::new(Debouncer::new(
        DebouncerConfig {
            min_frequency: Duration::from_secs(60),
            max_bulk_size: 100,
        },
        sink.clone(),
    ));
    let commands = Commands::new(store.clone(), CommandsConfig::default()).with_audit(audit.clone());
    let ctx = ctx();

    commands
        .add_org(&ctx, "org-1", "acme")
        .await
        .expect("expected add_org to succeed");
    commands
        .set_org_message_text(&ctx, "org-1", &init_code_message("Hello", "Your code"))
        .await
        .expect("expected the template upsert to succeed");
    commands
        .remove_org(&ctx, "org-1")
        .await
        .expect("expected remove_org to succeed");

    // Nothing shipped yet; the drain hook flushes the buffer.
    assert!(sink.bulks().await.is_empty());
    audit.shutdown().await;

    let records: Vec<AuditRecord> = sink.bulks().await.into_iter().flatten().collect();
    assert_eq!(records.len(), 4);
    let sequences: Vec<u64> = records.iter().map(|r| r.sequence).collect();
    assert_eq!(sequences, vec![1, 2, 3, 4]);
    assert!(records.iter().all(|r| r.aggregate_id == "org-1"));
    assert!(records.iter().all(|r| r.editor == "admin-1"));
}
