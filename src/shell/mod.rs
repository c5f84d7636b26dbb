// Composition root for the command write path.
//
// Responsibilities
// - Read config from environment.
// - Initialize tracing once.
// - Instantiate concrete infrastructure implementations and wire them into
//   Commands.
// - Spawn background workers (the audit debouncer's interval worker).

use std::sync::Arc;
use std::time::Duration;

use tracing_subscriber::{EnvFilter, fmt};

use crate::adapters::debouncer::{Debouncer, DebouncerConfig};
use crate::adapters::in_memory::in_memory_bulk_sink::InMemoryBulkSink;
use crate::adapters::in_memory::in_memory_event_store::InMemoryEventStore;
use crate::application::commands::{AuditRecord, Commands, CommandsConfig};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppConfig {
    pub protected_org_ids: Vec<String>,
    pub audit_min_frequency: Duration,
    pub audit_max_bulk_size: usize,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            protected_org_ids: Vec::new(),
            audit_min_frequency: Duration::from_secs(5),
            audit_max_bulk_size: 100,
        }
    }
}

impl AppConfig {
    /// PROTECTED_ORG_IDS is a comma separated id list; AUDIT_MIN_FREQUENCY_MS
    /// and AUDIT_MAX_BULK_SIZE override the audit flush thresholds.
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            protected_org_ids: std::env::var("PROTECTED_ORG_IDS")
                .map(|raw| parse_id_list(&raw))
                .unwrap_or_default(),
            audit_min_frequency: std::env::var("AUDIT_MIN_FREQUENCY_MS")
                .ok()
                .and_then(|raw| raw.parse::<u64>().ok())
                .map(Duration::from_millis)
                .unwrap_or(defaults.audit_min_frequency),
            audit_max_bulk_size: std::env::var("AUDIT_MAX_BULK_SIZE")
                .ok()
                .and_then(|raw| raw.parse().ok())
                .unwrap_or(defaults.audit_max_bulk_size),
        }
    }
}

fn parse_id_list(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|id| !id.is_empty())
        .map(str::to_string)
        .collect()
}

pub fn init_tracing() {
    fmt().with_env_filter(EnvFilter::from_default_env()).init();
}

/// Wire the in-memory infrastructure into a ready Commands instance.
/// Must run inside a tokio runtime: the audit debouncer spawns its worker.
pub fn build_commands(config: &AppConfig) -> Commands {
    let event_store = Arc::new(InMemoryEventStore::new());
    let sink = Arc::new(InMemoryBulkSink::<AuditRecord>::new());
    let audit = Arc::new(Debouncer::new(
        DebouncerConfig {
            min_frequency: config.audit_min_frequency,
            max_bulk_size: config.audit_max_bulk_size,
        },
        sink,
    ));
    tracing::info!(
        protected = config.protected_org_ids.len(),
        "wiring command write path"
    );
    Commands::new(
        event_store,
        CommandsConfig {
            protected_org_ids: config.protected_org_ids.iter().cloned().collect(),
        },
    )
    .with_audit(audit)
}
