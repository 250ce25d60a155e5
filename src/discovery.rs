//! Auto-discovery of declared bundle sources.
//!
//! Discovery walks the statically-declared source table once at startup,
//! groups declarations by priority, and registers them in ascending
//! priority order. Lower numbers register first; because a loaded
//! (source, locale) pair is never overwritten, the lowest-numbered source
//! deterministically wins any key declared by several sources.
//!
//! Each successful registration is recorded as an [`Association`], which
//! deduplicates repeat discovery of the same source and lets the registry
//! replay auto-registrations after a cache clear.

use std::collections::BTreeMap;

use serde::Serialize;
use tracing::{debug, info};

use crate::{error::Error, types::SourceDecl};

/// The mechanism through which a source was discovered.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SourceKind {
    /// Declared in a static source table handed to the registry builder.
    Declared,
}

/// A record that a discovered source has been registered.
///
/// Associations live for the registry's lifetime: a plain cache clear
/// leaves them in place (they drive the replay), and only
/// `forget_associations` discards them.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Association {
    pub kind: SourceKind,
    pub source: String,
    pub root: String,
    pub priority: i32,
}

/// Progress of a discovery scan.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ScanPhase {
    #[default]
    Idle,
    Scanning,
    Done,
    Failed,
}

/// The association table.
#[derive(Debug, Default)]
pub(crate) struct Ledger {
    associations: Vec<Association>,
    phase: ScanPhase,
}

impl Ledger {
    pub(crate) fn new() -> Self {
        Ledger {
            associations: Vec::new(),
            phase: ScanPhase::Idle,
        }
    }

    pub(crate) fn contains(&self, kind: SourceKind, source: &str) -> bool {
        self.associations
            .iter()
            .any(|a| a.kind == kind && a.source == source)
    }

    pub(crate) fn record(&mut self, association: Association) {
        if !self.contains(association.kind, &association.source) {
            self.associations.push(association);
        }
    }

    /// Associations in replay order: ascending priority, stable within a
    /// priority level.
    pub(crate) fn replay_order(&self) -> Vec<Association> {
        let mut ordered = self.associations.clone();
        ordered.sort_by_key(|a| a.priority);
        ordered
    }

    pub(crate) fn associations(&self) -> &[Association] {
        &self.associations
    }

    pub(crate) fn phase(&self) -> ScanPhase {
        self.phase
    }

    pub(crate) fn forget(&mut self) {
        self.associations.clear();
        self.phase = ScanPhase::Idle;
    }

    /// Runs a discovery scan over `declared`, registering every
    /// not-yet-associated declaration through `register` in ascending
    /// priority order.
    ///
    /// A registration failure aborts the scan; registrations already
    /// performed stay in effect (no rollback).
    pub(crate) fn scan(
        &mut self,
        declared: &[SourceDecl],
        mut register: impl FnMut(&SourceDecl) -> Result<(), Error>,
    ) -> Result<(), Error> {
        self.phase = ScanPhase::Scanning;
        debug!(sources = declared.len(), "discovery scan started");

        let mut by_priority: BTreeMap<i32, Vec<&SourceDecl>> = BTreeMap::new();
        for decl in declared {
            by_priority.entry(decl.priority).or_default().push(decl);
        }

        for (priority, decls) in by_priority {
            for decl in decls {
                if self.contains(SourceKind::Declared, decl.id) {
                    debug!(source = decl.id, "discovery: already associated, skipping");
                    continue;
                }
                if let Err(error) = register(decl) {
                    self.phase = ScanPhase::Failed;
                    return Err(error);
                }
                self.record(Association {
                    kind: SourceKind::Declared,
                    source: decl.id.to_string(),
                    root: decl.root.to_string(),
                    priority,
                });
                info!(source = decl.id, priority, "discovery: source registered");
            }
        }

        self.phase = ScanPhase::Done;
        debug!("discovery scan finished");
        Ok(())
    }
}
