use std::cmp::Ordering;
use std::sync::atomic::{AtomicU64, Ordering as AtomicOrdering};

use uuid::Uuid;

use tandem_types::events::Change;

/// Anything with a server-issued identity.
pub trait Record: Clone {
    fn id(&self) -> Uuid;
}

static NEXT_TEMP: AtomicU64 = AtomicU64::new(1);

/// Local identity of an entry. A temp key exists only inside one client
/// session and can never equal a server key, so "is this row mine and
/// unconfirmed?" is always decidable.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RecordKey {
    Server(Uuid),
    Temp(u64),
}

impl RecordKey {
    fn fresh_temp() -> RecordKey {
        RecordKey::Temp(NEXT_TEMP.fetch_add(1, AtomicOrdering::Relaxed))
    }

    pub fn is_temp(&self) -> bool {
        matches!(self, RecordKey::Temp(_))
    }
}

impl std::fmt::Display for RecordKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RecordKey::Server(id) => write!(f, "{id}"),
            RecordKey::Temp(n) => write!(f, "tmp-{n}"),
        }
    }
}

/// One visible row: the record plus its local identity. Views can render
/// a "sending" affordance while `key.is_temp()`.
#[derive(Debug, Clone)]
pub struct Entry<T> {
    pub key: RecordKey,
    pub record: T,
}

type Comparator<T> = Box<dyn Fn(&T, &T) -> Ordering + Send + Sync>;
type Correlation<T> = Box<dyn Fn(&T, &T) -> bool + Send + Sync>;

/// Where newly arriving records go in the visible sequence.
pub enum Placement<T> {
    /// Chat: oldest first, new records at the end.
    Append,
    /// Newest-first lists (tasks, requests, visions, finances).
    Prepend,
    /// Date-ordered views (itinerary ascending, memories descending).
    Sorted(Comparator<T>),
}

impl<T> Placement<T> {
    pub fn sorted(cmp: impl Fn(&T, &T) -> Ordering + Send + Sync + 'static) -> Self {
        Placement::Sorted(Box::new(cmp))
    }
}

/// Saved state of a record before a speculative update, for rollback.
#[derive(Debug, Clone)]
pub struct Snapshot<T> {
    key: RecordKey,
    record: T,
}

/// A speculatively removed record and where it sat, for restore.
#[derive(Debug, Clone)]
pub struct Removed<T> {
    index: usize,
    entry: Entry<T>,
}

/// An ordered collection kept consistent with the remote store: local
/// edits apply immediately, confirmed feed events reconcile against them,
/// and failed mutations roll back.
pub struct SyncedCollection<T: Record> {
    entries: Vec<Entry<T>>,
    placement: Placement<T>,
    correlate: Option<Correlation<T>>,
}

impl<T: Record> SyncedCollection<T> {
    pub fn new(placement: Placement<T>) -> Self {
        Self {
            entries: Vec::new(),
            placement,
            correlate: None,
        }
    }

    /// `correlate(temp, confirmed)` decides whether a feed insert is the
    /// confirmation of an outstanding speculative record. Matching is per
    /// record, so several speculative creates can be in flight at once
    /// without one confirmation evicting another's placeholder.
    pub fn with_correlation(
        mut self,
        correlate: impl Fn(&T, &T) -> bool + Send + Sync + 'static,
    ) -> Self {
        self.correlate = Some(Box::new(correlate));
        self
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn entries(&self) -> &[Entry<T>] {
        &self.entries
    }

    pub fn iter(&self) -> impl Iterator<Item = &T> {
        self.entries.iter().map(|e| &e.record)
    }

    pub fn get(&self, id: Uuid) -> Option<&T> {
        self.position_of(RecordKey::Server(id))
            .map(|i| &self.entries[i].record)
    }

    /// Replace contents with a freshly loaded page.
    pub fn load(&mut self, rows: Vec<T>) {
        self.entries = rows
            .into_iter()
            .map(|record| Entry {
                key: RecordKey::Server(record.id()),
                record,
            })
            .collect();
        if let Placement::Sorted(cmp) = &self.placement {
            self.entries
                .sort_by(|a, b| cmp(&a.record, &b.record));
        }
    }

    // -- Speculative create --

    /// Show the record immediately under a fresh temp key; the remote
    /// insert is issued by the caller afterwards.
    pub fn insert_speculative(&mut self, record: T) -> RecordKey {
        let key = RecordKey::fresh_temp();
        self.place(Entry { key, record });
        key
    }

    /// The remote insert succeeded: swap the placeholder for the
    /// server-confirmed record. If the feed already delivered it, the
    /// placeholder is simply dropped.
    pub fn confirm(&mut self, temp: RecordKey, confirmed: T) {
        let Some(idx) = self.position_of(temp) else {
            // Already reconciled away by the feed.
            return;
        };
        self.entries.remove(idx);
        if self.position_of(RecordKey::Server(confirmed.id())).is_none() {
            self.place(Entry {
                key: RecordKey::Server(confirmed.id()),
                record: confirmed,
            });
        }
    }

    /// The remote insert failed: drop the placeholder and hand the record
    /// back so the caller can surface the error.
    pub fn reject(&mut self, temp: RecordKey) -> Option<T> {
        let idx = self.position_of(temp)?;
        Some(self.entries.remove(idx).record)
    }

    // -- Speculative update --

    /// Apply a patch immediately; the returned snapshot restores the prior
    /// state if the remote update fails.
    pub fn update_speculative(
        &mut self,
        id: Uuid,
        patch: impl FnOnce(&mut T),
    ) -> Option<Snapshot<T>> {
        let idx = self.position_of(RecordKey::Server(id))?;
        let snapshot = Snapshot {
            key: self.entries[idx].key,
            record: self.entries[idx].record.clone(),
        };
        patch(&mut self.entries[idx].record);
        self.reposition(idx);
        Some(snapshot)
    }

    /// Undo a speculative update. If the record was deleted remotely in
    /// the meantime, the feed's word stands and nothing is restored.
    pub fn rollback(&mut self, snapshot: Snapshot<T>) {
        if let Some(idx) = self.position_of(snapshot.key) {
            self.entries[idx].record = snapshot.record;
            self.reposition(idx);
        }
    }

    // -- Speculative delete --

    /// Remove immediately; `restore` reinstates on remote failure.
    pub fn remove_speculative(&mut self, id: Uuid) -> Option<Removed<T>> {
        let index = self.position_of(RecordKey::Server(id))?;
        let entry = self.entries.remove(index);
        Some(Removed { index, entry })
    }

    /// Put a speculatively removed record back where it was.
    pub fn restore(&mut self, removed: Removed<T>) {
        let at = removed.index.min(self.entries.len());
        self.entries.insert(at, removed.entry);
    }

    // -- Feed reconciliation --

    /// Merge one confirmed remote change. Insert events are idempotent
    /// and deduplicate against at most one correlated placeholder; update
    /// and delete events resolve by server identity, last writer wins.
    pub fn apply(&mut self, change: Change<T>) {
        match change {
            Change::Inserted(record) => {
                if self.position_of(RecordKey::Server(record.id())).is_some() {
                    return;
                }
                if let Some(correlate) = &self.correlate {
                    if let Some(idx) = self
                        .entries
                        .iter()
                        .position(|e| e.key.is_temp() && correlate(&e.record, &record))
                    {
                        self.entries.remove(idx);
                    }
                }
                self.place(Entry {
                    key: RecordKey::Server(record.id()),
                    record,
                });
            }
            Change::Updated(record) => {
                // Rows outside the loaded window are ignored.
                if let Some(idx) = self.position_of(RecordKey::Server(record.id())) {
                    self.entries[idx].record = record;
                    self.reposition(idx);
                }
            }
            Change::Deleted { id } => {
                if let Some(idx) = self.position_of(RecordKey::Server(id)) {
                    self.entries.remove(idx);
                }
            }
        }
    }

    // -- Internals --

    fn position_of(&self, key: RecordKey) -> Option<usize> {
        self.entries.iter().position(|e| e.key == key)
    }

    fn place(&mut self, entry: Entry<T>) {
        match &self.placement {
            Placement::Append => self.entries.push(entry),
            Placement::Prepend => self.entries.insert(0, entry),
            Placement::Sorted(cmp) => {
                let at = self
                    .entries
                    .partition_point(|e| cmp(&e.record, &entry.record) != Ordering::Greater);
                self.entries.insert(at, entry);
            }
        }
    }

    /// After an in-place record change, a sorted collection may need to
    /// move the entry.
    fn reposition(&mut self, idx: usize) {
        if matches!(self.placement, Placement::Sorted(_)) {
            let entry = self.entries.remove(idx);
            self.place(entry);
        }
    }
}
