use std::{collections::BTreeMap, sync::Arc};

use parking_lot::Mutex;
use tracing::debug;

use crate::{
    any::TypeInfo,
    descriptor::Type,
    generic::Closing,
    registration::{Identity, RegistrationItem},
    source::RegistrationSource,
};

#[derive(Clone)]
struct Entry {
    sequence: u64,
    identity: Identity,
    item: Arc<RegistrationItem>,
}

/// Closed form of an open registration, indexed by the closed identity it serves.
#[derive(Debug, Clone)]
pub(crate) struct OpenClosing {
    pub(crate) definition: Identity,
    pub(crate) closing: Closing,
}

#[derive(Default)]
struct StoreInner {
    direct: BTreeMap<Identity, Entry>,
    duplicates: Vec<Entry>,
    closings: BTreeMap<Identity, OpenClosing>,
    next_sequence: u64,
}

impl StoreInner {
    fn entry(&mut self, identity: Identity, item: Arc<RegistrationItem>) -> Entry {
        let sequence = self.next_sequence;
        self.next_sequence += 1;
        Entry { sequence, identity, item }
    }

    fn index_closings(&mut self, item: &RegistrationItem) {
        let definition = item.identity();
        for closing in item.activator().closings() {
            self.closings.insert(
                Identity::new(*closing.contract().info(), definition.name()),
                OpenClosing {
                    definition: definition.clone(),
                    closing: closing.clone(),
                },
            );
        }
    }
}

/// Concurrent table of registrations keyed by [`Identity`], followed by the chain of
/// registration sources consulted on a miss.
///
/// Registering an identity twice demotes the previous item to the duplicates: single
/// resolution sees the most recent one, resolving all sees both in registration order.
pub struct RegistrationStore {
    inner: Mutex<StoreInner>,
    sources: Vec<Box<dyn RegistrationSource>>,
}

impl RegistrationStore {
    #[must_use]
    pub fn new(sources: Vec<Box<dyn RegistrationSource>>) -> Self {
        Self {
            inner: Mutex::new(StoreInner::default()),
            sources,
        }
    }

    #[must_use]
    pub fn try_get(&self, identity: &Identity) -> Option<Arc<RegistrationItem>> {
        self.inner.lock().direct.get(identity).map(|entry| entry.item.clone())
    }

    /// Adds the item under its own identity, demoting the current holder of the identity.
    ///
    /// Open closings indexed for the demoted holder are replaced by the ones of the new item.
    pub fn add(&self, item: RegistrationItem) -> Arc<RegistrationItem> {
        let identity = item.identity().clone();
        let item = Arc::new(item);

        let mut inner = self.inner.lock();
        // The new holder of the identity defines its closed forms, the demoted ones are dropped.
        // Registrations already closed from them stay committed.
        inner.closings.retain(|_, closing| closing.definition != identity);
        inner.index_closings(&item);
        let entry = inner.entry(identity.clone(), item.clone());
        if let Some(demoted) = inner.direct.insert(identity, entry) {
            debug!(identity = %demoted.identity, "Demoted to duplicates");
            inner.duplicates.push(demoted);
        }
        item
    }

    /// Adds the item under `identity` unless it's already taken and returns the item that holds it.
    ///
    /// Concurrent callers racing for the same identity all get the first inserted item.
    pub fn get_or_add(&self, identity: Identity, item: Arc<RegistrationItem>) -> Arc<RegistrationItem> {
        let mut inner = self.inner.lock();
        if let Some(entry) = inner.direct.get(&identity) {
            debug!(%identity, "Already added by another caller");
            return entry.item.clone();
        }
        inner.index_closings(&item);
        let entry = inner.entry(identity.clone(), item.clone());
        inner.direct.insert(identity, entry);
        item
    }

    /// Removes every item registered under the identity, including duplicates and the closed
    /// forms indexed for it. Returns the item that held the identity.
    pub fn remove(&self, identity: &Identity) -> Option<Arc<RegistrationItem>> {
        let mut inner = self.inner.lock();
        inner.duplicates.retain(|entry| entry.identity != *identity);
        inner.closings.retain(|_, closing| closing.definition != *identity);
        inner.direct.remove(identity).map(|entry| entry.item)
    }

    #[must_use]
    pub fn has_registration(&self, identity: &Identity) -> bool {
        self.inner.lock().direct.contains_key(identity)
    }

    #[must_use]
    pub fn has_duplicate(&self, identity: &Identity) -> bool {
        self.inner.lock().duplicates.iter().any(|entry| entry.identity == *identity)
    }

    /// Snapshot of the direct items followed by the duplicates in insertion order
    #[must_use]
    pub fn all_items(&self) -> Vec<Arc<RegistrationItem>> {
        let inner = self.inner.lock();
        inner
            .direct
            .values()
            .chain(inner.duplicates.iter())
            .map(|entry| entry.item.clone())
            .collect()
    }

    /// Items registered for `contract` under any name, in registration order
    #[must_use]
    pub fn matching(&self, contract: &TypeInfo) -> Vec<Arc<RegistrationItem>> {
        let mut entries: Vec<Entry> = {
            let inner = self.inner.lock();
            inner
                .direct
                .values()
                .chain(inner.duplicates.iter())
                .filter(|entry| entry.identity.contract() == contract)
                .cloned()
                .collect()
        };
        entries.sort_by_key(|entry| entry.sequence);

        let mut items: Vec<Arc<RegistrationItem>> = Vec::with_capacity(entries.len());
        for entry in entries {
            if !items.iter().any(|item| Arc::ptr_eq(item, &entry.item)) {
                items.push(entry.item);
            }
        }
        items
    }

    /// Number of direct and duplicate entries
    #[must_use]
    pub fn len(&self) -> usize {
        let inner = self.inner.lock();
        inner.direct.len() + inner.duplicates.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Returns `true` if a registration source claims the request
    #[must_use]
    pub fn is_supported_by_source(&self, contract: &Type, name: Option<&str>) -> bool {
        self.sources.iter().any(|source| source.supports(contract, name, self))
    }

    #[inline]
    #[must_use]
    pub fn sources(&self) -> &[Box<dyn RegistrationSource>] {
        &self.sources
    }

    #[must_use]
    pub(crate) fn closing(&self, identity: &Identity) -> Option<OpenClosing> {
        self.inner.lock().closings.get(identity).cloned()
    }
}

impl core::fmt::Debug for RegistrationStore {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        let inner = self.inner.lock();
        f.debug_struct("RegistrationStore")
            .field("direct", &inner.direct.len())
            .field("duplicates", &inner.duplicates.len())
            .field("sources", &self.sources.iter().map(|source| source.name()).collect::<Vec<_>>())
            .finish()
    }
}
