use core::{
    fmt::{self, Debug, Formatter},
    marker::PhantomData,
    sync::atomic::{AtomicU64, Ordering},
};
use std::{cell::RefCell, collections::HashMap, sync::Arc};

use parking_lot::Mutex;
use tracing::debug;

use crate::instance::Instance;

/// Ambient scope identifier, such as one per request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ScopeToken(u64);

impl ScopeToken {
    #[must_use]
    pub fn next() -> Self {
        static NEXT: AtomicU64 = AtomicU64::new(1);
        Self(NEXT.fetch_add(1, Ordering::Relaxed))
    }
}

/// Slot of one scoped registration inside a scope.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ScopeKey(u64);

impl ScopeKey {
    #[must_use]
    pub fn next() -> Self {
        static NEXT: AtomicU64 = AtomicU64::new(1);
        Self(NEXT.fetch_add(1, Ordering::Relaxed))
    }
}

/// External cache of scoped instances, supplied by the host integration.
///
/// Implementations must be thread-safe for their own key space.
pub trait ScopeAccessor: Send + Sync {
    /// Scope of the calling context, `None` outside of any scope
    fn current_scope(&self) -> Option<ScopeToken>;

    fn get(&self, scope: ScopeToken, key: ScopeKey) -> Option<Instance>;

    /// Stores the instance unless the slot is already taken and returns the stored one
    fn insert(&self, scope: ScopeToken, key: ScopeKey, instance: Instance) -> Instance;
}

thread_local! {
    static ACTIVE_SCOPES: RefCell<Vec<(usize, ScopeToken)>> = const { RefCell::new(Vec::new()) };
}

/// In-memory [`ScopeAccessor`] with thread-bound scopes.
///
/// A scope is active on the thread that began it until its guard is dropped, nested scopes
/// shadow outer ones. Dropping the guard evicts every instance cached for the scope.
#[derive(Default)]
pub struct ScopeStore {
    scopes: Mutex<HashMap<ScopeToken, HashMap<ScopeKey, Instance>>>,
}

impl ScopeStore {
    #[inline]
    #[must_use]
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    #[must_use]
    pub fn begin(self: &Arc<Self>) -> ScopeGuard {
        let token = ScopeToken::next();
        ACTIVE_SCOPES.with(|scopes| scopes.borrow_mut().push((self.address(), token)));
        debug!(?token, "Scope began");

        ScopeGuard {
            store: self.clone(),
            token,
            _not_send: PhantomData,
        }
    }

    /// Number of scopes with at least one cached instance
    #[must_use]
    pub fn len(&self) -> usize {
        self.scopes.lock().len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn address(&self) -> usize {
        (self as *const Self) as usize
    }

    fn end(&self, token: ScopeToken) {
        let address = self.address();
        ACTIVE_SCOPES.with(|scopes| {
            let mut scopes = scopes.borrow_mut();
            if let Some(position) = scopes.iter().rposition(|active| *active == (address, token)) {
                scopes.remove(position);
            }
        });
        let evicted = self.scopes.lock().remove(&token).map_or(0, |instances| instances.len());
        debug!(?token, evicted, "Scope ended");
    }
}

impl ScopeAccessor for ScopeStore {
    fn current_scope(&self) -> Option<ScopeToken> {
        let address = self.address();
        ACTIVE_SCOPES.with(|scopes| {
            scopes
                .borrow()
                .iter()
                .rev()
                .find(|(store, _)| *store == address)
                .map(|(_, token)| *token)
        })
    }

    fn get(&self, scope: ScopeToken, key: ScopeKey) -> Option<Instance> {
        self.scopes.lock().get(&scope).and_then(|instances| instances.get(&key)).cloned()
    }

    fn insert(&self, scope: ScopeToken, key: ScopeKey, instance: Instance) -> Instance {
        self.scopes.lock().entry(scope).or_default().entry(key).or_insert(instance).clone()
    }
}

impl Debug for ScopeStore {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.debug_struct("ScopeStore").field("scopes", &self.len()).finish()
    }
}

/// Active scope of a [`ScopeStore`], ended on drop.
///
/// The guard is bound to the thread that began the scope.
pub struct ScopeGuard {
    store: Arc<ScopeStore>,
    token: ScopeToken,
    _not_send: PhantomData<*const ()>,
}

impl ScopeGuard {
    #[inline]
    #[must_use]
    pub const fn token(&self) -> ScopeToken {
        self.token
    }
}

impl Drop for ScopeGuard {
    fn drop(&mut self) {
        self.store.end(self.token);
    }
}

impl Debug for ScopeGuard {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.debug_struct("ScopeGuard").field("token", &self.token).finish()
    }
}
