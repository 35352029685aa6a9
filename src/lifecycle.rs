use core::fmt::{self, Debug, Formatter};
use std::{
    collections::HashMap,
    sync::{Arc, OnceLock},
    thread::{self, ThreadId},
};

use parking_lot::Mutex;
use tracing::debug;

use crate::{
    context::ResolutionContext,
    errors::ResolveErrorKind,
    instance::Instance,
    scope::{ScopeAccessor, ScopeKey},
};

pub type Build<'a> = dyn FnMut() -> Result<Instance, ResolveErrorKind> + 'a;

/// Reuse policy of a registration.
pub trait Lifecycle: Send + Sync {
    /// Returns a cached instance or one produced by `build`
    fn obtain(&self, context: &ResolutionContext, build: &mut Build<'_>) -> Result<Instance, ResolveErrorKind>;

    /// New strategy of the same kind with none of the cached state
    #[must_use]
    fn renew(&self) -> Box<dyn Lifecycle>;

    fn name(&self) -> &'static str;

    /// Evicts the instance cached for `thread`, returns `true` if there was one
    fn release_thread(&self, _thread: ThreadId) -> bool {
        false
    }
}

/// Builds a new instance on every request.
#[derive(Debug, Default, Clone, Copy)]
pub struct Transient;

impl Lifecycle for Transient {
    #[inline]
    fn obtain(&self, _context: &ResolutionContext, build: &mut Build<'_>) -> Result<Instance, ResolveErrorKind> {
        build()
    }

    fn renew(&self) -> Box<dyn Lifecycle> {
        Box::new(Self)
    }

    fn name(&self) -> &'static str {
        "transient"
    }
}

/// One instance per registration, built at most once.
///
/// The build lock is held while the instance's own dependencies are resolved. Cycle detection
/// only sees the calling thread, so two threads first resolving a cyclic pair of singletons at the
/// same time block each other instead of failing with [`ResolveErrorKind::CyclicDependency`].
#[derive(Default)]
pub struct Singleton {
    instance: OnceLock<Instance>,
    lock: Mutex<()>,
}

impl Lifecycle for Singleton {
    fn obtain(&self, _context: &ResolutionContext, build: &mut Build<'_>) -> Result<Instance, ResolveErrorKind> {
        if let Some(instance) = self.instance.get() {
            return Ok(instance.clone());
        }

        let _guard = self.lock.lock();
        if let Some(instance) = self.instance.get() {
            debug!("Built by another caller");
            return Ok(instance.clone());
        }
        let instance = build()?;
        debug!("Cached");
        Ok(self.instance.get_or_init(|| instance).clone())
    }

    fn renew(&self) -> Box<dyn Lifecycle> {
        Box::<Self>::default()
    }

    fn name(&self) -> &'static str {
        "singleton"
    }
}

impl Debug for Singleton {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.debug_struct("Singleton").field("built", &self.instance.get().is_some()).finish()
    }
}

/// One instance per calling thread.
///
/// Instances are never evicted when their thread exits, hosts with unbounded thread churn should
/// call [`crate::Container::release_thread_instances`] before a thread finishes.
#[derive(Default)]
pub struct ThreadSingleton {
    instances: Mutex<HashMap<ThreadId, Instance>>,
}

impl Lifecycle for ThreadSingleton {
    fn obtain(&self, _context: &ResolutionContext, build: &mut Build<'_>) -> Result<Instance, ResolveErrorKind> {
        let thread = thread::current().id();
        if let Some(instance) = self.instances.lock().get(&thread) {
            return Ok(instance.clone());
        }
        // Only the owning thread fills its slot, so the map isn't locked while building.
        let instance = build()?;
        debug!(?thread, "Cached for thread");
        Ok(self.instances.lock().entry(thread).or_insert(instance).clone())
    }

    fn renew(&self) -> Box<dyn Lifecycle> {
        Box::<Self>::default()
    }

    fn name(&self) -> &'static str {
        "thread-singleton"
    }

    fn release_thread(&self, thread: ThreadId) -> bool {
        self.instances.lock().remove(&thread).is_some()
    }
}

impl Debug for ThreadSingleton {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.debug_struct("ThreadSingleton").field("threads", &self.instances.lock().len()).finish()
    }
}

/// One instance per ambient scope, cached by an external [`ScopeAccessor`].
pub struct Scoped {
    accessor: Arc<dyn ScopeAccessor>,
    key: ScopeKey,
}

impl Scoped {
    #[must_use]
    pub fn new(accessor: Arc<dyn ScopeAccessor>) -> Self {
        Self {
            accessor,
            key: ScopeKey::next(),
        }
    }
}

impl Lifecycle for Scoped {
    fn obtain(&self, context: &ResolutionContext, build: &mut Build<'_>) -> Result<Instance, ResolveErrorKind> {
        let Some(scope) = self.accessor.current_scope() else {
            return Err(ResolveErrorKind::NoActiveScope {
                contract: *context.contract().info(),
            });
        };
        if let Some(instance) = self.accessor.get(scope, self.key) {
            return Ok(instance);
        }
        let instance = build()?;
        debug!(?scope, "Cached for scope");
        Ok(self.accessor.insert(scope, self.key, instance))
    }

    fn renew(&self) -> Box<dyn Lifecycle> {
        Box::new(Self::new(self.accessor.clone()))
    }

    fn name(&self) -> &'static str {
        "scoped"
    }
}

impl Debug for Scoped {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.debug_struct("Scoped").field("key", &self.key).finish_non_exhaustive()
    }
}

/// Lifecycle chosen for a registration.
#[derive(Clone, Default)]
pub enum LifecycleKind {
    #[default]
    Transient,
    Singleton,
    ThreadSingleton,
    Scoped(Arc<dyn ScopeAccessor>),
}

impl LifecycleKind {
    /// Fresh strategy for one registration
    #[must_use]
    pub fn strategy(&self) -> Box<dyn Lifecycle> {
        match self {
            Self::Transient => Box::new(Transient),
            Self::Singleton => Box::<Singleton>::default(),
            Self::ThreadSingleton => Box::<ThreadSingleton>::default(),
            Self::Scoped(accessor) => Box::new(Scoped::new(accessor.clone())),
        }
    }
}

impl Debug for LifecycleKind {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            Self::Transient => f.write_str("Transient"),
            Self::Singleton => f.write_str("Singleton"),
            Self::ThreadSingleton => f.write_str("ThreadSingleton"),
            Self::Scoped(_) => f.write_str("Scoped"),
        }
    }
}
