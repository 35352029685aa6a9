use std::{sync::Arc, thread};

use tracing::{debug, debug_span};

use crate::{
    builder::ContainerBuilder,
    component::Component,
    cycle::ResolutionGuard,
    descriptor::{Resolvable, Type},
    errors::ResolveErrorKind,
    instance::Instance,
    registration::{Identity, RegistrationItem},
    registry::RegistrationStore,
};

pub(crate) struct ContainerInner {
    store: RegistrationStore,
}

/// Resolution façade over a registration store.
///
/// Cloning is cheap, clones share the store and every cached instance.
#[derive(Clone)]
pub struct Container {
    inner: Arc<ContainerInner>,
}

impl Container {
    #[inline]
    #[must_use]
    pub fn builder() -> ContainerBuilder {
        ContainerBuilder::new()
    }

    #[inline]
    #[must_use]
    pub(crate) fn new(store: RegistrationStore) -> Self {
        Self {
            inner: Arc::new(ContainerInner { store }),
        }
    }

    #[inline]
    #[must_use]
    pub(crate) const fn from_inner(inner: Arc<ContainerInner>) -> Self {
        Self { inner }
    }

    #[inline]
    #[must_use]
    pub(crate) const fn inner(&self) -> &Arc<ContainerInner> {
        &self.inner
    }

    #[inline]
    #[must_use]
    pub fn store(&self) -> &RegistrationStore {
        &self.inner.store
    }

    /// Resolves the unnamed registration of `C`.
    ///
    /// ```text
    /// let greeter = container.resolve::<dyn Greeter>()?;
    /// let greeters = container.resolve::<Vec<Arc<dyn Greeter>>>()?;
    /// let lazy = container.resolve::<Factory<dyn Greeter>>()?;
    /// ```
    pub fn resolve<C: Resolvable + ?Sized>(&self) -> Result<Arc<C>, ResolveErrorKind> {
        self.resolve_type(&C::descriptor(), None)?.downcast_shared()
    }

    pub fn resolve_named<C: Resolvable + ?Sized>(&self, name: &str) -> Result<Arc<C>, ResolveErrorKind> {
        self.resolve_type(&C::descriptor(), Some(name))?.downcast_shared()
    }

    /// Resolves every registration of `C` under any name, in registration order
    pub fn resolve_all<C: Resolvable + ?Sized>(&self) -> Result<Vec<Arc<C>>, ResolveErrorKind> {
        self.resolve_all_type(&C::descriptor())?
            .iter()
            .map(Instance::downcast_shared)
            .collect()
    }

    /// Resolves a registration by descriptor.
    ///
    /// A store miss walks the registration sources in priority order, the first one supporting the
    /// request provides the registration.
    pub fn resolve_type(&self, contract: &Type, name: Option<&str>) -> Result<Instance, ResolveErrorKind> {
        let span = debug_span!("resolve", contract = contract.name(), name = ?name);
        let _guard = span.enter();

        let identity = Identity::new(*contract.info(), name);
        let _resolution = ResolutionGuard::enter(self.key(), &identity)?;

        let item = match self.inner.store.try_get(&identity) {
            Some(item) => {
                debug!("Found in store");
                item
            }
            None => self.resolve_by_source(contract, name)?,
        };
        item.obtain(self)
    }

    pub fn resolve_all_type(&self, contract: &Type) -> Result<Vec<Instance>, ResolveErrorKind> {
        let span = debug_span!("resolve_all", contract = contract.name());
        let _guard = span.enter();

        let store = &self.inner.store;
        if !store.has_registration(&Identity::new(*contract.info(), None)) {
            if let Some(source) = store
                .sources()
                .iter()
                .find(|source| source.commits() && source.supports(contract, None, store))
            {
                debug!(source = source.name(), "Committing registration before resolving all");
                source.resolve(contract, None, self)?;
            }
        }

        let items = store.matching(contract.info());
        debug!(count = items.len(), "Found in store");
        items
            .iter()
            .map(|item| {
                let _resolution = ResolutionGuard::enter(self.key(), item.identity())?;
                item.obtain(self)
            })
            .collect()
    }

    /// Assigns every declared property of `target` whose type can be resolved and returns the
    /// number of assigned properties.
    ///
    /// Properties that can't be resolved are skipped, failures while resolving one are returned.
    pub fn inject_properties<T: Component>(&self, target: &mut T) -> Result<usize, ResolveErrorKind> {
        let span = debug_span!("inject_properties", target = core::any::type_name::<T>());
        let _guard = span.enter();

        let mut injected = 0;
        for property in T::properties() {
            if !self.can_resolve(property.contract()) {
                debug!(property = property.name(), "Skipped");
                continue;
            }
            let instance = self.resolve_type(property.contract(), None)?;
            property.assign(target, &instance)?;
            injected += 1;
        }
        Ok(injected)
    }

    /// Returns `true` if an unnamed request for `contract` has a registration or a source
    #[must_use]
    pub fn can_resolve(&self, contract: &Type) -> bool {
        let store = &self.inner.store;
        store.has_registration(&Identity::new(*contract.info(), None)) || store.is_supported_by_source(contract, None)
    }

    /// Evicts thread-singleton instances cached for the calling thread, returns how many were evicted
    pub fn release_thread_instances(&self) -> usize {
        let thread = thread::current().id();
        let released = self
            .inner
            .store
            .all_items()
            .iter()
            .filter(|item| item.lifecycle().release_thread(thread))
            .count();
        debug!(?thread, released, "Thread instances released");
        released
    }

    fn resolve_by_source(&self, contract: &Type, name: Option<&str>) -> Result<Arc<RegistrationItem>, ResolveErrorKind> {
        let store = &self.inner.store;
        match store.sources().iter().find(|source| source.supports(contract, name, store)) {
            Some(source) => {
                debug!(source = source.name(), "Provided by source");
                source.resolve(contract, name, self)
            }
            None => {
                debug!("Registration not found");
                Err(ResolveErrorKind::RegistrationNotFound {
                    contract: *contract.info(),
                    name: name.map(ToOwned::to_owned),
                })
            }
        }
    }

    fn key(&self) -> usize {
        Arc::as_ptr(&self.inner) as usize
    }
}

impl core::fmt::Debug for Container {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("Container").field("store", &self.inner.store).finish()
    }
}
