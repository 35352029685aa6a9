use std::sync::Arc;

use tracing::debug;

use crate::{
    activator::{Activator, DelegateActivator, InstanceActivator, OpenActivator, ReflectiveActivator},
    collector::{ArgumentCollector, DefaultArgumentCollector},
    component::Component,
    config::Config,
    container::Container,
    descriptor::{Resolvable, Type},
    errors::{InstantiatorResult, RegistrationErrorKind},
    generic::{Closings, OpenComponent, OpenContract},
    lifecycle::LifecycleKind,
    registration::{conform, Identity, RegistrationItem},
    registry::RegistrationStore,
    selector::{ConstructorSelector, GreediestConstructorSelector},
    source::{default_sources, RegistrationSource},
};

struct Pending {
    contract: Type,
    implementation: Option<Type>,
    activator: Box<dyn Activator>,
    config: Config,
}

/// Collects registrations and compiles them into a [`Container`].
///
/// Registration calls check the contract against the implementation immediately and fail
/// with [`RegistrationErrorKind`] instead of deferring the error to resolution.
pub struct ContainerBuilder {
    registrations: Vec<Pending>,
    default_lifecycle: LifecycleKind,
    selector: Option<Arc<dyn ConstructorSelector>>,
    collector: Option<Arc<dyn ArgumentCollector>>,
    group_filter: Option<Box<dyn Fn(&str) -> bool + Send + Sync>>,
    sources: Vec<Box<dyn RegistrationSource>>,
}

impl Default for ContainerBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl ContainerBuilder {
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self {
            registrations: Vec::new(),
            default_lifecycle: LifecycleKind::default(),
            selector: None,
            collector: None,
            group_filter: None,
            sources: Vec::new(),
        }
    }

    /// Registers the component `T` as the contract `C`
    pub fn register<C, T>(self) -> Result<Self, RegistrationErrorKind>
    where
        C: Resolvable + ?Sized,
        T: Component,
    {
        self.register_with_config::<C, T>(Config::new())
    }

    pub fn register_with_config<C, T>(self, config: Config) -> Result<Self, RegistrationErrorKind>
    where
        C: Resolvable + ?Sized,
        T: Component,
    {
        self.register_type(C::descriptor(), Type::component::<T>(), config)
    }

    /// Registers the component `T` as itself
    pub fn register_self<T: Component>(self) -> Result<Self, RegistrationErrorKind> {
        self.register_self_with_config::<T>(Config::new())
    }

    pub fn register_self_with_config<T: Component>(self, config: Config) -> Result<Self, RegistrationErrorKind> {
        self.register_type_self(Type::component::<T>(), config)
    }

    /// Registers a reflective activation of `implementation` for `contract`
    pub fn register_type(mut self, contract: Type, implementation: Type, config: Config) -> Result<Self, RegistrationErrorKind> {
        if contract.is_definition() {
            return Err(RegistrationErrorKind::InvalidRegistration {
                implementation: *implementation.info(),
            });
        }
        conform(&contract, Some(&implementation))?;
        let Some(activator) = ReflectiveActivator::for_type(&implementation) else {
            return Err(RegistrationErrorKind::InvalidRegistration {
                implementation: *implementation.info(),
            });
        };

        self.push(contract, Some(implementation), Box::new(activator), config);
        Ok(self)
    }

    /// Registers `implementation` as itself, failing for anything but concrete components
    pub fn register_type_self(self, implementation: Type, config: Config) -> Result<Self, RegistrationErrorKind> {
        if !implementation.is_concrete() {
            return Err(RegistrationErrorKind::InvalidRegistration {
                implementation: *implementation.info(),
            });
        }
        self.register_type(implementation.clone(), implementation, config)
    }

    /// Registers a pre-built instance of the contract `C`
    #[must_use]
    pub fn register_instance<C: Resolvable + ?Sized>(self, instance: Arc<C>) -> Self {
        self.register_instance_with_config(instance, Config::new())
    }

    #[must_use]
    pub fn register_instance_with_config<C: Resolvable + ?Sized>(mut self, instance: Arc<C>, config: Config) -> Self {
        self.push(C::descriptor(), None, Box::new(InstanceActivator::new(instance)), config);
        self
    }

    /// Registers a factory function called with the container to provide the contract `C`
    #[must_use]
    pub fn register_factory<C, F>(self, factory: F) -> Self
    where
        C: Resolvable + ?Sized,
        F: Fn(&Container) -> InstantiatorResult<Arc<C>> + Clone + Send + Sync + 'static,
    {
        self.register_factory_with_config(factory, Config::new())
    }

    #[must_use]
    pub fn register_factory_with_config<C, F>(mut self, factory: F, config: Config) -> Self
    where
        C: Resolvable + ?Sized,
        F: Fn(&Container) -> InstantiatorResult<Arc<C>> + Clone + Send + Sync + 'static,
    {
        self.push(C::descriptor(), None, Box::new(DelegateActivator::new(factory)), config);
        self
    }

    /// Registers the open generic implementation `F` of the open contract `D`, closable over
    /// every type argument in the list `L`.
    ///
    /// ```text
    /// builder.register_open::<RepositoryDefinition, MemoryRepositoryDefinition, HList![User, Order]>()?
    /// ```
    pub fn register_open<D, F, L>(self) -> Result<Self, RegistrationErrorKind>
    where
        D: OpenContract,
        F: OpenComponent<D>,
        L: Closings,
    {
        self.register_open_with_config::<D, F, L>(Config::new())
    }

    pub fn register_open_with_config<D, F, L>(mut self, config: Config) -> Result<Self, RegistrationErrorKind>
    where
        D: OpenContract,
        F: OpenComponent<D>,
        L: Closings,
    {
        let mut closings = Vec::new();
        L::close::<D, F>(&mut closings);
        for closing in &closings {
            conform(closing.contract(), Some(closing.implementation()))?;
        }

        self.push(
            Type::definition::<D>(),
            Some(Type::definition::<F>()),
            Box::new(OpenActivator::new(closings)),
            config,
        );
        Ok(self)
    }

    /// Lifecycle of registrations whose config doesn't set one
    #[inline]
    #[must_use]
    pub fn default_lifecycle(self, lifecycle: LifecycleKind) -> Self {
        Self {
            default_lifecycle: lifecycle,
            ..self
        }
    }

    #[inline]
    #[must_use]
    pub fn with_constructor_selector(self, selector: Arc<dyn ConstructorSelector>) -> Self {
        Self {
            selector: Some(selector),
            ..self
        }
    }

    #[inline]
    #[must_use]
    pub fn with_argument_collector(self, collector: Arc<dyn ArgumentCollector>) -> Self {
        Self {
            collector: Some(collector),
            ..self
        }
    }

    /// Keeps only grouped registrations whose group matches the filter, ungrouped ones are always kept
    #[inline]
    #[must_use]
    pub fn filter_groups(self, filter: impl Fn(&str) -> bool + Send + Sync + 'static) -> Self {
        Self {
            group_filter: Some(Box::new(filter)),
            ..self
        }
    }

    /// Appends a source consulted after the built-in ones
    #[inline]
    #[must_use]
    pub fn with_source(mut self, source: impl RegistrationSource + 'static) -> Self {
        self.sources.push(Box::new(source));
        self
    }

    #[must_use]
    pub fn build(self) -> Container {
        let Self {
            registrations,
            default_lifecycle,
            selector,
            collector,
            group_filter,
            sources,
        } = self;

        let mut chain = default_sources();
        chain.extend(sources);
        let store = RegistrationStore::new(chain);

        for Pending {
            contract,
            implementation,
            activator,
            config,
        } in registrations
        {
            if let (Some(group), Some(filter)) = (config.group.as_deref(), group_filter.as_ref()) {
                if !filter(group) {
                    debug!(contract = contract.name(), group, "Filtered out");
                    continue;
                }
            }
            let lifecycle = config.lifecycle.as_ref().unwrap_or(&default_lifecycle).strategy();
            let item = RegistrationItem::new(contract, config.name.as_deref(), implementation, activator, lifecycle)
                .with_group(config.group);
            store.add(item);
        }

        bootstrap::<dyn ConstructorSelector>(&store, selector, || Arc::new(GreediestConstructorSelector));
        bootstrap::<dyn ArgumentCollector>(&store, collector, || Arc::new(DefaultArgumentCollector));

        debug!(registrations = store.len(), "Container built");
        Container::new(store)
    }

    fn push(&mut self, contract: Type, implementation: Option<Type>, activator: Box<dyn Activator>, config: Config) {
        debug!(contract = contract.name(), "Registered");
        self.registrations.push(Pending {
            contract,
            implementation,
            activator,
            config,
        });
    }
}

/// Registers an infrastructure singleton, the supplied one or the default if nothing is registered
fn bootstrap<C: Resolvable + ?Sized>(store: &RegistrationStore, supplied: Option<Arc<C>>, default: impl FnOnce() -> Arc<C>) {
    let instance = match supplied {
        Some(instance) => instance,
        None if store.has_registration(&Identity::new(*C::descriptor().info(), None)) => return,
        None => default(),
    };
    store.add(RegistrationItem::new(
        C::descriptor(),
        None,
        None,
        Box::new(InstanceActivator::new(instance)),
        LifecycleKind::Singleton.strategy(),
    ));
}
