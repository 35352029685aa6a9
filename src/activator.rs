use core::fmt::{self, Debug, Formatter};
use std::sync::{Arc, OnceLock};

use tracing::{debug, trace};

use crate::{
    any::TypeInfo,
    collector::{ArgumentCollector, DefaultArgumentCollector},
    component::ComponentInfo,
    container::Container,
    context::ResolutionContext,
    descriptor::Type,
    errors::{FailureReason, InstantiateErrorKind, InstantiatorErrorKind, InstantiatorResult, ResolveErrorKind},
    generic::Closing,
    instance::Instance,
    selector::{ConstructorSelector, GreediestConstructorSelector},
    service::{service_fn, BoxCloneService, Service as _},
};

/// Strategy that produces an instance for a registration.
pub trait Activator: Send + Sync {
    fn activate(&self, context: &ResolutionContext) -> Result<Instance, ResolveErrorKind>;

    /// Closed forms an open registration can be turned into
    fn closings(&self) -> &[Closing] {
        &[]
    }
}

type Infrastructure = (Arc<dyn ConstructorSelector>, Arc<dyn ArgumentCollector>);

/// Builds the implementation type through its declared constructors.
///
/// The selector and the collector are taken from the container on first activation and reused
/// afterwards, together with the component declaration.
pub struct ReflectiveActivator {
    describe: fn() -> ComponentInfo,
    component: OnceLock<ComponentInfo>,
    infrastructure: OnceLock<Infrastructure>,
}

impl ReflectiveActivator {
    #[inline]
    #[must_use]
    pub const fn new(describe: fn() -> ComponentInfo) -> Self {
        Self {
            describe,
            component: OnceLock::new(),
            infrastructure: OnceLock::new(),
        }
    }

    /// Returns `None` if `implementation` isn't a concrete component
    #[must_use]
    pub fn for_type(implementation: &Type) -> Option<Self> {
        implementation.describer().map(Self::new)
    }

    /// Uses the given selector and collector instead of the container ones
    #[must_use]
    pub fn with_infrastructure(self, selector: Arc<dyn ConstructorSelector>, collector: Arc<dyn ArgumentCollector>) -> Self {
        let infrastructure = OnceLock::new();
        let _ = infrastructure.set((selector, collector));
        Self { infrastructure, ..self }
    }

    fn component(&self) -> &ComponentInfo {
        self.component.get_or_init(self.describe)
    }

    /// Infrastructure contracts themselves are built with the defaults, resolving them from the
    /// container would re-enter their own registration.
    fn infrastructure(&self, context: &ResolutionContext) -> Result<&Infrastructure, ResolveErrorKind> {
        if let Some(infrastructure) = self.infrastructure.get() {
            return Ok(infrastructure);
        }
        let contract = context.contract().info();
        let infrastructure: Infrastructure = if *contract == TypeInfo::of::<dyn ConstructorSelector>()
            || *contract == TypeInfo::of::<dyn ArgumentCollector>()
        {
            debug!(contract = contract.name, "Building infrastructure with defaults");
            (Arc::new(GreediestConstructorSelector), Arc::new(DefaultArgumentCollector))
        } else {
            let container = context.container();
            (
                container.resolve::<dyn ConstructorSelector>()?,
                container.resolve::<dyn ArgumentCollector>()?,
            )
        };
        Ok(self.infrastructure.get_or_init(|| infrastructure))
    }
}

impl Activator for ReflectiveActivator {
    fn activate(&self, context: &ResolutionContext) -> Result<Instance, ResolveErrorKind> {
        let component = self.component();
        let (selector, collector) = self.infrastructure(context)?;

        let constructor = selector.select(component.constructors(), context)?;
        let resolve = |parameter: &Type| context.resolve(parameter);
        let arguments = collector.collect(&resolve, constructor.parameters(), context)?;
        if arguments.len() != constructor.arity() {
            return Err(ResolveErrorKind::ResolutionFailed {
                implementation: *component.implementation(),
                reason: FailureReason::ArgumentCountMismatch {
                    expected: constructor.arity(),
                    actual: arguments.len(),
                },
            });
        }
        trace!(arguments = arguments.len(), "Arguments collected");

        let instance = constructor.invoke(arguments)?;
        debug!(implementation = component.implementation().name, "Constructed");

        component.cast(&instance, context.contract().info())
    }
}

impl Debug for ReflectiveActivator {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.debug_struct("ReflectiveActivator")
            .field("component", &self.component.get())
            .finish_non_exhaustive()
    }
}

pub(crate) type BoxedCloneDelegate = BoxCloneService<Container, Instance, ResolveErrorKind>;

/// Calls a factory function with the container.
#[derive(Clone)]
pub struct DelegateActivator {
    factory: BoxedCloneDelegate,
}

impl DelegateActivator {
    /// Wraps a user factory that provides the contract `C`
    #[must_use]
    pub fn new<C, F>(factory: F) -> Self
    where
        C: ?Sized + Send + Sync + 'static,
        F: Fn(&Container) -> InstantiatorResult<Arc<C>> + Clone + Send + Sync + 'static,
    {
        Self::from_fn(move |container| match factory(container) {
            Ok(provides) => Ok(Instance::new(provides)),
            Err(InstantiateErrorKind::Resolve(err)) => Err(*err),
            Err(err) => Err(ResolveErrorKind::Instantiator(InstantiatorErrorKind::Factory(err))),
        })
    }

    /// Wraps an already type-erased factory
    #[must_use]
    pub(crate) fn from_fn<F>(factory: F) -> Self
    where
        F: Fn(&Container) -> Result<Instance, ResolveErrorKind> + Clone + Send + Sync + 'static,
    {
        Self {
            factory: BoxCloneService(Box::new(service_fn(move |container: Container| factory(&container)))),
        }
    }
}

impl Activator for DelegateActivator {
    fn activate(&self, context: &ResolutionContext) -> Result<Instance, ResolveErrorKind> {
        self.factory.clone().call(context.container().clone())
    }
}

/// Always returns the same pre-built instance.
#[derive(Debug, Clone)]
pub struct InstanceActivator {
    instance: Instance,
}

impl InstanceActivator {
    #[inline]
    #[must_use]
    pub fn new<C: ?Sized + Send + Sync + 'static>(instance: Arc<C>) -> Self {
        Self {
            instance: Instance::new(instance),
        }
    }
}

impl Activator for InstanceActivator {
    #[inline]
    fn activate(&self, _context: &ResolutionContext) -> Result<Instance, ResolveErrorKind> {
        Ok(self.instance.clone())
    }
}

/// Activator of an open generic registration.
///
/// It only carries the closed forms, each request is served by a closed registration synthesized
/// from one of them.
#[derive(Debug, Clone)]
pub struct OpenActivator {
    closings: Vec<Closing>,
}

impl OpenActivator {
    #[inline]
    #[must_use]
    pub const fn new(closings: Vec<Closing>) -> Self {
        Self { closings }
    }
}

impl Activator for OpenActivator {
    fn activate(&self, context: &ResolutionContext) -> Result<Instance, ResolveErrorKind> {
        Err(ResolveErrorKind::RegistrationNotFound {
            contract: *context.contract().info(),
            name: context.name().map(ToOwned::to_owned),
        })
    }

    fn closings(&self) -> &[Closing] {
        &self.closings
    }
}
