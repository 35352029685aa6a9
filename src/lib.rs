#[macro_use]
pub(crate) mod macros;

pub(crate) mod activator;
pub(crate) mod any;
pub(crate) mod builder;
pub(crate) mod collector;
pub(crate) mod component;
pub(crate) mod config;
pub(crate) mod container;
pub(crate) mod context;
pub(crate) mod cycle;
pub(crate) mod dependency_resolver;
pub(crate) mod descriptor;
pub(crate) mod errors;
pub(crate) mod factory;
pub(crate) mod generic;
pub(crate) mod inject;
pub(crate) mod instance;
pub(crate) mod instantiator;
pub(crate) mod lifecycle;
pub(crate) mod registration;
pub(crate) mod registry;
pub(crate) mod scope;
pub(crate) mod selector;
pub(crate) mod service;

pub mod source;

pub use activator::{Activator, DelegateActivator, InstanceActivator, OpenActivator, ReflectiveActivator};
pub use any::TypeInfo;
pub use builder::ContainerBuilder;
pub use collector::{ArgumentCollector, DefaultArgumentCollector};
pub use component::{Cast, Component, ComponentInfo, Constructor, Property};
pub use config::Config;
pub use container::Container;
pub use context::ResolutionContext;
pub use dependency_resolver::{Arguments, DependencyResolver};
pub use descriptor::{Resolvable, Type, TypeKind};
pub use errors::{
    FailureReason, InstantiateErrorKind, InstantiatorErrorKind, InstantiatorResult, RegistrationErrorKind,
    ResolveErrorKind,
};
pub use factory::Factory;
pub use generic::{Closing, Closings, OpenComponent, OpenContract};
pub use inject::{Inject, InjectAll};
pub use instance::Instance;
pub use instantiator::Instantiator;
pub use lifecycle::{Build, Lifecycle, LifecycleKind, Scoped, Singleton, ThreadSingleton, Transient};
pub use registration::{Identity, RegistrationItem};
pub use registry::RegistrationStore;
pub use scope::{ScopeAccessor, ScopeGuard, ScopeKey, ScopeStore, ScopeToken};
pub use selector::{ConstructorSelector, GreediestConstructorSelector};

pub use frunk::HList;
