use core::fmt::{self, Debug, Formatter};
use std::sync::Arc;

use crate::{
    any::TypeInfo,
    dependency_resolver::DependencyResolver,
    descriptor::{Resolvable, Type},
    errors::{InstantiatorErrorKind, ResolveErrorKind},
    instance::Instance,
    instantiator::{boxed_instantiator, BoxedCloneInstantiator, Instantiator},
    service::Service as _,
};

/// Statically declared shape of a concrete type: how it is built, which contracts it satisfies
/// and which of its fields can be injected after construction.
///
/// ```text
/// impl Component for Bar {
///     fn constructors() -> Vec<Constructor> {
///         vec![
///             Constructor::new(|| Ok(Bar::default())),
///             Constructor::new(|Inject(foo): Inject<dyn Foo>| Ok(Bar::with_foo(foo))),
///         ]
///     }
///
///     fn contracts() -> Vec<Cast> {
///         casts![dyn Service]
///     }
/// }
/// ```
pub trait Component: Sized + Send + Sync + 'static {
    /// Constructors in declaration order
    fn constructors() -> Vec<Constructor>;

    fn contracts() -> Vec<Cast> {
        Vec::new()
    }

    fn properties() -> Vec<Property<Self>> {
        Vec::new()
    }
}

/// Type-erased [`Component`] declaration.
#[derive(Clone)]
pub struct ComponentInfo {
    implementation: TypeInfo,
    constructors: Vec<Constructor>,
    casts: Vec<Cast>,
}

impl ComponentInfo {
    #[must_use]
    pub fn of<T: Component>() -> Self {
        Self {
            implementation: TypeInfo::of::<T>(),
            constructors: T::constructors(),
            casts: T::contracts(),
        }
    }

    #[inline]
    #[must_use]
    pub const fn implementation(&self) -> &TypeInfo {
        &self.implementation
    }

    #[inline]
    #[must_use]
    pub fn constructors(&self) -> &[Constructor] {
        &self.constructors
    }

    /// Returns `true` if instances of the component can be provided as `contract`
    #[must_use]
    pub fn satisfies(&self, contract: &TypeInfo) -> bool {
        self.implementation == *contract || self.casts.iter().any(|cast| cast.contract == *contract)
    }

    /// Converts a freshly built instance of the component into an instance of `contract`
    pub fn cast(&self, instance: &Instance, contract: &TypeInfo) -> Result<Instance, ResolveErrorKind> {
        if self.implementation == *contract {
            return Ok(instance.clone());
        }
        match self.casts.iter().find(|cast| cast.contract == *contract) {
            Some(cast) => (cast.apply)(instance),
            None => Err(ResolveErrorKind::IncorrectType {
                expected: *contract,
                actual: instance.type_info(),
            }),
        }
    }
}

impl Debug for ComponentInfo {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.debug_struct("ComponentInfo")
            .field("implementation", &self.implementation.name)
            .field("constructors", &self.constructors)
            .field("casts", &self.casts)
            .finish()
    }
}

/// One way to build a component.
#[derive(Clone)]
pub struct Constructor {
    parameters: Vec<Type>,
    instantiator: BoxedCloneInstantiator,
}

impl Constructor {
    #[must_use]
    pub fn new<Inst, Deps>(instantiator: Inst) -> Self
    where
        Inst: Instantiator<Deps>,
        Deps: DependencyResolver,
    {
        let mut parameters = Vec::new();
        Deps::describe(&mut parameters);

        Self {
            parameters,
            instantiator: boxed_instantiator(instantiator),
        }
    }

    #[inline]
    #[must_use]
    pub fn parameters(&self) -> &[Type] {
        &self.parameters
    }

    #[inline]
    #[must_use]
    pub fn arity(&self) -> usize {
        self.parameters.len()
    }

    /// Calls the constructor with arguments collected for [`Self::parameters`].
    ///
    /// The returned instance holds the component itself, not any of its contracts.
    pub fn invoke(&self, arguments: Vec<Instance>) -> Result<Instance, ResolveErrorKind> {
        match self.instantiator.clone().call(arguments) {
            Ok(instance) => Ok(instance),
            Err(InstantiatorErrorKind::Deps(err)) => {
                Err(ResolveErrorKind::Instantiator(InstantiatorErrorKind::Deps(Box::new(err))))
            }
            Err(InstantiatorErrorKind::Factory(err)) => {
                Err(ResolveErrorKind::Instantiator(InstantiatorErrorKind::Factory(err)))
            }
        }
    }
}

impl Debug for Constructor {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.parameters.iter().map(Type::name)).finish()
    }
}

/// Conversion of a component into one of its contracts, usually built with [`crate::casts!`].
#[derive(Clone)]
pub struct Cast {
    contract: TypeInfo,
    apply: Arc<dyn Fn(&Instance) -> Result<Instance, ResolveErrorKind> + Send + Sync>,
}

impl Cast {
    #[must_use]
    pub fn new<T, C>(cast: fn(Arc<T>) -> Arc<C>) -> Self
    where
        T: Send + Sync + 'static,
        C: ?Sized + Send + Sync + 'static,
    {
        Self {
            contract: TypeInfo::of::<C>(),
            apply: Arc::new(move |instance: &Instance| -> Result<Instance, ResolveErrorKind> {
                Ok(Instance::new(cast(instance.downcast_shared::<T>()?)))
            }),
        }
    }

    #[inline]
    #[must_use]
    pub const fn contract(&self) -> &TypeInfo {
        &self.contract
    }
}

impl Debug for Cast {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.write_str(self.contract.name)
    }
}

/// Field of `T` that can be assigned from the container after construction.
pub struct Property<T> {
    name: &'static str,
    contract: Type,
    assign: Box<dyn Fn(&mut T, &Instance) -> Result<(), ResolveErrorKind> + Send + Sync>,
}

impl<T: 'static> Property<T> {
    #[must_use]
    pub fn new<C: Resolvable + ?Sized>(name: &'static str, assign: fn(&mut T, Arc<C>)) -> Self {
        Self {
            name,
            contract: C::descriptor(),
            assign: Box::new(move |target: &mut T, instance: &Instance| -> Result<(), ResolveErrorKind> {
                assign(target, instance.downcast_shared::<C>()?);
                Ok(())
            }),
        }
    }

    #[inline]
    #[must_use]
    pub const fn name(&self) -> &'static str {
        self.name
    }

    #[inline]
    #[must_use]
    pub const fn contract(&self) -> &Type {
        &self.contract
    }

    pub(crate) fn assign(&self, target: &mut T, instance: &Instance) -> Result<(), ResolveErrorKind> {
        (self.assign)(target, instance)
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::{Cast, Component, ComponentInfo, Constructor, Property};
    use crate::{any::TypeInfo, casts, component, interface, Inject, Instance, ResolveErrorKind};

    trait Greeter: Send + Sync {
        fn greet(&self) -> String;
    }

    interface!(dyn Greeter);

    trait Named: Send + Sync {}

    interface!(dyn Named);

    struct Name(&'static str);

    impl Component for Name {
        fn constructors() -> Vec<Constructor> {
            vec![Constructor::new(|| Ok(Name("world")))]
        }
    }

    component!(Name);

    #[derive(Default)]
    struct English {
        name: Option<Arc<Name>>,
    }

    impl Greeter for English {
        fn greet(&self) -> String {
            format!("hello, {}", self.name.as_ref().map_or("nobody", |name| name.0))
        }
    }

    impl Component for English {
        fn constructors() -> Vec<Constructor> {
            vec![
                Constructor::new(|| Ok(English::default())),
                Constructor::new(|Inject(name): Inject<Name>| Ok(English { name: Some(name) })),
            ]
        }

        fn contracts() -> Vec<Cast> {
            casts![dyn Greeter]
        }

        fn properties() -> Vec<Property<Self>> {
            vec![Property::new::<Name>("name", |this: &mut English, name: Arc<Name>| this.name = Some(name))]
        }
    }

    component!(English);

    #[test]
    fn test_declared_constructors() {
        let info = ComponentInfo::of::<English>();

        assert_eq!(info.constructors().len(), 2);
        assert_eq!(info.constructors()[0].arity(), 0);
        assert_eq!(info.constructors()[1].parameters()[0].info(), &TypeInfo::of::<Name>());
    }

    #[test]
    fn test_satisfies() {
        let info = ComponentInfo::of::<English>();

        assert!(info.satisfies(&TypeInfo::of::<English>()));
        assert!(info.satisfies(&TypeInfo::of::<dyn Greeter>()));
        assert!(!info.satisfies(&TypeInfo::of::<dyn Named>()));
    }

    #[test]
    fn test_invoke_and_cast() {
        let info = ComponentInfo::of::<English>();
        let name = Instance::new(Arc::new(Name("rust")));

        let instance = info.constructors()[1].invoke(vec![name]).unwrap();
        assert_eq!(instance.type_info(), TypeInfo::of::<English>());

        let greeter = info.cast(&instance, &TypeInfo::of::<dyn Greeter>()).unwrap();
        assert_eq!(greeter.downcast::<dyn Greeter>().unwrap().greet(), "hello, rust");

        assert!(matches!(
            info.cast(&instance, &TypeInfo::of::<dyn Named>()),
            Err(ResolveErrorKind::IncorrectType { .. })
        ));
    }

    #[test]
    fn test_property_assign() {
        let mut english = English::default();
        let properties = English::properties();

        assert_eq!(properties[0].name(), "name");
        properties[0].assign(&mut english, &Instance::new(Arc::new(Name("rust")))).unwrap();
        assert_eq!(english.greet(), "hello, rust");
    }
}
