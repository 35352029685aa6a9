use core::fmt::{self, Debug, Display, Formatter};

use crate::{
    activator::Activator,
    any::TypeInfo,
    container::Container,
    context::ResolutionContext,
    descriptor::Type,
    errors::{RegistrationErrorKind, ResolveErrorKind},
    instance::Instance,
    lifecycle::Lifecycle,
};

/// Key of the registration store: a contract and an optional name.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord)]
pub struct Identity {
    contract: TypeInfo,
    name: Option<String>,
}

impl Identity {
    #[inline]
    #[must_use]
    pub fn new(contract: TypeInfo, name: Option<&str>) -> Self {
        Self {
            contract,
            name: name.map(ToOwned::to_owned),
        }
    }

    #[inline]
    #[must_use]
    pub const fn contract(&self) -> &TypeInfo {
        &self.contract
    }

    #[inline]
    #[must_use]
    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }
}

impl Display for Identity {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match &self.name {
            Some(name) => write!(f, "{} ({name})", self.contract.short_name()),
            None => f.write_str(self.contract.short_name()),
        }
    }
}

/// How a contract is satisfied: the activator producing instances and the lifecycle reusing them.
pub struct RegistrationItem {
    identity: Identity,
    contract: Type,
    implementation: Option<Type>,
    activator: Box<dyn Activator>,
    lifecycle: Box<dyn Lifecycle>,
    group: Option<String>,
}

impl RegistrationItem {
    #[must_use]
    pub fn new(
        contract: Type,
        name: Option<&str>,
        implementation: Option<Type>,
        activator: Box<dyn Activator>,
        lifecycle: Box<dyn Lifecycle>,
    ) -> Self {
        Self {
            identity: Identity::new(*contract.info(), name),
            contract,
            implementation,
            activator,
            lifecycle,
            group: None,
        }
    }

    #[inline]
    #[must_use]
    pub fn with_group(self, group: Option<String>) -> Self {
        Self { group, ..self }
    }

    /// Checks that the implementation can be provided as the contract
    pub fn conform(&self) -> Result<(), RegistrationErrorKind> {
        conform(&self.contract, self.implementation.as_ref())
    }

    /// Produces an instance through the lifecycle, activating a new one when it isn't cached
    pub fn obtain(&self, container: &Container) -> Result<Instance, ResolveErrorKind> {
        let context = ResolutionContext::new(
            container.clone(),
            self.contract.clone(),
            self.implementation.clone(),
            self.identity.name.clone(),
        );
        self.lifecycle.obtain(&context, &mut || self.activator.activate(&context))
    }

    #[inline]
    #[must_use]
    pub const fn identity(&self) -> &Identity {
        &self.identity
    }

    #[inline]
    #[must_use]
    pub const fn contract(&self) -> &Type {
        &self.contract
    }

    #[inline]
    #[must_use]
    pub const fn implementation(&self) -> Option<&Type> {
        self.implementation.as_ref()
    }

    #[inline]
    #[must_use]
    pub fn activator(&self) -> &dyn Activator {
        self.activator.as_ref()
    }

    #[inline]
    #[must_use]
    pub fn lifecycle(&self) -> &dyn Lifecycle {
        self.lifecycle.as_ref()
    }

    #[inline]
    #[must_use]
    pub fn group(&self) -> Option<&str> {
        self.group.as_deref()
    }
}

/// Checks a contract and implementation pair before it is registered.
///
/// Open generic definitions are checked per closed form when they are registered.
pub(crate) fn conform(contract: &Type, implementation: Option<&Type>) -> Result<(), RegistrationErrorKind> {
    let Some(implementation) = implementation else {
        return Ok(());
    };
    if contract.is_definition() {
        return Ok(());
    }
    let Some(component) = implementation.component_info() else {
        return Err(RegistrationErrorKind::InvalidRegistration {
            implementation: *implementation.info(),
        });
    };
    if component.satisfies(contract.info()) {
        Ok(())
    } else {
        Err(RegistrationErrorKind::ContractNotImplementedByType {
            contract: *contract.info(),
            implementation: *implementation.info(),
        })
    }
}

impl Debug for RegistrationItem {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.debug_struct("RegistrationItem")
            .field("identity", &self.identity)
            .field("implementation", &self.implementation.as_ref().map(Type::name))
            .field("lifecycle", &self.lifecycle.name())
            .field("group", &self.group)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::{Identity, RegistrationItem};
    use crate::{
        activator::{Activator, InstanceActivator, ReflectiveActivator},
        any::TypeInfo,
        casts, component, interface,
        lifecycle::Transient,
        Cast, Component, Constructor, RegistrationErrorKind, Resolvable, Type,
    };

    trait Greeter: Send + Sync {}

    interface!(dyn Greeter);

    trait Named: Send + Sync {}

    interface!(dyn Named);

    struct English;

    impl Greeter for English {}

    impl Component for English {
        fn constructors() -> Vec<Constructor> {
            vec![Constructor::new(|| Ok(English))]
        }

        fn contracts() -> Vec<Cast> {
            casts![dyn Greeter]
        }
    }

    component!(English);

    fn reflective(contract: Type, implementation: Type) -> RegistrationItem {
        let activator: Box<dyn Activator> = match ReflectiveActivator::for_type(&implementation) {
            Some(activator) => Box::new(activator),
            None => Box::new(InstanceActivator::new(Arc::new(English))),
        };
        RegistrationItem::new(contract, None, Some(implementation), activator, Box::new(Transient))
    }

    #[test]
    fn test_identity_equality() {
        let greeter = TypeInfo::of::<dyn Greeter>();

        assert_eq!(Identity::new(greeter, None), Identity::new(greeter, None));
        assert_ne!(Identity::new(greeter, None), Identity::new(greeter, Some("english")));
        assert_eq!(Identity::new(greeter, Some("english")).to_string(), "Greeter (english)");
    }

    #[test]
    fn test_conform() {
        assert!(reflective(<dyn Greeter as Resolvable>::descriptor(), English::descriptor()).conform().is_ok());
        assert!(reflective(English::descriptor(), English::descriptor()).conform().is_ok());
        assert_eq!(
            reflective(<dyn Named as Resolvable>::descriptor(), English::descriptor()).conform(),
            Err(RegistrationErrorKind::ContractNotImplementedByType {
                contract: TypeInfo::of::<dyn Named>(),
                implementation: TypeInfo::of::<English>(),
            })
        );
        assert_eq!(
            reflective(<dyn Greeter as Resolvable>::descriptor(), <dyn Named as Resolvable>::descriptor()).conform(),
            Err(RegistrationErrorKind::InvalidRegistration {
                implementation: TypeInfo::of::<dyn Named>(),
            })
        );
    }
}
