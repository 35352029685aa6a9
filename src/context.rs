use crate::{container::Container, descriptor::Type, errors::ResolveErrorKind, instance::Instance};

/// State of one activation: the container it runs in and the registration being built.
#[derive(Clone)]
pub struct ResolutionContext {
    container: Container,
    contract: Type,
    implementation: Option<Type>,
    name: Option<String>,
}

impl ResolutionContext {
    #[inline]
    #[must_use]
    pub(crate) const fn new(
        container: Container,
        contract: Type,
        implementation: Option<Type>,
        name: Option<String>,
    ) -> Self {
        Self {
            container,
            contract,
            implementation,
            name,
        }
    }

    #[inline]
    #[must_use]
    pub const fn container(&self) -> &Container {
        &self.container
    }

    /// Contract the instance is being produced for
    #[inline]
    #[must_use]
    pub const fn contract(&self) -> &Type {
        &self.contract
    }

    /// Type being built, the contract itself for factory and instance registrations
    #[inline]
    #[must_use]
    pub fn implementation(&self) -> &Type {
        self.implementation.as_ref().unwrap_or(&self.contract)
    }

    #[inline]
    #[must_use]
    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    /// Returns `true` if an unnamed request for `ty` would find a registration, a source or a
    /// directly instantiable type
    #[inline]
    #[must_use]
    pub fn can_resolve(&self, ty: &Type) -> bool {
        self.container.can_resolve(ty)
    }

    #[inline]
    pub fn resolve(&self, ty: &Type) -> Result<Instance, ResolveErrorKind> {
        self.container.resolve_type(ty, None)
    }
}
