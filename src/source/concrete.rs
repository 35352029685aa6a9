use std::sync::Arc;

use super::{not_found, RegistrationSource};
use crate::{
    activator::ReflectiveActivator, container::Container, descriptor::Type, errors::ResolveErrorKind,
    lifecycle::Transient, registration::RegistrationItem, registry::RegistrationStore,
};

/// Builds unregistered concrete components as if they were registered as themselves with a
/// transient lifecycle.
///
/// Nothing is committed to the store, every request synthesizes a new registration.
#[derive(Debug, Default, Clone, Copy)]
pub struct ConcreteTypeSource;

impl RegistrationSource for ConcreteTypeSource {
    fn name(&self) -> &'static str {
        "concrete"
    }

    fn supports(&self, contract: &Type, name: Option<&str>, _store: &RegistrationStore) -> bool {
        name.is_none() && contract.is_concrete()
    }

    fn resolve(
        &self,
        contract: &Type,
        name: Option<&str>,
        _container: &Container,
    ) -> Result<Arc<RegistrationItem>, ResolveErrorKind> {
        let Some(activator) = ReflectiveActivator::for_type(contract) else {
            return Err(not_found(contract, name));
        };

        Ok(Arc::new(RegistrationItem::new(
            contract.clone(),
            None,
            Some(contract.clone()),
            Box::new(activator),
            Box::new(Transient),
        )))
    }
}
