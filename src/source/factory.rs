use std::sync::Arc;

use super::{not_found, RegistrationSource};
use crate::{
    activator::DelegateActivator,
    container::Container,
    descriptor::{Type, TypeKind},
    errors::ResolveErrorKind,
    lifecycle::Transient,
    registration::RegistrationItem,
    registry::RegistrationStore,
};

/// Serves [`crate::Factory`] handles, the target is only resolved when the handle is called.
#[derive(Debug, Default, Clone, Copy)]
pub struct FactorySource;

impl RegistrationSource for FactorySource {
    fn name(&self) -> &'static str {
        "factory"
    }

    fn supports(&self, contract: &Type, name: Option<&str>, _store: &RegistrationStore) -> bool {
        name.is_none() && matches!(contract.kind(), TypeKind::Factory { .. })
    }

    fn resolve(
        &self,
        contract: &Type,
        name: Option<&str>,
        _container: &Container,
    ) -> Result<Arc<RegistrationItem>, ResolveErrorKind> {
        let TypeKind::Factory { make, .. } = contract.kind() else {
            return Err(not_found(contract, name));
        };
        let make = *make;
        let activator = DelegateActivator::from_fn(move |container| Ok(make(container)));

        Ok(Arc::new(RegistrationItem::new(
            contract.clone(),
            None,
            None,
            Box::new(activator),
            Box::new(Transient),
        )))
    }
}
