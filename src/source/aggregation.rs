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

/// Serves `Vec<Arc<C>>` and `Box<[Arc<C>]>` with every registration of `C`.
#[derive(Debug, Default, Clone, Copy)]
pub struct AggregationSource;

impl RegistrationSource for AggregationSource {
    fn name(&self) -> &'static str {
        "aggregation"
    }

    fn supports(&self, contract: &Type, name: Option<&str>, _store: &RegistrationStore) -> bool {
        name.is_none() && matches!(contract.kind(), TypeKind::Sequence { .. })
    }

    fn resolve(
        &self,
        contract: &Type,
        name: Option<&str>,
        _container: &Container,
    ) -> Result<Arc<RegistrationItem>, ResolveErrorKind> {
        let TypeKind::Sequence { element, collect } = contract.kind().clone() else {
            return Err(not_found(contract, name));
        };
        let activator = DelegateActivator::from_fn(move |container| collect(container.resolve_all_type(&element)?));

        Ok(Arc::new(RegistrationItem::new(
            contract.clone(),
            None,
            None,
            Box::new(activator),
            Box::new(Transient),
        )))
    }
}
