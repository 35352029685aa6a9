use std::sync::Arc;

use tracing::debug;

use super::{not_found, RegistrationSource};
use crate::{
    activator::ReflectiveActivator,
    container::Container,
    descriptor::Type,
    errors::ResolveErrorKind,
    registration::{Identity, RegistrationItem},
    registry::{OpenClosing, RegistrationStore},
};

/// Closes open generic registrations for the closed contracts they were registered with.
///
/// The closed registration is committed to the store, later requests hit it directly.
#[derive(Debug, Default, Clone, Copy)]
pub struct OpenGenericSource;

impl RegistrationSource for OpenGenericSource {
    fn name(&self) -> &'static str {
        "open-generic"
    }

    fn supports(&self, contract: &Type, name: Option<&str>, store: &RegistrationStore) -> bool {
        store.closing(&Identity::new(*contract.info(), name)).is_some()
    }

    fn resolve(
        &self,
        contract: &Type,
        name: Option<&str>,
        container: &Container,
    ) -> Result<Arc<RegistrationItem>, ResolveErrorKind> {
        let store = container.store();
        let identity = Identity::new(*contract.info(), name);

        let Some(OpenClosing { definition, closing }) = store.closing(&identity) else {
            return Err(not_found(contract, name));
        };
        let Some(open) = store.try_get(&definition) else {
            return Err(ResolveErrorKind::RegistrationNotFound {
                contract: *definition.contract(),
                name: definition.name().map(ToOwned::to_owned),
            });
        };

        let compatible = store.all_items().into_iter().find(|item| {
            item.contract() == closing.contract() && item.implementation() == Some(closing.implementation())
        });
        if let Some(item) = compatible {
            debug!(%identity, "Reusing compatible registration");
            return Ok(store.get_or_add(identity, item));
        }

        let Some(activator) = ReflectiveActivator::for_type(closing.implementation()) else {
            return Err(not_found(contract, name));
        };
        let item = RegistrationItem::new(
            closing.contract().clone(),
            name,
            Some(closing.implementation().clone()),
            Box::new(activator),
            open.lifecycle().renew(),
        )
        .with_group(open.group().map(ToOwned::to_owned));

        debug!(%identity, implementation = closing.implementation().name(), "Closed open registration");
        Ok(store.get_or_add(identity, Arc::new(item)))
    }

    fn commits(&self) -> bool {
        true
    }
}
