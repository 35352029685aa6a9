mod aggregation;
mod concrete;
mod factory;
mod open_generic;

use std::sync::Arc;

pub use aggregation::AggregationSource;
pub use concrete::ConcreteTypeSource;
pub use factory::FactorySource;
pub use open_generic::OpenGenericSource;

use crate::{
    container::Container, descriptor::Type, errors::ResolveErrorKind, registration::RegistrationItem,
    registry::RegistrationStore,
};

/// Fallback consulted when the store has no registration for a request.
pub trait RegistrationSource: Send + Sync {
    fn name(&self) -> &'static str;

    /// Returns `true` if the source can provide a registration for the request
    fn supports(&self, contract: &Type, name: Option<&str>, store: &RegistrationStore) -> bool;

    /// Provides the registration for a supported request.
    ///
    /// Failing here for a request the source claimed to support is an inconsistency, not a miss.
    fn resolve(
        &self,
        contract: &Type,
        name: Option<&str>,
        container: &Container,
    ) -> Result<Arc<RegistrationItem>, ResolveErrorKind>;

    /// Returns `true` if resolved registrations are committed to the store, which makes them
    /// visible to resolve-all
    fn commits(&self) -> bool {
        false
    }
}

/// Built-in chain in priority order
#[must_use]
pub fn default_sources() -> Vec<Box<dyn RegistrationSource>> {
    vec![
        Box::new(OpenGenericSource),
        Box::new(AggregationSource),
        Box::new(ConcreteTypeSource),
        Box::new(FactorySource),
    ]
}

fn not_found(contract: &Type, name: Option<&str>) -> ResolveErrorKind {
    ResolveErrorKind::RegistrationNotFound {
        contract: *contract.info(),
        name: name.map(ToOwned::to_owned),
    }
}
