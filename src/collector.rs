use tracing::trace;

use crate::{context::ResolutionContext, descriptor::Type, errors::ResolveErrorKind, instance::Instance};

/// Resolves the arguments of a selected constructor.
pub trait ArgumentCollector: Send + Sync {
    /// Returns one instance per parameter, in parameter order.
    ///
    /// A shorter result is treated by the caller as a failed resolution.
    fn collect(
        &self,
        resolve: &dyn Fn(&Type) -> Result<Instance, ResolveErrorKind>,
        parameters: &[Type],
        context: &ResolutionContext,
    ) -> Result<Vec<Instance>, ResolveErrorKind>;
}

crate::interface!(dyn ArgumentCollector);

/// Resolves every parameter by type without a name and propagates the first failure.
#[derive(Debug, Default, Clone, Copy)]
pub struct DefaultArgumentCollector;

impl ArgumentCollector for DefaultArgumentCollector {
    fn collect(
        &self,
        resolve: &dyn Fn(&Type) -> Result<Instance, ResolveErrorKind>,
        parameters: &[Type],
        _context: &ResolutionContext,
    ) -> Result<Vec<Instance>, ResolveErrorKind> {
        parameters
            .iter()
            .map(|parameter| {
                trace!(parameter = parameter.name(), "Collecting argument");
                resolve(parameter)
            })
            .collect()
    }
}
