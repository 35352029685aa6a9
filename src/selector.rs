use tracing::trace;

use crate::{
    component::Constructor,
    context::ResolutionContext,
    errors::{FailureReason, ResolveErrorKind},
};

/// Picks the constructor a reflective activation invokes.
pub trait ConstructorSelector: Send + Sync {
    fn select<'a>(
        &self,
        constructors: &'a [Constructor],
        context: &ResolutionContext,
    ) -> Result<&'a Constructor, ResolveErrorKind>;
}

crate::interface!(dyn ConstructorSelector);

/// Selects the constructor with the most parameters that can all be resolved.
///
/// Constructors of equal arity keep declaration order, the first one wins.
#[derive(Debug, Default, Clone, Copy)]
pub struct GreediestConstructorSelector;

impl ConstructorSelector for GreediestConstructorSelector {
    fn select<'a>(
        &self,
        constructors: &'a [Constructor],
        context: &ResolutionContext,
    ) -> Result<&'a Constructor, ResolveErrorKind> {
        let mut selected: Option<&Constructor> = None;
        for constructor in constructors {
            if selected.is_some_and(|selected| selected.arity() >= constructor.arity()) {
                continue;
            }
            if let Some(parameter) = constructor.parameters().iter().find(|parameter| !context.can_resolve(parameter)) {
                trace!(parameter = parameter.name(), "Constructor skipped");
                continue;
            }
            selected = Some(constructor);
        }

        match selected {
            Some(constructor) => {
                trace!(arity = constructor.arity(), "Constructor selected");
                Ok(constructor)
            }
            None => Err(ResolveErrorKind::ResolutionFailed {
                implementation: *context.implementation().info(),
                reason: FailureReason::NoSatisfiableConstructor,
            }),
        }
    }
}
