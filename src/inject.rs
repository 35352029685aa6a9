use std::sync::Arc;

use crate::{
    dependency_resolver::{next_argument, Arguments, DependencyResolver},
    descriptor::{Resolvable, Type},
    errors::ResolveErrorKind,
    factory::Factory,
};

/// Shared instance of `C` resolved by the container.
pub struct Inject<C: ?Sized>(pub Arc<C>);

impl<C: Resolvable + ?Sized> DependencyResolver for Inject<C> {
    type Error = ResolveErrorKind;

    fn describe(parameters: &mut Vec<Type>) {
        parameters.push(C::descriptor());
    }

    fn resolve(arguments: &mut Arguments) -> Result<Self, Self::Error> {
        next_argument(arguments, &C::descriptor())?.downcast_shared().map(Self)
    }
}

/// Every registered instance of `C`, in registration order.
pub struct InjectAll<C: ?Sized>(pub Vec<Arc<C>>);

impl<C: Resolvable + ?Sized> DependencyResolver for InjectAll<C> {
    type Error = ResolveErrorKind;

    fn describe(parameters: &mut Vec<Type>) {
        parameters.push(<Vec<Arc<C>>>::descriptor());
    }

    fn resolve(arguments: &mut Arguments) -> Result<Self, Self::Error> {
        let all = next_argument(arguments, &<Vec<Arc<C>>>::descriptor())?.downcast_shared::<Vec<Arc<C>>>()?;
        Ok(Self(all.as_ref().clone()))
    }
}

impl<C: Resolvable + ?Sized> DependencyResolver for Factory<C> {
    type Error = ResolveErrorKind;

    fn describe(parameters: &mut Vec<Type>) {
        parameters.push(Self::descriptor());
    }

    fn resolve(arguments: &mut Arguments) -> Result<Self, Self::Error> {
        let factory = next_argument(arguments, &Self::descriptor())?.downcast_shared::<Self>()?;
        Ok(factory.as_ref().clone())
    }
}
