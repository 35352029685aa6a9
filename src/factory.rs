use core::{
    fmt::{self, Debug, Formatter},
    marker::PhantomData,
};
use std::sync::{Arc, Weak};

use tracing::debug;

use crate::{
    any::TypeInfo,
    container::{Container, ContainerInner},
    descriptor::Resolvable,
    errors::ResolveErrorKind,
};

/// Deferred producer of `C`.
///
/// Nothing is built until [`Factory::create`] is called, every call goes through the container
/// and so honors the lifecycle `C` is registered with. The handle doesn't keep the container alive.
pub struct Factory<C: ?Sized> {
    container: Weak<ContainerInner>,
    _marker: PhantomData<fn() -> Arc<C>>,
}

impl<C: Resolvable + ?Sized> Factory<C> {
    #[inline]
    #[must_use]
    pub(crate) fn new(container: &Container) -> Self {
        Self {
            container: Arc::downgrade(container.inner()),
            _marker: PhantomData,
        }
    }

    pub fn create(&self) -> Result<Arc<C>, ResolveErrorKind> {
        let Some(inner) = self.container.upgrade() else {
            debug!(contract = TypeInfo::of::<C>().name, "Container dropped");
            return Err(ResolveErrorKind::ContainerDropped);
        };
        Container::from_inner(inner).resolve::<C>()
    }
}

impl<C: ?Sized> Clone for Factory<C> {
    fn clone(&self) -> Self {
        Self {
            container: self.container.clone(),
            _marker: PhantomData,
        }
    }
}

impl<C: ?Sized + 'static> Debug for Factory<C> {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.debug_struct("Factory").field("target", &TypeInfo::of::<C>().name).finish()
    }
}
