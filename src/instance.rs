use core::any::Any;
use std::sync::Arc;

use crate::{any::TypeInfo, errors::ResolveErrorKind};

/// Type-erased resolved value.
///
/// The payload is always an `Arc<C>` of the contract type `C` the instance was produced for,
/// so trait object contracts are stored as `Arc<dyn Trait>` and concrete ones as `Arc<T>`.
/// Clones share the payload, which makes pointer identity the identity of the instance.
#[derive(Clone)]
pub struct Instance {
    type_info: TypeInfo,
    value: Arc<dyn Any + Send + Sync>,
}

impl Instance {
    #[inline]
    #[must_use]
    pub fn new<C>(value: Arc<C>) -> Self
    where
        C: ?Sized + Send + Sync + 'static,
    {
        Self {
            type_info: TypeInfo::of::<C>(),
            value: Arc::new(value),
        }
    }

    /// Type of the contract the payload was produced for
    #[inline]
    #[must_use]
    pub const fn type_info(&self) -> TypeInfo {
        self.type_info
    }

    #[inline]
    #[must_use]
    pub fn downcast<C>(&self) -> Option<Arc<C>>
    where
        C: ?Sized + 'static,
    {
        self.value.downcast_ref::<Arc<C>>().cloned()
    }

    /// Same as [`Self::downcast`], but reports the mismatch as [`ResolveErrorKind::IncorrectType`].
    #[inline]
    pub fn downcast_shared<C>(&self) -> Result<Arc<C>, ResolveErrorKind>
    where
        C: ?Sized + 'static,
    {
        self.downcast().ok_or(ResolveErrorKind::IncorrectType {
            expected: TypeInfo::of::<C>(),
            actual: self.type_info,
        })
    }

    /// Returns `true` if both instances share the same payload allocation.
    #[inline]
    #[must_use]
    pub fn ptr_eq(&self, other: &Self) -> bool {
        Arc::as_ptr(&self.value).cast::<()>() == Arc::as_ptr(&other.value).cast::<()>()
    }
}

impl core::fmt::Debug for Instance {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("Instance").field("type", &self.type_info.name).finish_non_exhaustive()
    }
}
