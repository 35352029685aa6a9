use core::{
    cmp::Ordering,
    fmt::{self, Debug, Formatter},
};
use std::sync::Arc;

use crate::{
    any::TypeInfo,
    component::{Component, ComponentInfo},
    container::Container,
    errors::ResolveErrorKind,
    factory::Factory,
    instance::Instance,
};

/// Runtime descriptor of a requested or registered type.
///
/// Equality and ordering only consider the underlying [`TypeInfo`], the kind is metadata
/// derived from the type itself.
#[derive(Clone)]
pub struct Type {
    info: TypeInfo,
    kind: TypeKind,
}

#[derive(Clone)]
pub enum TypeKind {
    /// Abstract contract, usually a trait object. Never built directly.
    Contract,
    /// Directly instantiable component with declared constructors.
    Concrete(fn() -> ComponentInfo),
    /// Every registered instance of `element`, assembled into the requested container shape.
    Sequence {
        element: Arc<Type>,
        collect: fn(Vec<Instance>) -> Result<Instance, ResolveErrorKind>,
    },
    /// Deferred producer of `target`.
    Factory { target: Arc<Type>, make: fn(&Container) -> Instance },
    /// Unclosed generic definition.
    Definition,
}

impl Type {
    #[inline]
    #[must_use]
    pub fn contract<C: ?Sized + 'static>() -> Self {
        Self {
            info: TypeInfo::of::<C>(),
            kind: TypeKind::Contract,
        }
    }

    #[inline]
    #[must_use]
    pub fn component<T: Component>() -> Self {
        Self {
            info: TypeInfo::of::<T>(),
            kind: TypeKind::Concrete(ComponentInfo::of::<T>),
        }
    }

    #[inline]
    #[must_use]
    pub fn definition<D: ?Sized + 'static>() -> Self {
        Self {
            info: TypeInfo::of::<D>(),
            kind: TypeKind::Definition,
        }
    }

    /// Descriptor of the sequence shape `S` holding every instance of `C`.
    #[inline]
    #[must_use]
    pub fn sequence<C, S>() -> Self
    where
        C: Resolvable + ?Sized,
        S: FromIterator<Arc<C>> + Send + Sync + 'static,
    {
        Self {
            info: TypeInfo::of::<S>(),
            kind: TypeKind::Sequence {
                element: Arc::new(C::descriptor()),
                collect: collect_sequence::<C, S>,
            },
        }
    }

    #[inline]
    #[must_use]
    pub fn factory<C: Resolvable + ?Sized>() -> Self {
        Self {
            info: TypeInfo::of::<Factory<C>>(),
            kind: TypeKind::Factory {
                target: Arc::new(C::descriptor()),
                make: make_factory::<C>,
            },
        }
    }

    #[inline]
    #[must_use]
    pub const fn info(&self) -> &TypeInfo {
        &self.info
    }

    #[inline]
    #[must_use]
    pub const fn name(&self) -> &'static str {
        self.info.name
    }

    #[inline]
    #[must_use]
    pub const fn kind(&self) -> &TypeKind {
        &self.kind
    }

    /// Returns `true` if the type can be built without any registration.
    #[inline]
    #[must_use]
    pub const fn is_concrete(&self) -> bool {
        matches!(self.kind, TypeKind::Concrete(_))
    }

    #[inline]
    #[must_use]
    pub const fn is_definition(&self) -> bool {
        matches!(self.kind, TypeKind::Definition)
    }

    #[inline]
    #[must_use]
    pub fn component_info(&self) -> Option<ComponentInfo> {
        match self.kind {
            TypeKind::Concrete(describe) => Some(describe()),
            _ => None,
        }
    }

    #[inline]
    #[must_use]
    pub(crate) fn describer(&self) -> Option<fn() -> ComponentInfo> {
        match self.kind {
            TypeKind::Concrete(describe) => Some(describe),
            _ => None,
        }
    }
}

impl PartialEq for Type {
    fn eq(&self, other: &Self) -> bool {
        self.info == other.info
    }
}

impl Eq for Type {}

impl PartialOrd for Type {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Type {
    fn cmp(&self, other: &Self) -> Ordering {
        self.info.cmp(&other.info)
    }
}

impl Debug for Type {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        let kind = match self.kind {
            TypeKind::Contract => "contract",
            TypeKind::Concrete(_) => "concrete",
            TypeKind::Sequence { .. } => "sequence",
            TypeKind::Factory { .. } => "factory",
            TypeKind::Definition => "definition",
        };
        f.debug_struct("Type").field("name", &self.info.name).field("kind", &kind).finish()
    }
}

/// A type that can be requested from the container.
///
/// Declared with [`crate::interface!`] for contracts and [`crate::component!`] for components.
pub trait Resolvable: Send + Sync + 'static {
    #[must_use]
    fn descriptor() -> Type;
}

impl<C: Resolvable + ?Sized> Resolvable for Vec<Arc<C>> {
    #[inline]
    fn descriptor() -> Type {
        Type::sequence::<C, Self>()
    }
}

impl<C: Resolvable + ?Sized> Resolvable for Box<[Arc<C>]> {
    #[inline]
    fn descriptor() -> Type {
        Type::sequence::<C, Self>()
    }
}

impl<C: Resolvable + ?Sized> Resolvable for Factory<C> {
    #[inline]
    fn descriptor() -> Type {
        Type::factory::<C>()
    }
}

fn collect_sequence<C, S>(instances: Vec<Instance>) -> Result<Instance, ResolveErrorKind>
where
    C: ?Sized + 'static,
    S: FromIterator<Arc<C>> + Send + Sync + 'static,
{
    let sequence = instances
        .iter()
        .map(Instance::downcast_shared::<C>)
        .collect::<Result<S, _>>()?;
    Ok(Instance::new(Arc::new(sequence)))
}

fn make_factory<C: Resolvable + ?Sized>(container: &Container) -> Instance {
    Instance::new(Arc::new(Factory::<C>::new(container)))
}
