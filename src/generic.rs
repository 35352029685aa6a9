use core::fmt::{self, Debug, Formatter};

use frunk::{HCons, HNil};

use crate::{
    any::TypeInfo,
    component::Component,
    descriptor::{Resolvable, Type},
};

/// Marker for an open generic contract such as `dyn Repository<T>`.
///
/// ```text
/// trait Repository<T>: Send + Sync {}
/// interface!(<T> dyn Repository<T>);
///
/// struct RepositoryDefinition;
///
/// impl OpenContract for RepositoryDefinition {
///     type Closed<A: Send + Sync + 'static> = dyn Repository<A>;
/// }
/// ```
///
/// Generics with several parameters close over a tuple.
pub trait OpenContract: 'static {
    type Closed<A: Send + Sync + 'static>: Resolvable + ?Sized;
}

/// Marker for an open generic implementation of the open contract `D`.
pub trait OpenComponent<D: OpenContract>: 'static {
    type Closed<A: Send + Sync + 'static>: Component;
}

/// Closed form of an open registration for one type argument.
#[derive(Clone)]
pub struct Closing {
    arguments: TypeInfo,
    contract: Type,
    implementation: Type,
}

impl Closing {
    #[must_use]
    pub fn new<D, F, A>() -> Self
    where
        D: OpenContract,
        F: OpenComponent<D>,
        A: Send + Sync + 'static,
    {
        Self {
            arguments: TypeInfo::of::<A>(),
            contract: <D::Closed<A> as Resolvable>::descriptor(),
            implementation: Type::component::<F::Closed<A>>(),
        }
    }

    #[inline]
    #[must_use]
    pub const fn arguments(&self) -> &TypeInfo {
        &self.arguments
    }

    #[inline]
    #[must_use]
    pub const fn contract(&self) -> &Type {
        &self.contract
    }

    #[inline]
    #[must_use]
    pub const fn implementation(&self) -> &Type {
        &self.implementation
    }
}

impl Debug for Closing {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.debug_struct("Closing")
            .field("arguments", &self.arguments.name)
            .field("contract", &self.contract.name())
            .field("implementation", &self.implementation.name())
            .finish()
    }
}

/// Type-level list of the arguments an open registration can be closed over, written as
/// `frunk::HList![Foo, Bar, (Foo, Bar)]`.
pub trait Closings {
    fn close<D: OpenContract, F: OpenComponent<D>>(closings: &mut Vec<Closing>);
}

impl Closings for HNil {
    #[inline]
    fn close<D: OpenContract, F: OpenComponent<D>>(_closings: &mut Vec<Closing>) {}
}

impl<A, Tail> Closings for HCons<A, Tail>
where
    A: Send + Sync + 'static,
    Tail: Closings,
{
    #[inline]
    fn close<D: OpenContract, F: OpenComponent<D>>(closings: &mut Vec<Closing>) {
        closings.push(Closing::new::<D, F, A>());
        Tail::close::<D, F>(closings);
    }
}
