use crate::{descriptor::Type, errors::ResolveErrorKind, instance::Instance};

/// Collected constructor arguments, consumed in parameter order.
pub type Arguments = std::vec::IntoIter<Instance>;

/// Constructor parameter.
///
/// `describe` declares the parameter types so the constructor selector can check them before any
/// instance is built, `resolve` then decodes the arguments the collector produced for them.
pub trait DependencyResolver: Sized + 'static {
    type Error: Into<ResolveErrorKind>;

    fn describe(parameters: &mut Vec<Type>);

    fn resolve(arguments: &mut Arguments) -> Result<Self, Self::Error>;
}

/// Takes the next collected argument for a parameter of type `expected`.
pub(crate) fn next_argument(arguments: &mut Arguments, expected: &Type) -> Result<Instance, ResolveErrorKind> {
    arguments.next().ok_or(ResolveErrorKind::MissingArgument { expected: *expected.info() })
}

macro_rules! impl_dependency_resolver {
    (
        [$($ty:ident),*]
    ) => {
        #[allow(non_snake_case)]
        impl<$($ty,)*> DependencyResolver for ($($ty,)*)
        where
            $( $ty: DependencyResolver, )*
        {
            type Error = ResolveErrorKind;

            #[inline]
            #[allow(unused_variables)]
            fn describe(parameters: &mut Vec<Type>) {
                $( $ty::describe(parameters); )*
            }

            #[inline]
            #[allow(unused_variables)]
            fn resolve(arguments: &mut Arguments) -> Result<Self, Self::Error> {
                Ok(($($ty::resolve(arguments).map_err(Into::into)?,)*))
            }
        }
    };
}

all_the_tuples!(impl_dependency_resolver);

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::DependencyResolver;
    use crate::{any::TypeInfo, component, Component, Constructor, Inject, InjectAll, Instance};

    struct Foo;

    impl Component for Foo {
        fn constructors() -> Vec<Constructor> {
            vec![Constructor::new(|| Ok(Foo))]
        }
    }

    component!(Foo);

    #[test]
    fn test_describe_tuple_in_order() {
        let mut parameters = vec![];
        <(Inject<Foo>, InjectAll<Foo>)>::describe(&mut parameters);

        assert_eq!(parameters.len(), 2);
        assert_eq!(parameters[0].info(), &TypeInfo::of::<Foo>());
        assert_eq!(parameters[1].info(), &TypeInfo::of::<Vec<Arc<Foo>>>());
    }

    #[test]
    fn test_resolve_tuple_in_order() {
        let foo = Arc::new(Foo);
        let mut arguments = vec![
            Instance::new(foo.clone()),
            Instance::new(Arc::new(vec![foo.clone(), foo.clone()])),
        ]
        .into_iter();

        let (Inject(single), InjectAll(all)) = <(Inject<Foo>, InjectAll<Foo>)>::resolve(&mut arguments).unwrap();
        assert!(Arc::ptr_eq(&single, &foo));
        assert_eq!(all.len(), 2);
        assert!(arguments.next().is_none());
    }
}
