use std::sync::Arc;

use tracing::debug;

use crate::{
    dependency_resolver::DependencyResolver,
    errors::{InstantiateErrorKind, InstantiatorErrorKind, InstantiatorResult, ResolveErrorKind},
    instance::Instance,
    service::{service_fn, BoxCloneService},
};

/// Constructor function of a component.
///
/// Implemented for closures and functions of up to 16 arguments, where every argument is a
/// [`DependencyResolver`] such as [`crate::Inject`], [`crate::InjectAll`] or [`crate::Factory`].
pub trait Instantiator<Deps>: Clone + Send + Sync + 'static
where
    Deps: DependencyResolver,
{
    type Provides: Send + Sync + 'static;

    fn instantiate(&mut self, dependencies: Deps) -> InstantiatorResult<Self::Provides>;
}

pub(crate) type BoxedCloneInstantiator =
    BoxCloneService<Vec<Instance>, Instance, InstantiatorErrorKind<ResolveErrorKind, InstantiateErrorKind>>;

/// Erases an instantiator into a service from collected arguments to an `Arc` of the provided type.
#[must_use]
pub(crate) fn boxed_instantiator<Inst, Deps>(instantiator: Inst) -> BoxedCloneInstantiator
where
    Inst: Instantiator<Deps>,
    Deps: DependencyResolver,
{
    BoxCloneService(Box::new(service_fn({
        move |arguments: Vec<Instance>| {
            let mut arguments = arguments.into_iter();
            let dependencies = match Deps::resolve(&mut arguments) {
                Ok(dependencies) => dependencies,
                Err(err) => return Err(InstantiatorErrorKind::Deps(err.into())),
            };
            let provides = match instantiator.clone().instantiate(dependencies) {
                Ok(provides) => provides,
                Err(err) => return Err(InstantiatorErrorKind::Factory(err)),
            };

            debug!("Instantiated");

            Ok(Instance::new(Arc::new(provides)))
        }
    })))
}

macro_rules! impl_instantiator {
    (
        [$($ty:ident),*]
    ) => {
        #[allow(non_snake_case)]
        impl<F, Response, $($ty,)*> Instantiator<($($ty,)*)> for F
        where
            F: FnMut($($ty,)*) -> InstantiatorResult<Response> + Clone + Send + Sync + 'static,
            Response: Send + Sync + 'static,
            $( $ty: DependencyResolver, )*
        {
            type Provides = Response;

            fn instantiate(&mut self, ($($ty,)*): ($($ty,)*)) -> InstantiatorResult<Self::Provides> {
                self($($ty,)*)
            }
        }
    };
}

all_the_tuples!(impl_instantiator);

#[cfg(test)]
mod tests {
    use std::sync::{
        atomic::{AtomicU8, Ordering},
        Arc,
    };

    use tracing::debug;
    use tracing_test::traced_test;

    use super::{boxed_instantiator, DependencyResolver, Instantiator};
    use crate::{
        component, errors::InstantiatorErrorKind, service::Service as _, Component, Constructor, Inject, Instance,
        ResolveErrorKind,
    };

    struct Request(bool);
    struct Response(bool);

    impl Component for Request {
        fn constructors() -> Vec<Constructor> {
            vec![Constructor::new(|| Ok(Request(true)))]
        }
    }

    component!(Request);

    #[test]
    #[allow(dead_code)]
    fn test_factory_helper() {
        fn resolver<Deps: DependencyResolver, F: Instantiator<Deps>>(_f: F) {}
        fn resolver_with_dep() {
            resolver(|| Ok(()));
            resolver(|Inject(_): Inject<Request>| Ok(()));
        }
    }

    #[test]
    #[traced_test]
    fn test_boxed_instantiator() {
        let call_count = Arc::new(AtomicU8::new(0));

        let mut instantiator = boxed_instantiator({
            let call_count = call_count.clone();
            move |Inject(request_1): Inject<Request>, Inject(request_2): Inject<Request>| {
                assert_eq!(request_1.0, request_2.0);

                call_count.fetch_add(1, Ordering::SeqCst);

                debug!("Call instantiator response");
                Ok(Response(request_1.0))
            }
        });

        let arguments = || vec![Instance::new(Arc::new(Request(true))), Instance::new(Arc::new(Request(true)))];
        let response_1 = instantiator.call(arguments()).unwrap();
        let response_2 = instantiator.call(arguments()).unwrap();

        assert!(response_1.downcast::<Response>().unwrap().0);
        assert!(response_2.downcast::<Response>().unwrap().0);
        assert_eq!(call_count.load(Ordering::SeqCst), 2);
    }

    #[test]
    fn test_boxed_instantiator_missing_argument() {
        let mut instantiator = boxed_instantiator(|Inject(request): Inject<Request>| Ok(Response(request.0)));

        assert!(matches!(
            instantiator.call(vec![]),
            Err(InstantiatorErrorKind::Deps(ResolveErrorKind::MissingArgument { .. }))
        ));
    }
}
