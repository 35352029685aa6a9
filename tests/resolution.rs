use std::{
    marker::PhantomData,
    sync::{
        atomic::{AtomicU8, Ordering},
        Arc, Barrier,
    },
    thread,
};

use resolvent::{
    casts, component, interface,
    source::RegistrationSource,
    Cast, Component, Config, Constructor, Container, ContainerBuilder, HList, Inject, InstanceActivator, LifecycleKind,
    OpenComponent, OpenContract, RegistrationErrorKind, RegistrationItem, RegistrationStore, Resolvable,
    ResolveErrorKind, ScopeStore, Transient, Type, TypeInfo,
};
use tracing_test::traced_test;

trait IFoo: Send + Sync {
    fn name(&self) -> &'static str;
}
trait IBar: Send + Sync {
    fn foo(&self) -> &Arc<dyn IFoo>;
}

interface!(dyn IFoo);
interface!(dyn IBar);

struct Foo;

impl IFoo for Foo {
    fn name(&self) -> &'static str {
        "foo"
    }
}

impl Component for Foo {
    fn constructors() -> Vec<Constructor> {
        vec![Constructor::new(|| Ok(Foo))]
    }

    fn contracts() -> Vec<Cast> {
        casts![dyn IFoo]
    }
}

component!(Foo);

struct OtherFoo;

impl IFoo for OtherFoo {
    fn name(&self) -> &'static str {
        "other"
    }
}

impl Component for OtherFoo {
    fn constructors() -> Vec<Constructor> {
        vec![Constructor::new(|| Ok(OtherFoo))]
    }

    fn contracts() -> Vec<Cast> {
        casts![dyn IFoo]
    }
}

component!(OtherFoo);

struct Bar(Arc<dyn IFoo>);

impl IBar for Bar {
    fn foo(&self) -> &Arc<dyn IFoo> {
        &self.0
    }
}

impl Component for Bar {
    fn constructors() -> Vec<Constructor> {
        vec![Constructor::new(|Inject(foo): Inject<dyn IFoo>| Ok(Bar(foo)))]
    }

    fn contracts() -> Vec<Cast> {
        casts![dyn IBar]
    }
}

component!(Bar);

trait IRepository<T>: Send + Sync {
    fn entity(&self) -> &'static str;
}

interface!(<T> dyn IRepository<T>);

struct Repository<T>(PhantomData<fn() -> T>);

impl<T: Send + Sync + 'static> IRepository<T> for Repository<T> {
    fn entity(&self) -> &'static str {
        core::any::type_name::<T>()
    }
}

impl<T: Send + Sync + 'static> Component for Repository<T> {
    fn constructors() -> Vec<Constructor> {
        vec![Constructor::new(|| Ok(Repository::<T>(PhantomData)))]
    }

    fn contracts() -> Vec<Cast> {
        casts![dyn IRepository<T>]
    }
}

component!(<T> Repository<T>);

struct RepositoryDefinition;

impl OpenContract for RepositoryDefinition {
    type Closed<A: Send + Sync + 'static> = dyn IRepository<A>;
}

struct RepositoryImplementation;

impl OpenComponent<RepositoryDefinition> for RepositoryImplementation {
    type Closed<A: Send + Sync + 'static> = Repository<A>;
}

fn ptr_eq<T: ?Sized>(left: &Arc<T>, right: &Arc<T>) -> bool {
    core::ptr::eq(Arc::as_ptr(left).cast::<()>(), Arc::as_ptr(right).cast::<()>())
}

fn foo_bar(default_lifecycle: LifecycleKind) -> Container {
    ContainerBuilder::new()
        .default_lifecycle(default_lifecycle)
        .register::<dyn IFoo, Foo>()
        .unwrap()
        .register::<dyn IBar, Bar>()
        .unwrap()
        .build()
}

#[test]
#[traced_test]
fn test_transient_yields_distinct_instances() {
    let container = foo_bar(LifecycleKind::Transient);

    let first = container.resolve::<dyn IFoo>().unwrap();
    let second = container.resolve::<dyn IFoo>().unwrap();
    assert!(!ptr_eq(&first, &second));

    let bar = container.resolve::<dyn IBar>().unwrap();
    assert!(!ptr_eq(bar.foo(), &first));
}

#[test]
#[traced_test]
fn test_singleton_default_yields_identical_instances() {
    let container = foo_bar(LifecycleKind::Singleton);

    let first = container.resolve::<dyn IFoo>().unwrap();
    let second = container.resolve::<dyn IFoo>().unwrap();
    assert!(ptr_eq(&first, &second));

    let bar = container.resolve::<dyn IBar>().unwrap();
    assert!(ptr_eq(bar.foo(), &first));
}

#[test]
#[traced_test]
fn test_singleton_concurrent_first_resolution() {
    const THREADS: usize = 16;

    static CALL_COUNT: AtomicU8 = AtomicU8::new(0);

    struct Expensive;

    impl Component for Expensive {
        fn constructors() -> Vec<Constructor> {
            vec![Constructor::new(|| {
                CALL_COUNT.fetch_add(1, Ordering::SeqCst);
                thread::yield_now();
                Ok(Expensive)
            })]
        }
    }

    component!(Expensive);

    let container = ContainerBuilder::new()
        .register_self_with_config::<Expensive>(Config::singleton())
        .unwrap()
        .build();
    let barrier = Barrier::new(THREADS);

    let instances: Vec<Arc<Expensive>> = thread::scope(|scope| {
        let handles: Vec<_> = (0..THREADS)
            .map(|_| {
                scope.spawn(|| {
                    barrier.wait();
                    container.resolve::<Expensive>().unwrap()
                })
            })
            .collect();
        handles.into_iter().map(|handle| handle.join().unwrap()).collect()
    });

    assert_eq!(CALL_COUNT.load(Ordering::SeqCst), 1);
    assert!(instances.iter().all(|instance| Arc::ptr_eq(instance, &instances[0])));
}

#[test]
#[traced_test]
fn test_thread_singleton() {
    let container = ContainerBuilder::new()
        .register_with_config::<dyn IFoo, Foo>(Config::thread_singleton())
        .unwrap()
        .build();

    let first = container.resolve::<dyn IFoo>().unwrap();
    let second = container.resolve::<dyn IFoo>().unwrap();
    assert!(ptr_eq(&first, &second));

    let other = thread::scope(|scope| scope.spawn(|| container.resolve::<dyn IFoo>().unwrap()).join().unwrap());
    assert!(!ptr_eq(&first, &other));
}

#[test]
#[traced_test]
fn test_scoped() {
    let scopes = ScopeStore::new();
    let container = ContainerBuilder::new()
        .register_with_config::<dyn IFoo, Foo>(Config::new().lifecycle(LifecycleKind::Scoped(scopes.clone())))
        .unwrap()
        .build();

    assert!(matches!(
        container.resolve::<dyn IFoo>(),
        Err(ResolveErrorKind::NoActiveScope { .. })
    ));

    let request = scopes.begin();
    let first = container.resolve::<dyn IFoo>().unwrap();
    assert!(ptr_eq(&first, &container.resolve::<dyn IFoo>().unwrap()));
    drop(request);

    let _request = scopes.begin();
    assert!(!ptr_eq(&first, &container.resolve::<dyn IFoo>().unwrap()));
}

#[test]
#[traced_test]
fn test_open_generic_closed_once() {
    struct User;
    struct Order;

    let container = ContainerBuilder::new()
        .register_open::<RepositoryDefinition, RepositoryImplementation, HList![User, Order]>()
        .unwrap()
        .build();
    let store = container.store();

    let before = store.len();
    let users = container.resolve::<dyn IRepository<User>>().unwrap();
    let after_first = store.len();
    let _ = container.resolve::<dyn IRepository<User>>().unwrap();
    let after_second = store.len();

    assert_eq!(after_first, before + 1);
    assert_eq!(after_second, after_first);
    assert_eq!(users.entity(), core::any::type_name::<User>());

    let orders = container.resolve::<dyn IRepository<Order>>().unwrap();
    assert_eq!(orders.entity(), core::any::type_name::<Order>());
    assert_eq!(store.len(), before + 2);

    assert!(matches!(
        container.resolve::<dyn IRepository<u8>>(),
        Err(ResolveErrorKind::RegistrationNotFound { .. })
    ));
}

#[test]
#[traced_test]
fn test_open_generic_keeps_lifecycle_kind() {
    struct User;

    let container = ContainerBuilder::new()
        .register_open_with_config::<RepositoryDefinition, RepositoryImplementation, HList![User]>(Config::singleton())
        .unwrap()
        .build();

    let first = container.resolve::<dyn IRepository<User>>().unwrap();
    let second = container.resolve::<dyn IRepository<User>>().unwrap();
    assert!(ptr_eq(&first, &second));

    let item = container
        .store()
        .try_get(&resolvent::Identity::new(TypeInfo::of::<dyn IRepository<User>>(), None))
        .unwrap();
    assert_eq!(item.lifecycle().name(), "singleton");
    assert_eq!(item.implementation().unwrap().info(), &TypeInfo::of::<Repository<User>>());
}

#[test]
#[traced_test]
fn test_open_generic_concurrent_closing() {
    const THREADS: usize = 8;

    struct User;

    let container = ContainerBuilder::new()
        .register_open_with_config::<RepositoryDefinition, RepositoryImplementation, HList![User]>(Config::singleton())
        .unwrap()
        .build();
    let before = container.store().len();
    let barrier = Barrier::new(THREADS);

    let instances: Vec<Arc<dyn IRepository<User>>> = thread::scope(|scope| {
        let handles: Vec<_> = (0..THREADS)
            .map(|_| {
                scope.spawn(|| {
                    barrier.wait();
                    container.resolve::<dyn IRepository<User>>().unwrap()
                })
            })
            .collect();
        handles.into_iter().map(|handle| handle.join().unwrap()).collect()
    });

    assert_eq!(container.store().len(), before + 1);
    assert!(instances.iter().all(|instance| ptr_eq(instance, &instances[0])));
}

#[test]
#[traced_test]
fn test_duplicate_registration() {
    let container = ContainerBuilder::new()
        .register::<dyn IFoo, Foo>()
        .unwrap()
        .register::<dyn IFoo, OtherFoo>()
        .unwrap()
        .build();

    let foo = container.resolve_type(&Type::contract::<dyn IFoo>(), None).unwrap();
    assert_eq!(foo.downcast::<dyn IFoo>().unwrap().name(), "other");
    assert_eq!(container.resolve::<dyn IFoo>().unwrap().name(), "other");

    let all = container.resolve_all::<dyn IFoo>().unwrap();
    assert_eq!(all.iter().map(|foo| foo.name()).collect::<Vec<_>>(), ["foo", "other"]);

    let all = container
        .resolve_all_type(&Type::contract::<dyn IFoo>())
        .unwrap();
    assert_eq!(all.len(), 2);
    assert_eq!(all[0].downcast::<dyn IFoo>().unwrap().name(), "foo");

    let items = container.store().matching(&TypeInfo::of::<dyn IFoo>());
    assert_eq!(items[0].implementation().unwrap().info(), &TypeInfo::of::<Foo>());
    assert_eq!(items[1].implementation().unwrap().info(), &TypeInfo::of::<OtherFoo>());

    let direct = container
        .store()
        .try_get(&resolvent::Identity::new(TypeInfo::of::<dyn IFoo>(), None))
        .unwrap();
    assert_eq!(direct.implementation().unwrap().info(), &TypeInfo::of::<OtherFoo>());
}

#[test]
#[traced_test]
fn test_concrete_fallback() {
    struct Unregistered(Arc<Foo>);

    impl Component for Unregistered {
        fn constructors() -> Vec<Constructor> {
            vec![Constructor::new(|Inject(foo): Inject<Foo>| Ok(Unregistered(foo)))]
        }
    }

    component!(Unregistered);

    let container = ContainerBuilder::new().build();
    let before = container.store().len();

    let first = container.resolve::<Unregistered>().unwrap();
    let second = container.resolve::<Unregistered>().unwrap();
    assert!(!Arc::ptr_eq(&first, &second));
    assert!(!Arc::ptr_eq(&first.0, &second.0));
    assert_eq!(container.store().len(), before);

    assert!(matches!(
        container.resolve::<dyn IFoo>(),
        Err(ResolveErrorKind::RegistrationNotFound { .. })
    ));
}

#[test]
#[traced_test]
fn test_registration_errors() {
    assert!(matches!(
        ContainerBuilder::new().register::<dyn IBar, Foo>(),
        Err(RegistrationErrorKind::ContractNotImplementedByType { .. })
    ));
    assert!(matches!(
        ContainerBuilder::new().register_type_self(Type::contract::<dyn IFoo>(), Config::new()),
        Err(RegistrationErrorKind::InvalidRegistration { .. })
    ));
    assert!(matches!(
        ContainerBuilder::new().register_type(
            Type::definition::<RepositoryDefinition>(),
            <Foo as Resolvable>::descriptor(),
            Config::new()
        ),
        Err(RegistrationErrorKind::InvalidRegistration { .. })
    ));
}

#[test]
#[traced_test]
fn test_group_filter() {
    let container = ContainerBuilder::new()
        .filter_groups(|group| group == "enabled")
        .register_with_config::<dyn IFoo, Foo>(Config::new().group("disabled"))
        .unwrap()
        .register_with_config::<dyn IBar, Bar>(Config::new().group("enabled"))
        .unwrap()
        .build();

    assert!(container.resolve::<dyn IFoo>().is_err());
    assert!(matches!(
        container.resolve::<dyn IBar>(),
        Err(ResolveErrorKind::ResolutionFailed { .. })
    ));
}

#[test]
#[traced_test]
fn test_open_generic_reuses_compatible_registration() {
    struct User;

    let container = ContainerBuilder::new()
        .register_with_config::<dyn IRepository<User>, Repository<User>>(Config::singleton().name("users"))
        .unwrap()
        .register_open::<RepositoryDefinition, RepositoryImplementation, HList![User]>()
        .unwrap()
        .build();
    let before = container.store().len();

    let named = container.resolve_named::<dyn IRepository<User>>("users").unwrap();
    let unnamed = container.resolve::<dyn IRepository<User>>().unwrap();
    assert!(ptr_eq(&named, &unnamed));
    assert_eq!(container.store().len(), before + 1);

    let all = container.resolve_all::<dyn IRepository<User>>().unwrap();
    assert_eq!(all.len(), 1);
    assert!(ptr_eq(&all[0], &named));
}

#[test]
#[traced_test]
fn test_open_generic_reregistration_replaces_closings() {
    struct User;
    struct Order;

    let container = ContainerBuilder::new()
        .register_open::<RepositoryDefinition, RepositoryImplementation, HList![User, Order]>()
        .unwrap()
        .register_open::<RepositoryDefinition, RepositoryImplementation, HList![User]>()
        .unwrap()
        .build();

    assert_eq!(
        container.resolve::<dyn IRepository<User>>().unwrap().entity(),
        core::any::type_name::<User>()
    );
    assert!(matches!(
        container.resolve::<dyn IRepository<Order>>(),
        Err(ResolveErrorKind::RegistrationNotFound { .. })
    ));
}

struct FooFallback {
    calls: Arc<AtomicU8>,
}

impl RegistrationSource for FooFallback {
    fn name(&self) -> &'static str {
        "foo-fallback"
    }

    fn supports(&self, contract: &Type, name: Option<&str>, _store: &RegistrationStore) -> bool {
        name.is_none() && (contract.info() == &TypeInfo::of::<dyn IFoo>() || contract.info() == &TypeInfo::of::<Foo>())
    }

    fn resolve(
        &self,
        contract: &Type,
        _name: Option<&str>,
        _container: &Container,
    ) -> Result<Arc<RegistrationItem>, ResolveErrorKind> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Ok(Arc::new(RegistrationItem::new(
            contract.clone(),
            None,
            None,
            Box::new(InstanceActivator::new::<dyn IFoo>(Arc::new(OtherFoo))),
            Box::new(Transient),
        )))
    }
}

#[test]
#[traced_test]
fn test_custom_source_after_built_in_chain() {
    let calls = Arc::new(AtomicU8::new(0));
    let container = ContainerBuilder::new()
        .with_source(FooFallback { calls: calls.clone() })
        .build();

    // Concrete types are served by the built-in concrete source first
    assert_eq!(container.resolve::<Foo>().unwrap().name(), "foo");
    assert_eq!(calls.load(Ordering::SeqCst), 0);

    assert_eq!(container.resolve::<dyn IFoo>().unwrap().name(), "other");
    assert_eq!(calls.load(Ordering::SeqCst), 1);
    assert!(container.can_resolve(&Type::contract::<dyn IFoo>()));

    let registered = ContainerBuilder::new()
        .register::<dyn IFoo, Foo>()
        .unwrap()
        .with_source(FooFallback { calls: calls.clone() })
        .build();
    assert_eq!(registered.resolve::<dyn IFoo>().unwrap().name(), "foo");
    assert_eq!(calls.load(Ordering::SeqCst), 1);
}
