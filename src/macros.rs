macro_rules! all_the_tuples {
    ($name:ident) => {
        $name!([]);
        $name!([T1]);
        $name!([T1, T2]);
        $name!([T1, T2, T3]);
        $name!([T1, T2, T3, T4]);
        $name!([T1, T2, T3, T4, T5]);
        $name!([T1, T2, T3, T4, T5, T6]);
        $name!([T1, T2, T3, T4, T5, T6, T7]);
        $name!([T1, T2, T3, T4, T5, T6, T7, T8]);
        $name!([T1, T2, T3, T4, T5, T6, T7, T8, T9]);
        $name!([T1, T2, T3, T4, T5, T6, T7, T8, T9, T10]);
        $name!([T1, T2, T3, T4, T5, T6, T7, T8, T9, T10, T11]);
        $name!([T1, T2, T3, T4, T5, T6, T7, T8, T9, T10, T11, T12]);
        $name!([T1, T2, T3, T4, T5, T6, T7, T8, T9, T10, T11, T12, T13]);
        $name!([T1, T2, T3, T4, T5, T6, T7, T8, T9, T10, T11, T12, T13, T14]);
        $name!([T1, T2, T3, T4, T5, T6, T7, T8, T9, T10, T11, T12, T13, T14, T15]);
        $name!([T1, T2, T3, T4, T5, T6, T7, T8, T9, T10, T11, T12, T13, T14, T15, T16]);
    };
}

/// Declares a trait object as a resolvable contract.
///
/// # Syntax
/// ```text
/// interface!(dyn Trait);
/// interface!(<T> dyn GenericTrait<T>);
/// ```
///
/// The trait must have `Send + Sync` as supertraits.
/// Generic parameters are bounded by `Send + Sync + 'static`.
#[macro_export]
macro_rules! interface {
    (< $($generic:ident),+ > dyn $($contract:tt)+) => {
        impl<$($generic: ::core::marker::Send + ::core::marker::Sync + 'static),+> $crate::Resolvable for dyn $($contract)+ {
            #[inline]
            fn descriptor() -> $crate::Type {
                $crate::Type::contract::<dyn $($contract)+>()
            }
        }
    };
    (dyn $($contract:tt)+) => {
        impl $crate::Resolvable for dyn $($contract)+ {
            #[inline]
            fn descriptor() -> $crate::Type {
                $crate::Type::contract::<dyn $($contract)+>()
            }
        }
    };
}

/// Declares a [`crate::Component`] as a resolvable concrete type.
///
/// # Syntax
/// ```text
/// component!(Type);
/// component!(<T> GenericType<T>);
/// ```
#[macro_export]
macro_rules! component {
    (< $($generic:ident),+ > $($component:tt)+) => {
        impl<$($generic: ::core::marker::Send + ::core::marker::Sync + 'static),+> $crate::Resolvable for $($component)+ {
            #[inline]
            fn descriptor() -> $crate::Type {
                $crate::Type::component::<$($component)+>()
            }
        }
    };
    ($component:ty) => {
        impl $crate::Resolvable for $component {
            #[inline]
            fn descriptor() -> $crate::Type {
                $crate::Type::component::<$component>()
            }
        }
    };
}

/// Builds the contract casts of a component inside [`crate::Component::contracts`].
///
/// ```text
/// fn contracts() -> Vec<Cast> {
///     casts![dyn Greeter, dyn Named]
/// }
/// ```
#[macro_export]
macro_rules! casts {
    ($($contract:ty),* $(,)?) => {
        ::std::vec![
            $(
                $crate::Cast::new::<Self, $contract>(
                    |this: ::std::sync::Arc<Self>| -> ::std::sync::Arc<$contract> { this }
                )
            ),*
        ]
    };
}
