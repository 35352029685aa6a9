use crate::lifecycle::LifecycleKind;

/// Config of a registration
/// ## Fields
/// - `lifecycle`:
///   Reuse policy of the registration. `None` falls back to the builder default, which is
///   [`LifecycleKind::Transient`] unless changed with [`crate::ContainerBuilder::default_lifecycle`].
/// - `name`:
///   Registrations with a name are only resolved by named requests.
/// - `group`:
///   Tag checked by the builder group filter before the registration is committed.
#[derive(Debug, Clone, Default)]
pub struct Config {
    pub lifecycle: Option<LifecycleKind>,
    pub name: Option<String>,
    pub group: Option<String>,
}

impl Config {
    #[inline]
    #[must_use]
    pub const fn new() -> Self {
        Self {
            lifecycle: None,
            name: None,
            group: None,
        }
    }

    #[inline]
    #[must_use]
    pub fn lifecycle(self, lifecycle: LifecycleKind) -> Self {
        Self {
            lifecycle: Some(lifecycle),
            ..self
        }
    }

    #[inline]
    #[must_use]
    pub fn name(self, name: impl Into<String>) -> Self {
        Self {
            name: Some(name.into()),
            ..self
        }
    }

    #[inline]
    #[must_use]
    pub fn group(self, group: impl Into<String>) -> Self {
        Self {
            group: Some(group.into()),
            ..self
        }
    }

    #[inline]
    #[must_use]
    pub fn transient() -> Self {
        Self::new().lifecycle(LifecycleKind::Transient)
    }

    #[inline]
    #[must_use]
    pub fn singleton() -> Self {
        Self::new().lifecycle(LifecycleKind::Singleton)
    }

    #[inline]
    #[must_use]
    pub fn thread_singleton() -> Self {
        Self::new().lifecycle(LifecycleKind::ThreadSingleton)
    }
}
