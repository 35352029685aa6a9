use core::{iter, marker::PhantomData};
use std::cell::RefCell;

use tracing::debug;

use crate::{errors::ResolveErrorKind, registration::Identity};

thread_local! {
    static RESOLUTION_STACK: RefCell<Vec<(usize, Identity)>> = const { RefCell::new(Vec::new()) };
}

/// Marks an identity as being resolved on the current thread until the guard drops.
///
/// Entering an identity that is already being resolved by the same container fails with
/// [`ResolveErrorKind::CyclicDependency`] instead of recursing forever.
pub(crate) struct ResolutionGuard {
    _not_send: PhantomData<*const ()>,
}

impl ResolutionGuard {
    pub(crate) fn enter(container: usize, identity: &Identity) -> Result<Self, ResolveErrorKind> {
        RESOLUTION_STACK.with(|stack| {
            let mut stack = stack.borrow_mut();
            if let Some(start) = stack
                .iter()
                .position(|(owner, active)| *owner == container && active == identity)
            {
                let path = stack[start..]
                    .iter()
                    .filter(|(owner, _)| *owner == container)
                    .map(|(_, active)| *active.contract())
                    .chain(iter::once(*identity.contract()))
                    .collect::<Vec<_>>();
                debug!(%identity, depth = path.len(), "Cyclic dependency");
                return Err(ResolveErrorKind::CyclicDependency { path });
            }

            stack.push((container, identity.clone()));
            Ok(Self { _not_send: PhantomData })
        })
    }
}

impl Drop for ResolutionGuard {
    fn drop(&mut self) {
        let _ = RESOLUTION_STACK.try_with(|stack| stack.borrow_mut().pop());
    }
}
