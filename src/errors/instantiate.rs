use super::resolve::ResolveErrorKind;

/// Error returned by user constructors and delegate factories.
#[derive(thiserror::Error, Debug)]
pub enum InstantiateErrorKind {
    /// A nested resolution made by the factory itself failed
    #[error(transparent)]
    Resolve(Box<ResolveErrorKind>),
    #[error(transparent)]
    Custom(#[from] anyhow::Error),
}

impl From<ResolveErrorKind> for InstantiateErrorKind {
    #[inline]
    fn from(err: ResolveErrorKind) -> Self {
        Self::Resolve(Box::new(err))
    }
}
