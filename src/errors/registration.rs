use crate::any::TypeInfo;

/// Errors raised synchronously by registration calls, never deferred to build or resolve time.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum RegistrationErrorKind {
    #[error("Type {implementation} doesn't implement contract {contract}")]
    ContractNotImplementedByType { contract: TypeInfo, implementation: TypeInfo },
    #[error("Type {implementation} can't be registered as itself, only concrete components can")]
    InvalidRegistration { implementation: TypeInfo },
}
