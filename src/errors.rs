mod instantiate;
mod instantiator;
mod registration;
mod resolve;

pub use instantiate::InstantiateErrorKind;
pub use instantiator::InstantiatorErrorKind;
pub use registration::RegistrationErrorKind;
pub use resolve::{FailureReason, ResolveErrorKind};

/// Return type of user constructors and delegate factories.
pub type InstantiatorResult<T> = Result<T, InstantiateErrorKind>;
