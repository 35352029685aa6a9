use core::fmt::{self, Display, Formatter};

use super::{instantiate::InstantiateErrorKind, instantiator::InstantiatorErrorKind};
use crate::any::TypeInfo;

#[derive(thiserror::Error, Debug)]
pub enum ResolveErrorKind {
    #[error("Registration for {contract}{} not found", DisplayName(.name.as_deref()))]
    RegistrationNotFound { contract: TypeInfo, name: Option<String> },
    #[error("Resolution of {implementation} failed: {reason}")]
    ResolutionFailed { implementation: TypeInfo, reason: FailureReason },
    #[error("Incorrect instance type. Actual: {actual}, expected: {expected}")]
    IncorrectType { expected: TypeInfo, actual: TypeInfo },
    #[error("Argument of type {expected} is missing")]
    MissingArgument { expected: TypeInfo },
    #[error("Cyclic dependency detected: {}", DisplayPath(.path))]
    CyclicDependency { path: Vec<TypeInfo> },
    #[error("No active scope to resolve scoped {contract}")]
    NoActiveScope { contract: TypeInfo },
    #[error("Container was dropped before the factory was called")]
    ContainerDropped,
    #[error(transparent)]
    Instantiator(InstantiatorErrorKind<Box<ResolveErrorKind>, InstantiateErrorKind>),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailureReason {
    /// None of the declared constructors has every parameter resolvable
    NoSatisfiableConstructor,
    ArgumentCountMismatch { expected: usize, actual: usize },
}

impl Display for FailureReason {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            Self::NoSatisfiableConstructor => f.write_str("no constructor with satisfiable parameters"),
            Self::ArgumentCountMismatch { expected, actual } => {
                write!(f, "collected {actual} arguments, constructor expects {expected}")
            }
        }
    }
}

struct DisplayName<'a>(Option<&'a str>);

impl Display for DisplayName<'_> {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self.0 {
            Some(name) => write!(f, " named {name:?}"),
            None => Ok(()),
        }
    }
}

struct DisplayPath<'a>(&'a [TypeInfo]);

impl Display for DisplayPath<'_> {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        for (index, type_info) in self.0.iter().enumerate() {
            if index != 0 {
                f.write_str(" -> ")?;
            }
            f.write_str(type_info.short_name())?;
        }
        Ok(())
    }
}
