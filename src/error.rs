// Copyright (c) Microsoft Corporation.
// Licensed under the MIT License.

use alloc::string::{String as StdString, ToString};
use alloc::vec::Vec;

use thiserror::Error;

use crate::types::{TypeError, TypeRef};
use crate::Rc;

type String = Rc<str>;

/// Reasons an overload set cannot be unified into one operation. Every
/// variant aborts schema construction.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum OperationError {
    #[error("cannot build an operation from an empty resolver set")]
    EmptyResolverSet,

    #[error(
        "resolvers for operation `{operation}` do not return compatible types: [{}] only share `{join}`",
        display_types(.types)
    )]
    IncompatibleOperationTypes {
        operation: String,
        types: Vec<TypeRef>,
        join: TypeRef,
    },

    #[error(
        "resolvers for operation `{operation}` expect different receiver types: resolver 0 expects [{}] but resolver {resolver} expects [{}]",
        display_types(.expected),
        display_types(.found)
    )]
    InconsistentContext {
        operation: String,
        expected: Vec<TypeRef>,
        resolver: usize,
        found: Vec<TypeRef>,
    },

    #[error("operation `{operation}`: {source}")]
    Type {
        operation: String,
        #[source]
        source: TypeError,
    },
}

impl OperationError {
    /// Name of the operation the error was raised for.
    pub fn operation(&self) -> Option<&str> {
        match self {
            OperationError::EmptyResolverSet => None,
            OperationError::IncompatibleOperationTypes { operation, .. }
            | OperationError::InconsistentContext { operation, .. }
            | OperationError::Type { operation, .. } => Some(&**operation),
        }
    }

    pub(crate) fn type_error(operation: &str) -> impl FnOnce(TypeError) -> OperationError + '_ {
        move |source| OperationError::Type {
            operation: operation.into(),
            source,
        }
    }
}

fn display_types(types: &[TypeRef]) -> StdString {
    types
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(", ")
}
