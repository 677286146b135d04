// Copyright (c) Microsoft Corporation.
// Licensed under the MIT License.

use crate::Rc;
use thiserror::Error;

type String = Rc<str>;

/// Errors raised while reading types or consulting the type hierarchy.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TypeError {
    #[error("type `{name}` is not declared in the type hierarchy")]
    UnknownType { name: String },

    #[error("type `{name}` expects {expected} type parameter(s) but {actual} were supplied")]
    ArityMismatch {
        name: String,
        expected: usize,
        actual: usize,
    },

    #[error("type `{name}` is declared more than once")]
    DuplicateType { name: String },

    #[error("type `{name}` extends undeclared type `{supertype}`")]
    UnknownSupertype { name: String, supertype: String },

    #[error("type `{name}` cannot extend `{supertype}`: supertypes must be declared nominal types")]
    InvalidSupertype { name: String, supertype: String },

    #[error("type `{name}` is part of an inheritance cycle")]
    CyclicHierarchy { name: String },

    #[error("invalid type `{input}` at offset {position}: {message}")]
    Parse {
        input: String,
        position: usize,
        message: String,
    },

    #[error("invalid type hierarchy document: {message}")]
    Deserialize { message: String },
}
