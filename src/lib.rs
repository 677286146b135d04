// Copyright (c) Microsoft Corporation.
// Licensed under the MIT License.

// Use README.md as crate documentation.
#![doc = include_str!(concat!(env!("CARGO_MANIFEST_DIR"), "/README.md"))]
#![no_std]

extern crate alloc;

#[cfg(any(feature = "std", test))]
extern crate std;

#[cfg(feature = "arc")]
pub use alloc::sync::Arc as Rc;

#[cfg(not(feature = "arc"))]
pub use alloc::rc::Rc;

mod builder;
mod error;
mod operation;
mod operation_set;
mod resolver;
pub mod types;

pub use builder::{ArgumentOrder, BuilderOptions, DefaultOperationBuilder, OperationBuilder};
pub use error::OperationError;
pub use operation::Operation;
pub use operation_set::{group_by_name, OperationSet};
pub use resolver::{ArgumentSpec, DefaultValue, Resolver};
pub use types::{
    Annotation, TypeDecl, TypeError, TypeHierarchy, TypeKind, TypeRef, DEFAULT_MAX_JOIN_DEPTH,
};

#[cfg(test)]
mod tests;
