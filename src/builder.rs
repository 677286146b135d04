// Copyright (c) Microsoft Corporation.
// Licensed under the MIT License.

//! Unification of overloaded resolvers into one [`Operation`].
//!
//! The work is split across a couple of files so each rule stays focused:
//!
//! * `result_type.rs` picks the result type (join or union).
//! * `arguments.rs` merges argument lists by name.
//! * `context.rs` checks that every overload shares one receiver set.
//! * `options.rs` holds the knobs callers can tune.

use log::debug;

use crate::error::OperationError;
use crate::operation::Operation;
use crate::resolver::Resolver;
use crate::types::TypeHierarchy;
use crate::Rc;

mod arguments;
mod context;
mod options;
mod result_type;

pub use options::{ArgumentOrder, BuilderOptions};


/// Builds operations from groups of resolvers that share a name.
///
/// Callers group resolvers by name before invoking a builder; the name of the
/// first resolver names the operation and the rest are not re-checked.
pub trait OperationBuilder {
    fn build_query(&self, resolvers: &[Resolver]) -> Result<Operation, OperationError>;

    /// Mutations currently follow exactly the same rules as queries.
    /// Implementations may override this to add mutation-only constraints.
    fn build_mutation(&self, resolvers: &[Resolver]) -> Result<Operation, OperationError> {
        self.build_query(resolvers)
    }
}

/// The standard [`OperationBuilder`], computing joins in a shared
/// [`TypeHierarchy`].
///
/// The builder holds no mutable state. With the `arc` feature it is
/// `Send + Sync`, so independent operations can be built from several
/// threads at once.
#[derive(Debug, Clone)]
pub struct DefaultOperationBuilder {
    hierarchy: Rc<TypeHierarchy>,
    options: BuilderOptions,
}

impl Default for DefaultOperationBuilder {
    fn default() -> Self {
        Self::new(TypeHierarchy::builtin())
    }
}

impl DefaultOperationBuilder {
    pub fn new(hierarchy: TypeHierarchy) -> Self {
        Self::from_shared(Rc::new(hierarchy))
    }

    pub fn from_shared(hierarchy: Rc<TypeHierarchy>) -> Self {
        DefaultOperationBuilder {
            hierarchy,
            options: BuilderOptions::default(),
        }
    }

    pub fn with_options(mut self, options: BuilderOptions) -> Self {
        self.options = options;
        self
    }

    pub fn hierarchy(&self) -> &TypeHierarchy {
        &self.hierarchy
    }

    pub fn options(&self) -> &BuilderOptions {
        &self.options
    }

    fn is_batched(resolvers: &[Resolver]) -> bool {
        resolvers.iter().any(Resolver::is_batched)
    }

    /// Every type a resolver mentions must be declared in the hierarchy,
    /// even when all overloads agree and no join is needed.
    fn check_types(&self, operation: &str, resolvers: &[Resolver]) -> Result<(), OperationError> {
        for resolver in resolvers {
            let types = core::iter::once(resolver.result_type())
                .chain(resolver.receiver_types())
                .chain(resolver.arguments().iter().map(|argument| argument.ty()));
            for ty in types {
                self.hierarchy
                    .check(ty)
                    .map_err(OperationError::type_error(operation))?;
            }
        }
        Ok(())
    }
}

impl OperationBuilder for DefaultOperationBuilder {
    fn build_query(&self, resolvers: &[Resolver]) -> Result<Operation, OperationError> {
        let Some(first) = resolvers.first() else {
            return Err(OperationError::EmptyResolverSet);
        };
        let name = first.name();
        debug!(
            "building operation `{name}` from {} resolver(s)",
            resolvers.len()
        );

        self.check_types(name, resolvers)?;
        let result_type = self.resolve_result_type(name, resolvers)?;
        let receiver_types = Self::resolve_receiver_types(name, resolvers)?;
        let arguments = self.collect_arguments(name, resolvers)?;
        let batched = Self::is_batched(resolvers);

        debug!(
            "operation `{name}` resolves to {result_type} with {} argument(s)",
            arguments.len()
        );
        Ok(Operation::new(
            name.into(),
            result_type,
            receiver_types,
            arguments,
            batched,
            resolvers.to_vec(),
        ))
    }
}
