// Copyright (c) Microsoft Corporation.
// Licensed under the MIT License.

use alloc::vec::Vec;

use log::{debug, trace};

use super::DefaultOperationBuilder;
use crate::error::OperationError;
use crate::resolver::Resolver;
use crate::types::{union_annotations, TypeRef};

impl DefaultOperationBuilder {
    /// Result type shared by all overloads.
    ///
    /// A union over the distinct declared types when any overload asks for
    /// one, otherwise their join. A join that only lands on the top type, a
    /// marker or an open parameter means the overloads have nothing in
    /// common and is rejected. Either way the unified type carries every
    /// annotation declared on a contributing result type.
    pub(crate) fn resolve_result_type(
        &self,
        operation: &str,
        resolvers: &[Resolver],
    ) -> Result<TypeRef, OperationError> {
        let declared: Vec<TypeRef> = resolvers
            .iter()
            .map(|resolver| resolver.result_type().clone())
            .collect();
        let annotations = union_annotations(&declared);

        if resolvers.iter().any(Resolver::is_union_source) {
            let union = TypeRef::union(declared.iter().cloned()).with_annotations(annotations);
            trace!("operation `{operation}` unionizes its result types into {union}");
            return Ok(union);
        }

        let joined = self
            .hierarchy
            .join_within(&declared, self.options.max_join_depth)
            .map_err(OperationError::type_error(operation))?;
        if self.hierarchy.is_content_free(&joined) {
            debug!("operation `{operation}` rejected: result types only share {joined}");
            return Err(OperationError::IncompatibleOperationTypes {
                operation: operation.into(),
                types: declared,
                join: joined,
            });
        }
        Ok(joined.with_annotations(annotations))
    }
}
