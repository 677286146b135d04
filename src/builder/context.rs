// Copyright (c) Microsoft Corporation.
// Licensed under the MIT License.

use alloc::vec::Vec;

use super::DefaultOperationBuilder;
use crate::error::OperationError;
use crate::resolver::Resolver;
use crate::types::TypeRef;

impl DefaultOperationBuilder {
    /// The receiver set every overload is invoked against. All resolvers
    /// must declare the same set; the first resolver's order is kept.
    pub(crate) fn resolve_receiver_types(
        operation: &str,
        resolvers: &[Resolver],
    ) -> Result<Vec<TypeRef>, OperationError> {
        let Some((first, rest)) = resolvers.split_first() else {
            return Ok(Vec::new());
        };
        let expected = first.receiver_types();
        for (offset, resolver) in rest.iter().enumerate() {
            let found = resolver.receiver_types();
            if !same_set(expected, found) {
                return Err(OperationError::InconsistentContext {
                    operation: operation.into(),
                    expected: expected.to_vec(),
                    resolver: offset + 1,
                    found: found.to_vec(),
                });
            }
        }
        Ok(expected.to_vec())
    }
}

// Receiver lists hold no duplicates, so equal length plus containment is
// set equality.
fn same_set(expected: &[TypeRef], found: &[TypeRef]) -> bool {
    expected.len() == found.len()
        && expected
            .iter()
            .all(|ty| found.iter().any(|other| other.same_type(ty)))
}
