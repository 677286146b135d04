// Copyright (c) Microsoft Corporation.
// Licensed under the MIT License.

use alloc::collections::BTreeMap;
use alloc::vec;
use alloc::vec::Vec;

use log::trace;

use super::{ArgumentOrder, DefaultOperationBuilder};
use crate::error::OperationError;
use crate::resolver::{ArgumentSpec, Resolver};
use crate::types::{union_annotations, TypeRef};

impl DefaultOperationBuilder {
    /// One merged argument per distinct argument name across all overloads.
    pub(crate) fn collect_arguments(
        &self,
        operation: &str,
        resolvers: &[Resolver],
    ) -> Result<Vec<ArgumentSpec>, OperationError> {
        let mut groups: Vec<(&str, Vec<&ArgumentSpec>)> = Vec::new();
        let mut slots: BTreeMap<&str, usize> = BTreeMap::new();
        for argument in resolvers.iter().flat_map(Resolver::arguments) {
            match slots.get(argument.name()).and_then(|&slot| groups.get_mut(slot)) {
                Some((_, group)) => group.push(argument),
                None => {
                    slots.insert(argument.name(), groups.len());
                    groups.push((argument.name(), vec![argument]));
                }
            }
        }

        if self.options.argument_order == ArgumentOrder::Alphabetical {
            groups.sort_by(|(left, _), (right, _)| left.cmp(right));
        }

        groups
            .into_iter()
            .map(|(name, group)| self.merge_argument(operation, name, &group))
            .collect()
    }

    /// Merge the declarations of one argument name, scanning them in
    /// resolver order: the type is their join and carries every annotation
    /// any declaration has, the first non-empty description and the first
    /// present default win, and the context/mappable flags are set if any
    /// declaration sets them.
    fn merge_argument(
        &self,
        operation: &str,
        name: &str,
        group: &[&ArgumentSpec],
    ) -> Result<ArgumentSpec, OperationError> {
        let types: Vec<TypeRef> = group.iter().map(|argument| argument.ty().clone()).collect();
        let ty = self
            .hierarchy
            .join_within(&types, self.options.max_join_depth)
            .map_err(OperationError::type_error(operation))?
            .with_annotations(union_annotations(group.iter().map(|argument| argument.ty())));

        let description = group
            .iter()
            .filter_map(|argument| argument.description())
            .find(|description| !description.is_empty());
        let default_value = group
            .iter()
            .map(|argument| argument.default_value())
            .find(|default_value| default_value.is_present())
            .cloned()
            .unwrap_or_default();

        trace!(
            "argument `{name}` of `{operation}` merged from {} declaration(s) into {ty}",
            group.len()
        );

        let mut merged = ArgumentSpec::new(name, ty)
            .with_default(default_value)
            .with_context(group.iter().any(|argument| argument.is_context()))
            .with_mappable(group.iter().any(|argument| argument.is_mappable()));
        if let Some(description) = description {
            merged = merged.with_description(description);
        }
        Ok(merged)
    }
}
