// Copyright (c) Microsoft Corporation.
// Licensed under the MIT License.

use alloc::collections::BTreeSet;
use alloc::vec::Vec;

use serde::Serialize;

use crate::resolver::{ArgumentSpec, Resolver};
use crate::types::TypeRef;
use crate::Rc;

type String = Rc<str>;

/// The unified, schema-facing descriptor of one query or mutation field.
///
/// Built once per logical field by an [`OperationBuilder`](crate::OperationBuilder)
/// and never mutated afterwards.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Operation {
    name: String,
    result_type: TypeRef,
    receiver_types: Vec<TypeRef>,
    arguments: Vec<ArgumentSpec>,
    batched: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    description: Option<String>,
    #[serde(skip)]
    resolvers: Vec<Resolver>,
}

impl Operation {
    pub(crate) fn new(
        name: String,
        result_type: TypeRef,
        receiver_types: Vec<TypeRef>,
        arguments: Vec<ArgumentSpec>,
        batched: bool,
        resolvers: Vec<Resolver>,
    ) -> Self {
        let description = resolvers
            .iter()
            .filter_map(Resolver::description)
            .find(|d| !d.is_empty())
            .map(Into::into);
        Operation {
            name,
            result_type,
            receiver_types,
            arguments,
            batched,
            description,
            resolvers,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn result_type(&self) -> &TypeRef {
        &self.result_type
    }

    pub fn receiver_types(&self) -> &[TypeRef] {
        &self.receiver_types
    }

    pub fn arguments(&self) -> &[ArgumentSpec] {
        &self.arguments
    }

    pub fn argument(&self, name: &str) -> Option<&ArgumentSpec> {
        self.arguments.iter().find(|a| a.name() == name)
    }

    pub fn is_batched(&self) -> bool {
        self.batched
    }

    /// First non-empty description among the contributing resolvers.
    pub fn description(&self) -> Option<&str> {
        self.description.as_deref()
    }

    /// Contributing resolvers, in the order they were supplied.
    pub fn resolvers(&self) -> &[Resolver] {
        &self.resolvers
    }

    pub fn is_overloaded(&self) -> bool {
        self.resolvers.len() > 1
    }

    /// The overload that handles a request supplying exactly
    /// `argument_names`. Context arguments are not supplied by clients and
    /// are ignored. An operation with a single resolver always answers with
    /// it.
    pub fn resolver_for(&self, argument_names: &[&str]) -> Option<&Resolver> {
        let requested: BTreeSet<&str> = argument_names.iter().copied().collect();
        self.resolvers
            .iter()
            .find(|resolver| client_arguments(resolver) == requested)
            .or_else(|| match self.resolvers.as_slice() {
                [only] => Some(only),
                _ => None,
            })
    }
}

fn client_arguments(resolver: &Resolver) -> BTreeSet<&str> {
    resolver
        .arguments()
        .iter()
        .filter(|argument| !argument.is_context())
        .map(ArgumentSpec::name)
        .collect()
}
