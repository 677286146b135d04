// Copyright (c) Microsoft Corporation.
// Licensed under the MIT License.

use alloc::collections::BTreeMap;
use alloc::vec;
use alloc::vec::Vec;

use log::info;
use serde::Serialize;

use crate::builder::OperationBuilder;
use crate::error::OperationError;
use crate::operation::Operation;
use crate::resolver::Resolver;
use crate::Rc;

type String = Rc<str>;

/// Group resolvers by name, keeping the order in which each name first
/// appears and the order of resolvers within a group.
pub fn group_by_name(
    resolvers: impl IntoIterator<Item = Resolver>,
) -> Vec<(String, Vec<Resolver>)> {
    let mut groups: Vec<(String, Vec<Resolver>)> = Vec::new();
    let mut slots: BTreeMap<String, usize> = BTreeMap::new();
    for resolver in resolvers {
        match slots.get(resolver.name()).and_then(|&slot| groups.get_mut(slot)) {
            Some((_, group)) => group.push(resolver),
            None => {
                let name: String = resolver.name().into();
                slots.insert(name.clone(), groups.len());
                groups.push((name, vec![resolver]));
            }
        }
    }
    groups
}

/// Every query and mutation of a schema, each unified from its overloads.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct OperationSet {
    queries: Vec<Operation>,
    mutations: Vec<Operation>,
}

impl OperationSet {
    /// Group both resolver lists by name and unify each group with
    /// `builder`. The first group that cannot be unified aborts the build.
    pub fn build<B>(
        builder: &B,
        queries: impl IntoIterator<Item = Resolver>,
        mutations: impl IntoIterator<Item = Resolver>,
    ) -> Result<Self, OperationError>
    where
        B: OperationBuilder + ?Sized,
    {
        let queries = group_by_name(queries)
            .into_iter()
            .map(|(_, group)| builder.build_query(&group))
            .collect::<Result<Vec<_>, _>>()?;
        let mutations = group_by_name(mutations)
            .into_iter()
            .map(|(_, group)| builder.build_mutation(&group))
            .collect::<Result<Vec<_>, _>>()?;
        info!(
            "built {} query and {} mutation operation(s)",
            queries.len(),
            mutations.len()
        );
        Ok(OperationSet { queries, mutations })
    }

    pub fn queries(&self) -> &[Operation] {
        &self.queries
    }

    pub fn mutations(&self) -> &[Operation] {
        &self.mutations
    }

    pub fn query(&self, name: &str) -> Option<&Operation> {
        self.queries.iter().find(|op| op.name() == name)
    }

    pub fn mutation(&self, name: &str) -> Option<&Operation> {
        self.mutations.iter().find(|op| op.name() == name)
    }

    pub fn len(&self) -> usize {
        self.queries.len() + self.mutations.len()
    }

    pub fn is_empty(&self) -> bool {
        self.queries.is_empty() && self.mutations.is_empty()
    }
}
