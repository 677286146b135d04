// Copyright (c) Microsoft Corporation.
// Licensed under the MIT License.

use alloc::vec::Vec;

use log::trace;

use super::{Annotation, TypeError, TypeHierarchy, TypeKind, TypeRef};

/// How many levels of generic parameters a join reconciles before giving up
/// and leaving the parameter open.
pub const DEFAULT_MAX_JOIN_DEPTH: usize = 8;

impl TypeHierarchy {
    /// Least common supertype of `types`, ignoring their top-level
    /// annotations. See [`TypeHierarchy::join_within`].
    pub fn join(&self, types: &[TypeRef]) -> Result<TypeRef, TypeError> {
        self.join_within(types, DEFAULT_MAX_JOIN_DEPTH)
    }

    /// Least common supertype of `types`.
    ///
    /// Among the common ancestors, the ones that are not a supertype of
    /// another common ancestor are candidates; the first candidate in the
    /// first type's breadth-first ancestor order that is not content-free
    /// wins. When the winner's parameters disagree across the inputs, each
    /// parameter becomes the join of its column, or `?` when that join is
    /// content-free or `depth` levels have already been reconciled.
    ///
    /// The result may be the top type or a marker; callers decide whether
    /// that is acceptable.
    pub fn join_within(&self, types: &[TypeRef], depth: usize) -> Result<TypeRef, TypeError> {
        let types = flatten(types);
        let Some(first) = types.first() else {
            return Ok(self.top_type());
        };
        if types.iter().all(|ty| ty.same_type(first)) {
            return Ok(first.clone());
        }
        if types.iter().any(TypeRef::is_wildcard) {
            return Ok(TypeRef::wildcard());
        }

        let lineages = types
            .iter()
            .map(|ty| self.ancestors(ty))
            .collect::<Result<Vec<_>, _>>()?;
        let Some((head, rest)) = lineages.split_first() else {
            return Ok(self.top_type());
        };

        let common: Vec<&TypeRef> = head
            .iter()
            .filter(|ancestor| {
                rest.iter()
                    .all(|lineage| find_erased(lineage, erased(ancestor)).is_some())
            })
            .collect();
        let minimal: Vec<&TypeRef> = common
            .iter()
            .copied()
            .filter(|candidate| {
                !common.iter().any(|other| {
                    erased(other) != erased(candidate)
                        && self.is_subtype_name(erased(other), erased(candidate))
                })
            })
            .collect();

        let Some(chosen) = minimal
            .iter()
            .copied()
            .find(|candidate| !self.is_content_free(candidate))
            .or_else(|| minimal.first().copied())
        else {
            return Ok(self.top_type());
        };

        let name = erased(chosen);
        let instantiations: Vec<&TypeRef> = lineages
            .iter()
            .filter_map(|lineage| find_erased(lineage, name))
            .collect();
        let mut params = Vec::with_capacity(chosen.params().len());
        for idx in 0..chosen.params().len() {
            let column: Vec<TypeRef> = instantiations
                .iter()
                .filter_map(|ty| ty.params().get(idx).cloned())
                .collect();
            params.push(self.join_parameter(&column, depth)?);
        }

        let joined = TypeRef::generic(name, params);
        trace!("join of {} type(s) resolved to {joined}", types.len());
        Ok(joined)
    }

    fn join_parameter(&self, column: &[TypeRef], depth: usize) -> Result<TypeRef, TypeError> {
        if let Some(first) = column.first() {
            if column.iter().all(|ty| ty.same_type(first)) {
                return Ok(first.clone());
            }
        }
        if depth == 0 {
            return Ok(TypeRef::wildcard());
        }
        let joined = self.join_within(column, depth - 1)?;
        if self.is_content_free(&joined) {
            Ok(TypeRef::wildcard())
        } else {
            Ok(joined)
        }
    }
}

fn flatten(types: &[TypeRef]) -> Vec<TypeRef> {
    let mut flattened = Vec::with_capacity(types.len());
    for ty in types {
        match ty.kind() {
            TypeKind::Union(members) => flattened.extend(flatten(members)),
            _ => flattened.push(ty.without_annotations()),
        }
    }
    flattened
}

fn erased(ty: &TypeRef) -> &str {
    ty.name().unwrap_or_default()
}

fn find_erased<'a>(lineage: &'a [TypeRef], name: &str) -> Option<&'a TypeRef> {
    lineage.iter().find(|ty| erased(ty) == name)
}

/// Deduplicated, order-stable union of the top-level annotations of `types`.
pub(crate) fn union_annotations<'a>(types: impl IntoIterator<Item = &'a TypeRef>) -> Vec<Annotation> {
    let mut merged: Vec<Annotation> = Vec::new();
    for ty in types {
        for annotation in ty.annotations() {
            if !merged.contains(annotation) {
                merged.push(annotation.clone());
            }
        }
    }
    merged
}
