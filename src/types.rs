// Copyright (c) Microsoft Corporation.
// Licensed under the MIT License.

//! Type descriptors for resolver signatures.
//!
//! Introspection hands the unifier fully reconstructed types: generic
//! parameters are already resolved and declaration-site annotations are
//! attached to the node they were written on. This module keeps that tree
//! explicit so joins and unions are pure functions over it.
//!
//! * `TypeRef` is the descriptor itself: a [`TypeKind`] plus annotations.
//! * `hierarchy.rs` holds the nominal lattice the descriptors live in.
//! * `join.rs` computes least common supertypes over that lattice.
//! * `parser.rs` reads the textual syntax (`Map<String, List<@NonNull Int>>`)
//!   used by configuration documents and fixtures.

use alloc::collections::BTreeMap;
use alloc::string::String as StdString;
use alloc::vec::Vec;
use core::fmt;
use core::str::FromStr;

use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::Rc;

type String = Rc<str>;

pub mod error;
pub mod hierarchy;
mod join;
mod parser;

pub use error::TypeError;
pub use hierarchy::{TypeDecl, TypeHierarchy, DEFAULT_TOP};
pub use join::DEFAULT_MAX_JOIN_DEPTH;
pub(crate) use join::union_annotations;


/// A declaration-site annotation attached to a type, e.g. `@NonNull`.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct Annotation {
    name: String,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    values: BTreeMap<String, serde_json::Value>,
}

impl Annotation {
    pub fn new(name: impl Into<String>) -> Self {
        Annotation {
            name: name.into(),
            values: BTreeMap::new(),
        }
    }

    pub fn with_value(mut self, key: impl Into<String>, value: impl Into<serde_json::Value>) -> Self {
        self.values.insert(key.into(), value.into());
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn values(&self) -> &BTreeMap<String, serde_json::Value> {
        &self.values
    }

    pub fn value(&self, key: &str) -> Option<&serde_json::Value> {
        self.values.get(key)
    }
}

impl fmt::Display for Annotation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "@{}", self.name)?;
        if self.values.is_empty() {
            return Ok(());
        }
        f.write_str("(")?;
        for (idx, (key, value)) in self.values.iter().enumerate() {
            if idx > 0 {
                f.write_str(", ")?;
            }
            if parser::is_name(key) {
                write!(f, "{key} = {value}")?;
            } else {
                write!(f, "{} = {value}", serde_json::Value::from(&**key))?;
            }
        }
        f.write_str(")")
    }
}

/// Shape of a type descriptor.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TypeKind {
    /// A nominal type with its generic parameters, e.g. `Map<String, Int>`.
    /// A declared generic type used with no parameters is a raw type.
    Named { name: String, params: Vec<TypeRef> },
    /// An open generic parameter, written `?`.
    Wildcard,
    /// One of a fixed set of types. Only produced by unification.
    Union(Vec<TypeRef>),
}

/// A type descriptor: a [`TypeKind`] plus the annotations declared on it.
///
/// Equality (`==`) is structural and includes annotations at every level.
/// Use [`TypeRef::same_type`] to compare while ignoring annotations.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TypeRef {
    kind: TypeKind,
    annotations: Vec<Annotation>,
}

impl TypeRef {
    pub fn named(name: impl Into<String>) -> Self {
        Self::generic(name, Vec::new())
    }

    pub fn generic(name: impl Into<String>, params: impl IntoIterator<Item = TypeRef>) -> Self {
        TypeRef {
            kind: TypeKind::Named {
                name: name.into(),
                params: params.into_iter().collect(),
            },
            annotations: Vec::new(),
        }
    }

    pub fn wildcard() -> Self {
        TypeRef {
            kind: TypeKind::Wildcard,
            annotations: Vec::new(),
        }
    }

    /// Create a union over `members`. Nested unions are flattened and members
    /// that are the same type as an earlier member are dropped, so the result
    /// is order-stable by first appearance.
    pub fn union(members: impl IntoIterator<Item = TypeRef>) -> Self {
        let mut distinct: Vec<TypeRef> = Vec::new();
        for member in members {
            let flattened = match member {
                TypeRef {
                    kind: TypeKind::Union(inner),
                    ..
                } => inner,
                other => alloc::vec![other],
            };
            for ty in flattened {
                if !distinct.iter().any(|seen| seen.same_type(&ty)) {
                    distinct.push(ty);
                }
            }
        }
        TypeRef {
            kind: TypeKind::Union(distinct),
            annotations: Vec::new(),
        }
    }

    /// Attach an annotation unless an equal one is already present.
    pub fn with_annotation(mut self, annotation: Annotation) -> Self {
        if !self.annotations.contains(&annotation) {
            self.annotations.push(annotation);
        }
        self
    }

    pub fn with_annotations(self, annotations: impl IntoIterator<Item = Annotation>) -> Self {
        annotations
            .into_iter()
            .fold(self, |ty, annotation| ty.with_annotation(annotation))
    }

    /// The same type with its top-level annotations removed. Annotations on
    /// generic parameters and union members are kept.
    pub fn without_annotations(&self) -> Self {
        TypeRef {
            kind: self.kind.clone(),
            annotations: Vec::new(),
        }
    }

    pub fn kind(&self) -> &TypeKind {
        &self.kind
    }

    pub fn annotations(&self) -> &[Annotation] {
        &self.annotations
    }

    pub fn has_annotation(&self, name: &str) -> bool {
        self.annotations.iter().any(|a| a.name() == name)
    }

    /// Erased name of a nominal type.
    pub fn name(&self) -> Option<&str> {
        match &self.kind {
            TypeKind::Named { name, .. } => Some(&**name),
            _ => None,
        }
    }

    pub fn params(&self) -> &[TypeRef] {
        match &self.kind {
            TypeKind::Named { params, .. } => params.as_slice(),
            _ => &[],
        }
    }

    pub fn union_members(&self) -> Option<&[TypeRef]> {
        match &self.kind {
            TypeKind::Union(members) => Some(members.as_slice()),
            _ => None,
        }
    }

    pub fn is_wildcard(&self) -> bool {
        matches!(self.kind, TypeKind::Wildcard)
    }

    pub fn is_union(&self) -> bool {
        matches!(self.kind, TypeKind::Union(_))
    }

    /// Structural equality ignoring annotations at every level.
    pub fn same_type(&self, other: &TypeRef) -> bool {
        match (&self.kind, &other.kind) {
            (
                TypeKind::Named { name, params },
                TypeKind::Named {
                    name: other_name,
                    params: other_params,
                },
            ) => name == other_name && same_types(params, other_params),
            (TypeKind::Wildcard, TypeKind::Wildcard) => true,
            (TypeKind::Union(members), TypeKind::Union(other_members)) => {
                same_types(members, other_members)
            }
            _ => false,
        }
    }

    /// Replace the type variables `vars` with `args`. A variable is a named
    /// type without parameters whose name is one of `vars`.
    pub(crate) fn substitute(&self, vars: &[String], args: &[TypeRef]) -> TypeRef {
        match &self.kind {
            TypeKind::Named { name, params } if params.is_empty() => {
                match vars.iter().position(|var| var == name) {
                    Some(idx) => args.get(idx).cloned().unwrap_or_else(TypeRef::wildcard),
                    None => self.clone(),
                }
            }
            TypeKind::Named { name, params } => TypeRef {
                kind: TypeKind::Named {
                    name: name.clone(),
                    params: params.iter().map(|p| p.substitute(vars, args)).collect(),
                },
                annotations: self.annotations.clone(),
            },
            TypeKind::Wildcard => self.clone(),
            TypeKind::Union(members) => TypeRef {
                kind: TypeKind::Union(members.iter().map(|m| m.substitute(vars, args)).collect()),
                annotations: self.annotations.clone(),
            },
        }
    }
}

fn same_types(left: &[TypeRef], right: &[TypeRef]) -> bool {
    left.len() == right.len() && left.iter().zip(right).all(|(l, r)| l.same_type(r))
}

impl fmt::Display for TypeRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for annotation in &self.annotations {
            write!(f, "{annotation} ")?;
        }
        match &self.kind {
            TypeKind::Named { name, params } => {
                f.write_str(name)?;
                if !params.is_empty() {
                    f.write_str("<")?;
                    write_joined(f, params, ", ")?;
                    f.write_str(">")?;
                }
                Ok(())
            }
            TypeKind::Wildcard => f.write_str("?"),
            TypeKind::Union(members) => {
                f.write_str("union[")?;
                write_joined(f, members, " | ")?;
                f.write_str("]")
            }
        }
    }
}

fn write_joined(f: &mut fmt::Formatter<'_>, types: &[TypeRef], separator: &str) -> fmt::Result {
    for (idx, ty) in types.iter().enumerate() {
        if idx > 0 {
            f.write_str(separator)?;
        }
        write!(f, "{ty}")?;
    }
    Ok(())
}

impl FromStr for TypeRef {
    type Err = TypeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        parser::parse_type(s)
    }
}

impl Serialize for TypeRef {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for TypeRef {
    /// Accepts either the textual syntax (`"List<@NonNull Int>"`) or a
    /// detailed map for annotations that carry values:
    ///
    /// ```json
    /// { "type": "String", "annotations": [{ "name": "Size", "values": { "max": 32 } }] }
    /// ```
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        #[derive(Deserialize)]
        #[serde(deny_unknown_fields)]
        struct Detailed {
            #[serde(rename = "type")]
            ty: StdString,
            #[serde(default)]
            annotations: Vec<Annotation>,
        }

        #[derive(Deserialize)]
        #[serde(untagged)]
        enum Repr {
            Text(StdString),
            Detailed(Detailed),
        }

        match Repr::deserialize(deserializer)? {
            Repr::Text(text) => parser::parse_type(&text).map_err(serde::de::Error::custom),
            Repr::Detailed(detailed) => parser::parse_type(&detailed.ty)
                .map(|ty| ty.with_annotations(detailed.annotations))
                .map_err(serde::de::Error::custom),
        }
    }
}
