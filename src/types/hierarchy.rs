// Copyright (c) Microsoft Corporation.
// Licensed under the MIT License.

use alloc::collections::{BTreeMap, BTreeSet, VecDeque};
use alloc::format;
use alloc::vec;
use alloc::vec::Vec;

use serde::{Deserialize, Serialize};

use super::{TypeError, TypeKind, TypeRef};
use crate::Rc;

type String = Rc<str>;

/// Name of the universal supertype in the built-in hierarchy.
pub const DEFAULT_TOP: &str = "Object";

/// Declaration of a nominal type.
///
/// Supertypes may refer to the declaration's own parameters:
///
/// ```json
/// { "name": "List", "params": ["T"], "extends": ["Collection<T>"] }
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct TypeDecl {
    name: String,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    params: Vec<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    extends: Vec<TypeRef>,
    /// Content-free marker such as a cloning or serialization interface.
    #[serde(default, skip_serializing_if = "core::ops::Not::not")]
    marker: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    description: Option<String>,
}

impl TypeDecl {
    pub fn new(name: impl Into<String>) -> Self {
        TypeDecl {
            name: name.into(),
            params: Vec::new(),
            extends: Vec::new(),
            marker: false,
            description: None,
        }
    }

    pub fn with_params<P: Into<String>>(mut self, params: impl IntoIterator<Item = P>) -> Self {
        self.params = params.into_iter().map(Into::into).collect();
        self
    }

    pub fn extending(mut self, supertype: TypeRef) -> Self {
        self.extends.push(supertype);
        self
    }

    pub fn as_marker(mut self) -> Self {
        self.marker = true;
        self
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn params(&self) -> &[String] {
        &self.params
    }

    pub fn extends(&self) -> &[TypeRef] {
        &self.extends
    }

    pub fn is_marker(&self) -> bool {
        self.marker
    }

    pub fn description(&self) -> Option<&str> {
        self.description.as_deref()
    }
}

/// The nominal type lattice that joins are computed in.
///
/// Every declared type without explicit supertypes extends the top type.
/// A hierarchy is validated when built and is immutable afterwards: no
/// duplicate names, no undeclared supertypes, supertype arities match their
/// declarations and there are no inheritance cycles.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(try_from = "HierarchyDocument")]
pub struct TypeHierarchy {
    top: String,
    decls: BTreeMap<String, TypeDecl>,
}

/// Serialized form of a hierarchy.
///
/// ```json
/// {
///   "top": "Object",
///   "builtins": true,
///   "types": [
///     { "name": "Pet" },
///     { "name": "Cat", "extends": ["Pet", "Serializable"] }
///   ]
/// }
/// ```
#[derive(Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
struct HierarchyDocument {
    #[serde(default)]
    top: Option<String>,
    #[serde(default = "default_builtins")]
    builtins: bool,
    #[serde(default)]
    types: Vec<TypeDecl>,
}

fn default_builtins() -> bool {
    true
}

impl TryFrom<HierarchyDocument> for TypeHierarchy {
    type Error = TypeError;

    fn try_from(document: HierarchyDocument) -> Result<Self, Self::Error> {
        let top = document.top.unwrap_or_else(|| DEFAULT_TOP.into());
        let base = if document.builtins {
            TypeHierarchy::builtin_with_top(top)
        } else {
            TypeHierarchy::new(top)
        };
        base.with_decls(document.types)
    }
}

impl Default for TypeHierarchy {
    fn default() -> Self {
        Self::builtin()
    }
}

impl TypeHierarchy {
    /// An empty hierarchy containing only the top type.
    pub fn new(top: impl Into<String>) -> Self {
        TypeHierarchy {
            top: top.into(),
            decls: BTreeMap::new(),
        }
    }

    /// Scalars, collections and the `Serializable`/`Cloneable` markers,
    /// rooted at `Object`.
    pub fn builtin() -> Self {
        Self::builtin_with_top(DEFAULT_TOP)
    }

    fn builtin_with_top(top: impl Into<String>) -> Self {
        let mut hierarchy = Self::new(top);
        for decl in builtin_decls() {
            hierarchy.decls.insert(decl.name.clone(), decl);
        }
        hierarchy
    }

    /// Add declarations and validate the resulting hierarchy.
    pub fn with_decls(mut self, decls: impl IntoIterator<Item = TypeDecl>) -> Result<Self, TypeError> {
        for decl in decls {
            if decl.name == self.top || self.decls.contains_key(&decl.name) {
                return Err(TypeError::DuplicateType { name: decl.name });
            }
            self.decls.insert(decl.name.clone(), decl);
        }
        self.validate()?;
        Ok(self)
    }

    pub fn from_json_str(json: &str) -> Result<Self, TypeError> {
        serde_json::from_str(json).map_err(|e| TypeError::Deserialize {
            message: format!("{e}").into(),
        })
    }

    pub fn from_serde_json_value(value: serde_json::Value) -> Result<Self, TypeError> {
        serde_json::from_value(value).map_err(|e| TypeError::Deserialize {
            message: format!("{e}").into(),
        })
    }

    pub fn top(&self) -> &str {
        &self.top
    }

    pub fn top_type(&self) -> TypeRef {
        TypeRef::named(self.top.clone())
    }

    pub fn get(&self, name: &str) -> Option<&TypeDecl> {
        self.decls.get(name)
    }

    pub fn contains(&self, name: &str) -> bool {
        name == &*self.top || self.decls.contains_key(name)
    }

    pub fn decls(&self) -> impl Iterator<Item = &TypeDecl> {
        self.decls.values()
    }

    pub fn len(&self) -> usize {
        self.decls.len()
    }

    pub fn is_empty(&self) -> bool {
        self.decls.is_empty()
    }

    fn decl(&self, name: &str) -> Result<&TypeDecl, TypeError> {
        self.decls
            .get(name)
            .ok_or_else(|| TypeError::UnknownType { name: name.into() })
    }

    pub fn is_top(&self, ty: &TypeRef) -> bool {
        ty.name() == Some(&*self.top)
    }

    /// Whether `ty` carries no usable shape: the top type, a marker type or
    /// an open parameter.
    pub fn is_content_free(&self, ty: &TypeRef) -> bool {
        match ty.kind() {
            TypeKind::Wildcard => true,
            TypeKind::Named { name, .. } => {
                *name == self.top || self.decls.get(name).is_some_and(TypeDecl::is_marker)
            }
            TypeKind::Union(_) => false,
        }
    }

    /// Verify every nominal type inside `ty` is declared with a matching
    /// number of parameters. Raw types (no parameters) are accepted.
    pub fn check(&self, ty: &TypeRef) -> Result<(), TypeError> {
        match ty.kind() {
            TypeKind::Named { name, params } => {
                let expected = if *name == self.top {
                    0
                } else {
                    self.decl(name)?.params.len()
                };
                if !params.is_empty() && params.len() != expected {
                    return Err(TypeError::ArityMismatch {
                        name: name.clone(),
                        expected,
                        actual: params.len(),
                    });
                }
                params.iter().try_for_each(|param| self.check(param))
            }
            TypeKind::Wildcard => Ok(()),
            TypeKind::Union(members) => members.iter().try_for_each(|member| self.check(member)),
        }
    }

    /// Erased subtyping: does `sub` equal `sup` or inherit from it?
    pub fn is_subtype_name(&self, sub: &str, sup: &str) -> bool {
        if sub == sup || sup == &*self.top {
            return true;
        }
        let mut visited = BTreeSet::new();
        let mut stack = vec![sub];
        while let Some(current) = stack.pop() {
            if !visited.insert(current) {
                continue;
            }
            let Some(decl) = self.decls.get(current) else {
                continue;
            };
            for supertype in &decl.extends {
                match supertype.name() {
                    Some(name) if name == sup => return true,
                    Some(name) => stack.push(name),
                    None => {}
                }
            }
        }
        false
    }

    /// All supertypes of `ty` instantiated with its actual parameters, in
    /// breadth-first order: `ty` itself first and the top type last. Each
    /// erased type appears once, at its first breadth-first position.
    ///
    /// `ArrayList<Int>` yields `[ArrayList<Int>, List<Int>, Cloneable,
    /// Serializable, Collection<Int>, Iterable<Int>, Object]`.
    pub fn ancestors(&self, ty: &TypeRef) -> Result<Vec<TypeRef>, TypeError> {
        let mut ancestors = Vec::new();
        if ty.name().is_none() {
            ancestors.push(self.top_type());
            return Ok(ancestors);
        }

        let mut seen: BTreeSet<String> = BTreeSet::new();
        let mut queue = VecDeque::new();
        queue.push_back(ty.without_annotations());
        while let Some(current) = queue.pop_front() {
            let TypeKind::Named { name, params } = current.kind() else {
                continue;
            };
            if *name == self.top || !seen.insert(name.clone()) {
                continue;
            }
            let decl = self.decl(name)?;
            let args = Self::instantiate(decl, params)?;
            for supertype in &decl.extends {
                queue.push_back(supertype.substitute(&decl.params, &args));
            }
            ancestors.push(TypeRef::generic(name.clone(), args));
        }
        ancestors.push(self.top_type());
        Ok(ancestors)
    }

    fn instantiate(decl: &TypeDecl, params: &[TypeRef]) -> Result<Vec<TypeRef>, TypeError> {
        if params.is_empty() {
            return Ok(decl.params.iter().map(|_| TypeRef::wildcard()).collect());
        }
        if params.len() != decl.params.len() {
            return Err(TypeError::ArityMismatch {
                name: decl.name.clone(),
                expected: decl.params.len(),
                actual: params.len(),
            });
        }
        Ok(params.to_vec())
    }

    fn validate(&self) -> Result<(), TypeError> {
        for decl in self.decls.values() {
            for supertype in &decl.extends {
                self.validate_supertype(decl, supertype)?;
            }
        }
        self.detect_cycles()
    }

    fn validate_supertype(&self, decl: &TypeDecl, supertype: &TypeRef) -> Result<(), TypeError> {
        let invalid = || TypeError::InvalidSupertype {
            name: decl.name.clone(),
            supertype: format!("{supertype}").into(),
        };
        let TypeKind::Named { name, params } = supertype.kind() else {
            return Err(invalid());
        };
        if decl.params.contains(name) && params.is_empty() {
            return Err(invalid());
        }
        if !self.contains(name) {
            return Err(TypeError::UnknownSupertype {
                name: decl.name.clone(),
                supertype: name.clone(),
            });
        }
        let expected = self.decls.get(name).map_or(0, |d| d.params.len());
        if !params.is_empty() && params.len() != expected {
            return Err(TypeError::ArityMismatch {
                name: name.clone(),
                expected,
                actual: params.len(),
            });
        }
        params
            .iter()
            .try_for_each(|param| self.validate_parameter(decl, param))
    }

    fn validate_parameter(&self, decl: &TypeDecl, param: &TypeRef) -> Result<(), TypeError> {
        match param.kind() {
            TypeKind::Named { name, params } if params.is_empty() && decl.params.contains(name) => {
                Ok(())
            }
            TypeKind::Named { name, params } => {
                if !self.contains(name) {
                    return Err(TypeError::UnknownSupertype {
                        name: decl.name.clone(),
                        supertype: name.clone(),
                    });
                }
                params
                    .iter()
                    .try_for_each(|inner| self.validate_parameter(decl, inner))
            }
            TypeKind::Wildcard => Ok(()),
            TypeKind::Union(_) => Err(TypeError::InvalidSupertype {
                name: decl.name.clone(),
                supertype: format!("{param}").into(),
            }),
        }
    }

    fn detect_cycles(&self) -> Result<(), TypeError> {
        #[derive(Clone, Copy, PartialEq)]
        enum Mark {
            Visiting,
            Done,
        }

        let mut marks: BTreeMap<&str, Mark> = BTreeMap::new();
        for root in self.decls.keys() {
            if marks.contains_key(&**root) {
                continue;
            }
            // Iterative DFS; the flag records whether children were pushed.
            let mut stack: Vec<(&str, bool)> = vec![(&**root, false)];
            while let Some((name, expanded)) = stack.pop() {
                if expanded {
                    marks.insert(name, Mark::Done);
                    continue;
                }
                match marks.get(name) {
                    Some(Mark::Done) => continue,
                    Some(Mark::Visiting) => {
                        return Err(TypeError::CyclicHierarchy { name: name.into() });
                    }
                    None => {}
                }
                marks.insert(name, Mark::Visiting);
                stack.push((name, true));
                let Some(decl) = self.decls.get(name) else {
                    continue;
                };
                for supertype in &decl.extends {
                    let Some(parent) = supertype.name() else {
                        continue;
                    };
                    match marks.get(parent) {
                        Some(Mark::Visiting) => {
                            return Err(TypeError::CyclicHierarchy { name: name.into() });
                        }
                        Some(Mark::Done) => {}
                        None => stack.push((parent, false)),
                    }
                }
            }
        }
        Ok(())
    }
}

fn builtin_decls() -> Vec<TypeDecl> {
    let var = |name: &str| TypeRef::named(name);
    let generic = |name: &str, param: &str| TypeRef::generic(name, [TypeRef::named(param)]);
    let scalar = |name: &str, supertype: &str| TypeDecl::new(name).extending(TypeRef::named(supertype));

    vec![
        TypeDecl::new("Serializable")
            .as_marker()
            .with_description("Marker for serializable values"),
        TypeDecl::new("Cloneable")
            .as_marker()
            .with_description("Marker for cloneable values"),
        scalar("Number", "Serializable"),
        scalar("Byte", "Number"),
        scalar("Short", "Number"),
        scalar("Int", "Number"),
        scalar("Long", "Number"),
        scalar("Float", "Number"),
        scalar("Double", "Number"),
        scalar("BigInteger", "Number"),
        scalar("BigDecimal", "Number"),
        scalar("Boolean", "Serializable"),
        scalar("Char", "Serializable"),
        TypeDecl::new("CharSequence"),
        scalar("String", "CharSequence").extending(var("Serializable")),
        scalar("ID", "Serializable"),
        TypeDecl::new("Iterable").with_params(["T"]),
        TypeDecl::new("Collection")
            .with_params(["T"])
            .extending(generic("Iterable", "T")),
        TypeDecl::new("List")
            .with_params(["T"])
            .extending(generic("Collection", "T")),
        TypeDecl::new("Set")
            .with_params(["T"])
            .extending(generic("Collection", "T")),
        TypeDecl::new("ArrayList")
            .with_params(["T"])
            .extending(generic("List", "T"))
            .extending(var("Cloneable"))
            .extending(var("Serializable")),
        TypeDecl::new("HashSet")
            .with_params(["T"])
            .extending(generic("Set", "T"))
            .extending(var("Cloneable"))
            .extending(var("Serializable")),
        TypeDecl::new("Optional").with_params(["T"]),
        TypeDecl::new("Map").with_params(["K", "V"]),
    ]
}
