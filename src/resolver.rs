// Copyright (c) Microsoft Corporation.
// Licensed under the MIT License.

use alloc::vec::Vec;

use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::types::TypeRef;
use crate::Rc;

type String = Rc<str>;

/// Default value of an argument.
///
/// `Empty` means no default was declared, which is distinct from a declared
/// default of `null` (`Value(serde_json::Value::Null)`).
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum DefaultValue {
    #[default]
    Empty,
    Value(serde_json::Value),
}

impl DefaultValue {
    pub fn is_empty(&self) -> bool {
        matches!(self, DefaultValue::Empty)
    }

    pub fn is_present(&self) -> bool {
        !self.is_empty()
    }

    pub fn as_value(&self) -> Option<&serde_json::Value> {
        match self {
            DefaultValue::Value(value) => Some(value),
            DefaultValue::Empty => None,
        }
    }
}

impl From<serde_json::Value> for DefaultValue {
    fn from(value: serde_json::Value) -> Self {
        DefaultValue::Value(value)
    }
}

impl Serialize for DefaultValue {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        match self {
            DefaultValue::Empty => serializer.serialize_none(),
            DefaultValue::Value(value) => value.serialize(serializer),
        }
    }
}

impl<'de> Deserialize<'de> for DefaultValue {
    /// A key that is present always yields `Value`, even when it holds
    /// `null`. Pair with `#[serde(default)]` so a missing key stays `Empty`.
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        serde_json::Value::deserialize(deserializer).map(DefaultValue::Value)
    }
}

/// One argument of a resolver.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct ArgumentSpec {
    name: String,
    #[serde(rename = "type")]
    ty: TypeRef,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    description: Option<String>,
    #[serde(default, skip_serializing_if = "DefaultValue::is_empty")]
    default_value: DefaultValue,
    /// Injected from the execution context rather than supplied by clients.
    #[serde(default, skip_serializing_if = "core::ops::Not::not")]
    context: bool,
    /// Subject to input-value mapping before the resolver sees it.
    #[serde(default, skip_serializing_if = "core::ops::Not::not")]
    mappable: bool,
}

impl ArgumentSpec {
    pub fn new(name: impl Into<String>, ty: TypeRef) -> Self {
        ArgumentSpec {
            name: name.into(),
            ty,
            description: None,
            default_value: DefaultValue::Empty,
            context: false,
            mappable: false,
        }
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn with_default(mut self, default_value: impl Into<DefaultValue>) -> Self {
        self.default_value = default_value.into();
        self
    }

    pub fn with_context(mut self, context: bool) -> Self {
        self.context = context;
        self
    }

    pub fn with_mappable(mut self, mappable: bool) -> Self {
        self.mappable = mappable;
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn ty(&self) -> &TypeRef {
        &self.ty
    }

    pub fn description(&self) -> Option<&str> {
        self.description.as_deref()
    }

    pub fn default_value(&self) -> &DefaultValue {
        &self.default_value
    }

    pub fn is_context(&self) -> bool {
        self.context
    }

    pub fn is_mappable(&self) -> bool {
        self.mappable
    }
}

/// A candidate implementation of a logical field, as discovered by
/// introspection. Immutable once built.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase", from = "ResolverDocument")]
pub struct Resolver {
    name: String,
    result_type: TypeRef,
    arguments: Vec<ArgumentSpec>,
    receiver_types: Vec<TypeRef>,
    batched: bool,
    union_source: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    description: Option<String>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
struct ResolverDocument {
    name: String,
    result_type: TypeRef,
    #[serde(default)]
    arguments: Vec<ArgumentSpec>,
    #[serde(default)]
    receiver_types: Vec<TypeRef>,
    #[serde(default)]
    batched: bool,
    #[serde(default)]
    union_source: bool,
    #[serde(default)]
    description: Option<String>,
}

impl From<ResolverDocument> for Resolver {
    fn from(document: ResolverDocument) -> Self {
        let mut resolver = Resolver::new(document.name, document.result_type)
            .with_arguments(document.arguments)
            .with_batched(document.batched)
            .with_union_source(document.union_source);
        for receiver in document.receiver_types {
            resolver = resolver.with_receiver(receiver);
        }
        if let Some(description) = document.description {
            resolver = resolver.with_description(description);
        }
        resolver
    }
}

impl Resolver {
    pub fn new(name: impl Into<String>, result_type: TypeRef) -> Self {
        Resolver {
            name: name.into(),
            result_type,
            arguments: Vec::new(),
            receiver_types: Vec::new(),
            batched: false,
            union_source: false,
            description: None,
        }
    }

    pub fn with_argument(mut self, argument: ArgumentSpec) -> Self {
        self.arguments.push(argument);
        self
    }

    pub fn with_arguments(mut self, arguments: impl IntoIterator<Item = ArgumentSpec>) -> Self {
        self.arguments.extend(arguments);
        self
    }

    /// Add a receiver type. Receivers form a set: a type that is the same
    /// type as one already present is ignored.
    pub fn with_receiver(mut self, receiver: TypeRef) -> Self {
        if !self.receiver_types.iter().any(|r| r.same_type(&receiver)) {
            self.receiver_types.push(receiver);
        }
        self
    }

    pub fn with_batched(mut self, batched: bool) -> Self {
        self.batched = batched;
        self
    }

    pub fn as_batched(self) -> Self {
        self.with_batched(true)
    }

    pub fn with_union_source(mut self, union_source: bool) -> Self {
        self.union_source = union_source;
        self
    }

    pub fn as_union_source(self) -> Self {
        self.with_union_source(true)
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn result_type(&self) -> &TypeRef {
        &self.result_type
    }

    pub fn arguments(&self) -> &[ArgumentSpec] {
        &self.arguments
    }

    pub fn argument(&self, name: &str) -> Option<&ArgumentSpec> {
        self.arguments.iter().find(|a| a.name() == name)
    }

    pub fn receiver_types(&self) -> &[TypeRef] {
        &self.receiver_types
    }

    pub fn is_batched(&self) -> bool {
        self.batched
    }

    pub fn is_union_source(&self) -> bool {
        self.union_source
    }

    pub fn description(&self) -> Option<&str> {
        self.description.as_deref()
    }
}
