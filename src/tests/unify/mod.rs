// Copyright (c) Microsoft Corporation.
// Licensed under the MIT License.

use crate::builder::{BuilderOptions, DefaultOperationBuilder, OperationBuilder};
use crate::error::OperationError;
use crate::operation::Operation;
use crate::resolver::Resolver;
use crate::types::{TypeHierarchy, TypeRef};

use alloc::{format, string::String, vec::Vec};
use anyhow::{anyhow, bail, Context, Result};
use serde::Deserialize;
use test_generator::test_resources;

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct UnifyYamlTest {
    cases: Vec<UnifyCase>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
enum OperationKind {
    #[default]
    Query,
    Mutation,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct UnifyCase {
    note: String,
    #[serde(default)]
    hierarchy: Option<TypeHierarchy>,
    #[serde(default)]
    options: BuilderOptions,
    #[serde(default)]
    kind: OperationKind,
    resolvers: Vec<Resolver>,
    #[serde(default)]
    want: Option<OperationExpectation>,
    #[serde(default)]
    error: Option<ErrorExpectation>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
struct OperationExpectation {
    #[serde(default)]
    name: Option<String>,
    /// Compared with `==`, so annotations must match too.
    #[serde(default)]
    result_type: Option<TypeRef>,
    #[serde(default)]
    union: Option<Vec<TypeRef>>,
    /// Names of the annotations on the result type, in order.
    #[serde(default)]
    annotations: Option<Vec<String>>,
    #[serde(default)]
    arguments: Option<Vec<ArgumentExpectation>>,
    #[serde(default)]
    receiver_types: Option<Vec<TypeRef>>,
    #[serde(default)]
    batched: Option<bool>,
    #[serde(default)]
    description: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
struct ArgumentExpectation {
    name: String,
    #[serde(default, rename = "type")]
    ty: Option<TypeRef>,
    #[serde(default)]
    description: Option<String>,
    #[serde(default)]
    default_value: Option<serde_json::Value>,
    #[serde(default)]
    no_default: bool,
    #[serde(default)]
    context: Option<bool>,
    #[serde(default)]
    mappable: Option<bool>,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct ErrorExpectation {
    kind: String,
    #[serde(default)]
    contains: Vec<String>,
}

fn error_kind(err: &OperationError) -> &'static str {
    match err {
        OperationError::EmptyResolverSet => "EmptyResolverSet",
        OperationError::IncompatibleOperationTypes { .. } => "IncompatibleOperationTypes",
        OperationError::InconsistentContext { .. } => "InconsistentContext",
        OperationError::Type { .. } => "Type",
    }
}

fn yaml_test_impl(path: &str) -> Result<()> {
    let _ = env_logger::builder().is_test(true).try_init();

    let yaml = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read yaml test file {path}"))?;
    let test: UnifyYamlTest = serde_yaml::from_str(&yaml)
        .with_context(|| format!("failed to parse yaml test file {path}"))?;

    for case in test.cases.iter() {
        run_case(case).with_context(|| format!("case `{}`", case.note))?;
    }

    Ok(())
}

fn build(builder: &DefaultOperationBuilder, case: &UnifyCase) -> Result<Operation, OperationError> {
    match case.kind {
        OperationKind::Query => builder.build_query(&case.resolvers),
        OperationKind::Mutation => builder.build_mutation(&case.resolvers),
    }
}

fn run_case(case: &UnifyCase) -> Result<()> {
    let hierarchy = case.hierarchy.clone().unwrap_or_default();
    let builder = DefaultOperationBuilder::new(hierarchy).with_options(case.options.clone());

    let result = build(&builder, case);
    if build(&builder, case) != result {
        bail!("building the same resolvers twice gave different results");
    }

    match (&case.want, &case.error, result) {
        (Some(want), None, Ok(operation)) => check_operation(want, &operation),
        (None, Some(expected), Err(err)) => check_error(expected, &err),
        (_, Some(expected), Ok(operation)) => bail!(
            "expected {} error but built {}",
            expected.kind,
            serde_json::to_string(&operation)?
        ),
        (_, _, Err(err)) => Err(anyhow!("unexpected error: {err}")),
        (want, error, Ok(_)) => bail!(
            "case must set exactly one of `want` and `error` (want: {}, error: {})",
            want.is_some(),
            error.is_some()
        ),
    }
}

fn check_error(expected: &ErrorExpectation, err: &OperationError) -> Result<()> {
    let kind = error_kind(err);
    if kind != expected.kind {
        bail!("expected {} error, got {kind}: {err}", expected.kind);
    }
    let message = format!("{err}");
    for fragment in &expected.contains {
        if !message.contains(fragment.as_str()) {
            bail!("error message `{message}` does not contain `{fragment}`");
        }
    }
    Ok(())
}

fn check_operation(want: &OperationExpectation, operation: &Operation) -> Result<()> {
    if let Some(name) = &want.name {
        if operation.name() != name {
            bail!("name: expected {name}, got {}", operation.name());
        }
    }

    let result_type = operation.result_type();
    if let Some(expected) = &want.result_type {
        if result_type != expected {
            bail!("result type: expected {expected}, got {result_type}");
        }
    }
    if let Some(expected) = &want.union {
        let members = result_type
            .union_members()
            .ok_or_else(|| anyhow!("result type {result_type} is not a union"))?;
        let same = members.len() == expected.len()
            && members.iter().zip(expected).all(|(m, e)| m.same_type(e));
        if !same {
            bail!("union members: expected {expected:?}, got {result_type}");
        }
    }
    if let Some(expected) = &want.annotations {
        let actual: Vec<&str> = result_type.annotations().iter().map(|a| a.name()).collect();
        if actual != *expected {
            bail!("annotations: expected {expected:?}, got {actual:?}");
        }
    }

    if let Some(expected) = &want.receiver_types {
        if operation.receiver_types() != expected.as_slice() {
            bail!(
                "receiver types: expected {expected:?}, got {:?}",
                operation.receiver_types()
            );
        }
    }
    if let Some(expected) = want.batched {
        if operation.is_batched() != expected {
            bail!("batched: expected {expected}");
        }
    }
    if let Some(expected) = &want.description {
        if operation.description() != Some(expected.as_str()) {
            bail!(
                "description: expected {expected:?}, got {:?}",
                operation.description()
            );
        }
    }

    if let Some(expected) = &want.arguments {
        let actual: Vec<&str> = operation.arguments().iter().map(|a| a.name()).collect();
        let names: Vec<&str> = expected.iter().map(|a| a.name.as_str()).collect();
        if actual != names {
            bail!("arguments: expected {names:?}, got {actual:?}");
        }
        for expected in expected {
            check_argument(expected, operation)
                .with_context(|| format!("argument `{}`", expected.name))?;
        }
    }

    Ok(())
}

fn check_argument(expected: &ArgumentExpectation, operation: &Operation) -> Result<()> {
    let argument = operation
        .argument(&expected.name)
        .ok_or_else(|| anyhow!("missing argument"))?;
    if let Some(ty) = &expected.ty {
        if argument.ty() != ty {
            bail!("type: expected {ty}, got {}", argument.ty());
        }
    }
    if let Some(description) = &expected.description {
        if argument.description() != Some(description.as_str()) {
            bail!(
                "description: expected {description:?}, got {:?}",
                argument.description()
            );
        }
    }
    if let Some(value) = &expected.default_value {
        if argument.default_value().as_value() != Some(value) {
            bail!("default: expected {value}, got {:?}", argument.default_value());
        }
    }
    if expected.no_default && argument.default_value().is_present() {
        bail!("expected no default, got {:?}", argument.default_value());
    }
    if let Some(context) = expected.context {
        if argument.is_context() != context {
            bail!("context: expected {context}");
        }
    }
    if let Some(mappable) = expected.mappable {
        if argument.is_mappable() != mappable {
            bail!("mappable: expected {mappable}");
        }
    }
    Ok(())
}

#[test_resources("tests/unify/**/*.yaml")]
fn run(path: &str) {
    yaml_test_impl(path).unwrap();
}
