// Copyright (c) Microsoft Corporation.
// Licensed under the MIT License.

use anyhow::Result;
use operation_unifier::*;

fn ty(text: &str) -> TypeRef {
    text.parse().expect("valid type")
}

fn hierarchy() -> Result<TypeHierarchy> {
    Ok(TypeHierarchy::from_json_str(
        r#"{
            "types": [
                { "name": "Pet" },
                { "name": "Cat", "extends": ["Pet"] },
                { "name": "Dog", "extends": ["Pet"] },
                { "name": "Owner" }
            ]
        }"#,
    )?)
}

#[test]
fn group_by_name_keeps_first_occurrence_order() {
    let groups = group_by_name([
        Resolver::new("b", ty("Int")),
        Resolver::new("a", ty("Int")),
        Resolver::new("b", ty("Long")),
    ]);
    let names: Vec<&str> = groups.iter().map(|(name, _)| &**name).collect();
    assert_eq!(names, ["b", "a"]);
    assert_eq!(groups[0].1[1].result_type(), &ty("Long"));
}

#[test]
fn build_queries_and_mutations() -> Result<()> {
    let builder = DefaultOperationBuilder::new(hierarchy()?);
    let queries = [
        Resolver::new("pet", ty("Cat")).with_argument(ArgumentSpec::new("name", ty("String"))),
        Resolver::new("owner", ty("Owner")),
        Resolver::new("pet", ty("Dog")).with_argument(ArgumentSpec::new("id", ty("ID"))),
    ];
    let mutations = [Resolver::new("adopt", ty("Boolean"))
        .with_argument(ArgumentSpec::new("pet", ty("Pet")))
        .as_batched()];

    let set = OperationSet::build(&builder, queries, mutations)?;
    assert_eq!(set.len(), 3);
    assert!(!set.is_empty());

    let names: Vec<&str> = set.queries().iter().map(Operation::name).collect();
    assert_eq!(names, ["pet", "owner"]);

    let pet = set.query("pet").expect("pet query");
    assert_eq!(pet.result_type(), &ty("Pet"));
    assert!(pet.is_overloaded());
    assert_eq!(pet.arguments().len(), 2);

    let adopt = set.mutation("adopt").expect("adopt mutation");
    assert!(adopt.is_batched());
    assert!(set.query("adopt").is_none());
    Ok(())
}

#[test]
fn first_failing_group_aborts_the_build() -> Result<()> {
    let builder = DefaultOperationBuilder::new(hierarchy()?);
    let queries = [
        Resolver::new("pet", ty("Cat")),
        Resolver::new("thing", ty("Cat")),
        Resolver::new("thing", ty("Owner")),
    ];
    let err = OperationSet::build(&builder, queries, []).expect_err("incompatible types");
    assert_eq!(err.operation(), Some("thing"));
    assert!(matches!(
        err,
        OperationError::IncompatibleOperationTypes { .. }
    ));
    Ok(())
}

#[test]
fn empty_input_builds_empty_set() {
    let set = OperationSet::build(&DefaultOperationBuilder::default(), [], [])
        .expect("empty set");
    assert!(set.is_empty());
    assert_eq!(set, OperationSet::default());
}

/// A builder adding a mutation-only rule on top of the default one.
struct StrictMutations(DefaultOperationBuilder);

impl OperationBuilder for StrictMutations {
    fn build_query(&self, resolvers: &[Resolver]) -> Result<Operation, OperationError> {
        self.0.build_query(resolvers)
    }

    fn build_mutation(&self, resolvers: &[Resolver]) -> Result<Operation, OperationError> {
        let operation = self.0.build_mutation(resolvers)?;
        if operation.is_batched() {
            return Err(OperationError::EmptyResolverSet);
        }
        Ok(operation)
    }
}

#[test]
fn custom_builders_can_override_mutations() {
    let builder = StrictMutations(DefaultOperationBuilder::default());
    let resolvers = [Resolver::new("save", ty("Boolean")).as_batched()];
    assert!(OperationSet::build(&builder, resolvers.clone(), []).is_ok());
    assert!(OperationSet::build(&builder, [], resolvers).is_err());
}

#[test]
fn options_change_argument_order() -> Result<()> {
    let options: BuilderOptions = serde_json::from_str(r#"{ "argumentOrder": "alphabetical" }"#)?;
    assert_eq!(options.max_join_depth, DEFAULT_MAX_JOIN_DEPTH);

    let builder = DefaultOperationBuilder::default().with_options(options);
    let operation = builder.build_query(&[Resolver::new("find", ty("String")).with_arguments([
        ArgumentSpec::new("text", ty("String")),
        ArgumentSpec::new("after", ty("ID")),
    ])])?;
    let names: Vec<&str> = operation.arguments().iter().map(ArgumentSpec::name).collect();
    assert_eq!(names, ["after", "text"]);
    Ok(())
}

#[test]
fn unknown_options_are_rejected() {
    let options = serde_json::from_str::<BuilderOptions>(r#"{ "maxDepth": 3 }"#);
    assert!(options.is_err());
}
