// Copyright (c) Microsoft Corporation.
// Licensed under the MIT License.

#![cfg(feature = "arc")]

use operation_unifier::*;
use std::thread;

fn overloads(name: &str) -> Vec<Resolver> {
    let ty = |text: &str| -> TypeRef { text.parse().expect("valid type") };
    vec![
        Resolver::new(name, ty("List<Int>")).with_argument(ArgumentSpec::new("limit", ty("Int"))),
        Resolver::new(name, ty("Set<Long>"))
            .with_argument(ArgumentSpec::new("limit", ty("Long")))
            .as_batched(),
    ]
}

// Builders share one hierarchy and hold no mutable state, so independent
// operations can be unified from several threads.
#[test]
fn build_from_many_threads() {
    let hierarchy = Rc::new(TypeHierarchy::builtin());
    let builder = DefaultOperationBuilder::from_shared(hierarchy.clone());
    let expected = builder
        .build_query(&overloads("op0"))
        .expect("operation builds");

    let operations: Vec<Operation> = thread::scope(|scope| {
        let handles: Vec<_> = (0..8)
            .map(|idx| {
                let builder = &builder;
                scope.spawn(move || builder.build_query(&overloads(&format!("op{idx}"))))
            })
            .collect();
        handles
            .into_iter()
            .map(|handle| {
                handle
                    .join()
                    .expect("thread completes")
                    .expect("operation builds")
            })
            .collect()
    });

    assert_eq!(operations.len(), 8);
    assert_eq!(operations[0], expected);
    for operation in &operations {
        assert_eq!(operation.result_type(), expected.result_type());
        assert_eq!(operation.arguments(), expected.arguments());
    }
    assert_eq!(Rc::strong_count(&hierarchy), 2);
}

#[test]
fn operations_move_across_threads() {
    let builder = DefaultOperationBuilder::default();
    let operation = builder
        .build_query(&overloads("values"))
        .expect("operation builds");
    let result_type = thread::spawn(move || operation.result_type().to_string())
        .join()
        .expect("thread completes");
    assert_eq!(result_type, "Collection<Number>");
}
