//! Property tests for ordering, transformation and normalisation

use std::collections::HashMap;

use header_amalgam_core::assembler::collapse_blank_lines;
use header_amalgam_core::resolver::DependencyGraph;
use header_amalgam_core::transform::ContentTransformer;
use header_amalgam_core::{AmalgamConfig, AmalgamError};
use proptest::prelude::*;

/// `n` units where unit `i` may depend on any unit `j < i`
fn acyclic_graph() -> impl Strategy<Value = (usize, Vec<(usize, usize)>)> {
    (1usize..14).prop_flat_map(|n| {
        proptest::collection::vec(any::<bool>(), n * n).prop_map(move |bits| {
            let mut edges = Vec::new();
            for i in 0..n {
                for j in 0..i {
                    if bits[i * n + j] {
                        edges.push((i, j));
                    }
                }
            }
            (n, edges)
        })
    })
}

fn build(n: usize, edges: &[(usize, usize)]) -> DependencyGraph {
    let mut graph = DependencyGraph::new();
    for i in 0..n {
        graph.add_unit(&format!("u{i}.hpp"));
    }
    for (from, to) in edges {
        graph.add_dependency(&format!("u{from}.hpp"), &format!("u{to}.hpp"));
    }
    graph
}

proptest! {
    #[test]
    fn prop_order_is_a_dependency_first_permutation((n, edges) in acyclic_graph()) {
        let order = build(n, &edges).resolve_order().unwrap();

        prop_assert_eq!(order.len(), n);
        let position: HashMap<&str, usize> =
            order.iter().enumerate().map(|(i, name)| (name.as_str(), i)).collect();
        prop_assert_eq!(position.len(), n);

        for (from, to) in &edges {
            let from = position[format!("u{from}.hpp").as_str()];
            let to = position[format!("u{to}.hpp").as_str()];
            prop_assert!(to < from, "dependency must precede its dependent");
        }
    }

    #[test]
    fn prop_order_is_reproducible((n, edges) in acyclic_graph()) {
        let first = build(n, &edges).resolve_order().unwrap();
        let second = build(n, &edges).resolve_order().unwrap();
        prop_assert_eq!(first, second);
    }

    #[test]
    fn prop_back_edge_is_reported_as_cycle(
        (n, edges) in acyclic_graph().prop_filter("needs two units", |(n, _)| *n >= 2),
        pick in any::<(usize, usize)>(),
    ) {
        let a = pick.0 % n;
        let b = (a + 1 + pick.1 % (n - 1)) % n;
        let mut graph = build(n, &edges);
        graph.add_dependency(&format!("u{a}.hpp"), &format!("u{b}.hpp"));
        graph.add_dependency(&format!("u{b}.hpp"), &format!("u{a}.hpp"));

        match graph.resolve_order() {
            Err(AmalgamError::CyclicDependency { cycle }) => {
                prop_assert!(cycle.len() >= 3);
                prop_assert_eq!(cycle.first(), cycle.last());
            }
            other => prop_assert!(false, "expected a cycle, got {:?}", other),
        }
    }

    #[test]
    fn prop_no_blank_runs(lines in proptest::collection::vec(
        prop_oneof![Just(""), Just("  "), Just("\t"), Just("int x;"), Just("}")],
        0..40,
    )) {
        let once = collapse_blank_lines(&lines.join("\n"));
        let mut previous_blank = false;
        for line in once.lines() {
            let blank = line.trim().is_empty();
            prop_assert!(!(blank && previous_blank));
            previous_blank = blank;
        }
        let content = |text: &str| -> Vec<String> {
            text.lines()
                .filter(|line| !line.trim().is_empty())
                .map(str::to_string)
                .collect()
        };
        prop_assert_eq!(content(&once), content(&lines.join("\n")));
        prop_assert_eq!(collapse_blank_lines(&once), once);
    }

    #[test]
    fn prop_transform_is_idempotent(
        guarded in any::<bool>(),
        body in proptest::collection::vec(
            prop_oneof![
                Just("int x;"),
                Just(""),
                Just("#include <vector>"),
                Just("#include <CLArgs/core.hpp>"),
                Just("#ifdef FOO"),
                Just("#define FOO 1"),
                Just("#endif"),
            ],
            0..30,
        ),
    ) {
        let mut lines: Vec<String> = Vec::new();
        if guarded {
            lines.push("#ifndef CLARGS_UNIT_HPP".to_string());
            lines.push("#define CLARGS_UNIT_HPP".to_string());
        }
        lines.extend(body.iter().map(|line| line.to_string()));
        if guarded {
            lines.push("#endif // CLARGS_UNIT_HPP".to_string());
        }

        let transformer = ContentTransformer::new(&AmalgamConfig::default()).unwrap();
        let once = transformer.transform(&lines);
        let twice = transformer.transform(&once);

        prop_assert!(once.iter().all(|line| !line.contains("CLARGS_UNIT_HPP")));
        prop_assert!(once.iter().all(|line| !line.starts_with("#include")));
        prop_assert_eq!(twice, once);
    }
}
