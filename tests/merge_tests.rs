//! Configuration merge behavior, both on hand-built runs and through the
//! comparison service with conditional source.

use decldiff::{
    AppConfig, Change, ChangeType, ComparisonService, ConfigurationMerger, ConfigurationRun, NameComparison, NodeKind,
    Span, StructuralNode, Visibility,
};

fn added(name: &str, line: u32) -> Change {
    let node = StructuralNode::new(NodeKind::Method, Some(name), format!("public void {name}() {{}}"))
        .with_visibility(Visibility::Public)
        .with_span(Span::new("src/Widget.cs", line, line));
    Change::added(&node, "File:Widget.cs/Type:Widget")
}

fn modified_type(name: &str, children: Vec<Change>) -> Change {
    let node = StructuralNode::new(NodeKind::Type, Some(name), format!("public class {name}"))
        .with_visibility(Visibility::Public)
        .with_span(Span::new("src/Widget.cs", 1, 30));
    Change::between(
        ChangeType::Modified,
        &node,
        &node,
        &format!("public class {name}"),
        &format!("public sealed class {name}"),
        "File:Widget.cs",
    )
    .with_children(children)
}

mod merger {
    use super::*;

    #[test]
    fn result_does_not_depend_on_run_order() {
        let runs = vec![
            ConfigurationRun::new("net8.0", vec![added("Draw", 3), added("Resize", 7)]),
            ConfigurationRun::new("net48", vec![added("Draw", 3)]),
            ConfigurationRun::new("netstandard2.0", vec![added("Draw", 3), added("Legacy", 9)]),
        ];
        let mut reversed = runs.clone();
        reversed.reverse();

        let merger = ConfigurationMerger::default();
        let a = merger.merge(runs);
        let b = merger.merge(reversed);
        assert_eq!(a, b);
        assert_eq!(
            serde_json::to_string(&a).unwrap(),
            serde_json::to_string(&b).unwrap()
        );
        assert_eq!(a.analyzed_configurations, vec!["net48", "net8.0", "netstandard2.0"]);
    }

    #[test]
    fn subsets_are_sorted_and_full_sets_are_empty() {
        let runs = vec![
            ConfigurationRun::new("c", vec![added("Shared", 1), added("TwoOfThree", 2)]),
            ConfigurationRun::new("a", vec![added("Shared", 1), added("TwoOfThree", 2)]),
            ConfigurationRun::new("b", vec![added("Shared", 1)]),
        ];
        let result = ConfigurationMerger::default().merge(runs);

        let by_name = |name: &str| {
            result
                .changes
                .iter()
                .find(|c| c.display_name() == name)
                .unwrap()
                .applicable_configurations
                .clone()
        };
        assert!(by_name("Shared").is_empty());
        assert_eq!(by_name("TwoOfThree"), vec!["a", "c"]);
    }

    #[test]
    fn different_locations_are_different_changes() {
        let runs = vec![
            ConfigurationRun::new("a", vec![added("Draw", 3)]),
            ConfigurationRun::new("b", vec![added("Draw", 4)]),
        ];
        let result = ConfigurationMerger::default().merge(runs);
        assert_eq!(result.changes.len(), 2);
        assert_eq!(result.changes[0].applicable_configurations, vec!["a"]);
        assert_eq!(result.changes[1].applicable_configurations, vec!["b"]);
    }

    #[test]
    fn name_policy_decides_identity() {
        let runs = || {
            vec![
                ConfigurationRun::new("a", vec![added("Draw", 3)]),
                ConfigurationRun::new("b", vec![added("DRAW", 3)]),
            ]
        };
        let sensitive = ConfigurationMerger::new(NameComparison::CaseSensitive).merge(runs());
        assert_eq!(sensitive.changes.len(), 2);

        let insensitive = ConfigurationMerger::new(NameComparison::CaseInsensitive).merge(runs());
        assert_eq!(insensitive.changes.len(), 1);
        assert!(insensitive.changes[0].applicable_configurations.is_empty());
    }

    #[test]
    fn nested_children_are_merged_at_every_depth() {
        let runs = vec![
            ConfigurationRun::new("a", vec![modified_type("Widget", vec![added("Draw", 3)])]),
            ConfigurationRun::new("b", vec![modified_type("Widget", vec![added("Draw", 3), added("Resize", 8)])]),
            ConfigurationRun::new("c", vec![modified_type("Widget", vec![added("Resize", 8)])]),
        ];
        let result = ConfigurationMerger::default().merge(runs);

        assert_eq!(result.changes.len(), 1);
        let parent = &result.changes[0];
        assert!(parent.applicable_configurations.is_empty());
        let children: Vec<(&str, Vec<String>)> = parent
            .children
            .iter()
            .map(|c| (c.display_name(), c.applicable_configurations.clone()))
            .collect();
        assert_eq!(
            children,
            vec![
                ("Draw", vec!["a".to_string(), "b".to_string()]),
                ("Resize", vec!["b".to_string(), "c".to_string()]),
            ]
        );
        // one parent and two children, each counted once
        assert_eq!(result.summary.total_changes, 3);
        assert_eq!(result.summary.count_for_type(ChangeType::Added), 2);
    }
}

mod service {
    use super::*;

    const OLD: &str = "\
public class Widget {
    public void Draw() {}
#if NET8_0_OR_GREATER
    public void Render(Span<byte> buffer) {}
#else
    public void Render(byte[] buffer) {}
#endif
}
";

    const NEW: &str = "\
public class Widget {
    public void Draw(bool fast) {}
#if NET8_0_OR_GREATER
    public void Render(Span<byte> buffer) {}
#else
    public void Render(byte[] buffer, int offset) {}
#endif
}
";

    fn service() -> ComparisonService {
        ComparisonService::from_config(&AppConfig::builder().quiet(true).build()).unwrap()
    }

    #[test]
    fn branch_specific_change_is_tagged_with_its_configurations() {
        let targets: Vec<String> = ["net8.0", "net48", "netstandard2.0"].map(String::from).to_vec();
        let result = service().compare_sources("Widget.cs", Some(OLD), Some(NEW), &targets).unwrap();

        assert_eq!(result.analyzed_configurations, vec!["net48", "net8.0", "netstandard2.0"]);
        assert_eq!(result.changes.len(), 2);

        let universal: Vec<&Change> = result
            .changes
            .iter()
            .filter(|c| c.applicable_configurations.is_empty())
            .collect();
        assert_eq!(universal.len(), 1);
        assert!(universal[0].new_content.as_deref().is_some_and(|t| t.contains("Draw(bool fast)")));

        let specific = result
            .changes
            .iter()
            .find(|c| !c.applicable_configurations.is_empty())
            .unwrap();
        assert_eq!(specific.applicable_configurations, vec!["net48", "netstandard2.0"]);
        assert!(specific.new_content.as_deref().is_some_and(|t| t.contains("int offset")));
    }

    #[test]
    fn single_configuration_is_universal() {
        let result = service()
            .compare_sources("Widget.cs", Some(OLD), Some(NEW), &["net8.0".to_string()])
            .unwrap();
        assert_eq!(result.analyzed_configurations, vec!["net8.0"]);
        assert_eq!(result.changes.len(), 1);
        assert!(result.changes[0].applicable_configurations.is_empty());
    }

    #[test]
    fn bounded_parallelism_gives_the_same_result() {
        let targets: Vec<String> = ["net8.0", "net48", "netstandard2.0", "net6.0"].map(String::from).to_vec();
        let unbounded = service().compare_sources("Widget.cs", Some(OLD), Some(NEW), &targets).unwrap();

        let bounded_service =
            ComparisonService::from_config(&AppConfig::builder().quiet(true).max_parallelism(Some(1)).build())
                .unwrap();
        let bounded = bounded_service
            .compare_sources("Widget.cs", Some(OLD), Some(NEW), &targets)
            .unwrap();

        assert_eq!(unbounded, bounded);
    }
}
