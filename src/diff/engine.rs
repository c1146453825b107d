//! Structural diff engine.

use super::builder::TreeDiffer;
use super::result::DiffResult;
use super::whitespace::{Language, WhitespaceComparator, WhitespaceMode};
use crate::classify::ImpactClassifier;
use crate::error::Result;
use crate::matching::{MatchingOptions, NodeMatcher, SiblingMatcher};
use crate::model::{Change, StructuralNode};
use crate::utils::tree_hash;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// Options controlling a single comparison.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(default)]
pub struct DiffOptions {
    /// How whitespace differences affect equality
    pub whitespace_mode: WhitespaceMode,
    /// Emit Unchanged entries
    pub include_unchanged: bool,
    /// Detect reordered and relocated declarations
    pub detect_moves: bool,
    /// Sibling matching options
    pub matching: MatchingOptions,
}

impl Default for DiffOptions {
    fn default() -> Self {
        Self {
            whitespace_mode: WhitespaceMode::default(),
            include_unchanged: false,
            detect_moves: true,
            matching: MatchingOptions::default(),
        }
    }
}

/// Structural diff engine for comparing two trees.
pub struct DiffEngine {
    options: DiffOptions,
    classifier: ImpactClassifier,
    custom_matcher: Option<Box<dyn SiblingMatcher>>,
    matcher: NodeMatcher,
}

impl Default for DiffEngine {
    fn default() -> Self {
        Self::new()
    }
}

impl DiffEngine {
    /// Create a new diff engine with default settings
    #[must_use]
    pub fn new() -> Self {
        Self {
            options: DiffOptions::default(),
            classifier: ImpactClassifier::new(),
            custom_matcher: None,
            matcher: NodeMatcher::default(),
        }
    }

    /// Create an engine from options, rejecting invalid matching settings.
    pub fn with_options(options: DiffOptions) -> Result<Self> {
        let matcher = NodeMatcher::new(options.matching.clone())?;
        Ok(Self {
            options,
            classifier: ImpactClassifier::new(),
            custom_matcher: None,
            matcher,
        })
    }

    /// Set the whitespace mode
    #[must_use]
    pub const fn whitespace_mode(mut self, mode: WhitespaceMode) -> Self {
        self.options.whitespace_mode = mode;
        self
    }

    /// Include unchanged nodes in the result
    #[must_use]
    pub const fn include_unchanged(mut self, include: bool) -> Self {
        self.options.include_unchanged = include;
        self
    }

    /// Enable or disable move detection
    #[must_use]
    pub const fn detect_moves(mut self, detect: bool) -> Self {
        self.options.detect_moves = detect;
        self
    }

    /// Set a custom sibling matcher.
    #[must_use]
    pub fn with_matcher(mut self, matcher: Box<dyn SiblingMatcher>) -> Self {
        self.custom_matcher = Some(matcher);
        self
    }

    #[must_use]
    pub const fn options(&self) -> &DiffOptions {
        &self.options
    }

    fn differ(&self, path: &str) -> TreeDiffer<'_> {
        let matcher: &dyn SiblingMatcher = match &self.custom_matcher {
            Some(m) => m.as_ref(),
            None => &self.matcher,
        };
        TreeDiffer {
            matcher,
            classifier: &self.classifier,
            comparator: WhitespaceComparator::new(self.options.whitespace_mode, Language::from_path(path)),
            include_unchanged: self.options.include_unchanged,
            detect_moves: self.options.detect_moves,
        }
    }

    /// Compare two trees and return the change list.
    #[must_use]
    pub fn diff_changes(&self, old: &StructuralNode, new: &StructuralNode) -> Vec<Change> {
        // Quick check: identical trees have nothing to report
        if !self.options.include_unchanged && tree_hash(old) == tree_hash(new) {
            tracing::debug!("trees are identical, skipping structural diff");
            return Vec::new();
        }
        self.differ(source_path(old, new)).diff_root(old, new)
    }

    /// Compare when either side may be missing (file added or deleted).
    #[must_use]
    pub fn diff_sides(&self, old: Option<&StructuralNode>, new: Option<&StructuralNode>) -> Vec<Change> {
        match (old, new) {
            (Some(old), Some(new)) => self.diff_changes(old, new),
            (None, Some(new)) => vec![self.differ(&new.span.file).whole_added(new)],
            (Some(old), None) => vec![self.differ(&old.span.file).whole_removed(old)],
            (None, None) => Vec::new(),
        }
    }

    /// Compare two trees and return the full result.
    pub fn diff(&self, old: &StructuralNode, new: &StructuralNode) -> DiffResult {
        DiffResult::new(self.diff_changes(old, new), Vec::new())
    }
}

/// Path used for language detection: new side first, then old, then the root name.
fn source_path<'a>(old: &'a StructuralNode, new: &'a StructuralNode) -> &'a str {
    [&new.span.file, &old.span.file]
        .into_iter()
        .find(|f| !f.is_empty())
        .map_or_else(|| new.name_or_empty(), String::as_str)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::classify::{RENAME_REFLECTION_CAVEAT, REORDER_CAVEAT};
    use crate::model::{ChangeType, Impact, NodeKind, Span, Visibility, WhitespaceIssue};

    fn file(path: &str, children: Vec<StructuralNode>) -> StructuralNode {
        StructuralNode::new(NodeKind::File, Some(path), "")
            .with_span(Span::new(path, 1, 1))
            .with_children(children)
    }

    fn class(name: &str, members: Vec<StructuralNode>) -> StructuralNode {
        let header = format!("public class {name}");
        StructuralNode::new(NodeKind::Type, Some(name), format!("{header} {{ }}"))
            .with_signature(&header)
            .with_visibility(Visibility::Public)
            .with_children(members)
    }

    fn method(visibility: Visibility, name: &str, text: &str) -> StructuralNode {
        StructuralNode::new(NodeKind::Method, Some(name), text).with_visibility(visibility)
    }

    #[test]
    fn test_identical_trees_produce_nothing() {
        let tree = file("a.cs", vec![class("Svc", vec![method(Visibility::Public, "Run", "void Run() {}")])]);
        let result = DiffEngine::new().diff(&tree, &tree.clone());
        assert!(result.changes.is_empty());
        assert_eq!(result.summary.total_changes, 0);
    }

    #[test]
    fn test_public_signature_change_is_single_modified() {
        let old = file(
            "a.cs",
            vec![class("Svc", vec![method(Visibility::Public, "Process", "public void Process(int x) { }")])],
        );
        let new = file(
            "a.cs",
            vec![class(
                "Svc",
                vec![method(Visibility::Public, "Process", "public void Process(int x, bool validate) { }")],
            )],
        );
        let changes = DiffEngine::new().diff_changes(&old, &new);
        assert_eq!(changes.len(), 1);
        let change = &changes[0];
        assert_eq!(change.change_type, ChangeType::Modified);
        assert_eq!(change.kind, NodeKind::Method);
        assert_eq!(change.impact, Impact::BreakingPublicApi);
        assert!(change.caveats.is_empty());
    }

    #[test]
    fn test_private_field_rename() {
        let field = |name: &str| {
            StructuralNode::new(NodeKind::Field, Some(name), format!("private int {name} = 0;"))
                .with_visibility(Visibility::Private)
        };
        let old = file("a.cs", vec![class("Svc", vec![field("_count")])]);
        let new = file("a.cs", vec![class("Svc", vec![field("_counter")])]);
        let changes = DiffEngine::new().diff_changes(&old, &new);
        assert_eq!(changes.len(), 1);
        assert_eq!(changes[0].change_type, ChangeType::Renamed);
        assert_eq!(changes[0].old_name.as_deref(), Some("_count"));
        assert_eq!(changes[0].impact, Impact::NonBreaking);
        assert_eq!(changes[0].caveats, vec![RENAME_REFLECTION_CAVEAT.to_string()]);
    }

    #[test]
    fn test_swapped_methods_are_moved_not_added_removed() {
        let a = method(Visibility::Private, "A", "private void A() { }");
        let b = method(Visibility::Private, "B", "private void B() { }");
        let old = file("a.cs", vec![class("Svc", vec![a.clone(), b.clone()])]);
        let new = file("a.cs", vec![class("Svc", vec![b, a])]);
        let changes = DiffEngine::new().diff_changes(&old, &new);
        assert!(!changes.is_empty());
        for change in &changes {
            assert_eq!(change.change_type, ChangeType::Moved);
            assert_eq!(change.impact, Impact::NonBreaking);
            assert_eq!(change.caveats, vec![REORDER_CAVEAT.to_string()]);
        }
    }

    #[test]
    fn test_header_change_owns_child_changes() {
        let old = file("a.cs", vec![class("Svc", vec![method(Visibility::Public, "Run", "void Run() {}")])]);
        let renamed_header = StructuralNode::new(NodeKind::Type, Some("Svc"), "internal class Svc { }")
            .with_signature("internal class Svc")
            .with_visibility(Visibility::Internal)
            .with_children(vec![method(Visibility::Public, "Run", "void Run() { Go(); }")]);
        let new = file("a.cs", vec![renamed_header]);

        let changes = DiffEngine::new().diff_changes(&old, &new);
        assert_eq!(changes.len(), 1);
        assert_eq!(changes[0].kind, NodeKind::Type);
        assert_eq!(changes[0].change_type, ChangeType::Modified);
        assert_eq!(changes[0].old_content.as_deref(), Some("public class Svc"));
        assert_eq!(changes[0].impact, Impact::BreakingPublicApi);
        assert_eq!(changes[0].children.len(), 1);
        assert_eq!(changes[0].children[0].kind, NodeKind::Method);
    }

    #[test]
    fn test_narrowed_type_header_is_breaking() {
        let api = |visibility: Visibility, text: &str| {
            StructuralNode::new(NodeKind::Type, Some("Api"), text).with_visibility(visibility)
        };
        let old = file("a.cs", vec![api(Visibility::Public, "public class Api { }")]);
        let new = file("a.cs", vec![api(Visibility::Internal, "internal class Api { }")]);

        let changes = DiffEngine::new().diff_changes(&old, &new);
        assert_eq!(changes.len(), 1);
        assert_eq!(changes[0].kind, NodeKind::Type);
        assert_eq!(changes[0].change_type, ChangeType::Modified);
        assert_eq!(changes[0].visibility, Some(Visibility::Internal));
        assert_eq!(changes[0].impact, Impact::BreakingPublicApi);
        assert_eq!(changes[0].new_content.as_deref(), Some("internal class Api"));
    }

    #[test]
    fn test_member_edit_leaves_type_header_alone() {
        let api = |body: &str| {
            StructuralNode::new(NodeKind::Type, Some("Api"), format!("public class Api {{ {body} }}"))
                .with_visibility(Visibility::Public)
                .with_children(vec![method(Visibility::Public, "Run", body)])
        };
        let old = file("a.cs", vec![api("public void Run() { }")]);
        let new = file("a.cs", vec![api("public void Run() { Go(); }")]);

        let changes = DiffEngine::new().diff_changes(&old, &new);
        assert_eq!(changes.len(), 1);
        assert_eq!(changes[0].kind, NodeKind::Method);
    }

    #[test]
    fn test_public_body_only_edit_is_non_breaking() {
        let get = |body: &str| method(Visibility::Public, "Get", &format!("public int Get(int id) {{ {body} }}"));
        let old = file("a.cs", vec![class("Repo", vec![get("return 0;")])]);
        let new = file("a.cs", vec![class("Repo", vec![get("return 1;")])]);

        let changes = DiffEngine::new().diff_changes(&old, &new);
        assert_eq!(changes.len(), 1);
        assert_eq!(changes[0].change_type, ChangeType::Modified);
        assert_eq!(changes[0].kind, NodeKind::Method);
        assert_eq!(changes[0].impact, Impact::NonBreaking);
        assert!(changes[0].caveats.is_empty());
    }

    #[test]
    fn test_renamed_type_with_new_base_is_also_modified() {
        let handler = |name: &str, bases: &str| {
            StructuralNode::new(NodeKind::Type, Some(name), format!("public class {name} : {bases} {{ }}"))
                .with_visibility(Visibility::Public)
        };
        let old = file("a.cs", vec![handler("OrderHandler", "IHandler")]);
        let new = file("a.cs", vec![handler("PurchaseHandler", "IHandler, IDisposable")]);
        let engine = DiffEngine::with_options(DiffOptions {
            matching: MatchingOptions {
                type_matching: crate::matching::TypeMatchingMode::Capability,
                capability_marker: Some("IHandler".to_string()),
                ..MatchingOptions::default()
            },
            ..DiffOptions::default()
        })
        .expect("valid options");

        let changes = engine.diff_changes(&old, &new);
        let summary: Vec<_> = changes.iter().map(|c| (c.change_type, c.impact)).collect();
        assert_eq!(
            summary,
            vec![
                (ChangeType::Renamed, Impact::BreakingPublicApi),
                (ChangeType::Modified, Impact::BreakingPublicApi),
            ]
        );
        assert_eq!(changes[1].new_content.as_deref(), Some("public class PurchaseHandler : IHandler, IDisposable"));
        assert!(changes[1].children.is_empty());
    }

    #[test]
    fn test_plain_rename_is_not_modified() {
        let handler = |name: &str| {
            StructuralNode::new(NodeKind::Type, Some(name), format!("public class {name} : IHandler {{ }}"))
                .with_visibility(Visibility::Public)
        };
        let old = file("a.cs", vec![handler("OrderHandler")]);
        let new = file("a.cs", vec![handler("PurchaseHandler")]);
        let engine = DiffEngine::with_options(DiffOptions {
            matching: MatchingOptions {
                type_matching: crate::matching::TypeMatchingMode::Capability,
                capability_marker: Some("IHandler".to_string()),
                ..MatchingOptions::default()
            },
            ..DiffOptions::default()
        })
        .expect("valid options");

        let changes = engine.diff_changes(&old, &new);
        assert_eq!(changes.len(), 1);
        assert_eq!(changes[0].change_type, ChangeType::Renamed);
    }

    #[test]
    fn test_added_and_removed_members() {
        let old = file("a.cs", vec![class("Svc", vec![method(Visibility::Internal, "Old", "void Old() {}")])]);
        let new = file("a.cs", vec![class("Svc", vec![method(Visibility::Protected, "New", "void New(int a) {}")])]);
        let changes = DiffEngine::new().diff_changes(&old, &new);
        let summary: Vec<_> = changes.iter().map(|c| (c.change_type, c.impact)).collect();
        assert_eq!(
            summary,
            vec![
                (ChangeType::Removed, Impact::BreakingInternalApi),
                (ChangeType::Added, Impact::BreakingPublicApi),
            ]
        );
        assert!(changes[0].new_content.is_none());
        assert!(changes[1].old_location.is_none());
    }

    #[test]
    fn test_cross_scope_move() {
        let save = method(Visibility::Public, "Save", "public void Save() { }");
        let old = file("a.cs", vec![class("Orders", vec![save.clone()]), class("Invoices", vec![])]);
        let new = file("a.cs", vec![class("Orders", vec![]), class("Invoices", vec![save])]);
        let changes = DiffEngine::new().diff_changes(&old, &new);
        assert_eq!(changes.len(), 1);
        assert_eq!(changes[0].change_type, ChangeType::Moved);
        assert_eq!(changes[0].impact, Impact::BreakingPublicApi);
        assert!(changes[0].caveats.is_empty());
    }

    #[test]
    fn test_move_detection_can_be_disabled() {
        let save = method(Visibility::Public, "Save", "public void Save() { }");
        let old = file("a.cs", vec![class("Orders", vec![save.clone()]), class("Invoices", vec![])]);
        let new = file("a.cs", vec![class("Orders", vec![]), class("Invoices", vec![save])]);
        let changes = DiffEngine::new().detect_moves(false).diff_changes(&old, &new);
        let types: Vec<_> = changes.iter().map(|c| c.change_type).collect();
        assert_eq!(types, vec![ChangeType::Removed, ChangeType::Added]);
    }

    #[test]
    fn test_whitespace_only_change_is_formatting() {
        let old = file("a.cs", vec![method(Visibility::Public, "Run", "void Run() { Go(); }")]);
        let new = file("a.cs", vec![method(Visibility::Public, "Run", "void Run()\n{\n    Go();\n}")]);

        let exact = DiffEngine::new().diff_changes(&old, &new);
        assert_eq!(exact.len(), 1);
        assert_eq!(exact[0].impact, Impact::FormattingOnly);

        let relaxed = DiffEngine::new()
            .whitespace_mode(WhitespaceMode::IgnoreAll)
            .diff_changes(&old, &new);
        assert!(relaxed.is_empty());
    }

    #[test]
    fn test_python_indentation_reports_issues() {
        let line = |n: u32, text: &str| {
            StructuralNode::new(NodeKind::Line, None, text).with_span(Span::new("calc.py", n, n))
        };
        let old = file("calc.py", vec![line(1, "def f():\n"), line(2, "    return 1\n")]);
        let new = file("calc.py", vec![line(1, "def f():\n"), line(2, "\treturn 1\n")]);
        let changes = DiffEngine::new()
            .whitespace_mode(WhitespaceMode::LanguageAware)
            .diff_changes(&old, &new);
        assert_eq!(changes.len(), 1);
        assert_eq!(changes[0].change_type, ChangeType::Modified);
        assert!(changes[0].visibility.is_none());
        assert!(changes[0]
            .whitespace_issues
            .contains(&WhitespaceIssue::IndentationChanged));
    }

    #[test]
    fn test_include_unchanged() {
        let tree = file("a.cs", vec![method(Visibility::Public, "Run", "void Run() {}")]);
        let changes = DiffEngine::new().include_unchanged(true).diff_changes(&tree, &tree.clone());
        assert_eq!(changes.len(), 1);
        assert_eq!(changes[0].change_type, ChangeType::Unchanged);
        assert_eq!(changes[0].children.len(), 1);
    }

    #[test]
    fn test_missing_side_is_whole_file() {
        let tree = file("a.cs", vec![method(Visibility::Public, "Run", "void Run() {}")]);
        let added = DiffEngine::new().diff_sides(None, Some(&tree));
        assert_eq!(added.len(), 1);
        assert_eq!(added[0].change_type, ChangeType::Added);
        assert_eq!(added[0].kind, NodeKind::File);
        assert!(added[0].children.is_empty());

        let removed = DiffEngine::new().diff_sides(Some(&tree), None);
        assert_eq!(removed[0].change_type, ChangeType::Removed);
    }

    #[test]
    fn test_invalid_options_are_rejected() {
        let options = DiffOptions {
            matching: MatchingOptions {
                similarity_threshold: -0.5,
                ..MatchingOptions::default()
            },
            ..DiffOptions::default()
        };
        assert!(DiffEngine::with_options(options).is_err());
    }
}
