//! Change records emitted by the diff builder.

use super::{NodeKind, Span, StructuralNode, Visibility};
use clap::ValueEnum;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Location of a node on one side of the comparison.
pub type Location = Span;

/// Type of change
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum ChangeType {
    Added,
    Removed,
    Modified,
    Moved,
    Renamed,
    Unchanged,
}

impl ChangeType {
    pub const ALL: [Self; 6] = [
        Self::Added,
        Self::Removed,
        Self::Modified,
        Self::Moved,
        Self::Renamed,
        Self::Unchanged,
    ];

    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Added => "Added",
            Self::Removed => "Removed",
            Self::Modified => "Modified",
            Self::Moved => "Moved",
            Self::Renamed => "Renamed",
            Self::Unchanged => "Unchanged",
        }
    }
}

impl fmt::Display for ChangeType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Estimated risk of a change for downstream consumers.
///
/// Ordered from least to most severe, so `impact >= threshold` reads naturally.
#[derive(
    Debug,
    Clone,
    Copy,
    Default,
    PartialEq,
    Eq,
    Hash,
    PartialOrd,
    Ord,
    ValueEnum,
    Serialize,
    Deserialize,
    JsonSchema,
)]
pub enum Impact {
    /// Whitespace or comment churn only
    #[value(alias = "formatting")]
    FormattingOnly,
    /// Safe for every consumer
    #[default]
    NonBreaking,
    /// Breaks consumers inside the assembly or its friends
    #[value(alias = "internal")]
    BreakingInternalApi,
    /// Breaks external consumers
    #[value(alias = "public")]
    BreakingPublicApi,
}

impl Impact {
    pub const ALL: [Self; 4] = [
        Self::FormattingOnly,
        Self::NonBreaking,
        Self::BreakingInternalApi,
        Self::BreakingPublicApi,
    ];

    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::FormattingOnly => "FormattingOnly",
            Self::NonBreaking => "NonBreaking",
            Self::BreakingInternalApi => "BreakingInternalApi",
            Self::BreakingPublicApi => "BreakingPublicApi",
        }
    }

    #[must_use]
    pub const fn is_breaking(&self) -> bool {
        matches!(self, Self::BreakingInternalApi | Self::BreakingPublicApi)
    }
}

impl fmt::Display for Impact {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Whitespace anomalies reported for whitespace-significant languages.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum WhitespaceIssue {
    IndentationChanged,
    MixedTabsSpaces,
    TrailingWhitespace,
    LineEndingChanged,
    AmbiguousTabWidth,
}

/// One reported difference between an old and a new node.
///
/// Changes are value objects: the diff builder constructs them completely
/// (including classification) before handing them out.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Change {
    #[serde(rename = "type")]
    pub change_type: ChangeType,
    pub kind: NodeKind,
    pub name: Option<String>,
    /// Previous name (Renamed only)
    pub old_name: Option<String>,
    pub impact: Impact,
    pub visibility: Option<Visibility>,
    pub caveats: Vec<String>,
    pub whitespace_issues: Vec<WhitespaceIssue>,
    pub old_location: Option<Location>,
    pub new_location: Option<Location>,
    pub old_content: Option<String>,
    pub new_content: Option<String>,
    /// Empty means the change applies to every analyzed configuration
    #[serde(default)]
    pub applicable_configurations: Vec<String>,
    #[serde(default)]
    pub children: Vec<Change>,
    /// Enclosing container path (e.g. `File/Namespace/Type`), used for move detection
    #[serde(skip)]
    pub scope: String,
}

impl Change {
    fn blank(change_type: ChangeType, node: &StructuralNode, scope: &str) -> Self {
        Self {
            change_type,
            kind: node.kind,
            name: node.name.clone(),
            old_name: None,
            impact: Impact::default(),
            visibility: node.visibility,
            caveats: Vec::new(),
            whitespace_issues: Vec::new(),
            old_location: None,
            new_location: None,
            old_content: None,
            new_content: None,
            applicable_configurations: Vec::new(),
            children: Vec::new(),
            scope: scope.to_string(),
        }
    }

    /// A node present only in the new tree.
    pub fn added(node: &StructuralNode, scope: &str) -> Self {
        Self {
            new_location: Some(node.span.clone()),
            new_content: Some(node.raw_text.clone()),
            ..Self::blank(ChangeType::Added, node, scope)
        }
    }

    /// A node present only in the old tree.
    pub fn removed(node: &StructuralNode, scope: &str) -> Self {
        Self {
            old_location: Some(node.span.clone()),
            old_content: Some(node.raw_text.clone()),
            ..Self::blank(ChangeType::Removed, node, scope)
        }
    }

    /// A change between a matched pair. Name and visibility come from the new side.
    pub fn between(
        change_type: ChangeType,
        old: &StructuralNode,
        new: &StructuralNode,
        old_content: &str,
        new_content: &str,
        scope: &str,
    ) -> Self {
        Self {
            old_name: if change_type == ChangeType::Renamed {
                old.name.clone()
            } else {
                None
            },
            visibility: new.visibility.or(old.visibility),
            old_location: Some(old.span.clone()),
            new_location: Some(new.span.clone()),
            old_content: Some(old_content.to_string()),
            new_content: Some(new_content.to_string()),
            ..Self::blank(change_type, new, scope)
        }
    }

    /// Synthetic change standing in for a file that failed to parse.
    pub fn parse_error(path: &str, old_diagnostics: Option<&str>, new_diagnostics: Option<&str>) -> Self {
        Self {
            change_type: ChangeType::Modified,
            kind: NodeKind::File,
            name: Some(PARSE_ERROR_NAME.to_string()),
            old_name: None,
            impact: Impact::default(),
            visibility: None,
            caveats: Vec::new(),
            whitespace_issues: Vec::new(),
            old_location: None,
            new_location: None,
            old_content: old_diagnostics.map(str::to_string),
            new_content: new_diagnostics.map(str::to_string),
            applicable_configurations: Vec::new(),
            children: Vec::new(),
            scope: path.to_string(),
        }
    }

    /// Set impact and caveats.
    pub fn with_classification(mut self, impact: Impact, caveats: Vec<String>) -> Self {
        self.impact = impact;
        self.caveats = caveats;
        self
    }

    pub fn with_whitespace_issues(mut self, issues: Vec<WhitespaceIssue>) -> Self {
        self.whitespace_issues = issues;
        self
    }

    pub fn with_children(mut self, children: Vec<Self>) -> Self {
        self.children = children;
        self
    }

    /// Display name, falling back to the kind.
    #[must_use]
    pub fn display_name(&self) -> &str {
        self.name.as_deref().unwrap_or_else(|| self.kind.as_str())
    }

    /// Highest impact in this change's subtree.
    #[must_use]
    pub fn max_impact(&self) -> Impact {
        self.children
            .iter()
            .map(Self::max_impact)
            .fold(self.impact, Ord::max)
    }

    /// Depth-first, pre-order iteration over this change and its descendants.
    pub fn iter(&self) -> ChangeIter<'_> {
        ChangeIter { stack: vec![self] }
    }

    /// Total number of changes in this subtree.
    #[must_use]
    pub fn subtree_len(&self) -> usize {
        self.iter().count()
    }
}

/// Name used for synthetic parse-failure changes.
pub const PARSE_ERROR_NAME: &str = "Parse Error";

/// Pre-order iterator over a change subtree.
pub struct ChangeIter<'a> {
    stack: Vec<&'a Change>,
}

impl<'a> Iterator for ChangeIter<'a> {
    type Item = &'a Change;

    fn next(&mut self) -> Option<Self::Item> {
        let next = self.stack.pop()?;
        self.stack.extend(next.children.iter().rev());
        Some(next)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn method(name: &str, text: &str) -> StructuralNode {
        StructuralNode::new(NodeKind::Method, Some(name), text)
            .with_visibility(Visibility::Public)
            .with_span(Span::new("a.cs", 3, 5))
    }

    #[test]
    fn test_added_has_no_old_side() {
        let change = Change::added(&method("Run", "void Run() {}"), "a.cs");
        assert_eq!(change.change_type, ChangeType::Added);
        assert!(change.old_location.is_none());
        assert!(change.old_content.is_none());
        assert_eq!(change.new_content.as_deref(), Some("void Run() {}"));
    }

    #[test]
    fn test_removed_has_no_new_side() {
        let change = Change::removed(&method("Run", "void Run() {}"), "a.cs");
        assert!(change.new_location.is_none());
        assert!(change.new_content.is_none());
        assert!(change.old_location.is_some());
    }

    #[test]
    fn test_renamed_keeps_old_name() {
        let old = method("Start", "void Start() {}");
        let new = method("Run", "void Run() {}");
        let change = Change::between(ChangeType::Renamed, &old, &new, "a", "b", "a.cs");
        assert_eq!(change.name.as_deref(), Some("Run"));
        assert_eq!(change.old_name.as_deref(), Some("Start"));

        let modified = Change::between(ChangeType::Modified, &old, &new, "a", "b", "a.cs");
        assert!(modified.old_name.is_none());
    }

    #[test]
    fn test_impact_ordering() {
        assert!(Impact::BreakingPublicApi > Impact::BreakingInternalApi);
        assert!(Impact::BreakingInternalApi > Impact::NonBreaking);
        assert!(Impact::NonBreaking > Impact::FormattingOnly);
    }

    #[test]
    fn test_iter_is_preorder() {
        let leaf_a = Change::added(&method("A", "a"), "t");
        let leaf_b = Change::added(&method("B", "b"), "t");
        let parent = Change::removed(&method("P", "p"), "t").with_children(vec![leaf_a, leaf_b]);
        let names: Vec<_> = parent.iter().map(Change::display_name).collect();
        assert_eq!(names, vec!["P", "A", "B"]);
        assert_eq!(parent.subtree_len(), 3);
    }

    #[test]
    fn test_wire_field_names() {
        let change = Change::added(&method("Run", "void Run() {}"), "a.cs");
        let json = serde_json::to_value(&change).expect("serialize");
        assert_eq!(json["type"], "Added");
        assert!(json.get("oldName").is_some());
        assert!(json.get("whitespaceIssues").is_some());
        assert_eq!(json["newLocation"]["startLine"], 3);
        assert!(json.get("scope").is_none());
    }
}
