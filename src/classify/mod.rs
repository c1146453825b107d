//! Impact classification.
//!
//! [`ImpactClassifier`] is a pure, total function from a change's type, the
//! visibility of the declaration and a few facts gathered by the diff builder
//! to an [`Impact`] plus zero or more caveats. Rules are evaluated in a fixed
//! precedence:
//!
//! 1. whitespace/comment-only differences are `FormattingOnly`
//! 2. added, removed and renamed declarations by visibility
//! 3. modified declarations: signature changes by visibility, body-only
//!    changes are non-breaking
//! 4. moves: same scope is non-breaking, a public declaration moved into
//!    another container breaks the public API
//!
//! Caveats are additive and independent of the impact.

mod rules;

pub use rules::{PARAMETER_RENAME_CAVEAT, RENAME_REFLECTION_CAVEAT, REORDER_CAVEAT};

use crate::model::{ChangeType, Impact, Visibility};

/// Facts about a change gathered by the diff builder.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ClassificationInput {
    pub change_type: ChangeType,
    pub visibility: Option<Visibility>,
    /// Old and new text differ only in whitespace or comments
    pub formatting_only: bool,
    /// The declaration's signature changed (Modified only)
    pub signature_changed: bool,
    /// The move stayed inside the same container (Moved only)
    pub same_scope: bool,
    /// Parameter types are unchanged but a parameter name differs
    pub parameter_renamed: bool,
}

impl ClassificationInput {
    /// Input with every fact unset.
    #[must_use]
    pub const fn new(change_type: ChangeType, visibility: Option<Visibility>) -> Self {
        Self {
            change_type,
            visibility,
            formatting_only: false,
            signature_changed: false,
            same_scope: false,
            parameter_renamed: false,
        }
    }

    #[must_use]
    pub const fn formatting_only(mut self, value: bool) -> Self {
        self.formatting_only = value;
        self
    }

    #[must_use]
    pub const fn signature_changed(mut self, value: bool) -> Self {
        self.signature_changed = value;
        self
    }

    #[must_use]
    pub const fn same_scope(mut self, value: bool) -> Self {
        self.same_scope = value;
        self
    }

    #[must_use]
    pub const fn parameter_renamed(mut self, value: bool) -> Self {
        self.parameter_renamed = value;
        self
    }
}

/// Impact plus caveats for one change.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Classification {
    pub impact: Impact,
    pub caveats: Vec<String>,
}

/// Stateless impact classifier backed by static rule tables.
#[derive(Debug, Clone, Copy, Default)]
pub struct ImpactClassifier;

impl ImpactClassifier {
    #[must_use]
    pub const fn new() -> Self {
        Self
    }

    /// Classify a change.
    #[must_use]
    pub fn classify(&self, input: &ClassificationInput) -> Classification {
        Classification {
            impact: Self::impact(input),
            caveats: Self::caveats(input),
        }
    }

    /// Classify from change type and visibility alone.
    #[must_use]
    pub fn classify_basic(&self, change_type: ChangeType, visibility: Option<Visibility>) -> Impact {
        Self::impact(&ClassificationInput::new(change_type, visibility))
    }

    fn impact(input: &ClassificationInput) -> Impact {
        if input.formatting_only {
            return Impact::FormattingOnly;
        }
        match input.change_type {
            ChangeType::Added | ChangeType::Removed | ChangeType::Renamed => {
                rules::lookup(&rules::IDENTITY_CHANGE_RULES, input.visibility)
            }
            ChangeType::Modified if input.signature_changed => {
                rules::lookup(&rules::SIGNATURE_CHANGE_RULES, input.visibility)
            }
            ChangeType::Moved if !input.same_scope => {
                rules::lookup(&rules::CROSS_SCOPE_MOVE_RULES, input.visibility)
            }
            ChangeType::Modified | ChangeType::Moved | ChangeType::Unchanged => Impact::NonBreaking,
        }
    }

    fn caveats(input: &ClassificationInput) -> Vec<String> {
        let mut caveats = Vec::new();
        let visibility = input.visibility;

        if input.parameter_renamed
            && visibility.is_some_and(|v| v.is_public_surface() || v == Visibility::Internal)
        {
            caveats.push(PARAMETER_RENAME_CAVEAT.to_string());
        }
        if input.change_type == ChangeType::Renamed
            && matches!(visibility, Some(Visibility::Private | Visibility::Internal))
        {
            caveats.push(RENAME_REFLECTION_CAVEAT.to_string());
        }
        if input.change_type == ChangeType::Moved && input.same_scope {
            caveats.push(REORDER_CAVEAT.to_string());
        }
        caveats
    }
}
