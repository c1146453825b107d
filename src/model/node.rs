//! Structural node model produced by parsers.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Kind of a structural node.
///
/// The set is closed: every parser maps its own syntax onto these kinds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum NodeKind {
    File,
    Namespace,
    Type,
    Method,
    Property,
    Field,
    Statement,
    Line,
}

impl NodeKind {
    /// All kinds in declaration order.
    pub const ALL: [Self; 8] = [
        Self::File,
        Self::Namespace,
        Self::Type,
        Self::Method,
        Self::Property,
        Self::Field,
        Self::Statement,
        Self::Line,
    ];

    /// Containers are compared header-first and then recursed into.
    #[must_use]
    pub const fn is_container(&self) -> bool {
        matches!(self, Self::File | Self::Namespace | Self::Type)
    }

    /// Members are named declarations that may carry parameters.
    #[must_use]
    pub const fn is_member(&self) -> bool {
        matches!(self, Self::Method | Self::Property | Self::Field)
    }

    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::File => "File",
            Self::Namespace => "Namespace",
            Self::Type => "Type",
            Self::Method => "Method",
            Self::Property => "Property",
            Self::Field => "Field",
            Self::Statement => "Statement",
            Self::Line => "Line",
        }
    }
}

impl fmt::Display for NodeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Accessibility of a declaration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Visibility {
    Public,
    Protected,
    Internal,
    ProtectedInternal,
    PrivateProtected,
    Private,
    Local,
}

impl Visibility {
    pub const ALL: [Self; 7] = [
        Self::Public,
        Self::Protected,
        Self::Internal,
        Self::ProtectedInternal,
        Self::PrivateProtected,
        Self::Private,
        Self::Local,
    ];

    /// Visible to consumers outside the declaring assembly.
    #[must_use]
    pub const fn is_public_surface(&self) -> bool {
        matches!(self, Self::Public | Self::Protected)
    }

    /// Rank by how far outside the declaring type a declaration can be reached.
    const fn exposure(self) -> u8 {
        match self {
            Self::Public => 6,
            Self::Protected => 5,
            Self::ProtectedInternal => 4,
            Self::Internal => 3,
            Self::PrivateProtected => 2,
            Self::Private => 1,
            Self::Local => 0,
        }
    }

    /// The more exposed of two visibilities.
    #[must_use]
    pub const fn wider(self, other: Self) -> Self {
        if other.exposure() > self.exposure() {
            other
        } else {
            self
        }
    }

    /// Parse a modifier list such as `protected internal` into a visibility.
    #[must_use]
    pub fn from_modifiers(text: &str) -> Option<Self> {
        let words: Vec<&str> = text.split_whitespace().collect();
        let has = |w: &str| words.contains(&w);
        if has("protected") && has("internal") {
            Some(Self::ProtectedInternal)
        } else if has("private") && has("protected") {
            Some(Self::PrivateProtected)
        } else if has("public") || has("pub") {
            Some(Self::Public)
        } else if has("protected") {
            Some(Self::Protected)
        } else if has("internal") {
            Some(Self::Internal)
        } else if has("private") {
            Some(Self::Private)
        } else {
            None
        }
    }

    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Public => "Public",
            Self::Protected => "Protected",
            Self::Internal => "Internal",
            Self::ProtectedInternal => "ProtectedInternal",
            Self::PrivateProtected => "PrivateProtected",
            Self::Private => "Private",
            Self::Local => "Local",
        }
    }
}

impl fmt::Display for Visibility {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Source span of a node.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Span {
    pub file: String,
    pub start_line: u32,
    pub end_line: u32,
    pub start_column: u32,
    pub end_column: u32,
}

impl Span {
    #[must_use]
    pub fn new(file: impl Into<String>, start_line: u32, end_line: u32) -> Self {
        Self {
            file: file.into(),
            start_line,
            end_line,
            start_column: 1,
            end_column: 1,
        }
    }

    /// Set the column range.
    #[must_use]
    pub const fn with_columns(mut self, start_column: u32, end_column: u32) -> Self {
        self.start_column = start_column;
        self.end_column = end_column;
        self
    }
}

/// One declaration or statement of a parsed source file.
///
/// Nodes own their children; there are no parent pointers. Identity between
/// an old and a new tree is established by the matcher, never by reference.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StructuralNode {
    pub kind: NodeKind,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub visibility: Option<Visibility>,
    /// Whitespace-insensitive declaration text used for equality.
    #[serde(default)]
    pub signature: String,
    #[serde(default)]
    pub raw_text: String,
    #[serde(default)]
    pub span: Span,
    /// Declared base types / interfaces, when the parser knows them.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub base_types: Vec<String>,
    #[serde(default)]
    pub children: Vec<StructuralNode>,
}

impl StructuralNode {
    /// Create a node. The signature defaults to the normalized declaration
    /// header of `raw_text` (see [`declaration_header`]).
    #[must_use]
    pub fn new(kind: NodeKind, name: Option<&str>, raw_text: impl Into<String>) -> Self {
        let raw_text = raw_text.into();
        Self {
            kind,
            name: name.map(str::to_string),
            visibility: None,
            signature: declaration_header(kind, &raw_text),
            raw_text,
            span: Span::default(),
            base_types: Vec::new(),
            children: Vec::new(),
        }
    }

    #[must_use]
    pub const fn with_visibility(mut self, visibility: Visibility) -> Self {
        self.visibility = Some(visibility);
        self
    }

    /// Override the signature (normalized on the way in).
    #[must_use]
    pub fn with_signature(mut self, signature: &str) -> Self {
        self.signature = normalize_signature(signature);
        self
    }

    #[must_use]
    pub fn with_span(mut self, span: Span) -> Self {
        self.span = span;
        self
    }

    #[must_use]
    pub fn with_base_types(mut self, bases: &[&str]) -> Self {
        self.base_types = bases.iter().map(|b| (*b).to_string()).collect();
        self
    }

    #[must_use]
    pub fn with_children(mut self, children: Vec<Self>) -> Self {
        self.children = children;
        self
    }

    /// Name or empty string.
    #[must_use]
    pub fn name_or_empty(&self) -> &str {
        self.name.as_deref().unwrap_or("")
    }

    /// Declared bases, falling back to the text after `:`, `extends` or
    /// `implements` in the signature.
    #[must_use]
    pub fn declared_bases(&self) -> Vec<String> {
        if !self.base_types.is_empty() {
            return self.base_types.clone();
        }
        let header = self.signature.split('{').next().unwrap_or("");
        let tail = if let Some((_, rest)) = header.split_once(':') {
            rest.to_string()
        } else if let Some(idx) = header
            .find(" extends ")
            .or_else(|| header.find(" implements "))
        {
            header[idx..]
                .replace(" extends ", ",")
                .replace(" implements ", ",")
        } else {
            String::new()
        };
        tail.split(',')
            .map(|b| b.split_whitespace().next().unwrap_or("").to_string())
            .filter(|b| !b.is_empty() && b != "where")
            .collect()
    }

}

/// Collapse runs of whitespace to a single space and trim.
#[must_use]
pub fn normalize_signature(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Normalized header of a declaration, excluding its body.
///
/// - Files have no header.
/// - Namespaces and types end at the first `{` or `;`.
/// - Methods and properties end at the first `{` or `=>`.
/// - Fields end before their initializer.
/// - Statements and lines have no body and keep their whole text.
#[must_use]
pub fn declaration_header(kind: NodeKind, raw_text: &str) -> String {
    let end = match kind {
        NodeKind::File => return String::new(),
        NodeKind::Statement | NodeKind::Line => None,
        NodeKind::Namespace | NodeKind::Type => raw_text.find(['{', ';']),
        NodeKind::Field => raw_text.find(['=', ';']),
        NodeKind::Method | NodeKind::Property => {
            match (raw_text.find('{'), raw_text.find("=>")) {
                (Some(a), Some(b)) => Some(a.min(b)),
                (a, b) => a.or(b),
            }
        }
    };
    normalize_signature(end.map_or(raw_text, |i| &raw_text[..i]))
}
