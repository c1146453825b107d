//! Static impact and caveat tables.

use crate::model::{Impact, Visibility};

/// Impact of adding, removing or renaming a declaration.
pub(super) static IDENTITY_CHANGE_RULES: [(Visibility, Impact); 7] = [
    (Visibility::Public, Impact::BreakingPublicApi),
    (Visibility::Protected, Impact::BreakingPublicApi),
    (Visibility::Internal, Impact::BreakingInternalApi),
    (Visibility::ProtectedInternal, Impact::BreakingInternalApi),
    (Visibility::PrivateProtected, Impact::BreakingInternalApi),
    (Visibility::Private, Impact::NonBreaking),
    (Visibility::Local, Impact::NonBreaking),
];

/// Impact of a signature change on a modified declaration.
///
/// Only plain `internal` is rated internal-breaking here; the combined
/// protected/private forms fall through to non-breaking.
pub(super) static SIGNATURE_CHANGE_RULES: [(Visibility, Impact); 7] = [
    (Visibility::Public, Impact::BreakingPublicApi),
    (Visibility::Protected, Impact::BreakingPublicApi),
    (Visibility::Internal, Impact::BreakingInternalApi),
    (Visibility::ProtectedInternal, Impact::NonBreaking),
    (Visibility::PrivateProtected, Impact::NonBreaking),
    (Visibility::Private, Impact::NonBreaking),
    (Visibility::Local, Impact::NonBreaking),
];

/// Impact of moving a declaration into another container.
pub(super) static CROSS_SCOPE_MOVE_RULES: [(Visibility, Impact); 7] = [
    (Visibility::Public, Impact::BreakingPublicApi),
    (Visibility::Protected, Impact::NonBreaking),
    (Visibility::Internal, Impact::NonBreaking),
    (Visibility::ProtectedInternal, Impact::NonBreaking),
    (Visibility::PrivateProtected, Impact::NonBreaking),
    (Visibility::Private, Impact::NonBreaking),
    (Visibility::Local, Impact::NonBreaking),
];

/// Look up a visibility in a rule table. Missing visibility is non-breaking.
pub(super) fn lookup(table: &[(Visibility, Impact)], visibility: Option<Visibility>) -> Impact {
    visibility
        .and_then(|v| table.iter().find(|(key, _)| *key == v).map(|(_, impact)| *impact))
        .unwrap_or(Impact::NonBreaking)
}

pub const PARAMETER_RENAME_CAVEAT: &str = "Parameter rename may break callers using named arguments";
pub const RENAME_REFLECTION_CAVEAT: &str =
    "Rename may break reflection-based or name-keyed serialization access";
pub const REORDER_CAVEAT: &str = "Reordering may affect order-dependent consumers";
