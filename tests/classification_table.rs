//! Exhaustive checks of the impact table over every change type and
//! visibility, including declarations without a visibility.

use decldiff::classify::{PARAMETER_RENAME_CAVEAT, RENAME_REFLECTION_CAVEAT, REORDER_CAVEAT};
use decldiff::{ChangeType, ClassificationInput, Impact, ImpactClassifier, Visibility};

const CLASSIFIER: ImpactClassifier = ImpactClassifier::new();

fn visibilities() -> Vec<Option<Visibility>> {
    std::iter::once(None).chain(Visibility::ALL.into_iter().map(Some)).collect()
}

fn is_public(visibility: Option<Visibility>) -> bool {
    matches!(visibility, Some(Visibility::Public | Visibility::Protected))
}

fn is_internal(visibility: Option<Visibility>) -> bool {
    matches!(
        visibility,
        Some(Visibility::Internal | Visibility::ProtectedInternal | Visibility::PrivateProtected)
    )
}

/// Impact expected for a change whose text differs beyond formatting.
fn expected(change_type: ChangeType, visibility: Option<Visibility>, signature_changed: bool, same_scope: bool) -> Impact {
    let rate = |internal: bool| {
        if is_public(visibility) {
            Impact::BreakingPublicApi
        } else if internal {
            Impact::BreakingInternalApi
        } else {
            Impact::NonBreaking
        }
    };
    match change_type {
        ChangeType::Added | ChangeType::Removed | ChangeType::Renamed => rate(is_internal(visibility)),
        // only plain internal is internal-breaking for signature edits
        ChangeType::Modified if signature_changed => rate(visibility == Some(Visibility::Internal)),
        ChangeType::Moved if !same_scope && visibility == Some(Visibility::Public) => Impact::BreakingPublicApi,
        _ => Impact::NonBreaking,
    }
}

#[test]
fn every_type_and_visibility_matches_the_table() {
    for change_type in ChangeType::ALL {
        for visibility in visibilities() {
            for signature_changed in [false, true] {
                for same_scope in [false, true] {
                    let input = ClassificationInput::new(change_type, visibility)
                        .signature_changed(signature_changed)
                        .same_scope(same_scope);
                    assert_eq!(
                        CLASSIFIER.classify(&input).impact,
                        expected(change_type, visibility, signature_changed, same_scope),
                        "{change_type:?} / {visibility:?} / signature_changed={signature_changed} / same_scope={same_scope}"
                    );
                }
            }
        }
    }
}

#[test]
fn formatting_only_overrides_every_rule() {
    for change_type in ChangeType::ALL {
        for visibility in visibilities() {
            let input = ClassificationInput::new(change_type, visibility)
                .formatting_only(true)
                .signature_changed(true);
            assert_eq!(CLASSIFIER.classify(&input).impact, Impact::FormattingOnly);
        }
    }
}

#[test]
fn classify_basic_agrees_with_full_classification() {
    for change_type in ChangeType::ALL {
        for visibility in visibilities() {
            assert_eq!(
                CLASSIFIER.classify_basic(change_type, visibility),
                CLASSIFIER.classify(&ClassificationInput::new(change_type, visibility)).impact
            );
        }
    }
}

#[test]
fn both_move_scopes() {
    for visibility in visibilities() {
        let same = CLASSIFIER.classify(&ClassificationInput::new(ChangeType::Moved, visibility).same_scope(true));
        assert_eq!(same.impact, Impact::NonBreaking);
        assert_eq!(same.caveats, vec![REORDER_CAVEAT.to_string()]);

        let across = CLASSIFIER.classify(&ClassificationInput::new(ChangeType::Moved, visibility));
        let impact = if visibility == Some(Visibility::Public) {
            Impact::BreakingPublicApi
        } else {
            Impact::NonBreaking
        };
        assert_eq!(across.impact, impact, "{visibility:?}");
        assert!(across.caveats.is_empty());
    }
}

#[test]
fn rename_caveat_covers_private_and_internal_members() {
    for visibility in visibilities() {
        let caveats = CLASSIFIER
            .classify(&ClassificationInput::new(ChangeType::Renamed, visibility))
            .caveats;
        let expects_caveat = matches!(visibility, Some(Visibility::Private | Visibility::Internal));
        assert_eq!(
            caveats.contains(&RENAME_REFLECTION_CAVEAT.to_string()),
            expects_caveat,
            "{visibility:?}"
        );
    }
}

#[test]
fn parameter_rename_caveat_covers_public_protected_and_internal_members() {
    for visibility in visibilities() {
        let caveats = CLASSIFIER
            .classify(
                &ClassificationInput::new(ChangeType::Modified, visibility)
                    .signature_changed(true)
                    .parameter_renamed(true),
            )
            .caveats;
        let expects_caveat = is_public(visibility) || visibility == Some(Visibility::Internal);
        assert_eq!(
            caveats.contains(&PARAMETER_RENAME_CAVEAT.to_string()),
            expects_caveat,
            "{visibility:?}"
        );
    }
}

#[test]
fn combined_internal_forms_only_break_on_identity_changes() {
    for visibility in [Visibility::ProtectedInternal, Visibility::PrivateProtected] {
        let signature = ClassificationInput::new(ChangeType::Modified, Some(visibility)).signature_changed(true);
        assert_eq!(CLASSIFIER.classify(&signature).impact, Impact::NonBreaking, "{visibility:?}");
        assert_eq!(
            CLASSIFIER.classify_basic(ChangeType::Removed, Some(visibility)),
            Impact::BreakingInternalApi,
            "{visibility:?}"
        );
    }
}

#[test]
fn caveats_are_additive_to_impact() {
    let input = ClassificationInput::new(ChangeType::Modified, Some(Visibility::Public))
        .signature_changed(true)
        .parameter_renamed(true);
    let result = CLASSIFIER.classify(&input);
    assert_eq!(result.impact, Impact::BreakingPublicApi);
    assert_eq!(result.caveats.len(), 1);
}
