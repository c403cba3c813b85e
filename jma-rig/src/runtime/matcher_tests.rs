use super::test_support::{assert_approx, graph, offset, reference, stepped_frame};
use crate::{
    DEFAULT_BONE_LENGTH, NameMatch, NodeMatcher, ReferenceSlot, References, RestSource,
    last_match, name_matches,
};
use glam::Vec3;

#[test]
fn name_matching_is_case_insensitive_substring() {
    assert_eq!(name_matches("Pelvis", "pelvis"), NameMatch::Exact);
    assert_eq!(name_matches("pelvis", "bip01 PELVIS"), NameMatch::Partial);
    assert_eq!(name_matches("bip01 pelvis", "pelvis"), NameMatch::None);
    assert!(!NameMatch::None.is_match());
}

#[test]
fn last_matching_reference_node_wins() {
    let skeleton = reference(
        8213,
        &[("frame", -1), ("l_hand", 0), ("l_hand_marker", 1)],
        stepped_frame(3),
    );
    assert_eq!(last_match("l_hand", &skeleton), Some(2));
    assert_eq!(last_match("spine", &skeleton), None);
}

#[test]
fn without_references_every_node_uses_its_first_frame() {
    let g = graph(
        16392,
        &[("root", -1), ("spine", 0), ("head", 1)],
        vec![stepped_frame(3), vec![offset(9.0, 9.0, 9.0); 3]],
    );
    let matches = NodeMatcher::new(&g, References::NONE).match_all().unwrap();

    for (index, node_match) in matches.iter().enumerate() {
        assert_eq!(node_match.source, RestSource::Graph);
        assert_eq!(node_match.rest, g.transforms[0][index]);
        assert_eq!(node_match.source_version, 16392);
        assert_eq!(node_match.parent_name(), None);
    }
    // root -> spine is 2 units away, spine -> head is 3, head is a leaf.
    assert_approx(matches[0].bone_length, 2.0);
    assert_approx(matches[1].bone_length, 3.0);
    assert_approx(matches[2].bone_length, DEFAULT_BONE_LENGTH);
}

#[test]
fn reference_b_overrides_reference_a() {
    let g = graph(16392, &[("root", -1), ("spine", 0)], vec![stepped_frame(2)]);
    let a = reference(
        8209,
        &[("root", -1), ("spine", 0)],
        vec![offset(0.0, 0.0, 0.0), offset(0.0, 0.0, 10.0)],
    );
    let b = reference(
        8213,
        &[("b root", -1), ("b spine", 0)],
        vec![offset(0.0, 0.0, 0.0), offset(0.0, 0.0, 20.0)],
    );
    let matches = NodeMatcher::new(&g, References::new(Some(&a), Some(&b)))
        .match_all()
        .unwrap();

    assert_eq!(
        matches[1].source,
        RestSource::Reference {
            slot: ReferenceSlot::B,
            index: 1
        }
    );
    assert_eq!(matches[1].source_version, 8213);
    assert_eq!(matches[1].rest.translation, Vec3::new(0.0, 0.0, 20.0));
    assert_eq!(matches[1].parent_name(), Some("b root"));
    assert_eq!(matches[0].parent_name(), None);
}

#[test]
fn unmatched_nodes_fall_back_to_reference_root() {
    let g = graph(
        16390,
        &[("frame", -1), ("gun", 0)],
        vec![stepped_frame(2)],
    );
    let a = reference(
        8200,
        &[("frame root", -1), ("pelvis", 0)],
        vec![offset(1.0, 2.0, 3.0), offset(0.0, 0.0, 4.0)],
    );

    let matcher = NodeMatcher::new(&g, References::new(Some(&a), None)).with_root_fallback(true);
    assert!(matcher.is_fp_root_file_a());
    let matches = matcher.match_all().unwrap();

    assert_eq!(matches[1].source, RestSource::FallbackRoot { slot: ReferenceSlot::A });
    assert_eq!(matches[1].rest.translation, Vec3::new(1.0, 2.0, 3.0));
    assert_approx(matches[1].bone_length, DEFAULT_BONE_LENGTH);
    assert_eq!(matches[1].source_version, 16390);
}

#[test]
fn fallback_prefers_b_when_a_root_does_not_match() {
    let g = graph(16390, &[("base", -1), ("gun", 0)], vec![stepped_frame(2)]);
    let a = reference(8200, &[("frame", -1)], vec![offset(1.0, 0.0, 0.0)]);
    let b = reference(8200, &[("other", -1)], vec![offset(2.0, 0.0, 0.0)]);

    let matches = NodeMatcher::new(&g, References::new(Some(&a), Some(&b)))
        .with_root_fallback(true)
        .match_all()
        .unwrap();
    assert_eq!(matches[1].source, RestSource::FallbackRoot { slot: ReferenceSlot::B });
    assert_eq!(matches[1].rest.translation, Vec3::new(2.0, 0.0, 0.0));
}

#[test]
fn missing_rest_transform_is_an_error() {
    let g = graph(16392, &[("root", -1), ("spine", 0)], vec![stepped_frame(2)]);
    let a = reference(8213, &[("root", -1), ("spine", 0)], vec![offset(0.0, 0.0, 0.0)]);
    let err = NodeMatcher::new(&g, References::new(Some(&a), None))
        .match_all()
        .unwrap_err();
    assert!(matches!(
        err,
        crate::Error::MissingRestTransform {
            skeleton: ReferenceSlot::A,
            node: 1
        }
    ));
}

#[test]
fn usable_parent_name_skips_rejected_references() {
    let g = graph(16392, &[("spine", -1)], vec![stepped_frame(1)]);
    let a = reference(8213, &[("pelvis", -1), ("spine", 0)], stepped_frame(2));
    let b = reference(8213, &[("spine", -1)], stepped_frame(1));
    let matches = NodeMatcher::new(&g, References::new(Some(&a), Some(&b)))
        .match_all()
        .unwrap();

    assert_eq!(matches[0].matched_slot(), Some(ReferenceSlot::B));
    assert_eq!(matches[0].hits.len(), 2);
    assert_eq!(matches[0].parent_name(), None);
    assert_eq!(
        matches[0].usable_parent_name(References::new(Some(&a), None)),
        Some("pelvis")
    );
    assert_eq!(matches[0].usable_parent_name(References::NONE), None);
}
