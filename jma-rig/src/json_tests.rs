use crate::{
    AnimationGraph, BipedControllerFrameType, Diagnostics, Error, HierarchyMode, Importer,
    ReferenceSkeleton, References, SceneArmature,
};
use glam::{Mat4, Quat, Vec3};

const ANIMATION: &str = r#"{
    "version": 16392,
    "frame_rate": 30,
    "nodes": [
        { "name": "frame" },
        { "name": "pelvis", "parent": 0 }
    ],
    "transforms": [
        [
            { "translation": [0, 0, 1] },
            { "translation": [0, 0, 2], "rotation": [0, 0, 0.70710677, 0.70710677] }
        ],
        [
            { "translation": [0, 0, 1], "scale": 2 },
            { "translation": [0, 0, 3] }
        ]
    ],
    "biped_controller_frame_type": 9,
    "biped_controller_transforms": [
        { "translation": [4, 5, 6] },
        { "translation": [7, 8, 9] }
    ]
}"#;

#[test]
fn animation_graph_from_json() {
    let graph = AnimationGraph::from_json_str(ANIMATION).unwrap();
    assert_eq!(graph.version, 16392);
    assert_eq!(graph.frame_count, 2);
    assert_eq!(graph.nodes[0].parent, -1);
    assert_eq!(graph.nodes[1].parent_index(), Some(0));
    assert_eq!(graph.transforms[1][0].scale, 2.0);
    assert_eq!(graph.transforms[0][0].rotation, Quat::IDENTITY);
    assert_eq!(
        graph.biped_controller_frame_type,
        BipedControllerFrameType::DX | BipedControllerFrameType::DYAW
    );
    assert_eq!(
        graph.biped_controller_transforms[1].translation,
        Vec3::new(7.0, 8.0, 9.0)
    );
}

#[test]
fn animation_from_json_imports() {
    let graph = AnimationGraph::from_json_str(ANIMATION).unwrap();
    let imported = Importer::default()
        .import(&graph, References::NONE, None, &mut Diagnostics::new())
        .unwrap();
    assert_eq!(imported.hierarchy.mode, HierarchyMode::GraphDriven);
    let motion = imported.animation.frames[1].root_motion.unwrap();
    assert_eq!(motion.location, Vec3::new(7.0, 0.0, 0.0));
}

#[test]
fn reference_skeleton_accepts_single_frame_or_flat_rest_pose() {
    let framed = ReferenceSkeleton::from_json_str(
        r#"{ "version": 8213, "nodes": [{ "name": "frame" }],
             "transforms": [[{ "translation": [1, 2, 3] }]] }"#,
    )
    .unwrap();
    let flat = ReferenceSkeleton::from_json_str(
        r#"{ "version": 8213, "nodes": [{ "name": "frame" }],
             "transforms": [{ "translation": [1, 2, 3] }] }"#,
    )
    .unwrap();
    assert_eq!(framed.rest_pose, flat.rest_pose);
    assert_eq!(framed.rest_pose[0].translation, Vec3::new(1.0, 2.0, 3.0));
}

#[test]
fn scene_armature_from_json() {
    let armature = SceneArmature::from_json_str(
        r#"{ "bones": [
            { "name": "frame" },
            { "name": "pelvis", "parent": "frame", "length": 2,
              "matrix": [1,0,0,0, 0,1,0,0, 0,0,1,0, 0,0,4,1] }
        ] }"#,
    )
    .unwrap();
    assert_eq!(armature.bones[0].rest_matrix, Mat4::IDENTITY);
    assert_eq!(
        armature.bones[1].rest_matrix,
        Mat4::from_translation(Vec3::new(0.0, 0.0, 4.0))
    );
    assert_eq!(armature.bones[1].length, 2.0);
    assert_eq!(armature.bones[1].parent.as_deref(), Some("frame"));
}

#[test]
fn unknown_controller_bits_are_rejected() {
    let err = AnimationGraph::from_json_str(
        r#"{ "version": 16392, "nodes": [], "biped_controller_frame_type": 32 }"#,
    )
    .unwrap_err();
    assert!(matches!(err, Error::JsonParse { .. }));
}

#[test]
fn malformed_json_is_reported() {
    let err = ReferenceSkeleton::from_json_str("{ not json").unwrap_err();
    assert!(matches!(err, Error::JsonParse { .. }));
}
