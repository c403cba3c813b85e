use crate::{
    AnimationGraph, BipedControllerFrameType, ReferenceSkeleton, SkeletonNode, Transform,
};
use glam::{Mat4, Quat, Vec3};

pub(crate) fn assert_approx(actual: f32, expected: f32) {
    let diff = (actual - expected).abs();
    assert!(
        diff <= 1.0e-4,
        "expected {expected}, got {actual} (diff {diff})"
    );
}

pub(crate) fn assert_mat_approx(actual: Mat4, expected: Mat4) {
    let a = actual.to_cols_array();
    let e = expected.to_cols_array();
    for i in 0..16 {
        let diff = (a[i] - e[i]).abs();
        assert!(
            diff <= 1.0e-4,
            "matrix element {i}: expected {}, got {} (diff {diff})\nexpected {expected:?}\nactual {actual:?}",
            e[i],
            a[i]
        );
    }
}

pub(crate) fn nodes(spec: &[(&str, i32)]) -> Vec<SkeletonNode> {
    spec.iter()
        .map(|(name, parent)| SkeletonNode::new(*name, *parent))
        .collect()
}

pub(crate) fn offset(x: f32, y: f32, z: f32) -> Transform {
    Transform::new(Vec3::new(x, y, z), Quat::IDENTITY)
}

pub(crate) fn turned(x: f32, y: f32, z: f32, degrees_z: f32) -> Transform {
    Transform::new(
        Vec3::new(x, y, z),
        Quat::from_rotation_z(degrees_z.to_radians()),
    )
}

pub(crate) fn graph(
    version: i32,
    nodes_spec: &[(&str, i32)],
    frames: Vec<Vec<Transform>>,
) -> AnimationGraph {
    AnimationGraph {
        version,
        frame_rate: 30.0,
        frame_count: frames.len(),
        nodes: nodes(nodes_spec),
        transforms: frames,
        broken_skeleton: false,
        biped_controller_frame_type: BipedControllerFrameType::DISABLE,
        biped_controller_transforms: Vec::new(),
    }
}

/// One frame where node `i` sits at `(i + 1, 0, 0)`.
pub(crate) fn stepped_frame(count: usize) -> Vec<Transform> {
    (0..count).map(|i| offset(i as f32 + 1.0, 0.0, 0.0)).collect()
}

pub(crate) fn reference(
    version: i32,
    nodes_spec: &[(&str, i32)],
    rest_pose: Vec<Transform>,
) -> ReferenceSkeleton {
    ReferenceSkeleton {
        version,
        nodes: nodes(nodes_spec),
        rest_pose,
    }
}
