use super::compose::{Compositor, CoordinateSpace};
use super::hierarchy::{BoneLayout, BoneRest, ResolvedBone, ResolvedHierarchy};
use crate::{
    AnimationGraph, DEFAULT_BONE_LENGTH, FileType, GameVersion, ReferenceSkeleton, SkeletonNode,
    Transform, VersionThresholds,
};

fn mean_child_length(nodes: &[SkeletonNode], rest: &[Transform], index: usize) -> f32 {
    let (sum, count) = nodes
        .iter()
        .zip(rest)
        .filter(|(node, _)| node.parent_index() == Some(index))
        .fold((0.0f32, 0usize), |(sum, count), (_, transform)| {
            (sum + transform.translation.length(), count + 1)
        });
    if count == 0 {
        return DEFAULT_BONE_LENGTH;
    }
    let mean = sum / count as f32;
    if mean > 0.0 { mean } else { DEFAULT_BONE_LENGTH }
}

/// Tail length of an animation node, measured on the first frame.
pub fn graph_bone_length(graph: &AnimationGraph, index: usize) -> f32 {
    match graph.first_frame() {
        Some(frame) => mean_child_length(&graph.nodes, frame, index),
        None => DEFAULT_BONE_LENGTH,
    }
}

/// Tail length of a reference node, measured on the rest pose.
pub fn reference_bone_length(skeleton: &ReferenceSkeleton, index: usize) -> f32 {
    mean_child_length(&skeleton.nodes, &skeleton.rest_pose, index)
}

/// Composes world-space rest matrices for a bone layout.
#[derive(Clone, Debug)]
pub struct RestCompositor {
    compositor: Compositor,
    /// Rest transforms recorded below this version are parent-relative.
    matrix_check: i32,
}

impl RestCompositor {
    pub fn new(
        fix_rotations: bool,
        file_type: FileType,
        game_version: GameVersion,
        thresholds: &VersionThresholds,
    ) -> Self {
        Self {
            compositor: Compositor::new(fix_rotations),
            matrix_check: thresholds.matrix_check(file_type, game_version),
        }
    }

    pub fn matrix_check(&self) -> i32 {
        self.matrix_check
    }

    pub fn compose(&self, layout: BoneLayout) -> ResolvedHierarchy {
        let mut bones: Vec<ResolvedBone> = Vec::with_capacity(layout.bones.len());

        for link in layout.bones {
            let parent_world = link
                .parent
                .and_then(|parent| bones.get(parent))
                .map(|parent| parent.rest_world);

            let bone = match link.rest {
                BoneRest::Matched(node_match) => {
                    let parent_relative = node_match.source_version < self.matrix_check
                        && parent_world.is_some()
                        && !link.is_root;
                    let space = self.compositor.space(parent_relative);
                    let rest_local = node_match.rest.rest_matrix();
                    ResolvedBone {
                        name: link.name,
                        node_index: link.node_index,
                        parent: link.parent,
                        is_root: link.is_root,
                        source: Some(node_match.source),
                        source_version: node_match.source_version,
                        space,
                        rest_local,
                        rest_world: self.compositor.compose(space, parent_world, rest_local),
                        length: node_match.bone_length,
                    }
                }
                BoneRest::Scene { matrix, length } => ResolvedBone {
                    name: link.name,
                    node_index: link.node_index,
                    parent: link.parent,
                    is_root: link.is_root,
                    source: None,
                    source_version: self.matrix_check,
                    space: CoordinateSpace::ModernAbsolute,
                    rest_local: parent_world.map_or(matrix, |parent| parent.inverse() * matrix),
                    rest_world: matrix,
                    length,
                },
            };
            bones.push(bone);
        }

        ResolvedHierarchy {
            mode: layout.mode,
            bones,
        }
    }
}
