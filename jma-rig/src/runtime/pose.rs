use super::compose::Compositor;
use super::hierarchy::ResolvedHierarchy;
use crate::{AnimationGraph, BipedControllerFrameType, Error, Transform, VersionThresholds};
use glam::{EulerRot, Mat4, Vec3};

/// Root-level location and yaw driven by the biped controller.
#[derive(Copy, Clone, Debug, Default, PartialEq)]
pub struct RootMotion {
    pub location: Vec3,
    /// Rotation about the vertical axis, in radians.
    pub yaw: f32,
}

impl RootMotion {
    /// Overwrites the components selected by `flags` with those of `controller`.
    pub fn apply(self, flags: BipedControllerFrameType, controller: &Transform) -> Self {
        let mut next = self;
        if flags.contains(BipedControllerFrameType::DX) {
            next.location.x = controller.translation.x;
        }
        if flags.contains(BipedControllerFrameType::DY) {
            next.location.y = controller.translation.y;
        }
        if flags.contains(BipedControllerFrameType::DZ) {
            next.location.z = controller.translation.z;
        }
        if flags.contains(BipedControllerFrameType::DYAW) {
            // Z of an X-then-Y-then-Z euler decomposition.
            let (z, _, _) = controller.rotation.to_euler(EulerRot::ZYX);
            next.yaw = z;
        }
        next
    }

    pub fn matrix(&self) -> Mat4 {
        Mat4::from_translation(self.location) * Mat4::from_rotation_z(self.yaw)
    }
}

#[derive(Clone, Debug)]
pub struct FramePose {
    /// 0-based frame index into the animation.
    pub index: usize,
    /// Pose matrices parallel to [`ResolvedHierarchy::bones`].
    pub bones: Vec<Mat4>,
    pub root_motion: Option<RootMotion>,
}

impl FramePose {
    /// 1-based frame number as shown on a timeline.
    pub fn frame_number(&self) -> usize {
        self.index + 1
    }

    pub fn root_motion_matrix(&self) -> Mat4 {
        self.root_motion
            .as_ref()
            .map_or(Mat4::IDENTITY, RootMotion::matrix)
    }

    /// Bone pose with the frame's root motion applied on top.
    pub fn world_matrix(&self, bone: usize) -> Option<Mat4> {
        self.bones
            .get(bone)
            .map(|pose| self.root_motion_matrix() * *pose)
    }
}

#[derive(Clone, Debug)]
pub struct AnimatedPose {
    pub frame_rate: f32,
    pub frame_count: usize,
    pub frames: Vec<FramePose>,
}

impl AnimatedPose {
    /// Looks up a frame by its 1-based number.
    pub fn frame(&self, frame_number: usize) -> Option<&FramePose> {
        frame_number
            .checked_sub(1)
            .and_then(|index| self.frames.get(index))
    }
}

/// Computes per-frame pose matrices for a resolved hierarchy.
#[derive(Clone, Debug)]
pub struct PoseAnimator<'a> {
    graph: &'a AnimationGraph,
    hierarchy: &'a ResolvedHierarchy,
    compositor: Compositor,
    parent_relative: bool,
}

impl<'a> PoseAnimator<'a> {
    pub fn new(
        graph: &'a AnimationGraph,
        hierarchy: &'a ResolvedHierarchy,
        fix_rotations: bool,
        thresholds: &VersionThresholds,
    ) -> Self {
        let parent_relative = if fix_rotations {
            thresholds.pose_parent_relative_rotated(graph.version)
        } else {
            thresholds.pose_parent_relative(graph.version)
        };
        Self {
            graph,
            hierarchy,
            compositor: Compositor::new(fix_rotations),
            parent_relative,
        }
    }

    pub fn animate(&self) -> Result<AnimatedPose, Error> {
        let flags = self.graph.biped_controller_frame_type;
        let mut root_motion = RootMotion::default();
        let mut frames = Vec::with_capacity(self.graph.transforms.len());

        for (index, frame) in self.graph.transforms.iter().enumerate() {
            let controller = if flags.is_disabled() {
                None
            } else {
                self.graph.biped_controller_transforms.get(index)
            };
            let frame_motion = controller.map(|controller| {
                root_motion = root_motion.apply(flags, controller);
                root_motion
            });

            frames.push(FramePose {
                index,
                bones: self.pose_frame(index, frame)?,
                root_motion: frame_motion,
            });
        }

        log::debug!(
            "posed {} bones over {} frames",
            self.hierarchy.bones.len(),
            frames.len()
        );
        Ok(AnimatedPose {
            frame_rate: self.graph.frame_rate,
            frame_count: self.graph.frame_count,
            frames,
        })
    }

    /// Poses every bone for one frame, parents first.
    pub fn pose_frame(&self, index: usize, frame: &[Transform]) -> Result<Vec<Mat4>, Error> {
        let mut poses: Vec<Mat4> = Vec::with_capacity(self.hierarchy.bones.len());
        for bone in &self.hierarchy.bones {
            let local = frame
                .get(bone.node_index)
                .ok_or(Error::MissingFrameTransform {
                    frame: index,
                    node: bone.node_index,
                })?
                .pose_matrix();
            let parent = bone.parent.and_then(|parent| poses.get(parent)).copied();
            let space = self
                .compositor
                .space(self.parent_relative && parent.is_some());
            poses.push(self.compositor.compose(space, parent, local));
        }
        Ok(poses)
    }
}
