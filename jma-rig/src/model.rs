use bitflags::bitflags;
use glam::{Mat4, Quat, Vec3};

/// A single node transform as stored in JMA/JMS files.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Transform {
    pub translation: Vec3,
    pub rotation: Quat,
    pub scale: f32,
}

impl Default for Transform {
    fn default() -> Self {
        Self::IDENTITY
    }
}

impl Transform {
    pub const IDENTITY: Self = Self {
        translation: Vec3::ZERO,
        rotation: Quat::IDENTITY,
        scale: 1.0,
    };

    pub fn new(translation: Vec3, rotation: Quat) -> Self {
        Self {
            translation,
            rotation,
            scale: 1.0,
        }
    }

    pub fn with_scale(mut self, scale: f32) -> Self {
        self.scale = scale;
        self
    }

    /// `translate · rotate`, the rest-pose local matrix.
    pub fn rest_matrix(&self) -> Mat4 {
        Mat4::from_translation(self.translation) * Mat4::from_quat(self.rotation)
    }

    /// `translate · rotate · scale`, the animated local matrix.
    pub fn pose_matrix(&self) -> Mat4 {
        Mat4::from_translation(self.translation)
            * Mat4::from_quat(self.rotation)
            * Mat4::from_scale(Vec3::splat(self.scale))
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SkeletonNode {
    pub name: String,
    /// `-1` marks a root.
    pub parent: i32,
}

impl SkeletonNode {
    pub fn new(name: impl Into<String>, parent: i32) -> Self {
        Self {
            name: name.into(),
            parent,
        }
    }

    pub fn parent_index(&self) -> Option<usize> {
        usize::try_from(self.parent).ok()
    }
}

bitflags! {
    /// Which components of the biped controller transform drive the root each frame.
    #[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
    pub struct BipedControllerFrameType: u32 {
        const DX = 1 << 0;
        const DY = 1 << 1;
        const DZ = 1 << 2;
        const DYAW = 1 << 3;
    }
}

impl BipedControllerFrameType {
    pub const DISABLE: Self = Self::empty();

    pub fn is_disabled(self) -> bool {
        self == Self::DISABLE
    }
}

/// Decoded JMA animation.
#[derive(Clone, Debug)]
pub struct AnimationGraph {
    pub version: i32,
    pub frame_rate: f32,
    pub frame_count: usize,
    pub nodes: Vec<SkeletonNode>,
    /// `transforms[frame][node]`
    pub transforms: Vec<Vec<Transform>>,
    pub broken_skeleton: bool,
    pub biped_controller_frame_type: BipedControllerFrameType,
    pub biped_controller_transforms: Vec<Transform>,
}

impl AnimationGraph {
    pub fn node_names(&self) -> impl Iterator<Item = &str> {
        self.nodes.iter().map(|node| node.name.as_str())
    }

    pub fn first_frame(&self) -> Option<&[Transform]> {
        self.transforms.first().map(Vec::as_slice)
    }
}

/// Decoded JMS skeleton used as a rest-pose and hierarchy reference.
#[derive(Clone, Debug)]
pub struct ReferenceSkeleton {
    pub version: i32,
    pub nodes: Vec<SkeletonNode>,
    /// One transform per node.
    pub rest_pose: Vec<Transform>,
}

impl ReferenceSkeleton {
    pub fn root_name(&self) -> Option<&str> {
        self.nodes.first().map(|node| node.name.as_str())
    }
}

/// Which of the two reference skeleton slots a value came from.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash)]
pub enum ReferenceSlot {
    A,
    B,
}

impl std::fmt::Display for ReferenceSlot {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::A => f.write_str("A"),
            Self::B => f.write_str("B"),
        }
    }
}

/// Up to two reference skeletons supplied with an import.
#[derive(Copy, Clone, Debug, Default)]
pub struct References<'a> {
    pub a: Option<&'a ReferenceSkeleton>,
    pub b: Option<&'a ReferenceSkeleton>,
}

impl<'a> References<'a> {
    pub const NONE: Self = Self { a: None, b: None };

    pub fn new(a: Option<&'a ReferenceSkeleton>, b: Option<&'a ReferenceSkeleton>) -> Self {
        Self { a, b }
    }

    pub fn get(&self, slot: ReferenceSlot) -> Option<&'a ReferenceSkeleton> {
        match slot {
            ReferenceSlot::A => self.a,
            ReferenceSlot::B => self.b,
        }
    }

    /// A lone B skeleton is treated as A.
    pub fn normalized(self) -> Self {
        match (self.a, self.b) {
            (None, Some(b)) => Self { a: Some(b), b: None },
            _ => self,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.a.is_none() && self.b.is_none()
    }

    /// Supplied references in matching order (A before B).
    pub fn iter(&self) -> impl Iterator<Item = (ReferenceSlot, &'a ReferenceSkeleton)> {
        [
            self.a.map(|skeleton| (ReferenceSlot::A, skeleton)),
            self.b.map(|skeleton| (ReferenceSlot::B, skeleton)),
        ]
        .into_iter()
        .flatten()
    }
}

#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash, Default)]
pub enum GameVersion {
    HaloCe,
    Halo2,
    #[default]
    Halo3,
}

impl GameVersion {
    /// Halo 2 and Halo 3 share the anatomy parent fixes.
    pub fn supports_parent_fix(self) -> bool {
        matches!(self, Self::Halo2 | Self::Halo3)
    }
}

#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash)]
pub enum FileType {
    Jma,
    Jms,
}

#[derive(Clone, Debug, Default)]
pub struct ImportOptions {
    pub game_version: GameVersion,
    pub fix_parents: bool,
    pub fix_rotations: bool,
    pub thresholds: crate::VersionThresholds,
}

/// A bone of an armature that already exists in the host scene.
#[derive(Clone, Debug)]
pub struct SceneBone {
    pub name: String,
    pub parent: Option<String>,
    pub rest_matrix: Mat4,
    pub length: f32,
}

#[derive(Clone, Debug, Default)]
pub struct SceneArmature {
    pub bones: Vec<SceneBone>,
}
