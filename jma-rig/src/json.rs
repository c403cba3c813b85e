//! Loading already-decoded inputs from a JSON interchange document.

use crate::{
    AnimationGraph, BipedControllerFrameType, Error, ReferenceSkeleton, SceneArmature, SceneBone,
    SkeletonNode, Transform,
};
use glam::{Mat4, Quat, Vec3};
use serde::Deserialize;

fn default_one() -> f32 {
    1.0
}

fn default_parent() -> i32 {
    -1
}

fn default_frame_rate() -> f32 {
    30.0
}

fn default_bone_length() -> f32 {
    crate::DEFAULT_BONE_LENGTH
}

#[derive(Debug, Deserialize)]
struct NodeDef {
    name: String,
    #[serde(default = "default_parent")]
    parent: i32,
}

#[derive(Debug, Deserialize)]
struct TransformDef {
    #[serde(default)]
    translation: [f32; 3],
    /// `[x, y, z, w]`
    #[serde(default = "identity_rotation")]
    rotation: [f32; 4],
    #[serde(default = "default_one")]
    scale: f32,
}

fn identity_rotation() -> [f32; 4] {
    [0.0, 0.0, 0.0, 1.0]
}

impl From<TransformDef> for Transform {
    fn from(def: TransformDef) -> Self {
        Self {
            translation: Vec3::from_array(def.translation),
            rotation: Quat::from_array(def.rotation).normalize(),
            scale: def.scale,
        }
    }
}

#[derive(Debug, Deserialize)]
struct AnimationDef {
    version: i32,
    #[serde(default = "default_frame_rate")]
    frame_rate: f32,
    #[serde(default)]
    frame_count: Option<usize>,
    nodes: Vec<NodeDef>,
    #[serde(default)]
    transforms: Vec<Vec<TransformDef>>,
    #[serde(default)]
    broken_skeleton: bool,
    #[serde(default)]
    biped_controller_frame_type: u32,
    #[serde(default)]
    biped_controller_transforms: Vec<TransformDef>,
}

#[derive(Debug, Deserialize)]
struct SkeletonDef {
    version: i32,
    nodes: Vec<NodeDef>,
    /// Either a flat rest pose or JMS-style `[[...]]` with a single frame.
    #[serde(default)]
    transforms: Option<RestPoseDef>,
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum RestPoseDef {
    Frames(Vec<Vec<TransformDef>>),
    Flat(Vec<TransformDef>),
}

#[derive(Debug, Deserialize)]
struct SceneBoneDef {
    name: String,
    #[serde(default)]
    parent: Option<String>,
    /// Column-major 4x4.
    #[serde(default)]
    matrix: Option<[f32; 16]>,
    #[serde(default = "default_bone_length")]
    length: f32,
}

#[derive(Debug, Deserialize)]
struct SceneDef {
    bones: Vec<SceneBoneDef>,
}

fn parse<'de, T: Deserialize<'de>>(input: &'de str) -> Result<T, Error> {
    serde_json::from_str(input).map_err(|e| Error::JsonParse {
        message: e.to_string(),
    })
}

fn nodes(defs: Vec<NodeDef>) -> Vec<SkeletonNode> {
    defs.into_iter()
        .map(|def| SkeletonNode::new(def.name, def.parent))
        .collect()
}

impl AnimationGraph {
    pub fn from_json_str(input: &str) -> Result<Self, Error> {
        let def: AnimationDef = parse(input)?;
        let transforms: Vec<Vec<Transform>> = def
            .transforms
            .into_iter()
            .map(|frame| frame.into_iter().map(Transform::from).collect())
            .collect();
        let biped_controller_frame_type =
            BipedControllerFrameType::from_bits(def.biped_controller_frame_type).ok_or_else(
                || Error::JsonParse {
                    message: format!(
                        "unknown biped controller flags {:#x}",
                        def.biped_controller_frame_type
                    ),
                },
            )?;
        Ok(Self {
            version: def.version,
            frame_rate: def.frame_rate,
            frame_count: def.frame_count.unwrap_or(transforms.len()),
            nodes: nodes(def.nodes),
            transforms,
            broken_skeleton: def.broken_skeleton,
            biped_controller_frame_type,
            biped_controller_transforms: def
                .biped_controller_transforms
                .into_iter()
                .map(Transform::from)
                .collect(),
        })
    }
}

impl ReferenceSkeleton {
    pub fn from_json_str(input: &str) -> Result<Self, Error> {
        let def: SkeletonDef = parse(input)?;
        let rest_pose = match def.transforms {
            Some(RestPoseDef::Frames(frames)) => frames.into_iter().next().unwrap_or_default(),
            Some(RestPoseDef::Flat(flat)) => flat,
            None => Vec::new(),
        };
        Ok(Self {
            version: def.version,
            nodes: nodes(def.nodes),
            rest_pose: rest_pose.into_iter().map(Transform::from).collect(),
        })
    }
}

impl SceneArmature {
    pub fn from_json_str(input: &str) -> Result<Self, Error> {
        let def: SceneDef = parse(input)?;
        Ok(Self {
            bones: def
                .bones
                .into_iter()
                .map(|bone| SceneBone {
                    name: bone.name,
                    parent: bone.parent,
                    rest_matrix: bone
                        .matrix
                        .map_or(Mat4::IDENTITY, |m| Mat4::from_cols_array(&m)),
                    length: bone.length,
                })
                .collect(),
        })
    }
}
