use super::compose::CoordinateSpace;
use super::matcher::{NodeMatch, RestSource, name_matches};
use crate::{
    AnimationGraph, Diagnostics, Error, GameVersion, References, SceneArmature, VersionThresholds,
};
use glam::Mat4;

/// Graph bone indices of the anatomical landmarks used to repair parents.
///
/// Only two thighs and two clavicles are tracked; a third match is ignored.
/// `pelvis` and `spine1` take the last matching node.
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct ParentOverrideTable {
    pub pelvis: Option<usize>,
    pub thigh: [Option<usize>; 2],
    pub spine1: Option<usize>,
    pub clavicle: [Option<usize>; 2],
}

impl ParentOverrideTable {
    pub fn scan(graph: &AnimationGraph) -> Self {
        let mut table = Self::default();
        for (index, node) in graph.nodes.iter().enumerate() {
            let name = node.name.as_str();
            if name.contains("pelvis") {
                table.pelvis = Some(index);
            }
            if name.contains("thigh") {
                fill_pair(&mut table.thigh, index);
            } else if name.contains("spine1") {
                table.spine1 = Some(index);
            } else if name.contains("clavicle") {
                fill_pair(&mut table.clavicle, index);
            }
        }
        table
    }

    fn pelvis_resolved(&self) -> Option<usize> {
        self.pelvis
            .filter(|_| self.thigh.iter().all(Option::is_some))
    }

    fn spine1_resolved(&self) -> Option<usize> {
        self.spine1
            .filter(|_| self.clavicle.iter().all(Option::is_some))
    }

    /// Parent to use for `name`, given the parent stored in the graph.
    pub fn parent_for(&self, name: &str, parent: usize) -> usize {
        if name.contains("thigh") {
            if let Some(pelvis) = self.pelvis_resolved() {
                return pelvis;
            }
        } else if name.contains("clavicle") {
            if let Some(spine1) = self.spine1_resolved() {
                return spine1;
            }
        }
        parent
    }
}

fn fill_pair(pair: &mut [Option<usize>; 2], index: usize) {
    if let Some(slot) = pair.iter_mut().find(|slot| slot.is_none()) {
        *slot = Some(index);
    }
}

#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub enum HierarchyMode {
    /// Parent links come from the animation graph.
    GraphDriven,
    /// Parent links come from the reference skeletons.
    ReferenceDriven,
    /// An armature already present in the host scene is reused.
    Scene,
}

/// Rest information carried from construction into the rest compositor.
#[derive(Clone, Debug)]
pub enum BoneRest {
    Matched(NodeMatch),
    Scene { matrix: Mat4, length: f32 },
}

/// A bone placed by the hierarchy builder, before its rest matrix is composed.
#[derive(Clone, Debug)]
pub struct BoneLink {
    pub name: String,
    /// Index of the animation node that drives this bone.
    pub node_index: usize,
    /// Index into the layout's bone list; always smaller than this bone's own index.
    pub parent: Option<usize>,
    /// Excluded from parent-relative rest composition.
    pub is_root: bool,
    pub rest: BoneRest,
}

#[derive(Clone, Debug)]
pub struct BoneLayout {
    pub mode: HierarchyMode,
    pub bones: Vec<BoneLink>,
}

#[derive(Clone, Debug)]
pub struct ResolvedBone {
    pub name: String,
    pub node_index: usize,
    pub parent: Option<usize>,
    pub is_root: bool,
    /// `None` for bones reused from a scene armature.
    pub source: Option<RestSource>,
    pub source_version: i32,
    pub space: CoordinateSpace,
    pub rest_local: Mat4,
    pub rest_world: Mat4,
    pub length: f32,
}

/// Bones in construction order (parent before child) with composed rest matrices.
#[derive(Clone, Debug)]
pub struct ResolvedHierarchy {
    pub mode: HierarchyMode,
    pub bones: Vec<ResolvedBone>,
}

impl ResolvedHierarchy {
    pub fn bone_for_node(&self, node_index: usize) -> Option<usize> {
        self.bones
            .iter()
            .position(|bone| bone.node_index == node_index)
    }

    pub fn find_bone(&self, name: &str) -> Option<&ResolvedBone> {
        self.bones.iter().find(|bone| bone.name == name)
    }

    pub fn parent_of(&self, bone: usize) -> Option<&ResolvedBone> {
        self.bones
            .get(bone)
            .and_then(|bone| bone.parent)
            .and_then(|parent| self.bones.get(parent))
    }
}

/// Orders nodes breadth-first by depth from their roots, keeping stored order within a layer.
pub fn layer_order(parents: &[Option<usize>]) -> Result<Vec<usize>, Error> {
    let mut depths = Vec::with_capacity(parents.len());
    for node in 0..parents.len() {
        let mut depth = 0usize;
        let mut current = node;
        while let Some(parent) = parents[current] {
            if parent >= parents.len() {
                return Err(Error::ParentIndexOutOfRange {
                    node: current,
                    parent,
                });
            }
            depth += 1;
            if depth > parents.len() {
                return Err(Error::HierarchyCycle { node });
            }
            current = parent;
        }
        depths.push(depth);
    }

    let mut order: Vec<usize> = (0..parents.len()).collect();
    order.sort_by_key(|&node| depths[node]);
    Ok(order)
}

fn is_reference_root(name: &str, references: References<'_>) -> bool {
    references
        .iter()
        .filter_map(|(_, skeleton)| skeleton.root_name())
        .any(|root| name_matches(name, root).is_match())
}

fn is_right_hand(name: &str) -> bool {
    let name = name.to_lowercase();
    name.contains("r_hand") || name.contains("r hand")
}

/// Places bones and resolves their parents.
#[derive(Clone, Debug)]
pub struct HierarchyBuilder<'a> {
    graph: &'a AnimationGraph,
    /// References allowed to supply hierarchy information.
    usable: References<'a>,
    thresholds: &'a VersionThresholds,
}

impl<'a> HierarchyBuilder<'a> {
    pub fn new(
        graph: &'a AnimationGraph,
        usable: References<'a>,
        thresholds: &'a VersionThresholds,
    ) -> Self {
        Self {
            graph,
            usable,
            thresholds,
        }
    }

    /// Whether the graph's own parent links may be used.
    pub fn graph_is_usable(&self) -> bool {
        !self.graph.broken_skeleton && self.thresholds.graph_has_hierarchy(self.graph.version)
    }

    /// Whether a legacy graph may stand in when no reference skeleton is usable.
    pub fn legacy_graph_is_usable(&self) -> bool {
        !self.graph.broken_skeleton && self.thresholds.is_legacy(self.graph.version)
    }

    /// Parent overrides are only scanned for when requested for Halo 2 and Halo 3.
    pub fn parent_overrides(
        &self,
        fix_parents: bool,
        game_version: GameVersion,
    ) -> ParentOverrideTable {
        if fix_parents && game_version.supports_parent_fix() {
            ParentOverrideTable::scan(self.graph)
        } else {
            ParentOverrideTable::default()
        }
    }

    /// Builds from the graph's parent indices.
    ///
    /// Legacy graphs are laid out by layer; every other version must already
    /// store parents before children.
    pub fn build_graph_driven(
        &self,
        matches: Vec<NodeMatch>,
        overrides: &ParentOverrideTable,
    ) -> Result<BoneLayout, Error> {
        let node_count = self.graph.nodes.len();
        let mut parents = Vec::with_capacity(node_count);
        for (index, node) in self.graph.nodes.iter().enumerate() {
            let parent = match node.parent_index() {
                Some(parent) if parent >= node_count => {
                    return Err(Error::ParentIndexOutOfRange {
                        node: index,
                        parent,
                    });
                }
                Some(parent) => Some(overrides.parent_for(&node.name, parent)),
                None => None,
            };
            parents.push(parent);
        }

        let order = if self.thresholds.is_legacy(self.graph.version) {
            layer_order(&parents)?
        } else {
            let forward = parents.iter().enumerate().find_map(|(node, parent)| {
                parent
                    .filter(|&parent| parent >= node)
                    .map(|parent| (node, parent))
            });
            if let Some((node, parent)) = forward {
                return Err(Error::ParentAfterChild { node, parent });
            }
            (0..node_count).collect()
        };

        let mut bone_of_node = vec![None; node_count];
        let mut matches: Vec<Option<NodeMatch>> = matches.into_iter().map(Some).collect();
        let mut bones = Vec::with_capacity(node_count);
        for node_index in order {
            let name = self.graph.nodes[node_index].name.clone();
            let parent = parents[node_index].and_then(|parent| bone_of_node[parent]);
            let rest = matches
                .get_mut(node_index)
                .and_then(Option::take)
                .ok_or(Error::MissingFrameTransform {
                    frame: 0,
                    node: node_index,
                })?;
            let is_root = parent.is_none() || is_reference_root(&name, self.usable);
            bone_of_node[node_index] = Some(bones.len());
            bones.push(BoneLink {
                name,
                node_index,
                parent,
                is_root,
                rest: BoneRest::Matched(rest),
            });
        }

        log::debug!("built {} bones from animation graph parents", bones.len());
        Ok(BoneLayout {
            mode: HierarchyMode::GraphDriven,
            bones,
        })
    }

    /// Builds from the parent names recorded by reference skeleton matches.
    pub fn build_reference_driven(&self, matches: Vec<NodeMatch>) -> Result<BoneLayout, Error> {
        let mut bones: Vec<BoneLink> = Vec::with_capacity(self.graph.nodes.len());
        let mut right_hand = None;

        for (node_index, (node, node_match)) in
            self.graph.nodes.iter().zip(matches).enumerate()
        {
            let name = node.name.clone();
            let parent_name = node_match.usable_parent_name(self.usable);

            // Last earlier bone whose name occurs in the recorded parent name.
            let mut parent = parent_name.and_then(|parent_name| {
                bones
                    .iter()
                    .rposition(|bone| parent_name.contains(bone.name.as_str()))
            });
            if parent.is_none() && name.contains("gun") {
                parent = right_hand;
            }

            let reference_root = is_reference_root(&name, self.usable);
            let is_root = reference_root || parent.is_none();
            if is_right_hand(&name) {
                right_hand = Some(bones.len());
            }
            bones.push(BoneLink {
                name,
                node_index,
                parent,
                is_root,
                rest: BoneRest::Matched(node_match),
            });
        }

        log::debug!("built {} bones from reference skeletons", bones.len());
        Ok(BoneLayout {
            mode: HierarchyMode::ReferenceDriven,
            bones,
        })
    }
}

/// Whether `armature` can be animated by `graph` directly.
///
/// Legacy graphs only compare bone counts. Newer graphs need every node name
/// present; when some but not all are, the missing ones are reported.
pub fn check_scene_armature(
    graph: &AnimationGraph,
    armature: &SceneArmature,
    thresholds: &VersionThresholds,
    diagnostics: &mut Diagnostics,
) -> bool {
    if thresholds.is_legacy(graph.version) {
        return armature.bones.len() == graph.nodes.len();
    }

    let present: Vec<&str> = graph
        .node_names()
        .filter(|name| armature.bones.iter().any(|bone| bone.name == *name))
        .collect();
    if !present.is_empty() {
        for name in graph.node_names() {
            if !present.contains(&name) {
                diagnostics.warn(format!("Node '{name}' not found in an existing armature"));
            }
        }
    }
    present.len() == graph.nodes.len()
}

/// Lays out an existing scene armature by layer and ties each bone to a graph node.
pub fn build_from_scene(
    graph: &AnimationGraph,
    armature: &SceneArmature,
) -> Result<BoneLayout, Error> {
    let mut parents = Vec::with_capacity(armature.bones.len());
    for bone in &armature.bones {
        let parent = match &bone.parent {
            Some(parent_name) => Some(
                armature
                    .bones
                    .iter()
                    .position(|other| &other.name == parent_name)
                    .ok_or_else(|| Error::UnknownSceneParent {
                        bone: bone.name.clone(),
                        parent: parent_name.clone(),
                    })?,
            ),
            None => None,
        };
        parents.push(parent);
    }

    let order = layer_order(&parents)?;
    let mut bone_of_scene = vec![None; armature.bones.len()];
    let mut bones = Vec::with_capacity(order.len());
    for (position, scene_index) in order.into_iter().enumerate() {
        let scene_bone = &armature.bones[scene_index];
        // Legacy armatures are matched by count, so fall back to layer position.
        let node_index = graph
            .nodes
            .iter()
            .position(|node| node.name == scene_bone.name)
            .unwrap_or(position);
        let parent = parents[scene_index].and_then(|parent| bone_of_scene[parent]);
        bone_of_scene[scene_index] = Some(bones.len());
        bones.push(BoneLink {
            name: scene_bone.name.clone(),
            node_index,
            parent,
            is_root: parent.is_none(),
            rest: BoneRest::Scene {
                matrix: scene_bone.rest_matrix,
                length: scene_bone.length,
            },
        });
    }

    Ok(BoneLayout {
        mode: HierarchyMode::Scene,
        bones,
    })
}
