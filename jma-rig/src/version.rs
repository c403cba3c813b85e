//! Format-version gates used while importing JMA animations.

use crate::{FileType, GameVersion};

/// JMA version whose stored node order is not guaranteed parent-before-child.
pub const JMA_LEGACY_VERSION: i32 = 16390;

/// First JMA version whose node list carries usable parent indices.
pub const JMA_HIERARCHY_VERSION: i32 = 16392;

/// Below this JMA version, animated transforms are parent-relative.
pub const JMA_ABSOLUTE_VERSION: i32 = 16394;

/// Bone length used when no skeleton supplies one.
pub const DEFAULT_BONE_LENGTH: f32 = 5.0;

/// Version thresholds consulted by the hierarchy builder and both compositors.
///
/// The rest-pose gate (`matrix_check`) and the two pose-gate bounds are
/// independent values.
#[derive(Clone, Debug, PartialEq)]
pub struct VersionThresholds {
    pub jma_matrix_check: i32,
    pub jms_matrix_check_halo_ce: i32,
    pub jms_matrix_check_halo2: i32,
    pub jms_matrix_check_halo3: i32,
    pub graph_hierarchy_min: i32,
    pub legacy_sentinel: i32,
    pub pose_gate_lower: i32,
    pub pose_gate_upper: i32,
}

impl Default for VersionThresholds {
    fn default() -> Self {
        Self {
            jma_matrix_check: JMA_ABSOLUTE_VERSION,
            jms_matrix_check_halo_ce: 8205,
            jms_matrix_check_halo2: 8210,
            jms_matrix_check_halo3: 8213,
            graph_hierarchy_min: JMA_HIERARCHY_VERSION,
            legacy_sentinel: JMA_LEGACY_VERSION,
            pose_gate_lower: JMA_LEGACY_VERSION,
            pose_gate_upper: JMA_ABSOLUTE_VERSION,
        }
    }
}

impl VersionThresholds {
    /// Version below which a rest transform of `file_type` is parent-relative.
    pub fn matrix_check(&self, file_type: FileType, game_version: GameVersion) -> i32 {
        match (file_type, game_version) {
            (FileType::Jma, _) => self.jma_matrix_check,
            (FileType::Jms, GameVersion::HaloCe) => self.jms_matrix_check_halo_ce,
            (FileType::Jms, GameVersion::Halo2) => self.jms_matrix_check_halo2,
            (FileType::Jms, GameVersion::Halo3) => self.jms_matrix_check_halo3,
        }
    }

    pub fn is_legacy(&self, version: i32) -> bool {
        version == self.legacy_sentinel
    }

    /// Whether a graph of `version` carries parent links the builder can use.
    ///
    /// Legacy graphs are not included; they only drive the hierarchy when no
    /// usable reference skeleton is supplied.
    pub fn graph_has_hierarchy(&self, version: i32) -> bool {
        version >= self.graph_hierarchy_min
    }

    /// Pose gate with the axis fix enabled.
    pub fn pose_parent_relative_rotated(&self, version: i32) -> bool {
        version > self.pose_gate_lower || version < self.pose_gate_upper
    }

    /// Pose gate with the axis fix disabled.
    pub fn pose_parent_relative(&self, version: i32) -> bool {
        version < self.pose_gate_upper
    }
}
