use super::hierarchy::{
    BoneLayout, HierarchyBuilder, ResolvedHierarchy, build_from_scene, check_scene_armature,
};
use super::matcher::NodeMatcher;
use super::pose::{AnimatedPose, PoseAnimator};
use super::rest::RestCompositor;
use super::validator::{ReferenceValidity, validate_references};
use crate::{
    AnimationGraph, Diagnostics, Error, FileType, ImportOptions, References, SceneArmature,
};

/// Everything handed to the host scene once an import succeeds.
#[derive(Clone, Debug)]
pub struct ImportedAnimation {
    pub hierarchy: ResolvedHierarchy,
    pub animation: AnimatedPose,
    /// Reference classification; all valid when a scene armature was reused.
    pub validity: ReferenceValidity,
}

/// Runs matching, validation, hierarchy construction, rest composition and posing.
#[derive(Clone, Debug, Default)]
pub struct Importer {
    options: ImportOptions,
}

impl Importer {
    pub fn new(options: ImportOptions) -> Self {
        Self { options }
    }

    pub fn options(&self) -> &ImportOptions {
        &self.options
    }

    /// Imports `graph`. No hierarchy or pose is returned on failure; the
    /// reason is also recorded as the last entry of `diagnostics`.
    pub fn import(
        &self,
        graph: &AnimationGraph,
        references: References<'_>,
        scene: Option<&SceneArmature>,
        diagnostics: &mut Diagnostics,
    ) -> Result<ImportedAnimation, Error> {
        let result = self.run(graph, references, scene, diagnostics);
        diagnostics.finish(&result);
        result
    }

    fn run(
        &self,
        graph: &AnimationGraph,
        references: References<'_>,
        scene: Option<&SceneArmature>,
        diagnostics: &mut Diagnostics,
    ) -> Result<ImportedAnimation, Error> {
        let (hierarchy, validity) = self.resolve(graph, references, scene, diagnostics)?;
        let animation = PoseAnimator::new(
            graph,
            &hierarchy,
            self.options.fix_rotations,
            &self.options.thresholds,
        )
        .animate()?;
        Ok(ImportedAnimation {
            hierarchy,
            animation,
            validity,
        })
    }

    /// Builds the hierarchy and rest pose only.
    pub fn build_hierarchy(
        &self,
        graph: &AnimationGraph,
        references: References<'_>,
        scene: Option<&SceneArmature>,
        diagnostics: &mut Diagnostics,
    ) -> Result<ResolvedHierarchy, Error> {
        self.resolve(graph, references, scene, diagnostics)
            .map(|(hierarchy, _)| hierarchy)
    }

    fn resolve(
        &self,
        graph: &AnimationGraph,
        references: References<'_>,
        scene: Option<&SceneArmature>,
        diagnostics: &mut Diagnostics,
    ) -> Result<(ResolvedHierarchy, ReferenceValidity), Error> {
        let options = &self.options;
        let thresholds = &options.thresholds;
        let references = references.normalized();

        if let Some(armature) = scene {
            if check_scene_armature(graph, armature, thresholds, diagnostics) {
                log::debug!("reusing scene armature with {} bones", armature.bones.len());
                let layout = build_from_scene(graph, armature)?;
                let hierarchy = self.compose(layout, FileType::Jma);
                return Ok((hierarchy, ReferenceValidity::default()));
            }
        }

        let validity = validate_references(references, graph, diagnostics);
        let usable = validity.usable(references);

        let graph_builder = HierarchyBuilder::new(graph, References::NONE, thresholds);
        if graph_builder.graph_is_usable() {
            let hierarchy = self.graph_driven(graph, references, validity, usable)?;
            return Ok((hierarchy, validity));
        }

        if !usable.is_empty() {
            let matches = NodeMatcher::new(graph, references)
                .with_root_fallback(true)
                .match_all()?;
            let layout =
                HierarchyBuilder::new(graph, usable, thresholds).build_reference_driven(matches)?;
            return Ok((self.compose(layout, FileType::Jms), validity));
        }

        if graph_builder.legacy_graph_is_usable() {
            log::debug!("no usable reference, laying out legacy graph by layer");
            let hierarchy = self.graph_driven(graph, references, validity, usable)?;
            return Ok((hierarchy, validity));
        }

        if graph.broken_skeleton {
            Err(Error::BrokenAnimationGraph)
        } else {
            Err(Error::InsufficientVersion {
                version: graph.version,
            })
        }
    }

    fn graph_driven(
        &self,
        graph: &AnimationGraph,
        references: References<'_>,
        validity: ReferenceValidity,
        usable: References<'_>,
    ) -> Result<ResolvedHierarchy, Error> {
        let options = &self.options;
        // References only replace graph rest poses when none of them was rejected.
        let rest_references =
            if references.a.is_some() && !validity.a_invalid && !validity.b_invalid {
                references
            } else {
                References::NONE
            };
        let file_type = if usable.a.is_some() {
            FileType::Jms
        } else {
            FileType::Jma
        };
        let matches = NodeMatcher::new(graph, rest_references).match_all()?;
        let builder = HierarchyBuilder::new(graph, rest_references, &options.thresholds);
        let overrides = builder.parent_overrides(options.fix_parents, options.game_version);
        let layout = builder.build_graph_driven(matches, &overrides)?;
        Ok(self.compose(layout, file_type))
    }

    fn compose(&self, layout: BoneLayout, file_type: FileType) -> ResolvedHierarchy {
        RestCompositor::new(
            self.options.fix_rotations,
            file_type,
            self.options.game_version,
            &self.options.thresholds,
        )
        .compose(layout)
    }
}
