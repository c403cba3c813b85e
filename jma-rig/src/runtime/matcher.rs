use crate::{
    AnimationGraph, DEFAULT_BONE_LENGTH, Error, ReferenceSkeleton, ReferenceSlot, References,
    Transform,
};

/// Outcome of comparing an animation node name against a reference node name.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub enum NameMatch {
    None,
    /// Same name ignoring ASCII case.
    Exact,
    /// The animation name occurs inside the reference name.
    Partial,
}

impl NameMatch {
    pub fn is_match(self) -> bool {
        !matches!(self, Self::None)
    }
}

/// Case-insensitive test of `node` appearing inside `candidate`.
pub fn name_matches(node: &str, candidate: &str) -> NameMatch {
    let node = node.to_lowercase();
    let candidate = candidate.to_lowercase();
    if node == candidate {
        NameMatch::Exact
    } else if candidate.contains(&node) {
        NameMatch::Partial
    } else {
        NameMatch::None
    }
}

/// Last node of `skeleton` whose name contains `name`.
///
/// When several reference nodes contain the same animation name the one
/// stored last wins.
pub fn last_match(name: &str, skeleton: &ReferenceSkeleton) -> Option<usize> {
    skeleton
        .nodes
        .iter()
        .rposition(|node| name_matches(name, &node.name).is_match())
}

/// Where a bone's rest transform was taken from.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub enum RestSource {
    /// A matching node of a reference skeleton.
    Reference { slot: ReferenceSlot, index: usize },
    /// Nothing matched; the first node of a reference skeleton stands in.
    FallbackRoot { slot: ReferenceSlot },
    /// The animation graph's own first frame.
    Graph,
}

/// A reference node whose name contains the animation node's name.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct ReferenceHit {
    pub slot: ReferenceSlot,
    pub index: usize,
    /// Name of the reference node one level up, if it has a parent.
    pub parent_name: Option<String>,
}

#[derive(Clone, Debug)]
pub struct NodeMatch {
    pub source: RestSource,
    /// Format version of whichever file supplied `rest`.
    pub source_version: i32,
    pub rest: Transform,
    pub bone_length: f32,
    /// Last hit in each reference, A before B. The final entry supplies `rest`.
    pub hits: Vec<ReferenceHit>,
}

impl NodeMatch {
    pub fn matched_slot(&self) -> Option<ReferenceSlot> {
        match self.source {
            RestSource::Reference { slot, .. } => Some(slot),
            _ => None,
        }
    }

    /// Parent name recorded by the reference that supplied the rest transform.
    pub fn parent_name(&self) -> Option<&str> {
        self.hits.last().and_then(|hit| hit.parent_name.as_deref())
    }

    /// Parent name from the last hit in a reference present in `usable`.
    ///
    /// A rejected B can win the rest transform while A still supplies the parent.
    pub fn usable_parent_name(&self, usable: References<'_>) -> Option<&str> {
        self.hits
            .iter()
            .rev()
            .find(|hit| usable.get(hit.slot).is_some())
            .and_then(|hit| hit.parent_name.as_deref())
    }
}

/// Cross-references animation nodes against up to two reference skeletons.
#[derive(Clone, Debug)]
pub struct NodeMatcher<'a> {
    graph: &'a AnimationGraph,
    references: References<'a>,
    root_fallback: bool,
}

impl<'a> NodeMatcher<'a> {
    pub fn new(graph: &'a AnimationGraph, references: References<'a>) -> Self {
        Self {
            graph,
            references,
            root_fallback: false,
        }
    }

    /// Unmatched nodes take the first node of a reference instead of the graph frame.
    pub fn with_root_fallback(mut self, enabled: bool) -> Self {
        self.root_fallback = enabled;
        self
    }

    /// True when the animation's first node name occurs inside reference A's first node name.
    pub fn is_fp_root_file_a(&self) -> bool {
        let (Some(graph_root), Some(a_root)) = (
            self.graph.nodes.first(),
            self.references.a.and_then(ReferenceSkeleton::root_name),
        ) else {
            return false;
        };
        name_matches(&graph_root.name, a_root).is_match()
    }

    pub fn match_all(&self) -> Result<Vec<NodeMatch>, Error> {
        let fallback_slot = self.fallback_slot();
        (0..self.graph.nodes.len())
            .map(|index| self.match_node(index, fallback_slot))
            .collect()
    }

    fn fallback_slot(&self) -> Option<ReferenceSlot> {
        if !self.root_fallback {
            return None;
        }
        if self.is_fp_root_file_a() {
            return Some(ReferenceSlot::A);
        }
        if self.references.b.is_some() {
            Some(ReferenceSlot::B)
        } else if self.references.a.is_some() {
            Some(ReferenceSlot::A)
        } else {
            None
        }
    }

    fn match_node(
        &self,
        index: usize,
        fallback_slot: Option<ReferenceSlot>,
    ) -> Result<NodeMatch, Error> {
        let name = &self.graph.nodes[index].name;

        // B is searched after A, so a hit in B replaces a hit in A.
        let hits: Vec<ReferenceHit> = self
            .references
            .iter()
            .filter_map(|(slot, skeleton)| {
                last_match(name, skeleton).map(|ref_index| ReferenceHit {
                    slot,
                    index: ref_index,
                    parent_name: skeleton.nodes[ref_index]
                        .parent_index()
                        .and_then(|parent| skeleton.nodes.get(parent))
                        .map(|parent| parent.name.clone()),
                })
            })
            .collect();

        let found = hits
            .last()
            .and_then(|hit| self.references.get(hit.slot).map(|skeleton| (hit, skeleton)));
        if let Some((hit, skeleton)) = found {
            let (slot, ref_index) = (hit.slot, hit.index);
            return Ok(NodeMatch {
                source: RestSource::Reference {
                    slot,
                    index: ref_index,
                },
                source_version: skeleton.version,
                rest: reference_rest(skeleton, slot, ref_index)?,
                bone_length: super::rest::reference_bone_length(skeleton, ref_index),
                hits,
            });
        }

        let fallback = fallback_slot
            .and_then(|slot| self.references.get(slot).map(|skeleton| (slot, skeleton)));
        if let Some((slot, skeleton)) = fallback {
            if skeleton.nodes.is_empty() {
                return Err(Error::EmptyReferenceSkeleton { skeleton: slot });
            }
            return Ok(NodeMatch {
                source: RestSource::FallbackRoot { slot },
                source_version: self.graph.version,
                rest: reference_rest(skeleton, slot, 0)?,
                bone_length: DEFAULT_BONE_LENGTH,
                hits: Vec::new(),
            });
        }

        let rest = self
            .graph
            .first_frame()
            .and_then(|frame| frame.get(index))
            .copied()
            .ok_or(Error::MissingFrameTransform {
                frame: 0,
                node: index,
            })?;
        Ok(NodeMatch {
            source: RestSource::Graph,
            source_version: self.graph.version,
            rest,
            bone_length: super::rest::graph_bone_length(self.graph, index),
            hits: Vec::new(),
        })
    }
}

fn reference_rest(
    skeleton: &ReferenceSkeleton,
    slot: ReferenceSlot,
    index: usize,
) -> Result<Transform, Error> {
    skeleton
        .rest_pose
        .get(index)
        .copied()
        .ok_or(Error::MissingRestTransform {
            skeleton: slot,
            node: index,
        })
}
