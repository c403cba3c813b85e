use crate::{AnimationGraph, Diagnostics, ReferenceSlot, References};
use std::collections::HashSet;

#[derive(Copy, Clone, Debug, Default, Eq, PartialEq)]
pub struct ReferenceValidity {
    pub a_invalid: bool,
    pub b_invalid: bool,
}

impl ReferenceValidity {
    pub fn is_invalid(&self, slot: ReferenceSlot) -> bool {
        match slot {
            ReferenceSlot::A => self.a_invalid,
            ReferenceSlot::B => self.b_invalid,
        }
    }

    /// References that may contribute hierarchy information.
    pub fn usable<'a>(&self, references: References<'a>) -> References<'a> {
        References {
            a: references.a.filter(|_| !self.a_invalid),
            b: references.b.filter(|_| !self.b_invalid),
        }
    }
}

/// Checks every reference node name against the animation's node names.
///
/// With a single reference, A is invalid when one of its names is missing.
/// With two, the union of both name lists is checked and only B is marked.
pub fn validate_references(
    references: References<'_>,
    graph: &AnimationGraph,
    diagnostics: &mut Diagnostics,
) -> ReferenceValidity {
    let references = references.normalized();
    let mut validity = ReferenceValidity::default();
    let graph_names: HashSet<&str> = graph.node_names().collect();

    let (names, mark, summary): (Vec<&str>, ReferenceSlot, &str) =
        match (references.a, references.b) {
            (Some(a), None) => (
                a.nodes.iter().map(|node| node.name.as_str()).collect(),
                ReferenceSlot::A,
                "No valid armature detected. Attempting to create one and the referenced JMS will be used for the rest position",
            ),
            (Some(a), Some(b)) => (
                a.nodes
                    .iter()
                    .chain(b.nodes.iter())
                    .map(|node| node.name.as_str())
                    .collect(),
                ReferenceSlot::B,
                "No valid armature detected. Attempting to create one and the referenced JMS files will be used for the rest position",
            ),
            (None, _) => return validity,
        };

    for name in names {
        if !graph_names.contains(name) {
            match mark {
                ReferenceSlot::A => validity.a_invalid = true,
                ReferenceSlot::B => validity.b_invalid = true,
            }
            diagnostics.warn(format!(
                "Node '{name}' from JMS skeleton not found in JMA skeleton."
            ));
        }
    }
    diagnostics.warn(summary);

    validity
}
