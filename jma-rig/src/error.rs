use crate::ReferenceSlot;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
    #[error(
        "No valid armature detected and animation graph is invalid. Import will now be aborted"
    )]
    BrokenAnimationGraph,

    #[error(
        "No valid armature detected and not enough information to build valid skeleton due to version {version}. Import will now be aborted"
    )]
    InsufficientVersion { version: i32 },

    #[error("node {node} references parent {parent} which does not exist")]
    ParentIndexOutOfRange { node: usize, parent: usize },

    #[error("node {node} references parent {parent} which is stored after it")]
    ParentAfterChild { node: usize, parent: usize },

    #[error("node {node} is not reachable from any root")]
    HierarchyCycle { node: usize },

    #[error("frame {frame} has no transform for node {node}")]
    MissingFrameTransform { frame: usize, node: usize },

    #[error("reference skeleton {skeleton} has no rest transform for node {node}")]
    MissingRestTransform { skeleton: ReferenceSlot, node: usize },

    #[error("reference skeleton {skeleton} has no nodes")]
    EmptyReferenceSkeleton { skeleton: ReferenceSlot },

    #[error("scene bone '{bone}' references unknown parent '{parent}'")]
    UnknownSceneParent { bone: String, parent: String },

    #[cfg(feature = "json")]
    #[error("failed to parse JSON input: {message}")]
    JsonParse { message: String },
}

impl Error {
    /// Errors that abort an import because no armature can be produced.
    pub fn is_fatal_configuration(&self) -> bool {
        matches!(
            self,
            Self::BrokenAnimationGraph | Self::InsufficientVersion { .. }
        )
    }
}
