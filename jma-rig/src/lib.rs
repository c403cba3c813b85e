//! Skeleton reconciliation and pose compositing for JMA animation imports.
//!
//! Inputs are already-decoded animation graphs and optional JMS reference
//! skeletons. The crate resolves a single bone hierarchy, composes rest
//! matrices and produces a pose for every frame. Creating bones, inserting
//! keyframes and file parsing belong to the host importer.

#![forbid(unsafe_code)]

mod diagnostics;
mod error;
mod model;
mod runtime;
mod version;

#[cfg(feature = "json")]
pub mod json;

pub use diagnostics::*;
pub use error::*;
pub use model::*;
pub use runtime::*;
pub use version::*;


#[cfg(all(test, feature = "json"))]
mod json_tests;
