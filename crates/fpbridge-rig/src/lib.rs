//! Bone hierarchies and skeleton merging for the asset-import bridge.
//!
//! An outfit arrives as several parts, each imported with its own copy of the
//! skeleton. The scene names repeated bones with a numeric suffix
//! (`pelvis.001`), so the copies can be folded back into one rig:
//!
//! - [`canonical_name`] - strip the duplicate suffix from a bone name
//! - [`HierarchyTree`] - unique-name, acyclic bone tree
//! - [`merge`] - fold parts into one tree and collect attachment bindings
//!
//! # Example
//!
//! ```
//! use fpbridge_document::PartSlot;
//! use fpbridge_rig::{merge, BoneNode, HierarchyTree, MergeOptions, RigPart};
//!
//! let body = HierarchyTree::from_bones([
//!     BoneNode::new("pelvis", None),
//!     BoneNode::new("spine_01", Some("pelvis")),
//! ])?;
//! let head = HierarchyTree::from_bones([
//!     BoneNode::new("pelvis.001", None),
//!     BoneNode::new("spine_01.001", Some("pelvis.001")),
//!     BoneNode::new("neck_01", Some("spine_01.001")),
//! ])?;
//!
//! let outcome = merge(
//!     vec![
//!         RigPart::new(PartSlot::Body, None, body, "body"),
//!         RigPart::new(PartSlot::Head, None, head, "head"),
//!     ],
//!     &MergeOptions::default(),
//! );
//!
//! assert_eq!(outcome.tree.len(), 3);
//! assert_eq!(outcome.tree.parent_of("neck_01"), Some("spine_01"));
//! # Ok::<(), fpbridge_rig::Error>(())
//! ```

mod error;
mod merge;
mod name;
mod tree;

pub use error::{Error, Result};
pub use merge::{
    attachment_bone, merge, AttachmentBinding, MergeOptions, MergeOutcome, Placement, RigPart,
    DEFAULT_OVERRIDES,
};
pub use name::{canonical_name, has_duplicate_suffix};
pub use tree::{BoneNode, HierarchyTree};
