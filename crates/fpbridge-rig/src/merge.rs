//! Skeleton merging.
//!
//! Each imported part of an outfit carries its own skeleton. Merge-eligible
//! skeletons are folded into one tree keyed by canonical bone name; the rest
//! are kept separate and returned as attachment bindings for the scene to
//! constrain onto the merged rig.

use std::f32::consts::FRAC_PI_2;
use std::hash::BuildHasherDefault;

use fpbridge_document::PartSlot;
use hashbrown::HashMap as FastHashMap;
use log::{debug, warn};
use rustc_hash::FxHasher;

use crate::name::{canonical_name, has_duplicate_suffix};
use crate::tree::HierarchyTree;
use crate::Error;

type FxHashMap<K, V> = FastHashMap<K, V, BuildHasherDefault<FxHasher>>;

/// Parent links asserted after the automatic pass, as `(child, parent)`.
pub const DEFAULT_OVERRIDES: &[(&str, &str)] = &[
    ("L_eye_lid_lower_mid", "faceAttach"),
    ("L_eye_lid_upper_mid", "faceAttach"),
    ("R_eye_lid_lower_mid", "faceAttach"),
    ("R_eye_lid_upper_mid", "faceAttach"),
    ("dyn_spine_05", "spine_05"),
];

/// One part's skeleton plus the caller's handle for it.
#[derive(Debug, Clone)]
pub struct RigPart<H> {
    pub slot: PartSlot,
    pub socket: Option<String>,
    pub tree: HierarchyTree,
    pub handle: H,
}

impl<H> RigPart<H> {
    pub fn new(slot: PartSlot, socket: Option<String>, tree: HierarchyTree, handle: H) -> Self {
        Self {
            slot,
            socket,
            tree,
            handle,
        }
    }
}

/// How a part joins the rig.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Placement {
    /// Folded into the combined tree.
    Merge,
    /// Kept separate and constrained to `bone` of the combined tree.
    Attach { bone: String },
    /// Kept separate with nothing to attach to.
    Detached,
}

/// Merge configuration.
#[derive(Debug, Clone)]
pub struct MergeOptions {
    /// Slots kept out of the combined tree.
    pub excluded_slots: Vec<PartSlot>,
    /// `(child, parent)` links applied after the automatic pass.
    pub overrides: Vec<(String, String)>,
    /// Euler XYZ rotation, in radians, applied to every attachment.
    pub attachment_rotation: [f32; 3],
}

impl Default for MergeOptions {
    fn default() -> Self {
        Self {
            excluded_slots: vec![PartSlot::Hat, PartSlot::MiscOrTail],
            overrides: DEFAULT_OVERRIDES
                .iter()
                .map(|&(child, parent)| (child.to_string(), parent.to_string()))
                .collect(),
            attachment_rotation: [0.0, FRAC_PI_2, 0.0],
        }
    }
}

impl MergeOptions {
    /// Decide how a part with `slot` and `socket` joins the rig.
    ///
    /// Only the exact socket name `Face` keeps an excluded part in the tree.
    /// An empty socket name counts as no socket.
    pub fn placement(&self, slot: &PartSlot, socket: Option<&str>) -> Placement {
        if !self.excluded_slots.contains(slot) {
            return Placement::Merge;
        }

        match socket.filter(|s| !s.is_empty()) {
            Some("Face") => Placement::Merge,
            Some(socket) => Placement::Attach {
                bone: attachment_bone(socket),
            },
            None if *slot == PartSlot::Hat => Placement::Merge,
            None => Placement::Detached,
        }
    }
}

/// Bone a socket name attaches to.
pub fn attachment_bone(socket: &str) -> String {
    if socket.eq_ignore_ascii_case("hat") {
        "head".to_string()
    } else if socket.eq_ignore_ascii_case("tail") {
        "pelvis".to_string()
    } else {
        socket.to_string()
    }
}

/// A separately kept part to constrain onto the merged tree.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct AttachmentBinding<H> {
    pub handle: H,
    /// Target bone in the merged tree.
    pub bone: String,
    /// Euler XYZ rotation offset in radians.
    pub rotation: [f32; 3],
}

/// Result of [`merge`].
#[derive(Debug, Clone)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct MergeOutcome<H> {
    pub tree: HierarchyTree,
    pub attachments: Vec<AttachmentBinding<H>>,
    /// Constraint-attached parts without a socket.
    pub detached: Vec<H>,
    /// Names of the duplicate bones that were dropped.
    pub removed: Vec<String>,
    /// Input indices of the parts folded into `tree`.
    pub merged_parts: Vec<usize>,
}

/// Merge the skeletons of `parts` into one canonical tree.
///
/// Bones are deduplicated by [`canonical_name`]; the first occurrence
/// survives under its canonical name. Every occurrence's parent link is
/// recorded in canonical form, a later non-self link replacing an earlier
/// one, and applied once all survivors exist. A bone whose recorded parent
/// did not survive is left as a root. Manual overrides from `options` are
/// applied last to bones present in the tree; an override naming a missing
/// parent unparents its bone.
pub fn merge<H>(parts: Vec<RigPart<H>>, options: &MergeOptions) -> MergeOutcome<H> {
    let mut tree = HierarchyTree::new();
    let mut relations: FxHashMap<String, String> = FxHashMap::default();
    let mut attachments = Vec::new();
    let mut detached = Vec::new();
    let mut removed = Vec::new();
    let mut merged_parts = Vec::new();

    for (index, part) in parts.into_iter().enumerate() {
        match options.placement(&part.slot, part.socket.as_deref()) {
            Placement::Merge => {}
            Placement::Attach { bone } => {
                debug!("Part {} ({}) attaches to {}", index, part.slot, bone);
                attachments.push(AttachmentBinding {
                    handle: part.handle,
                    bone,
                    rotation: options.attachment_rotation,
                });
                continue;
            }
            Placement::Detached => {
                warn!("Part {} ({}) has no socket to attach to", index, part.slot);
                detached.push(part.handle);
                continue;
            }
        }

        merged_parts.push(index);
        for bone in part.tree.iter() {
            let canonical = canonical_name(&bone.name);

            if let Some(parent) = bone.parent.as_deref().map(canonical_name) {
                if parent != canonical {
                    relations.insert(canonical.to_string(), parent.to_string());
                }
            }

            if tree.contains(canonical) {
                removed.push(bone.name.clone());
            } else {
                if has_duplicate_suffix(&bone.name) {
                    debug!("Keeping {} as {}", bone.name, canonical);
                }
                // Only fails on duplicates, which `contains` just ruled out.
                tree.insert(canonical).ok();
            }
        }
    }

    let names: Vec<String> = tree.names().map(str::to_string).collect();
    for name in &names {
        let Some(parent) = relations.get(name.as_str()) else {
            continue;
        };
        if !tree.contains(parent) {
            debug!("Parent {} of {} did not survive the merge", parent, name);
            continue;
        }
        reparent(&mut tree, name, parent);
    }

    for (child, parent) in &options.overrides {
        if !tree.contains(child) {
            continue;
        }
        if tree.contains(parent) {
            reparent(&mut tree, child, parent);
        } else {
            debug!("Override parent {} of {} is missing, unparenting", parent, child);
            tree.set_parent(child, None).ok();
        }
    }

    for binding in &attachments {
        if !tree.contains(&binding.bone) {
            warn!("Attachment bone {} is not in the merged rig", binding.bone);
        }
    }

    MergeOutcome {
        tree,
        attachments,
        detached,
        removed,
        merged_parts,
    }
}

fn reparent(tree: &mut HierarchyTree, child: &str, parent: &str) {
    match tree.set_parent(child, Some(parent)) {
        Ok(()) => {}
        Err(Error::Cycle { .. }) => {
            warn!("Not parenting {} under {}: would create a cycle", child, parent);
        }
        Err(e) => warn!("Not parenting {} under {}: {}", child, parent, e),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tree::BoneNode;

    fn tree(bones: &[(&str, Option<&str>)]) -> HierarchyTree {
        HierarchyTree::from_bones(bones.iter().map(|&(n, p)| BoneNode::new(n, p))).unwrap()
    }

    fn part(slot: PartSlot, socket: Option<&str>, bones: &[(&str, Option<&str>)]) -> RigPart<&'static str> {
        RigPart::new(slot, socket.map(str::to_string), tree(bones), "part")
    }

    #[test]
    fn test_duplicates_collapse_onto_canonical_parent() {
        let parts = vec![
            part(PartSlot::Body, None, &[("P0", None), ("A", Some("P0"))]),
            part(PartSlot::Head, None, &[("P0.001", None), ("A.001", Some("P0.001"))]),
            part(PartSlot::Face, None, &[("P0.002", None), ("A.002", Some("P0.002"))]),
        ];
        let outcome = merge(parts, &MergeOptions::default());

        assert_eq!(outcome.tree.len(), 2);
        assert_eq!(outcome.tree.parent_of("A"), Some("P0"));
        assert!(!outcome.tree.contains("A.001"));
        assert!(!outcome.tree.contains("A.002"));
        assert_eq!(outcome.removed, ["P0.001", "A.001", "P0.002", "A.002"]);
        assert_eq!(outcome.merged_parts, [0, 1, 2]);
    }

    #[test]
    fn test_topology_from_duplicates_is_kept() {
        // The canonical `hand_r` arrives parentless; its duplicate knows the parent.
        let parts = vec![
            part(PartSlot::Body, None, &[("hand_r", None), ("lowerarm_r", None)]),
            part(
                PartSlot::Head,
                None,
                &[("lowerarm_r.001", None), ("hand_r.001", Some("lowerarm_r.001"))],
            ),
        ];
        let outcome = merge(parts, &MergeOptions::default());
        assert_eq!(outcome.tree.parent_of("hand_r"), Some("lowerarm_r"));
    }

    #[test]
    fn test_last_recorded_parent_wins() {
        let parts = vec![
            part(PartSlot::Body, None, &[("a", None), ("b", None), ("x", Some("a"))]),
            part(PartSlot::Head, None, &[("b.001", None), ("x.001", Some("b.001"))]),
        ];
        let outcome = merge(parts, &MergeOptions::default());
        assert_eq!(outcome.tree.parent_of("x"), Some("b"));
    }

    #[test]
    fn test_parentless_duplicate_keeps_recorded_parent() {
        let parts = vec![
            part(PartSlot::Body, None, &[("a", None), ("x", Some("a"))]),
            part(PartSlot::Head, None, &[("x.001", None)]),
        ];
        let outcome = merge(parts, &MergeOptions::default());
        assert_eq!(outcome.tree.parent_of("x"), Some("a"));
    }

    #[test]
    fn test_sole_suffixed_bone_renamed_and_kept() {
        let parts = vec![part(
            PartSlot::Body,
            None,
            &[("root", None), ("jaw.003", Some("root"))],
        )];
        let outcome = merge(parts, &MergeOptions::default());
        assert!(outcome.tree.contains("jaw"));
        assert!(!outcome.tree.contains("jaw.003"));
        assert_eq!(outcome.tree.parent_of("jaw"), Some("root"));
        assert!(outcome.removed.is_empty());
    }

    #[test]
    fn test_roots_pass_through() {
        let parts = vec![part(PartSlot::Body, None, &[("root", None)])];
        let outcome = merge(parts, &MergeOptions::default());
        assert_eq!(outcome.tree.roots().count(), 1);
        assert_eq!(outcome.tree.parent_of("root"), None);
    }

    #[test]
    fn test_overrides_applied_last() {
        let parts = vec![part(
            PartSlot::Body,
            None,
            &[
                ("head", None),
                ("faceAttach", Some("head")),
                ("L_eye_lid_upper_mid", Some("head")),
                ("spine_05", None),
            ],
        )];
        let outcome = merge(parts, &MergeOptions::default());
        assert_eq!(outcome.tree.parent_of("L_eye_lid_upper_mid"), Some("faceAttach"));
        // `dyn_spine_05` is missing, so its override is skipped.
        assert!(!outcome.tree.contains("dyn_spine_05"));
    }

    #[test]
    fn test_override_with_missing_parent_unparents() {
        let parts = vec![part(
            PartSlot::Body,
            None,
            &[("head", None), ("R_eye_lid_lower_mid", Some("head"))],
        )];
        let outcome = merge(parts, &MergeOptions::default());
        assert_eq!(outcome.tree.parent_of("R_eye_lid_lower_mid"), None);
        assert_eq!(outcome.tree.roots().count(), 2);
    }

    #[test]
    fn test_cyclic_links_are_skipped() {
        let parts = vec![
            part(PartSlot::Body, None, &[("a", None), ("b", Some("a"))]),
            part(PartSlot::Head, None, &[("b.001", None), ("a.001", Some("b.001"))]),
        ];
        let outcome = merge(parts, &MergeOptions::default());
        // The last records are `b -> a` and `a -> b`. `a` comes first in the
        // merged order and takes `b` as parent, so `b -> a` would close a loop.
        assert_eq!(outcome.tree.parent_of("a"), Some("b"));
        assert_eq!(outcome.tree.parent_of("b"), None);
    }

    #[test]
    fn test_classification() {
        let options = MergeOptions::default();
        assert_eq!(options.placement(&PartSlot::Hat, None), Placement::Merge);
        assert_eq!(options.placement(&PartSlot::Hat, Some("Face")), Placement::Merge);
        assert_eq!(
            options.placement(&PartSlot::Hat, Some("face")),
            Placement::Attach { bone: "face".into() }
        );
        assert_eq!(options.placement(&PartSlot::Hat, Some("")), Placement::Merge);
        assert_eq!(
            options.placement(&PartSlot::Hat, Some("attach")),
            Placement::Attach {
                bone: "attach".into()
            }
        );
        assert_eq!(
            options.placement(&PartSlot::Hat, Some("Hat")),
            Placement::Attach { bone: "head".into() }
        );
        assert_eq!(
            options.placement(&PartSlot::MiscOrTail, Some("Tail")),
            Placement::Attach {
                bone: "pelvis".into()
            }
        );
        assert_eq!(options.placement(&PartSlot::MiscOrTail, None), Placement::Detached);
        assert_eq!(options.placement(&PartSlot::Body, Some("anything")), Placement::Merge);
    }

    #[test]
    fn test_attached_parts_stay_out_of_tree() {
        let parts = vec![
            RigPart::new(PartSlot::Body, None, tree(&[("root", None), ("head", Some("root"))]), 0),
            RigPart::new(PartSlot::Hat, Some("attach".into()), tree(&[("hat_root", None)]), 1),
            RigPart::new(PartSlot::Hat, None, tree(&[("hat_bone", None)]), 2),
            RigPart::new(PartSlot::MiscOrTail, None, tree(&[("tail_01", None)]), 3),
        ];
        let outcome = merge(parts, &MergeOptions::default());

        assert!(!outcome.tree.contains("hat_root"));
        assert!(outcome.tree.contains("hat_bone"));
        assert_eq!(outcome.merged_parts, [0, 2]);
        assert_eq!(
            outcome.attachments,
            [AttachmentBinding {
                handle: 1,
                bone: "attach".to_string(),
                rotation: [0.0, FRAC_PI_2, 0.0],
            }]
        );
        assert_eq!(outcome.detached, [3]);
    }
}
