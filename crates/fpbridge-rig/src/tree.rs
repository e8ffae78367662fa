//! Bone hierarchy model.
//!
//! Bones are stored in a flat list in insertion order and reference their
//! parent by name. A name index gives O(1) lookups.

use std::hash::BuildHasherDefault;

use hashbrown::HashMap as FastHashMap;
use rustc_hash::FxHasher;

use crate::{Error, Result};

type FxHashMap<K, V> = FastHashMap<K, V, BuildHasherDefault<FxHasher>>;

/// One bone: a name and an optional parent name.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct BoneNode {
    pub name: String,
    #[cfg_attr(
        feature = "serde",
        serde(default, skip_serializing_if = "Option::is_none")
    )]
    pub parent: Option<String>,
}

impl BoneNode {
    /// Create a bone.
    pub fn new(name: impl Into<String>, parent: Option<&str>) -> Self {
        Self {
            name: name.into(),
            parent: parent.map(str::to_string),
        }
    }

    /// Whether the bone has no parent.
    pub fn is_root(&self) -> bool {
        self.parent.is_none()
    }
}

/// A named-node tree with unique names and acyclic parent links.
#[derive(Debug, Clone, Default)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(try_from = "Vec<BoneNode>", into = "Vec<BoneNode>")
)]
pub struct HierarchyTree {
    bones: Vec<BoneNode>,
    index: FxHashMap<String, usize>,
}

impl HierarchyTree {
    /// Create an empty tree.
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a tree from bones listed in any order.
    ///
    /// Parents may be listed after their children; every referenced parent
    /// must be present.
    pub fn from_bones(bones: impl IntoIterator<Item = BoneNode>) -> Result<Self> {
        let bones: Vec<BoneNode> = bones.into_iter().collect();
        let mut tree = Self::new();
        for bone in &bones {
            tree.insert(&bone.name)?;
        }
        for bone in &bones {
            if let Some(parent) = &bone.parent {
                tree.set_parent(&bone.name, Some(parent))?;
            }
        }
        Ok(tree)
    }

    /// Number of bones.
    pub fn len(&self) -> usize {
        self.bones.len()
    }

    /// Whether the tree has no bones.
    pub fn is_empty(&self) -> bool {
        self.bones.is_empty()
    }

    /// Whether a bone named `name` exists.
    pub fn contains(&self, name: &str) -> bool {
        self.index.contains_key(name)
    }

    /// Look up a bone.
    pub fn get(&self, name: &str) -> Option<&BoneNode> {
        self.index.get(name).map(|&i| &self.bones[i])
    }

    /// Parent name of `name`, if it exists and has one.
    pub fn parent_of(&self, name: &str) -> Option<&str> {
        self.get(name).and_then(|b| b.parent.as_deref())
    }

    /// Add a parentless bone.
    pub fn insert(&mut self, name: &str) -> Result<()> {
        if self.contains(name) {
            return Err(Error::DuplicateBone(name.to_string()));
        }
        self.index.insert(name.to_string(), self.bones.len());
        self.bones.push(BoneNode::new(name, None));
        Ok(())
    }

    /// Set or clear the parent of `name`.
    ///
    /// Fails if either bone is missing or the link would close a cycle; the
    /// tree is unchanged on failure.
    pub fn set_parent(&mut self, name: &str, parent: Option<&str>) -> Result<()> {
        let index = *self
            .index
            .get(name)
            .ok_or_else(|| Error::UnknownBone(name.to_string()))?;

        if let Some(parent) = parent {
            if !self.contains(parent) {
                return Err(Error::UnknownBone(parent.to_string()));
            }
            if self.is_ancestor_or_self(name, parent) {
                return Err(Error::Cycle {
                    child: name.to_string(),
                    parent: parent.to_string(),
                });
            }
        }

        self.bones[index].parent = parent.map(str::to_string);
        Ok(())
    }

    /// Whether `ancestor` is `node` itself or lies on the parent chain of `node`.
    pub fn is_ancestor_or_self(&self, ancestor: &str, node: &str) -> bool {
        let mut current = Some(node);
        // Bounded by the bone count so a corrupt chain cannot loop forever.
        for _ in 0..=self.bones.len() {
            match current {
                Some(name) if name == ancestor => return true,
                Some(name) => current = self.parent_of(name),
                None => return false,
            }
        }
        false
    }

    /// Bones in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = &BoneNode> {
        self.bones.iter()
    }

    /// Bone names in insertion order.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.bones.iter().map(|b| b.name.as_str())
    }

    /// Bones without a parent.
    pub fn roots(&self) -> impl Iterator<Item = &BoneNode> {
        self.bones.iter().filter(|b| b.is_root())
    }
}

impl TryFrom<Vec<BoneNode>> for HierarchyTree {
    type Error = Error;

    fn try_from(bones: Vec<BoneNode>) -> Result<Self> {
        Self::from_bones(bones)
    }
}

impl From<HierarchyTree> for Vec<BoneNode> {
    fn from(tree: HierarchyTree) -> Self {
        tree.bones
    }
}

impl PartialEq for HierarchyTree {
    fn eq(&self, other: &Self) -> bool {
        self.bones == other.bones
    }
}

impl Eq for HierarchyTree {}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> HierarchyTree {
        HierarchyTree::from_bones([
            BoneNode::new("spine_01", Some("pelvis")),
            BoneNode::new("root", None),
            BoneNode::new("pelvis", Some("root")),
            BoneNode::new("thigh_l", Some("pelvis")),
        ])
        .unwrap()
    }

    #[test]
    fn test_from_bones_any_order() {
        let tree = sample();
        assert_eq!(tree.len(), 4);
        assert_eq!(tree.parent_of("spine_01"), Some("pelvis"));
        assert_eq!(tree.roots().map(|b| b.name.as_str()).collect::<Vec<_>>(), ["root"]);
        assert_eq!(tree.get("thigh_l").map(|b| b.parent.as_deref()), Some(Some("pelvis")));
    }

    #[test]
    fn test_rejects_duplicates_and_unknown_parents() {
        let mut tree = sample();
        assert_eq!(tree.insert("root"), Err(Error::DuplicateBone("root".into())));
        assert_eq!(
            tree.set_parent("thigh_l", Some("nope")),
            Err(Error::UnknownBone("nope".into()))
        );
        assert!(HierarchyTree::from_bones([BoneNode::new("a", Some("b"))]).is_err());
    }

    #[test]
    fn test_cycle_rejected() {
        let mut tree = sample();
        let err = tree.set_parent("root", Some("spine_01")).unwrap_err();
        assert!(matches!(err, Error::Cycle { .. }));
        assert!(tree.set_parent("root", Some("root")).is_err());
        // Unchanged.
        assert_eq!(tree.parent_of("root"), None);
    }

    #[cfg(feature = "serde")]
    #[test]
    fn test_serde_as_bone_list() {
        let tree = sample();
        let json = serde_json::to_value(&tree).unwrap();
        assert_eq!(json[1], serde_json::json!({"name": "root"}));
        let back: HierarchyTree = serde_json::from_value(json).unwrap();
        assert_eq!(back, tree);
    }
}
