//! Import items and their parts.

use serde::{Deserialize, Serialize};

use crate::material::MaterialRef;
use crate::math::{Rotator, Vector3};

/// The kind of asset an import item describes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ItemKind {
    Outfit,
    Backpack,
    Glider,
    Pickaxe,
    Weapon,
    Prop,
    Dance,
    /// Any type string this version does not know about.
    #[serde(other)]
    Other,
}

impl std::fmt::Display for ItemKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            ItemKind::Outfit => "Outfit",
            ItemKind::Backpack => "Backpack",
            ItemKind::Glider => "Glider",
            ItemKind::Pickaxe => "Pickaxe",
            ItemKind::Weapon => "Weapon",
            ItemKind::Prop => "Prop",
            ItemKind::Dance => "Dance",
            ItemKind::Other => "Other",
        };
        f.write_str(name)
    }
}

/// Semantic slot of a character part.
///
/// Slot values are not unique within an item; several hats or accessories may
/// appear in one request.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum PartSlot {
    Body,
    Head,
    Face,
    Hat,
    Backpack,
    MiscOrTail,
    Charm,
    /// A slot name without a dedicated variant, kept verbatim.
    Other(String),
}

impl PartSlot {
    /// The slot name as sent on the wire.
    pub fn as_str(&self) -> &str {
        match self {
            PartSlot::Body => "Body",
            PartSlot::Head => "Head",
            PartSlot::Face => "Face",
            PartSlot::Hat => "Hat",
            PartSlot::Backpack => "Backpack",
            PartSlot::MiscOrTail => "MiscOrTail",
            PartSlot::Charm => "Charm",
            PartSlot::Other(name) => name,
        }
    }
}

impl From<String> for PartSlot {
    fn from(value: String) -> Self {
        match value.as_str() {
            "Body" => PartSlot::Body,
            "Head" => PartSlot::Head,
            "Face" => PartSlot::Face,
            "Hat" => PartSlot::Hat,
            "Backpack" => PartSlot::Backpack,
            "MiscOrTail" => PartSlot::MiscOrTail,
            "Charm" => PartSlot::Charm,
            _ => PartSlot::Other(value),
        }
    }
}

impl From<&str> for PartSlot {
    fn from(value: &str) -> Self {
        PartSlot::from(value.to_string())
    }
}

impl From<PartSlot> for String {
    fn from(value: PartSlot) -> Self {
        match value {
            PartSlot::Other(name) => name,
            slot => slot.as_str().to_string(),
        }
    }
}

impl std::fmt::Display for PartSlot {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One mesh/armature fragment of a composite item.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Part {
    #[serde(rename = "Part")]
    pub slot: PartSlot,
    #[serde(rename = "MeshPath")]
    pub mesh_path: String,
    /// Attachment socket on the parent rig, if the part is socketed.
    #[serde(rename = "SocketName", default)]
    pub socket_name: Option<String>,
    /// Morph target to enable after import.
    #[serde(rename = "MorphName", default)]
    pub morph_name: Option<String>,
    #[serde(rename = "Offset", default)]
    pub offset: Vector3,
    #[serde(rename = "Materials", default)]
    pub materials: Vec<MaterialRef>,
    #[serde(rename = "OverrideMaterials", default)]
    pub override_materials: Vec<MaterialRef>,
}

/// A style override replacing one mesh path by another.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StyleMesh {
    #[serde(rename = "MeshToSwap")]
    pub mesh_to_swap: String,
    #[serde(rename = "MeshToOverride")]
    pub mesh_to_override: String,
}

/// A bare mesh reference with its materials.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MeshRef {
    #[serde(rename = "MeshPath")]
    pub mesh_path: String,
    #[serde(rename = "Materials", default)]
    pub materials: Vec<MaterialRef>,
}

/// A prop carried by a dance.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PropData {
    #[serde(rename = "Prop")]
    pub prop: MeshRef,
    #[serde(rename = "SocketName", default)]
    pub socket_name: Option<String>,
    #[serde(rename = "Animation", default)]
    pub animation: Option<String>,
    #[serde(rename = "LocationOffset", default)]
    pub location_offset: Option<Vector3>,
    #[serde(rename = "Scale", default)]
    pub scale: Option<Vector3>,
    #[serde(rename = "RotationOffset", default)]
    pub rotation_offset: Option<Rotator>,
}

/// One import unit of a request.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ImportItem {
    #[serde(rename = "Name")]
    pub name: String,
    #[serde(rename = "Type")]
    pub kind: ItemKind,
    #[serde(rename = "Parts", default)]
    pub parts: Vec<Part>,
    #[serde(rename = "StyleParts", default)]
    pub style_parts: Vec<Part>,
    #[serde(rename = "StyleMaterials", default)]
    pub style_materials: Vec<MaterialRef>,
    #[serde(rename = "StyleMeshes", default)]
    pub style_meshes: Vec<StyleMesh>,
    #[serde(rename = "Animation", default)]
    pub animation: Option<String>,
    #[serde(rename = "Skeleton", default)]
    pub skeleton: Option<String>,
    #[serde(rename = "Props", default)]
    pub props: Vec<PropData>,
}

/// Kind-specific view of an [`ImportItem`].
#[derive(Debug, Clone, Copy)]
pub enum ItemPayload<'a> {
    /// Mesh-based items: outfits, props, weapons and everything else.
    ///
    /// Parts come from [`ImportItem::ordered_parts`] and their mesh paths from
    /// [`ImportItem::effective_mesh_path`].
    Mesh {
        /// Materials re-assigned by slot name after all parts are imported.
        style_materials: &'a [MaterialRef],
    },
    /// An emote applied onto an existing armature.
    Dance {
        animation: Option<&'a str>,
        skeleton: Option<&'a str>,
        props: &'a [PropData],
    },
}

impl ImportItem {
    /// Get the kind-specific payload of this item.
    pub fn payload(&self) -> ItemPayload<'_> {
        match self.kind {
            ItemKind::Dance => ItemPayload::Dance {
                animation: self.animation.as_deref(),
                skeleton: self.skeleton.as_deref(),
                props: &self.props,
            },
            _ => ItemPayload::Mesh {
                style_materials: &self.style_materials,
            },
        }
    }

    /// Parts in processing order: style parts first, then base parts.
    pub fn ordered_parts(&self) -> impl Iterator<Item = &Part> {
        self.style_parts.iter().chain(self.parts.iter())
    }

    /// Resolve the mesh path to import for `part`, honouring style mesh swaps.
    pub fn effective_mesh_path<'a>(&'a self, part: &'a Part) -> &'a str {
        self.style_meshes
            .iter()
            .find(|swap| swap.mesh_to_swap == part.mesh_path)
            .map(|swap| swap.mesh_to_override.as_str())
            .unwrap_or(&part.mesh_path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn part(slot: &str, mesh: &str) -> Part {
        Part {
            slot: PartSlot::from(slot),
            mesh_path: mesh.to_string(),
            socket_name: None,
            morph_name: None,
            offset: Vector3::ZERO,
            materials: Vec::new(),
            override_materials: Vec::new(),
        }
    }

    #[test]
    fn test_part_slot_roundtrip() {
        assert_eq!(PartSlot::from("Hat"), PartSlot::Hat);
        assert_eq!(PartSlot::from("MiscOrTail"), PartSlot::MiscOrTail);

        let custom = PartSlot::from("Gameplay");
        assert_eq!(custom, PartSlot::Other("Gameplay".to_string()));
        assert_eq!(serde_json::to_string(&custom).unwrap(), "\"Gameplay\"");
    }

    #[test]
    fn test_unknown_kind() {
        let kind: ItemKind = serde_json::from_str("\"Spray\"").unwrap();
        assert_eq!(kind, ItemKind::Other);
    }

    #[test]
    fn test_payload_by_kind() {
        let json = r#"{
            "Name": "Floss",
            "Type": "Dance",
            "Animation": "/Game/Emotes/Floss.Floss",
            "Props": []
        }"#;
        let item: ImportItem = serde_json::from_str(json).unwrap();
        match item.payload() {
            ItemPayload::Dance { animation, props, .. } => {
                assert_eq!(animation, Some("/Game/Emotes/Floss.Floss"));
                assert!(props.is_empty());
            }
            ItemPayload::Mesh { .. } => panic!("dance parsed as mesh item"),
        }

        let json = r#"{
            "Name": "Renegade",
            "Type": "Outfit",
            "StyleMaterials": [
                { "SlotIndex": 0, "Hash": 9, "MaterialName": "MI_Alt", "MaterialNameToSwap": "MI_Body" }
            ]
        }"#;
        let item: ImportItem = serde_json::from_str(json).unwrap();
        match item.payload() {
            ItemPayload::Mesh { style_materials } => {
                assert_eq!(style_materials.len(), 1);
                assert_eq!(style_materials[0].material_name_to_swap.as_deref(), Some("MI_Body"));
            }
            ItemPayload::Dance { .. } => panic!("outfit parsed as dance"),
        }
    }

    #[test]
    fn test_ordered_parts_and_style_swap() {
        let item = ImportItem {
            name: "Test".to_string(),
            kind: ItemKind::Outfit,
            parts: vec![part("Body", "/Game/Body.Body")],
            style_parts: vec![part("Head", "/Game/Head.Head")],
            style_materials: Vec::new(),
            style_meshes: vec![StyleMesh {
                mesh_to_swap: "/Game/Body.Body".to_string(),
                mesh_to_override: "/Game/BodyAlt.BodyAlt".to_string(),
            }],
            animation: None,
            skeleton: None,
            props: Vec::new(),
        };

        let slots: Vec<_> = item.ordered_parts().map(|p| p.slot.clone()).collect();
        assert_eq!(slots, vec![PartSlot::Head, PartSlot::Body]);

        assert_eq!(item.effective_mesh_path(&item.parts[0]), "/Game/BodyAlt.BodyAlt");
        assert_eq!(item.effective_mesh_path(&item.style_parts[0]), "/Game/Head.Head");
    }
}
