//! The top-level request document.

use serde::{Deserialize, Serialize};

use crate::item::ImportItem;
use crate::{Error, Result};

/// Rig setup applied after skeletons are merged.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "i64", into = "i64")]
pub enum RigType {
    /// Keep the merged hierarchy as-is.
    #[default]
    Default,
    /// Build the animator-friendly control rig on top of the merged hierarchy.
    Tasty,
}

impl TryFrom<i64> for RigType {
    type Error = Error;

    fn try_from(value: i64) -> Result<Self> {
        match value {
            0 => Ok(RigType::Default),
            1 => Ok(RigType::Tasty),
            other => Err(Error::InvalidRigType(other)),
        }
    }
}

impl From<RigType> for i64 {
    fn from(value: RigType) -> Self {
        match value {
            RigType::Default => 0,
            RigType::Tasty => 1,
        }
    }
}

/// Named options sent with every request.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImportSettings {
    #[serde(rename = "ReorientBones", default)]
    pub reorient_bones: bool,
    #[serde(rename = "QuadTopo", default)]
    pub quad_topo: bool,
    #[serde(rename = "MergeSkeletons", default)]
    pub merge_skeletons: bool,
    #[serde(rename = "RigType", default)]
    pub rig_type: RigType,
}

/// A fully reassembled import request.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RequestDocument {
    /// Filesystem root the asset paths are relative to.
    #[serde(rename = "AssetsRoot")]
    pub assets_root: String,
    #[serde(rename = "Settings", default)]
    pub settings: ImportSettings,
    #[serde(rename = "Data", default)]
    pub items: Vec<ImportItem>,
}

impl RequestDocument {
    /// Decode a document from raw JSON bytes.
    pub fn from_slice(data: &[u8]) -> Result<Self> {
        Ok(serde_json::from_slice(data)?)
    }

    /// Decode a document from an already parsed JSON value.
    pub fn from_value(value: serde_json::Value) -> Result<Self> {
        Ok(serde_json::from_value(value)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{ContentHash, ItemKind, PartSlot};

    const SAMPLE: &str = r#"{
        "AssetsRoot": "C:/Exports",
        "Settings": {
            "ReorientBones": false,
            "QuadTopo": true,
            "MergeSkeletons": true,
            "RigType": 1
        },
        "Data": [
            {
                "Name": "Renegade Raider",
                "Type": "Outfit",
                "Parts": [
                    {
                        "Part": "Body",
                        "MeshPath": "/Game/Characters/Body.Body",
                        "Offset": { "X": 0, "Y": 0, "Z": 0 },
                        "Materials": [
                            { "SlotIndex": 0, "Hash": 12345, "MaterialName": "MI_Body" }
                        ]
                    },
                    {
                        "Part": "Hat",
                        "MeshPath": "/Game/Characters/Hat.Hat",
                        "SocketName": "Hat",
                        "Offset": { "X": 0, "Y": 0, "Z": 10 }
                    }
                ],
                "StyleParts": [],
                "StyleMaterials": [],
                "StyleMeshes": []
            }
        ]
    }"#;

    #[test]
    fn test_parse_sample_document() {
        let document = RequestDocument::from_slice(SAMPLE.as_bytes()).unwrap();

        assert_eq!(document.assets_root, "C:/Exports");
        assert!(document.settings.quad_topo);
        assert!(document.settings.merge_skeletons);
        assert_eq!(document.settings.rig_type, RigType::Tasty);

        let item = &document.items[0];
        assert_eq!(item.kind, ItemKind::Outfit);
        assert_eq!(item.parts.len(), 2);
        assert_eq!(item.parts[0].materials[0].hash, ContentHash::from_raw(12345));
        assert_eq!(item.parts[1].slot, PartSlot::Hat);
        assert_eq!(item.parts[1].socket_name.as_deref(), Some("Hat"));
        assert_eq!(item.parts[1].offset.z, 10.0);
    }

    #[test]
    fn test_missing_settings_default() {
        let document = RequestDocument::from_slice(br#"{"AssetsRoot": "", "Data": []}"#).unwrap();
        assert_eq!(document.settings, ImportSettings::default());
        assert_eq!(document.settings.rig_type, RigType::Default);
    }

    #[test]
    fn test_invalid_rig_type() {
        let result = RequestDocument::from_slice(
            br#"{"AssetsRoot": "", "Settings": {"RigType": 7}, "Data": []}"#,
        );
        assert!(result.is_err());
    }

    #[test]
    fn test_from_value() {
        let value: serde_json::Value = serde_json::from_str(SAMPLE).unwrap();
        let document = RequestDocument::from_value(value).unwrap();
        assert_eq!(document.items[0].name, "Renegade Raider");
    }
}
