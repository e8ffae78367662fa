//! Material parameter bindings.
//!
//! Exported materials carry named texture, scalar and vector parameters.
//! The tables below map the names the exporter emits onto input slots of the
//! shared shader; the scene builds the actual node graph from a
//! [`MaterialBinding`]. Names match case-insensitively.

use std::path::PathBuf;

use fpbridge_document::{LinearColor, MaterialRef};
use log::{debug, trace};

use crate::paths::AssetPaths;

/// Shader input receiving emissive textures.
pub const EMISSIVE_SLOT: usize = 12;

/// A texture parameter and the shader slot it feeds.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TextureMapping {
    pub name: &'static str,
    pub slot: usize,
    /// Non-color data, sampled without color management.
    pub linear: bool,
}

/// A vector parameter, its color slot and the slot receiving its alpha.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct VectorMapping {
    pub name: &'static str,
    pub slot: usize,
    pub alpha_slot: Option<usize>,
}

const fn texture(name: &'static str, slot: usize, linear: bool) -> TextureMapping {
    TextureMapping { name, slot, linear }
}

pub const TEXTURE_MAPPINGS: &[TextureMapping] = &[
    texture("Diffuse", 0, false),
    texture("PetalDetailMap", 0, false),
    texture("SpecularMasks", 1, true),
    texture("SpecMap", 1, true),
    texture("Normals", 5, true),
    texture("Normal", 5, true),
    texture("NormalMap", 5, true),
    texture("M", 7, true),
    texture("Emissive", EMISSIVE_SLOT, false),
    texture("EmissiveTexture", EMISSIVE_SLOT, false),
];

pub const SCALAR_MAPPINGS: &[(&str, usize)] = &[
    ("RoughnessMin", 3),
    ("Roughness Min", 3),
    ("SpecRoughnessMin", 3),
    ("RoughnessMax", 4),
    ("Roughness Max", 4),
    ("SpecRoughnessMax", 4),
    ("emissive mult", 13),
    ("TH_StaticEmissiveMult", 13),
    ("Emissive", 13),
    ("Emissive_BrightnessMin", 14),
    ("Emissive_BrightnessMax", 15),
    ("Emissive Fres EX", 16),
    ("EmissiveFresnelExp", 16),
];

pub const VECTOR_MAPPINGS: &[VectorMapping] = &[
    VectorMapping {
        name: "Skin Boost Color And Exponent",
        slot: 10,
        alpha_slot: Some(11),
    },
    VectorMapping {
        name: "EmissiveColor",
        slot: 18,
        alpha_slot: Some(17),
    },
    VectorMapping {
        name: "Emissive Color",
        slot: 18,
        alpha_slot: Some(17),
    },
];

/// Vector parameters describing a cropped region of the emissive texture.
pub const CROPPED_EMISSIVE_VECTORS: &[&str] = &[
    "EmissiveUVs_RG_UpperLeftCorner_BA_LowerRightCorner",
    "Emissive Texture UVs RG_TopLeft BA_BottomRight",
];

pub fn texture_mapping(name: &str) -> Option<&'static TextureMapping> {
    TEXTURE_MAPPINGS
        .iter()
        .find(|m| m.name.eq_ignore_ascii_case(name))
}

pub fn scalar_slot(name: &str) -> Option<usize> {
    SCALAR_MAPPINGS
        .iter()
        .find(|(n, _)| n.eq_ignore_ascii_case(name))
        .map(|&(_, slot)| slot)
}

pub fn vector_mapping(name: &str) -> Option<&'static VectorMapping> {
    VECTOR_MAPPINGS
        .iter()
        .find(|m| m.name.eq_ignore_ascii_case(name))
}

#[derive(Debug, Clone, PartialEq)]
pub struct TextureInput {
    pub slot: usize,
    pub path: PathBuf,
    pub linear: bool,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScalarInput {
    pub slot: usize,
    pub value: f32,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct VectorInput {
    pub slot: usize,
    /// RGB with alpha forced to 1.
    pub color: [f32; 4],
    /// Alpha channel routed to its own slot.
    pub alpha: Option<ScalarInput>,
}

/// Everything the scene needs to build one material.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MaterialBinding {
    pub textures: Vec<TextureInput>,
    pub scalars: Vec<ScalarInput>,
    pub vectors: Vec<VectorInput>,
    /// UV crop (RG top-left, BA bottom-right) for the emissive texture.
    pub cropped_emissive: Option<LinearColor>,
}

impl MaterialBinding {
    /// Map the parameters of `material` onto shader slots.
    ///
    /// Unknown parameter names and missing texture files are skipped.
    pub fn from_material(material: &MaterialRef, paths: &AssetPaths) -> Self {
        let mut binding = Self::default();

        for param in &material.textures {
            let Some(mapping) = texture_mapping(&param.name) else {
                trace!("Unmapped texture parameter {}", param.name);
                continue;
            };
            if mapping.slot == EMISSIVE_SLOT && param.value.ends_with("_FX") {
                continue;
            }
            let path = paths.texture(&param.value);
            if !path.is_file() {
                debug!("Texture {} not found at {}", param.value, path.display());
                continue;
            }
            binding.textures.push(TextureInput {
                slot: mapping.slot,
                path,
                linear: mapping.linear,
            });
        }

        for param in &material.scalars {
            if let Some(slot) = scalar_slot(&param.name) {
                binding.scalars.push(ScalarInput {
                    slot,
                    value: param.value,
                });
            }
        }

        for param in &material.vectors {
            if let Some(mapping) = vector_mapping(&param.name) {
                let color = param.value;
                binding.vectors.push(VectorInput {
                    slot: mapping.slot,
                    color: [color.r, color.g, color.b, 1.0],
                    alpha: mapping.alpha_slot.map(|slot| ScalarInput {
                        slot,
                        value: color.a,
                    }),
                });
            }
        }

        if binding.has_texture(EMISSIVE_SLOT) {
            binding.cropped_emissive = material
                .vectors
                .iter()
                .find(|v| CROPPED_EMISSIVE_VECTORS.contains(&v.name.as_str()))
                .map(|v| v.value);
        }

        binding
    }

    /// Whether a texture feeds `slot`.
    pub fn has_texture(&self, slot: usize) -> bool {
        self.textures.iter().any(|t| t.slot == slot)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use fpbridge_document::{ContentHash, ScalarParam, TextureParam, VectorParam};

    fn material() -> MaterialRef {
        MaterialRef {
            slot_index: 0,
            hash: ContentHash::from_raw(1),
            material_name: "MI_Test".to_string(),
            material_name_to_swap: None,
            textures: vec![
                TextureParam {
                    name: "diffuse".into(),
                    value: "/Game/T_Body_D.T_Body_D".into(),
                },
                TextureParam {
                    name: "Normals".into(),
                    value: "/Game/T_Body_N.T_Body_N".into(),
                },
                TextureParam {
                    name: "Emissive".into(),
                    value: "/Game/T_Glow_FX".into(),
                },
                TextureParam {
                    name: "Unknown".into(),
                    value: "/Game/T_Body_D.T_Body_D".into(),
                },
            ],
            scalars: vec![
                ScalarParam {
                    name: "roughness min".into(),
                    value: 0.25,
                },
                ScalarParam {
                    name: "Metallic".into(),
                    value: 1.0,
                },
            ],
            vectors: vec![
                VectorParam {
                    name: "EmissiveColor".into(),
                    value: LinearColor::new(1.0, 0.5, 0.0, 3.0),
                },
                VectorParam {
                    name: CROPPED_EMISSIVE_VECTORS[0].into(),
                    value: LinearColor::new(0.0, 0.0, 0.5, 0.5),
                },
            ],
        }
    }

    #[test]
    fn test_lookup_is_case_insensitive() {
        assert_eq!(texture_mapping("specularmasks").map(|m| m.slot), Some(1));
        assert!(texture_mapping("m").is_some_and(|m| m.linear));
        assert_eq!(scalar_slot("EMISSIVE"), Some(13));
        assert_eq!(vector_mapping("emissive color").map(|m| m.alpha_slot), Some(Some(17)));
        assert_eq!(scalar_slot("Opacity"), None);
    }

    #[test]
    fn test_binding_from_material() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::create_dir_all(dir.path().join("Game")).unwrap();
        std::fs::write(dir.path().join("Game/T_Body_D.png"), b"").unwrap();
        std::fs::write(dir.path().join("Game/T_Glow_FX.png"), b"").unwrap();
        let paths = AssetPaths::new(dir.path());

        let binding = MaterialBinding::from_material(&material(), &paths);

        // Normals is missing on disk, the `_FX` emissive is skipped.
        assert_eq!(
            binding.textures,
            vec![TextureInput {
                slot: 0,
                path: dir.path().join("Game/T_Body_D.png"),
                linear: false,
            }]
        );
        assert_eq!(binding.scalars, vec![ScalarInput { slot: 3, value: 0.25 }]);
        assert_eq!(
            binding.vectors,
            vec![VectorInput {
                slot: 18,
                color: [1.0, 0.5, 0.0, 1.0],
                alpha: Some(ScalarInput { slot: 17, value: 3.0 }),
            }]
        );
        // No emissive texture bound, so the crop has nothing to apply to.
        assert_eq!(binding.cropped_emissive, None);
    }

    #[test]
    fn test_cropped_emissive_needs_emissive_texture() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::create_dir_all(dir.path().join("Game")).unwrap();
        std::fs::write(dir.path().join("Game/T_Glow.png"), b"").unwrap();
        let paths = AssetPaths::new(dir.path());

        let mut material = material();
        material.textures[2].value = "/Game/T_Glow.T_Glow".into();

        let binding = MaterialBinding::from_material(&material, &paths);
        assert!(binding.has_texture(EMISSIVE_SLOT));
        assert_eq!(
            binding.cropped_emissive,
            Some(LinearColor::new(0.0, 0.0, 0.5, 0.5))
        );
    }
}
