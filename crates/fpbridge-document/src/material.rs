//! Material references and their parameter bindings.
//!
//! Every material sent by the exporter carries a content hash. Two references
//! with the same hash describe the same logical resource, so the receiving
//! side can build each material once per session.

use serde::{Deserialize, Serialize};

/// Content-identity key of a material.
///
/// The exporter sends a signed 32-bit hash; it is widened here so any integer
/// the sender emits is accepted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ContentHash(pub i64);

impl ContentHash {
    /// Create a hash from a raw value.
    pub const fn from_raw(value: i64) -> Self {
        Self(value)
    }

    /// Get the raw hash value.
    pub fn value(&self) -> i64 {
        self.0
    }

    /// Stable textual suffix used to disambiguate display names.
    ///
    /// Lowercase hex of the absolute value, without a `0x` prefix, led by
    /// `n` for negative hashes so `h` and `-h` never share a suffix.
    pub fn suffix(&self) -> String {
        if self.0 < 0 {
            format!("n{:x}", self.0.unsigned_abs())
        } else {
            format!("{:x}", self.0)
        }
    }
}

impl std::fmt::Display for ContentHash {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A texture parameter (`Name` → texture object path).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TextureParam {
    #[serde(rename = "Name")]
    pub name: String,
    #[serde(rename = "Value")]
    pub value: String,
}

/// A scalar parameter.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScalarParam {
    #[serde(rename = "Name")]
    pub name: String,
    #[serde(rename = "Value")]
    pub value: f32,
}

/// Linear RGBA color.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct LinearColor {
    #[serde(rename = "R", default)]
    pub r: f32,
    #[serde(rename = "G", default)]
    pub g: f32,
    #[serde(rename = "B", default)]
    pub b: f32,
    #[serde(rename = "A", default)]
    pub a: f32,
}

impl LinearColor {
    /// Create a new color.
    pub const fn new(r: f32, g: f32, b: f32, a: f32) -> Self {
        Self { r, g, b, a }
    }

    /// Components as an array.
    pub fn to_array(self) -> [f32; 4] {
        [self.r, self.g, self.b, self.a]
    }
}

/// A vector (color) parameter.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VectorParam {
    #[serde(rename = "Name")]
    pub name: String,
    #[serde(rename = "Value")]
    pub value: LinearColor,
}

/// A material to apply to one material slot of an imported mesh.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MaterialRef {
    /// Index of the material slot on the target mesh.
    #[serde(rename = "SlotIndex", default)]
    pub slot_index: usize,
    /// Content identity of the material.
    #[serde(rename = "Hash")]
    pub hash: ContentHash,
    /// Display name of the material.
    #[serde(rename = "MaterialName")]
    pub material_name: String,
    /// For style materials: name of the existing slot material to replace.
    #[serde(rename = "MaterialNameToSwap", default, skip_serializing_if = "Option::is_none")]
    pub material_name_to_swap: Option<String>,
    #[serde(rename = "Textures", default)]
    pub textures: Vec<TextureParam>,
    #[serde(rename = "Scalars", default)]
    pub scalars: Vec<ScalarParam>,
    #[serde(rename = "Vectors", default)]
    pub vectors: Vec<VectorParam>,
}
