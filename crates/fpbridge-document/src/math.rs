//! Vector and rotation types as serialized by the exporter.

use serde::{Deserialize, Serialize};

/// A 3-component vector in exporter units (centimetres).
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Vector3 {
    #[serde(rename = "X", default)]
    pub x: f32,
    #[serde(rename = "Y", default)]
    pub y: f32,
    #[serde(rename = "Z", default)]
    pub z: f32,
}

impl Vector3 {
    /// The zero vector.
    pub const ZERO: Self = Self::new(0.0, 0.0, 0.0);

    /// Create a new vector.
    pub const fn new(x: f32, y: f32, z: f32) -> Self {
        Self { x, y, z }
    }

    /// Multiply every component by `factor`.
    pub fn scaled(self, factor: f32) -> Self {
        Self::new(self.x * factor, self.y * factor, self.z * factor)
    }
}

impl std::ops::Add for Vector3 {
    type Output = Self;

    fn add(self, other: Self) -> Self {
        Self::new(self.x + other.x, self.y + other.y, self.z + other.z)
    }
}

/// An Unreal-style rotator in degrees.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Rotator {
    #[serde(rename = "Pitch", default)]
    pub pitch: f32,
    #[serde(rename = "Yaw", default)]
    pub yaw: f32,
    #[serde(rename = "Roll", default)]
    pub roll: f32,
}

impl Rotator {
    /// Convert to an XYZ Euler rotation in radians.
    ///
    /// Roll maps to X, pitch to Y and the yaw is negated onto Z to account for
    /// the handedness flip between the exporter and the scene.
    pub fn to_euler_radians(self) -> [f32; 3] {
        [
            self.roll.to_radians(),
            self.pitch.to_radians(),
            -self.yaw.to_radians(),
        ]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_vector_scaling() {
        let offset = Vector3::new(100.0, -50.0, 0.0).scaled(0.01);
        assert_eq!(offset, Vector3::new(1.0, -0.5, 0.0));
    }

    #[test]
    fn test_rotator_to_euler() {
        let rotator = Rotator { pitch: 90.0, yaw: 180.0, roll: 0.0 };
        let [x, y, z] = rotator.to_euler_radians();
        assert_eq!(x, 0.0);
        assert!((y - std::f32::consts::FRAC_PI_2).abs() < 1e-6);
        assert!((z + std::f32::consts::PI).abs() < 1e-6);
    }

    #[test]
    fn test_vector_missing_components() {
        let v: Vector3 = serde_json::from_str(r#"{"X": 2.5}"#).unwrap();
        assert_eq!(v, Vector3::new(2.5, 0.0, 0.0));
    }
}
