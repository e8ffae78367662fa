//! Mapping exporter asset paths onto files under the assets root.
//!
//! The exporter refers to assets by game path, e.g.
//! `/Game/Characters/Body/SK_Body.SK_Body`. The object name after the first
//! `.` is dropped and the rest is resolved relative to the assets root.

use std::path::{Path, PathBuf};

/// Resolves game paths to exported files.
#[derive(Debug, Clone)]
pub struct AssetPaths {
    root: PathBuf,
}

impl AssetPaths {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Mesh file for a game path: `<path>_LOD0.psk`, else `.pskx`.
    ///
    /// Falls back to the extensionless path when neither exists, leaving the
    /// error to the mesh importer.
    pub fn mesh(&self, game_path: &str) -> PathBuf {
        self.with_mesh_extension(self.root.join(format!("{}_LOD0", relative(game_path))))
    }

    /// Skeleton file for a game path; like [`AssetPaths::mesh`] without the LOD suffix.
    pub fn skeleton(&self, game_path: &str) -> PathBuf {
        self.with_mesh_extension(self.root.join(relative(game_path)))
    }

    /// Texture file for a game path.
    pub fn texture(&self, game_path: &str) -> PathBuf {
        self.root.join(format!("{}.png", relative(game_path)))
    }

    /// Animation file for a game path.
    pub fn animation(&self, game_path: &str) -> PathBuf {
        self.root.join(format!("{}_SEQ0.psa", relative(game_path)))
    }

    fn with_mesh_extension(&self, base: PathBuf) -> PathBuf {
        for extension in ["psk", "pskx"] {
            let candidate = append_extension(&base, extension);
            if candidate.is_file() {
                return candidate;
            }
        }
        base
    }
}

/// Strip the leading `/` and the `.ObjectName` suffix.
pub fn relative(game_path: &str) -> &str {
    let path = game_path.strip_prefix('/').unwrap_or(game_path);
    path.split_once('.').map_or(path, |(path, _)| path)
}

/// Object name of a game path, the part after the first `.`.
pub fn object_name(game_path: &str) -> Option<&str> {
    game_path.split_once('.').map(|(_, name)| name)
}

fn append_extension(base: &Path, extension: &str) -> PathBuf {
    let mut path = base.as_os_str().to_owned();
    path.push(".");
    path.push(extension);
    PathBuf::from(path)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    #[test]
    fn test_relative() {
        assert_eq!(relative("/Game/Body/SK_Body.SK_Body"), "Game/Body/SK_Body");
        assert_eq!(relative("Game/Body/SK_Body"), "Game/Body/SK_Body");
        assert_eq!(object_name("/Game/T_Diffuse.T_Diffuse"), Some("T_Diffuse"));
        assert_eq!(object_name("/Game/T_Diffuse"), None);
    }

    #[test]
    fn test_mesh_extension_preference() {
        let dir = tempfile::tempdir().unwrap();
        let paths = AssetPaths::new(dir.path());
        let folder = dir.path().join("Game/Body");
        fs::create_dir_all(&folder).unwrap();

        // Neither exists: bare path.
        assert_eq!(
            paths.mesh("/Game/Body/SK_Body.SK_Body"),
            folder.join("SK_Body_LOD0")
        );

        fs::write(folder.join("SK_Body_LOD0.pskx"), b"").unwrap();
        assert_eq!(
            paths.mesh("/Game/Body/SK_Body.SK_Body"),
            folder.join("SK_Body_LOD0.pskx")
        );

        fs::write(folder.join("SK_Body_LOD0.psk"), b"").unwrap();
        assert_eq!(
            paths.mesh("/Game/Body/SK_Body.SK_Body"),
            folder.join("SK_Body_LOD0.psk")
        );
    }

    #[test]
    fn test_skeleton_texture_animation() {
        let dir = tempfile::tempdir().unwrap();
        let paths = AssetPaths::new(dir.path());
        fs::create_dir_all(dir.path().join("Game")).unwrap();
        fs::write(dir.path().join("Game/SK_Prop.psk"), b"").unwrap();

        assert_eq!(paths.skeleton("/Game/SK_Prop.SK_Prop"), dir.path().join("Game/SK_Prop.psk"));
        assert_eq!(paths.texture("/Game/T_D.T_D"), dir.path().join("Game/T_D.png"));
        assert_eq!(
            paths.animation("/Game/Emote_Dance.Emote_Dance"),
            dir.path().join("Game/Emote_Dance_SEQ0.psa")
        );
    }
}
