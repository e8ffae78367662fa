//! A scene that only logs what an import would do.
//!
//! Used by `fpbridge serve` to exercise the bridge without a host
//! application: every operation succeeds and is written to the log.

use std::convert::Infallible;
use std::path::Path;

use fpbridge::document::{RigType, Vector3};
use fpbridge::import::{ImportedMesh, MaterialBinding, MeshOptions, Scene};
use fpbridge::rig::MergeOutcome;
use log::{info, warn};

/// Material slots reported for every mesh, since mesh files are not read.
const DRY_RUN_SLOTS: usize = 16;

#[derive(Debug, Default)]
pub struct LogScene {
    armature: Option<String>,
    objects: usize,
    materials: usize,
}

impl LogScene {
    pub fn new(armature: Option<String>) -> Self {
        Self {
            armature,
            ..Self::default()
        }
    }

    pub fn objects(&self) -> usize {
        self.objects
    }

    pub fn materials(&self) -> usize {
        self.materials
    }

    fn object_for(&mut self, path: &Path) -> String {
        self.objects += 1;
        let stem = path
            .file_stem()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_else(|| "object".to_string());
        format!("{}#{}", stem, self.objects)
    }
}

impl Scene for LogScene {
    type Object = String;
    type Material = String;
    type Error = Infallible;

    fn import_mesh(
        &mut self,
        path: &Path,
        options: MeshOptions,
    ) -> Result<Option<ImportedMesh<String>>, Infallible> {
        if !path.is_file() {
            warn!("Mesh file {} does not exist", path.display());
        }
        let object = self.object_for(path);
        info!(
            "Import mesh {} as {} (reorient bones: {})",
            path.display(),
            object,
            options.reorient_bones
        );
        Ok(Some(ImportedMesh {
            object,
            material_slots: (0..DRY_RUN_SLOTS).map(|i| format!("Slot {}", i)).collect(),
            skeleton: Vec::new(),
        }))
    }

    fn import_skeleton(
        &mut self,
        path: &Path,
        name: &str,
        parent: &String,
    ) -> Result<Option<String>, Infallible> {
        self.objects += 1;
        info!("Import skeleton {} as {} under {}", path.display(), name, parent);
        Ok(Some(name.to_string()))
    }

    fn import_animation(&mut self, target: &String, path: &Path) -> Result<bool, Infallible> {
        info!("Import animation {} onto {}", path.display(), target);
        Ok(true)
    }

    fn selected_armature(&self) -> Option<String> {
        self.armature.clone()
    }

    fn clear_bone_animation(&mut self, armature: &String, root_bone: &str) -> Result<(), Infallible> {
        info!("Clear animation below {} on {}", root_bone, armature);
        Ok(())
    }

    fn create_material(&mut self, name: &str, binding: &MaterialBinding) -> Result<String, Infallible> {
        self.materials += 1;
        info!(
            "Create material {} ({} textures, {} scalars, {} vectors)",
            name,
            binding.textures.len(),
            binding.scalars.len(),
            binding.vectors.len()
        );
        Ok(name.to_string())
    }

    fn assign_material(&mut self, object: &String, slot: usize, material: &String) -> Result<(), Infallible> {
        info!("Assign {} to {} slot {}", material, object, slot);
        Ok(())
    }

    fn translate(&mut self, object: &String, offset: Vector3) -> Result<(), Infallible> {
        info!("Move {} by ({}, {}, {})", object, offset.x, offset.y, offset.z);
        Ok(())
    }

    fn set_scale(&mut self, object: &String, scale: Vector3) -> Result<(), Infallible> {
        info!("Scale {} to ({}, {}, {})", object, scale.x, scale.y, scale.z);
        Ok(())
    }

    fn apply_morph(&mut self, object: &String, name: &str) -> Result<bool, Infallible> {
        info!("Enable shape key {} on {}", name, object);
        Ok(true)
    }

    fn quad_topology(&mut self, object: &String) -> Result<(), Infallible> {
        info!("Convert {} to quads", object);
        Ok(())
    }

    fn attach(
        &mut self,
        child: &String,
        armature: &String,
        bone: &str,
        rotation: [f32; 3],
    ) -> Result<(), Infallible> {
        info!("Attach {} to {}:{} rotated {:?}", child, armature, bone, rotation);
        Ok(())
    }

    fn build_rig(&mut self, outcome: &MergeOutcome<String>, rig_type: RigType) -> Result<(), Infallible> {
        info!(
            "Build {:?} rig: {} bones, {} attachments, {} detached",
            rig_type,
            outcome.tree.len(),
            outcome.attachments.len(),
            outcome.detached.len()
        );
        Ok(())
    }
}
