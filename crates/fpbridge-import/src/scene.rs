//! The scene collaborator.
//!
//! Everything that touches the host application's data model sits behind
//! [`Scene`]: file importers, object transforms, material graphs and the rig
//! setup run after merging. The pipeline only decides what to call and in
//! which order.

use std::path::Path;

use fpbridge_document::{RigType, Vector3};
use fpbridge_rig::{BoneNode, MergeOutcome};

use crate::shading::MaterialBinding;

/// Options passed to the mesh importer.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct MeshOptions {
    pub reorient_bones: bool,
}

/// What the mesh importer produced.
#[derive(Debug, Clone)]
pub struct ImportedMesh<O> {
    /// Top-level object: the armature when the mesh is skinned.
    pub object: O,
    /// Material slot names of the mesh, by slot index.
    pub material_slots: Vec<String>,
    /// Bones of the armature, empty for static meshes.
    pub skeleton: Vec<BoneNode>,
}

/// Host scene operations used by the import pipeline.
pub trait Scene {
    /// Handle to a scene object.
    type Object: Clone + std::fmt::Debug;
    /// Handle to a material.
    type Material: Clone + std::fmt::Debug;
    /// Scene failure.
    type Error: std::error::Error + Send + Sync + 'static;

    /// Import a mesh file. `Ok(None)` when the importer declined it.
    fn import_mesh(
        &mut self,
        path: &Path,
        options: MeshOptions,
    ) -> Result<Option<ImportedMesh<Self::Object>>, Self::Error>;

    /// Import a bone-only file as `name`, parented to `parent`, replacing any
    /// child of `parent` with the same name.
    fn import_skeleton(
        &mut self,
        path: &Path,
        name: &str,
        parent: &Self::Object,
    ) -> Result<Option<Self::Object>, Self::Error>;

    /// Import an animation onto `target`. `Ok(false)` when the importer declined it.
    fn import_animation(&mut self, target: &Self::Object, path: &Path) -> Result<bool, Self::Error>;

    /// The armature currently selected by the user.
    fn selected_armature(&self) -> Option<Self::Object>;

    /// Drop animation of every bone below `root_bone` and reset their pose.
    fn clear_bone_animation(&mut self, armature: &Self::Object, root_bone: &str) -> Result<(), Self::Error>;

    /// Create a material named `name` from `binding`.
    fn create_material(&mut self, name: &str, binding: &MaterialBinding) -> Result<Self::Material, Self::Error>;

    /// Put `material` into material slot `slot` of `object`.
    fn assign_material(
        &mut self,
        object: &Self::Object,
        slot: usize,
        material: &Self::Material,
    ) -> Result<(), Self::Error>;

    /// Move `object` by `offset`, in scene units.
    fn translate(&mut self, object: &Self::Object, offset: Vector3) -> Result<(), Self::Error>;

    fn set_scale(&mut self, object: &Self::Object, scale: Vector3) -> Result<(), Self::Error>;

    /// Set the shape key called `name` (case-insensitive) to full weight.
    /// `Ok(false)` when the mesh has no such key.
    fn apply_morph(&mut self, object: &Self::Object, name: &str) -> Result<bool, Self::Error>;

    /// Convert triangles to quads.
    fn quad_topology(&mut self, object: &Self::Object) -> Result<(), Self::Error>;

    /// Constrain `child` to `bone` of `armature` with an Euler XYZ rotation offset in radians.
    fn attach(
        &mut self,
        child: &Self::Object,
        armature: &Self::Object,
        bone: &str,
        rotation: [f32; 3],
    ) -> Result<(), Self::Error>;

    /// Build the combined armature from a merge and apply the rig setup.
    fn build_rig(&mut self, outcome: &MergeOutcome<Self::Object>, rig_type: RigType) -> Result<(), Self::Error>;
}
