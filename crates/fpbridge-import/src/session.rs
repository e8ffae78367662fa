//! The import pipeline.
//!
//! An [`ImportSession`] owns the scene handle and the material cache for as
//! long as the bridge runs. Each document is applied item by item; a failing
//! part or item is recorded in the [`ImportReport`] and the rest of the
//! document still goes through.

use std::path::{Path, PathBuf};

use fpbridge_document::{
    ImportItem, ImportSettings, ItemKind, ItemPayload, MaterialRef, Part, PartSlot, PropData,
    RequestDocument, Rotator, Vector3,
};
use fpbridge_net::{error_chain, Document, DocumentHandler};
use fpbridge_rig::{merge, HierarchyTree, MergeOptions, RigPart};
use log::{debug, info, warn};

use crate::cache::ResourceCache;
use crate::paths::AssetPaths;
use crate::report::{ImportReport, ItemReport, PartStatus};
use crate::scene::{MeshOptions, Scene};
use crate::shading::MaterialBinding;
use crate::{Error, Result};

/// Exporter units are centimetres, the scene works in metres.
pub const UNIT_SCALE: f32 = 0.01;

/// Name given to the skeleton emote props are attached to.
pub const PROP_SKELETON_NAME: &str = "Prop_Skeleton";

/// Bone whose descendants lose their animation when an emote is applied.
pub const FACE_ROOT_BONE: &str = "faceAttach";

/// Map exporter socket names onto the bones props attach to.
pub fn remap_socket(socket: &str) -> &str {
    match socket {
        "RightHand" => "weapon_r",
        "LeftHand" => "weapon_l",
        "AttachSocket" => "attach",
        other => other,
    }
}

struct ImportedPart<O> {
    slot: PartSlot,
    socket: Option<String>,
    object: O,
    material_slots: Vec<String>,
    skeleton: Option<HierarchyTree>,
}

struct ItemContext<'a> {
    paths: &'a AssetPaths,
    settings: &'a ImportSettings,
    index: usize,
}

/// Applies request documents to a scene.
pub struct ImportSession<S: Scene> {
    scene: S,
    materials: ResourceCache<S::Material>,
    merge_options: MergeOptions,
    assets_root: Option<PathBuf>,
    documents: u64,
}

impl<S: Scene> ImportSession<S> {
    pub fn new(scene: S) -> Self {
        Self {
            scene,
            materials: ResourceCache::new(),
            merge_options: MergeOptions::default(),
            assets_root: None,
            documents: 0,
        }
    }

    /// Use `options` when merging outfit skeletons.
    pub fn with_merge_options(mut self, options: MergeOptions) -> Self {
        self.merge_options = options;
        self
    }

    /// Resolve assets under `root` instead of the document's `AssetsRoot`.
    pub fn with_assets_root(mut self, root: impl Into<PathBuf>) -> Self {
        self.assets_root = Some(root.into());
        self
    }

    pub fn scene(&self) -> &S {
        &self.scene
    }

    pub fn scene_mut(&mut self) -> &mut S {
        &mut self.scene
    }

    /// Materials created so far, keyed by content hash.
    pub fn materials(&self) -> &ResourceCache<S::Material> {
        &self.materials
    }

    /// Documents applied so far.
    pub fn documents(&self) -> u64 {
        self.documents
    }

    pub fn into_scene(self) -> S {
        self.scene
    }

    /// Apply every item of `request`.
    pub fn import(&mut self, request: &RequestDocument) -> ImportReport {
        let root = self
            .assets_root
            .clone()
            .unwrap_or_else(|| PathBuf::from(&request.assets_root));
        let paths = AssetPaths::new(root);
        let materials_before = self.materials.constructed();
        let mut report = ImportReport::default();

        for (index, item) in request.items.iter().enumerate() {
            info!("Received import for {}: {}", item.kind, item.name);

            let context = ItemContext {
                paths: &paths,
                settings: &request.settings,
                index,
            };
            let mut item_report = ItemReport::new(item);

            let result = match item.payload() {
                ItemPayload::Mesh { style_materials } => {
                    self.import_mesh_item(item, style_materials, &context, &mut item_report)
                }
                ItemPayload::Dance {
                    animation,
                    skeleton,
                    props,
                } => self.import_dance(item, animation, skeleton, props, &context, &mut item_report),
            };

            if let Err(e) = result {
                let message = error_chain(&e);
                warn!("Failed to import {}: {}", item.name, message);
                item_report.error = Some(message);
            }
            report.items.push(item_report);
        }

        report.materials_created = self.materials.constructed() - materials_before;
        self.documents += 1;
        report
    }

    fn import_mesh_item(
        &mut self,
        item: &ImportItem,
        style_materials: &[MaterialRef],
        context: &ItemContext<'_>,
        report: &mut ItemReport,
    ) -> Result<()> {
        let mut imported: Vec<ImportedPart<S::Object>> = Vec::new();

        for part in item.ordered_parts() {
            let label = part.slot.to_string();
            if item.kind == ItemKind::Outfit && imported.iter().any(|p| p.slot == part.slot) {
                debug!("Skipping {} part {}: slot already imported", part.slot, part.mesh_path);
                report.record(label, PartStatus::DuplicateSlot);
                continue;
            }

            match self.import_part(item, part, context) {
                Ok(part) => {
                    imported.push(part);
                    report.record(label, PartStatus::Imported);
                }
                Err(e) => {
                    let message = error_chain(&e);
                    warn!("Failed to import {} part of {}: {}", label, item.name, message);
                    report.record(label, PartStatus::Failed(message));
                }
            }
        }

        for part in &imported {
            for material in style_materials {
                let Some(target) = material.material_name_to_swap.as_deref() else {
                    continue;
                };
                if let Some(slot) = part.material_slots.iter().position(|s| s == target) {
                    self.apply_material(&part.object, &part.material_slots, slot, material, context.paths)?;
                }
            }
        }

        if context.settings.merge_skeletons && item.kind == ItemKind::Outfit {
            let parts: Vec<RigPart<S::Object>> = imported
                .into_iter()
                .filter_map(|p| {
                    p.skeleton
                        .map(|tree| RigPart::new(p.slot, p.socket, tree, p.object))
                })
                .collect();

            if !parts.is_empty() {
                let outcome = merge(parts, &self.merge_options);
                info!(
                    "Merged {} skeletons into {} bones ({} attached)",
                    outcome.merged_parts.len(),
                    outcome.tree.len(),
                    outcome.attachments.len()
                );
                self.scene
                    .build_rig(&outcome, context.settings.rig_type)
                    .map_err(|e| Error::scene("build the merged rig", e))?;
                report.merged_bones = Some(outcome.tree.len());
            }
        }

        Ok(())
    }

    fn import_part(
        &mut self,
        item: &ImportItem,
        part: &Part,
        context: &ItemContext<'_>,
    ) -> Result<ImportedPart<S::Object>> {
        let path = context.paths.mesh(item.effective_mesh_path(part));
        let options = MeshOptions {
            reorient_bones: context.settings.reorient_bones,
        };
        let mesh = self
            .scene
            .import_mesh(&path, options)
            .map_err(|e| Error::scene(format!("import {}", path.display()), e))?
            .ok_or_else(|| Error::MeshNotFound { path: path.clone() })?;

        let skeleton = if mesh.skeleton.is_empty() {
            None
        } else {
            Some(HierarchyTree::from_bones(mesh.skeleton)?)
        };
        let object = mesh.object;

        let mut offset = part.offset.scaled(UNIT_SCALE);
        if item.kind == ItemKind::Prop {
            offset = offset + Vector3::new(context.index as f32, 0.0, 0.0);
        }
        if offset != Vector3::ZERO {
            self.scene
                .translate(&object, offset)
                .map_err(|e| Error::scene("move part", e))?;
        }

        if let Some(morph) = &part.morph_name {
            let applied = self
                .scene
                .apply_morph(&object, morph)
                .map_err(|e| Error::scene("apply morph", e))?;
            if !applied {
                debug!("No shape key {} on {}", morph, part.mesh_path);
            }
        }

        if context.settings.quad_topo {
            self.scene
                .quad_topology(&object)
                .map_err(|e| Error::scene("convert to quads", e))?;
        }

        for material in part.materials.iter().chain(&part.override_materials) {
            self.apply_material(
                &object,
                &mesh.material_slots,
                material.slot_index,
                material,
                context.paths,
            )?;
        }

        Ok(ImportedPart {
            slot: part.slot.clone(),
            socket: part.socket_name.clone(),
            object,
            material_slots: mesh.material_slots,
            skeleton,
        })
    }

    fn import_dance(
        &mut self,
        item: &ImportItem,
        animation: Option<&str>,
        skeleton: Option<&str>,
        props: &[PropData],
        context: &ItemContext<'_>,
        report: &mut ItemReport,
    ) -> Result<()> {
        let armature = self.scene.selected_armature().ok_or(Error::MissingArmature)?;

        let Some(animation) = animation else {
            warn!("Emote {} has no animation", item.name);
            return Ok(());
        };
        let animation_path = context.paths.animation(animation);
        self.animate(&armature, &animation_path)?;
        self.scene
            .clear_bone_animation(&armature, FACE_ROOT_BONE)
            .map_err(|e| Error::scene("clear face animation", e))?;

        if props.is_empty() {
            return Ok(());
        }

        let skeleton_path = context.paths.skeleton(skeleton.ok_or(Error::MissingSkeleton)?);
        let prop_skeleton = self
            .scene
            .import_skeleton(&skeleton_path, PROP_SKELETON_NAME, &armature)
            .map_err(|e| Error::scene(format!("import {}", skeleton_path.display()), e))?
            .ok_or_else(|| Error::MeshNotFound {
                path: skeleton_path.clone(),
            })?;
        self.animate(&prop_skeleton, &animation_path)?;

        for prop in props {
            let label = prop.prop.mesh_path.clone();
            match self.import_prop(prop, &prop_skeleton, context) {
                Ok(()) => report.record(label, PartStatus::Imported),
                Err(e) => {
                    let message = error_chain(&e);
                    warn!("Failed to import prop {}: {}", label, message);
                    report.record(label, PartStatus::Failed(message));
                }
            }
        }

        Ok(())
    }

    fn import_prop(
        &mut self,
        prop: &PropData,
        prop_skeleton: &S::Object,
        context: &ItemContext<'_>,
    ) -> Result<()> {
        let path = context.paths.mesh(&prop.prop.mesh_path);
        let mesh = self
            .scene
            .import_mesh(&path, MeshOptions::default())
            .map_err(|e| Error::scene(format!("import {}", path.display()), e))?
            .ok_or_else(|| Error::MeshNotFound { path: path.clone() })?;

        if let Some(animation) = &prop.animation {
            self.animate(&mesh.object, &context.paths.animation(animation))?;
        }

        for material in &prop.prop.materials {
            self.apply_material(
                &mesh.object,
                &mesh.material_slots,
                material.slot_index,
                material,
                context.paths,
            )?;
        }

        if let Some(offset) = prop.location_offset {
            self.scene
                .translate(&mesh.object, offset.scaled(UNIT_SCALE))
                .map_err(|e| Error::scene("move prop", e))?;
        }
        if let Some(scale) = prop.scale {
            self.scene
                .set_scale(&mesh.object, scale)
                .map_err(|e| Error::scene("scale prop", e))?;
        }

        let rotation = prop
            .rotation_offset
            .map(Rotator::to_euler_radians)
            .unwrap_or([0.0; 3]);
        match prop.socket_name.as_deref() {
            Some(socket) => self
                .scene
                .attach(&mesh.object, prop_skeleton, remap_socket(socket), rotation)
                .map_err(|e| Error::scene("attach prop", e))?,
            None => debug!("Prop {} has no socket, leaving it unattached", prop.prop.mesh_path),
        }

        Ok(())
    }

    fn animate(&mut self, target: &S::Object, path: &Path) -> Result<()> {
        let imported = self
            .scene
            .import_animation(target, path)
            .map_err(|e| Error::scene(format!("import {}", path.display()), e))?;
        if imported {
            Ok(())
        } else {
            Err(Error::Animation {
                path: path.to_path_buf(),
            })
        }
    }

    /// Resolve `material` through the cache and put it into `slot`.
    fn apply_material(
        &mut self,
        object: &S::Object,
        slots: &[String],
        slot: usize,
        material: &MaterialRef,
        paths: &AssetPaths,
    ) -> Result<()> {
        if slot >= slots.len() {
            warn!(
                "Material {} targets slot {} but the mesh has {} slots",
                material.material_name,
                slot,
                slots.len()
            );
            return Ok(());
        }

        let scene = &mut self.scene;
        let handle = self
            .materials
            .resolve(material.hash, &material.material_name, |name| {
                let binding = MaterialBinding::from_material(material, paths);
                scene
                    .create_material(name, &binding)
                    .map_err(|e| Error::scene(format!("create material {}", name), e))
            })?;

        self.scene
            .assign_material(object, slot, &handle)
            .map_err(|e| Error::scene("assign material", e))
    }
}

impl<S: Scene> DocumentHandler for ImportSession<S> {
    type Report = ImportReport;
    type Error = Error;

    fn handle(&mut self, document: Document) -> Result<ImportReport> {
        let request = RequestDocument::from_value(document)?;
        Ok(self.import(&request))
    }
}
