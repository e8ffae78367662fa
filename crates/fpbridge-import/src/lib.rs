//! Import pipeline for the asset-import bridge.
//!
//! [`ImportSession`] turns request documents into scene operations:
//!
//! - [`AssetPaths`] resolves exporter game paths to files under the assets root
//! - [`MaterialBinding`] maps material parameters onto shader slots
//! - [`ResourceCache`] creates each material once per content hash
//! - [`Scene`] is implemented by the host application
//!
//! Outfit skeletons are merged with [`fpbridge_rig::merge`] before the scene
//! builds the final rig.

mod cache;
mod error;
mod paths;
mod report;
mod scene;
mod session;
mod shading;

pub use cache::ResourceCache;
pub use error::{Error, Result};
pub use paths::{object_name, relative, AssetPaths};
pub use report::{ImportReport, ItemReport, PartReport, PartStatus};
pub use scene::{ImportedMesh, MeshOptions, Scene};
pub use session::{remap_socket, ImportSession, FACE_ROOT_BONE, PROP_SKELETON_NAME, UNIT_SCALE};
pub use shading::{
    scalar_slot, texture_mapping, vector_mapping, MaterialBinding, ScalarInput, TextureInput,
    TextureMapping, VectorInput, VectorMapping, CROPPED_EMISSIVE_VECTORS, EMISSIVE_SLOT,
    SCALAR_MAPPINGS, TEXTURE_MAPPINGS, VECTOR_MAPPINGS,
};
