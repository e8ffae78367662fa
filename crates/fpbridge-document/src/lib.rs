//! Request document schema for the asset-import bridge.
//!
//! The exporter sends one JSON document per import request. This crate maps
//! that document onto typed structures:
//!
//! - [`RequestDocument`] - the reassembled request (`AssetsRoot`, `Settings`, `Data`)
//! - [`ImportSettings`] / [`RigType`] - named options applied to every item
//! - [`ImportItem`] - one import unit, viewed per kind through [`ItemPayload`]
//! - [`Part`] / [`PartSlot`] - mesh/armature fragments of a composite item
//! - [`MaterialRef`] / [`ContentHash`] - material descriptions keyed by content identity
//!
//! # Example
//!
//! ```
//! use fpbridge_document::{ItemKind, RequestDocument};
//!
//! let json = br#"{
//!     "AssetsRoot": "C:/Exports",
//!     "Settings": { "MergeSkeletons": true, "RigType": 0 },
//!     "Data": [{ "Name": "Renegade", "Type": "Outfit", "Parts": [] }]
//! }"#;
//!
//! let document = RequestDocument::from_slice(json)?;
//! assert!(document.settings.merge_skeletons);
//! assert_eq!(document.items[0].kind, ItemKind::Outfit);
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

mod document;
mod error;
mod item;
mod material;
mod math;

pub use document::{ImportSettings, RequestDocument, RigType};
pub use error::{Error, Result};
pub use item::{ImportItem, ItemKind, ItemPayload, MeshRef, Part, PartSlot, PropData, StyleMesh};
pub use material::{ContentHash, LinearColor, MaterialRef, ScalarParam, TextureParam, VectorParam};
pub use math::{Rotator, Vector3};
