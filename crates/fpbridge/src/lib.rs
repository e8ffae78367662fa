//! fpbridge - loopback import bridge for exported game assets.
//!
//! This crate provides a unified interface to the fpbridge crates.
//!
//! # Crates
//!
//! - [`fpbridge_document`] - Request document schema
//! - [`fpbridge_net`] - Datagram transport, reassembly and single-flight dispatch
//! - [`fpbridge_rig`] - Bone hierarchies and skeleton merging
//! - [`fpbridge_import`] - Import pipeline, material cache and the `Scene` trait
//!
//! # Example
//!
//! ```no_run
//! use fpbridge::prelude::*;
//! # fn run<S: Scene>(scene: S) -> Result<(), Box<dyn std::error::Error>> {
//!
//! let mut server = Server::start(&ListenerConfig::default(), ImportSession::new(scene))?;
//! loop {
//!     server.poll();
//!     std::thread::sleep(std::time::Duration::from_millis(10));
//! }
//! # }
//! ```

pub use fpbridge_document as document;
pub use fpbridge_import as import;
pub use fpbridge_net as net;
pub use fpbridge_rig as rig;

/// Prelude module for convenient imports.
pub mod prelude {
    pub use fpbridge_document::{ImportItem, ItemKind, PartSlot, RequestDocument, RigType};
    pub use fpbridge_import::{ImportReport, ImportSession, MaterialBinding, ResourceCache, Scene};
    pub use fpbridge_net::{
        Client, ClientConfig, DocumentHandler, ListenerConfig, Notice, PollOutcome, Server,
    };
    pub use fpbridge_rig::{canonical_name, merge, BoneNode, HierarchyTree, MergeOptions, RigPart};
}

/// Version information.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
