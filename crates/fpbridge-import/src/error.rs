//! Error types for the import pipeline.

use std::path::PathBuf;

use thiserror::Error;

/// Errors raised while applying a request document to the scene.
#[derive(Debug, Error)]
pub enum Error {
    /// The document does not match the request schema.
    #[error("invalid request document: {0}")]
    Schema(#[from] fpbridge_document::Error),

    /// The scene rejected an operation.
    #[error("scene failed to {action}")]
    Scene {
        action: String,
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    /// No mesh could be imported from the resolved path.
    #[error("no mesh imported from {}", path.display())]
    MeshNotFound { path: PathBuf },

    /// An emote needs an armature selected in the scene.
    #[error("an armature must be selected for the emote to import onto")]
    MissingArmature,

    /// An emote with props does not name the prop skeleton.
    #[error("emote has props but no skeleton")]
    MissingSkeleton,

    /// The animation importer declined the file.
    #[error("failed to import animation {}", path.display())]
    Animation { path: PathBuf },

    /// The imported skeleton is not a valid hierarchy.
    #[error("invalid skeleton: {0}")]
    Rig(#[from] fpbridge_rig::Error),
}

impl Error {
    /// Wrap a scene error, naming what was attempted.
    pub fn scene<E>(action: impl Into<String>, source: E) -> Self
    where
        E: std::error::Error + Send + Sync + 'static,
    {
        Error::Scene {
            action: action.into(),
            source: Box::new(source),
        }
    }
}

/// Result type for import operations.
pub type Result<T> = std::result::Result<T, Error>;
