use std::fmt;

use thiserror::Error;

/// Resource kinds handled by the managers. Used to label errors and logs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ResourceKind {
    Mesh,
    Texture,
    Shader,
}

impl fmt::Display for ResourceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ResourceKind::Mesh => "mesh",
            ResourceKind::Texture => "texture",
            ResourceKind::Shader => "shader",
        };
        f.write_str(name)
    }
}

/// Message reported by a device backend (compile/link log, allocation failure, error code).
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{0}")]
pub struct DeviceError(pub String);

impl DeviceError {
    pub fn new(message: impl Into<String>) -> Self {
        Self(message.into())
    }
}

#[derive(Debug, Error)]
pub enum GraphicsError {
    #[error("failed to decode {path}: {reason}")]
    Decode { path: String, reason: String },

    #[error("{kind} '{name}' has no content")]
    EmptyResource { kind: ResourceKind, name: String },

    #[error("failed to upload {kind} '{name}': {source}")]
    Upload {
        kind: ResourceKind,
        name: String,
        #[source]
        source: DeviceError,
    },

    #[error("cube texture '{name}' has inconsistent faces")]
    InconsistentCubeFaces { name: String },

    #[error("{kind} handle {id} does not resolve to a resource")]
    UnresolvedHandle { kind: ResourceKind, id: u32 },

    #[error("texture '{name}' has no device id")]
    MissingTexture { name: String },

    #[error("shader '{name}' is unknown or not linked")]
    UnknownShader { name: String },

    #[error("program id 0 is not a valid program")]
    InvalidProgram,

    #[error("entity {entity} has no {component} component")]
    MissingComponent {
        entity: String,
        component: &'static str,
    },

    #[error("unsupported pixel format with {channels} channels")]
    UnsupportedFormat { channels: u8 },
}

pub type Result<T, E = GraphicsError> = std::result::Result<T, E>;

impl GraphicsError {
    pub(crate) fn upload(kind: ResourceKind, name: &str, source: DeviceError) -> Self {
        GraphicsError::Upload {
            kind,
            name: name.to_string(),
            source,
        }
    }

    pub(crate) fn empty(kind: ResourceKind, name: &str) -> Self {
        GraphicsError::EmptyResource {
            kind,
            name: name.to_string(),
        }
    }
}
