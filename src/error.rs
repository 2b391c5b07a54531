// src/error.rs
//! Error handling for the entire crate.
//!
//! A misconfigured object never brings down the world build: configuration
//! and backend errors are recorded per object and the object degrades to a
//! render-only element. See `builder::Simulation::failures`.

use thiserror::Error;

/// Main error type — Send + Sync + 'static, works with `?` everywhere.
#[derive(Error, Debug)]
#[non_exhaustive]
pub enum Error {
    /// Authored object configuration rejected at build time, before any
    /// shape or body is constructed (missing custom-geometry generators,
    /// bad shape-param arity, malformed geometry descriptors).
    #[error("configuration error: {0}")]
    Config(String),

    /// The physics backend rejected a shape or body (e.g. a degenerate
    /// point cloud with no computable hull). The object stays tracked for
    /// rendering but gets no physics body.
    #[error("physics backend error: {0}")]
    Backend(String),

    /// I/O errors from the asset-loading phase.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// glTF import failures from the asset-loading phase.
    #[error("glTF import error: {0}")]
    Gltf(#[from] gltf::Error),
}

impl Error {
    /// Create a configuration error.
    #[inline]
    pub fn config<S: Into<String>>(msg: S) -> Self {
        Self::Config(msg.into())
    }

    /// Create a backend error.
    #[inline]
    pub fn backend<S: Into<String>>(msg: S) -> Self {
        Self::Backend(msg.into())
    }

    #[inline]
    pub fn is_config(&self) -> bool {
        matches!(self, Error::Config(_))
    }

    #[inline]
    pub fn is_backend(&self) -> bool {
        matches!(self, Error::Backend(_))
    }
}

/// Convenient `Result` alias — use `crate::Result<T>` everywhere.
pub type Result<T> = std::result::Result<T, Error>;
