use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};

use super::error::SourceError;

/// Pipeline point a shader source is compiled for.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub enum ShaderStage {
    Vertex,
    Fragment,
}

impl ShaderStage {
    /// Tag used in diagnostics (`VERTEX`, `FRAGMENT`).
    pub fn tag(self) -> &'static str {
        match self {
            ShaderStage::Vertex => "VERTEX",
            ShaderStage::Fragment => "FRAGMENT",
        }
    }
}

impl fmt::Display for ShaderStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.tag())
    }
}

/// Source text for one stage, plus where it came from.
#[derive(Debug, Clone)]
pub struct ShaderSource {
    pub stage: ShaderStage,
    pub text: String,
    /// `None` for sources built in memory.
    pub path: Option<PathBuf>,
}

impl ShaderSource {
    /// Reads the whole file at `path`.
    pub fn load(stage: ShaderStage, path: impl AsRef<Path>) -> Result<Self, SourceError> {
        let path = path.as_ref();
        let text = fs::read_to_string(path).map_err(|source| SourceError::Read {
            stage,
            path: path.to_path_buf(),
            source,
        })?;

        log::debug!("loaded {stage} shader from {} ({} bytes)", path.display(), text.len());

        Ok(Self {
            stage,
            text,
            path: Some(path.to_path_buf()),
        })
    }

    pub fn from_text(stage: ShaderStage, text: impl Into<String>) -> Self {
        Self {
            stage,
            text: text.into(),
            path: None,
        }
    }
}

/// The vertex and fragment sources of one program.
#[derive(Debug, Clone)]
pub struct ShaderPair {
    pub vertex: ShaderSource,
    pub fragment: ShaderSource,
}

impl ShaderPair {
    /// Loads both stages, vertex first. The first unreadable file is returned as the error.
    pub fn load(
        vertex_path: impl AsRef<Path>,
        fragment_path: impl AsRef<Path>,
    ) -> Result<Self, SourceError> {
        Ok(Self {
            vertex: ShaderSource::load(ShaderStage::Vertex, vertex_path)?,
            fragment: ShaderSource::load(ShaderStage::Fragment, fragment_path)?,
        })
    }

    pub fn from_text(vertex: impl Into<String>, fragment: impl Into<String>) -> Self {
        Self {
            vertex: ShaderSource::from_text(ShaderStage::Vertex, vertex),
            fragment: ShaderSource::from_text(ShaderStage::Fragment, fragment),
        }
    }
}
