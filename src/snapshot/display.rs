//! Display-model association for visible bodies
//!
//! A [`DisplayModelTable`] maps a body name (or `PLANET.<name>`) to one or more
//! meshes or textures that a renderer should use for it. Files are only
//! referenced here, never opened.
//!
//! ```json
//! {
//!     "MARS": {"type": "texture-body", "file": "mars.png"},
//!     "PLANET.SATURN": [
//!         {"type": "texture-body", "file": "saturn.png"},
//!         {"type": "texture-ring", "file": "saturn_ring.png"}
//!     ],
//!     "CASSINI": {"type": "model", "file": "cassini.obj", "scale": 0.001,
//!                 "color": [0.8, 0.8, 0.8], "format": "obj"}
//! }
//! ```

use crate::bodies::{BodyCategory, TargetObservation};
use crate::Result;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fs;
use std::path::Path;

/// Mesh or texture reference attached to a body
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum DisplayModel {
    /// 3D mesh drawn in place of the body
    #[serde(rename = "model")]
    Mesh {
        file: String,
        /// Scale from model units to kilometers
        scale: f64,
        color: Vec<f64>,
        /// Mesh file format, e.g. "obj"
        format: String,
    },
    /// Surface texture of the body ellipsoid
    #[serde(rename = "texture-body")]
    BodyTexture { file: String },
    /// Ring texture
    #[serde(rename = "texture-ring")]
    RingTexture { file: String },
}

impl DisplayModel {
    pub fn file(&self) -> &str {
        match self {
            DisplayModel::Mesh { file, .. }
            | DisplayModel::BodyTexture { file }
            | DisplayModel::RingTexture { file } => file,
        }
    }
}

/// A table value: one model or a list of them
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
enum ModelEntry {
    One(DisplayModel),
    Many(Vec<DisplayModel>),
}

impl ModelEntry {
    fn to_vec(&self) -> Vec<DisplayModel> {
        match self {
            ModelEntry::One(model) => vec![model.clone()],
            ModelEntry::Many(models) => models.clone(),
        }
    }
}

/// Body name to display model association
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DisplayModelTable {
    entries: HashMap<String, ModelEntry>,
}

impl DisplayModelTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Associate one model with a key
    pub fn insert(&mut self, key: &str, model: DisplayModel) {
        self.entries.insert(key.to_string(), ModelEntry::One(model));
    }

    /// Associate several models with a key
    pub fn insert_many(&mut self, key: &str, models: Vec<DisplayModel>) {
        self.entries.insert(key.to_string(), ModelEntry::Many(models));
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn from_json_str(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn from_json_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let contents = fs::read_to_string(path)?;
        Self::from_json_str(&contents)
    }

    /// Models for a body: exact name first, then `PLANET.<name>` for planets
    pub fn lookup(&self, target: &TargetObservation) -> Option<Vec<DisplayModel>> {
        self.entries
            .get(&target.name)
            .or_else(|| match target.category {
                BodyCategory::Planet => self.entries.get(&target.export_id()),
                _ => None,
            })
            .map(ModelEntry::to_vec)
    }
}
