//! CVar declarations loaded from RON files.
//!
//! A declaration file lists value-backed variables with their type and
//! default. It is applied once at startup through
//! [`CVarRegistry::register_declared`], so invalid entries are skipped and
//! reported rather than failing the whole file.
//!
//! ```ron
//! (
//!     cvars: [
//!         (name: "sv_maxplayers", ty: Integer, default: "16"),
//!         (name: "sv_hostname", ty: String, default: "My Server"),
//!     ],
//! )
//! ```

use std::fs;
use std::path::Path;

use bevy::prelude::*;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::core::{CVarDescriptor, CVarRegistry, CVarType, Console, DeclaredReport};

/// Default declaration file name.
pub const DEFAULT_DECLARATION_FILE: &str = "console_cvars.ron";

/// One declared variable.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DeclaredCVar {
    /// Unique CVar name.
    pub name: String,
    /// Declared type.
    pub ty: CVarType,
    /// Default value, validated against `ty`.
    #[serde(default)]
    pub default: String,
}

impl From<DeclaredCVar> for CVarDescriptor {
    fn from(cvar: DeclaredCVar) -> Self {
        CVarDescriptor::value(cvar.name, cvar.ty, cvar.default)
    }
}

/// Serializable list of declared variables.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DeclarationFile {
    /// Variables in registration order.
    #[serde(default)]
    pub cvars: Vec<DeclaredCVar>,
}

impl DeclarationFile {
    /// Load declarations from a RON file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, DeclarationError> {
        let path = path.as_ref();
        let contents = fs::read_to_string(path).map_err(|e| DeclarationError::Io {
            path: path.display().to_string(),
            message: e.to_string(),
        })?;

        ron::from_str(&contents).map_err(|e| DeclarationError::Parse {
            path: path.display().to_string(),
            message: e.to_string(),
        })
    }

    /// Register every declared variable.
    pub fn apply(self, registry: &mut CVarRegistry) -> DeclaredReport {
        registry.register_declared(self.cvars.into_iter().map(CVarDescriptor::from))
    }
}

/// Errors that can occur while reading a declaration file.
#[derive(Debug, Clone, Error)]
pub enum DeclarationError {
    /// The file could not be read.
    #[error("IO error for '{path}': {message}")]
    Io { path: String, message: String },
    /// The file is not a valid declaration list.
    #[error("Parse error for '{path}': {message}")]
    Parse { path: String, message: String },
}

/// Resource holding the declaration file path.
#[derive(Resource, Debug, Clone)]
pub struct DeclarationPath(pub String);

impl Default for DeclarationPath {
    fn default() -> Self {
        Self(DEFAULT_DECLARATION_FILE.to_string())
    }
}

/// System to register declared variables on startup.
pub fn load_declarations_on_startup(mut console: ResMut<Console>, path: Res<DeclarationPath>) {
    let path = &path.0;

    if !Path::new(path).exists() {
        info!("No declaration file found at '{}', skipping", path);
        return;
    }

    match DeclarationFile::load(path) {
        Ok(file) => {
            info!("Loading declarations from '{}'", path);
            file.apply(console.cvars_mut());
        }
        Err(e) => {
            error!("Failed to load declarations: {}", e);
        }
    }
}
