//! Module metadata loading from command-line sources.
//!
//! A source is `[file|]<path>` (JSON module metadata on disk) or
//! `nuget|<package>[|<version>]`, which is recognised but not supported.

use anyhow::Context;
use std::fs;
use std::path::Path;
use thiserror::Error;

use compat_core::types::ModuleDef;

#[derive(Error, Debug, PartialEq, Eq)]
pub enum LoadError {
    #[error("Fetching packages is not supported: '{0}'")]
    UnsupportedSource(String),

    #[error("Invalid source: '{0}' (expected \"[file|]<path>\" or \"nuget|<package>[|<version>]\")")]
    InvalidSource(String),
}

/// Where module metadata comes from.
#[derive(Debug, PartialEq, Eq)]
pub enum Source<'a> {
    File(&'a str),
    Package {
        name: &'a str,
        version: Option<&'a str>,
    },
}

impl<'a> Source<'a> {
    pub fn parse(arg: &'a str) -> Result<Self, LoadError> {
        let parts: Vec<&str> = arg.split('|').collect();
        match parts.as_slice() {
            [path] => Ok(Source::File(*path)),
            ["file", path] if !path.is_empty() => Ok(Source::File(*path)),
            ["nuget", name] if !name.is_empty() => Ok(Source::Package {
                name: *name,
                version: None,
            }),
            ["nuget", name, version] if !name.is_empty() => Ok(Source::Package {
                name: *name,
                version: Some(*version),
            }),
            _ => Err(LoadError::InvalidSource(arg.to_string())),
        }
    }
}

/// Load module metadata named by a command-line source.
pub fn load_module(arg: &str) -> anyhow::Result<ModuleDef> {
    match Source::parse(arg)? {
        Source::File(path) => load_file(Path::new(path)),
        Source::Package { .. } => Err(LoadError::UnsupportedSource(arg.to_string()).into()),
    }
}

fn load_file(path: &Path) -> anyhow::Result<ModuleDef> {
    let content = fs::read_to_string(path)
        .with_context(|| format!("Failed to read module metadata: {}", path.display()))?;
    let mut module: ModuleDef = serde_json::from_str(&content)
        .with_context(|| format!("Invalid module metadata: {}", path.display()))?;

    if module.name.is_empty() {
        module.name = path
            .file_stem()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_default();
    }

    tracing::debug!("Loaded {} top-level types from {}", module.types.len(), path.display());
    Ok(module)
}
