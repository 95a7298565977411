// Copyright © 2025 Lukas Bower
// SPDX-License-Identifier: Apache-2.0
// Purpose: Define and validate the HTTP document manifest IR.
// Author: Lukas Bower

use anyhow::{bail, Context, Result};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fs;
use std::path::Path;

const TEXT_CONTENT_PREFIX: &str = "text/";

/// Ordered list of documents embedded into the serving component, plus the
/// shape of the generated declaration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Manifest {
    #[serde(default)]
    pub output: OutputConfig,
    pub documents: Vec<DocumentEntry>,
}

/// Include header and array declaration the generated source is built
/// around. Defaults match the consuming NetServer component.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct OutputConfig {
    #[serde(default = "default_include")]
    pub include: String,
    #[serde(default = "default_declaration")]
    pub declaration: String,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            include: default_include(),
            declaration: default_declaration(),
        }
    }
}

fn default_include() -> String {
    "netserver.h".to_owned()
}

fn default_declaration() -> String {
    "NetServer::HTTPDocument NetServer::httpDocumentList[]".to_owned()
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct DocumentEntry {
    /// Request path matched by the server; `None` marks the fallback
    /// (not-found) document, which must be the last entry.
    #[serde(default)]
    pub path: Option<String>,
    /// Source file relative to the manifest; derived from the path when
    /// absent.
    #[serde(default)]
    pub file: Option<String>,
    pub content_type: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReadMode {
    Text,
    Binary,
}

impl DocumentEntry {
    pub fn is_fallback(&self) -> bool {
        self.path.is_none()
    }

    /// Relative source filename for this entry: the explicit `file`, or the
    /// current-directory form of its path (`.` + path).
    pub fn resolve_file(&self) -> Result<String> {
        if let Some(file) = &self.file {
            return Ok(file.clone());
        }
        match &self.path {
            Some(path) => Ok(format!(".{}", path)),
            None => bail!("fallback document must name an explicit file"),
        }
    }

    /// Documents with a `text/` content type are decoded as UTF-8;
    /// everything else is read raw.
    pub fn read_mode(&self) -> ReadMode {
        if self.content_type.starts_with(TEXT_CONTENT_PREFIX) {
            ReadMode::Text
        } else {
            ReadMode::Binary
        }
    }

    /// Read this entry's content bytes from `base_dir`. Any read failure
    /// is fatal to the whole compile.
    pub fn read_content(&self, base_dir: &Path) -> Result<Vec<u8>> {
        let file = self.resolve_file()?;
        let resolved = base_dir.join(&file);
        match self.read_mode() {
            ReadMode::Text => {
                let text = fs::read_to_string(&resolved).with_context(|| {
                    format!("failed to read text document {}", resolved.display())
                })?;
                Ok(text.into_bytes())
            }
            ReadMode::Binary => fs::read(&resolved).with_context(|| {
                format!("failed to read binary document {}", resolved.display())
            }),
        }
    }
}

impl Manifest {
    pub fn validate(&self) -> Result<()> {
        if self.documents.is_empty() {
            bail!("manifest lists no documents");
        }
        let last = self.documents.len() - 1;
        let mut seen = BTreeSet::new();
        for (index, entry) in self.documents.iter().enumerate() {
            match &entry.path {
                None => {
                    if index != last {
                        bail!(
                            "fallback document (no path) must be the last entry, found at index {}",
                            index
                        );
                    }
                    if entry.file.is_none() {
                        bail!("fallback document must name an explicit file");
                    }
                }
                Some(path) => {
                    if !path.starts_with('/') {
                        bail!("document path {} must be absolute", path);
                    }
                    if !seen.insert(path.as_str()) {
                        bail!("duplicate document path {}", path);
                    }
                }
            }
        }
        if self.documents[last].path.is_some() {
            bail!("manifest must end with a fallback document (no path)");
        }
        Ok(())
    }
}

pub fn load_manifest(path: &Path) -> Result<Manifest> {
    let contents = fs::read_to_string(path)
        .with_context(|| format!("failed to read manifest {}", path.display()))?;
    let manifest: Manifest = toml::from_str(&contents)
        .with_context(|| format!("invalid manifest TOML in {}", path.display()))?;
    Ok(manifest)
}

pub fn serialize_manifest(manifest: &Manifest) -> Result<Vec<u8>> {
    let json = serde_json::to_vec_pretty(manifest)?;
    Ok(json)
}
