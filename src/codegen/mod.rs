// Copyright © 2025 Lukas Bower
// SPDX-License-Identifier: Apache-2.0
// Purpose: Emit deterministic artefacts from the HTTP document manifest.
// Author: Lukas Bower

pub mod cpp;

use anyhow::{Context, Result};
use sha2::{Digest, Sha256};
use std::ffi::OsString;
use std::fs;
use std::io::Write as _;
use std::path::{Path, PathBuf};

#[derive(Debug)]
pub struct EmittedSource {
    pub source: PathBuf,
    pub hash: PathBuf,
}

/// Write the rendered document source to `out`, or to stdout when no path
/// is given. File output gets a `.sha256` fingerprint sidecar alongside it.
pub fn emit_source(source: &str, out: Option<&Path>) -> Result<Option<EmittedSource>> {
    let Some(path) = out else {
        let mut stdout = std::io::stdout().lock();
        stdout
            .write_all(source.as_bytes())
            .context("failed to write generated source to stdout")?;
        return Ok(None);
    };

    create_parent(path)?;
    fs::write(path, source.as_bytes())
        .with_context(|| format!("failed to write generated source {}", path.display()))?;

    let hash_path = write_fingerprint(path, source.as_bytes(), "httpdocs.cpp")?;
    Ok(Some(EmittedSource {
        source: path.to_path_buf(),
        hash: hash_path,
    }))
}

/// Write the resolved manifest JSON plus its fingerprint sidecar.
pub fn emit_resolved_manifest(resolved_json: &[u8], path: &Path) -> Result<(PathBuf, PathBuf)> {
    create_parent(path)?;
    fs::write(path, resolved_json)
        .with_context(|| format!("failed to write resolved manifest {}", path.display()))?;
    let hash_path = write_fingerprint(path, resolved_json, "httpdocs_resolved.json")?;
    Ok((path.to_path_buf(), hash_path))
}

pub fn hash_bytes(bytes: &[u8]) -> String {
    let mut hasher = Sha256::new();
    hasher.update(bytes);
    let digest = hasher.finalize();
    hex::encode(digest)
}

fn create_parent(path: &Path) -> Result<()> {
    if let Some(parent) = path
        .parent()
        .filter(|parent| !parent.as_os_str().is_empty())
    {
        fs::create_dir_all(parent)
            .with_context(|| format!("failed to create {}", parent.display()))?;
    }
    Ok(())
}

fn write_fingerprint(path: &Path, bytes: &[u8], fallback_name: &str) -> Result<PathBuf> {
    let name = path
        .file_name()
        .and_then(|name| name.to_str())
        .unwrap_or(fallback_name);
    let hash_contents = format!(
        "# Author: Lukas Bower\n# Purpose: SHA-256 fingerprint for {}.\n{}  {}\n",
        name,
        hash_bytes(bytes),
        name
    );
    let hash_path = sidecar_path(path, fallback_name);
    fs::write(&hash_path, hash_contents)
        .with_context(|| format!("failed to write fingerprint {}", hash_path.display()))?;
    Ok(hash_path)
}

fn sidecar_path(path: &Path, fallback_name: &str) -> PathBuf {
    let mut name = path
        .file_name()
        .map(OsString::from)
        .unwrap_or_else(|| OsString::from(fallback_name));
    name.push(".sha256");
    path.with_file_name(name)
}
