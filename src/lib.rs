// Copyright © 2025 Lukas Bower
// SPDX-License-Identifier: Apache-2.0
// Purpose: Expose httpdocc manifest compilation helpers for tests and the CLI.
// Author: Lukas Bower

pub mod codegen;
pub mod ir;

use anyhow::{bail, Result};
use log::debug;
use std::path::{Path, PathBuf};

#[derive(Debug, Clone)]
pub struct CompileOptions {
    pub manifest_path: PathBuf,
    /// Generated source destination; stdout when absent.
    pub out: Option<PathBuf>,
    /// Optional resolved manifest JSON destination.
    pub manifest_out: Option<PathBuf>,
}

#[derive(Debug)]
pub struct GeneratedArtifacts {
    pub source: Option<PathBuf>,
    pub source_hash: Option<PathBuf>,
    pub manifest_json: Option<PathBuf>,
    pub manifest_hash: Option<PathBuf>,
    pub documents: usize,
}

impl GeneratedArtifacts {
    pub fn summary(&self) -> String {
        let source = self
            .source
            .as_ref()
            .map(|path| path.display().to_string())
            .unwrap_or_else(|| "<stdout>".to_owned());
        match &self.manifest_json {
            Some(manifest) => format!(
                "source={} ({} documents), manifest={}",
                source,
                self.documents,
                manifest.display()
            ),
            None => format!("source={} ({} documents)", source, self.documents),
        }
    }
}

pub fn compile(options: &CompileOptions) -> Result<GeneratedArtifacts> {
    if !options.manifest_path.is_file() {
        bail!(
            "manifest path does not exist or is not a file: {}",
            options.manifest_path.display()
        );
    }

    let manifest = ir::load_manifest(&options.manifest_path)?;
    manifest.validate()?;

    // Document files resolve against the manifest's directory, so the
    // compiler can be invoked from anywhere in the tree.
    let base_dir = options
        .manifest_path
        .parent()
        .filter(|parent| !parent.as_os_str().is_empty())
        .map(Path::to_path_buf)
        .unwrap_or_else(|| PathBuf::from("."));

    let source = compile_manifest(&manifest, &base_dir)?;
    let emitted = codegen::emit_source(&source, options.out.as_deref())?;

    let mut artifacts = GeneratedArtifacts {
        source: emitted.as_ref().map(|emitted| emitted.source.clone()),
        source_hash: emitted.as_ref().map(|emitted| emitted.hash.clone()),
        manifest_json: None,
        manifest_hash: None,
        documents: manifest.documents.len(),
    };

    if let Some(manifest_out) = &options.manifest_out {
        let resolved_json = ir::serialize_manifest(&manifest)?;
        let (json_path, hash_path) =
            codegen::emit_resolved_manifest(&resolved_json, manifest_out)?;
        artifacts.manifest_json = Some(json_path);
        artifacts.manifest_hash = Some(hash_path);
    }

    Ok(artifacts)
}

/// Compile an already-loaded manifest into the generated source block.
/// Every document is read before rendering returns, so a failed read
/// produces no output at all.
pub fn compile_manifest(manifest: &ir::Manifest, base_dir: &Path) -> Result<String> {
    let mut contents = Vec::with_capacity(manifest.documents.len());
    for entry in &manifest.documents {
        let content = entry.read_content(base_dir)?;
        debug!(
            "read {} ({} bytes) for {}",
            entry.resolve_file()?,
            content.len(),
            entry.path.as_deref().unwrap_or("<fallback>")
        );
        contents.push(content);
    }
    let records: Vec<codegen::cpp::DocumentRecord<'_>> = manifest
        .documents
        .iter()
        .zip(&contents)
        .map(|(entry, content)| codegen::cpp::DocumentRecord {
            path: entry.path.as_deref(),
            content,
            content_type: &entry.content_type,
        })
        .collect();
    Ok(codegen::cpp::render_source(&manifest.output, &records))
}
