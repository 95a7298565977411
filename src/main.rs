// Copyright © 2025 Lukas Bower
// SPDX-License-Identifier: Apache-2.0
// Purpose: CLI entry point for the HTTP document manifest compiler.
// Author: Lukas Bower

use anyhow::Result;
use clap::Parser;
use httpdocc::{compile, CompileOptions};
use std::path::PathBuf;

#[derive(Debug, Parser)]
#[command(author, version, about)]
struct Args {
    /// Path to the HTTP document manifest TOML file.
    manifest: PathBuf,
    /// Output path for the generated document source (stdout when omitted).
    #[arg(long)]
    out: Option<PathBuf>,
    /// Output path for the resolved manifest JSON.
    #[arg(long = "manifest", alias = "manifest-out")]
    manifest_out: Option<PathBuf>,
}

fn main() -> Result<()> {
    env_logger::init();
    let args = Args::parse();
    let options = CompileOptions {
        manifest_path: args.manifest,
        out: args.out,
        manifest_out: args.manifest_out,
    };
    let output = compile(&options)?;
    // Keep stdout byte-exact when it carries the generated source.
    if options.out.is_some() {
        println!("httpdocc: wrote {}", output.summary());
    } else {
        eprintln!("httpdocc: wrote {}", output.summary());
    }
    Ok(())
}
