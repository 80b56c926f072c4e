// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>

use std::path::PathBuf;

use clap::{Parser, Subcommand};

#[derive(Parser, Debug)]
#[command(name = "infofoto", version, about = "Numbered photographic reports as DOCX")]
pub struct Cli {
    #[arg(long, global = true, help = "Output machine-readable JSON")]
    pub json: bool,

    #[arg(long, global = true, help = "Engine configuration file (JSON)")]
    pub config: Option<PathBuf>,

    #[arg(
        long,
        global = true,
        help = "Quality profile (atenea or vector), overriding the manifest"
    )]
    pub profile: Option<String>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Build the report described by a manifest and write it to a directory
    Generate {
        /// Manifest JSON: metadata, ordered photos and optional captions
        manifest: PathBuf,
        #[arg(long, default_value = ".")]
        out: PathBuf,
        /// Logo image; overrides the one named in the config
        #[arg(long)]
        logo: Option<PathBuf>,
    },
    /// Show how the photos would be paginated without composing anything
    Plan {
        manifest: PathBuf,
    },
}
