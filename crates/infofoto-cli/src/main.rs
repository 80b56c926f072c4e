// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Infofoto — command-line entry point.
//
// Reads a manifest (metadata plus ordered photo paths), runs the report
// engine and writes the DOCX into the output directory. Logs go to stderr so
// `--json` output on stdout stays machine-readable.

mod cli;
mod manifest;

use std::path::{Path, PathBuf};
use std::process::ExitCode;

use chrono::Local;
use clap::Parser;
use infofoto_core::error::Result;
use infofoto_core::human_errors::{humanize_error, skipped_photos_note};
use infofoto_core::types::{QualityProfile, SkippedPhoto};
use infofoto_core::EngineConfig;
use infofoto_document::{
    CancellationFlag, DirectorySink, DocumentPlan, PagePlanEntry, ReportGenerator, ReportRequest,
    ReportSummary, prepare_all,
};
use serde::Serialize;
use serde_json::json;

use cli::{Cli, Commands};
use manifest::Manifest;

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let cli = Cli::parse();
    let json = cli.json;
    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            tracing::error!(error = %err, "Report failed");
            let human = humanize_error(&err);
            if json {
                println!(
                    "{}",
                    json!({
                        "error": human.message,
                        "suggestion": human.suggestion,
                        "retriable": human.retriable,
                    })
                );
            } else {
                eprintln!("{}\n{}", human.message, human.suggestion);
            }
            ExitCode::FAILURE
        }
    }
}

fn run(cli: Cli) -> Result<()> {
    let config = match &cli.config {
        Some(path) => EngineConfig::load(path)?,
        None => EngineConfig::default(),
    };
    let profile = cli.profile.as_deref().map(QualityProfile::from_wire_name);
    match cli.command {
        Commands::Generate {
            manifest,
            out,
            logo,
        } => generate(config, load_request(&manifest, profile)?, out, logo, cli.json),
        Commands::Plan { manifest } => plan(&config, load_request(&manifest, profile)?, cli.json),
    }
}

fn load_request(manifest_path: &Path, profile: Option<QualityProfile>) -> Result<ReportRequest> {
    let base_dir = manifest_path
        .parent()
        .map(Path::to_path_buf)
        .unwrap_or_else(|| PathBuf::from("."));
    let mut request = Manifest::load(manifest_path)?.into_request(&base_dir)?;
    if let Some(profile) = profile {
        request.metadata.quality_profile = profile;
    }
    Ok(request)
}

#[derive(Serialize)]
struct GenerateOutput {
    #[serde(flatten)]
    summary: ReportSummary,
    path: PathBuf,
}

fn generate(
    mut config: EngineConfig,
    request: ReportRequest,
    out: PathBuf,
    logo: Option<PathBuf>,
    json: bool,
) -> Result<()> {
    if logo.is_some() {
        config.logo_path = logo;
    }
    let generator = ReportGenerator::new(config)?;
    let mut sink = DirectorySink::new(out);
    let summary = generator.generate_into(request, &mut sink, &CancellationFlag::new())?;
    let path = sink.dir().join(&summary.filename);

    if json {
        let output = GenerateOutput { summary, path };
        println!("{}", serde_json::to_string_pretty(&output)?);
    } else {
        println!(
            "{} ({} photos, {} pages)",
            path.display(),
            summary.photo_count,
            summary.total_pages
        );
        if let Some(note) = skipped_photos_note(summary.skipped.len()) {
            println!("{note}");
        }
    }
    Ok(())
}

#[derive(Serialize)]
struct PlannedPage {
    page: usize,
    layout: &'static str,
    photos: Vec<u32>,
}

#[derive(Serialize)]
struct PlanOutput {
    pages: Vec<PlannedPage>,
    closing_page: bool,
    total_pages: usize,
    skipped: Vec<SkippedPhoto>,
}

fn plan(config: &EngineConfig, request: ReportRequest, json: bool) -> Result<()> {
    config.validate()?;
    let (prepared, skipped) = prepare_all(
        &request.photos,
        &request.metadata.quality_profile.settings(),
        &CancellationFlag::new(),
    )?;

    let plan = DocumentPlan::build(
        &prepared,
        &request.metadata,
        config,
        Local::now().fixed_offset(),
    )?;
    // Page 1 is the cover.
    let pages = plan
        .entries
        .iter()
        .enumerate()
        .map(|(i, entry)| PlannedPage {
            page: i + 2,
            layout: match entry {
                PagePlanEntry::Single(_) => "single",
                PagePlanEntry::Pair(..) => "pair",
            },
            photos: entry.slots().iter().map(|s| s.display_index).collect(),
        })
        .collect();
    let output = PlanOutput {
        pages,
        closing_page: plan.closing_required,
        total_pages: plan.total_page_count,
        skipped,
    };

    if json {
        println!("{}", serde_json::to_string_pretty(&output)?);
    } else {
        for page in &output.pages {
            let numbers: Vec<String> = page.photos.iter().map(u32::to_string).collect();
            println!("page {:>3}  {:<6}  {}", page.page, page.layout, numbers.join(", "));
        }
        if output.closing_page {
            println!("page {:>3}  closing", output.total_pages);
        }
        println!("{} pages in total", output.total_pages);
        if let Some(note) = skipped_photos_note(output.skipped.len()) {
            println!("{note}");
        }
    }
    Ok(())
}
