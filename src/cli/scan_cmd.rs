//! `prospector scan <url>` — audit a site and grade the lead.

use crate::cli::output::Styled;
use crate::report::journal::{RunJournal, RunRecord};
use crate::report::{csv, json, text};
use crate::{audit_site_with_progress, LeadGrade, Provenance, ScanConfig, ScanEvent};
use anyhow::{Context, Result};
use clap::ValueEnum;
use indicatif::{ProgressBar, ProgressStyle};
use std::cell::RefCell;
use std::path::PathBuf;
use tracing::warn;

/// Output format for the rendered report.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    Text,
    Csv,
    Json,
}

/// Run the scan command.
pub async fn run(
    url: &str,
    max_pages: usize,
    format: OutputFormat,
    output: Option<PathBuf>,
    no_journal: bool,
) -> Result<()> {
    let s = Styled::new();
    let config = ScanConfig::with_max_pages(max_pages);

    let bar: RefCell<Option<ProgressBar>> = RefCell::new(None);
    let report = audit_site_with_progress(url, &config, |event| match event {
        ScanEvent::Discovered {
            discovered,
            scanning,
            provenance,
            ..
        } => {
            let source = match provenance {
                Provenance::Sitemap => "sitemap",
                Provenance::Fallback => "no sitemap, root page only",
            };
            eprintln!("  Discovered {discovered} URLs ({source}), scanning {scanning}");
            let pb = ProgressBar::new(scanning as u64);
            pb.set_style(
                ProgressStyle::with_template("  {bar:30} {pos}/{len} {msg}")
                    .unwrap_or_else(|_| ProgressStyle::default_bar()),
            );
            *bar.borrow_mut() = Some(pb);
        }
        ScanEvent::PageDone { outcome, .. } => {
            if let Some(pb) = bar.borrow().as_ref() {
                pb.set_message(outcome.url.clone());
                pb.inc(1);
            }
        }
    })
    .await?;
    if let Some(pb) = bar.into_inner() {
        pb.finish_and_clear();
    }

    let rendered = match format {
        OutputFormat::Text => text::render(&report.profile, report.grade),
        OutputFormat::Csv => csv::render(&report.profile),
        OutputFormat::Json => json::render(&report.profile, report.grade)?,
    };

    match &output {
        Some(path) => {
            std::fs::write(path, &rendered)
                .with_context(|| format!("writing report to {}", path.display()))?;
            eprintln!("  Report written to {}", path.display());
        }
        None => print!("{rendered}"),
    }

    if matches!(format, OutputFormat::Text) && output.is_none() {
        eprintln!();
        eprintln!("  {} {}", s.bold("Lead grade:"), styled_grade(&s, report.grade));
    }

    if !no_journal {
        match RunJournal::default_journal() {
            Ok(mut journal) => {
                let record = RunRecord::new(&report.profile, report.grade);
                if let Err(e) = journal.append(&record) {
                    warn!("could not write run journal: {e:#}");
                }
            }
            Err(e) => warn!("could not open run journal: {e:#}"),
        }
    }

    Ok(())
}

fn styled_grade(s: &Styled, grade: LeadGrade) -> String {
    match grade {
        LeadGrade::A => s.red(&grade.to_string()),
        LeadGrade::B => s.yellow(&grade.to_string()),
        LeadGrade::C => s.green(&grade.to_string()),
        LeadGrade::Skip => s.dim(&grade.to_string()),
    }
}
