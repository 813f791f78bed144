use anyhow::{Context, Result};
use clap::Parser;
use conll_marks::{
    convert_document, entity_report, Conll2012Writer, DocumentAnnotations, PipelineOutcome,
    TracingSink,
};
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use tracing::info;

#[derive(Parser, Debug)]
#[command(name = "conll-marks")]
#[command(about = "Aligns a tokenization with raw text and writes entity mention spans as CoNLL-2012")]
#[command(version)]
struct Args {
    /// JSON annotations file: document text, mentions, entities
    annotations: PathBuf,

    /// Tokenization file: one token per line, blank line = sentence break
    tokens: PathBuf,

    /// CoNLL-2012 output file
    output: PathBuf,

    /// Entity report output file
    entities_output: PathBuf,

    /// Suppress annotation warnings, report only errors
    #[arg(long)]
    quiet: bool,
}

enum RunOutcome {
    Converted,
    AlignmentFailed,
}

#[tokio::main]
async fn main() -> ExitCode {
    let args = Args::parse();

    let level = if args.quiet {
        tracing::Level::ERROR
    } else {
        tracing::Level::INFO
    };
    tracing_subscriber::fmt()
        .with_target(false)
        .with_max_level(level)
        .init();

    // three-tier exit status: converted / alignment failure / other failure
    match run(&args).await {
        Ok(RunOutcome::Converted) => ExitCode::SUCCESS,
        Ok(RunOutcome::AlignmentFailed) => ExitCode::from(2),
        Err(error) => {
            eprintln!("error: {error:#}");
            ExitCode::from(3)
        }
    }
}

async fn run(args: &Args) -> Result<RunOutcome> {
    for input in [&args.annotations, &args.tokens] {
        if !input.is_file() {
            anyhow::bail!("input file does not exist: {}", input.display());
        }
    }

    let raw_annotations = tokio::fs::read_to_string(&args.annotations)
        .await
        .with_context(|| format!("failed to read {}", args.annotations.display()))?;
    let annotations = DocumentAnnotations::from_json(&raw_annotations)?;
    let tokens = tokio::fs::read_to_string(&args.tokens)
        .await
        .with_context(|| format!("failed to read {}", args.tokens.display()))?;

    let document_name = document_name(&args.output);
    info!(
        "converting document {document_name}: {} codepoints, {} mentions, {} entities",
        annotations.text.chars().count(),
        annotations.mentions.len(),
        annotations.entities.len()
    );

    let mut conll = String::new();
    let mut writer = Conll2012Writer::new(&mut conll, document_name);
    let mut sink = TracingSink::new(&annotations.text);
    let outcome = convert_document(
        &annotations.text,
        annotations.mentions.clone(),
        tokens.lines(),
        &mut writer,
        &mut sink,
    )?;

    match outcome {
        PipelineOutcome::Converted => {
            tokio::fs::write(&args.output, conll)
                .await
                .with_context(|| format!("failed to write {}", args.output.display()))?;
            let report =
                entity_report(&annotations.entities, &annotations.mentions, &annotations.text)?;
            tokio::fs::write(&args.entities_output, report)
                .await
                .with_context(|| format!("failed to write {}", args.entities_output.display()))?;
            info!(
                "wrote {} and {}",
                args.output.display(),
                args.entities_output.display()
            );
            Ok(RunOutcome::Converted)
        }
        PipelineOutcome::AlignmentFailed(failure) => {
            // a partially correct file would be misleading: the raw
            // document text is the clearly distinguishable fallback
            tokio::fs::write(&args.output, &annotations.text)
                .await
                .with_context(|| format!("failed to write {}", args.output.display()))?;
            info!(
                "alignment failed at {}: document text written to {}",
                failure.position,
                args.output.display()
            );
            Ok(RunOutcome::AlignmentFailed)
        }
    }
}

fn document_name(output: &Path) -> String {
    output
        .file_stem()
        .map(|stem| stem.to_string_lossy().into_owned())
        .unwrap_or_else(|| "document".to_string())
}
