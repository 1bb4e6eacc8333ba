use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use tracing::{info, Level};
use tracing_subscriber::FmtSubscriber;

use splicenorm::{
    build_exon_map, extract_gene, filter_transcripts, parse_gene_file, write_audit_report,
    write_decision_log, write_gene_output, ExtractionConfig, FilterConfig, PaletteConfig,
};

#[derive(Parser)]
#[command(name = "splicenorm")]
#[command(author, version, about = "Gene model normalization with cross-variant exon numbering", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Normalize a fetched gene record and write the output payloads
    Process {
        /// Input gene record (annotation-source lookup JSON)
        #[arg(short, long)]
        input: PathBuf,

        /// Output file for the display payload (JSON)
        #[arg(short, long)]
        output: PathBuf,

        /// Output file for the decision log (JSON)
        #[arg(long)]
        log: PathBuf,

        /// Optional human-readable audit report (text)
        #[arg(long)]
        report: Option<PathBuf>,

        /// Keep only the transcript(s) the source flags canonical
        #[arg(long)]
        canonical_only: bool,

        /// Verbose output
        #[arg(short, long)]
        verbose: bool,
    },

    /// Inspect a gene record without writing output files
    Inspect {
        /// Input gene record (annotation-source lookup JSON)
        #[arg(short, long)]
        input: PathBuf,

        /// Verbose output
        #[arg(short, long)]
        verbose: bool,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Process {
            input,
            output,
            log,
            report,
            canonical_only,
            verbose,
        } => {
            setup_logging(verbose);
            process_gene(input, output, log, report, canonical_only)
        }
        Commands::Inspect { input, verbose } => {
            setup_logging(verbose);
            inspect_gene(input)
        }
    }
}

fn setup_logging(verbose: bool) {
    let level = if verbose { Level::DEBUG } else { Level::INFO };
    let subscriber = FmtSubscriber::builder().with_max_level(level).finish();
    tracing::subscriber::set_global_default(subscriber).ok();
}

fn process_gene(
    input: PathBuf,
    output: PathBuf,
    log: PathBuf,
    report: Option<PathBuf>,
    canonical_only: bool,
) -> Result<()> {
    info!("Loading gene record from {:?}", input);
    let gene = parse_gene_file(&input).context("Failed to parse input gene record")?;

    info!(
        "Gene {} ({}): {} transcripts at chr{}:{}-{} ({})",
        gene.label(),
        gene.id,
        gene.transcripts.len(),
        gene.contig,
        gene.interval.start + 1,
        gene.interval.end,
        gene.strand.symbol()
    );

    let config = ExtractionConfig {
        filter: FilterConfig { canonical_only },
        palette: PaletteConfig::default(),
    };

    let extraction = extract_gene(&gene, &config)
        .with_context(|| format!("Extraction failed for gene {}", gene.id))?;

    write_gene_output(&extraction.output, &output)?;
    info!("Display payload written to {:?}", output);

    write_decision_log(&extraction.log, &log)?;
    info!("Decision log written to {:?}", log);

    if let Some(report_path) = report {
        write_audit_report(&extraction.log, &report_path)?;
        info!("Audit report written to {:?}", report_path);
    }

    info!(
        "Complete: {} transcripts kept, {} filtered",
        extraction.log.kept_count(),
        extraction.log.filtered_count()
    );

    Ok(())
}

fn inspect_gene(input: PathBuf) -> Result<()> {
    info!("Inspecting gene record from {:?}", input);
    let gene = parse_gene_file(&input).context("Failed to parse input gene record")?;

    println!("Gene Record");
    println!("===========");
    println!("Gene: {} ({})", gene.label(), gene.id);
    println!(
        "Location: chr{}:{}-{} ({})",
        gene.contig,
        gene.interval.start + 1,
        gene.interval.end,
        gene.strand.symbol()
    );
    println!("Species: {}", gene.species);
    println!("Transcripts: {}", gene.transcripts.len());
    println!();

    let map = build_exon_map(&gene).context("Exon map construction failed")?;

    println!("Exon Map");
    println!("--------");
    for slot in map.slots() {
        println!(
            "exon{:<4} {}-{} ({} bp)",
            slot.index,
            slot.interval.start + 1,
            slot.interval.end,
            slot.interval.len()
        );
    }
    println!();

    let result = filter_transcripts(&gene, &map, &FilterConfig::default())
        .context("Redundancy filtering failed")?;

    println!("Transcripts");
    println!("-----------");
    for retained in &result.retained {
        let tx = &gene.transcripts[retained.index];
        let canonical = if tx.canonical { " [CANONICAL]" } else { "" };
        let coding = if tx.cds.is_some() { "coding" } else { "non-coding" };
        println!(
            "KEEP   {}{}: {} exons, {} bp spliced, {}",
            tx.label(),
            canonical,
            tx.exons.len(),
            tx.spliced_len(),
            coding
        );
        for ambiguity in &retained.ambiguities {
            println!("       ambiguous: {}", ambiguity.describe());
        }
    }
    for filtered in &result.filtered {
        let tx = &gene.transcripts[filtered.index];
        println!("FILTER {}: {}", tx.label(), filtered.reason.describe());
    }

    Ok(())
}
