use std::path::Path;

use anyhow::{bail, Context, Result};
use serde::Deserialize;

use crate::models::{GeneRecord, GenomicInterval, RawExon, Strand, TranscriptRecord};

/// Gene lookup document as the fetch collaborator supplies it: the
/// annotation source's expanded-lookup shape with 1-based inclusive
/// coordinates and strand encoded as 1 / -1. Unknown fields are ignored.
#[derive(Debug, Deserialize)]
struct SourceGene {
    id: String,
    #[serde(default)]
    display_name: Option<String>,
    species: String,
    seq_region_name: String,
    start: u64,
    end: u64,
    strand: i8,
    #[serde(rename = "Transcript", default)]
    transcripts: Vec<SourceTranscript>,
}

#[derive(Debug, Deserialize)]
struct SourceTranscript {
    id: String,
    #[serde(default)]
    display_name: Option<String>,
    #[serde(default)]
    is_canonical: u8,
    #[serde(rename = "Exon", default)]
    exons: Vec<SourceExon>,
    #[serde(rename = "Translation", default)]
    translation: Option<SourceTranslation>,
}

#[derive(Debug, Deserialize)]
struct SourceExon {
    start: u64,
    end: u64,
    strand: i8,
}

/// Genomic CDS bounds of a coding transcript
#[derive(Debug, Deserialize)]
struct SourceTranslation {
    start: u64,
    end: u64,
}

/// Read and parse one gene lookup file
pub fn parse_gene_file(path: &Path) -> Result<GeneRecord> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read file: {:?}", path))?;
    parse_gene_json(&content)
}

/// Parse one gene lookup document into a `GeneRecord`
pub fn parse_gene_json(json: &str) -> Result<GeneRecord> {
    let source: SourceGene =
        serde_json::from_str(json).context("Failed to parse gene lookup JSON")?;
    convert_gene(source)
}

fn convert_gene(source: SourceGene) -> Result<GeneRecord> {
    let strand = parse_strand(source.strand).with_context(|| format!("gene {}", source.id))?;
    let interval =
        convert_interval(source.start, source.end).with_context(|| format!("gene {}", source.id))?;
    let transcripts = source
        .transcripts
        .into_iter()
        .map(convert_transcript)
        .collect::<Result<Vec<_>>>()?;

    Ok(GeneRecord {
        id: source.id,
        symbol: source.display_name,
        species: source.species,
        contig: source.seq_region_name,
        interval,
        strand,
        transcripts,
    })
}

fn convert_transcript(source: SourceTranscript) -> Result<TranscriptRecord> {
    let exons = source
        .exons
        .iter()
        .map(|e| {
            Ok(RawExon {
                interval: convert_interval(e.start, e.end)?,
                strand: parse_strand(e.strand)?,
            })
        })
        .collect::<Result<Vec<_>>>()
        .with_context(|| format!("transcript {}", source.id))?;

    let cds = source
        .translation
        .map(|t| convert_interval(t.start, t.end))
        .transpose()
        .with_context(|| format!("transcript {}", source.id))?;

    Ok(TranscriptRecord {
        id: source.id,
        name: source.display_name,
        canonical: source.is_canonical != 0,
        exons,
        cds,
    })
}

/// 1-based inclusive -> 0-based half-open
fn convert_interval(start: u64, end: u64) -> Result<GenomicInterval> {
    if start == 0 || end < start {
        bail!("invalid coordinates {}-{}", start, end);
    }
    Ok(GenomicInterval::new(start - 1, end))
}

fn parse_strand(value: i8) -> Result<Strand> {
    match Strand::from_source(value) {
        Some(strand) => Ok(strand),
        None => bail!("unsupported strand value {}", value),
    }
}
