use std::collections::HashSet;

use tracing::info;

use crate::errors::{NormalizeError, Result};
use crate::models::{ExonMap, ExonSlot, GeneRecord, GenomicInterval, Strand};

/// Build the gene-wide exon catalog from the full, unfiltered transcript set.
///
/// Two raw exons map to the same slot iff their genomic coordinates are
/// identical. Slots are numbered 1..N in 5'->3' order on the gene's strand,
/// so the numbering is a pure function of the transcript set and never
/// depends on which transcripts survive filtering.
///
/// Validation happens here, before anything else runs: an exon with
/// start >= end, an exon whose strand disagrees with the gene's, or a
/// transcript with no exons at all aborts the gene.
pub fn build_exon_map(gene: &GeneRecord) -> Result<ExonMap> {
    if !gene.interval.is_well_formed() {
        return Err(NormalizeError::malformed(
            format!("gene {}", gene.id),
            format!(
                "locus {}-{} has start >= end",
                gene.interval.start, gene.interval.end
            ),
        ));
    }

    let mut intervals: HashSet<GenomicInterval> = HashSet::new();

    for tx in &gene.transcripts {
        if tx.exons.is_empty() {
            return Err(NormalizeError::malformed(
                format!("transcript {}", tx.id),
                "transcript has no exons",
            ));
        }
        for exon in &tx.exons {
            if !exon.interval.is_well_formed() {
                return Err(NormalizeError::malformed(
                    format!("transcript {}", tx.id),
                    format!(
                        "exon {}-{} has start >= end",
                        exon.interval.start, exon.interval.end
                    ),
                ));
            }
            if exon.strand != gene.strand {
                return Err(NormalizeError::malformed(
                    format!("transcript {}", tx.id),
                    format!(
                        "exon {}-{} is on strand {} but the gene is on {}",
                        exon.interval.start,
                        exon.interval.end,
                        exon.strand.symbol(),
                        gene.strand.symbol()
                    ),
                ));
            }
            intervals.insert(exon.interval);
        }
    }

    let mut ordered: Vec<GenomicInterval> = intervals.into_iter().collect();
    ordered.sort_by_key(|iv| (iv.start, iv.end));
    if gene.strand == Strand::Reverse {
        ordered.reverse();
    }

    let slots: Vec<ExonSlot> = ordered
        .into_iter()
        .enumerate()
        .map(|(i, interval)| ExonSlot {
            index: i as u32 + 1,
            interval,
        })
        .collect();

    info!(
        "Exon map for {}: {} slots across {} transcripts",
        gene.label(),
        slots.len(),
        gene.transcripts.len()
    );

    Ok(ExonMap::new(slots))
}
