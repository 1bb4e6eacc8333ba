use tracing::debug;

use crate::errors::{NormalizeError, Result};
use crate::models::{
    ClassifiedSegment, ClassifiedTranscript, ExonMap, GenomicInterval, SegmentKind, Strand,
    TranscriptRecord,
};

/// Partition a retained transcript into 5'UTR, coding and 3'UTR segments
/// using its genomic CDS bounds.
///
/// Exons are walked in 5'->3' transcript order while transcript-local
/// coordinates accumulate, so the emitted segments tile
/// [0, transcript_len) exactly. An exon straddling a CDS boundary is split
/// into up to three segments that all keep the exon's slot index, marked
/// partial. A transcript without a CDS yields one non-coding segment per
/// slot.
///
/// Inconsistent CDS coordinates (coding length not a multiple of 3, CDS
/// overlapping no exon, or a CDS boundary landing in an intron) fail with
/// `CdsBoundaryMismatch`. The mismatch is surfaced, never repaired.
pub fn classify_transcript(
    tx: &TranscriptRecord,
    strand: Strand,
    map: &ExonMap,
) -> Result<ClassifiedTranscript> {
    // Normalize to 5'->3' transcript order.
    let mut exons: Vec<GenomicInterval> = tx.exons.iter().map(|e| e.interval).collect();
    exons.sort_by_key(|iv| (iv.start, iv.end));
    if strand == Strand::Reverse {
        exons.reverse();
    }

    let transcript_len: u64 = exons.iter().map(|iv| iv.len()).sum();

    let Some(cds) = tx.cds else {
        return non_coding(tx, &exons, map, transcript_len);
    };

    if !cds.is_well_formed() {
        return Err(NormalizeError::cds_mismatch(
            &tx.id,
            format!("CDS {}-{} has start >= end", cds.start, cds.end),
        ));
    }

    let coding_len: u64 = exons
        .iter()
        .filter_map(|iv| iv.intersect(&cds))
        .map(|iv| iv.len())
        .sum();

    if coding_len == 0 {
        return Err(NormalizeError::cds_mismatch(
            &tx.id,
            format!("CDS {}-{} overlaps no exon", cds.start, cds.end),
        ));
    }
    if coding_len % 3 != 0 {
        return Err(NormalizeError::cds_mismatch(
            &tx.id,
            format!("coding length {} is not a multiple of 3", coding_len),
        ));
    }
    // The start and stop codons must each land inside an exon; a CDS
    // boundary in an intron means the source data is inconsistent.
    if !exons.iter().any(|iv| iv.contains_pos(cds.start)) {
        return Err(NormalizeError::cds_mismatch(
            &tx.id,
            format!("CDS start {} falls outside every exon", cds.start),
        ));
    }
    if !exons.iter().any(|iv| iv.contains_pos(cds.end - 1)) {
        return Err(NormalizeError::cds_mismatch(
            &tx.id,
            format!("CDS end {} falls outside every exon", cds.end),
        ));
    }

    let mut segments = Vec::new();
    let mut local = 0u64;

    for exon in &exons {
        let slot = slot_of(map, exon, &tx.id)?;

        // Genomic parts of the exon below, inside and above the CDS.
        let below = (exon.start < cds.start).then(|| {
            GenomicInterval::new(exon.start, exon.end.min(cds.start))
        });
        let coding = exon.intersect(&cds);
        let above = (exon.end > cds.end).then(|| {
            GenomicInterval::new(exon.start.max(cds.end), exon.end)
        });

        // In transcript order the 5' side comes first; on the reverse
        // strand that is the genomically higher part.
        let (lead, trail) = match strand {
            Strand::Forward => (below, above),
            Strand::Reverse => (above, below),
        };

        let parts = [
            (lead, SegmentKind::FivePrimeUtr),
            (coding, SegmentKind::Coding),
            (trail, SegmentKind::ThreePrimeUtr),
        ];
        let split = parts.iter().filter(|(part, _)| part.is_some()).count() > 1;

        for (part, kind) in parts {
            let Some(genomic) = part else { continue };
            let len = genomic.len();
            segments.push(ClassifiedSegment {
                kind,
                slot,
                partial: split,
                local_start: local,
                local_end: local + len,
                genomic,
            });
            local += len;
        }
    }

    debug!(
        "Classified {}: {} segments, {} bp coding of {} bp total",
        tx.label(),
        segments.len(),
        coding_len,
        transcript_len
    );

    Ok(ClassifiedTranscript {
        transcript_id: tx.id.clone(),
        segments,
        transcript_len,
        coding_len,
    })
}

fn non_coding(
    tx: &TranscriptRecord,
    exons: &[GenomicInterval],
    map: &ExonMap,
    transcript_len: u64,
) -> Result<ClassifiedTranscript> {
    let mut segments = Vec::new();
    let mut local = 0u64;

    for exon in exons {
        let slot = slot_of(map, exon, &tx.id)?;
        let len = exon.len();
        segments.push(ClassifiedSegment {
            kind: SegmentKind::NonCoding,
            slot,
            partial: false,
            local_start: local,
            local_end: local + len,
            genomic: *exon,
        });
        local += len;
    }

    Ok(ClassifiedTranscript {
        transcript_id: tx.id.clone(),
        segments,
        transcript_len,
        coding_len: 0,
    })
}

fn slot_of(map: &ExonMap, exon: &GenomicInterval, transcript_id: &str) -> Result<u32> {
    map.slot_of(exon).ok_or_else(|| {
        NormalizeError::malformed(
            format!("transcript {}", transcript_id),
            format!("exon {}-{} is not in the gene exon map", exon.start, exon.end),
        )
    })
}
