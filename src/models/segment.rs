use serde::{Deserialize, Serialize};

use super::GenomicInterval;

/// Classification of one span of a transcript
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SegmentKind {
    FivePrimeUtr,
    Coding,
    ThreePrimeUtr,
    /// Transcript has no CDS; the span is still subdivided by exon slot
    NonCoding,
}

/// A labeled span of one transcript.
///
/// When a CDS boundary splits an exon, the resulting sub-segments all carry
/// the slot index of that exon and are marked `partial`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClassifiedSegment {
    pub kind: SegmentKind,
    /// Global exon slot this span lies in
    pub slot: u32,
    /// True when this span covers only part of its slot
    pub partial: bool,
    /// Transcript-local coordinates, 0-based half-open
    pub local_start: u64,
    pub local_end: u64,
    /// Genomic coordinates of the span
    pub genomic: GenomicInterval,
}

impl ClassifiedSegment {
    pub fn len(&self) -> u64 {
        self.local_end.saturating_sub(self.local_start)
    }

    pub fn is_empty(&self) -> bool {
        self.local_end <= self.local_start
    }
}

/// Full classification of one retained transcript.
///
/// Segments are in 5'->3' transcript order and tile [0, transcript_len)
/// with no gap or overlap.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClassifiedTranscript {
    pub transcript_id: String,
    pub segments: Vec<ClassifiedSegment>,
    pub transcript_len: u64,
    /// Total coding length; 0 for non-coding transcripts
    pub coding_len: u64,
}

impl ClassifiedTranscript {
    pub fn is_coding(&self) -> bool {
        self.coding_len > 0
    }
}
