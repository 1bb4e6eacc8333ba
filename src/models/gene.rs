use serde::{Deserialize, Serialize};

/// Genomic strand. The annotation source encodes this as 1 / -1.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Strand {
    Forward,
    Reverse,
}

impl Strand {
    /// Parse the source's integer encoding (1 = forward, -1 = reverse)
    pub fn from_source(value: i8) -> Option<Self> {
        match value {
            1 => Some(Strand::Forward),
            -1 => Some(Strand::Reverse),
            _ => None,
        }
    }

    pub fn symbol(&self) -> char {
        match self {
            Strand::Forward => '+',
            Strand::Reverse => '-',
        }
    }
}

/// A contiguous genomic interval. Coordinates are 0-based, half-open:
/// [start, end). The ingestion layer converts from the source's 1-based
/// inclusive convention.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct GenomicInterval {
    pub start: u64,
    pub end: u64,
}

impl GenomicInterval {
    pub fn new(start: u64, end: u64) -> Self {
        Self { start, end }
    }

    /// Whether start < end holds. Validation happens in the exon map
    /// builder, not here.
    pub fn is_well_formed(&self) -> bool {
        self.start < self.end
    }

    pub fn len(&self) -> u64 {
        self.end.saturating_sub(self.start)
    }

    pub fn is_empty(&self) -> bool {
        self.end <= self.start
    }

    #[inline]
    pub fn overlaps(&self, other: &GenomicInterval) -> bool {
        self.start < other.end && other.start < self.end
    }

    #[inline]
    pub fn contains(&self, other: &GenomicInterval) -> bool {
        self.start <= other.start && other.end <= self.end
    }

    /// Whether a single position falls inside the interval
    #[inline]
    pub fn contains_pos(&self, pos: u64) -> bool {
        self.start <= pos && pos < self.end
    }

    /// Overlap of two intervals, if any
    pub fn intersect(&self, other: &GenomicInterval) -> Option<GenomicInterval> {
        let start = self.start.max(other.start);
        let end = self.end.min(other.end);
        (start < end).then_some(GenomicInterval { start, end })
    }
}

/// One raw exon as supplied by the source, owned by a single transcript's
/// exon sequence. Transcripts with genomically identical exons do not share
/// identity here; the exon map resolves that.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RawExon {
    pub interval: GenomicInterval,
    pub strand: Strand,
}

/// One transcript of a gene, as fetched
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TranscriptRecord {
    /// Stable source identifier (e.g. "ENSDART00000109130")
    pub id: String,
    /// Display name, when the source provides one (e.g. "lrfn1-202")
    pub name: Option<String>,
    /// Source-designated canonical flag
    pub canonical: bool,
    /// Raw exon intervals in the order the source supplies them
    pub exons: Vec<RawExon>,
    /// Genomic CDS bounds; absent for non-coding transcripts
    pub cds: Option<GenomicInterval>,
}

impl TranscriptRecord {
    /// Display label: the source name when present, the id otherwise
    pub fn label(&self) -> &str {
        self.name.as_deref().unwrap_or(&self.id)
    }

    /// Genomic hull of the transcript's exons
    pub fn span(&self) -> Option<GenomicInterval> {
        let start = self.exons.iter().map(|e| e.interval.start).min()?;
        let end = self.exons.iter().map(|e| e.interval.end).max()?;
        Some(GenomicInterval { start, end })
    }

    /// Sum of exon lengths, i.e. the spliced transcript length
    pub fn spliced_len(&self) -> u64 {
        self.exons.iter().map(|e| e.interval.len()).sum()
    }
}

/// One gene with its full transcript set. Immutable once parsed.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GeneRecord {
    pub id: String,
    /// Gene symbol (e.g. "lrfn1"), when the source provides one
    pub symbol: Option<String>,
    /// Scientific species name as the source reports it (e.g. "danio_rerio")
    pub species: String,
    /// Chromosome or contig name
    pub contig: String,
    pub interval: GenomicInterval,
    pub strand: Strand,
    pub transcripts: Vec<TranscriptRecord>,
}

impl GeneRecord {
    pub fn label(&self) -> &str {
        self.symbol.as_deref().unwrap_or(&self.id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_strand_from_source() {
        assert_eq!(Strand::from_source(1), Some(Strand::Forward));
        assert_eq!(Strand::from_source(-1), Some(Strand::Reverse));
        assert_eq!(Strand::from_source(0), None);
        assert_eq!(Strand::from_source(2), None);
    }

    #[test]
    fn test_interval_overlap_and_containment() {
        let a = GenomicInterval::new(100, 300);
        let b = GenomicInterval::new(200, 400);
        let c = GenomicInterval::new(300, 500);

        assert!(a.overlaps(&b));
        assert!(!a.overlaps(&c)); // half-open: touching is not overlapping
        assert!(GenomicInterval::new(0, 1000).contains(&a));
        assert!(!a.contains(&b));
    }

    #[test]
    fn test_interval_intersect() {
        let a = GenomicInterval::new(100, 300);
        let b = GenomicInterval::new(150, 550);

        assert_eq!(a.intersect(&b), Some(GenomicInterval::new(150, 300)));
        assert_eq!(a.intersect(&GenomicInterval::new(300, 400)), None);
    }

    #[test]
    fn test_transcript_span_and_length() {
        let tx = TranscriptRecord {
            id: "T1".to_string(),
            name: None,
            canonical: false,
            exons: vec![
                RawExon {
                    interval: GenomicInterval::new(400, 600),
                    strand: Strand::Forward,
                },
                RawExon {
                    interval: GenomicInterval::new(100, 300),
                    strand: Strand::Forward,
                },
            ],
            cds: None,
        };

        assert_eq!(tx.span(), Some(GenomicInterval::new(100, 600)));
        assert_eq!(tx.spliced_len(), 400);
        assert_eq!(tx.label(), "T1");
    }
}
