use serde::{Deserialize, Serialize};

use super::{ClassifiedSegment, ExonMap, ExonSlot, GeneRecord, Strand, TranscriptRecord};

/// Why a transcript was excluded from output
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", tag = "rule")]
pub enum FilterReason {
    /// Canonical-only mode and the source did not flag this transcript
    NonCanonical,
    /// The transcript's slot set is contained in another transcript's
    ExonSubset { superset: String },
    /// Feature classification failed; the error is preserved verbatim
    Classification { error: String },
}

impl FilterReason {
    /// One-line description for the audit report
    pub fn describe(&self) -> String {
        match self {
            FilterReason::NonCanonical => "non-canonical (canonical-only mode)".to_string(),
            FilterReason::ExonSubset { superset } => format!("exon subset of {}", superset),
            FilterReason::Classification { error } => format!("classification failed: {}", error),
        }
    }
}

/// Non-fatal redundancy conflict, retained and flagged for manual review
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", tag = "kind")]
pub enum Ambiguity {
    /// Identical slot set with no canonical tie-breaker
    IdenticalExonSet { partner: String },
    /// Genomic span contained in the partner's with fewer slots, but the
    /// slot sets are not in a subset relation
    GenomicContainment { container: String },
}

impl Ambiguity {
    pub fn describe(&self) -> String {
        match self {
            Ambiguity::IdenticalExonSet { partner } => {
                format!("identical exon set as {}", partner)
            }
            Ambiguity::GenomicContainment { container } => {
                format!("genomically contained in {}", container)
            }
        }
    }
}

/// Everything needed to rebuild a human-followable link to the source record
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LinkPayload {
    pub species: String,
    pub gene_id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub transcript_id: Option<String>,
}

impl LinkPayload {
    pub fn gene(species: &str, gene_id: &str) -> Self {
        Self {
            species: species.to_string(),
            gene_id: gene_id.to_string(),
            transcript_id: None,
        }
    }

    pub fn transcript(species: &str, gene_id: &str, transcript_id: &str) -> Self {
        Self {
            species: species.to_string(),
            gene_id: gene_id.to_string(),
            transcript_id: Some(transcript_id.to_string()),
        }
    }

    /// Browser URL for the record this payload identifies
    pub fn url(&self) -> String {
        let species = capitalize_species(&self.species);
        match &self.transcript_id {
            Some(t) => format!("https://ensembl.org/{}/Transcript/Exons?t={}", species, t),
            None => format!(
                "https://ensembl.org/{}/Gene/Summary?g={}",
                species, self.gene_id
            ),
        }
    }
}

/// "danio_rerio" -> "Danio_rerio", the capitalization browser URLs use
fn capitalize_species(species: &str) -> String {
    let mut chars = species.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

/// Keep/filter verdict for one transcript
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", tag = "verdict")]
pub enum Verdict {
    Kept,
    Filtered { reason: FilterReason },
}

impl Verdict {
    pub fn is_kept(&self) -> bool {
        matches!(self, Verdict::Kept)
    }
}

/// One decision-log entry for one transcript
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TranscriptDecision {
    pub transcript_id: String,
    pub name: Option<String>,
    pub canonical: bool,
    pub link: LinkPayload,
    #[serde(flatten)]
    pub verdict: Verdict,
    /// Redundancy conflicts affecting this transcript (kept entries only)
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub ambiguities: Vec<Ambiguity>,
    /// Segment list for kept transcripts
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub segments: Option<Vec<ClassifiedSegment>>,
}

/// Gene-level header of the log
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GeneSummary {
    pub gene_id: String,
    pub symbol: Option<String>,
    pub species: String,
    pub contig: String,
    pub start: u64,
    pub end: u64,
    pub strand: Strand,
    pub link: LinkPayload,
}

impl GeneSummary {
    pub fn label(&self) -> &str {
        self.symbol.as_deref().unwrap_or(&self.gene_id)
    }
}

/// Complete audit log for one gene's processing run.
///
/// This structure is the sole input to the audit-report and
/// serialized-output writers; it carries everything needed to explain every
/// decision without re-deriving it from raw data.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DecisionLog {
    pub run_id: String,
    /// RFC 3339 timestamp of log emission
    pub generated_at: String,
    pub gene: GeneSummary,
    /// Resolved slot table with genomic coordinates per slot
    pub slot_table: Vec<ExonSlot>,
    /// One entry per transcript, sorted by transcript id
    pub transcripts: Vec<TranscriptDecision>,
}

impl DecisionLog {
    pub fn kept_count(&self) -> usize {
        self.transcripts
            .iter()
            .filter(|t| t.verdict.is_kept())
            .count()
    }

    pub fn filtered_count(&self) -> usize {
        self.transcripts.len() - self.kept_count()
    }
}

/// Append-only accumulator scoped to one gene's processing run.
///
/// `finish` seals the log: entries are sorted by transcript id so the
/// emitted order never depends on processing order.
#[derive(Debug)]
pub struct DecisionRecorder {
    gene: GeneSummary,
    slot_table: Vec<ExonSlot>,
    transcripts: Vec<TranscriptDecision>,
}

impl DecisionRecorder {
    pub fn new(gene: &GeneRecord) -> Self {
        Self {
            gene: GeneSummary {
                gene_id: gene.id.clone(),
                symbol: gene.symbol.clone(),
                species: gene.species.clone(),
                contig: gene.contig.clone(),
                start: gene.interval.start,
                end: gene.interval.end,
                strand: gene.strand,
                link: LinkPayload::gene(&gene.species, &gene.id),
            },
            slot_table: Vec::new(),
            transcripts: Vec::new(),
        }
    }

    pub fn record_slot_table(&mut self, map: &ExonMap) {
        self.slot_table = map.slots().to_vec();
    }

    pub fn record_filtered(&mut self, tx: &TranscriptRecord, reason: FilterReason) {
        self.transcripts.push(TranscriptDecision {
            transcript_id: tx.id.clone(),
            name: tx.name.clone(),
            canonical: tx.canonical,
            link: LinkPayload::transcript(&self.gene.species, &self.gene.gene_id, &tx.id),
            verdict: Verdict::Filtered { reason },
            ambiguities: Vec::new(),
            segments: None,
        });
    }

    pub fn record_kept(
        &mut self,
        tx: &TranscriptRecord,
        ambiguities: Vec<Ambiguity>,
        segments: Vec<ClassifiedSegment>,
    ) {
        self.transcripts.push(TranscriptDecision {
            transcript_id: tx.id.clone(),
            name: tx.name.clone(),
            canonical: tx.canonical,
            link: LinkPayload::transcript(&self.gene.species, &self.gene.gene_id, &tx.id),
            verdict: Verdict::Kept,
            ambiguities,
            segments: Some(segments),
        });
    }

    pub fn finish(mut self) -> DecisionLog {
        self.transcripts
            .sort_by(|a, b| a.transcript_id.cmp(&b.transcript_id));
        DecisionLog {
            run_id: uuid::Uuid::new_v4().to_string(),
            generated_at: chrono::Utc::now().to_rfc3339(),
            gene: self.gene,
            slot_table: self.slot_table,
            transcripts: self.transcripts,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{GenomicInterval, RawExon};

    fn gene_fixture() -> GeneRecord {
        GeneRecord {
            id: "ENSDARG00000012345".to_string(),
            symbol: Some("lrfn1".to_string()),
            species: "danio_rerio".to_string(),
            contig: "16".to_string(),
            interval: GenomicInterval::new(1000, 9000),
            strand: Strand::Forward,
            transcripts: vec![],
        }
    }

    fn tx_fixture(id: &str) -> TranscriptRecord {
        TranscriptRecord {
            id: id.to_string(),
            name: None,
            canonical: false,
            exons: vec![RawExon {
                interval: GenomicInterval::new(1000, 2000),
                strand: Strand::Forward,
            }],
            cds: None,
        }
    }

    #[test]
    fn test_link_urls() {
        let gene = LinkPayload::gene("danio_rerio", "ENSDARG00000012345");
        assert_eq!(
            gene.url(),
            "https://ensembl.org/Danio_rerio/Gene/Summary?g=ENSDARG00000012345"
        );

        let tx = LinkPayload::transcript("danio_rerio", "ENSDARG00000012345", "ENSDART00000099999");
        assert_eq!(
            tx.url(),
            "https://ensembl.org/Danio_rerio/Transcript/Exons?t=ENSDART00000099999"
        );
    }

    #[test]
    fn test_recorder_sorts_by_transcript_id() {
        let gene = gene_fixture();
        let mut recorder = DecisionRecorder::new(&gene);

        recorder.record_kept(&tx_fixture("T3"), vec![], vec![]);
        recorder.record_filtered(&tx_fixture("T1"), FilterReason::NonCanonical);
        recorder.record_kept(&tx_fixture("T2"), vec![], vec![]);

        let log = recorder.finish();
        let ids: Vec<&str> = log
            .transcripts
            .iter()
            .map(|t| t.transcript_id.as_str())
            .collect();

        assert_eq!(ids, vec!["T1", "T2", "T3"]);
        assert_eq!(log.kept_count(), 2);
        assert_eq!(log.filtered_count(), 1);
    }

    #[test]
    fn test_verdict_serialization_shape() {
        let gene = gene_fixture();
        let mut recorder = DecisionRecorder::new(&gene);
        recorder.record_filtered(
            &tx_fixture("T1"),
            FilterReason::ExonSubset {
                superset: "T2".to_string(),
            },
        );
        let log = recorder.finish();

        let json = serde_json::to_value(&log.transcripts[0]).unwrap();
        assert_eq!(json["verdict"], "filtered");
        assert_eq!(json["reason"]["rule"], "exon_subset");
        assert_eq!(json["reason"]["superset"], "T2");
    }
}
