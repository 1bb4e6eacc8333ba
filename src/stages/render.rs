use serde::{Deserialize, Serialize};

use crate::models::{ClassifiedTranscript, ExonMap, GeneRecord, SegmentKind, Strand};

/// Colors for the per-slot display assignment.
///
/// The concrete values are configuration for the downstream writers; the
/// defaults are the palette the project has always shipped.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PaletteConfig {
    /// Cycled through by slot index
    pub exon_colors: Vec<String>,
    /// Shared by 5' and 3' UTR segments
    pub utr_color: String,
    /// Used for transcripts without a CDS
    pub noncoding_color: String,
}

impl Default for PaletteConfig {
    fn default() -> Self {
        Self {
            exon_colors: [
                "cyan", "#ff00dc", "#ff9fdf", "#d0b2ff", "#84ff84", "#ffd700", "#ff6b6b",
                "#4ecdc4",
            ]
            .iter()
            .map(|c| c.to_string())
            .collect(),
            utr_color: "#ffcc99".to_string(),
            noncoding_color: "cyan".to_string(),
        }
    }
}

impl PaletteConfig {
    /// Color for a slot. The same slot always renders the same way across
    /// every transcript of the gene.
    pub fn slot_color(&self, slot: u32) -> &str {
        let idx = (slot.max(1) as usize - 1) % self.exon_colors.len();
        &self.exon_colors[idx]
    }
}

/// Display payload for the serialization collaborator: retained transcripts
/// with ordered segments, plus the per-gene slot styling.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GeneOutput {
    pub gene_id: String,
    pub symbol: Option<String>,
    pub contig: String,
    pub strand: Strand,
    pub slot_styles: Vec<SlotStyle>,
    pub transcripts: Vec<TranscriptOutput>,
}

/// Deterministic visual treatment of one slot
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SlotStyle {
    pub slot: u32,
    pub label: String,
    pub color: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TranscriptOutput {
    pub transcript_id: String,
    pub name: Option<String>,
    pub canonical: bool,
    pub transcript_len: u64,
    pub segments: Vec<SegmentOutput>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SegmentOutput {
    pub label: String,
    pub kind: SegmentKind,
    pub slot: u32,
    pub partial: bool,
    pub local_start: u64,
    pub local_end: u64,
    pub color: String,
}

/// Assemble the display payload for one gene's surviving transcripts.
pub fn render_gene(
    gene: &GeneRecord,
    map: &ExonMap,
    palette: &PaletteConfig,
    kept: &[(usize, ClassifiedTranscript)],
) -> GeneOutput {
    let slot_styles = map
        .slots()
        .iter()
        .map(|s| SlotStyle {
            slot: s.index,
            label: format!("exon{}", s.index),
            color: palette.slot_color(s.index).to_string(),
        })
        .collect();

    let transcripts = kept
        .iter()
        .map(|(index, classified)| {
            let tx = &gene.transcripts[*index];
            let segments = classified
                .segments
                .iter()
                .map(|seg| SegmentOutput {
                    label: segment_label(seg.kind, seg.slot),
                    kind: seg.kind,
                    slot: seg.slot,
                    partial: seg.partial,
                    local_start: seg.local_start,
                    local_end: seg.local_end,
                    color: segment_color(seg.kind, seg.slot, palette),
                })
                .collect();
            TranscriptOutput {
                transcript_id: tx.id.clone(),
                name: tx.name.clone(),
                canonical: tx.canonical,
                transcript_len: classified.transcript_len,
                segments,
            }
        })
        .collect();

    GeneOutput {
        gene_id: gene.id.clone(),
        symbol: gene.symbol.clone(),
        contig: gene.contig.clone(),
        strand: gene.strand,
        slot_styles,
        transcripts,
    }
}

fn segment_label(kind: SegmentKind, slot: u32) -> String {
    match kind {
        SegmentKind::FivePrimeUtr => "5'UTR".to_string(),
        SegmentKind::Coding => format!("exon{}", slot),
        SegmentKind::ThreePrimeUtr => "3'UTR".to_string(),
        SegmentKind::NonCoding => "transcript".to_string(),
    }
}

fn segment_color(kind: SegmentKind, slot: u32, palette: &PaletteConfig) -> String {
    match kind {
        SegmentKind::Coding => palette.slot_color(slot).to_string(),
        SegmentKind::FivePrimeUtr | SegmentKind::ThreePrimeUtr => palette.utr_color.clone(),
        SegmentKind::NonCoding => palette.noncoding_color.clone(),
    }
}
