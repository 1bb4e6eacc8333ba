pub mod classify;
pub mod exon_map;
pub mod filter;
pub mod render;

pub use classify::classify_transcript;
pub use exon_map::build_exon_map;
pub use filter::{
    filter_transcripts, FilterConfig, FilterResult, FilteredTranscript, RetainedTranscript,
};
pub use render::{render_gene, GeneOutput, PaletteConfig, SegmentOutput, SlotStyle, TranscriptOutput};

use tracing::{info, warn};

use crate::errors::{NormalizeError, Result};
use crate::models::{ClassifiedTranscript, DecisionLog, DecisionRecorder, FilterReason, GeneRecord};

/// Configuration for one gene extraction run
#[derive(Debug, Clone, Default)]
pub struct ExtractionConfig {
    pub filter: FilterConfig,
    pub palette: PaletteConfig,
}

/// Everything one gene's run produces: the display payload for the
/// serialization collaborator and the audit log for the report writer.
#[derive(Debug)]
pub struct GeneExtraction {
    pub output: GeneOutput,
    pub log: DecisionLog,
}

/// Run the full normalization pipeline for one gene.
///
/// The exon map is built from the complete transcript set before any
/// filtering, so slot numbering never depends on which transcripts survive.
/// A CDS mismatch in one transcript demotes it to a filtered-with-error
/// decision while its siblings continue; malformed gene geometry and an
/// empty retained set abort the whole gene with no partial output.
pub fn extract_gene(gene: &GeneRecord, config: &ExtractionConfig) -> Result<GeneExtraction> {
    let map = build_exon_map(gene)?;

    let mut recorder = DecisionRecorder::new(gene);
    recorder.record_slot_table(&map);

    let FilterResult { retained, filtered } = filter_transcripts(gene, &map, &config.filter)?;

    for f in filtered {
        recorder.record_filtered(&gene.transcripts[f.index], f.reason);
    }

    let mut kept: Vec<(usize, ClassifiedTranscript)> = Vec::new();
    for r in retained {
        let tx = &gene.transcripts[r.index];
        match classify_transcript(tx, gene.strand, &map) {
            Ok(classified) => {
                recorder.record_kept(tx, r.ambiguities, classified.segments.clone());
                kept.push((r.index, classified));
            }
            Err(err @ NormalizeError::CdsBoundaryMismatch { .. }) => {
                warn!("Dropping transcript {}: {}", tx.label(), err);
                recorder.record_filtered(
                    tx,
                    FilterReason::Classification {
                        error: err.to_string(),
                    },
                );
            }
            Err(err) => return Err(err),
        }
    }

    if kept.is_empty() {
        return Err(NormalizeError::NoTranscriptsRemain {
            gene: gene.id.clone(),
        });
    }

    let output = render_gene(gene, &map, &config.palette, &kept);
    let log = recorder.finish();

    info!(
        "Extraction complete for {}: {} kept, {} filtered, {} slots",
        gene.label(),
        log.kept_count(),
        log.filtered_count(),
        map.len()
    );

    Ok(GeneExtraction { output, log })
}
