pub mod errors;
pub mod io;
pub mod models;
pub mod stages;

pub use errors::NormalizeError;
pub use io::{
    parse_gene_file, parse_gene_json, render_audit_report, write_audit_report, write_decision_log,
    write_gene_output,
};
pub use models::{
    Ambiguity, ClassifiedSegment, ClassifiedTranscript, DecisionLog, DecisionRecorder, ExonMap,
    ExonSlot, FilterReason, GeneRecord, GenomicInterval, RawExon, SegmentKind, Strand,
    TranscriptRecord, Verdict,
};
pub use stages::{
    build_exon_map, classify_transcript, extract_gene, filter_transcripts, ExtractionConfig,
    FilterConfig, GeneExtraction, GeneOutput, PaletteConfig,
};
