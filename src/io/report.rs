use std::fmt::Write as _;
use std::path::Path;

use anyhow::{Context, Result};

use crate::models::{DecisionLog, SegmentKind, TranscriptDecision, Verdict};

const RULE: &str =
    "--------------------------------------------------------------------------------";

/// Render the decision log as a human-readable audit report.
///
/// Everything here is derived from the log alone; nothing is re-computed
/// from raw records. Coordinates are printed 1-based inclusive, the
/// convention the source browser uses.
pub fn render_audit_report(log: &DecisionLog) -> String {
    let mut out = String::new();
    let gene = &log.gene;

    let _ = writeln!(out, "GENE EXTRACTION AUDIT - {}", gene.label());
    let _ = writeln!(out, "{}", "=".repeat(80));
    let _ = writeln!(out, "Run: {}", log.run_id);
    let _ = writeln!(out, "Generated: {}", log.generated_at);
    let _ = writeln!(
        out,
        "Gene: {} | Location: chr{}:{}-{} ({})",
        gene.gene_id,
        gene.contig,
        gene.start + 1,
        gene.end,
        gene.strand.symbol()
    );
    let _ = writeln!(out, "Verify: {}", gene.link.url());
    out.push('\n');

    let _ = writeln!(out, "TRANSCRIPTS");
    let _ = writeln!(out, "{}", RULE);
    for tx in &log.transcripts {
        render_transcript_verdict(&mut out, tx);
    }
    out.push('\n');

    let _ = writeln!(out, "EXON MAP");
    let _ = writeln!(out, "{}", RULE);
    for slot in &log.slot_table {
        let _ = writeln!(
            out,
            "  exon{:<4} {}-{} ({} bp)",
            slot.index,
            slot.interval.start + 1,
            slot.interval.end,
            slot.interval.len()
        );
    }
    out.push('\n');

    let _ = writeln!(out, "FEATURES ANNOTATED");
    let _ = writeln!(out, "{}", RULE);
    for tx in &log.transcripts {
        let Some(segments) = &tx.segments else { continue };
        let _ = writeln!(out, "\n{}:", tx.name.as_deref().unwrap_or(&tx.transcript_id));
        for seg in segments {
            let label = match seg.kind {
                SegmentKind::Coding => format!("exon{}", seg.slot),
                SegmentKind::FivePrimeUtr => "5'UTR".to_string(),
                SegmentKind::ThreePrimeUtr => "3'UTR".to_string(),
                SegmentKind::NonCoding => "transcript".to_string(),
            };
            let _ = writeln!(
                out,
                "  {:<10} {:>6}-{:<6} ({} bp)",
                label,
                seg.local_start + 1,
                seg.local_end,
                seg.len()
            );
        }
    }
    out.push('\n');

    let _ = writeln!(out, "SANITY CHECKS");
    let _ = writeln!(out, "{}", RULE);
    let _ = writeln!(out, "1. Open the gene link above and confirm the location matches.");
    let _ = writeln!(
        out,
        "2. For each kept transcript, open its link and verify the exon"
    );
    let _ = writeln!(
        out,
        "   boundaries against the FEATURES ANNOTATED section."
    );
    let _ = writeln!(
        out,
        "3. Review any AMBIGUOUS lines above; both transcripts were kept."
    );
    out.push('\n');

    let _ = writeln!(
        out,
        "Summary: {} kept, {} filtered, {} exon slots",
        log.kept_count(),
        log.filtered_count(),
        log.slot_table.len()
    );

    out
}

fn render_transcript_verdict(out: &mut String, tx: &TranscriptDecision) {
    let name = tx.name.as_deref().unwrap_or(&tx.transcript_id);
    let canonical = if tx.canonical { " [CANONICAL]" } else { "" };

    match &tx.verdict {
        Verdict::Kept => {
            let _ = writeln!(out, "KEPT: {}{}", name, canonical);
            let _ = writeln!(out, "   {}", tx.link.url());
            for ambiguity in &tx.ambiguities {
                let _ = writeln!(out, "   AMBIGUOUS: {} (kept, review manually)", ambiguity.describe());
            }
        }
        Verdict::Filtered { reason } => {
            let _ = writeln!(out, "FILTERED: {}{} - {}", name, canonical, reason.describe());
            let _ = writeln!(out, "   {}", tx.link.url());
        }
    }
}

/// Write the audit report next to the other output artifacts
pub fn write_audit_report(log: &DecisionLog, path: &Path) -> Result<()> {
    std::fs::write(path, render_audit_report(log))
        .with_context(|| format!("Failed to write audit report: {:?}", path))?;
    Ok(())
}
