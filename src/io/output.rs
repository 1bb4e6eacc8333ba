use std::path::Path;

use anyhow::{Context, Result};

use crate::models::DecisionLog;
use crate::stages::GeneOutput;

/// Write the display payload for the serialization collaborator
pub fn write_gene_output(output: &GeneOutput, path: &Path) -> Result<()> {
    let file = std::fs::File::create(path)
        .with_context(|| format!("Failed to create file: {:?}", path))?;
    serde_json::to_writer_pretty(file, output).context("Failed to write gene output JSON")?;
    Ok(())
}

/// Write the full decision log for the audit collaborator
pub fn write_decision_log(log: &DecisionLog, path: &Path) -> Result<()> {
    let file = std::fs::File::create(path)
        .with_context(|| format!("Failed to create file: {:?}", path))?;
    serde_json::to_writer_pretty(file, log).context("Failed to write decision log JSON")?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{DecisionRecorder, GeneRecord, GenomicInterval, Strand};
    use crate::stages::{build_exon_map, render_gene, PaletteConfig};

    fn gene_fixture() -> GeneRecord {
        let json = r#"{
            "id": "ENSDARG00000000001",
            "display_name": "lrfn1",
            "species": "danio_rerio",
            "seq_region_name": "16",
            "start": 101,
            "end": 900,
            "strand": 1,
            "Transcript": [
                {
                    "id": "ENSDART00000000010",
                    "is_canonical": 1,
                    "Exon": [{"start": 101, "end": 300, "strand": 1}]
                }
            ]
        }"#;
        crate::io::parse_gene_json(json).unwrap()
    }

    #[test]
    fn test_write_decision_log_round_trip() {
        let gene = gene_fixture();
        let map = build_exon_map(&gene).unwrap();
        let mut recorder = DecisionRecorder::new(&gene);
        recorder.record_slot_table(&map);
        recorder.record_kept(&gene.transcripts[0], vec![], vec![]);
        let log = recorder.finish();

        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("decision_log.json");
        write_decision_log(&log, &path).unwrap();

        let content = std::fs::read_to_string(&path).unwrap();
        let parsed: DecisionLog = serde_json::from_str(&content).unwrap();

        assert_eq!(parsed.gene.gene_id, "ENSDARG00000000001");
        assert_eq!(parsed.slot_table, log.slot_table);
        assert_eq!(parsed.transcripts.len(), 1);
        assert_eq!(
            parsed.slot_table[0].interval,
            GenomicInterval::new(100, 300)
        );
        assert_eq!(parsed.gene.strand, Strand::Forward);
    }

    #[test]
    fn test_write_gene_output() {
        let gene = gene_fixture();
        let map = build_exon_map(&gene).unwrap();
        let classified =
            crate::stages::classify_transcript(&gene.transcripts[0], gene.strand, &map).unwrap();
        let output = render_gene(&gene, &map, &PaletteConfig::default(), &[(0, classified)]);

        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("gene_output.json");
        write_gene_output(&output, &path).unwrap();

        let content = std::fs::read_to_string(&path).unwrap();
        let parsed: serde_json::Value = serde_json::from_str(&content).unwrap();

        assert_eq!(parsed["gene_id"], "ENSDARG00000000001");
        assert_eq!(parsed["slot_styles"][0]["label"], "exon1");
        assert_eq!(parsed["transcripts"][0]["segments"][0]["kind"], "non_coding");
    }
}
