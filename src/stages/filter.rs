use std::collections::BTreeSet;

use tracing::{debug, info};

use crate::errors::{NormalizeError, Result};
use crate::models::{Ambiguity, ExonMap, FilterReason, GeneRecord, GenomicInterval, TranscriptRecord};

/// Configuration for transcript redundancy filtering
#[derive(Debug, Clone, Default)]
pub struct FilterConfig {
    /// Keep only transcripts the source flags canonical. Short-circuits the
    /// subset and containment rules.
    pub canonical_only: bool,
}

/// A transcript that survived filtering
#[derive(Debug, Clone)]
pub struct RetainedTranscript {
    /// Index into the gene's transcript list
    pub index: usize,
    /// Redundancy conflicts flagged for manual review
    pub ambiguities: Vec<Ambiguity>,
}

/// A transcript excluded from output
#[derive(Debug, Clone)]
pub struct FilteredTranscript {
    /// Index into the gene's transcript list
    pub index: usize,
    pub reason: FilterReason,
}

/// Outcome of redundancy filtering over one gene's transcript set
#[derive(Debug)]
pub struct FilterResult {
    pub retained: Vec<RetainedTranscript>,
    pub filtered: Vec<FilteredTranscript>,
}

/// Slot usage and genomic span of one transcript, computed once up front
struct Profile {
    slots: BTreeSet<u32>,
    span: GenomicInterval,
}

/// Decide, per transcript, whether it is redundant and should be excluded.
///
/// Rules in precedence order:
/// 1. canonical-only mode retains only canonical transcripts;
/// 2. a transcript whose slot set is a non-empty proper subset of another's
///    contributes nothing and is filtered;
/// 3. a transcript genomically contained in another with strictly fewer
///    slots but no slot-subset relation is kept and flagged ambiguous
///    rather than dropped.
///
/// Identical slot sets are broken in favor of the canonical transcript;
/// with no canonical tie-breaker both are kept and flagged. A canonical
/// transcript is never filtered in favor of a non-canonical one. Filtering
/// that would empty the gene fails with `NoTranscriptsRemain` instead.
pub fn filter_transcripts(
    gene: &GeneRecord,
    map: &ExonMap,
    config: &FilterConfig,
) -> Result<FilterResult> {
    let transcripts = &gene.transcripts;

    if transcripts.is_empty() {
        return Err(NormalizeError::NoTranscriptsRemain {
            gene: gene.id.clone(),
        });
    }

    // A lone transcript is never filtered, in any mode.
    if transcripts.len() == 1 {
        return Ok(FilterResult {
            retained: vec![RetainedTranscript {
                index: 0,
                ambiguities: Vec::new(),
            }],
            filtered: Vec::new(),
        });
    }

    if config.canonical_only {
        return filter_canonical_only(gene);
    }

    let profiles = transcripts
        .iter()
        .map(|tx| profile_of(tx, map))
        .collect::<Result<Vec<Profile>>>()?;

    let mut retained = Vec::new();
    let mut filtered = Vec::new();

    for (i, a) in profiles.iter().enumerate() {
        let tx_a = &transcripts[i];
        let mut reason: Option<FilterReason> = None;
        let mut ambiguities: Vec<Ambiguity> = Vec::new();

        for (j, b) in profiles.iter().enumerate() {
            if i == j {
                continue;
            }
            let tx_b = &transcripts[j];

            // A canonical transcript is never dropped in favor of a
            // non-canonical one.
            if tx_a.canonical && !tx_b.canonical {
                continue;
            }

            if a.slots == b.slots {
                if tx_b.canonical && !tx_a.canonical {
                    reason = Some(FilterReason::ExonSubset {
                        superset: tx_b.id.clone(),
                    });
                    break;
                }
                // No canonical tie-breaker: keep both, flag for review.
                ambiguities.push(Ambiguity::IdenticalExonSet {
                    partner: tx_b.id.clone(),
                });
            } else if !a.slots.is_empty() && a.slots.is_subset(&b.slots) {
                // Proper subset, since the sets differ.
                reason = Some(FilterReason::ExonSubset {
                    superset: tx_b.id.clone(),
                });
                break;
            } else if b.span.contains(&a.span) && a.slots.len() < b.slots.len() {
                // Genomically contained with fewer slots but no slot-subset
                // relation. The rules disagree, so keep and flag rather
                // than guess.
                ambiguities.push(Ambiguity::GenomicContainment {
                    container: tx_b.id.clone(),
                });
            }
        }

        match reason {
            Some(reason) => {
                debug!("Filtering {}: {}", tx_a.label(), reason.describe());
                filtered.push(FilteredTranscript { index: i, reason });
            }
            None => retained.push(RetainedTranscript { index: i, ambiguities }),
        }
    }

    if retained.is_empty() {
        return Err(NormalizeError::NoTranscriptsRemain {
            gene: gene.id.clone(),
        });
    }

    info!(
        "Filtered {}: keeping {}/{} transcripts",
        gene.label(),
        retained.len(),
        transcripts.len()
    );

    Ok(FilterResult { retained, filtered })
}

fn filter_canonical_only(gene: &GeneRecord) -> Result<FilterResult> {
    let mut retained = Vec::new();
    let mut filtered = Vec::new();

    for (i, tx) in gene.transcripts.iter().enumerate() {
        if tx.canonical {
            retained.push(RetainedTranscript {
                index: i,
                ambiguities: Vec::new(),
            });
        } else {
            filtered.push(FilteredTranscript {
                index: i,
                reason: FilterReason::NonCanonical,
            });
        }
    }

    if retained.is_empty() {
        return Err(NormalizeError::NoTranscriptsRemain {
            gene: gene.id.clone(),
        });
    }

    info!(
        "Filtered {} (canonical-only): keeping {}/{} transcripts",
        gene.label(),
        retained.len(),
        gene.transcripts.len()
    );

    Ok(FilterResult { retained, filtered })
}

fn profile_of(tx: &TranscriptRecord, map: &ExonMap) -> Result<Profile> {
    let mut slots = BTreeSet::new();
    for exon in &tx.exons {
        let slot = map.slot_of(&exon.interval).ok_or_else(|| {
            NormalizeError::malformed(
                format!("transcript {}", tx.id),
                format!(
                    "exon {}-{} is not in the gene exon map",
                    exon.interval.start, exon.interval.end
                ),
            )
        })?;
        slots.insert(slot);
    }
    let span = tx.span().ok_or_else(|| {
        NormalizeError::malformed(format!("transcript {}", tx.id), "transcript has no exons")
    })?;
    Ok(Profile { slots, span })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{RawExon, Strand};
    use crate::stages::exon_map::build_exon_map;

    fn tx(id: &str, canonical: bool, exons: &[(u64, u64)]) -> TranscriptRecord {
        TranscriptRecord {
            id: id.to_string(),
            name: None,
            canonical,
            exons: exons
                .iter()
                .map(|&(start, end)| RawExon {
                    interval: GenomicInterval::new(start, end),
                    strand: Strand::Forward,
                })
                .collect(),
            cds: None,
        }
    }

    fn gene(transcripts: Vec<TranscriptRecord>) -> GeneRecord {
        GeneRecord {
            id: "G1".to_string(),
            symbol: None,
            species: "danio_rerio".to_string(),
            contig: "1".to_string(),
            interval: GenomicInterval::new(0, 10_000),
            strand: Strand::Forward,
            transcripts,
        }
    }

    fn run(g: &GeneRecord, canonical_only: bool) -> FilterResult {
        let map = build_exon_map(g).unwrap();
        filter_transcripts(g, &map, &FilterConfig { canonical_only }).unwrap()
    }

    fn retained_ids<'a>(g: &'a GeneRecord, result: &FilterResult) -> Vec<&'a str> {
        result
            .retained
            .iter()
            .map(|r| g.transcripts[r.index].id.as_str())
            .collect()
    }

    #[test]
    fn test_exon_subset_is_filtered() {
        // A uses slots {1,2,4}, B uses {1,2,3,4}
        let g = gene(vec![
            tx("A", false, &[(100, 200), (300, 400), (700, 800)]),
            tx("B", false, &[(100, 200), (300, 400), (500, 600), (700, 800)]),
        ]);

        let result = run(&g, false);

        assert_eq!(retained_ids(&g, &result), vec!["B"]);
        assert_eq!(result.filtered.len(), 1);
        assert_eq!(
            result.filtered[0].reason,
            FilterReason::ExonSubset {
                superset: "B".to_string()
            }
        );
    }

    #[test]
    fn test_canonical_only_overrides_other_rules() {
        // B would survive the subset rules on its own merits.
        let g = gene(vec![
            tx("A", true, &[(100, 200), (300, 400)]),
            tx("B", false, &[(500, 600), (700, 800)]),
        ]);

        let result = run(&g, true);

        assert_eq!(retained_ids(&g, &result), vec!["A"]);
        assert_eq!(result.filtered[0].reason, FilterReason::NonCanonical);
    }

    #[test]
    fn test_canonical_only_with_no_canonical_fails() {
        let g = gene(vec![
            tx("A", false, &[(100, 200)]),
            tx("B", false, &[(300, 400)]),
        ]);
        let map = build_exon_map(&g).unwrap();

        let err = filter_transcripts(&g, &map, &FilterConfig { canonical_only: true }).unwrap_err();
        assert!(matches!(err, NormalizeError::NoTranscriptsRemain { .. }));
    }

    #[test]
    fn test_identical_sets_without_canonical_keep_both_flagged() {
        let g = gene(vec![
            tx("A", false, &[(100, 200), (300, 400)]),
            tx("B", false, &[(100, 200), (300, 400)]),
        ]);

        let result = run(&g, false);

        assert_eq!(retained_ids(&g, &result), vec!["A", "B"]);
        assert_eq!(
            result.retained[0].ambiguities,
            vec![Ambiguity::IdenticalExonSet {
                partner: "B".to_string()
            }]
        );
        assert_eq!(
            result.retained[1].ambiguities,
            vec![Ambiguity::IdenticalExonSet {
                partner: "A".to_string()
            }]
        );
    }

    #[test]
    fn test_identical_sets_break_tie_toward_canonical() {
        let g = gene(vec![
            tx("A", true, &[(100, 200), (300, 400)]),
            tx("B", false, &[(100, 200), (300, 400)]),
        ]);

        let result = run(&g, false);

        assert_eq!(retained_ids(&g, &result), vec!["A"]);
        assert!(result.retained[0].ambiguities.is_empty());
        assert_eq!(
            result.filtered[0].reason,
            FilterReason::ExonSubset {
                superset: "A".to_string()
            }
        );
    }

    #[test]
    fn test_canonical_subset_is_protected() {
        // A is a proper slot subset of B, but A is canonical and B is not.
        let g = gene(vec![
            tx("A", true, &[(100, 200), (300, 400)]),
            tx("B", false, &[(100, 200), (300, 400), (500, 600)]),
        ]);

        let result = run(&g, false);

        assert_eq!(retained_ids(&g, &result), vec!["A", "B"]);
        assert!(result.filtered.is_empty());
    }

    #[test]
    fn test_genomic_containment_without_subset_is_ambiguous() {
        // A's single exon has its own coordinates, so no slot-subset
        // relation, but A's span sits inside B's with fewer slots.
        let g = gene(vec![
            tx("A", false, &[(210, 290)]),
            tx("B", false, &[(100, 200), (300, 400), (500, 600)]),
        ]);

        let result = run(&g, false);

        assert_eq!(retained_ids(&g, &result), vec!["A", "B"]);
        let a = &result.retained[0];
        assert_eq!(
            a.ambiguities,
            vec![Ambiguity::GenomicContainment {
                container: "B".to_string()
            }]
        );
        assert!(result.retained[1].ambiguities.is_empty());
    }

    #[test]
    fn test_single_transcript_bypasses_filtering() {
        let g = gene(vec![tx("A", false, &[(100, 200)])]);

        // Even in canonical-only mode a lone transcript is kept.
        let result = run(&g, true);
        assert_eq!(retained_ids(&g, &result), vec!["A"]);
        assert!(result.filtered.is_empty());
    }

    #[test]
    fn test_subset_chain_keeps_only_the_superset() {
        let g = gene(vec![
            tx("A", false, &[(100, 200)]),
            tx("B", false, &[(100, 200), (300, 400)]),
            tx("C", false, &[(100, 200), (300, 400), (500, 600)]),
        ]);

        let result = run(&g, false);

        assert_eq!(retained_ids(&g, &result), vec!["C"]);
        assert_eq!(result.filtered.len(), 2);
    }
}
