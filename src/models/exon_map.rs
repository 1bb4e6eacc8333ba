use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use super::GenomicInterval;

/// One entry of the gene-wide exon catalog
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExonSlot {
    /// 1-based index, strictly increasing in 5'->3' genomic order
    pub index: u32,
    pub interval: GenomicInterval,
}

/// Gene-wide exon catalog: every distinct exon interval across all
/// transcripts of one gene, numbered in 5'->3' order on the gene's strand.
///
/// Two raw exons from different transcripts share a slot iff their genomic
/// coordinates are identical. Built once per gene and never mutated; every
/// classifier pass reads the same numbering.
#[derive(Debug, Clone)]
pub struct ExonMap {
    slots: Vec<ExonSlot>,
    by_interval: HashMap<GenomicInterval, u32>,
}

impl ExonMap {
    pub(crate) fn new(slots: Vec<ExonSlot>) -> Self {
        let by_interval = slots.iter().map(|s| (s.interval, s.index)).collect();
        Self { slots, by_interval }
    }

    /// Slot index for an exon with exactly these coordinates
    pub fn slot_of(&self, interval: &GenomicInterval) -> Option<u32> {
        self.by_interval.get(interval).copied()
    }

    /// Slots in 5'->3' order
    pub fn slots(&self) -> &[ExonSlot] {
        &self.slots
    }

    pub fn len(&self) -> usize {
        self.slots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_slot_lookup_is_exact() {
        let map = ExonMap::new(vec![
            ExonSlot {
                index: 1,
                interval: GenomicInterval::new(100, 300),
            },
            ExonSlot {
                index: 2,
                interval: GenomicInterval::new(400, 600),
            },
        ]);

        assert_eq!(map.slot_of(&GenomicInterval::new(100, 300)), Some(1));
        assert_eq!(map.slot_of(&GenomicInterval::new(400, 600)), Some(2));
        // overlapping but not identical coordinates are a different exon
        assert_eq!(map.slot_of(&GenomicInterval::new(100, 299)), None);
        assert_eq!(map.len(), 2);
    }
}
