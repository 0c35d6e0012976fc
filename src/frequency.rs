use std::collections::HashMap;

use crate::{
    classify::FieldKind,
    data::Column,
    error::{ProfileError, Result},
    report::{Bucket, FieldProfile},
};

/// Value counts for a discrete column, in first-discovery order.
///
/// Missing cells are counted under [`crate::data::MISSING_LABEL`], so the
/// counts always sum to the column's row count.
pub fn profile_discrete(column: &Column) -> Result<FieldProfile> {
    if column.is_empty() {
        return Err(ProfileError::EmptyColumn {
            field: column.name.clone(),
        });
    }
    let mut counts = FrequencyAccumulator::default();
    for row in 0..column.len() {
        counts.ingest(column.data.label_at(row));
    }
    Ok(FieldProfile {
        name: column.name.clone(),
        kind: FieldKind::Discrete,
        row_count: counts.total,
        buckets: counts.into_buckets(),
    })
}

#[derive(Debug, Default)]
struct FrequencyAccumulator {
    positions: HashMap<String, usize>,
    counts: Vec<(String, usize)>,
    total: usize,
}

impl FrequencyAccumulator {
    fn ingest(&mut self, label: String) {
        self.total += 1;
        match self.positions.get(&label) {
            Some(&position) => self.counts[position].1 += 1,
            None => {
                self.positions.insert(label.clone(), self.counts.len());
                self.counts.push((label, 1));
            }
        }
    }

    fn into_buckets(self) -> Vec<Bucket> {
        self.counts
            .into_iter()
            .map(|(label, count)| Bucket::counted(label, count))
            .collect()
    }
}
