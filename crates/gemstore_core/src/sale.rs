use crate::ItemRecord;

/// Keeps only discounted records, in their original order.
pub fn filter_discounted(records: &[ItemRecord]) -> Vec<ItemRecord> {
    records
        .iter()
        .filter(|record| record.is_discounted)
        .cloned()
        .collect()
}
