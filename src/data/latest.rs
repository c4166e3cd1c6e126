use std::collections::HashMap;

use super::model::{id_key, MeasurementRow};

/// For every distinct `file_number`, the index of the row with the highest
/// `cycle_number`.
///
/// Ties on the maximum keep the first matching row in source order. The
/// result lists floats in the order they first appear.
pub fn latest_cycle_index(rows: &[MeasurementRow]) -> Vec<usize> {
    let mut slot_of: HashMap<u64, usize> = HashMap::new();
    let mut best: Vec<usize> = Vec::new();

    for (idx, row) in rows.iter().enumerate() {
        match slot_of.get(&id_key(row.file_number)) {
            Some(&slot) => {
                // Strictly greater: an equal cycle later in the file never wins.
                if row.cycle_number > rows[best[slot]].cycle_number {
                    best[slot] = idx;
                }
            }
            None => {
                slot_of.insert(id_key(row.file_number), best.len());
                best.push(idx);
            }
        }
    }

    best
}
