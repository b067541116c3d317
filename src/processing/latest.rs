use crate::types::latest::{LatestMeasurements, LatestReading};
use crate::types::measurement_table::MeasurementTable;
use std::collections::btree_map::Entry;
use std::collections::BTreeMap;

/// Picks, for every parameter, the row with the greatest timestamp.
///
/// The table doesn't need to be sorted. When several rows of a parameter share
/// the greatest timestamp, the first of them in table order is kept.
pub fn latest_per_parameter(table: &MeasurementTable) -> LatestMeasurements {
    let mut readings: BTreeMap<String, LatestReading> = BTreeMap::new();

    for row in table {
        match readings.entry(row.parameter.clone()) {
            Entry::Vacant(entry) => {
                entry.insert(LatestReading {
                    value: row.value,
                    unit: row.unit.clone(),
                    timestamp: row.timestamp,
                });
            }
            // Strictly newer only, so the first of equal timestamps wins.
            Entry::Occupied(mut entry) if row.timestamp > entry.get().timestamp => {
                entry.insert(LatestReading {
                    value: row.value,
                    unit: row.unit.clone(),
                    timestamp: row.timestamp,
                });
            }
            Entry::Occupied(_) => {}
        }
    }

    LatestMeasurements::from_map(readings)
}
