use super::types::{Record, StoreStatistics};
use std::collections::{BTreeMap, BTreeSet};

/// Running mean/variance using Welford's update, plus extremes.
#[derive(Debug)]
struct StoreAccumulator {
    count: usize,
    mean: f64,
    m2: f64,
    min: f64,
    max: f64,
    first: chrono::NaiveDate,
    last: chrono::NaiveDate,
}

impl StoreAccumulator {
    fn new(record: &Record) -> Self {
        Self {
            count: 1,
            mean: record.stock,
            m2: 0.0,
            min: record.stock,
            max: record.stock,
            first: record.date,
            last: record.date,
        }
    }

    fn add(&mut self, record: &Record) {
        self.count += 1;
        let delta = record.stock - self.mean;
        self.mean += delta / self.count as f64;
        self.m2 += delta * (record.stock - self.mean);
        self.min = self.min.min(record.stock);
        self.max = self.max.max(record.stock);
        self.first = self.first.min(record.date);
        self.last = self.last.max(record.date);
    }

    fn finish(self, store_id: u32) -> StoreStatistics {
        let std_dev = if self.count > 1 {
            (self.m2 / (self.count - 1) as f64).sqrt()
        } else {
            f64::NAN
        };
        StoreStatistics {
            store_id,
            count: self.count,
            mean: self.mean,
            min: self.min,
            max: self.max,
            std_dev,
            date_range: (self.first, self.last),
        }
    }
}

/// Groups records by store and aggregates `stock` and `date` per group.
///
/// Stores are keyed in ascending id order. An empty slice gives an empty map.
pub fn group_by_store(records: &[Record]) -> BTreeMap<u32, StoreStatistics> {
    let mut groups: BTreeMap<u32, StoreAccumulator> = BTreeMap::new();
    for record in records {
        groups
            .entry(record.store_id)
            .and_modify(|acc| acc.add(record))
            .or_insert_with(|| StoreAccumulator::new(record));
    }

    groups
        .into_iter()
        .map(|(id, acc)| {
            let stats = acc.finish(id);
            if stats.count < 2 {
                tracing::warn!(store_id = id, "store has a single observation, std dev undefined");
            }
            (id, stats)
        })
        .collect()
}

/// Number of distinct stores in the dataset.
pub fn store_count(records: &[Record]) -> usize {
    records
        .iter()
        .map(|r| r.store_id)
        .collect::<BTreeSet<_>>()
        .len()
}

/// Stock values of one store, in input order.
pub fn stock_values(records: &[Record], store_id: u32) -> Vec<f64> {
    records
        .iter()
        .filter(|r| r.store_id == store_id)
        .map(|r| r.stock)
        .collect()
}
