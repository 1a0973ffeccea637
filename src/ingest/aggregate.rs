//! Dataset-level and per-type statistics
//!
//! Sums are accumulated as `f64` in file order and every derived value
//! (mean, min, max) is rounded once, half-to-even at two decimals, when the
//! accumulator is finished. Type summaries keep the order in which each type
//! first appears in the file.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use super::record::EquipmentRecord;

/// Decimal places kept for persisted and displayed statistics
pub const DECIMAL_PLACES: i32 = 2;

/// Magnitude from which an `f64` has no fractional digits left at
/// [`DECIMAL_PLACES`] (2^52 / 100)
const EXACT_MAGNITUDE: f64 = 4_503_599_627_370_496.0 / 100.0;

/// Round half-to-even at [`DECIMAL_PLACES`]
pub fn round_stat(value: f64) -> f64 {
    if !value.is_finite() || value.abs() >= EXACT_MAGNITUDE {
        return value;
    }
    let scale = 10f64.powi(DECIMAL_PLACES);
    let rounded = (value * scale).round_ties_even() / scale;
    // Normalise -0.0 so identical inputs serialize identically
    if rounded == 0.0 {
        0.0
    } else {
        rounded
    }
}

/// Mean, min and max of one numeric field
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct FieldStats {
    pub mean: f64,
    pub min: f64,
    pub max: f64,
}

#[derive(Clone, Copy, Debug)]
struct FieldAccumulator {
    count: usize,
    sum: f64,
    /// Incremental mean, used only once `sum` has overflowed
    running_mean: f64,
    min: f64,
    max: f64,
}

impl FieldAccumulator {
    fn new() -> Self {
        Self {
            count: 0,
            sum: 0.0,
            running_mean: 0.0,
            min: f64::INFINITY,
            max: f64::NEG_INFINITY,
        }
    }

    fn push(&mut self, value: f64) {
        self.count += 1;
        self.sum += value;
        let n = self.count as f64;
        self.running_mean = self.running_mean - self.running_mean / n + value / n;
        self.min = self.min.min(value);
        self.max = self.max.max(value);
    }

    fn finish(&self) -> Option<FieldStats> {
        (self.count > 0).then(|| self.finish_nonempty())
    }

    /// Statistics of an accumulator that has seen at least one value
    fn finish_nonempty(&self) -> FieldStats {
        let mean = if self.sum.is_finite() {
            self.sum / self.count as f64
        } else {
            self.running_mean
        };
        FieldStats {
            mean: round_stat(mean.clamp(self.min, self.max)),
            min: round_stat(self.min),
            max: round_stat(self.max),
        }
    }
}

#[derive(Clone, Copy, Debug)]
struct ReadingsAccumulator {
    fields: [FieldAccumulator; 3],
}

impl ReadingsAccumulator {
    fn new() -> Self {
        Self {
            fields: [FieldAccumulator::new(); 3],
        }
    }

    fn push(&mut self, record: &EquipmentRecord) {
        let [flowrate, pressure, temperature] = &mut self.fields;
        flowrate.push(record.flowrate);
        pressure.push(record.pressure);
        temperature.push(record.temperature);
    }

    fn count(&self) -> usize {
        self.fields[0].count
    }
}

/// Statistics over every record of a dataset.
///
/// The per-field statistics are `None` when the dataset has no records.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct DatasetStats {
    pub total_count: usize,
    pub flowrate: Option<FieldStats>,
    pub pressure: Option<FieldStats>,
    pub temperature: Option<FieldStats>,
}

impl DatasetStats {
    pub fn avg_flowrate(&self) -> Option<f64> {
        self.flowrate.map(|s| s.mean)
    }

    pub fn avg_pressure(&self) -> Option<f64> {
        self.pressure.map(|s| s.mean)
    }

    pub fn avg_temperature(&self) -> Option<f64> {
        self.temperature.map(|s| s.mean)
    }
}

/// Statistics over the records of one equipment type
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct TypeSummary {
    pub equipment_type: String,
    pub count: usize,
    pub flowrate: FieldStats,
    pub pressure: FieldStats,
    pub temperature: FieldStats,
}

/// Output of [`aggregate`]
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Aggregate {
    pub dataset: DatasetStats,
    /// Keyed by type, in first-seen order
    pub types: IndexMap<String, TypeSummary>,
}

impl Aggregate {
    /// Record count per equipment type, in first-seen order
    pub fn type_distribution(&self) -> IndexMap<String, usize> {
        self.types
            .iter()
            .map(|(name, summary)| (name.clone(), summary.count))
            .collect()
    }
}

/// Compute dataset and per-type statistics
pub fn aggregate(records: &[EquipmentRecord]) -> Aggregate {
    let mut overall = ReadingsAccumulator::new();
    let mut per_type: IndexMap<&str, ReadingsAccumulator> = IndexMap::new();

    for record in records {
        overall.push(record);
        per_type
            .entry(record.equipment_type.as_str())
            .or_insert_with(ReadingsAccumulator::new)
            .push(record);
    }

    let [flowrate, pressure, temperature] = overall.fields.map(|f| f.finish());
    let dataset = DatasetStats {
        total_count: overall.count(),
        flowrate,
        pressure,
        temperature,
    };

    let types = per_type
        .into_iter()
        .map(|(name, acc)| {
            let [flowrate, pressure, temperature] = acc.fields.map(|f| f.finish_nonempty());
            (
                name.to_string(),
                TypeSummary {
                    equipment_type: name.to_string(),
                    count: acc.count(),
                    flowrate,
                    pressure,
                    temperature,
                },
            )
        })
        .collect();

    Aggregate { dataset, types }
}
