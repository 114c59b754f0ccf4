use crate::precision;
use crate::resample;

/// Column-oriented bucket table handed to the rendering side.
///
/// Every bucket occupies one slot in every column. Empty buckets carry `NaN` in the
/// numeric columns and `0` in `count`.
#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
pub struct ColumnTable {
    pub precision: precision::Precision,
    pub time_left: Vec<chrono::NaiveDateTime>,
    pub time_right: Vec<chrono::NaiveDateTime>,
    pub average: Vec<f64>,
    pub minimum: Vec<f64>,
    pub maximum: Vec<f64>,
    pub count: Vec<usize>,
    pub excluded: Vec<usize>,
}

/// One row of a `ColumnTable`, borrowed out for printing.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TableRow {
    pub time_left: chrono::NaiveDateTime,
    pub time_right: chrono::NaiveDateTime,
    pub average: f64,
    pub minimum: f64,
    pub maximum: f64,
    pub count: usize,
    pub excluded: usize,
}

impl TableRow {
    pub fn is_empty(&self) -> bool {
        self.count == 0
    }
}

/// Lays bucket records out column by column. No values are computed here.
///
/// # Arguments
/// * `records` - Aggregator output, in bucket order.
/// * `precision` - Carried along as the display hint.
///
/// # Returns
/// * `ColumnTable` - One slot per record.
pub fn build(records: &[resample::BucketRecord], precision: precision::Precision) -> ColumnTable {
    let n = records.len();
    let mut table = ColumnTable {
        precision,
        time_left: Vec::with_capacity(n),
        time_right: Vec::with_capacity(n),
        average: Vec::with_capacity(n),
        minimum: Vec::with_capacity(n),
        maximum: Vec::with_capacity(n),
        count: Vec::with_capacity(n),
        excluded: Vec::with_capacity(n),
    };

    for record in records {
        table.time_left.push(record.bucket.left);
        table.time_right.push(record.bucket.right);
        match record.summary {
            resample::Summary::Stats {
                average,
                minimum,
                maximum,
                count,
            } => {
                table.average.push(average);
                table.minimum.push(minimum);
                table.maximum.push(maximum);
                table.count.push(count);
            }
            resample::Summary::Empty => {
                table.average.push(f64::NAN);
                table.minimum.push(f64::NAN);
                table.maximum.push(f64::NAN);
                table.count.push(0);
            }
        }
        table.excluded.push(record.excluded);
    }

    table
}

impl ColumnTable {
    pub fn len(&self) -> usize {
        self.time_left.len()
    }

    pub fn row(&self, i: usize) -> Option<TableRow> {
        if i >= self.len() {
            return None;
        }
        Some(TableRow {
            time_left: self.time_left[i],
            time_right: self.time_right[i],
            average: self.average[i],
            minimum: self.minimum[i],
            maximum: self.maximum[i],
            count: self.count[i],
            excluded: self.excluded[i],
        })
    }

    pub fn rows(&self) -> impl Iterator<Item = TableRow> + '_ {
        (0..self.len()).filter_map(move |i| self.row(i))
    }

    /// Left-edge label for row `i`, formatted with the precision's display hint.
    pub fn label(&self, i: usize) -> Option<String> {
        self.time_left
            .get(i)
            .map(|ts| ts.format(self.precision.display_format()).to_string())
    }

    pub fn empty_buckets(&self) -> usize {
        self.count.iter().filter(|&&c| c == 0).count()
    }

    pub fn samples_used(&self) -> usize {
        self.count.iter().sum()
    }

    pub fn samples_excluded(&self) -> usize {
        self.excluded.iter().sum()
    }
}

#[cfg(test)]
impl ColumnTable {
    /// Bitwise comparison, treating `NaN` slots as equal to each other.
    pub fn bit_eq(&self, other: &ColumnTable) -> bool {
        fn bits(v: &[f64]) -> Vec<u64> {
            v.iter().map(|x| x.to_bits()).collect()
        }
        self.precision == other.precision
            && self.time_left == other.time_left
            && self.time_right == other.time_right
            && bits(&self.average) == bits(&other.average)
            && bits(&self.minimum) == bits(&other.minimum)
            && bits(&self.maximum) == bits(&other.maximum)
            && self.count == other.count
            && self.excluded == other.excluded
    }
}
