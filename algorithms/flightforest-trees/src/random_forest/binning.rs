//! Quantile discretization of continuous features
//!
use ndarray::{Array2, ArrayBase, Axis, Data, Ix2};
use serde::{Deserialize, Serialize};

/// Upper bin edges of every feature
///
/// A value `v` of feature `f` falls into the first bin `k` with `v <= thresholds[f][k]`, or into
/// the last bin if it exceeds every threshold. A feature with `k` thresholds thus has `k + 1` bins.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct FeatureBins {
    thresholds: Vec<Vec<f64>>,
}

impl FeatureBins {
    /// Finds at most `max_bins` bins for every column of `records`
    ///
    /// Columns with at most `max_bins` distinct values get one bin per value, split halfway
    /// between neighbouring values. Other columns are split at evenly spaced quantiles.
    pub fn fit<D: Data<Elem = f64>>(records: &ArrayBase<D, Ix2>, max_bins: usize) -> Self {
        let max_bins = max_bins.max(2);
        let thresholds = records
            .axis_iter(Axis(1))
            .map(|column| {
                let mut sorted = column.to_vec();
                sorted.sort_by(|a, b| a.total_cmp(b));

                let mut distinct = sorted.clone();
                distinct.dedup();

                if distinct.len() <= max_bins {
                    distinct
                        .windows(2)
                        .map(|pair| (pair[0] + pair[1]) / 2.0)
                        .collect()
                } else {
                    let n = sorted.len();
                    let mut edges = (1..max_bins)
                        .map(|k| sorted[(k * n) / max_bins])
                        .filter(|edge| *edge < distinct[distinct.len() - 1])
                        .collect::<Vec<_>>();
                    edges.dedup();
                    edges
                }
            })
            .collect();

        FeatureBins { thresholds }
    }

    pub fn num_features(&self) -> usize {
        self.thresholds.len()
    }

    /// Number of bins of `feature`
    pub fn num_bins(&self, feature: usize) -> usize {
        self.thresholds[feature].len() + 1
    }

    /// Bin of `value` in `feature`
    pub fn bin(&self, feature: usize, value: f64) -> usize {
        self.thresholds[feature].partition_point(|edge| *edge < value)
    }

    /// Raw threshold corresponding to a split between bins, given in bin units
    ///
    /// A tree sends every bin strictly below `split` left. The last of those bins is
    /// `ceil(split) - 1`, so every value at most its upper edge goes left. A split on an integer
    /// happens when the bins in between were missing from the sample the tree was fit on.
    pub fn threshold(&self, feature: usize, split: f64) -> Option<f64> {
        if split <= 0.0 {
            return None;
        }
        self.thresholds[feature]
            .get(split.ceil() as usize - 1)
            .copied()
    }

    /// Replaces every value of `records` by the index of its bin
    pub fn transform<D: Data<Elem = f64>>(&self, records: &ArrayBase<D, Ix2>) -> Array2<f64> {
        let mut binned = Array2::zeros(records.raw_dim());
        for ((row, feature), value) in records.indexed_iter() {
            binned[(row, feature)] = self.bin(feature, *value) as f64;
        }

        binned
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;
    use ndarray::{array, Array};

    #[test]
    fn few_values_get_midpoint_edges() {
        let records = array![[1., 0.], [3., 0.], [3., 1.], [7., 1.]];
        let bins = FeatureBins::fit(&records, 32);

        assert_eq!(bins.num_bins(0), 3);
        assert_eq!(bins.num_bins(1), 2);
        assert_eq!(bins.threshold(0, 0.5), Some(2.0));
        assert_eq!(bins.threshold(0, 1.5), Some(5.0));
        assert_eq!(bins.threshold(0, 2.5), None);
        assert_eq!(bins.threshold(0, 0.0), None);

        let binned = bins.transform(&records);
        assert_abs_diff_eq!(binned, array![[0., 0.], [1., 0.], [1., 1.], [2., 1.]]);
    }

    #[test]
    fn split_over_a_missing_bin_ends_below_it() {
        let records = array![[0.], [1.], [2.]];
        let bins = FeatureBins::fit(&records, 32);

        // bins 0 and 2 only, the tree splits at 1.0 and sends bin 1 right
        assert_eq!(bins.threshold(0, 1.0), Some(0.5));
        assert_eq!(bins.threshold(0, 2.0), Some(1.5));
        assert!(bins.bin(0, 1.0) as f64 >= 1.0);
        assert!(1.0 > bins.threshold(0, 1.0).unwrap());
    }

    #[test]
    fn many_values_are_capped() {
        let records = Array::from_shape_vec((100, 1), (0..100).map(|x| x as f64).collect())
            .unwrap();
        let bins = FeatureBins::fit(&records, 4);

        assert_eq!(bins.num_bins(0), 4);
        assert_eq!(bins.threshold(0, 0.5), Some(25.0));
        assert_eq!(bins.bin(0, 25.0), 0);
        assert_eq!(bins.bin(0, 26.0), 1);
        assert_eq!(bins.bin(0, 1000.0), 3);
        assert_eq!(bins.bin(0, -5.0), 0);
    }

    #[test]
    fn skewed_column_drops_duplicate_edges() {
        let mut values = vec![0.0; 90];
        values.extend((1..=10).map(|x| x as f64));
        let records = Array::from_shape_vec((100, 1), values).unwrap();

        let bins = FeatureBins::fit(&records, 4);
        assert!(bins.num_bins(0) <= 4);
        assert_eq!(bins.bin(0, 0.0), 0);
        assert!(bins.bin(0, 10.0) > 0);
    }

    #[test]
    fn constant_column_has_single_bin() {
        let records = array![[5.], [5.], [5.]];
        let bins = FeatureBins::fit(&records, 32);

        assert_eq!(bins.num_bins(0), 1);
        assert_eq!(bins.transform(&records), array![[0.], [0.], [0.]]);
    }
}
