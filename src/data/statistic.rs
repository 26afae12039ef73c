use super::errors::DataError;
use ndarray::{Array1, Array2, ArrayD, IxDyn};
use ndarray_stats::QuantileExt;

/// Reduction statistics supported by `Data::compute_statistic`.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Statistic {
    Minimum,
    Maximum,
    Mean,
    Median,
    Sum,
    Percentile(f64),
}

impl Statistic {
    pub fn parse(name: &str) -> Result<Self, DataError> {
        match name {
            "minimum" => Ok(Statistic::Minimum),
            "maximum" => Ok(Statistic::Maximum),
            "mean" => Ok(Statistic::Mean),
            "median" => Ok(Statistic::Median),
            "sum" => Ok(Statistic::Sum),
            "percentile" => Ok(Statistic::Percentile(50.)),
            _ => Err(DataError::UnknownStatistic(name.to_string())),
        }
    }

    /// Reduces a set of finite values to a scalar. NaN inputs are expected
    /// to have been filtered out already; an empty set yields NaN.
    pub fn reduce(&self, values: Vec<f64>) -> f64 {
        if values.is_empty() {
            return f64::NAN;
        }
        let arr = Array1::from(values);
        match self {
            Statistic::Minimum => arr.min().map(|v| *v).unwrap_or(f64::NAN),
            Statistic::Maximum => arr.max().map(|v| *v).unwrap_or(f64::NAN),
            Statistic::Mean => arr.mean().unwrap_or(f64::NAN),
            Statistic::Sum => arr.sum(),
            Statistic::Median => percentile(arr.to_vec(), 50.),
            Statistic::Percentile(q) => percentile(arr.to_vec(), *q),
        }
    }
}

/// Linear-interpolation percentile, q in [0, 100].
fn percentile(mut values: Vec<f64>, q: f64) -> f64 {
    values.sort_by(|a, b| a.partial_cmp(b).unwrap());
    let n = values.len();
    if n == 1 {
        return values[0];
    }
    let rank = q.clamp(0., 100.) / 100. * (n - 1) as f64;
    let lo = rank.floor() as usize;
    let hi = rank.ceil() as usize;
    let frac = rank - lo as f64;
    values[lo] + frac * (values[hi] - values[lo])
}

/// Moves the collapse axes to the back and flattens, yielding one row per
/// retained element and the retained shape. Shared by value reduction and
/// mask reduction so both collapse the same way.
pub(crate) fn flatten_for_reduction<A: Clone>(
    values: &ArrayD<A>,
    axes: &[usize],
) -> (Array2<A>, Vec<usize>) {
    let ndim = values.ndim();
    let kept: Vec<usize> = (0..ndim).filter(|i| !axes.contains(i)).collect();
    let mut order = kept.clone();
    order.extend(axes.iter().cloned());
    let kept_shape: Vec<usize> = kept.iter().map(|&i| values.shape()[i]).collect();
    let n_kept: usize = kept_shape.iter().product();
    let n_collapse: usize = axes.iter().map(|&i| values.shape()[i]).product();
    let flat = values
        .clone()
        .permuted_axes(IxDyn(&order))
        .as_standard_layout()
        .into_owned()
        .into_shape((n_kept, n_collapse))
        .unwrap();
    (flat, kept_shape)
}

/// Logical AND over the given axes; the mask analogue of a statistic
/// reduction.
pub fn reduce_logical_all(mask: &ArrayD<bool>, axes: &[usize]) -> ArrayD<bool> {
    let (flat, kept_shape) = flatten_for_reduction(mask, axes);
    let reduced: Vec<bool> = flat
        .rows()
        .into_iter()
        .map(|row| row.iter().all(|&v| v))
        .collect();
    ArrayD::from_shape_vec(IxDyn(&kept_shape), reduced).unwrap()
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::array;

    #[test]
    fn test_parse_names() {
        assert_eq!(Statistic::parse("mean").unwrap(), Statistic::Mean);
        assert_eq!(Statistic::parse("sum").unwrap(), Statistic::Sum);
        assert_eq!(
            Statistic::parse("percentile").unwrap(),
            Statistic::Percentile(50.)
        );
        assert!(matches!(
            Statistic::parse("mode").unwrap_err(),
            DataError::UnknownStatistic(_)
        ));
    }

    #[test]
    fn test_reduce() {
        let values = vec![3., 1., 4., 1., 5.];
        assert_eq!(Statistic::Minimum.reduce(values.clone()), 1.);
        assert_eq!(Statistic::Maximum.reduce(values.clone()), 5.);
        assert_eq!(Statistic::Sum.reduce(values.clone()), 14.);
        assert_eq!(Statistic::Mean.reduce(values.clone()), 2.8);
        assert_eq!(Statistic::Median.reduce(values.clone()), 3.);
        assert_eq!(Statistic::Percentile(25.).reduce(values), 1.);
    }

    #[test]
    fn test_reduce_empty_is_nan() {
        assert!(Statistic::Mean.reduce(vec![]).is_nan());
        assert!(Statistic::Minimum.reduce(vec![]).is_nan());
    }

    #[test]
    fn test_reduce_logical_all() {
        let mask = array![[true, false], [true, true]].into_dyn();
        let collapsed = reduce_logical_all(&mask, &[0]);
        assert_eq!(collapsed, array![true, false].into_dyn());
        let collapsed = reduce_logical_all(&mask, &[1]);
        assert_eq!(collapsed, array![false, true].into_dyn());
    }
}
