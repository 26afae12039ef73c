pub use errors::DataError;
pub use statistic::{reduce_logical_all, Statistic};

pub mod errors;
pub mod statistic;

use crate::coords::CoordinateSystem;
use ndarray::ArrayD;
use statistic::flatten_for_reduction;
use std::collections::BTreeMap;

/// Open metadata value. Containers and spectra carry a string-keyed map of
/// these.
#[derive(Clone, Debug, PartialEq)]
pub enum MetaValue {
    Str(String),
    Int(i64),
    Float(f64),
    Bool(bool),
}

impl MetaValue {
    pub fn as_str(&self) -> Option<&str> {
        match self {
            MetaValue::Str(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_int(&self) -> Option<i64> {
        match self {
            MetaValue::Int(i) => Some(*i),
            _ => None,
        }
    }
}

impl From<&str> for MetaValue {
    fn from(value: &str) -> Self {
        MetaValue::Str(value.to_string())
    }
}

impl From<i64> for MetaValue {
    fn from(value: i64) -> Self {
        MetaValue::Int(value)
    }
}

impl From<f64> for MetaValue {
    fn from(value: f64) -> Self {
        MetaValue::Float(value)
    }
}

impl From<bool> for MetaValue {
    fn from(value: bool) -> Self {
        MetaValue::Bool(value)
    }
}

pub type Meta = BTreeMap<String, MetaValue>;

/// Opaque handle to a component inside a `Data` object.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ComponentId(usize);

/// A named attribute: an N-D value array plus a unit string.
#[derive(Clone, Debug)]
pub struct Component {
    label: String,
    values: ArrayD<f64>,
    unit: String,
}

impl Component {
    pub fn label(&self) -> &str {
        &self.label
    }

    pub fn values(&self) -> &ArrayD<f64> {
        &self.values
    }

    pub fn unit(&self) -> &str {
        &self.unit
    }
}

/// Boolean predicate over a data object's elements; true marks an element
/// as belonging to the subset.
#[derive(Clone, Debug)]
pub enum SubsetState {
    /// Explicit per-element membership mask.
    Mask(ArrayD<bool>),
    /// Elements whose component value lies in `[lo, hi]`.
    Range {
        component: String,
        lo: f64,
        hi: f64,
    },
}

/// Generic multi-dimensional labeled-data container: insertion-ordered
/// named components, an optional coordinate system and open metadata.
#[derive(Clone, Debug)]
pub struct Data {
    components: Vec<Component>,
    coords: Option<CoordinateSystem>,
    meta: Meta,
}

impl Data {
    pub fn new(coords: Option<CoordinateSystem>) -> Self {
        Self {
            components: Vec::new(),
            coords,
            meta: Meta::new(),
        }
    }

    pub fn add_component(
        &mut self,
        label: &str,
        values: ArrayD<f64>,
        unit: &str,
    ) -> Result<ComponentId, DataError> {
        if self.components.iter().any(|c| c.label == label) {
            return Err(DataError::DuplicateComponent(label.to_string()));
        }
        if let Some(first) = self.components.first() {
            if first.values.shape() != values.shape() {
                return Err(DataError::ShapeMismatch(
                    label.to_string(),
                    values.shape().to_vec(),
                    first.values.shape().to_vec(),
                ));
            }
        }
        self.components.push(Component {
            label: label.to_string(),
            values,
            unit: unit.to_string(),
        });
        Ok(ComponentId(self.components.len() - 1))
    }

    pub fn component_id(&self, label: &str) -> Option<ComponentId> {
        self.components
            .iter()
            .position(|c| c.label == label)
            .map(ComponentId)
    }

    pub fn get_component(&self, id: ComponentId) -> Result<&Component, DataError> {
        self.components
            .get(id.0)
            .ok_or(DataError::UnknownComponentId(id.0))
    }

    pub fn get_data(&self, id: ComponentId) -> Result<&ArrayD<f64>, DataError> {
        Ok(&self.get_component(id)?.values)
    }

    /// All user-defined components, in insertion order.
    pub fn main_component_ids(&self) -> Vec<ComponentId> {
        (0..self.components.len()).map(ComponentId).collect()
    }

    pub fn shape(&self) -> &[usize] {
        self.components
            .first()
            .map(|c| c.values.shape())
            .unwrap_or(&[])
    }

    pub fn ndim(&self) -> usize {
        self.shape().len()
    }

    pub fn coords(&self) -> Option<&CoordinateSystem> {
        self.coords.as_ref()
    }

    pub fn meta(&self) -> &Meta {
        &self.meta
    }

    pub fn meta_mut(&mut self) -> &mut Meta {
        &mut self.meta
    }

    /// Evaluates a subset predicate into a membership mask over the data's
    /// shape (true = element belongs to the subset).
    pub fn get_mask(&self, subset_state: &SubsetState) -> Result<ArrayD<bool>, DataError> {
        match subset_state {
            SubsetState::Mask(mask) => {
                if mask.shape() != self.shape() {
                    return Err(DataError::SubsetShapeMismatch(
                        mask.shape().to_vec(),
                        self.shape().to_vec(),
                    ));
                }
                Ok(mask.clone())
            }
            SubsetState::Range { component, lo, hi } => {
                let id = self
                    .component_id(component)
                    .ok_or_else(|| DataError::UnknownComponent(component.clone()))?;
                Ok(self.get_data(id)?.mapv(|v| v >= *lo && v <= *hi))
            }
        }
    }

    /// Reduces a component over `axes` with the given statistic. When a
    /// subset state is given only in-subset elements contribute; NaN values
    /// never contribute. A retained element with no contributing values
    /// reduces to NaN.
    pub fn compute_statistic(
        &self,
        statistic: Statistic,
        id: ComponentId,
        axes: &[usize],
        subset_state: Option<&SubsetState>,
    ) -> Result<ArrayD<f64>, DataError> {
        let values = self.get_data(id)?;
        let ndim = values.ndim();
        for &axis in axes {
            if axis >= ndim {
                return Err(DataError::InvalidAxis(axis, ndim));
            }
        }
        let mask = match subset_state {
            Some(state) => Some(self.get_mask(state)?),
            None => None,
        };

        let (flat_values, kept_shape) = flatten_for_reduction(values, axes);
        let flat_mask = mask.as_ref().map(|m| flatten_for_reduction(m, axes).0);

        let mut reduced = Vec::with_capacity(flat_values.nrows());
        for (row, values_row) in flat_values.rows().into_iter().enumerate() {
            let included: Vec<f64> = values_row
                .iter()
                .enumerate()
                .filter(|(col, v)| {
                    v.is_finite()
                        && flat_mask.as_ref().map_or(true, |m| m[[row, *col]])
                })
                .map(|(_, v)| *v)
                .collect();
            reduced.push(statistic.reduce(included));
        }
        Ok(ArrayD::from_shape_vec(ndarray::IxDyn(&kept_shape), reduced).unwrap())
    }
}

/// A data object paired with a subset predicate.
#[derive(Clone, Debug)]
pub struct Subset<'a> {
    data: &'a Data,
    state: SubsetState,
}

impl<'a> Subset<'a> {
    pub fn new(data: &'a Data, state: SubsetState) -> Self {
        Self { data, state }
    }

    pub fn data(&self) -> &'a Data {
        self.data
    }

    pub fn state(&self) -> &SubsetState {
        &self.state
    }
}

/// Translator input: either a whole container or a masked subset of one.
#[derive(Clone, Copy, Debug)]
pub enum DataOrSubset<'a> {
    Data(&'a Data),
    Subset(&'a Subset<'a>),
}

impl<'a> From<&'a Data> for DataOrSubset<'a> {
    fn from(data: &'a Data) -> Self {
        DataOrSubset::Data(data)
    }
}

impl<'a> From<&'a Subset<'a>> for DataOrSubset<'a> {
    fn from(subset: &'a Subset<'a>) -> Self {
        DataOrSubset::Subset(subset)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::array;

    fn two_by_five() -> Data {
        let mut data = Data::new(None);
        data.add_component(
            "flux",
            array![[1., 2., 3., 4., 5.], [3., 4., 5., 6., 7.]].into_dyn(),
            "Jy",
        )
        .unwrap();
        data
    }

    #[test]
    fn test_add_and_lookup() {
        let data = two_by_five();
        let id = data.component_id("flux").unwrap();
        assert_eq!(data.get_component(id).unwrap().unit(), "Jy");
        assert_eq!(data.shape(), &[2, 5]);
        assert_eq!(data.ndim(), 2);
        assert!(data.component_id("uncertainty").is_none());
    }

    #[test]
    fn test_shape_mismatch_rejected() {
        let mut data = two_by_five();
        let err = data
            .add_component("other", array![1., 2.].into_dyn(), "")
            .unwrap_err();
        assert!(matches!(err, DataError::ShapeMismatch(_, _, _)));
    }

    #[test]
    fn test_duplicate_label_rejected() {
        let mut data = two_by_five();
        let err = data
            .add_component("flux", ArrayD::zeros(ndarray::IxDyn(&[2, 5])), "")
            .unwrap_err();
        assert!(matches!(err, DataError::DuplicateComponent(_)));
    }

    #[test]
    fn test_range_subset_mask() {
        let data = two_by_five();
        let state = SubsetState::Range {
            component: "flux".to_string(),
            lo: 3.,
            hi: 5.,
        };
        let mask = data.get_mask(&state).unwrap();
        assert_eq!(
            mask,
            array![
                [false, false, true, true, true],
                [true, true, true, false, false]
            ]
            .into_dyn()
        );
    }

    #[test]
    fn test_compute_statistic_mean_and_sum() {
        let data = two_by_five();
        let id = data.component_id("flux").unwrap();
        let mean = data
            .compute_statistic(Statistic::Mean, id, &[0], None)
            .unwrap();
        assert_eq!(mean, array![2., 3., 4., 5., 6.].into_dyn());
        let sum = data
            .compute_statistic(Statistic::Sum, id, &[0], None)
            .unwrap();
        assert_eq!(sum, array![4., 6., 8., 10., 12.].into_dyn());
    }

    #[test]
    fn test_compute_statistic_with_subset() {
        let data = two_by_five();
        let id = data.component_id("flux").unwrap();
        let state = SubsetState::Mask(
            array![
                [true, true, true, true, true],
                [false, false, false, false, false]
            ]
            .into_dyn(),
        );
        let mean = data
            .compute_statistic(Statistic::Mean, id, &[0], Some(&state))
            .unwrap();
        // Only the first row contributes
        assert_eq!(mean, array![1., 2., 3., 4., 5.].into_dyn());
    }

    #[test]
    fn test_compute_statistic_empty_cell_is_nan() {
        let data = two_by_five();
        let id = data.component_id("flux").unwrap();
        let state = SubsetState::Mask(ArrayD::from_elem(ndarray::IxDyn(&[2, 5]), false));
        let mean = data
            .compute_statistic(Statistic::Mean, id, &[0], Some(&state))
            .unwrap();
        assert!(mean.iter().all(|v| v.is_nan()));
    }

    #[test]
    fn test_compute_statistic_invalid_axis() {
        let data = two_by_five();
        let id = data.component_id("flux").unwrap();
        let err = data
            .compute_statistic(Statistic::Mean, id, &[2], None)
            .unwrap_err();
        assert!(matches!(err, DataError::InvalidAxis(2, 2)));
    }
}
