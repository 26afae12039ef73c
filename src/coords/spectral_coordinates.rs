use ndarray::Array1;

/// A bare list of spectral-axis world values with no pixel/world transform
/// attached. Used when a spectrum is constructed from explicit axis values
/// rather than from a WCS.
#[derive(Clone, Debug, PartialEq)]
pub struct SpectralCoordinates {
    values: Array1<f64>,
    unit: String,
}

impl SpectralCoordinates {
    pub fn new(values: Array1<f64>, unit: &str) -> Self {
        Self {
            values,
            unit: unit.to_string(),
        }
    }

    pub fn values(&self) -> &Array1<f64> {
        &self.values
    }

    pub fn unit(&self) -> &str {
        &self.unit
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}
