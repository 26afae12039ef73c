use ndarray::ArrayD;
use std::fmt;
use std::rc::Rc;
use thiserror::Error;

pub type PixelToWorldFn = dyn Fn(&[ArrayD<f64>]) -> Vec<ArrayD<f64>>;

/// A generalized, possibly non-linear WCS. The transform takes one pixel
/// array per pixel axis (array order) and returns one world array per
/// world axis; one world axis is declared spectral.
#[derive(Clone)]
pub struct GeneralWcs {
    transform: Rc<PixelToWorldFn>,
    pixel_n_dim: usize,
    spectral_world_axis: usize,
    world_axis_units: Vec<Option<String>>,
    world_axis_physical_types: Vec<Option<String>>,
}

impl GeneralWcs {
    pub fn new(
        pixel_n_dim: usize,
        spectral_world_axis: usize,
        world_axis_units: Vec<Option<String>>,
        world_axis_physical_types: Vec<Option<String>>,
        transform: Rc<PixelToWorldFn>,
    ) -> Result<Self, GeneralWcsError> {
        if world_axis_units.len() != world_axis_physical_types.len() {
            return Err(GeneralWcsError::AxisMetadataLengthMismatch(
                world_axis_units.len(),
                world_axis_physical_types.len(),
            ));
        }
        if spectral_world_axis >= world_axis_units.len() {
            return Err(GeneralWcsError::SpectralAxisOutOfRange(
                spectral_world_axis,
                world_axis_units.len(),
            ));
        }
        Ok(Self {
            transform,
            pixel_n_dim,
            spectral_world_axis,
            world_axis_units,
            world_axis_physical_types,
        })
    }

    pub fn pixel_n_dim(&self) -> usize {
        self.pixel_n_dim
    }

    pub fn world_n_dim(&self) -> usize {
        self.world_axis_units.len()
    }

    pub fn spectral_world_axis(&self) -> usize {
        self.spectral_world_axis
    }

    pub fn spectral_unit(&self) -> Option<&str> {
        self.world_axis_units[self.spectral_world_axis].as_deref()
    }

    pub fn world_axis_units(&self) -> Vec<Option<&str>> {
        self.world_axis_units.iter().map(|u| u.as_deref()).collect()
    }

    pub fn world_axis_physical_types(&self) -> Vec<Option<&str>> {
        self.world_axis_physical_types
            .iter()
            .map(|t| t.as_deref())
            .collect()
    }

    pub fn pixel_to_world_values(&self, pixel_arrays: &[ArrayD<f64>]) -> Vec<ArrayD<f64>> {
        (self.transform)(pixel_arrays)
    }
}

impl fmt::Debug for GeneralWcs {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("GeneralWcs")
            .field("pixel_n_dim", &self.pixel_n_dim)
            .field("spectral_world_axis", &self.spectral_world_axis)
            .field("world_axis_units", &self.world_axis_units)
            .finish()
    }
}

#[derive(Error, Debug)]
pub enum GeneralWcsError {
    #[error("world axis units and physical types must have the same length, got {0} and {1}")]
    AxisMetadataLengthMismatch(usize, usize),
    #[error("spectral world axis {0} is out of range for a {1}-axis WCS")]
    SpectralAxisOutOfRange(usize, usize),
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::array;

    #[test]
    fn test_transform_dispatch() {
        let wcs = GeneralWcs::new(
            2,
            1,
            vec![Some("deg".to_string()), Some("nm".to_string())],
            vec![Some("pos.eq.ra".to_string()), Some("em.wl".to_string())],
            Rc::new(|pixel: &[ArrayD<f64>]| {
                vec![pixel[0].mapv(|p| p * 2.), pixel[1].mapv(|p| 500. + p)]
            }),
        )
        .unwrap();
        assert_eq!(wcs.world_n_dim(), 2);
        assert_eq!(wcs.spectral_unit(), Some("nm"));
        let world = wcs.pixel_to_world_values(&[
            array![1., 2.].into_dyn(),
            array![0., 1.].into_dyn(),
        ]);
        assert_eq!(world[1], array![500., 501.].into_dyn());
    }

    #[test]
    fn test_spectral_axis_out_of_range() {
        let err = GeneralWcs::new(
            1,
            3,
            vec![Some("nm".to_string())],
            vec![Some("em.wl".to_string())],
            Rc::new(|pixel: &[ArrayD<f64>]| pixel.to_vec()),
        )
        .unwrap_err();
        assert!(matches!(err, GeneralWcsError::SpectralAxisOutOfRange(3, 1)));
    }
}
