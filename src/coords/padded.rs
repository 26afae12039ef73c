// specbridge/src/coords/padded.rs

use super::spectral::SpectralWcs;
use super::ucd_to_spectral_name;
use ndarray::{Array1, Array2, ArrayD};
use std::rc::Rc;

/// Presents a 1-D spectral WCS as an N-dimensional one. A spectrum can use
/// a 1-D spectral WCS even for n-dimensional flux while the data container
/// always needs the coordinate dimensionality to match, so this wrapper
/// pads the WCS with inert pixel-identity axes.
///
/// Axis 0 of the padded pixel/world interface is always the spectral axis;
/// every other axis passes values through unchanged and carries no physical
/// meaning.
#[derive(Clone, Debug)]
pub struct PaddedSpectrumWcs {
    spectral_wcs: Rc<SpectralWcs>,
    flux_ndim: usize,
    spectral_axis_index: usize,
    spatial_keys: Vec<String>,
}

impl PaddedSpectrumWcs {
    pub fn new(wcs: Rc<SpectralWcs>, ndim: usize, spectral_axis_index: usize) -> Self {
        let spatial_keys = if ndim == 2 {
            vec!["spatial".to_string()]
        } else {
            (0..ndim.saturating_sub(1))
                .map(|i| format!("spatial{}", i))
                .collect()
        };
        Self {
            spectral_wcs: wcs,
            flux_ndim: ndim,
            spectral_axis_index,
            spatial_keys,
        }
    }

    pub fn spectral_wcs(&self) -> Rc<SpectralWcs> {
        self.spectral_wcs.clone()
    }

    pub fn spectral_axis_index(&self) -> usize {
        self.spectral_axis_index
    }

    pub fn pixel_n_dim(&self) -> usize {
        self.flux_ndim
    }

    pub fn world_n_dim(&self) -> usize {
        self.flux_ndim
    }

    pub fn world_axis_physical_types(&self) -> Vec<Option<&str>> {
        let mut types = vec![Some(self.spectral_wcs.physical_type())];
        types.extend(std::iter::repeat(None).take(self.flux_ndim - 1));
        types
    }

    pub fn world_axis_units(&self) -> Vec<Option<&str>> {
        let mut units = vec![Some(self.spectral_wcs.unit())];
        units.extend(std::iter::repeat(None).take(self.flux_ndim - 1));
        units
    }

    /// Transforms the first pixel array through the wrapped spectral WCS
    /// and passes every other array through unchanged. The 1-D transform is
    /// applied to a flattened copy and the result reshaped back, so
    /// arbitrary input shapes round-trip exactly.
    pub fn pixel_to_world_values(&self, pixel_arrays: &[ArrayD<f64>]) -> Vec<ArrayD<f64>> {
        let px = &pixel_arrays[0];
        let flat = Array1::from_iter(px.iter().cloned());
        let world = self.spectral_wcs.pixel_to_world_values(&flat);
        let mut world_arrays = vec![world.into_shape(px.raw_dim()).unwrap()];
        world_arrays.extend(pixel_arrays[1..].iter().cloned());
        world_arrays
    }

    pub fn world_to_pixel_values(&self, world_arrays: &[ArrayD<f64>]) -> Vec<ArrayD<f64>> {
        let wx = &world_arrays[0];
        let flat = Array1::from_iter(wx.iter().cloned());
        let pixel = self.spectral_wcs.world_to_pixel_values(&flat);
        let mut pixel_arrays = vec![pixel.into_shape(wx.raw_dim()).unwrap()];
        pixel_arrays.extend(world_arrays[1..].iter().cloned());
        pixel_arrays
    }

    pub fn world_axis_object_components(&self) -> Vec<(String, String)> {
        let mut components = vec![self.spectral_wcs.world_axis_object_component()];
        for key in &self.spatial_keys {
            components.push((key.clone(), "value".to_string()));
        }
        components
    }

    /// Object class per world-axis key: the spectral key maps onto the
    /// wrapped system's quantity, every spatial key onto a plain
    /// pixel-valued quantity.
    pub fn world_axis_object_classes(&self) -> Vec<(String, String)> {
        let (spectral_key, _) = self.spectral_wcs.world_axis_object_component();
        let mut classes = vec![(spectral_key, self.spectral_wcs.unit().to_string())];
        for key in &self.spatial_keys {
            classes.push((key.clone(), "pix".to_string()));
        }
        classes
    }

    pub fn pixel_shape(&self) -> Option<Vec<usize>> {
        None
    }

    pub fn pixel_bounds(&self) -> Option<Vec<(f64, f64)>> {
        None
    }

    pub fn pixel_axis_names(&self) -> Vec<String> {
        let mut names = vec![self.spectral_wcs.pixel_axis_name().to_string()];
        names.extend(self.spatial_keys.iter().cloned());
        names
    }

    pub fn world_axis_names(&self) -> Vec<String> {
        let spectral_name = ucd_to_spectral_name(self.spectral_wcs.physical_type())
            .unwrap_or("")
            .to_string();
        let mut names = vec![spectral_name];
        if self.flux_ndim == 2 {
            names.push("Offset".to_string());
        } else {
            names.extend((0..self.flux_ndim - 1).map(|i| format!("Offset{}", i)));
        }
        names
    }

    /// Identity: each pixel axis affects only the matching world axis. This
    /// is the defining simplification that makes padding valid.
    pub fn axis_correlation_matrix(&self) -> Array2<bool> {
        Array2::from_shape_fn((self.flux_ndim, self.flux_ndim), |(i, j)| i == j)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::coords::spectral::SpectralWcsBuilder;
    use ndarray::{Array, ArrayD, IxDyn};

    fn padded(ndim: usize) -> PaddedSpectrumWcs {
        let wcs = SpectralWcsBuilder::default()
            .crval(100.)
            .cdelt(5.)
            .unit("nm")
            .physical_type("em.wl")
            .build()
            .unwrap();
        PaddedSpectrumWcs::new(Rc::new(wcs), ndim, 0)
    }

    #[test]
    fn test_dimensions_match_flux() {
        let wcs = padded(3);
        assert_eq!(wcs.pixel_n_dim(), 3);
        assert_eq!(wcs.world_n_dim(), 3);
    }

    #[test]
    fn test_shape_preservation() {
        let wcs = padded(3);
        let spectral: ArrayD<f64> =
            Array::from_shape_fn(IxDyn(&[4, 5, 6]), |idx| idx[0] as f64);
        let other0: ArrayD<f64> = ArrayD::zeros(IxDyn(&[4, 5, 6]));
        let other1: ArrayD<f64> = ArrayD::ones(IxDyn(&[4, 5, 6]));
        let world = wcs.pixel_to_world_values(&[spectral.clone(), other0.clone(), other1.clone()]);
        assert_eq!(world[0].shape(), &[4, 5, 6]);
        assert_eq!(world[0][[2, 0, 0]], 110.);
        // Extra axes are identity
        assert_eq!(world[1], other0);
        assert_eq!(world[2], other1);
        let pixel = wcs.world_to_pixel_values(&world);
        assert_eq!(pixel[0], spectral);
    }

    #[test]
    fn test_axis_correlation_matrix_is_identity() {
        let wcs = padded(3);
        let matrix = wcs.axis_correlation_matrix();
        assert_eq!(matrix.shape(), &[3, 3]);
        for i in 0..3 {
            for j in 0..3 {
                assert_eq!(matrix[[i, j]], i == j);
            }
        }
    }

    #[test]
    fn test_world_axis_metadata_padding() {
        let wcs = padded(3);
        assert_eq!(wcs.world_axis_units(), vec![Some("nm"), None, None]);
        assert_eq!(
            wcs.world_axis_physical_types(),
            vec![Some("em.wl"), None, None]
        );
        assert_eq!(wcs.pixel_shape(), None);
        assert_eq!(wcs.pixel_bounds(), None);
    }

    #[test]
    fn test_spatial_key_naming() {
        assert_eq!(
            padded(2).world_axis_object_components(),
            vec![
                ("spectral".to_string(), "value".to_string()),
                ("spatial".to_string(), "value".to_string()),
            ]
        );
        assert_eq!(
            padded(4)
                .world_axis_object_components()
                .iter()
                .map(|(key, _)| key.as_str())
                .collect::<Vec<_>>(),
            vec!["spectral", "spatial0", "spatial1", "spatial2"]
        );
    }

    #[test]
    fn test_world_axis_names() {
        assert_eq!(padded(2).world_axis_names(), vec!["Wavelength", "Offset"]);
        assert_eq!(
            padded(3).world_axis_names(),
            vec!["Wavelength", "Offset0", "Offset1"]
        );
    }
}
