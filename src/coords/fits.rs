use super::is_spectral_ucd;
use super::spectral::{SpectralWcs, SpectralWcsBuilder, SpectralWcsBuilderError};
use ndarray::ArrayD;
use thiserror::Error;

/// One axis of a separable FITS-style WCS. Axes are listed in array order,
/// so pixel axis `i` maps onto world axis `i`.
#[derive(Clone, Debug, PartialEq)]
pub struct FitsAxis {
    pub physical_type: Option<String>,
    pub unit: Option<String>,
    pub name: Option<String>,
    pub crpix: f64,
    pub crval: f64,
    pub cdelt: f64,
}

/// An N-D FITS-style WCS with a diagonal transformation matrix. Each world
/// axis depends only on its matching pixel axis, which is what makes
/// spectral-axis sub-selection exact.
#[derive(Clone, Debug, PartialEq)]
pub struct FitsWcs {
    axes: Vec<FitsAxis>,
}

impl FitsWcs {
    pub fn new(axes: Vec<FitsAxis>) -> Result<Self, FitsWcsError> {
        if axes.is_empty() {
            return Err(FitsWcsError::NoAxes);
        }
        for (i, axis) in axes.iter().enumerate() {
            if axis.cdelt == 0. {
                return Err(FitsWcsError::ZeroCdelt(i));
            }
        }
        Ok(Self { axes })
    }

    pub fn naxis(&self) -> usize {
        self.axes.len()
    }

    pub fn axes(&self) -> &[FitsAxis] {
        &self.axes
    }

    pub fn world_axis_physical_types(&self) -> Vec<Option<&str>> {
        self.axes
            .iter()
            .map(|axis| axis.physical_type.as_deref())
            .collect()
    }

    pub fn world_axis_units(&self) -> Vec<Option<&str>> {
        self.axes.iter().map(|axis| axis.unit.as_deref()).collect()
    }

    /// Index of the spectral axis, identified by its UCD physical type.
    pub fn spectral_axis(&self) -> Option<usize> {
        self.axes.iter().position(|axis| {
            axis.physical_type
                .as_deref()
                .map_or(false, is_spectral_ucd)
        })
    }

    /// Sub-selects the spectral axis as a standalone 1-D spectral WCS.
    pub fn sub_spectral(&self) -> Result<SpectralWcs, FitsWcsError> {
        let index = self.spectral_axis().ok_or(FitsWcsError::NoSpectralAxis)?;
        let axis = &self.axes[index];
        let mut builder = SpectralWcsBuilder::default();
        builder
            .crpix(axis.crpix)
            .crval(axis.crval)
            .cdelt(axis.cdelt)
            .unit(axis.unit.as_deref().unwrap_or(""))
            .physical_type(axis.physical_type.as_deref().unwrap_or(""));
        if let Some(name) = axis.name.as_deref() {
            builder.pixel_axis_name(name);
        }
        Ok(builder.build()?)
    }

    pub fn pixel_to_world_values(&self, pixel_arrays: &[ArrayD<f64>]) -> Vec<ArrayD<f64>> {
        self.axes
            .iter()
            .zip(pixel_arrays)
            .map(|(axis, pixel)| pixel.mapv(|p| axis.crval + axis.cdelt * (p - axis.crpix)))
            .collect()
    }

    pub fn world_to_pixel_values(&self, world_arrays: &[ArrayD<f64>]) -> Vec<ArrayD<f64>> {
        self.axes
            .iter()
            .zip(world_arrays)
            .map(|(axis, world)| world.mapv(|w| (w - axis.crval) / axis.cdelt + axis.crpix))
            .collect()
    }
}

#[derive(Error, Debug)]
pub enum FitsWcsError {
    #[error("a FITS WCS requires at least one axis")]
    NoAxes,
    #[error("cdelt on axis {0} must be non-zero")]
    ZeroCdelt(usize),
    #[error("WCS has no spectral axis to sub-select")]
    NoSpectralAxis,
    #[error(transparent)]
    SpectralWcsBuilderError(#[from] SpectralWcsBuilderError),
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::array;

    fn spatial_axis() -> FitsAxis {
        FitsAxis {
            physical_type: Some("pos.eq.ra".to_string()),
            unit: Some("deg".to_string()),
            name: None,
            crpix: 0.,
            crval: 10.,
            cdelt: 0.5,
        }
    }

    fn spectral_axis() -> FitsAxis {
        FitsAxis {
            physical_type: Some("em.wl".to_string()),
            unit: Some("nm".to_string()),
            name: None,
            crpix: 0.,
            crval: 400.,
            cdelt: 2.,
        }
    }

    #[test]
    fn test_sub_spectral_picks_spectral_axis() {
        let wcs = FitsWcs::new(vec![spatial_axis(), spectral_axis()]).unwrap();
        assert_eq!(wcs.spectral_axis(), Some(1));
        let sub = wcs.sub_spectral().unwrap();
        assert_eq!(sub.unit(), "nm");
        let world = sub.pixel_to_world_values(&array![0., 1., 2.]);
        assert_eq!(world, array![400., 402., 404.]);
    }

    #[test]
    fn test_sub_spectral_without_spectral_axis() {
        let wcs = FitsWcs::new(vec![spatial_axis()]).unwrap();
        assert!(matches!(
            wcs.sub_spectral().unwrap_err(),
            FitsWcsError::NoSpectralAxis
        ));
    }

    #[test]
    fn test_pixel_to_world_is_per_axis() {
        let wcs = FitsWcs::new(vec![spatial_axis(), spectral_axis()]).unwrap();
        let pixel = vec![
            array![0., 2.].into_dyn(),
            array![1., 3.].into_dyn(),
        ];
        let world = wcs.pixel_to_world_values(&pixel);
        assert_eq!(world[0], array![10., 11.].into_dyn());
        assert_eq!(world[1], array![402., 406.].into_dyn());
    }
}
