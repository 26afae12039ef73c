use ndarray::Array1;
use thiserror::Error;

/// A 1-D linear spectral world coordinate system:
/// `world = crval + cdelt * (pixel - crpix)`.
#[derive(Clone, Debug, PartialEq)]
pub struct SpectralWcs {
    crpix: f64,
    crval: f64,
    cdelt: f64,
    unit: String,
    physical_type: String,
    pixel_axis_name: String,
}

impl SpectralWcs {
    pub fn pixel_to_world_values(&self, pixel: &Array1<f64>) -> Array1<f64> {
        pixel.mapv(|p| self.crval + self.cdelt * (p - self.crpix))
    }

    pub fn world_to_pixel_values(&self, world: &Array1<f64>) -> Array1<f64> {
        world.mapv(|w| (w - self.crval) / self.cdelt + self.crpix)
    }

    pub fn unit(&self) -> &str {
        &self.unit
    }

    pub fn physical_type(&self) -> &str {
        &self.physical_type
    }

    pub fn pixel_axis_name(&self) -> &str {
        &self.pixel_axis_name
    }

    /// The (key, property) pair describing how the single world axis maps
    /// onto a coordinate object.
    pub fn world_axis_object_component(&self) -> (String, String) {
        ("spectral".to_string(), "value".to_string())
    }
}

#[derive(Default)]
pub struct SpectralWcsBuilder {
    crpix: Option<f64>,
    crval: Option<f64>,
    cdelt: Option<f64>,
    unit: Option<String>,
    physical_type: Option<String>,
    pixel_axis_name: Option<String>,
}

impl SpectralWcsBuilder {
    pub fn build(&self) -> Result<SpectralWcs, SpectralWcsBuilderError> {
        let crval = self.crval.ok_or_else(|| {
            SpectralWcsBuilderError::UninitializedFieldError("crval".to_string())
        })?;
        let cdelt = self.cdelt.ok_or_else(|| {
            SpectralWcsBuilderError::UninitializedFieldError("cdelt".to_string())
        })?;
        Self::validate_cdelt(&cdelt)?;
        let unit = self.unit.clone().ok_or_else(|| {
            SpectralWcsBuilderError::UninitializedFieldError("unit".to_string())
        })?;
        let physical_type = self.physical_type.clone().ok_or_else(|| {
            SpectralWcsBuilderError::UninitializedFieldError("physical_type".to_string())
        })?;
        let crpix = self.crpix.unwrap_or(0.);
        let pixel_axis_name = self.pixel_axis_name.clone().unwrap_or_default();
        Ok(SpectralWcs {
            crpix,
            crval,
            cdelt,
            unit,
            physical_type,
            pixel_axis_name,
        })
    }

    fn validate_cdelt(cdelt: &f64) -> Result<(), SpectralWcsBuilderError> {
        if *cdelt == 0. {
            return Err(SpectralWcsBuilderError::ZeroCdelt);
        }
        Ok(())
    }

    pub fn crpix(&mut self, crpix: f64) -> &mut Self {
        self.crpix = Some(crpix);
        self
    }
    pub fn crval(&mut self, crval: f64) -> &mut Self {
        self.crval = Some(crval);
        self
    }
    pub fn cdelt(&mut self, cdelt: f64) -> &mut Self {
        self.cdelt = Some(cdelt);
        self
    }
    pub fn unit(&mut self, unit: &str) -> &mut Self {
        self.unit = Some(unit.to_string());
        self
    }
    pub fn physical_type(&mut self, physical_type: &str) -> &mut Self {
        self.physical_type = Some(physical_type.to_string());
        self
    }
    pub fn pixel_axis_name(&mut self, pixel_axis_name: &str) -> &mut Self {
        self.pixel_axis_name = Some(pixel_axis_name.to_string());
        self
    }
}

#[derive(Error, Debug)]
pub enum SpectralWcsBuilderError {
    #[error("Unitialized field on SpectralWcsBuilder: {0}")]
    UninitializedFieldError(String),
    #[error("cdelt must be non-zero for the pixel/world map to be invertible")]
    ZeroCdelt,
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::array;

    fn wavelength_wcs() -> SpectralWcs {
        SpectralWcsBuilder::default()
            .crval(5000.)
            .cdelt(10.)
            .unit("Angstrom")
            .physical_type("em.wl")
            .build()
            .unwrap()
    }

    #[test]
    fn test_pixel_to_world_roundtrip() {
        let wcs = wavelength_wcs();
        let pixel = array![0., 1., 2.5];
        let world = wcs.pixel_to_world_values(&pixel);
        assert_eq!(world, array![5000., 5010., 5025.]);
        let back = wcs.world_to_pixel_values(&world);
        assert_eq!(back, pixel);
    }

    #[test]
    fn test_builder_requires_crval() {
        let err = SpectralWcsBuilder::default()
            .cdelt(1.)
            .unit("nm")
            .physical_type("em.wl")
            .build()
            .unwrap_err();
        assert!(matches!(
            err,
            SpectralWcsBuilderError::UninitializedFieldError(_)
        ));
    }

    #[test]
    fn test_builder_rejects_zero_cdelt() {
        let err = SpectralWcsBuilder::default()
            .crval(1.)
            .cdelt(0.)
            .unit("nm")
            .physical_type("em.wl")
            .build()
            .unwrap_err();
        assert!(matches!(err, SpectralWcsBuilderError::ZeroCdelt));
    }
}
