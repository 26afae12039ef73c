use crate::coords::fits::FitsWcsError;
use crate::coords::CoordinateSystem;
use crate::data::Meta;
use ndarray::{Array1, ArrayD};
use thiserror::Error;

/// An N-D value array with a physical unit. Unit strings are carried
/// verbatim so they round-trip losslessly through the translator.
#[derive(Clone, Debug, PartialEq)]
pub struct Quantity {
    values: ArrayD<f64>,
    unit: String,
}

impl Quantity {
    pub fn new(values: ArrayD<f64>, unit: &str) -> Self {
        Self {
            values,
            unit: unit.to_string(),
        }
    }

    pub fn values(&self) -> &ArrayD<f64> {
        &self.values
    }

    pub fn unit(&self) -> &str {
        &self.unit
    }

    pub fn shape(&self) -> &[usize] {
        self.values.shape()
    }

    pub fn ndim(&self) -> usize {
        self.values.ndim()
    }
}

/// How an uncertainty array combines with its nominal value.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum UncertaintyKind {
    Std,
    Var,
    Ivar,
}

impl UncertaintyKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            UncertaintyKind::Std => "std",
            UncertaintyKind::Var => "var",
            UncertaintyKind::Ivar => "ivar",
        }
    }

    pub fn parse(name: &str) -> Result<Self, SpectrumError> {
        match name {
            "std" => Ok(UncertaintyKind::Std),
            "var" => Ok(UncertaintyKind::Var),
            "ivar" => Ok(UncertaintyKind::Ivar),
            _ => Err(SpectrumError::UnknownUncertaintyType(name.to_string())),
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct Uncertainty {
    kind: UncertaintyKind,
    quantity: Quantity,
}

impl Uncertainty {
    pub fn new(kind: UncertaintyKind, quantity: Quantity) -> Self {
        Self { kind, quantity }
    }

    pub fn kind(&self) -> UncertaintyKind {
        self.kind
    }

    pub fn quantity(&self) -> &Quantity {
        &self.quantity
    }

    pub fn unit(&self) -> &str {
        self.quantity.unit()
    }
}

/// The spectral-axis specification of a spectrum: either a coordinate
/// system or an explicit list of axis values. Mutually exclusive.
#[derive(Clone, Debug)]
pub enum SpectralAxisSpec {
    Wcs(CoordinateSystem),
    Values(Quantity),
}

/// Domain spectrum object: flux with optional uncertainty and mask, a
/// spectral-axis specification and open metadata. Mask convention: true
/// marks an element as masked out.
#[derive(Clone, Debug)]
pub struct Spectrum1D {
    flux: Quantity,
    uncertainty: Option<Uncertainty>,
    mask: Option<ArrayD<bool>>,
    coords: SpectralAxisSpec,
    spectral_axis_index: usize,
    meta: Meta,
}

impl Spectrum1D {
    pub fn flux(&self) -> &Quantity {
        &self.flux
    }

    pub fn unit(&self) -> &str {
        self.flux.unit()
    }

    pub fn uncertainty(&self) -> Option<&Uncertainty> {
        self.uncertainty.as_ref()
    }

    pub fn mask(&self) -> Option<&ArrayD<bool>> {
        self.mask.as_ref()
    }

    pub fn coords(&self) -> &SpectralAxisSpec {
        &self.coords
    }

    pub fn wcs(&self) -> Option<&CoordinateSystem> {
        match &self.coords {
            SpectralAxisSpec::Wcs(wcs) => Some(wcs),
            SpectralAxisSpec::Values(_) => None,
        }
    }

    pub fn spectral_axis_index(&self) -> usize {
        self.spectral_axis_index
    }

    pub fn meta(&self) -> &Meta {
        &self.meta
    }

    /// World values along the spectral axis, evaluated from the coordinate
    /// system when the spectrum was built from a WCS.
    pub fn spectral_axis(&self) -> Result<Quantity, SpectrumError> {
        let n = self.flux.shape()[self.spectral_axis_index];
        let pixels = Array1::from_iter((0..n).map(|i| i as f64));
        match &self.coords {
            SpectralAxisSpec::Values(values) => Ok(values.clone()),
            SpectralAxisSpec::Wcs(CoordinateSystem::Spectral(wcs)) => {
                let world = wcs.pixel_to_world_values(&pixels);
                Ok(Quantity::new(world.into_dyn(), wcs.unit()))
            }
            SpectralAxisSpec::Wcs(CoordinateSystem::Padded(wcs)) => {
                let inner = wcs.spectral_wcs();
                let world = inner.pixel_to_world_values(&pixels);
                Ok(Quantity::new(world.into_dyn(), inner.unit()))
            }
            SpectralAxisSpec::Wcs(CoordinateSystem::Fits(wcs)) => {
                let sub = wcs.sub_spectral()?;
                let world = sub.pixel_to_world_values(&pixels);
                Ok(Quantity::new(world.into_dyn(), sub.unit()))
            }
            SpectralAxisSpec::Wcs(CoordinateSystem::Generalized(wcs)) => {
                // Evaluate along a pixel path that varies only on the
                // spectral axis, all other coordinates held at zero.
                let mut args = vec![ArrayD::zeros(ndarray::IxDyn(&[n])); wcs.pixel_n_dim()];
                args[self.spectral_axis_index] = pixels.into_dyn();
                let world = wcs.pixel_to_world_values(&args);
                let spectral = world[wcs.spectral_world_axis()].clone();
                Ok(Quantity::new(spectral, wcs.spectral_unit().unwrap_or("")))
            }
            SpectralAxisSpec::Wcs(CoordinateSystem::SpectralCoordinates(coords)) => Ok(
                Quantity::new(coords.values().clone().into_dyn(), coords.unit()),
            ),
        }
    }
}

#[derive(Default)]
pub struct Spectrum1DBuilder {
    flux: Option<Quantity>,
    uncertainty: Option<Uncertainty>,
    mask: Option<ArrayD<bool>>,
    wcs: Option<CoordinateSystem>,
    spectral_axis: Option<Quantity>,
    spectral_axis_index: Option<usize>,
    meta: Option<Meta>,
}

impl Spectrum1DBuilder {
    pub fn build(&mut self) -> Result<Spectrum1D, Spectrum1DBuilderError> {
        let flux = self.flux.take().ok_or_else(|| {
            Spectrum1DBuilderError::UninitializedFieldError("flux".to_string())
        })?;
        let coords = match (self.wcs.take(), self.spectral_axis.take()) {
            (Some(_), Some(_)) => return Err(Spectrum1DBuilderError::ConflictingSpectralSpec),
            (Some(wcs), None) => SpectralAxisSpec::Wcs(wcs),
            (None, Some(values)) => {
                if values.ndim() != 1 {
                    return Err(Spectrum1DBuilderError::SpectralAxisNotOneDimensional(
                        values.ndim(),
                    ));
                }
                SpectralAxisSpec::Values(values)
            }
            (None, None) => return Err(Spectrum1DBuilderError::MissingSpectralSpec),
        };
        let spectral_axis_index = self
            .spectral_axis_index
            .unwrap_or_else(|| flux.ndim().saturating_sub(1));
        if spectral_axis_index >= flux.ndim() {
            return Err(Spectrum1DBuilderError::InvalidSpectralAxisIndex(
                spectral_axis_index,
                flux.ndim(),
            ));
        }
        if let SpectralAxisSpec::Values(values) = &coords {
            let expected = flux.shape()[spectral_axis_index];
            if values.shape()[0] != expected {
                return Err(Spectrum1DBuilderError::SpectralAxisLengthMismatch(
                    values.shape()[0],
                    expected,
                ));
            }
        }
        if let Some(uncertainty) = &self.uncertainty {
            if uncertainty.quantity().shape() != flux.shape() {
                return Err(Spectrum1DBuilderError::UncertaintyShapeMismatch(
                    uncertainty.quantity().shape().to_vec(),
                    flux.shape().to_vec(),
                ));
            }
        }
        if let Some(mask) = &self.mask {
            if mask.shape() != flux.shape() {
                return Err(Spectrum1DBuilderError::MaskShapeMismatch(
                    mask.shape().to_vec(),
                    flux.shape().to_vec(),
                ));
            }
        }
        Ok(Spectrum1D {
            flux,
            uncertainty: self.uncertainty.take(),
            mask: self.mask.take(),
            coords,
            spectral_axis_index,
            meta: self.meta.take().unwrap_or_default(),
        })
    }

    pub fn flux(&mut self, flux: Quantity) -> &mut Self {
        self.flux = Some(flux);
        self
    }
    pub fn uncertainty(&mut self, uncertainty: Uncertainty) -> &mut Self {
        self.uncertainty = Some(uncertainty);
        self
    }
    pub fn mask(&mut self, mask: ArrayD<bool>) -> &mut Self {
        self.mask = Some(mask);
        self
    }
    pub fn wcs(&mut self, wcs: CoordinateSystem) -> &mut Self {
        self.wcs = Some(wcs);
        self
    }
    pub fn spectral_axis(&mut self, spectral_axis: Quantity) -> &mut Self {
        self.spectral_axis = Some(spectral_axis);
        self
    }
    pub fn spectral_axis_index(&mut self, spectral_axis_index: usize) -> &mut Self {
        self.spectral_axis_index = Some(spectral_axis_index);
        self
    }
    pub fn meta(&mut self, meta: Meta) -> &mut Self {
        self.meta = Some(meta);
        self
    }
}

#[derive(Error, Debug)]
pub enum Spectrum1DBuilderError {
    #[error("Unitialized field on Spectrum1DBuilder: {0}")]
    UninitializedFieldError(String),
    #[error("a spectrum needs either a wcs or a spectral_axis")]
    MissingSpectralSpec,
    #[error("wcs and spectral_axis are mutually exclusive")]
    ConflictingSpectralSpec,
    #[error("spectral_axis must be 1-D, got {0} dimensions")]
    SpectralAxisNotOneDimensional(usize),
    #[error("spectral_axis_index {0} is out of range for {1}-dimensional flux")]
    InvalidSpectralAxisIndex(usize, usize),
    #[error("spectral_axis has {0} values but the spectral flux axis has {1}")]
    SpectralAxisLengthMismatch(usize, usize),
    #[error("uncertainty shape {0:?} does not match flux shape {1:?}")]
    UncertaintyShapeMismatch(Vec<usize>, Vec<usize>),
    #[error("mask shape {0:?} does not match flux shape {1:?}")]
    MaskShapeMismatch(Vec<usize>, Vec<usize>),
}

#[derive(Error, Debug)]
pub enum SpectrumError {
    #[error("unknown uncertainty type {0:?}, expected one of std, var, ivar")]
    UnknownUncertaintyType(String),
    #[error(transparent)]
    FitsWcsError(#[from] FitsWcsError),
}
