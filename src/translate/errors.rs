// specbridge/src/translate/errors.rs

use crate::coords::fits::FitsWcsError;
use crate::data::DataError;
use crate::spectrum::{Spectrum1DBuilderError, SpectrumError};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum TranslateError {
    #[error(
        "can only use a statistic if the data has a FITS WCS, generalized WCS or \
         padded spectral WCS, got {0} coordinates"
    )]
    StatisticRequiresWcs(&'static str),
    #[error("data coordinates should be a WCS or a spectral coordinate list, got {0}")]
    UnsupportedCoordinates(&'static str),
    #[error("data object has no attributes")]
    NoAttributes,
    #[error(
        "data object has more than one attribute, so you will need to specify which \
         one to use as the flux for the spectrum using the attribute argument"
    )]
    AmbiguousAttribute,
    #[error("data object has no attribute labelled {0:?}")]
    UnknownAttribute(String),
    #[error("data metadata is missing an integer spectral_axis_index entry")]
    MissingSpectralAxisIndex,
    #[error(transparent)]
    Data(#[from] DataError),
    #[error(transparent)]
    Spectrum(#[from] SpectrumError),
    #[error(transparent)]
    SpectrumBuilder(#[from] Spectrum1DBuilderError),
    #[error(transparent)]
    FitsWcs(#[from] FitsWcsError),
}
