pub use general::{GeneralWcs, GeneralWcsError};
pub use padded::PaddedSpectrumWcs;
pub use spectral::{SpectralWcs, SpectralWcsBuilder, SpectralWcsBuilderError};
pub use spectral_coordinates::SpectralCoordinates;

pub mod fits;
pub mod general;
pub mod padded;
pub mod spectral;
pub mod spectral_coordinates;

use fits::FitsWcs;

/// Maps a spectral UCD physical type to the human-readable axis name used
/// for world axis labelling.
pub fn ucd_to_spectral_name(ucd: &str) -> Option<&'static str> {
    match ucd {
        "em.freq" => Some("Frequency"),
        "em.energy" => Some("Energy"),
        "em.wavenumber" => Some("Wavenumber"),
        "em.wl" => Some("Wavelength"),
        "spect.dopplerVeloc.radio" => Some("Velocity"),
        "spect.dopplerVeloc.opt" => Some("Velocity"),
        "spect.dopplerVeloc" => Some("Velocity"),
        "src.redshift" => Some("Redshift"),
        "custom:spect.doplerVeloc.beta" => Some("Beta"),
        _ => None,
    }
}

pub fn is_spectral_ucd(ucd: &str) -> bool {
    ucd_to_spectral_name(ucd).is_some()
}

/// Discriminator for the closed set of coordinate-system kinds the
/// translator knows how to reconcile.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum CoordinateKind {
    Spectral,
    Fits,
    Generalized,
    Padded,
    SpectralCoordinates,
}

impl CoordinateKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            CoordinateKind::Spectral => "spectral",
            CoordinateKind::Fits => "fits",
            CoordinateKind::Generalized => "generalized",
            CoordinateKind::Padded => "padded",
            CoordinateKind::SpectralCoordinates => "spectral-coordinates",
        }
    }
}

#[derive(Clone, Debug)]
pub enum CoordinateSystem {
    Spectral(SpectralWcs),
    Fits(FitsWcs),
    Generalized(GeneralWcs),
    Padded(PaddedSpectrumWcs),
    SpectralCoordinates(SpectralCoordinates),
}

impl CoordinateSystem {
    pub fn kind(&self) -> CoordinateKind {
        match self {
            CoordinateSystem::Spectral(_) => CoordinateKind::Spectral,
            CoordinateSystem::Fits(_) => CoordinateKind::Fits,
            CoordinateSystem::Generalized(_) => CoordinateKind::Generalized,
            CoordinateSystem::Padded(_) => CoordinateKind::Padded,
            CoordinateSystem::SpectralCoordinates(_) => CoordinateKind::SpectralCoordinates,
        }
    }

    /// Whether the system offers the full pixel/world interface. A bare
    /// spectral coordinate list carries world values but no transform.
    pub fn supports_high_level(&self) -> bool {
        !matches!(self, CoordinateSystem::SpectralCoordinates(_))
    }

    pub fn world_n_dim(&self) -> usize {
        match self {
            CoordinateSystem::Spectral(_) => 1,
            CoordinateSystem::Fits(wcs) => wcs.naxis(),
            CoordinateSystem::Generalized(wcs) => wcs.world_n_dim(),
            CoordinateSystem::Padded(wcs) => wcs.world_n_dim(),
            CoordinateSystem::SpectralCoordinates(_) => 1,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ucd_to_spectral_name() {
        assert_eq!(ucd_to_spectral_name("em.wl"), Some("Wavelength"));
        assert_eq!(ucd_to_spectral_name("em.freq"), Some("Frequency"));
        assert_eq!(ucd_to_spectral_name("spect.dopplerVeloc.opt"), Some("Velocity"));
        assert_eq!(ucd_to_spectral_name("pos.eq.ra"), None);
        assert!(is_spectral_ucd("src.redshift"));
        assert!(!is_spectral_ucd("pos.eq.dec"));
    }
}
