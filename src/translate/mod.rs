// specbridge/src/translate/mod.rs

pub use errors::TranslateError;

pub mod errors;

use crate::coords::{
    CoordinateSystem, GeneralWcs, PaddedSpectrumWcs, SpectralCoordinates,
};
use crate::data::{reduce_logical_all, Data, DataOrSubset, MetaValue, Statistic};
use crate::spectrum::{
    Quantity, SpectralAxisSpec, Spectrum1D, Spectrum1DBuilder, Uncertainty, UncertaintyKind,
};
use ndarray::{Array1, ArrayD, IxDyn};
use std::rc::Rc;

/// Packs a spectrum into a data container. Lossless: no collapse happens in
/// this direction and the input spectrum is not modified.
///
/// A spectrum may use a 1-D spectral WCS even for n-dimensional flux while
/// the container always needs the coordinate dimensionality to match, so a
/// 1-D spectral WCS on multi-dimensional flux is wrapped in a
/// `PaddedSpectrumWcs` sized to the flux.
pub fn to_data(obj: &Spectrum1D) -> Result<Data, TranslateError> {
    let coords = match obj.coords() {
        SpectralAxisSpec::Wcs(CoordinateSystem::Spectral(wcs)) if obj.flux().ndim() > 1 => {
            CoordinateSystem::Padded(PaddedSpectrumWcs::new(
                Rc::new(wcs.clone()),
                obj.flux().ndim(),
                obj.spectral_axis_index(),
            ))
        }
        SpectralAxisSpec::Wcs(wcs) => wcs.clone(),
        SpectralAxisSpec::Values(values) => {
            CoordinateSystem::SpectralCoordinates(SpectralCoordinates::new(
                Array1::from_iter(values.values().iter().cloned()),
                values.unit(),
            ))
        }
    };

    let mut data = Data::new(Some(coords));

    data.add_component("flux", obj.flux().values().clone(), obj.unit())?;

    if let Some(uncertainty) = obj.uncertainty() {
        data.add_component(
            "uncertainty",
            uncertainty.quantity().values().clone(),
            uncertainty.unit(),
        )?;
        data.meta_mut().insert(
            "uncertainty_type".to_string(),
            uncertainty.kind().as_str().into(),
        );
    }

    if let Some(mask) = obj.mask() {
        data.add_component("mask", mask.mapv(|m| if m { 1. } else { 0. }), "")?;
    }

    // Log which is the spectral axis, then merge the spectrum's own
    // metadata. Spectrum keys win on duplicates because they are applied
    // last.
    data.meta_mut().insert(
        "spectral_axis_index".to_string(),
        (obj.spectral_axis_index() as i64).into(),
    );
    for (key, value) in obj.meta() {
        data.meta_mut().insert(key.clone(), value.clone());
    }

    Ok(data)
}

/// Converts a data container, or a subset of one, back into a spectrum.
///
/// `attribute` selects the component used as the flux; when absent, a
/// single component is used as-is, and a container holding components
/// literally named `flux`/`uncertainty` reconstructs both at once. That
/// name sniffing is a pragmatic convention, not a structural guarantee;
/// the explicit selector is the canonical API.
///
/// `statistic` collapses multi-dimensional values to a 1-D profile along
/// all non-spectral axes. It is ignored for data with fewer than two
/// dimensions, which has nothing to collapse.
pub fn to_object<'a, D>(
    data_or_subset: D,
    attribute: Option<&str>,
    statistic: Option<Statistic>,
) -> Result<Spectrum1D, TranslateError>
where
    D: Into<DataOrSubset<'a>>,
{
    let (data, subset_state) = match data_or_subset.into() {
        DataOrSubset::Data(data) => (data, None),
        DataOrSubset::Subset(subset) => (subset.data(), Some(subset.state())),
    };

    let mut statistic = statistic;
    if data.ndim() < 2 {
        statistic = None;
    }

    let mut collapse_axes: Vec<usize> = Vec::new();
    let spectral_spec = match (statistic, data.coords()) {
        (None, Some(coords)) if coords.supports_high_level() => match coords {
            CoordinateSystem::Padded(padded) => SpectralAxisSpec::Wcs(
                CoordinateSystem::Spectral(padded.spectral_wcs().as_ref().clone()),
            ),
            other => SpectralAxisSpec::Wcs(other.clone()),
        },
        (Some(_), coords) => {
            let spectral_axis_index = data
                .meta()
                .get("spectral_axis_index")
                .and_then(MetaValue::as_int)
                .ok_or(TranslateError::MissingSpectralAxisIndex)?
                as usize;
            collapse_axes = (0..data.ndim())
                .filter(|axis| *axis != spectral_axis_index)
                .collect();
            match coords {
                Some(CoordinateSystem::Padded(padded)) => SpectralAxisSpec::Wcs(
                    CoordinateSystem::Spectral(padded.spectral_wcs().as_ref().clone()),
                ),
                Some(CoordinateSystem::Fits(fits)) => {
                    SpectralAxisSpec::Wcs(CoordinateSystem::Spectral(fits.sub_spectral()?))
                }
                Some(CoordinateSystem::Generalized(general)) => {
                    // A generalized WCS may tie the spectral solution to the
                    // spatial position, in which case the flux would need to
                    // be resampled onto a common spectral axis before
                    // collapsing.
                    if has_homogeneous_spectral_solution(data, general, spectral_axis_index) {
                        let spectral =
                            evaluate_spectral_path(data, general, spectral_axis_index);
                        SpectralAxisSpec::Values(spectral)
                    } else {
                        log::warn!(
                            "Spectral solution is not the same at all spatial points, \
                             collapsing may give inaccurate results."
                        );
                        SpectralAxisSpec::Wcs(CoordinateSystem::Generalized(general.clone()))
                    }
                }
                other => {
                    return Err(TranslateError::StatisticRequiresWcs(kind_name(other)));
                }
            }
        }
        (None, Some(CoordinateSystem::SpectralCoordinates(coords))) => {
            SpectralAxisSpec::Values(Quantity::new(
                coords.values().clone().into_dyn(),
                coords.unit(),
            ))
        }
        (None, other) => {
            return Err(TranslateError::UnsupportedCoordinates(kind_name(other)));
        }
    };

    let attributes = resolve_attributes(data, attribute)?;

    let mut builder = Spectrum1DBuilder::default();
    let mut out_mask: Option<ArrayD<bool>> = None;

    for id in attributes {
        let component = data.get_component(id)?;

        // Excluded-element mask, inverted from the subset's membership
        // convention to the spectrum's masked-out convention.
        let mask = match subset_state {
            Some(state) => Some(data.get_mask(state)?.mapv(|included| !included)),
            None => None,
        };

        let (values, mask) = match statistic {
            Some(statistic) if data.ndim() > 1 => {
                let values =
                    data.compute_statistic(statistic, id, &collapse_axes, subset_state)?;
                // An element of the profile stays masked only if it was
                // masked at every collapsed position.
                let mask = mask.map(|m| reduce_logical_all(&m, &collapse_axes));
                (values, mask)
            }
            _ => (data.get_data(id)?.clone(), mask),
        };

        let quantity = Quantity::new(values, component.unit());

        if component.label() == "uncertainty" {
            let kind = match data.meta().get("uncertainty_type").and_then(MetaValue::as_str) {
                Some(name) => UncertaintyKind::parse(name)?,
                None => UncertaintyKind::Std,
            };
            builder.uncertainty(Uncertainty::new(kind, quantity));
        } else {
            // Anything not labelled flux or uncertainty is treated as flux.
            builder.flux(quantity);
        }

        out_mask = mask;
    }

    if let Some(mask) = out_mask {
        builder.mask(mask);
    }

    match spectral_spec {
        SpectralAxisSpec::Wcs(wcs) => builder.wcs(wcs),
        SpectralAxisSpec::Values(values) => builder.spectral_axis(values),
    };

    if statistic.is_none() && data.ndim() > 1 {
        if let Some(index) = data
            .meta()
            .get("spectral_axis_index")
            .and_then(MetaValue::as_int)
        {
            builder.spectral_axis_index(index as usize);
        }
    }

    builder.meta(data.meta().clone());

    Ok(builder.build()?)
}

fn kind_name(coords: Option<&CoordinateSystem>) -> &'static str {
    coords.map(|c| c.kind().as_str()).unwrap_or("no")
}

fn resolve_attributes(
    data: &Data,
    attribute: Option<&str>,
) -> Result<Vec<crate::data::ComponentId>, TranslateError> {
    if let Some(label) = attribute {
        let id = data
            .component_id(label)
            .ok_or_else(|| TranslateError::UnknownAttribute(label.to_string()))?;
        return Ok(vec![id]);
    }
    let main = data.main_component_ids();
    if main.is_empty() {
        return Err(TranslateError::NoAttributes);
    }
    if main.len() == 1 {
        return Ok(main);
    }
    // If no specific attribute is selected, attempt to retrieve the flux
    // and uncertainty, if available.
    let pair: Vec<_> = ["flux", "uncertainty"]
        .iter()
        .filter_map(|label| data.component_id(label))
        .collect();
    if pair.is_empty() {
        return Err(TranslateError::AmbiguousAttribute);
    }
    Ok(pair)
}

/// Checks whether a generalized WCS gives the same spectral solution at
/// every spatial point, by sampling it at the four corners of a rectangle
/// spanning the extremes of the spectral and non-spectral axes. A sampling
/// heuristic, not an exhaustive proof.
fn has_homogeneous_spectral_solution(
    data: &Data,
    wcs: &GeneralWcs,
    spectral_axis_index: usize,
) -> bool {
    let ndim = data.ndim();
    let shape = data.shape();

    let mut corners: Vec<ArrayD<f64>> = vec![ArrayD::zeros(IxDyn(&[4])); ndim];
    for axis in 0..ndim {
        if axis == spectral_axis_index {
            continue;
        }
        corners[axis][[1]] = (shape[axis] - 1) as f64;
        corners[axis][[3]] = (shape[axis] - 1) as f64;
    }
    corners[spectral_axis_index][[2]] = (shape[spectral_axis_index] - 1) as f64;
    corners[spectral_axis_index][[3]] = (shape[spectral_axis_index] - 1) as f64;

    let world = wcs.pixel_to_world_values(&corners);
    let spectral = &world[wcs.spectral_world_axis()];

    is_close(spectral[[0]], spectral[[1]]) && is_close(spectral[[2]], spectral[[3]])
}

fn is_close(a: f64, b: f64) -> bool {
    (a - b).abs() <= 1e-8 + 1e-5 * b.abs()
}

/// Evaluates a generalized WCS at a pixel path that varies only along the
/// spectral axis, every other coordinate held at zero, and returns the
/// spectral world output as an explicit axis-value array.
fn evaluate_spectral_path(
    data: &Data,
    wcs: &GeneralWcs,
    spectral_axis_index: usize,
) -> Quantity {
    let n = data.shape()[spectral_axis_index];
    let mut args = vec![ArrayD::zeros(IxDyn(&[n])); wcs.pixel_n_dim()];
    args[spectral_axis_index] = Array1::from_iter((0..n).map(|i| i as f64)).into_dyn();
    let world = wcs.pixel_to_world_values(&args);
    Quantity::new(
        world[wcs.spectral_world_axis()].clone(),
        wcs.spectral_unit().unwrap_or(""),
    )
}
