//! PanTex built-up presence index
//!
//! Minimum GLCM contrast over eight directions (Pesaresi, Gerhardinger &
//! Kayitakire, 2008). Built-up areas show contrast in every direction;
//! natural textures are anisotropic, so the directional minimum suppresses
//! them.

use serde::{Deserialize, Serialize};
use texgis_core::raster::{PixelSource, Radius, Raster, RasterElement, RasterTile, Region, Window};
use texgis_core::{Algorithm, Error, Result, WindowedFilter};
use tracing::debug;

use crate::maybe_rayon::*;

use super::cooccurrence::{CooccurrenceBuilder, Offset};
use super::filter::validate_radius;
use super::haralick::inertia;
use super::histogram::ValueRange;

/// Parameters for the PanTex filter
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PanTexParams {
    /// Window half-width per axis
    pub radius: Radius,
    /// Number of quantization bins per histogram axis
    pub bins_per_axis: usize,
    /// Value mapped to the bottom of the first bin
    pub input_min: f64,
    /// Value mapped to the top of the last bin
    pub input_max: f64,
}

impl Default for PanTexParams {
    fn default() -> Self {
        Self {
            radius: Radius::square(3),
            bins_per_axis: 8,
            input_min: 0.0,
            input_max: 255.0,
        }
    }
}

impl PanTexParams {
    /// Same parameters with the quantization range taken from `range`
    pub fn with_range(self, range: ValueRange) -> Self {
        Self {
            input_min: range.min(),
            input_max: range.max(),
            ..self
        }
    }
}

/// Minimum inertia over the eight [`Offset::COMPASS`] directions.
#[derive(Debug, Clone)]
pub struct PanTexFilter {
    params: PanTexParams,
    builders: Vec<CooccurrenceBuilder>,
}

impl PanTexFilter {
    /// Validate `params` and build the filter.
    ///
    /// Fails with [`Error::InvalidParameter`] for a zero radius, zero bins
    /// or `input_min >= input_max`.
    pub fn new(params: PanTexParams) -> Result<Self> {
        validate_radius(params.radius)?;
        let range = ValueRange::new(params.input_min, params.input_max)?;
        let builders = Offset::COMPASS
            .iter()
            .map(|&offset| CooccurrenceBuilder::new(offset, range, params.bins_per_axis))
            .collect::<Result<Vec<_>>>()?;

        debug!(radius = ?params.radius, bins = params.bins_per_axis, "configured PanTex filter");
        Ok(Self { params, builders })
    }

    pub fn params(&self) -> &PanTexParams {
        &self.params
    }

    /// The eight directions, in the order they are evaluated
    pub fn offsets(&self) -> impl Iterator<Item = Offset> + '_ {
        self.builders.iter().map(|b| b.offset())
    }

    /// Inertia of the window at (row, col) for each direction
    pub fn directional_contrast<T, S>(&self, input: &S, row: usize, col: usize) -> [f64; 8]
    where
        T: RasterElement,
        S: PixelSource<T> + ?Sized,
    {
        let window = Window::clipped(row, col, self.params.radius, input.extent());
        let mut contrast = [0.0; 8];
        for (value, builder) in contrast.iter_mut().zip(&self.builders) {
            *value = inertia(&builder.build(input, &window));
        }
        contrast
    }

    /// PanTex value of the window at (row, col)
    pub fn value_at<T, S>(&self, input: &S, row: usize, col: usize) -> f64
    where
        T: RasterElement,
        S: PixelSource<T> + ?Sized,
    {
        self.directional_contrast(input, row, col)
            .into_iter()
            .fold(f64::INFINITY, f64::min)
    }

    /// Compute `region` and write it into `output`, leaving other cells alone
    pub fn process<T, S>(&self, input: &S, region: Region, output: &mut RasterTile<f64>) -> Result<()>
    where
        T: RasterElement,
        S: PixelSource<T>,
    {
        if !output.region().contains_region(&region) {
            return Err(Error::RegionOutside {
                region,
                extent: output.region(),
            });
        }
        debug!(%region, cells = region.len(), "computing PanTex");

        let (col_start, col_end) = (region.col, region.col_end());
        let values: Vec<f64> = (region.row..region.row_end())
            .into_par_iter()
            .flat_map(|row| {
                (col_start..col_end)
                    .map(|col| self.value_at(input, row, col))
                    .collect::<Vec<_>>()
            })
            .collect();

        for ((row, col), v) in region.indices().zip(values) {
            output.set(row, col, v)?;
        }
        Ok(())
    }

    /// Compute `region` into a freshly allocated band
    pub fn process_region<T, S>(&self, input: &S, region: Region) -> Result<RasterTile<f64>>
    where
        T: RasterElement,
        S: PixelSource<T>,
    {
        let mut output = RasterTile::zeros(region);
        self.process(input, region, &mut output)?;
        Ok(output)
    }

    /// Compute every cell of the input extent
    pub fn compute<T, S>(&self, input: &S) -> Result<RasterTile<f64>>
    where
        T: RasterElement,
        S: PixelSource<T>,
    {
        self.process_region(input, input.extent())
    }
}

impl<T: RasterElement> WindowedFilter<T> for PanTexFilter {
    type Output = RasterTile<f64>;

    fn radius(&self) -> Radius {
        self.params.radius
    }

    fn process_region<S: PixelSource<T>>(&self, input: &S, region: Region) -> Result<RasterTile<f64>> {
        PanTexFilter::process_region(self, input, region)
    }
}

/// Compute the PanTex index of a raster.
///
/// The output keeps the input's transform.
pub fn pantex<T: RasterElement>(raster: &Raster<T>, params: PanTexParams) -> Result<Raster<f64>> {
    let band = PanTexFilter::new(params)?.compute(raster)?;

    let (rows, cols) = raster.shape();
    let mut output = raster.with_same_meta::<f64>(rows, cols);
    *output.data_mut() = band.into_raster().into_array();
    Ok(output)
}

/// PanTex algorithm
#[derive(Debug, Clone, Default)]
pub struct PanTex;

impl Algorithm for PanTex {
    type Input = Raster<f64>;
    type Output = Raster<f64>;
    type Params = PanTexParams;
    type Error = Error;

    fn name(&self) -> &'static str {
        "PanTex"
    }

    fn description(&self) -> &'static str {
        "Built-up presence index: minimum GLCM contrast over eight directions"
    }

    fn execute(&self, input: Self::Input, params: Self::Params) -> Result<Self::Output> {
        pantex(&input, params)
    }
}
