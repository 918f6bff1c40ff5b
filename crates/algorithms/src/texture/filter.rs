//! Sliding-window Haralick texture filter

use serde::{Deserialize, Serialize};
use texgis_core::raster::{PixelSource, Radius, Raster, RasterElement, Region, Window};
use texgis_core::{Algorithm, Error, Result, WindowedFilter};
use tracing::debug;

use crate::maybe_rayon::*;

use super::bands::TextureBands;
use super::cooccurrence::{CooccurrenceBuilder, Offset};
use super::haralick::{haralick_coefficients, TextureDescriptors};
use super::histogram::ValueRange;

/// Parameters for the Haralick texture filter
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TextureParams {
    /// Window half-width per axis (window size = 2*radius + 1)
    pub radius: Radius,
    /// Displacement between the two pixels of a pair
    pub offset: Offset,
    /// Number of quantization bins per histogram axis
    pub bins_per_axis: usize,
    /// Value mapped to the bottom of the first bin
    pub input_min: f64,
    /// Value mapped to the top of the last bin
    pub input_max: f64,
}

impl Default for TextureParams {
    fn default() -> Self {
        Self {
            radius: Radius::square(3),
            offset: Offset::new(1, 0),
            bins_per_axis: 8,
            input_min: 0.0,
            input_max: 255.0,
        }
    }
}

impl TextureParams {
    /// Same parameters with the quantization range taken from `range`
    pub fn with_range(self, range: ValueRange) -> Self {
        Self {
            input_min: range.min(),
            input_max: range.max(),
            ..self
        }
    }
}

pub(crate) fn validate_radius(radius: Radius) -> Result<()> {
    if radius.min() == 0 {
        return Err(Error::invalid_parameter(
            "radius",
            format!("{}x{}", radius.rows, radius.cols),
            "window radius must be >= 1 along both axes",
        ));
    }
    if radius.size().is_none() {
        return Err(Error::invalid_parameter(
            "radius",
            format!("{}x{}", radius.rows, radius.cols),
            "window size 2 * radius + 1 overflows usize",
        ));
    }
    Ok(())
}

/// Computes the eight Haralick descriptors over a sliding window.
///
/// For every output cell the window of `radius` around it is clipped to
/// the input extent, its co-occurrence histogram is built for the
/// configured offset and reduced to a [`TextureDescriptors`].
///
/// The filter holds no per-pixel state: any partition of the output into
/// regions gives the same result as one call over the whole extent.
#[derive(Debug, Clone)]
pub struct TextureWindowFilter {
    params: TextureParams,
    builder: CooccurrenceBuilder,
}

impl TextureWindowFilter {
    /// Validate `params` and build the filter.
    ///
    /// Fails with [`Error::InvalidParameter`] for a zero radius, zero bins,
    /// a zero offset or `input_min >= input_max`.
    pub fn new(params: TextureParams) -> Result<Self> {
        validate_radius(params.radius)?;
        let range = ValueRange::new(params.input_min, params.input_max)?;
        let builder = CooccurrenceBuilder::new(params.offset, range, params.bins_per_axis)?;

        debug!(
            radius = ?params.radius,
            offset = %params.offset,
            bins = params.bins_per_axis,
            "configured Haralick texture filter"
        );
        Ok(Self { params, builder })
    }

    pub fn params(&self) -> &TextureParams {
        &self.params
    }

    pub fn offset(&self) -> Offset {
        self.params.offset
    }

    /// Descriptors of the window centred at (row, col)
    pub fn descriptors_at<T, S>(&self, input: &S, row: usize, col: usize) -> TextureDescriptors
    where
        T: RasterElement,
        S: PixelSource<T> + ?Sized,
    {
        let window = Window::clipped(row, col, self.params.radius, input.extent());
        haralick_coefficients(&self.builder.build(input, &window))
    }

    /// Compute `region` and write it into `output`.
    ///
    /// `input` must hold at least the cells of `region` padded by the
    /// radius (clipped to the image); cells of `output` outside `region`
    /// are left untouched.
    pub fn process<T, S>(&self, input: &S, region: Region, output: &mut TextureBands) -> Result<()>
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
        debug!(%region, cells = region.len(), "computing Haralick textures");

        let (col_start, col_end) = (region.col, region.col_end());
        let values: Vec<TextureDescriptors> = (region.row..region.row_end())
            .into_par_iter()
            .flat_map(|row| {
                (col_start..col_end)
                    .map(|col| self.descriptors_at(input, row, col))
                    .collect::<Vec<_>>()
            })
            .collect();

        for ((row, col), d) in region.indices().zip(&values) {
            output.set(row, col, d)?;
        }
        Ok(())
    }

    /// Compute `region` into freshly allocated bands
    pub fn process_region<T, S>(&self, input: &S, region: Region) -> Result<TextureBands>
    where
        T: RasterElement,
        S: PixelSource<T>,
    {
        let mut output = TextureBands::zeros(region);
        self.process(input, region, &mut output)?;
        Ok(output)
    }

    /// Compute every cell of the input extent
    pub fn compute<T, S>(&self, input: &S) -> Result<TextureBands>
    where
        T: RasterElement,
        S: PixelSource<T>,
    {
        self.process_region(input, input.extent())
    }
}

impl<T: RasterElement> WindowedFilter<T> for TextureWindowFilter {
    type Output = TextureBands;

    fn radius(&self) -> Radius {
        self.params.radius
    }

    fn process_region<S: PixelSource<T>>(&self, input: &S, region: Region) -> Result<TextureBands> {
        TextureWindowFilter::process_region(self, input, region)
    }
}

/// Compute the eight Haralick texture bands of a raster.
///
/// # Arguments
/// * `raster` - Input raster (any numeric cell type, quantized internally)
/// * `params` - Window radius, offset, bins and quantization range
pub fn haralick_textures<T: RasterElement>(
    raster: &Raster<T>,
    params: TextureParams,
) -> Result<TextureBands> {
    TextureWindowFilter::new(params)?.compute(raster)
}

/// Haralick texture algorithm
#[derive(Debug, Clone, Default)]
pub struct HaralickTextures;

impl Algorithm for HaralickTextures {
    type Input = Raster<f64>;
    type Output = TextureBands;
    type Params = TextureParams;
    type Error = Error;

    fn name(&self) -> &'static str {
        "Haralick Textures"
    }

    fn description(&self) -> &'static str {
        "Compute eight GLCM (Haralick) texture descriptors over a sliding window"
    }

    fn execute(&self, input: Self::Input, params: Self::Params) -> Result<Self::Output> {
        haralick_textures(&input, params)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::texture::HaralickFeature;
    use approx::assert_relative_eq;

    fn checkerboard(size: usize) -> Raster<f64> {
        let mut r = Raster::new(size, size);
        for row in 0..size {
            for col in 0..size {
                let v = if (row + col) % 2 == 0 { 0.0 } else { 10.0 };
                r.set(row, col, v).unwrap();
            }
        }
        r
    }

    fn gradient_raster(size: usize) -> Raster<u16> {
        let mut r = Raster::new(size, size);
        for row in 0..size {
            for col in 0..size {
                r.set(row, col, (row * size + col) as u16).unwrap();
            }
        }
        r
    }

    #[test]
    fn test_invalid_parameters() {
        let bad = [
            TextureParams { radius: Radius::square(0), ..Default::default() },
            TextureParams { radius: Radius::new(2, 0), ..Default::default() },
            TextureParams { bins_per_axis: 0, ..Default::default() },
            TextureParams { input_min: 10.0, input_max: 10.0, ..Default::default() },
            TextureParams { input_min: 20.0, input_max: 10.0, ..Default::default() },
            TextureParams { offset: Offset::new(0, 0), ..Default::default() },
            TextureParams { radius: Radius::square(usize::MAX), ..Default::default() },
            TextureParams { radius: Radius::new(1, usize::MAX / 2 + 1), ..Default::default() },
        ];
        for params in bad {
            let err = TextureWindowFilter::new(params).unwrap_err();
            assert!(matches!(err, Error::InvalidParameter { .. }), "{:?}", params);
        }
    }

    #[test]
    fn test_largest_valid_radius_covers_image() {
        // Window clipped to the whole 4x4 image for every cell
        let r = gradient_raster(4);
        let filter = TextureWindowFilter::new(TextureParams {
            radius: Radius::square(usize::MAX / 2),
            input_max: 16.0,
            ..Default::default()
        })
        .unwrap();

        let d = filter.descriptors_at(&r, 1, 1);
        assert_eq!(d, filter.descriptors_at(&r, 3, 0));
        assert!(d.inertia > 0.0);
    }

    #[test]
    fn test_checkerboard_scenario() {
        let r = checkerboard(3);
        let filter = TextureWindowFilter::new(TextureParams {
            radius: Radius::square(1),
            offset: Offset::new(1, 0),
            bins_per_axis: 2,
            input_min: 0.0,
            input_max: 10.0,
        })
        .unwrap();

        let d = filter.descriptors_at(&r, 1, 1);
        assert_relative_eq!(d.energy, 0.5, epsilon = 1e-12);
        assert_relative_eq!(d.entropy, 1.0, epsilon = 1e-12);
        assert_relative_eq!(d.inertia, 1.0, epsilon = 1e-12);
        assert_relative_eq!(d.inverse_difference_moment, 0.5, epsilon = 1e-12);
    }

    #[test]
    fn test_constant_raster() {
        let r: Raster<f64> = Raster::filled(7, 7, 120.0);
        let bands = haralick_textures(&r, TextureParams {
            radius: Radius::square(1),
            offset: Offset::new(1, 1),
            ..Default::default()
        })
        .unwrap();

        for (row, col) in [(0, 0), (3, 3), (6, 2)] {
            let d = bands.get(row, col).unwrap();
            assert_relative_eq!(d.energy, 1.0);
            assert_relative_eq!(d.entropy, 0.0);
            assert_relative_eq!(d.inertia, 0.0);
            assert_relative_eq!(d.inverse_difference_moment, 1.0);
            assert_relative_eq!(d.cluster_shade, 0.0);
            assert_relative_eq!(d.cluster_prominence, 0.0);
            assert_eq!(d.correlation, 0.0);
            assert_eq!(d.haralick_correlation, 0.0);
        }
    }

    #[test]
    fn test_single_pixel_raster() {
        let r: Raster<u8> = Raster::filled(1, 1, 9);
        let bands = haralick_textures(&r, TextureParams::default()).unwrap();
        assert_eq!(bands.get(0, 0).unwrap(), TextureDescriptors::default());
    }

    #[test]
    fn test_region_outside_input_is_zero() {
        let r = gradient_raster(8);
        let filter = TextureWindowFilter::new(TextureParams {
            input_max: 64.0,
            ..Default::default()
        })
        .unwrap();

        let far = Region::new(100, 100, 2, 2);
        let bands = filter.process_region(&r, far).unwrap();
        for (row, col) in far.indices() {
            assert_eq!(bands.get(row, col).unwrap(), TextureDescriptors::default());
        }
    }

    #[test]
    fn test_process_leaves_other_cells() {
        let r = gradient_raster(10);
        let filter = TextureWindowFilter::new(TextureParams {
            radius: Radius::square(2),
            bins_per_axis: 16,
            input_max: 100.0,
            ..Default::default()
        })
        .unwrap();

        let mut out = TextureBands::zeros(r.extent());
        filter.process(&r, Region::new(4, 4, 2, 2), &mut out).unwrap();

        assert!(out.band(HaralickFeature::Entropy).get(4, 4).unwrap() > 0.0);
        assert_eq!(out.get(0, 0).unwrap(), TextureDescriptors::default());
        assert!(filter.process(&r, Region::new(9, 9, 2, 2), &mut out).is_err());
    }

    #[test]
    fn test_gradient_has_contrast() {
        let r = gradient_raster(20);
        let bands = haralick_textures(&r, TextureParams {
            radius: Radius::square(2),
            bins_per_axis: 16,
            input_max: 400.0,
            offset: Offset::new(0, 1),
            ..Default::default()
        })
        .unwrap();

        let d = bands.get(10, 10).unwrap();
        assert!(d.inertia > 0.0, "Gradient should have contrast > 0, got {}", d.inertia);
        assert!(d.correlation > 0.0, "Gradient should be correlated, got {}", d.correlation);
    }

    #[test]
    fn test_params_from_partial_json() {
        let params: TextureParams =
            serde_json::from_str(r#"{ "radius": { "rows": 2, "cols": 4 }, "bins_per_axis": 32 }"#)
                .unwrap();
        assert_eq!(params.radius, Radius::new(2, 4));
        assert_eq!(params.bins_per_axis, 32);
        assert_eq!(params.offset, Offset::new(1, 0));
        assert_eq!(params.input_max, 255.0);
    }

    #[test]
    fn test_algorithm_trait() {
        let algo = HaralickTextures;
        let bands = algo.execute(checkerboard(5), TextureParams {
            radius: Radius::square(1),
            bins_per_axis: 2,
            input_max: 10.0,
            ..Default::default()
        })
        .unwrap();
        assert_eq!(bands.region(), Region::from_shape((5, 5)));
        assert_eq!(algo.name(), "Haralick Textures");
    }
}
