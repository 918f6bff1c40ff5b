//! Eight-band output of the Haralick texture filter

use texgis_core::raster::{Raster, RasterTile, Region};
use texgis_core::{Error, Mosaic, Result};

use super::haralick::{HaralickFeature, TextureDescriptors};

/// One `f64` band per [`HaralickFeature`], all covering the same region.
///
/// The caller owns the bands; filters only write the cells of the region
/// they were asked to process.
#[derive(Debug, Clone)]
pub struct TextureBands {
    region: Region,
    bands: Vec<RasterTile<f64>>,
}

impl TextureBands {
    /// Zero-filled bands covering `region`
    pub fn zeros(region: Region) -> Self {
        Self {
            region,
            bands: HaralickFeature::ALL
                .iter()
                .map(|_| RasterTile::zeros(region))
                .collect(),
        }
    }

    pub fn region(&self) -> Region {
        self.region
    }

    /// Band holding `feature`
    pub fn band(&self, feature: HaralickFeature) -> &RasterTile<f64> {
        &self.bands[feature.index()]
    }

    /// All descriptors at image coordinates (row, col)
    pub fn get(&self, row: usize, col: usize) -> Result<TextureDescriptors> {
        let mut values = [0.0; 8];
        for (value, band) in values.iter_mut().zip(&self.bands) {
            *value = band.get(row, col)?;
        }
        let [energy, entropy, correlation, inverse_difference_moment, inertia, cluster_shade, cluster_prominence, haralick_correlation] =
            values;
        Ok(TextureDescriptors {
            energy,
            entropy,
            correlation,
            inverse_difference_moment,
            inertia,
            cluster_shade,
            cluster_prominence,
            haralick_correlation,
        })
    }

    /// Write all descriptors at image coordinates (row, col)
    pub fn set(&mut self, row: usize, col: usize, descriptors: &TextureDescriptors) -> Result<()> {
        for (band, value) in self.bands.iter_mut().zip(descriptors.to_array()) {
            band.set(row, col, value)?;
        }
        Ok(())
    }

    /// Split into one raster per feature, in band order
    pub fn into_rasters(self) -> Vec<(HaralickFeature, Raster<f64>)> {
        HaralickFeature::ALL
            .into_iter()
            .zip(self.bands)
            .map(|(f, band)| (f, band.into_raster()))
            .collect()
    }
}

impl Mosaic for TextureBands {
    fn blank(region: Region) -> Self {
        Self::zeros(region)
    }

    fn region(&self) -> Region {
        self.region
    }

    fn paste(&mut self, tile: &Self) -> Result<()> {
        if !self.region.contains_region(&tile.region) {
            return Err(Error::RegionOutside {
                region: tile.region,
                extent: self.region,
            });
        }
        for (band, piece) in self.bands.iter_mut().zip(&tile.bands) {
            band.paste(piece)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn descriptors(base: f64) -> TextureDescriptors {
        TextureDescriptors {
            energy: base,
            entropy: base + 1.0,
            correlation: base + 2.0,
            inverse_difference_moment: base + 3.0,
            inertia: base + 4.0,
            cluster_shade: base + 5.0,
            cluster_prominence: base + 6.0,
            haralick_correlation: base + 7.0,
        }
    }

    #[test]
    fn test_set_get() {
        let mut bands = TextureBands::zeros(Region::new(4, 4, 2, 3));
        bands.set(5, 6, &descriptors(10.0)).unwrap();

        assert_eq!(bands.get(5, 6).unwrap(), descriptors(10.0));
        assert_eq!(bands.band(HaralickFeature::Inertia).get(5, 6).unwrap(), 14.0);
        assert_eq!(bands.get(4, 4).unwrap(), TextureDescriptors::default());
        assert!(bands.set(0, 0, &descriptors(1.0)).is_err());
    }

    #[test]
    fn test_paste_tiles() {
        let mut full = TextureBands::blank(Region::new(0, 0, 4, 4));
        let mut piece = TextureBands::zeros(Region::new(2, 0, 2, 4));
        piece.set(3, 3, &descriptors(1.0)).unwrap();
        full.paste(&piece).unwrap();

        assert_eq!(full.get(3, 3).unwrap(), descriptors(1.0));
        assert!(full.paste(&TextureBands::zeros(Region::new(3, 3, 2, 2))).is_err());
    }

    #[test]
    fn test_into_rasters() {
        let mut bands = TextureBands::zeros(Region::new(0, 0, 1, 1));
        bands.set(0, 0, &descriptors(0.0)).unwrap();
        let rasters = bands.into_rasters();

        assert_eq!(rasters.len(), 8);
        for (k, (feature, raster)) in rasters.iter().enumerate() {
            assert_eq!(feature.index(), k);
            assert_eq!(raster.get(0, 0).unwrap(), k as f64);
        }
    }
}
