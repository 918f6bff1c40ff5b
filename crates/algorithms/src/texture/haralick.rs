//! Haralick texture coefficients of a co-occurrence histogram
//!
//! With `g(i, j)` the normalized histogram, `μ = Σ i·g(i, j)` and
//! `σ² = Σ (i − μ)²·g(i, j)`:
//!
//! | feature | formula |
//! |---------|---------|
//! | Energy | `Σ g²` |
//! | Entropy | `−Σ g·log2 g` |
//! | Correlation | `Σ (i − μ)(j − μ)·g / σ²` |
//! | Inverse difference moment | `Σ g / (1 + (i − j)²)` |
//! | Inertia (contrast) | `Σ (i − j)²·g` |
//! | Cluster shade | `Σ ((i − μ) + (j − μ))³·g` |
//! | Cluster prominence | `Σ ((i − μ) + (j − μ))⁴·g` |
//! | Haralick correlation | `(Σ i·j·g − μt²) / σt²` |
//!
//! `μt` and `σt²` are the mean and variance of the marginal distribution
//! `t(i) = Σ_j g(i, j)`. Ratios with a zero denominator are 0, so an empty
//! histogram gives 0 for every feature.

use serde::{Deserialize, Serialize};
use std::fmt;

use super::histogram::Histogram;

/// Variances below this are treated as zero
const VARIANCE_EPSILON: f64 = 1e-15;

/// The eight Haralick descriptors, in output band order
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum HaralickFeature {
    /// Angular second moment — uniformity
    Energy,
    /// Randomness of the gray-level pairs
    Entropy,
    /// Linear dependency of gray levels
    Correlation,
    /// Homogeneity
    InverseDifferenceMoment,
    /// Contrast — local intensity variation
    Inertia,
    /// Skewness of the pair distribution
    ClusterShade,
    /// Tailedness of the pair distribution
    ClusterProminence,
    /// Correlation from marginal statistics
    HaralickCorrelation,
}

impl HaralickFeature {
    /// All features, in band order
    pub const ALL: [HaralickFeature; 8] = [
        HaralickFeature::Energy,
        HaralickFeature::Entropy,
        HaralickFeature::Correlation,
        HaralickFeature::InverseDifferenceMoment,
        HaralickFeature::Inertia,
        HaralickFeature::ClusterShade,
        HaralickFeature::ClusterProminence,
        HaralickFeature::HaralickCorrelation,
    ];

    /// Band index of this feature
    pub fn index(self) -> usize {
        self as usize
    }

    pub fn name(self) -> &'static str {
        match self {
            HaralickFeature::Energy => "energy",
            HaralickFeature::Entropy => "entropy",
            HaralickFeature::Correlation => "correlation",
            HaralickFeature::InverseDifferenceMoment => "inverse_difference_moment",
            HaralickFeature::Inertia => "inertia",
            HaralickFeature::ClusterShade => "cluster_shade",
            HaralickFeature::ClusterProminence => "cluster_prominence",
            HaralickFeature::HaralickCorrelation => "haralick_correlation",
        }
    }
}

impl fmt::Display for HaralickFeature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// The eight descriptors computed for one pixel
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct TextureDescriptors {
    pub energy: f64,
    pub entropy: f64,
    pub correlation: f64,
    pub inverse_difference_moment: f64,
    pub inertia: f64,
    pub cluster_shade: f64,
    pub cluster_prominence: f64,
    pub haralick_correlation: f64,
}

impl TextureDescriptors {
    pub fn get(&self, feature: HaralickFeature) -> f64 {
        match feature {
            HaralickFeature::Energy => self.energy,
            HaralickFeature::Entropy => self.entropy,
            HaralickFeature::Correlation => self.correlation,
            HaralickFeature::InverseDifferenceMoment => self.inverse_difference_moment,
            HaralickFeature::Inertia => self.inertia,
            HaralickFeature::ClusterShade => self.cluster_shade,
            HaralickFeature::ClusterProminence => self.cluster_prominence,
            HaralickFeature::HaralickCorrelation => self.haralick_correlation,
        }
    }

    /// Values in band order
    pub fn to_array(&self) -> [f64; 8] {
        HaralickFeature::ALL.map(|f| self.get(f))
    }
}

/// Compute all eight Haralick descriptors of `histogram`
///
/// The histogram is symmetric, so `haralick_correlation` equals
/// `correlation` up to rounding.
pub fn haralick_coefficients(histogram: &Histogram) -> TextureDescriptors {
    if histogram.is_empty() {
        return TextureDescriptors::default();
    }

    let g = histogram.cells();

    // Weighted pixel mean; the same along j by symmetry
    let mut mean = 0.0;
    for ((i, _), &p) in g.indexed_iter() {
        mean += i as f64 * p;
    }

    let mut variance = 0.0;
    let mut energy = 0.0;
    let mut entropy = 0.0;
    let mut covariance = 0.0;
    let mut idm = 0.0;
    let mut inertia = 0.0;
    let mut shade = 0.0;
    let mut prominence = 0.0;
    let mut ij_moment = 0.0;

    for ((i, j), &p) in g.indexed_iter() {
        if p == 0.0 {
            continue;
        }
        let (fi, fj) = (i as f64, j as f64);
        let (di, dj) = (fi - mean, fj - mean);
        let diff_sq = (fi - fj) * (fi - fj);
        let cluster = di + dj;

        variance += di * di * p;
        energy += p * p;
        entropy -= p * p.log2();
        covariance += di * dj * p;
        idm += p / (1.0 + diff_sq);
        inertia += diff_sq * p;
        shade += cluster.powi(3) * p;
        prominence += cluster.powi(4) * p;
        ij_moment += fi * fj * p;
    }

    let correlation = if variance < VARIANCE_EPSILON {
        0.0
    } else {
        covariance / variance
    };

    // Marginal mean and variance
    let marginal = histogram.marginal();
    let mut marginal_mean = 0.0;
    for (i, &t) in marginal.iter().enumerate() {
        marginal_mean += i as f64 * t;
    }
    let mut marginal_variance = 0.0;
    for (i, &t) in marginal.iter().enumerate() {
        marginal_variance += (i as f64 - marginal_mean).powi(2) * t;
    }

    let haralick_correlation = if marginal_variance < VARIANCE_EPSILON {
        0.0
    } else {
        (ij_moment - marginal_mean * marginal_mean) / marginal_variance
    };

    TextureDescriptors {
        energy,
        entropy,
        correlation,
        inverse_difference_moment: idm,
        inertia,
        cluster_shade: shade,
        cluster_prominence: prominence,
        haralick_correlation,
    }
}

/// Inertia (contrast) alone, `Σ (i − j)²·g(i, j)`
pub fn inertia(histogram: &Histogram) -> f64 {
    histogram
        .iter_nonzero()
        .map(|(i, j, p)| {
            let d = i as f64 - j as f64;
            d * d * p
        })
        .sum()
}
