pub mod geo_scatter;
pub mod histogram;
pub mod ranking;
pub mod spec;
pub mod violin;

pub use geo_scatter::{GeoMarker, GeoScatterRenderer, GeoScatterSpec, GeoSeries, GeographicBounds};
pub use histogram::{HistogramRenderer, HistogramSeries, HistogramSpec};
pub use ranking::{top_n, RankingBar, RankingBarSpec, RankingRenderer};
pub use spec::{ChartLayout, ChartSpec};
pub use violin::{BoxSummary, DensityCurve, ViolinRenderer, ViolinSeries, ViolinSpec};

use serde::Serialize;
use tracing::debug;

use crate::config::DashboardConfig;
use crate::models::{Dataset, Pollutant};

/// The four chart descriptions derived from one working subset
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DashboardCharts {
    pub distribution: HistogramSpec,
    pub pollutant: ViolinSpec,
    pub map: GeoScatterSpec,
    pub ranking: RankingBarSpec,
}

impl DashboardCharts {
    /// Render every chart. With `parallel_charts` the renderers run on the
    /// rayon pool; they only read the subset.
    pub fn render(subset: &Dataset, pollutant: Pollutant, config: &DashboardConfig) -> Self {
        let histogram = HistogramRenderer::from_config(config);
        let violin = ViolinRenderer::from_config(config);
        let geo = GeoScatterRenderer::from_config(config);
        let ranking = RankingRenderer::from_config(config);

        let charts = if config.parallel_charts {
            let ((distribution, pollutant), (map, ranking)) = rayon::join(
                || {
                    rayon::join(
                        || histogram.render(subset),
                        || violin.render(subset, pollutant),
                    )
                },
                || rayon::join(|| geo.render(subset), || ranking.render(subset)),
            );
            Self {
                distribution,
                pollutant,
                map,
                ranking,
            }
        } else {
            Self {
                distribution: histogram.render(subset),
                pollutant: violin.render(subset, pollutant),
                map: geo.render(subset),
                ranking: ranking.render(subset),
            }
        };

        debug!(parallel = config.parallel_charts, "Rendered dashboard charts");
        charts
    }

    /// Charts in display order, as tagged specs
    pub fn to_specs(&self) -> Vec<ChartSpec> {
        vec![
            ChartSpec::Histogram(self.distribution.clone()),
            ChartSpec::Violin(self.pollutant.clone()),
            ChartSpec::GeoScatter(self.map.clone()),
            ChartSpec::RankingBar(self.ranking.clone()),
        ]
    }
}
