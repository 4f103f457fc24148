use crate::error::Result;
use crate::models::MetricsResult;
use crate::plot::{plot, PlotConfig};
use crate::timeutils::format_rfc3339;
use itertools::Itertools;
use std::io::Write;
use tracing::debug;

pub const PLOT_HEIGHT: usize = 20;
pub const PLOT_WIDTH: usize = 100;

pub const NO_METRICS_NOTICE: &str =
    "Currently there are no metrics available. Please try it again later.";

/// Writes one header and plot per series, in name order.
///
/// The first series without samples prints [`NO_METRICS_NOTICE`] and ends the
/// whole rendering; later series are not shown even if they have data.
pub fn render_series<W: Write>(
    resource_name: &str,
    result: &MetricsResult,
    out: &mut W,
) -> Result<()> {
    let config = PlotConfig::new(PLOT_HEIGHT, PLOT_WIDTH);
    let start = format_rfc3339(result.window.start);
    let end = format_rfc3339(result.window.end);

    for name in result.series.keys().sorted() {
        let series = &result.series[name];
        if series.is_empty() {
            debug!(series = %name, "series has no samples, stopping");
            writeln!(out, "{NO_METRICS_NOTICE}")?;
            return Ok(());
        }
        writeln!(
            out,
            "Load Balancer: {resource_name} \t Metric: {name} \t Start: {start} \t End: {end}"
        )?;
        let graph = plot(&series.numeric_values(), &config);
        writeln!(out, "{graph}")?;
        writeln!(out)?;
    }
    Ok(())
}
