//! Line plots drawn with box-drawing characters.

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PlotConfig {
    /// Number of rows used when the data is not constant.
    pub height: usize,
    /// Number of points the data is resampled to. `0` keeps the data as is.
    pub width: usize,
    /// Decimal places of the axis labels.
    pub precision: usize,
}

impl PlotConfig {
    pub fn new(height: usize, width: usize) -> Self {
        Self {
            height,
            width,
            precision: 2,
        }
    }
}

/// Draws `data` as a line plot with a labelled axis on the left.
///
/// Empty input gives an empty string. Constant input collapses to one row.
pub fn plot(data: &[f64], config: &PlotConfig) -> String {
    if data.is_empty() {
        return String::new();
    }
    let data = if config.width > 0 && data.len() != config.width {
        resample(data, config.width)
    } else {
        data.to_vec()
    };

    let (min, max) = data
        .iter()
        .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), &v| {
            (lo.min(v), hi.max(v))
        });
    let interval = max - min;
    let rows = if interval > 0.0 {
        config.height.max(2)
    } else {
        1
    };
    let level = |v: f64| -> usize {
        if rows == 1 {
            0
        } else {
            ((v - min) / interval * (rows - 1) as f64).round() as usize
        }
    };
    let row_of = |level: usize| rows - 1 - level;

    let columns = data.len().saturating_sub(1).max(1);
    let mut grid = vec![vec![' '; columns]; rows];
    if data.len() == 1 {
        grid[row_of(level(data[0]))][0] = '─';
    }
    for (x, pair) in data.windows(2).enumerate() {
        let (y0, y1) = (level(pair[0]), level(pair[1]));
        if y0 == y1 {
            grid[row_of(y0)][x] = '─';
            continue;
        }
        if y0 > y1 {
            grid[row_of(y1)][x] = '╰';
            grid[row_of(y0)][x] = '╮';
        } else {
            grid[row_of(y1)][x] = '╭';
            grid[row_of(y0)][x] = '╯';
        }
        for y in y0.min(y1) + 1..y0.max(y1) {
            grid[row_of(y)][x] = '│';
        }
    }

    let labels: Vec<String> = (0..rows)
        .map(|row| {
            let value = if rows == 1 {
                min
            } else {
                min + interval * (rows - 1 - row) as f64 / (rows - 1) as f64
            };
            format!("{:.*}", config.precision, value)
        })
        .collect();
    let label_width = labels.iter().map(String::len).max().unwrap_or(0);
    let first_row = row_of(level(data[0]));

    grid.iter()
        .zip(labels.iter())
        .enumerate()
        .map(|(row, (cells, label))| {
            let axis = if row == first_row { '┼' } else { '┤' };
            let cells: String = cells.iter().collect();
            format!("{label:>label_width$} {axis}{cells}")
                .trim_end()
                .to_string()
        })
        .collect::<Vec<_>>()
        .join("\n")
}

/// Linear interpolation of `data` onto `width` evenly spaced points.
fn resample(data: &[f64], width: usize) -> Vec<f64> {
    if data.len() == 1 || width == 1 {
        return vec![data[0]; width];
    }
    let step = (data.len() - 1) as f64 / (width - 1) as f64;
    (0..width)
        .map(|i| {
            let pos = i as f64 * step;
            let lo = (pos.floor() as usize).min(data.len() - 1);
            let hi = (lo + 1).min(data.len() - 1);
            let frac = pos - lo as f64;
            data[lo] + (data[hi] - data[lo]) * frac
        })
        .collect()
}
