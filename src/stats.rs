//! Summary statistics for a scalar field.

/// Min/max/mean and a fixed-bin histogram over `[min, max]`.
#[derive(Clone, Debug, PartialEq)]
pub struct FieldStats {
    pub min: f64,
    pub max: f64,
    pub mean: f64,
    pub total: f64,
    /// Cells holding a value below zero
    pub negative_cells: usize,
    pub histogram: Vec<usize>,
}

impl FieldStats {
    pub fn from_values(values: &[f64], bins: usize) -> Self {
        let bins = bins.max(1);
        if values.is_empty() {
            return Self {
                min: 0.0,
                max: 0.0,
                mean: 0.0,
                total: 0.0,
                negative_cells: 0,
                histogram: vec![0; bins],
            };
        }

        let mut min = f64::MAX;
        let mut max = f64::MIN;
        let mut total = 0.0;
        let mut negative_cells = 0;
        for &v in values {
            min = min.min(v);
            max = max.max(v);
            if v < 0.0 {
                negative_cells += 1;
            }
            total += v;
        }

        let mut histogram = vec![0; bins];
        let span = max - min;
        for &v in values {
            let bin = if span > 0.0 {
                (((v - min) / span) * bins as f64) as usize
            } else {
                0
            };
            histogram[bin.min(bins - 1)] += 1;
        }

        Self {
            min,
            max,
            mean: total / values.len() as f64,
            total,
            negative_cells,
            histogram,
        }
    }

    /// Text bar chart, one line per bin, bars scaled to `width` characters.
    pub fn histogram_lines(&self, width: usize) -> Vec<String> {
        let peak = self.histogram.iter().copied().max().unwrap_or(0).max(1);
        let bin_width = (self.max - self.min) / self.histogram.len() as f64;
        self.histogram
            .iter()
            .enumerate()
            .map(|(i, &count)| {
                let lower = self.min + bin_width * i as f64;
                let bar = "#".repeat(count * width / peak);
                format!("{:>8.3} | {:<w$} {}", lower, bar, count, w = width)
            })
            .collect()
    }
}
