//! Plot-ready data returned alongside every estimate.
//!
//! The core never draws. A renderer receives ordered x/y arrays, a class per
//! point (inside or outside the reported region) and up to three markers.

use serde::Serialize;

use crate::OutcomeHistogram;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SeriesKind {
    /// Sampled probability density curve.
    Density,
    /// Relative-frequency bars, one per observed outcome.
    Histogram,
    /// Single point carrying all the probability mass.
    PointMass,
}

/// Whether a point lies in the region the estimate reports: inside the
/// interval, or on the surviving side of the durability threshold.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum PointClass {
    Inside,
    Outside,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum MarkerKind {
    Lower,
    Mean,
    Upper,
    Median,
    Peak,
    Mode,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Marker {
    pub kind: MarkerKind,
    #[serde(serialize_with = "crate::serde_float::serialize")]
    pub x: f64,
    pub y: f64,
}

/// One flattened row, as written to CSV.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct SeriesRow {
    pub x: f64,
    pub y: f64,
    pub class: PointClass,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DisplaySeries {
    pub kind: SeriesKind,
    pub x: Vec<f64>,
    pub y: Vec<f64>,
    pub classes: Vec<PointClass>,
    pub markers: Vec<Marker>,
}

impl DisplaySeries {
    pub(crate) fn new(kind: SeriesKind) -> Self {
        Self {
            kind,
            x: Vec::new(),
            y: Vec::new(),
            classes: Vec::new(),
            markers: Vec::new(),
        }
    }

    /// Sample `density` at every x, classifying each point with `classify`.
    pub(crate) fn sampled(
        xs: Vec<f64>,
        density: impl Fn(f64) -> f64,
        classify: impl Fn(f64) -> PointClass,
    ) -> Self {
        let y = xs.iter().map(|&x| density(x)).collect();
        let classes = xs.iter().map(|&x| classify(x)).collect();
        Self {
            kind: SeriesKind::Density,
            x: xs,
            y,
            classes,
            markers: Vec::new(),
        }
    }

    pub(crate) fn point_mass(x: f64, class: PointClass) -> Self {
        let mut series = Self::new(SeriesKind::PointMass);
        series.push(x, 1.0, class);
        series
    }

    /// Relative-frequency bars for `histogram`, classified per outcome.
    pub(crate) fn bars(histogram: &OutcomeHistogram, classify: impl Fn(u64) -> PointClass) -> Self {
        let mut series = Self::new(SeriesKind::Histogram);
        for (outcome, freq) in histogram.relative_frequencies() {
            series.push(outcome as f64, freq, classify(outcome));
        }
        series
    }

    pub(crate) fn push(&mut self, x: f64, y: f64, class: PointClass) {
        self.x.push(x);
        self.y.push(y);
        self.classes.push(class);
    }

    pub(crate) fn mark(&mut self, kind: MarkerKind, x: f64, y: f64) {
        self.markers.push(Marker { kind, x, y });
    }

    pub fn len(&self) -> usize {
        self.x.len()
    }

    pub fn is_empty(&self) -> bool {
        self.x.is_empty()
    }

    pub fn marker(&self, kind: MarkerKind) -> Option<&Marker> {
        self.markers.iter().find(|marker| marker.kind == kind)
    }

    pub fn rows(&self) -> impl Iterator<Item = SeriesRow> + '_ {
        self.x
            .iter()
            .zip(&self.y)
            .zip(&self.classes)
            .map(|((&x, &y), &class)| SeriesRow { x, y, class })
    }

    /// Sum of y over points classified inside. For histogram bars this is the
    /// relative frequency of the reported region.
    pub fn inside_mass(&self) -> f64 {
        self.rows()
            .filter(|row| row.class == PointClass::Inside)
            .map(|row| row.y)
            .sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sampled_keeps_arrays_aligned() {
        let series = DisplaySeries::sampled(
            vec![0.0, 1.0, 2.0],
            |x| x * 2.0,
            |x| if x < 1.5 { PointClass::Inside } else { PointClass::Outside },
        );
        assert_eq!(series.kind, SeriesKind::Density);
        assert_eq!(series.len(), 3);
        assert_eq!(series.y.len(), series.classes.len());
        assert_eq!(series.classes[2], PointClass::Outside);
        assert!((series.y[2] - 4.0).abs() < 1e-12);
    }

    #[test]
    fn bars_follow_histogram_order() {
        let histogram: OutcomeHistogram = [3, 1, 1, 2].into_iter().collect();
        let series = DisplaySeries::bars(&histogram, |outcome| {
            if outcome <= 2 {
                PointClass::Inside
            } else {
                PointClass::Outside
            }
        });
        assert_eq!(series.x, vec![1.0, 2.0, 3.0]);
        assert!((series.inside_mass() - 0.75).abs() < 1e-12);
    }

    #[test]
    fn marker_lookup_by_kind() {
        let mut series = DisplaySeries::point_mass(5.0, PointClass::Inside);
        series.mark(MarkerKind::Peak, 5.0, 1.0);
        assert!(series.marker(MarkerKind::Peak).is_some());
        assert!(series.marker(MarkerKind::Median).is_none());
    }

    #[test]
    fn serializes_snake_case_tags() {
        let mut series = DisplaySeries::point_mass(2.0, PointClass::Outside);
        series.mark(MarkerKind::Mode, 2.0, 1.0);
        let json = serde_json::to_value(&series).unwrap();
        assert_eq!(json["kind"], "point_mass");
        assert_eq!(json["classes"][0], "outside");
        assert_eq!(json["markers"][0]["kind"], "mode");
    }
}
