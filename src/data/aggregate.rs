//! Group-by averages, frequency counts and the least-squares fit behind the
//! dashboard charts.
//!
//! Every function is pure over the rows it is given. Missing values are
//! skipped the way a data-frame skips NaN: a group whose values are all
//! missing still appears, with a NaN mean and a zero `count`. A row with a
//! missing group key belongs to no group.

use std::collections::BTreeMap;

use chrono::Datelike;

use super::model::{Observation, Variable};

// ---------------------------------------------------------------------------
// Grouped means
// ---------------------------------------------------------------------------

/// Mean of one group. `count` is the number of non-missing values averaged.
#[derive(Debug, Clone, PartialEq)]
pub struct GroupMean<K> {
    pub key: K,
    pub mean: f64,
    pub count: usize,
}

fn group_means<'a, K, I, FK, FV>(rows: I, key: FK, value: FV) -> Vec<GroupMean<K>>
where
    K: Ord,
    I: IntoIterator<Item = &'a Observation>,
    FK: Fn(&Observation) -> Option<K>,
    FV: Fn(&Observation) -> Option<f64>,
{
    let mut groups: BTreeMap<K, (f64, usize)> = BTreeMap::new();
    for obs in rows {
        let Some(k) = key(obs) else { continue };
        let (sum, count) = groups.entry(k).or_insert((0.0, 0));
        if let Some(v) = value(obs) {
            *sum += v;
            *count += 1;
        }
    }

    groups
        .into_iter()
        .map(|(key, (sum, count))| GroupMean {
            key,
            mean: if count == 0 { f64::NAN } else { sum / count as f64 },
            count,
        })
        .collect()
}

/// Mean PM2.5 per `Season`, for the seasons present, ordered by season name.
pub fn seasonal_mean_pm25<'a, I>(rows: I) -> Vec<GroupMean<String>>
where
    I: IntoIterator<Item = &'a Observation>,
{
    group_means(rows, |o| o.season.clone(), |o| Variable::Pm25.value(o))
}

/// Mean `Air_Quality_Numeric` per calendar year, ascending by year.
pub fn yearly_mean_aq_numeric<'a, I>(rows: I) -> Vec<GroupMean<i32>>
where
    I: IntoIterator<Item = &'a Observation>,
{
    group_means(
        rows,
        |o| Some(o.datetime.year()),
        |o| o.aq_numeric.filter(|v| !v.is_nan()),
    )
}

// ---------------------------------------------------------------------------
// Category frequencies
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CategoryCount {
    pub category: String,
    pub count: usize,
}

/// Frequency of each `Air_Quality_Category`, in order of first appearance.
/// Rows without a category are not counted.
pub fn category_counts<'a, I>(rows: I) -> Vec<CategoryCount>
where
    I: IntoIterator<Item = &'a Observation>,
{
    let mut counts: Vec<CategoryCount> = Vec::new();
    for category in rows.into_iter().filter_map(|o| o.category.as_deref()) {
        match counts.iter_mut().find(|c| c.category == category) {
            Some(c) => c.count += 1,
            None => counts.push(CategoryCount {
                category: category.to_string(),
                count: 1,
            }),
        }
    }
    counts
}

// ---------------------------------------------------------------------------
// Correlation
// ---------------------------------------------------------------------------

/// The `(x, y)` column pair for rows where both values are present.
pub fn xy_pairs<'a, I>(rows: I, x: Variable, y: Variable) -> Vec<[f64; 2]>
where
    I: IntoIterator<Item = &'a Observation>,
{
    rows.into_iter()
        .filter_map(|o| Some([x.value(o)?, y.value(o)?]))
        .collect()
}

/// Ordinary least-squares line `y = slope * x + intercept`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LinearFit {
    pub slope: f64,
    pub intercept: f64,
    /// Pearson correlation; `None` when y has no variance.
    pub r: Option<f64>,
}

impl LinearFit {
    pub fn predict(&self, x: f64) -> f64 {
        self.slope * x + self.intercept
    }
}

/// Fit a regression line through `points`.
///
/// Returns `None` for fewer than two points or when every x is identical;
/// the chart then shows the scatter without a line.
pub fn linear_fit(points: &[[f64; 2]]) -> Option<LinearFit> {
    if points.len() < 2 {
        return None;
    }
    let n = points.len() as f64;
    let mean_x = points.iter().map(|p| p[0]).sum::<f64>() / n;
    let mean_y = points.iter().map(|p| p[1]).sum::<f64>() / n;

    let (mut sxx, mut sxy, mut syy) = (0.0, 0.0, 0.0);
    for [x, y] in points {
        let dx = x - mean_x;
        let dy = y - mean_y;
        sxx += dx * dx;
        sxy += dx * dy;
        syy += dy * dy;
    }
    if sxx <= 0.0 || !sxx.is_finite() {
        return None;
    }

    let slope = sxy / sxx;
    let r = (syy > 0.0).then(|| sxy / (sxx * syy).sqrt());
    Some(LinearFit {
        slope,
        intercept: mean_y - slope * mean_x,
        r,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::fixtures::{mixed_dataset, obs, station_rows};

    fn close(a: f64, b: f64) -> bool {
        (a - b).abs() < 1e-9
    }

    #[test]
    fn seasonal_means_for_two_seasons() {
        let rows = vec![
            obs("Guanyuan", "2013-04-01", "spring", Some(10.0), "Good"),
            obs("Guanyuan", "2013-05-01", "spring", Some(20.0), "Good"),
            obs("Guanyuan", "2014-01-01", "winter", Some(30.0), "Moderate"),
        ];
        let means = seasonal_mean_pm25(&rows);

        assert_eq!(means.len(), 2);
        assert_eq!(means[0].key, "spring");
        assert!(close(means[0].mean, 15.0));
        assert_eq!(means[0].count, 2);
        assert_eq!(means[1].key, "winter");
        assert!(close(means[1].mean, 30.0));
    }

    #[test]
    fn seasonal_means_are_consistent_with_total() {
        let ds = mixed_dataset();
        let rows = station_rows(&ds, "Guanyuan");
        let means = seasonal_mean_pm25(rows.iter().copied());

        let weighted: f64 = means.iter().map(|g| g.mean * g.count as f64).sum();
        let total: f64 = rows.iter().filter_map(|o| o.pm25).sum();
        assert!(close(weighted, total));

        // Each group mean is the plain mean over that station+season.
        for g in &means {
            let vals: Vec<f64> = rows
                .iter()
                .filter(|o| o.season.as_deref() == Some(g.key.as_str()))
                .filter_map(|o| o.pm25)
                .collect();
            assert!(close(g.mean, vals.iter().sum::<f64>() / vals.len() as f64));
        }
    }

    #[test]
    fn missing_values_are_skipped_but_group_is_kept() {
        let rows = vec![
            obs("Tiantan", "2013-07-01", "Summer", Some(40.0), "Good"),
            obs("Tiantan", "2013-07-02", "Summer", None, "Good"),
            obs("Tiantan", "2013-10-01", "Autumn", None, "Good"),
        ];
        let means = seasonal_mean_pm25(&rows);

        assert_eq!(means.len(), 2);
        assert_eq!(means[0].key, "Autumn");
        assert!(means[0].mean.is_nan());
        assert_eq!(means[0].count, 0);
        assert!(close(means[1].mean, 40.0));
        assert_eq!(means[1].count, 1);
    }

    #[test]
    fn rows_without_labels_are_left_out_of_groups() {
        let rows = vec![
            obs("Tiantan", "2013-04-01", "Spring", Some(10.0), "Good"),
            obs("Tiantan", "2013-04-02", "", Some(50.0), ""),
            obs("Tiantan", "2013-04-03", "NA", Some(70.0), "NA"),
        ];

        let means = seasonal_mean_pm25(&rows);
        assert_eq!(means.len(), 1);
        assert_eq!(means[0].key, "Spring");
        assert!(close(means[0].mean, 10.0));

        let counts = category_counts(&rows);
        assert_eq!(
            counts,
            vec![CategoryCount {
                category: "Good".to_string(),
                count: 1
            }]
        );

        // The year grouping does not depend on the labels.
        assert_eq!(yearly_mean_aq_numeric(&rows).len(), 1);
    }

    #[test]
    fn yearly_means_one_entry_per_year_ascending() {
        let ds = mixed_dataset();
        // Feed rows in reverse to make sure ordering is not inherited.
        let rows: Vec<_> = station_rows(&ds, "Guanyuan").into_iter().rev().collect();
        let yearly = yearly_mean_aq_numeric(rows.iter().copied());

        let years: Vec<i32> = yearly.iter().map(|g| g.key).collect();
        assert_eq!(years, vec![2013, 2014]);
        assert!(years.windows(2).all(|w| w[0] < w[1]));
        assert!(close(yearly[0].mean, 1.5));
        assert!(close(yearly[1].mean, 2.5));
    }

    #[test]
    fn empty_input_gives_empty_aggregates() {
        let rows: Vec<&Observation> = Vec::new();
        assert!(seasonal_mean_pm25(rows.iter().copied()).is_empty());
        assert!(yearly_mean_aq_numeric(rows.iter().copied()).is_empty());
        assert!(category_counts(rows.iter().copied()).is_empty());
        assert!(xy_pairs(rows.iter().copied(), Variable::Dewp, Variable::Pm25).is_empty());
        assert_eq!(linear_fit(&[]), None);
    }

    #[test]
    fn category_counts_in_first_appearance_order() {
        let rows = vec![
            obs("Dingling", "2013-04-01", "Spring", None, "Moderate"),
            obs("Dingling", "2013-04-02", "Spring", None, "Good"),
            obs("Dingling", "2013-04-03", "Spring", None, "Moderate"),
            obs("Dingling", "2013-04-04", "Spring", None, "Hazardous"),
        ];
        let counts = category_counts(&rows);
        let flat: Vec<(&str, usize)> = counts
            .iter()
            .map(|c| (c.category.as_str(), c.count))
            .collect();
        assert_eq!(flat, vec![("Moderate", 2), ("Good", 1), ("Hazardous", 1)]);
    }

    #[test]
    fn xy_pairs_skip_rows_missing_either_value() {
        let mut a = obs("Tiantan", "2013-04-01", "Spring", Some(12.0), "Good");
        a.dewp = Some(-1.0);
        let mut b = obs("Tiantan", "2013-04-02", "Spring", None, "Good");
        b.dewp = Some(2.0);
        let c = obs("Tiantan", "2013-04-03", "Spring", Some(9.0), "Good");

        let rows = [a, b, c];
        assert_eq!(
            xy_pairs(&rows, Variable::Dewp, Variable::Pm25),
            vec![[-1.0, 12.0]]
        );
    }

    #[test]
    fn linear_fit_recovers_exact_line() {
        let points: Vec<[f64; 2]> = (0..5).map(|i| [i as f64, 2.0 * i as f64 + 1.0]).collect();
        let fit = linear_fit(&points).expect("fit");
        assert!(close(fit.slope, 2.0));
        assert!(close(fit.intercept, 1.0));
        assert!(close(fit.r.unwrap(), 1.0));
        assert!(close(fit.predict(10.0), 21.0));
    }

    #[test]
    fn linear_fit_negative_correlation() {
        let points = [[0.0, 3.0], [1.0, 1.0], [2.0, 0.0], [3.0, -2.0]];
        let fit = linear_fit(&points).unwrap();
        assert!(fit.slope < 0.0);
        assert!(fit.r.unwrap() < -0.9);
    }

    #[test]
    fn degenerate_fits_give_no_line() {
        assert_eq!(linear_fit(&[[1.0, 2.0]]), None);
        assert_eq!(linear_fit(&[[1.0, 2.0], [1.0, 5.0]]), None);

        let flat = linear_fit(&[[0.0, 4.0], [1.0, 4.0]]).unwrap();
        assert!(close(flat.slope, 0.0));
        assert_eq!(flat.r, None);
    }
}
