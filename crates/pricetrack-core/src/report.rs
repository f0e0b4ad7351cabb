//! Price series for reports: one series per (product, volume), batched the
//! way charts are laid out.

use chrono::NaiveDate;

use crate::products::Product;

#[derive(Debug, Clone, PartialEq)]
pub struct PriceSeries {
    /// `"{search name} {volume}"`, or just the search name when the
    /// observations have no size.
    pub label: String,
    pub points: Vec<(NaiveDate, f64)>,
}

/// Groups every observed price into series, keeping catalog order and,
/// within a product, the order in which volumes first appear.
///
/// Observations without an observed amount are skipped; products with no
/// observed amount produce no series.
#[must_use]
pub fn price_series(products: &[Product]) -> Vec<PriceSeries> {
    let mut series = Vec::new();

    for product in products {
        let search_name = product.search_name();
        let mut per_volume: Vec<(Option<u32>, Vec<(NaiveDate, f64)>)> = Vec::new();

        for price in &product.prices {
            let Some(amount) = price.price.amount() else {
                continue;
            };
            match per_volume.iter_mut().find(|(v, _)| *v == price.volume) {
                Some((_, points)) => points.push((price.date, amount)),
                None => per_volume.push((price.volume, vec![(price.date, amount)])),
            }
        }

        series.extend(per_volume.into_iter().map(|(volume, points)| PriceSeries {
            label: match volume {
                Some(v) => format!("{search_name} {v}"),
                None => search_name.clone(),
            },
            points,
        }));
    }

    series
}

/// Splits `series` into chart-sized batches of at most `per_chart` entries.
/// A `per_chart` of zero is treated as one.
#[must_use]
pub fn chart_batches(series: &[PriceSeries], per_chart: usize) -> Vec<&[PriceSeries]> {
    series.chunks(per_chart.max(1)).collect()
}
