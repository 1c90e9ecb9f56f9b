//! Stock evolution simulation
//!
//! There is no persisted inventory ledger: the daily stock curve is
//! reconstructed purely from purchase and sale flows. The balance starts at
//! zero on the day before the first purchase, and days with no flow keep the
//! prior day's balance.

use std::collections::{BTreeMap, BTreeSet};
use std::sync::Arc;

use chrono::NaiveDate;

use shared::{normalize_key, DateRange, PurchaseDetailRecord, SaleRecord, StockDayPoint, StockSeries, GLOBAL_SERIES};

use crate::coerce::parse_date_text;
use crate::config::EngineConfig;
use crate::error::{EngineError, EngineResult};

/// Stock evolution service
#[derive(Clone)]
pub struct StockEvolutionService {
    config: Arc<EngineConfig>,
}

impl StockEvolutionService {
    pub fn new(config: Arc<EngineConfig>) -> Self {
        Self { config }
    }

    /// Simulate the daily running stock of one base product.
    ///
    /// Returns the "GLOBAL" series plus one series per distinct point of
    /// sale observed in the product's sales, all over the same day range
    /// `[min(purchase dates), max(sale dates, day start)]`. Purchases are
    /// never attributable to a single point of sale in this data, so the
    /// purchase term is shared across every series; only the sale term is
    /// filtered.
    pub fn evolution(
        &self,
        base_product: &str,
        purchases: &[PurchaseDetailRecord],
        sales: &[SaleRecord],
    ) -> EngineResult<Vec<StockSeries>> {
        let product_key = normalize_key(base_product);

        // Details with an unresolved or unparseable date cannot anchor the
        // time axis and are left out of the simulation.
        let dated_purchases: Vec<(NaiveDate, i32)> = purchases
            .iter()
            .filter(|purchase| normalize_key(&purchase.base_product) == product_key)
            .filter_map(|purchase| {
                parse_date_text(&purchase.date)
                    .ok()
                    .map(|date| (date, purchase.quantity))
            })
            .collect();

        let day_start = dated_purchases
            .iter()
            .map(|(date, _)| *date)
            .min()
            .ok_or_else(|| EngineError::NoPurchases(product_key.clone()))?;

        let product_sales: Vec<&SaleRecord> = sales
            .iter()
            .filter(|sale| {
                normalize_key(&sale.base_product) == product_key
                    && !self.config.is_excluded_category(&sale.raw_category)
            })
            .collect();

        let day_end = product_sales
            .iter()
            .map(|sale| sale.date)
            .max()
            .map_or(day_start, |last_sale| last_sale.max(day_start));
        let range = DateRange {
            start: day_start,
            end: day_end,
        };

        let mut purchases_by_day: BTreeMap<NaiveDate, i32> = BTreeMap::new();
        for (date, quantity) in &dated_purchases {
            *purchases_by_day.entry(*date).or_insert(0) += quantity;
        }

        let mut series = vec![StockSeries {
            label: GLOBAL_SERIES.to_string(),
            points: simulate(range, &purchases_by_day, &sales_by_day(&product_sales)),
        }];

        // Per-point-of-sale series share the global day range; they are not
        // independently bounded.
        let points_of_sale: BTreeSet<String> = product_sales
            .iter()
            .map(|sale| self.config.resolve_point_of_sale(&sale.point_of_sale))
            .collect();

        for point_of_sale in points_of_sale {
            let daily_sales = sales_by_day_for(&product_sales, &point_of_sale, &self.config);
            series.push(StockSeries {
                label: point_of_sale,
                points: simulate(range, &purchases_by_day, &daily_sales),
            });
        }

        tracing::info!(
            product = %product_key,
            series = series.len(),
            days = (day_end - day_start).num_days() + 1,
            "stock evolution computed"
        );
        Ok(series)
    }
}

fn sales_by_day(sales: &[&SaleRecord]) -> BTreeMap<NaiveDate, i32> {
    let mut by_day: BTreeMap<NaiveDate, i32> = BTreeMap::new();
    for sale in sales {
        *by_day.entry(sale.date).or_insert(0) += sale.quantity;
    }
    by_day
}

fn sales_by_day_for(
    sales: &[&SaleRecord],
    point_of_sale: &str,
    config: &EngineConfig,
) -> BTreeMap<NaiveDate, i32> {
    let mut by_day: BTreeMap<NaiveDate, i32> = BTreeMap::new();
    for sale in sales {
        if config.resolve_point_of_sale(&sale.point_of_sale) == point_of_sale {
            *by_day.entry(sale.date).or_insert(0) += sale.quantity;
        }
    }
    by_day
}

/// Walk the inclusive day range maintaining the running balance: add the
/// day's summed purchases, subtract the day's summed sales, and emit a point
/// every day regardless of flow.
fn simulate(
    range: DateRange,
    purchases_by_day: &BTreeMap<NaiveDate, i32>,
    sales_by_day: &BTreeMap<NaiveDate, i32>,
) -> Vec<StockDayPoint> {
    let mut points = Vec::new();
    let mut balance = 0i32;
    let mut day = range.start;

    loop {
        balance += purchases_by_day.get(&day).copied().unwrap_or(0);
        balance -= sales_by_day.get(&day).copied().unwrap_or(0);
        points.push(StockDayPoint {
            date: day,
            running_stock: balance,
        });

        if day >= range.end {
            break;
        }
        match day.succ_opt() {
            Some(next) => day = next,
            None => break,
        }
    }

    points
}
