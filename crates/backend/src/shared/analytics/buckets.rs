use chrono::{Datelike, NaiveDate};
use contracts::dashboards::d201_product_drilldown::SeriesBlock;
use contracts::enums::SalesChannel;
use std::collections::HashMap;

/// Time-bucket granularity, selected from the range length alone.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Granularity {
    Day,
    Week,
    Month,
    Quarter,
    Year,
}

impl Granularity {
    /// Pure function of the inclusive range length in days.
    pub fn for_range(start: NaiveDate, end: NaiveDate) -> Granularity {
        let days = (end - start).num_days();
        if days <= 30 {
            Granularity::Day
        } else if days <= 90 {
            Granularity::Week
        } else if days <= 912 {
            Granularity::Month
        } else if days <= 1825 {
            Granularity::Quarter
        } else {
            Granularity::Year
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Granularity::Day => "day",
            Granularity::Week => "week",
            Granularity::Month => "month",
            Granularity::Quarter => "quarter",
            Granularity::Year => "year",
        }
    }
}

/// Bucket label for one calendar date. Enumeration below reuses this
/// same function, so a timestamp can never map to a label that is
/// missing from the enumerated sequence.
pub fn label_for(date: NaiveDate, granularity: Granularity) -> String {
    match granularity {
        Granularity::Day => date.format("%Y-%m-%d").to_string(),
        Granularity::Week => {
            let iso = date.iso_week();
            format!("{}-W{:02}", iso.year(), iso.week())
        }
        Granularity::Month => format!("{:04}-{:02}", date.year(), date.month()),
        Granularity::Quarter => {
            format!("{}-Q{}", date.year(), date.month0() / 3 + 1)
        }
        Granularity::Year => date.year().to_string(),
    }
}

/// Every bucket label in the inclusive range, in order, including
/// partial boundary buckets. Walks each calendar day and collapses
/// consecutive duplicates; labels are monotone over days, so this is a
/// complete, gap-free enumeration.
pub fn enumerate_labels(start: NaiveDate, end: NaiveDate, granularity: Granularity) -> Vec<String> {
    let mut labels = Vec::new();
    let mut day = start;
    while day <= end {
        let label = label_for(day, granularity);
        if labels.last() != Some(&label) {
            labels.push(label);
        }
        day = match day.succ_opt() {
            Some(d) => d,
            None => break,
        };
    }
    labels
}

/// round(amount / quantity), half away from zero; 0 when quantity is 0.
/// Never divides by zero.
pub fn average_price(amount: f64, quantity: i64) -> i64 {
    if quantity > 0 {
        (amount / quantity as f64).round() as i64
    } else {
        0
    }
}

#[derive(Debug, Clone, Copy, Default)]
struct Slot {
    quantity: i64,
    amount: f64,
}

/// Zero-filled per-bucket accumulators for one curve: an overall series
/// plus one series per named channel. Buckets with no matching lines
/// stay at zero; none are ever omitted.
#[derive(Debug)]
pub struct BucketSeries {
    granularity: Granularity,
    labels: Vec<String>,
    index: HashMap<String, usize>,
    overall: Vec<Slot>,
    channels: HashMap<SalesChannel, Vec<Slot>>,
}

impl BucketSeries {
    pub fn new(start: NaiveDate, end: NaiveDate, granularity: Granularity) -> Self {
        let labels = enumerate_labels(start, end, granularity);
        let index = labels
            .iter()
            .enumerate()
            .map(|(i, l)| (l.clone(), i))
            .collect();
        let overall = vec![Slot::default(); labels.len()];
        let channels = SalesChannel::named()
            .into_iter()
            .map(|c| (c, vec![Slot::default(); labels.len()]))
            .collect();

        Self {
            granularity,
            labels,
            index,
            overall,
            channels,
        }
    }

    /// Add one resolved line. Dates outside the enumerated range are
    /// dropped (the store query already bounds them); `Other` channel
    /// volume counts toward the overall series only.
    pub fn add(&mut self, date: NaiveDate, channel: SalesChannel, quantity: i64, amount: f64) {
        let label = label_for(date, self.granularity);
        let idx = match self.index.get(&label) {
            Some(&i) => i,
            None => return,
        };

        self.overall[idx].quantity += quantity;
        self.overall[idx].amount += amount;

        if let Some(slots) = self.channels.get_mut(&channel) {
            slots[idx].quantity += quantity;
            slots[idx].amount += amount;
        }
    }

    pub fn labels(&self) -> &[String] {
        &self.labels
    }

    pub fn granularity(&self) -> Granularity {
        self.granularity
    }

    fn block(slots: &[Slot]) -> SeriesBlock {
        SeriesBlock {
            quantities: slots.iter().map(|s| s.quantity).collect(),
            amounts: slots.iter().map(|s| s.amount).collect(),
            average_prices: slots
                .iter()
                .map(|s| average_price(s.amount, s.quantity))
                .collect(),
        }
    }

    pub fn overall_block(&self) -> SeriesBlock {
        Self::block(&self.overall)
    }

    /// One block per named channel, keyed by channel key.
    pub fn channel_blocks(&self) -> HashMap<String, SeriesBlock> {
        SalesChannel::named()
            .into_iter()
            .map(|c| (c.key().to_string(), Self::block(&self.channels[&c])))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn d(y: i32, m: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, day).unwrap()
    }

    #[test]
    fn test_granularity_boundaries() {
        let start = d(2025, 1, 1);
        assert_eq!(
            Granularity::for_range(start, d(2025, 1, 31)), // 30 days
            Granularity::Day
        );
        assert_eq!(
            Granularity::for_range(start, d(2025, 2, 1)), // 31 days
            Granularity::Week
        );
        assert_eq!(
            Granularity::for_range(start, d(2025, 4, 1)), // 90 days
            Granularity::Week
        );
        assert_eq!(
            Granularity::for_range(start, d(2025, 4, 2)), // 91 days
            Granularity::Month
        );
        assert_eq!(
            Granularity::for_range(start, start + chrono::Duration::days(912)),
            Granularity::Month
        );
        assert_eq!(
            Granularity::for_range(start, start + chrono::Duration::days(913)),
            Granularity::Quarter
        );
        assert_eq!(
            Granularity::for_range(start, start + chrono::Duration::days(1825)),
            Granularity::Quarter
        );
        assert_eq!(
            Granularity::for_range(start, start + chrono::Duration::days(1826)),
            Granularity::Year
        );
    }

    #[test]
    fn test_daily_labels_are_gap_filled() {
        let labels = enumerate_labels(d(2025, 1, 1), d(2025, 1, 3), Granularity::Day);
        assert_eq!(labels, vec!["2025-01-01", "2025-01-02", "2025-01-03"]);
    }

    #[test]
    fn test_week_labels_cross_year_boundary() {
        // 2024-12-30 is the Monday of ISO week 2025-W01.
        let labels = enumerate_labels(d(2024, 12, 28), d(2025, 1, 5), Granularity::Week);
        assert_eq!(labels, vec!["2024-W52", "2025-W01"]);
    }

    #[test]
    fn test_month_and_quarter_and_year_labels() {
        let labels = enumerate_labels(d(2023, 1, 15), d(2023, 3, 2), Granularity::Month);
        assert_eq!(labels, vec!["2023-01", "2023-02", "2023-03"]);

        let labels = enumerate_labels(d(2023, 2, 1), d(2023, 10, 1), Granularity::Quarter);
        assert_eq!(labels, vec!["2023-Q1", "2023-Q2", "2023-Q3", "2023-Q4"]);

        let labels = enumerate_labels(d(2021, 6, 1), d(2023, 2, 1), Granularity::Year);
        assert_eq!(labels, vec!["2021", "2022", "2023"]);
    }

    #[test]
    fn test_every_timestamp_label_is_enumerated() {
        // Enumeration and per-date labelling must agree over the full
        // range for every granularity, or contributions get dropped.
        let start = d(2024, 11, 17);
        let end = d(2025, 2, 9);
        for g in [
            Granularity::Day,
            Granularity::Week,
            Granularity::Month,
            Granularity::Quarter,
            Granularity::Year,
        ] {
            let labels = enumerate_labels(start, end, g);
            let mut day = start;
            while day <= end {
                assert!(
                    labels.contains(&label_for(day, g)),
                    "label for {} missing under {:?}",
                    day,
                    g
                );
                day = day.succ_opt().unwrap();
            }
        }
    }

    #[test]
    fn test_average_price_rounding_half_up() {
        assert_eq!(average_price(100.0, 2), 50);
        assert_eq!(average_price(5.0, 2), 3); // 2.5 rounds away from zero
        assert_eq!(average_price(100.0, 3), 33);
        assert_eq!(average_price(0.0, 0), 0);
        assert_eq!(average_price(500.0, 0), 0); // zero guard, never divides
    }

    #[test]
    fn test_series_zero_fill_and_accumulation() {
        // The worked example: 3-day range, one valid line on day 1,
        // nothing on day 2, refunded line on day 3 never reaches here.
        let mut series = BucketSeries::new(d(2025, 1, 1), d(2025, 1, 3), Granularity::Day);
        series.add(d(2025, 1, 1), SalesChannel::Tmall, 2, 100.0);

        assert_eq!(
            series.labels(),
            &["2025-01-01", "2025-01-02", "2025-01-03"]
        );

        let overall = series.overall_block();
        assert_eq!(overall.quantities, vec![2, 0, 0]);
        assert_eq!(overall.amounts, vec![100.0, 0.0, 0.0]);
        assert_eq!(overall.average_prices, vec![50, 0, 0]);

        let channels = series.channel_blocks();
        assert_eq!(channels["tmall"].quantities, vec![2, 0, 0]);
        assert_eq!(channels["douyin"].quantities, vec![0, 0, 0]);
        assert_eq!(channels.len(), 4);
    }

    #[test]
    fn test_other_channel_counts_overall_only() {
        let mut series = BucketSeries::new(d(2025, 1, 1), d(2025, 1, 1), Granularity::Day);
        series.add(d(2025, 1, 1), SalesChannel::Other, 5, 250.0);

        assert_eq!(series.overall_block().quantities, vec![5]);
        for (_, block) in series.channel_blocks() {
            assert_eq!(block.quantities, vec![0]);
        }
    }
}
