//! Sales query engine: client-side filtering, aggregation and pagination
//! over already-fetched fuel sale records.
//!
//! Every function here is pure and total: malformed records degrade to
//! neutral values instead of failing, an empty input yields empty output and
//! zero totals, and an out-of-range page yields an empty slice. The caller
//! (the filter UI) owns the filter and page state and re-invokes the engine
//! on every change.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::projections::p101_fuel_sales::dto::FuelSaleDto;

/// Sentinel used by the pump/nozzle dropdowns for "no filter"
pub const NO_SELECTION: &str = "all";

/// Fixed page size of the sales register table
pub const PAGE_SIZE: usize = 10;

/// Inclusive date range; the predicate is active only when BOTH bounds are set
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DateRange {
    pub start: Option<NaiveDate>,
    pub end: Option<NaiveDate>,
}

impl DateRange {
    pub fn new(start: Option<NaiveDate>, end: Option<NaiveDate>) -> Self {
        Self { start, end }
    }

    /// Range covering exactly one calendar day
    pub fn single_day(day: NaiveDate) -> Self {
        Self {
            start: Some(day),
            end: Some(day),
        }
    }

    pub fn is_active(&self) -> bool {
        self.start.is_some() && self.end.is_some()
    }

    fn contains(&self, day: NaiveDate) -> bool {
        match (self.start, self.end) {
            (Some(start), Some(end)) => start <= day && day <= end,
            _ => true,
        }
    }
}

/// User-controlled filter state, re-read on every recompute.
///
/// Empty `product_type` means "no filter"; pump and nozzle use the
/// [`NO_SELECTION`] sentinel. The page number is deliberately NOT part of this
/// struct: it is owned by the page state, which resets it to 1 whenever any
/// filter field changes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SalesFilter {
    pub date_range: DateRange,
    pub product_type: String,
    pub pump_id: String,
    pub nozzle_id: String,
}

impl Default for SalesFilter {
    fn default() -> Self {
        Self {
            date_range: DateRange::default(),
            product_type: String::new(),
            pump_id: NO_SELECTION.to_string(),
            nozzle_id: NO_SELECTION.to_string(),
        }
    }
}

impl SalesFilter {
    /// Filter preset for a single day (the dashboard opens on "today")
    pub fn for_day(day: NaiveDate) -> Self {
        Self {
            date_range: DateRange::single_day(day),
            ..Self::default()
        }
    }

    /// Number of active predicates, for the filter-panel badge
    pub fn active_count(&self) -> usize {
        let mut count = 0;
        if self.date_range.is_active() {
            count += 1;
        }
        if !self.product_type.is_empty() {
            count += 1;
        }
        if self.pump_id != NO_SELECTION {
            count += 1;
        }
        if self.nozzle_id != NO_SELECTION {
            count += 1;
        }
        count
    }

    fn matches(&self, record: &FuelSaleDto) -> bool {
        if self.date_range.is_active() {
            match reading_day(record) {
                Some(day) if self.date_range.contains(day) => {}
                // Missing or unparseable dates fail only while the
                // date predicate is active
                _ => return false,
            }
        }

        if !self.product_type.is_empty() {
            match record.fuel_type.as_deref() {
                Some(fuel) if fuel.eq_ignore_ascii_case(&self.product_type) => {}
                _ => return false,
            }
        }

        if self.pump_id != NO_SELECTION {
            match record.pump_id.as_deref() {
                Some(pump) if pump == self.pump_id => {}
                _ => return false,
            }
        }

        // TODO: apply nozzle_id once the readings endpoint populates it on
        // every record; until then the selection is accepted but inert.

        true
    }
}

/// Summary totals over a filtered record set
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct SalesTotals {
    pub total_revenue: f64,
    pub total_volume: f64,
    pub transaction_count: usize,
}

impl SalesTotals {
    /// Merge totals of two disjoint record sets
    pub fn combine(self, other: Self) -> Self {
        Self {
            total_revenue: self.total_revenue + other.total_revenue,
            total_volume: self.total_volume + other.total_volume,
            transaction_count: self.transaction_count + other.transaction_count,
        }
    }
}

/// Calendar day of a record, if its `reading_date` parses.
///
/// Accepts both plain "YYYY-MM-DD" and ISO datetime strings by dropping
/// everything from 'T' on.
pub fn reading_day(record: &FuelSaleDto) -> Option<NaiveDate> {
    let raw = record.reading_date.as_deref()?;
    let date_part = raw.split('T').next().unwrap_or(raw);
    NaiveDate::parse_from_str(date_part, "%Y-%m-%d").ok()
}

/// Applies all active predicates (logical AND), preserving record order.
///
/// The result is always a subsequence of `records`.
pub fn filter_sales(records: &[FuelSaleDto], filter: &SalesFilter) -> Vec<FuelSaleDto> {
    records
        .iter()
        .filter(|record| filter.matches(record))
        .cloned()
        .collect()
}

/// Sums revenue and volume in record order; missing values count as 0
pub fn aggregate_sales(records: &[FuelSaleDto]) -> SalesTotals {
    let mut totals = SalesTotals {
        transaction_count: records.len(),
        ..SalesTotals::default()
    };
    for record in records {
        totals.total_revenue += record.total_amount.unwrap_or(0.0);
        totals.total_volume += record.delta_volume_l.unwrap_or(0.0);
    }
    totals
}

/// Page window of `records` for a 1-indexed `page`, clipped to bounds.
///
/// Pages past the end (and page 0) yield an empty slice.
pub fn paginate<T>(records: &[T], page: usize, page_size: usize) -> &[T] {
    if page == 0 || page_size == 0 {
        return &[];
    }
    let start = (page - 1) * page_size;
    if start >= records.len() {
        return &[];
    }
    let end = (start + page_size).min(records.len());
    &records[start..end]
}

/// Number of pages needed to show `len` records
pub fn page_count(len: usize, page_size: usize) -> usize {
    if page_size == 0 {
        return 0;
    }
    len.div_ceil(page_size)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(
        id: &str,
        date: Option<&str>,
        fuel: Option<&str>,
        amount: Option<f64>,
        volume: Option<f64>,
    ) -> FuelSaleDto {
        FuelSaleDto {
            id: id.to_string(),
            reading_date: date.map(str::to_string),
            fuel_type: fuel.map(str::to_string),
            total_amount: amount,
            delta_volume_l: volume,
            unit_price: None,
            pump_id: None,
            nozzle_id: None,
        }
    }

    fn sample() -> Vec<FuelSaleDto> {
        vec![
            record("1", Some("2024-01-01"), Some("PETROL"), Some(100.0), Some(10.0)),
            record("2", Some("2024-01-02"), Some("DIESEL"), Some(200.0), Some(20.0)),
        ]
    }

    fn ids(records: &[FuelSaleDto]) -> Vec<&str> {
        records.iter().map(|r| r.id.as_str()).collect()
    }

    fn day(s: &str) -> NaiveDate {
        NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
    }

    #[test]
    fn single_day_range_keeps_only_that_day() {
        let filter = SalesFilter {
            date_range: DateRange::single_day(day("2024-01-01")),
            ..SalesFilter::default()
        };
        let filtered = filter_sales(&sample(), &filter);
        assert_eq!(ids(&filtered), vec!["1"]);

        let totals = aggregate_sales(&filtered);
        assert_eq!(totals.total_revenue, 100.0);
        assert_eq!(totals.total_volume, 10.0);
        assert_eq!(totals.transaction_count, 1);
    }

    #[test]
    fn product_type_match_is_case_insensitive() {
        let filter = SalesFilter {
            product_type: "diesel".to_string(),
            ..SalesFilter::default()
        };
        let filtered = filter_sales(&sample(), &filter);
        assert_eq!(ids(&filtered), vec!["2"]);
    }

    #[test]
    fn unbounded_range_imposes_no_date_constraint() {
        let half_open = SalesFilter {
            date_range: DateRange::new(Some(day("2024-01-02")), None),
            ..SalesFilter::default()
        };
        // One bound alone is not enough to activate the predicate
        assert_eq!(filter_sales(&sample(), &half_open).len(), 2);
        assert_eq!(filter_sales(&sample(), &SalesFilter::default()).len(), 2);
    }

    #[test]
    fn missing_date_fails_only_while_date_filter_active() {
        let mut records = sample();
        records.push(record("3", None, Some("PETROL"), Some(50.0), Some(5.0)));
        records.push(record("4", Some("not-a-date"), None, None, None));

        let inactive = SalesFilter::default();
        assert_eq!(filter_sales(&records, &inactive).len(), 4);

        let active = SalesFilter {
            date_range: DateRange::new(Some(day("2024-01-01")), Some(day("2024-01-31"))),
            ..SalesFilter::default()
        };
        assert_eq!(ids(&filter_sales(&records, &active)), vec!["1", "2"]);
    }

    #[test]
    fn datetime_reading_dates_are_accepted() {
        let records = vec![record(
            "1",
            Some("2024-01-01T14:02:26Z"),
            Some("PETROL"),
            Some(10.0),
            Some(1.0),
        )];
        let filter = SalesFilter {
            date_range: DateRange::single_day(day("2024-01-01")),
            ..SalesFilter::default()
        };
        assert_eq!(filter_sales(&records, &filter).len(), 1);
    }

    #[test]
    fn filter_preserves_order_and_is_idempotent() {
        let records: Vec<FuelSaleDto> = (0..30)
            .map(|i| {
                let fuel = if i % 3 == 0 { "PETROL" } else { "DIESEL" };
                record(
                    &format!("{i}"),
                    Some("2024-02-10"),
                    Some(fuel),
                    Some(i as f64),
                    Some(1.0),
                )
            })
            .collect();
        let filter = SalesFilter {
            product_type: "petrol".to_string(),
            ..SalesFilter::default()
        };

        let once = filter_sales(&records, &filter);
        let expected: Vec<&str> = records
            .iter()
            .filter(|r| r.fuel_type.as_deref() == Some("PETROL"))
            .map(|r| r.id.as_str())
            .collect();
        assert_eq!(ids(&once), expected);

        let twice = filter_sales(&once, &filter);
        assert_eq!(ids(&twice), ids(&once));
    }

    #[test]
    fn pump_filter_applies_when_selected() {
        let mut records = sample();
        records[0].pump_id = Some("pump-1".to_string());
        records[1].pump_id = Some("pump-2".to_string());
        records.push(record("3", Some("2024-01-03"), Some("PETROL"), None, None));

        let filter = SalesFilter {
            pump_id: "pump-1".to_string(),
            ..SalesFilter::default()
        };
        // Record 3 has no pump_id and fails the active pump predicate
        assert_eq!(ids(&filter_sales(&records, &filter)), vec!["1"]);
    }

    #[test]
    fn nozzle_selection_is_accepted_but_inert() {
        let filter = SalesFilter {
            nozzle_id: "nozzle-7".to_string(),
            ..SalesFilter::default()
        };
        assert_eq!(filter_sales(&sample(), &filter).len(), 2);
        assert_eq!(filter.active_count(), 1);
    }

    #[test]
    fn missing_amount_counts_as_zero_but_still_counted() {
        let records = vec![
            record("1", Some("2024-01-01"), Some("PETROL"), None, Some(10.0)),
            record("2", Some("2024-01-01"), Some("PETROL"), Some(200.0), None),
        ];
        let totals = aggregate_sales(&records);
        assert_eq!(totals.total_revenue, 200.0);
        assert_eq!(totals.total_volume, 10.0);
        assert_eq!(totals.transaction_count, 2);
    }

    #[test]
    fn totals_are_additive_over_disjoint_sets() {
        let records: Vec<FuelSaleDto> = (0..7)
            .map(|i| {
                record(
                    &format!("{i}"),
                    Some("2024-03-01"),
                    Some("DIESEL"),
                    Some(10.0 * i as f64),
                    Some(i as f64),
                )
            })
            .collect();
        let (a, b) = records.split_at(3);
        let combined = aggregate_sales(a).combine(aggregate_sales(b));
        let whole = aggregate_sales(&records);
        assert_eq!(combined, whole);
    }

    #[test]
    fn empty_input_yields_zero_totals() {
        let totals = aggregate_sales(&[]);
        assert_eq!(totals, SalesTotals::default());
        assert!(filter_sales(&[], &SalesFilter::default()).is_empty());
    }

    #[test]
    fn pagination_covers_the_whole_set_without_overlap() {
        let records: Vec<usize> = (0..25).collect();
        let pages = page_count(records.len(), PAGE_SIZE);
        assert_eq!(pages, 3);

        let mut reassembled = Vec::new();
        for page in 1..=pages {
            let slice = paginate(&records, page, PAGE_SIZE);
            assert!(slice.len() <= PAGE_SIZE);
            reassembled.extend_from_slice(slice);
        }
        assert_eq!(reassembled, records);

        let last = paginate(&records, 3, PAGE_SIZE);
        assert_eq!(last, &records[20..25]);
    }

    #[test]
    fn out_of_range_page_is_empty_not_an_error() {
        let records: Vec<usize> = (0..25).collect();
        assert!(paginate(&records, 4, PAGE_SIZE).is_empty());
        assert!(paginate(&records, 0, PAGE_SIZE).is_empty());
        assert!(paginate::<usize>(&[], 1, PAGE_SIZE).is_empty());
    }

    #[test]
    fn active_count_tracks_each_predicate() {
        let day1 = day("2024-01-01");
        let filter = SalesFilter {
            date_range: DateRange::single_day(day1),
            product_type: "PETROL".to_string(),
            pump_id: "pump-1".to_string(),
            nozzle_id: NO_SELECTION.to_string(),
        };
        assert_eq!(filter.active_count(), 3);
        assert_eq!(SalesFilter::default().active_count(), 0);
        assert_eq!(SalesFilter::for_day(day1).active_count(), 1);
    }
}
