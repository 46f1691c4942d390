use chrono::NaiveDate;
use contracts::projections::p101_fuel_sales::dto::{FuelSaleDto, PumpDto};
use contracts::shared::sales_query::SalesFilter;
use leptos::prelude::*;

/// Page-local state of the fuel sales register.
///
/// The raw record set is replaced wholesale on every fetch; the filter and
/// page survive between fetches. Page ownership contract: any filter
/// mutation goes through [`FuelSalesState::apply_filter`], which resets the
/// page to 1 so a narrowed result set never shows a stale empty page.
#[derive(Clone, Debug)]
pub struct FuelSalesState {
    pub sales: Vec<FuelSaleDto>,
    pub pumps: Vec<PumpDto>,
    pub filter: SalesFilter,
    pub page: usize,
    pub is_loaded: bool,
}

impl FuelSalesState {
    /// `today` is injected by the caller so the default single-day range
    /// stays deterministic under test
    pub fn for_today(today: NaiveDate) -> Self {
        Self {
            sales: Vec::new(),
            pumps: Vec::new(),
            filter: SalesFilter::for_day(today),
            page: 1,
            is_loaded: false,
        }
    }

    /// Mutate the filter and reset pagination to the first page
    pub fn apply_filter(&mut self, mutate: impl FnOnce(&mut SalesFilter)) {
        mutate(&mut self.filter);
        self.page = 1;
    }
}

// Create state within component scope instead of thread-local
// This ensures state is properly disposed when component unmounts
pub fn create_state(today: NaiveDate) -> RwSignal<FuelSalesState> {
    RwSignal::new(FuelSalesState::for_today(today))
}

#[cfg(test)]
mod tests {
    use super::*;
    use contracts::shared::sales_query::DateRange;

    fn day(s: &str) -> NaiveDate {
        NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
    }

    #[test]
    fn default_range_is_the_injected_day() {
        let state = FuelSalesState::for_today(day("2024-06-15"));
        assert_eq!(
            state.filter.date_range,
            DateRange::single_day(day("2024-06-15"))
        );
        assert_eq!(state.page, 1);
        assert!(!state.is_loaded);
    }

    #[test]
    fn filter_mutation_resets_page() {
        let mut state = FuelSalesState::for_today(day("2024-06-15"));
        state.page = 4;
        state.apply_filter(|f| f.product_type = "DIESEL".to_string());
        assert_eq!(state.page, 1);
        assert_eq!(state.filter.product_type, "DIESEL");
    }
}
