use crate::shared::api_utils::api_url;
use contracts::projections::p101_fuel_sales::dto::{
    FuelSaleListRequest, FuelSaleListResponse, PumpDto,
};
use contracts::shared::sales_query::DateRange;
use gloo_net::http::Request;

/// Fetch fuel sale readings from the admin API.
///
/// The date range is passed as a server-side pre-slice hint; the full
/// predicate set is still applied client-side by the query engine.
pub async fn fetch_sales(range: &DateRange) -> Result<FuelSaleListResponse, String> {
    let request = FuelSaleListRequest::for_period(
        range.start.map(|d| d.format("%Y-%m-%d").to_string()),
        range.end.map(|d| d.format("%Y-%m-%d").to_string()),
    );

    Request::get(&api_url(&format!("/api/sales{}", request.to_query_string())))
        .send()
        .await
        .map_err(|e| format!("Request failed: {}", e))?
        .json()
        .await
        .map_err(|e| format!("Failed to parse response: {}", e))
}

/// Fetch pump/nozzle reference data for the filter dropdowns
pub async fn fetch_pumps() -> Result<Vec<PumpDto>, String> {
    Request::get(&api_url("/api/pumps"))
        .send()
        .await
        .map_err(|e| format!("Request failed: {}", e))?
        .json()
        .await
        .map_err(|e| format!("Failed to parse response: {}", e))
}
