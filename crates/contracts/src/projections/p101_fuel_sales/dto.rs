use serde::{Deserialize, Serialize};

/// DTO for one fuel-dispensing transaction (P101)
///
/// Records arrive from the admin API readings endpoint. Numeric and hardware
/// fields are optional on the wire: a partially synced reading must still
/// deserialize and display.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FuelSaleDto {
    pub id: String,

    /// Reading date as "YYYY-MM-DD" (some backends append a time part)
    #[serde(default)]
    pub reading_date: Option<String>,

    /// Fuel product designation, e.g. "PETROL" / "DIESEL"
    #[serde(default)]
    pub fuel_type: Option<String>,

    // Sums
    #[serde(default)]
    pub total_amount: Option<f64>,
    #[serde(default)]
    pub delta_volume_l: Option<f64>,
    #[serde(default)]
    pub unit_price: Option<f64>,

    // Dispensing hardware
    #[serde(default)]
    pub pump_id: Option<String>,
    #[serde(default)]
    pub nozzle_id: Option<String>,
}

/// Request for the fuel sales list endpoint
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FuelSaleListRequest {
    /// Station scope; None means the station bound to the session
    #[serde(default)]
    pub station_id: Option<String>,
    #[serde(default)]
    pub date_from: Option<String>,
    #[serde(default)]
    pub date_to: Option<String>,
    #[serde(default = "default_limit")]
    pub limit: u64,
}

fn default_limit() -> u64 {
    1000
}

impl FuelSaleListRequest {
    /// Request scoped to the session station for an optional date period
    pub fn for_period(date_from: Option<String>, date_to: Option<String>) -> Self {
        Self {
            station_id: None,
            date_from,
            date_to,
            limit: default_limit(),
        }
    }

    /// Query string for the sales list endpoint; unset fields are omitted
    pub fn to_query_string(&self) -> String {
        let mut query = format!("?limit={}", self.limit);
        if let Some(station) = &self.station_id {
            query.push_str(&format!("&station_id={}", station));
        }
        if let Some(from) = &self.date_from {
            query.push_str(&format!("&date_from={}", from));
        }
        if let Some(to) = &self.date_to {
            query.push_str(&format!("&date_to={}", to));
        }
        query
    }
}

/// Response with the fuel sales list
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FuelSaleListResponse {
    pub items: Vec<FuelSaleDto>,
    pub total_count: i64,
}

/// Nozzle attached to a pump (filter dropdown reference data)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NozzleDto {
    pub id: String,
    #[serde(default)]
    pub fuel_type: Option<String>,
    #[serde(default)]
    pub label: Option<String>,
}

/// Pump with its nozzles (filter dropdown reference data)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PumpDto {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub nozzles: Vec<NozzleDto>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn partial_record_deserializes_with_defaults() {
        // A half-synced reading carries only an id; it must still display
        let sale: FuelSaleDto = serde_json::from_str(r#"{"id": "r-17"}"#).unwrap();
        assert_eq!(sale.id, "r-17");
        assert!(sale.reading_date.is_none());
        assert!(sale.total_amount.is_none());
        assert!(sale.pump_id.is_none());
    }

    #[test]
    fn full_record_round_trips() {
        let json = r#"{
            "id": "r-1",
            "reading_date": "2024-01-01",
            "fuel_type": "DIESEL",
            "total_amount": 200.0,
            "delta_volume_l": 20.0,
            "unit_price": 10.0,
            "pump_id": "pump-1",
            "nozzle_id": "nozzle-2"
        }"#;
        let sale: FuelSaleDto = serde_json::from_str(json).unwrap();
        assert_eq!(sale.fuel_type.as_deref(), Some("DIESEL"));
        assert_eq!(sale.total_amount, Some(200.0));

        let back: FuelSaleDto =
            serde_json::from_str(&serde_json::to_string(&sale).unwrap()).unwrap();
        assert_eq!(back, sale);
    }

    #[test]
    fn list_request_query_string_includes_only_set_fields() {
        let request = FuelSaleListRequest::for_period(
            Some("2024-01-01".to_string()),
            Some("2024-01-31".to_string()),
        );
        assert_eq!(
            request.to_query_string(),
            "?limit=1000&date_from=2024-01-01&date_to=2024-01-31"
        );

        let unbounded = FuelSaleListRequest::for_period(None, None);
        assert_eq!(unbounded.to_query_string(), "?limit=1000");

        let scoped = FuelSaleListRequest {
            station_id: Some("st-3".to_string()),
            ..FuelSaleListRequest::for_period(Some("2024-02-01".to_string()), None)
        };
        assert_eq!(
            scoped.to_query_string(),
            "?limit=1000&station_id=st-3&date_from=2024-02-01"
        );
    }

    #[test]
    fn list_request_limit_defaults_on_the_wire() {
        let request: FuelSaleListRequest = serde_json::from_str("{}").unwrap();
        assert_eq!(request.limit, 1000);
        assert!(request.station_id.is_none());
    }

    #[test]
    fn pump_without_nozzles_deserializes() {
        let pump: PumpDto =
            serde_json::from_str(r#"{"id": "pump-1", "name": "Pump 1"}"#).unwrap();
        assert!(pump.nozzles.is_empty());
    }
}
