use super::common::{BetStatus, OrderProjection, PriceSize, Side, TimeRange};
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListCurrentOrdersRequest {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub bet_ids: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub market_ids: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub order_projection: Option<OrderProjection>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub date_range: Option<TimeRange>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub from_record: Option<i32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub record_count: Option<i32>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListClearedOrdersRequest {
    pub bet_status: BetStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub event_type_ids: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub market_ids: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub bet_ids: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub settled_date_range: Option<TimeRange>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub from_record: Option<i32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub record_count: Option<i32>,
}

impl ListClearedOrdersRequest {
    pub fn new(bet_status: BetStatus) -> Self {
        Self {
            bet_status,
            event_type_ids: None,
            market_ids: None,
            bet_ids: None,
            settled_date_range: None,
            from_record: None,
            record_count: None,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CurrentOrderSummary {
    pub bet_id: String,
    pub market_id: String,
    pub selection_id: i64,
    #[serde(default, with = "super::decimal_serde::option")]
    pub handicap: Option<Decimal>,
    pub price_size: PriceSize,
    #[serde(default, with = "super::decimal_serde::option")]
    pub bsp_liability: Option<Decimal>,
    pub side: Side,
    pub status: String,
    pub persistence_type: String,
    pub order_type: String,
    pub placed_date: DateTime<Utc>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub matched_date: Option<DateTime<Utc>>,
    #[serde(default, with = "super::decimal_serde::option")]
    pub average_price_matched: Option<Decimal>,
    #[serde(default, with = "super::decimal_serde::option")]
    pub size_matched: Option<Decimal>,
    #[serde(default, with = "super::decimal_serde::option")]
    pub size_remaining: Option<Decimal>,
    #[serde(default, with = "super::decimal_serde::option")]
    pub size_lapsed: Option<Decimal>,
    #[serde(default, with = "super::decimal_serde::option")]
    pub size_cancelled: Option<Decimal>,
    #[serde(default, with = "super::decimal_serde::option")]
    pub size_voided: Option<Decimal>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub regulator_code: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct CurrentOrderSummaryReport {
    pub current_orders: Vec<CurrentOrderSummary>,
    pub more_available: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ClearedOrderSummary {
    pub bet_id: String,
    pub market_id: String,
    pub selection_id: i64,
    #[serde(default, with = "super::decimal_serde::option")]
    pub handicap: Option<Decimal>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub event_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub event_type_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub placed_date: Option<DateTime<Utc>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub persistence_type: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub order_type: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub side: Option<Side>,
    #[serde(default, with = "super::decimal_serde::option")]
    pub price_requested: Option<Decimal>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub settled_date: Option<DateTime<Utc>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub bet_count: Option<i64>,
    #[serde(default, with = "super::decimal_serde::option")]
    pub commission: Option<Decimal>,
    #[serde(default, with = "super::decimal_serde::option")]
    pub price_matched: Option<Decimal>,
    #[serde(default, with = "super::decimal_serde::option")]
    pub size_settled: Option<Decimal>,
    #[serde(default, with = "super::decimal_serde::option")]
    pub profit: Option<Decimal>,
    #[serde(default, with = "super::decimal_serde::option")]
    pub size_cancelled: Option<Decimal>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ClearedOrderSummaryReport {
    pub cleared_orders: Vec<ClearedOrderSummary>,
    pub more_available: bool,
}
