use super::common::{MarketProjection, OrderProjection, PriceData, PriceSize, TimeRange};
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

pub const DEFAULT_CATALOGUE_MAX_RESULTS: i32 = 1000;

#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct MarketFilter {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub text_query: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub exchange_ids: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub event_type_ids: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub event_ids: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub competition_ids: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub market_ids: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub venues: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub bsp_only: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub turn_in_play_enabled: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub in_play_only: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub market_betting_types: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub market_countries: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub market_type_codes: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub market_start_time: Option<TimeRange>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub with_orders: Option<Vec<String>>,
}

/// Params shared by the listing calls that take only a filter.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FilterRequest {
    pub filter: MarketFilter,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub locale: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListMarketCatalogueRequest {
    pub filter: MarketFilter,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub market_projection: Option<Vec<MarketProjection>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_results: Option<i32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub locale: Option<String>,
}

impl ListMarketCatalogueRequest {
    /// Event, event type and competition projections, up to 1000 markets.
    pub fn new(filter: MarketFilter) -> Self {
        Self {
            filter,
            market_projection: Some(vec![
                MarketProjection::Event,
                MarketProjection::EventType,
                MarketProjection::Competition,
            ]),
            max_results: Some(DEFAULT_CATALOGUE_MAX_RESULTS),
            locale: None,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PriceProjection {
    pub price_data: Vec<PriceData>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub virtualise: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rollover_stakes: Option<bool>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListMarketBookRequest {
    pub market_ids: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub price_projection: Option<PriceProjection>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub order_projection: Option<OrderProjection>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub currency_code: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub locale: Option<String>,
}

impl ListMarketBookRequest {
    pub fn new(market_ids: Vec<String>) -> Self {
        Self {
            market_ids,
            price_projection: None,
            order_projection: None,
            currency_code: None,
            locale: None,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct EventType {
    pub id: String,
    pub name: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct EventTypeResult {
    pub event_type: EventType,
    pub market_count: i64,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Competition {
    pub id: String,
    pub name: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct CompetitionResult {
    pub competition: Competition,
    pub market_count: i64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub competition_region: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Event {
    pub id: String,
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub country_code: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub timezone: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub open_date: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct EventResult {
    pub event: Event,
    pub market_count: i64,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct CountryResult {
    pub country_code: String,
    pub market_count: i64,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct VenueResult {
    pub venue: String,
    pub market_count: i64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MarketDescription {
    pub persistence_enabled: bool,
    pub bsp_market: bool,
    pub market_time: DateTime<Utc>,
    pub suspend_time: DateTime<Utc>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub settle_time: Option<DateTime<Utc>>,
    pub betting_type: String,
    pub turn_in_play_enabled: bool,
    pub market_type: String,
    pub regulator: String,
    #[serde(with = "super::decimal_serde")]
    pub market_base_rate: Decimal,
    pub discount_allowed: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub wallet: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rules: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rules_has_date: Option<bool>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RunnerCatalog {
    pub selection_id: i64,
    pub runner_name: String,
    #[serde(default, with = "super::decimal_serde::option")]
    pub handicap: Option<Decimal>,
    pub sort_priority: i32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub metadata: Option<HashMap<String, Option<String>>>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MarketCatalogue {
    pub market_id: String,
    pub market_name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub market_start_time: Option<DateTime<Utc>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<MarketDescription>,
    #[serde(default, with = "super::decimal_serde::option")]
    pub total_matched: Option<Decimal>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub runners: Option<Vec<RunnerCatalog>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub event_type: Option<EventType>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub competition: Option<Competition>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub event: Option<Event>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ExchangePrices {
    pub available_to_back: Vec<PriceSize>,
    pub available_to_lay: Vec<PriceSize>,
    pub traded_volume: Vec<PriceSize>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Runner {
    pub selection_id: i64,
    #[serde(default, with = "super::decimal_serde::option")]
    pub handicap: Option<Decimal>,
    pub status: String,
    #[serde(default, with = "super::decimal_serde::option")]
    pub adjustment_factor: Option<Decimal>,
    #[serde(default, with = "super::decimal_serde::option")]
    pub last_price_traded: Option<Decimal>,
    #[serde(default, with = "super::decimal_serde::option")]
    pub total_matched: Option<Decimal>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub removal_date: Option<DateTime<Utc>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ex: Option<ExchangePrices>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MarketBook {
    pub market_id: String,
    #[serde(default)]
    pub is_market_data_delayed: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,
    #[serde(default)]
    pub bet_delay: i64,
    #[serde(default)]
    pub bsp_reconciled: bool,
    #[serde(default)]
    pub complete: bool,
    #[serde(default)]
    pub inplay: bool,
    #[serde(default)]
    pub number_of_winners: i64,
    #[serde(default)]
    pub number_of_runners: i64,
    #[serde(default)]
    pub number_of_active_runners: i64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_match_time: Option<DateTime<Utc>>,
    #[serde(default, with = "super::decimal_serde::option")]
    pub total_matched: Option<Decimal>,
    #[serde(default, with = "super::decimal_serde::option")]
    pub total_available: Option<Decimal>,
    #[serde(default)]
    pub cross_matching: bool,
    #[serde(default)]
    pub runners_voidable: bool,
    #[serde(default)]
    pub version: i64,
    #[serde(default)]
    pub runners: Vec<Runner>,
}

impl MarketBook {
    pub fn runner(&self, selection_id: i64) -> Option<&Runner> {
        self.runners.iter().find(|r| r.selection_id == selection_id)
    }
}
