use crate::dto::*;
use crate::error::{Error, Result};
use crate::session::Session;
use reqwest::Method;
use serde::{de::DeserializeOwned, Serialize};
use tracing::debug;

const BETTING_PREFIX: &str = "SportsAPING/v1.0/";

/// Exchange and locale a call is made against.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RequestOptions {
    pub exchange: String,
    pub locale: String,
}

impl Default for RequestOptions {
    fn default() -> Self {
        Self {
            exchange: "uk".to_string(),
            locale: "en".to_string(),
        }
    }
}

impl RequestOptions {
    pub fn exchange(mut self, exchange: impl Into<String>) -> Self {
        self.exchange = exchange.into();
        self
    }

    pub fn locale(mut self, locale: impl Into<String>) -> Self {
        self.locale = locale.into();
        self
    }
}

/// Betting API calls made through an authenticated [`Session`].
#[derive(Debug, Clone)]
pub struct BettingApi {
    session: Session,
}

impl BettingApi {
    pub fn new(session: Session) -> Self {
        Self { session }
    }

    pub fn session(&self) -> &Session {
        &self.session
    }

    /// Generic JSON-RPC call against the betting endpoint of `options.exchange`.
    pub async fn call<P, R>(&self, method: &str, params: P, options: &RequestOptions) -> Result<R>
    where
        P: Serialize,
        R: DeserializeOwned,
    {
        let endpoint = self
            .session
            .config()
            .endpoints
            .betting_for(&options.exchange)?
            .to_string();

        let request = JsonRpcRequest::new(format!("{BETTING_PREFIX}{method}"), params);
        let body = serde_json::to_vec(&request)?;
        debug!(method = %request.method, exchange = %options.exchange, "API request");

        let response: JsonRpcResponse<R> = self
            .session
            .request(Method::POST, &endpoint, body)
            .await?;

        if let Some(error) = response.error {
            return Err(Error::Api {
                code: error.code,
                message: error.message,
            });
        }
        response.result.ok_or_else(|| Error::Api {
            code: 0,
            message: format!("no result in response to {}", request.method),
        })
    }

    // ========================================================================
    // Navigation
    // ========================================================================

    pub async fn list_event_types(
        &self,
        filter: MarketFilter,
        options: &RequestOptions,
    ) -> Result<Vec<EventTypeResult>> {
        self.call("listEventTypes", filter_request(filter, options), options)
            .await
    }

    pub async fn list_competitions(
        &self,
        filter: MarketFilter,
        options: &RequestOptions,
    ) -> Result<Vec<CompetitionResult>> {
        self.call("listCompetitions", filter_request(filter, options), options)
            .await
    }

    pub async fn list_events(
        &self,
        filter: MarketFilter,
        options: &RequestOptions,
    ) -> Result<Vec<EventResult>> {
        self.call("listEvents", filter_request(filter, options), options)
            .await
    }

    pub async fn list_countries(
        &self,
        filter: MarketFilter,
        options: &RequestOptions,
    ) -> Result<Vec<CountryResult>> {
        self.call("listCountries", filter_request(filter, options), options)
            .await
    }

    pub async fn list_venues(
        &self,
        filter: MarketFilter,
        options: &RequestOptions,
    ) -> Result<Vec<VenueResult>> {
        self.call("listVenues", filter_request(filter, options), options)
            .await
    }

    /// Fetch the full navigation menu for `options.locale`.
    pub async fn fetch_navigation(&self, options: &RequestOptions) -> Result<Navigation> {
        let endpoint = self
            .session
            .config()
            .endpoints
            .navigation_for(&options.locale);
        self.session.request(Method::GET, &endpoint, Vec::new()).await
    }

    // ========================================================================
    // Markets
    // ========================================================================

    pub async fn list_market_catalogue(
        &self,
        mut request: ListMarketCatalogueRequest,
        options: &RequestOptions,
    ) -> Result<Vec<MarketCatalogue>> {
        request.locale.get_or_insert_with(|| options.locale.clone());
        self.call("listMarketCatalogue", request, options).await
    }

    pub async fn list_market_book(
        &self,
        mut request: ListMarketBookRequest,
        options: &RequestOptions,
    ) -> Result<Vec<MarketBook>> {
        request.locale.get_or_insert_with(|| options.locale.clone());
        self.call("listMarketBook", request, options).await
    }

    // ========================================================================
    // Orders
    // ========================================================================

    pub async fn list_current_orders(
        &self,
        request: ListCurrentOrdersRequest,
        options: &RequestOptions,
    ) -> Result<CurrentOrderSummaryReport> {
        self.call("listCurrentOrders", request, options).await
    }

    pub async fn list_cleared_orders(
        &self,
        request: ListClearedOrdersRequest,
        options: &RequestOptions,
    ) -> Result<ClearedOrderSummaryReport> {
        self.call("listClearedOrders", request, options).await
    }
}

fn filter_request(filter: MarketFilter, options: &RequestOptions) -> FilterRequest {
    FilterRequest {
        filter,
        locale: Some(options.locale.clone()),
    }
}
