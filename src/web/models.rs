// API-specific data models for the web server

use crate::rates::RateTable;
use serde::{Deserialize, Serialize};

/// Query parameters for the lossy recompression endpoint
#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct CompressQuery {
    /// JPEG quality, 10-100. Defaults to 80 when absent.
    pub quality: Option<u8>,
}

/// Response body for GET /api/rates/{base}
#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct RatesResponse {
    pub base: String,
    pub rates: RateTable,
}

/// Query parameters for GET /api/convert-currency
#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct ConvertCurrencyQuery {
    pub from: String,
    pub to: String,
    pub amount: f64,
}

/// Response body for GET /api/convert-currency
#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct ConvertCurrencyResponse {
    pub from: String,
    pub to: String,
    pub amount: f64,
    pub rate: f64,
    pub result: f64,
}
