// Exchange-rate lookup and currency conversion.
// Rates are fetched fresh per request from a public provider, with a single
// hard-coded fallback provider when the primary fails.

mod client;
mod convert;

pub use client::{RateClient, RateFetchError, RateSource, ReqwestRateSource, SourceKind};
pub use convert::{Conversion, RateTable, convert_amount, is_currency_code};
