use indexmap::IndexMap;
use query_paging_core::{
   ExplainMode, PagingConfig, PagingOptions, RawPagingParams, parse_paging_options,
   validate_explain_mode,
};
use serde::Serialize;
use serde_json::Value as JsonValue;
use tracing::{debug, trace};

use crate::{Error, Result};

/// Parameter names a query request may carry.
pub const RECOGNIZED_PARAMS: [&str; 6] = [
   "query",
   "limit",
   "offset",
   "order_by",
   "include_total",
   "explain",
];

/// Response header carrying the total matched-record count.
pub const RECORD_COUNT_HEADER: &str = "X-Records";

/// Raw request parameters, in the order they were received.
pub type QueryParams = IndexMap<String, JsonValue>;

/// Build [`QueryParams`] from decoded query-string pairs.
///
/// Every value becomes a JSON string. A repeated name keeps its last value.
pub fn params_from_pairs<I, K, V>(pairs: I) -> QueryParams
where
   I: IntoIterator<Item = (K, V)>,
   K: Into<String>,
   V: Into<String>,
{
   pairs
      .into_iter()
      .map(|(k, v)| (k.into(), JsonValue::String(v.into())))
      .collect()
}

/// A query request with its paging directives validated.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct QueryRequest {
   /// Decoded query expression, handed to the query engine untouched
   pub query: Option<JsonValue>,
   /// Validated paging directives
   pub paging: PagingOptions,
   /// Requested plan explanation, if any
   pub explain: Option<ExplainMode>,
}

fn decode_query(raw: &JsonValue) -> Result<Option<JsonValue>> {
   match raw {
      JsonValue::Null => Ok(None),
      JsonValue::String(text) if text.trim().is_empty() => Ok(None),
      JsonValue::String(text) => serde_json::from_str::<JsonValue>(text)
         .map(Some)
         .map_err(|_| {
            debug!(value = %text, "Rejected malformed query");
            Error::MalformedQuery {
               value: text.clone(),
            }
         }),
      decoded => Ok(Some(decoded.clone())),
   }
}

fn decode_explain(raw: &JsonValue) -> Result<Option<ExplainMode>> {
   match raw {
      JsonValue::Null => Ok(None),
      JsonValue::String(mode) => Ok(Some(validate_explain_mode(mode)?)),
      other => Ok(Some(validate_explain_mode(&other.to_string())?)),
   }
}

/// Validate the parameters of one query request.
///
/// Unrecognized parameter names are rejected before any value is looked at.
/// The first failure is returned; no partial request escapes.
pub fn parse_query_request(params: &QueryParams, config: &PagingConfig) -> Result<QueryRequest> {
   if let Some(name) = params
      .keys()
      .find(|name| !RECOGNIZED_PARAMS.contains(&name.as_str()))
   {
      debug!(parameter = %name, "Rejected unsupported query parameter");
      return Err(Error::UnsupportedParameter { name: name.clone() });
   }

   let query = params.get("query").map(decode_query).transpose()?.flatten();
   let explain = params.get("explain").map(decode_explain).transpose()?.flatten();

   let raw = RawPagingParams {
      limit: params.get("limit"),
      offset: params.get("offset"),
      order_by: params.get("order_by"),
      include_total: params.get("include_total"),
   };
   let paging = parse_paging_options(&raw, config)?;

   trace!(
      has_query = query.is_some(),
      explain = ?explain,
      requires_paging = paging.requires_paging(),
      "Parsed query request"
   );

   Ok(QueryRequest {
      query,
      paging,
      explain,
   })
}

/// The `X-Records` header to emit for a result of `total` matched records.
///
/// `None` unless the request asked for the total.
pub fn record_count_header(paging: &PagingOptions, total: u64) -> Option<(&'static str, String)> {
   paging
      .include_total
      .then(|| (RECORD_COUNT_HEADER, total.to_string()))
}
