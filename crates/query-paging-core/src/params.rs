//! Single-parameter validators for raw paging input.
//!
//! Raw values arrive as loosely typed JSON: a query-string parameter is a
//! JSON string, a JSON request body may carry a number or a boolean. Each
//! validator accepts both shapes and returns the strongly typed value.

use serde::{Deserialize, Serialize};
use serde_json::Value as JsonValue;
use tracing::debug;

use crate::{Error, PagingConfig, Result};

/// Supported query-plan explanation modes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ExplainMode {
   /// Run the query and report the executed plan
   Analyze,
}

impl ExplainMode {
   pub fn as_str(self) -> &'static str {
      match self {
         ExplainMode::Analyze => "analyze",
      }
   }
}

/// Render a raw value the way it should appear in an error message.
///
/// Strings are shown without their JSON quotes.
pub(crate) fn raw_text(raw: &JsonValue) -> String {
   match raw {
      JsonValue::String(s) => s.clone(),
      other => other.to_string(),
   }
}

/// Coerce a JSON integer, or a string holding a base-10 integer, to `i128`.
fn coerce_integer(raw: &JsonValue) -> Option<i128> {
   match raw {
      JsonValue::Number(n) => n
         .as_i64()
         .map(i128::from)
         .or_else(|| n.as_u64().map(i128::from)),
      JsonValue::String(s) => s.trim().parse::<i128>().ok(),
      _ => None,
   }
}

fn invalid(parameter: &'static str, raw: &JsonValue, expected: impl Into<String>) -> Error {
   let err = Error::InvalidParameter {
      parameter,
      value: raw_text(raw),
      expected: expected.into(),
   };
   debug!(parameter, value = %raw, "Rejected paging parameter");
   err
}

/// Validate a `limit` value: a strictly positive integer.
pub fn validate_limit(raw: &JsonValue) -> Result<u64> {
   validate_limit_with(raw, &PagingConfig::default())
}

/// Validate a `limit` value, also enforcing [`PagingConfig::max_limit`].
pub fn validate_limit_with(raw: &JsonValue, config: &PagingConfig) -> Result<u64> {
   const EXPECTED: &str = "a positive non-zero integer";

   let limit = coerce_integer(raw)
      .and_then(|v| u64::try_from(v).ok())
      .filter(|v| *v > 0)
      .ok_or_else(|| invalid("limit", raw, EXPECTED))?;

   if let Some(max) = config.max_limit
      && limit > max
   {
      return Err(invalid(
         "limit",
         raw,
         format!("{EXPECTED} no greater than {max}"),
      ));
   }

   Ok(limit)
}

/// Validate an `offset` value: a non-negative integer, zero included.
pub fn validate_offset(raw: &JsonValue) -> Result<u64> {
   coerce_integer(raw)
      .and_then(|v| u64::try_from(v).ok())
      .ok_or_else(|| invalid("offset", raw, "a non-negative integer"))
}

/// Validate an `include_total` value.
///
/// Accepts JSON booleans and the strings `true`/`false` in any case. An empty
/// string counts as `true`, so a bare `?include_total` flag turns counting on.
pub fn validate_include_total(raw: &JsonValue) -> Result<bool> {
   match raw {
      JsonValue::Bool(b) => Ok(*b),
      JsonValue::String(s) => {
         let s = s.trim();
         if s.is_empty() || s.eq_ignore_ascii_case("true") {
            Ok(true)
         } else if s.eq_ignore_ascii_case("false") {
            Ok(false)
         } else {
            Err(invalid("include_total", raw, "a boolean"))
         }
      }
      _ => Err(invalid("include_total", raw, "a boolean")),
   }
}

/// Validate an `explain` value. Only `analyze` is supported, matched exactly.
pub fn validate_explain_mode(raw: &str) -> Result<ExplainMode> {
   if raw == ExplainMode::Analyze.as_str() {
      Ok(ExplainMode::Analyze)
   } else {
      debug!(value = raw, "Rejected explain mode");
      Err(Error::InvalidExplainMode {
         value: raw.to_string(),
      })
   }
}

/// Whether `raw` is an acceptable order direction: absent, or `asc`/`desc`
/// in any case.
pub fn is_valid_direction_token(raw: Option<&str>) -> bool {
   match raw {
      None => true,
      Some(token) => token.eq_ignore_ascii_case("asc") || token.eq_ignore_ascii_case("desc"),
   }
}
