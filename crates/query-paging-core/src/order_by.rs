//! `order_by` decoding and normalization.
//!
//! Two input shapes feed one normalized form, a `Vec<OrderBy>`:
//!
//! - The wire shape, a JSON array of maps: `[{"field": "certname", "order":
//!   "desc"}]`. The `order` key is optional and case-insensitive. Accepted as
//!   JSON text or as an already-decoded value by [`parse_order_by`].
//! - The pair shape used by internal callers: `["certname", ["name", "desc"]]`.
//!   Each element is a bare field, a one-element `[field]`, or a
//!   `[field, direction]` pair where the direction may carry a keyword colon
//!   (`:desc`). Accepted by [`parse_order_by_pairs`].
//!
//! # Example
//!
//! ```
//! use query_paging_core::order_by::{OrderBy, parse_order_by_json};
//!
//! let order_by = parse_order_by_json(r#"[{"field":"certname","order":"desc"}]"#).unwrap();
//! assert_eq!(order_by, vec![OrderBy::desc("certname")]);
//! ```

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value as JsonValue};
use tracing::{debug, trace};

use crate::params::{is_valid_direction_token, raw_text};
use crate::{Error, PagingConfig, Result};

const EXPECTED_MAPS: &str = "an array of maps";
const EXPECTED_JSON_MAPS: &str = "a JSON array of maps";
const EXPECTED_PAIRS: &str = "an array of fields or [field, direction] pairs";

/// Sort direction for an `order_by` entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum Direction {
   /// Ascending order (smallest first)
   #[default]
   #[serde(rename = "asc")]
   Ascending,
   /// Descending order (largest first)
   #[serde(rename = "desc")]
   Descending,
}

impl Direction {
   /// SQL keyword for this direction.
   pub fn as_sql(self) -> &'static str {
      match self {
         Direction::Ascending => "ASC",
         Direction::Descending => "DESC",
      }
   }
}

impl FromStr for Direction {
   type Err = Error;

   /// Parse a direction token, `asc` or `desc` in any case.
   fn from_str(token: &str) -> Result<Self> {
      if !is_valid_direction_token(Some(token)) {
         debug!(value = token, "Rejected order direction");
         return Err(Error::InvalidOrderDirection {
            value: token.to_string(),
         });
      }

      if token.eq_ignore_ascii_case("desc") {
         Ok(Direction::Descending)
      } else {
         Ok(Direction::Ascending)
      }
   }
}

impl fmt::Display for Direction {
   fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
      match self {
         Direction::Ascending => f.write_str("asc"),
         Direction::Descending => f.write_str("desc"),
      }
   }
}

/// One sort key: a field and its direction.
///
/// Before dealiasing `field` is the user-facing name; afterwards it is the
/// internal expression the executor sorts by.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct OrderBy {
   /// Field name or projection expression
   pub field: String,
   /// Sort direction for this field
   #[serde(rename = "order")]
   pub direction: Direction,
}

impl OrderBy {
   pub fn new(field: impl Into<String>, direction: Direction) -> Self {
      Self {
         field: field.into(),
         direction,
      }
   }

   /// Create an entry with ascending sort direction.
   pub fn asc(field: impl Into<String>) -> Self {
      Self::new(field, Direction::Ascending)
   }

   /// Create an entry with descending sort direction.
   pub fn desc(field: impl Into<String>) -> Self {
      Self::new(field, Direction::Descending)
   }
}

fn malformed(value: impl Into<String>, expected: impl Into<String>) -> Error {
   let value = value.into();
   debug!(value = %value, "Rejected malformed order_by");
   Error::MalformedOrderBy {
      value,
      expected: expected.into(),
   }
}

fn missing_field(entry: &JsonValue) -> Error {
   debug!(entry = %entry, "Rejected order_by entry without a field");
   Error::MissingOrderByField {
      entry: entry.to_string(),
   }
}

fn check_sort_key_count(
   entries: &[OrderBy],
   raw: &JsonValue,
   config: &PagingConfig,
) -> Result<()> {
   if let Some(max) = config.max_sort_keys
      && entries.len() > max
   {
      return Err(malformed(
         raw_text(raw),
         format!("no more than {max} order_by entries"),
      ));
   }
   Ok(())
}

/// Decode `order_by` JSON text into normalized entries.
///
/// Invalid JSON fails with [`Error::MalformedOrderBy`] carrying the raw text.
pub fn parse_order_by_json(text: &str) -> Result<Vec<OrderBy>> {
   parse_order_by_json_with(text, &PagingConfig::default())
}

/// [`parse_order_by_json`] with configured caps.
pub fn parse_order_by_json_with(text: &str, config: &PagingConfig) -> Result<Vec<OrderBy>> {
   let decoded: JsonValue =
      serde_json::from_str(text).map_err(|_| malformed(text, EXPECTED_JSON_MAPS))?;
   normalize_map_entries(&decoded, text, config)
}

/// Normalize a wire-shaped `order_by` value.
///
/// A JSON string is decoded first; any other value is taken as already
/// decoded. `null` and `[]` yield no entries. Anything other than an array of
/// maps fails with [`Error::MalformedOrderBy`].
pub fn parse_order_by(value: &JsonValue) -> Result<Vec<OrderBy>> {
   parse_order_by_with(value, &PagingConfig::default())
}

/// [`parse_order_by`] with configured caps.
pub fn parse_order_by_with(value: &JsonValue, config: &PagingConfig) -> Result<Vec<OrderBy>> {
   match value {
      JsonValue::String(text) => parse_order_by_json_with(text, config),
      decoded => normalize_map_entries(decoded, &raw_text(decoded), config),
   }
}

fn normalize_map_entries(
   decoded: &JsonValue,
   raw: &str,
   config: &PagingConfig,
) -> Result<Vec<OrderBy>> {
   let items = match decoded {
      JsonValue::Null => return Ok(Vec::new()),
      JsonValue::Array(items) => items,
      _ => return Err(malformed(raw, EXPECTED_MAPS)),
   };

   let mut entries = Vec::with_capacity(items.len());
   for item in items {
      match item {
         JsonValue::Object(map) => entries.push(normalize_map_entry(map)?),
         _ => return Err(malformed(raw, EXPECTED_MAPS)),
      }
   }

   check_sort_key_count(&entries, decoded, config)?;
   trace!(entries = entries.len(), "Parsed order_by");
   Ok(entries)
}

/// Normalize one `{"field": ..., "order": ...}` entry.
///
/// Checks run in order: the field, then the direction, then unknown keys.
fn normalize_map_entry(map: &Map<String, JsonValue>) -> Result<OrderBy> {
   let entry = || JsonValue::Object(map.clone());

   let field = match map.get("field") {
      None | Some(JsonValue::Null) => return Err(missing_field(&entry())),
      Some(JsonValue::String(s)) if s.is_empty() => return Err(missing_field(&entry())),
      Some(JsonValue::String(s)) => s.clone(),
      Some(_) => {
         return Err(malformed(
            entry().to_string(),
            "a string field name in every order_by entry",
         ));
      }
   };

   let direction = match map.get("order") {
      None | Some(JsonValue::Null) => Direction::Ascending,
      Some(JsonValue::String(token)) => token.parse::<Direction>()?,
      Some(other) => {
         return Err(Error::InvalidOrderDirection {
            value: raw_text(other),
         });
      }
   };

   if let Some(key) = map.keys().find(|k| !matches!(k.as_str(), "field" | "order")) {
      debug!(key = %key, "Rejected order_by entry with unknown key");
      return Err(Error::UnknownOrderByKey {
         key: key.clone(),
         entry: entry().to_string(),
      });
   }

   Ok(OrderBy { field, direction })
}

/// Normalize a pair-shaped `order_by` value.
///
/// Each element is `"field"`, `["field"]` or `["field", direction]`, where
/// the direction is `asc`/`desc` in any case, optionally written as a
/// keyword (`:asc`/`:desc`). Bare and single-element forms sort ascending.
/// A JSON string is decoded first, as in [`parse_order_by`].
pub fn parse_order_by_pairs(value: &JsonValue) -> Result<Vec<OrderBy>> {
   parse_order_by_pairs_with(value, &PagingConfig::default())
}

/// [`parse_order_by_pairs`] with configured caps.
pub fn parse_order_by_pairs_with(
   value: &JsonValue,
   config: &PagingConfig,
) -> Result<Vec<OrderBy>> {
   let decoded;
   let value = match value {
      JsonValue::String(text) => {
         decoded = serde_json::from_str::<JsonValue>(text)
            .map_err(|_| malformed(text.as_str(), EXPECTED_PAIRS))?;
         &decoded
      }
      other => other,
   };

   let items = match value {
      JsonValue::Null => return Ok(Vec::new()),
      JsonValue::Array(items) => items,
      other => return Err(malformed(raw_text(other), EXPECTED_PAIRS)),
   };

   let mut entries = Vec::with_capacity(items.len());
   for item in items {
      entries.push(normalize_pair(item)?);
   }

   check_sort_key_count(&entries, value, config)?;
   trace!(entries = entries.len(), "Parsed order_by pairs");
   Ok(entries)
}

fn normalize_pair(item: &JsonValue) -> Result<OrderBy> {
   let (field, direction) = match item {
      JsonValue::String(_) => (item, None),
      JsonValue::Array(pair) => match pair.as_slice() {
         [field] => (field, None),
         [field, direction] => (field, Some(direction)),
         _ => return Err(malformed(item.to_string(), EXPECTED_PAIRS)),
      },
      _ => return Err(malformed(item.to_string(), EXPECTED_PAIRS)),
   };

   let field = match field {
      JsonValue::String(s) if s.is_empty() => return Err(missing_field(item)),
      JsonValue::String(s) => s.clone(),
      _ => return Err(malformed(item.to_string(), EXPECTED_PAIRS)),
   };

   let direction = match direction {
      None => Direction::Ascending,
      Some(JsonValue::String(keyword)) => {
         let token = keyword.strip_prefix(':').unwrap_or(keyword.as_str());
         token
            .parse::<Direction>()
            .map_err(|_| Error::InvalidOrderDirection {
               value: keyword.clone(),
            })?
      }
      Some(other) => {
         return Err(Error::InvalidOrderDirection {
            value: raw_text(other),
         });
      }
   };

   Ok(OrderBy { field, direction })
}

#[cfg(test)]
mod tests {
   use super::*;
   use serde_json::json;

   // ─── Direction ───

   #[test]
   fn direction_parses_case_insensitively() {
      assert_eq!("asc".parse::<Direction>().unwrap(), Direction::Ascending);
      assert_eq!("ASC".parse::<Direction>().unwrap(), Direction::Ascending);
      assert_eq!("desc".parse::<Direction>().unwrap(), Direction::Descending);
      assert_eq!("Desc".parse::<Direction>().unwrap(), Direction::Descending);
   }

   #[test]
   fn direction_rejects_unknown_token() {
      let err = "sideways".parse::<Direction>().unwrap_err();
      assert!(matches!(err, Error::InvalidOrderDirection { value } if value == "sideways"));
   }

   #[test]
   fn direction_serializes_to_short_tokens() {
      assert_eq!(serde_json::to_string(&Direction::Ascending).unwrap(), "\"asc\"");
      assert_eq!(serde_json::to_string(&Direction::Descending).unwrap(), "\"desc\"");
      let desc: Direction = serde_json::from_str("\"desc\"").unwrap();
      assert_eq!(desc, Direction::Descending);
   }

   // ─── parse_order_by_json ───

   #[test]
   fn json_entry_with_desc() {
      let parsed = parse_order_by_json(r#"[{"field":"certname","order":"desc"}]"#).unwrap();
      assert_eq!(parsed, vec![OrderBy::desc("certname")]);
   }

   #[test]
   fn json_entry_without_order_defaults_to_ascending() {
      let parsed = parse_order_by_json(r#"[{"field":"certname"}]"#).unwrap();
      assert_eq!(parsed, vec![OrderBy::asc("certname")]);
   }

   #[test]
   fn json_entry_order_is_case_insensitive() {
      let parsed =
         parse_order_by_json(r#"[{"field":"a","order":"ASC"},{"field":"b","order":"DeSc"}]"#)
            .unwrap();
      assert_eq!(parsed, vec![OrderBy::asc("a"), OrderBy::desc("b")]);
   }

   #[test]
   fn json_keeps_entry_order_and_duplicates() {
      let parsed = parse_order_by_json(
         r#"[{"field":"name","order":"desc"},{"field":"certname"},{"field":"name"}]"#,
      )
      .unwrap();
      assert_eq!(
         parsed,
         vec![
            OrderBy::desc("name"),
            OrderBy::asc("certname"),
            OrderBy::asc("name"),
         ]
      );
   }

   #[test]
   fn json_missing_field_fails() {
      let err = parse_order_by_json(r#"[{"order":"asc"}]"#).unwrap_err();
      assert!(matches!(err, Error::MissingOrderByField { .. }));
   }

   #[test]
   fn json_empty_or_null_field_fails() {
      for text in [r#"[{"field":""}]"#, r#"[{"field":null}]"#] {
         let err = parse_order_by_json(text).unwrap_err();
         assert!(matches!(err, Error::MissingOrderByField { .. }), "{text}");
      }
   }

   #[test]
   fn json_non_string_field_is_malformed() {
      let err = parse_order_by_json(r#"[{"field":42}]"#).unwrap_err();
      assert!(matches!(err, Error::MalformedOrderBy { .. }));
   }

   #[test]
   fn json_bogus_direction_fails() {
      let err = parse_order_by_json(r#"[{"field":"certname","order":"bogus"}]"#).unwrap_err();
      assert!(matches!(err, Error::InvalidOrderDirection { value } if value == "bogus"));
   }

   #[test]
   fn json_non_string_direction_fails() {
      let err = parse_order_by_json(r#"[{"field":"certname","order":1}]"#).unwrap_err();
      assert!(matches!(err, Error::InvalidOrderDirection { value } if value == "1"));
   }

   #[test]
   fn json_unknown_key_fails() {
      let err =
         parse_order_by_json(r#"[{"field":"certname","direction":"desc"}]"#).unwrap_err();
      assert!(matches!(err, Error::UnknownOrderByKey { ref key, .. } if key == "direction"));
   }

   #[test]
   fn json_missing_field_checked_before_unknown_key() {
      let err = parse_order_by_json(r#"[{"column":"certname"}]"#).unwrap_err();
      assert!(matches!(err, Error::MissingOrderByField { .. }));
   }

   #[test]
   fn json_bad_direction_checked_before_unknown_key() {
      let err =
         parse_order_by_json(r#"[{"field":"certname","order":"up","limit":1}]"#).unwrap_err();
      assert!(matches!(err, Error::InvalidOrderDirection { value } if value == "up"));
   }

   #[test]
   fn invalid_json_is_malformed_and_echoes_text() {
      let err = parse_order_by_json("not json").unwrap_err();
      assert!(matches!(err, Error::MalformedOrderBy { ref value, .. } if value == "not json"));
      assert!(err.to_string().contains("not json"));
   }

   #[test]
   fn json_non_array_is_malformed() {
      for text in [r#"{"field":"certname"}"#, r#""certname""#, "42"] {
         let err = parse_order_by_json(text).unwrap_err();
         assert!(matches!(err, Error::MalformedOrderBy { .. }), "{text}");
      }
   }

   #[test]
   fn json_array_of_non_maps_is_malformed() {
      for text in [r#"["certname"]"#, r#"[["certname","desc"]]"#, r#"[{"field":"a"}, 1]"#] {
         let err = parse_order_by_json(text).unwrap_err();
         assert!(matches!(err, Error::MalformedOrderBy { .. }), "{text}");
      }
   }

   #[test]
   fn json_null_and_empty_array_yield_nothing() {
      assert!(parse_order_by_json("null").unwrap().is_empty());
      assert!(parse_order_by_json("[]").unwrap().is_empty());
   }

   // ─── parse_order_by (decoded values) ───

   #[test]
   fn decoded_value_skips_json_decoding() {
      let value = json!([{"field": "certname", "order": "desc"}, {"field": "name"}]);
      let parsed = parse_order_by(&value).unwrap();
      assert_eq!(parsed, vec![OrderBy::desc("certname"), OrderBy::asc("name")]);
   }

   #[test]
   fn string_value_is_decoded_as_json() {
      let value = json!(r#"[{"field":"certname"}]"#);
      assert_eq!(parse_order_by(&value).unwrap(), vec![OrderBy::asc("certname")]);
   }

   #[test]
   fn decoded_scalar_is_malformed() {
      let err = parse_order_by(&json!(7)).unwrap_err();
      assert!(matches!(err, Error::MalformedOrderBy { ref value, .. } if value == "7"));
   }

   #[test]
   fn sort_key_cap_enforced() {
      let config = PagingConfig {
         max_sort_keys: Some(1),
         ..Default::default()
      };
      let value = json!([{"field": "a"}, {"field": "b"}]);
      let err = parse_order_by_with(&value, &config).unwrap_err();
      assert!(err.to_string().contains("no more than 1"));
      assert!(parse_order_by_with(&json!([{"field": "a"}]), &config).is_ok());
   }

   // ─── parse_order_by_pairs ───

   #[test]
   fn pairs_accept_bare_single_and_directed_forms() {
      let value = json!(["certname", ["name"], ["value", ":desc"], ["environment", "asc"]]);
      let parsed = parse_order_by_pairs(&value).unwrap();
      assert_eq!(
         parsed,
         vec![
            OrderBy::asc("certname"),
            OrderBy::asc("name"),
            OrderBy::desc("value"),
            OrderBy::asc("environment"),
         ]
      );
   }

   #[test]
   fn pairs_string_value_is_decoded_as_json() {
      let parsed = parse_order_by_pairs(&json!(r#"[["certname", ":desc"]]"#)).unwrap();
      assert_eq!(parsed, vec![OrderBy::desc("certname")]);
   }

   #[test]
   fn pairs_invalid_json_text_is_malformed() {
      let err = parse_order_by_pairs(&json!("[[certname")).unwrap_err();
      assert!(matches!(err, Error::MalformedOrderBy { ref value, .. } if value == "[[certname"));
   }

   #[test]
   fn pairs_keyword_case_insensitive() {
      let parsed = parse_order_by_pairs(&json!([["a", ":DESC"], ["b", "Desc"]])).unwrap();
      assert_eq!(parsed, vec![OrderBy::desc("a"), OrderBy::desc("b")]);
   }

   #[test]
   fn pairs_reject_unknown_direction() {
      let err = parse_order_by_pairs(&json!([["a", ":sideways"]])).unwrap_err();
      assert!(matches!(err, Error::InvalidOrderDirection { value } if value == ":sideways"));
   }

   #[test]
   fn pairs_reject_wrong_arity() {
      for value in [json!([[]]), json!([["a", "asc", "extra"]])] {
         let err = parse_order_by_pairs(&value).unwrap_err();
         assert!(matches!(err, Error::MalformedOrderBy { .. }), "{value}");
      }
   }

   #[test]
   fn pairs_reject_empty_field() {
      let err = parse_order_by_pairs(&json!([[""]])).unwrap_err();
      assert!(matches!(err, Error::MissingOrderByField { .. }));
   }

   #[test]
   fn pairs_reject_map_entries() {
      let err = parse_order_by_pairs(&json!([{"field": "a"}])).unwrap_err();
      assert!(matches!(err, Error::MalformedOrderBy { .. }));
   }

   #[test]
   fn pairs_and_maps_normalize_identically() {
      let from_pairs = parse_order_by_pairs(&json!([["certname", ":desc"], "name"])).unwrap();
      let from_maps =
         parse_order_by(&json!([{"field": "certname", "order": "desc"}, {"field": "name"}]))
            .unwrap();
      assert_eq!(from_pairs, from_maps);
   }
}
