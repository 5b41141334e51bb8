//! The assembled paging record and the raw-parameter pipeline that builds it.

use serde::Serialize;
use serde_json::Value as JsonValue;
use tracing::{debug, trace};

use crate::order_by::{OrderBy, parse_order_by_with};
use crate::params::{validate_include_total, validate_limit_with, validate_offset};
use crate::{Error, PagingConfig, Result};

/// Validated paging directives for one query.
///
/// `Default` is the no-op record: no limit, no offset, no ordering, no total.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize)]
pub struct PagingOptions {
   /// Maximum number of rows to return; strictly positive when present
   pub limit: Option<u64>,
   /// Number of rows to skip
   pub offset: Option<u64>,
   /// Sort keys, primary first
   pub order_by: Vec<OrderBy>,
   /// Whether the total matched-row count should be computed
   pub include_total: bool,
}

impl PagingOptions {
   /// Build a record from independently validated parts and re-check it.
   pub fn assemble(
      limit: Option<u64>,
      offset: Option<u64>,
      order_by: Vec<OrderBy>,
      include_total: bool,
   ) -> Result<Self> {
      let options = Self {
         limit,
         offset,
         order_by,
         include_total,
      };
      options.validate()?;
      Ok(options)
   }

   /// Whole-record sanity check.
   ///
   /// Fails with [`Error::InvalidPagingOptions`] when `limit` is zero or an
   /// `order_by` entry has an empty field. A record produced by
   /// [`PagingOptions::assemble`] or [`parse_paging_options`] always passes.
   pub fn validate(&self) -> Result<()> {
      if self.limit == Some(0) {
         debug!("Rejected paging options with zero limit");
         return Err(Error::InvalidPagingOptions(
            "limit must be a positive non-zero integer".to_string(),
         ));
      }

      if let Some(position) = self.order_by.iter().position(|o| o.field.is_empty()) {
         debug!(position, "Rejected paging options with empty order_by field");
         return Err(Error::InvalidPagingOptions(format!(
            "order_by entry {position} has an empty field"
         )));
      }

      Ok(())
   }

   /// Whether any paging, ordering or counting work is needed downstream.
   ///
   /// Returns `false` only for the no-op record, letting the executor skip
   /// the paging machinery for simple queries.
   pub fn requires_paging(&self) -> bool {
      self.limit.is_some()
         || self.offset.is_some()
         || !self.order_by.is_empty()
         || self.include_total
   }
}

/// The four raw paging values of a request, each possibly absent.
///
/// Values are loosely typed: query-string parameters arrive as JSON strings,
/// request bodies may carry numbers, booleans or structured `order_by`.
#[derive(Debug, Clone, Copy, Default)]
pub struct RawPagingParams<'a> {
   pub limit: Option<&'a JsonValue>,
   pub offset: Option<&'a JsonValue>,
   pub order_by: Option<&'a JsonValue>,
   pub include_total: Option<&'a JsonValue>,
}

/// Run the whole pipeline over raw paging values.
///
/// `order_by` is parsed first, then `limit`, `offset` and `include_total`;
/// the first failure is returned and no partial record escapes.
pub fn parse_paging_options(
   raw: &RawPagingParams<'_>,
   config: &PagingConfig,
) -> Result<PagingOptions> {
   let order_by = match raw.order_by {
      Some(value) => parse_order_by_with(value, config)?,
      None => Vec::new(),
   };
   let limit = raw
      .limit
      .map(|value| validate_limit_with(value, config))
      .transpose()?;
   let offset = raw.offset.map(validate_offset).transpose()?;
   let include_total = match raw.include_total {
      Some(value) => validate_include_total(value)?,
      None => false,
   };

   let options = PagingOptions::assemble(limit, offset, order_by, include_total)?;
   trace!(
      limit = ?options.limit,
      offset = ?options.offset,
      sort_keys = options.order_by.len(),
      include_total = options.include_total,
      "Assembled paging options"
   );
   Ok(options)
}
