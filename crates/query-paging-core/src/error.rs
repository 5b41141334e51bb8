/// Result type alias for paging operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Error types for paging-parameter parsing and validation.
///
/// Every variant is a user-input error. Messages embed the offending raw value
/// so the boundary layer can pass them to the caller verbatim.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum Error {
   /// `limit`, `offset` or `include_total` is not coercible or out of range.
   #[error("illegal value '{value}' for {parameter}; expected {expected}")]
   InvalidParameter {
      parameter: &'static str,
      value: String,
      expected: String,
   },

   /// `order_by` is not valid JSON, or not a sequence of entries.
   #[error("illegal value '{value}' for order_by; expected {expected}")]
   MalformedOrderBy { value: String, expected: String },

   /// An `order_by` entry has no field name.
   #[error("missing required key 'field' in order_by entry '{entry}'")]
   MissingOrderByField { entry: String },

   /// An `order_by` direction is neither `asc` nor `desc`.
   #[error("illegal order direction '{value}' in order_by; expected 'asc' or 'desc'")]
   InvalidOrderDirection { value: String },

   /// An `order_by` entry carries a key other than `field` or `order`.
   #[error(
      "unrecognized key '{key}' in order_by entry '{entry}'; allowed keys are 'field' and 'order'"
   )]
   UnknownOrderByKey { key: String, entry: String },

   /// A sort column is not among the legal columns for the query.
   #[error(
      "unrecognized column '{column}' specified in order_by; supported columns are {}",
      .allowed.join(", ")
   )]
   UnknownSortColumn {
      column: String,
      allowed: Vec<String>,
   },

   /// The `explain` parameter is set to something other than `analyze`.
   #[error("illegal value '{value}' for explain; the only supported mode is 'analyze'")]
   InvalidExplainMode { value: String },

   /// An assembled `PagingOptions` record failed its whole-record check.
   #[error("invalid paging options: {0}")]
   InvalidPagingOptions(String),

   /// A sort field has no entry in the projection-alias table.
   #[error("order_by field '{field}' has no projection expression to sort by")]
   UnaliasedSortField { field: String },

   /// Base query already orders or limits its results at the top level.
   #[error(
      "base query must not contain top-level ORDER BY, LIMIT or OFFSET clauses (these are added from the paging options; subquery usage is fine)"
   )]
   ConflictingBaseQuery,
}

impl Error {
   /// Extract a structured error code from the error type.
   ///
   /// This provides machine-readable error codes for error handling.
   pub fn error_code(&self) -> String {
      match self {
         Error::InvalidParameter { .. } => "INVALID_PARAMETER".to_string(),
         Error::MalformedOrderBy { .. } => "MALFORMED_ORDER_BY".to_string(),
         Error::MissingOrderByField { .. } => "MISSING_ORDER_BY_FIELD".to_string(),
         Error::InvalidOrderDirection { .. } => "INVALID_ORDER_DIRECTION".to_string(),
         Error::UnknownOrderByKey { .. } => "UNKNOWN_ORDER_BY_KEY".to_string(),
         Error::UnknownSortColumn { .. } => "UNKNOWN_SORT_COLUMN".to_string(),
         Error::InvalidExplainMode { .. } => "INVALID_EXPLAIN_MODE".to_string(),
         Error::InvalidPagingOptions(_) => "INVALID_PAGING_OPTIONS".to_string(),
         Error::UnaliasedSortField { .. } => "UNALIASED_SORT_FIELD".to_string(),
         Error::ConflictingBaseQuery => "CONFLICTING_BASE_QUERY".to_string(),
      }
   }
}
