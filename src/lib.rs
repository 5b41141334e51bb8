//! # query-paging
//!
//! Request boundary for paged queries. Takes the raw parameters of one query
//! request, rejects anything outside the recognized set, and hands back a
//! [`QueryRequest`] whose paging directives have been validated by
//! [`query_paging_core`].
//!
//! Errors serialize as `{ "code", "message" }`. Mapping them to a transport
//! status is left to the caller.
//!
//! # Example
//!
//! ```
//! use query_paging::{PagingConfig, params_from_pairs, parse_query_request, record_count_header};
//!
//! let params = params_from_pairs([
//!    ("query", r#"["=", "certname", "web01"]"#),
//!    ("limit", "10"),
//!    ("include_total", "true"),
//! ]);
//! let request = parse_query_request(&params, &PagingConfig::default()).unwrap();
//!
//! assert_eq!(request.paging.limit, Some(10));
//! assert_eq!(
//!    record_count_header(&request.paging, 3),
//!    Some(("X-Records", "3".to_string()))
//! );
//! ```

mod error;
mod request;

pub use error::{Error, Result};
pub use request::{
   QueryParams, QueryRequest, RECOGNIZED_PARAMS, RECORD_COUNT_HEADER, params_from_pairs,
   parse_query_request, record_count_header,
};

pub use query_paging_core::{
   ColumnWhitelist, Direction, ExplainMode, OrderBy, PagingConfig, PagingOptions,
   ProjectionAliasTable, dealias_order_by, validate_order_by_columns,
};
