//! # query-paging-core
//!
//! Turns untrusted, loosely typed paging directives (`limit`, `offset`,
//! `order_by`, `include_total`) into a validated [`PagingOptions`] record for
//! a query executor.
//!
//! ## Pipeline
//!
//! ```text
//! raw values ─► parse_order_by ─► validate_limit / validate_offset /
//!    validate_include_total ─► PagingOptions::assemble
//!    ─► validate_order_by_columns (optional) ─► dealias_order_by (optional)
//!    ─► executor (sql::paged_sql, sql::count_sql)
//! ```
//!
//! Whitelist validation runs before dealiasing so it checks the user-facing
//! names. [`PagingOptions::requires_paging`] may be asked at any point after
//! assembly.
//!
//! Every operation is a pure function of its inputs. Failures are returned
//! as [`Error`], whose messages embed the offending raw value and whose
//! [`Error::error_code`] gives a stable machine-readable code.
//!
//! ## Example
//!
//! ```
//! use query_paging_core::{
//!    ColumnWhitelist, OrderBy, PagingConfig, ProjectionAliasTable, RawPagingParams,
//!    dealias_order_by, parse_paging_options, validate_order_by_columns,
//! };
//! use serde_json::json;
//!
//! let limit = json!("10");
//! let order_by = json!(r#"[{"field":"certname","order":"desc"}]"#);
//! let raw = RawPagingParams {
//!    limit: Some(&limit),
//!    order_by: Some(&order_by),
//!    ..Default::default()
//! };
//!
//! let options = parse_paging_options(&raw, &PagingConfig::default()).unwrap();
//! let columns: ColumnWhitelist = ["certname", "catalog_timestamp"].into_iter().collect();
//! let options = validate_order_by_columns(&columns, options).unwrap();
//! let aliases: ProjectionAliasTable = [("certname", "c.certname")].into_iter().collect();
//! let options = dealias_order_by(&aliases, options).unwrap();
//!
//! assert_eq!(options.order_by, vec![OrderBy::desc("c.certname")]);
//! assert!(options.requires_paging());
//! ```

mod columns;
mod config;
mod dealias;
mod error;
mod options;
pub mod order_by;
pub mod params;
pub mod sql;

pub use columns::{ColumnWhitelist, validate_order_by_columns};
pub use config::PagingConfig;
pub use dealias::{ProjectionAliasTable, dealias_order_by};
pub use error::{Error, Result};
pub use options::{PagingOptions, RawPagingParams, parse_paging_options};
pub use order_by::{Direction, OrderBy, parse_order_by, parse_order_by_json, parse_order_by_pairs};
pub use params::{
   ExplainMode, is_valid_direction_token, validate_explain_mode, validate_include_total,
   validate_limit, validate_offset,
};
