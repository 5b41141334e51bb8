//! Sort-column whitelist validation.

use indexmap::IndexSet;
use tracing::debug;

use crate::{Error, PagingOptions, Result};

/// The legal sortable columns for one query shape.
///
/// Insertion order is kept so error messages list columns the way the query
/// declares them.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ColumnWhitelist(IndexSet<String>);

impl ColumnWhitelist {
   pub fn new() -> Self {
      Self::default()
   }

   pub fn contains(&self, column: &str) -> bool {
      self.0.contains(column)
   }

   pub fn columns(&self) -> impl Iterator<Item = &str> {
      self.0.iter().map(String::as_str)
   }
}

impl<S: Into<String>> FromIterator<S> for ColumnWhitelist {
   fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
      Self(iter.into_iter().map(Into::into).collect())
   }
}

/// Check every `order_by` field against the legal columns.
///
/// The first field outside `whitelist` fails with
/// [`Error::UnknownSortColumn`], which names the field and lists the legal
/// columns. On success the options are handed back unchanged.
pub fn validate_order_by_columns(
   whitelist: &ColumnWhitelist,
   options: PagingOptions,
) -> Result<PagingOptions> {
   if let Some(unknown) = options
      .order_by
      .iter()
      .find(|o| !whitelist.contains(&o.field))
   {
      debug!(column = %unknown.field, "Rejected unknown sort column");
      return Err(Error::UnknownSortColumn {
         column: unknown.field.clone(),
         allowed: whitelist.columns().map(str::to_string).collect(),
      });
   }

   Ok(options)
}
