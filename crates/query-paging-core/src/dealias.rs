//! Rewriting user-facing sort fields into projection expressions.
//!
//! The query-definition layer owns the mapping from the names a caller sees
//! to the expressions the executor evaluates. It is passed in per query, so
//! the rewrite stays a pure function of its inputs.

use indexmap::IndexMap;
use tracing::{debug, trace};

use crate::{Error, OrderBy, PagingOptions, Result};

/// Alias → internal expression for one query's projection.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProjectionAliasTable(IndexMap<String, String>);

impl ProjectionAliasTable {
   pub fn new() -> Self {
      Self::default()
   }

   /// Register `alias` as a name for `expression`, replacing any earlier entry.
   pub fn insert(&mut self, alias: impl Into<String>, expression: impl Into<String>) {
      self.0.insert(alias.into(), expression.into());
   }

   /// Internal expression for `alias`, if the projection defines one.
   pub fn expression(&self, alias: &str) -> Option<&str> {
      self.0.get(alias).map(String::as_str)
   }
}

impl<A: Into<String>, E: Into<String>> FromIterator<(A, E)> for ProjectionAliasTable {
   fn from_iter<I: IntoIterator<Item = (A, E)>>(iter: I) -> Self {
      Self(
         iter
            .into_iter()
            .map(|(alias, expression)| (alias.into(), expression.into()))
            .collect(),
      )
   }
}

/// Replace every `order_by` field with its projection expression.
///
/// Direction and entry order are preserved. A field with no entry in `table`
/// fails with [`Error::UnaliasedSortField`]; nothing is passed through
/// unresolved. Run whitelist validation first, since it checks user-facing
/// names.
pub fn dealias_order_by(
   table: &ProjectionAliasTable,
   options: PagingOptions,
) -> Result<PagingOptions> {
   let PagingOptions {
      limit,
      offset,
      order_by,
      include_total,
   } = options;

   let order_by = order_by
      .into_iter()
      .map(|entry| match table.expression(&entry.field) {
         Some(expression) => Ok(OrderBy::new(expression, entry.direction)),
         None => {
            debug!(field = %entry.field, "No projection expression for sort field");
            Err(Error::UnaliasedSortField { field: entry.field })
         }
      })
      .collect::<Result<Vec<_>>>()?;

   trace!(sort_keys = order_by.len(), "Dealiased order_by");
   Ok(PagingOptions {
      limit,
      offset,
      order_by,
      include_total,
   })
}

#[cfg(test)]
mod tests {
   use super::*;

   fn table() -> ProjectionAliasTable {
      [
         ("certname", "c.certname"),
         ("name", "fs.name"),
         ("value", "COALESCE(fv.value_string, fv.value_json::text)"),
      ]
      .into_iter()
      .collect()
   }

   #[test]
   fn rewrites_fields_preserving_direction_and_order() {
      let options = PagingOptions {
         limit: Some(10),
         offset: Some(2),
         order_by: vec![
            OrderBy::desc("value"),
            OrderBy::asc("certname"),
            OrderBy::desc("name"),
         ],
         include_total: true,
      };

      let dealiased = dealias_order_by(&table(), options).unwrap();

      assert_eq!(
         dealiased.order_by,
         vec![
            OrderBy::desc("COALESCE(fv.value_string, fv.value_json::text)"),
            OrderBy::asc("c.certname"),
            OrderBy::desc("fs.name"),
         ]
      );
      assert_eq!(dealiased.limit, Some(10));
      assert_eq!(dealiased.offset, Some(2));
      assert!(dealiased.include_total);
   }

   #[test]
   fn single_alias() {
      let table: ProjectionAliasTable = [("certname", "c.certname")].into_iter().collect();
      let options = PagingOptions {
         order_by: vec![OrderBy::asc("certname")],
         ..Default::default()
      };
      let dealiased = dealias_order_by(&table, options).unwrap();
      assert_eq!(dealiased.order_by, vec![OrderBy::asc("c.certname")]);
   }

   #[test]
   fn missing_alias_is_an_error() {
      let options = PagingOptions {
         order_by: vec![OrderBy::asc("certname"), OrderBy::asc("environment")],
         ..Default::default()
      };
      let err = dealias_order_by(&table(), options).unwrap_err();
      assert!(matches!(err, Error::UnaliasedSortField { field } if field == "environment"));
   }

   #[test]
   fn empty_order_by_needs_no_table() {
      let options = PagingOptions {
         limit: Some(1),
         ..Default::default()
      };
      let dealiased = dealias_order_by(&ProjectionAliasTable::new(), options.clone()).unwrap();
      assert_eq!(dealiased, options);
   }

   #[test]
   fn later_insert_replaces_alias() {
      let mut table = ProjectionAliasTable::new();
      table.insert("name", "old.name");
      table.insert("name", "new.name");
      assert_eq!(table.expression("name"), Some("new.name"));
      let expected: ProjectionAliasTable = [("name", "new.name")].into_iter().collect();
      assert_eq!(table, expected);
   }
}
