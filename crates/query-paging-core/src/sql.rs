//! SQL rendering of dealiased paging options.
//!
//! The executor owns query construction; these helpers only render the
//! paging suffix and the total-count wrapper it needs once a base query is
//! built.
//!
//! Sort fields are interpolated verbatim. They must be projection
//! expressions produced by [`dealias_order_by`](crate::dealias_order_by),
//! never raw caller input.
//!
//! # Example
//!
//! ```
//! use query_paging_core::{OrderBy, PagingOptions};
//! use query_paging_core::sql::paged_sql;
//!
//! let options = PagingOptions {
//!    limit: Some(10),
//!    offset: Some(20),
//!    order_by: vec![OrderBy::desc("c.certname")],
//!    include_total: false,
//! };
//! let sql = paged_sql("SELECT c.certname FROM certnames c", &options).unwrap();
//! assert_eq!(
//!    sql,
//!    "SELECT c.certname FROM certnames c ORDER BY c.certname DESC LIMIT 10 OFFSET 20"
//! );
//! ```

use tracing::debug;

use crate::{Error, OrderBy, PagingOptions, Result};

/// Clauses a base query must leave to the paging suffix, as keyword sequences.
const PAGING_CLAUSES: [&[&str]; 3] = [&["ORDER", "BY"], &["LIMIT"], &["OFFSET"]];

/// Whether `keyword` starts at byte `i` of the uppercased `bytes` and is
/// not part of a longer identifier.
fn is_keyword_at(bytes: &[u8], i: usize, keyword: &[u8]) -> bool {
   let end = i + keyword.len();
   if end > bytes.len() || &bytes[i..end] != keyword {
      return false;
   }

   let is_ident = |b: u8| b.is_ascii_alphanumeric() || b == b'_';
   let before_ok = i == 0 || !is_ident(bytes[i - 1]);
   let after_ok = end == bytes.len() || !is_ident(bytes[end]);

   before_ok && after_ok
}

/// Index of the closing quote for the quoted section opened at `i`.
///
/// A doubled quote (`''` or `""`) is an escape. Unterminated sections run to
/// the end of input.
fn skip_quoted(bytes: &[u8], i: usize) -> usize {
   let quote = bytes[i];
   let mut j = i + 1;
   while j < bytes.len() {
      if bytes[j] == quote {
         if bytes.get(j + 1) == Some(&quote) {
            j += 2;
            continue;
         }
         return j;
      }
      j += 1;
   }
   j
}

/// Index of the last byte of the comment opened at `i`.
fn skip_comment(bytes: &[u8], i: usize) -> usize {
   if bytes[i] == b'-' {
      let mut j = i + 2;
      while j < bytes.len() && bytes[j] != b'\n' {
         j += 1;
      }
      return j;
   }

   let mut j = i + 2;
   while j + 1 < bytes.len() {
      if bytes[j] == b'*' && bytes[j + 1] == b'/' {
         return j + 1;
      }
      j += 1;
   }
   bytes.len()
}

/// Index of the first byte at or after `i` that is neither whitespace nor
/// part of a comment.
fn skip_trivia(bytes: &[u8], mut i: usize) -> usize {
   while i < bytes.len() {
      match bytes[i] {
         b if b.is_ascii_whitespace() => i += 1,
         b'-' if bytes.get(i + 1) == Some(&b'-') => i = skip_comment(bytes, i) + 1,
         b'/' if bytes.get(i + 1) == Some(&b'*') => i = skip_comment(bytes, i) + 1,
         _ => break,
      }
   }
   i.min(bytes.len())
}

/// Whether the keyword sequence `clause` starts at byte `i`, its words
/// separated by any mix of whitespace and comments.
fn is_clause_at(bytes: &[u8], i: usize, clause: &[&str]) -> bool {
   let Some((first, rest)) = clause.split_first() else {
      return false;
   };
   if !is_keyword_at(bytes, i, first.as_bytes()) {
      return false;
   }

   let mut j = i + first.len();
   for word in rest {
      j = skip_trivia(bytes, j);
      if !is_keyword_at(bytes, j, word.as_bytes()) {
         return false;
      }
      j += word.len();
   }
   true
}

/// Whether `query` has any of `clauses` outside parentheses, quotes and
/// comments.
fn has_top_level_clause(query: &str, clauses: &[&[&str]]) -> bool {
   let upper = query.to_ascii_uppercase();
   let bytes = upper.as_bytes();
   let mut depth: i32 = 0;
   let mut i = 0;

   while i < bytes.len() {
      match bytes[i] {
         b'(' => depth += 1,
         b')' => depth -= 1,
         b'\'' | b'"' => i = skip_quoted(bytes, i),
         b'-' if bytes.get(i + 1) == Some(&b'-') => i = skip_comment(bytes, i),
         b'/' if bytes.get(i + 1) == Some(&b'*') => i = skip_comment(bytes, i),
         _ if depth == 0 && clauses.iter().any(|c| is_clause_at(bytes, i, c)) => {
            return true;
         }
         _ => {}
      }
      i += 1;
   }

   false
}

/// Render the `ORDER BY` clause, or `None` when there is nothing to sort by.
pub fn order_by_clause(order_by: &[OrderBy]) -> Option<String> {
   if order_by.is_empty() {
      return None;
   }

   let keys: Vec<String> = order_by
      .iter()
      .map(|o| format!("{} {}", o.field, o.direction.as_sql()))
      .collect();

   Some(format!("ORDER BY {}", keys.join(", ")))
}

/// Append the ordering and slicing from `options` to `base_query`.
///
/// Trailing whitespace and semicolons are stripped first. A base query that
/// already orders, limits or offsets at the top level fails with
/// [`Error::ConflictingBaseQuery`]; clauses inside subqueries, comments and
/// literals are fine.
pub fn paged_sql(base_query: &str, options: &PagingOptions) -> Result<String> {
   if has_top_level_clause(base_query, &PAGING_CLAUSES) {
      debug!("Rejected base query with its own ORDER BY/LIMIT/OFFSET");
      return Err(Error::ConflictingBaseQuery);
   }

   let mut sql = base_query
      .trim_end()
      .trim_end_matches(';')
      .trim_end()
      .to_string();

   if let Some(clause) = order_by_clause(&options.order_by) {
      sql = format!("{sql} {clause}");
   }
   if let Some(limit) = options.limit {
      sql = format!("{sql} LIMIT {limit}");
   }
   if let Some(offset) = options.offset {
      sql = format!("{sql} OFFSET {offset}");
   }

   Ok(sql)
}

/// Wrap `base_query` so it returns the number of rows it would produce.
pub fn count_sql(base_query: &str) -> String {
   let inner = base_query.trim_end().trim_end_matches(';').trim_end();
   format!("SELECT COUNT(*) AS result_count FROM ({inner}) results_to_count")
}
