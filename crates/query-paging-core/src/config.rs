//! Configuration for paging-parameter parsing

/// Caps applied while parsing raw paging parameters.
///
/// The defaults impose no caps, so any positive `limit` and any number of
/// `order_by` entries are accepted.
///
/// # Examples
///
/// ```
/// use query_paging_core::PagingConfig;
///
/// // Use defaults
/// let config = PagingConfig::default();
///
/// // Customize specific fields
/// let config = PagingConfig {
///    max_limit: Some(1000),
///    max_sort_keys: Some(4),
/// };
///
/// // Override just one field
/// let config = PagingConfig {
///    max_limit: Some(500),
///    ..Default::default()
/// };
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct PagingConfig {
   /// Largest `limit` a caller may request
   ///
   /// A larger value is rejected, not clamped.
   ///
   /// Default: `None` (no cap)
   pub max_limit: Option<u64>,

   /// Largest number of `order_by` entries a caller may supply
   ///
   /// Default: `None` (no cap)
   pub max_sort_keys: Option<usize>,
}
