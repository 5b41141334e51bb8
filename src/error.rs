use serde::ser::{Serialize, SerializeStruct, Serializer};

/// Result type alias for request-boundary operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors surfaced to API callers.
///
/// Wraps the core paging errors and adds the request-level ones. Serializes as
/// `{ "code": ..., "message": ... }` so the transport layer can use it as a
/// client-error body without further mapping.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum Error {
   /// Error from paging-parameter validation.
   #[error(transparent)]
   Paging(#[from] query_paging_core::Error),

   /// A parameter outside the recognized set was supplied.
   #[error("unsupported query parameter '{name}'")]
   UnsupportedParameter { name: String },

   /// The `query` parameter is not valid JSON.
   #[error("illegal value '{value}' for query; expected a JSON query")]
   MalformedQuery { value: String },
}

impl Error {
   /// Extract a structured error code from the error type.
   ///
   /// Paging errors keep the code assigned by the core crate.
   pub fn error_code(&self) -> String {
      match self {
         Error::Paging(e) => e.error_code(),
         Error::UnsupportedParameter { .. } => "UNSUPPORTED_PARAMETER".to_string(),
         Error::MalformedQuery { .. } => "MALFORMED_QUERY".to_string(),
      }
   }
}

impl Serialize for Error {
   fn serialize<S>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error>
   where
      S: Serializer,
   {
      let mut state = serializer.serialize_struct("Error", 2)?;
      state.serialize_field("code", &self.error_code())?;
      state.serialize_field("message", &self.to_string())?;
      state.end()
   }
}

#[cfg(test)]
mod tests {
   use super::*;
   use serde_json::json;

   #[test]
   fn test_paging_error_keeps_core_code_and_message() {
      let core = query_paging_core::Error::InvalidOrderDirection {
         value: "sideways".into(),
      };
      let message = core.to_string();
      let err = Error::from(core);
      assert_eq!(err.error_code(), "INVALID_ORDER_DIRECTION");
      assert_eq!(err.to_string(), message);
   }

   #[test]
   fn test_error_code_unsupported_parameter() {
      let err = Error::UnsupportedParameter {
         name: "page".into(),
      };
      assert_eq!(err.error_code(), "UNSUPPORTED_PARAMETER");
      assert!(err.to_string().contains("'page'"));
   }

   #[test]
   fn test_error_code_malformed_query() {
      let err = Error::MalformedQuery {
         value: "[=".into(),
      };
      assert_eq!(err.error_code(), "MALFORMED_QUERY");
      assert!(err.to_string().contains("'[='"));
   }

   #[test]
   fn test_serializes_code_and_message() {
      let err = Error::UnsupportedParameter {
         name: "page".into(),
      };
      assert_eq!(
         serde_json::to_value(&err).unwrap(),
         json!({
            "code": "UNSUPPORTED_PARAMETER",
            "message": "unsupported query parameter 'page'",
         })
      );
   }
}
