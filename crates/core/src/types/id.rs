//! Newtype IDs for type-safe document references.
//!
//! Content backend documents are keyed by opaque string IDs (e.g.
//! `"b3c1d0e2-..."` or `"drafts.b3c1..."`). Use the `define_id!` macro to
//! create wrappers that prevent accidentally mixing IDs from different
//! document types.

/// Macro to define a type-safe string ID wrapper.
///
/// Creates a newtype wrapper around `String` with:
/// - `Serialize`/`Deserialize` with `#[serde(transparent)]`
/// - `Debug`, `Clone`, `PartialEq`, `Eq`, `Hash`
/// - Conversion methods: `new()`, `as_str()`, `into_inner()`
/// - `From<String>`, `From<&str>` and `Into<String>` implementations
///
/// # Example
///
/// ```rust
/// # use astig_core::define_id;
/// define_id!(ProductId);
/// define_id!(CategoryId);
///
/// let product_id = ProductId::new("abc");
/// let category_id = CategoryId::new("abc");
///
/// // These are different types, so this won't compile:
/// // let _: ProductId = category_id;
/// assert_eq!(product_id.as_str(), category_id.as_str());
/// ```
#[macro_export]
macro_rules! define_id {
    ($name:ident) => {
        #[derive(
            Debug,
            Clone,
            PartialEq,
            Eq,
            Hash,
            ::serde::Serialize,
            ::serde::Deserialize
        )]
        #[serde(transparent)]
        pub struct $name(String);

        impl $name {
            /// Create a new ID from a string value.
            #[must_use]
            pub fn new(id: impl Into<String>) -> Self {
                Self(id.into())
            }

            /// Get the underlying string value.
            #[must_use]
            pub fn as_str(&self) -> &str {
                &self.0
            }

            /// Consume the ID and return the underlying string.
            #[must_use]
            pub fn into_inner(self) -> String {
                self.0
            }
        }

        impl ::core::fmt::Display for $name {
            fn fmt(&self, f: &mut ::core::fmt::Formatter<'_>) -> ::core::fmt::Result {
                f.write_str(&self.0)
            }
        }

        impl From<String> for $name {
            fn from(id: String) -> Self {
                Self(id)
            }
        }

        impl From<&str> for $name {
            fn from(id: &str) -> Self {
                Self(id.to_string())
            }
        }

        impl From<$name> for String {
            fn from(id: $name) -> Self {
                id.0
            }
        }
    };
}

// Content backend document IDs
define_id!(ProductId);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_product_id_display() {
        let id = ProductId::new("0f2c9a1e-5d7b-4e0a-9d3f-1b2c3d4e5f60");
        assert_eq!(id.to_string(), "0f2c9a1e-5d7b-4e0a-9d3f-1b2c3d4e5f60");
    }

    #[test]
    fn test_product_id_serde_transparent() {
        let id: ProductId = serde_json::from_str("\"abc123\"").expect("valid JSON string");
        assert_eq!(id.as_str(), "abc123");
        assert_eq!(
            serde_json::to_string(&id).expect("serializable"),
            "\"abc123\""
        );
    }

    #[test]
    fn test_product_id_conversions() {
        let id = ProductId::from("abc");
        let raw: String = id.clone().into();
        assert_eq!(raw, "abc");
        assert_eq!(id.into_inner(), "abc");
    }
}
