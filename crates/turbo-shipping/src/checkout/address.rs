//! Destination address.

use serde::{Deserialize, Serialize};

/// The part of a shipping address zone matching looks at.
///
/// Values are compared verbatim against zone filters, so callers should
/// pass the same codes the admin layer stores (e.g. "US", "CA").
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "camelCase")]
pub struct ShippingAddress {
    /// Country code (e.g. "US").
    pub country: String,
    /// State/province code (e.g. "CA").
    #[serde(default)]
    pub state: String,
    #[serde(default)]
    pub city: String,
    #[serde(default)]
    pub postal_code: String,
}

impl ShippingAddress {
    pub fn new(
        country: impl Into<String>,
        state: impl Into<String>,
        city: impl Into<String>,
        postal_code: impl Into<String>,
    ) -> Self {
        Self {
            country: country.into(),
            state: state.into(),
            city: city.into(),
            postal_code: postal_code.into(),
        }
    }

    /// Format as single line.
    pub fn one_line(&self) -> String {
        [&self.city, &self.state, &self.postal_code, &self.country]
            .iter()
            .filter(|part| !part.is_empty())
            .map(|part| part.as_str())
            .collect::<Vec<_>>()
            .join(", ")
    }

    /// An address needs at least a country to be routed.
    pub fn is_complete(&self) -> bool {
        !self.country.trim().is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_address_one_line() {
        let addr = ShippingAddress::new("US", "CA", "San Francisco", "94102");
        assert_eq!(addr.one_line(), "San Francisco, CA, 94102, US");

        let sparse = ShippingAddress::new("DE", "", "", "10115");
        assert_eq!(sparse.one_line(), "10115, DE");
    }

    #[test]
    fn test_address_from_camel_case_json() {
        let addr: ShippingAddress = serde_json::from_str(
            r#"{"country":"US","state":"NY","city":"New York","postalCode":"10001"}"#,
        )
        .unwrap();
        assert_eq!(addr.postal_code, "10001");
        assert!(addr.is_complete());
        assert!(!ShippingAddress::default().is_complete());
    }
}
