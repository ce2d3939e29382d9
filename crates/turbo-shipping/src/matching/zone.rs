//! Zone/address matching.

use crate::checkout::ShippingAddress;
use crate::model::{ShippingMethod, ShippingZone, ZoneType};

/// Decides whether destination addresses fall inside shipping zones.
#[derive(Debug, Clone, Copy, Default)]
pub struct ZoneMatcher;

impl ZoneMatcher {
    /// Whether `address` lies inside `zone`.
    ///
    /// Every populated filter must contain the corresponding address field;
    /// empty filters leave their dimension unrestricted. Custom zones match
    /// any address.
    pub fn matches(zone: &ShippingZone, address: &ShippingAddress) -> bool {
        if zone.zone_type == ZoneType::Custom {
            return true;
        }

        dimension_allows(&zone.countries, &address.country)
            && dimension_allows(&zone.states, &address.state)
            && dimension_allows(&zone.cities, &address.city)
            && dimension_allows(&zone.postal_codes, &address.postal_code)
    }

    /// First zone, in the given (priority ascending) order, containing `address`.
    pub fn find_matching_zone<'a>(
        zones: &'a [ShippingZone],
        address: &ShippingAddress,
    ) -> Option<&'a ShippingZone> {
        zones.iter().find(|zone| Self::matches(zone, address))
    }

    /// Whether `method` may ship to `address`.
    ///
    /// Methods without a zone are available everywhere. A zoned method whose
    /// zone is not among `zones` (inactive or deleted) is unavailable.
    pub fn validate_method_for_address(
        method: &ShippingMethod,
        zones: &[ShippingZone],
        address: &ShippingAddress,
    ) -> bool {
        let Some(zone_id) = &method.zone_id else {
            return true;
        };

        zones
            .iter()
            .find(|zone| &zone.id == zone_id)
            .is_some_and(|zone| Self::matches(zone, address))
    }
}

fn dimension_allows(filter: &[String], value: &str) -> bool {
    filter.is_empty() || filter.iter().any(|allowed| allowed == value)
}
