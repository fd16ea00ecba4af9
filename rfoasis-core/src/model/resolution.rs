//! Geocode resolution tags

/// Resolution of a geocode attribute, also used as the `best_res` tag
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum Resolution {
    Address = 0,
    Postcode = 1,
    Cresta = 2,
    IcaZone = 3,
    Catchment = 4,
    State = 5,
    Ccd = 6,
    LatLong = 7,
    Latitude = 8,
    Longitude = 9,
    Code = 10,
    Todofuken = 11,
    Shikuchoson = 12,
    VolcanoGrid = 13,
    Country = 14,
    BeeHive = 15,
    All = 253,
    LocId = 254,
    Undefined = 255,
}

impl Resolution {
    /// Convert from u8 representation
    pub const fn from_u8(value: u8) -> Option<Self> {
        let res = match value {
            0 => Resolution::Address,
            1 => Resolution::Postcode,
            2 => Resolution::Cresta,
            3 => Resolution::IcaZone,
            4 => Resolution::Catchment,
            5 => Resolution::State,
            6 => Resolution::Ccd,
            7 => Resolution::LatLong,
            8 => Resolution::Latitude,
            9 => Resolution::Longitude,
            10 => Resolution::Code,
            11 => Resolution::Todofuken,
            12 => Resolution::Shikuchoson,
            13 => Resolution::VolcanoGrid,
            14 => Resolution::Country,
            15 => Resolution::BeeHive,
            253 => Resolution::All,
            254 => Resolution::LocId,
            255 => Resolution::Undefined,
            _ => return None,
        };
        Some(res)
    }

    /// Convert to u8 representation
    pub const fn to_u8(self) -> u8 {
        self as u8
    }

    /// Canonical record field holding the identifier at this resolution
    pub const fn id_field(self) -> Option<&'static str> {
        match self {
            Resolution::Address => Some("address_id"),
            Resolution::Postcode => Some("med_id"),
            Resolution::Cresta => Some("zone_id"),
            Resolution::IcaZone | Resolution::BeeHive => Some("lrg_id"),
            Resolution::Latitude => Some("latitude"),
            Resolution::Longitude => Some("longitude"),
            Resolution::State => Some("state"),
            Resolution::Ccd => Some("fine_id"),
            Resolution::Catchment => Some("catchment_id"),
            _ => None,
        }
    }
}

impl core::fmt::Display for Resolution {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(f, "{self:?}")
    }
}
