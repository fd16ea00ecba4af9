//! OED peril identifiers, covered-peril sets and the peril model catalogue

/// Single OED peril, valued as a distinct bit
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u32)]
pub enum OedPeril {
    QuakeShake = 1,
    FireFollowing = 1 << 1,
    Tsunami = 1 << 2,
    SprinklerLeakage = 1 << 3,
    Landslide = 1 << 4,
    Liquefaction = 1 << 5,
    TropicalCyclone = 1 << 6,
    ExtraTropicalCyclone = 1 << 7,
    StormSurge = 1 << 8,
    FluvialFlood = 1 << 9,
    FlashSurfacePluvialFlood = 1 << 10,
    OtherConvectiveWind = 1 << 11,
    Tornado = 1 << 12,
    Hail = 1 << 13,
    Snow = 1 << 14,
    Ice = 1 << 15,
    Freeze = 1 << 16,
    NonCat = 1 << 17,
    Bushfire = 1 << 18,
    NbcrTerrorism = 1 << 19,
    ConventionalTerrorism = 1 << 20,
    Lightning = 1 << 21,
    WinterstormWind = 1 << 22,
    Smoke = 1 << 23,
}

impl OedPeril {
    pub const fn bits(self) -> u32 {
        self as u32
    }

    pub const fn from_bits(bits: u32) -> Option<Self> {
        let peril = match bits {
            1 => OedPeril::QuakeShake,
            2 => OedPeril::FireFollowing,
            4 => OedPeril::Tsunami,
            8 => OedPeril::SprinklerLeakage,
            16 => OedPeril::Landslide,
            32 => OedPeril::Liquefaction,
            64 => OedPeril::TropicalCyclone,
            128 => OedPeril::ExtraTropicalCyclone,
            256 => OedPeril::StormSurge,
            512 => OedPeril::FluvialFlood,
            1024 => OedPeril::FlashSurfacePluvialFlood,
            2048 => OedPeril::OtherConvectiveWind,
            4096 => OedPeril::Tornado,
            8192 => OedPeril::Hail,
            16384 => OedPeril::Snow,
            32768 => OedPeril::Ice,
            65536 => OedPeril::Freeze,
            131072 => OedPeril::NonCat,
            262144 => OedPeril::Bushfire,
            524288 => OedPeril::NbcrTerrorism,
            1048576 => OedPeril::ConventionalTerrorism,
            2097152 => OedPeril::Lightning,
            4194304 => OedPeril::WinterstormWind,
            8388608 => OedPeril::Smoke,
            _ => return None,
        };
        Some(peril)
    }
}

/// Set of OED perils as a bitmask
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct PerilSet(u32);

impl PerilSet {
    pub const EMPTY: PerilSet = PerilSet(0);
    /// Every peril defined by OED
    pub const ALL: PerilSet = PerilSet((1 << 24) - 1);

    pub const fn from_bits(bits: u32) -> Self {
        PerilSet(bits & Self::ALL.0)
    }

    pub const fn bits(self) -> u32 {
        self.0
    }

    pub const fn of(perils: &[OedPeril]) -> Self {
        let mut bits = 0;
        let mut i = 0;
        while i < perils.len() {
            bits |= perils[i].bits();
            i += 1;
        }
        PerilSet(bits)
    }

    pub const fn contains(self, peril: OedPeril) -> bool {
        self.0 & peril.bits() != 0
    }

    pub const fn union(self, other: PerilSet) -> Self {
        PerilSet(self.0 | other.0)
    }

    pub const fn is_empty(self) -> bool {
        self.0 == 0
    }
}

impl From<OedPeril> for PerilSet {
    fn from(peril: OedPeril) -> Self {
        PerilSet(peril.bits())
    }
}

/// Peril families modelled by the loss engine
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(i8)]
pub enum RfPeril {
    RiverineFlood = 0,
    Bushfire = 1,
    Hail = 2,
    Quake = 3,
    Cyclone = 4,
    Volcano = 5,
}

impl RfPeril {
    /// Loss engine peril for a single OED peril, if it is modelled
    pub const fn from_oed(peril: OedPeril) -> Option<Self> {
        match peril {
            OedPeril::Hail => Some(RfPeril::Hail),
            OedPeril::QuakeShake => Some(RfPeril::Quake),
            OedPeril::FluvialFlood => Some(RfPeril::RiverineFlood),
            OedPeril::Bushfire => Some(RfPeril::Bushfire),
            OedPeril::TropicalCyclone => Some(RfPeril::Cyclone),
            _ => None,
        }
    }
}

/// Catalogue entry describing one deployable peril model
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PerilModel {
    /// Lower-case model name as used in settings files
    pub name: &'static str,
    pub peril: OedPeril,
    pub country: &'static str,
    /// Highest event id in the model's event set
    pub max_event_id: u32,
}

impl PerilModel {
    pub const CATALOGUE: [PerilModel; 6] = [
        PerilModel::new("hailaus", OedPeril::Hail, "au", 134_704_731),
        PerilModel::new("quakeaus", OedPeril::QuakeShake, "au", 1_000_252),
        PerilModel::new("floodaus", OedPeril::FluvialFlood, "au", 535_000),
        PerilModel::new("fireaus", OedPeril::Bushfire, "au", 291_577),
        PerilModel::new("cyclaus", OedPeril::TropicalCyclone, "au", 371_653),
        PerilModel::new("quakenz", OedPeril::QuakeShake, "nz", 10_441_016),
    ];

    const fn new(name: &'static str, peril: OedPeril, country: &'static str, max_event_id: u32) -> Self {
        Self {
            name,
            peril,
            country,
            max_event_id,
        }
    }

    /// Find a model by name, ignoring ASCII case
    pub fn find(name: &str) -> Option<&'static PerilModel> {
        Self::CATALOGUE
            .iter()
            .find(|model| model.name.eq_ignore_ascii_case(name))
    }

    pub const fn rf_peril(&self) -> Option<RfPeril> {
        RfPeril::from_oed(self.peril)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_peril_bits() {
        assert_eq!(OedPeril::QuakeShake.bits(), 1);
        assert_eq!(OedPeril::TropicalCyclone.bits(), 64);
        assert_eq!(OedPeril::FluvialFlood.bits(), 512);
        assert_eq!(OedPeril::Hail.bits(), 8192);
        assert_eq!(OedPeril::Bushfire.bits(), 262144);
        assert_eq!(OedPeril::Smoke.bits(), 8388608);

        for shift in 0..24 {
            let peril = OedPeril::from_bits(1 << shift).unwrap();
            assert_eq!(peril.bits(), 1 << shift);
        }
        assert_eq!(OedPeril::from_bits(3), None);
    }

    #[test]
    fn test_peril_set() {
        let set = PerilSet::of(&[OedPeril::Hail, OedPeril::Tornado]);
        assert!(set.contains(OedPeril::Hail));
        assert!(!set.contains(OedPeril::QuakeShake));
        assert!(PerilSet::ALL.contains(OedPeril::Smoke));
        assert!(PerilSet::EMPTY.is_empty());
        assert_eq!(PerilSet::from_bits(u32::MAX), PerilSet::ALL);
        assert_eq!(
            PerilSet::from(OedPeril::Hail).union(OedPeril::Tornado.into()),
            set
        );
    }

    #[test]
    fn test_catalogue() {
        let hail = PerilModel::find("hailAus").unwrap();
        assert_eq!(hail.peril, OedPeril::Hail);
        assert_eq!(hail.country, "au");
        assert_eq!(hail.max_event_id, 134_704_731);
        assert_eq!(hail.rf_peril(), Some(RfPeril::Hail));

        assert_eq!(PerilModel::find("quakenz").unwrap().country, "nz");
        assert!(PerilModel::find("volcanojp").is_none());
    }
}
