//! OED code tables: peril codes, address identifiers and jurisdictions

use crate::{OedPeril, PerilSet};

/// Decode a single OED peril code or peril group code
pub fn peril_code(code: &str) -> Option<PerilSet> {
    use OedPeril::*;

    let set = match code {
        "AA1" => PerilSet::ALL,
        "QQ1" => PerilSet::of(&[QuakeShake, FireFollowing, Tsunami, SprinklerLeakage, Landslide, Liquefaction]),
        "WW1" => PerilSet::of(&[TropicalCyclone, ExtraTropicalCyclone, StormSurge]),
        "WW2" => PerilSet::of(&[TropicalCyclone, ExtraTropicalCyclone]),
        "OO1" => PerilSet::of(&[FluvialFlood, FlashSurfacePluvialFlood]),
        "XX1" => PerilSet::of(&[OtherConvectiveWind, Tornado, Hail, Lightning]),
        "ZZ1" => PerilSet::of(&[Snow, Ice, Freeze, WinterstormWind]),
        "BB1" => PerilSet::of(&[Bushfire, Smoke]),
        "MM1" => PerilSet::of(&[NbcrTerrorism, ConventionalTerrorism]),
        "QEQ" => QuakeShake.into(),
        "QFF" => FireFollowing.into(),
        "QTS" => Tsunami.into(),
        "QSL" => SprinklerLeakage.into(),
        "QLS" => Landslide.into(),
        "QLF" => Liquefaction.into(),
        "WTC" => TropicalCyclone.into(),
        "WEC" => ExtraTropicalCyclone.into(),
        "WSS" => StormSurge.into(),
        "ORF" => FluvialFlood.into(),
        "OSF" => FlashSurfacePluvialFlood.into(),
        "XSL" => OtherConvectiveWind.into(),
        "XTD" => Tornado.into(),
        "XHL" => Hail.into(),
        "XLT" => Lightning.into(),
        "ZSN" => Snow.into(),
        "ZIC" => Ice.into(),
        "ZFZ" => Freeze.into(),
        "ZST" => WinterstormWind.into(),
        "PNF" => NonCat.into(),
        "BBF" => Bushfire.into(),
        "BSK" => Smoke.into(),
        "MNT" => NbcrTerrorism.into(),
        "MTR" => ConventionalTerrorism.into(),
        _ => return None,
    };
    Some(set)
}

/// Decode a `;`-separated list of OED peril codes
///
/// Codes are matched case-insensitively. Unknown codes contribute nothing.
pub fn parse_peril_codes(s: &str) -> PerilSet {
    let mut buf = [0u8; 3];
    s.split(';')
        .map(str::trim)
        .filter(|code| code.len() == 3)
        .filter_map(|code| {
            buf.copy_from_slice(code.as_bytes());
            buf.make_ascii_uppercase();
            core::str::from_utf8(&buf).ok().and_then(peril_code)
        })
        .fold(PerilSet::EMPTY, PerilSet::union)
}

/// Australian state and territory codes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Jurisdiction {
    Nsw,
    Vic,
    Qld,
    Sa,
    Wa,
    Tas,
    Nt,
    Act,
}

impl Jurisdiction {
    pub const ALL: [Jurisdiction; 8] = [
        Jurisdiction::Nsw,
        Jurisdiction::Vic,
        Jurisdiction::Qld,
        Jurisdiction::Sa,
        Jurisdiction::Wa,
        Jurisdiction::Tas,
        Jurisdiction::Nt,
        Jurisdiction::Act,
    ];

    pub const fn code(self) -> &'static str {
        match self {
            Jurisdiction::Nsw => "NSW",
            Jurisdiction::Vic => "VIC",
            Jurisdiction::Qld => "QLD",
            Jurisdiction::Sa => "SA",
            Jurisdiction::Wa => "WA",
            Jurisdiction::Tas => "TAS",
            Jurisdiction::Nt => "NT",
            Jurisdiction::Act => "ACT",
        }
    }

    /// Match an area code, ignoring case and surrounding whitespace
    pub fn parse(s: &str) -> Option<Self> {
        let s = s.trim();
        Self::ALL
            .into_iter()
            .find(|state| state.code().eq_ignore_ascii_case(s))
    }
}

/// State tokens used inside GNAF persistent identifiers
const GNAF_STATE_TOKENS: [&str; 9] = ["NSW", "VIC", "QLD", "SA_", "WA_", "TAS", "NT_", "ACT", "OT_"];

/// Whether a value has the shape of a GNAF address identifier
///
/// The shape is `GA`, a three-character state token, then one or more
/// digits, for example `GANSW123456789`.
pub fn is_valid_gnaf(s: &str) -> bool {
    let Some(rest) = s.strip_prefix("GA") else {
        return false;
    };
    if rest.len() < 4 || !rest.is_char_boundary(3) {
        return false;
    }
    let (state, digits) = rest.split_at(3);
    GNAF_STATE_TOKENS.contains(&state) && digits.bytes().all(|b| b.is_ascii_digit())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_peril_groups() {
        assert_eq!(parse_peril_codes("AA1"), PerilSet::ALL);

        let quake = parse_peril_codes("QQ1");
        assert!(quake.contains(OedPeril::QuakeShake));
        assert!(!quake.contains(OedPeril::Hail));

        let convective = parse_peril_codes("XX1");
        assert!(convective.contains(OedPeril::Hail));
        assert!(convective.contains(OedPeril::Tornado));
    }

    #[test]
    fn test_peril_lists() {
        let set = parse_peril_codes("qeq; XHL;WTC");
        assert!(set.contains(OedPeril::QuakeShake));
        assert!(set.contains(OedPeril::Hail));
        assert!(set.contains(OedPeril::TropicalCyclone));
        assert!(!set.contains(OedPeril::Bushfire));

        assert!(parse_peril_codes("").is_empty());
        assert!(parse_peril_codes("ZZZ;HAIL").is_empty());
        assert_eq!(parse_peril_codes("BBF;ZZZ"), PerilSet::from(OedPeril::Bushfire));
    }

    #[test]
    fn test_jurisdictions() {
        assert_eq!(Jurisdiction::parse("NSW"), Some(Jurisdiction::Nsw));
        assert_eq!(Jurisdiction::parse("vic"), Some(Jurisdiction::Vic));
        assert_eq!(Jurisdiction::parse(" act "), Some(Jurisdiction::Act));
        assert_eq!(Jurisdiction::parse("NZ"), None);
        assert_eq!(Jurisdiction::parse(""), None);
        assert_eq!(Jurisdiction::Sa.code(), "SA");
    }

    #[test]
    fn test_gnaf_shape() {
        assert!(is_valid_gnaf("GANSW123456789"));
        assert!(is_valid_gnaf("GASA_704383447"));
        assert!(is_valid_gnaf("GAOT_1"));
        assert!(!is_valid_gnaf("GANSW"));
        assert!(!is_valid_gnaf("GANZL123"));
        assert!(!is_valid_gnaf("NSW123456789"));
        assert!(!is_valid_gnaf("GANSW12A456"));
        assert!(!is_valid_gnaf("ganSW123"));
        assert!(!is_valid_gnaf(""));
    }
}
