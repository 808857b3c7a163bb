//! Physical-model presets an instrument can be set to.

use serde::{Deserialize, Serialize};

/// The four demo kits that every voice defaults to.
pub const DEMO_TYPES: &[&str] = &["yamaha10", "dw12", "pearl14", "ludwig13"];

/// Every preset identifier known to the engine, demo kits first.
pub const INSTRUMENT_TYPES: &[&str] = &[
    "yamaha10",
    "dw12",
    "pearl14",
    "ludwig13",
    // Cymbals
    "10_zild_a_custom_splash",
    "13_sab_dejonte_crash",
    "13_sab_elsabor_splash",
    "14_zild_1960s_vintage",
    "16_paiste_twenty_thin",
    "16_sab_hhxtreme",
    "16_sab_hhx_evo",
    "16_sab_hhx_evo_alternate_recording",
    "16_sab_hhx_ozone",
    "16_zild_1960s_vintage",
    "16_zild_avedis_vintage",
    "16_zild_k_dark",
    "17_hhx_evo",
    "18_paiste_2002_black_vintage",
    "18_sab_hhx",
    "18_sab_hhxtreme",
    "18_sab_hhx_1",
    "18_sab_hhx_ozone",
    "18_zild_avedis_vintage",
    "18_zild_a_custom",
    "18_zild_k_dark",
    "18_zild_k_med_dark",
    "18_zild_k_med_dark_crash",
    "19_sab_aa_medthin",
    "19_sab_mediumthin",
    "19_sab_paragon_CHINA",
    "19_zild_1960s_vintage",
    "19_zild_a_custom_projection",
    "19_zild_k_const",
    "19_zild_k_cust_hybrid",
    "19_zild_k_c_hybrid_CHINA",
    "20_paiste_2002_black_vintage",
    "20_sab_hhx_ride",
    "20_sab_vault_crash",
    "20_zild_avedis_vintage",
    "20_zild_a_custom",
    "20_zild_oriental_crash_doom",
    "21_sab_aaxplosion",
    "22_zild_avedis_crash_ride",
    // Cowbells
    "cowbell_BB",
    "cowbell_LP",
    "cowbell_MC",
    // Kicks
    "kick22pearlmasters",
    "kick22yamahabirch",
    "kick24dwcollmaple",
    "kick24ludwigvintage",
    // Snares
    "snrBlackPanther",
    "snrDWCopper",
    "snrJarrahBlack",
    "snrLudwigBB100thAnniv",
    "snrLudwigBlackBeauty",
    "snrLudwigBlackMagic",
    "snrLudwigMahogany",
    "snrLudwigSensitive1929",
    "snrMetroJarrah",
    "snrOcheltreeCastCarbonSteel",
    "snrPearlMahogany",
    "snrPearlSensitoneBrass",
    "snrPremiereVintage",
    "snrQCopper",
    "snrSonorDesigner",
    "snrZildjianCooley",
    // Toms
    "tom10dwcoll",
    "tom10pearlmasters",
    "tom10yamahabirchabs",
    "tom12dwcoll",
    "tom12pearlmastersmaple",
    "tom12rogersbigr",
    "tom12yamahabirchabs",
    "tom13rogersbigr",
    "tom14yamahabirchabs",
    "tom16dwcustom",
    "tom16pearlmastersmaple",
    "tom16rogersbigr",
];

pub fn contains(type_id: &str) -> bool {
    INSTRUMENT_TYPES.contains(&type_id)
}

/// Preset following `current` in catalog order, wrapping. Unknown ids start over.
pub fn next_after(current: &str) -> &'static str {
    let next = INSTRUMENT_TYPES
        .iter()
        .position(|t| *t == current)
        .map_or(0, |i| (i + 1) % INSTRUMENT_TYPES.len());
    INSTRUMENT_TYPES[next]
}

/// How an instrument-type selection is checked before it is stored.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TypePolicy {
    /// Store any identifier as given.
    #[default]
    AcceptAny,
    /// Store only identifiers present in [`INSTRUMENT_TYPES`].
    #[serde(rename = "catalog")]
    CatalogOnly,
}

impl TypePolicy {
    pub fn admits(self, type_id: &str) -> bool {
        match self {
            TypePolicy::AcceptAny => true,
            TypePolicy::CatalogOnly => contains(type_id),
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "accept_any" | "any" => Some(TypePolicy::AcceptAny),
            "catalog" | "catalog_only" => Some(TypePolicy::CatalogOnly),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::InstrumentId;

    #[test]
    fn defaults_are_in_catalog() {
        for id in InstrumentId::ALL {
            assert!(contains(id.default_type()), "{} default missing", id);
            assert!(DEMO_TYPES.contains(&id.default_type()));
        }
    }

    #[test]
    fn catalog_has_no_duplicates() {
        let mut sorted: Vec<&str> = INSTRUMENT_TYPES.to_vec();
        sorted.sort_unstable();
        sorted.dedup();
        assert_eq!(sorted.len(), INSTRUMENT_TYPES.len());
    }

    #[test]
    fn next_after_wraps() {
        assert_eq!(next_after("yamaha10"), "dw12");
        assert_eq!(next_after("tom16rogersbigr"), "yamaha10");
        assert_eq!(next_after("not-a-kit"), "yamaha10");
    }

    #[test]
    fn policy_admission() {
        assert!(TypePolicy::AcceptAny.admits("anything at all"));
        assert!(TypePolicy::CatalogOnly.admits("snrQCopper"));
        assert!(!TypePolicy::CatalogOnly.admits("snrqcopper"));
        assert_eq!(TypePolicy::default(), TypePolicy::AcceptAny);
        assert_eq!(TypePolicy::parse("catalog"), Some(TypePolicy::CatalogOnly));
        assert_eq!(TypePolicy::parse("strict"), None);
    }
}
