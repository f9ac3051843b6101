//! Fixed vocabulary of BSData field identifiers
//!
//! BSData characteristics and costs carry opaque type ids shared across the
//! wh40k-10e catalogs. Only the ids listed here are understood; unknown ids
//! are ignored during extraction.

/// Cost type id for points ("pts")
pub const POINTS_TYPE_ID: &str = "51b2-306e-1021-d207";

/// A stat in a unit's stat block
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UnitStat {
    Movement,
    Toughness,
    Save,
    Wounds,
    Leadership,
    ObjectiveControl,
}

/// Look up the unit stat a characteristic type id refers to
pub fn unit_stat(type_id: &str) -> Option<UnitStat> {
    match type_id {
        "e703-ecb6-5ce7-aec1" => Some(UnitStat::Movement),
        "d29d-cf75-fc2d-34a4" => Some(UnitStat::Toughness),
        "450-a17e-9d5e-29da" => Some(UnitStat::Save),
        "750a-a2ec-90d3-21fe" => Some(UnitStat::Wounds),
        "58d2-b879-49c7-43bc" => Some(UnitStat::Leadership),
        "bef7-942a-1a23-59f8" => Some(UnitStat::ObjectiveControl),
        _ => None,
    }
}

/// A stat in a weapon's profile
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WeaponStat {
    Range,
    Attacks,
    BallisticSkill,
    WeaponSkill,
    Strength,
    ArmorPenetration,
    Damage,
}

/// Look up the ranged-weapon stat a characteristic type id refers to
pub fn ranged_weapon_stat(type_id: &str) -> Option<WeaponStat> {
    match type_id {
        "914c-b413-91e3-a132" => Some(WeaponStat::Range),
        "2337-daa1-6682-b110" => Some(WeaponStat::Attacks),
        "94d-8a98-cf90-183d" => Some(WeaponStat::BallisticSkill),
        "ab33-d393-96ce-ccba" => Some(WeaponStat::Strength),
        "41a0-1301-112a-e2f2" => Some(WeaponStat::ArmorPenetration),
        "3254-9fe6-d824-513e" => Some(WeaponStat::Damage),
        _ => None,
    }
}

/// Look up the melee-weapon stat a characteristic type id refers to
///
/// Same ids as the ranged table except the skill column, which has its own
/// id (weapon skill instead of ballistic skill).
pub fn melee_weapon_stat(type_id: &str) -> Option<WeaponStat> {
    match type_id {
        "914c-b413-91e3-a132" => Some(WeaponStat::Range),
        "2337-daa1-6682-b110" => Some(WeaponStat::Attacks),
        "95d1-95f-45b4-11d6" => Some(WeaponStat::WeaponSkill),
        "ab33-d393-96ce-ccba" => Some(WeaponStat::Strength),
        "41a0-1301-112a-e2f2" => Some(WeaponStat::ArmorPenetration),
        "3254-9fe6-d824-513e" => Some(WeaponStat::Damage),
        _ => None,
    }
}
