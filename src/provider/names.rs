//! Standard NAIF body names and ID numbers
//!
//! This module provides mappings between solar-system body names and the ID
//! numbers used by ephemeris kernels. Providers fall back to it when their
//! loaded data carries no name binding of its own.

use lazy_static::lazy_static;
use std::collections::HashMap;

lazy_static! {
    /// Map from body ID numbers to canonical names (first listed name wins)
    static ref BODY_NAMES: HashMap<i32, &'static str> = {
        let mut m = HashMap::new();
        for &(id, name) in BODY_NAME_PAIRS.iter() {
            m.entry(id).or_insert(name);
        }
        m
    };

    /// Map from uppercase body names to ID numbers
    static ref BODY_IDS: HashMap<String, i32> = {
        let mut m = HashMap::new();
        for &(id, name) in BODY_NAME_PAIRS.iter() {
            m.insert(name.to_uppercase(), id);
        }
        m
    };
}

/// Get the canonical name of a body given its ID number
pub fn body_name(id: i32) -> Option<&'static str> {
    BODY_NAMES.get(&id).copied()
}

/// Get the ID number of a body given any of its names (case-insensitive)
pub fn body_id(name: &str) -> Option<i32> {
    BODY_IDS.get(&name.trim().to_uppercase()).copied()
}

/// Pairs of (id, name) for solar-system bodies
const BODY_NAME_PAIRS: &[(i32, &str)] = &[
    (0, "SOLAR SYSTEM BARYCENTER"),
    (0, "SOLAR_SYSTEM_BARYCENTER"),
    (0, "SSB"),
    (1, "MERCURY BARYCENTER"),
    (2, "VENUS BARYCENTER"),
    (3, "EARTH BARYCENTER"),
    (3, "EMB"),
    (3, "EARTH MOON BARYCENTER"),
    (3, "EARTH-MOON BARYCENTER"),
    (4, "MARS BARYCENTER"),
    (5, "JUPITER BARYCENTER"),
    (6, "SATURN BARYCENTER"),
    (7, "URANUS BARYCENTER"),
    (8, "NEPTUNE BARYCENTER"),
    (9, "PLUTO BARYCENTER"),
    (10, "SUN"),
    (199, "MERCURY"),
    (299, "VENUS"),
    (399, "EARTH"),
    (301, "MOON"),
    (499, "MARS"),
    (401, "PHOBOS"),
    (402, "DEIMOS"),
    (599, "JUPITER"),
    (501, "IO"),
    (502, "EUROPA"),
    (503, "GANYMEDE"),
    (504, "CALLISTO"),
    (699, "SATURN"),
    (601, "MIMAS"),
    (602, "ENCELADUS"),
    (603, "TETHYS"),
    (604, "DIONE"),
    (605, "RHEA"),
    (606, "TITAN"),
    (608, "IAPETUS"),
    (799, "URANUS"),
    (899, "NEPTUNE"),
    (801, "TRITON"),
    (999, "PLUTO"),
    (901, "CHARON"),
];

/// Common body ID numbers
pub mod ids {
    /// Sun
    pub const SUN: i32 = 10;
    /// Mercury
    pub const MERCURY: i32 = 199;
    /// Venus
    pub const VENUS: i32 = 299;
    /// Earth
    pub const EARTH: i32 = 399;
    /// Moon
    pub const MOON: i32 = 301;
    /// Mars
    pub const MARS: i32 = 499;
    /// Jupiter
    pub const JUPITER: i32 = 599;
    /// Saturn
    pub const SATURN: i32 = 699;
    /// Uranus
    pub const URANUS: i32 = 799;
    /// Neptune
    pub const NEPTUNE: i32 = 899;
    /// Pluto
    pub const PLUTO: i32 = 999;
}
