//! Built-in sentence formats and variable definitions.

use std::collections::HashMap;

use super::{NOT_APPLICABLE, Tables};

const VARIABLES: &[(&str, &str)] = &[
    // Autopilot and waypoints
    ("arrived_circle", "A"),
    ("passed_waypt", "A"),
    ("arrival_radius", "x.x"),
    ("radius_units", "A"),
    ("waypt_id", "c--c"),
    ("ap_status", "A"),
    ("ap_loran", "A"),
    ("bearing_to_waypt", "xxx,T"),
    ("bearing_origin_to_waypt", "xxx,T"),
    ("bearing_position_to_waypt", "xxx,T"),
    ("hts", "xxx,T"),
    ("ap_mode", "A"),
    ("xte", "x.x,R,N"),
    ("acir", "A"),
    ("aper", "A"),
    ("bod", "x.x"),
    ("bod_true", "T"),
    ("did", "c--c"),
    // Fix
    ("faa_mode", "A"),
    ("nav_status", "A"),
    ("status", "A"),
    ("fix_time", "hhmmss.ss"),
    ("fix_date", "ddmmyy"),
    ("lat", "lat,NS"),
    ("long", "long,WE"),
    ("position", "lat,NS,long,WE"),
    ("sog", "x.x"),
    ("tmg", "x.x"),
    ("mag_var", "x.x,w"),
    // Time and date
    ("datetime", "hhmmss,day,month,year,tz"),
    ("day", "DD_day"),
    ("month", "DD_month"),
    ("year", "DD_year"),
    ("tz", "tz_h,tz_m"),
    // Heading, depth and speed through water
    ("hdm", "x.x,T"),
    ("dbt", "x.x"),
    ("toff", "-x.x"),
    ("stw", "x.x"),
    ("dw", "x.x"),
];

const NA: &str = NOT_APPLICABLE;

const FORMATS: &[(&str, &[&str])] = &[
    (
        "aam",
        &["arrived_circle", "passed_waypt", "arrival_radius", "radius_units", "waypt_id"],
    ),
    (
        "apa",
        &[
            "ap_status",
            "ap_loran",
            "xte",
            "arrived_circle",
            "passed_waypt",
            "bearing_to_waypt",
            "waypt_id",
        ],
    ),
    (
        "apb",
        &[
            "ap_status",
            "ap_loran",
            "xte",
            "arrived_circle",
            "passed_waypt",
            "bearing_origin_to_waypt",
            "waypt_id",
            "bearing_position_to_waypt",
            "hts",
            "ap_mode",
        ],
    ),
    (
        "rmc",
        &[
            "fix_time",
            "status",
            "position",
            "sog",
            "tmg",
            "fix_date",
            "mag_var",
            "faa_mode",
            "nav_status",
        ],
    ),
    ("zda", &["datetime"]),
    ("hdg", &[NA, NA, NA, "mag_var"]),
    ("hdm", &["hdm"]),
    ("dpt", &["dbt", "toff"]),
    ("vhw", &[NA, NA, NA, NA, "stw"]),
    ("vlw", &[NA, NA, "dw"]),
];

pub(super) fn tables() -> Tables {
    let formats: HashMap<String, Vec<String>> = FORMATS
        .iter()
        .map(|(id, names)| {
            (
                id.to_string(),
                names.iter().map(|name| name.to_string()).collect(),
            )
        })
        .collect();

    let variables: HashMap<String, String> = VARIABLES
        .iter()
        .map(|(name, key)| (name.to_string(), key.to_string()))
        .collect();

    Tables { formats, variables }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_every_format_variable_is_defined() {
        let tables = tables();
        for (id, names) in &tables.formats {
            for name in names.iter().filter(|name| *name != NOT_APPLICABLE) {
                assert!(
                    tables.variables.contains_key(name),
                    "{id} binds undefined variable {name}"
                );
            }
        }
    }

    #[test]
    fn test_waypoint_variables_are_available() {
        let tables = tables();
        for (name, key) in [
            ("acir", "A"),
            ("aper", "A"),
            ("bod", "x.x"),
            ("bod_true", "T"),
            ("did", "c--c"),
        ] {
            assert_eq!(tables.variables.get(name).map(String::as_str), Some(key));
        }
    }
}
