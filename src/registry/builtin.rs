//! Built-in Omnetics and Intan pin tables.
//!
//! Add new Intan headstage sizes to [`INTAN_TABLES`] with pins ordered per the
//! Intan schematic. Add new probes to [`OMNETICS_TABLES`] with the Omnetics pin
//! order printed on the probe datasheet (match the mechanical numbering).

use super::RegistryBuilder;

/// Built-in Intan preamp tables: (name, pins).
pub const INTAN_TABLES: &[(&str, &[u32])] = &[
    (
        "intan16",
        &[11, 10, 9, 8, 7, 6, 5, 4, 12, 13, 14, 15, 0, 1, 2, 3],
    ),
    (
        "intan32",
        &[
            23, 22, 21, 20, 19, 18, 17, 16, 15, 14, 13, 12, 11, 10, 9, 8, //
            24, 25, 26, 27, 28, 29, 30, 31, 0, 1, 2, 3, 4, 5, 6, 7,
        ],
    ),
    (
        "intan64",
        &[
            46, 44, 42, 40, 38, 36, 34, 32, 30, 28, 26, 24, 22, 20, 18, 16, //
            47, 45, 43, 41, 39, 37, 35, 33, 31, 29, 27, 25, 23, 21, 19, 17, //
            49, 51, 53, 55, 57, 59, 61, 63, 1, 3, 5, 7, 9, 11, 13, 15, //
            48, 50, 52, 54, 56, 58, 60, 62, 0, 2, 4, 6, 8, 10, 12, 14,
        ],
    ),
];

/// Built-in Omnetics connector tables: (probe family, connector, pins).
pub const OMNETICS_TABLES: &[(&str, &str, &[u32])] = &[
    (
        "neuronexus",
        "H16",
        &[14, 15, 9, 16, 1, 8, 2, 3, 12, 11, 10, 13, 4, 7, 6, 5],
    ),
    (
        "neuronexus",
        "H32",
        &[
            18, 27, 28, 29, 17, 30, 31, 32, 1, 2, 3, 16, 4, 5, 6, 15, //
            20, 21, 22, 23, 19, 24, 25, 26, 7, 8, 9, 14, 10, 11, 12, 13,
        ],
    ),
    (
        "neuronexus",
        "H64",
        &[
            34, 43, 44, 45, 33, 46, 47, 48, 17, 18, 19, 32, 20, 21, 22, 31, //
            42, 41, 40, 35, 39, 38, 37, 36, 29, 28, 27, 26, 30, 25, 24, 23, //
            64, 62, 60, 58, 56, 54, 52, 50, 15, 13, 11, 9, 7, 5, 3, 1, //
            63, 61, 59, 57, 55, 53, 51, 49, 16, 14, 12, 10, 8, 6, 4, 2,
        ],
    ),
    (
        "neuronexus",
        "H64LP",
        &[
            37, 39, 40, 42, 43, 45, 46, 48, 17, 19, 20, 22, 23, 25, 26, 28, //
            36, 38, 35, 41, 34, 44, 33, 47, 18, 32, 21, 31, 24, 30, 27, 29, //
            64, 62, 60, 58, 56, 54, 52, 50, 15, 13, 11, 9, 7, 5, 3, 1, //
            63, 61, 59, 57, 55, 53, 51, 49, 16, 14, 12, 10, 8, 6, 4, 2,
        ],
    ),
];

/// Registers every built-in table on `builder`.
pub fn register_builtin(builder: &mut RegistryBuilder) {
    for &(name, pins) in INTAN_TABLES {
        builder.add_intan(name, pins.to_vec());
    }
    for &(probe_type, connector, pins) in OMNETICS_TABLES {
        builder.add_omnetics(probe_type, connector, pins.to_vec());
    }
}
