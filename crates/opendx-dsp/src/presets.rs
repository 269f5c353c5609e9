/// Factory programs — 32 classic two-operator FM patches.
///
/// Each program is a name plus the sixteen normalized tone controls in
/// `Params::set_tone` order: attack, decay, release, coarse, fine, mod init,
/// mod dec, mod sus, mod rel, mod vel, vibrato, octave, fine tune, waveform,
/// mod thru, lfo rate. The output section (gain, saturation) is not part of
/// a program; switching patches never changes the output level.

/// One factory program.
#[derive(Debug, Clone, Copy)]
pub struct Program {
    pub name: &'static str,
    pub values: [f32; 16],
}

/// Index of the power-on program ("Log Drum").
pub const DEFAULT_PROGRAM: usize = 15;

pub const PROGRAMS: [Program; 32] = [
    Program { name: "Bright E.Piano", values: [0.000, 0.650, 0.441, 0.842, 0.329, 0.230, 0.800, 0.050, 0.800, 0.900, 0.000, 0.500, 0.500, 0.447, 0.000, 0.414] },
    Program { name: "Jazz E.Piano",   values: [0.000, 0.500, 0.100, 0.671, 0.000, 0.441, 0.336, 0.243, 0.800, 0.500, 0.000, 0.500, 0.500, 0.178, 0.000, 0.500] },
    Program { name: "E.Piano Pad",    values: [0.000, 0.700, 0.400, 0.230, 0.184, 0.270, 0.474, 0.224, 0.800, 0.974, 0.250, 0.500, 0.500, 0.428, 0.836, 0.500] },
    Program { name: "Fuzzy E.Piano",  values: [0.000, 0.700, 0.400, 0.320, 0.217, 0.599, 0.670, 0.309, 0.800, 0.500, 0.263, 0.507, 0.500, 0.276, 0.638, 0.526] },
    Program { name: "Soft Chimes",    values: [0.400, 0.600, 0.650, 0.760, 0.000, 0.390, 0.250, 0.160, 0.900, 0.500, 0.362, 0.500, 0.500, 0.401, 0.296, 0.493] },
    Program { name: "Harpsichord",    values: [0.000, 0.342, 0.000, 0.280, 0.000, 0.880, 0.100, 0.408, 0.740, 0.000, 0.000, 0.600, 0.500, 0.842, 0.651, 0.500] },
    Program { name: "Funk Clav",      values: [0.000, 0.400, 0.100, 0.360, 0.000, 0.875, 0.160, 0.592, 0.800, 0.500, 0.000, 0.500, 0.500, 0.303, 0.868, 0.500] },
    Program { name: "Sitar",          values: [0.000, 0.500, 0.704, 0.230, 0.000, 0.151, 0.750, 0.493, 0.770, 0.500, 0.000, 0.400, 0.500, 0.421, 0.632, 0.500] },
    Program { name: "Chiff Organ",    values: [0.600, 0.990, 0.400, 0.320, 0.283, 0.570, 0.300, 0.050, 0.240, 0.500, 0.138, 0.500, 0.500, 0.283, 0.822, 0.500] },
    Program { name: "Tinkle",         values: [0.000, 0.500, 0.650, 0.368, 0.651, 0.395, 0.550, 0.257, 0.900, 0.500, 0.300, 0.800, 0.500, 0.000, 0.414, 0.500] },
    Program { name: "Space Pad",      values: [0.000, 0.700, 0.520, 0.230, 0.197, 0.520, 0.720, 0.280, 0.730, 0.500, 0.250, 0.500, 0.500, 0.336, 0.428, 0.500] },
    Program { name: "Koto",           values: [0.000, 0.240, 0.000, 0.390, 0.000, 0.880, 0.100, 0.600, 0.740, 0.500, 0.000, 0.500, 0.500, 0.526, 0.480, 0.500] },
    Program { name: "Harp",           values: [0.000, 0.500, 0.700, 0.160, 0.000, 0.158, 0.349, 0.000, 0.280, 0.900, 0.000, 0.618, 0.500, 0.401, 0.000, 0.500] },
    Program { name: "Jazz Guitar",    values: [0.000, 0.500, 0.100, 0.390, 0.000, 0.490, 0.250, 0.250, 0.800, 0.500, 0.000, 0.500, 0.500, 0.263, 0.145, 0.500] },
    Program { name: "Steel Drum",     values: [0.000, 0.300, 0.507, 0.480, 0.730, 0.000, 0.100, 0.303, 0.730, 1.000, 0.000, 0.600, 0.500, 0.579, 0.000, 0.500] },
    Program { name: "Log Drum",       values: [0.000, 0.300, 0.500, 0.320, 0.000, 0.467, 0.079, 0.158, 0.500, 0.500, 0.000, 0.400, 0.500, 0.151, 0.020, 0.500] },
    Program { name: "Trumpet",        values: [0.000, 0.990, 0.100, 0.230, 0.000, 0.000, 0.200, 0.450, 0.800, 0.000, 0.112, 0.600, 0.500, 0.711, 0.000, 0.401] },
    Program { name: "Horn",           values: [0.280, 0.990, 0.280, 0.230, 0.000, 0.180, 0.400, 0.300, 0.800, 0.500, 0.000, 0.400, 0.500, 0.217, 0.480, 0.500] },
    Program { name: "Reed 1",         values: [0.220, 0.990, 0.250, 0.170, 0.000, 0.240, 0.310, 0.257, 0.900, 0.757, 0.000, 0.500, 0.500, 0.697, 0.803, 0.500] },
    Program { name: "Reed 2",         values: [0.220, 0.990, 0.250, 0.450, 0.070, 0.240, 0.310, 0.360, 0.900, 0.500, 0.211, 0.500, 0.500, 0.184, 0.000, 0.414] },
    Program { name: "Violin",         values: [0.697, 0.990, 0.421, 0.230, 0.138, 0.750, 0.390, 0.513, 0.800, 0.316, 0.467, 0.678, 0.500, 0.743, 0.757, 0.487] },
    Program { name: "Chunky Bass",    values: [0.000, 0.400, 0.000, 0.280, 0.125, 0.474, 0.250, 0.100, 0.500, 0.500, 0.000, 0.400, 0.500, 0.579, 0.592, 0.500] },
    Program { name: "E.Bass",         values: [0.230, 0.500, 0.100, 0.395, 0.000, 0.388, 0.092, 0.250, 0.150, 0.500, 0.200, 0.200, 0.500, 0.178, 0.822, 0.500] },
    Program { name: "Clunk Bass",     values: [0.000, 0.600, 0.400, 0.230, 0.000, 0.450, 0.320, 0.050, 0.900, 0.500, 0.000, 0.200, 0.500, 0.520, 0.105, 0.500] },
    Program { name: "Thick Bass",     values: [0.000, 0.600, 0.400, 0.170, 0.145, 0.290, 0.350, 0.100, 0.900, 0.500, 0.000, 0.400, 0.500, 0.441, 0.309, 0.500] },
    Program { name: "Sine Bass",      values: [0.000, 0.600, 0.490, 0.170, 0.151, 0.099, 0.400, 0.000, 0.900, 0.500, 0.000, 0.400, 0.500, 0.118, 0.013, 0.500] },
    Program { name: "Square Bass",    values: [0.000, 0.600, 0.100, 0.320, 0.000, 0.350, 0.670, 0.100, 0.150, 0.500, 0.000, 0.200, 0.500, 0.303, 0.730, 0.500] },
    Program { name: "Upright Bass 1", values: [0.300, 0.500, 0.400, 0.280, 0.000, 0.180, 0.540, 0.000, 0.700, 0.500, 0.000, 0.400, 0.500, 0.296, 0.033, 0.500] },
    Program { name: "Upright Bass 2", values: [0.300, 0.500, 0.400, 0.360, 0.000, 0.461, 0.070, 0.070, 0.700, 0.500, 0.000, 0.400, 0.500, 0.546, 0.467, 0.500] },
    Program { name: "Harmonics",      values: [0.000, 0.500, 0.500, 0.280, 0.000, 0.330, 0.200, 0.000, 0.700, 0.500, 0.000, 0.500, 0.500, 0.151, 0.079, 0.500] },
    Program { name: "Scratch",        values: [0.000, 0.500, 0.000, 0.000, 0.240, 0.580, 0.630, 0.000, 0.000, 0.500, 0.000, 0.600, 0.500, 0.816, 0.243, 0.500] },
    Program { name: "Syn Tom",        values: [0.000, 0.355, 0.350, 0.000, 0.105, 0.000, 0.000, 0.200, 0.500, 0.500, 0.000, 0.645, 0.500, 1.000, 0.296, 0.500] },
];

/// Look up a program by index. Out-of-range indices (e.g. from a stray MIDI
/// program change) return `None` and are ignored by the engine.
pub fn program(index: usize) -> Option<&'static Program> {
    PROGRAMS.get(index)
}

/// Case-insensitive lookup by name, for CLI hosts.
pub fn program_by_name(name: &str) -> Option<(usize, &'static Program)> {
    PROGRAMS
        .iter()
        .enumerate()
        .find(|(_, p)| p.name.eq_ignore_ascii_case(name))
}
