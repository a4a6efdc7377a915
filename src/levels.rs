/// Microarchitecture Level Classification
/// Maps a set of /proc/cpuinfo flag tokens to the x86-64 feature levels (v1-v4).
use serde::Serialize;
use std::collections::HashSet;
use std::fmt;

/// One named CPU capability required by a feature level.
/// A feature can be signalled by more than one cpuinfo flag token
/// (e.g. POPCNT via `popcnt` or `abm`), so each variant carries its
/// list of acceptable aliases.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Feature {
    Avx,
    Avx2,
    Avx512Bw,
    Avx512Cd,
    Avx512Dq,
    Avx512F,
    Avx512Vl,
    Bmi1,
    Bmi2,
    Cmov,
    Cmpxchg8b,
    Cmpxchg16b,
    F16c,
    Fma,
    Fpu,
    Fxsr,
    Lahf,
    Lzcnt,
    Mmx,
    Movbe,
    Osxsave,
    Popcnt,
    Sce,
    Sse,
    Sse2,
    Sse3,
    Sse4_1,
    Sse4_2,
    Ssse3,
}

impl Feature {
    /// cpuinfo flag tokens that signal this feature. Any one is sufficient.
    pub fn flag_aliases(self) -> &'static [&'static str] {
        match self {
            Feature::Avx => &["avx"],
            Feature::Avx2 => &["avx2"],
            Feature::Avx512Bw => &["avx512bw"],
            Feature::Avx512Cd => &["avx512cd"],
            Feature::Avx512Dq => &["avx512dq"],
            Feature::Avx512F => &["avx512f"],
            Feature::Avx512Vl => &["avx512vl"],
            Feature::Bmi1 => &["bmi1"],
            Feature::Bmi2 => &["bmi2"],
            Feature::Cmov => &["cmov"],
            Feature::Cmpxchg8b => &["cx8"],
            Feature::Cmpxchg16b => &["cx16"],
            Feature::F16c => &["f16c"],
            Feature::Fma => &["fma"],
            Feature::Fpu => &["fpu"],
            Feature::Fxsr => &["fxsr", "fxsr_opt"],
            Feature::Lahf => &["lahf_lm"],
            Feature::Lzcnt => &["abm"],
            Feature::Mmx => &["mmx", "mmxext"],
            Feature::Movbe => &["movbe"],
            Feature::Osxsave => &["xsave"],
            Feature::Popcnt => &["popcnt", "abm"],
            Feature::Sce => &["syscall"],
            Feature::Sse => &["sse"],
            Feature::Sse2 => &["sse2"],
            // Kernels have reported SSE3 under several names over the years.
            Feature::Sse3 => &["sse3", "ssse3", "pni"],
            Feature::Sse4_1 => &["sse4_1"],
            Feature::Sse4_2 => &["sse4_2"],
            Feature::Ssse3 => &["ssse3"],
        }
    }

    pub fn present_in(self, flags: &HashSet<String>) -> bool {
        self.flag_aliases().iter().any(|alias| flags.contains(*alias))
    }
}

/// The four standardized x86-64 microarchitecture levels, ordered.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub enum FeatureLevel {
    #[serde(rename = "x86-64")]
    V1,
    #[serde(rename = "x86-64-v2")]
    V2,
    #[serde(rename = "x86-64-v3")]
    V3,
    #[serde(rename = "x86-64-v4")]
    V4,
}

impl FeatureLevel {
    /// All levels, ascending.
    pub const ALL: [FeatureLevel; 4] = [
        FeatureLevel::V1,
        FeatureLevel::V2,
        FeatureLevel::V3,
        FeatureLevel::V4,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            FeatureLevel::V1 => "x86-64",
            FeatureLevel::V2 => "x86-64-v2",
            FeatureLevel::V3 => "x86-64-v3",
            FeatureLevel::V4 => "x86-64-v4",
        }
    }

    /// Features a CPU must have for this level.
    /// Each level is checked on its own: the lists are not chained, but a
    /// real CPU satisfying v3 also satisfies v2 and v1 because the flag
    /// sets are cumulative in practice. Keep that property if the tables
    /// are ever re-derived.
    pub fn required_features(self) -> &'static [Feature] {
        match self {
            FeatureLevel::V1 => &[
                Feature::Cmov,
                Feature::Cmpxchg8b,
                Feature::Fpu,
                Feature::Fxsr,
                Feature::Mmx,
                Feature::Sce,
                Feature::Sse,
                Feature::Sse2,
            ],
            FeatureLevel::V2 => &[
                Feature::Cmpxchg16b,
                Feature::Lahf,
                Feature::Popcnt,
                Feature::Sse3,
                Feature::Sse4_1,
                Feature::Sse4_2,
                Feature::Ssse3,
            ],
            FeatureLevel::V3 => &[
                Feature::Avx,
                Feature::Avx2,
                Feature::Bmi1,
                Feature::Bmi2,
                Feature::F16c,
                Feature::Fma,
                Feature::Lzcnt,
                Feature::Movbe,
                Feature::Osxsave,
            ],
            FeatureLevel::V4 => &[
                Feature::Avx512Bw,
                Feature::Avx512Cd,
                Feature::Avx512Dq,
                Feature::Avx512F,
                Feature::Avx512Vl,
            ],
        }
    }

    /// True if every required feature of this level has at least one of
    /// its alias flags in the given set.
    pub fn supported_by(self, flags: &HashSet<String>) -> bool {
        self.required_features()
            .iter()
            .all(|feature| feature.present_in(flags))
    }
}

impl fmt::Display for FeatureLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Returns the highest level whose full feature list is present, scanning
/// v4 down to v1. `None` means not even the baseline is satisfied; the
/// caller decides how to surface that.
pub fn classify(flags: &HashSet<String>) -> Option<FeatureLevel> {
    FeatureLevel::ALL
        .iter()
        .rev()
        .copied()
        .find(|level| level.supported_by(flags))
}

/// Returns every fully supported level, ascending.
pub fn supported_levels(flags: &HashSet<String>) -> Vec<FeatureLevel> {
    FeatureLevel::ALL
        .iter()
        .copied()
        .filter(|level| level.supported_by(flags))
        .collect()
}
