/// /proc/cpuinfo Reader
/// Extracts the CPU flag tokens from the kernel's cpuinfo pseudo-file.
use std::collections::HashSet;
use std::fs;
use std::io;
use std::path::Path;
use thiserror::Error;

pub const CPUINFO_PATH: &str = "/proc/cpuinfo";

#[derive(Error, Debug)]
pub enum CpuinfoError {
    #[error("{0} not found (not a Linux host?)")]
    PlatformUnsupported(String),
    #[error("IO error: {0}")]
    Io(#[from] io::Error),
    #[error("no flags line found in cpuinfo")]
    MissingFlags,
}

/// Reads the flag set of the current host from /proc/cpuinfo.
pub fn read_cpu_flags() -> Result<HashSet<String>, CpuinfoError> {
    read_cpu_flags_from(Path::new(CPUINFO_PATH))
}

/// Reads the flag set from an arbitrary cpuinfo-formatted file.
pub fn read_cpu_flags_from(path: &Path) -> Result<HashSet<String>, CpuinfoError> {
    let content = match fs::read_to_string(path) {
        Ok(content) => content,
        Err(e) if e.kind() == io::ErrorKind::NotFound => {
            return Err(CpuinfoError::PlatformUnsupported(
                path.display().to_string(),
            ));
        }
        Err(e) => return Err(e.into()),
    };

    let flags = extract_cpu_flags(&content);
    if flags.is_empty() {
        return Err(CpuinfoError::MissingFlags);
    }

    tracing::debug!("parsed {} cpu flags from {}", flags.len(), path.display());
    Ok(flags)
}

/// Parses cpuinfo text into a set of flag tokens.
/// Every "flags : ..." line contributes: different entries can report
/// different flags, and the union gives the maximum supported set.
pub fn extract_cpu_flags(content: &str) -> HashSet<String> {
    let mut flags = HashSet::new();

    for line in content.lines() {
        let line = line.trim();
        let Some((label, value)) = line.split_once(':') else {
            continue;
        };
        if label.trim_end() != "flags" {
            continue;
        }
        for token in value.split_whitespace() {
            flags.insert(token.to_string());
        }
    }

    flags
}
