pub mod cpuinfo;
pub mod levels;
