mod format;
mod names;
mod table;

pub use format::{format_gap, format_sector, format_start_time, format_time, SECTOR_PLACEHOLDER};
pub use names::clean_name;
pub use table::{build_pit_wall, DriverEntry, PitWall, RaceInfo, DNS_POSITION};
