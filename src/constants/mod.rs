pub mod tracks;
pub mod vehicles;

pub use tracks::{track_label, track_name};
pub use vehicles::{vehicle_info, VehicleInfo};
