pub mod recipients;
pub mod status;
pub mod uploads;
