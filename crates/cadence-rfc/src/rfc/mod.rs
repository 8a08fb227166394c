pub mod api;
pub mod ical;
