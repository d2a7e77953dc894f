pub mod appointment;
pub mod availability;
pub mod doctor;
pub mod medical_record;
pub mod slot;
pub mod time_of_day;
pub mod user;
