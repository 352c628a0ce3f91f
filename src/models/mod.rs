pub mod appointments;
pub mod doctors;
pub mod evaluations;
pub mod sessions;
pub mod users;
