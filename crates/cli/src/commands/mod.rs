pub mod research;
pub mod serve;
pub mod status;
