pub mod newtypes;
pub mod report;
