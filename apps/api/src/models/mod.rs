pub mod artifact;
pub mod section;
