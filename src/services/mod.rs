pub mod dashboard;
pub mod demand;
pub mod timeline;
