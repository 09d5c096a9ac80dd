pub mod faculty_loader;

pub use faculty_loader::{load_faculty_table, parse_faculty_table};
