pub mod categories;
