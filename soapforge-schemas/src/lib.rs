//! Plain data types shared by the soapforge crates: ingredient catalogs, recipes and
//! the computed formulation result.

pub mod composition;
pub mod file_formats;
pub mod ingredient;
pub mod recipe;
