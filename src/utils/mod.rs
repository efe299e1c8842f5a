pub mod csv_io;
pub mod db_utils;
pub mod pdf;
pub mod validation;
