pub mod date_parser;
pub mod db_utils;
pub mod normalizer;
pub mod spreadsheet;
