pub mod collapse;
pub mod parse;
pub mod value;
pub mod value_path;
