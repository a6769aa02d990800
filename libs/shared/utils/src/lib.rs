pub mod dates;
pub mod test_utils;
