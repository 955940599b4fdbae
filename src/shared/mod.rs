pub mod constants;
pub mod multipart;
pub mod types;
pub mod validation;

#[cfg(test)]
pub mod test_helpers;
