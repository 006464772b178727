pub mod backoff;
pub mod json_extract;
