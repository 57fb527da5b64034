mod access_policy;
mod input_sanitizer;

pub use access_policy::AccessPolicy;
pub use input_sanitizer::InputSanitizer;
