pub mod google_ai;

pub use google_ai::{DEFAULT_BASE_URL, GoogleAIProvider};
