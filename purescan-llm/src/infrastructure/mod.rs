pub mod prompts;
pub mod providers;
pub mod registry;
pub mod response_parser;
