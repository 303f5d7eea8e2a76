// The binary's handlers, shared with the integration tests
#[path = "handlers.rs"]
pub mod handlers;

pub use handlers::{build_config, check_report, init_logging, load_input};
