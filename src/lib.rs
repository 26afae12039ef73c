use pretty_env_logger;
use std::sync::Once;

static INIT: Once = Once::new();

pub fn _setup_pretty_env_logger_default() {
    INIT.call_once(|| {
        pretty_env_logger::init();
    });
}

pub use translate::{to_data, to_object, TranslateError};
pub mod coords;
pub mod data;
pub mod spectrum;
pub mod translate;
