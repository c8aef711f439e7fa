//! Platform abstraction layer
//!
//! Handles browser/native differences for:
//! - Logging setup
//! - Input events
//! - Storage (LocalStorage on web, JSON file on native)
//! - Seeding a run

pub mod input;
pub mod storage;

/// Install the logger for this platform
#[cfg(target_arch = "wasm32")]
pub fn init_logging() {
    console_error_panic_hook::set_once();
    let _ = console_log::init_with_level(log::Level::Info);
}

/// Install the logger for this platform
#[cfg(not(target_arch = "wasm32"))]
pub fn init_logging() {
    let _ = env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"))
        .try_init();
}

/// Seed for a fresh run when the host does not pick one
#[cfg(target_arch = "wasm32")]
pub fn entropy_seed() -> u64 {
    js_sys::Date::now() as u64
}

/// Seed for a fresh run when the host does not pick one
#[cfg(not(target_arch = "wasm32"))]
pub fn entropy_seed() -> u64 {
    use rand::Rng;
    rand::rng().random()
}
