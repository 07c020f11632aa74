use std::sync::OnceLock;

fn env_flag_enabled(name: &str) -> bool {
    std::env::var(name)
        .map(|value| {
            matches!(
                value.trim().to_ascii_lowercase().as_str(),
                "1" | "true" | "yes" | "on"
            )
        })
        .unwrap_or(false)
}

/// Per-tick trace of the scheduler loop (`BC_DEBUG_COMMANDS=1`).
pub fn command_debug_enabled() -> bool {
    if !cfg!(debug_assertions) {
        return false;
    }
    static FLAG: OnceLock<bool> = OnceLock::new();
    *FLAG.get_or_init(|| env_flag_enabled("BC_DEBUG_COMMANDS"))
}

/// Meta/unknown actions reaching the dispatcher panic instead of being ignored.
/// Enabled by the `strict_dispatch` feature or `BC_STRICT_DISPATCH=1`; never in release.
pub fn strict_dispatch_enabled() -> bool {
    if !cfg!(debug_assertions) {
        return false;
    }
    static FLAG: OnceLock<bool> = OnceLock::new();
    *FLAG.get_or_init(|| {
        cfg!(feature = "strict_dispatch") || env_flag_enabled("BC_STRICT_DISPATCH")
    })
}
