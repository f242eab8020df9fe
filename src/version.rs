//! Client version information.

/// Current client version.
pub const CLIENT_VERSION: &str = env!("CARGO_PKG_VERSION");

/// Build the User-Agent string for client requests.
pub fn build_user_agent(suffix: Option<&str>) -> String {
    let mut ua = format!(
        "AgniKit-Rust/{} ({}; {})",
        CLIENT_VERSION,
        std::env::consts::OS,
        std::env::consts::ARCH
    );

    if let Some(s) = suffix {
        ua.push(' ');
        ua.push_str(s);
    }

    ua
}
