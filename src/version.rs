//! Build metadata stamped in by `build.rs`.

/// Package version from Cargo.toml.
pub const PKG_VERSION: &str = env!("CARGO_PKG_VERSION");

/// `User-Agent` sent with probes and directory fetches.
pub(crate) const USER_AGENT: &str = concat!("wayfinder/", env!("CARGO_PKG_VERSION"));

fn vergen(value: Option<&'static str>) -> &'static str {
    value.filter(|v| !v.is_empty()).unwrap_or("unknown")
}

/// Version line for `wayfinder version`:
/// `{version} ({sha}[-dirty] on {branch}, built {timestamp})`.
///
/// Fields vergen couldn't determine (no git checkout, for instance) read
/// `unknown`.
pub fn version_string() -> String {
    let sha = vergen(option_env!("VERGEN_GIT_SHA"));
    let short_sha = sha.get(..7).unwrap_or(sha);
    let dirty = if option_env!("VERGEN_GIT_DIRTY") == Some("true") {
        "-dirty"
    } else {
        ""
    };
    format!(
        "{PKG_VERSION} ({short_sha}{dirty} on {}, built {})",
        vergen(option_env!("VERGEN_GIT_BRANCH")),
        vergen(option_env!("VERGEN_BUILD_TIMESTAMP")),
    )
}
