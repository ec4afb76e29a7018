//! Resource name → URL translation.
//!
//! Two naming schemes share one gateway:
//!
//! - **Content addresses** (43-character base64url transaction IDs) are
//!   globally unique and routed as a path: `https://{gateway}/{id}`.
//! - **Names** are routed as a subdomain: `https://{name}.{gateway}`. A
//!   sub-name under a parent name is folded into one DNS label with an
//!   underscore, `https://{name}_{parent}.{gateway}`, since labels can't
//!   contain slashes.
//!
//! Everything here is pure; no I/O.

/// Length of a content address.
pub const CONTENT_ADDRESS_LEN: usize = 43;

/// Whether `name` is shaped like a content address: exactly 43 characters
/// from the base64url alphabet (`A-Z a-z 0-9 - _`).
pub fn is_content_address(name: &str) -> bool {
    name.len() == CONTENT_ADDRESS_LEN
        && name
            .bytes()
            .all(|b| b.is_ascii_alphanumeric() || b == b'-' || b == b'_')
}

/// Strip a leading `http://`/`https://` and one trailing `/` from a gateway.
pub fn clean_gateway(gateway: &str) -> &str {
    let host = gateway
        .strip_prefix("https://")
        .or_else(|| gateway.strip_prefix("http://"))
        .unwrap_or(gateway);
    host.strip_suffix('/').unwrap_or(host)
}

/// Build the HTTPS URL for `resource_name` on `gateway`.
///
/// `parent` marks the resource as a sub-name of that parent. Content
/// addresses ignore `parent`.
///
/// ```rust
/// # use wayfinder::gateway::routing::build_url;
/// assert_eq!(
///     build_url("mypage", "mygateway.net", Some("myroot")),
///     "https://mypage_myroot.mygateway.net"
/// );
/// assert_eq!(build_url("mypage", "https://mygateway.net/", None), "https://mypage.mygateway.net");
/// ```
pub fn build_url(resource_name: &str, gateway: &str, parent: Option<&str>) -> String {
    build_url_with_scheme("https", resource_name, gateway, parent)
}

/// [`build_url`] with an explicit scheme.
pub fn build_url_with_scheme(
    scheme: &str,
    resource_name: &str,
    gateway: &str,
    parent: Option<&str>,
) -> String {
    let gateway = clean_gateway(gateway);

    if is_content_address(resource_name) {
        return format!("{scheme}://{gateway}/{resource_name}");
    }

    match parent {
        Some(parent) => format!("{scheme}://{resource_name}_{parent}.{gateway}"),
        None => format!("{scheme}://{resource_name}.{gateway}"),
    }
}
