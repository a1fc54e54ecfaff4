// src/utils/url.rs

//! URL manipulation utilities.

/// Join an href from the board against the site base URL.
///
/// The board emits hrefs that are relative to its own base directory
/// even when they carry a leading slash, so both forms land under the
/// base rather than under the domain root. Absolute URLs pass through
/// unchanged.
///
/// # Examples
/// ```
/// use albo_watch::utils::url::join;
///
/// assert_eq!(
///     join("https://example.com/mc/", "/mc_p_dettaglio.php?id=7"),
///     "https://example.com/mc/mc_p_dettaglio.php?id=7"
/// );
/// assert_eq!(
///     join("https://example.com/mc/", "mc_attachment.php?id=7"),
///     "https://example.com/mc/mc_attachment.php?id=7"
/// );
/// ```
pub fn join(base: &str, href: &str) -> String {
    if is_http_url(href) {
        return href.to_string();
    }

    let base = base.trim_end_matches('/');
    let href = href.trim_start_matches('/');
    format!("{base}/{href}")
}

/// Whether a string is an absolute http(s) URL.
///
/// Also used by the notifier to decide which values skip Markdown
/// escaping so that links stay clickable.
pub fn is_http_url(value: &str) -> bool {
    value.starts_with("http://") || value.starts_with("https://")
}
