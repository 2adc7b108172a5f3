//! Image URL normalization for catalog entries.

/// Rewrite a Google Drive share link into a direct-content URL.
///
/// Admins paste `https://drive.google.com/file/d/<id>/view?...` links when
/// adding products; browsers cannot render those inline. Links containing a
/// `/d/<id>` segment are rewritten to the `lh3.googleusercontent.com` host,
/// anything else passes through unchanged.
#[must_use]
pub fn convert_google_drive_link(url: &str) -> String {
    if !url.contains("drive.google.com") {
        return url.to_owned();
    }

    if let Some(rest) = url.split("/d/").nth(1) {
        let id: String = rest
            .chars()
            .take_while(|c| c.is_ascii_alphanumeric() || *c == '_' || *c == '-')
            .collect();
        if !id.is_empty() {
            return format!("https://lh3.googleusercontent.com/d/{id}");
        }
    }

    url.to_owned()
}
