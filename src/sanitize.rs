//! HTML sanitization seam.
//!
//! Sanitization policy is an external concern; the gateway only needs the
//! contract `sanitize(raw) -> clean`. The default implementation strips
//! markup outright and keeps text content, which is enough to guarantee no
//! tags reach the store. Swap in a policy-aware sanitizer here if rendered
//! HTML ever needs to survive.

/// Collaborator that turns untrusted HTML into safe text.
pub trait Sanitizer: Send + Sync {
    fn sanitize(&self, raw: &str) -> String;
}

/// Default sanitizer: removes every tag, keeps character data.
///
/// Content of `<script>` and `<style>` elements is dropped entirely rather
/// than left behind as bare text.
#[derive(Debug, Default, Clone)]
pub struct StripTags;

impl Sanitizer for StripTags {
    fn sanitize(&self, raw: &str) -> String {
        let mut clean = String::with_capacity(raw.len());
        let mut rest = raw;

        while let Some(open) = rest.find('<') {
            clean.push_str(&rest[..open]);
            rest = &rest[open..];

            let Some(close) = rest.find('>') else {
                // Unterminated tag: nothing after `<` is trusted.
                rest = "";
                break;
            };
            let tag = &rest[1..close];
            rest = &rest[close + 1..];

            let name: String = tag
                .trim_start_matches('/')
                .chars()
                .take_while(|c| c.is_ascii_alphanumeric())
                .collect::<String>()
                .to_ascii_lowercase();

            if (name == "script" || name == "style") && !tag.starts_with('/') {
                // Skip to the matching close tag, discarding the payload.
                let closer = format!("</{name}");
                if let Some(end) = rest.to_ascii_lowercase().find(&closer) {
                    rest = &rest[end..];
                    if let Some(close) = rest.find('>') {
                        rest = &rest[close + 1..];
                    } else {
                        rest = "";
                    }
                } else {
                    rest = "";
                }
            }
        }
        clean.push_str(rest);
        clean
    }
}
