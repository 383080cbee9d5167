//! Header anchor generation.
//!
//! [`sanitized_anchor_name`] turns arbitrary header text into a URL-safe
//! identifier; [`SlugRegistry`] keeps the identifiers of one conversion unique.

use std::collections::HashMap;

/// Sanitize `text` into an anchor name.
///
/// Letters and digits are kept and lowercased (Unicode aware); every other run
/// of characters collapses into a single `-`. The result never starts or ends
/// with `-`, and text without letters or digits yields an empty string.
///
/// ```
/// use inkdown::sanitized_anchor_name;
///
/// assert_eq!(sanitized_anchor_name("This is a header"), "this-is-a-header");
/// assert_eq!(sanitized_anchor_name("<- Let's try this, shall we?"), "let-s-try-this-shall-we");
/// assert_eq!(sanitized_anchor_name("Hello, 世界"), "hello-世界");
/// ```
pub fn sanitized_anchor_name(text: &str) -> String {
    let mut anchor = String::with_capacity(text.len());
    let mut pending_dash = false;

    for ch in text.chars() {
        if ch.is_alphanumeric() {
            // lowercasing may add combining marks (`İ` is `i` + U+0307); keep
            // only the letters and digits
            let mut lowered = ch.to_lowercase().filter(|c| c.is_alphanumeric()).peekable();
            if lowered.peek().is_some() {
                if pending_dash && !anchor.is_empty() {
                    anchor.push('-');
                }
                pending_dash = false;
                anchor.extend(lowered);
                continue;
            }
        }
        pending_dash = true;
    }

    anchor
}

/// Identifiers handed out during one conversion, with their reuse counters.
#[derive(Debug, Default)]
pub struct SlugRegistry {
    ids: HashMap<String, usize>,
}

impl SlugRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Return `id`, or a suffixed variant of it that has not been issued yet.
    ///
    /// A taken id with counter `n` is retried as `id-(n+1)`. When that form was
    /// itself issued independently, the suffix cascades onto the colliding form
    /// (`id-1` becomes `id-1-1`, then `id-1-2`) instead of skipping ahead.
    pub fn ensure_unique(&mut self, id: &str) -> String {
        let mut id = id.to_string();

        while let Some(&count) = self.ids.get(&id) {
            let candidate = format!("{id}-{}", count + 1);
            if self.ids.contains_key(&candidate) {
                id.push_str("-1");
            } else {
                self.ids.insert(id, count + 1);
                id = candidate;
            }
        }

        self.ids.insert(id.clone(), 0);
        id
    }
}
