//! Markdown code-fence removal for model replies.
//!
//! Models routinely wrap HTML or JSON in a fenced block even when told not to.
//! Only a fence at the very start and one at the very end are removed; fences
//! inside the text are left alone.

use regex::Regex;
use std::sync::LazyLock;

static HTML_OPENING: LazyLock<Option<Regex>> = LazyLock::new(|| compile(r"^```html\s*"));
static JSON_OPENING: LazyLock<Option<Regex>> = LazyLock::new(|| compile(r"^```json\s*"));
static CLOSING: LazyLock<Option<Regex>> = LazyLock::new(|| compile(r"\s*```\s*$"));

fn compile(pattern: &str) -> Option<Regex> {
    match Regex::new(pattern) {
        Ok(re) => Some(re),
        Err(error) => {
            tracing::error!(pattern, %error, "failed to compile fence regex");
            None
        }
    }
}

/// Strip a leading "```html" fence and a trailing "```" fence.
pub fn strip_html_fence(text: &str) -> String {
    strip_until_stable(text, HTML_OPENING.as_ref())
}

/// Strip a leading "```json" fence and a trailing "```" fence.
pub fn strip_json_fence(text: &str) -> String {
    strip_until_stable(text, JSON_OPENING.as_ref())
}

// Repeats until nothing changes so stripping is idempotent even for
// doubly-fenced replies.
fn strip_until_stable(text: &str, opening: Option<&Regex>) -> String {
    let mut current = text.to_string();
    loop {
        let mut next = current.clone();
        if let Some(re) = opening {
            next = re.replace(&next, "").into_owned();
        }
        if let Some(re) = CLOSING.as_ref() {
            next = re.replace(&next, "").into_owned();
        }
        if next == current {
            return current;
        }
        current = next;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn strips_inline_html_fence() {
        assert_eq!(strip_html_fence("```html<p>hi</p>```"), "<p>hi</p>");
    }

    #[test]
    fn strips_multiline_html_fence() {
        let reply = "```html\n<h1>Rome</h1>\n<p>Founded in 753 BC.</p>\n```\n";
        assert_eq!(
            strip_html_fence(reply),
            "<h1>Rome</h1>\n<p>Founded in 753 BC.</p>"
        );
    }

    #[test]
    fn text_without_fences_is_untouched() {
        let reply = "<p>Plain answer</p>";
        assert_eq!(strip_html_fence(reply), reply);
    }

    #[test]
    fn opening_fence_is_case_sensitive() {
        assert_eq!(strip_html_fence("```HTML<p>x</p>"), "```HTML<p>x</p>");
    }

    #[test]
    fn stripping_is_idempotent() {
        let inputs = [
            "```html<p>hi</p>```",
            "```html\n```html\n<p>twice</p>\n```\n```",
            "no fences at all",
            "```",
            "",
        ];

        for input in inputs {
            let once = strip_html_fence(input);
            let twice = strip_html_fence(&once);
            assert_eq!(once, twice, "not idempotent for {input:?}");
        }
    }

    #[test]
    fn json_fence_only_matches_json_language_tag() {
        assert_eq!(strip_json_fence("```json\n[1, 2]\n```"), "[1, 2]");
        assert_eq!(strip_json_fence("```html[1]"), "```html[1]");
    }

    #[test]
    fn inner_fences_are_preserved() {
        let reply = "<pre>```rust\nfn main() {}\n```</pre> trailing";
        assert_eq!(strip_html_fence(reply), reply);
    }
}
