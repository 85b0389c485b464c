pub use glimpse_protocol::DEFAULT_BROWSE_URL as DEFAULT_URL;

/// First `http://` or `https://` token in the message, cut at whitespace.
/// Falls back to [`DEFAULT_URL`] when nothing qualifies.
pub fn extract_url(message: &str) -> String {
    for (idx, _) in message.match_indices("http") {
        let rest = &message[idx..];
        let scheme_len = if rest.starts_with("https://") {
            "https://".len()
        } else if rest.starts_with("http://") {
            "http://".len()
        } else {
            continue;
        };
        let end = rest.find(char::is_whitespace).unwrap_or(rest.len());
        if end > scheme_len {
            return rest[..end].to_string();
        }
    }
    DEFAULT_URL.to_string()
}

/// Search term for the product walkthrough. "headphone" anywhere in the
/// message picks the headphones demo; an explicit "search for X" takes the
/// first word after the phrase, even when that word is empty.
pub fn extract_search_term(message: &str) -> String {
    let lowered = message.to_lowercase();
    let mut term = if lowered.contains("headphone") {
        "headphones".to_string()
    } else {
        "product".to_string()
    };
    if let Some((_, after)) = lowered.split_once("search for") {
        term = after
            .trim()
            .split(' ')
            .next()
            .unwrap_or_default()
            .to_string();
    }
    term
}

pub fn amazon_search_url(term: &str) -> String {
    format!("https://www.amazon.com/s?k={term}")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn picks_first_url_and_cuts_at_whitespace() {
        assert_eq!(
            extract_url("browse https://docs.rs/axum and http://example.org next"),
            "https://docs.rs/axum",
        );
        assert_eq!(extract_url("go to http://a.io/x?q=1."), "http://a.io/x?q=1.");
    }

    #[test]
    fn ignores_bare_scheme_and_non_url_http_text() {
        assert_eq!(extract_url("the http protocol"), DEFAULT_URL);
        assert_eq!(extract_url("broken link: https:// end"), DEFAULT_URL);
    }

    #[test]
    fn defaults_when_no_url_present() {
        assert_eq!(extract_url("browse something interesting"), DEFAULT_URL);
    }

    #[test]
    fn headphone_mention_selects_headphones() {
        assert_eq!(extract_search_term("find headphone deals on amazon"), "headphones");
        assert_eq!(extract_search_term("amazon please"), "product");
    }

    #[test]
    fn search_for_phrase_takes_the_next_word() {
        assert_eq!(extract_search_term("search for wireless earbuds"), "wireless");
        assert_eq!(extract_search_term("Search For Laptops now"), "laptops");
        // A trailing phrase yields an empty term on purpose.
        assert_eq!(extract_search_term("please search for"), "");
    }

    #[test]
    fn amazon_url_embeds_the_term_verbatim() {
        assert_eq!(
            amazon_search_url("headphones"),
            "https://www.amazon.com/s?k=headphones",
        );
    }
}
