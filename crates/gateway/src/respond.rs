//! Reply composition for each chat intent.
//!
//! Flight and general questions get canned text; browse and product
//! questions run a visual walkthrough and report on it. Browse failures
//! become the reply text instead of an HTTP error so the conversation
//! keeps flowing.

use {
    glimpse_protocol::BrowseResult,
    glimpse_routing::{Intent, amazon_search_url, extract_search_term, extract_url},
    tracing::info,
    crate::browse::VisualBrowser,
};

const FLIGHT_RESPONSE: &str = "I'll help you find flights between the cities \
     you mentioned. For flights between Portland, Oregon and SFO, here's \
     what I found:\n\n\
     - Alaska Airlines: $99-$149 one-way (direct flights)\n\
     - United Airlines: $119-$179 one-way (direct flights)\n\
     - Delta Airlines: $129-$189 one-way (some layovers)\n\
     - Southwest: $109-$169 one-way (limited availability)\n\n\
     The cheapest flights are typically early morning or late. Would you \
     like me to help with specific dates or booking options?";

/// A composed reply, with the walkthrough attached when one ran.
pub struct Reply {
    pub text: String,
    pub visual: Option<BrowseResult>,
}

impl Reply {
    fn text_only(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            visual: None,
        }
    }
}

/// Produces the reply for a classified message.
pub async fn compose_reply(browser: &dyn VisualBrowser, intent: Intent, message: &str) -> Reply {
    match intent {
        Intent::FlightSearch => Reply::text_only(FLIGHT_RESPONSE),
        Intent::WebsiteBrowse => {
            let url = extract_url(message);
            info!(%url, "running site walkthrough for chat reply");
            match browser.browse(&url).await {
                Ok(result) => Reply {
                    text: browse_success_text(&url, &result),
                    visual: Some(result),
                },
                Err(error) => Reply::text_only(error.user_message()),
            }
        },
        Intent::ProductSearch => {
            let term = extract_search_term(message);
            let url = amazon_search_url(&term);
            info!(%term, "running product walkthrough for chat reply");
            match browser.browse(&url).await {
                Ok(result) => Reply {
                    text: product_success_text(&term),
                    visual: Some(result),
                },
                Err(error) => Reply::text_only(error.user_message()),
            }
        },
        Intent::General => Reply::text_only(general_text(message)),
    }
}

fn browse_success_text(url: &str, result: &BrowseResult) -> String {
    let mut text = format!(
        "I've browsed {url} for you with visual feedback showing cursor \
         movements and interactions."
    );
    if !result.title.is_empty() {
        text.push_str(&format!(" The page was titled \"{}\".", result.title));
    }
    text.push_str("\n\nYou can see the step-by-step process in the visual browsing panel.");
    text
}

fn product_success_text(term: &str) -> String {
    format!(
        "I've searched Amazon for {term} with visual feedback showing cursor \
         movements and interactions.\n\n\
         You can see the step-by-step process in the visual browsing panel."
    )
}

fn general_text(message: &str) -> String {
    format!(
        "I can help you search for information about '{message}'. To provide \
         accurate results, I would typically search multiple sources and \
         compile the information for you.\n\n\
         What specific aspects of this topic interest you? I can focus my \
         search on particular details."
    )
}
