use {glimpse_agents::PersonaId, serde::{Deserialize, Serialize}};

/// What kind of demonstration a message asks for. Matching is a
/// case-insensitive substring cascade; the first hit wins.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Intent {
    FlightSearch,
    WebsiteBrowse,
    ProductSearch,
    General,
}

impl Intent {
    /// Persona that fields this intent. Visual intents land on the browsing
    /// persona, everything else on web search.
    pub fn handler(self) -> PersonaId {
        match self {
            Intent::FlightSearch | Intent::WebsiteBrowse | Intent::ProductSearch => {
                PersonaId::WebBrowsing
            },
            Intent::General => PersonaId::WebSearch,
        }
    }
}

pub fn classify(message: &str) -> Intent {
    let lowered = message.to_lowercase();
    if lowered.contains("flight") {
        Intent::FlightSearch
    } else if lowered.contains("browse") || lowered.contains("website") {
        Intent::WebsiteBrowse
    } else if lowered.contains("amazon")
        || lowered.contains("headphone")
        || lowered.contains("product")
    {
        Intent::ProductSearch
    } else {
        Intent::General
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cascade_prefers_flight_over_later_keywords() {
        assert_eq!(classify("browse flight deals on amazon"), Intent::FlightSearch);
        assert_eq!(classify("Find me a FLIGHT to Tokyo"), Intent::FlightSearch);
    }

    #[test]
    fn browse_and_website_map_to_website_browse() {
        assert_eq!(classify("please browse example.com"), Intent::WebsiteBrowse);
        assert_eq!(classify("check this Website for me"), Intent::WebsiteBrowse);
    }

    #[test]
    fn product_keywords_map_to_product_search() {
        assert_eq!(classify("search Amazon for headphones"), Intent::ProductSearch);
        assert_eq!(classify("compare product prices"), Intent::ProductSearch);
        assert_eq!(classify("wireless headphone reviews"), Intent::ProductSearch);
    }

    #[test]
    fn anything_else_is_general() {
        assert_eq!(classify("tell me about rust lifetimes"), Intent::General);
        assert_eq!(classify(""), Intent::General);
    }

    #[test]
    fn visual_intents_route_to_the_browsing_persona() {
        assert_eq!(Intent::FlightSearch.handler(), PersonaId::WebBrowsing);
        assert_eq!(Intent::WebsiteBrowse.handler(), PersonaId::WebBrowsing);
        assert_eq!(Intent::ProductSearch.handler(), PersonaId::WebBrowsing);
        assert_eq!(Intent::General.handler(), PersonaId::WebSearch);
    }
}
