use {
    glimpse_agents::{PersonaCatalog, PersonaId},
    tracing::debug,
};

use crate::{
    Result,
    classify::{Intent, classify},
};

/// Resolved route: which persona fields this message and the handoff chain
/// that reaches it, coordinator first.
#[derive(Debug, Clone)]
pub struct ResolvedRoute {
    pub intent: Intent,
    pub handler: PersonaId,
    pub path: Vec<PersonaId>,
}

impl ResolvedRoute {
    /// Handoff chain mapped through catalog display names.
    pub fn path_names(&self, catalog: &PersonaCatalog) -> Vec<String> {
        self.path
            .iter()
            .map(|id| catalog.name_of(*id).to_string())
            .collect()
    }

    /// Display name of the persona that answers.
    pub fn handler_name<'a>(&self, catalog: &'a PersonaCatalog) -> &'a str {
        catalog.name_of(self.handler)
    }
}

/// Classify the message and walk the catalog's handoff edges to the persona
/// that handles it.
pub fn resolve_route(catalog: &PersonaCatalog, message: &str) -> Result<ResolvedRoute> {
    let intent = classify(message);
    let handler = intent.handler();
    let path = catalog.delegation_path(handler)?;
    debug!(?intent, handler = %handler, hops = path.len(), "resolved route");
    Ok(ResolvedRoute {
        intent,
        handler,
        path,
    })
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;

    fn catalog() -> PersonaCatalog {
        PersonaCatalog::new(false).unwrap()
    }

    #[test]
    fn visual_requests_route_through_web_search_to_browsing() {
        let catalog = catalog();
        for message in [
            "find flights to Berlin",
            "browse https://example.com",
            "search amazon for headphones",
        ] {
            let route = resolve_route(&catalog, message).unwrap();
            assert_eq!(route.handler, PersonaId::WebBrowsing);
            assert_eq!(
                route.path,
                vec![
                    PersonaId::Admin,
                    PersonaId::WebSearch,
                    PersonaId::WebBrowsing,
                ],
            );
        }
    }

    #[test]
    fn general_requests_stop_at_web_search() {
        let catalog = catalog();
        let route = resolve_route(&catalog, "what is the capital of peru").unwrap();
        assert_eq!(route.intent, Intent::General);
        assert_eq!(route.path, vec![PersonaId::Admin, PersonaId::WebSearch]);
        assert_eq!(route.handler_name(&catalog), "Web Search Agent");
    }

    #[test]
    fn path_names_follow_the_catalog() {
        let catalog = catalog();
        let route = resolve_route(&catalog, "browse the website").unwrap();
        assert_eq!(
            route.path_names(&catalog),
            vec!["Admin Agent", "Web Search Agent", "Web Browsing Agent"],
        );
    }
}
