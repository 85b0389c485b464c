//! Builds the fixed persona roster and answers delegation-path queries
//! against its handoff edges.

use std::collections::{HashMap, VecDeque};

use thiserror::Error;

use crate::persona::{ModelSettings, Persona, PersonaId, ToolName};

#[derive(Debug, Error, PartialEq)]
pub enum CatalogError {
    #[error("{id} lists itself as a handoff")]
    SelfHandoff { id: PersonaId },

    #[error("{id} appears more than once in the catalog")]
    Duplicate { id: PersonaId },

    #[error("{id} is missing from the catalog")]
    Missing { id: PersonaId },

    #[error("no delegation path from {from} to {to}")]
    NoPath { from: PersonaId, to: PersonaId },
}

const ADMIN_INSTRUCTIONS: &str = "You are the administrative coordinator for a team of \
     specialized agents. Your primary responsibility is to analyze user requests and determine \
     which specialized agent(s) would be best suited to handle them. \n\nGuidelines for \
     delegation:\n1. For research and information gathering tasks, delegate to the Research \
     Agent.\n2. For creative writing, storytelling, or content creation, delegate to the \
     Creative Agent.\n3. For programming, code explanation, debugging, or technical \
     implementation, delegate to the Coding Agent (powered by Anthropic Claude).\n4. For \
     web-related tasks (searches, browsing, price comparisons), delegate to the Web Search \
     Agent, which can coordinate with the Web Browsing Agent when visual interaction is \
     needed.\n5. For file management, data organization, or information storage, delegate to \
     the Data Management Agent.\n\nImportant coordination principles:\n- If a task spans \
     multiple domains, delegate to the agent with the primary expertise, knowing they can \
     coordinate with other agents as needed.\n- For complex tasks, consider the user's primary \
     goal when choosing the lead agent.\n- Only respond directly if the task is general \
     administration, clarification, or doesn't clearly fit any specialized agent's \
     domain.\n\nAlways prioritize effective delegation over attempting to handle specialized \
     tasks yourself.";

const RESEARCH_INSTRUCTIONS: &str = "You are a research specialist focused on gathering, \
     analyzing, and synthesizing information. Your strengths include finding facts, compiling \
     data, and creating comprehensive reports. \n\nWhen handling research tasks:\n1. Break \
     complex questions into manageable components\n2. Provide well-structured, factual \
     responses with relevant details\n3. Cite sources whenever possible\n4. Organize \
     information logically with clear headings and sections\n5. Save important findings to \
     files using the file management tools\n\nFor research requiring web searches, coordinate \
     with the Web Search Agent. For research requiring code analysis or technical \
     understanding, coordinate with the Coding Agent.";

const CREATIVE_INSTRUCTIONS: &str = "You are a creative writing specialist skilled in \
     generating engaging, original content. Your expertise includes stories, poems, marketing \
     copy, and other creative text formats. \n\nWhen handling creative tasks:\n1. Be \
     imaginative and adapt your style to the specific request\n2. Structure content with clear \
     sections and formatting\n3. Use vivid language and appropriate tone for the context\n4. \
     Save your creative work to files when requested\n\nFor creative tasks requiring research, \
     coordinate with the Research Agent. For tasks involving web content analysis, coordinate \
     with the Web Search Agent. For creative coding projects, coordinate with the Coding \
     Agent.";

const CODING_INSTRUCTIONS_BODY: &str = "Your expertise includes writing clean, efficient code, \
     explaining technical concepts, and solving programming problems. \n\nWhen handling coding \
     tasks:\n1. Provide well-commented, maintainable code solutions\n2. Explain technical \
     concepts clearly with examples\n3. Follow best practices for the language/framework in \
     question\n4. Save code to appropriately named files using file management tools\n5. \
     Organize code into logical folders and files\n\nFor coding tasks requiring research, \
     coordinate with the Research Agent. For tasks requiring web searches for documentation or \
     examples, coordinate with the Web Search Agent. For tasks involving data organization, \
     coordinate with the Data Management Agent.";

const WEB_SEARCH_INSTRUCTIONS: &str = "You are a web search specialist focused on finding \
     information online and providing accurate, up-to-date answers. \n\nWhen handling web \
     search tasks:\n1. Formulate effective search queries\n2. Summarize and synthesize \
     information from multiple sources\n3. Cite sources and provide links when possible\n4. \
     Save search results to files when appropriate\n\nFor tasks requiring visual browsing, \
     interactive elements, or form submission (like price comparisons, flight searches, or \
     product research), coordinate with the Web Browsing Agent. \n\nIMPORTANT: For flight \
     search queries specifically, respond with a brief acknowledgment that you'll help find \
     flight information, but DO NOT attempt to search for actual flights yourself. Instead, \
     immediately suggest using the Web Browsing Agent which has the tools to interact with \
     flight search websites.\n\nFor technical searches requiring code understanding, \
     coordinate with the Coding Agent. For comprehensive research tasks, coordinate with the \
     Research Agent.";

const WEB_BROWSING_INSTRUCTIONS: &str = "You are a web browsing specialist using a managed \
     Chromium browser to navigate websites, extract information, and interact with web pages. \
     \n\nWhen handling web browsing tasks:\n1. Use browse_website_with_container for visual \
     demonstrations\n2. Extract relevant information from websites clearly and concisely\n3. \
     Fill out forms and interact with web elements as needed\n4. Organize findings in a \
     structured format with clear sections\n5. Save screenshots and findings to organized \
     folders\n\nYou excel at tasks like:\n- Flight and hotel searches (Google Flights, Kayak, \
     Expedia)\n- Product price comparisons\n- Form submissions\n- Data extraction from \
     specific websites\n\nIMPORTANT: For flight search queries, respond with a simple \
     acknowledgment first. Due to the complexity of flight search websites and potential \
     connection issues, avoid attempting to browse actual flight websites in this demo. \
     Instead, provide a helpful explanation of how you would normally approach this task by \
     describing the steps you would take.\n\nFor tasks requiring code analysis from websites, \
     coordinate with the Coding Agent. For tasks requiring saving and organizing large amounts \
     of data, coordinate with the Data Management Agent.";

const DATA_MANAGEMENT_INSTRUCTIONS: &str = "You are a data management specialist focused on \
     organizing, storing, and retrieving information. \n\nWhen handling data management \
     tasks:\n1. Create well-organized folder structures with clear naming conventions\n2. Save \
     information with descriptive file names\n3. Organize content logically within files\n4. \
     Help users find and access their stored information efficiently\n5. Confirm when files \
     and folders have been created or modified\n\nFor data management tasks requiring web \
     content, coordinate with the Web Search Agent. For tasks involving code organization, \
     coordinate with the Coding Agent. For tasks requiring research organization, coordinate \
     with the Research Agent.";

fn admin_persona() -> Persona {
    Persona {
        id: PersonaId::Admin,
        name: PersonaId::Admin.display_name().into(),
        instructions: ADMIN_INSTRUCTIONS.into(),
        tools: vec![],
        handoffs: vec![
            PersonaId::Research,
            PersonaId::Creative,
            PersonaId::Coding,
            PersonaId::WebSearch,
            PersonaId::DataManagement,
        ],
        model: None,
    }
}

fn research_persona() -> Persona {
    Persona {
        id: PersonaId::Research,
        name: PersonaId::Research.display_name().into(),
        instructions: RESEARCH_INSTRUCTIONS.into(),
        tools: vec![
            ToolName::CreateFolder,
            ToolName::SaveTextToFile,
            ToolName::ListFiles,
        ],
        handoffs: vec![PersonaId::WebSearch, PersonaId::Coding],
        model: None,
    }
}

fn creative_persona() -> Persona {
    Persona {
        id: PersonaId::Creative,
        name: PersonaId::Creative.display_name().into(),
        instructions: CREATIVE_INSTRUCTIONS.into(),
        tools: vec![
            ToolName::CreateFolder,
            ToolName::SaveTextToFile,
            ToolName::ListFiles,
        ],
        handoffs: vec![PersonaId::Research, PersonaId::WebSearch, PersonaId::Coding],
        model: None,
    }
}

/// With a Claude key configured the coding persona is renamed and pinned to
/// deterministic sampling; otherwise it runs on provider defaults.
fn coding_persona(claude: bool) -> Persona {
    let (name, lead, model) = if claude {
        (
            "Coding Agent (Claude)",
            "You are a coding specialist powered by Anthropic Claude. ",
            Some(ModelSettings {
                model: "gpt-4o".into(),
                temperature: 0.2,
                top_p: 0.95,
                max_tokens: 4000,
            }),
        )
    } else {
        ("Coding Agent", "You are a coding specialist. ", None)
    };
    Persona {
        id: PersonaId::Coding,
        name: name.into(),
        instructions: format!("{lead}{CODING_INSTRUCTIONS_BODY}"),
        tools: vec![
            ToolName::CreateFolder,
            ToolName::SaveTextToFile,
            ToolName::ListFiles,
        ],
        handoffs: vec![
            PersonaId::Research,
            PersonaId::WebSearch,
            PersonaId::DataManagement,
        ],
        model,
    }
}

fn web_search_persona() -> Persona {
    Persona {
        id: PersonaId::WebSearch,
        name: PersonaId::WebSearch.display_name().into(),
        instructions: WEB_SEARCH_INSTRUCTIONS.into(),
        tools: vec![
            ToolName::SearchWeb,
            ToolName::CreateFolder,
            ToolName::SaveTextToFile,
            ToolName::DownloadFile,
            ToolName::ListFiles,
        ],
        handoffs: vec![
            PersonaId::WebBrowsing,
            PersonaId::Coding,
            PersonaId::Research,
        ],
        model: None,
    }
}

fn web_browsing_persona() -> Persona {
    Persona {
        id: PersonaId::WebBrowsing,
        name: PersonaId::WebBrowsing.display_name().into(),
        instructions: WEB_BROWSING_INSTRUCTIONS.into(),
        tools: vec![
            ToolName::BrowseWebsiteWithContainer,
            ToolName::CreateFolder,
            ToolName::SaveTextToFile,
            ToolName::DownloadFile,
            ToolName::ListFiles,
        ],
        handoffs: vec![PersonaId::Coding, PersonaId::DataManagement],
        model: None,
    }
}

fn data_management_persona() -> Persona {
    Persona {
        id: PersonaId::DataManagement,
        name: PersonaId::DataManagement.display_name().into(),
        instructions: DATA_MANAGEMENT_INSTRUCTIONS.into(),
        tools: vec![
            ToolName::CreateFolder,
            ToolName::SaveTextToFile,
            ToolName::DownloadFile,
            ToolName::ListFiles,
        ],
        handoffs: vec![
            PersonaId::WebSearch,
            PersonaId::Coding,
            PersonaId::Research,
        ],
        model: None,
    }
}

/// The full persona roster. Built once at startup and validated so every
/// handoff edge points at a real entry and every persona is reachable from
/// the coordinator.
#[derive(Debug, Clone)]
pub struct PersonaCatalog {
    personas: Vec<Persona>,
}

impl PersonaCatalog {
    /// `claude_coding` selects the Claude-flavored coding persona when an
    /// Anthropic key is configured.
    pub fn new(claude_coding: bool) -> Result<Self, CatalogError> {
        let catalog = Self {
            personas: vec![
                admin_persona(),
                research_persona(),
                creative_persona(),
                coding_persona(claude_coding),
                web_search_persona(),
                web_browsing_persona(),
                data_management_persona(),
            ],
        };
        catalog.validate()?;
        Ok(catalog)
    }

    fn validate(&self) -> Result<(), CatalogError> {
        let mut seen = Vec::with_capacity(self.personas.len());
        for persona in &self.personas {
            if seen.contains(&persona.id) {
                return Err(CatalogError::Duplicate { id: persona.id });
            }
            if persona.handoffs.contains(&persona.id) {
                return Err(CatalogError::SelfHandoff { id: persona.id });
            }
            seen.push(persona.id);
        }
        for id in PersonaId::ALL {
            if !seen.contains(&id) {
                return Err(CatalogError::Missing { id });
            }
            if id != PersonaId::Admin {
                self.delegation_path(id)?;
            }
        }
        Ok(())
    }

    pub fn personas(&self) -> &[Persona] {
        &self.personas
    }

    pub fn get(&self, id: PersonaId) -> Option<&Persona> {
        self.personas.iter().find(|p| p.id == id)
    }

    /// Catalog display name for `id`. Honors the Claude coding variant.
    pub fn name_of(&self, id: PersonaId) -> &str {
        self.get(id).map_or(id.display_name(), |p| p.name.as_str())
    }

    /// Shortest handoff chain from the coordinator to `to`, both ends
    /// included. Neighbors are explored in declared handoff order, so ties
    /// resolve the same way every time.
    pub fn delegation_path(&self, to: PersonaId) -> Result<Vec<PersonaId>, CatalogError> {
        let from = PersonaId::Admin;
        if to == from {
            return Ok(vec![from]);
        }
        let mut predecessor: HashMap<PersonaId, PersonaId> = HashMap::new();
        let mut queue = VecDeque::from([from]);
        while let Some(current) = queue.pop_front() {
            let Some(persona) = self.get(current) else {
                continue;
            };
            for &next in &persona.handoffs {
                if next == from || predecessor.contains_key(&next) {
                    continue;
                }
                predecessor.insert(next, current);
                if next == to {
                    let mut path = vec![to];
                    let mut cursor = to;
                    while let Some(&prev) = predecessor.get(&cursor) {
                        path.push(prev);
                        cursor = prev;
                    }
                    path.reverse();
                    return Ok(path);
                }
                queue.push_back(next);
            }
        }
        Err(CatalogError::NoPath { from, to })
    }

    /// `delegation_path` mapped through catalog display names.
    pub fn delegation_path_names(&self, to: PersonaId) -> Result<Vec<String>, CatalogError> {
        Ok(self
            .delegation_path(to)?
            .into_iter()
            .map(|id| self.name_of(id).to_string())
            .collect())
    }
}
