use serde::{Deserialize, Serialize};

/// Stable identifier for each persona in the catalog.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PersonaId {
    Admin,
    Research,
    Creative,
    Coding,
    WebSearch,
    WebBrowsing,
    DataManagement,
}

impl PersonaId {
    pub const ALL: [PersonaId; 7] = [
        PersonaId::Admin,
        PersonaId::Research,
        PersonaId::Creative,
        PersonaId::Coding,
        PersonaId::WebSearch,
        PersonaId::WebBrowsing,
        PersonaId::DataManagement,
    ];

    /// Display name used in chat responses and delegation paths.
    ///
    /// The coding persona may carry a variant name in its catalog entry;
    /// this is the base name.
    pub fn display_name(self) -> &'static str {
        match self {
            PersonaId::Admin => "Admin Agent",
            PersonaId::Research => "Research Agent",
            PersonaId::Creative => "Creative Agent",
            PersonaId::Coding => "Coding Agent",
            PersonaId::WebSearch => "Web Search Agent",
            PersonaId::WebBrowsing => "Web Browsing Agent",
            PersonaId::DataManagement => "Data Management Agent",
        }
    }
}

impl std::fmt::Display for PersonaId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.display_name())
    }
}

/// Tools a persona is allowed to invoke.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ToolName {
    CreateFolder,
    SaveTextToFile,
    DownloadFile,
    ListFiles,
    SearchWeb,
    BrowseWebsiteWithContainer,
}

impl ToolName {
    pub fn as_str(self) -> &'static str {
        match self {
            ToolName::CreateFolder => "create_folder",
            ToolName::SaveTextToFile => "save_text_to_file",
            ToolName::DownloadFile => "download_file",
            ToolName::ListFiles => "list_files",
            ToolName::SearchWeb => "search_web",
            ToolName::BrowseWebsiteWithContainer => "browse_website_with_container",
        }
    }
}

impl std::fmt::Display for ToolName {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Sampling settings pinned on a persona. Only set where the catalog
/// deliberately overrides provider defaults.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ModelSettings {
    pub model: String,
    pub temperature: f64,
    pub top_p: f64,
    pub max_tokens: u32,
}

/// A catalog entry: one specialized agent, its system instructions, the
/// tools it may call, and the personas it can hand a task off to.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Persona {
    pub id: PersonaId,
    pub name: String,
    pub instructions: String,
    pub tools: Vec<ToolName>,
    pub handoffs: Vec<PersonaId>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub model: Option<ModelSettings>,
}
