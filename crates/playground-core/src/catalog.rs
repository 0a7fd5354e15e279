use playground_client::{ExecutionClient, LanguageDescriptor};

use crate::errors::PlaygroundError;

/// Languages offered by the service, ordered by name
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LanguageCatalog {
    languages: Vec<LanguageDescriptor>,
}

impl LanguageCatalog {
    /// Issue the one languages request of a session
    pub async fn load(client: &dyn ExecutionClient) -> Result<Self, PlaygroundError> {
        let languages = client.list_languages().await?;
        log::info!("Loaded {} languages", languages.len());
        Ok(Self::from_languages(languages))
    }

    pub fn from_languages(mut languages: Vec<LanguageDescriptor>) -> Self {
        languages.sort_by(|a, b| a.name.cmp(&b.name));
        Self { languages }
    }

    pub fn languages(&self) -> &[LanguageDescriptor] {
        &self.languages
    }

    pub fn len(&self) -> usize {
        self.languages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.languages.is_empty()
    }

    /// First language by name
    pub fn default_language(&self) -> Option<&LanguageDescriptor> {
        self.languages.first()
    }

    pub fn find_by_id(&self, id: i64) -> Option<&LanguageDescriptor> {
        self.languages.iter().find(|language| language.id == id)
    }

    pub fn find_by_name(&self, name: &str) -> Option<&LanguageDescriptor> {
        let name = name.trim();
        self.languages
            .iter()
            .find(|language| language.name.eq_ignore_ascii_case(name))
    }

    /// A numeric query is tried as an id first, then as a name
    pub fn resolve(&self, query: &str) -> Result<&LanguageDescriptor, PlaygroundError> {
        query
            .trim()
            .parse::<i64>()
            .ok()
            .and_then(|id| self.find_by_id(id))
            .or_else(|| self.find_by_name(query))
            .ok_or_else(|| PlaygroundError::UnknownLanguage(query.to_string()))
    }
}
