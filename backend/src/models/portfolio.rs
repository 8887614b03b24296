use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;
use tokio::fs;

/// Page content shown around the widgets.
///
/// Every section is optional in the source file so a partial file still loads.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Portfolio {
    pub name: String,
    pub headline: String,
    /// Paragraphs of the "about" section
    pub about: Vec<String>,
    pub education: Vec<Education>,
    pub skills: Vec<SkillGroup>,
    pub projects: Vec<Project>,
    pub certificates: Vec<Certificate>,
    pub organizations: Vec<Organization>,
    pub contact: Vec<ContactLink>,
    /// Path of the downloadable resume under the static directory
    pub resume_path: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Education {
    pub degree: String,
    pub institution: String,
    pub year: String,
    pub location: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SkillGroup {
    pub title: String,
    #[serde(default)]
    pub description: Option<String>,
    pub skills: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Project {
    pub title: String,
    pub description: String,
    #[serde(default)]
    pub technologies: Vec<String>,
    #[serde(default)]
    pub image: Option<String>,
    #[serde(default)]
    pub link: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Certificate {
    pub title: String,
    pub issuer: String,
    #[serde(default)]
    pub year: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Organization {
    pub name: String,
    pub role: String,
    #[serde(default)]
    pub courses: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ContactLink {
    pub label: String,
    pub href: String,
}

impl Portfolio {
    /// Load portfolio content from a JSON file
    pub async fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let content = fs::read_to_string(path)
            .await
            .with_context(|| format!("Failed to read {}", path.display()))?;
        let portfolio = Self::from_json(&content)?;

        tracing::info!(
            "Loaded portfolio for {} ({} projects, {} certificates)",
            portfolio.name,
            portfolio.projects.len(),
            portfolio.certificates.len()
        );

        Ok(portfolio)
    }

    pub fn from_json(content: &str) -> Result<Self> {
        serde_json::from_str(content).context("Portfolio file is not valid JSON")
    }

    /// Create an empty portfolio (used when no content file is available)
    pub fn empty() -> Self {
        Self::default()
    }

    /// Section anchors in page order, skipping sections with no content
    pub fn sections(&self) -> Vec<&'static str> {
        let mut sections = Vec::new();
        if !self.about.is_empty() {
            sections.push("about");
        }
        if !self.education.is_empty() {
            sections.push("education");
        }
        if !self.skills.is_empty() {
            sections.push("skills");
        }
        if !self.projects.is_empty() {
            sections.push("projects");
        }
        if !self.certificates.is_empty() {
            sections.push("certificates");
        }
        if !self.organizations.is_empty() {
            sections.push("organizations");
        }
        if !self.contact.is_empty() {
            sections.push("contact");
        }
        sections
    }
}
