//! Portfolio content: biography, skills, experience, education, projects.

use serde::{Deserialize, Serialize};
use std::path::Path;
use tracing::{debug, warn};

/// A named group of skills, e.g. "Languages".
#[derive(Debug, Clone, PartialEq, Eq, Default, Deserialize, Serialize)]
#[serde(default)]
pub struct SkillGroup {
    pub category: String,
    pub items: Vec<String>,
}

/// One position held.
#[derive(Debug, Clone, PartialEq, Eq, Default, Deserialize, Serialize)]
#[serde(default)]
pub struct Experience {
    pub role: String,
    pub company: String,
    pub period: String,
    pub highlights: Vec<String>,
}

/// One degree or course of study.
#[derive(Debug, Clone, PartialEq, Eq, Default, Deserialize, Serialize)]
#[serde(default)]
pub struct Education {
    pub institution: String,
    pub degree: String,
    pub period: String,
    pub notes: Option<String>,
}

/// A showcased project.
#[derive(Debug, Clone, PartialEq, Eq, Default, Deserialize, Serialize)]
#[serde(default)]
pub struct Project {
    pub name: String,
    pub summary: String,
    pub tech: Vec<String>,
    pub link: Option<String>,
}

/// Everything the portfolio shows about its owner.
///
/// Only `name` is required in a profile file. Missing sections stay empty
/// rather than being filled from the built-in sample.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct Profile {
    pub name: String,
    #[serde(default)]
    pub headline: String,
    #[serde(default)]
    pub location: String,
    #[serde(default)]
    pub email: String,
    /// Biography paragraphs
    #[serde(default)]
    pub bio: Vec<String>,
    #[serde(default)]
    pub skills: Vec<SkillGroup>,
    #[serde(default)]
    pub experience: Vec<Experience>,
    #[serde(default)]
    pub education: Vec<Education>,
    #[serde(default)]
    pub projects: Vec<Project>,
}

impl Default for Profile {
    fn default() -> Self {
        Self {
            name: "Alex Morgan".to_string(),
            headline: "Software engineer building reliable products".to_string(),
            location: "Remote".to_string(),
            email: "alex@example.com".to_string(),
            bio: vec![
                "I design and build web platforms end to end, from data models to the last pixel."
                    .to_string(),
                "Lately I have been helping small teams turn vague business problems into focused, shippable projects."
                    .to_string(),
            ],
            skills: vec![
                SkillGroup {
                    category: "Languages".to_string(),
                    items: vec!["Rust".into(), "TypeScript".into(), "Python".into(), "SQL".into()],
                },
                SkillGroup {
                    category: "Platforms".to_string(),
                    items: vec!["PostgreSQL".into(), "AWS".into(), "Docker".into()],
                },
                SkillGroup {
                    category: "Practices".to_string(),
                    items: vec!["API design".into(), "Observability".into(), "Mentoring".into()],
                },
            ],
            experience: vec![
                Experience {
                    role: "Senior Engineer".to_string(),
                    company: "Northwind Labs".to_string(),
                    period: "2021 - present".to_string(),
                    highlights: vec![
                        "Led the rewrite of the billing pipeline".to_string(),
                        "Cut p95 checkout latency by 40%".to_string(),
                    ],
                },
                Experience {
                    role: "Full-stack Developer".to_string(),
                    company: "Contoso Studio".to_string(),
                    period: "2017 - 2021".to_string(),
                    highlights: vec!["Shipped client projects across retail and health".to_string()],
                },
            ],
            education: vec![Education {
                institution: "State University".to_string(),
                degree: "B.Sc. Computer Science".to_string(),
                period: "2013 - 2017".to_string(),
                notes: None,
            }],
            projects: vec![
                Project {
                    name: "Ledgerline".to_string(),
                    summary: "Double-entry ledger service for marketplaces.".to_string(),
                    tech: vec!["Rust".into(), "PostgreSQL".into()],
                    link: Some("https://example.com/ledgerline".to_string()),
                },
                Project {
                    name: "Pitchcraft".to_string(),
                    summary: "Turns a business problem into a streamed project pitch.".to_string(),
                    tech: vec!["TypeScript".into(), "LLM APIs".into()],
                    link: None,
                },
            ],
        }
    }
}

impl Profile {
    /// Load a profile from a TOML file.
    pub fn load_from_path(path: impl AsRef<Path>) -> anyhow::Result<Self> {
        let contents = std::fs::read_to_string(path)?;
        let profile: Profile = toml::from_str(&contents)?;
        Ok(profile)
    }

    /// Load the profile at `path`, falling back to the built-in sample.
    pub fn load_or_default(path: Option<&Path>) -> Self {
        let Some(path) = path else {
            return Self::default();
        };

        if !path.exists() {
            debug!(path = %path.display(), "no profile file, using sample profile");
            return Self::default();
        }

        match Self::load_from_path(path) {
            Ok(profile) => profile,
            Err(e) => {
                warn!(path = %path.display(), error = %e, "invalid profile file, using sample profile");
                Self::default()
            }
        }
    }

    /// A `mailto:` URL for contacting the profile owner.
    pub fn contact_url(&self, subject: &str) -> Option<String> {
        let email = self.email.trim();
        if email.is_empty() {
            return None;
        }
        Some(format!(
            "mailto:{}?subject={}",
            email,
            urlencoding::encode(subject)
        ))
    }
}
