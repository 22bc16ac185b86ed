use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Stable identifier of an employer in the catalog
pub type EmployerId = i64;

/// A single job posting and the technologies it asks for
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct JobPosting {
    pub id: i64,
    pub employer_id: EmployerId,
    pub tech_stack: Vec<String>,
    pub deadline: Option<DateTime<Utc>>,
}

impl JobPosting {
    pub fn new(id: i64, employer_id: EmployerId, tech_stack: &[&str]) -> Self {
        Self {
            id,
            employer_id,
            tech_stack: tech_stack.iter().map(|t| t.to_string()).collect(),
            deadline: None,
        }
    }

    /// Space-joined tech stack, skipping blank entries
    pub fn tech_text(&self) -> String {
        self.tech_stack
            .iter()
            .map(|t| t.trim())
            .filter(|t| !t.is_empty())
            .collect::<Vec<_>>()
            .join(" ")
    }
}

/// An employer with its postings
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Employer {
    pub id: EmployerId,
    pub name: String,
    /// Logo file name as stored by the scraper
    pub logo: Option<String>,
    pub postings: Vec<JobPosting>,
}

impl Employer {
    pub fn new(id: EmployerId, name: &str) -> Self {
        Self {
            id,
            name: name.to_string(),
            logo: None,
            postings: Vec::new(),
        }
    }

    /// Adds a posting owned by this employer
    pub fn with_posting(mut self, posting_id: i64, tech_stack: &[&str]) -> Self {
        self.postings
            .push(JobPosting::new(posting_id, self.id, tech_stack));
        self
    }

    pub fn with_logo(mut self, logo: &str) -> Self {
        self.logo = Some(logo.to_string());
        self
    }
}
