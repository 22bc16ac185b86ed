use crate::models::{Employer, EmployerId};

/// Profile text for one employer: its postings' technologies, or its name
pub fn employer_profile_text(employer: &Employer) -> String {
    let joined = employer
        .postings
        .iter()
        .map(|posting| posting.tech_text())
        .filter(|text| !text.is_empty())
        .collect::<Vec<_>>()
        .join(" ");

    if joined.trim().is_empty() {
        employer.name.clone()
    } else {
        joined
    }
}

/// Profile texts for the whole catalog, in catalog order
pub fn build_employer_profiles(employers: &[Employer]) -> Vec<(EmployerId, String)> {
    employers
        .iter()
        .map(|employer| (employer.id, employer_profile_text(employer)))
        .collect()
}
