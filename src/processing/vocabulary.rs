//! Skill vocabulary and role priority skills

/// Known technical skills, used only for presence detection in job descriptions.
pub const COMMON_TECH_SKILLS: &[&str] = &[
    "python", "java", "c++", "machine learning", "deep learning",
    "data analysis", "nlp", "computer vision",
    "tensorflow", "pytorch", "scikit-learn",
    "docker", "kubernetes", "mlops",
    "cloud", "aws", "gcp", "azure",
    "api", "rest api", "flask", "fastapi",
    "sql", "nosql", "mongodb", "postgresql",
    "data structures", "algorithms",
    "html", "css", "javascript", "react", "node.js",
    "statistics", "visualization", "excel",
];

/// Skills weighted double for a role.
pub const ROLE_PRIORITY_SKILLS: &[(&str, &[&str])] = &[
    (
        "ML Engineer",
        &[
            "machine learning", "deep learning", "model deployment",
            "api", "flask", "fastapi", "docker",
        ],
    ),
    (
        "Data Scientist",
        &[
            "data analysis", "statistics", "machine learning",
            "pandas", "numpy", "visualization",
        ],
    ),
    (
        "Data Analyst",
        &["sql", "data analysis", "excel", "pandas", "visualization"],
    ),
    (
        "Software Engineer",
        &["data structures", "algorithms", "api", "system design"],
    ),
    (
        "Backend Developer",
        &["api", "sql", "database", "flask", "fastapi"],
    ),
];

/// Label used when the user picks "Other" without naming a role
pub const OTHER_ROLE: &str = "Other";

/// Priority skills for a role label. Unknown roles have none.
pub fn role_priority_skills(role: &str) -> Vec<String> {
    ROLE_PRIORITY_SKILLS
        .iter()
        .find(|(name, _)| *name == role)
        .map(|(_, skills)| skills.iter().map(|s| s.to_string()).collect())
        .unwrap_or_default()
}

/// Role labels with a priority skill set, in display order
pub fn known_roles() -> impl Iterator<Item = &'static str> {
    ROLE_PRIORITY_SKILLS.iter().map(|(name, _)| *name)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_vocabulary_is_lowercase_and_unique() {
        let unique: HashSet<_> = COMMON_TECH_SKILLS.iter().collect();
        assert_eq!(unique.len(), COMMON_TECH_SKILLS.len());
        for skill in COMMON_TECH_SKILLS {
            assert_eq!(*skill, skill.to_lowercase());
        }
    }

    #[test]
    fn test_role_lookup() {
        assert_eq!(
            role_priority_skills("Data Analyst"),
            vec!["sql", "data analysis", "excel", "pandas", "visualization"]
        );
        assert!(role_priority_skills("Astronaut").is_empty());
        assert!(role_priority_skills(OTHER_ROLE).is_empty());
        assert_eq!(known_roles().count(), 5);
    }
}
