//! Prompt composition for document-grounded questions.

use regdoc_core::models::UserRole;

/// Instruction block describing the caller's scope to the model.
pub fn system_prompt(region: &str, role: UserRole) -> String {
    let access_level = match role {
        UserRole::SuperAdmin => "All regions",
        UserRole::RegionalAdmin => "Regional only",
    };

    format!(
        "You are an AI assistant for the Bureau of Treasury document management system.

User Context:
- Region: {region}
- Role: {role}
- Access Level: {access_level}

Instructions:
- Provide helpful, accurate responses about treasury documents
- Use professional, government-appropriate language
- If document content is provided, base your answer on that content
- For super-admin users, provide cross-regional insights when relevant
- For regional users, focus on their specific region
- Always maintain confidentiality and security protocols",
        region = region,
        role = role.as_tag(),
        access_level = access_level,
    )
}

/// User turn: the raw question, or the question wrapped with document text.
pub fn user_prompt(question: &str, document_text: &str) -> String {
    if document_text.is_empty() {
        return question.to_string();
    }

    format!(
        "Document Content: {}\n\nUser Question: {}\n\nPlease analyze the document and provide a comprehensive answer.",
        document_text, question
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn super_admin_gets_all_regions_access_line() {
        let prompt = system_prompt("ALL", UserRole::SuperAdmin);
        assert!(prompt.contains("- Region: ALL"));
        assert!(prompt.contains("- Role: super-admin"));
        assert!(prompt.contains("- Access Level: All regions"));
    }

    #[test]
    fn regional_admin_gets_regional_only_line() {
        let prompt = system_prompt("REGION-7", UserRole::RegionalAdmin);
        assert!(prompt.contains("- Region: REGION-7"));
        assert!(prompt.contains("- Role: admin"));
        assert!(prompt.contains("- Access Level: Regional only"));
        assert!(prompt.starts_with("You are an AI assistant for the Bureau of Treasury"));
    }

    #[test]
    fn empty_document_sends_raw_question() {
        assert_eq!(user_prompt("What is due?", ""), "What is due?");
    }

    #[test]
    fn document_text_wraps_question() {
        assert_eq!(
            user_prompt("Total?", "Budget: 5"),
            "Document Content: Budget: 5\n\nUser Question: Total?\n\nPlease analyze the document and provide a comprehensive answer."
        );
    }
}
