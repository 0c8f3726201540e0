//! Welcome message synthesis.
//!
//! Every transcript opens with a client-side greeting that suggests a
//! few example questions. The greeting is never persisted: it is
//! regenerated locally whenever a session is opened or created.

use chatbi_core::Message;

/// Builds example questions for the welcome greeting.
///
/// When table names are known, one suggestion is produced per table (at
/// most three, in catalog order). Otherwise three generic BI questions
/// are used.
pub fn example_suggestions(table_names: &[String]) -> Vec<String> {
    if table_names.is_empty() {
        return vec![
            "What is the total order amount for every user?".to_string(),
            "How many sales were there per month?".to_string(),
            "What are the top 10 best-selling products?".to_string(),
        ];
    }
    table_names
        .iter()
        .take(3)
        .map(|name| format!("Show me the latest records in the {name} table"))
        .collect()
}

/// Builds the greeting shown at the top of a transcript.
pub fn welcome_message(table_names: &[String]) -> Message {
    let suggestions = example_suggestions(table_names);
    let mut content = String::from(
        "Welcome to ChatBI! Ask a question about your data in plain language \
         and I will translate it into SQL and run it for you.\n\nFor example:",
    );
    for suggestion in &suggestions {
        content.push_str("\n- ");
        content.push_str(suggestion);
    }
    Message::assistant(content)
}
