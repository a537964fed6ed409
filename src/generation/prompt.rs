use super::ExistingFile;

const REQUIREMENTS: &str = "\
- Produce complete, working code that can be used as-is
- Include appropriate error handling
- Follow the conventions and best practices of the target language";

/// Builds the prompt sent to the model for one task.
///
/// Existing output files are quoted between the project background and the
/// task so the model edits them instead of starting over.
pub fn build_prompt(description: &str, context: &str, existing_files: &[ExistingFile]) -> String {
    let context = context.trim();
    let mut prompt = String::new();

    if !context.is_empty() {
        prompt.push_str(&format!("Project background: {context}\n\n"));
    }

    if !existing_files.is_empty() {
        prompt.push_str("Existing code:\n");
        for file in existing_files {
            prompt.push_str(&format!(
                "\n### {}\n```\n{}\n```\n",
                file.path.display(),
                file.content
            ));
        }
        prompt.push_str("\nEdit and improve the existing code above according to the task.\n\n");
    }

    prompt.push_str(&format!(
        "Task: {description}\n\n\
         Generate code that satisfies the following requirements:\n"
    ));
    if !context.is_empty() {
        prompt.push_str("- Take the project background into account\n");
    }
    prompt.push_str(REQUIREMENTS);
    prompt.push_str("\n\nOutput only the code, with no explanation:");
    prompt
}

/// Removes a markdown code fence wrapping the whole response.
///
/// Only a leading line starting with ```` ``` ```` and a trailing line equal to
/// ```` ``` ```` are removed, and only when the response has more than two lines.
pub fn strip_code_fences(content: &str) -> String {
    let mut lines: Vec<&str> = content.split('\n').collect();
    if lines.len() <= 2 {
        return content.to_string();
    }

    if lines[0].starts_with("```") {
        lines.remove(0);
    }
    if lines.last().is_some_and(|last| last.trim() == "```") {
        lines.pop();
    }
    lines.join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_prompt_without_context() {
        let prompt = build_prompt("write a fibonacci function", "   ", &[]);
        assert!(prompt.starts_with("Task: write a fibonacci function"));
        assert!(!prompt.contains("Project background"));
        assert!(prompt.ends_with("Output only the code, with no explanation:"));
    }

    #[test]
    fn test_prompt_with_context() {
        let prompt = build_prompt("add a handler", "Go service using chi", &[]);
        assert!(prompt.starts_with("Project background: Go service using chi"));
        assert!(prompt.contains("Task: add a handler"));
        assert!(prompt.contains("Take the project background into account"));
        assert!(!prompt.contains("Existing code"));
    }

    #[test]
    fn test_prompt_quotes_existing_files_before_the_task() {
        let existing = vec![
            ExistingFile {
                path: "src/main.rs".into(),
                content: "fn main() {}".to_string(),
            },
            ExistingFile {
                path: "src/lib.rs".into(),
                content: "pub mod app;".to_string(),
            },
        ];
        let prompt = build_prompt("add logging", "CLI tool", &existing);

        assert!(prompt.starts_with("Project background: CLI tool\n\nExisting code:\n"));
        assert!(prompt.contains("\n### src/main.rs\n```\nfn main() {}\n```\n"));
        assert!(prompt.contains("\n### src/lib.rs\n```\npub mod app;\n```\n"));

        let existing_at = prompt.find("Existing code:").unwrap();
        let instruction_at = prompt
            .find("Edit and improve the existing code above according to the task.")
            .unwrap();
        let task_at = prompt.find("Task: add logging").unwrap();
        assert!(existing_at < instruction_at && instruction_at < task_at);
        assert!(prompt.ends_with("Output only the code, with no explanation:"));
    }

    #[test]
    fn test_prompt_with_existing_files_and_no_context() {
        let existing = vec![ExistingFile {
            path: "a.py".into(),
            content: "print(1)".to_string(),
        }];
        let prompt = build_prompt("refactor", "", &existing);
        assert!(prompt.starts_with("Existing code:\n"));
        assert!(!prompt.contains("Project background"));
    }

    #[test]
    fn test_strip_code_fences() {
        assert_eq!(
            strip_code_fences("```rust\nfn main() {}\n```"),
            "fn main() {}"
        );
        assert_eq!(
            strip_code_fences("```\nline1\nline2\n```  "),
            "line1\nline2"
        );
        // Unfenced content is untouched
        assert_eq!(strip_code_fences("a\nb\nc"), "a\nb\nc");
    }

    #[test]
    fn test_strip_code_fences_leaves_short_responses() {
        assert_eq!(strip_code_fences("```x```"), "```x```");
        assert_eq!(strip_code_fences("```\n```"), "```\n```");
        assert_eq!(strip_code_fences(""), "");
    }

    #[test]
    fn test_strip_code_fences_with_only_opening_fence() {
        assert_eq!(
            strip_code_fences("```python\nprint(1)\nprint(2)"),
            "print(1)\nprint(2)"
        );
    }
}
