use serde::{de::DeserializeOwned, Serialize};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum FrontmatterError {
    #[error("Invalid frontmatter format: {0}")]
    InvalidFormat(String),
    #[error("YAML error: {0}")]
    YamlError(#[from] serde_yaml::Error),
}

/// Split a document into its frontmatter YAML and the remaining lines.
fn split_document(content: &str) -> Result<(String, Vec<&str>), FrontmatterError> {
    let lines: Vec<&str> = content.lines().collect();
    if lines.first() != Some(&"---") {
        return Err(FrontmatterError::InvalidFormat(
            "Content must start with '---'".to_string(),
        ));
    }
    let end_idx = lines
        .iter()
        .skip(1)
        .position(|&line| line == "---")
        .ok_or_else(|| {
            FrontmatterError::InvalidFormat("Missing closing '---' for frontmatter".to_string())
        })?;
    let yaml = lines.get(1..=end_idx).unwrap_or(&[]).join("\n");
    let rest = lines
        .get(end_idx.saturating_add(2)..)
        .unwrap_or(&[])
        .iter()
        .skip_while(|line| line.is_empty())
        .copied()
        .collect();
    Ok((yaml, rest))
}

/// Parse a Markdown document with YAML frontmatter.
///
/// Returns the metadata, the H1 title (empty if absent) and the body.
///
/// ```markdown
/// ---
/// order: 2
/// isActive: true
/// ---
///
/// # web-design
///
/// Body...
/// ```
pub fn parse_frontmatter<T: DeserializeOwned>(
    content: &str,
) -> Result<(T, String, String), FrontmatterError> {
    let (yaml, rest) = split_document(content)?;
    let metadata: T = serde_yaml::from_str(&yaml)?;
    let heading = rest.first().and_then(|line| line.strip_prefix("# ")).map(str::to_string);
    let (title, body_lines) = match heading {
        Some(title) => (
            title,
            rest.iter()
                .skip(1)
                .skip_while(|line| line.is_empty())
                .copied()
                .collect::<Vec<_>>(),
        ),
        None => (String::new(), rest),
    };
    let body = body_lines.join("\n").trim_end().to_string();
    Ok((metadata, title, body))
}

/// Render metadata, title and body back into a Markdown document.
pub fn generate_frontmatter<T: Serialize>(
    metadata: &T,
    title: &str,
    body: &str,
) -> Result<String, FrontmatterError> {
    let yaml = serde_yaml::to_string(metadata)?;
    let yaml = yaml.trim_end();
    if body.is_empty() {
        Ok(format!("---\n{yaml}\n---\n\n# {title}\n"))
    } else {
        Ok(format!("---\n{yaml}\n---\n\n# {title}\n\n{body}\n"))
    }
}
