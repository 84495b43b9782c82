//! List command implementations

use anyhow::Result;
use ctf_core::{Category, DocumentFormat, RuleKind};

const CATEGORIES: [Category; 6] = [
    Category::Universal,
    Category::Normalization,
    Category::EmDash,
    Category::Quotes,
    Category::Spacing,
    Category::Cleanup,
];

/// Print the built-in rules grouped by category
pub fn list_rules() -> Result<()> {
    print!("{}", render_rules());
    Ok(())
}

/// Print the document formats and their extensions
pub fn list_formats() -> Result<()> {
    print!("{}", render_formats());
    Ok(())
}

fn default_label(kind: RuleKind) -> &'static str {
    match (kind.is_numeric(), kind.default_enabled()) {
        (true, _) => "0",
        (false, true) => "on",
        (false, false) => "off",
    }
}

fn render_rules() -> String {
    let width = RuleKind::ALL
        .iter()
        .map(|kind| kind.name().len())
        .max()
        .unwrap_or(0);

    let mut out = String::from("Built-in rules:\n");
    for category in CATEGORIES {
        out.push_str(&format!("\n{}:\n", category.label()));
        for kind in RuleKind::ALL.into_iter().filter(|k| k.category() == category) {
            out.push_str(&format!(
                "  {:<width$}  [default: {:<3}]  {}\n",
                kind.name(),
                default_label(kind),
                kind.description(),
            ));
        }
    }
    out.push_str("\nCustom rules from configuration files run after all built-in rules.\n");
    out
}

fn render_formats() -> String {
    let mut out = String::from("Document formats:\n");
    for format in DocumentFormat::ALL {
        let extensions: Vec<String> = format
            .extensions()
            .iter()
            .map(|ext| format!(".{ext}"))
            .collect();
        out.push_str(&format!("  {:<9} {}\n", format.name(), extensions.join(", ")));
    }
    out.push_str("\nOther extensions and stdin are treated as plain text.\n");
    out
}
