//! Formatting text and documents with the library API

use ctf_core::{
    protect_and_transform, transform_verbose, ConfigLayer, DocumentFormat, RuleConfig,
};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Example 1: default rules on literal text
    println!("=== Example 1: Literal Text ===");
    let config = RuleConfig::default();
    let text = "在2024年,我们使用Rust开发了CLI工具--性能提升50%.";
    let (formatted, stats) = transform_verbose(text, &config);

    println!("Input:  {text}");
    println!("Output: {formatted}");
    println!("{}", stats.format_summary());

    // Example 2: markdown with code that must not change
    println!("\n=== Example 2: Markdown Document ===");
    let doc = "使用`cargo--help`查看帮助--很方便\n\n```\necho a--b\n```\n";
    let out = protect_and_transform(doc, DocumentFormat::Markdown, &config)?;
    print!("{out}");

    // Example 3: configuration layered on the defaults
    println!("\n=== Example 3: Custom Configuration ===");
    let layer = ConfigLayer::from_toml_str(
        r#"
        [rules]
        fullwidth_brackets = true

        [[custom_rules]]
        name = "arrow"
        pattern = '->'
        replacement = '→'
        "#,
    )?;
    let mut custom = RuleConfig::default();
    let report = custom.merge(&layer)?;
    for warning in &report.warnings {
        println!("warning: {warning}");
    }

    let (formatted, stats) = transform_verbose("见[注释]: A->B", &custom);
    println!("Output: {formatted}");
    println!("{}", stats.format_summary());

    Ok(())
}
