//! Rules command - list the active extraction rules.

use console::style;

pub fn run(config_path: Option<&str>) -> anyhow::Result<()> {
    let config = super::load_config(config_path)?;

    println!("{}", style("Extraction rules (column order):").bold());
    for (i, rule) in config.rules.iter().enumerate() {
        println!(
            "{:>3}. {} {}",
            i + 1,
            rule.label,
            style(format!("[{}]", rule.key)).dim()
        );
    }

    Ok(())
}
