use crate::config::Config;
use anyhow::Result;
use colored::Colorize;
use folio_compiler_html::{BackgroundCatalog, PlatformProfile};

pub fn profiles(cwd: &str) -> Result<()> {
    let config = Config::load(cwd)?;

    println!("{}", "Profiles".bright_blue().bold());
    for profile in PlatformProfile::builtin() {
        let marker = if profile.name == config.default_profile { "*" } else { " " };
        println!(
            " {} {} {}",
            marker.green(),
            profile.name.bright_white().bold(),
            format!("({} tag styles)", profile.tag_styles.len()).dimmed()
        );
    }
    for (name, layer) in &config.profiles {
        let marker = if *name == config.default_profile { "*" } else { " " };
        let base = layer.extends.as_deref().unwrap_or(name);
        println!(
            " {} {} {}",
            marker.green(),
            name.bright_white().bold(),
            format!("(extends {})", base).dimmed()
        );
    }

    println!();
    println!("{}", "Backgrounds".bright_blue().bold());
    for (name, descriptor) in BackgroundCatalog::builtin().iter() {
        let properties: Vec<&str> = descriptor
            .declarations()
            .into_iter()
            .map(|(property, _)| property)
            .collect();
        println!(
            "   {} {}",
            name.bright_white().bold(),
            properties.join(", ").dimmed()
        );
    }

    Ok(())
}
