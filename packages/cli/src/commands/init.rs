use crate::config::{Config, DEFAULT_CONFIG_NAME};
use anyhow::{anyhow, Result};
use clap::Args;
use colored::Colorize;
use folio_compiler_html::PlatformProfile;
use std::fs;
use std::path::PathBuf;

#[derive(Debug, Args)]
pub struct InitArgs {
    /// Default export profile
    #[arg(short, long, default_value = "wechat")]
    pub profile: String,

    /// Export output directory
    #[arg(short, long, default_value = "dist")]
    pub out_dir: String,

    /// Force overwrite existing config
    #[arg(short, long)]
    pub force: bool,
}

pub fn init(args: InitArgs, cwd: &str) -> Result<()> {
    let config_path = PathBuf::from(cwd).join(DEFAULT_CONFIG_NAME);

    if config_path.exists() && !args.force {
        println!(
            "{} {} already exists",
            "⚠️".yellow(),
            DEFAULT_CONFIG_NAME.bright_white()
        );
        println!("Use --force to overwrite");
        return Ok(());
    }

    if PlatformProfile::by_name(&args.profile).is_none() {
        return Err(anyhow!("Unknown profile: {}", args.profile));
    }

    println!("{}", "📝 Initializing Folio project...".bright_blue().bold());

    let example_file = PathBuf::from(cwd).join("article.html");
    if !example_file.exists() {
        let example_content = r#"<h1>My first article</h1>
<p>Write here. <span style="color: #2563eb; font-weight: bold">Runs</span> carry their own style.</p>
<div style="padding: 24px; border-radius: 12px; border: 2px solid #f1f5f9; background-color: #f8fafc">
  <p>Containers group blocks.</p>
</div>
"#;
        fs::write(&example_file, example_content)?;
        println!("  {} Created article.html", "✓".green());
    }

    let config = Config {
        default_profile: args.profile.clone(),
        out_dir: args.out_dir.clone(),
        ..Config::default()
    };

    let config_json = serde_json::to_string_pretty(&config)?;
    fs::write(&config_path, config_json)?;

    println!("  {} Created {}", "✓".green(), DEFAULT_CONFIG_NAME);
    println!();
    println!("{}", "✅ Project initialized!".green().bold());
    println!();
    println!("Next steps:");
    println!("  1. Edit article.html");
    println!("  2. Run: folio export article.html");
    println!("  3. Check output in {}/", args.out_dir);

    Ok(())
}
