use crate::config::{background, Config};
use anyhow::{anyhow, Result};
use clap::Args;
use colored::Colorize;
use folio_compiler_html::{export as export_html, PlatformProfile};
use folio_editor::Document;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::debug;
use walkdir::WalkDir;

#[derive(Debug, Args)]
pub struct ExportArgs {
    /// Article .html file or directory
    pub input: PathBuf,

    /// Platform profile (overrides config)
    #[arg(short, long)]
    pub profile: Option<String>,

    /// Background preset for the shell
    #[arg(short, long)]
    pub background: Option<String>,

    /// Output to stdout instead of files
    #[arg(long)]
    pub stdout: bool,

    /// Output directory (overrides config)
    #[arg(short, long)]
    pub out_dir: Option<String>,
}

pub fn export(args: ExportArgs, cwd: &str) -> Result<()> {
    let config = Config::load(cwd)?;

    let profile_name = args.profile.as_deref().unwrap_or(&config.default_profile);
    let mut profile = config.profile(profile_name)?;
    if let Some(preset) = &args.background {
        profile = profile.with_background(background(preset)?);
    }

    let out_dir = match &args.out_dir {
        Some(out) => PathBuf::from(cwd).join(out),
        None => config.get_out_dir(cwd),
    };

    let input = PathBuf::from(cwd).join(&args.input);
    let (root, files) = if input.is_file() {
        let root = input.parent().map(Path::to_path_buf).unwrap_or_default();
        (root, vec![input.clone()])
    } else if input.is_dir() {
        let files = find_html_files(&input, &out_dir);
        (input.clone(), files)
    } else {
        return Err(anyhow!("Input path does not exist: {}", input.display()));
    };

    if !args.stdout {
        println!(
            "{}",
            format!("📤 Exporting for {}...", profile.name).bright_blue().bold()
        );
    }

    if files.is_empty() {
        println!("{}", "⚠️  No .html files found".yellow());
        return Ok(());
    }

    let mut success_count = 0;
    let mut error_count = 0;

    for file in &files {
        let relative_path = file.strip_prefix(&root).unwrap_or(file);
        match export_file(file, relative_path, &profile, &out_dir, args.stdout) {
            Ok(output) => {
                success_count += 1;
                if !args.stdout {
                    println!("  {} {} → {}", "✓".green(), relative_path.display(), output);
                }
            }
            Err(e) => {
                error_count += 1;
                eprintln!(
                    "  {} {} - {}",
                    "✗".red(),
                    relative_path.display(),
                    e.to_string().red()
                );
            }
        }
    }

    if args.stdout {
        return Ok(());
    }

    println!();
    if error_count == 0 {
        println!("{} Exported {} files successfully", "✅".green(), success_count);
    } else {
        println!(
            "{} Exported {} files, {} errors",
            "⚠️".yellow(),
            success_count,
            error_count
        );
    }

    Ok(())
}

fn find_html_files(dir: &Path, out_dir: &Path) -> Vec<PathBuf> {
    WalkDir::new(dir)
        .follow_links(true)
        .into_iter()
        .filter_map(|e| e.ok())
        .map(|entry| entry.into_path())
        .filter(|path| path.extension().and_then(|s| s.to_str()) == Some("html"))
        .filter(|path| !path.starts_with(out_dir))
        .collect()
}

fn export_file(
    file_path: &Path,
    relative_path: &Path,
    profile: &PlatformProfile,
    out_dir: &Path,
    stdout: bool,
) -> Result<String> {
    let source = fs::read_to_string(file_path)?;
    let document = Document::from_html(file_path, &source);
    let output = export_html(&document.to_html(), profile);
    debug!(file = %file_path.display(), bytes = output.len(), "Exported");

    if stdout {
        println!("{}", output);
        return Ok("stdout".to_string());
    }

    let output_file = out_dir.join(relative_path);
    if let Some(parent) = output_file.parent() {
        fs::create_dir_all(parent)?;
    }
    fs::write(&output_file, output)?;

    Ok(output_file.display().to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_find_html_files_skips_output() {
        let dir = std::env::temp_dir().join(format!("folio-find-{}", std::process::id()));
        let out_dir = dir.join("dist");
        fs::create_dir_all(&out_dir).unwrap();
        fs::write(dir.join("a.html"), "<p>a</p>").unwrap();
        fs::write(dir.join("notes.txt"), "x").unwrap();
        fs::write(out_dir.join("a.html"), "<p>a</p>").unwrap();

        let files = find_html_files(&dir, &out_dir);
        assert_eq!(files, vec![dir.join("a.html")]);

        fs::remove_dir_all(dir).ok();
    }

    #[test]
    fn test_export_file_writes_output() {
        let dir = std::env::temp_dir().join(format!("folio-export-{}", std::process::id()));
        fs::create_dir_all(&dir).unwrap();
        let input = dir.join("post.html");
        fs::write(&input, r#"<div class="card" style="padding: 24px"><p>x</p></div>"#).unwrap();

        let out_dir = dir.join("out");
        let written = export_file(
            &input,
            Path::new("post.html"),
            &PlatformProfile::wechat(),
            &out_dir,
            false,
        )
        .unwrap();

        let html = fs::read_to_string(&written).unwrap();
        assert!(html.contains("<section"));
        assert!(!html.contains("class="));

        fs::remove_dir_all(dir).ok();
    }
}
