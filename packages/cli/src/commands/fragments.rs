use crate::config::Config;
use anyhow::{anyhow, Result};
use clap::{Subcommand, ValueEnum};
use colored::Colorize;
use folio_editor::{insert_fragment, Document, InsertPosition};
use std::path::PathBuf;

#[derive(Debug, Subcommand)]
pub enum FragmentsCommand {
    /// List catalog fragments
    List {
        /// Only show one category (decoration, header, footer)
        #[arg(short, long)]
        category: Option<String>,
    },

    /// Insert a fragment into an article and save it
    Insert {
        /// Article .html file
        document: PathBuf,

        /// Fragment id
        fragment: String,

        /// Where to insert
        #[arg(long, value_enum, default_value = "end")]
        at: At,
    },
}

#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum At {
    Start,
    End,
}

impl From<At> for InsertPosition {
    fn from(at: At) -> Self {
        match at {
            At::Start => InsertPosition::DocumentStart,
            At::End => InsertPosition::DocumentEnd,
        }
    }
}

pub fn fragments(command: FragmentsCommand, cwd: &str) -> Result<()> {
    let config = Config::load(cwd)?;
    let catalog = config.fragments(cwd)?;

    match command {
        FragmentsCommand::List { category } => {
            let mut shown = 0;
            for fragment in catalog
                .iter()
                .filter(|f| category.as_deref().map_or(true, |c| f.category.as_str() == c))
            {
                shown += 1;
                println!(
                    "  {} {}",
                    fragment.id.bright_white().bold(),
                    format!("({})", fragment.category).dimmed()
                );
            }

            if shown == 0 {
                println!("{}", "⚠️  No fragments found".yellow());
            }
            Ok(())
        }

        FragmentsCommand::Insert { document, fragment, at } => {
            let path = PathBuf::from(cwd).join(document);
            if !path.is_file() {
                return Err(anyhow!("Document does not exist: {}", path.display()));
            }

            let mut doc = Document::load(&path)?;
            let result = insert_fragment(&mut doc, &catalog, &fragment, at.into())?;
            doc.save()?;

            println!(
                "  {} Inserted {} into {} ({} nodes)",
                "✓".green(),
                fragment.bright_white(),
                path.display(),
                result.created.len()
            );
            Ok(())
        }
    }
}
