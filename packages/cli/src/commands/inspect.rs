use super::Document;
use anyhow::Result;
use clap::Args;
use colored::Colorize;
use folio_editor::{derive_post_title, Block, BlockKind, BlockPayload, CounterRegistry, ContentType};
use std::path::PathBuf;

#[derive(Debug, Args)]
pub struct InspectArgs {
    /// Body array or content record JSON file
    pub file: PathBuf,

    /// Print the normalized wire form instead of a listing
    #[arg(long)]
    pub json: bool,
}

pub fn inspect(args: InspectArgs) -> Result<()> {
    let document = Document::read(&args.file)?;
    let body = document.body();

    if args.json {
        println!("{}", serde_json::to_string_pretty(body)?);
        return Ok(());
    }

    if let Document::Record(record) = &document {
        let id = record
            .id
            .map(|id| id.to_string())
            .unwrap_or_else(|| "new".to_string());
        println!(
            "{} {} #{} ({})",
            "📄".bright_blue(),
            record.content_type.as_str().bold(),
            id,
            record.status.as_str()
        );
        if !record.title.is_empty() {
            println!("   title: {}", record.title);
        }
        if record.content_type == ContentType::Post {
            match derive_post_title(body) {
                Some(derived) => println!("   derived title: {}", derived),
                None => println!("   derived title: {}", "(fallback)".dimmed()),
            }
        }
        println!();
    }

    if body.is_empty() {
        println!("{}", "⚠️  Body is empty".yellow());
        return Ok(());
    }

    for (index, block) in body.iter().enumerate() {
        let marker = if block.is_abandoned() {
            " (abandoned)".yellow().to_string()
        } else {
            String::new()
        };
        println!(
            "  {:>3}  {:<10} {}{}",
            index,
            block.key().bright_white(),
            summary(block),
            marker
        );
    }

    let counters = CounterRegistry::scan(body.blocks());
    println!();
    println!("Next keys:");
    for kind in BlockKind::ALL {
        match counters.next_key(kind) {
            Some(key) => println!("  {:<8} {}", kind.as_str(), key),
            None => println!("  {:<8} {}", kind.as_str(), "(ids exhausted)".red()),
        }
    }

    Ok(())
}

fn summary(block: &Block) -> String {
    const WIDTH: usize = 48;

    let text = match &block.payload {
        BlockPayload::Header { text } | BlockPayload::Quote { text } => text.clone(),
        BlockPayload::Text { text, color } => match color {
            Some(color) => format!("{} [{}]", text, color.as_str()),
            None => text.clone(),
        },
        BlockPayload::Divider => "────".to_string(),
        BlockPayload::Media(media) if media.is_empty() => "(no file)".to_string(),
        BlockPayload::Media(media) => format!("{} <{}>", media.url, media.media_type),
    };

    if text.chars().count() > WIDTH {
        let cut: String = text.chars().take(WIDTH).collect();
        format!("{}…", cut)
    } else {
        text
    }
}
