use super::read_record;
use anyhow::Result;
use clap::Args;
use colored::Colorize;
use folio_editor::ContentType;
use std::path::PathBuf;

#[derive(Debug, Args)]
pub struct TitleArgs {
    /// Content record JSON file
    pub file: PathBuf,
}

pub fn title(args: TitleArgs) -> Result<()> {
    let mut record = read_record(&args.file)?;

    if record.content_type == ContentType::Article {
        println!(
            "{} articles keep their own title: {}",
            "ℹ".bright_blue(),
            record.title
        );
        return Ok(());
    }

    let now_millis = chrono::Utc::now().timestamp_millis();
    record.prepare_for_save(now_millis, &mut rand::thread_rng());

    println!("{}", record.title);
    Ok(())
}
