use super::read_record;
use anyhow::{Context, Result};
use clap::Args;
use colored::Colorize;
use folio_editor::sync_media_urls;
use std::path::PathBuf;

#[derive(Debug, Args)]
pub struct SyncArgs {
    /// Content record JSON file carrying media_urls
    pub file: PathBuf,

    /// Rewrite the file instead of printing the result
    #[arg(short, long)]
    pub write: bool,
}

pub fn sync(args: SyncArgs) -> Result<()> {
    let mut record = read_record(&args.file)?;

    let report = sync_media_urls(&mut record.body, &record.media_urls);
    let json = serde_json::to_string_pretty(&record)?;

    if args.write {
        std::fs::write(&args.file, json)
            .with_context(|| format!("Failed to write {}", args.file.display()))?;
    } else {
        println!("{}", json);
    }

    eprintln!(
        "  {} {} updated, {} appended, {} skipped",
        "✓".green(),
        report.updated,
        report.appended,
        report.skipped
    );
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use folio_editor::ContentRecord;

    #[test]
    fn test_sync_rewrites_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("record.json");
        std::fs::write(
            &path,
            r#"{
                "id": 3,
                "content_type": "post",
                "body": [{ "text1": "Look" }, { "media1": "" }],
                "media_urls": [
                    { "url": "https://cdn/x.jpg", "type": "image", "public_id": "media_0", "content_type": "image/jpeg" },
                    { "url": "https://cdn/y.jpg", "type": "image", "public_id": "media_1", "content_type": "image/jpeg" }
                ]
            }"#,
        )
        .unwrap();

        sync(SyncArgs {
            file: path.clone(),
            write: true,
        })
        .unwrap();

        let record: ContentRecord =
            serde_json::from_str(&std::fs::read_to_string(&path).unwrap()).unwrap();
        let keys: Vec<_> = record.body.iter().map(|b| b.key()).collect();
        assert_eq!(keys, vec!["text1", "media1", "media2"]);
    }
}
