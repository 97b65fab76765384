use std::path::PathBuf;

use anyhow::Context;
use clap::Parser;
use nightscout_feed::{parse_entries_str, StaticEntries};
use nightscout_skill::{Skill, SkillRequest, SkillSettings, DISPLAY_INTENT};
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(
    name = "nightscout-cli",
    about = "Chạy skill Nightscout một lần và in envelope phản hồi."
)]
struct Args {
    /// File cấu hình TOML; biến môi trường NIGHTSCOUT_* ghi đè.
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Envelope yêu cầu Alexa (JSON). Bỏ qua thì dùng --intent.
    #[arg(short, long)]
    request: Option<PathBuf>,

    #[arg(long, default_value = DISPLAY_INTENT)]
    intent: String,

    /// Giả lập thiết bị có màn hình.
    #[arg(long)]
    display: bool,

    /// Đọc entries từ file JSON thay vì gọi site Nightscout.
    #[arg(long)]
    entries: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let args = Args::parse();
    let settings = SkillSettings::load(args.config.as_deref())
        .context("Không nạp được cấu hình")?;

    let request = match &args.request {
        Some(path) => {
            let data = std::fs::read_to_string(path)
                .with_context(|| format!("Không đọc được file {:?}", path))?;
            let envelope: serde_json::Value = serde_json::from_str(&data)
                .with_context(|| format!("File {:?} không phải JSON", path))?;
            SkillRequest::from_envelope(&envelope)?
        }
        None => SkillRequest::intent(args.intent.clone(), args.display),
    };

    let response = match &args.entries {
        Some(path) => {
            let data = std::fs::read_to_string(path)
                .with_context(|| format!("Không đọc được file {:?}", path))?;
            let entries = parse_entries_str(&data)?;
            Skill::new(&settings, StaticEntries::new(entries))
                .handle(&request)
                .await
        }
        None => Skill::from_settings(&settings).handle(&request).await,
    };

    println!("{}", serde_json::to_string_pretty(&response.to_envelope())?);
    Ok(())
}
