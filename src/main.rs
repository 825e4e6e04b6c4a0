use anyhow::{bail, Context, Result};
use back_on_truck::compress::{batch, compress_image};
use back_on_truck::geo::{ExifLocation, FixedLocation, Geolocator, LocationError, NoGeolocation};
use back_on_truck::host::HttpHost;
use back_on_truck::navigation::ConsoleShell;
use back_on_truck::notify::ConsoleNotifier;
use back_on_truck::session::{FormSession, SelectedFile, StepOutcome, UploadOutcome};
use back_on_truck::{cli, config, scanner};
use back_on_truck_common::LocationSample;
use clap::Parser;
use cli::{Cli, Commands};
use config::Config;
use indicatif::{ProgressBar, ProgressStyle};
use std::io::IsTerminal;
use std::path::{Path, PathBuf};

/// CLIで選べる位置情報の取得元
enum CliLocator {
    Fixed(FixedLocation),
    Exif(ExifLocation),
    Disabled(NoGeolocation),
}

impl Geolocator for CliLocator {
    async fn current_position(&self) -> std::result::Result<LocationSample, LocationError> {
        match self {
            CliLocator::Fixed(l) => l.current_position().await,
            CliLocator::Exif(l) => l.current_position().await,
            CliLocator::Disabled(l) => l.current_position().await,
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    let level = if cli.verbose { "debug" } else { "warn" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(level)).init();

    let config = Config::load().context("設定の読み込みに失敗")?;

    match cli.command {
        Commands::Compress { input, output, max_width, quality } => {
            println!("🗜 back-on-truck - 画像圧縮\n");

            let config = Config {
                max_width: max_width.unwrap_or(config.max_width),
                jpeg_quality: quality.unwrap_or(config.jpeg_quality),
                ..config
            };
            config.validate()?;
            let options = config.compress_options();

            if input.is_dir() {
                let output_dir = output.unwrap_or_else(|| input.join("compressed"));
                let entries = batch::compress_folder(&input, &output_dir, &options)?;
                let mut failed = 0;
                for entry in &entries {
                    match &entry.result {
                        Ok(path) => println!("✔ {} → {}", entry.source.display(), path.display()),
                        Err(e) => {
                            failed += 1;
                            eprintln!("✖ {}: {}", entry.source.display(), e);
                        }
                    }
                }
                println!("\n✅ {}件中{}件を圧縮", entries.len(), entries.len() - failed);
            } else {
                let info = scanner::image_info(&input)?;
                let bytes = std::fs::read(&info.path)?;
                let compressed = compress_image(&bytes, &info.mime_type, &options)?;
                let output_path = output.unwrap_or_else(|| default_output_path(&input, compressed.format.extension()));
                std::fs::write(&output_path, &compressed.bytes)
                    .with_context(|| format!("write {}", output_path.display()))?;
                println!(
                    "✔ {} ({} bytes) → {} ({}x{}, {} bytes)",
                    input.display(),
                    bytes.len(),
                    output_path.display(),
                    compressed.width,
                    compressed.height,
                    compressed.bytes.len()
                );
            }
        }

        Commands::Run {
            record_id,
            photos,
            photos_dir,
            driver,
            lat,
            lon,
            exif_from,
            mobile,
            context_record,
        } => {
            println!("🚛 back-on-truck - 回収登録\n");

            let host = HttpHost::from_config(&config)?;
            let locator = match (lat, lon, exif_from) {
                (Some(lat), Some(lon), _) => CliLocator::Fixed(FixedLocation(LocationSample::new(lat, lon)?)),
                (_, _, Some(photo)) => CliLocator::Exif(ExifLocation::new(photo)),
                _ => CliLocator::Disabled(NoGeolocation),
            };

            let mut session = FormSession::new(host, locator, ConsoleShell { mobile }, ConsoleNotifier, config);
            if let Some(context) = context_record {
                session = session.with_context_record(context);
            }

            // 1. 位置取得・ドライバー一覧
            println!("[1/3] 位置情報とドライバー一覧を取得中...");
            session.activate().await;
            if let Some(url) = &session.state().map_url {
                println!("  地図: {}", url);
            }
            if let Some(address) = &session.state().address {
                println!("  住所: {}", address);
            }

            match driver {
                Some(name) => {
                    // 名簿にない場合は通知のみ、未選択のまま続行
                    if let Err(e) = session.select_driver(&name) {
                        log::warn!("ドライバー未選択で続行: {}", e);
                    }
                }
                None => {
                    let drivers = session.state().drivers.clone();
                    if !drivers.is_empty() && std::io::stdin().is_terminal() {
                        let picked = dialoguer::Select::new()
                            .with_prompt("ドライバーを選択")
                            .items(drivers.as_slice())
                            .default(0)
                            .interact_opt()?;
                        if let Some(index) = picked {
                            session.select_driver(&drivers[index])?;
                        }
                    }
                }
            }

            // 2. 写真アップロード
            let mut files = Vec::new();
            if let Some(dir) = photos_dir {
                for info in scanner::scan_folder(&dir)? {
                    files.push(SelectedFile::from_path(&info.path)?);
                }
            }
            for path in &photos {
                files.push(SelectedFile::from_path(path)?);
            }

            println!("\n[2/3] 写真をアップロード中...");
            session.enqueue_files(files);
            let bar = ProgressBar::new(session.pending_uploads() as u64);
            bar.set_style(ProgressStyle::with_template("  {bar:30} {pos}/{len} {msg}")?.progress_chars("=>-"));
            while let Some(outcome) = session.upload_next().await {
                if let UploadOutcome::Uploaded(id) = outcome {
                    bar.set_message(id.to_string());
                }
                bar.inc(1);
            }
            bar.finish_and_clear();
            println!("✔ {}件のファイルをアップロード", session.state().uploaded_file_ids.len());

            // 3. 送信
            println!("\n[3/3] レコードに反映中...");
            let outcome = session.on_submit_success(&record_id).await;
            for (name, step) in [
                ("ドライバー", &outcome.driver_update),
                ("ファイル紐付け", &outcome.file_link),
                ("位置情報", &outcome.location_update),
            ] {
                let status = match step {
                    StepOutcome::Succeeded => "成功".to_string(),
                    StepOutcome::Skipped => "スキップ".to_string(),
                    StepOutcome::Failed(msg) => format!("失敗 ({})", msg),
                };
                println!("  {}: {}", name, status);
            }

            if !outcome.all_succeeded() {
                bail!("一部の処理に失敗しました");
            }
            println!("\n✅ 完了");
        }

        Commands::Config { set_endpoint, set_token, set_exit_url, show } => {
            let mut config = config;

            if let Some(endpoint) = set_endpoint {
                config.set_endpoint(endpoint)?;
                println!("✔ エンドポイントを設定しました");
            }

            if let Some(token) = set_token {
                config.set_api_token(token)?;
                println!("✔ APIトークンを設定しました");
            }

            if let Some(url) = set_exit_url {
                config.set_exit_url(url)?;
                println!("✔ 遷移先URLを設定しました");
            }

            if show {
                println!("設定:");
                println!("  エンドポイント: {}", config.endpoint.as_deref().unwrap_or("未設定"));
                println!("  最大幅: {}px", config.max_width);
                println!("  JPEG品質: {}", config.jpeg_quality);
                println!("  遷移: {:?}", config.navigation);
                println!("  送信時に位置を記録: {}", config.record_location_on_submit);
                println!("  APIトークン: {}", if config.get_api_token().is_some() { "設定済み" } else { "未設定" });
            }
        }
    }

    Ok(())
}

fn default_output_path(input: &Path, extension: &str) -> PathBuf {
    let parent = input.parent().unwrap_or_else(|| Path::new("."));
    let stem = input
        .file_stem()
        .and_then(|s| s.to_str())
        .unwrap_or("image");
    parent.join(format!("{stem}_compressed.{extension}"))
}
