use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "back-on-truck")]
#[command(about = "ダンプスター回収フォーム: 写真圧縮・アップロード・ドライバー割当", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// 詳細ログを出力
    #[arg(short, long, global = true)]
    pub verbose: bool,
}

#[derive(Subcommand)]
pub enum Commands {
    /// 画像（またはフォルダ内の画像）を圧縮
    Compress {
        /// 画像ファイルまたはフォルダ
        #[arg(required = true)]
        input: PathBuf,

        /// 出力先（ファイル入力ならファイル、フォルダ入力ならフォルダ）
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// 出力幅（px）
        #[arg(long)]
        max_width: Option<u32>,

        /// JPEG品質 (0.0-1.0)
        #[arg(short, long)]
        quality: Option<f32>,
    },

    /// フォームセッションを1回実行（位置取得→アップロード→送信→遷移）
    Run {
        /// 作成済みレコードのID
        #[arg(long, required = true)]
        record_id: String,

        /// アップロードする写真
        photos: Vec<PathBuf>,

        /// 写真フォルダ（直下の画像をすべてアップロード）
        #[arg(long)]
        photos_dir: Option<PathBuf>,

        /// ドライバー名（省略時は一覧から選択）
        #[arg(short, long)]
        driver: Option<String>,

        /// 緯度
        #[arg(long, requires = "lon", allow_hyphen_values = true)]
        lat: Option<f64>,

        /// 経度
        #[arg(long, requires = "lat", allow_hyphen_values = true)]
        lon: Option<f64>,

        /// この写真のEXIF GPSを端末位置として使う
        #[arg(long, conflicts_with = "lat")]
        exif_from: Option<PathBuf>,

        /// モバイルシェル内として遷移する
        #[arg(long)]
        mobile: bool,

        /// 起動元レコードのID（レコードページ遷移用）
        #[arg(long)]
        context_record: Option<String>,
    },

    /// 設定を表示/編集
    Config {
        /// ホスト手続きのベースURLを設定
        #[arg(long)]
        set_endpoint: Option<String>,

        /// APIトークンを設定
        #[arg(long)]
        set_token: Option<String>,

        /// 完了後の遷移先URLを設定
        #[arg(long)]
        set_exit_url: Option<String>,

        /// 設定を表示
        #[arg(long)]
        show: bool,
    },
}
