use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "gmb-sanitizer")]
#[command(about = "GMB Photo Sanitizer クライアント: 写真の一括サニタイズとEXIF検証", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// 詳細ログを出力
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// サービスのURL（設定ファイルより優先）
    #[arg(long, global = true)]
    pub base_url: Option<String>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// 写真を一括サニタイズしてZIPを保存
    Sanitize(SanitizeArgs),

    /// 1枚の写真のEXIFをサービスで確認
    Verify {
        /// 確認する写真
        #[arg(required = true)]
        file: PathBuf,
    },

    /// 都市一覧を表示
    Cities,

    /// 位置情報と出力ファイル名のプレビュー
    Preview {
        /// 命名キーワード
        #[arg(short, long, default_value = "")]
        keyword: String,

        /// 都市
        #[arg(short, long)]
        city: Option<String>,
    },

    /// 住所・都市から座標を取得
    Geocode {
        /// 住所
        #[arg(short, long, default_value = "")]
        address: String,

        /// 都市
        #[arg(short, long, default_value = "")]
        city: String,
    },

    /// 設定を表示/編集
    Config {
        /// サービスのURLを設定
        #[arg(long)]
        set_base_url: Option<String>,

        /// 設定を表示
        #[arg(long)]
        show: bool,
    },
}

#[derive(Args, Debug, Clone, Default)]
pub struct SanitizeArgs {
    /// 写真ファイルまたはフォルダ（直下の jpg/jpeg/png）
    pub paths: Vec<PathBuf>,

    /// 都市
    #[arg(short, long)]
    pub city: Option<String>,

    /// 都市を一覧から選択
    #[arg(long, conflicts_with = "city")]
    pub pick_city: bool,

    /// 緯度（手動）
    #[arg(long, allow_hyphen_values = true)]
    pub lat: Option<String>,

    /// 経度（手動）
    #[arg(long, allow_hyphen_values = true)]
    pub lon: Option<String>,

    /// 標高（手動、m）
    #[arg(long)]
    pub alt: Option<String>,

    /// 住所
    #[arg(long)]
    pub address: Option<String>,

    /// 郵便番号
    #[arg(long)]
    pub postal_code: Option<String>,

    /// 命名キーワード（例: "Playa Roja" → playa-roja-<city>-1.jpg）
    #[arg(short, long)]
    pub keyword: Option<String>,

    /// 撮影日の開始 (YYYY-MM-DD、デフォルト: 30日前)
    #[arg(long)]
    pub date_from: Option<String>,

    /// 撮影日の終了 (YYYY-MM-DD、デフォルト: 今日)
    #[arg(long)]
    pub date_to: Option<String>,

    /// 端末プロファイルID（random で写真ごとにランダム）
    #[arg(long)]
    pub device_id: Option<String>,

    /// 加工の強さ (low/medium/high)
    #[arg(long)]
    pub intensity: Option<String>,

    /// GPSのばらつき半径 (m)
    #[arg(long)]
    pub jitter_radius: Option<String>,

    /// 写真ごとの端末ランダム化を無効化
    #[arg(long)]
    pub no_random_per_photo: bool,

    /// ZIPの保存先ディレクトリ
    #[arg(short, long)]
    pub output: Option<PathBuf>,
}
