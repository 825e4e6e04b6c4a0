use crate::compress::{CompressOptions, DEFAULT_JPEG_QUALITY, DEFAULT_MAX_WIDTH};
use crate::error::{BackOnTruckError, Result};
use crate::navigation::NavigationPolicy;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

const TOKEN_ENV: &str = "BACK_ON_TRUCK_TOKEN";

pub const DEFAULT_MAP_URL_TEMPLATE: &str =
    "https://www.google.com/maps/place/{lat}+{lon}/@{lat},{lon},17z";

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// ホスト手続きのベースURL（例: https://host.example/services/apexrest/backOnTruck）
    pub endpoint: Option<String>,
    pub api_token: Option<String>,
    pub max_width: u32,
    /// 0.0〜1.0（JPEGのみ）
    pub jpeg_quality: f32,
    pub map_url_template: String,
    pub navigation: NavigationPolicy,
    /// 送信時に位置情報をレコードへ書き込む（初期版の挙動）
    pub record_location_on_submit: bool,
    pub fetch_driver_roster: bool,
    pub timeout_seconds: u64,
}

impl Default for Config {
    fn default() -> Self {
        Self::default_config()
    }
}

impl Config {
    pub fn load() -> Result<Self> {
        let config_path = Self::config_path()?;

        if config_path.exists() {
            let content = std::fs::read_to_string(&config_path)?;
            let config: Config = serde_json::from_str(&content)?;
            config.validate()?;
            Ok(config)
        } else {
            Ok(Self::default_config())
        }
    }

    pub fn save(&self) -> Result<()> {
        let config_path = Self::config_path()?;

        if let Some(parent) = config_path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let content = serde_json::to_string_pretty(self)?;
        std::fs::write(&config_path, content)?;
        Ok(())
    }

    pub fn config_path() -> Result<PathBuf> {
        let home = dirs::home_dir()
            .ok_or_else(|| BackOnTruckError::Config("ホームディレクトリが見つかりません".into()))?;
        Ok(home.join(".config").join("back-on-truck").join("config.json"))
    }

    fn default_config() -> Self {
        Self {
            endpoint: None,
            api_token: None,
            max_width: DEFAULT_MAX_WIDTH,
            jpeg_quality: DEFAULT_JPEG_QUALITY,
            map_url_template: DEFAULT_MAP_URL_TEMPLATE.into(),
            navigation: NavigationPolicy::default(),
            record_location_on_submit: false,
            fetch_driver_roster: true,
            timeout_seconds: 60,
        }
    }

    pub fn validate(&self) -> Result<()> {
        if self.max_width == 0 {
            return Err(BackOnTruckError::Config("max_width は1以上が必要です".into()));
        }
        if !(self.jpeg_quality > 0.0 && self.jpeg_quality <= 1.0) {
            return Err(BackOnTruckError::Config(format!(
                "jpeg_quality は0より大きく1以下: {}",
                self.jpeg_quality
            )));
        }
        Ok(())
    }

    pub fn compress_options(&self) -> CompressOptions {
        CompressOptions {
            max_width: self.max_width,
            jpeg_quality: self.jpeg_quality,
            ..CompressOptions::default()
        }
    }

    pub fn get_endpoint(&self) -> Result<String> {
        self.endpoint
            .clone()
            .ok_or_else(|| {
                BackOnTruckError::Config(
                    "エンドポイントが未設定です。`back-on-truck config --set-endpoint URL` で設定してください".into(),
                )
            })
    }

    pub fn get_api_token(&self) -> Option<String> {
        // 環境変数を優先
        if let Ok(token) = std::env::var(TOKEN_ENV) {
            return Some(token);
        }
        self.api_token.clone()
    }

    pub fn set_endpoint(&mut self, endpoint: String) -> Result<()> {
        self.endpoint = Some(endpoint.trim_end_matches('/').to_string());
        self.save()
    }

    pub fn set_api_token(&mut self, token: String) -> Result<()> {
        self.api_token = Some(token);
        self.save()
    }

    pub fn set_exit_url(&mut self, exit_url: String) -> Result<()> {
        self.navigation = NavigationPolicy::ShellBack { exit_url };
        self.save()
    }
}
