use thiserror::Error;

#[derive(Error, Debug)]
pub enum BackOnTruckError {
    #[error("設定エラー: {0}")]
    Config(String),

    #[error("ファイルが見つかりません: {0}")]
    FileNotFound(String),

    #[error("フォルダが見つかりません: {0}")]
    FolderNotFound(String),

    #[error("画像デコードエラー: {0}")]
    ImageDecode(String),

    #[error("画像エンコードエラー: {0}")]
    ImageEncode(String),

    #[error("位置情報を取得できません: {0}")]
    LocationUnavailable(String),

    #[error("住所の取得に失敗: {0}")]
    Geocode(String),

    #[error("リモート手続き {procedure} の呼び出しに失敗: {message}")]
    RemoteCall { procedure: String, message: String },

    #[error("ユーザープロファイル名を解決できません: {0}")]
    ProfileResolution(String),

    #[error("ドライバー一覧に存在しない名前です: {0}")]
    DriverNotInRoster(String),

    #[error("同じファイルが既にアップロード済みまたは待機中です: {0}")]
    DuplicateFile(String),

    #[error("レコードIDがありません")]
    MissingRecordId,

    #[error("JSON解析エラー: {0}")]
    JsonParse(#[from] serde_json::Error),

    #[error("IOエラー: {0}")]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Common(#[from] back_on_truck_common::Error),
}

impl BackOnTruckError {
    pub fn remote(procedure: &str, message: impl Into<String>) -> Self {
        BackOnTruckError::RemoteCall {
            procedure: procedure.to_string(),
            message: message.into(),
        }
    }
}

pub type Result<T> = std::result::Result<T, BackOnTruckError>;
