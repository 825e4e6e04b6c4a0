//! ホストプラットフォームのリモート手続き
//!
//! レコードの作成・更新、ファイル保存、逆ジオコーディング、プロファイル解決は
//! すべてホスト側の実装。ここでは呼び出し契約のみを定義する。

mod http;

pub use http::HttpHost;

use crate::error::Result;
use back_on_truck_common::{LocationSample, UploadedFileRef};

/// 手続き名（ホスト側の公開名）
pub mod procedures {
    pub const LINK_FILES_TO_RECORD: &str = "linkFilesToRecord";
    pub const UPLOAD_FILE: &str = "uploadFile";
    pub const UPDATE_PARKING_LOG_LOCATION: &str = "updateParkingLogLocation";
    pub const GET_ADDRESS_FROM_COORDINATES: &str = "getAddressFromCoordinates";
    pub const GET_USER_PROFILE_NAME: &str = "getUserProfileName";
    pub const GET_DRIVER_NAMES: &str = "GetDriverNames";
    pub const UPDATE_DRIVER_NAME: &str = "UpdateDriverName";
}

/// ホストのリモート手続き呼び出し
///
/// 失敗はすべて `BackOnTruckError::RemoteCall` で返す。
#[allow(async_fn_in_trait)]
pub trait HostProcedures {
    async fn link_files_to_record(&self, record_id: &str, file_ids: &[UploadedFileRef]) -> Result<()>;

    async fn upload_file(&self, file_name: &str, file_type: &str, base64_data: &str) -> Result<UploadedFileRef>;

    async fn update_parking_log_location(&self, record_id: &str, location: LocationSample) -> Result<()>;

    async fn get_address_from_coordinates(&self, location: LocationSample) -> Result<String>;

    /// 未設定の場合は `None`
    async fn get_user_profile_name(&self) -> Result<Option<String>>;

    async fn get_driver_names(&self, profile_name: &str) -> Result<Vec<String>>;

    async fn update_driver_name(&self, record_id: &str, driver: &str, user_team: &str) -> Result<()>;
}
