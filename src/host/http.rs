//! HTTP経由のホスト手続きアダプタ
//!
//! `<endpoint>/<手続き名>` へJSONをPOSTし、レスポンスJSONを結果として読む。

use super::{procedures, HostProcedures};
use crate::config::Config;
use crate::error::{BackOnTruckError, Result};
use back_on_truck_common::{LocationSample, UploadedFileRef};
use serde::de::DeserializeOwned;
use serde_json::{json, Value};
use std::time::Duration;

#[derive(Debug, Clone)]
pub struct HttpHost {
    client: reqwest::Client,
    endpoint: String,
    token: Option<String>,
}

impl HttpHost {
    pub fn new(endpoint: impl Into<String>, token: Option<String>, timeout: Duration) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| BackOnTruckError::Config(format!("HTTPクライアント初期化エラー: {}", e)))?;

        Ok(Self {
            client,
            endpoint: endpoint.into().trim_end_matches('/').to_string(),
            token,
        })
    }

    pub fn from_config(config: &Config) -> Result<Self> {
        Self::new(
            config.get_endpoint()?,
            config.get_api_token(),
            Duration::from_secs(config.timeout_seconds),
        )
    }

    pub fn procedure_url(&self, procedure: &str) -> String {
        format!("{}/{}", self.endpoint, procedure)
    }

    async fn call<T: DeserializeOwned>(&self, procedure: &str, body: Value) -> Result<T> {
        let url = self.procedure_url(procedure);
        log::debug!("POST {}", url);

        let mut request = self.client.post(&url).json(&body);
        if let Some(token) = &self.token {
            request = request.bearer_auth(token);
        }

        let response = request
            .send()
            .await
            .map_err(|e| BackOnTruckError::remote(procedure, e.to_string()))?;
        let status = response.status();
        let text = response
            .text()
            .await
            .map_err(|e| BackOnTruckError::remote(procedure, e.to_string()))?;

        if !status.is_success() {
            log::warn!("{} failed with {}", procedure, status);
            let message = error_message(&text).unwrap_or_else(|| format!("HTTP {}", status));
            return Err(BackOnTruckError::remote(procedure, message));
        }

        parse_result(procedure, &text)
    }
}

/// 戻り値なしの手続きは空ボディを返すことがあるので `null` として読む
fn parse_result<T: DeserializeOwned>(procedure: &str, text: &str) -> Result<T> {
    let text = if text.trim().is_empty() { "null" } else { text };
    serde_json::from_str(text)
        .map_err(|e| BackOnTruckError::remote(procedure, format!("レスポンスのパースに失敗: {}", e)))
}

/// エラーボディから `message` を取り出す
///
/// `{"message": ...}` と `[{"message": ..., "errorCode": ...}]` の両方に対応。
fn error_message(body: &str) -> Option<String> {
    let value: Value = serde_json::from_str(body).ok()?;
    let message = match &value {
        Value::Array(items) => items.first()?.get("message")?,
        Value::Object(_) => value.get("message")?,
        _ => return None,
    };
    message.as_str().map(str::to_string)
}

impl HostProcedures for HttpHost {
    async fn link_files_to_record(&self, record_id: &str, file_ids: &[UploadedFileRef]) -> Result<()> {
        self.call(
            procedures::LINK_FILES_TO_RECORD,
            json!({ "recordId": record_id, "fileIds": file_ids }),
        )
        .await
    }

    async fn upload_file(&self, file_name: &str, file_type: &str, base64_data: &str) -> Result<UploadedFileRef> {
        let id: String = self
            .call(
                procedures::UPLOAD_FILE,
                json!({ "fileName": file_name, "fileType": file_type, "base64Data": base64_data }),
            )
            .await?;
        Ok(UploadedFileRef(id))
    }

    async fn update_parking_log_location(&self, record_id: &str, location: LocationSample) -> Result<()> {
        self.call(
            procedures::UPDATE_PARKING_LOG_LOCATION,
            json!({
                "recordId": record_id,
                "latitude": location.latitude,
                "longitude": location.longitude,
            }),
        )
        .await
    }

    async fn get_address_from_coordinates(&self, location: LocationSample) -> Result<String> {
        let address: Option<String> = self
            .call(
                procedures::GET_ADDRESS_FROM_COORDINATES,
                json!({ "latitude": location.latitude, "longitude": location.longitude }),
            )
            .await?;
        Ok(address.unwrap_or_default())
    }

    async fn get_user_profile_name(&self) -> Result<Option<String>> {
        self.call(procedures::GET_USER_PROFILE_NAME, json!({})).await
    }

    async fn get_driver_names(&self, profile_name: &str) -> Result<Vec<String>> {
        let names: Option<Vec<String>> = self
            .call(procedures::GET_DRIVER_NAMES, json!({ "profileName": profile_name }))
            .await?;
        Ok(names.unwrap_or_default())
    }

    async fn update_driver_name(&self, record_id: &str, driver: &str, user_team: &str) -> Result<()> {
        self.call(
            procedures::UPDATE_DRIVER_NAME,
            json!({ "recordId": record_id, "driver": driver, "userTeam": user_team }),
        )
        .await
    }
}
