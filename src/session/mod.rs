//! フォームセッション
//!
//! 位置取得と写真アップロードの2つのフローを1つの状態で管理し、
//! 送信成功時にドライバー・ファイル・位置情報をレコードへ反映して画面を離れる。
//! 失敗はすべてその場で通知に変換し、再試行もロールバックもしない。

mod state;
mod submit;
mod upload;

pub use state::SessionState;
pub use submit::{StepOutcome, SubmissionOutcome};
pub use upload::{prepare_upload, PreparedUpload, SelectedFile};

use crate::config::Config;
use crate::error::{BackOnTruckError, Result};
use crate::geo::{Geolocator, LocationError};
use crate::host::HostProcedures;
use crate::navigation::{self, HostShell, NavigationTarget};
use crate::notify::Notifier;
use back_on_truck_common::{LocationSample, Notification, UploadedFileRef};
use upload::UploadQueue;

pub mod titles {
    pub const SUCCESS: &str = "Success";
    pub const ERROR: &str = "Error";
    pub const LOCATION_ERROR: &str = "Error Getting Location";
    pub const ADDRESS_ERROR: &str = "Error Getting Address";
    pub const LOCATION_UPDATE_ERROR: &str = "Error Updating Location";
    pub const DECODE_ERROR: &str = "Error Reading Image";
    pub const ENCODE_ERROR: &str = "Error Compressing Image";
    pub const UPLOAD_ERROR: &str = "Error Uploading File";
    pub const DUPLICATE_FILE: &str = "Duplicate File";
    pub const PROFILE_ERROR: &str = "Error Resolving Profile";
    pub const DRIVERS_ERROR: &str = "Error Loading Drivers";
    pub const NO_DRIVERS: &str = "No Drivers";
    pub const INVALID_DRIVER: &str = "Invalid Driver";
    pub const NAVIGATION_ERROR: &str = "Navigation Error";
}

/// 1ファイル分のアップロード結果
#[derive(Debug)]
pub enum UploadOutcome {
    Uploaded(UploadedFileRef),
    Failed(BackOnTruckError),
}

type ChangeListener = Box<dyn FnMut(&SessionState)>;

pub struct FormSession<H, G, S, N> {
    host: H,
    geolocator: G,
    shell: S,
    notifier: N,
    config: Config,
    /// 起動元レコード（初期版の遷移先）
    context_record_id: Option<String>,
    state: SessionState,
    queue: UploadQueue,
    listener: Option<ChangeListener>,
}

impl<H, G, S, N> FormSession<H, G, S, N>
where
    H: HostProcedures,
    G: Geolocator,
    S: HostShell,
    N: Notifier,
{
    pub fn new(host: H, geolocator: G, shell: S, notifier: N, config: Config) -> Self {
        Self {
            host,
            geolocator,
            shell,
            notifier,
            config,
            context_record_id: None,
            state: SessionState::default(),
            queue: UploadQueue::default(),
            listener: None,
        }
    }

    pub fn with_context_record(mut self, record_id: impl Into<String>) -> Self {
        self.context_record_id = Some(record_id.into());
        self
    }

    /// 状態が変わるたびに呼ばれる
    pub fn on_change(&mut self, listener: impl FnMut(&SessionState) + 'static) {
        self.listener = Some(Box::new(listener));
    }

    pub fn state(&self) -> &SessionState {
        &self.state
    }

    pub fn host(&self) -> &H {
        &self.host
    }

    pub fn shell(&self) -> &S {
        &self.shell
    }

    pub fn notifier(&self) -> &N {
        &self.notifier
    }

    pub fn pending_uploads(&self) -> usize {
        self.queue.len()
    }

    fn touch(&mut self) {
        self.state.revision += 1;
        if let Some(listener) = self.listener.as_mut() {
            listener(&self.state);
        }
    }

    fn notify(&self, notification: Notification) {
        self.notifier.notify(notification);
    }

    /// 起動時処理: 位置取得、続いてドライバー一覧
    pub async fn activate(&mut self) {
        self.capture_location().await;
        if self.config.fetch_driver_roster {
            self.load_driver_roster().await;
        }
    }

    // ---- 位置情報 ----

    pub async fn capture_location(&mut self) -> Option<LocationSample> {
        let sample = match self.geolocator.current_position().await {
            Ok(sample) => sample,
            Err(e) => {
                log::warn!("{}", BackOnTruckError::LocationUnavailable(e.to_string()));
                self.state.show_location_warning = true;
                self.touch();
                let title = match e {
                    LocationError::Unsupported => titles::ERROR,
                    _ => titles::LOCATION_ERROR,
                };
                self.notify(Notification::error(title, e.to_string()));
                return None;
            }
        };

        self.state.location = Some(sample);
        self.state.show_location_warning = false;
        self.state.map_url = Some(sample.map_url(&self.config.map_url_template));
        self.touch();

        // 住所の取得を待たずに成功を通知する
        self.notify(Notification::success(titles::SUCCESS, "Location retrieved successfully."));

        match self.host.get_address_from_coordinates(sample).await {
            Ok(address) if !address.trim().is_empty() => {
                self.state.address = Some(address);
                self.touch();
            }
            Ok(_) => log::debug!("geocoder returned no address"),
            Err(e) => {
                let err = BackOnTruckError::Geocode(e.to_string());
                log::warn!("{}", err);
                self.notify(Notification::error(titles::ADDRESS_ERROR, e.to_string()));
            }
        }

        // レコード作成後に位置が取れた場合はその場で書き込む
        if self.config.record_location_on_submit {
            if let Some(record_id) = self.state.record_id.clone() {
                self.update_location_now(&record_id, sample).await;
            }
        }

        Some(sample)
    }

    async fn update_location_now(&self, record_id: &str, sample: LocationSample) {
        match self.host.update_parking_log_location(record_id, sample).await {
            Ok(()) => self.notify(Notification::success(titles::SUCCESS, "Location updated successfully.")),
            Err(e) => self.notify(Notification::error(titles::LOCATION_UPDATE_ERROR, e.to_string())),
        }
    }

    // ---- ドライバー ----

    /// プロファイル名を解決してからドライバー一覧を取得する
    pub async fn load_driver_roster(&mut self) {
        let profile = match self.host.get_user_profile_name().await {
            Ok(Some(name)) if !name.trim().is_empty() => name,
            Ok(_) => {
                self.report_profile_failure("User profile name is empty.".into());
                return;
            }
            Err(e) => {
                self.report_profile_failure(e.to_string());
                return;
            }
        };

        self.state.user_team = Some(profile.clone());
        self.touch();

        match self.host.get_driver_names(&profile).await {
            Ok(names) if names.is_empty() => {
                log::info!("no drivers for {}", profile);
                self.state.drivers.clear();
                self.touch();
                self.notify(Notification::warning(
                    titles::NO_DRIVERS,
                    format!("No drivers found for {}.", profile),
                ));
            }
            Ok(names) => {
                log::info!("{} drivers for {}", names.len(), profile);
                self.state.drivers = names;
                self.touch();
            }
            Err(e) => {
                self.notify(Notification::error(titles::DRIVERS_ERROR, e.to_string()));
            }
        }
    }

    fn report_profile_failure(&self, message: String) {
        let err = BackOnTruckError::ProfileResolution(message);
        log::warn!("{}", err);
        self.notify(Notification::error(titles::PROFILE_ERROR, err.to_string()));
    }

    /// 取得済みの一覧にある名前だけ選択できる
    pub fn select_driver(&mut self, name: &str) -> Result<()> {
        if !self.state.is_roster_member(name) {
            let err = BackOnTruckError::DriverNotInRoster(name.to_string());
            self.notify(Notification::warning(titles::INVALID_DRIVER, err.to_string()));
            return Err(err);
        }
        self.state.selected_driver = Some(name.to_string());
        self.touch();
        Ok(())
    }

    // ---- 写真 ----

    /// 待ち行列に追加する。重複は通知して除外し、受け付けた件数を返す
    pub fn enqueue_files(&mut self, files: Vec<SelectedFile>) -> usize {
        let mut accepted = 0;
        for file in files {
            match self.queue.push(file) {
                Ok(()) => accepted += 1,
                Err(e) => self.notify(Notification::warning(titles::DUPLICATE_FILE, e.to_string())),
            }
        }
        accepted
    }

    /// 待ち行列の先頭を1件処理する
    pub async fn upload_next(&mut self) -> Option<UploadOutcome> {
        let (key, file) = self.queue.pop()?;

        let prepared = match prepare_upload(&file, &self.config.compress_options()) {
            Ok(prepared) => prepared,
            Err(e) => {
                self.queue.release(&key);
                let title = match e {
                    BackOnTruckError::ImageDecode(_) => titles::DECODE_ERROR,
                    _ => titles::ENCODE_ERROR,
                };
                log::warn!("{}: {}", file.file_name, e);
                self.notify(Notification::error(title, format!("{}: {}", file.file_name, e)));
                return Some(UploadOutcome::Failed(e));
            }
        };

        let result = self
            .host
            .upload_file(&prepared.file_name, &prepared.file_type, &prepared.base64_data)
            .await;

        match result {
            Ok(file_id) => {
                log::info!("uploaded {} as {}", file.file_name, file_id);
                self.state.uploaded_file_ids.push(file_id.clone());
                self.state.is_file_uploaded = true;
                self.touch();
                self.notify(Notification::success(
                    titles::SUCCESS,
                    format!("{} uploaded.", file.file_name),
                ));
                Some(UploadOutcome::Uploaded(file_id))
            }
            Err(e) => {
                self.queue.release(&key);
                self.state.is_file_uploaded = false;
                self.touch();
                self.notify(Notification::error(titles::UPLOAD_ERROR, e.to_string()));
                Some(UploadOutcome::Failed(e))
            }
        }
    }

    /// 待ち行列を空になるまで処理し、成功件数を返す
    pub async fn process_uploads(&mut self) -> usize {
        let mut uploaded = 0;
        while let Some(outcome) = self.upload_next().await {
            if matches!(outcome, UploadOutcome::Uploaded(_)) {
                uploaded += 1;
            }
        }
        uploaded
    }

    /// ファイル選択イベント
    pub async fn on_files_selected(&mut self, files: Vec<SelectedFile>) -> usize {
        self.enqueue_files(files);
        self.process_uploads().await
    }

    /// ホスト側のアップロード部品で保存済みのファイルを登録する
    pub fn on_upload_finished(&mut self, document_ids: Vec<String>) {
        let count = document_ids.len();
        self.state
            .uploaded_file_ids
            .extend(document_ids.into_iter().map(UploadedFileRef));
        self.state.is_file_uploaded = self.state.is_file_uploaded || count > 0;
        self.touch();
        self.notify(Notification::success(titles::SUCCESS, format!("{} file(s) uploaded.", count)));
    }

    // ---- 送信 ----

    /// レコード作成成功イベント
    ///
    /// 待機中のアップロードを先に処理してから、ドライバー更新・ファイル紐付け・
    /// 位置書き込みを互いに待たずに実行し、結果をまとめて1件通知してから遷移する。
    pub async fn on_submit_success(&mut self, record_id: &str) -> SubmissionOutcome {
        if self.queue.len() > 0 {
            log::info!("draining {} pending upload(s) before commit", self.queue.len());
            self.process_uploads().await;
        }

        self.state.record_id = Some(record_id.to_string());
        self.touch();

        let driver = self.state.selected_driver.clone().unwrap_or_default();
        let team = self.state.user_team.clone().unwrap_or_default();
        let file_ids = self.state.uploaded_file_ids.clone();
        let location = self
            .state
            .location
            .filter(|_| self.config.record_location_on_submit);

        let host = &self.host;
        let driver_update = async { Some(host.update_driver_name(record_id, &driver, &team).await) };
        let file_link = async {
            if file_ids.is_empty() {
                None
            } else {
                Some(host.link_files_to_record(record_id, &file_ids).await)
            }
        };
        let location_update = async {
            match location {
                Some(sample) => Some(host.update_parking_log_location(record_id, sample).await),
                None => None,
            }
        };

        let (driver_result, link_result, location_result) =
            futures::join!(driver_update, file_link, location_update);

        let mut outcome = SubmissionOutcome {
            record_id: record_id.to_string(),
            driver_update: StepOutcome::from_result(driver_result),
            file_link: StepOutcome::from_result(link_result),
            location_update: StepOutcome::from_result(location_result),
            navigation: None,
        };
        for (step, message) in outcome.failures() {
            log::warn!("{} failed for {}: {}", step, record_id, message);
        }
        self.notify(outcome.summary());

        outcome.navigation = self.navigate_away();
        outcome
    }

    /// レコード作成失敗イベント
    pub fn on_submit_error(&self, message: &str) {
        self.notify(Notification::error(titles::ERROR, message));
    }

    /// 送信せずに閉じる
    pub fn close(&self) -> Option<NavigationTarget> {
        self.navigate_away()
    }

    fn navigate_away(&self) -> Option<NavigationTarget> {
        match navigation::navigate(
            &self.shell,
            &self.config.navigation,
            self.context_record_id.as_deref(),
        ) {
            Ok(target) => Some(target),
            Err(_) => {
                self.notify(Notification::error(
                    titles::NAVIGATION_ERROR,
                    "Record ID is missing. Cannot navigate.",
                ));
                None
            }
        }
    }
}
