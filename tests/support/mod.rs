//! テスト用のホスト・シェル・位置情報の代替実装

#![allow(dead_code)]

use back_on_truck::error::{BackOnTruckError, Result};
use back_on_truck::geo::{Geolocator, LocationError};
use back_on_truck::host::{procedures, HostProcedures};
use back_on_truck::navigation::HostShell;
use back_on_truck_common::{LocationSample, UploadedFileRef};
use image::{DynamicImage, ImageFormat, Rgb, RgbImage};
use std::cell::{Cell, RefCell};
use std::collections::HashSet;
use std::io::Cursor;

pub const RECORD_ID: &str = "a0B5g00000XyZ12AAB";

/// 呼び出しを記録するホスト
#[derive(Default)]
pub struct FakeHost {
    pub calls: RefCell<Vec<&'static str>>,
    pub uploads: RefCell<Vec<(String, String, String)>>,
    pub linked: RefCell<Vec<(String, Vec<UploadedFileRef>)>>,
    pub driver_updates: RefCell<Vec<(String, String, String)>>,
    pub location_updates: RefCell<Vec<(String, LocationSample)>>,
    pub profile: Option<String>,
    pub drivers: Vec<String>,
    pub address: String,
    /// 失敗させる手続き名
    pub failing: HashSet<&'static str>,
    pub next_id: Cell<u32>,
}

impl FakeHost {
    pub fn with_roster(profile: &str, drivers: &[&str]) -> Self {
        Self {
            profile: Some(profile.to_string()),
            drivers: drivers.iter().map(|d| d.to_string()).collect(),
            address: "12 Harbour Road, Chennai".to_string(),
            ..Default::default()
        }
    }

    pub fn failing(mut self, procedure: &'static str) -> Self {
        self.failing.insert(procedure);
        self
    }

    pub fn count(&self, procedure: &str) -> usize {
        self.calls.borrow().iter().filter(|c| **c == procedure).count()
    }

    fn enter(&self, procedure: &'static str) -> Result<()> {
        self.calls.borrow_mut().push(procedure);
        if self.failing.contains(procedure) {
            return Err(BackOnTruckError::remote(procedure, format!("{} is unavailable", procedure)));
        }
        Ok(())
    }
}

impl HostProcedures for FakeHost {
    async fn link_files_to_record(&self, record_id: &str, file_ids: &[UploadedFileRef]) -> Result<()> {
        self.enter(procedures::LINK_FILES_TO_RECORD)?;
        self.linked.borrow_mut().push((record_id.to_string(), file_ids.to_vec()));
        Ok(())
    }

    async fn upload_file(&self, file_name: &str, file_type: &str, base64_data: &str) -> Result<UploadedFileRef> {
        self.enter(procedures::UPLOAD_FILE)?;
        self.uploads.borrow_mut().push((
            file_name.to_string(),
            file_type.to_string(),
            base64_data.to_string(),
        ));
        let n = self.next_id.get() + 1;
        self.next_id.set(n);
        Ok(UploadedFileRef(format!("069000000000{:03}", n)))
    }

    async fn update_parking_log_location(&self, record_id: &str, location: LocationSample) -> Result<()> {
        self.enter(procedures::UPDATE_PARKING_LOG_LOCATION)?;
        self.location_updates.borrow_mut().push((record_id.to_string(), location));
        Ok(())
    }

    async fn get_address_from_coordinates(&self, _location: LocationSample) -> Result<String> {
        self.enter(procedures::GET_ADDRESS_FROM_COORDINATES)?;
        Ok(self.address.clone())
    }

    async fn get_user_profile_name(&self) -> Result<Option<String>> {
        self.enter(procedures::GET_USER_PROFILE_NAME)?;
        Ok(self.profile.clone())
    }

    async fn get_driver_names(&self, _profile_name: &str) -> Result<Vec<String>> {
        self.enter(procedures::GET_DRIVER_NAMES)?;
        Ok(self.drivers.clone())
    }

    async fn update_driver_name(&self, record_id: &str, driver: &str, user_team: &str) -> Result<()> {
        self.enter(procedures::UPDATE_DRIVER_NAME)?;
        self.driver_updates.borrow_mut().push((
            record_id.to_string(),
            driver.to_string(),
            user_team.to_string(),
        ));
        Ok(())
    }
}

/// 遷移を記録するシェル
#[derive(Default)]
pub struct FakeShell {
    pub mobile: bool,
    pub visits: RefCell<Vec<String>>,
}

impl HostShell for FakeShell {
    fn is_mobile_app(&self) -> bool {
        self.mobile
    }

    fn go_back(&self) {
        self.visits.borrow_mut().push("back".to_string());
    }

    fn open_url(&self, url: &str) {
        self.visits.borrow_mut().push(url.to_string());
    }

    fn open_record(&self, record_id: &str, object_api_name: &str, action: &str) {
        self.visits
            .borrow_mut()
            .push(format!("{}/{}/{}", object_api_name, record_id, action));
    }
}

/// 決まった結果を返す位置情報
pub struct FakeLocator(pub std::result::Result<LocationSample, LocationError>);

impl FakeLocator {
    pub fn at(latitude: f64, longitude: f64) -> Self {
        FakeLocator(Ok(LocationSample::new(latitude, longitude).unwrap()))
    }

    pub fn denied() -> Self {
        FakeLocator(Err(LocationError::PermissionDenied))
    }
}

impl Geolocator for FakeLocator {
    async fn current_position(&self) -> std::result::Result<LocationSample, LocationError> {
        self.0.clone()
    }
}

/// 単色画像をエンコードして返す
pub fn image_bytes(width: u32, height: u32, format: ImageFormat, shade: u8) -> Vec<u8> {
    let img = RgbImage::from_pixel(width, height, Rgb([shade, 90, 160]));
    let mut buf = Cursor::new(Vec::new());
    DynamicImage::ImageRgb8(img).write_to(&mut buf, format).unwrap();
    buf.into_inner()
}
