use back_on_truck_common::{LocationSample, UploadedFileRef};

/// フォームセッションの状態
///
/// 変更は必ず `FormSession` を通り、そのたびに `revision` が進む。
#[derive(Debug, Clone)]
pub struct SessionState {
    pub location: Option<LocationSample>,
    pub address: Option<String>,
    pub map_url: Option<String>,
    /// 「位置情報をオンにしてください」警告の表示
    pub show_location_warning: bool,
    pub uploaded_file_ids: Vec<UploadedFileRef>,
    pub is_file_uploaded: bool,
    pub drivers: Vec<String>,
    pub selected_driver: Option<String>,
    pub user_team: Option<String>,
    /// 作成されたレコードのID（送信成功後）
    pub record_id: Option<String>,
    pub(crate) revision: u64,
}

impl Default for SessionState {
    fn default() -> Self {
        Self {
            location: None,
            address: None,
            map_url: None,
            show_location_warning: true,
            uploaded_file_ids: Vec::new(),
            is_file_uploaded: false,
            drivers: Vec::new(),
            selected_driver: None,
            user_team: None,
            record_id: None,
            revision: 0,
        }
    }
}

impl SessionState {
    pub fn revision(&self) -> u64 {
        self.revision
    }

    pub fn has_location(&self) -> bool {
        self.location.is_some()
    }

    pub fn is_roster_member(&self, name: &str) -> bool {
        self.drivers.iter().any(|d| d == name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_initial_state_shows_warning() {
        let state = SessionState::default();
        assert!(state.show_location_warning);
        assert!(!state.has_location());
        assert!(state.uploaded_file_ids.is_empty());
        assert_eq!(state.revision(), 0);
    }

    #[test]
    fn test_roster_membership_is_exact() {
        let state = SessionState {
            drivers: vec!["Ravi".into(), "Anand".into()],
            ..Default::default()
        };
        assert!(state.is_roster_member("Ravi"));
        assert!(!state.is_roster_member("ravi"));
        assert!(!state.is_roster_member(""));
    }
}
