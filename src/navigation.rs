//! 完了後の画面遷移

use crate::error::{BackOnTruckError, Result};
use lazy_static::lazy_static;
use regex::Regex;
use serde::{Deserialize, Serialize};

pub const DEFAULT_EXIT_URL: &str = "/lightning/page/home";
pub const DEFAULT_OBJECT_API_NAME: &str = "Dumpsters__c";

lazy_static! {
    // 15桁または18桁の英数字
    static ref RECORD_ID: Regex = Regex::new(r"^[a-zA-Z0-9]{15}(?:[a-zA-Z0-9]{3})?$").unwrap();
}

pub fn is_record_id(id: &str) -> bool {
    RECORD_ID.is_match(id)
}

/// ホストシェル（デスクトップWeb / モバイルラッパー）の遷移機能
pub trait HostShell {
    fn is_mobile_app(&self) -> bool;
    fn go_back(&self);
    fn open_url(&self, url: &str);
    fn open_record(&self, record_id: &str, object_api_name: &str, action: &str);
}

/// 遷移方法（設定値）
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "mode", rename_all = "camelCase")]
pub enum NavigationPolicy {
    /// モバイルシェル内なら戻る、それ以外は `exit_url` を開く
    ShellBack { exit_url: String },
    /// コンテキストレコードの標準レコードページを開く
    RecordPage { object_api_name: String },
}

impl Default for NavigationPolicy {
    fn default() -> Self {
        NavigationPolicy::ShellBack {
            exit_url: DEFAULT_EXIT_URL.into(),
        }
    }
}

/// 実際に行った遷移
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NavigationTarget {
    ShellBack,
    Url(String),
    RecordPage { record_id: String, object_api_name: String },
}

/// ポリシーに従って遷移する
///
/// `RecordPage` でコンテキストレコードIDが無い場合は遷移せず `MissingRecordId` を返す。
/// 空でなくても15桁/18桁の英数字でないIDは無いものとして扱う（存在チェックより厳しい）。
pub fn navigate<S: HostShell>(
    shell: &S,
    policy: &NavigationPolicy,
    context_record_id: Option<&str>,
) -> Result<NavigationTarget> {
    match policy {
        NavigationPolicy::ShellBack { exit_url } => {
            if shell.is_mobile_app() {
                shell.go_back();
                Ok(NavigationTarget::ShellBack)
            } else {
                shell.open_url(exit_url);
                Ok(NavigationTarget::Url(exit_url.clone()))
            }
        }
        NavigationPolicy::RecordPage { object_api_name } => {
            let record_id = context_record_id
                .filter(|id| is_record_id(id))
                .ok_or(BackOnTruckError::MissingRecordId)?;
            shell.open_record(record_id, object_api_name, "view");
            Ok(NavigationTarget::RecordPage {
                record_id: record_id.to_string(),
                object_api_name: object_api_name.clone(),
            })
        }
    }
}

/// 遷移先を標準出力に表示する（CLI用）
#[derive(Debug, Default, Clone, Copy)]
pub struct ConsoleShell {
    pub mobile: bool,
}

impl HostShell for ConsoleShell {
    fn is_mobile_app(&self) -> bool {
        self.mobile
    }

    fn go_back(&self) {
        println!("→ モバイルシェル: 戻る");
    }

    fn open_url(&self, url: &str) {
        println!("→ 遷移: {}", url);
    }

    fn open_record(&self, record_id: &str, object_api_name: &str, action: &str) {
        println!("→ レコードページ: {}/{} ({})", object_api_name, record_id, action);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;

    #[derive(Default)]
    struct FakeShell {
        mobile: bool,
        calls: RefCell<Vec<String>>,
    }

    impl HostShell for FakeShell {
        fn is_mobile_app(&self) -> bool {
            self.mobile
        }
        fn go_back(&self) {
            self.calls.borrow_mut().push("back".into());
        }
        fn open_url(&self, url: &str) {
            self.calls.borrow_mut().push(format!("url:{}", url));
        }
        fn open_record(&self, record_id: &str, object_api_name: &str, action: &str) {
            self.calls
                .borrow_mut()
                .push(format!("record:{}:{}:{}", object_api_name, record_id, action));
        }
    }

    #[test]
    fn test_record_id_format() {
        assert!(is_record_id("a0B5g00000XyZ12"));
        assert!(is_record_id("a0B5g00000XyZ12AAB"));
        assert!(!is_record_id("a0B5g00000XyZ1"));
        assert!(!is_record_id("a0B5g00000XyZ12AA"));
        assert!(!is_record_id("a0B5g00000-yZ12"));
        assert!(!is_record_id(""));
    }

    #[test]
    fn test_mobile_shell_goes_back() {
        let shell = FakeShell { mobile: true, ..Default::default() };
        let target = navigate(&shell, &NavigationPolicy::default(), None).unwrap();
        assert_eq!(target, NavigationTarget::ShellBack);
        assert_eq!(*shell.calls.borrow(), vec!["back".to_string()]);
    }

    #[test]
    fn test_desktop_opens_exit_url() {
        let shell = FakeShell::default();
        let policy = NavigationPolicy::ShellBack { exit_url: "https://exit.example".into() };
        let target = navigate(&shell, &policy, Some("a0B5g00000XyZ12")).unwrap();
        assert_eq!(target, NavigationTarget::Url("https://exit.example".into()));
        assert_eq!(*shell.calls.borrow(), vec!["url:https://exit.example".to_string()]);
    }

    #[test]
    fn test_record_page_uses_context_record() {
        let shell = FakeShell::default();
        let policy = NavigationPolicy::RecordPage { object_api_name: DEFAULT_OBJECT_API_NAME.into() };
        navigate(&shell, &policy, Some("a0B5g00000XyZ12")).unwrap();
        assert_eq!(
            *shell.calls.borrow(),
            vec!["record:Dumpsters__c:a0B5g00000XyZ12:view".to_string()]
        );
    }

    #[test]
    fn test_record_page_without_record_id() {
        let shell = FakeShell::default();
        let policy = NavigationPolicy::RecordPage { object_api_name: DEFAULT_OBJECT_API_NAME.into() };
        let err = navigate(&shell, &policy, None).unwrap_err();
        assert!(matches!(err, BackOnTruckError::MissingRecordId));
        assert!(shell.calls.borrow().is_empty());
    }

    #[test]
    fn test_record_page_rejects_malformed_record_id() {
        let shell = FakeShell::default();
        let policy = NavigationPolicy::RecordPage { object_api_name: DEFAULT_OBJECT_API_NAME.into() };
        for id in ["", "bogus", "a0B5g00000XyZ12A", "a0B5g00000/yZ12"] {
            let err = navigate(&shell, &policy, Some(id)).unwrap_err();
            assert!(matches!(err, BackOnTruckError::MissingRecordId), "{id}");
        }
        assert!(shell.calls.borrow().is_empty());
    }

    #[test]
    fn test_policy_json_shape() {
        let policy: NavigationPolicy =
            serde_json::from_str(r#"{"mode": "recordPage", "object_api_name": "Dumpsters__c"}"#).unwrap();
        assert_eq!(policy, NavigationPolicy::RecordPage { object_api_name: "Dumpsters__c".into() });
    }
}
