//! トースト通知の出力先

use back_on_truck_common::{Notification, Variant};
use std::cell::RefCell;

pub trait Notifier {
    fn notify(&self, notification: Notification);
}

impl<N: Notifier + ?Sized> Notifier for &N {
    fn notify(&self, notification: Notification) {
        (**self).notify(notification)
    }
}

/// 標準出力/標準エラーへ表示する（CLI用）
#[derive(Debug, Default, Clone, Copy)]
pub struct ConsoleNotifier;

impl Notifier for ConsoleNotifier {
    fn notify(&self, n: Notification) {
        match n.variant {
            Variant::Success => println!("✔ {}: {}", n.title, n.message),
            Variant::Info => println!("- {}: {}", n.title, n.message),
            Variant::Warning => eprintln!("⚠ {}: {}", n.title, n.message),
            Variant::Error => eprintln!("✖ {}: {}", n.title, n.message),
        }
    }
}

/// 通知をメモリに溜める
#[derive(Debug, Default)]
pub struct NotificationLog {
    entries: RefCell<Vec<Notification>>,
}

impl NotificationLog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn entries(&self) -> Vec<Notification> {
        self.entries.borrow().clone()
    }

    pub fn len(&self) -> usize {
        self.entries.borrow().len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.borrow().is_empty()
    }

    pub fn count_titled(&self, title: &str) -> usize {
        self.entries.borrow().iter().filter(|n| n.title == title).count()
    }

    pub fn errors(&self) -> Vec<Notification> {
        self.entries.borrow().iter().filter(|n| n.is_error()).cloned().collect()
    }

    pub fn clear(&self) {
        self.entries.borrow_mut().clear();
    }
}

impl Notifier for NotificationLog {
    fn notify(&self, notification: Notification) {
        log::debug!("notify [{}] {}: {}", notification.variant, notification.title, notification.message);
        self.entries.borrow_mut().push(notification);
    }
}
