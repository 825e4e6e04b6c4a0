//! 送信時のリモート処理結果

use crate::error::Result;
use crate::navigation::NavigationTarget;
use back_on_truck_common::Notification;

/// 1ステップの結果
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StepOutcome {
    Succeeded,
    Skipped,
    Failed(String),
}

impl StepOutcome {
    pub fn is_failed(&self) -> bool {
        matches!(self, StepOutcome::Failed(_))
    }

    pub(crate) fn from_result(result: Option<Result<()>>) -> Self {
        match result {
            None => StepOutcome::Skipped,
            Some(Ok(())) => StepOutcome::Succeeded,
            Some(Err(e)) => StepOutcome::Failed(e.to_string()),
        }
    }
}

/// 送信処理の結果（各リモート処理は独立、ロールバックなし）
#[derive(Debug, Clone)]
pub struct SubmissionOutcome {
    pub record_id: String,
    pub driver_update: StepOutcome,
    pub file_link: StepOutcome,
    pub location_update: StepOutcome,
    /// 遷移できなかった場合は `None`
    pub navigation: Option<NavigationTarget>,
}

impl SubmissionOutcome {
    fn steps(&self) -> [(&'static str, &StepOutcome); 3] {
        [
            ("Driver update", &self.driver_update),
            ("File linking", &self.file_link),
            ("Location update", &self.location_update),
        ]
    }

    pub fn all_succeeded(&self) -> bool {
        self.steps().iter().all(|(_, s)| !s.is_failed())
    }

    pub fn failures(&self) -> Vec<(&'static str, &str)> {
        self.steps()
            .into_iter()
            .filter_map(|(name, step)| match step {
                StepOutcome::Failed(msg) => Some((name, msg.as_str())),
                _ => None,
            })
            .collect()
    }

    /// 全ステップをまとめた1件の通知
    pub fn summary(&self) -> Notification {
        if self.all_succeeded() {
            let mut done: Vec<&str> = self
                .steps()
                .iter()
                .filter(|(_, s)| **s == StepOutcome::Succeeded)
                .map(|(name, _)| *name)
                .collect();
            if done.is_empty() {
                done.push("Record");
            }
            Notification::success(
                "Success",
                format!("Record {} saved ({}).", self.record_id, done.join(", ")),
            )
        } else {
            let detail = self
                .failures()
                .iter()
                .map(|(name, msg)| format!("{} failed: {}", name, msg))
                .collect::<Vec<_>>()
                .join("; ");
            Notification::error("Error Saving Details", detail)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::BackOnTruckError;

    fn outcome(driver: StepOutcome, files: StepOutcome, location: StepOutcome) -> SubmissionOutcome {
        SubmissionOutcome {
            record_id: "a0B5g00000XyZ12".into(),
            driver_update: driver,
            file_link: files,
            location_update: location,
            navigation: None,
        }
    }

    #[test]
    fn test_from_result() {
        assert_eq!(StepOutcome::from_result(None), StepOutcome::Skipped);
        assert_eq!(StepOutcome::from_result(Some(Ok(()))), StepOutcome::Succeeded);
        let failed = StepOutcome::from_result(Some(Err(BackOnTruckError::remote("linkFilesToRecord", "locked"))));
        assert!(matches!(failed, StepOutcome::Failed(msg) if msg.contains("locked")));
    }

    #[test]
    fn test_summary_success_lists_done_steps() {
        let o = outcome(StepOutcome::Succeeded, StepOutcome::Skipped, StepOutcome::Skipped);
        let n = o.summary();
        assert!(!n.is_error());
        assert!(n.message.contains("Driver update"));
        assert!(!n.message.contains("File linking"));
    }

    #[test]
    fn test_summary_failure_names_each_failed_step() {
        let o = outcome(
            StepOutcome::Failed("no access".into()),
            StepOutcome::Succeeded,
            StepOutcome::Failed("locked".into()),
        );
        assert!(!o.all_succeeded());
        assert_eq!(o.failures().len(), 2);
        let n = o.summary();
        assert!(n.is_error());
        assert!(n.message.contains("Driver update failed: no access"));
        assert!(n.message.contains("Location update failed: locked"));
    }
}
