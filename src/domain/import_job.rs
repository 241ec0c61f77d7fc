// ==========================================
// Accurate 导入服务 - 导入任务领域模型
// ==========================================
// 对齐: import_jobs 表
// 不变量: processed = successful + failed <= total
// ==========================================

use crate::domain::types::{ImportStatus, ImportType};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

// ==========================================
// ImportJob - 导入任务
// ==========================================
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ImportJob {
    pub id: i64,
    #[serde(rename = "type")]
    pub import_type: ImportType,
    pub file_name: String,
    pub status: ImportStatus,

    // ===== 进度计数 =====
    pub total_records: i64,
    pub processed_records: i64,
    pub successful_records: i64,
    pub failed_records: i64,

    // ===== 错误列表 (按行顺序) =====
    pub errors: Vec<String>,

    // ===== 时间戳 =====
    pub created_at: DateTime<Utc>,
    pub started_at: Option<DateTime<Utc>>,
    pub completed_at: Option<DateTime<Utc>>,
}

impl ImportJob {
    /// 计数不变量检查
    pub fn counters_consistent(&self) -> bool {
        self.processed_records == self.successful_records + self.failed_records
            && self.processed_records <= self.total_records
    }
}

// ==========================================
// JobProgress - 单个任务的运行期进度
// ==========================================
// 错误列表有上限; 超出部分只计数, 收尾时追加一条汇总
#[derive(Debug, Clone, PartialEq)]
pub struct JobProgress {
    pub total: i64,
    pub processed: i64,
    pub successful: i64,
    pub failed: i64,
    pub errors: Vec<String>,
    max_errors: usize,
    dropped_errors: usize,
}

impl JobProgress {
    pub fn new(total: usize, max_errors: usize) -> Self {
        Self {
            total: total as i64,
            processed: 0,
            successful: 0,
            failed: 0,
            errors: Vec::new(),
            max_errors,
            dropped_errors: 0,
        }
    }

    pub fn record_success(&mut self) {
        self.processed += 1;
        self.successful += 1;
    }

    pub fn record_failure(&mut self, message: String) {
        self.processed += 1;
        self.failed += 1;
        if self.errors.len() < self.max_errors {
            self.errors.push(message);
        } else {
            self.dropped_errors += 1;
        }
    }

    /// 被截断的错误条数
    pub fn dropped_errors(&self) -> usize {
        self.dropped_errors
    }

    /// 收尾: 返回最终错误列表 (含截断汇总)
    pub fn finalize_errors(&self) -> Vec<String> {
        let mut errors = self.errors.clone();
        if self.dropped_errors > 0 {
            errors.push(format!("... and {} more errors", self.dropped_errors));
        }
        errors
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_progress_counts_stay_consistent() {
        let mut progress = JobProgress::new(3, 10);
        progress.record_success();
        progress.record_failure("Failed to save B: boom".to_string());
        progress.record_success();

        assert_eq!(progress.processed, 3);
        assert_eq!(progress.successful, 2);
        assert_eq!(progress.failed, 1);
        assert_eq!(progress.processed, progress.successful + progress.failed);
        assert_eq!(progress.finalize_errors(), vec!["Failed to save B: boom"]);
    }

    #[test]
    fn test_error_list_is_capped() {
        let mut progress = JobProgress::new(5, 2);
        for i in 0..5 {
            progress.record_failure(format!("error {}", i));
        }

        assert_eq!(progress.failed, 5);
        assert_eq!(progress.errors.len(), 2);
        assert_eq!(progress.dropped_errors(), 3);

        let errors = progress.finalize_errors();
        assert_eq!(errors.len(), 3);
        assert_eq!(errors[2], "... and 3 more errors");
    }

    #[test]
    fn test_zero_cap_keeps_only_summary() {
        let mut progress = JobProgress::new(1, 0);
        progress.record_failure("x".to_string());
        assert_eq!(progress.finalize_errors(), vec!["... and 1 more errors"]);
    }
}
