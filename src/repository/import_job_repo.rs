// ==========================================
// Accurate 导入服务 - 导入任务数据仓储
// ==========================================
// 对齐: import_jobs 表
// 红线: 状态转换在持锁期间校验, 不允许回退
// ==========================================

mod core;


pub use core::{ImportJobRepository, CANCELLED_MESSAGE};
