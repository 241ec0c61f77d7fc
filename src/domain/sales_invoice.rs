// ==========================================
// Accurate 导入服务 - 销售发票领域模型
// ==========================================
// 对齐: sales_invoices 表
// 金额: 本地以最小货币单位 (整数) 存储
// ==========================================

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SalesInvoice {
    pub id: i64,
    pub accurate_id: Option<String>,
    pub invoice_number: String,
    pub customer_name: String,
    pub amount: i64,
    pub status: String,
    pub date: String,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewSalesInvoice {
    pub accurate_id: Option<String>,
    pub invoice_number: String,
    pub customer_name: String,
    pub amount: i64,
    pub status: String,
    pub date: String,
}

/// 远端金额 (实数单位) -> 本地最小货币单位
pub fn to_minor_units(amount: f64) -> i64 {
    (amount * 100.0).round() as i64
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_to_minor_units_rounds() {
        assert_eq!(to_minor_units(1500000.0), 150000000);
        assert_eq!(to_minor_units(12.345), 1235);
        assert_eq!(to_minor_units(0.1 + 0.2), 30);
        assert_eq!(to_minor_units(-4.5), -450);
    }
}
