/// The number of columns in an exchange spreadsheet.
pub(crate) const WIDTH: usize = 12;

/// The header row, in column order.
pub const HEADERS: [&str; WIDTH] = [
    "公司名称",
    "岗位",
    "地点",
    "投递时间",
    "当前状态",
    "当前状态日期",
    "最终结果",
    "泡池时间",
    "预期薪资",
    "流程进度",
    "备注",
    "公司链接",
];

pub(crate) const EMPLOYER: usize = 0;
pub(crate) const POSITION: usize = 1;
pub(crate) const LOCATION: usize = 2;
pub(crate) const APPLY_TIME: usize = 3;
pub(crate) const STATUS: usize = 4;
pub(crate) const STATUS_DATE: usize = 5;
pub(crate) const OUTCOME: usize = 6;
pub(crate) const POOL_DAYS: usize = 7;
pub(crate) const COMPENSATION: usize = 8;
pub(crate) const TIMELINE: usize = 9;
pub(crate) const REMARKS: usize = 10;
pub(crate) const URL: usize = 11;

/// Suffix of the pool-days column.
pub(crate) const DAYS_SUFFIX: &str = "天";
