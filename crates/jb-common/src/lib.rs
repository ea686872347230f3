pub mod catalog;
pub mod db;
pub mod facets;
pub mod filter;
pub mod listing;
pub mod logging;
pub mod normalize;
pub mod schema;
pub mod search_query;

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// 勤務形態ENUM（jobs.work_style カラムと同じ値を持つ）
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum WorkStyle {
    Remote,
    Hybrid,
    Onsite,
}

impl WorkStyle {
    pub fn as_str(&self) -> &'static str {
        match self {
            WorkStyle::Remote => "remote",
            WorkStyle::Hybrid => "hybrid",
            WorkStyle::Onsite => "onsite",
        }
    }
}

impl fmt::Display for WorkStyle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for WorkStyle {
    type Err = UnknownWorkStyle;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value {
            "remote" => Ok(WorkStyle::Remote),
            "hybrid" => Ok(WorkStyle::Hybrid),
            "onsite" => Ok(WorkStyle::Onsite),
            other => Err(UnknownWorkStyle(other.to_string())),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown work_style: {0}")]
pub struct UnknownWorkStyle(pub String);

/// 案件に紐づく職種（roles テーブルの表示名とスラッグ）
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct JobRole {
    pub name: String,
    pub slug: String,
}

/// 公開中の案件1件。一覧・詳細の両方で使う結合済みの形。
#[derive(Debug, Clone, Serialize)]
pub struct Job {
    pub id: Uuid,
    pub job_code: Option<String>,
    pub title: String,
    pub role: JobRole,
    pub work_style: WorkStyle,
    /// 月額単価の下限・上限（円）。未設定の案件もある。
    pub price_min: Option<i64>,
    pub price_max: Option<i64>,
    pub location: Option<String>,
    pub duration_months: Option<i32>,
    pub skills: Vec<String>,
    pub description_md: String,
    pub requirements_md: Option<String>,
    pub nice_to_have_md: Option<String>,
    pub created_at: DateTime<Utc>,
}

/// ファセット集計専用の縮約プロジェクション
///
/// 公開中 (`status = 'published' AND is_active`) の全案件について一度だけ
/// 取得し、クライアント側での件数再計算にのみ使う。カード描画には使わない。
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JobMetadata {
    pub id: Uuid,
    pub work_style: WorkStyle,
    pub role: JobRole,
    pub price_min: Option<i64>,
    pub price_max: Option<i64>,
    pub skills: Vec<String>,
}
