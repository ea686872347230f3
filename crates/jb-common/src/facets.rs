//! ファセット件数のクライアント側再計算
//!
//! サーバーへの往復なしに「このカテゴリで X も選んだら何件残るか」を
//! メタデータスナップショットから導出する。対象カテゴリ自身の選択は
//! 無視し、他カテゴリの選択と金額条件だけを適用する。
//!
//! キーワード条件は意図的に反映しない。スナップショットは全文フィールドを
//! 持たない縮約形であり、体感速度を優先した既知の制限である。件数は
//! 選択肢のグレーアウト表示にのみ使い、表示対象の絞り込みには使わない。

use std::collections::HashMap;

use crate::filter::{FacetKind, JobFilter};
use crate::{JobMetadata, WorkStyle};

/// ファセット値 → 残件数のマップ一式
#[derive(Debug, Clone, Default, PartialEq, serde::Serialize)]
pub struct FacetCounts {
    /// 職種スラッグごとの件数
    pub roles: HashMap<String, u32>,
    pub work_styles: HashMap<WorkStyle, u32>,
    /// スキル名ごとの件数（1案件が複数スキルを持てば複数カウント）
    pub skills: HashMap<String, u32>,
}

impl FacetCounts {
    pub fn role_count(&self, slug: &str) -> u32 {
        self.roles.get(slug).copied().unwrap_or(0)
    }

    pub fn work_style_count(&self, style: WorkStyle) -> u32 {
        self.work_styles.get(&style).copied().unwrap_or(0)
    }

    pub fn skill_count(&self, name: &str) -> u32 {
        self.skills.get(name).copied().unwrap_or(0)
    }
}

fn matches_price(job: &JobMetadata, filter: &JobFilter) -> bool {
    if let Some(min) = filter.min_price {
        if !job.price_min.is_some_and(|p| p >= min) {
            return false;
        }
    }
    if let Some(max) = filter.max_price {
        if !job.price_max.is_some_and(|p| p <= max) {
            return false;
        }
    }
    true
}

fn matches_roles(job: &JobMetadata, filter: &JobFilter) -> bool {
    filter.roles.is_empty() || filter.roles.iter().any(|slug| *slug == job.role.slug)
}

fn matches_work_styles(job: &JobMetadata, filter: &JobFilter) -> bool {
    filter.work_styles.is_empty() || filter.work_styles.contains(&job.work_style)
}

/// スキルはANYマッチ: 選択スキルのどれか1つでも持っていれば残る
fn matches_skills(job: &JobMetadata, filter: &JobFilter) -> bool {
    filter.skills.is_empty()
        || job
            .skills
            .iter()
            .any(|skill| filter.skills.iter().any(|selected| selected == skill))
}

/// 対象カテゴリ `target` の選択だけを除外して生存判定する
fn survives_excluding(job: &JobMetadata, filter: &JobFilter, target: FacetKind) -> bool {
    if !matches_price(job, filter) {
        return false;
    }
    if target != FacetKind::Role && !matches_roles(job, filter) {
        return false;
    }
    if target != FacetKind::WorkStyle && !matches_work_styles(job, filter) {
        return false;
    }
    if target != FacetKind::Skill && !matches_skills(job, filter) {
        return false;
    }
    true
}

/// スナップショット全体からカテゴリ別の残件数を集計する
pub fn count_facets(snapshot: &[JobMetadata], filter: &JobFilter) -> FacetCounts {
    let mut counts = FacetCounts::default();

    for job in snapshot {
        if survives_excluding(job, filter, FacetKind::Role) {
            *counts.roles.entry(job.role.slug.clone()).or_insert(0) += 1;
        }

        if survives_excluding(job, filter, FacetKind::WorkStyle) {
            *counts.work_styles.entry(job.work_style).or_insert(0) += 1;
        }

        if survives_excluding(job, filter, FacetKind::Skill) {
            for skill in &job.skills {
                *counts.skills.entry(skill.clone()).or_insert(0) += 1;
            }
        }
    }

    counts
}
