use axum::{
    Json, debug_handler,
    extract::{Path, Query, State},
};
use serde::{Deserialize, Serialize};
use tracing::warn;
use uuid::Uuid;

use jb_common::db::{
    count_published_jobs, get_job_by_id, query_job_metadata, query_jobs, related_jobs,
};
use jb_common::facets::{FacetCounts, count_facets};
use jb_common::filter::JobFilter;
use jb_common::listing::PAGE_SIZE;
use jb_common::{Job, JobMetadata};

use crate::SharedState;
use crate::error::ApiError;
use crate::handlers::pagination::validate_pagination;

const RELATED_LIMIT: i64 = 3;

fn default_limit() -> i64 {
    PAGE_SIZE
}

/// `/api/jobs` 系が受け取るクエリパラメータ
///
/// 値はすべてURL由来の文字列として受け、`JobFilter` の防御的パースに委ねる。
#[derive(Debug, Default, Deserialize)]
pub struct JobSearchParams {
    pub q: Option<String>,
    pub roles: Option<String>,
    pub work_styles: Option<String>,
    pub skills: Option<String>,
    pub min_price: Option<String>,
    pub max_price: Option<String>,
    pub sort: Option<String>,
    #[serde(default = "default_limit")]
    pub limit: i64,
    #[serde(default)]
    pub offset: i64,
}

impl JobSearchParams {
    pub fn to_filter(&self) -> JobFilter {
        let mut pairs: Vec<(&str, &str)> = Vec::new();

        if let Some(q) = &self.q {
            pairs.push(("q", q));
        }
        if let Some(roles) = &self.roles {
            pairs.push(("roles", roles));
        }
        if let Some(styles) = &self.work_styles {
            pairs.push(("work_styles", styles));
        }
        if let Some(skills) = &self.skills {
            pairs.push(("skills", skills));
        }
        if let Some(min) = &self.min_price {
            pairs.push(("min_price", min));
        }
        if let Some(max) = &self.max_price {
            pairs.push(("max_price", max));
        }
        if let Some(sort) = &self.sort {
            pairs.push(("sort", sort));
        }

        JobFilter::from_query_pairs(pairs)
    }
}

#[derive(Debug, Serialize)]
pub struct JobListResponse {
    pub items: Vec<Job>,
    pub total_count: i64,
    pub limit: i64,
    pub offset: i64,
    pub has_more: bool,
}

fn has_more(offset: i64, page_len: usize, total_count: i64) -> bool {
    offset + (page_len as i64) < total_count
}

/// 検索条件に合致する案件の1ページと正確な総件数を返す
///
/// 件数クエリとデータクエリは同一の述語で並行発行し、両方の完了を待って
/// から応答する。
#[debug_handler]
pub async fn list_jobs(
    State(state): State<SharedState>,
    Query(params): Query<JobSearchParams>,
) -> Result<Json<JobListResponse>, ApiError> {
    let (limit, offset) = validate_pagination(params.limit, params.offset)?;
    let filter = params.to_filter();

    let (total_count, items) = tokio::join!(
        count_published_jobs(&state.pool, &filter),
        query_jobs(&state.pool, &filter, offset, limit),
    );
    let total_count = total_count?;
    let items = items?;

    let has_more = has_more(offset, items.len(), total_count);

    Ok(Json(JobListResponse {
        items,
        total_count,
        limit,
        offset,
        has_more,
    }))
}

/// ファセット集計用のメタデータスナップショット
pub async fn metadata(
    State(state): State<SharedState>,
) -> Result<Json<Vec<JobMetadata>>, ApiError> {
    let snapshot = query_job_metadata(&state.pool).await?;
    Ok(Json(snapshot))
}

#[derive(Debug, Serialize)]
pub struct FacetCountsResponse {
    /// スナップショット取得に失敗した場合は false（件数なしで選択肢を出す）
    pub available: bool,
    #[serde(flatten)]
    pub counts: FacetCounts,
}

/// 現在の検索条件に対するカテゴリ別の残件数
///
/// スナップショット取得の失敗はページ全体を壊さず、件数なしにデグレードする。
pub async fn facet_counts(
    State(state): State<SharedState>,
    Query(params): Query<JobSearchParams>,
) -> Result<Json<FacetCountsResponse>, ApiError> {
    let filter = params.to_filter();

    let response = match query_job_metadata(&state.pool).await {
        Ok(snapshot) => FacetCountsResponse {
            available: true,
            counts: count_facets(&snapshot, &filter),
        },
        Err(err) => {
            warn!(error = %err, "facet snapshot unavailable; rendering options without counts");
            FacetCountsResponse {
                available: false,
                counts: FacetCounts::default(),
            }
        }
    };

    Ok(Json(response))
}

pub async fn get_job(
    State(state): State<SharedState>,
    Path(id): Path<Uuid>,
) -> Result<Json<Job>, ApiError> {
    let job = get_job_by_id(&state.pool, id)
        .await?
        .ok_or_else(|| ApiError::NotFound(format!("job {id} not found")))?;

    Ok(Json(job))
}

/// 関連案件（スキル重複を優先し、同一職種でフォールバック）
pub async fn related(
    State(state): State<SharedState>,
    Path(id): Path<Uuid>,
) -> Result<Json<Vec<Job>>, ApiError> {
    let jobs = related_jobs(&state.pool, id, RELATED_LIMIT).await?;
    Ok(Json(jobs))
}

#[cfg(test)]
mod tests {
    use super::*;
    use jb_common::WorkStyle;
    use jb_common::filter::SortOrder;

    #[test]
    fn params_convert_to_filter() {
        let params = JobSearchParams {
            q: Some("Java リモート".into()),
            roles: Some("backend-engineer,sre".into()),
            work_styles: Some("remote".into()),
            skills: Some("Go言語".into()),
            min_price: Some("600000".into()),
            max_price: Some("not-a-number".into()),
            sort: Some("price_desc".into()),
            limit: 20,
            offset: 0,
        };

        let filter = params.to_filter();
        assert_eq!(filter.keyword, "Java リモート");
        assert_eq!(filter.roles.len(), 2);
        assert_eq!(filter.work_styles, vec![WorkStyle::Remote]);
        assert_eq!(filter.min_price, Some(600_000));
        // 不正な上限値は「指定なし」に倒す
        assert_eq!(filter.max_price, None);
        assert_eq!(filter.sort, SortOrder::PriceDesc);
    }

    #[test]
    fn empty_params_yield_default_filter() {
        let filter = JobSearchParams::default().to_filter();
        assert!(filter.is_empty());
        assert_eq!(filter.sort, SortOrder::Newest);
    }

    #[test]
    fn has_more_tracks_total_count() {
        assert!(has_more(0, 20, 45));
        assert!(has_more(20, 20, 45));
        assert!(!has_more(40, 5, 45));
        // 取得ページが総件数に届いた瞬間に false
        assert!(!has_more(0, 3, 3));
        assert!(!has_more(0, 0, 0));
    }
}
