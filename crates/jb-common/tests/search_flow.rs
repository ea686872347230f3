//! 検索フローの結合テスト
//!
//! データソース契約（件数・ページ・メタデータ）をインメモリで満たす
//! カタログを立て、条件解釈からファセット集計・追い読みまでを通しで
//! 確認する。述語の意味論は公開検索面の契約そのもの（ILIKE 部分一致、
//! ANYマッチ、公開条件）に合わせてある。

use chrono::{Duration, Utc};
use uuid::Uuid;

use jb_common::facets::count_facets;
use jb_common::filter::JobFilter;
use jb_common::listing::{JobListLoader, JobSource};
use jb_common::search_query::parse_search_query;
use jb_common::{Job, JobMetadata, JobRole, WorkStyle};

/// ストア契約をインメモリで模したカタログ
struct MemoryCatalog {
    jobs: Vec<Job>,
}

fn contains_ci(haystack: &str, needle: &str) -> bool {
    haystack.to_lowercase().contains(&needle.to_lowercase())
}

impl MemoryCatalog {
    fn new(mut jobs: Vec<Job>) -> Self {
        // ストアと同じく新着順で返す
        jobs.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Self { jobs }
    }

    fn matches(job: &Job, filter: &JobFilter) -> bool {
        for group in parse_search_query(&filter.keyword) {
            let hit = group.iter().any(|variant| {
                contains_ci(&job.title, variant)
                    || contains_ci(&job.description_md, variant)
                    || job
                        .requirements_md
                        .as_deref()
                        .is_some_and(|req| contains_ci(req, variant))
            });
            if !hit {
                return false;
            }
        }

        if !filter.roles.is_empty() && !filter.roles.contains(&job.role.slug) {
            return false;
        }
        if !filter.work_styles.is_empty() && !filter.work_styles.contains(&job.work_style) {
            return false;
        }
        if !filter.skills.is_empty()
            && !job
                .skills
                .iter()
                .any(|skill| filter.skills.iter().any(|s| s == skill))
        {
            return false;
        }
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

    fn count(&self, filter: &JobFilter) -> i64 {
        self.jobs
            .iter()
            .filter(|job| Self::matches(job, filter))
            .count() as i64
    }

    fn page(&self, filter: &JobFilter, offset: i64, limit: i64) -> Vec<Job> {
        self.jobs
            .iter()
            .filter(|job| Self::matches(job, filter))
            .skip(offset as usize)
            .take(limit as usize)
            .cloned()
            .collect()
    }

    fn metadata(&self) -> Vec<JobMetadata> {
        self.jobs
            .iter()
            .map(|job| JobMetadata {
                id: job.id,
                work_style: job.work_style,
                role: job.role.clone(),
                price_min: job.price_min,
                price_max: job.price_max,
                skills: job.skills.clone(),
            })
            .collect()
    }
}

#[derive(Debug, thiserror::Error)]
#[error("unreachable")]
struct Never;

impl JobSource for MemoryCatalog {
    type Error = Never;

    async fn query_jobs(
        &self,
        filter: &JobFilter,
        offset: i64,
        limit: i64,
    ) -> Result<Vec<Job>, Never> {
        Ok(self.page(filter, offset, limit))
    }
}

fn job(n: i64, title: &str, role_slug: &str, skills: &[&str]) -> Job {
    Job {
        id: Uuid::from_u128(n as u128),
        job_code: None,
        title: title.to_string(),
        role: JobRole {
            name: role_slug.to_string(),
            slug: role_slug.to_string(),
        },
        work_style: WorkStyle::Remote,
        price_min: Some(600_000),
        price_max: Some(800_000),
        location: None,
        duration_months: None,
        skills: skills.iter().map(|s| s.to_string()).collect(),
        description_md: String::new(),
        requirements_md: None,
        nice_to_have_md: None,
        created_at: Utc::now() - Duration::hours(n),
    }
}

#[test]
fn skill_filter_returns_only_matching_job() {
    let catalog = MemoryCatalog::new(vec![
        job(1, "A: バックエンド開発", "backend-engineer", &["Go言語"]),
        job(2, "B: フロント開発", "frontend-engineer", &["React"]),
        job(3, "C: PM支援", "pm", &[]),
    ]);

    let filter = JobFilter::from_query_pairs([("skills", "Go言語")]);

    assert_eq!(catalog.count(&filter), 1);
    let page = catalog.page(&filter, 0, 20);
    assert_eq!(page.len(), 1);
    assert!(page[0].title.starts_with("A:"));
}

#[test]
fn skill_filter_is_any_match_not_all() {
    let catalog = MemoryCatalog::new(vec![
        job(1, "Go案件", "backend-engineer", &["Go言語"]),
        job(2, "Python案件", "backend-engineer", &["Python"]),
    ]);

    let filter = JobFilter::from_query_pairs([("skills", "Go言語,Python")]);
    assert_eq!(catalog.count(&filter), 2);
}

#[test]
fn hiragana_keyword_matches_katakana_title() {
    let catalog = MemoryCatalog::new(vec![
        job(1, "【フルリモート】Go開発", "backend-engineer", &["Go言語"]),
        job(2, "常駐のレガシー保守", "system-engineer", &[]),
    ]);

    // クエリ側はひらがなのみだが、カタカナ展開でタイトルにヒットする
    let filter = JobFilter::from_query_pairs([("q", "ふるりもーと")]);

    assert_eq!(catalog.count(&filter), 1);
    let page = catalog.page(&filter, 0, 20);
    assert_eq!(page[0].id, Uuid::from_u128(1));
}

#[test]
fn count_and_page_use_identical_predicates() {
    let catalog = MemoryCatalog::new(vec![
        job(1, "Go/AWS バックエンド", "backend-engineer", &["Go言語", "AWS"]),
        job(2, "React フロント", "frontend-engineer", &["React"]),
        job(3, "Java 保守", "backend-engineer", &["Java"]),
        job(4, "PMO 支援", "pmo", &[]),
    ]);

    for pairs in [
        vec![],
        vec![("roles", "backend-engineer")],
        vec![("q", "Go"), ("skills", "AWS")],
        vec![("min_price", "700000")],
        vec![("skills", "存在しないスキル")],
    ] {
        let filter = JobFilter::from_query_pairs(pairs.iter().copied());
        let total = catalog.count(&filter);
        let all = catalog.page(&filter, 0, i64::MAX);
        assert_eq!(total, all.len() as i64);
    }
}

#[test]
fn zero_match_filter_is_empty_not_an_error() {
    let catalog = MemoryCatalog::new(vec![job(1, "Go案件", "backend-engineer", &["Go言語"])]);
    let filter = JobFilter::from_query_pairs([("skills", "COBOL")]);

    assert_eq!(catalog.count(&filter), 0);
    assert!(catalog.page(&filter, 0, 20).is_empty());
}

#[tokio::test]
async fn loader_pages_through_catalog_until_exhausted() {
    let jobs: Vec<Job> = (1..=5)
        .map(|n| job(n, &format!("案件{n}"), "backend-engineer", &["Go言語"]))
        .collect();
    let catalog = MemoryCatalog::new(jobs);

    let filter = JobFilter::default();
    let total = catalog.count(&filter);
    let initial = catalog.page(&filter, 0, 2);
    let mut loader = JobListLoader::with_page_size(filter, initial, total, 2);

    assert!(loader.has_more());
    assert_eq!(loader.load_more(&catalog).await.unwrap(), 2);
    assert_eq!(loader.load_more(&catalog).await.unwrap(), 1);

    assert!(!loader.has_more());
    assert_eq!(loader.jobs().len(), 5);
    assert_eq!(loader.load_more(&catalog).await.unwrap(), 0);
}

#[test]
fn facet_counts_agree_with_store_counts() {
    let catalog = MemoryCatalog::new(vec![
        job(1, "Go/AWS", "backend-engineer", &["Go言語", "AWS"]),
        job(2, "React", "frontend-engineer", &["React"]),
        job(3, "Java", "backend-engineer", &["Java"]),
    ]);

    // 働き方だけを選択した状態で職種ファセットの件数を出す
    let filter = JobFilter::from_query_pairs([("work_styles", "remote")]);
    let counts = count_facets(&catalog.metadata(), &filter);

    // 「この職種も選んだら何件か」はストアに同じ条件を問い合わせた結果と一致する
    for slug in ["backend-engineer", "frontend-engineer"] {
        let mut with_role = filter.clone();
        with_role.roles = vec![slug.to_string()];
        assert_eq!(
            counts.role_count(slug) as i64,
            catalog.count(&with_role),
            "facet count mismatch for {slug}"
        );
    }
}
