//! 検索結果リストの追い読み（もっと見る）
//!
//! 取得済みの案件リストにページ単位で追記していく。初期ページと総件数は
//! 外から与えられるためページ番号は1始まり。総件数は初回取得時点の値を
//! 使い続ける（追い読み中のカタログ変化は許容する）。

use std::collections::HashSet;

use crate::Job;
use crate::filter::JobFilter;

/// 1ページあたりの取得件数
pub const PAGE_SIZE: i64 = 20;

/// 案件取得の抽象。本番は Postgres 実装、テストはインメモリ実装を使う。
#[allow(async_fn_in_trait)]
pub trait JobSource {
    type Error: std::error::Error + Send + Sync + 'static;

    async fn query_jobs(
        &self,
        filter: &JobFilter,
        offset: i64,
        limit: i64,
    ) -> Result<Vec<Job>, Self::Error>;
}

/// 発行中の追い読みリクエスト
///
/// 発行時点の検索条件スナップショットとリビジョンを持ち、応答が返った
/// ときに条件が変わっていれば結果を破棄できるようにする。
#[derive(Debug, Clone)]
pub struct PageRequest {
    pub filter: JobFilter,
    pub offset: i64,
    pub limit: i64,
    revision: u64,
}

/// 追い読み完了時の結果
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoadOutcome {
    /// 新規に追記された件数（重複除外後）
    Appended(usize),
    /// 発行後に検索条件が変わったため応答を破棄した
    Stale,
}

#[derive(Debug, Clone)]
pub struct JobListLoader {
    filter: JobFilter,
    jobs: Vec<Job>,
    total_count: i64,
    page: i64,
    page_size: i64,
    loading: bool,
    revision: u64,
}

impl JobListLoader {
    /// 初期ページ（サーバーレンダリング済み）と総件数から開始する
    pub fn new(filter: JobFilter, initial_jobs: Vec<Job>, total_count: i64) -> Self {
        Self::with_page_size(filter, initial_jobs, total_count, PAGE_SIZE)
    }

    pub fn with_page_size(
        filter: JobFilter,
        initial_jobs: Vec<Job>,
        total_count: i64,
        page_size: i64,
    ) -> Self {
        Self {
            filter,
            jobs: initial_jobs,
            total_count,
            page: 1,
            page_size,
            loading: false,
            revision: 0,
        }
    }

    pub fn jobs(&self) -> &[Job] {
        &self.jobs
    }

    pub fn filter(&self) -> &JobFilter {
        &self.filter
    }

    pub fn total_count(&self) -> i64 {
        self.total_count
    }

    pub fn is_loading(&self) -> bool {
        self.loading
    }

    /// 初回取得時点の総件数に達するまで true
    pub fn has_more(&self) -> bool {
        (self.jobs.len() as i64) < self.total_count
    }

    /// 条件適用: リストを新しい初期ページで置き換える
    ///
    /// リビジョンを進めるため、飛行中の追い読み応答は届いても破棄される。
    pub fn apply_filter(&mut self, filter: JobFilter, initial_jobs: Vec<Job>, total_count: i64) {
        self.filter = filter;
        self.jobs = initial_jobs;
        self.total_count = total_count;
        self.page = 1;
        self.loading = false;
        self.revision += 1;
    }

    /// 追い読み開始。読み込み中・全件取得済みなら None（no-op）。
    pub fn begin_load_more(&mut self) -> Option<PageRequest> {
        if self.loading || !self.has_more() {
            return None;
        }

        self.loading = true;
        Some(PageRequest {
            filter: self.filter.clone(),
            offset: self.page * self.page_size,
            limit: self.page_size,
            revision: self.revision,
        })
    }

    /// 追い読み成功。取得済みIDと重複する行を除外して追記する。
    pub fn complete_load_more(&mut self, request: &PageRequest, batch: Vec<Job>) -> LoadOutcome {
        if request.revision != self.revision {
            return LoadOutcome::Stale;
        }

        self.loading = false;

        let existing: HashSet<_> = self.jobs.iter().map(|job| job.id).collect();
        let fresh: Vec<Job> = batch
            .into_iter()
            .filter(|job| !existing.contains(&job.id))
            .collect();

        let appended = fresh.len();
        self.jobs.extend(fresh);
        self.page += 1;

        LoadOutcome::Appended(appended)
    }

    /// 追い読み失敗。リストは触らずスピナーだけ止め、再試行を許す。
    pub fn abort_load_more(&mut self, request: &PageRequest) {
        if request.revision == self.revision {
            self.loading = false;
        }
    }

    /// 開始〜完了までを1回で行う便宜メソッド
    pub async fn load_more<S: JobSource>(&mut self, source: &S) -> Result<usize, S::Error> {
        let Some(request) = self.begin_load_more() else {
            return Ok(0);
        };

        match source
            .query_jobs(&request.filter, request.offset, request.limit)
            .await
        {
            Ok(batch) => match self.complete_load_more(&request, batch) {
                LoadOutcome::Appended(count) => Ok(count),
                LoadOutcome::Stale => Ok(0),
            },
            Err(err) => {
                self.abort_load_more(&request);
                Err(err)
            }
        }
    }
}
