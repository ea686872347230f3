//! 検索条件の状態管理
//!
//! URLクエリパラメータと1対1で対応する確定済み条件（committed）と、
//! モーダル内で編集中の下書き条件（draft）の二層を扱う。

use std::fmt;
use std::str::FromStr;

use crate::WorkStyle;

/// 絞り込みのカテゴリ（ファセット）
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FacetKind {
    Role,
    WorkStyle,
    Skill,
}

/// 一覧の並び順。指定がなければ新着順。
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum SortOrder {
    #[default]
    Newest,
    PriceDesc,
}

impl SortOrder {
    pub fn as_str(&self) -> &'static str {
        match self {
            SortOrder::Newest => "newest",
            SortOrder::PriceDesc => "price_desc",
        }
    }
}

impl FromStr for SortOrder {
    type Err = ();

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value {
            "newest" => Ok(SortOrder::Newest),
            "price_desc" => Ok(SortOrder::PriceDesc),
            _ => Err(()),
        }
    }
}

/// ユーザーの検索条件一式
///
/// URLクエリ (`q`, `roles`, `work_styles`, `skills`, `min_price`,
/// `max_price`, `sort`) から構築され、述語コンパイラとファセット集計の
/// 両方に渡る。入力はユーザーが編集可能なURL由来のため、不正な値は
/// エラーにせず黙って落とす。
#[derive(Debug, Clone, Default, PartialEq)]
pub struct JobFilter {
    pub keyword: String,
    pub roles: Vec<String>,
    pub work_styles: Vec<WorkStyle>,
    pub skills: Vec<String>,
    pub min_price: Option<i64>,
    pub max_price: Option<i64>,
    pub sort: SortOrder,
}

fn parse_csv(value: &str) -> Vec<String> {
    let mut out: Vec<String> = Vec::new();
    for item in value.split(',') {
        let item = item.trim();
        if !item.is_empty() && !out.iter().any(|v| v == item) {
            out.push(item.to_string());
        }
    }
    out
}

/// 数値パラメータの防御的な読み取り（不正値は「指定なし」扱い）
fn parse_price(value: &str) -> Option<i64> {
    value.trim().parse::<i64>().ok().filter(|v| *v >= 0)
}

impl JobFilter {
    /// URLクエリパラメータから条件を組み立てる
    ///
    /// 同じキーが複数回現れた場合は最初の値を採用する。
    pub fn from_query_pairs<'a, I>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (&'a str, &'a str)>,
    {
        let mut filter = JobFilter::default();

        for (key, value) in pairs {
            match key {
                "q" if filter.keyword.is_empty() => {
                    filter.keyword = value.trim().to_string();
                }
                "roles" if filter.roles.is_empty() => {
                    filter.roles = parse_csv(value);
                }
                "work_styles" if filter.work_styles.is_empty() => {
                    filter.work_styles = parse_csv(value)
                        .iter()
                        .filter_map(|v| v.parse::<WorkStyle>().ok())
                        .collect();
                }
                "skills" if filter.skills.is_empty() => {
                    filter.skills = parse_csv(value);
                }
                "min_price" if filter.min_price.is_none() => {
                    filter.min_price = parse_price(value);
                }
                "max_price" if filter.max_price.is_none() => {
                    filter.max_price = parse_price(value);
                }
                "sort" => {
                    if let Ok(sort) = value.parse::<SortOrder>() {
                        filter.sort = sort;
                    }
                }
                _ => {}
            }
        }

        filter
    }

    /// URLクエリパラメータへ書き戻す。空の次元はキーごと省略する。
    pub fn to_query_pairs(&self) -> Vec<(&'static str, String)> {
        let mut pairs = Vec::new();

        if !self.keyword.is_empty() {
            pairs.push(("q", self.keyword.clone()));
        }
        if !self.roles.is_empty() {
            pairs.push(("roles", self.roles.join(",")));
        }
        if !self.work_styles.is_empty() {
            let joined = self
                .work_styles
                .iter()
                .map(WorkStyle::as_str)
                .collect::<Vec<_>>()
                .join(",");
            pairs.push(("work_styles", joined));
        }
        if !self.skills.is_empty() {
            pairs.push(("skills", self.skills.join(",")));
        }
        if let Some(min) = self.min_price {
            pairs.push(("min_price", min.to_string()));
        }
        if let Some(max) = self.max_price {
            pairs.push(("max_price", max.to_string()));
        }
        if self.sort != SortOrder::Newest {
            pairs.push(("sort", self.sort.as_str().to_string()));
        }

        pairs
    }

    pub fn is_empty(&self) -> bool {
        self.keyword.is_empty()
            && self.roles.is_empty()
            && self.work_styles.is_empty()
            && self.skills.is_empty()
            && self.min_price.is_none()
            && self.max_price.is_none()
    }

    /// チェックボックス操作: 選択されていれば外し、なければ加える
    pub fn toggle(&mut self, facet: FacetKind, value: &str) {
        match facet {
            FacetKind::Role => toggle_value(&mut self.roles, value),
            FacetKind::Skill => toggle_value(&mut self.skills, value),
            FacetKind::WorkStyle => {
                let Ok(style) = value.parse::<WorkStyle>() else {
                    return;
                };
                if let Some(pos) = self.work_styles.iter().position(|s| *s == style) {
                    self.work_styles.remove(pos);
                } else {
                    self.work_styles.push(style);
                }
            }
        }
    }

    /// 指定ファセットから特定の値だけを外す。他のカテゴリには触れない。
    pub fn remove(&mut self, facet: FacetKind, value: &str) {
        match facet {
            FacetKind::Role => self.roles.retain(|v| v != value),
            FacetKind::Skill => self.skills.retain(|v| v != value),
            FacetKind::WorkStyle => {
                if let Ok(style) = value.parse::<WorkStyle>() {
                    self.work_styles.retain(|s| *s != style);
                }
            }
        }
    }
}

fn toggle_value(values: &mut Vec<String>, value: &str) {
    if let Some(pos) = values.iter().position(|v| v == value) {
        values.remove(pos);
    } else {
        values.push(value.to_string());
    }
}

impl fmt::Display for JobFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let pairs = self.to_query_pairs();
        let mut first = true;
        for (key, value) in pairs {
            if !first {
                f.write_str("&")?;
            }
            write!(f, "{key}={value}")?;
            first = false;
        }
        Ok(())
    }
}

/// 下書き（モーダル編集中）と確定済み（URL反映済み）の二層状態
///
/// 状態機械: Idle(draft == committed) → 編集 → Dirty(draft != committed)
/// → apply → Idle。クイックタグ切替は下書きを経由せず committed を直接
/// 書き換え、未適用の下書き編集は新しい committed で再シードされ破棄される。
#[derive(Debug, Clone, Default)]
pub struct FilterSession {
    draft: JobFilter,
    committed: JobFilter,
}

impl FilterSession {
    pub fn new(committed: JobFilter) -> Self {
        Self {
            draft: committed.clone(),
            committed,
        }
    }

    /// マウント時・URL遷移時: URLから両層をシードし直す
    pub fn seed_from_query_pairs<'a, I>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (&'a str, &'a str)>,
    {
        Self::new(JobFilter::from_query_pairs(pairs))
    }

    pub fn draft(&self) -> &JobFilter {
        &self.draft
    }

    pub fn draft_mut(&mut self) -> &mut JobFilter {
        &mut self.draft
    }

    pub fn committed(&self) -> &JobFilter {
        &self.committed
    }

    pub fn is_dirty(&self) -> bool {
        self.draft != self.committed
    }

    /// 「条件を適用する」: 下書きを確定し、URLに書き戻す値を返す
    pub fn apply(&mut self) -> Vec<(&'static str, String)> {
        self.committed = self.draft.clone();
        self.committed.to_query_pairs()
    }

    /// 人気タグのワンクリック切替: committed を直接書き換える
    ///
    /// 無関係な下書き編集は破棄され、新しい committed から再シードされる。
    pub fn quick_toggle(&mut self, facet: FacetKind, value: &str) -> Vec<(&'static str, String)> {
        self.committed.toggle(facet, value);
        self.draft = self.committed.clone();
        self.committed.to_query_pairs()
    }

    /// 有効な絞り込みチップの個別解除
    pub fn remove(&mut self, facet: FacetKind, value: &str) -> Vec<(&'static str, String)> {
        self.committed.remove(facet, value);
        self.draft = self.committed.clone();
        self.committed.to_query_pairs()
    }

    pub fn remove_keyword(&mut self) -> Vec<(&'static str, String)> {
        self.committed.keyword.clear();
        self.draft = self.committed.clone();
        self.committed.to_query_pairs()
    }

    pub fn remove_price(&mut self) -> Vec<(&'static str, String)> {
        self.committed.min_price = None;
        self.committed.max_price = None;
        self.draft = self.committed.clone();
        self.committed.to_query_pairs()
    }

    /// 「全てクリア」: 両層を初期状態に戻す
    pub fn clear_all(&mut self) {
        self.draft = JobFilter::default();
        self.committed = JobFilter::default();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pairs(raw: &[(&'static str, &'static str)]) -> Vec<(&'static str, &'static str)> {
        raw.to_vec()
    }

    #[test]
    fn parses_full_query_string() {
        let filter = JobFilter::from_query_pairs(pairs(&[
            ("q", "Java リモート"),
            ("roles", "backend-engineer,sre"),
            ("work_styles", "remote,hybrid"),
            ("skills", "Go言語,AWS"),
            ("min_price", "600000"),
            ("max_price", "1000000"),
        ]));

        assert_eq!(filter.keyword, "Java リモート");
        assert_eq!(filter.roles, vec!["backend-engineer", "sre"]);
        assert_eq!(filter.work_styles, vec![WorkStyle::Remote, WorkStyle::Hybrid]);
        assert_eq!(filter.skills, vec!["Go言語", "AWS"]);
        assert_eq!(filter.min_price, Some(600_000));
        assert_eq!(filter.max_price, Some(1_000_000));
        assert_eq!(filter.sort, SortOrder::Newest);
    }

    #[test]
    fn malformed_prices_become_unbounded() {
        let filter = JobFilter::from_query_pairs(pairs(&[
            ("min_price", "abc"),
            ("max_price", "-100"),
        ]));

        assert_eq!(filter.min_price, None);
        assert_eq!(filter.max_price, None);
    }

    #[test]
    fn unknown_work_styles_are_dropped() {
        let filter =
            JobFilter::from_query_pairs(pairs(&[("work_styles", "remote,teleport,onsite")]));
        assert_eq!(filter.work_styles, vec![WorkStyle::Remote, WorkStyle::Onsite]);
    }

    #[test]
    fn csv_values_are_deduplicated() {
        let filter = JobFilter::from_query_pairs(pairs(&[("skills", "Go言語,Go言語, ,AWS")]));
        assert_eq!(filter.skills, vec!["Go言語", "AWS"]);
    }

    #[test]
    fn serialization_omits_empty_dimensions() {
        let mut filter = JobFilter::default();
        assert!(filter.to_query_pairs().is_empty());

        filter.skills = vec!["React".into()];
        filter.min_price = Some(800_000);
        assert_eq!(
            filter.to_query_pairs(),
            vec![("skills", "React".to_string()), ("min_price", "800000".to_string())]
        );
    }

    #[test]
    fn query_pairs_round_trip() {
        let original = JobFilter {
            keyword: "ふるりもーと".into(),
            roles: vec!["pm".into()],
            work_styles: vec![WorkStyle::Remote],
            skills: vec!["TypeScript".into(), "React".into()],
            min_price: Some(500_000),
            max_price: None,
            sort: SortOrder::PriceDesc,
        };

        let serialized = original.to_query_pairs();
        let reparsed = JobFilter::from_query_pairs(
            serialized.iter().map(|(k, v)| (*k, v.as_str())),
        );
        assert_eq!(reparsed, original);
    }

    #[test]
    fn apply_moves_session_from_dirty_to_idle() {
        let mut session = FilterSession::seed_from_query_pairs(pairs(&[("skills", "React")]));
        assert!(!session.is_dirty());

        session.draft_mut().toggle(FacetKind::Skill, "AWS");
        assert!(session.is_dirty());

        let committed = session.apply();
        assert!(!session.is_dirty());
        assert_eq!(committed, vec![("skills", "React,AWS".to_string())]);
    }

    #[test]
    fn quick_toggle_discards_unapplied_draft_edits() {
        let mut session = FilterSession::default();
        session.draft_mut().keyword = "Java".into();
        assert!(session.is_dirty());

        let committed = session.quick_toggle(FacetKind::Skill, "React");

        // 下書きのキーワード編集は破棄され、タグだけが反映される
        assert!(!session.is_dirty());
        assert_eq!(committed, vec![("skills", "React".to_string())]);
        assert!(session.draft().keyword.is_empty());
    }

    #[test]
    fn quick_toggle_twice_removes_the_value() {
        let mut session = FilterSession::default();
        session.quick_toggle(FacetKind::WorkStyle, "remote");
        let committed = session.quick_toggle(FacetKind::WorkStyle, "remote");
        assert!(committed.is_empty());
        assert!(session.committed().is_empty());
    }

    #[test]
    fn remove_strips_exactly_one_value() {
        let mut session = FilterSession::seed_from_query_pairs(pairs(&[
            ("roles", "pm,sre"),
            ("skills", "React"),
        ]));

        let committed = session.remove(FacetKind::Role, "pm");
        assert_eq!(
            committed,
            vec![("roles", "sre".to_string()), ("skills", "React".to_string())]
        );

        // 最後の値を外すとキーごと消える
        let committed = session.remove(FacetKind::Role, "sre");
        assert_eq!(committed, vec![("skills", "React".to_string())]);
    }

    #[test]
    fn clear_all_resets_both_tiers() {
        let mut session = FilterSession::seed_from_query_pairs(pairs(&[
            ("q", "Java"),
            ("min_price", "300000"),
        ]));
        session.draft_mut().toggle(FacetKind::Skill, "AWS");

        session.clear_all();
        assert!(session.draft().is_empty());
        assert!(session.committed().is_empty());
        assert!(!session.is_dirty());
    }
}
