//! フリーワード検索クエリの解析
//!
//! 入力文字列を空白区切りの AND 条件に分割し、各語をかな表記ゆれの
//! バリエーション集合（グループ内 OR）に展開する。

use crate::normalize::{hiragana_to_katakana, katakana_to_hiragana, normalize_width};

/// ひとつの検索語に対する等価表記の集合（どれかにヒットすればよい）
pub type VariantGroup = Vec<String>;

/// 検索クエリを解析し、語ごとのバリエーショングループを生成する
///
/// 例: `"Java ふるりもーと"` =>
/// `[["Java"], ["ふるりもーと", "フルリモート"]]`
/// グループ間は AND、グループ内は OR で結合される。
/// 空のクエリは空リスト（キーワード条件なし）を返す。
///
/// ラテン文字の大文字小文字はデータソース側の ILIKE が吸収するため、
/// ここでは展開しない。
pub fn parse_search_query(query: &str) -> Vec<VariantGroup> {
    let normalized = normalize_width(query);

    normalized
        .split_whitespace()
        .map(|word| {
            let mut variants: VariantGroup = vec![word.to_string()];

            let kata = hiragana_to_katakana(word);
            if kata != word {
                variants.push(kata);
            }

            let hira = katakana_to_hiragana(word);
            if hira != word && !variants.contains(&hira) {
                variants.push(hira);
            }

            variants
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_query_yields_no_groups() {
        assert!(parse_search_query("").is_empty());
        assert!(parse_search_query("   ").is_empty());
        assert!(parse_search_query("　　").is_empty());
    }

    #[test]
    fn latin_terms_stay_single_variant() {
        let groups = parse_search_query("Java AWS");
        assert_eq!(groups, vec![vec!["Java".to_string()], vec!["AWS".to_string()]]);
    }

    #[test]
    fn hiragana_term_gains_katakana_variant() {
        let groups = parse_search_query("ふるりもーと");
        assert_eq!(
            groups,
            vec![vec!["ふるりもーと".to_string(), "フルリモート".to_string()]]
        );
    }

    #[test]
    fn katakana_term_gains_hiragana_variant() {
        let groups = parse_search_query("リモート");
        assert_eq!(
            groups,
            vec![vec!["リモート".to_string(), "りもーと".to_string()]]
        );
    }

    #[test]
    fn fullwidth_input_is_normalized_before_splitting() {
        // 全角スペース区切り・全角英字もそのまま扱える
        let groups = parse_search_query("Ｊａｖａ　ふるりもーと");
        assert_eq!(groups.len(), 2);
        assert_eq!(groups[0], vec!["Java".to_string()]);
        assert_eq!(groups[1][1], "フルリモート");
    }

    #[test]
    fn variant_order_is_original_first() {
        let groups = parse_search_query("じゃば");
        assert_eq!(groups[0][0], "じゃば");
        assert_eq!(groups[0][1], "ジャバ");
    }
}
