//! 検索語の文字種正規化（全角→半角、ひらがな⇔カタカナ）

/// 全角英数・記号ブロック（U+FF01〜U+FF5E）の固定オフセット
const FULLWIDTH_OFFSET: u32 = 0xFEE0;
/// ひらがな（U+3041〜U+3096）→ カタカナ（U+30A1〜U+30F6）のシフト量
const KANA_OFFSET: u32 = 0x60;

/// 全角英数字・記号を半角に変換する
///
/// 全角スペース（U+3000）は半角スペースに落とす。対象ブロック外の文字は
/// そのまま通す。入力に対象文字が無ければ恒等変換になるため冪等。
pub fn normalize_width(input: &str) -> String {
    input
        .chars()
        .map(|c| match c {
            '！'..='～' => {
                char::from_u32(c as u32 - FULLWIDTH_OFFSET).unwrap_or(c)
            }
            '　' => ' ',
            _ => c,
        })
        .collect()
}

/// ひらがなをカタカナに変換する（対象ブロック外は素通し）
pub fn hiragana_to_katakana(input: &str) -> String {
    input
        .chars()
        .map(|c| match c {
            'ぁ'..='ゖ' => char::from_u32(c as u32 + KANA_OFFSET).unwrap_or(c),
            _ => c,
        })
        .collect()
}

/// カタカナをひらがなに変換する（`hiragana_to_katakana` の逆変換）
pub fn katakana_to_hiragana(input: &str) -> String {
    input
        .chars()
        .map(|c| match c {
            'ァ'..='ヶ' => char::from_u32(c as u32 - KANA_OFFSET).unwrap_or(c),
            _ => c,
        })
        .collect()
}
