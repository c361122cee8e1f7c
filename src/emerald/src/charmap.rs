//! Gen III (Western) character map
//!
//! Text in memory is one byte per glyph, terminated by `0xFF`.

/// Terminator byte ending every string
pub const TERMINATOR: u8 = 0xFF;

/// Glyph for each byte value
///
/// Ligature glyphs such as `PK`/`MN` are joined with a zero-width joiner so
/// they stay distinct from the plain two-letter sequences.
#[rustfmt::skip]
pub const CHARMAP: [&str; 256] = [
    " ", "À", "Á", "Â", "Ç", "È", "É", "Ê", "Ë", "Ì", "こ", "Î", "Ï", "Ò", "Ó", "Ô",
    "Œ", "Ù", "Ú", "Û", "Ñ", "ß", "à", "á", "ね", "ç", "è", "é", "ê", "ë", "ì", "ま",
    "î", "ï", "ò", "ó", "ô", "œ", "ù", "ú", "û", "ñ", "º", "ª", "\u{FFFD}", "&", "+", "あ",
    "ぃ", "ぅ", "ぇ", "ぉ", "Lv", "=", ";", "が", "ぎ", "ぐ", "げ", "ご", "ざ", "じ", "ず", "ぜ",
    "ぞ", "だ", "ぢ", "づ", "で", "ど", "ば", "び", "ぶ", "べ", "ぼ", "ぱ", "ぴ", "ぷ", "ぺ", "ぽ",
    "っ", "¿", "¡", "P\u{200D}k", "M\u{200D}n", "P\u{200D}o", "K\u{200D}é", "B\u{200D}L", "O\u{200D}C", "\u{200D}K", "Í", "%", "(", ")", "セ", "ソ",
    "タ", "チ", "ツ", "テ", "ト", "ナ", "ニ", "ヌ", "â", "ノ", "ハ", "ヒ", "フ", "ヘ", "ホ", "í",
    "ミ", "ム", "メ", "モ", "ヤ", "ユ", "ヨ", "ラ", "リ", "⬆", "⬇", "⬅", "➡", "ヲ", "ン", "ァ",
    "ィ", "ゥ", "ェ", "ォ", "ャ", "ュ", "ョ", "ガ", "ギ", "グ", "ゲ", "ゴ", "ザ", "ジ", "ズ", "ゼ",
    "ゾ", "ダ", "ヂ", "ヅ", "デ", "ド", "バ", "ビ", "ブ", "ベ", "ボ", "パ", "ピ", "プ", "ペ", "ポ",
    "ッ", "0", "1", "2", "3", "4", "5", "6", "7", "8", "9", "!", "?", ".", "-", "・",
    "…", "“", "”", "‘", "’", "♂", "♀", "$", ",", "×", "/", "A", "B", "C", "D", "E",
    "F", "G", "H", "I", "J", "K", "L", "M", "N", "O", "P", "Q", "R", "S", "T", "U",
    "V", "W", "X", "Y", "Z", "a", "b", "c", "d", "e", "f", "g", "h", "i", "j", "k",
    "l", "m", "n", "o", "p", "q", "r", "s", "t", "u", "v", "w", "x", "y", "z", "▶",
    ":", "Ä", "Ö", "Ü", "ä", "ö", "ü", "⬆", "⬇", "⬅", "\u{FFFD}", "\u{FFFD}", "\u{FFFD}", "\u{FFFD}", "\u{FFFD}", "",
];

/// Decode game text up to the first terminator
pub fn decode(bytes: &[u8]) -> String {
    bytes
        .iter()
        .take_while(|&&b| b != TERMINATOR)
        .map(|&b| CHARMAP[b as usize])
        .collect()
}

/// Encode text into game bytes (without terminator)
///
/// Picks the longest glyph matching at each position. Returns `None` if the
/// text contains something the character map cannot represent.
pub fn encode(text: &str) -> Option<Vec<u8>> {
    let mut out = Vec::with_capacity(text.len());
    let mut rest = text;

    while !rest.is_empty() {
        let (byte, glyph) = CHARMAP
            .iter()
            .enumerate()
            .filter(|(b, glyph)| *b != TERMINATOR as usize && rest.starts_with(**glyph))
            .filter(|(_, glyph)| !glyph.is_empty())
            .max_by_key(|(b, glyph)| (glyph.len(), usize::MAX - b))?;
        out.push(byte as u8);
        rest = &rest[glyph.len()..];
    }

    Some(out)
}

/// Encode text into a fixed-size, terminator-padded field
pub fn encode_padded(text: &str, width: usize) -> Option<Vec<u8>> {
    let mut bytes = encode(text)?;
    if bytes.len() > width {
        return None;
    }
    bytes.resize(width, TERMINATOR);
    Some(bytes)
}
