//! Script detection for territories that accept Latin and Asian input.

use crate::models::ruleset::ScriptFormat;

/// Han, Hangul, Kana or Bopomofo.
pub fn is_asian_char(c: char) -> bool {
    matches!(c as u32,
        0x1100..=0x11FF          // Hangul Jamo
        | 0x2E80..=0x2FDF        // CJK radicals, Kangxi radicals
        | 0x3005..=0x3007        // 々 〆 〇
        | 0x3021..=0x3029        // Hangzhou numerals
        | 0x3040..=0x309F        // Hiragana
        | 0x30A0..=0x30FF        // Katakana
        | 0x3100..=0x312F        // Bopomofo
        | 0x3130..=0x318F        // Hangul compatibility Jamo
        | 0x31A0..=0x31BF        // Bopomofo extended
        | 0x31F0..=0x31FF        // Katakana phonetic extensions
        | 0x3400..=0x4DBF        // CJK extension A
        | 0x4E00..=0x9FFF        // CJK unified ideographs
        | 0xA960..=0xA97F        // Hangul Jamo extended A
        | 0xAC00..=0xD7AF        // Hangul syllables
        | 0xD7B0..=0xD7FF        // Hangul Jamo extended B
        | 0xF900..=0xFAFF        // CJK compatibility ideographs
        | 0xFF66..=0xFF9F        // halfwidth Katakana
        | 0xFFA0..=0xFFDC        // halfwidth Hangul
        | 0x20000..=0x3134F      // CJK extensions B and later
    )
}

/// Decide whether fragments are written in an Asian script: at least one
/// Asian character, and no more Latin letters than Asian characters.
pub fn detect_script<S: AsRef<str>>(lines: &[S]) -> ScriptFormat {
    let mut asian = 0usize;
    let mut latin = 0usize;

    for c in lines.iter().flat_map(|l| l.as_ref().chars()) {
        if is_asian_char(c) {
            asian += 1;
        } else if c.is_alphabetic() {
            latin += 1;
        }
    }

    if asian > 0 && asian >= latin {
        ScriptFormat::Asian
    } else {
        ScriptFormat::Latin
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_asian_chars() {
        for c in ['北', 'ひ', 'カ', '한', 'ㄅ', '々'] {
            assert!(is_asian_char(c), "{c}");
        }
        for c in ['a', 'É', '1', '-', ' ', '〒'] {
            assert!(!is_asian_char(c), "{c}");
        }
    }

    #[test]
    fn test_detect_script() {
        assert_eq!(detect_script(&["北京市海淀区", "中关村大街59号"]), ScriptFormat::Asian);
        assert_eq!(detect_script(&["59 Zhongguancun Street", "Beijing 100872"]), ScriptFormat::Latin);
        // digits and punctuation count for neither side
        assert_eq!(detect_script(&["〒150-2345", "東京都渋谷区本町2丁目4-7"]), ScriptFormat::Asian);
        assert_eq!(detect_script(&["123 456"]), ScriptFormat::Latin);
        // mixed: a few Latin letters in an Asian address
        assert_eq!(detect_script(&["東京都港区", "ABCビル"]), ScriptFormat::Asian);
    }
}
