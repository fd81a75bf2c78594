use crate::domain::ports::Tokenizer;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Script {
    Kanji,
    Hiragana,
    Katakana,
    Alnum,
    Space,
    Symbol,
}

fn script_of(c: char) -> Script {
    match c {
        '\u{3041}'..='\u{309F}' => Script::Hiragana,
        '\u{30A0}'..='\u{30FF}' | '\u{31F0}'..='\u{31FF}' | '\u{FF66}'..='\u{FF9F}' => {
            Script::Katakana
        }
        '\u{3005}' | '\u{3400}'..='\u{4DBF}' | '\u{4E00}'..='\u{9FFF}' | '\u{F900}'..='\u{FAFF}' => {
            Script::Kanji
        }
        c if c.is_whitespace() => Script::Space,
        c if c.is_alphanumeric() => Script::Alnum,
        _ => Script::Symbol,
    }
}

/// 依文字種 (漢字・ひらがな・カタカナ・英数字) 的連續區段切詞
///
/// 不需要字典；未啟用 `ipadic` feature 時的退路，形態素分割請用 `LinderaTokenizer`。
#[derive(Debug, Clone, Copy, Default)]
pub struct ScriptTokenizer;

impl ScriptTokenizer {
    pub fn new() -> Self {
        Self
    }
}

impl Tokenizer for ScriptTokenizer {
    fn tokenize(&self, text: &str) -> Vec<String> {
        let mut tokens = Vec::new();
        let mut current = String::new();
        let mut current_script: Option<Script> = None;

        for c in text.chars() {
            let script = script_of(c);

            let continues = matches!(current_script, Some(s) if s == script)
                && script != Script::Symbol;
            if !continues && !current.is_empty() {
                tokens.push(std::mem::take(&mut current));
            }

            current_script = Some(script);
            match script {
                Script::Space => {}
                _ => current.push(c),
            }
        }

        if !current.is_empty() {
            tokens.push(current);
        }

        tokens
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_splits_on_script_changes() {
        let tokens = ScriptTokenizer::new().tokenize("今日はラーメンを食べた");
        assert_eq!(tokens, vec!["今日", "は", "ラーメン", "を", "食", "べた"]);
    }

    #[test]
    fn test_whitespace_dropped_and_symbols_single() {
        let tokens = ScriptTokenizer::new().tokenize("Rust 1.85、最高!!");
        assert_eq!(tokens, vec!["Rust", "1", ".", "85", "、", "最高", "!", "!"]);
    }

    #[test]
    fn test_empty_text() {
        assert!(ScriptTokenizer::new().tokenize("").is_empty());
        assert!(ScriptTokenizer::new().tokenize("   ").is_empty());
    }
}
