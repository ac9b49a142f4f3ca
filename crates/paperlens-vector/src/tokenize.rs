use tantivy::tokenizer::{LowerCaser, SimpleTokenizer, StopWordFilter, TextAnalyzer, TokenStream};

use crate::stop_words::ENGLISH_STOP_WORDS;

/// Shortest token kept; single letters and digits carry no topic signal.
pub const MIN_TOKEN_LEN: usize = 2;

/// Split on non-alphanumerics, lowercase, drop English stop words.
pub fn build_analyzer() -> TextAnalyzer {
    TextAnalyzer::builder(SimpleTokenizer::default())
        .filter(LowerCaser)
        .filter(StopWordFilter::remove(ENGLISH_STOP_WORDS.iter().map(|s| s.to_string())))
        .build()
}

/// Tokens of `text` in document order, short tokens removed.
pub fn tokenize(analyzer: &mut TextAnalyzer, text: &str) -> Vec<String> {
    let mut stream = analyzer.token_stream(text);
    let mut out = Vec::new();
    while stream.advance() {
        let token = &stream.token().text;
        if token.chars().count() >= MIN_TOKEN_LEN {
            out.push(token.clone());
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn drops_stop_words_and_single_characters() {
        let mut analyzer = build_analyzer();
        let tokens = tokenize(&mut analyzer, "The Time-Series model of a 3D X-ray scan");
        assert_eq!(tokens, vec!["time", "series", "model", "3d", "ray", "scan"]);
    }
}
