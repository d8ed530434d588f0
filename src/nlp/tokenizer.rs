//! Tweet tokenizer
//!
//! Splits raw tweet text into tokens, recognizing the token classes that
//! matter on Twitter: URLs, @mentions, #hashtags and emoticons.

use crate::data::{Token, TokenType};
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::sync::LazyLock;

static URL_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"https?://[^\s]+").unwrap());
static MENTION_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"@\w+").unwrap());
static HASHTAG_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"#\w+").unwrap());
static EMOTICON_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[:;=8][\-o\*']?[\)\]\(\[dDpP/\\]|<3").unwrap());
static NUMBER_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\d+\.?\d*$").unwrap());

/// Tweet tokenizer
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Tokenizer {
    /// Minimum word length
    min_word_length: usize,
    /// Maximum word length
    max_word_length: usize,
    /// Keep original case
    preserve_case: bool,
    /// Extract special tokens (URLs, mentions, hashtags, emoticons)
    extract_special: bool,
}

impl Tokenizer {
    pub fn new() -> Self {
        Self {
            min_word_length: 2,
            max_word_length: 50,
            preserve_case: false,
            extract_special: true,
        }
    }

    /// Set the minimum word length
    pub fn with_min_length(mut self, len: usize) -> Self {
        self.min_word_length = len;
        self
    }

    /// Set the maximum word length
    pub fn with_max_length(mut self, len: usize) -> Self {
        self.max_word_length = len;
        self
    }

    /// Keep original case
    pub fn preserve_case(mut self, preserve: bool) -> Self {
        self.preserve_case = preserve;
        self
    }

    /// Extract special tokens
    pub fn extract_special(mut self, extract: bool) -> Self {
        self.extract_special = extract;
        self
    }

    /// Tokenize a tweet.
    ///
    /// Special tokens are extracted first and removed from the text; the
    /// remainder is split on whitespace, cleaned of punctuation, and
    /// filtered by length. URLs and mentions carry no sentiment of their
    /// own so they normalize to placeholders; hashtags normalize to their
    /// bare word; emoticons keep their surface form.
    pub fn tokenize(&self, text: &str) -> Vec<Token> {
        let mut tokens = Vec::new();
        let mut position = 0;

        let mut processed_text = text.to_string();

        if self.extract_special {
            for url_match in URL_REGEX.find_iter(text) {
                tokens.push(Token {
                    original: url_match.as_str().to_string(),
                    normalized: "[URL]".to_string(),
                    position,
                    token_type: TokenType::Url,
                });
                position += 1;
            }
            processed_text = URL_REGEX.replace_all(&processed_text, " ").to_string();

            for mention in MENTION_REGEX.find_iter(text) {
                tokens.push(Token {
                    original: mention.as_str().to_string(),
                    normalized: "[MENTION]".to_string(),
                    position,
                    token_type: TokenType::Mention,
                });
                position += 1;
            }
            processed_text = MENTION_REGEX.replace_all(&processed_text, " ").to_string();

            for hashtag in HASHTAG_REGEX.find_iter(text) {
                let tag = hashtag.as_str();
                tokens.push(Token {
                    original: tag.to_string(),
                    normalized: tag[1..].to_lowercase(),
                    position,
                    token_type: TokenType::Hashtag,
                });
                position += 1;
            }
            processed_text = HASHTAG_REGEX.replace_all(&processed_text, " ").to_string();

            let without_tags = processed_text.clone();
            for emoticon in EMOTICON_REGEX.find_iter(&without_tags) {
                tokens.push(Token {
                    original: emoticon.as_str().to_string(),
                    normalized: emoticon.as_str().to_string(),
                    position,
                    token_type: TokenType::Emoticon,
                });
                position += 1;
            }
            processed_text = EMOTICON_REGEX.replace_all(&processed_text, " ").to_string();
        }

        for word in processed_text.split_whitespace() {
            let cleaned = self.clean_word(word);

            if cleaned.is_empty() {
                continue;
            }

            if cleaned.len() < self.min_word_length || cleaned.len() > self.max_word_length {
                continue;
            }

            let token_type = self.determine_token_type(&cleaned);
            let normalized = if self.preserve_case {
                cleaned.clone()
            } else {
                cleaned.to_lowercase()
            };

            tokens.push(Token {
                original: cleaned,
                normalized,
                position,
                token_type,
            });
            position += 1;
        }

        tokens
    }

    /// Tokenize and return only the normalized strings.
    pub fn tokenize_to_strings(&self, text: &str) -> Vec<String> {
        self.tokenize(text)
            .into_iter()
            .map(|t| t.normalized)
            .collect()
    }

    /// Strip punctuation from a word
    fn clean_word(&self, word: &str) -> String {
        word.chars()
            .filter(|c| c.is_alphanumeric() || *c == '-' || *c == '_' || *c == '\'')
            .collect()
    }

    fn determine_token_type(&self, word: &str) -> TokenType {
        if NUMBER_REGEX.is_match(word) {
            return TokenType::Number;
        }

        TokenType::Word
    }
}

impl Default for Tokenizer {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_basic_tokenization() {
        let tokenizer = Tokenizer::new();
        let tokens = tokenizer.tokenize("Hello World");

        assert_eq!(tokens.len(), 2);
        assert_eq!(tokens[0].normalized, "hello");
        assert_eq!(tokens[1].normalized, "world");
    }

    #[test]
    fn test_special_tokens() {
        let tokenizer = Tokenizer::new();
        let tokens = tokenizer.tokenize("Check @user and #monday https://example.com");

        let has_mention = tokens.iter().any(|t| t.token_type == TokenType::Mention);
        let has_hashtag = tokens.iter().any(|t| t.token_type == TokenType::Hashtag);
        let has_url = tokens.iter().any(|t| t.token_type == TokenType::Url);

        assert!(has_mention);
        assert!(has_hashtag);
        assert!(has_url);
    }

    #[test]
    fn test_hashtag_normalizes_to_word() {
        let tokenizer = Tokenizer::new();
        let tokens = tokenizer.tokenize("#Winning today");

        let hashtag = tokens
            .iter()
            .find(|t| t.token_type == TokenType::Hashtag)
            .unwrap();
        assert_eq!(hashtag.normalized, "winning");
    }

    #[test]
    fn test_emoticon_detection() {
        let tokenizer = Tokenizer::new();
        let tokens = tokenizer.tokenize("great game :) but sad ending :(");

        let emoticons: Vec<_> = tokens
            .iter()
            .filter(|t| t.token_type == TokenType::Emoticon)
            .collect();

        assert_eq!(emoticons.len(), 2);
        assert_eq!(emoticons[0].normalized, ":)");
        assert_eq!(emoticons[1].normalized, ":(");
    }

    #[test]
    fn test_min_length_filter() {
        let tokenizer = Tokenizer::new().with_min_length(3);
        let tokens = tokenizer.tokenize("I am a test");

        // "I", "am", "a" should be filtered out
        assert!(tokens.iter().all(|t| t.normalized.len() >= 3));
    }

    #[test]
    fn test_empty_text() {
        let tokenizer = Tokenizer::new();
        assert!(tokenizer.tokenize("").is_empty());
        assert!(tokenizer.tokenize("   ").is_empty());
    }
}
