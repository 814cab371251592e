// Script tokenizer
// Bare words are split on whitespace; strings are JSON literals.

use crate::core::position::TextIndex;

pub struct Tokens<'a> {
    rest: &'a str,
}

impl<'a> Tokens<'a> {
    pub fn new(input: &'a str) -> Self {
        Self { rest: input }
    }

    fn skip_whitespace(&mut self) {
        self.rest = self.rest.trim_start();
    }

    pub fn is_empty(&mut self) -> bool {
        self.skip_whitespace();
        self.rest.is_empty()
    }

    /// Next bare word, or `None` at end of line
    pub fn word(&mut self) -> Result<Option<String>, String> {
        self.skip_whitespace();
        if self.rest.is_empty() {
            return Ok(None);
        }
        if self.rest.starts_with('"') {
            return Err("expected a word, found a string".to_string());
        }
        let end = self
            .rest
            .find(char::is_whitespace)
            .unwrap_or(self.rest.len());
        let (word, rest) = self.rest.split_at(end);
        self.rest = rest;
        Ok(Some(word.to_string()))
    }

    /// Next `line.column` or `end`
    pub fn index(&mut self) -> Result<TextIndex, String> {
        let word = self.word()?.ok_or("missing position")?;
        word.parse::<TextIndex>().map_err(|e| e.to_string())
    }

    /// Next JSON string literal
    pub fn string(&mut self) -> Result<String, String> {
        self.skip_whitespace();
        if !self.rest.starts_with('"') {
            return Err(match self.rest.split_whitespace().next() {
                Some(found) => format!("expected a quoted string, found {}", found),
                None => "missing quoted string".to_string(),
            });
        }

        let mut stream = serde_json::Deserializer::from_str(self.rest).into_iter::<String>();
        let value = match stream.next() {
            Some(Ok(value)) => value,
            Some(Err(e)) => return Err(format!("bad string: {}", e)),
            None => return Err("missing quoted string".to_string()),
        };
        let consumed = stream.byte_offset();
        self.rest = &self.rest[consumed..];

        if self.rest.chars().next().is_some_and(|c| !c.is_whitespace()) {
            return Err("expected whitespace after string".to_string());
        }
        Ok(value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_words_and_strings() {
        let mut tokens = Tokens::new(r#"  insert 2.3 "tab\there" end "#);
        assert_eq!(tokens.word().unwrap(), Some("insert".to_string()));
        assert_eq!(tokens.index().unwrap(), TextIndex::new(2, 3));
        assert_eq!(tokens.string().unwrap(), "tab\there");
        assert_eq!(tokens.index().unwrap(), TextIndex::End);
        assert!(tokens.is_empty());
        assert_eq!(tokens.word().unwrap(), None);
    }

    #[test]
    fn test_string_with_spaces_and_unicode() {
        let mut tokens = Tokens::new(r#""héllo wörld é" 1.0"#);
        assert_eq!(tokens.string().unwrap(), "héllo wörld é");
        assert_eq!(tokens.index().unwrap(), TextIndex::new(1, 0));
    }

    #[test]
    fn test_bad_tokens() {
        assert!(Tokens::new("bare").string().is_err());
        assert!(Tokens::new(r#""unterminated"#).string().is_err());
        assert!(Tokens::new(r#""glued"x"#).string().is_err());
        assert!(Tokens::new(r#""quoted""#).word().is_err());
        assert!(Tokens::new("0.1").index().is_err());
        assert!(Tokens::new("").index().is_err());
    }
}
