use crate::{
    ast::Token,
    value::{parse_double, parse_long},
    variables::{Slot, VariableStore},
};

/// Classifies a word produced by the tokenizer.
///
/// Order matters: numbers win over everything, then variable reads and
/// writes, then the three delimited literals. Anything left is an operator
/// symbol, resolved later against the dispatch table.
pub fn classify(word: &str) -> Token<'_> {
    if let Some(n) = parse_long(word) {
        return Token::Long(n);
    }
    if let Some(n) = parse_double(word) {
        return Token::Double(n);
    }
    if let Some(slot) = variable_slot(word) {
        return Token::ReadVariable(slot);
    }
    if let Some(slot) = word.strip_prefix(':').and_then(variable_slot) {
        return Token::WriteVariable(slot);
    }
    if let Some(text) = delimited(word, '"', '"') {
        return Token::Str(text);
    }
    if let Some(interior) = delimited(word, '[', ']') {
        return Token::Array(interior);
    }
    if let Some(source) = delimited(word, '{', '}') {
        return Token::Block(source);
    }
    Token::Operator(word)
}

fn variable_slot(word: &str) -> Option<Slot> {
    let mut chars = word.chars();
    match (chars.next(), chars.next()) {
        (Some(letter), None) => Slot::new(letter),
        _ => None,
    }
}

fn delimited(word: &str, open: char, close: char) -> Option<&str> {
    if word.len() < 2 {
        return None;
    }
    word.strip_prefix(open)?.strip_suffix(close)
}

/// Breaks a word that names no operator into smaller pieces, so that
/// unspaced code such as `1+` or `.@+` runs as `1 +` and `. @ +`.
///
/// Each piece is, in order of preference: a number (a leading `-` only at
/// the start of the word), a two character operator or `:X` write, or a
/// single character. A word made only of letters is never split, so `AB`
/// stays one unknown symbol rather than two variable reads.
pub fn split_compound<'a>(word: &'a str, is_operator: impl Fn(&str) -> bool) -> Vec<&'a str> {
    if word.chars().all(char::is_alphabetic) {
        return vec![word];
    }
    let mut pieces = Vec::new();
    let mut rest = word;
    while !rest.is_empty() {
        let len = piece_len(rest, pieces.is_empty(), &is_operator);
        let (piece, tail) = rest.split_at(len);
        pieces.push(piece);
        rest = tail;
    }
    pieces
}

fn piece_len(text: &str, leading: bool, is_operator: &impl Fn(&str) -> bool) -> usize {
    let number = number_len(text, leading);
    if number > 0 {
        return number;
    }
    let mut chars = text.chars();
    let Some(first) = chars.next() else {
        return 0;
    };
    if let Some(second) = chars.next() {
        let pair = first.len_utf8() + second.len_utf8();
        if is_operator(&text[..pair]) || (first == ':' && VariableStore::is_variable_name(second)) {
            return pair;
        }
    }
    first.len_utf8()
}

/// Length of a `-?digits(.digits)?` prefix, or 0 when there is none.
fn number_len(text: &str, leading: bool) -> usize {
    let bytes = text.as_bytes();
    let digits = |mut end: usize| {
        while bytes.get(end).is_some_and(u8::is_ascii_digit) {
            end += 1;
        }
        end
    };
    let start = usize::from(leading && bytes.first() == Some(&b'-'));
    let mut end = digits(start);
    if bytes.get(end) == Some(&b'.') && bytes.get(end + 1).is_some_and(u8::is_ascii_digit) {
        end = digits(end + 1);
    }
    if end == start { 0 } else { end }
}
