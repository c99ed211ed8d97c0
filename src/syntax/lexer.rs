//! Declassify Lexer - Lossless Java Tokenization
//!
//! Converts Java source text into a [`TokenStream`] with stable indices and
//! byte spans. Purely lexical - no declaration structure is recognized here.

use std::collections::HashSet;

use once_cell::sync::Lazy;
use pest::iterators::Pair;
use pest::Parser;
use pest_derive::Parser;

use crate::errors::{ErrorReporting, ReportingContext, SourceContext};
use crate::syntax::{Channel, Span, Token, TokenKind, TokenStream};
use crate::DeclassifyError;

#[derive(Parser)]
#[grammar = "syntax/grammar.pest"]
struct JavaTokens;

/// Reserved words of the Java language. Contextual keywords (`var`,
/// `record`, ...) are deliberately absent; they lex as identifiers.
static KEYWORDS: Lazy<HashSet<&'static str>> = Lazy::new(|| {
    [
        "abstract",
        "assert",
        "boolean",
        "break",
        "byte",
        "case",
        "catch",
        "char",
        "class",
        "const",
        "continue",
        "default",
        "do",
        "double",
        "else",
        "enum",
        "extends",
        "final",
        "finally",
        "float",
        "for",
        "goto",
        "if",
        "implements",
        "import",
        "instanceof",
        "int",
        "interface",
        "long",
        "native",
        "new",
        "package",
        "private",
        "protected",
        "public",
        "return",
        "short",
        "static",
        "strictfp",
        "super",
        "switch",
        "synchronized",
        "this",
        "throw",
        "throws",
        "transient",
        "try",
        "void",
        "volatile",
        "while",
    ]
    .into_iter()
    .collect()
});

// ============================================================================
// PUBLIC API
// ============================================================================

/// Tokenize Java source text into a lossless token stream.
///
/// Concatenating the texts of the returned tokens reproduces `source_text`
/// exactly; this property is what the rewriter's byte-preservation contract
/// rests on.
pub fn tokenize(
    source_text: &str,
    source_context: &SourceContext,
) -> Result<TokenStream, DeclassifyError> {
    let reporter = ReportingContext::new(source_context.clone(), "lex");

    let pairs = JavaTokens::parse(Rule::file, source_text)
        .map_err(|e| convert_lex_error(e, &reporter))?;

    let file = pairs.peek().expect("pest guarantees the file rule exists");

    let tokens: Vec<Token> = file
        .into_inner()
        .filter(|p| p.as_rule() != Rule::EOI)
        .enumerate()
        .map(|(index, pair)| build_token(index, pair))
        .collect();

    Ok(TokenStream::new(tokens))
}

// ============================================================================
// TOKEN BUILDERS
// ============================================================================

fn build_token(index: usize, pair: Pair<Rule>) -> Token {
    let text = pair.as_str();
    let span = Span {
        start: pair.as_span().start(),
        end: pair.as_span().end(),
    };
    let kind = classify(pair.as_rule(), text);
    let channel = channel_of(kind);

    Token {
        index,
        kind,
        channel,
        text: text.to_string(),
        span,
    }
}

fn classify(rule: Rule, text: &str) -> TokenKind {
    match rule {
        Rule::whitespace => TokenKind::Whitespace,
        Rule::line_comment => TokenKind::LineComment,
        Rule::block_comment => TokenKind::BlockComment,
        Rule::string_lit => TokenKind::StringLit,
        Rule::char_lit => TokenKind::CharLit,
        Rule::number => TokenKind::Number,
        Rule::word => {
            if KEYWORDS.contains(text) {
                TokenKind::Keyword
            } else {
                TokenKind::Ident
            }
        }
        _ => TokenKind::Punct,
    }
}

fn channel_of(kind: TokenKind) -> Channel {
    match kind {
        TokenKind::Whitespace | TokenKind::LineComment | TokenKind::BlockComment => Channel::Hidden,
        _ => Channel::Default,
    }
}

// ============================================================================
// ERROR HANDLING
// ============================================================================

fn convert_lex_error(
    error: pest::error::Error<Rule>,
    reporter: &ReportingContext,
) -> DeclassifyError {
    let span = match error.location {
        pest::error::InputLocation::Pos(pos) => Span {
            start: pos,
            end: pos,
        },
        pest::error::InputLocation::Span((start, end)) => Span { start, end },
    };
    reporter.malformed("token", crate::errors::to_source_span(span))
}
