//! Declassify Parser - Declaration-Level Recursive Descent
//!
//! Builds a [`CompilationUnit`] from the significant tokens of a lexed file.
//! Only declaration shapes are materialized; member bodies, initializer
//! expressions, and clauses the classifier never inspects are consumed by
//! delimiter matching and survive as tokens in the stream.

use crate::ast::{
    ClassDeclaration, CompilationUnit, FieldDeclaration, InterfaceDeclaration, Member,
    MethodDeclaration, Modifier, TokenRange, TypeDeclaration, VariableDeclarator,
};
use crate::errors::{to_source_span, ErrorReporting, ReportingContext, SourceContext};
use crate::syntax::{Span, Token, TokenKind, TokenStream};
use crate::DeclassifyError;

/// Member-level modifier keywords. Annotations are not modifiers; they are
/// skipped entirely (annotation-aware eligibility is out of scope).
const MODIFIER_WORDS: &[&str] = &[
    "public",
    "protected",
    "private",
    "static",
    "abstract",
    "final",
    "native",
    "synchronized",
    "transient",
    "volatile",
    "strictfp",
];

// ============================================================================
// PUBLIC API
// ============================================================================

/// Parse a token stream into its declaration tree.
pub fn parse(
    stream: &TokenStream,
    source_context: &SourceContext,
) -> Result<CompilationUnit, DeclassifyError> {
    let mut cursor = Cursor::new(stream, source_context);
    let mut types = Vec::new();

    while !cursor.at_end() {
        match cursor.peek_text() {
            Some("package") | Some("import") => cursor.consume_statement()?,
            Some(";") => {
                cursor.advance();
            }
            _ => {
                if let Some(decl) = cursor.parse_type_declaration()? {
                    types.push(decl);
                }
            }
        }
    }

    Ok(CompilationUnit { types })
}

// ============================================================================
// CURSOR - significant-token window over the stream
// ============================================================================

struct Cursor<'a> {
    tokens: Vec<&'a Token>,
    pos: usize,
    reporter: ReportingContext,
    eof_span: Span,
}

impl<'a> Cursor<'a> {
    fn new(stream: &'a TokenStream, source_context: &SourceContext) -> Self {
        let end = source_context.content.len();
        Self {
            tokens: stream.significant().collect(),
            pos: 0,
            reporter: ReportingContext::new(source_context.clone(), "parse"),
            eof_span: Span { start: end, end },
        }
    }

    fn at_end(&self) -> bool {
        self.pos >= self.tokens.len()
    }

    fn peek(&self) -> Option<&'a Token> {
        self.tokens.get(self.pos).copied()
    }

    fn peek_text(&self) -> Option<&'a str> {
        self.peek().map(|t| t.text.as_str())
    }

    fn advance(&mut self) -> Option<&'a Token> {
        let token = self.peek();
        if token.is_some() {
            self.pos += 1;
        }
        token
    }

    fn advance_or_eof(&mut self, expected: &str) -> Result<&'a Token, DeclassifyError> {
        self.advance()
            .ok_or_else(|| self.reporter.unexpected_eof(expected, to_source_span(self.eof_span)))
    }

    fn expect_text(&mut self, expected: &str) -> Result<&'a Token, DeclassifyError> {
        let token = self.advance_or_eof(expected)?;
        if token.text == expected {
            Ok(token)
        } else {
            Err(self
                .reporter
                .unexpected_token(expected, &token.text, to_source_span(token.span)))
        }
    }

    fn expect_ident(&mut self, expected: &str) -> Result<&'a Token, DeclassifyError> {
        let token = self.advance_or_eof(expected)?;
        if token.kind == TokenKind::Ident {
            Ok(token)
        } else {
            Err(self
                .reporter
                .unexpected_token(expected, &token.text, to_source_span(token.span)))
        }
    }

    fn unexpected(&self, expected: &str, found: &'a Token) -> DeclassifyError {
        self.reporter
            .unexpected_token(expected, &found.text, to_source_span(found.span))
    }

    // ------------------------------------------------------------------
    // Statement and delimiter skipping
    // ------------------------------------------------------------------

    /// Consume through the terminating `;` of a package/import statement.
    fn consume_statement(&mut self) -> Result<(), DeclassifyError> {
        loop {
            let token = self.advance_or_eof("';'")?;
            if token.text == ";" {
                return Ok(());
            }
        }
    }

    /// Consume a balanced `open`...`close` region; returns the closing token.
    fn skip_balanced(&mut self, open: &str, close: &str) -> Result<&'a Token, DeclassifyError> {
        self.expect_text(open)?;
        let mut depth = 1usize;
        loop {
            let token = self.advance_or_eof(close)?;
            if token.text == open {
                depth += 1;
            } else if token.text == close {
                depth -= 1;
                if depth == 0 {
                    return Ok(token);
                }
            }
        }
    }

    // ------------------------------------------------------------------
    // Type declarations
    // ------------------------------------------------------------------

    /// Parse one type declaration. Returns `None` for tolerated-but-unmodeled
    /// declarations (enums), whose extent is consumed without a node.
    fn parse_type_declaration(&mut self) -> Result<Option<TypeDeclaration>, DeclassifyError> {
        let modifiers = self.parse_modifiers()?;
        match self.peek_text() {
            Some("class") => Ok(Some(TypeDeclaration::Class(self.parse_class(modifiers)?))),
            Some("interface") => Ok(Some(TypeDeclaration::Interface(
                self.parse_interface(modifiers)?,
            ))),
            Some("enum") => {
                self.advance();
                self.expect_ident("enum name")?;
                self.consume_until_open_brace()?;
                self.skip_balanced("{", "}")?;
                Ok(None)
            }
            Some(_) => {
                let found = self.peek().expect("peeked");
                Err(self.unexpected("'class' or 'interface'", found))
            }
            None => Err(self
                .reporter
                .unexpected_eof("'class' or 'interface'", to_source_span(self.eof_span))),
        }
    }

    fn parse_class(
        &mut self,
        modifiers: Vec<Modifier>,
    ) -> Result<ClassDeclaration, DeclassifyError> {
        let class_kw = self.expect_text("class")?;
        let name = self.expect_ident("class name")?.text.clone();

        if self.peek_text() == Some("<") {
            self.skip_balanced("<", ">")?;
        }
        self.consume_until_open_brace()?;

        self.expect_text("{")?;
        let (members, close) = self.parse_members()?;

        let header_start = modifiers.first().map(|m| m.token).unwrap_or(class_kw.index);
        Ok(ClassDeclaration {
            name,
            modifiers,
            members,
            span: TokenRange::new(header_start, close.index),
            header: TokenRange::new(header_start, class_kw.index),
        })
    }

    fn parse_interface(
        &mut self,
        modifiers: Vec<Modifier>,
    ) -> Result<InterfaceDeclaration, DeclassifyError> {
        let interface_kw = self.expect_text("interface")?;
        let name = self.expect_ident("interface name")?.text.clone();

        if self.peek_text() == Some("<") {
            self.skip_balanced("<", ">")?;
        }
        self.consume_until_open_brace()?;
        let close = self.skip_balanced("{", "}")?;

        let start = modifiers
            .first()
            .map(|m| m.token)
            .unwrap_or(interface_kw.index);
        Ok(InterfaceDeclaration {
            name,
            span: TokenRange::new(start, close.index),
        })
    }

    /// Consume extends/implements clauses up to (not including) the body brace.
    fn consume_until_open_brace(&mut self) -> Result<(), DeclassifyError> {
        loop {
            match self.peek_text() {
                Some("{") => return Ok(()),
                Some(_) => {
                    self.advance();
                }
                None => {
                    return Err(self
                        .reporter
                        .unexpected_eof("'{'", to_source_span(self.eof_span)))
                }
            }
        }
    }

    // ------------------------------------------------------------------
    // Class members
    // ------------------------------------------------------------------

    fn parse_members(&mut self) -> Result<(Vec<Member>, &'a Token), DeclassifyError> {
        let mut members = Vec::new();
        loop {
            match self.peek_text() {
                Some("}") => {
                    let close = self.advance().expect("peeked");
                    return Ok((members, close));
                }
                Some(";") => {
                    self.advance();
                }
                Some(_) => members.push(self.parse_member()?),
                None => {
                    return Err(self
                        .reporter
                        .unexpected_eof("'}'", to_source_span(self.eof_span)))
                }
            }
        }
    }

    fn parse_member(&mut self) -> Result<Member, DeclassifyError> {
        let start = self.peek().expect("caller peeked").index;
        let modifiers = self.parse_modifiers()?;

        match self.peek_text() {
            Some("class") => Ok(Member::Type(TypeDeclaration::Class(
                self.parse_class(modifiers)?,
            ))),
            Some("interface") => Ok(Member::Type(TypeDeclaration::Interface(
                self.parse_interface(modifiers)?,
            ))),
            Some("{") => {
                // Static or instance initializer block.
                let close = self.skip_balanced("{", "}")?;
                Ok(Member::Other(TokenRange::new(start, close.index)))
            }
            Some(_) => match self.member_shape() {
                MemberShape::Routine { paren_pos } => {
                    self.parse_routine(start, modifiers, paren_pos)
                }
                MemberShape::Field => self.parse_field(start, modifiers),
            },
            None => Err(self
                .reporter
                .unexpected_eof("class member", to_source_span(self.eof_span))),
        }
    }

    /// Decide whether the member at the cursor is a routine (method or
    /// constructor) or a field, by which of `(`, `=`, `;` comes first.
    fn member_shape(&self) -> MemberShape {
        let mut i = self.pos;
        while let Some(token) = self.tokens.get(i) {
            match token.text.as_str() {
                "(" => return MemberShape::Routine { paren_pos: i },
                "=" | ";" | "{" | "}" => return MemberShape::Field,
                _ => {}
            }
            i += 1;
        }
        MemberShape::Field
    }

    fn parse_routine(
        &mut self,
        start: usize,
        modifiers: Vec<Modifier>,
        paren_pos: usize,
    ) -> Result<Member, DeclassifyError> {
        // A constructor has no return type: the routine name is the only
        // token between the modifier list and the parameter list.
        let is_constructor = paren_pos == self.pos + 1;
        let name = self.tokens[paren_pos - 1].text.clone();

        while self.pos < paren_pos {
            self.advance();
        }
        self.skip_balanced("(", ")")?;

        let end = loop {
            match self.peek_text() {
                Some(";") => break self.advance().expect("peeked"),
                Some("{") => break self.skip_balanced("{", "}")?,
                Some("}") => {
                    let found = self.peek().expect("peeked");
                    return Err(self.unexpected("';' or '{'", found));
                }
                Some(_) => {
                    // throws clause
                    self.advance();
                }
                None => {
                    return Err(self
                        .reporter
                        .unexpected_eof("';' or '{'", to_source_span(self.eof_span)))
                }
            }
        };

        let span = TokenRange::new(start, end.index);
        if is_constructor {
            Ok(Member::Other(span))
        } else {
            Ok(Member::Method(MethodDeclaration {
                name,
                modifiers,
                span,
            }))
        }
    }

    fn parse_field(
        &mut self,
        start: usize,
        modifiers: Vec<Modifier>,
    ) -> Result<Member, DeclassifyError> {
        let mut statement: Vec<&Token> = Vec::new();
        let mut depth = 0usize;
        let semi = loop {
            match self.peek_text() {
                Some("}") if depth == 0 => {
                    let found = self.peek().expect("peeked");
                    return Err(self.unexpected("';'", found));
                }
                Some(_) => {
                    let token = self.advance().expect("peeked");
                    match token.text.as_str() {
                        "(" | "[" | "{" => depth += 1,
                        ")" | "]" | "}" => depth = depth.saturating_sub(1),
                        ";" if depth == 0 => break token,
                        _ => {}
                    }
                    statement.push(token);
                }
                None => {
                    return Err(self
                        .reporter
                        .unexpected_eof("';'", to_source_span(self.eof_span)))
                }
            }
        };

        Ok(Member::Field(FieldDeclaration {
            modifiers,
            declarators: split_declarators(&statement),
            span: TokenRange::new(start, semi.index),
        }))
    }

    // ------------------------------------------------------------------
    // Modifiers and annotations
    // ------------------------------------------------------------------

    fn parse_modifiers(&mut self) -> Result<Vec<Modifier>, DeclassifyError> {
        let mut modifiers = Vec::new();
        loop {
            match self.peek_text() {
                Some(text) if MODIFIER_WORDS.contains(&text) => {
                    let token = self.advance().expect("peeked");
                    modifiers.push(Modifier {
                        text: token.text.clone(),
                        token: token.index,
                    });
                }
                Some("@") => self.skip_annotation()?,
                _ => return Ok(modifiers),
            }
        }
    }

    fn skip_annotation(&mut self) -> Result<(), DeclassifyError> {
        self.expect_text("@")?;
        self.advance_or_eof("annotation name")?;
        while self.peek_text() == Some(".") {
            self.advance();
            self.advance_or_eof("annotation name")?;
        }
        if self.peek_text() == Some("(") {
            self.skip_balanced("(", ")")?;
        }
        Ok(())
    }
}

enum MemberShape {
    Routine { paren_pos: usize },
    Field,
}

// ============================================================================
// DECLARATOR SPLITTING
// ============================================================================

/// Split the token run of a field statement (modifiers and `;` excluded)
/// into its variable declarators.
fn split_declarators(statement: &[&Token]) -> Vec<VariableDeclarator> {
    let mut declarators = Vec::new();
    let mut depth = 0usize;
    let mut angle = 0usize;
    let mut name: Option<String> = None;
    let mut last_ident: Option<String> = None;
    let mut has_initializer = false;

    // Commas inside <...> never split declarators.
    for token in statement {
        match token.text.as_str() {
            "(" | "[" | "{" => depth += 1,
            ")" | "]" | "}" => depth = depth.saturating_sub(1),
            "<" if depth == 0 => angle += 1,
            ">" if depth == 0 => angle = angle.saturating_sub(1),
            "=" if depth == 0 && angle == 0 => {
                if !has_initializer {
                    name = last_ident.take();
                    has_initializer = true;
                }
            }
            "," if depth == 0 && angle == 0 => {
                declarators.push(VariableDeclarator {
                    name: name.take().or_else(|| last_ident.take()).unwrap_or_default(),
                    has_initializer,
                });
                has_initializer = false;
                last_ident = None;
            }
            _ => {
                if token.kind == TokenKind::Ident && !has_initializer {
                    last_ident = Some(token.text.clone());
                }
            }
        }
    }

    if !statement.is_empty() {
        declarators.push(VariableDeclarator {
            name: name.or(last_ident).unwrap_or_default(),
            has_initializer,
        });
    }

    declarators
}
