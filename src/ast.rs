//! Declaration tree for Java compilation units.
//!
//! The tree is declaration-level only: class, interface, method, and field
//! shapes with their modifier lists. Statement and expression structure is
//! never materialized - member bodies and initializers are consumed by the
//! parser and survive solely as tokens in the stream. Every node retains the
//! token-index span it was built from, which is the address space all edits
//! use.

use serde::{Deserialize, Serialize};

/// A contiguous, inclusive range of token indices in the original stream.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenRange {
    pub start: usize,
    pub end: usize,
}

impl TokenRange {
    pub fn new(start: usize, end: usize) -> Self {
        Self { start, end }
    }

    /// A range covering a single token.
    pub fn single(index: usize) -> Self {
        Self {
            start: index,
            end: index,
        }
    }

    pub fn contains(&self, index: usize) -> bool {
        self.start <= index && index <= self.end
    }

    pub fn overlaps(&self, other: &TokenRange) -> bool {
        self.start <= other.end && other.start <= self.end
    }
}

/// One declaration-level or member-level modifier keyword, with the index of
/// the token it occupies.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Modifier {
    pub text: String,
    pub token: usize,
}

impl Modifier {
    pub fn is(&self, text: &str) -> bool {
        self.text == text
    }
}

/// A single variable binding within a field declaration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VariableDeclarator {
    pub name: String,
    pub has_initializer: bool,
}

/// A field declaration: one modifier list, one or more variable bindings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FieldDeclaration {
    pub modifiers: Vec<Modifier>,
    pub declarators: Vec<VariableDeclarator>,
    pub span: TokenRange,
}

/// A method declaration. Only the signature-level facts the classifier
/// needs are kept; the body (if any) lives in the token stream.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MethodDeclaration {
    pub name: String,
    pub modifiers: Vec<Modifier>,
    pub span: TokenRange,
}

impl MethodDeclaration {
    pub fn has_modifier(&self, text: &str) -> bool {
        self.modifiers.iter().any(|m| m.is(text))
    }
}

/// A class declaration with its ordered members.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClassDeclaration {
    pub name: String,
    pub modifiers: Vec<Modifier>,
    pub members: Vec<Member>,
    /// Full declaration, first modifier (or `class` keyword) through the
    /// closing brace.
    pub span: TokenRange,
    /// Declaration header: first modifier (or `class` keyword) through the
    /// `class` keyword, inclusive. This is the rewrite target.
    pub header: TokenRange,
}

impl ClassDeclaration {
    pub fn has_modifier(&self, text: &str) -> bool {
        self.modifiers.iter().any(|m| m.is(text))
    }

    /// The methods owned directly by this class, in declaration order.
    pub fn methods(&self) -> impl Iterator<Item = &MethodDeclaration> {
        self.members.iter().filter_map(|m| match m {
            Member::Method(method) => Some(method),
            _ => None,
        })
    }

    /// The fields owned directly by this class, in declaration order.
    pub fn fields(&self) -> impl Iterator<Item = &FieldDeclaration> {
        self.members.iter().filter_map(|m| match m {
            Member::Field(field) => Some(field),
            _ => None,
        })
    }
}

/// An interface declaration. Interfaces are never classified or rewritten;
/// recognizing them is what makes conversion idempotent.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InterfaceDeclaration {
    pub name: String,
    pub span: TokenRange,
}

/// One member of a class body.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Member {
    Method(MethodDeclaration),
    Field(FieldDeclaration),
    /// A nested type declaration, classified independently of its owner.
    Type(TypeDeclaration),
    /// Constructors and initializer blocks: parsed for their extent, inert
    /// for classification.
    Other(TokenRange),
}

/// A top-level (or nested) type declaration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[allow(clippy::large_enum_variant)]
pub enum TypeDeclaration {
    Class(ClassDeclaration),
    Interface(InterfaceDeclaration),
}

/// A parsed source file: its type declarations in source order.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct CompilationUnit {
    pub types: Vec<TypeDeclaration>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn token_range_overlap() {
        let a = TokenRange::new(0, 4);
        assert!(a.overlaps(&TokenRange::new(4, 8)));
        assert!(a.overlaps(&TokenRange::new(2, 3)));
        assert!(!a.overlaps(&TokenRange::new(5, 8)));
        assert!(TokenRange::single(3).contains(3));
        assert!(!TokenRange::single(3).contains(4));
    }

    #[test]
    fn member_accessors_filter_by_kind() {
        let class = ClassDeclaration {
            name: "A".into(),
            modifiers: vec![],
            members: vec![
                Member::Field(FieldDeclaration {
                    modifiers: vec![],
                    declarators: vec![],
                    span: TokenRange::new(2, 6),
                }),
                Member::Method(MethodDeclaration {
                    name: "m".into(),
                    modifiers: vec![],
                    span: TokenRange::new(8, 14),
                }),
                Member::Other(TokenRange::new(16, 20)),
            ],
            span: TokenRange::new(0, 21),
            header: TokenRange::new(0, 0),
        };
        assert_eq!(class.methods().count(), 1);
        assert_eq!(class.fields().count(), 1);
    }
}
