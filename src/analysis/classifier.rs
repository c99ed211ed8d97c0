//! Declaration Classifier - Eligibility and Conversion
//!
//! Decides, for every class in a compilation unit, whether it is fully
//! abstract and convertible to an interface, and queues the conversion
//! edits for the eligible ones. Disqualification is a normal outcome, not
//! an error: each class produces exactly one [`ClassReport`].

use std::fmt;

use crate::analysis::DeclarationListener;
use crate::ast::{ClassDeclaration, FieldDeclaration, MethodDeclaration, TokenRange};
use crate::rewrite::TokenEditBuffer;
use crate::syntax::TokenStream;

/// Field checking stops at the first uninitialized binding of a declaration;
/// bindings after it are not inspected.
pub const CHECK_ONLY_FIRST_UNINITIALIZED_BINDING: bool = true;

/// Whether a converted header keeps its leading visibility modifier. With
/// `false`, `public abstract class` becomes plain `interface`.
pub const PRESERVE_HEADER_VISIBILITY: bool = false;

/// The three possible outcomes of classifying one class.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Eligibility {
    NotFullyAbstract,
    NotConvertible,
    Converted,
}

/// One line of eligibility reporting for one class.
#[derive(Debug, Clone, PartialEq)]
pub struct ClassReport {
    pub class: String,
    pub eligibility: Eligibility,
}

impl fmt::Display for ClassReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.eligibility {
            Eligibility::NotFullyAbstract => write!(f, "{} is not fully abstract.", self.class),
            Eligibility::NotConvertible => {
                write!(f, "{} is fully abstract but not convertible.", self.class)
            }
            // Historical spelling, kept for output compatibility.
            Eligibility::Converted => {
                write!(f, "{} is fully abstract and convertable.", self.class)
            }
        }
    }
}

/// Per-class aggregate state, live between the class's enter and exit.
struct ClassContext {
    fully_abstract: bool,
    convertible: bool,
}

/// Everything a finished classification run produced.
pub struct ClassificationOutcome<'a> {
    pub reports: Vec<ClassReport>,
    pub rewriter: TokenEditBuffer<'a>,
    pub converted: usize,
}

/// The classifier pass. One instance per file; nested classes each get
/// their own context on the stack and are classified independently.
pub struct Classifier<'a> {
    rewriter: TokenEditBuffer<'a>,
    stack: Vec<ClassContext>,
    reports: Vec<ClassReport>,
    converted: usize,
}

impl<'a> Classifier<'a> {
    pub fn new(stream: &'a TokenStream) -> Self {
        Self {
            rewriter: TokenEditBuffer::new(stream),
            stack: Vec::new(),
            reports: Vec::new(),
            converted: 0,
        }
    }

    pub fn finish(self) -> ClassificationOutcome<'a> {
        ClassificationOutcome {
            reports: self.reports,
            rewriter: self.rewriter,
            converted: self.converted,
        }
    }

    /// Queue the interface-conversion edits for a class that passed both
    /// checks. All ranges address original token indices; the header range
    /// and the member-modifier ranges never intersect.
    fn emit_conversion(&mut self, class: &ClassDeclaration) {
        let replacement = match class
            .modifiers
            .iter()
            .find(|m| matches!(m.text.as_str(), "public" | "protected"))
        {
            Some(visibility) if PRESERVE_HEADER_VISIBILITY => {
                format!("{} interface", visibility.text)
            }
            _ => "interface".to_string(),
        };
        self.rewriter.replace(class.header, replacement);

        for method in class.methods() {
            for modifier in &method.modifiers {
                if modifier.is("abstract") || modifier.is("public") {
                    self.rewriter.delete(TokenRange::single(modifier.token));
                }
            }
        }

        for field in class.fields() {
            for modifier in &field.modifiers {
                if modifier.is("public") {
                    self.rewriter.delete(TokenRange::single(modifier.token));
                }
            }
        }
    }
}

impl DeclarationListener for Classifier<'_> {
    fn enter_class(&mut self, class: &ClassDeclaration) {
        let declared_abstract = class.has_modifier("abstract");
        self.stack.push(ClassContext {
            fully_abstract: declared_abstract,
            convertible: declared_abstract,
        });
    }

    fn enter_method(&mut self, method: &MethodDeclaration) {
        let Some(context) = self.stack.last_mut() else {
            return;
        };
        if method.has_modifier("private") {
            context.convertible = false;
        }
        if !method.has_modifier("abstract") {
            context.fully_abstract = false;
        }
    }

    fn enter_field(&mut self, field: &FieldDeclaration) {
        let Some(context) = self.stack.last_mut() else {
            return;
        };
        for declarator in &field.declarators {
            if !declarator.has_initializer {
                context.fully_abstract = false;
                if CHECK_ONLY_FIRST_UNINITIALIZED_BINDING {
                    break;
                }
            }
        }
    }

    fn exit_class(&mut self, class: &ClassDeclaration) {
        let context = self.stack.pop().expect("enter/exit pairing");
        let eligibility = if !context.fully_abstract {
            Eligibility::NotFullyAbstract
        } else if !context.convertible {
            Eligibility::NotConvertible
        } else {
            self.emit_conversion(class);
            self.converted += 1;
            Eligibility::Converted
        };
        self.reports.push(ClassReport {
            class: class.name.clone(),
            eligibility,
        });
    }
}
