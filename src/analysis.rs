//! Analysis passes over the declaration tree.
//!
//! Traversal is a strict depth-first walk dispatching enter/exit callbacks
//! over the closed set of declaration variants. Passes implement
//! [`DeclarationListener`]; default methods are empty so a pass only
//! declares the callbacks it cares about.

use crate::ast::{
    ClassDeclaration, CompilationUnit, FieldDeclaration, InterfaceDeclaration, Member,
    MethodDeclaration, TypeDeclaration,
};

pub mod classifier;
pub mod metrics;

/// Enter/exit callbacks for one depth-first traversal.
///
/// Members are visited in declaration order, inside their owning class's
/// enter/exit pair; a stateful listener can therefore always recover the
/// owning class from its own context stack.
pub trait DeclarationListener {
    fn enter_class(&mut self, _class: &ClassDeclaration) {}
    fn exit_class(&mut self, _class: &ClassDeclaration) {}
    fn enter_interface(&mut self, _interface: &InterfaceDeclaration) {}
    fn exit_interface(&mut self, _interface: &InterfaceDeclaration) {}
    fn enter_method(&mut self, _method: &MethodDeclaration) {}
    fn enter_field(&mut self, _field: &FieldDeclaration) {}
}

/// Walk a compilation unit depth-first, pre-order entering and post-order
/// exiting every type declaration.
pub fn walk<L: DeclarationListener>(unit: &CompilationUnit, listener: &mut L) {
    for declaration in &unit.types {
        walk_type(declaration, listener);
    }
}

fn walk_type<L: DeclarationListener>(declaration: &TypeDeclaration, listener: &mut L) {
    match declaration {
        TypeDeclaration::Class(class) => {
            listener.enter_class(class);
            for member in &class.members {
                match member {
                    Member::Method(method) => listener.enter_method(method),
                    Member::Field(field) => listener.enter_field(field),
                    Member::Type(nested) => walk_type(nested, listener),
                    Member::Other(_) => {}
                }
            }
            listener.exit_class(class);
        }
        TypeDeclaration::Interface(interface) => {
            listener.enter_interface(interface);
            listener.exit_interface(interface);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::errors::SourceContext;
    use crate::syntax::{lexer, parser};

    #[derive(Default)]
    struct TraceListener {
        events: Vec<String>,
    }

    impl DeclarationListener for TraceListener {
        fn enter_class(&mut self, class: &ClassDeclaration) {
            self.events.push(format!("enter {}", class.name));
        }
        fn exit_class(&mut self, class: &ClassDeclaration) {
            self.events.push(format!("exit {}", class.name));
        }
        fn enter_method(&mut self, method: &MethodDeclaration) {
            self.events.push(format!("method {}", method.name));
        }
        fn enter_field(&mut self, _field: &FieldDeclaration) {
            self.events.push("field".into());
        }
    }

    #[test]
    fn walk_is_depth_first_with_paired_boundaries() {
        let source = "class Outer { int x = 1; class Inner { void m() { } } void n() { } }";
        let ctx = SourceContext::from_file("test.java", source);
        let stream = lexer::tokenize(source, &ctx).unwrap();
        let unit = parser::parse(&stream, &ctx).unwrap();

        let mut listener = TraceListener::default();
        walk(&unit, &mut listener);

        assert_eq!(
            listener.events,
            vec![
                "enter Outer",
                "field",
                "enter Inner",
                "method m",
                "exit Inner",
                "method n",
                "exit Outer",
            ]
        );
    }
}
