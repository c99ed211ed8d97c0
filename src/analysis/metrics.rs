//! Structural metrics: per-class method and attribute counts.
//!
//! A read-only sibling of the classifier sharing the same traversal
//! protocol. It never touches the edit buffer and has no write path.

use serde::Serialize;

use crate::analysis::DeclarationListener;
use crate::ast::{ClassDeclaration, FieldDeclaration, MethodDeclaration};

/// Counts for one class, in traversal-entry order within the report.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ClassMetrics {
    pub name: String,
    pub methods: usize,
    pub public_attrs: usize,
    pub private_attrs: usize,
}

impl ClassMetrics {
    pub fn attrs(&self) -> usize {
        self.public_attrs + self.private_attrs
    }
}

/// The aggregated report over one or more files.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct MetricsReport {
    pub classes: Vec<ClassMetrics>,
}

impl MetricsReport {
    pub fn class_count(&self) -> usize {
        self.classes.len()
    }

    pub fn extend(&mut self, classes: Vec<ClassMetrics>) {
        self.classes.extend(classes);
    }

    /// Render the report in the tool's text layout.
    pub fn to_text(&self) -> String {
        let mut out = format!("no.classes: {}\n", self.class_count());
        for (i, class) in self.classes.iter().enumerate() {
            out.push_str(&format!("{}.{}:\n", i + 1, class.name));
            out.push_str(&format!("\tno.attrs: {}\n", class.attrs()));
            out.push_str(&format!("\t\tpublic: {}\n", class.public_attrs));
            out.push_str(&format!("\t\tprivate: {}\n", class.private_attrs));
            out.push_str(&format!("\tno.methods: {}\n", class.methods));
        }
        out
    }
}

/// The metrics pass. Counts land on the innermost class, so nested classes
/// are tallied separately from their owners.
#[derive(Default)]
pub struct MetricsAnalyzer {
    classes: Vec<ClassMetrics>,
    stack: Vec<usize>,
}

impl MetricsAnalyzer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn into_classes(self) -> Vec<ClassMetrics> {
        self.classes
    }
}

impl DeclarationListener for MetricsAnalyzer {
    fn enter_class(&mut self, class: &ClassDeclaration) {
        self.stack.push(self.classes.len());
        self.classes.push(ClassMetrics {
            name: class.name.clone(),
            methods: 0,
            public_attrs: 0,
            private_attrs: 0,
        });
    }

    fn exit_class(&mut self, _class: &ClassDeclaration) {
        self.stack.pop();
    }

    fn enter_method(&mut self, _method: &MethodDeclaration) {
        if let Some(&current) = self.stack.last() {
            self.classes[current].methods += 1;
        }
    }

    fn enter_field(&mut self, field: &FieldDeclaration) {
        if let Some(&current) = self.stack.last() {
            // An attribute is private only when `private` leads its modifier
            // list; each field declaration counts once, however many
            // variables it declares.
            if field.modifiers.first().map_or(false, |m| m.is("private")) {
                self.classes[current].private_attrs += 1;
            } else {
                self.classes[current].public_attrs += 1;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analysis::walk;
    use crate::errors::SourceContext;
    use crate::syntax::{lexer, parser};

    fn analyze(source: &str) -> Vec<ClassMetrics> {
        let ctx = SourceContext::from_file("test.java", source);
        let stream = lexer::tokenize(source, &ctx).unwrap();
        let unit = parser::parse(&stream, &ctx).unwrap();
        let mut analyzer = MetricsAnalyzer::new();
        walk(&unit, &mut analyzer);
        analyzer.into_classes()
    }

    #[test]
    fn counts_methods_and_attributes_per_class() {
        let source = "class A { private int hidden = 1; public int open = 2; int bare; void m() { } void n() { } }";
        let classes = analyze(source);
        assert_eq!(classes.len(), 1);
        assert_eq!(classes[0].methods, 2);
        assert_eq!(classes[0].public_attrs, 2);
        assert_eq!(classes[0].private_attrs, 1);
        assert_eq!(classes[0].attrs(), 3);
    }

    #[test]
    fn multi_variable_declaration_counts_once() {
        let classes = analyze("class A { public int x = 1, y = 2; }");
        assert_eq!(classes[0].public_attrs, 1);
    }

    #[test]
    fn only_a_leading_private_modifier_counts_as_private() {
        let classes = analyze("class A { static private int x = 1; }");
        assert_eq!(classes[0].public_attrs, 1);
        assert_eq!(classes[0].private_attrs, 0);
    }

    #[test]
    fn nested_classes_are_tallied_separately() {
        let source = "class Outer { void m() { } class Inner { void a() { } void b() { } } }";
        let classes = analyze(source);
        assert_eq!(classes.len(), 2);
        assert_eq!(classes[0].name, "Outer");
        assert_eq!(classes[0].methods, 1);
        assert_eq!(classes[1].name, "Inner");
        assert_eq!(classes[1].methods, 2);
    }

    #[test]
    fn text_layout_matches_the_report_format() {
        let report = MetricsReport {
            classes: vec![ClassMetrics {
                name: "Shape".into(),
                methods: 2,
                public_attrs: 1,
                private_attrs: 0,
            }],
        };
        assert_eq!(
            report.to_text(),
            "no.classes: 1\n1.Shape:\n\tno.attrs: 1\n\t\tpublic: 1\n\t\tprivate: 0\n\tno.methods: 2\n"
        );
    }
}
