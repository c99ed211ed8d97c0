// Classification and conversion behavior against exact source texts.

use declassify::analysis::classifier::Eligibility;
use declassify::engine::refactor_source;

const SHAPE_FIXTURE: &str = "\
public abstract class Shape {
    public int x = 12, y = 12;
    abstract void area();
    public abstract int[] center();
}

interface test {
    int[] center();
}

class circle extends Shape {

    public void area() {
        System.out.println(\"area\");
    }

    public int[] center() {
        return new int[]{0, 0};
    }
}";

#[test]
fn shape_fixture_converts_only_the_abstract_class() {
    let outcome = refactor_source("Shape.java", SHAPE_FIXTURE).unwrap();

    let lines: Vec<String> = outcome.reports.iter().map(|r| r.to_string()).collect();
    assert_eq!(
        lines,
        vec![
            "Shape is fully abstract and convertable.",
            "circle is not fully abstract.",
        ]
    );
    assert_eq!(outcome.converted, 1);

    let expected = "\
interface Shape {
     int x = 12, y = 12;
     void area();
      int[] center();
}

interface test {
    int[] center();
}

class circle extends Shape {

    public void area() {
        System.out.println(\"area\");
    }

    public int[] center() {
        return new int[]{0, 0};
    }
}";
    assert_eq!(outcome.rendered.as_deref(), Some(expected));
}

#[test]
fn header_replacement_drops_leading_visibility() {
    let source = "public abstract class Shape { public abstract void draw(); }";
    let outcome = refactor_source("Shape.java", source).unwrap();
    assert_eq!(
        outcome.rendered.as_deref(),
        Some("interface Shape {   void draw(); }")
    );
}

#[test]
fn private_method_reports_not_convertible_and_renders_nothing() {
    let source = "abstract class Box { private abstract void seal(); }";
    let outcome = refactor_source("Box.java", source).unwrap();
    assert_eq!(outcome.reports[0].eligibility, Eligibility::NotConvertible);
    assert_eq!(
        outcome.reports[0].to_string(),
        "Box is fully abstract but not convertible."
    );
    assert!(outcome.rendered.is_none());
}

#[test]
fn uninitialized_field_reports_not_fully_abstract() {
    let source = "abstract class Config { int LIMIT; }";
    let outcome = refactor_source("Config.java", source).unwrap();
    assert_eq!(outcome.reports[0].eligibility, Eligibility::NotFullyAbstract);
    assert_eq!(outcome.reports[0].to_string(), "Config is not fully abstract.");
    assert!(outcome.rendered.is_none());
}

#[test]
fn field_binding_check_stops_at_first_uninitialized() {
    // The first uninitialized binding settles the field; later bindings in
    // the same declaration are not inspected. Either way the class is out.
    let leading = "abstract class C { int a, b = 1; abstract void m(); }";
    let outcome = refactor_source("C.java", leading).unwrap();
    assert_eq!(outcome.reports[0].eligibility, Eligibility::NotFullyAbstract);

    let trailing = "abstract class C { int a = 1, b; abstract void m(); }";
    let outcome = refactor_source("C.java", trailing).unwrap();
    assert_eq!(outcome.reports[0].eligibility, Eligibility::NotFullyAbstract);
}

#[test]
fn fully_initialized_multi_binding_field_keeps_eligibility() {
    let source = "abstract class C { int a = 1, b = 2; abstract void m(); }";
    let outcome = refactor_source("C.java", source).unwrap();
    assert_eq!(outcome.reports[0].eligibility, Eligibility::Converted);
}

#[test]
fn conversion_is_idempotent() {
    let source = "abstract class A { abstract void m(); }";
    let first = refactor_source("A.java", source).unwrap();
    let converted = first.rendered.expect("first run converts");
    assert_eq!(converted, "interface A {  void m(); }");

    let second = refactor_source("A.java", &converted).unwrap();
    assert!(second.reports.is_empty());
    assert_eq!(second.converted, 0);
    assert!(second.rendered.is_none());
}

#[test]
fn constructors_do_not_affect_eligibility() {
    let source = "abstract class A { A() { } abstract void m(); }";
    let outcome = refactor_source("A.java", source).unwrap();
    assert_eq!(outcome.reports[0].eligibility, Eligibility::Converted);
}

#[test]
fn nested_class_does_not_taint_its_owner() {
    let source = "\
abstract class Outer {
    abstract void m();
    class Inner {
        void concrete() { }
    }
}";
    let outcome = refactor_source("Outer.java", source).unwrap();
    let lines: Vec<String> = outcome.reports.iter().map(|r| r.to_string()).collect();
    assert_eq!(
        lines,
        vec![
            "Inner is not fully abstract.",
            "Outer is fully abstract and convertable.",
        ]
    );

    let expected = "\
interface Outer {
     void m();
    class Inner {
        void concrete() { }
    }
}";
    assert_eq!(outcome.rendered.as_deref(), Some(expected));
}

#[test]
fn both_nested_and_outer_convert_in_one_pass() {
    let source = "abstract class Outer { abstract void m(); abstract class Inner { abstract void n(); } }";
    let outcome = refactor_source("Outer.java", source).unwrap();
    assert_eq!(outcome.converted, 2);
    assert_eq!(
        outcome.rendered.as_deref(),
        Some("interface Outer {  void m(); interface Inner {  void n(); } }")
    );
}

#[test]
fn comments_and_spacing_survive_conversion_untouched() {
    let source = "\
// file header
public abstract class Shape {
    /* keep me */
    public abstract void draw(); // trailing
}";
    let outcome = refactor_source("Shape.java", source).unwrap();
    let expected = "\
// file header
interface Shape {
    /* keep me */
      void draw(); // trailing
}";
    assert_eq!(outcome.rendered.as_deref(), Some(expected));
}

#[test]
fn every_class_gets_exactly_one_report_line() {
    let source = "\
abstract class A { abstract void m(); }
class B { }
abstract class C { private abstract void p(); }
";
    let outcome = refactor_source("Many.java", source).unwrap();
    assert_eq!(outcome.reports.len(), 3);
    assert_eq!(outcome.converted, 1);
}
