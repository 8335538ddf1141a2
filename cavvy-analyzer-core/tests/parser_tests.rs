use cavvy_analyzer_core::{AnalysisEngine, SymbolKind};
use lsp_types::Position;

fn engine() -> AnalysisEngine {
    AnalysisEngine::new().expect("engine should initialize")
}

/// Test that a class declaration with a supertype is extracted with its
/// inheritance detail.
#[test]
fn test_extract_class_with_supertype() {
    let source = "public class Shape : Drawable {\n}\n";
    let table = engine().parse_symbols(source);

    assert_eq!(table.len(), 1);
    let class = &table.symbols()[0];
    assert_eq!(class.name, "Shape");
    assert_eq!(
        class.kind,
        SymbolKind::Class {
            supertype: Some("Drawable".to_string())
        }
    );
    assert_eq!(class.detail().as_deref(), Some("extends Drawable"));
    assert_eq!(class.range.start, Position::new(0, 13));
    assert_eq!(class.range.end, Position::new(0, 18));
    assert_eq!(class.selection_range, class.range);
}

/// Test method extraction: name position, return-type detail, parent class,
/// and same-line parameters.
#[test]
fn test_extract_method_and_parameters() {
    let source = "public class Calculator {\n    public int add(int a, int b) {\n        return a + b;\n    }\n}\n";
    let table = engine().parse_symbols(source);

    let add = table.methods().next().expect("method should be extracted");
    assert_eq!(add.name, "add");
    assert_eq!(add.parent(), Some("Calculator"));
    assert_eq!(add.detail().as_deref(), Some("() -> int"));
    assert_eq!(add.range.start, Position::new(1, 15));

    let params: Vec<_> = table
        .symbols()
        .iter()
        .filter(|s| s.is_parameter())
        .collect();
    assert_eq!(params.len(), 2);
    assert_eq!(params[0].name, "a");
    assert_eq!(params[0].parent(), Some("add"));
    assert_eq!(params[0].range.start, Position::new(1, 23));
    assert_eq!(params[1].name, "b");
    assert_eq!(params[1].range.start, Position::new(1, 30));

    assert_eq!(table.methods_of("Calculator").count(), 1);
}

/// Test that class-body declarations become fields while method-body
/// declarations become variables.
#[test]
fn test_fields_versus_variables() {
    let source = "\
public class Counter {
    private int count = 0;
    string label;

    public void tick(int amount) {
        int next = count + amount;
        count = next;
    }
}
";
    let table = engine().parse_symbols(source);

    let fields: Vec<_> = table.fields().collect();
    assert_eq!(fields.len(), 2);
    assert_eq!(fields[0].name, "count");
    assert_eq!(fields[0].parent(), Some("Counter"));
    assert_eq!(fields[0].detail().as_deref(), Some("int"));
    assert_eq!(fields[1].name, "label");
    assert_eq!(fields[1].detail().as_deref(), Some("string"));

    let variables: Vec<_> = table.variables().collect();
    assert_eq!(variables.len(), 1);
    assert_eq!(variables[0].name, "next");
    assert_eq!(variables[0].parent(), Some("tick"));

    // Plain assignments are not declarations.
    assert!(table.symbols().iter().all(|s| s.name != "count" || s.is_field()));
}

/// Test that a closing brace ends the class scope: declarations after it are
/// not attributed to the closed class.
#[test]
fn test_class_scope_ends_at_closing_brace() {
    let source = "\
class Config {
    int size = 4;
}
int orphan = 1;
";
    let table = engine().parse_symbols(source);

    assert_eq!(table.len(), 2);
    assert_eq!(table.symbols()[1].name, "size");
    assert!(table.symbols().iter().all(|s| s.name != "orphan"));
}

/// Test nested class attribution: members after the inner class closes go
/// back to the outer class.
#[test]
fn test_nested_class_scopes() {
    let source = "\
class Outer {
    class Inner {
        int x;
    }
    int y;
}
";
    let table = engine().parse_symbols(source);

    let x = table.fields().find(|s| s.name == "x").unwrap();
    assert_eq!(x.parent(), Some("Inner"));
    let y = table.fields().find(|s| s.name == "y").unwrap();
    assert_eq!(y.parent(), Some("Outer"));
}

/// Test that methods in consecutive classes attribute to their own class.
#[test]
fn test_two_classes_in_one_file() {
    let source = "\
class A {
    void first() {
    }
}
class B {
    void second() {
    }
}
";
    let table = engine().parse_symbols(source);

    assert_eq!(table.classes().count(), 2);
    assert_eq!(table.methods_of("A").count(), 1);
    assert_eq!(table.methods_of("B").count(), 1);
    assert_eq!(
        table.methods_of("B").next().unwrap().name,
        "second"
    );
}

/// Test that commented-out declarations are not extracted.
#[test]
fn test_commented_declarations_are_skipped() {
    let source = "\
// class Ghost {
/* class Phantom { */
class Real {
}
";
    let table = engine().parse_symbols(source);

    assert_eq!(table.classes().count(), 1);
    assert_eq!(table.classes().next().unwrap().name, "Real");
}

/// Test a top-level method without an enclosing class.
#[test]
fn test_method_without_class_has_no_parent() {
    let table = engine().parse_symbols("void helper() {\n}\n");

    let helper = table.methods().next().unwrap();
    assert_eq!(helper.parent(), None);
    assert_eq!(
        helper.kind,
        SymbolKind::Method {
            class: None,
            return_type: "void".to_string()
        }
    );
}

/// Test that control-flow lines are never mistaken for declarations.
#[test]
fn test_control_flow_is_not_a_declaration() {
    let source = "\
class App {
    void run(int x) {
        if (x > 0) {
        } else if (x < 0) {
        }
        return;
    }
}
";
    let table = engine().parse_symbols(source);

    assert_eq!(table.classes().count(), 1);
    let methods: Vec<_> = table.methods().collect();
    assert_eq!(methods.len(), 1);
    assert_eq!(methods[0].name, "run");
}

/// Test position-based lookup through the query layer.
#[test]
fn test_symbol_at_position() {
    let source = "class Registry {\n    int total;\n}\n";
    let table = engine().parse_symbols(source);

    let hit = table.symbol_at(Position::new(0, 8)).expect("inside 'Registry'");
    assert_eq!(hit.name, "Registry");

    let field = table.symbol_at(Position::new(1, 8)).expect("inside 'total'");
    assert_eq!(field.name, "total");

    // Ranges are end-exclusive.
    assert!(table.symbol_at(Position::new(0, 14)).is_none());
    assert!(table.symbol_at(Position::new(2, 0)).is_none());
}
