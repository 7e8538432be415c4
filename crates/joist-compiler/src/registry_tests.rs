use joist_core::{Binding, Declaration, DeclarationKind, Member, Type};

use crate::registry::{Forward, ModuleRef, Registry};

fn module(specifier: &str, path: &str) -> ModuleRef {
    ModuleRef {
        specifier: specifier.to_string(),
        path: path.to_string(),
    }
}

fn names(registry: &Registry) -> Vec<&str> {
    registry.referenced().iter().map(String::as_str).collect()
}

#[test]
fn root_marks_dependencies() {
    let mut registry = Registry::new("a.ts");
    let a = Declaration::interface("A", [], [Member::required("b", Type::reference("B"))]);
    assert!(registry.declare(a.public(), true));
    assert!(registry.declare(Declaration::type_alias("Unused", Type::string()), false));

    assert_eq!(names(&registry), ["A", "B"]);
    assert!(!registry.is_referenced("Unused"));
}

#[test]
fn late_declaration_cascades() {
    let mut registry = Registry::new("a.ts");
    let a = Declaration::type_alias("A", Type::array(Type::reference("B")));
    assert!(registry.declare(a, true));
    assert!(registry.declare(Declaration::type_alias("B", Type::reference("C")), false));
    assert!(registry.declare(Declaration::type_alias("C", Type::number()), false));

    assert_eq!(names(&registry), ["A", "B", "C"]);
}

#[test]
fn duplicate_keeps_first() {
    let mut registry = Registry::new("a.ts");
    assert!(registry.declare(Declaration::type_alias("A", Type::string()), false));
    assert!(!registry.declare(Declaration::type_alias("A", Type::number()), false));

    let kept = registry.declaration("A").unwrap();
    assert_eq!(kept, &Declaration::type_alias("A", Type::string()));
}

#[test]
fn link_forwards_reachable_imports() {
    let mut registry = Registry::new("a.ts");
    registry.add_import(module("./b", "b.ts"), vec!["B".into(), "Unused".into()]);
    let a = Declaration::interface("A", [], [Member::required("b", Type::reference("B"))]);
    assert!(registry.declare(a, true));

    assert!(registry.take_forwards().is_empty());
    registry.link();
    assert!(registry.is_linked());

    assert_eq!(
        registry.take_forwards(),
        [Forward {
            from: "a.ts".to_string(),
            file: "b.ts".to_string(),
            name: "B".to_string(),
            members: Vec::new(),
        }]
    );

    let imports = registry.reachable_imports();
    assert_eq!(imports.len(), 1);
    assert_eq!(imports[0].0.specifier, "./b");
    assert_eq!(imports[0].1, [&Binding::new("B")]);
}

#[test]
fn marks_after_link_forward_immediately() {
    let mut registry = Registry::new("a.ts");
    registry.add_import(module("./b", "b.ts"), vec![Binding::renamed("Remote", "Local")]);
    registry.link();
    assert!(registry.take_forwards().is_empty());

    registry.mark_reachable("Local");

    let forwards = registry.take_forwards();
    assert_eq!(forwards.len(), 1);
    assert_eq!(forwards[0].file, "b.ts");
    assert_eq!(forwards[0].name, "Remote");
}

#[test]
fn local_export_alias_marks_source() {
    let mut registry = Registry::new("a.ts");
    registry.add_export(None, vec![Binding::renamed("Inner", "Outer")]);
    assert!(registry.declare(Declaration::type_alias("Inner", Type::boolean()), false));

    registry.mark_reachable("Outer");
    assert!(!registry.is_referenced("Inner"));

    registry.link();
    assert_eq!(names(&registry), ["Outer", "Inner"]);
    assert_eq!(registry.binding_target("Outer"), Some(("a.ts", "Inner")));
    assert!(registry.take_forwards().is_empty());
}

#[test]
fn reexport_targets_module() {
    let mut registry = Registry::new("index.ts");
    registry.add_export(Some(module("./thing", "thing.ts")), vec!["Thing".into()]);

    assert_eq!(registry.binding_target("Thing"), Some(("thing.ts", "Thing")));
    assert!(registry.defines("Thing"));
    assert!(!registry.defines("Other"));
}

#[test]
fn accessed_members_are_recorded() {
    let mut registry = Registry::new("move.ts");
    registry.add_import(module("./dir", "dir.ts"), vec!["Direction".into()]);
    let up = Member::required("up", Type::access("Direction", "Up"));
    let down = Member::required("down", Type::access("Direction", "Down"));
    assert!(registry.declare(Declaration::interface("Move", [], [up, down]), true));

    let members: Vec<&str> = registry.accessed_members("Direction").collect();
    assert_eq!(members, ["Up", "Down"]);
    assert_eq!(registry.accessed_members("Move").count(), 0);
}

#[test]
fn forwards_carry_accessed_members() {
    let mut registry = Registry::new("move.ts");
    registry.add_import(module("./hub", "hub.ts"), vec!["Direction".into()]);
    let up = Member::required("up", Type::access("Direction", "Up"));
    assert!(registry.declare(Declaration::interface("Move", [], [up]), true));
    registry.link();

    let forwards = registry.take_forwards();
    assert_eq!(forwards.len(), 1);
    assert_eq!(forwards[0].file, "hub.ts");
    assert_eq!(forwards[0].members, ["Up"]);
}

#[test]
fn received_members_pass_through_reexports() {
    let mut hub = Registry::new("hub.ts");
    hub.add_export(Some(module("./dir", "dir.ts")), vec!["Direction".into()]);
    hub.link();

    hub.record_access("Direction", &["Up".to_string()]);
    hub.mark_reachable("Direction");

    let members: Vec<&str> = hub.accessed_members("Direction").collect();
    assert_eq!(members, ["Up"]);
    assert_eq!(hub.accessed_count(), 1);

    let forwards = hub.take_forwards();
    assert_eq!(forwards.len(), 1);
    assert_eq!(forwards[0].file, "dir.ts");
    assert_eq!(forwards[0].members, ["Up"]);
}

#[test]
fn reachable_declarations_by_kind() {
    let mut registry = Registry::new("a.ts");
    let holder = Declaration::interface(
        "Holder",
        [],
        [
            Member::required("kind", Type::reference("Kind")),
            Member::required("alias", Type::reference("Alias")),
        ],
    );
    assert!(registry.declare(holder, true));
    assert!(registry.declare(Declaration::enumeration("Kind", [("A", "0")]), false));
    assert!(registry.declare(Declaration::type_alias("Alias", Type::null()), false));
    assert!(registry.declare(Declaration::enumeration("Skipped", [("B", "1")]), false));

    let enums: Vec<&str> = registry
        .reachable_declarations(DeclarationKind::Enum)
        .map(|d| d.name.as_str())
        .collect();
    assert_eq!(enums, ["Kind"]);
    assert_eq!(
        registry
            .reachable_declarations(DeclarationKind::TypeAlias)
            .count(),
        1
    );
}
