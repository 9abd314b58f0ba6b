//! Names, qualified names and import paths

use crate::{FqName, ImportPath, Name};
use pretty_assertions::assert_eq;

#[test]
fn test_fq_name_navigation() {
    let name = FqName::new("a.b.c");

    assert_eq!(name.parent(), Some(FqName::new("a.b")));
    assert_eq!(name.short_name(), Some(&Name::identifier("c")));
    assert_eq!(FqName::new("a.b").child(&Name::identifier("c")), name);
    assert_eq!(name.path_segments().len(), 3);
    assert_eq!(name.to_string(), "a.b.c");
}

#[test]
fn test_root_name() {
    let root = FqName::root();

    assert!(root.is_root());
    assert_eq!(FqName::new(""), root);
    assert_eq!(root.parent(), None);
    assert_eq!(root.short_name(), None);
    assert_eq!(root.short_name_or_special(), Name::special("<root>"));
    assert_eq!(root.to_string(), "<root>");
    assert_eq!(FqName::new("a").parent(), Some(root));
}

#[test]
fn test_prefix_relations() {
    let package = FqName::new("a.b");

    assert!(FqName::new("a.b.c").starts_with(&package));
    assert!(FqName::new("a.b.c").is_direct_child_of(&package));
    assert!(!FqName::new("a.b.c.d").is_direct_child_of(&package));
    assert!(!FqName::new("a.bc").starts_with(&package));
    assert!(package.starts_with(&FqName::root()));
}

#[test]
fn test_special_names() {
    assert!(Name::special("<main>").is_special());
    assert!(!Name::identifier("main").is_special());
}

#[test]
fn test_import_paths() {
    let all = ImportPath::from("lang.*");
    assert!(all.is_all_under());
    assert_eq!(all.fq_name(), &FqName::new("lang"));
    assert_eq!(all.imported_name(), None);
    assert_eq!(all.to_string(), "lang.*");

    let single = ImportPath::from("collections.List");
    assert!(!single.is_all_under());
    assert_eq!(single.imported_name(), Some(&Name::identifier("List")));
    assert_eq!(single.to_string(), "collections.List");
}

#[test]
fn test_root_star_import() {
    let everything = ImportPath::from("*");

    assert!(everything.is_all_under());
    assert!(everything.fq_name().is_root());
    assert_eq!(everything.to_string(), "*");
}
