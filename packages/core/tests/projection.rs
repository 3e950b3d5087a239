//! End-to-end properties of the path -> node -> content projection.

use jsonfs_core::{attr, dir, path, read, render, resolve, Document, EntryKind, FsError};

fn sample() -> Document {
    Document::from_json(
        r#"{
            "title": "inventory",
            "count": 3,
            "ratio": 0.75,
            "flagged": false,
            "archived": null,
            "items": [
                {"sku": "a-1", "qty": 4},
                {"sku": "b-2", "qty": 0}
            ]
        }"#,
    )
    .unwrap()
}

#[test]
fn resolving_twice_yields_same_node_and_content() {
    let doc = sample();
    for p in ["/", "/title", "/items", "/items/1/sku", "/count"] {
        let first = resolve(doc.root(), &path!(p)).unwrap();
        let second = resolve(doc.root(), &path!(p)).unwrap();
        assert!(std::ptr::eq(first, second), "distinct nodes for {}", p);
        if !first.is_container() {
            assert_eq!(render::render(first).unwrap(), render::render(second).unwrap());
        }
    }
}

#[test]
fn every_scalar_size_matches_its_content() {
    let doc = sample();
    for p in [
        "/title",
        "/count",
        "/ratio",
        "/flagged",
        "/archived",
        "/items/0/sku",
        "/items/1/qty",
    ] {
        let node = resolve(doc.root(), &path!(p)).unwrap();
        let attrs = attr::attributes(node);
        let content = read::read_at(node, 0, u32::MAX).unwrap();
        assert_eq!(attrs.kind, EntryKind::File, "{}", p);
        assert_eq!(attrs.size, content.len() as u64, "{}", p);
    }
}

#[test]
fn directory_projection_of_containers() {
    let doc = sample();

    let root_attrs = attr::attributes(doc.root());
    assert_eq!(root_attrs.kind, EntryKind::Directory);
    assert_eq!(root_attrs.perm, 0o555);

    let items = resolve(doc.root(), &path!("items")).unwrap();
    let names: Vec<String> = dir::entries(items)
        .unwrap()
        .map(|c| c.into_owned())
        .collect();
    assert_eq!(names, vec!["0", "1"]);

    // One past the end and a non-numeric segment both fail resolution
    assert!(matches!(
        resolve(doc.root(), &path!("items/2")),
        Err(FsError::NotFound { .. })
    ));
    assert!(matches!(
        resolve(doc.root(), &path!("items/first")),
        Err(FsError::NotFound { .. })
    ));
}

#[test]
fn object_enumeration_lists_each_key_once() {
    let doc = Document::from_json(r#"{"a": 1, "b": 2}"#).unwrap();
    let names: Vec<String> = dir::entries(doc.root())
        .unwrap()
        .map(|c| c.into_owned())
        .collect();
    assert_eq!(names, vec!["a", "b"]);

    assert!(matches!(
        resolve(doc.root(), &path!("c")),
        Err(FsError::NotFound { .. })
    ));
}

#[test]
fn scalar_file_contents_render_exactly() {
    let doc = sample();
    let cases = [
        ("/title", "inventory"),
        ("/count", "3"),
        ("/ratio", "0.75"),
        ("/flagged", "false"),
        ("/archived", "null"),
        ("/items/0/qty", "4"),
    ];
    for (p, expected) in cases {
        let node = resolve(doc.root(), &path!(p)).unwrap();
        assert_eq!(render::render(node).unwrap(), expected, "{}", p);
    }
}

#[test]
fn read_boundaries_on_a_rendered_file() {
    let doc = sample();
    let node = resolve(doc.root(), &path!("title")).unwrap();
    let len = attr::attributes(node).size;

    assert_eq!(read::read_at(node, len, 4096).unwrap(), b"");
    assert_eq!(read::read_at(node, len + 10, 4096).unwrap(), b"");
    assert_eq!(
        read::read_at(node, 0, (len + 100) as u32).unwrap().len() as u64,
        len
    );
}

#[test]
fn kind_mismatches_are_typed_failures() {
    let doc = sample();

    let directory = resolve(doc.root(), &path!("items")).unwrap();
    assert!(matches!(
        read::read_at(directory, 0, 16),
        Err(FsError::NotAFile { .. })
    ));

    let file = resolve(doc.root(), &path!("count")).unwrap();
    assert!(matches!(
        dir::entries(file),
        Err(FsError::NotADirectory { .. })
    ));
}

#[test]
fn mixed_depth_walks_terminate_correctly() {
    let doc = sample();

    // Descending through a scalar leaf fails no matter how much path remains
    assert!(matches!(
        resolve(doc.root(), &path!("count/0/deeper/still")),
        Err(FsError::NotFound { .. })
    ));

    // The root resolves with no components regardless of tree shape
    let scalar_doc = Document::from_json("\"just a string\"").unwrap();
    let root = resolve(scalar_doc.root(), &path!("/")).unwrap();
    assert_eq!(attr::attributes(root).kind, EntryKind::File);
    assert_eq!(read::read_at(root, 0, 64).unwrap(), b"just a string");
}
