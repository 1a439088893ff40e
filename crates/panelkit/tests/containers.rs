//! Integration tests for container membership, layout and rendering.

use panelkit::headless::{HeadlessBackend, HeadlessContainer, NativeLayout};
use panelkit::{
    ContainerProtocol, ErrorKind, Margins, Orientation, SupportsOrientation, SupportsText,
    WidgetError, WidgetId, WidgetProtocol,
};

fn container_of(backend: &HeadlessBackend, n: usize) -> (HeadlessContainer, Vec<Box<dyn WidgetProtocol>>) {
    let mut container = backend.container();
    let children: Vec<Box<dyn WidgetProtocol>> = (0..n)
        .map(|_| Box::new(backend.label()) as Box<dyn WidgetProtocol>)
        .collect();
    for child in &children {
        container.add_widget(child.widget_id()).unwrap();
    }
    (container, children)
}

fn ids(children: &[Box<dyn WidgetProtocol>]) -> Vec<WidgetId> {
    children.iter().map(|c| c.widget_id()).collect()
}

#[test]
fn test_remove_index_scenario() {
    let backend = HeadlessBackend::new();
    let (mut container, children) = container_of(&backend, 3);
    let all = ids(&children);
    let [a, b, c] = all[..] else {
        panic!("expected three children");
    };

    assert_eq!(container.remove_index(1).unwrap(), b);
    assert_eq!(container.children(), vec![a, c]);
    assert_eq!(container.get_index(1), Some(c));
    assert_eq!(container.get_index(5), None);
    assert_eq!(container.get_index(-1), None);
    assert_eq!(container.index_of(b), None);
    assert_eq!(children[1].parent(), None);
}

#[test]
fn test_insert_shifts_and_counts() {
    let backend = HeadlessBackend::new();
    let (mut container, children) = container_of(&backend, 2);
    let extra = backend.check_box();

    container.insert_widget(1, extra.widget_id()).unwrap();
    assert_eq!(container.count(), 3);
    assert_eq!(container.get_index(1), Some(extra.widget_id()));
    assert_eq!(container.index_of(children[1].widget_id()), Some(2));
    assert_eq!(extra.parent(), Some(container.widget_id()));
}

#[test]
fn test_insert_position_is_clamped() {
    let backend = HeadlessBackend::new();
    let (mut container, _children) = container_of(&backend, 2);
    let first = backend.label();
    let last = backend.label();

    container.insert_widget(-10, first.widget_id()).unwrap();
    container.insert_widget(100, last.widget_id()).unwrap();
    assert_eq!(container.index_of(first.widget_id()), Some(0));
    assert_eq!(container.index_of(last.widget_id()), Some(3));
}

#[test]
fn test_remove_errors_leave_children() {
    let backend = HeadlessBackend::new();
    let (mut container, children) = container_of(&backend, 3);
    let outsider = backend.label();

    let err = container.remove_index(3).unwrap_err();
    assert!(matches!(err, WidgetError::IndexOutOfRange { index: 3, count: 3 }));
    assert_eq!(err.kind(), ErrorKind::Index);
    assert!(container.remove_index(-1).is_err());

    let err = container.remove_widget(outsider.widget_id()).unwrap_err();
    assert!(matches!(err, WidgetError::ChildNotFound(_)));
    assert_eq!(err.kind(), ErrorKind::NotFound);

    assert_eq!(container.children(), ids(&children));
}

#[test]
fn test_remove_widget_clears_parent() {
    let backend = HeadlessBackend::new();
    let (mut container, children) = container_of(&backend, 2);
    container.remove_widget(children[0].widget_id()).unwrap();
    assert_eq!(container.count(), 1);
    assert_eq!(children[0].parent(), None);
}

#[test]
fn test_adding_moves_between_containers() {
    let backend = HeadlessBackend::new();
    let (mut first, children) = container_of(&backend, 2);
    let mut second = backend.container();

    second.add_widget(children[0].widget_id()).unwrap();
    assert_eq!(first.children(), vec![children[1].widget_id()]);
    assert_eq!(second.children(), vec![children[0].widget_id()]);

    first.add_widget(children[1].widget_id()).unwrap();
    assert_eq!(first.count(), 1);
}

#[test]
fn test_container_cannot_contain_itself() {
    let backend = HeadlessBackend::new();
    let mut outer = backend.container();
    let mut inner = backend.container();
    outer.add_widget(inner.widget_id()).unwrap();

    let err = inner.add_widget(outer.widget_id()).unwrap_err();
    assert!(matches!(err, WidgetError::CircularParentage));
    let err = outer.add_widget(outer.widget_id()).unwrap_err();
    assert!(matches!(err, WidgetError::CircularParentage));
    assert_eq!(inner.count(), 0);
}

#[test]
fn test_set_parent_does_not_add_child() {
    let backend = HeadlessBackend::new();
    let container = backend.container();
    let mut label = backend.label();

    label.set_parent(Some(container.widget_id())).unwrap();
    assert_eq!(container.count(), 0);
    assert_eq!(label.parent(), Some(container.widget_id()));
}

#[test]
fn test_margins_independent_of_children() {
    let backend = HeadlessBackend::new();
    let (mut container, _children) = container_of(&backend, 2);
    container.set_margins(Margins::new(1, 2, 3, 4));
    assert_eq!(container.margins(), Margins::new(1, 2, 3, 4));
    assert_eq!(container.count(), 2);

    container.remove_index(0).unwrap();
    assert_eq!(container.margins(), Margins::new(1, 2, 3, 4));
}

#[test]
fn test_native_layout_mirrors_children() {
    let backend = HeadlessBackend::new();
    let (mut container, children) = container_of(&backend, 3);
    container.remove_index(0).unwrap();

    let layout = container
        .native_layout()
        .downcast_ref::<NativeLayout>()
        .unwrap();
    assert_eq!(layout.members(), ids(&children[1..]));
}

#[test]
fn test_dropping_container_orphans_children() {
    let backend = HeadlessBackend::new();
    let (container, children) = container_of(&backend, 2);
    drop(container);
    assert!(children.iter().all(|c| c.parent().is_none()));
}

#[test]
fn test_render_size_follows_layout() {
    let backend = HeadlessBackend::new();
    let mut container = backend.container();
    container.set_orientation(Orientation::Horizontal);
    container.set_margins(Margins::uniform(3));

    let mut first = backend.push_button();
    first.set_text("OK");
    let mut second = backend.push_button();
    second.set_text("No");
    container.add_widget(first.widget_id()).unwrap();
    container.add_widget(second.widget_id()).unwrap();

    // Both buttons are at their 64px minimum; default spacing is 4.
    let bitmap = container.render().unwrap();
    assert_eq!((bitmap.width(), bitmap.height()), (3 + 64 + 4 + 64 + 3, 3 + 28 + 3));

    second.hide_widget();
    let bitmap = container.render().unwrap();
    assert_eq!((bitmap.width(), bitmap.height()), (3 + 64 + 3, 3 + 28 + 3));
    assert_eq!(bitmap.as_raw().len(), (70 * 34 * 4) as usize);
}

#[test]
fn test_render_writes_png() {
    let backend = HeadlessBackend::new();
    let mut label = backend.label();
    label.set_text("snapshot");

    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("label.png");
    label.render().unwrap().save_png(&path).unwrap();

    let decoded = image::open(&path).unwrap().into_rgba8();
    assert_eq!(decoded.dimensions(), (8 * 7 + 8, 22));
}

#[test]
fn test_dump_tree_lists_members() {
    let backend = HeadlessBackend::new();
    let (_container, _children) = container_of(&backend, 2);
    let dump = backend.dump_tree();
    assert!(dump.contains("Widget Tree (3 total widgets)"));
    assert_eq!(dump.matches("(Label)").count(), 2);
}
