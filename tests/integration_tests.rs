//! Integration tests for reading complete tree descriptions

use bitree_viz::properties::PropertyValue;
use bitree_viz::{ParseError, ParseErrorKind, Session, SessionError};
use pretty_assertions::assert_eq;

fn parse_error(source: &str) -> ParseError {
    match Session::parse(source) {
        Err(SessionError::Parse(err)) => err,
        other => panic!("expected a parse error, got {:?}", other.map(|_| ())),
    }
}

#[test]
fn test_single_node_tree() {
    let session = Session::parse("bitree = A").expect("Should parse");
    let layout = session.layout();
    assert_eq!(layout.nodes.len(), 1);
    assert_eq!((layout.nodes[0].x, layout.nodes[0].y), (0.0, 0.0));
    assert_eq!(layout.tree_offset_x, 0.0);
}

#[test]
fn test_three_node_tree() {
    let session = Session::parse("bitree = R(L,G)").expect("Should parse");
    let layout = session.layout();
    let h = layout.horizontal_spacing;
    let x = |label: &str| layout.find(label).expect("node exists").x;

    assert_eq!(layout.find("R").map(|n| n.depth), Some(0));
    assert_eq!(layout.find("L").map(|n| n.depth), Some(1));
    assert!((x("L") - (x("R") - h)).abs() < 1e-9);
    assert!((x("G") - (x("R") + h)).abs() < 1e-9);
}

#[test]
fn test_three_children_rejected() {
    let err = parse_error("bitree = R(L,G,X)");
    assert_eq!(err.kind(), ParseErrorKind::Syntax);
}

#[test]
fn test_out_of_range_radius_rejected() {
    let err = parse_error("bitree = 1(5,6)\n5[NodeRadius=300]\n");
    assert_eq!(err.kind(), ParseErrorKind::InvalidPropertyValue);
}

#[test]
fn test_node_properties_only_touch_their_node() {
    let source = "bitree = 1(5,6)\n5[NodeLabel=\"hi\", FillColor=0x00ff00ff]\n";
    let mut session = Session::parse(source).expect("Should parse");

    let info = session.properties().get(5).expect("node 5 has properties");
    let elements: Vec<(usize, PropertyValue)> =
        info.elements().map(|(i, v)| (i, v.clone())).collect();
    assert_eq!(
        elements,
        vec![
            (0, PropertyValue::Text("hi".to_string())),
            (5, PropertyValue::UnsignedInt(0x00ff_00ff)),
        ]
    );
    assert_eq!(session.properties().len(), 1);

    let style = session.resolve_label("6").clone();
    assert_eq!(style.base.node_label, "");
    assert_eq!(style.base.fill_color, 0);
}

#[test]
fn test_global_font_size_reaches_every_node() {
    let source = "bitree = 1(2,3)\n[FontSize=14]\n2[FillColor=0xff]\n";
    let mut session = Session::parse(source).expect("Should parse");
    let nodes = session.layout().nodes.clone();
    for node in &nodes {
        assert_eq!(session.resolve(node).extend.font_size, 14, "{}", node.label);
    }
    assert_eq!(session.overrides().extend.font_size, 14);
}

#[test]
fn test_duplicate_assignment_last_write_wins() {
    let source = "bitree = 1(2,3)\n2[NodeRadius=4, NodeRadius=6]\n2[NodeRadius=8]\n";
    let mut session = Session::parse(source).expect("Should parse");
    assert_eq!(session.resolve_label("2").base.node_radius, 8);
    assert_eq!(session.properties().get(2).map(|info| info.len()), Some(1));
}

#[test]
fn test_hex_labels_match_decimal_node_ids() {
    let source = "bitree = 0x10(1,2)\n16[NodeLabel=sixteen]\n";
    let mut session = Session::parse(source).expect("Should parse");
    assert_eq!(session.resolve_label("0x10").base.node_label, "sixteen");
}

#[test]
fn test_comments_and_blank_lines() {
    let source = r#"
# a small tree
// with styling

BITREE = R(A(C,D),B);

[FontSize=12]   # global
/ A(C,D) is not numeric, so no node properties apply to it
1[BorderWidth=2],
"#;
    let session = Session::parse(source).expect("Should parse");
    assert_eq!(session.tree().len(), 5);
    assert_eq!(session.overrides().extend.font_size, 12);
    assert!(session.properties().get(1).is_some());
}

#[test]
fn test_missing_start_marker() {
    let err = parse_error("tree = A(B,C)\n");
    assert_eq!(err.kind(), ParseErrorKind::StartTokenMissing);
    assert_eq!(err.span(), &(0..13));
}

#[test]
fn test_error_report_points_at_source() {
    let source = "bitree = 1(2,3)\n2[Colour=1]\n";
    let err = parse_error(source);
    assert_eq!(err.kind(), ParseErrorKind::UnknownProperty);
    assert_eq!(&source[err.span().clone()], "Colour");

    let report = err.format(source, "tree.bt");
    assert!(report.contains("Colour"));
    assert!(report.contains("tree.bt"));
}

#[test]
fn test_failed_line_leaves_no_partial_state() {
    let err = parse_error("bitree = 1(2,3)\n2[NodeRadius=5, BorderWidth=40]\n");
    assert_eq!(err.kind(), ParseErrorKind::InvalidPropertyValue);

    let session = Session::parse("bitree = 1(2,3)\n2[NodeRadius=5]\n").expect("Should parse");
    assert_eq!(session.properties().len(), 1);
}

#[test]
fn test_scope_mismatch_keeps_other_assignments() {
    let source = "bitree = 1(2,3)\n3[FontWeight=1, EdgeWidth=4]\n";
    let mut session = Session::parse(source).expect("Should parse");
    assert_eq!(session.diagnostics().len(), 1);
    assert_eq!(session.diagnostics()[0].kind, ParseErrorKind::ScopeMismatch);
    let style = session.resolve_label("3");
    assert_eq!(style.base.edge_width, 4);
    assert_eq!(style.extend.font_weight, 0);
}

#[test]
fn test_property_set_overflow() {
    // only 20 properties exist, so overflow needs the store directly
    use bitree_viz::properties::{NodeInfoArray, MAX_PROPERTIES_PER_NODE};
    let mut table = NodeInfoArray::new();
    let too_many = (0..=MAX_PROPERTIES_PER_NODE)
        .map(|i| (i, PropertyValue::UnsignedInt(1)))
        .collect();
    assert!(table.merge(1, too_many).is_err());
    assert!(table.is_empty());
}
