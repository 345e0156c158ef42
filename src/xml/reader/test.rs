// Tests for skin document reader
//
//  This file is part of Wasabi.
//
//  This program is free software: you can redistribute it and/or modify
//  it under the terms of the GNU General Public License as published by
//  the Free Software Foundation, either version 3 of the License, or
//  (at your option) any later version.
//
//  This program is distributed in the hope that it will be useful,
//  but WITHOUT ANY WARRANTY; without even the implied warranty of
//  MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE.  See the
//  GNU General Public License for more details.
//
//  You should have received a copy of the GNU General Public License
//  along with this program.  If not, see <http://www.gnu.org/licenses/>.

//! These tests use [`quick_xml`] directly rather than mocking it,
//!   because we want to be sure that our assumptions of how `quick_xml`
//!   performs its parsing are accurate.
//! Consequently,
//!   these act more like integration tests than unit tests.

use super::*;

fn ctx() -> Context {
    Context::from("test.xml")
}

fn parse(text: &str) -> Element {
    parse_fragment(text, ctx()).expect("parsing failed")
}

#[test]
fn empty_document_is_empty_fragment() {
    let root = parse("");

    assert!(root.is_fragment());
    assert_eq!(0, root.children().len());
}

#[test]
fn multiple_top_level_elements() {
    let root = parse(r#"<bitmap id="a"/><color id="b"/>"#);

    let names = root.child_elements().map(Element::name).collect::<Vec<_>>();

    assert_eq!(vec!["bitmap", "color"], names);
}

#[test]
fn self_closing_element_span_covers_tag() {
    let text = r#"  <bitmap id="bg" file="x.png" />"#;
    let root = parse(text);

    let ele = root.child_elements().next().unwrap();

    assert_eq!(&ctx().span(2, text.len() - 2), ele.span());
}

#[test]
fn attribute_span_covers_name() {
    let root = parse(r#"<script file="a.maki" id="x"/>"#);
    let ele = root.child_elements().next().unwrap();

    // <script file="a.maki" id="x"/>
    //         |--|          ||
    //         8             22
    assert_eq!(&ctx().span(8, 4), ele.find_attr("file").unwrap().span());
    assert_eq!(&ctx().span(22, 2), ele.find_attr("id").unwrap().span());
}

#[test]
fn nested_children_and_text() {
    let root = parse("<group id=\"g\">\n  <layer id=\"l\"/>\n</group>");
    let group = root.child_elements().next().unwrap();

    assert_eq!(Some("g"), group.attr("id"));
    assert_eq!(3, group.children().len());

    let layers = group.child_elements().collect::<Vec<_>>();
    assert_eq!(1, layers.len());
    assert_eq!("layer", layers[0].name());

    // Only whitespace besides the element.
    assert!(matches!(group.first_content(), Some(Node::Element(_))));
}

#[test]
fn skips_declarations_comments_and_instructions() {
    let root = parse(
        r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<!-- top -->
<?xml-stylesheet href="x"?>
<elements><!-- inner --></elements>
<?xml version="1.0"?>
<elements/>"#,
    );

    assert_eq!(2, root.child_elements().count());

    let first = root.child_elements().next().unwrap();
    assert_eq!(0, first.children().len());
}

#[test]
fn comments_leave_no_empty_text_nodes() {
    let root = parse("<text>a<!-- one --><!-- two -->b</text>");
    let ele = root.child_elements().next().unwrap();

    assert_eq!(2, ele.children().len());
    assert_eq!("ab", ele.text());
}

#[test]
fn unescapes_attribute_values_and_text() {
    let root = parse(r#"<name a="1 &lt; 2">Tom &amp; Jerry</name>"#);
    let ele = root.child_elements().next().unwrap();

    assert_eq!(Some("1 < 2"), ele.attr("a"));
    assert_eq!("Tom & Jerry", ele.text());
}

#[test]
fn unknown_entity_kept_verbatim() {
    let root = parse(r#"<text default="a&nbsp;b"/>"#);
    let ele = root.child_elements().next().unwrap();

    assert_eq!(Some("a&nbsp;b"), ele.attr("default"));
}

#[test]
fn duplicate_attributes_are_tolerated() {
    let root = parse(r#"<layer x="1" x="2"/>"#);
    let ele = root.child_elements().next().unwrap();

    assert_eq!(2, ele.attrs().len());
    assert_eq!(Some("2"), ele.attr("x"));
}

#[test]
fn namespaced_names_are_kept_whole() {
    let root = parse(r#"<Wasabi:TitleBar id="t"/>"#);

    assert_eq!(
        "Wasabi:TitleBar",
        root.child_elements().next().unwrap().name()
    );
}

#[test]
fn cdata_is_text() {
    let root = parse("<comment><![CDATA[a <b> c]]></comment>");
    let ele = root.child_elements().next().unwrap();

    assert_eq!("a <b> c", ele.text());
}

#[test]
fn unclosed_element_is_error() {
    let result = parse_fragment("<container>\n<layout>", ctx());

    // Depending on the version of quick-xml,
    //   the parser itself may notice the EOF before we do.
    match result {
        Err(XmlError::UnclosedElement(name, span)) => {
            assert_eq!("layout", name);
            assert_eq!(ctx().span(12, 8), span);
        }
        Err(XmlError::Syntax(..)) => (),
        other => panic!("expected unclosed element error, got {other:?}"),
    }
}

#[test]
fn mismatched_close_is_error() {
    let result = parse_fragment("<group></layout>", ctx());

    assert!(matches!(result, Err(XmlError::Syntax(..))));
}

#[test]
fn stray_close_is_error() {
    let result = parse_fragment("<a/></b>", ctx());

    assert!(matches!(
        result,
        Err(XmlError::Syntax(..) | XmlError::UnexpectedClose(..))
    ));
}
