// Tests for skin descriptor interpreter
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

use super::*;
use crate::{
    archive::MemArchive,
    skin::{
        ObjectIndex, RegionIndex, Script, ScriptDecodeError, SkinError,
        SkinWarning,
    },
};

/// Accepts any script except those beginning with `BAD`,
///   retaining the bytes as-is.
struct FakeDecoder;

impl ScriptDecoder for FakeDecoder {
    fn decode(&self, bytes: &[u8]) -> Result<Script, ScriptDecodeError> {
        if bytes.starts_with(b"BAD") {
            Err(ScriptDecodeError::Invalid("rejected".into()))
        } else {
            Ok(Script::new(1, bytes.to_vec()))
        }
    }
}

fn archive(entries: &[(&str, &str)]) -> MemArchive {
    entries.iter().copied().collect()
}

fn parse_opts(archive: &MemArchive, opts: ParseOptions) -> Result<Skin, SkinError> {
    SkinParser::new(archive)
        .with_image_loader(crate::skin::NoImageLoader)
        .with_script_decoder(FakeDecoder)
        .with_options(opts)
        .parse()
}

fn parse(archive: &MemArchive) -> Result<Skin, SkinError> {
    parse_opts(archive, ParseOptions::default())
}

fn flat() -> ParseOptions {
    ParseOptions {
        scoping: ContextScoping::Flat,
        ..Default::default()
    }
}

fn skin_span(offset: usize, len: usize) -> Span {
    Context::from("skin.xml").span(offset, len)
}

fn group_by_id(skin: &Skin, id: &str) -> ObjectIndex<Group> {
    skin.regions()
        .find_map(|region| match region {
            RegionIndex::Group(oi) if skin.get(oi).id() == Some(id) => Some(oi),
            _ => None,
        })
        .unwrap_or_else(|| panic!("no group `{id}`"))
}

/// A flattened description of containers,
///   layouts,
///   layers,
///   and scripts in order.
fn summary(skin: &Skin) -> Vec<String> {
    let mut out = Vec::new();

    for &c in skin.containers() {
        out.push(format!("container {:?}", skin.get(c).id()));

        for l in skin.layouts(c) {
            out.push(format!("  layout {:?}", skin.get(l).id()));

            for layer in skin.layers(l) {
                let layer = skin.get(layer);
                out.push(format!(
                    "    layer {:?} {:?}",
                    layer.id(),
                    layer.gui().x()
                ));
            }

            for s in skin.system_objects(l) {
                out.push(format!("    script {}", skin.get(s).id()));
            }
        }
    }

    out
}

#[test]
fn reparse_is_identical() {
    let archive = archive(&[(
        "skin.xml",
        r#"<WasabiXML>
             <container id="main" name="Main">
               <layout id="normal">
                 <layer id="a" x="1"/>
                 <layer id="b" x="2"/>
                 <script id="s" file="s.maki"/>
               </layout>
               <layout id="shade"><layer id="c"/></layout>
             </container>
           </WasabiXML>"#,
    ), ("s.maki", "FG\x01\x00")]);

    let first = parse(&archive).unwrap();
    let second = parse(&archive).unwrap();

    assert_eq!(
        vec![
            "container Some(\"main\")",
            "  layout Some(\"normal\")",
            "    layer Some(\"a\") Some(1.0)",
            "    layer Some(\"b\") Some(2.0)",
            "    script s",
            "  layout Some(\"shade\")",
            "    layer Some(\"c\") None",
        ],
        summary(&first),
    );

    assert_eq!(summary(&first), summary(&second));
    assert_eq!(first.object_count(), second.object_count());
}

#[test]
fn owners_are_nearest_enclosing() {
    let archive = archive(&[(
        "skin.xml",
        r#"<container id="a">
             <layout id="a1"><layer id="a1x"/></layout>
           </container>
           <container id="b">
             <layout id="b1"><layer id="b1x"/></layout>
             <layout id="b2"><layer id="b2x"/><layer id="b2y"/></layout>
           </container>"#,
    )]);

    let skin = parse(&archive).unwrap();
    let containers = skin.containers();
    assert_eq!(2, containers.len());

    for &c in containers {
        for l in skin.layouts(c) {
            assert_eq!(Some(c), skin.container_of(l));

            for layer in skin.layers(l) {
                assert_eq!(Some(l), skin.layout_of(layer));

                // Layer ids are prefixed by their layout's id.
                let lid = skin.get(l).id().unwrap();
                assert!(skin.get(layer).id().unwrap().starts_with(lid));
            }
        }
    }

    assert_eq!(2, skin.layouts(containers[1]).len());
}

#[test]
fn script_in_group_matches_file_case_insensitively() {
    let archive = archive(&[
        (
            "skin.xml",
            r#"<group id="g"><script file="a.maki" id="x"/></group>"#,
        ),
        ("A.MAKI", "FG\x02\x00payload"),
    ]);

    let skin = parse(&archive).unwrap();
    let g = group_by_id(&skin, "g");

    let scripts = skin.system_objects(g);
    assert_eq!(1, scripts.len());

    let sysobj = skin.get(scripts[0]);
    assert_eq!("x", sysobj.id());
    assert_eq!("a.maki", sysobj.file());
    assert_eq!(b"FG\x02\x00payload", sysobj.script().data());
    assert_eq!(Some(RegionIndex::Group(g)), skin.owner_of(scripts[0]));
}

#[test]
fn script_param_retained() {
    let archive = archive(&[
        (
            "skin.xml",
            r#"<group id="g"><script file="a.maki" id="x" param="1;2"/></group>"#,
        ),
        ("a.maki", "FG"),
    ]);

    let skin = parse(&archive).unwrap();
    let sysobj = skin.system_objects(group_by_id(&skin, "g"))[0];

    assert_eq!(Some("1;2"), skin.get(sysobj).param());
}

#[test]
fn nested_include_resolves_relative_to_including_document() {
    let archive = archive(&[
        ("skin.xml", r#"<include file="sub/dir/other.xml"/>"#),
        ("sub/dir/other.xml", r#"<include file="more.xml"/>"#),
        ("sub/dir/more.xml", r#"<container id="deep"/>"#),
        ("more.xml", r#"<container id="shallow"/>"#),
    ]);

    let skin = parse(&archive).unwrap();

    assert_eq!(1, skin.containers().len());
    assert_eq!(Some("deep"), skin.get(skin.containers()[0]).id());
}

#[test]
fn backslash_include_pushes_directory_prefix() {
    let archive = archive(&[
        ("skin.xml", r#"<include file="xml\player.xml"/>"#),
        ("xml/player.xml", r#"<include file="eq.xml"/>"#),
        ("xml/eq.xml", r#"<container id="nested"/>"#),
        ("eq.xml", r#"<container id="root"/>"#),
    ]);

    let skin = parse(&archive).unwrap();
    let ids = skin
        .containers()
        .iter()
        .map(|&c| skin.get(c).id().unwrap())
        .collect::<Vec<_>>();

    assert_eq!(vec!["nested"], ids);
}

#[test]
fn split_path_accepts_either_separator() {
    assert_eq!((vec!["a", "b"], "c.xml"), split_path("a\\b/c.xml"));
    assert_eq!((vec![], "c.xml"), split_path("c.xml"));
}

#[test]
fn include_prefix_popped_after_include() {
    let archive = archive(&[
        (
            "skin.xml",
            r#"<include file="xml/a.xml"/><include file="b.xml"/>"#,
        ),
        ("xml/a.xml", r#"<container id="a"/>"#),
        ("xml/b.xml", r#"<container id="wrong"/>"#),
        ("b.xml", r#"<container id="b"/>"#),
    ]);

    let skin = parse(&archive).unwrap();
    let ids = skin
        .containers()
        .iter()
        .map(|&c| skin.get(c).id().unwrap())
        .collect::<Vec<_>>();

    assert_eq!(vec!["a", "b"], ids);
}

#[test]
fn include_shares_context_and_paths_ignore_case() {
    let archive = archive(&[
        (
            "skin.xml",
            r#"<container id="c"><include file="XML/Layouts.xml"/></container>"#,
        ),
        (
            "xml/layouts.XML",
            r#"<?xml version="1.0"?>
               <!-- several top-level elements -->
               <layout id="normal"/>
               <layout id="shade"/>"#,
        ),
    ]);

    let skin = parse(&archive).unwrap();
    let c = skin.containers()[0];

    assert_eq!(2, skin.layouts(c).len());
}

#[test]
fn root_document_directory_seeds_prefix() {
    let archive = archive(&[
        ("Skin/skin.xml", r#"<include file="player.xml"/>"#),
        ("Skin/player.xml", r#"<container id="player"/>"#),
    ]);

    let opts = ParseOptions {
        root_document: "Skin/skin.xml".into(),
        ..Default::default()
    };

    let skin = parse_opts(&archive, opts).unwrap();
    assert_eq!(1, skin.containers().len());
}

#[test]
fn missing_root_document() {
    let archive = archive(&[("other.xml", "")]);

    assert_eq!(
        Err(SkinError::NotFound("skin.xml".into(), Span::unknown())),
        parse(&archive).map(|_| ()),
    );
}

#[test]
fn include_not_found_reports_resolved_path() {
    let archive = archive(&[
        ("skin.xml", r#"<include file="a/b.xml"/>"#),
        ("a/b.xml", r#"<include file="c.xml"/>"#),
    ]);

    match parse(&archive) {
        Err(SkinError::IncludeNotFound(path, span)) => {
            assert_eq!("a/c.xml", path);
            assert_eq!("a/b.xml", span.context().path());
        }
        other => panic!("unexpected result: {other:?}"),
    }
}

#[test]
fn include_requires_file() {
    let archive = archive(&[("skin.xml", r#"<include/>"#)]);

    assert_eq!(
        Err(SkinError::MalformedDocument(
            "include".into(),
            Malformation::MissingAttribute("file"),
            skin_span(0, 10),
        )),
        parse(&archive).map(|_| ()),
    );
}

#[test]
fn include_content_is_ignored() {
    let archive = archive(&[
        (
            "skin.xml",
            r#"<include file="a.xml"><container id="inline"/></include>"#,
        ),
        ("a.xml", r#"<container id="included"/>"#),
    ]);

    let skin = parse(&archive).unwrap();

    assert_eq!(1, skin.containers().len());
    assert_eq!(Some("included"), skin.get(skin.containers()[0]).id());
}

#[test]
fn include_cycle_detected() {
    let archive = archive(&[
        ("skin.xml", r#"<include file="a.xml"/>"#),
        ("a.xml", r#"<include file="b.xml"/>"#),
        ("b.xml", r#"<include file="A.XML"/>"#),
    ]);

    match parse(&archive) {
        Err(SkinError::IncludeCycle(path, span)) => {
            assert_eq!("a.xml", path);
            assert_eq!("b.xml", span.context().path());
        }
        other => panic!("unexpected result: {other:?}"),
    }
}

#[test]
fn repeated_sibling_include_is_not_a_cycle() {
    let archive = archive(&[
        (
            "skin.xml",
            r#"<include file="c.xml"/><include file="c.xml"/>"#,
        ),
        ("c.xml", r#"<container/>"#),
    ]);

    assert_eq!(2, parse(&archive).unwrap().containers().len());
}

#[test]
fn include_depth_limited() {
    let archive = archive(&[
        ("skin.xml", r#"<include file="a.xml"/>"#),
        ("a.xml", r#"<include file="b.xml"/>"#),
        ("b.xml", r#"<container/>"#),
    ]);

    let opts = ParseOptions {
        max_include_depth: 1,
        ..Default::default()
    };

    assert!(matches!(
        parse_opts(&archive, opts),
        Err(SkinError::IncludeTooDeep(1, _)),
    ));

    // One more level permits it.
    let opts = ParseOptions {
        max_include_depth: 2,
        ..Default::default()
    };

    assert!(parse_opts(&archive, opts).is_ok());
}

#[test]
fn unknown_element_aborts() {
    let archive = archive(&[(
        "skin.xml",
        r#"<container id="c"/><frobnicate/>"#,
    )]);

    assert_eq!(
        Err(SkinError::UnknownNodeKind("frobnicate".into(), skin_span(19, 13))),
        parse(&archive).map(|_| ()),
    );
}

#[test]
fn unknown_element_in_include_aborts() {
    let archive = archive(&[
        ("skin.xml", r#"<include file="x.xml"/>"#),
        ("x.xml", r#"<Frobnicate/>"#),
    ]);

    assert_eq!(
        Err(SkinError::UnknownNodeKind(
            "Frobnicate".into(),
            Context::from("x.xml").span(0, 13),
        )),
        parse(&archive).map(|_| ()),
    );
}

#[test]
fn element_names_ignore_case() {
    let archive = archive(&[(
        "skin.xml",
        r#"<WinampAbstractionLayer><Container ID="c"><Layout id="l"/></Container></WinampAbstractionLayer>"#,
    )]);

    let skin = parse(&archive).unwrap();
    let c = skin.containers()[0];

    assert_eq!(Some("c"), skin.get(c).id());
    assert_eq!(1, skin.layouts(c).len());
}

#[test]
fn group_background_resolves_to_bitmap() {
    let archive = archive(&[(
        "skin.xml",
        r#"<elements><bitmap id="bg" file="bg.png"/></elements>
           <group id="g" background="bg" drawbackground="true"/>"#,
    )]);

    let skin = parse(&archive).unwrap();
    let g = group_by_id(&skin, "g");

    assert!(skin.get(g).draw_background());

    let bg = skin.background(g).expect("background did not resolve");
    assert_eq!(Some("bg"), skin.get(bg).id());
    assert_eq!(Some("bg.png"), skin.get(bg).file());

    assert!(skin.warnings().is_empty());
}

#[test]
fn unresolved_background_warns() {
    let archive = archive(&[(
        "skin.xml",
        r#"<group id="g" background="nope"/>"#,
    )]);

    let skin = parse(&archive).unwrap();

    assert_eq!(
        &[SkinWarning::UnresolvedBackground(
            "nope".into(),
            skin_span(0, 33)
        )],
        skin.warnings(),
    );
}

#[test]
fn duplicate_bitmap_last_wins_with_warning() {
    let archive = archive(&[(
        "skin.xml",
        r#"<bitmap id="bg" file="a.png"/><bitmap id="BG" file="b.png"/>"#,
    )]);

    let skin = parse(&archive).unwrap();
    let bg = skin.bitmap("bg").unwrap();

    assert_eq!(Some("b.png"), skin.get(bg).file());
    assert_eq!(
        &[SkinWarning::DuplicateBitmap(
            "BG".into(),
            skin_span(30, 30),
            skin_span(0, 30),
        )],
        skin.warnings(),
    );
}

#[test]
fn unloadable_image_degrades_bitmap() {
    let archive = archive(&[(
        "skin.xml",
        r#"<bitmap id="bg" file="missing.png"/>"#,
    )]);

    let skin = SkinParser::new(&archive).parse().unwrap();
    let bg = skin.bitmap("bg").unwrap();

    assert_eq!(None, skin.get(bg).image());
    assert!(matches!(
        skin.warnings(),
        [SkinWarning::ImageUnavailable(id, ImageError::Archive(_), _)] if id == "bg",
    ));
}

#[test]
fn image_loaded_after_registration() {
    let png = b"\x89PNG\r\n\x1a\n\0\0\0\x0dIHDR\0\0\0\x10\0\0\0\x08";

    let mut archive = archive(&[(
        "skin.xml",
        r#"<bitmap id="bg" file="Images/BG.png"/>"#,
    )]);
    archive.insert("images/bg.png", png.to_vec());

    let skin = SkinParser::new(&archive).parse().unwrap();
    let image = skin.get(skin.bitmap("bg").unwrap()).image().unwrap();

    assert_eq!(Some((16, 8)), image.dimensions());
    assert!(skin.warnings().is_empty());
}

#[test]
fn orphan_layer_dropped_with_warning() {
    let archive = archive(&[(
        "skin.xml",
        r#"<elements><layer id="lost"><frobnicate/></layer></elements>
           <container><layout id="l"/></container>"#,
    )]);

    // The layer's content is not dispatched,
    //   so the unknown element is never seen.
    let skin = parse(&archive).unwrap();
    let l = skin.layouts(skin.containers()[0])[0];

    assert!(skin.layers(l).is_empty());
    assert_eq!(
        &[SkinWarning::OrphanLayer(skin_span(10, 17))],
        skin.warnings(),
    );
}

#[test]
fn orphan_layer_fails_when_strict() {
    let archive = archive(&[("skin.xml", r#"<elements><layer/></elements>"#)]);

    let opts = ParseOptions {
        orphan_layers: OrphanLayerPolicy::Fail,
        ..Default::default()
    };

    assert_eq!(
        Err(SkinError::MissingContext(
            "layer".into(),
            ContextSlot::Layout,
            skin_span(10, 8),
        )),
        parse_opts(&archive, opts).map(|_| ()),
    );
}

#[test]
fn layer_content_dispatched() {
    let archive = archive(&[(
        "skin.xml",
        r#"<container><layout><layer id="x"><frobnicate/></layer></layout></container>"#,
    )]);

    assert!(matches!(
        parse(&archive),
        Err(SkinError::UnknownNodeKind(name, _)) if name == "frobnicate",
    ));
}

#[test]
fn layout_requires_container() {
    let archive = archive(&[("skin.xml", r#"<layout id="l"/>"#)]);

    assert_eq!(
        Err(SkinError::MissingContext(
            "layout".into(),
            ContextSlot::Container,
            skin_span(0, 16),
        )),
        parse(&archive).map(|_| ()),
    );
}

#[test]
fn script_requires_region() {
    let archive = archive(&[
        ("skin.xml", r#"<scripts><script id="s" file="s.maki"/></scripts>"#),
        ("s.maki", "FG"),
    ]);

    assert!(matches!(
        parse(&archive),
        Err(SkinError::MissingContext(_, ContextSlot::ParentRegion, _)),
    ));
}

#[test]
fn script_requires_file_and_id() {
    let no_id = archive(&[("skin.xml", r#"<group><script file="s.maki"/></group>"#)]);
    let no_file = archive(&[("skin.xml", r#"<group><script id="s"/></group>"#)]);

    assert!(matches!(
        parse(&no_id),
        Err(SkinError::MalformedDocument(_, Malformation::MissingAttribute("id"), _)),
    ));

    assert!(matches!(
        parse(&no_file),
        Err(SkinError::MalformedDocument(_, Malformation::MissingAttribute("file"), _)),
    ));
}

#[test]
fn script_file_not_found() {
    let archive = archive(&[(
        "skin.xml",
        r#"<group><script id="s" file="scripts/s.maki"/></group>"#,
    )]);

    assert!(matches!(
        parse(&archive),
        Err(SkinError::NotFound(path, _)) if path == "scripts/s.maki",
    ));
}

#[test]
fn script_paths_resolve_from_archive_root() {
    let archive = archive(&[
        ("skin.xml", r#"<include file="xml/player.xml"/>"#),
        (
            "xml/player.xml",
            r#"<group id="g"><script id="s" file="scripts/s.maki"/></group>"#,
        ),
        ("scripts/s.maki", "FG"),
    ]);

    let skin = parse(&archive).unwrap();
    assert_eq!(1, skin.system_objects(group_by_id(&skin, "g")).len());
}

#[test]
fn script_decode_failure_dropped_by_default() {
    let archive = archive(&[
        (
            "skin.xml",
            r#"<group id="g"><script id="bad" file="bad.maki"/><script id="ok" file="ok.maki"/></group>"#,
        ),
        ("bad.maki", "BAD"),
        ("ok.maki", "FG"),
    ]);

    let skin = parse(&archive).unwrap();
    let scripts = skin.system_objects(group_by_id(&skin, "g"));

    assert_eq!(1, scripts.len());
    assert_eq!("ok", skin.get(scripts[0]).id());

    assert!(matches!(
        skin.warnings(),
        [SkinWarning::ScriptDropped(path, ScriptDecodeError::Invalid(_), _)]
            if path == "bad.maki",
    ));
}

#[test]
fn script_decode_failure_aborts_when_strict() {
    let archive = archive(&[
        (
            "skin.xml",
            r#"<group id="g"><script id="bad" file="bad.maki"/></group>"#,
        ),
        ("bad.maki", "BAD"),
    ]);

    let opts = ParseOptions {
        script_failures: ScriptFailurePolicy::Abort,
        ..Default::default()
    };

    assert!(matches!(
        parse_opts(&archive, opts),
        Err(SkinError::ScriptDecode(path, _, _)) if path == "bad.maki",
    ));
}

#[test]
fn default_decoder_checks_magic() {
    let archive = archive(&[
        (
            "skin.xml",
            r#"<group><script id="s" file="s.maki"/></group>"#,
        ),
        ("s.maki", "XX\x01\x00"),
    ]);

    let skin = SkinParser::new(&archive).parse().unwrap();

    assert!(matches!(
        skin.warnings(),
        [SkinWarning::ScriptDropped(_, ScriptDecodeError::BadMagic(_), _)],
    ));
}

#[test]
fn script_in_layout_owned_by_layout() {
    let archive = archive(&[
        (
            "skin.xml",
            r#"<container><layout id="l"><script id="s" file="s.maki"/></layout></container>"#,
        ),
        ("s.maki", "FG"),
    ]);

    let skin = parse(&archive).unwrap();
    let l = skin.layouts(skin.containers()[0])[0];
    let scripts = skin.system_objects(l);

    assert_eq!(1, scripts.len());
    assert_eq!(Some(RegionIndex::Layout(l)), skin.owner_of(scripts[0]));
}

#[test]
fn nested_group_attaches_to_parent_region() {
    let archive = archive(&[(
        "skin.xml",
        r#"<group id="outer"><group id="inner"/></group><group id="other"/>"#,
    )]);

    let skin = parse(&archive).unwrap();
    let outer = group_by_id(&skin, "outer");
    let inner = group_by_id(&skin, "inner");
    let other = group_by_id(&skin, "other");

    assert_eq!(vec![inner], skin.child_groups(outer));
    assert_eq!(&[outer, other], skin.groups());
}

#[test]
fn group_def_registered_and_hosts_scripts() {
    let archive = archive(&[
        (
            "skin.xml",
            r#"<elements/>
               <groupdef id="Player.Main">
                 <script id="s" file="s.maki"/>
                 <layer id="orphan"/>
               </groupdef>"#,
        ),
        ("s.maki", "FG"),
    ]);

    let skin = parse(&archive).unwrap();
    let def = skin.group_def("player.main").unwrap();

    assert_eq!(1, skin.system_objects(def).len());
    assert_eq!(None, skin.parent_of(def));
    assert!(skin.groups().is_empty());
    assert!(matches!(skin.warnings(), [SkinWarning::OrphanLayer(_)]));
}

#[test]
fn lexical_scope_restores_container() {
    let archive = archive(&[(
        "skin.xml",
        r#"<container id="a"></container><layout id="l"/>"#,
    )]);

    assert!(matches!(
        parse(&archive),
        Err(SkinError::MissingContext(_, ContextSlot::Container, _)),
    ));
}

#[test]
fn flat_scope_persists_container() {
    let archive = archive(&[(
        "skin.xml",
        r#"<container id="a"></container><layout id="l"/>"#,
    )]);

    let skin = parse_opts(&archive, flat()).unwrap();
    let a = skin.containers()[0];

    assert_eq!(1, skin.layouts(a).len());
}

#[test]
fn lexical_scope_restores_parent_region() {
    let archive = archive(&[
        (
            "skin.xml",
            r#"<group id="outer">
                 <group id="inner"/>
                 <script id="s" file="s.maki"/>
               </group>"#,
        ),
        ("s.maki", "FG"),
    ]);

    let lexical = parse(&archive).unwrap();
    let flat = parse_opts(&archive, flat()).unwrap();

    // Lexically,
    //   the script follows `inner` and so belongs to `outer`.
    assert_eq!(1, lexical.system_objects(group_by_id(&lexical, "outer")).len());
    assert!(lexical.system_objects(group_by_id(&lexical, "inner")).is_empty());

    // Flat,
    //   `inner` remains the active region after it closes.
    assert!(flat.system_objects(group_by_id(&flat, "outer")).is_empty());
    assert_eq!(1, flat.system_objects(group_by_id(&flat, "inner")).len());
}

#[test]
fn leaf_with_children_is_malformed() {
    let archive = archive(&[("skin.xml", r#"<text id="t"> <b/></text>"#)]);

    assert_eq!(
        Err(SkinError::MalformedDocument(
            "text".into(),
            Malformation::UnexpectedChild(skin_span(14, 4)),
            skin_span(0, 13),
        )),
        parse(&archive).map(|_| ()),
    );
}

#[test]
fn leaf_with_text_is_malformed() {
    let archive = archive(&[("skin.xml", r#"<bitmap id="x">hello</bitmap>"#)]);

    assert!(matches!(
        parse(&archive),
        Err(SkinError::MalformedDocument(name, Malformation::UnexpectedChild(_), _))
            if name == "bitmap",
    ));
}

#[test]
fn leaf_with_whitespace_and_comments_is_fine() {
    let archive = archive(&[(
        "skin.xml",
        "<text id=\"t\">\n  <!-- nothing -->\n</text><sendparams></sendparams>",
    )]);

    assert!(parse(&archive).is_ok());
}

#[test]
fn stubs_accepted() {
    let archive = archive(&[(
        "skin.xml",
        r#"<elements>
             <color id="c" value="0,0,0"/>
             <truetypefont id="f" file="f.ttf"/>
             <gammaset id="g"><gammagroup id="x"/></gammaset>
           </elements>
           <container>
             <layout>
               <button/><togglebutton/><slider/><text/><status/><eqvis/>
               <wasabi:titlebar/><wasabi:button/>
               <wasabi:standardframe:status/><wasabi:standardframe:nostatus/>
               <layoutstatus/><hideobject/>
               <component><colorthemes:list/></component>
             </layout>
           </container>"#,
    )]);

    let skin = parse(&archive).unwrap();

    // Only the container and layout are objects.
    assert_eq!(2, skin.object_count());
}

#[test]
fn skin_info_parsed() {
    let archive = archive(&[(
        "skin.xml",
        r#"<WinampAbstractionLayer version="0.8">
             <skininfo>
               <version>1.0</version>
               <name>  Test Skin </name>
               <Author>Someone</Author>
               <unknown>ignored</unknown>
             </skininfo>
           </WinampAbstractionLayer>"#,
    )]);

    let skin = parse(&archive).unwrap();
    let info = skin.info().unwrap();

    assert_eq!(Some("1.0"), info.version());
    assert_eq!(Some("Test Skin"), info.name());
    assert_eq!(Some("Someone"), info.author());
    assert_eq!(None, info.email());
}

#[test]
fn attribute_names_ignore_case() {
    let archive = archive(&[(
        "skin.xml",
        r#"<container><layout><Layer ID="x" Image="bg" TILE="1" bogus="?"/></layout></container>"#,
    )]);

    let skin = parse(&archive).unwrap();
    let l = skin.layouts(skin.containers()[0])[0];
    let layer = skin.get(skin.layers(l)[0]);

    assert_eq!(Some("x"), layer.id());
    assert_eq!(Some("bg"), layer.image());
    assert!(layer.tile());
}

#[test]
fn xml_error_aborts() {
    let archive = archive(&[("skin.xml", r#"<container></layout>"#)]);

    assert!(matches!(parse(&archive), Err(SkinError::Xml(_))));
}
