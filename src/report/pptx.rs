//! Writes a [`Deck`] as an Office Open XML presentation (.pptx).
//!
//! The package is a zip container. Theme, master and layout never change and are
//! embedded from `pptx/`; everything that depends on the deck is rendered here.

use super::deck::{
    Deck, Element, PictureBox, Rect, ShapeBox, Slide, TextBox, TextStyle, SLIDE_HEIGHT,
    SLIDE_WIDTH,
};
use super::picture::PictureFormat;
use crate::Result;
use include_dir::{include_dir, Dir, DirEntry};
use std::io::{Cursor, Seek, Write};
use time::{macros::format_description, UtcOffset};
use zip::{write::FileOptions, CompressionMethod, ZipWriter};

static PACKAGE_DIR: Dir<'_> = include_dir!("$CARGO_MANIFEST_DIR/pptx");

pub const CONTENT_TYPE: &str =
    "application/vnd.openxmlformats-officedocument.presentationml.presentation";

const EMU_PER_INCH: f64 = 914_400.0;
const EMU_PER_POINT: f64 = 12_700.0;

const NAMESPACES: &str = r#"xmlns:a="http://schemas.openxmlformats.org/drawingml/2006/main" xmlns:r="http://schemas.openxmlformats.org/officeDocument/2006/relationships" xmlns:p="http://schemas.openxmlformats.org/presentationml/2006/main""#;
const XML_HEADER: &str = r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>"#;
const REL_TYPE: &str = "http://schemas.openxmlformats.org/officeDocument/2006/relationships";

// presentation.xml.rels ids taken by the master, theme, presProps and tableStyles
const FIRST_SLIDE_REL: usize = 5;
const FIRST_SLIDE_ID: usize = 256;

struct MediaPart<'a> {
    file_name: String,
    picture: &'a PictureBox,
}

pub fn write(deck: &Deck) -> Result<Vec<u8>> {
    let mut buffer = Vec::new();
    {
        let mut zip = ZipWriter::new(Cursor::new(&mut buffer));
        let xml = FileOptions::default().compression_method(CompressionMethod::Deflated);
        let media_options = FileOptions::default().compression_method(CompressionMethod::Stored);

        put(&mut zip, "[Content_Types].xml", content_types(deck).as_bytes(), xml)?;
        put_static(&mut zip, &PACKAGE_DIR, xml)?;
        put(&mut zip, "docProps/core.xml", core_properties(deck)?.as_bytes(), xml)?;
        put(&mut zip, "docProps/app.xml", app_properties(deck).as_bytes(), xml)?;
        put(&mut zip, "ppt/presentation.xml", presentation(deck).as_bytes(), xml)?;
        put(
            &mut zip,
            "ppt/_rels/presentation.xml.rels",
            presentation_rels(deck).as_bytes(),
            xml,
        )?;

        let mut image_count = 0;
        for (i, slide) in deck.slides.iter().enumerate() {
            let media: Vec<MediaPart> = slide
                .pictures()
                .map(|picture| {
                    image_count += 1;
                    MediaPart {
                        file_name: format!("image{image_count}.{}", picture.picture.format),
                        picture,
                    }
                })
                .collect();
            let n = i + 1;
            put(
                &mut zip,
                &format!("ppt/slides/slide{n}.xml"),
                slide_xml(slide).as_bytes(),
                xml,
            )?;
            put(
                &mut zip,
                &format!("ppt/slides/_rels/slide{n}.xml.rels"),
                slide_rels(&media).as_bytes(),
                xml,
            )?;
            for part in &media {
                put(
                    &mut zip,
                    &format!("ppt/media/{}", part.file_name),
                    &part.picture.picture.bytes,
                    media_options,
                )?;
            }
        }

        zip.finish()?;
    }
    Ok(buffer)
}

fn put<W: Write + Seek>(
    zip: &mut ZipWriter<W>,
    name: &str,
    bytes: &[u8],
    options: FileOptions,
) -> Result<()> {
    zip.start_file(name, options)?;
    zip.write_all(bytes)?;
    Ok(())
}

fn put_static<W: Write + Seek>(
    zip: &mut ZipWriter<W>,
    dir: &Dir<'_>,
    options: FileOptions,
) -> Result<()> {
    for entry in dir.entries() {
        match entry {
            DirEntry::Dir(dir) => put_static(zip, dir, options)?,
            DirEntry::File(file) => {
                let name = file.path().to_string_lossy().replace('\\', "/");
                put(zip, &name, file.contents(), options)?;
            }
        }
    }
    Ok(())
}

fn content_types(deck: &Deck) -> String {
    let pictures: String = PictureFormat::ALL
        .iter()
        .map(|it| format!(r#"<Default Extension="{it}" ContentType="{}"/>"#, it.mime_type()))
        .collect();
    let slides: String = (1..=deck.slides.len())
        .map(|n| {
            format!(
                r#"<Override PartName="/ppt/slides/slide{n}.xml" ContentType="application/vnd.openxmlformats-officedocument.presentationml.slide+xml"/>"#
            )
        })
        .collect();
    format!(
        r#"{XML_HEADER}
<Types xmlns="http://schemas.openxmlformats.org/package/2006/content-types"><Default Extension="rels" ContentType="application/vnd.openxmlformats-package.relationships+xml"/><Default Extension="xml" ContentType="application/xml"/>{pictures}<Override PartName="/ppt/presentation.xml" ContentType="application/vnd.openxmlformats-officedocument.presentationml.presentation.main+xml"/><Override PartName="/ppt/slideMasters/slideMaster1.xml" ContentType="application/vnd.openxmlformats-officedocument.presentationml.slideMaster+xml"/><Override PartName="/ppt/slideLayouts/slideLayout1.xml" ContentType="application/vnd.openxmlformats-officedocument.presentationml.slideLayout+xml"/><Override PartName="/ppt/theme/theme1.xml" ContentType="application/vnd.openxmlformats-officedocument.theme+xml"/><Override PartName="/ppt/presProps.xml" ContentType="application/vnd.openxmlformats-officedocument.presentationml.presProps+xml"/><Override PartName="/ppt/tableStyles.xml" ContentType="application/vnd.openxmlformats-officedocument.presentationml.tableStyles+xml"/><Override PartName="/docProps/core.xml" ContentType="application/vnd.openxmlformats-package.core-properties+xml"/><Override PartName="/docProps/app.xml" ContentType="application/vnd.openxmlformats-officedocument.extended-properties+xml"/>{slides}</Types>"#
    )
}

fn core_properties(deck: &Deck) -> Result<String> {
    let created_at = deck
        .created_at
        .to_offset(UtcOffset::UTC)
        .format(format_description!(
            "[year]-[month]-[day]T[hour]:[minute]:[second]Z"
        ))?;
    let title = escape(&deck.title);
    let author = escape(&deck.author);
    Ok(format!(
        r#"{XML_HEADER}
<cp:coreProperties xmlns:cp="http://schemas.openxmlformats.org/package/2006/metadata/core-properties" xmlns:dc="http://purl.org/dc/elements/1.1/" xmlns:dcterms="http://purl.org/dc/terms/" xmlns:dcmitype="http://purl.org/dc/dcmitype/" xmlns:xsi="http://www.w3.org/2001/XMLSchema-instance"><dc:title>{title}</dc:title><dc:creator>{author}</dc:creator><cp:lastModifiedBy>{author}</cp:lastModifiedBy><cp:revision>1</cp:revision><dcterms:created xsi:type="dcterms:W3CDTF">{created_at}</dcterms:created><dcterms:modified xsi:type="dcterms:W3CDTF">{created_at}</dcterms:modified></cp:coreProperties>"#
    ))
}

fn app_properties(deck: &Deck) -> String {
    format!(
        r#"{XML_HEADER}
<Properties xmlns="http://schemas.openxmlformats.org/officeDocument/2006/extended-properties" xmlns:vt="http://schemas.openxmlformats.org/officeDocument/2006/docPropsVTypes"><Application>{}</Application><PresentationFormat>On-screen Show (16:9)</PresentationFormat><Slides>{}</Slides></Properties>"#,
        env!("CARGO_PKG_NAME"),
        deck.slides.len(),
    )
}

fn presentation(deck: &Deck) -> String {
    let slide_ids: String = (0..deck.slides.len())
        .map(|i| {
            format!(
                r#"<p:sldId id="{}" r:id="rId{}"/>"#,
                FIRST_SLIDE_ID + i,
                FIRST_SLIDE_REL + i
            )
        })
        .collect();
    format!(
        r#"{XML_HEADER}
<p:presentation {NAMESPACES} saveSubsetFonts="1"><p:sldMasterIdLst><p:sldMasterId id="2147483648" r:id="rId1"/></p:sldMasterIdLst><p:sldIdLst>{slide_ids}</p:sldIdLst><p:sldSz cx="{}" cy="{}"/><p:notesSz cx="6858000" cy="9144000"/></p:presentation>"#,
        emu(SLIDE_WIDTH),
        emu(SLIDE_HEIGHT),
    )
}

fn presentation_rels(deck: &Deck) -> String {
    let slides: String = (0..deck.slides.len())
        .map(|i| {
            format!(
                r#"<Relationship Id="rId{}" Type="{REL_TYPE}/slide" Target="slides/slide{}.xml"/>"#,
                FIRST_SLIDE_REL + i,
                i + 1
            )
        })
        .collect();
    format!(
        r#"{XML_HEADER}
<Relationships xmlns="http://schemas.openxmlformats.org/package/2006/relationships"><Relationship Id="rId1" Type="{REL_TYPE}/slideMaster" Target="slideMasters/slideMaster1.xml"/><Relationship Id="rId2" Type="{REL_TYPE}/theme" Target="theme/theme1.xml"/><Relationship Id="rId3" Type="{REL_TYPE}/presProps" Target="presProps.xml"/><Relationship Id="rId4" Type="{REL_TYPE}/tableStyles" Target="tableStyles.xml"/>{slides}</Relationships>"#
    )
}

fn slide_rels(media: &[MediaPart]) -> String {
    let images: String = media
        .iter()
        .enumerate()
        .map(|(i, part)| {
            format!(
                r#"<Relationship Id="rId{}" Type="{REL_TYPE}/image" Target="../media/{}"/>"#,
                i + 2,
                part.file_name
            )
        })
        .collect();
    format!(
        r#"{XML_HEADER}
<Relationships xmlns="http://schemas.openxmlformats.org/package/2006/relationships"><Relationship Id="rId1" Type="{REL_TYPE}/slideLayout" Target="../slideLayouts/slideLayout1.xml"/>{images}</Relationships>"#
    )
}

fn slide_xml(slide: &Slide) -> String {
    let background = match slide.background {
        Some(color) => format!(
            r#"<p:bg><p:bgPr><a:solidFill><a:srgbClr val="{}"/></a:solidFill><a:effectLst/></p:bgPr></p:bg>"#,
            color.0
        ),
        None => String::new(),
    };
    let mut shapes = String::new();
    // id 1 belongs to the shape tree itself, image rels start after the layout's rId1
    let mut next_picture_rel = 2;
    for (i, element) in slide.elements.iter().enumerate() {
        let id = i + 2;
        match element {
            Element::Shape(shape) => shapes.push_str(&shape_xml(id, shape)),
            Element::Text(text) => shapes.push_str(&text_xml(id, text)),
            Element::Picture(picture) => {
                shapes.push_str(&picture_xml(id, next_picture_rel, picture));
                next_picture_rel += 1;
            }
        }
    }
    format!(
        r#"{XML_HEADER}
<p:sld {NAMESPACES}><p:cSld>{background}<p:spTree><p:nvGrpSpPr><p:cNvPr id="1" name=""/><p:cNvGrpSpPr/><p:nvPr/></p:nvGrpSpPr><p:grpSpPr><a:xfrm><a:off x="0" y="0"/><a:ext cx="0" cy="0"/><a:chOff x="0" y="0"/><a:chExt cx="0" cy="0"/></a:xfrm></p:grpSpPr>{shapes}</p:spTree></p:cSld><p:clrMapOvr><a:masterClrMapping/></p:clrMapOvr></p:sld>"#
    )
}

fn shape_xml(id: usize, shape: &ShapeBox) -> String {
    let outline = match shape.outline {
        Some(outline) => format!(
            r#"<a:ln w="{}"><a:solidFill><a:srgbClr val="{}"/></a:solidFill></a:ln>"#,
            (outline.width_pt * EMU_PER_POINT).round() as i64,
            outline.color.0
        ),
        None => "<a:ln><a:noFill/></a:ln>".into(),
    };
    format!(
        r#"<p:sp><p:nvSpPr><p:cNvPr id="{id}" name="Shape {id}"/><p:cNvSpPr/><p:nvPr/></p:nvSpPr><p:spPr>{}<a:prstGeom prst="rect"><a:avLst/></a:prstGeom><a:solidFill><a:srgbClr val="{}"/></a:solidFill>{outline}</p:spPr></p:sp>"#,
        xfrm(&shape.rect),
        shape.fill.0
    )
}

fn text_xml(id: usize, text: &TextBox) -> String {
    let paragraph_props = match text.line_spacing_pt {
        Some(spacing) => format!(
            r#"<a:pPr><a:lnSpc><a:spcPts val="{}"/></a:lnSpc></a:pPr>"#,
            (spacing * 100.0).round() as i64
        ),
        None => String::new(),
    };
    let paragraphs: String = paragraphs(text)
        .iter()
        .map(|(runs, end_style)| {
            let runs: String = runs
                .iter()
                .map(|(part, style)| {
                    format!(
                        "<a:r>{}<a:t>{}</a:t></a:r>",
                        run_props("a:rPr", style),
                        escape(part)
                    )
                })
                .collect();
            format!(
                "<a:p>{paragraph_props}{runs}{}</a:p>",
                run_props("a:endParaRPr", end_style)
            )
        })
        .collect();
    format!(
        r#"<p:sp><p:nvSpPr><p:cNvPr id="{id}" name="Text {id}"/><p:cNvSpPr txBox="1"/><p:nvPr/></p:nvSpPr><p:spPr>{}<a:prstGeom prst="rect"><a:avLst/></a:prstGeom><a:noFill/></p:spPr><p:txBody><a:bodyPr wrap="square" lIns="91440" tIns="45720" rIns="91440" bIns="45720" rtlCol="0" anchor="t"/><a:lstStyle/>{paragraphs}</p:txBody></p:sp>"#,
        xfrm(&text.rect)
    )
}

/// Splits runs on '\n'; each paragraph keeps the style to close it with.
fn paragraphs(text: &TextBox) -> Vec<(Vec<(&str, TextStyle)>, TextStyle)> {
    let Some(first) = text.runs.first() else {
        return vec![];
    };
    let mut res = vec![(vec![], first.style)];
    for run in &text.runs {
        for (i, part) in run.text.split('\n').enumerate() {
            if i > 0 {
                res.push((vec![], run.style));
            }
            if let Some((runs, end_style)) = res.last_mut() {
                if !part.is_empty() {
                    runs.push((part, run.style));
                }
                *end_style = run.style;
            }
        }
    }
    res
}

fn run_props(tag: &str, style: &TextStyle) -> String {
    format!(
        r#"<{tag} lang="en-US" sz="{}" b="{}" i="{}" dirty="0"><a:solidFill><a:srgbClr val="{}"/></a:solidFill></{tag}>"#,
        (style.size_pt * 100.0).round() as i64,
        style.bold as u8,
        style.italic as u8,
        style.color.0
    )
}

fn picture_xml(id: usize, rel: usize, picture: &PictureBox) -> String {
    format!(
        r#"<p:pic><p:nvPicPr><p:cNvPr id="{id}" name="Picture {id}"/><p:cNvPicPr><a:picLocks noChangeAspect="1"/></p:cNvPicPr><p:nvPr/></p:nvPicPr><p:blipFill><a:blip r:embed="rId{rel}"/><a:stretch><a:fillRect/></a:stretch></p:blipFill><p:spPr>{}<a:prstGeom prst="rect"><a:avLst/></a:prstGeom></p:spPr></p:pic>"#,
        xfrm(&picture.rect)
    )
}

fn xfrm(rect: &Rect) -> String {
    format!(
        r#"<a:xfrm><a:off x="{}" y="{}"/><a:ext cx="{}" cy="{}"/></a:xfrm>"#,
        emu(rect.x),
        emu(rect.y),
        emu(rect.w),
        emu(rect.h)
    )
}

fn emu(inches: f64) -> i64 {
    (inches * EMU_PER_INCH).round() as i64
}

fn escape(text: &str) -> String {
    let mut res = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => res.push_str("&amp;"),
            '<' => res.push_str("&lt;"),
            '>' => res.push_str("&gt;"),
            '"' => res.push_str("&quot;"),
            '\'' => res.push_str("&apos;"),
            // not allowed in XML 1.0
            '\u{FFFE}' | '\u{FFFF}' => {}
            c if c.is_control() && c != '\t' && c != '\n' && c != '\r' => {}
            c => res.push(c),
        }
    }
    res
}

#[cfg(test)]
mod test {
    use super::{emu, escape, write};
    use crate::report::deck::{
        Color, Deck, Element, PictureBox, Rect, Slide, TextBox, TextStyle,
    };
    use crate::report::picture::test::png;
    use crate::report::Picture;
    use crate::test::{package_part, package_parts, slide_parts};
    use time::macros::datetime;

    fn deck() -> Deck {
        let style = TextStyle::new(14.0, Color("374151"));
        let mut deck = Deck::new(
            "Campaign Report - A&B",
            "Campaign Report Generator",
            datetime!(2025-01-05 10:00:30.25 UTC),
        );
        let mut title = Slide {
            background: Some(Color("F0F4F8")),
            elements: vec![],
        };
        title.add_text(TextBox::new(
            Rect::new(1.0, 1.0, 8.0, 1.0),
            "Line 1\n\nLine <3>",
            style,
        ));
        deck.slides.push(title);
        let mut with_picture = Slide::default();
        with_picture.add(Element::Picture(PictureBox {
            rect: Rect::new(0.2, 0.4, 7.0, 4.8),
            picture: Picture::decode(png(70, 48)).unwrap(),
        }));
        deck.slides.push(with_picture);
        deck.slides.push(Slide::default());
        deck
    }

    #[test]
    fn one_part_per_slide() {
        let bytes = write(&deck()).unwrap();
        assert_eq!(3, slide_parts(&bytes).len());
        let presentation = package_part(&bytes, "ppt/presentation.xml").unwrap();
        assert_eq!(3, presentation.matches("<p:sldId ").count());
        assert!(presentation.contains(r#"<p:sldSz cx="9144000" cy="5143500"/>"#));
        let rels = package_part(&bytes, "ppt/_rels/presentation.xml.rels").unwrap();
        let slide3 = r#"Id="rId7" Type="http://schemas.openxmlformats.org/officeDocument/2006/relationships/slide" Target="slides/slide3.xml""#;
        assert!(rels.contains(slide3));
    }

    #[test]
    fn static_parts_are_packaged() {
        let names = package_parts(&write(&deck()).unwrap());
        for name in [
            "[Content_Types].xml",
            "_rels/.rels",
            "docProps/core.xml",
            "docProps/app.xml",
            "ppt/theme/theme1.xml",
            "ppt/slideMasters/slideMaster1.xml",
            "ppt/slideMasters/_rels/slideMaster1.xml.rels",
            "ppt/slideLayouts/slideLayout1.xml",
            "ppt/presProps.xml",
            "ppt/tableStyles.xml",
        ] {
            assert!(names.iter().any(|it| it == name), "missing {name}");
        }
    }

    #[test]
    fn pictures_are_embedded() {
        let bytes = write(&deck()).unwrap();
        let slide = &slide_parts(&bytes)[1];
        assert!(slide.contains(r#"<a:blip r:embed="rId2"/>"#));
        let rels = package_part(&bytes, "ppt/slides/_rels/slide2.xml.rels").unwrap();
        assert!(rels.contains(r#"Target="../media/image1.png""#));
        assert!(package_parts(&bytes).iter().any(|it| it == "ppt/media/image1.png"));
        let content_types = package_part(&bytes, "[Content_Types].xml").unwrap();
        assert!(content_types.contains(r#"<Default Extension="jpeg" ContentType="image/jpeg"/>"#));
    }

    #[test]
    fn text_is_escaped_and_split_into_paragraphs() {
        let bytes = write(&deck()).unwrap();
        let slide = &slide_parts(&bytes)[0];
        assert!(slide.contains("<a:t>Line &lt;3&gt;</a:t>"));
        assert_eq!(3, slide.matches("<a:p>").count());
        assert!(slide.contains(r#"<a:srgbClr val="F0F4F8"/>"#));
        let core = package_part(&bytes, "docProps/core.xml").unwrap();
        assert!(core.contains("<dc:title>Campaign Report - A&amp;B</dc:title>"));
        assert!(core.contains(">2025-01-05T10:00:30Z<"));
    }

    #[test]
    fn escape_drops_control_chars() {
        assert_eq!("a&quot;b&apos;c", escape("a\"b'c\u{1}"));
        assert_eq!("EidDrive", escape("Eid\u{FFFE}Drive\u{FFFF}"));
        assert_eq!("a\tb\u{FFFD}", escape("a\tb\u{FFFD}"));
    }

    #[test]
    fn emu_rounds() {
        assert_eq!(914400, emu(1.0));
        assert_eq!(457200, emu(0.5));
    }
}
