//! Slide part XML generation
//!
//! Emits `ppt/slides/slide1.xml` from a slide's shapes in ascending z
//! order. Every shape kind maps to its own drawing element; shapes the
//! renderer cannot place (degenerate geometry, images whose bytes never
//! arrived) are dropped individually so the rest of the slide still
//! exports.

use std::collections::HashMap;

use deck_model::{normalize_hex, resolve_color, ImageShape, LineShape, RectShape, Shape, Slide, TextAlign, TextShape};
use quick_xml::escape::escape;

use crate::transform::{corner_adj, pt_emu, rot_units, SlideSpace};

/// Renderer defaults, matching the on-canvas appearance.
const DEFAULT_TEXT_COLOR: &str = "000000";
const DEFAULT_FONT: &str = "Calibri";
const DEFAULT_RECT_FILL: &str = "FFFFFF";
const DEFAULT_STROKE: &str = "111111";
const DEFAULT_RECT_STROKE_PT: f64 = 1.0;
const DEFAULT_LINE_STROKE_PT: f64 = 2.0;

/// Shapes smaller than this on both axes are invisible artifacts of
/// half-finished drags; lines are exempt since a straight line has zero
/// extent on one axis.
const MIN_VISIBLE_PX: f64 = 2.0;

/// Render the slide part. `image_rels` maps image shape ids to the
/// relationship ids of their embedded media; image shapes absent from the
/// map are skipped.
pub fn render_slide_xml(
    slide: &Slide,
    space: &SlideSpace,
    image_rels: &HashMap<String, String>,
) -> String {
    let mut ordered = slide.shapes.clone();
    ordered.sort_by_key(|s| s.z());

    let mut xml = String::new();
    xml.push_str(r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>"#);
    xml.push('\n');
    xml.push_str(
        "<p:sld xmlns:a=\"http://schemas.openxmlformats.org/drawingml/2006/main\" \
         xmlns:r=\"http://schemas.openxmlformats.org/officeDocument/2006/relationships\" \
         xmlns:p=\"http://schemas.openxmlformats.org/presentationml/2006/main\">",
    );
    xml.push_str("<p:cSld>");
    if let Some(bg) = background_fill(slide) {
        xml.push_str(&bg);
    }
    xml.push_str("<p:spTree>");
    xml.push_str("<p:nvGrpSpPr><p:cNvPr id=\"1\" name=\"\"/><p:cNvGrpSpPr/><p:nvPr/></p:nvGrpSpPr>");
    xml.push_str("<p:grpSpPr/>");

    // id 1 is the group shape above
    let mut next_id: u64 = 2;
    for shape in &ordered {
        let degenerate = !matches!(shape, Shape::Line(_))
            && shape.base().w < MIN_VISIBLE_PX
            && shape.base().h < MIN_VISIBLE_PX;
        if degenerate {
            tracing::debug!(id = shape.id(), kind = shape.kind(), "skipping degenerate shape");
            continue;
        }
        let rendered = match shape {
            Shape::Text(text) => Some(text_sp(text, space, next_id)),
            Shape::Rect(rect) => Some(rect_sp(rect, space, next_id)),
            Shape::Line(line) => Some(line_cxn_sp(line, space, next_id)),
            Shape::Image(image) => match image_rels.get(&image.base.id) {
                Some(rel_id) => Some(image_pic(image, space, next_id, rel_id)),
                None => {
                    tracing::debug!(id = %image.base.id, "skipping image with no media");
                    None
                }
            },
        };
        if let Some(fragment) = rendered {
            xml.push_str(&fragment);
            next_id += 1;
        }
    }

    xml.push_str("</p:spTree></p:cSld>");
    xml.push_str("<p:clrMapOvr><a:masterClrMapping/></p:clrMapOvr>");
    xml.push_str("</p:sld>");
    xml
}

fn background_fill(slide: &Slide) -> Option<String> {
    let color = slide.background.as_ref()?.color.as_deref()?;
    let hex = resolve_color(color)?;
    Some(format!(
        "<p:bg><p:bgPr><a:solidFill><a:srgbClr val=\"{}\"/></a:solidFill><a:effectLst/></p:bgPr></p:bg>",
        normalize_hex(Some(&hex), "FFFFFF")
    ))
}

/// Resolve tokens then normalize, falling back when unset or unresolvable.
fn color_val(value: Option<&str>, fallback: &str) -> String {
    let resolved = value.and_then(resolve_color);
    normalize_hex(resolved.as_deref(), fallback)
}

fn xfrm(space: &SlideSpace, x: f64, y: f64, w: f64, h: f64, rotation: Option<f64>) -> String {
    let rot = match rotation {
        Some(r) if r != 0.0 => format!(" rot=\"{}\"", rot_units(r)),
        _ => String::new(),
    };
    format!(
        "<a:xfrm{}><a:off x=\"{}\" y=\"{}\"/><a:ext cx=\"{}\" cy=\"{}\"/></a:xfrm>",
        rot,
        space.x_emu(x),
        space.y_emu(y),
        space.x_emu(w),
        space.y_emu(h)
    )
}

fn text_sp(text: &TextShape, space: &SlideSpace, id: u64) -> String {
    let color = color_val(text.color.as_deref(), DEFAULT_TEXT_COLOR);
    let font = text.font_family.as_deref().unwrap_or(DEFAULT_FONT);
    let sz = (text.font_size * 100.0).round() as i64;

    let mut run_props = format!("sz=\"{}\"", sz);
    if text.bold == Some(true) {
        run_props.push_str(" b=\"1\"");
    }
    if text.italic == Some(true) {
        run_props.push_str(" i=\"1\"");
    }

    let align_attr = match text.align {
        Some(TextAlign::Center) => " algn=\"ctr\"",
        Some(TextAlign::Right) => " algn=\"r\"",
        Some(TextAlign::Left) => " algn=\"l\"",
        None => "",
    };

    // Each newline starts a new paragraph
    let mut body = String::new();
    for paragraph in text.text.split('\n') {
        body.push_str(&format!("<a:p><a:pPr{}/>", align_attr));
        body.push_str(&format!(
            "<a:r><a:rPr lang=\"en-US\" {}><a:solidFill><a:srgbClr val=\"{}\"/></a:solidFill>\
             <a:latin typeface=\"{}\"/></a:rPr><a:t>{}</a:t></a:r></a:p>",
            run_props,
            color,
            escape(font),
            escape(paragraph)
        ));
    }

    format!(
        "<p:sp><p:nvSpPr><p:cNvPr id=\"{}\" name=\"{}\"/><p:cNvSpPr/><p:nvPr/></p:nvSpPr>\
         <p:spPr>{}<a:prstGeom prst=\"rect\"><a:avLst/></a:prstGeom><a:noFill/></p:spPr>\
         <p:txBody><a:bodyPr anchor=\"ctr\" wrap=\"square\"><a:normAutofit/></a:bodyPr>\
         <a:lstStyle/>{}</p:txBody></p:sp>",
        id,
        escape(&text.base.id),
        xfrm(space, text.base.x, text.base.y, text.base.w, text.base.h, text.base.rotation),
        body
    )
}

fn rect_sp(rect: &RectShape, space: &SlideSpace, id: u64) -> String {
    let fill = color_val(rect.fill.as_deref(), DEFAULT_RECT_FILL);
    let stroke = color_val(rect.stroke.as_deref(), DEFAULT_STROKE);
    let stroke_w = pt_emu(rect.stroke_width.unwrap_or(DEFAULT_RECT_STROKE_PT));

    let geom = match rect.corner_radius {
        Some(radius) if radius > 1.0 => format!(
            "<a:prstGeom prst=\"roundRect\"><a:avLst>\
             <a:gd name=\"adj\" fmla=\"val {}\"/></a:avLst></a:prstGeom>",
            corner_adj(radius, rect.base.w, rect.base.h)
        ),
        _ => "<a:prstGeom prst=\"rect\"><a:avLst/></a:prstGeom>".to_string(),
    };

    format!(
        "<p:sp><p:nvSpPr><p:cNvPr id=\"{}\" name=\"{}\"/><p:cNvSpPr/><p:nvPr/></p:nvSpPr>\
         <p:spPr>{}{}<a:solidFill><a:srgbClr val=\"{}\"/></a:solidFill>\
         <a:ln w=\"{}\"><a:solidFill><a:srgbClr val=\"{}\"/></a:solidFill></a:ln>\
         </p:spPr></p:sp>",
        id,
        escape(&rect.base.id),
        xfrm(space, rect.base.x, rect.base.y, rect.base.w, rect.base.h, rect.base.rotation),
        geom,
        fill,
        stroke_w,
        stroke
    )
}

fn line_cxn_sp(line: &LineShape, space: &SlideSpace, id: u64) -> String {
    let stroke = color_val(line.stroke.as_deref(), DEFAULT_STROKE);
    let stroke_w = pt_emu(line.stroke_width.unwrap_or(DEFAULT_LINE_STROKE_PT));

    // Bounding box of the two endpoints, with flips for reversed axes
    let (x, dx, flip_h) = if line.x2 >= line.base.x {
        (line.base.x, line.x2 - line.base.x, false)
    } else {
        (line.x2, line.base.x - line.x2, true)
    };
    let (y, dy, flip_v) = if line.y2 >= line.base.y {
        (line.base.y, line.y2 - line.base.y, false)
    } else {
        (line.y2, line.base.y - line.y2, true)
    };

    let mut flips = String::new();
    if flip_h {
        flips.push_str(" flipH=\"1\"");
    }
    if flip_v {
        flips.push_str(" flipV=\"1\"");
    }
    let rot = match line.base.rotation {
        Some(r) if r != 0.0 => format!(" rot=\"{}\"", rot_units(r)),
        _ => String::new(),
    };

    format!(
        "<p:cxnSp><p:nvCxnSpPr><p:cNvPr id=\"{}\" name=\"{}\"/><p:cNvCxnSpPr/><p:nvPr/></p:nvCxnSpPr>\
         <p:spPr><a:xfrm{}{}><a:off x=\"{}\" y=\"{}\"/><a:ext cx=\"{}\" cy=\"{}\"/></a:xfrm>\
         <a:prstGeom prst=\"line\"><a:avLst/></a:prstGeom>\
         <a:ln w=\"{}\"><a:solidFill><a:srgbClr val=\"{}\"/></a:solidFill></a:ln>\
         </p:spPr></p:cxnSp>",
        id,
        escape(&line.base.id),
        rot,
        flips,
        space.x_emu(x),
        space.y_emu(y),
        space.x_emu(dx),
        space.y_emu(dy),
        stroke_w,
        stroke
    )
}

fn image_pic(image: &ImageShape, space: &SlideSpace, id: u64, rel_id: &str) -> String {
    format!(
        "<p:pic><p:nvPicPr><p:cNvPr id=\"{}\" name=\"{}\"/><p:cNvPicPr/><p:nvPr/></p:nvPicPr>\
         <p:blipFill><a:blip r:embed=\"{}\"/><a:stretch><a:fillRect/></a:stretch></p:blipFill>\
         <p:spPr>{}<a:prstGeom prst=\"rect\"><a:avLst/></a:prstGeom></p:spPr></p:pic>",
        id,
        escape(&image.base.id),
        rel_id,
        xfrm(space, image.base.x, image.base.y, image.base.w, image.base.h, image.base.rotation)
    )
}
