//! Diagnostic tree printer built on the visitor.

use crate::model::{
    Composition, Ellipse, Fill, GradientFill, GradientStroke, Group, Layer, LayerType, Mask,
    PathShape, Polystar, Rect, Repeater, Stroke, Transform, Trim,
};
use crate::visitor::Visitor;
use std::fmt::Write;

/// Renders one line per model node, indented by depth. Handy in tests and
/// when eyeballing what the parser made of an unfamiliar file.
pub fn dump(comp: &Composition) -> String {
    let mut inspector = Inspector {
        out: String::new(),
        depth: 0,
    };
    comp.accept(&mut inspector);
    inspector.out
}

struct Inspector {
    out: String,
    depth: usize,
}

impl Inspector {
    fn line(&mut self, text: std::fmt::Arguments) {
        for _ in 0..self.depth {
            self.out.push_str("  ");
        }
        // Writing to a String cannot fail.
        let _ = writeln!(self.out, "{text}");
    }
}

fn layer_type_name(ty: LayerType) -> &'static str {
    match ty {
        LayerType::Precomp => "Precomp",
        LayerType::Solid => "Solid",
        LayerType::Image => "Image",
        LayerType::Null => "Null",
        LayerType::Shape => "Shape",
        LayerType::Text => "Text",
    }
}

impl Visitor for Inspector {
    fn visit_composition(&mut self, comp: &Composition) {
        self.line(format_args!(
            "[COMP START static:{} v:{} size:{}x{} frames:{}..{} @{}fps]",
            comp.is_static,
            comp.version,
            comp.width,
            comp.height,
            comp.start_frame,
            comp.end_frame,
            comp.frame_rate
        ));
        self.depth += 1;
    }

    fn leave_composition(&mut self, _comp: &Composition) {
        self.depth -= 1;
        self.line(format_args!("[COMP END]"));
    }

    fn visit_layer(&mut self, layer: &Layer) {
        self.line(format_args!(
            "[LAYER START type:{} id:{} parent:{} static:{} frames:{}..{} start:{} stretch:{}]",
            layer_type_name(layer.layer_type),
            layer.id,
            layer.parent_id,
            layer.is_static,
            layer.in_frame,
            layer.out_frame,
            layer.start_frame,
            layer.time_stretch
        ));
        self.depth += 1;
    }

    fn leave_layer(&mut self, layer: &Layer) {
        self.depth -= 1;
        self.line(format_args!("[LAYER END id:{}]", layer.id));
    }

    fn visit_transform(&mut self, transform: &Transform) {
        self.line(format_args!(
            "[TRANSFORM static:{} cached:{}]",
            transform.is_static,
            transform.matrix.is_some()
        ));
    }

    fn visit_mask(&mut self, mask: &Mask) {
        self.line(format_args!(
            "[MASK mode:{:?} inverted:{} static:{}]",
            mask.mode, mask.inverted, mask.is_static
        ));
    }

    fn visit_group(&mut self, group: &Group) {
        self.line(format_args!("[GROUP START static:{}]", group.is_static));
        self.depth += 1;
    }

    fn leave_group(&mut self, _group: &Group) {
        self.depth -= 1;
        self.line(format_args!("[GROUP END]"));
    }

    fn visit_rect(&mut self, rect: &Rect) {
        self.line(format_args!("[RECT static:{}]", rect.is_static));
    }

    fn visit_ellipse(&mut self, ellipse: &Ellipse) {
        self.line(format_args!("[ELLIPSE static:{}]", ellipse.is_static));
    }

    fn visit_path(&mut self, path: &PathShape) {
        self.line(format_args!("[PATH static:{}]", path.is_static));
    }

    fn visit_polystar(&mut self, polystar: &Polystar) {
        self.line(format_args!(
            "[POLYSTAR kind:{:?} static:{}]",
            polystar.kind, polystar.is_static
        ));
    }

    fn visit_fill(&mut self, fill: &Fill) {
        self.line(format_args!("[FILL static:{}]", fill.is_static));
    }

    fn visit_gradient_fill(&mut self, fill: &GradientFill) {
        self.line(format_args!(
            "[GFILL type:{} static:{}]",
            fill.gradient.gradient_type, fill.gradient.is_static
        ));
    }

    fn visit_stroke(&mut self, stroke: &Stroke) {
        self.line(format_args!("[STROKE static:{}]", stroke.is_static));
    }

    fn visit_gradient_stroke(&mut self, stroke: &GradientStroke) {
        self.line(format_args!("[GSTROKE static:{}]", stroke.is_static));
    }

    fn visit_trim(&mut self, trim: &Trim) {
        self.line(format_args!(
            "[TRIM kind:{:?} static:{}]",
            trim.kind, trim.is_static
        ));
    }

    fn visit_repeater(&mut self, repeater: &Repeater) {
        self.line(format_args!("[REPEATER START static:{}]", repeater.is_static));
        self.depth += 1;
    }

    fn leave_repeater(&mut self, _repeater: &Repeater) {
        self.depth -= 1;
        self.line(format_args!("[REPEATER END]"));
    }
}
