//! Model consumer interface.
//!
//! Downstream consumers (diagnostic printers, the renderer's evaluator)
//! traverse the model through [`Visitor`]. Container nodes drive their own
//! recursion and emit a matching `leave_*` end marker; every method has an
//! empty default body so implementations override only what they need.

use crate::model::{
    Composition, Ellipse, Fill, GradientFill, GradientStroke, Group, Layer, Mask, PathShape,
    Polystar, Rect, Repeater, ShapeNode, Stroke, Transform, Trim,
};

#[allow(unused_variables)]
pub trait Visitor {
    fn visit_composition(&mut self, comp: &Composition) {}
    fn leave_composition(&mut self, comp: &Composition) {}

    fn visit_layer(&mut self, layer: &Layer) {}
    fn leave_layer(&mut self, layer: &Layer) {}

    fn visit_transform(&mut self, transform: &Transform) {}
    fn visit_mask(&mut self, mask: &Mask) {}

    fn visit_group(&mut self, group: &Group) {}
    fn leave_group(&mut self, group: &Group) {}

    fn visit_rect(&mut self, rect: &Rect) {}
    fn visit_ellipse(&mut self, ellipse: &Ellipse) {}
    fn visit_path(&mut self, path: &PathShape) {}
    fn visit_polystar(&mut self, polystar: &Polystar) {}

    fn visit_fill(&mut self, fill: &Fill) {}
    fn visit_gradient_fill(&mut self, fill: &GradientFill) {}
    fn visit_stroke(&mut self, stroke: &Stroke) {}
    fn visit_gradient_stroke(&mut self, stroke: &GradientStroke) {}

    fn visit_trim(&mut self, trim: &Trim) {}

    fn visit_repeater(&mut self, repeater: &Repeater) {}
    fn leave_repeater(&mut self, repeater: &Repeater) {}
}

impl Composition {
    pub fn accept(&self, visitor: &mut dyn Visitor) {
        visitor.visit_composition(self);
        for layer in &self.layers {
            layer.accept(visitor);
        }
        visitor.leave_composition(self);
    }
}

impl Layer {
    pub fn accept(&self, visitor: &mut dyn Visitor) {
        visitor.visit_layer(self);
        visitor.visit_transform(&self.transform);
        for mask in &self.masks {
            visitor.visit_mask(mask);
        }
        for shape in &self.shapes {
            shape.accept(visitor);
        }
        for child in self.resolved_children() {
            child.accept(visitor);
        }
        visitor.leave_layer(self);
    }
}

impl ShapeNode {
    pub fn accept(&self, visitor: &mut dyn Visitor) {
        match self {
            ShapeNode::Group(group) => {
                visitor.visit_group(group);
                for child in &group.children {
                    child.accept(visitor);
                }
                visitor.visit_transform(&group.transform);
                visitor.leave_group(group);
            }
            ShapeNode::Rect(rect) => visitor.visit_rect(rect),
            ShapeNode::Ellipse(ellipse) => visitor.visit_ellipse(ellipse),
            ShapeNode::Path(path) => visitor.visit_path(path),
            ShapeNode::Polystar(polystar) => visitor.visit_polystar(polystar),
            ShapeNode::Transform(transform) => visitor.visit_transform(transform),
            ShapeNode::Fill(fill) => visitor.visit_fill(fill),
            ShapeNode::GradientFill(fill) => visitor.visit_gradient_fill(fill),
            ShapeNode::Stroke(stroke) => visitor.visit_stroke(stroke),
            ShapeNode::GradientStroke(stroke) => visitor.visit_gradient_stroke(stroke),
            ShapeNode::Trim(trim) => visitor.visit_trim(trim),
            ShapeNode::Repeater(repeater) => {
                visitor.visit_repeater(repeater);
                visitor.visit_transform(&repeater.transform);
                visitor.leave_repeater(repeater);
            }
        }
    }
}
