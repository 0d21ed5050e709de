//! Recursive-descent builders over the token cursor.
//!
//! One builder per Lottie node kind, all sharing the same control idiom:
//! enter the object, loop over keys, dispatch on key, hand anything
//! unrecognized to the cursor's skip. Builders perform the semantic
//! transformations in-line — hex colors become float channels, tangent
//! arrays become absolute Bézier point lists, keyframe pairs become
//! interpolated segments — and compute each node's static flag from the
//! flags of its animated inputs on the way out.

use crate::cursor::{JsonType, TokenCursor};
use glam::Vec2;
use lottie_model::model::{
    Animatable, Asset, BlendMode, Bounds, Color, Composition, Dash, Ellipse, Fill, FillRule,
    Gradient, GradientFill, GradientStroke, Group, Interpolator, Keyframe, Layer, LayerType,
    LineCap, LineJoin, Mask, MaskMode, MatteType, Model, PathData, PathShape, Polystar,
    PolystarKind, Rect, Repeater, ShapeNode, SpatialTangents, Stroke, Transform, Trim, TrimKind,
    HOLD_INTERPOLATOR_KEY,
};
use std::sync::Arc;

/// Parses a complete Lottie document from a byte buffer.
///
/// Parsing happens in the constructor; `is_valid` tells whether the cursor
/// survived the walk, and `model` hands over the resolved composition after
/// running the post-pass hooks. An invalid parse still yields a partially
/// populated model, which callers should discard.
pub struct LottieParser<'a> {
    inner: ParserImpl<'a>,
}

impl<'a> LottieParser<'a> {
    pub fn new(document: &'a [u8]) -> Self {
        let mut inner = ParserImpl {
            cursor: TokenCursor::new(document),
            comp: Composition::default(),
            pending_refs: Vec::new(),
            cur_layer_has_path_operator: false,
        };
        inner.parse_composition();
        LottieParser { inner }
    }

    pub fn is_valid(&self) -> bool {
        self.inner.cursor.is_valid()
    }

    pub fn model(self) -> Model {
        Model::new(self.inner.comp)
    }
}

struct ParserImpl<'a> {
    cursor: TokenCursor<'a>,
    comp: Composition,
    /// Precomp layers awaiting pass-2 asset resolution.
    pending_refs: Vec<Arc<Layer>>,
    /// Scratch for the layer currently being built; a trim anywhere in its
    /// shape tree flips it.
    cur_layer_has_path_operator: bool,
}

impl ParserImpl<'_> {
    fn parse_composition(&mut self) {
        if !self.cursor.enter_object() {
            return;
        }
        while let Some(key) = self.cursor.next_object_key() {
            match key.as_ref() {
                "v" => self.comp.version = self.cursor.get_string().into_owned(),
                "w" => self.comp.width = self.cursor.get_int().max(0) as u32,
                "h" => self.comp.height = self.cursor.get_int().max(0) as u32,
                "ip" => self.comp.start_frame = self.cursor.get_double() as f32,
                "op" => self.comp.end_frame = self.cursor.get_double() as f32,
                "fr" => self.comp.frame_rate = self.cursor.get_double() as f32,
                "assets" => self.parse_assets(),
                "layers" => {
                    if self.cursor.enter_array() {
                        while self.cursor.next_array_value() {
                            let layer = self.parse_layer();
                            self.comp.layers.push(layer);
                        }
                    }
                }
                _ => self.cursor.skip(),
            }
        }
        self.resolve_layer_refs();
        self.comp.is_static = self.comp.layers.iter().all(|layer| layer.is_static);
    }

    fn parse_assets(&mut self) {
        if !self.cursor.enter_array() {
            return;
        }
        while self.cursor.next_array_value() {
            let asset = self.parse_asset();
            self.comp.assets.insert(asset.ref_id.clone(), Arc::new(asset));
        }
    }

    fn parse_asset(&mut self) -> Asset {
        let mut asset = Asset::default();
        if !self.cursor.enter_object() {
            return asset;
        }
        while let Some(key) = self.cursor.next_object_key() {
            match key.as_ref() {
                "ty" => asset.asset_type = self.cursor.get_int(),
                "id" => asset.ref_id = self.cursor.get_string().into_owned(),
                "layers" => {
                    if self.cursor.enter_array() {
                        while self.cursor.next_array_value() {
                            let layer = self.parse_layer();
                            asset.layers.push(layer);
                        }
                    }
                }
                _ => self.cursor.skip(),
            }
        }
        asset
    }

    /// Pass 2: point every enqueued precomp layer at its asset's layer
    /// list. The list is shared, not copied; a missing asset leaves the
    /// layer's children empty with no error raised.
    fn resolve_layer_refs(&mut self) {
        for layer in self.pending_refs.drain(..) {
            let Some(ref_id) = layer.ref_id.as_deref() else {
                continue;
            };
            if let Some(asset) = self.comp.assets.get(ref_id) {
                let _ = layer.children.set(asset.layers.clone());
            }
        }
    }

    fn parse_layer(&mut self) -> Arc<Layer> {
        let mut layer = Layer::default();
        let mut has_layer_ref = false;
        let saved_path_op = std::mem::replace(&mut self.cur_layer_has_path_operator, false);
        if self.cursor.enter_object() {
            while let Some(key) = self.cursor.next_object_key() {
                match key.as_ref() {
                    "ty" => layer.layer_type = self.get_layer_type(),
                    "ind" => layer.id = self.cursor.get_int(),
                    "parent" => layer.parent_id = self.cursor.get_int(),
                    "refId" => {
                        layer.ref_id = Some(self.cursor.get_string().into_owned());
                        has_layer_ref = true;
                    }
                    "sr" => layer.time_stretch = self.cursor.get_double() as f32,
                    "tm" => layer.time_remap = Some(self.parse_property::<f32>()),
                    "ip" => layer.in_frame = self.cursor.get_double().round() as i32,
                    "op" => layer.out_frame = self.cursor.get_double().round() as i32,
                    "st" => layer.start_frame = self.cursor.get_double() as f32,
                    "bounds" => layer.bounds = self.get_rect(),
                    "bm" => layer.blend_mode = self.get_blend_mode(),
                    "ks" => {
                        if self.cursor.enter_object() {
                            layer.transform = self.parse_transform();
                        }
                    }
                    "shapes" => {
                        if self.cursor.enter_array() {
                            while self.cursor.next_array_value() {
                                self.parse_shape_object(&mut layer.shapes);
                            }
                        }
                    }
                    "sw" => layer.solid.width = self.cursor.get_int(),
                    "sh" => layer.solid.height = self.cursor.get_int(),
                    "sc" => layer.solid.color = Color::from_hex(&self.cursor.get_string()),
                    "tt" => layer.matte_type = self.get_matte_type(),
                    "hasMask" => layer.has_mask = self.cursor.get_bool(),
                    "masksProperties" => {
                        if self.cursor.enter_array() {
                            while self.cursor.next_array_value() {
                                let mask = self.parse_mask();
                                layer.masks.push(mask);
                            }
                        }
                    }
                    _ => self.cursor.skip(),
                }
            }
        }
        layer.has_path_operator =
            std::mem::replace(&mut self.cur_layer_has_path_operator, saved_path_op);

        let shapes_static = layer.shapes.iter().all(|shape| shape.is_static());
        let masks_static = layer.masks.iter().all(|mask| mask.is_static);
        layer.is_static =
            shapes_static && masks_static && layer.transform.is_static && !has_layer_ref;

        let layer = Arc::new(layer);
        if layer.ref_id.is_some() {
            self.pending_refs.push(layer.clone());
        }
        layer
    }

    fn parse_mask(&mut self) -> Mask {
        let mut mask = Mask::default();
        if !self.cursor.enter_object() {
            return mask;
        }
        while let Some(key) = self.cursor.next_object_key() {
            match key.as_ref() {
                "inv" => mask.inverted = self.cursor.get_bool(),
                "mode" => {
                    let mode = self.cursor.get_string();
                    mask.mode = match mode.as_bytes().first() {
                        Some(b'a') => MaskMode::Add,
                        Some(b's') => MaskMode::Subtract,
                        Some(b'i') => MaskMode::Intersect,
                        _ => MaskMode::None,
                    };
                }
                "pt" => mask.shape = self.parse_property::<PathData>(),
                "o" => mask.opacity = self.parse_property::<f32>(),
                _ => self.cursor.skip(),
            }
        }
        mask.is_static = mask.shape.is_static() && mask.opacity.is_static();
        mask
    }

    // Shape tree --------------------------------------------------------

    /// One element of a `shapes` or `it` array: reads keys until `ty`
    /// selects a variant builder, which then consumes the rest of the same
    /// object.
    fn parse_shape_object(&mut self, out: &mut Vec<ShapeNode>) {
        if !self.cursor.enter_object() {
            return;
        }
        while let Some(key) = self.cursor.next_object_key() {
            match key.as_ref() {
                "ty" => {
                    if let Some(node) = self.parse_shape_variant() {
                        out.push(node);
                    }
                }
                _ => self.cursor.skip(),
            }
        }
    }

    fn parse_shape_variant(&mut self) -> Option<ShapeNode> {
        let ty = self.cursor.get_string();
        match ty.as_ref() {
            "gr" => Some(ShapeNode::Group(self.parse_group())),
            "rc" => Some(ShapeNode::Rect(self.parse_rect())),
            "el" => Some(ShapeNode::Ellipse(self.parse_ellipse())),
            "tr" => Some(ShapeNode::Transform(self.parse_transform())),
            "fl" => Some(ShapeNode::Fill(self.parse_fill())),
            "st" => Some(ShapeNode::Stroke(self.parse_stroke())),
            "gf" => Some(ShapeNode::GradientFill(self.parse_gradient_fill())),
            "gs" => Some(ShapeNode::GradientStroke(self.parse_gradient_stroke())),
            "sh" => Some(ShapeNode::Path(self.parse_path_shape())),
            "sr" => Some(ShapeNode::Polystar(self.parse_polystar())),
            "tm" => Some(ShapeNode::Trim(self.parse_trim())),
            "rp" => Some(ShapeNode::Repeater(self.parse_repeater())),
            other => {
                warn_once(format!("unhandled object type {other}"));
                None
            }
        }
    }

    fn parse_group(&mut self) -> Group {
        let mut group = Group::default();
        while let Some(key) = self.cursor.next_object_key() {
            match key.as_ref() {
                "it" => {
                    if self.cursor.enter_array() {
                        while self.cursor.next_array_value() {
                            self.parse_shape_object(&mut group.children);
                        }
                    }
                    // The exporter writes the group transform as the final
                    // `it` entry; extract it from the child list.
                    if matches!(group.children.last(), Some(ShapeNode::Transform(_))) {
                        if let Some(ShapeNode::Transform(t)) = group.children.pop() {
                            group.transform = t;
                        }
                    }
                }
                _ => self.cursor.skip(),
            }
        }
        group.is_static =
            group.children.iter().all(|child| child.is_static()) && group.transform.is_static;
        group
    }

    fn parse_rect(&mut self) -> Rect {
        let mut rect = Rect::default();
        while let Some(key) = self.cursor.next_object_key() {
            match key.as_ref() {
                "p" => rect.position = self.parse_property::<Vec2>(),
                "s" => rect.size = self.parse_property::<Vec2>(),
                "r" => rect.radius = self.parse_property::<f32>(),
                "d" => rect.direction = self.cursor.get_int(),
                _ => self.cursor.skip(),
            }
        }
        rect.is_static =
            rect.position.is_static() && rect.size.is_static() && rect.radius.is_static();
        rect
    }

    fn parse_ellipse(&mut self) -> Ellipse {
        let mut ellipse = Ellipse::default();
        while let Some(key) = self.cursor.next_object_key() {
            match key.as_ref() {
                "p" => ellipse.position = self.parse_property::<Vec2>(),
                "s" => ellipse.size = self.parse_property::<Vec2>(),
                "d" => ellipse.direction = self.cursor.get_int(),
                _ => self.cursor.skip(),
            }
        }
        ellipse.is_static = ellipse.position.is_static() && ellipse.size.is_static();
        ellipse
    }

    fn parse_path_shape(&mut self) -> PathShape {
        let mut path = PathShape::default();
        while let Some(key) = self.cursor.next_object_key() {
            match key.as_ref() {
                "ks" => path.shape = self.parse_property::<PathData>(),
                "d" => path.direction = self.cursor.get_int(),
                _ => self.cursor.skip(),
            }
        }
        path.is_static = path.shape.is_static();
        path
    }

    fn parse_polystar(&mut self) -> Polystar {
        let mut star = Polystar::default();
        while let Some(key) = self.cursor.next_object_key() {
            match key.as_ref() {
                "p" => star.position = self.parse_property::<Vec2>(),
                "pt" => star.point_count = self.parse_property::<f32>(),
                "ir" => star.inner_radius = self.parse_property::<f32>(),
                "is" => star.inner_roundness = self.parse_property::<f32>(),
                "or" => star.outer_radius = self.parse_property::<f32>(),
                "os" => star.outer_roundness = self.parse_property::<f32>(),
                "r" => star.rotation = self.parse_property::<f32>(),
                "sy" => {
                    star.kind = match self.cursor.get_int() {
                        2 => PolystarKind::Polygon,
                        _ => PolystarKind::Star,
                    };
                }
                "d" => star.direction = self.cursor.get_int(),
                _ => self.cursor.skip(),
            }
        }
        star.is_static = star.position.is_static()
            && star.point_count.is_static()
            && star.inner_radius.is_static()
            && star.inner_roundness.is_static()
            && star.outer_radius.is_static()
            && star.outer_roundness.is_static()
            && star.rotation.is_static();
        star
    }

    fn parse_transform(&mut self) -> Transform {
        let mut transform = Transform::default();
        while let Some(key) = self.cursor.next_object_key() {
            match key.as_ref() {
                "a" => transform.anchor = self.parse_property::<Vec2>(),
                "p" => transform.position = self.parse_property::<Vec2>(),
                "r" => transform.rotation = self.parse_property::<f32>(),
                "s" => transform.scale = self.parse_property::<Vec2>(),
                "sk" => transform.skew = self.parse_property::<f32>(),
                "sa" => transform.skew_axis = self.parse_property::<f32>(),
                "o" => transform.opacity = self.parse_property::<f32>(),
                _ => self.cursor.skip(),
            }
        }
        transform.finalize();
        transform
    }

    fn parse_fill(&mut self) -> Fill {
        let mut fill = Fill::default();
        while let Some(key) = self.cursor.next_object_key() {
            match key.as_ref() {
                "c" => fill.color = self.parse_property::<Color>(),
                "o" => fill.opacity = self.parse_property::<f32>(),
                "fillEnabled" => fill.enabled = self.cursor.get_bool(),
                "r" => fill.rule = self.get_fill_rule(),
                _ => self.cursor.skip(),
            }
        }
        fill.is_static = fill.color.is_static() && fill.opacity.is_static();
        fill
    }

    fn parse_stroke(&mut self) -> Stroke {
        let mut stroke = Stroke::default();
        while let Some(key) = self.cursor.next_object_key() {
            match key.as_ref() {
                "c" => stroke.color = self.parse_property::<Color>(),
                "o" => stroke.opacity = self.parse_property::<f32>(),
                "w" => stroke.width = self.parse_property::<f32>(),
                "fillEnabled" => stroke.enabled = self.cursor.get_bool(),
                "lc" => stroke.cap = self.get_line_cap(),
                "lj" => stroke.join = self.get_line_join(),
                "ml" => stroke.miter_limit = self.cursor.get_double() as f32,
                "d" => stroke.dash = self.parse_dash(),
                _ => self.cursor.skip(),
            }
        }
        stroke.is_static = stroke.color.is_static()
            && stroke.opacity.is_static()
            && stroke.width.is_static()
            && stroke.dash.is_static;
        stroke
    }

    fn parse_gradient_key(&mut self, gradient: &mut Gradient, key: &str) {
        match key {
            "t" => gradient.gradient_type = self.cursor.get_int(),
            "o" => gradient.opacity = self.parse_property::<f32>(),
            "s" => gradient.start_point = self.parse_property::<Vec2>(),
            "e" => gradient.end_point = self.parse_property::<Vec2>(),
            "h" => gradient.highlight_length = self.parse_property::<f32>(),
            "a" => gradient.highlight_angle = self.parse_property::<f32>(),
            "g" => {
                if self.cursor.enter_object() {
                    while let Some(inner) = self.cursor.next_object_key() {
                        match inner.as_ref() {
                            "k" => gradient.stops = self.parse_property::<Vec<f32>>(),
                            "p" => gradient.color_points = self.cursor.get_int(),
                            _ => self.cursor.skip(),
                        }
                    }
                }
            }
            _ => self.cursor.skip(),
        }
    }

    fn parse_gradient_fill(&mut self) -> GradientFill {
        let mut fill = GradientFill::default();
        while let Some(key) = self.cursor.next_object_key() {
            match key.as_ref() {
                "r" => fill.rule = self.get_fill_rule(),
                other => self.parse_gradient_key(&mut fill.gradient, other),
            }
        }
        finalize_gradient(&mut fill.gradient);
        fill
    }

    fn parse_gradient_stroke(&mut self) -> GradientStroke {
        let mut stroke = GradientStroke::default();
        while let Some(key) = self.cursor.next_object_key() {
            match key.as_ref() {
                "w" => stroke.width = self.parse_property::<f32>(),
                "lc" => stroke.cap = self.get_line_cap(),
                "lj" => stroke.join = self.get_line_join(),
                "ml" => stroke.miter_limit = self.cursor.get_double() as f32,
                "d" => stroke.dash = self.parse_dash(),
                other => self.parse_gradient_key(&mut stroke.gradient, other),
            }
        }
        finalize_gradient(&mut stroke.gradient);
        stroke.is_static =
            stroke.gradient.is_static && stroke.width.is_static() && stroke.dash.is_static;
        stroke
    }

    fn parse_dash(&mut self) -> Dash {
        let mut dash = Dash::default();
        if !self.cursor.enter_array() {
            return dash;
        }
        while self.cursor.next_array_value() {
            if !self.cursor.enter_object() {
                break;
            }
            while let Some(key) = self.cursor.next_object_key() {
                match key.as_ref() {
                    "v" => {
                        let element = self.parse_property::<f32>();
                        dash.elements.push(element);
                    }
                    _ => self.cursor.skip(),
                }
            }
        }
        dash.is_static = dash.elements.iter().all(|element| element.is_static());
        dash
    }

    fn parse_trim(&mut self) -> Trim {
        let mut trim = Trim::default();
        while let Some(key) = self.cursor.next_object_key() {
            match key.as_ref() {
                "s" => trim.start = self.parse_property::<f32>(),
                "e" => trim.end = self.parse_property::<f32>(),
                "o" => trim.offset = self.parse_property::<f32>(),
                "m" => trim.kind = self.get_trim_kind(),
                _ => self.cursor.skip(),
            }
        }
        trim.is_static =
            trim.start.is_static() && trim.end.is_static() && trim.offset.is_static();
        self.cur_layer_has_path_operator = true;
        trim
    }

    fn parse_repeater(&mut self) -> Repeater {
        let mut repeater = Repeater::default();
        while let Some(key) = self.cursor.next_object_key() {
            match key.as_ref() {
                "c" => repeater.copies = self.parse_property::<f32>(),
                "o" => repeater.offset = self.parse_property::<f32>(),
                "tr" => {
                    if self.cursor.enter_object() {
                        repeater.transform = self.parse_transform();
                    }
                }
                _ => self.cursor.skip(),
            }
        }
        repeater.is_static = repeater.copies.is_static()
            && repeater.offset.is_static()
            && repeater.transform.is_static;
        repeater
    }

    // Animated properties ------------------------------------------------

    /// Decodes the polymorphic property encoding: `k` holding a primitive
    /// number is an immediate scalar, an array of numbers an immediate
    /// multi-dimensional value, an array of objects a keyframe sequence.
    /// Path properties arrive with an object-shaped `k` and take the same
    /// route through `Scan`.
    fn parse_property<T: Scan>(&mut self) -> Animatable<T> {
        let mut value = T::default();
        let mut frames: Vec<Keyframe<T>> = Vec::new();
        let mut animated = false;
        if !self.cursor.enter_object() {
            return Animatable::Static(value);
        }
        while let Some(key) = self.cursor.next_object_key() {
            match key.as_ref() {
                "k" => {
                    if self.cursor.peek_type() == Some(JsonType::Array) {
                        self.cursor.enter_array();
                        while self.cursor.next_array_value() {
                            if self.cursor.peek_type() == Some(JsonType::Object) {
                                animated = true;
                                self.parse_keyframe(&mut frames);
                            } else {
                                // Immediate multi-dimensional value. The
                                // array is already entered and its first
                                // element is the current token; drain the
                                // rest and stop.
                                value = T::scan_elements(self);
                                break;
                            }
                        }
                    } else {
                        value = T::scan(self);
                    }
                }
                "ix" => {
                    let _ = self.cursor.get_int();
                }
                _ => self.cursor.skip(),
            }
        }
        if animated {
            Animatable::Animated(frames)
        } else {
            Animatable::Static(value)
        }
    }

    fn parse_keyframe<T: Scan>(&mut self, frames: &mut Vec<Keyframe<T>>) {
        if !self.cursor.enter_object() {
            return;
        }
        let mut start_frame = 0.0f32;
        let mut start_value = T::default();
        let mut end_value: Option<T> = None;
        let mut in_tangent = Vec2::ZERO;
        let mut out_tangent = Vec2::ZERO;
        let mut spatial: Option<SpatialTangents> = None;
        let mut interpolator_key: Option<String> = None;
        let mut hold = false;

        while let Some(key) = self.cursor.next_object_key() {
            match key.as_ref() {
                "i" => in_tangent = self.parse_interpolator_point(),
                "o" => out_tangent = self.parse_interpolator_point(),
                "n" => interpolator_key = Some(self.scan_interpolator_name()),
                "t" => start_frame = self.cursor.get_double() as f32,
                "s" => start_value = T::scan(self),
                "e" => end_value = Some(T::scan(self)),
                "ti" if T::SPATIAL => {
                    spatial.get_or_insert_with(SpatialTangents::default).tan_in =
                        Vec2::scan(self);
                }
                "to" if T::SPATIAL => {
                    spatial.get_or_insert_with(SpatialTangents::default).tan_out =
                        Vec2::scan(self);
                }
                "h" => hold = self.cursor.get_int() != 0,
                _ => self.cursor.skip(),
            }
        }

        // The previous keyframe ends where this one starts, hold or not.
        if let Some(prev) = frames.last_mut() {
            prev.end_frame = start_frame;
        }

        let cache_key = if hold {
            in_tangent = Vec2::ZERO;
            out_tangent = Vec2::ZERO;
            end_value = Some(start_value.clone());
            HOLD_INTERPOLATOR_KEY.to_string()
        } else {
            // Bodymovin 5 stopped writing `n`; derive a cache key from the
            // control points so identical easings still share one instance.
            interpolator_key.unwrap_or_else(|| {
                format!(
                    "{},{},{},{}",
                    in_tangent.x, in_tangent.y, out_tangent.x, out_tangent.y
                )
            })
        };

        let interpolator = match self.comp.interpolators.get(&cache_key) {
            Some(existing) => existing.clone(),
            None => {
                let fresh = Arc::new(Interpolator::new(in_tangent, out_tangent));
                self.comp.interpolators.insert(cache_key, fresh.clone());
                fresh
            }
        };

        frames.push(Keyframe {
            start_frame,
            // Back-patched by the next keyframe; a terminal keyframe keeps
            // end == start.
            end_frame: start_frame,
            end_value: end_value.unwrap_or_else(|| start_value.clone()),
            start_value,
            interpolator,
            spatial,
        });
    }

    /// Reads a temporal easing control point: `x`/`y` each either a number
    /// or an array of numbers whose last element wins.
    fn parse_interpolator_point(&mut self) -> Vec2 {
        let mut cp = Vec2::ZERO;
        if !self.cursor.enter_object() {
            return cp;
        }
        while let Some(key) = self.cursor.next_object_key() {
            match key.as_ref() {
                "x" => cp.x = self.scan_axis(),
                "y" => cp.y = self.scan_axis(),
                _ => self.cursor.skip(),
            }
        }
        cp
    }

    fn scan_axis(&mut self) -> f32 {
        if self.cursor.peek_type() == Some(JsonType::Array) {
            self.cursor.enter_array();
            let mut value = 0.0;
            while self.cursor.next_array_value() {
                value = self.cursor.get_double() as f32;
            }
            value
        } else {
            self.cursor.get_double() as f32
        }
    }

    fn scan_interpolator_name(&mut self) -> String {
        if self.cursor.peek_type() == Some(JsonType::Array) {
            self.cursor.enter_array();
            let mut name = String::new();
            while self.cursor.next_array_value() {
                name = self.cursor.get_string().into_owned();
            }
            name
        } else {
            self.cursor.get_string().into_owned()
        }
    }

    // Enum decoders ------------------------------------------------------

    fn get_layer_type(&mut self) -> LayerType {
        match self.cursor.get_int() {
            0 => LayerType::Precomp,
            1 => LayerType::Solid,
            2 => LayerType::Image,
            3 => LayerType::Null,
            4 => LayerType::Shape,
            5 => LayerType::Text,
            _ => LayerType::Null,
        }
    }

    fn get_blend_mode(&mut self) -> BlendMode {
        match self.cursor.get_int() {
            1 => BlendMode::Multiply,
            2 => BlendMode::Screen,
            3 => BlendMode::Overlay,
            _ => BlendMode::Normal,
        }
    }

    fn get_matte_type(&mut self) -> MatteType {
        match self.cursor.get_int() {
            1 => MatteType::Alpha,
            2 => MatteType::AlphaInv,
            3 => MatteType::Luma,
            4 => MatteType::LumaInv,
            _ => MatteType::None,
        }
    }

    fn get_fill_rule(&mut self) -> FillRule {
        match self.cursor.get_int() {
            2 => FillRule::EvenOdd,
            _ => FillRule::Winding,
        }
    }

    fn get_line_cap(&mut self) -> LineCap {
        match self.cursor.get_int() {
            1 => LineCap::Flat,
            2 => LineCap::Round,
            _ => LineCap::Square,
        }
    }

    fn get_line_join(&mut self) -> LineJoin {
        match self.cursor.get_int() {
            1 => LineJoin::Miter,
            2 => LineJoin::Round,
            _ => LineJoin::Bevel,
        }
    }

    fn get_trim_kind(&mut self) -> TrimKind {
        match self.cursor.get_int() {
            2 => TrimKind::Individually,
            _ => TrimKind::Simultaneously,
        }
    }

    fn get_rect(&mut self) -> Bounds {
        let mut rect = Bounds::default();
        if !self.cursor.enter_object() {
            return rect;
        }
        while let Some(key) = self.cursor.next_object_key() {
            match key.as_ref() {
                "l" => rect.left = self.cursor.get_int(),
                "r" => rect.right = self.cursor.get_int(),
                "t" => rect.top = self.cursor.get_int(),
                "b" => rect.bottom = self.cursor.get_int(),
                _ => self.cursor.skip(),
            }
        }
        rect
    }
}

fn finalize_gradient(gradient: &mut Gradient) {
    gradient.is_static = gradient.opacity.is_static()
        && gradient.start_point.is_static()
        && gradient.end_point.is_static()
        && gradient.highlight_angle.is_static()
        && gradient.highlight_length.is_static()
        && gradient.stops.is_static();
}

// Typed value readers -----------------------------------------------------

/// Reads one value of a property's payload type. `scan` handles a value in
/// normal position; `scan_elements` handles the tail of an array the caller
/// already entered (the immediate multi-dimensional case, where the array
/// kind is only known after stepping inside).
trait Scan: Clone + Default {
    /// Point-typed properties additionally accept spatial `ti`/`to`
    /// tangents on their keyframes.
    const SPATIAL: bool = false;

    fn scan(p: &mut ParserImpl<'_>) -> Self;
    fn scan_elements(p: &mut ParserImpl<'_>) -> Self;
}

impl Scan for f32 {
    fn scan(p: &mut ParserImpl<'_>) -> Self {
        match p.cursor.peek_type() {
            Some(JsonType::Array) => {
                p.cursor.enter_array();
                Self::scan_elements(p)
            }
            Some(JsonType::Number) => p.cursor.get_double() as f32,
            _ => {
                p.cursor.invalidate();
                0.0
            }
        }
    }

    fn scan_elements(p: &mut ParserImpl<'_>) -> Self {
        let mut value = 0.0;
        while p.cursor.next_array_value() {
            value = p.cursor.get_double() as f32;
        }
        value
    }
}

impl Scan for Vec2 {
    const SPATIAL: bool = true;

    fn scan(p: &mut ParserImpl<'_>) -> Self {
        if p.cursor.peek_type() == Some(JsonType::Array) {
            p.cursor.enter_array();
            Self::scan_elements(p)
        } else {
            p.cursor.invalidate();
            Vec2::ZERO
        }
    }

    fn scan_elements(p: &mut ParserImpl<'_>) -> Self {
        let components = scan_components(p);
        Vec2::new(components[0], components[1])
    }
}

impl Scan for Color {
    fn scan(p: &mut ParserImpl<'_>) -> Self {
        if p.cursor.peek_type() == Some(JsonType::Array) {
            p.cursor.enter_array();
            Self::scan_elements(p)
        } else {
            p.cursor.invalidate();
            Color::default()
        }
    }

    fn scan_elements(p: &mut ParserImpl<'_>) -> Self {
        // RGBA floats; alpha is carried by the separate opacity property.
        let components = scan_components(p);
        Color::new(components[0], components[1], components[2])
    }
}

impl Scan for Vec<f32> {
    fn scan(p: &mut ParserImpl<'_>) -> Self {
        if p.cursor.peek_type() == Some(JsonType::Array) {
            p.cursor.enter_array();
            Self::scan_elements(p)
        } else {
            p.cursor.invalidate();
            Vec::new()
        }
    }

    fn scan_elements(p: &mut ParserImpl<'_>) -> Self {
        let mut values = Vec::new();
        while p.cursor.next_array_value() {
            values.push(p.cursor.get_double() as f32);
        }
        values
    }
}

impl Scan for PathData {
    fn scan(p: &mut ParserImpl<'_>) -> Self {
        // A shape value is wrapped in a one-element array when it sits
        // inside a keyframe; detect and drain the wrapper symmetrically.
        let wrapped = p.cursor.peek_type() == Some(JsonType::Array);
        if wrapped {
            p.cursor.enter_array();
        }

        let mut in_points: Vec<Vec2> = Vec::new();
        let mut out_points: Vec<Vec2> = Vec::new();
        let mut vertices: Vec<Vec2> = Vec::new();
        let mut closed = false;
        if p.cursor.enter_object() {
            while let Some(key) = p.cursor.next_object_key() {
                match key.as_ref() {
                    "i" => scan_point_list(p, &mut in_points),
                    "o" => scan_point_list(p, &mut out_points),
                    "v" => scan_point_list(p, &mut vertices),
                    "c" => closed = p.cursor.get_bool(),
                    _ => p.cursor.skip(),
                }
            }
        }
        if wrapped {
            p.cursor.next_array_value();
        }

        build_path(&in_points, &out_points, &vertices, closed)
    }

    fn scan_elements(p: &mut ParserImpl<'_>) -> Self {
        // A path payload is always object-shaped; bare numbers mean the
        // document is corrupt.
        p.cursor.invalidate();
        PathData::default()
    }
}

fn scan_components(p: &mut ParserImpl<'_>) -> [f32; 4] {
    let mut components = [0.0f32; 4];
    let mut count = 0;
    while p.cursor.next_array_value() {
        let value = p.cursor.get_double() as f32;
        if count < components.len() {
            components[count] = value;
        }
        count += 1;
    }
    components
}

fn scan_point_list(p: &mut ParserImpl<'_>, out: &mut Vec<Vec2>) {
    if p.cursor.peek_type() != Some(JsonType::Array) {
        p.cursor.invalidate();
        return;
    }
    p.cursor.enter_array();
    while p.cursor.next_array_value() {
        if p.cursor.peek_type() != Some(JsonType::Array) {
            p.cursor.invalidate();
            return;
        }
        p.cursor.enter_array();
        let components = scan_components(p);
        out.push(Vec2::new(components[0], components[1]));
    }
}

/// Rewrites the AE tangent encoding (parallel in/out/vertex arrays, tangents
/// relative to their anchor) into an absolute point list: Move, then one
/// CP1/CP2/End triple per segment, plus a closing triple for closed paths.
fn build_path(in_points: &[Vec2], out_points: &[Vec2], vertices: &[Vec2], closed: bool) -> PathData {
    if in_points.len() != vertices.len() || out_points.len() != vertices.len() {
        warn_once("shape data corrupted".to_string());
        return PathData {
            points: Vec::new(),
            closed,
        };
    }
    let Some(&first) = vertices.first() else {
        return PathData {
            points: Vec::new(),
            closed,
        };
    };

    let count = vertices.len();
    let mut points = Vec::with_capacity(3 * count + 4);
    points.push(first);
    for i in 1..count {
        points.push(vertices[i - 1] + out_points[i - 1]);
        points.push(vertices[i] + in_points[i]);
        points.push(vertices[i]);
    }
    if closed {
        points.push(vertices[count - 1] + out_points[count - 1]);
        points.push(vertices[0] + in_points[0]);
        points.push(vertices[0]);
    }
    PathData { points, closed }
}

fn warn_once(msg: String) {
    use std::collections::HashSet;
    use std::sync::{Mutex, OnceLock};
    static SEEN: OnceLock<Mutex<HashSet<String>>> = OnceLock::new();
    let store = SEEN.get_or_init(|| Mutex::new(HashSet::new()));
    if let Ok(mut seen) = store.lock() {
        if seen.insert(msg.clone()) {
            eprintln!("[lottie-parser] {msg}");
        }
    }
}
