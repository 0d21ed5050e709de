//! Renderer-ready Lottie model.
//!
//! Everything here is produced by the parser in a single pass over the JSON
//! document and is immutable afterwards. Animated properties are already
//! resolved into keyframe sequences with shared interpolators, shape paths
//! are absolute cubic Bézier point lists, and precomp references point at
//! concrete layer subtrees.

use glam::{Mat3, Vec2};
use kurbo::{BezPath, Point};
use std::collections::HashMap;
use std::sync::{Arc, OnceLock};

/// Root handle returned by the parser once post-pass hooks have run.
#[derive(Debug, Clone)]
pub struct Model {
    pub root: Arc<Composition>,
}

impl Model {
    pub fn new(root: Composition) -> Self {
        root.process_path_operator_objects();
        root.process_repeater_objects();
        Model {
            root: Arc::new(root),
        }
    }
}

#[derive(Debug, Default)]
pub struct Composition {
    pub version: String,
    pub width: u32,
    pub height: u32,
    pub start_frame: f32,
    pub end_frame: f32,
    pub frame_rate: f32,
    pub assets: HashMap<String, Arc<Asset>>,
    pub layers: Vec<Arc<Layer>>,
    /// One instance per distinct interpolator key seen in the document.
    pub interpolators: HashMap<String, Arc<Interpolator>>,
    pub is_static: bool,
}

impl Composition {
    pub fn duration_frames(&self) -> f32 {
        self.end_frame - self.start_frame
    }

    fn layers_everywhere(&self) -> impl Iterator<Item = &Arc<Layer>> {
        self.layers
            .iter()
            .chain(self.assets.values().flat_map(|a| a.layers.iter()))
    }

    /// Post-pass hook: the seam where a renderer derives its path-operator
    /// chains. The parser guarantees `has_path_operator` is already set on
    /// every layer whose shape tree contains a Trim, however deeply nested;
    /// this walk re-checks that contract for models assembled by hand.
    pub fn process_path_operator_objects(&self) {
        for layer in self.layers_everywhere() {
            if !layer.has_path_operator && shapes_contain_trim(&layer.shapes) {
                warn_once(format!(
                    "layer {} contains a trim but is not flagged as a path operator",
                    layer.id
                ));
            }
        }
    }

    /// Post-pass hook: renderers that expand repeaters into instanced copies
    /// run here. Repeater transforms are populated by the parser; a repeater
    /// instances every sibling that precedes it in its child list.
    pub fn process_repeater_objects(&self) {
        for layer in self.layers_everywhere() {
            check_repeaters(&layer.shapes, layer.id);
        }
    }
}

fn shapes_contain_trim(shapes: &[ShapeNode]) -> bool {
    shapes.iter().any(|s| match s {
        ShapeNode::Trim(_) => true,
        ShapeNode::Group(g) => shapes_contain_trim(&g.children),
        _ => false,
    })
}

fn check_repeaters(shapes: &[ShapeNode], layer_id: i32) {
    for (idx, shape) in shapes.iter().enumerate() {
        match shape {
            ShapeNode::Repeater(_) => {
                if idx == 0 {
                    warn_once(format!(
                        "repeater on layer {layer_id} has no preceding content"
                    ));
                }
            }
            ShapeNode::Group(g) => check_repeaters(&g.children, layer_id),
            _ => {}
        }
    }
}

fn warn_once(msg: String) {
    use std::collections::HashSet;
    use std::sync::Mutex;
    static SEEN: OnceLock<Mutex<HashSet<String>>> = OnceLock::new();
    let store = SEEN.get_or_init(|| Mutex::new(HashSet::new()));
    if let Ok(mut seen) = store.lock() {
        if seen.insert(msg.clone()) {
            eprintln!("[lottie-model] {msg}");
        }
    }
}

/// A reusable sub-animation referenced by precomp layers via `refId`.
#[derive(Debug, Default)]
pub struct Asset {
    pub ref_id: String,
    /// Raw asset type integer as written by the exporter.
    pub asset_type: i32,
    pub layers: Vec<Arc<Layer>>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LayerType {
    Precomp,
    Solid,
    Image,
    #[default]
    Null,
    Shape,
    Text,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum BlendMode {
    #[default]
    Normal,
    Multiply,
    Screen,
    Overlay,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum MatteType {
    #[default]
    None,
    Alpha,
    AlphaInv,
    Luma,
    LumaInv,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum MaskMode {
    #[default]
    None,
    Add,
    Subtract,
    Intersect,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FillRule {
    #[default]
    Winding,
    EvenOdd,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LineCap {
    #[default]
    Flat,
    Round,
    Square,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LineJoin {
    #[default]
    Miter,
    Round,
    Bevel,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TrimKind {
    #[default]
    Simultaneously,
    Individually,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PolystarKind {
    #[default]
    Star,
    Polygon,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Bounds {
    pub left: i32,
    pub right: i32,
    pub top: i32,
    pub bottom: i32,
}

#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Color {
    pub r: f32,
    pub g: f32,
    pub b: f32,
}

impl Color {
    pub fn new(r: f32, g: f32, b: f32) -> Self {
        Color { r, g, b }
    }

    /// Decodes a `#RRGGBB` layer-solid color. Malformed input decodes the
    /// offending channel to 0 rather than failing the parse.
    pub fn from_hex(s: &str) -> Self {
        let bytes = s.as_bytes();
        if bytes.len() != 7 || bytes[0] != b'#' {
            return Color::default();
        }
        let channel = |lo: usize| {
            std::str::from_utf8(&bytes[lo..lo + 2])
                .ok()
                .and_then(|h| u8::from_str_radix(h, 16).ok())
                .unwrap_or(0) as f32
                / 255.0
        };
        Color {
            r: channel(1),
            g: channel(3),
            b: channel(5),
        }
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct Solid {
    pub width: i32,
    pub height: i32,
    pub color: Color,
}

/// One animated entity in the scene.
///
/// `shapes` is the shape tree of a Shape layer; `children` is the resolved
/// layer list of a Precomp layer, shared with the owning asset and written
/// exactly once by the reference resolver.
#[derive(Debug)]
pub struct Layer {
    pub layer_type: LayerType,
    pub id: i32,
    pub parent_id: i32,
    pub ref_id: Option<String>,
    pub time_stretch: f32,
    pub time_remap: Option<Animatable<f32>>,
    pub in_frame: i32,
    pub out_frame: i32,
    pub start_frame: f32,
    pub bounds: Bounds,
    pub blend_mode: BlendMode,
    pub matte_type: MatteType,
    pub has_mask: bool,
    pub has_path_operator: bool,
    pub transform: Transform,
    pub masks: Vec<Mask>,
    pub shapes: Vec<ShapeNode>,
    pub solid: Solid,
    pub children: OnceLock<Vec<Arc<Layer>>>,
    pub is_static: bool,
}

impl Default for Layer {
    fn default() -> Self {
        Layer {
            layer_type: LayerType::default(),
            id: -1,
            parent_id: -1,
            ref_id: None,
            time_stretch: 1.0,
            time_remap: None,
            in_frame: 0,
            out_frame: 0,
            start_frame: 0.0,
            bounds: Bounds::default(),
            blend_mode: BlendMode::default(),
            matte_type: MatteType::default(),
            has_mask: false,
            has_path_operator: false,
            transform: Transform::default(),
            masks: Vec::new(),
            shapes: Vec::new(),
            solid: Solid::default(),
            children: OnceLock::new(),
            is_static: true,
        }
    }
}

impl Layer {
    pub fn resolved_children(&self) -> &[Arc<Layer>] {
        self.children.get().map(Vec::as_slice).unwrap_or(&[])
    }
}

/// A per-layer clipping region.
#[derive(Debug)]
pub struct Mask {
    pub inverted: bool,
    pub mode: MaskMode,
    pub shape: Animatable<PathData>,
    pub opacity: Animatable<f32>,
    pub is_static: bool,
}

impl Default for Mask {
    fn default() -> Self {
        Mask {
            inverted: false,
            mode: MaskMode::default(),
            shape: Animatable::default(),
            opacity: Animatable::Static(100.0),
            is_static: true,
        }
    }
}

/// A value that is either fixed for the whole animation or described by a
/// keyframe sequence. Exactly one of the two states holds; an animated
/// property never carries a standalone value.
#[derive(Debug, Clone)]
pub enum Animatable<T> {
    Static(T),
    Animated(Vec<Keyframe<T>>),
}

impl<T: Default> Default for Animatable<T> {
    fn default() -> Self {
        Animatable::Static(T::default())
    }
}

impl<T> Animatable<T> {
    pub fn is_static(&self) -> bool {
        matches!(self, Animatable::Static(_))
    }

    /// The immediate value, when static.
    pub fn value(&self) -> Option<&T> {
        match self {
            Animatable::Static(v) => Some(v),
            Animatable::Animated(_) => None,
        }
    }

    pub fn keyframes(&self) -> &[Keyframe<T>] {
        match self {
            Animatable::Static(_) => &[],
            Animatable::Animated(frames) => frames,
        }
    }
}

/// One segment of an animated property. `end_frame` is back-patched to the
/// next keyframe's start frame while the sequence is being parsed.
#[derive(Debug, Clone)]
pub struct Keyframe<T> {
    pub start_frame: f32,
    pub end_frame: f32,
    pub start_value: T,
    pub end_value: T,
    pub interpolator: Arc<Interpolator>,
    /// In/out tangents of positional keyframes, relative to the values.
    pub spatial: Option<SpatialTangents>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct SpatialTangents {
    pub tan_in: Vec2,
    pub tan_out: Vec2,
}

/// A 2D cubic-Bézier easing curve mapping normalized time to normalized
/// progress. Instances are shared across keyframes through the
/// composition's cache, keyed by the exporter-provided name.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Interpolator {
    pub in_tangent: Vec2,
    pub out_tangent: Vec2,
}

/// Cache key reserved for hold keyframes.
pub const HOLD_INTERPOLATOR_KEY: &str = "hold_interpolator";

impl Interpolator {
    pub fn new(in_tangent: Vec2, out_tangent: Vec2) -> Self {
        Interpolator {
            in_tangent,
            out_tangent,
        }
    }

    pub fn hold() -> Self {
        Interpolator::new(Vec2::ZERO, Vec2::ZERO)
    }

    /// Evaluates the easing at normalized time `x` via Newton-Raphson on the
    /// curve's x polynomial.
    pub fn value_at(&self, x: f32) -> f32 {
        if x <= 0.0 {
            return 0.0;
        }
        if x >= 1.0 {
            return 1.0;
        }
        let p1 = self.out_tangent;
        let p2 = self.in_tangent;

        let mut t = x;
        for _ in 0..8 {
            let omt = 1.0 - t;
            let x_est = 3.0 * omt * omt * t * p1.x + 3.0 * omt * t * t * p2.x + t * t * t;
            let err = x_est - x;
            if err.abs() < 1e-4 {
                break;
            }
            let dx_dt =
                3.0 * omt * omt * p1.x + 6.0 * omt * t * (p2.x - p1.x) + 3.0 * t * t * (1.0 - p2.x);
            if dx_dt.abs() < 1e-6 {
                break;
            }
            t -= err / dx_dt;
        }

        let omt = 1.0 - t;
        3.0 * omt * omt * t * p1.y + 3.0 * omt * t * t * p2.y + t * t * t
    }
}

/// A closed-or-open cubic Bézier outline: a Move point followed by
/// CP1/CP2/End triples, tangents already absolutized.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PathData {
    pub points: Vec<Vec2>,
    pub closed: bool,
}

impl PathData {
    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    pub fn segment_count(&self) -> usize {
        if self.points.is_empty() {
            0
        } else {
            (self.points.len() - 1) / 3
        }
    }

    pub fn to_bez_path(&self) -> BezPath {
        let mut path = BezPath::new();
        let Some(first) = self.points.first() else {
            return path;
        };
        let pt = |v: &Vec2| Point::new(v.x as f64, v.y as f64);
        path.move_to(pt(first));
        for seg in self.points[1..].chunks_exact(3) {
            path.curve_to(pt(&seg[0]), pt(&seg[1]), pt(&seg[2]));
        }
        if self.closed {
            path.close_path();
        }
        path
    }
}

/// Affine transform of a layer, group, or repeater.
#[derive(Debug, Clone)]
pub struct Transform {
    pub anchor: Animatable<Vec2>,
    pub position: Animatable<Vec2>,
    pub scale: Animatable<Vec2>,
    pub rotation: Animatable<f32>,
    pub skew: Animatable<f32>,
    pub skew_axis: Animatable<f32>,
    pub opacity: Animatable<f32>,
    /// True when every affine input is static; opacity may still animate.
    pub static_matrix: bool,
    /// Precomputed matrix, present iff `static_matrix`.
    pub matrix: Option<Mat3>,
    pub is_static: bool,
}

impl Default for Transform {
    fn default() -> Self {
        Transform {
            anchor: Animatable::Static(Vec2::ZERO),
            position: Animatable::Static(Vec2::ZERO),
            scale: Animatable::Static(Vec2::new(100.0, 100.0)),
            rotation: Animatable::Static(0.0),
            skew: Animatable::Static(0.0),
            skew_axis: Animatable::Static(0.0),
            opacity: Animatable::Static(100.0),
            static_matrix: true,
            matrix: Some(Mat3::IDENTITY),
            is_static: true,
        }
    }
}

impl Transform {
    /// Recomputes `static_matrix`, `is_static`, and the cached matrix from
    /// the current inputs. Called once by the builder when the transform
    /// object closes.
    pub fn finalize(&mut self) {
        self.static_matrix = self.anchor.is_static()
            && self.position.is_static()
            && self.rotation.is_static()
            && self.scale.is_static()
            && self.skew.is_static()
            && self.skew_axis.is_static();
        self.is_static = self.static_matrix && self.opacity.is_static();
        self.matrix = self.static_matrix.then(|| self.compose_static());
    }

    fn compose_static(&self) -> Mat3 {
        let anchor = *self.anchor.value().unwrap_or(&Vec2::ZERO);
        let position = *self.position.value().unwrap_or(&Vec2::ZERO);
        let scale = *self.scale.value().unwrap_or(&Vec2::new(100.0, 100.0));
        let rotation = *self.rotation.value().unwrap_or(&0.0);
        let skew = *self.skew.value().unwrap_or(&0.0);
        let skew_axis = *self.skew_axis.value().unwrap_or(&0.0);

        let mut m = Mat3::from_translation(position) * Mat3::from_angle(rotation.to_radians());
        if skew != 0.0 {
            // Shear along the skew axis, the lottie-web way: rotate into the
            // axis frame, shear x, rotate back.
            let axis = skew_axis.to_radians();
            let shear = Mat3::from_cols(
                glam::Vec3::new(1.0, 0.0, 0.0),
                glam::Vec3::new((-skew.to_radians()).tan(), 1.0, 0.0),
                glam::Vec3::new(0.0, 0.0, 1.0),
            );
            m = m * Mat3::from_angle(axis) * shear * Mat3::from_angle(-axis);
        }
        m * Mat3::from_scale(scale / 100.0) * Mat3::from_translation(-anchor)
    }
}

#[derive(Debug)]
pub enum ShapeNode {
    Group(Group),
    Rect(Rect),
    Ellipse(Ellipse),
    Path(PathShape),
    Polystar(Polystar),
    Transform(Transform),
    Fill(Fill),
    GradientFill(GradientFill),
    Stroke(Stroke),
    GradientStroke(GradientStroke),
    Trim(Trim),
    Repeater(Repeater),
}

impl ShapeNode {
    pub fn is_static(&self) -> bool {
        match self {
            ShapeNode::Group(g) => g.is_static,
            ShapeNode::Rect(r) => r.is_static,
            ShapeNode::Ellipse(e) => e.is_static,
            ShapeNode::Path(p) => p.is_static,
            ShapeNode::Polystar(p) => p.is_static,
            ShapeNode::Transform(t) => t.is_static,
            ShapeNode::Fill(f) => f.is_static,
            ShapeNode::GradientFill(f) => f.gradient.is_static,
            ShapeNode::Stroke(s) => s.is_static,
            ShapeNode::GradientStroke(s) => s.is_static,
            ShapeNode::Trim(t) => t.is_static,
            ShapeNode::Repeater(r) => r.is_static,
        }
    }
}

#[derive(Debug, Default)]
pub struct Group {
    pub children: Vec<ShapeNode>,
    /// Extracted from the tail of the group's `it` list during parse.
    pub transform: Transform,
    pub is_static: bool,
}

#[derive(Debug, Default)]
pub struct Rect {
    pub position: Animatable<Vec2>,
    pub size: Animatable<Vec2>,
    pub radius: Animatable<f32>,
    pub direction: i32,
    pub is_static: bool,
}

#[derive(Debug, Default)]
pub struct Ellipse {
    pub position: Animatable<Vec2>,
    pub size: Animatable<Vec2>,
    pub direction: i32,
    pub is_static: bool,
}

#[derive(Debug, Default)]
pub struct PathShape {
    pub shape: Animatable<PathData>,
    pub direction: i32,
    pub is_static: bool,
}

#[derive(Debug, Default)]
pub struct Polystar {
    pub position: Animatable<Vec2>,
    pub point_count: Animatable<f32>,
    pub inner_radius: Animatable<f32>,
    pub inner_roundness: Animatable<f32>,
    pub outer_radius: Animatable<f32>,
    pub outer_roundness: Animatable<f32>,
    pub rotation: Animatable<f32>,
    pub kind: PolystarKind,
    pub direction: i32,
    pub is_static: bool,
}

#[derive(Debug)]
pub struct Fill {
    pub color: Animatable<Color>,
    pub opacity: Animatable<f32>,
    pub enabled: bool,
    pub rule: FillRule,
    pub is_static: bool,
}

impl Default for Fill {
    fn default() -> Self {
        Fill {
            color: Animatable::default(),
            opacity: Animatable::Static(100.0),
            enabled: true,
            rule: FillRule::default(),
            is_static: true,
        }
    }
}

#[derive(Debug)]
pub struct Stroke {
    pub color: Animatable<Color>,
    pub opacity: Animatable<f32>,
    pub width: Animatable<f32>,
    pub enabled: bool,
    pub cap: LineCap,
    pub join: LineJoin,
    pub miter_limit: f32,
    pub dash: Dash,
    pub is_static: bool,
}

impl Default for Stroke {
    fn default() -> Self {
        Stroke {
            color: Animatable::default(),
            opacity: Animatable::Static(100.0),
            width: Animatable::default(),
            enabled: true,
            cap: LineCap::default(),
            join: LineJoin::default(),
            miter_limit: 0.0,
            dash: Dash::default(),
            is_static: true,
        }
    }
}

/// Gradient attributes shared by gradient fills and strokes. The stop list
/// is the raw interleaved offset/color float array from the document; `p`
/// color points tell a renderer where color stops end and alpha stops begin.
#[derive(Debug, Default)]
pub struct Gradient {
    pub gradient_type: i32,
    pub opacity: Animatable<f32>,
    pub start_point: Animatable<Vec2>,
    pub end_point: Animatable<Vec2>,
    pub highlight_length: Animatable<f32>,
    pub highlight_angle: Animatable<f32>,
    pub stops: Animatable<Vec<f32>>,
    pub color_points: i32,
    pub is_static: bool,
}

#[derive(Debug, Default)]
pub struct GradientFill {
    pub gradient: Gradient,
    pub rule: FillRule,
}

#[derive(Debug, Default)]
pub struct GradientStroke {
    pub gradient: Gradient,
    pub width: Animatable<f32>,
    pub cap: LineCap,
    pub join: LineJoin,
    pub miter_limit: f32,
    pub dash: Dash,
    pub is_static: bool,
}

#[derive(Debug, Default)]
pub struct Dash {
    pub elements: Vec<Animatable<f32>>,
    pub is_static: bool,
}

/// Renders a subrange of the paths that precede it.
#[derive(Debug, Default)]
pub struct Trim {
    pub start: Animatable<f32>,
    pub end: Animatable<f32>,
    pub offset: Animatable<f32>,
    pub kind: TrimKind,
    pub is_static: bool,
}

#[derive(Debug, Default)]
pub struct Repeater {
    pub copies: Animatable<f32>,
    pub offset: Animatable<f32>,
    pub transform: Transform,
    pub is_static: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hex_color_decodes_channels() {
        let c = Color::from_hex("#00FF80");
        assert_eq!(c.r, 0.0);
        assert_eq!(c.g, 1.0);
        assert!((c.b - 128.0 / 255.0).abs() < 1e-6);
    }

    #[test]
    fn hex_color_rejects_malformed_strings() {
        assert_eq!(Color::from_hex("00FF80"), Color::default());
        assert_eq!(Color::from_hex("#00FF8"), Color::default());
        assert_eq!(Color::from_hex("#zzFF80").g, 1.0);
    }

    #[test]
    fn path_point_counts() {
        // Closed triangle: 3 vertices, 3 segments, 10 points.
        let closed = PathData {
            points: vec![Vec2::ZERO; 10],
            closed: true,
        };
        assert_eq!(closed.segment_count(), 3);

        // Open two-vertex line: one segment, 4 points.
        let open = PathData {
            points: vec![Vec2::ZERO; 4],
            closed: false,
        };
        assert_eq!(open.segment_count(), 1);
    }

    #[test]
    fn path_converts_to_bez_path() {
        let tri = PathData {
            points: vec![
                Vec2::new(0.0, 0.0),
                Vec2::new(0.0, 0.0),
                Vec2::new(10.0, 0.0),
                Vec2::new(10.0, 0.0),
                Vec2::new(10.0, 0.0),
                Vec2::new(5.0, 10.0),
                Vec2::new(5.0, 10.0),
                Vec2::new(5.0, 10.0),
                Vec2::new(0.0, 0.0),
                Vec2::new(0.0, 0.0),
            ],
            closed: true,
        };
        let bez = tri.to_bez_path();
        // MoveTo + 3 CurveTo + ClosePath
        assert_eq!(bez.elements().len(), 5);
    }

    #[test]
    fn linear_interpolator_is_identity() {
        // Control points on the diagonal give linear easing.
        let lin = Interpolator::new(Vec2::new(2.0 / 3.0, 2.0 / 3.0), Vec2::new(1.0 / 3.0, 1.0 / 3.0));
        for i in 0..=10 {
            let x = i as f32 / 10.0;
            assert!((lin.value_at(x) - x).abs() < 1e-3, "x={x}");
        }
    }

    #[test]
    fn interpolator_clamps_out_of_range_input() {
        let ease = Interpolator::new(Vec2::new(0.5, 0.5), Vec2::new(0.5, 0.5));
        assert_eq!(ease.value_at(-1.0), 0.0);
        assert_eq!(ease.value_at(2.0), 1.0);
    }

    #[test]
    fn default_transform_caches_identity() {
        let t = Transform::default();
        assert!(t.static_matrix);
        assert_eq!(t.matrix, Some(Mat3::IDENTITY));
    }

    #[test]
    fn finalize_drops_matrix_for_animated_position() {
        let mut t = Transform::default();
        t.position = Animatable::Animated(Vec::new());
        t.finalize();
        assert!(!t.static_matrix);
        assert!(!t.is_static);
        assert_eq!(t.matrix, None);
    }

    #[test]
    fn finalize_keeps_matrix_when_only_opacity_animates() {
        let mut t = Transform::default();
        t.opacity = Animatable::Animated(Vec::new());
        t.finalize();
        assert!(t.static_matrix);
        assert!(!t.is_static);
        assert!(t.matrix.is_some());
    }

    #[test]
    fn static_matrix_applies_translation_and_scale() {
        let mut t = Transform::default();
        t.position = Animatable::Static(Vec2::new(10.0, 20.0));
        t.scale = Animatable::Static(Vec2::new(200.0, 50.0));
        t.finalize();
        let m = t.matrix.unwrap();
        let p = m.transform_point2(Vec2::new(1.0, 1.0));
        assert!((p.x - 12.0).abs() < 1e-5);
        assert!((p.y - 20.5).abs() < 1e-5);
    }
}
