//! Renderer-neutral scene description.
//!
//! Widgets describe what they look like each frame as a tree of
//! [`SceneNode`]s. A host renderer turns the tree into real meshes; the form
//! uses the same tree to measure children for layout.

use glam::DVec3;
use kurbo::{Rect, Size};
use peniko::Color;

/// Horizontal anchoring of a text run relative to its node position.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TextAnchor {
    #[default]
    Left,
    Center,
    Right,
}

/// Shape of a mesh, centered on its node position.
#[derive(Debug, Clone, PartialEq)]
pub enum Geometry {
    Box {
        size: DVec3,
    },
    RoundedBox {
        size: DVec3,
        radius: f64,
        smoothness: u32,
    },
    /// Flat rectangle in the XY plane.
    Plane {
        width: f64,
        height: f64,
    },
    Sphere {
        radius: f64,
    },
    /// Flat text, vertically centered on the node.
    Text {
        content: String,
        font_size: f64,
        anchor: TextAnchor,
    },
    /// Extruded text, starting at the node position.
    Text3D {
        content: String,
        size: f64,
        depth: f64,
    },
}

/// Standard PBR-ish surface parameters.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Material {
    pub color: Color,
    pub emissive: Color,
    pub emissive_intensity: f32,
    pub metalness: f32,
    pub roughness: f32,
    pub tone_mapped: bool,
}

impl Default for Material {
    fn default() -> Self {
        Self {
            color: Color::WHITE,
            emissive: Color::BLACK,
            emissive_intensity: 1.0,
            metalness: 0.0,
            roughness: 1.0,
            tone_mapped: true,
        }
    }
}

impl Material {
    /// A plain material of the given color.
    pub fn color(color: Color) -> Self {
        Self {
            color,
            ..Self::default()
        }
    }

    /// Set the emissive color and intensity.
    pub fn with_emissive(mut self, emissive: Color, intensity: f32) -> Self {
        self.emissive = emissive;
        self.emissive_intensity = intensity;
        self
    }
}

/// What a node draws.
#[derive(Debug, Clone, PartialEq)]
pub enum NodeKind {
    /// Only groups its children.
    Group,
    Mesh {
        geometry: Geometry,
        material: Material,
    },
    AmbientLight {
        intensity: f32,
    },
    DirectionalLight {
        intensity: f32,
        shadow_map_size: u32,
    },
}

/// Translation, uniform-per-axis scale and spin around the Y axis.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Transform {
    pub position: DVec3,
    pub scale: DVec3,
    pub rotation_y: f64,
}

impl Default for Transform {
    fn default() -> Self {
        Self {
            position: DVec3::ZERO,
            scale: DVec3::ONE,
            rotation_y: 0.0,
        }
    }
}

/// A node of the scene tree.
#[derive(Debug, Clone, PartialEq)]
pub struct SceneNode {
    /// Optional debug name.
    pub name: Option<String>,
    pub kind: NodeKind,
    pub transform: Transform,
    pub visible: bool,
    pub cast_shadow: bool,
    pub receive_shadow: bool,
    pub children: Vec<SceneNode>,
}

impl SceneNode {
    fn with_kind(kind: NodeKind) -> Self {
        Self {
            name: None,
            kind,
            transform: Transform::default(),
            visible: true,
            cast_shadow: false,
            receive_shadow: false,
            children: Vec::new(),
        }
    }

    /// An empty group.
    pub fn group() -> Self {
        Self::with_kind(NodeKind::Group)
    }

    /// A mesh that casts and receives shadows.
    pub fn mesh(geometry: Geometry, material: Material) -> Self {
        Self {
            cast_shadow: true,
            receive_shadow: true,
            ..Self::with_kind(NodeKind::Mesh { geometry, material })
        }
    }

    /// A box mesh.
    pub fn cuboid(size: DVec3, material: Material) -> Self {
        Self::mesh(Geometry::Box { size }, material)
    }

    /// A flat text run.
    pub fn text(content: impl Into<String>, font_size: f64, anchor: TextAnchor, color: Color) -> Self {
        Self::mesh(
            Geometry::Text {
                content: content.into(),
                font_size,
                anchor,
            },
            Material::color(color),
        )
    }

    /// A light.
    pub fn light(kind: NodeKind) -> Self {
        Self::with_kind(kind)
    }

    /// Set the debug name.
    pub fn named(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    /// Set the position.
    pub fn at(mut self, position: DVec3) -> Self {
        self.transform.position = position;
        self
    }

    /// Set the scale.
    pub fn scaled(mut self, scale: DVec3) -> Self {
        self.transform.scale = scale;
        self
    }

    /// Set the spin around the Y axis.
    pub fn rotated_y(mut self, angle: f64) -> Self {
        self.transform.rotation_y = angle;
        self
    }

    /// Set visibility.
    pub fn visible(mut self, visible: bool) -> Self {
        self.visible = visible;
        self
    }

    /// Set shadow casting for this node.
    pub fn shadows(mut self, cast: bool, receive: bool) -> Self {
        self.cast_shadow = cast;
        self.receive_shadow = receive;
        self
    }

    /// Append a child.
    pub fn child(mut self, child: SceneNode) -> Self {
        self.children.push(child);
        self
    }

    /// Append several children.
    pub fn with_children(mut self, children: impl IntoIterator<Item = SceneNode>) -> Self {
        self.children.extend(children);
        self
    }

    /// Find the first node with the given name, depth first.
    pub fn find(&self, name: &str) -> Option<&SceneNode> {
        if self.name.as_deref() == Some(name) {
            return Some(self);
        }
        self.children.iter().find_map(|child| child.find(name))
    }

    /// The material of a mesh node.
    pub fn material(&self) -> Option<&Material> {
        match &self.kind {
            NodeKind::Mesh { material, .. } => Some(material),
            _ => None,
        }
    }

    /// Extent of the subtree in the XY plane, in the parent's coordinates.
    ///
    /// Every mesh counts, visible or not; lights have no extent. Rotation
    /// around Y is ignored since it does not change the vertical extent.
    pub fn bounds<H: RenderHost + ?Sized>(&self, host: &H) -> Option<Rect> {
        let own = match &self.kind {
            NodeKind::Mesh { geometry, .. } => Some(geometry_bounds(geometry, host)),
            _ => None,
        };
        let local = self
            .children
            .iter()
            .filter_map(|child| child.bounds(host))
            .chain(own)
            .reduce(|a, b| a.union(b))?;

        let Transform {
            position, scale, ..
        } = self.transform;
        Some(Rect::new(
            local.x0 * scale.x + position.x,
            local.y0 * scale.y + position.y,
            local.x1 * scale.x + position.x,
            local.y1 * scale.y + position.y,
        ))
    }
}

fn geometry_bounds<H: RenderHost + ?Sized>(geometry: &Geometry, host: &H) -> Rect {
    match geometry {
        Geometry::Box { size } | Geometry::RoundedBox { size, .. } => {
            Rect::from_center_size((0.0, 0.0), (size.x, size.y))
        }
        Geometry::Plane { width, height } => Rect::from_center_size((0.0, 0.0), (*width, *height)),
        Geometry::Sphere { radius } => {
            Rect::from_center_size((0.0, 0.0), (radius * 2.0, radius * 2.0))
        }
        Geometry::Text {
            content,
            font_size,
            anchor,
        } => {
            let size = host.text_size(content, *font_size);
            let x0 = match anchor {
                TextAnchor::Left => 0.0,
                TextAnchor::Center => -size.width / 2.0,
                TextAnchor::Right => -size.width,
            };
            Rect::new(x0, -size.height / 2.0, x0 + size.width, size.height / 2.0)
        }
        Geometry::Text3D { content, size, .. } => {
            let extent = host.text_size(content, *size);
            Rect::from_origin_size((0.0, 0.0), extent)
        }
    }
}

/// What the form needs from the environment that renders it.
pub trait RenderHost {
    /// Rendered size of a single line of text.
    fn text_size(&self, text: &str, font_size: f64) -> Size;

    /// Extent of a rendered subtree in the XY plane.
    fn extent(&self, node: &SceneNode) -> Option<Rect> {
        node.bounds(self)
    }
}

/// Host without a renderer: text is measured as fixed-advance glyphs.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HeadlessHost {
    /// Glyph advance as a fraction of the font size.
    pub advance: f64,
    /// Line height as a fraction of the font size.
    pub line_height: f64,
}

impl Default for HeadlessHost {
    fn default() -> Self {
        Self {
            advance: 0.6,
            line_height: 1.2,
        }
    }
}

impl RenderHost for HeadlessHost {
    fn text_size(&self, text: &str, font_size: f64) -> Size {
        let glyphs = text.chars().count() as f64;
        Size::new(glyphs * self.advance * font_size, self.line_height * font_size)
    }
}
