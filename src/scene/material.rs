use glam::Vec3;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum Side {
    #[default]
    Front,
    Double,
}

/// Where a texture's pixels come from. The core only describes textures;
/// the browser layer rasterises or fetches them.
#[derive(Clone, Debug, PartialEq)]
pub enum TextureSource {
    /// One line of centred text on a transparent 512x128 canvas.
    Text {
        text: String,
        font_px: u32,
        bold: bool,
        color: String,
    },
    /// Round badge with a radial gradient and a centred glyph.
    Badge { label: String, size_px: u32 },
    /// QR-looking grid: three finder squares plus seeded noise.
    QrPattern { size_px: u32, seed: u64 },
    /// Remote image; stays blank until (and unless) it loads.
    Image { url: String },
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub enum MaterialKind {
    /// Unlit colour, optionally multiplied by a texture.
    Basic,
    /// Lit surface.
    Physical {
        metalness: f32,
        roughness: f32,
        clearcoat: f32,
    },
    Line,
    /// Unlit, coloured per vertex.
    Points,
    /// Animated radial blend between `color` and `color2`.
    Glow { color2: Vec3, time: f32 },
}

#[derive(Clone, Debug, PartialEq)]
pub struct Material {
    pub kind: MaterialKind,
    pub color: Vec3,
    pub opacity: f32,
    pub transparent: bool,
    pub side: Side,
    pub depth_write: bool,
    pub texture: Option<TextureSource>,
}

impl Material {
    pub fn basic(color: Vec3) -> Self {
        Self {
            kind: MaterialKind::Basic,
            color,
            opacity: 1.0,
            transparent: false,
            side: Side::Front,
            depth_write: true,
            texture: None,
        }
    }

    pub fn physical(color: Vec3, metalness: f32, roughness: f32, clearcoat: f32) -> Self {
        Self {
            kind: MaterialKind::Physical {
                metalness,
                roughness,
                clearcoat,
            },
            ..Self::basic(color)
        }
    }

    pub fn line(color: Vec3) -> Self {
        Self {
            kind: MaterialKind::Line,
            ..Self::basic(color)
        }
    }

    pub fn points(opacity: f32) -> Self {
        Self {
            kind: MaterialKind::Points,
            ..Self::basic(Vec3::ONE).with_opacity(opacity)
        }
    }

    pub fn glow(color: Vec3, color2: Vec3) -> Self {
        Self {
            kind: MaterialKind::Glow { color2, time: 0.0 },
            side: Side::Double,
            ..Self::basic(color).with_opacity(1.0)
        }
        .transparent()
    }

    /// Texture on a transparent, unlit quad.
    pub fn textured(source: TextureSource) -> Self {
        Self {
            texture: Some(source),
            ..Self::basic(Vec3::ONE)
        }
        .transparent()
    }

    pub fn transparent(mut self) -> Self {
        self.transparent = true;
        self
    }

    pub fn with_opacity(mut self, opacity: f32) -> Self {
        self.opacity = opacity.clamp(0.0, 1.0);
        self.transparent = self.transparent || opacity < 1.0;
        self
    }

    pub fn double_sided(mut self) -> Self {
        self.side = Side::Double;
        self
    }

    pub fn without_depth_write(mut self) -> Self {
        self.depth_write = false;
        self
    }

    pub fn glow_time(&self) -> Option<f32> {
        match self.kind {
            MaterialKind::Glow { time, .. } => Some(time),
            _ => None,
        }
    }

    pub fn set_glow_time(&mut self, t: f32) {
        if let MaterialKind::Glow { time, .. } = &mut self.kind {
            *time = t;
        }
    }
}
