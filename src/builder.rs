//! Builds the card scene from configuration.
//!
//! Construction only: nothing here runs per frame. The card group holds two
//! face groups half a turn apart about Y, so whichever face the card's Y
//! rotation points at the camera is the one seen. Labels are rasterised onto
//! flat quads (not billboards) so they turn with the card.

use crate::config::{CardConfig, HexColor};
use crate::constants::*;
use crate::error::CardError;
use crate::particles::ParticleField;
use crate::picking::InteractiveRegistry;
use crate::scene::{
    FloatMotion, Geometry, InteractionKind, InteractionMetadata, Light, LightKind, Material,
    Node, NodeId, Scene, TextureSource, Transform, Visual,
};
use glam::Vec3;
use rand::Rng;
use std::f32::consts::PI;

/// Nodes the state machine and frame scheduler drive directly.
#[derive(Clone, Debug, PartialEq)]
pub struct CardHandles {
    pub card: NodeId,
    pub front: NodeId,
    pub back: NodeId,
    pub glow: Option<NodeId>,
    pub particles: Option<NodeId>,
    pub decorations: Vec<NodeId>,
}

/// Features that were switched off because their configuration is absent.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct BuildReport {
    pub disabled: Vec<CardError>,
}

impl BuildReport {
    pub fn is_disabled(&self, feature: &str) -> bool {
        self.disabled
            .iter()
            .any(|e| matches!(e, CardError::ConfigMissingFeature(f) if *f == feature))
    }
}

pub struct BuiltCard {
    pub scene: Scene,
    pub handles: CardHandles,
    pub registry: InteractiveRegistry,
    pub report: BuildReport,
}

struct TextStyle {
    font_px: u32,
    bold: bool,
    color: &'static str,
}

const fn text(font_px: u32, color: &'static str) -> TextStyle {
    TextStyle {
        font_px,
        bold: false,
        color,
    }
}

const fn bold(font_px: u32, color: &'static str) -> TextStyle {
    TextStyle {
        font_px,
        bold: true,
        color,
    }
}

struct SocialIcon {
    name: &'static str,
    symbol: &'static str,
    color: u32,
}

const SOCIAL_ICONS: [SocialIcon; 4] = [
    SocialIcon { name: "LinkedIn", symbol: "in", color: 0x0077b5 },
    SocialIcon { name: "GitHub", symbol: "⌘", color: 0x333333 },
    SocialIcon { name: "Twitter", symbol: "𝕏", color: 0x1da1f2 },
    SocialIcon { name: "Portfolio", symbol: "◈", color: 0x00d4ff },
];

struct Builder<'a, R: Rng> {
    config: &'a CardConfig,
    rng: &'a mut R,
    scene: Scene,
    registry: InteractiveRegistry,
    report: BuildReport,
    primary: Vec3,
    secondary: Vec3,
}

pub fn build_card<R: Rng>(config: &CardConfig, rng: &mut R) -> BuiltCard {
    let style = &config.card_style;
    let mut b = Builder {
        config,
        rng,
        scene: Scene::new(),
        registry: InteractiveRegistry::new(),
        report: BuildReport::default(),
        primary: style.primary_color.to_rgb(),
        secondary: style.secondary_color.to_rgb(),
    };
    b.scene.background = Some(HexColor(BACKGROUND_HEX).to_rgb());
    b.lights();

    let card = b.scene.add(Node::group("card", Transform::default()));
    b.card_body(card);
    let front = b.front_face(card);
    let back = b.back_face(card);
    let (decorations, glow) = b.decorations(card);
    let particles = b.particles();

    for note in &b.report.disabled {
        log::info!("[build] {}", note);
    }
    log::info!(
        "[build] nodes={} interactive={}",
        b.scene.len(),
        b.registry.len()
    );

    BuiltCard {
        scene: b.scene,
        handles: CardHandles {
            card,
            front,
            back,
            glow,
            particles,
            decorations,
        },
        registry: b.registry,
        report: b.report,
    }
}

impl<R: Rng> Builder<'_, R> {
    fn missing(&mut self, feature: &'static str) {
        self.report
            .disabled
            .push(CardError::ConfigMissingFeature(feature));
    }

    fn lights(&mut self) {
        let white = Vec3::ONE;
        self.scene.lights = vec![
            Light {
                kind: LightKind::Ambient,
                color: white,
                intensity: 0.4,
                position: Vec3::ZERO,
            },
            Light {
                kind: LightKind::Directional,
                color: white,
                intensity: 0.8,
                position: Vec3::new(5.0, 10.0, 7.0),
            },
            Light {
                kind: LightKind::Point { range: 20.0 },
                color: self.primary,
                intensity: 0.5,
                position: Vec3::new(-5.0, 3.0, 5.0),
            },
            Light {
                kind: LightKind::Point { range: 20.0 },
                color: self.secondary,
                intensity: 0.3,
                position: Vec3::new(5.0, -3.0, 5.0),
            },
            Light {
                kind: LightKind::Directional,
                color: white,
                intensity: 0.3,
                position: Vec3::new(0.0, 0.0, -10.0),
            },
        ];
    }

    fn card_body(&mut self, card: NodeId) {
        let s = &self.config.card_style;
        let (width, height, depth) = (s.width, s.height, s.depth);
        let body = Visual::new(
            Geometry::Box {
                width,
                height,
                depth,
            },
            Material::physical(s.card_color.to_rgb(), 0.1, 0.4, 0.3),
        );
        self.scene
            .add_child(card, Node::mesh("card_body", Transform::default(), body));
        let border = Visual::new(
            Geometry::BoxEdges {
                width,
                height,
                depth,
            },
            Material::line(self.primary),
        );
        self.scene
            .add_child(card, Node::mesh("card_border", Transform::default(), border));
    }

    fn text_node(&self, name: &str, label: &str, style: TextStyle, at: Transform) -> Node {
        let [w, h] = TEXT_QUAD_SIZE;
        let material = Material::textured(TextureSource::Text {
            text: label.to_string(),
            font_px: style.font_px,
            bold: style.bold,
            color: style.color.to_string(),
        })
        .double_sided()
        .without_depth_write();
        Node::mesh(
            name,
            at,
            Visual::new(
                Geometry::Plane {
                    width: w,
                    height: h,
                },
                material,
            ),
        )
    }

    fn add_text(
        &mut self,
        parent: NodeId,
        name: &str,
        label: &str,
        style: TextStyle,
        position: Vec3,
        scale: Vec3,
    ) -> NodeId {
        let node = self.text_node(name, label, style, Transform::at(position).with_scale(scale));
        self.scene.add_child(parent, node)
    }

    fn front_face(&mut self, card: NodeId) -> NodeId {
        let z = self.config.card_style.depth / 2.0 + FACE_OFFSET;
        let front = self
            .scene
            .add_child(card, Node::group("front", Transform::at(Vec3::new(0.0, 0.0, z))));

        self.profile_photo(front);

        match self.config.personal_info.clone() {
            Some(info) => {
                let lines = [
                    ("name", info.display_name(), bold(48, "#ffffff"), Vec3::new(1.0, 1.5, TEXT_LIFT), Vec3::new(1.1, 1.1, 1.0)),
                    ("title", info.title.clone(), text(28, "#00d4ff"), Vec3::new(1.0, 0.7, TEXT_LIFT), Vec3::new(1.1, 1.0, 1.0)),
                    ("company", info.company.clone(), text(24, "#aaaaaa"), Vec3::new(1.0, 0.1, TEXT_LIFT), Vec3::new(0.95, 0.85, 1.0)),
                ];
                for (name, value, style, pos, scale) in lines {
                    if let Some(value) = value {
                        self.add_text(front, name, &value, style, pos, scale);
                    }
                }

                let divider = Visual::new(
                    Geometry::Plane {
                        width: 5.0,
                        height: 0.02,
                    },
                    Material::basic(self.primary).with_opacity(0.5),
                );
                self.scene.add_child(
                    front,
                    Node::mesh("divider", Transform::at(Vec3::new(0.5, -0.3, 0.0)), divider),
                );

                let contacts = [
                    ("email", "📧", info.email.clone(), -0.8),
                    ("phone", "📱", info.phone.clone(), -1.3),
                    ("website", "🌐", info.website.clone(), -1.8),
                ];
                for (name, icon, value, y) in contacts {
                    let Some(value) = value else {
                        continue;
                    };
                    self.add_text(
                        front,
                        &format!("{name}_icon"),
                        icon,
                        text(24, "#ffffff"),
                        Vec3::new(-3.2, y, TEXT_LIFT),
                        Vec3::new(0.22, 0.85, 1.0),
                    );
                    let node = self
                        .text_node(
                            name,
                            &value,
                            text(20, "#cccccc"),
                            Transform::at(Vec3::new(0.5, y, TEXT_LIFT))
                                .with_scale(Vec3::new(1.1, 0.75, 1.0)),
                        )
                        .with_metadata(
                            InteractionMetadata::new(
                                InteractionKind::Contact,
                                format!("Click to copy: {value}"),
                            )
                            .with("field", name)
                            .with("value", value.clone()),
                        );
                    let id = self.scene.add_child(front, node);
                    self.registry.register(id);
                }
            }
            None => self.missing("personalInfo"),
        }

        self.social_icons(front);
        front
    }

    fn profile_photo(&mut self, front: NodeId) {
        let Some(photo) = self.config.profile_photo().cloned() else {
            self.missing("interactiveElements.profilePhoto");
            return;
        };
        let size = photo.size;
        let texture = match photo.image() {
            Some(url) => TextureSource::Image {
                url: url.to_string(),
            },
            None => TextureSource::Badge {
                label: "👤".to_string(),
                size_px: (size * 100.0) as u32,
            },
        };
        let position = Vec3::new(-2.5, 1.0, 0.0);
        let disc = Visual::new(
            Geometry::Circle {
                radius: size,
                segments: 32,
            },
            Material::textured(texture),
        );
        let id = self.scene.add_child(
            front,
            Node::mesh("profile_photo", Transform::at(position), disc).with_metadata(
                InteractionMetadata::new(
                    InteractionKind::Profile,
                    "Profile Photo - Click to customize",
                ),
            ),
        );
        self.registry.register(id);

        let border = Visual::new(
            Geometry::Ring {
                inner: size,
                outer: size + 0.08,
                segments: 32,
            },
            Material::basic(self.primary).double_sided(),
        );
        self.scene.add_child(
            front,
            Node::mesh("profile_border", Transform::at(position), border),
        );
    }

    fn social_icons(&mut self, front: NodeId) {
        let Some(links) = self.config.social_links.clone() else {
            self.missing("socialLinks");
            return;
        };
        let urls = [links.linkedin, links.github, links.twitter, links.portfolio];
        for (index, (icon, url)) in SOCIAL_ICONS.iter().zip(urls).enumerate() {
            let Some(url) = url else {
                continue;
            };
            let group = Node::group(
                format!("social_{}", icon.name.to_lowercase()),
                Transform::at(Vec3::new(-2.8 + index as f32 * 0.9, -2.3, 0.0)),
            )
            .with_metadata(
                InteractionMetadata::new(
                    InteractionKind::Social,
                    format!("{} - Click to visit", icon.name),
                )
                .with("name", icon.name)
                .with("url", url),
            );
            let gid = self.scene.add_child(front, group);

            let bg = Visual::new(
                Geometry::Circle {
                    radius: 0.35,
                    segments: 32,
                },
                Material::basic(HexColor(icon.color).to_rgb()).with_opacity(0.8),
            );
            self.scene
                .add_child(gid, Node::mesh("social_bg", Transform::default(), bg));
            self.add_text(
                gid,
                "social_symbol",
                icon.symbol,
                text(24, "#ffffff"),
                Vec3::new(0.0, 0.0, 0.02),
                Vec3::new(0.15, 0.55, 1.0),
            );
            self.registry.register(gid);
        }
    }

    fn back_face(&mut self, card: NodeId) -> NodeId {
        let z = -(self.config.card_style.depth / 2.0 + FACE_OFFSET);
        let back = self.scene.add_child(
            card,
            Node::group(
                "back",
                Transform::at(Vec3::new(0.0, 0.0, z)).with_rotation(Vec3::new(0.0, PI, 0.0)),
            ),
        );

        self.qr_code(back);

        match self.config.additional_info.clone() {
            Some(info) => {
                if let Some(tagline) = &info.tagline {
                    self.add_text(back, "tagline", tagline, bold(28, "#ffffff"), Vec3::new(-1.0, 2.0, TEXT_LIFT), Vec3::new(1.4, 1.0, 1.0));
                }
                if let Some(bio) = &info.bio {
                    self.add_text(back, "bio", bio, text(16, "#aaaaaa"), Vec3::new(-1.0, -1.8, TEXT_LIFT), Vec3::new(1.4, 1.1, 1.0));
                }
            }
            None => self.missing("additionalInfo"),
        }

        match self.config.skills.clone() {
            Some(skills) if !skills.is_empty() => {
                self.add_text(
                    back,
                    "skills_title",
                    "Skills & Expertise",
                    text(22, "#00d4ff"),
                    Vec3::new(-1.5, 1.2, TEXT_LIFT),
                    Vec3::new(0.9, 0.7, 1.0),
                );
                for (index, skill) in skills.iter().enumerate() {
                    let (row, col) = ((index / 2) as f32, (index % 2) as f32);
                    self.skill_tag(back, skill, Vec3::new(-2.5 + col * 2.2, 0.5 - row * 0.6, 0.0));
                }
            }
            _ => self.missing("skills"),
        }

        self.logo(back);
        back
    }

    fn skill_tag(&mut self, back: NodeId, skill: &str, position: Vec3) {
        let tag = self
            .scene
            .add_child(back, Node::group("skill_tag", Transform::at(position)));
        let (width, height) = (1.8, 0.4);
        let bg = Visual::new(
            Geometry::Plane { width, height },
            Material::basic(self.primary).with_opacity(0.2),
        );
        self.scene
            .add_child(tag, Node::mesh("skill_bg", Transform::default(), bg));
        let edges = Visual::new(
            Geometry::PlaneEdges { width, height },
            Material::line(self.primary).with_opacity(0.5),
        );
        self.scene
            .add_child(tag, Node::mesh("skill_border", Transform::default(), edges));
        self.add_text(
            tag,
            "skill_text",
            skill,
            text(18, "#ffffff"),
            Vec3::new(0.0, 0.0, 0.02),
            Vec3::new(0.55, 0.5, 1.0),
        );
    }

    fn qr_code(&mut self, back: NodeId) {
        let Some(qr) = self.config.qr_code().cloned() else {
            self.missing("interactiveElements.qrCode");
            return;
        };
        let material = if qr.placeholder {
            Material::textured(TextureSource::QrPattern {
                size_px: (qr.size * 100.0) as u32,
                seed: self.rng.gen(),
            })
        } else {
            Material::basic(Vec3::ONE)
        };
        let plane = Visual::new(
            Geometry::Plane {
                width: qr.size * 2.0,
                height: qr.size * 2.0,
            },
            material,
        );
        let id = self.scene.add_child(
            back,
            Node::mesh("qr_code", Transform::at(Vec3::new(2.5, 0.0, 0.0)), plane).with_metadata(
                InteractionMetadata::new(InteractionKind::QrCode, "QR Code - Scan for contact info"),
            ),
        );
        self.registry.register(id);
        self.add_text(
            back,
            "qr_label",
            "Scan Me!",
            text(18, "#00d4ff"),
            Vec3::new(2.5, -1.8, TEXT_LIFT),
            Vec3::new(0.6, 0.55, 1.0),
        );
    }

    fn logo(&mut self, back: NodeId) {
        let Some(logo) = self.config.logo().cloned() else {
            self.missing("interactiveElements.logo");
            return;
        };
        let plane = Visual::new(
            Geometry::Plane {
                width: logo.size * 2.0,
                height: logo.size,
            },
            Material::textured(TextureSource::Badge {
                label: "LOGO".to_string(),
                size_px: (logo.size * 80.0) as u32,
            }),
        );
        let id = self.scene.add_child(
            back,
            Node::mesh("logo", Transform::at(Vec3::new(-2.5, -2.2, 0.0)), plane).with_metadata(
                InteractionMetadata::new(InteractionKind::Logo, "Company Logo - Click to customize"),
            ),
        );
        self.registry.register(id);
    }

    /// Floating shapes (scene level) and the glow plane (inside the card).
    fn decorations(&mut self, card: NodeId) -> (Vec<NodeId>, Option<NodeId>) {
        let deco = self.config.decorations();
        let mut floating = Vec::new();
        if deco.floating_icons {
            let shapes = [
                (Geometry::Tetrahedron { radius: 0.2 }, Vec3::new(4.0, 2.5, 2.0)),
                (Geometry::Octahedron { radius: 0.15 }, Vec3::new(-4.0, -2.0, 2.0)),
                (Geometry::Icosahedron { radius: 0.18 }, Vec3::new(4.5, -2.5, 1.5)),
                (
                    Geometry::Torus {
                        radius: 0.15,
                        tube: 0.05,
                        radial_segments: 8,
                        tubular_segments: 16,
                    },
                    Vec3::new(-4.5, 2.0, 1.0),
                ),
            ];
            for (index, (geometry, position)) in shapes.into_iter().enumerate() {
                let material = Material::physical(self.primary, 0.8, 0.2, 0.0).with_opacity(0.7);
                let motion = FloatMotion {
                    float_offset: index as f32 * 0.5,
                    rotation_speed: 0.01 + self.rng.gen::<f32>() * 0.02,
                };
                let node = Node::mesh(
                    format!("decoration_{index}"),
                    Transform::at(position),
                    Visual::new(geometry, material),
                )
                .with_motion(motion);
                floating.push(self.scene.add(node));
            }
        } else {
            self.missing("decorations.floatingIcons");
        }

        let glow = if deco.glow_effects {
            let [width, height] = GLOW_SIZE;
            let plane = Visual::new(
                Geometry::Plane { width, height },
                Material::glow(self.primary, self.secondary),
            );
            let node = Node::mesh("glow", Transform::at(Vec3::new(0.0, 0.0, GLOW_Z)), plane)
                .with_metadata(InteractionMetadata::new(InteractionKind::Decoration, "glow"));
            Some(self.scene.add_child(card, node))
        } else {
            self.missing("decorations.glowEffects");
            None
        };
        (floating, glow)
    }

    fn particles(&mut self) -> Option<NodeId> {
        if !self.config.decorations().particles {
            self.missing("decorations.particles");
            return None;
        }
        let field = ParticleField::standard(self.primary, self.secondary, self.rng);
        let visual = Visual::new(
            Geometry::Points {
                positions: field.positions,
                colors: field.colors,
                size: PARTICLE_SIZE,
            },
            Material::points(PARTICLE_OPACITY),
        );
        Some(
            self.scene
                .add(Node::mesh("particles", Transform::default(), visual)),
        )
    }
}
