//! Declarative card configuration.
//!
//! Mirrors the `CARD_CONFIG` object a page can define before the module
//! loads. Every top-level section except `cardStyle` is optional; a missing
//! section switches the matching feature off instead of failing start-up.

use crate::error::ConfigError;
use glam::Vec3;
use serde::Deserialize;

pub static BUNDLED_CONFIG_JSON: &str = include_str!("../assets/card_config.json");

/// 24-bit RGB colour, written either as a JSON number (`0x00d4ff` in JS) or
/// as a `"#rrggbb"` string.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Deserialize)]
#[serde(try_from = "ColorRepr")]
pub struct HexColor(pub u32);

#[derive(Deserialize)]
#[serde(untagged)]
enum ColorRepr {
    Int(u32),
    Text(String),
}

impl TryFrom<ColorRepr> for HexColor {
    type Error = ConfigError;

    fn try_from(value: ColorRepr) -> Result<Self, Self::Error> {
        match value {
            ColorRepr::Int(v) if v <= 0xff_ffff => Ok(HexColor(v)),
            ColorRepr::Int(v) => Err(ConfigError::Color(format!("{v:#x}"))),
            ColorRepr::Text(s) => HexColor::parse(&s),
        }
    }
}

impl HexColor {
    pub fn parse(text: &str) -> Result<Self, ConfigError> {
        let digits = text
            .strip_prefix('#')
            .or_else(|| text.strip_prefix("0x"))
            .unwrap_or(text);
        if digits.len() != 6 {
            return Err(ConfigError::Color(text.to_string()));
        }
        u32::from_str_radix(digits, 16)
            .map(HexColor)
            .map_err(|_| ConfigError::Color(text.to_string()))
    }

    /// Channels in 0..=1.
    pub fn to_rgb(self) -> Vec3 {
        let r = ((self.0 >> 16) & 0xff) as f32 / 255.0;
        let g = ((self.0 >> 8) & 0xff) as f32 / 255.0;
        let b = (self.0 & 0xff) as f32 / 255.0;
        Vec3::new(r, g, b)
    }

    pub fn to_css(self) -> String {
        format!("#{:06x}", self.0)
    }
}

#[derive(Clone, Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CardConfig {
    pub personal_info: Option<PersonalInfo>,
    pub social_links: Option<SocialLinks>,
    #[serde(default)]
    pub card_style: CardStyle,
    pub interactive_elements: Option<InteractiveElements>,
    pub animations: Option<Animations>,
    pub skills: Option<Vec<String>>,
    pub additional_info: Option<AdditionalInfo>,
    #[serde(default)]
    pub interactions: InteractionSettings,
}

#[derive(Clone, Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PersonalInfo {
    pub name: Option<String>,
    pub first_name: Option<String>,
    pub surname: Option<String>,
    pub title: Option<String>,
    pub company: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub website: Option<String>,
}

impl PersonalInfo {
    /// `name` wins; otherwise first name and surname joined by a space.
    pub fn display_name(&self) -> Option<String> {
        if let Some(name) = &self.name {
            return Some(name.clone());
        }
        let parts: Vec<&str> = [self.first_name.as_deref(), self.surname.as_deref()]
            .into_iter()
            .flatten()
            .filter(|s| !s.is_empty())
            .collect();
        (!parts.is_empty()).then(|| parts.join(" "))
    }
}

#[derive(Clone, Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SocialLinks {
    pub linkedin: Option<String>,
    pub github: Option<String>,
    pub twitter: Option<String>,
    pub portfolio: Option<String>,
}

#[derive(Clone, Debug, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct CardStyle {
    pub width: f32,
    pub height: f32,
    pub depth: f32,
    pub primary_color: HexColor,
    pub secondary_color: HexColor,
    pub card_color: HexColor,
}

impl Default for CardStyle {
    fn default() -> Self {
        Self {
            width: 8.5,
            height: 5.5,
            depth: 0.15,
            primary_color: HexColor(0x00d4ff),
            secondary_color: HexColor(0x0099cc),
            card_color: HexColor(0x1a1a2e),
        }
    }
}

#[derive(Clone, Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InteractiveElements {
    pub profile_photo: Option<ProfilePhoto>,
    pub qr_code: Option<QrCode>,
    pub logo: Option<Logo>,
    pub decorations: Option<Decorations>,
}

fn yes() -> bool {
    true
}

#[derive(Clone, Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProfilePhoto {
    #[serde(default = "yes")]
    pub enabled: bool,
    #[serde(default)]
    pub placeholder: bool,
    pub image_url: Option<String>,
    #[serde(default = "ProfilePhoto::default_size")]
    pub size: f32,
}

impl ProfilePhoto {
    fn default_size() -> f32 {
        1.6
    }

    /// The image to load, if any. Without a URL the placeholder is drawn.
    pub fn image(&self) -> Option<&str> {
        if self.placeholder {
            return None;
        }
        self.image_url.as_deref().filter(|u| !u.is_empty())
    }
}

#[derive(Clone, Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QrCode {
    #[serde(default = "yes")]
    pub enabled: bool,
    #[serde(default = "yes")]
    pub placeholder: bool,
    #[serde(default = "QrCode::default_size")]
    pub size: f32,
}

impl QrCode {
    fn default_size() -> f32 {
        1.2
    }
}

#[derive(Clone, Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Logo {
    #[serde(default = "yes")]
    pub enabled: bool,
    #[serde(default = "Logo::default_size")]
    pub size: f32,
}

impl Logo {
    fn default_size() -> f32 {
        0.6
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Decorations {
    pub particles: bool,
    pub floating_icons: bool,
    pub glow_effects: bool,
}

#[derive(Clone, Copy, Debug, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Animations {
    pub auto_rotate_speed: f32,
    pub float_animation: bool,
    pub float_speed: f32,
    pub float_amplitude: f32,
    /// Milliseconds.
    pub flip_duration: f32,
}

impl Default for Animations {
    fn default() -> Self {
        Self {
            auto_rotate_speed: 0.5,
            float_animation: true,
            float_speed: 0.001,
            float_amplitude: 0.1,
            flip_duration: 1000.0,
        }
    }
}

impl Animations {
    /// Settings used when the `animations` section is absent: timings keep
    /// their defaults so buttons still work, the idle float is off.
    pub fn disabled() -> Self {
        Self {
            float_animation: false,
            ..Self::default()
        }
    }
}

#[derive(Clone, Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AdditionalInfo {
    pub tagline: Option<String>,
    pub bio: Option<String>,
}

#[derive(Clone, Copy, Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct InteractionSettings {
    /// Navigate to social links on click. Off by default: clicks only notify.
    pub open_social_links: bool,
}

impl CardConfig {
    pub fn from_json_str(json: &str) -> Result<Self, ConfigError> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn bundled() -> Result<Self, ConfigError> {
        Self::from_json_str(BUNDLED_CONFIG_JSON)
    }

    pub fn profile_photo(&self) -> Option<&ProfilePhoto> {
        self.interactive_elements
            .as_ref()
            .and_then(|ie| ie.profile_photo.as_ref())
            .filter(|p| p.enabled)
    }

    pub fn qr_code(&self) -> Option<&QrCode> {
        self.interactive_elements
            .as_ref()
            .and_then(|ie| ie.qr_code.as_ref())
            .filter(|q| q.enabled)
    }

    pub fn logo(&self) -> Option<&Logo> {
        self.interactive_elements
            .as_ref()
            .and_then(|ie| ie.logo.as_ref())
            .filter(|l| l.enabled)
    }

    pub fn decorations(&self) -> Decorations {
        self.interactive_elements
            .as_ref()
            .and_then(|ie| ie.decorations)
            .unwrap_or_default()
    }

    pub fn animation_settings(&self) -> Animations {
        self.animations.unwrap_or_else(Animations::disabled)
    }
}
