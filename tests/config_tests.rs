// Configuration parsing: colour forms, optional sections and defaults.

use card_web::config::{CardConfig, Decorations, HexColor};

#[test]
fn bundled_config_parses_with_every_section() {
    let config = CardConfig::bundled().unwrap();
    let info = config.personal_info.as_ref().unwrap();
    assert_eq!(info.display_name().as_deref(), Some("ANTHONY MURACCIOLI"));
    assert_eq!(config.card_style.width, 8.5);
    assert_eq!(config.card_style.primary_color, HexColor(0x00d4ff));
    assert_eq!(config.skills.as_ref().map(Vec::len), Some(5));
    assert!(config.profile_photo().is_some());
    assert!(config.qr_code().is_some());
    assert!(config.logo().is_some());
    let deco = config.decorations();
    assert!(deco.particles && deco.floating_icons && deco.glow_effects);
    assert_eq!(config.animation_settings().flip_duration, 1000.0);
    assert!(!config.interactions.open_social_links);
}

#[test]
fn colours_accept_numbers_and_hex_strings() {
    let json = r##"{ "cardStyle": { "primaryColor": 65535, "secondaryColor": "#0099cc", "cardColor": "1a1a2e" } }"##;
    let config = CardConfig::from_json_str(json).unwrap();
    assert_eq!(config.card_style.primary_color, HexColor(0x00ffff));
    assert_eq!(config.card_style.secondary_color, HexColor(0x0099cc));
    assert_eq!(config.card_style.card_color, HexColor(0x1a1a2e));
    // Unspecified geometry keeps its defaults.
    assert_eq!(config.card_style.height, 5.5);
}

#[test]
fn invalid_colours_are_rejected() {
    assert!(HexColor::parse("#12345").is_err());
    assert!(HexColor::parse("#zzzzzz").is_err());
    assert!(CardConfig::from_json_str(r#"{ "cardStyle": { "primaryColor": 16777216 } }"#).is_err());
}

#[test]
fn colour_channels_and_css() {
    let c = HexColor(0xff8000);
    let rgb = c.to_rgb();
    assert_eq!(rgb.x, 1.0);
    assert!((rgb.y - 128.0 / 255.0).abs() < 1e-6);
    assert_eq!(rgb.z, 0.0);
    assert_eq!(c.to_css(), "#ff8000");
}

#[test]
fn missing_sections_are_none_not_errors() {
    let config = CardConfig::from_json_str("{}").unwrap();
    assert!(config.personal_info.is_none());
    assert!(config.social_links.is_none());
    assert!(config.skills.is_none());
    assert!(config.profile_photo().is_none());
    assert_eq!(config.decorations(), Decorations::default());
    // Without an animations section the idle float is off but timings remain.
    let anim = config.animation_settings();
    assert!(!anim.float_animation);
    assert_eq!(anim.flip_duration, 1000.0);
}

#[test]
fn disabled_elements_read_as_absent() {
    let json = r#"{ "interactiveElements": { "qrCode": { "enabled": false }, "logo": {} } }"#;
    let config = CardConfig::from_json_str(json).unwrap();
    assert!(config.qr_code().is_none());
    let logo = config.logo().unwrap();
    assert_eq!(logo.size, 0.6);
}

#[test]
fn display_name_prefers_full_name() {
    let json = r#"{ "personalInfo": { "name": "Ada Lovelace", "firstName": "A", "surname": "L" } }"#;
    let config = CardConfig::from_json_str(json).unwrap();
    let info = config.personal_info.unwrap();
    assert_eq!(info.display_name().as_deref(), Some("Ada Lovelace"));

    let json = r#"{ "personalInfo": { "surname": "Lovelace" } }"#;
    let info = CardConfig::from_json_str(json).unwrap().personal_info.unwrap();
    assert_eq!(info.display_name().as_deref(), Some("Lovelace"));
}

#[test]
fn profile_photo_image_url_respects_placeholder() {
    let json = r#"{ "interactiveElements": { "profilePhoto": { "placeholder": true, "imageUrl": "me.png" } } }"#;
    let config = CardConfig::from_json_str(json).unwrap();
    assert_eq!(config.profile_photo().unwrap().image(), None);

    let config = CardConfig::bundled().unwrap();
    assert_eq!(config.profile_photo().unwrap().image(), Some("./img/logo.png"));
}
