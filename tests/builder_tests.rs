// Card construction: feature switches, registry contents and face layout.

mod common;

use card_web::builder::build_card;
use card_web::config::CardConfig;
use card_web::error::CardError;
use card_web::scene::{InteractionKind, MaterialKind, TextureSource};
use rand::rngs::StdRng;
use rand::SeedableRng;
use std::f32::consts::PI;

fn rng() -> StdRng {
    StdRng::seed_from_u64(11)
}

#[test]
fn bundled_card_registers_every_interactive_element() {
    let built = build_card(&common::bundled(), &mut rng());
    // profile + 3 contacts + 4 socials + qr + logo
    assert_eq!(built.registry.len(), 10);
    assert!(built.report.disabled.is_empty(), "{:?}", built.report.disabled);

    let kinds: Vec<InteractionKind> = built
        .registry
        .roots()
        .iter()
        .filter_map(|id| built.scene.get(*id)?.metadata.as_ref().map(|m| m.kind))
        .collect();
    assert_eq!(kinds.len(), 10);
    assert_eq!(kinds.iter().filter(|k| **k == InteractionKind::Social).count(), 4);
    assert_eq!(kinds.iter().filter(|k| **k == InteractionKind::Contact).count(), 3);
    assert!(!kinds.contains(&InteractionKind::Decoration));
}

#[test]
fn disabling_only_the_qr_code_drops_just_that_element() {
    let mut config = common::bundled();
    config
        .interactive_elements
        .as_mut()
        .and_then(|ie| ie.qr_code.as_mut())
        .expect("bundled config has a qr code")
        .enabled = false;
    let built = build_card(&config, &mut rng());

    assert!(built.scene.find_by_name("qr_code").is_none());
    assert_eq!(built.registry.len(), 9);
    assert!(built.report.is_disabled("interactiveElements.qrCode"));
    assert_eq!(built.report.disabled.len(), 1, "{:?}", built.report.disabled);
    assert!(built.scene.find_by_name("logo").is_some());
}

#[test]
fn empty_config_builds_bare_card_and_reports_every_gap() {
    let built = build_card(&CardConfig::default(), &mut rng());
    assert!(built.registry.is_empty());
    assert!(built.handles.glow.is_none());
    assert!(built.handles.particles.is_none());
    assert!(built.handles.decorations.is_empty());

    for feature in [
        "personalInfo",
        "socialLinks",
        "additionalInfo",
        "skills",
        "interactiveElements.profilePhoto",
        "interactiveElements.qrCode",
        "interactiveElements.logo",
        "decorations.floatingIcons",
        "decorations.glowEffects",
        "decorations.particles",
    ] {
        assert!(built.report.is_disabled(feature), "{feature} not reported");
    }
    assert!(built
        .report
        .disabled
        .iter()
        .all(|e| matches!(e, CardError::ConfigMissingFeature(_))));

    // Card body, border and the two (empty) faces still exist.
    for name in ["card", "card_body", "card_border", "front", "back"] {
        assert!(built.scene.find_by_name(name).is_some(), "{name}");
    }
    assert!(built.scene.find_by_name("name").is_none());
}

#[test]
fn back_face_is_turned_half_way_round() {
    let built = build_card(&common::bundled(), &mut rng());
    let back = built.scene.transform(built.handles.back);
    assert!((back.rotation.y - PI).abs() < 1e-6);
    assert!(back.position.z < 0.0);
    let front = built.scene.transform(built.handles.front);
    assert_eq!(front.rotation.y, 0.0);
    assert!(front.position.z > 0.0);
}

#[test]
fn contact_and_social_payloads() {
    let built = build_card(&common::bundled(), &mut rng());
    let email = built.scene.find_by_name("email").unwrap();
    let meta = built.scene.get(email).unwrap().metadata.as_ref().unwrap();
    assert_eq!(meta.kind, InteractionKind::Contact);
    assert_eq!(meta.get("field"), Some("email"));
    assert_eq!(meta.get("value"), Some("muraccioli.anthony@gmail.com"));
    assert_eq!(meta.tooltip, "Click to copy: muraccioli.anthony@gmail.com");

    let portfolio = built.scene.find_by_name("social_portfolio").unwrap();
    let meta = built.scene.get(portfolio).unwrap().metadata.as_ref().unwrap();
    assert_eq!(meta.get("name"), Some("Portfolio"));
    assert_eq!(meta.get("url"), Some("https://darymura.net"));
    // Metadata sits on the group; its quads carry none.
    for child in &built.scene.get(portfolio).unwrap().children {
        assert!(built.scene.get(*child).unwrap().metadata.is_none());
    }
}

#[test]
fn skills_lay_out_on_two_columns() {
    let built = build_card(&common::bundled(), &mut rng());
    let tags: Vec<_> = built
        .scene
        .get(built.handles.back)
        .unwrap()
        .children
        .iter()
        .copied()
        .filter(|id| built.scene.get(*id).unwrap().name == "skill_tag")
        .collect();
    assert_eq!(tags.len(), 5);
    let p: Vec<_> = tags.iter().map(|id| built.scene.transform(*id).position).collect();
    assert_eq!(p[0].y, p[1].y);
    assert!(p[1].x > p[0].x);
    assert!(p[2].y < p[0].y);
    assert_eq!(p[2].x, p[0].x);
}

#[test]
fn placeholders_pick_their_textures() {
    let built = build_card(&common::bundled(), &mut rng());
    let texture = |name: &str| {
        let id = built.scene.find_by_name(name).unwrap();
        built.scene.get(id).unwrap().visual.as_ref().unwrap().material.texture.clone()
    };
    assert!(matches!(texture("qr_code"), Some(TextureSource::QrPattern { .. })));
    assert!(matches!(texture("profile_photo"), Some(TextureSource::Image { ref url }) if url == "./img/logo.png"));
    assert!(matches!(texture("logo"), Some(TextureSource::Badge { ref label, .. }) if label == "LOGO"));
}

#[test]
fn glow_and_decorations_follow_switches() {
    let built = build_card(&common::bundled(), &mut rng());
    let glow = built.handles.glow.unwrap();
    let glow_node = built.scene.get(glow).unwrap();
    assert_eq!(glow_node.parent, Some(built.handles.card));
    assert!(matches!(glow_node.visual.as_ref().unwrap().material.kind, MaterialKind::Glow { .. }));
    assert!(!built.registry.contains(glow));

    assert_eq!(built.handles.decorations.len(), 4);
    for (i, id) in built.handles.decorations.iter().enumerate() {
        let node = built.scene.get(*id).unwrap();
        assert!(node.parent.is_none());
        let motion = node.motion.unwrap();
        assert_eq!(motion.float_offset, i as f32 * 0.5);
        assert!((0.01..0.03).contains(&motion.rotation_speed));
    }
}

#[test]
fn same_seed_builds_the_same_card() {
    let a = build_card(&common::bundled(), &mut StdRng::seed_from_u64(3));
    let b = build_card(&common::bundled(), &mut StdRng::seed_from_u64(3));
    assert_eq!(a.handles, b.handles);
    let walk = a.scene.walk();
    assert_eq!(walk, b.scene.walk());
    for id in walk {
        assert_eq!(a.scene.get(id).unwrap().motion, b.scene.get(id).unwrap().motion);
    }
}
