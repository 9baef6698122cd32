//! Contract Invariant Tests
//!
//! These tests verify the non-negotiable guarantees.

use std::io::Write;

use fodmapp_images::{
    resolve, ConfigSource, EnvConvention, EnvSnapshot, EnvSource, GlobalImages, RenderOutput,
    RenderState, Resolver, Slot, SmartImage, SourceKind,
};

fn full_env(slot: Slot) -> EnvSnapshot {
    EnvSnapshot::new()
        .with(EnvConvention::Primary.key_for(slot), "primary.png")
        .with(EnvConvention::AltPrefixA.key_for(slot), "alt-a.png")
        .with(EnvConvention::AltPrefixB.key_for(slot), "alt-b.png")
}

#[test]
fn invariant_global_object_wins() {
    let global = GlobalImages::new().with(Slot::Front, "a.png");
    let resolver = Resolver::standard(Some(global), EnvSnapshot::new());

    assert_eq!(resolver.resolve(Slot::Front).as_str(), "a.png");
}

#[test]
fn invariant_only_alt_prefix_b_set() {
    let env = EnvSnapshot::new().with("NEXT_PUBLIC_FODMAPP_CHAT", "b.png");
    let resolver = Resolver::standard(None, env);

    let resolution = resolver.resolve_traced(Slot::Chat);
    assert_eq!(resolution.reference.as_str(), "b.png");
    assert_eq!(resolution.source, SourceKind::AltPrefixB);
}

#[test]
fn invariant_nothing_configured_yields_default() {
    let resolver = Resolver::standard(Some(GlobalImages::new()), EnvSnapshot::new());

    let reference = resolver.resolve(Slot::Camera);
    assert_eq!(reference.as_str(), Slot::Camera.default_reference());
    assert!(!reference.as_str().is_empty());
}

#[test]
fn invariant_precedence_order_for_every_slot() {
    for slot in Slot::ALL {
        // Peel sources off from the top; the next one down must take over.
        let global = GlobalImages::new().with(slot, "global.png");
        let all = Resolver::standard(Some(global), full_env(slot));
        assert_eq!(all.resolve(slot).as_str(), "global.png");

        let no_global = Resolver::standard(None, full_env(slot));
        assert_eq!(no_global.resolve(slot).as_str(), "primary.png");

        let env = EnvSnapshot::new()
            .with(EnvConvention::AltPrefixA.key_for(slot), "alt-a.png")
            .with(EnvConvention::AltPrefixB.key_for(slot), "alt-b.png");
        assert_eq!(Resolver::standard(None, env).resolve(slot).as_str(), "alt-a.png");

        let env = EnvSnapshot::new().with(EnvConvention::AltPrefixB.key_for(slot), "alt-b.png");
        assert_eq!(Resolver::standard(None, env).resolve(slot).as_str(), "alt-b.png");

        assert_eq!(
            Resolver::standard(None, EnvSnapshot::new()).resolve(slot).as_str(),
            slot.default_reference()
        );
    }
}

#[test]
fn invariant_other_slots_do_not_leak() {
    let global = GlobalImages::new().with(Slot::Front, "front.png");
    let env = EnvSnapshot::new().with("VITE_FODMAPP_CHAT", "chat.png");
    let resolver = Resolver::standard(Some(global), env);

    assert_eq!(resolver.resolve(Slot::Chat).as_str(), "chat.png");
    assert_eq!(resolver.resolve(Slot::Camera).as_str(), Slot::Camera.default_reference());
}

#[test]
fn invariant_resolution_deterministic() {
    let resolver = Resolver::standard(
        Some(GlobalImages::new().with(Slot::Chat, "c.png")),
        full_env(Slot::Front),
    );

    assert_eq!(resolver.resolve_all(), resolver.resolve_all());
    for slot in Slot::ALL {
        assert_eq!(resolver.resolve(slot), resolver.resolve(slot));
    }
}

#[test]
fn invariant_free_resolve_matches_resolver() {
    let global = GlobalImages::new().with(Slot::Camera, "");
    let env = full_env(Slot::Camera);
    let sources: Vec<Box<dyn ConfigSource>> = vec![
        Box::new(global.clone()),
        Box::new(EnvSource::new(EnvConvention::Primary, env.clone())),
        Box::new(EnvSource::new(EnvConvention::AltPrefixA, env.clone())),
        Box::new(EnvSource::new(EnvConvention::AltPrefixB, env.clone())),
    ];
    let borrowed: Vec<&dyn ConfigSource> = sources.iter().map(|s| &**s).collect();

    assert_eq!(
        resolve(Slot::Camera, &borrowed),
        Resolver::standard(Some(global), env).resolve(Slot::Camera)
    );
}

#[test]
fn invariant_present_reference_renders_image() {
    let mut image = SmartImage::mount(Some("x.png"), "Chat view");

    let output = image.render();
    assert!(!output.is_placeholder());
    assert!(output.to_html().contains(r#"loading="lazy""#));
}

#[test]
fn invariant_absent_reference_renders_labelled_placeholder() {
    let mut image = SmartImage::mount(None::<String>, "Front page");

    match image.render() {
        RenderOutput::Placeholder { aria_label, .. } => {
            assert!(aria_label.contains("Front page"));
        }
        other => panic!("expected placeholder, got {:?}", other),
    }
}

#[test]
fn invariant_failure_is_permanent_for_instance() {
    let mut image = SmartImage::mount(Some("x.png"), "Chat view");
    assert!(!image.render().is_placeholder());

    let detector = image.load_failure().unwrap();
    detector.fire();

    let output = image.render();
    assert!(output.is_placeholder());
    assert!(output.to_html().contains("Image missing: Chat view"));

    // Second firing changes nothing
    detector.fire();
    assert_eq!(image.state(), RenderState::Failed);
    assert!(image.render().is_placeholder());
    assert!(image.render().is_placeholder());
}

#[test]
fn invariant_fresh_mount_recovers() {
    let mut first = SmartImage::mount(Some("x.png"), "Camera");
    first.render();
    first.load_failure().unwrap().fire();
    assert!(first.render().is_placeholder());
    first.unmount();

    let mut second = SmartImage::mount(Some("x.png"), "Camera");
    assert_eq!(second.state(), RenderState::Pending);
    assert!(!second.render().is_placeholder());
}

#[test]
fn invariant_instances_do_not_share_state() {
    let mut a = SmartImage::mount(Some("x.png"), "Chat view");
    let mut b = SmartImage::mount(Some("x.png"), "Chat view");
    a.render();
    b.render();

    a.load_failure().unwrap().fire();

    assert_eq!(a.state(), RenderState::Failed);
    assert_eq!(b.state(), RenderState::Displaying);
    assert!(a.render().is_placeholder());
    assert!(!b.needs_render());
    assert!(!b.render().is_placeholder());
}

#[test]
fn invariant_global_keys_are_exact_slot_names() {
    let global = GlobalImages::from_json_str(r#"{"FRONT": "x.png", " front ": "y.png"}"#).unwrap();
    let env = EnvSnapshot::new().with("VITE_FODMAPP_FRONT", "vite.png");
    let resolver = Resolver::standard(Some(global), env);

    let resolution = resolver.resolve_traced(Slot::Front);
    assert_eq!(resolution.reference.as_str(), "vite.png");
    assert_eq!(resolution.source, SourceKind::Primary);
}

#[test]
fn invariant_global_file_feeds_resolver() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    write!(file, r#"{{"front": "/from-file.png", "chat": ""}}"#).unwrap();

    let global = GlobalImages::load_from_file(file.path()).unwrap();
    let env = EnvSnapshot::new().with("REACT_APP_FODMAPP_CHAT", "cra-chat.png");
    let resolver = Resolver::standard(Some(global), env);

    assert_eq!(resolver.resolve(Slot::Front).as_str(), "/from-file.png");
    assert_eq!(resolver.resolve(Slot::Chat).as_str(), "cra-chat.png");
}

#[test]
fn invariant_missing_global_file_is_config_error() {
    let dir = tempfile::tempdir().unwrap();
    let result = GlobalImages::load_from_file(&dir.path().join("images.json"));

    assert!(result.is_err());
    assert!(result.unwrap_err().to_string().contains("Failed to read image config"));
}
