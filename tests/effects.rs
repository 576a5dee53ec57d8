use std::cell::RefCell;
use std::rc::Rc;
use std::time::Duration;

use approx::assert_abs_diff_eq;
use glint::hover;
use glint::loader::LoaderPhase;
use glint::particles::ParticleConfig;
use glint::prelude::*;
use glint::toast::ToastPhase;

fn ms(v: u64) -> Duration {
    Duration::from_millis(v)
}

fn viewport_at(scroll: f32) -> Rect {
    Rect::new(0.0, scroll, 800.0, 600.0)
}

/// No particles, no loader: only what a test sets up itself.
fn quiet() -> EffectsConfig {
    EffectsConfig::default()
        .without_particles()
        .without_loader()
        .seed(7)
}

fn scroll(effects: &mut Effects, y: f32) -> EventResponse {
    effects.handle_event(Event::Scroll {
        viewport: viewport_at(y),
    })
}

fn particles_only(max_live: Option<usize>) -> EffectsConfig {
    let mut particles = ParticleConfig::DEFAULT;
    particles.ambient_probability = 0.0;
    particles.max_live = max_live;
    EffectsConfig::default()
        .without_loader()
        .particles(particles)
        .seed(11)
}

#[test]
fn test_reveal_is_permanent() {
    let mut effects = Effects::new(quiet());
    let card = effects.document_mut().insert(
        None,
        Element::new(Rect::new(0.0, 1000.0, 300.0, 100.0)).capabilities(Capabilities::REVEAL),
    );
    effects.init();

    scroll(&mut effects, 0.0);
    assert!(!effects.is_revealed(card));

    effects.advance_to(ms(100));
    scroll(&mut effects, 700.0);
    assert_eq!(effects.revealed_at(card), Some(ms(100)));
    assert!(effects.document().get(card).unwrap().has_class(class::VISIBLE));

    // Away and back again
    effects.advance_to(ms(500));
    scroll(&mut effects, 0.0);
    effects.advance_to(ms(900));
    scroll(&mut effects, 700.0);
    assert_eq!(effects.revealed_at(card), Some(ms(100)));
    assert!(effects.document().get(card).unwrap().has_class(class::VISIBLE));
}

#[test]
fn test_stagger_children_follow_container() {
    let mut effects = Effects::new(quiet());
    let doc = effects.document_mut();
    let grid = doc.insert(
        None,
        Element::new(Rect::new(0.0, 1000.0, 800.0, 200.0))
            .capabilities(Capabilities::STAGGER_CONTAINER),
    );
    let items: Vec<ElementId> = (0..4)
        .map(|i| {
            doc.insert(
                Some(grid),
                Element::new(Rect::new(i as f32 * 200.0, 1000.0, 180.0, 200.0))
                    .capabilities(Capabilities::STAGGER_ITEM),
            )
        })
        .collect();
    let caption = doc.insert(Some(grid), Element::new(Rect::new(0.0, 1180.0, 800.0, 20.0)));
    effects.init();

    effects.advance_to(ms(250));
    scroll(&mut effects, 700.0);
    let container_at = effects.revealed_at(grid).unwrap();
    assert_eq!(container_at, ms(250));

    // First item goes with the container, the rest wait their turn
    assert!(effects.is_revealed(items[0]));
    assert!(!effects.is_revealed(items[1]));

    effects.advance_by(ms(400));
    let mut previous = None;
    for (i, &item) in items.iter().enumerate() {
        let at = effects.revealed_at(item).unwrap();
        assert_eq!(at, container_at + ms(100) * i as u32);
        if let Some(previous) = previous {
            assert!(at > previous);
        }
        previous = Some(at);
        assert!(effects.document().get(item).unwrap().has_class(class::SLIDE_IN_UP));
    }
    assert!(!effects.is_revealed(caption));
}

#[test]
fn test_burst_creates_twenty_particles_in_range() {
    let mut effects = Effects::new(particles_only(None));
    effects.init();
    effects.advance_to(ms(3800));

    assert_eq!(effects.particles().created_total(), 20);
    assert_eq!(effects.particles().len(), 20);
    for particle in effects.particles().live() {
        assert!((2.0..=6.0).contains(&particle.size));
        assert!((0.1..=0.4).contains(&particle.opacity));
        assert!((0.0..=100.0).contains(&particle.left_percent));
        assert!(particle.lifetime >= Duration::from_secs(10));
        assert!(particle.lifetime <= Duration::from_secs(20));
    }

    effects.advance_to(Duration::from_secs(30));
    assert_eq!(effects.particles().created_total(), 20);
}

#[test]
fn test_particles_removed_at_end_of_lifetime() {
    let mut effects = Effects::new(particles_only(None));
    effects.init();
    effects.advance_to(ms(3800));

    let mut expiries: Vec<(glint::particles::ParticleId, Duration)> = effects
        .particles()
        .live()
        .map(|p| (p.id, p.expires_at()))
        .collect();
    expiries.sort_by_key(|(_, at)| *at);

    for (id, expires_at) in expiries {
        effects.advance_to(expires_at.saturating_sub(ms(1)).max(effects.now()));
        if effects.now() < expires_at {
            assert!(effects.particles().get(id).is_some());
        }
        effects.advance_to(expires_at);
        assert!(effects.particles().get(id).is_none());
    }
    assert!(effects.particles().is_empty());
}

#[test]
fn test_particle_cap_blocks_creation() {
    let mut effects = Effects::new(particles_only(Some(5)));
    effects.init();
    effects.advance_to(ms(3800));

    assert_eq!(effects.particles().len(), 5);
    assert_eq!(effects.particles().created_total(), 5);
    assert_eq!(effects.particles().skipped_total(), 15);
}

#[test]
fn test_particle_frames_rise_through_container() {
    let mut effects = Effects::new(particles_only(Some(1)));
    effects.set_viewport(viewport_at(0.0));
    effects.init();
    effects.advance_to(ms(100));

    let frames = effects.particle_frames();
    assert_eq!(frames.len(), 1);
    let (_, frame) = frames[0];
    assert!(frame.translate_y < 0.0);
    assert!(frame.opacity <= 0.4);
}

#[test]
fn test_counter_counts_once_to_target() {
    let mut effects = Effects::new(quiet());
    let kpi = effects.document_mut().insert(
        None,
        Element::new(Rect::new(0.0, 100.0, 200.0, 80.0))
            .capabilities(Capabilities::COUNTER)
            .text("0")
            .attr("data-target", "50"),
    );
    effects.init();
    assert!(effects.counter(kpi).is_none());

    scroll(&mut effects, 0.0);
    effects.advance_by(ms(1000));
    let halfway: i64 = effects.document().get(kpi).unwrap().text.parse().unwrap();
    assert!(halfway > 0 && halfway < 50);

    effects.advance_by(ms(1000));
    assert_eq!(effects.document().get(kpi).unwrap().text, "50");
    let ticks = effects.counter(kpi).unwrap().ticks;

    // Scrolling it out and back in does not restart the count
    scroll(&mut effects, 2000.0);
    scroll(&mut effects, 0.0);
    effects.advance_by(ms(500));
    assert_eq!(effects.document().get(kpi).unwrap().text, "50");
    assert_eq!(effects.counter(kpi).unwrap().ticks, ticks);
}

#[test]
fn test_init_with_known_viewport_fires_on_screen_elements() {
    let mut effects = Effects::new(quiet());
    let doc = effects.document_mut();
    let card = doc.insert(
        None,
        Element::new(Rect::new(0.0, 100.0, 300.0, 100.0)).capabilities(Capabilities::REVEAL),
    );
    let kpi = doc.insert(
        None,
        Element::new(Rect::new(0.0, 300.0, 200.0, 80.0))
            .capabilities(Capabilities::COUNTER)
            .text("0")
            .attr("data-target", "50"),
    );
    let below = doc.insert(
        None,
        Element::new(Rect::new(0.0, 1500.0, 300.0, 100.0)).capabilities(Capabilities::REVEAL),
    );

    effects.set_viewport(viewport_at(0.0));
    effects.init();

    assert_eq!(effects.revealed_at(card), Some(Duration::ZERO));
    assert!(effects.document().get(card).unwrap().has_class(class::VISIBLE));
    assert!(effects.counter(kpi).is_some());
    assert!(!effects.is_revealed(below));

    effects.advance_by(ms(2000));
    assert_eq!(effects.document().get(kpi).unwrap().text, "50");
}

#[test]
fn test_register_after_scroll_checks_current_viewport() {
    let mut effects = Effects::new(quiet());
    effects.init();
    scroll(&mut effects, 0.0);
    effects.advance_to(ms(300));

    let doc = effects.document_mut();
    let late = doc.insert(
        None,
        Element::new(Rect::new(0.0, 200.0, 300.0, 100.0)).capabilities(Capabilities::REVEAL),
    );
    let later = doc.insert(
        None,
        Element::new(Rect::new(0.0, 2000.0, 300.0, 100.0)).capabilities(Capabilities::REVEAL),
    );
    effects.register(late, RegisterOptions::default());
    effects.register(later, RegisterOptions::default());

    assert_eq!(effects.revealed_at(late), Some(ms(300)));
    assert!(!effects.is_revealed(later));

    effects.advance_to(ms(400));
    scroll(&mut effects, 1600.0);
    assert_eq!(effects.revealed_at(later), Some(ms(400)));
}

#[test]
fn test_reinit_restarts_particles_once() {
    let mut effects = Effects::new(particles_only(None));
    effects.init();
    effects.advance_to(ms(1000));
    assert_eq!(effects.particles().created_total(), 6);
    let container = effects.particles().container();

    effects.teardown();
    effects.init();
    effects.advance_to(ms(8000));

    assert_eq!(effects.particles().created_total(), 26);
    assert_eq!(effects.particles().container(), container);
}

#[test]
fn test_toast_shows_for_its_duration() {
    let mut effects = Effects::new(quiet());
    effects.init();
    let id = effects.notify("Saved", "success", Some(ms(1000)));

    assert_eq!(effects.toasts().len(), 1);
    assert_eq!(effects.toasts()[0].severity, Severity::Success);
    assert_eq!(effects.toast_accent(id), Some(effects.theme().success));

    effects.advance_to(ms(999));
    assert_eq!(effects.toasts()[0].phase, ToastPhase::Shown);
    effects.advance_to(ms(1000));
    assert_eq!(effects.toasts()[0].phase, ToastPhase::Leaving);
    effects.advance_to(ms(1300));
    assert!(effects.toasts().is_empty());
}

#[test]
fn test_quick_toasts_are_independent() {
    let mut effects = Effects::new(quiet());
    effects.init();
    let first = effects.notify("one", Severity::Info, None);
    let second = effects.notify("two", "nonsense", Some(ms(1000)));
    assert_ne!(first, second);
    assert_eq!(effects.toasts().len(), 2);
    assert_eq!(effects.toasts()[1].severity, Severity::Info);

    effects.advance_to(ms(1300));
    assert_eq!(effects.toasts().len(), 1);
    assert_eq!(effects.toasts()[0].id, first);

    assert!(effects.dismiss_toast(first));
    assert!(effects.toasts().is_empty());
    // Its timers still fire, harmlessly
    effects.advance_to(ms(5000));
    assert!(effects.toasts().is_empty());
}

#[test]
fn test_second_click_replaces_ripple() {
    let mut effects = Effects::new(quiet());
    let doc = effects.document_mut();
    let button = doc.insert(
        None,
        Element::new(Rect::new(0.0, 0.0, 100.0, 40.0)).capabilities(Capabilities::RIPPLE),
    );
    let label = doc.insert(Some(button), Element::new(Rect::new(10.0, 10.0, 80.0, 20.0)));
    effects.init();

    let click = Event::Click {
        target: label,
        position: Point::new(50.0, 20.0),
    };
    assert!(effects.handle_event(click.clone()).is_handled());
    assert_eq!(effects.ripple(button).unwrap().generation, 1);
    assert_eq!(effects.ripple(button).unwrap().diameter, 100.0);

    effects.advance_to(ms(300));
    effects.handle_event(click);
    effects.advance_to(ms(600));
    let ripple = effects.ripple(button).unwrap();
    assert_eq!(ripple.generation, 2);
    assert_eq!(ripple.started_at, ms(300));

    effects.advance_to(ms(900));
    assert!(effects.ripple(button).is_none());
}

#[test]
fn test_magnetic_and_tilt_hover() {
    let mut effects = Effects::new(quiet());
    let doc = effects.document_mut();
    let rect = Rect::new(100.0, 100.0, 200.0, 100.0);
    let magnet = doc.insert(None, Element::new(rect).capabilities(Capabilities::MAGNETIC));
    let tilt = doc.insert(None, Element::new(rect).capabilities(Capabilities::TILT));
    effects.init();
    let center = rect.center();

    effects.handle_event(Event::PointerMove {
        target: magnet,
        position: center,
    });
    assert!(effects.document().get(magnet).unwrap().transform.is_identity());

    effects.handle_event(Event::PointerMove {
        target: magnet,
        position: Point::new(300.0, 150.0),
    });
    let rows = effects.document().get(magnet).unwrap().transform.rows();
    assert_abs_diff_eq!(rows[0][3], 10.0, epsilon = 1e-4);
    assert_abs_diff_eq!(rows[1][3], 0.0, epsilon = 1e-4);

    effects.handle_event(Event::PointerLeave { target: magnet });
    assert!(effects.document().get(magnet).unwrap().transform.is_identity());

    let config = effects.config().hover;
    assert_eq!(hover::tilt_angles(&rect, center, &config), (0.0, 0.0));
    effects.handle_event(Event::PointerMove {
        target: tilt,
        position: Point::new(150.0, 180.0),
    });
    assert!(!effects.document().get(tilt).unwrap().transform.is_identity());
    effects.handle_event(Event::PointerLeave { target: tilt });
    assert!(effects.document().get(tilt).unwrap().transform.is_identity());
}

#[test]
fn test_parallax_coalesces_scrolls() {
    let mut effects = Effects::new(quiet());
    let doc = effects.document_mut();
    let slow = doc.insert(
        None,
        Element::new(Rect::new(0.0, 0.0, 800.0, 400.0))
            .capabilities(Capabilities::PARALLAX)
            .attr("data-speed", "0.2"),
    );
    let default = doc.insert(
        None,
        Element::new(Rect::new(0.0, 400.0, 800.0, 400.0)).capabilities(Capabilities::PARALLAX),
    );
    effects.init();

    for y in [100.0, 200.0, 300.0] {
        scroll(&mut effects, y);
    }
    assert_eq!(effects.parallax().frames_applied(), 0);

    effects.advance_by(ms(16));
    assert_eq!(effects.parallax().frames_applied(), 1);
    let slow_y = effects.document().get(slow).unwrap().transform.rows()[1][3];
    let default_y = effects.document().get(default).unwrap().transform.rows()[1][3];
    assert_abs_diff_eq!(slow_y, -60.0, epsilon = 1e-3);
    assert_abs_diff_eq!(default_y, -150.0, epsilon = 1e-3);

    effects.advance_by(ms(100));
    assert_eq!(effects.parallax().frames_applied(), 1);
}

#[test]
fn test_teardown_hands_back_previous_notifier() {
    let seen = Rc::new(RefCell::new(Vec::new()));
    let sink = Rc::clone(&seen);

    let mut effects = Effects::new(quiet());
    effects.init();
    effects.wrap_notifier(move |message: &str, severity: Severity, _: Duration| {
        sink.borrow_mut().push(format!("{}:{}", severity.as_str(), message));
    });

    // Toasts no longer reach the old notifier
    effects.notify("hello", Severity::Info, None);
    assert!(seen.borrow().is_empty());
    assert!(effects.fallback_notify("direct", Severity::Warning, ms(10)));

    let mut previous = effects.teardown().expect("previous notifier");
    previous.notify("after", Severity::Error, ms(10));
    assert_eq!(*seen.borrow(), vec!["warning:direct", "error:after"]);

    assert!(effects.teardown().is_none());
    assert!(!effects.fallback_notify("gone", Severity::Info, ms(10)));
}

#[test]
fn test_events_ignored_outside_lifecycle() {
    let mut effects = Effects::new(quiet());
    let button = effects.document_mut().insert(
        None,
        Element::new(Rect::new(0.0, 0.0, 100.0, 40.0)).capabilities(Capabilities::RIPPLE),
    );
    let click = Event::Click {
        target: button,
        position: Point::new(10.0, 10.0),
    };
    assert_eq!(effects.handle_event(click.clone()), EventResponse::Ignored);

    effects.init();
    assert!(effects.handle_event(click.clone()).is_handled());
    effects.teardown();
    assert_eq!(effects.handle_event(click), EventResponse::Ignored);
}

#[test]
fn test_disabled_handler_is_not_routed() {
    let mut effects = Effects::new(quiet().disable(Handler::Ripple));
    let button = effects.document_mut().insert(
        None,
        Element::new(Rect::new(0.0, 0.0, 100.0, 40.0)).capabilities(Capabilities::RIPPLE),
    );
    effects.init();
    let response = effects.handle_event(Event::Click {
        target: button,
        position: Point::new(10.0, 10.0),
    });
    assert_eq!(response, EventResponse::Ignored);
    assert!(effects.ripple(button).is_none());
}

#[test]
fn test_anchor_requests_smooth_scroll() {
    let mut effects = Effects::new(quiet());
    let doc = effects.document_mut();
    let link = doc.insert(
        None,
        Element::new(Rect::new(0.0, 0.0, 80.0, 20.0))
            .capabilities(Capabilities::ANCHOR)
            .attr("href", "#pricing"),
    );
    let broken = doc.insert(
        None,
        Element::new(Rect::new(100.0, 0.0, 80.0, 20.0))
            .capabilities(Capabilities::ANCHOR)
            .attr("href", "#missing"),
    );
    doc.insert(None, Element::new(Rect::new(0.0, 2400.0, 800.0, 600.0)).attr("id", "pricing"));
    effects.init();

    let response = effects.handle_event(Event::Click {
        target: link,
        position: Point::new(5.0, 5.0),
    });
    assert!(response.is_handled());
    assert_eq!(
        effects.take_scroll_requests(),
        vec![ScrollRequest {
            top: 2400.0,
            smooth: true
        }]
    );
    assert!(effects.take_scroll_requests().is_empty());

    let response = effects.handle_event(Event::Click {
        target: broken,
        position: Point::new(105.0, 5.0),
    });
    assert_eq!(response, EventResponse::Ignored);
    assert!(effects.take_scroll_requests().is_empty());
}

#[test]
fn test_form_focus_and_submit_shake() {
    let mut effects = Effects::new(quiet());
    let doc = effects.document_mut();
    let form = doc.insert(None, Element::new(Rect::default()).capabilities(Capabilities::FORM));
    let name = doc.insert(
        Some(form),
        Element::new(Rect::default())
            .capabilities(Capabilities::FORM_FIELD)
            .value("Ada"),
    );
    let email = doc.insert(
        Some(form),
        Element::new(Rect::default())
            .capabilities(Capabilities::FORM_FIELD)
            .invalid(true),
    );
    effects.init();
    assert!(effects.document().get(name).unwrap().has_class(class::HAS_VALUE));
    assert!(!effects.document().get(email).unwrap().has_class(class::HAS_VALUE));

    effects.handle_event(Event::Focus { target: email });
    let el = effects.document().get(email).unwrap();
    assert!(el.has_class(class::FOCUSED) && el.has_class(class::GLOW));
    effects.handle_event(Event::Blur { target: email });
    let el = effects.document().get(email).unwrap();
    assert!(!el.has_class(class::FOCUSED) && !el.has_class(class::GLOW));

    effects.handle_event(Event::Submit { form });
    assert!(effects.document().get(email).unwrap().has_class(class::SHAKE));
    assert!(!effects.document().get(name).unwrap().has_class(class::SHAKE));
    effects.advance_by(ms(499));
    assert!(effects.document().get(email).unwrap().has_class(class::SHAKE));
    effects.advance_by(ms(1));
    assert!(!effects.document().get(email).unwrap().has_class(class::SHAKE));
}

#[test]
fn test_loader_fades_after_load() {
    let mut effects = Effects::new(EffectsConfig::default().without_particles());
    effects.init();
    let overlay = effects.loader().element().unwrap();
    assert!(effects
        .document()
        .get(overlay)
        .unwrap()
        .has_class(class::LOADING_OVERLAY));

    effects.advance_to(ms(200));
    effects.handle_event(Event::Load);
    effects.advance_to(ms(1199));
    assert_eq!(effects.document().get(overlay).unwrap().opacity, 1.0);
    effects.advance_to(ms(1200));
    assert_eq!(effects.document().get(overlay).unwrap().opacity, 0.0);
    assert!(matches!(effects.loader().phase(), LoaderPhase::Fading { .. }));

    effects.advance_to(ms(1700));
    assert!(!effects.document().contains(overlay));
    assert_eq!(effects.loader().phase(), LoaderPhase::Removed);
}

#[test]
fn test_effects_as_notifier() {
    let mut effects = Effects::new(quiet());
    {
        let notifier: &mut dyn Notifier = &mut effects;
        notifier.notify("via trait", Severity::Warning, ms(2000));
    }
    assert_eq!(effects.toasts().len(), 1);
    assert_eq!(effects.toasts()[0].duration, ms(2000));
}
