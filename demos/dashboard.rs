use std::thread;
use std::time::Duration;

use glint::prelude::*;

fn main() -> glint::Result<()> {
    let mut effects = Effects::new(EffectsConfig::default().max_particles(Some(24)));
    let doc = effects.document_mut();

    let hero = doc.insert(
        None,
        Element::new(Rect::new(0.0, 0.0, 1280.0, 500.0)).capabilities(Capabilities::PARALLAX),
    );
    let cards = doc.insert(
        None,
        Element::new(Rect::new(0.0, 900.0, 1280.0, 300.0))
            .capabilities(Capabilities::STAGGER_CONTAINER),
    );
    for i in 0..4 {
        doc.insert(
            Some(cards),
            Element::new(Rect::new(i as f32 * 320.0, 900.0, 300.0, 300.0))
                .capabilities(Capabilities::STAGGER_ITEM | Capabilities::TILT),
        );
    }
    doc.insert(
        None,
        Element::new(Rect::new(0.0, 1300.0, 200.0, 80.0))
            .capabilities(Capabilities::COUNTER)
            .text("0")
            .attr("data-target", "1280"),
    );
    let button = doc.insert(
        None,
        Element::new(Rect::new(40.0, 520.0, 160.0, 48.0))
            .capabilities(Capabilities::RIPPLE | Capabilities::MAGNETIC),
    );

    let driver = Driver::new(effects)?;
    let events = driver.sender();
    let stop = driver.signal();

    let host = thread::spawn(move || {
        let _ = events.send(Event::Resize {
            viewport: Rect::new(0.0, 0.0, 1280.0, 720.0),
        });
        let _ = events.send(Event::Load);
        for step in 1..=10 {
            thread::sleep(Duration::from_millis(100));
            let _ = events.send(Event::Scroll {
                viewport: Rect::new(0.0, step as f32 * 80.0, 1280.0, 720.0),
            });
        }
        let _ = events.send(Event::Click {
            target: button,
            position: Point::new(100.0, 540.0),
        });
        thread::sleep(Duration::from_secs(3));
        stop.stop();
    });

    let mut last_report = Duration::ZERO;
    let mut announced = false;
    let effects = driver
        .on_frame(move |effects| {
            if effects.now().saturating_sub(last_report) < Duration::from_millis(500) {
                return;
            }
            last_report = effects.now();
            let hero_y = effects
                .document()
                .get(hero)
                .map(|el| el.transform.rows()[1][3])
                .unwrap_or_default();
            println!(
                "{:>6.2}s  particles: {:>2}  hero offset: {:>6.1}  toasts: {}",
                effects.now().as_secs_f32(),
                effects.particles().len(),
                hero_y,
                effects.toasts().len()
            );
            if effects.is_revealed(cards) && !announced {
                announced = true;
                effects.notify("Cards revealed", Severity::Success, Some(Duration::from_secs(1)));
            }
        })
        .run()?;

    let _ = host.join();
    println!("stopped at {:?}", effects.now());
    Ok(())
}
