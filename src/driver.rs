//! Real-time driver.
//!
//! Runs [`Effects`] on a calloop event loop: a repeating timer moves the
//! timeline forward from a monotonic clock every frame, and host events
//! arrive over a channel that can be fed from any thread. The loop ends when
//! every [`Sender`](calloop::channel::Sender) has been dropped.

use std::time::{Duration, Instant};

use calloop::channel::{self, Channel, Sender};
use calloop::timer::{TimeoutAction, Timer};
use calloop::{EventLoop, LoopSignal};

use crate::dispatch::Event;
use crate::error::{Error, Result};
use crate::Effects;

/// Called after every frame, once due jobs have run. Use it to render.
pub type FrameCallback = Box<dyn FnMut(&mut Effects)>;

struct DriverState {
    effects: Effects,
    started: Instant,
    /// Engine time when the clock started
    offset: Duration,
    on_frame: Option<FrameCallback>,
    signal: LoopSignal,
}

impl DriverState {
    fn elapsed(&self) -> Duration {
        self.offset + self.started.elapsed()
    }
}

pub struct Driver {
    event_loop: EventLoop<'static, DriverState>,
    state: DriverState,
    sender: Sender<Event>,
}

impl Driver {
    pub fn new(effects: Effects) -> Result<Self> {
        let event_loop: EventLoop<'static, DriverState> = EventLoop::try_new()?;
        let handle = event_loop.handle();

        let (sender, events): (Sender<Event>, Channel<Event>) = channel::channel();
        handle
            .insert_source(events, |event, _, state| match event {
                channel::Event::Msg(event) => {
                    state.effects.handle_event(event);
                }
                channel::Event::Closed => {
                    log::debug!("event channel closed, stopping");
                    state.signal.stop();
                }
            })
            .map_err(|e| Error::InsertSource {
                source_name: "event channel",
                error: e.error,
            })?;

        let frame = effects.config().frame_interval;
        handle
            .insert_source(Timer::from_duration(frame), move |_, _, state| {
                let now = state.elapsed();
                state.effects.advance_to(now);
                if let Some(on_frame) = state.on_frame.as_mut() {
                    on_frame(&mut state.effects);
                }
                TimeoutAction::ToDuration(frame)
            })
            .map_err(|e| Error::InsertSource {
                source_name: "frame timer",
                error: e.error,
            })?;

        let state = DriverState {
            offset: effects.now(),
            effects,
            started: Instant::now(),
            on_frame: None,
            signal: event_loop.get_signal(),
        };
        Ok(Self {
            event_loop,
            state,
            sender,
        })
    }

    /// A handle for delivering events, usable from other threads.
    pub fn sender(&self) -> Sender<Event> {
        self.sender.clone()
    }

    /// Stops the loop from inside a frame callback or another thread.
    pub fn signal(&self) -> LoopSignal {
        self.state.signal.clone()
    }

    pub fn on_frame<F: FnMut(&mut Effects) + 'static>(mut self, callback: F) -> Self {
        self.state.on_frame = Some(Box::new(callback));
        self
    }

    pub fn effects(&self) -> &Effects {
        &self.state.effects
    }

    pub fn effects_mut(&mut self) -> &mut Effects {
        &mut self.state.effects
    }

    /// Initialize the effects and run until every sender is dropped or the
    /// loop is signalled to stop. Hands the effects back afterwards.
    pub fn run(self) -> Result<Effects> {
        if env_logger::try_init().is_err() {
            log::debug!("logger already installed by the host");
        }

        let Driver {
            mut event_loop,
            mut state,
            sender,
        } = self;
        // Only the host's clones keep the channel open
        drop(sender);

        state.effects.init();
        state.started = Instant::now();
        state.offset = state.effects.now();
        log::info!(
            "driver running, frame every {:?}",
            state.effects.config().frame_interval
        );

        event_loop.run(None::<Duration>, &mut state, |_| {})?;
        log::info!("driver stopped at {:?}", state.effects.now());
        Ok(state.effects)
    }
}
